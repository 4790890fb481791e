#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod llm_client;
pub mod plan_generator;
pub mod plan_session;
pub mod study_plan_service;
pub mod video_finder;

pub use studypath_core::Clock;

pub use app_services::AppServices;
pub use config::{AiConfig, EnrichmentPolicy, ServicesConfig, YouTubeConfig};
pub use error::{
    AppServicesError, ConfigError, GenerationError, ProgressError, StudyPlanError,
    VideoLookupError,
};
pub use llm_client::{ChatCompletionClient, TextModel};
pub use plan_generator::{GeneratedPlan, PlanGenerator};
pub use plan_session::PlanSession;
pub use study_plan_service::StudyPlanService;
pub use video_finder::{VideoSearch, YouTubeVideoFinder};
