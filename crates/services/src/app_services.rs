use std::sync::Arc;

use storage::repository::Storage;
use tracing::{info, warn};

use crate::Clock;
use crate::config::ServicesConfig;
use crate::error::AppServicesError;
use crate::llm_client::ChatCompletionClient;
use crate::plan_generator::PlanGenerator;
use crate::study_plan_service::StudyPlanService;
use crate::video_finder::YouTubeVideoFinder;

/// Assembles app-facing services from storage and configuration.
#[derive(Clone)]
pub struct AppServices {
    study_plans: Arc<StudyPlanService>,
    generation_enabled: bool,
    video_search_enabled: bool,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or an HTTP
    /// client cannot be built.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: &ServicesConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, config)
    }

    /// Build services on top of an already opened `Storage`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Http` if an HTTP client cannot be built.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        config: &ServicesConfig,
    ) -> Result<Self, AppServicesError> {
        let model = ChatCompletionClient::new(config.ai.clone(), config.http_timeout)?;
        let finder = YouTubeVideoFinder::new(config.youtube.clone(), config.http_timeout)?;
        let generation_enabled = model.enabled();
        let video_search_enabled = finder.enabled();

        if !generation_enabled {
            warn!("no model API key configured; plan generation is disabled");
        }
        if !video_search_enabled {
            warn!("no YouTube API key configured; plans will be saved without videos");
        }
        info!(
            model = model.model().unwrap_or("-"),
            lookup_concurrency = config.lookup_concurrency,
            enrichment = config.enrichment.as_str(),
            "services ready"
        );

        let study_plans = StudyPlanService::new(
            clock,
            PlanGenerator::new(Arc::new(model)),
            Arc::new(finder),
            Arc::clone(&storage.plans),
        )
        .with_lookup_concurrency(config.lookup_concurrency)
        .with_enrichment(config.enrichment);

        Ok(Self {
            study_plans: Arc::new(study_plans),
            generation_enabled,
            video_search_enabled,
        })
    }

    #[must_use]
    pub fn study_plans(&self) -> Arc<StudyPlanService> {
        Arc::clone(&self.study_plans)
    }

    #[must_use]
    pub fn generation_enabled(&self) -> bool {
        self.generation_enabled
    }

    #[must_use]
    pub fn video_search_enabled(&self) -> bool {
        self.video_search_enabled
    }
}
