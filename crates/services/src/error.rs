//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use studypath_core::{PlanError, PlanRequestError};

/// Errors emitted by the plan generator and its text model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("plan generation is not configured (missing API key)")]
    NotConfigured,
    #[error("model request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("model response is not a valid plan document: {0}")]
    Malformed(String),
    #[error("model response violates plan rules: {0}")]
    Invalid(#[from] PlanError),
}

/// Errors emitted by video search.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VideoLookupError {
    #[error("video search is not configured (missing API key)")]
    NotConfigured,
    #[error("video search failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `StudyPlanService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyPlanError {
    #[error(transparent)]
    Request(#[from] PlanRequestError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("video lookup for {topic:?} failed: {source}")]
    Lookup {
        topic: String,
        #[source]
        source: VideoLookupError,
    },
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while writing topic progress.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("plan has not been saved yet")]
    Unsaved,
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {name} value: {raw}")]
    InvalidValue { name: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
