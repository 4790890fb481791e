use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use studypath_core::model::{
    PlanId, ProficiencyLevel, ProgressMap, StudyPlan, StudyPlanDraft, WeekPlan,
};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a plan document.
///
/// The weeks (with their topics and videos) travel as one JSON body so the
/// store treats a plan as a single document. Progress lives beside it and is
/// updated one topic at a time.
#[derive(Debug, Clone)]
pub struct PlanRecord {
    pub subject: String,
    pub current_level: String,
    pub target_level: String,
    pub hours_per_week: i64,
    pub weeks_json: String,
    pub created_at: DateTime<Utc>,
}

impl PlanRecord {
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the weeks cannot be encoded.
    pub fn from_plan(plan: &StudyPlan) -> Result<Self, StorageError> {
        let weeks_json = serde_json::to_string(plan.weeks())
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Self {
            subject: plan.subject().to_string(),
            current_level: plan.current_level().label().to_string(),
            target_level: plan.target_level().label().to_string(),
            hours_per_week: i64::from(plan.hours_per_week()),
            weeks_json,
            created_at: plan.created_at(),
        })
    }

    /// Convert the record back into a domain `StudyPlan`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if any field fails to decode or
    /// the decoded plan violates plan invariants.
    pub fn into_plan(self, id: PlanId, progress: ProgressMap) -> Result<StudyPlan, StorageError> {
        let weeks: Vec<WeekPlan> = serde_json::from_str(&self.weeks_json)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let hours_per_week = u8::try_from(self.hours_per_week).map_err(|_| {
            StorageError::Serialization(format!("invalid hours_per_week: {}", self.hours_per_week))
        })?;

        StudyPlan::from_persisted(StudyPlanDraft {
            id: Some(id),
            subject: self.subject,
            current_level: parse_level(&self.current_level)?,
            target_level: parse_level(&self.target_level)?,
            hours_per_week,
            weeks,
            created_at: self.created_at,
            progress,
        })
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

fn parse_level(raw: &str) -> Result<ProficiencyLevel, StorageError> {
    raw.parse()
        .map_err(|_| StorageError::Serialization(format!("invalid level: {raw}")))
}

/// Listing row for saved plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub id: PlanId,
    pub subject: String,
    pub current_level: ProficiencyLevel,
    pub target_level: ProficiencyLevel,
    pub hours_per_week: u8,
    pub created_at: DateTime<Utc>,
}

impl PlanSummary {
    /// Summary of a saved plan. Returns `None` for plans without an id.
    #[must_use]
    pub fn from_plan(plan: &StudyPlan) -> Option<Self> {
        Some(Self {
            id: plan.id()?,
            subject: plan.subject().to_string(),
            current_level: plan.current_level(),
            target_level: plan.target_level(),
            hours_per_week: plan.hours_per_week(),
            created_at: plan.created_at(),
        })
    }
}

/// Repository contract for plan documents.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Insert a new plan document and return its generated id.
    ///
    /// Any id already on `plan` is ignored. Progress on `plan` is stored with it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the plan cannot be stored.
    async fn insert_plan(&self, plan: &StudyPlan) -> Result<PlanId, StorageError>;

    /// Set the completion flag of one topic on a stored plan.
    ///
    /// Last write wins. Updating a plan that does not exist is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn set_topic_progress(
        &self,
        plan_id: PlanId,
        topic: &str,
        completed: bool,
    ) -> Result<(), StorageError>;

    /// Fetch a plan, including its progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup or decoding fails.
    async fn get_plan(&self, plan_id: PlanId) -> Result<Option<StudyPlan>, StorageError>;

    /// List saved plans, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    async fn list_plans(&self, limit: u32) -> Result<Vec<PlanSummary>, StorageError>;

    /// The most recently created plan, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lookup fails.
    async fn latest_plan(&self) -> Result<Option<StudyPlan>, StorageError> {
        match self.list_plans(1).await?.first() {
            Some(summary) => self.get_plan(summary.id).await,
            None => Ok(None),
        }
    }
}

#[derive(Default)]
struct InMemoryState {
    next_id: u64,
    plans: BTreeMap<PlanId, StudyPlan>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored plans.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn plan_count(&self) -> Result<usize, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.plans.len())
    }
}

#[async_trait]
impl PlanRepository for InMemoryRepository {
    async fn insert_plan(&self, plan: &StudyPlan) -> Result<PlanId, StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.next_id += 1;
        let id = PlanId::new(guard.next_id);
        guard.plans.insert(id, plan.clone().with_id(id));
        Ok(id)
    }

    async fn set_topic_progress(
        &self,
        plan_id: PlanId,
        topic: &str,
        completed: bool,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if let Some(plan) = guard.plans.get_mut(&plan_id) {
            plan.set_progress(topic, completed);
        }
        Ok(())
    }

    async fn get_plan(&self, plan_id: PlanId) -> Result<Option<StudyPlan>, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.plans.get(&plan_id).cloned())
    }

    async fn list_plans(&self, limit: u32) -> Result<Vec<PlanSummary>, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut summaries: Vec<PlanSummary> =
            guard.plans.values().filter_map(PlanSummary::from_plan).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        summaries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(summaries)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub plans: Arc<dyn PlanRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let plans: Arc<dyn PlanRepository> = Arc::new(InMemoryRepository::new());
        Self { plans }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use studypath_core::model::{PlanRequest, Topic, VideoRef};
    use studypath_core::time::fixed_now;

    fn build_plan(subject: &str, created_at: DateTime<Utc>) -> StudyPlan {
        let request = PlanRequest::new(
            subject,
            ProficiencyLevel::Beginner,
            ProficiencyLevel::Intermediate,
            10,
        )
        .unwrap();
        let video = VideoRef::from_search_hit("abc123", "Intro video", "https://i.ytimg.com/a.jpg")
            .unwrap();
        let topics = vec![
            Topic::new("Basics", 2.0, "Learn the basics")
                .unwrap()
                .with_video(Some(video)),
            Topic::new("Practice", 3.0, "Do exercises").unwrap(),
        ];
        let week = WeekPlan::new(1, "Foundations", vec!["Get started".into()], topics, 5.0)
            .unwrap();
        StudyPlan::new(&request, vec![week], created_at).unwrap()
    }

    #[tokio::test]
    async fn round_trips_plan_document() {
        let repo = InMemoryRepository::new();
        let plan = build_plan("Rust", fixed_now());
        let id = repo.insert_plan(&plan).await.unwrap();

        let fetched = repo.get_plan(id).await.unwrap().expect("plan stored");
        assert_eq!(fetched.id(), Some(id));
        assert_eq!(fetched.subject(), plan.subject());
        assert_eq!(fetched.weeks(), plan.weeks());
        assert_eq!(fetched.created_at(), plan.created_at());
    }

    #[tokio::test]
    async fn progress_is_last_write_wins() {
        let repo = InMemoryRepository::new();
        let id = repo.insert_plan(&build_plan("Rust", fixed_now())).await.unwrap();

        repo.set_topic_progress(id, "Basics", true).await.unwrap();
        repo.set_topic_progress(id, "Basics", false).await.unwrap();
        repo.set_topic_progress(id, "Basics", true).await.unwrap();

        let fetched = repo.get_plan(id).await.unwrap().unwrap();
        assert!(fetched.progress().is_completed("Basics"));
        assert!(!fetched.progress().is_completed("Practice"));
    }

    #[tokio::test]
    async fn progress_on_missing_plan_is_a_no_op() {
        let repo = InMemoryRepository::new();
        repo.set_topic_progress(PlanId::new(99), "Basics", true)
            .await
            .unwrap();
        assert!(repo.get_plan(PlanId::new(99)).await.unwrap().is_none());
        assert_eq!(repo.plan_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn latest_plan_is_most_recent() {
        let repo = InMemoryRepository::new();
        let now = fixed_now();
        repo.insert_plan(&build_plan("Old", now - Duration::days(2)))
            .await
            .unwrap();
        let newest = repo.insert_plan(&build_plan("New", now)).await.unwrap();

        let latest = repo.latest_plan().await.unwrap().unwrap();
        assert_eq!(latest.id(), Some(newest));
        assert_eq!(latest.subject(), "New");

        let listed = repo.list_plans(10).await.unwrap();
        let subjects: Vec<_> = listed.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, ["New", "Old"]);
    }

    #[test]
    fn record_round_trips_through_json() {
        let plan = build_plan("Rust", fixed_now());
        let record = PlanRecord::from_plan(&plan).unwrap();
        assert_eq!(record.current_level, "Beginner");
        let restored = record
            .into_plan(PlanId::new(7), ProgressMap::new())
            .unwrap();
        assert_eq!(restored.weeks(), plan.weeks());
        assert_eq!(restored.id(), Some(PlanId::new(7)));
    }
}
