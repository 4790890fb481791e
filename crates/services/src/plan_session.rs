use storage::repository::PlanRepository;
use studypath_core::model::{Completion, PlanId, ProgressMap, StudyPlan};
use tracing::{debug, error};

use crate::error::ProgressError;

/// The plan a window is working on, plus its cached progress.
///
/// Storage stays the source of truth: the cache only changes after the
/// matching write has succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSession {
    id: PlanId,
    plan: StudyPlan,
}

impl PlanSession {
    /// Wrap a saved plan.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Unsaved` if the plan has no id yet.
    pub fn new(plan: StudyPlan) -> Result<Self, ProgressError> {
        let id = plan.id().ok_or(ProgressError::Unsaved)?;
        Ok(Self { id, plan })
    }

    pub(crate) fn from_saved(id: PlanId, plan: StudyPlan) -> Self {
        Self { id, plan }
    }

    #[must_use]
    pub fn plan_id(&self) -> PlanId {
        self.id
    }

    #[must_use]
    pub fn plan(&self) -> &StudyPlan {
        &self.plan
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressMap {
        self.plan.progress()
    }

    #[must_use]
    pub fn is_completed(&self, topic: &str) -> bool {
        self.plan.progress().is_completed(topic)
    }

    #[must_use]
    pub fn completion(&self) -> Completion {
        self.plan.completion()
    }

    /// Record a checkbox change for `topic`.
    ///
    /// Returns `Ok(false)` without touching storage when the cached value
    /// already equals `completed`, and `Ok(true)` after a successful write.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownTopic` for names outside the plan and
    /// `ProgressError::Storage` when the write fails; the cache is left
    /// unchanged in both cases.
    pub async fn set_topic_completed(
        &mut self,
        plans: &dyn PlanRepository,
        topic: &str,
        completed: bool,
    ) -> Result<bool, ProgressError> {
        if !self.plan.has_topic(topic) {
            return Err(ProgressError::UnknownTopic(topic.to_string()));
        }
        if self.is_completed(topic) == completed {
            return Ok(false);
        }

        plans
            .set_topic_progress(self.id, topic, completed)
            .await
            .inspect_err(|err| {
                error!(plan_id = %self.id, topic, error = %err, "progress write failed");
            })?;

        self.plan.set_progress(topic, completed);
        debug!(plan_id = %self.id, topic, completed, "progress cached");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use storage::repository::{InMemoryRepository, PlanSummary, StorageError};
    use studypath_core::model::{PlanRequest, ProficiencyLevel, Topic, WeekPlan};
    use studypath_core::time::fixed_now;

    use super::*;

    fn unsaved_plan() -> StudyPlan {
        let request = PlanRequest::new(
            "Rust",
            ProficiencyLevel::Beginner,
            ProficiencyLevel::Advanced,
            6,
        )
        .unwrap();
        let week = WeekPlan::new(
            1,
            "Ownership",
            vec![],
            vec![
                Topic::new("Borrowing", 2.0, "References").unwrap(),
                Topic::new("Lifetimes", 3.0, "Annotations").unwrap(),
            ],
            5.0,
        )
        .unwrap();
        StudyPlan::new(&request, vec![week], fixed_now()).unwrap()
    }

    async fn saved_session(repo: &InMemoryRepository) -> PlanSession {
        let id = repo.insert_plan(&unsaved_plan()).await.unwrap();
        PlanSession::new(repo.get_plan(id).await.unwrap().unwrap()).unwrap()
    }

    struct FailingWrites;

    #[async_trait]
    impl PlanRepository for FailingWrites {
        async fn insert_plan(&self, _plan: &StudyPlan) -> Result<PlanId, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn set_topic_progress(
            &self,
            _plan_id: PlanId,
            _topic: &str,
            _completed: bool,
        ) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn get_plan(&self, _plan_id: PlanId) -> Result<Option<StudyPlan>, StorageError> {
            Ok(None)
        }

        async fn list_plans(&self, _limit: u32) -> Result<Vec<PlanSummary>, StorageError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn unsaved_plans_cannot_start_a_session() {
        assert!(matches!(
            PlanSession::new(unsaved_plan()),
            Err(ProgressError::Unsaved)
        ));
    }

    #[tokio::test]
    async fn change_is_written_then_cached() {
        let repo = InMemoryRepository::new();
        let mut session = saved_session(&repo).await;

        let wrote = session
            .set_topic_completed(&repo, "Borrowing", true)
            .await
            .unwrap();

        assert!(wrote);
        assert!(session.is_completed("Borrowing"));
        assert_eq!(session.completion().percent(), 50);
        let stored = repo.get_plan(session.plan_id()).await.unwrap().unwrap();
        assert!(stored.progress().is_completed("Borrowing"));
    }

    #[tokio::test]
    async fn unchanged_value_skips_the_write() {
        let repo = InMemoryRepository::new();
        let mut session = saved_session(&repo).await;

        let wrote = session
            .set_topic_completed(&FailingWrites, "Lifetimes", false)
            .await
            .unwrap();
        assert!(!wrote);

        session
            .set_topic_completed(&repo, "Lifetimes", true)
            .await
            .unwrap();
        let wrote = session
            .set_topic_completed(&FailingWrites, "Lifetimes", true)
            .await
            .unwrap();
        assert!(!wrote);
    }

    #[tokio::test]
    async fn failed_write_leaves_cache_untouched() {
        let repo = InMemoryRepository::new();
        let mut session = saved_session(&repo).await;

        let err = session
            .set_topic_completed(&FailingWrites, "Borrowing", true)
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressError::Storage(_)));
        assert!(!session.is_completed("Borrowing"));
        assert_eq!(session.completion().completed, 0);
    }

    #[tokio::test]
    async fn unknown_topic_is_rejected() {
        let repo = InMemoryRepository::new();
        let mut session = saved_session(&repo).await;
        let err = session
            .set_topic_completed(&repo, "Macros", true)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::UnknownTopic(name) if name == "Macros"));
    }
}
