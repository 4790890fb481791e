use std::pin::pin;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use storage::repository::{PlanRepository, PlanSummary};
use studypath_core::Clock;
use studypath_core::model::{PlanId, PlanRequest, StudyPlan, VideoRef};

use crate::config::{DEFAULT_LOOKUP_CONCURRENCY, EnrichmentPolicy};
use crate::error::{ProgressError, StudyPlanError, VideoLookupError};
use crate::plan_generator::PlanGenerator;
use crate::plan_session::PlanSession;
use crate::video_finder::VideoSearch;

/// Generates, enriches and saves study plans, and reopens saved ones.
#[derive(Clone)]
pub struct StudyPlanService {
    clock: Clock,
    generator: PlanGenerator,
    videos: Arc<dyn VideoSearch>,
    plans: Arc<dyn PlanRepository>,
    lookup_concurrency: usize,
    enrichment: EnrichmentPolicy,
}

impl StudyPlanService {
    #[must_use]
    pub fn new(
        clock: Clock,
        generator: PlanGenerator,
        videos: Arc<dyn VideoSearch>,
        plans: Arc<dyn PlanRepository>,
    ) -> Self {
        Self {
            clock,
            generator,
            videos,
            plans,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            enrichment: EnrichmentPolicy::default(),
        }
    }

    /// Limit the number of video lookups in flight. Zero is treated as one.
    #[must_use]
    pub fn with_lookup_concurrency(mut self, limit: usize) -> Self {
        self.lookup_concurrency = limit.max(1);
        self
    }

    #[must_use]
    pub fn with_enrichment(mut self, policy: EnrichmentPolicy) -> Self {
        self.enrichment = policy;
        self
    }

    #[must_use]
    pub fn enrichment(&self) -> EnrichmentPolicy {
        self.enrichment
    }

    #[must_use]
    pub fn plans(&self) -> Arc<dyn PlanRepository> {
        Arc::clone(&self.plans)
    }

    /// Generate a plan for `request`, attach a video to every topic and save
    /// it with empty progress.
    ///
    /// # Errors
    ///
    /// Returns `StudyPlanError::Generation` when the model fails,
    /// `StudyPlanError::Lookup` when a video lookup fails under
    /// `EnrichmentPolicy::AllOrNothing` (an unconfigured search only leaves
    /// topics without videos), and `StudyPlanError::Storage` when
    /// the save fails. Nothing is saved on error.
    pub async fn create_plan(&self, request: &PlanRequest) -> Result<PlanSession, StudyPlanError> {
        let generated = self.generator.generate(request).await?;
        let mut plan = StudyPlan::new(request, generated.weeks, self.clock.now())?;

        self.enrich(&mut plan).await?;

        let id = self.plans.insert_plan(&plan).await.inspect_err(|err| {
            warn!(subject = plan.subject(), error = %err, "saving plan failed");
        })?;
        let plan = plan.with_id(id);
        info!(
            plan_id = %id,
            subject = plan.subject(),
            topics = plan.topic_count(),
            videos = plan.topics().filter(|t| t.video().is_some()).count(),
            "plan saved"
        );

        Ok(PlanSession::from_saved(id, plan))
    }

    async fn enrich(&self, plan: &mut StudyPlan) -> Result<(), StudyPlanError> {
        let subject = plan.subject().to_string();
        let lookups = plan
            .topics()
            .map(|topic| {
                let name = topic.name().to_string();
                let query = format!("{name} {subject}");
                let videos = Arc::clone(&self.videos);
                async move {
                    let result = videos.find(&query).await;
                    (name, result)
                }
            })
            .collect::<Vec<_>>();

        let mut results = pin!(stream::iter(lookups).buffered(self.lookup_concurrency));
        let mut found: Vec<Option<VideoRef>> = Vec::with_capacity(plan.topic_count());
        while let Some((topic, result)) = results.next().await {
            found.push(self.apply_policy(topic, result)?);
        }

        for (topic, video) in plan.topics_mut().zip(found) {
            topic.set_video(video);
        }
        Ok(())
    }

    fn apply_policy(
        &self,
        topic: String,
        result: Result<Option<VideoRef>, VideoLookupError>,
    ) -> Result<Option<VideoRef>, StudyPlanError> {
        match (result, self.enrichment) {
            (Ok(video), _) => Ok(video),
            (Err(VideoLookupError::NotConfigured), _) => {
                debug!(topic = %topic, "video search not configured; topic left without video");
                Ok(None)
            }
            (Err(source), EnrichmentPolicy::AllOrNothing) => {
                warn!(topic = %topic, error = %source, "video lookup failed; discarding plan");
                Err(StudyPlanError::Lookup { topic, source })
            }
            (Err(source), EnrichmentPolicy::BestEffort) => {
                warn!(topic = %topic, error = %source, "video lookup failed; topic left without video");
                Ok(None)
            }
        }
    }

    /// Reopen a saved plan with its stored progress.
    ///
    /// # Errors
    ///
    /// Returns `StudyPlanError::Storage` if the lookup fails.
    pub async fn open_plan(&self, id: PlanId) -> Result<Option<PlanSession>, StudyPlanError> {
        let plan = self.plans.get_plan(id).await?;
        Ok(plan.and_then(|p| PlanSession::new(p).ok()))
    }

    /// Reopen the most recently created plan, if any.
    ///
    /// # Errors
    ///
    /// Returns `StudyPlanError::Storage` if the lookup fails.
    pub async fn resume_latest(&self) -> Result<Option<PlanSession>, StudyPlanError> {
        let plan = self.plans.latest_plan().await?;
        Ok(plan.and_then(|p| PlanSession::new(p).ok()))
    }

    /// # Errors
    ///
    /// Returns `StudyPlanError::Storage` if the query fails.
    pub async fn list_plans(&self, limit: u32) -> Result<Vec<PlanSummary>, StudyPlanError> {
        Ok(self.plans.list_plans(limit).await?)
    }

    /// Write a checkbox change through `session` to this service's store.
    ///
    /// # Errors
    ///
    /// See [`PlanSession::set_topic_completed`].
    pub async fn record_progress(
        &self,
        session: &mut PlanSession,
        topic: &str,
        completed: bool,
    ) -> Result<bool, ProgressError> {
        session
            .set_topic_completed(self.plans.as_ref(), topic, completed)
            .await
    }
}
