use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use services::StudyPlanService;
use studypath_core::model::PlanId;

use crate::platform::LinkOpenerRef;

pub trait UiApp: Send + Sync {
    fn study_plans(&self) -> Arc<StudyPlanService>;

    /// Plan to show on first launch, when one was requested.
    fn initial_plan_id(&self) -> Option<PlanId>;

    fn generation_enabled(&self) -> bool;

    fn link_opener(&self) -> LinkOpenerRef;
}

#[derive(Clone)]
pub struct AppContext {
    study_plans: Arc<StudyPlanService>,
    generation_enabled: bool,
    link_opener: LinkOpenerRef,
    // 0 means "no pending request"; ids start at 1.
    initial_plan_once: Arc<AtomicU64>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let initial = app.initial_plan_id().map_or(0, |id| id.value());
        Self {
            study_plans: app.study_plans(),
            generation_enabled: app.generation_enabled(),
            link_opener: app.link_opener(),
            initial_plan_once: Arc::new(AtomicU64::new(initial)),
        }
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
    pub fn link_opener(&self) -> LinkOpenerRef {
        Arc::clone(&self.link_opener)
    }

    /// The launch-time plan id, returned at most once.
    #[must_use]
    pub fn take_initial_plan_id(&self) -> Option<PlanId> {
        match self.initial_plan_once.swap(0, Ordering::AcqRel) {
            0 => None,
            id => Some(PlanId::new(id)),
        }
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
