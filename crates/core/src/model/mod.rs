mod ids;
mod plan;
mod progress;
mod request;
mod video;

pub use ids::PlanId;
pub use plan::{StudyPlan, StudyPlanDraft, Topic, WeekPlan, validate_weeks};
pub use progress::{Completion, ProgressMap};
pub use request::{
    DEFAULT_HOURS_PER_WEEK, MAX_HOURS_PER_WEEK, MIN_HOURS_PER_WEEK, PLAN_WEEKS, PlanRequest,
    ProficiencyLevel,
};
pub use video::VideoRef;
