mod markdown_vm;
mod plan_list_vm;
mod planner_vm;
mod roadmap_vm;
mod time_fmt;

pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use plan_list_vm::{PlanSummaryVm, map_plan_summaries};
pub use planner_vm::{GenerationPhase, PlannerForm, level_options};
pub use roadmap_vm::{ProgressVm, RoadmapVm, TopicVm, VideoVm, WeekVm, map_roadmap};
pub use time_fmt::{format_datetime, format_hours};
