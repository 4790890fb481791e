use storage::repository::PlanSummary;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanSummaryVm {
    pub id: u64,
    pub subject: String,
    pub levels_label: String,
    pub hours_label: String,
    pub created_at_str: String,
}

#[must_use]
pub fn map_plan_summaries(summaries: &[PlanSummary]) -> Vec<PlanSummaryVm> {
    summaries
        .iter()
        .map(|summary| PlanSummaryVm {
            id: summary.id.value(),
            subject: summary.subject.clone(),
            levels_label: format!("{} → {}", summary.current_level, summary.target_level),
            hours_label: format!("{} h/week", summary.hours_per_week),
            created_at_str: format_datetime(summary.created_at),
        })
        .collect()
}
