use services::PlanSession;
use studypath_core::model::{Completion, Topic, VideoRef, WeekPlan};

use crate::vm::markdown_vm::markdown_to_html;
use crate::vm::time_fmt::{format_datetime, format_hours};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoVm {
    pub title: String,
    pub url: String,
    pub thumbnail: String,
}

impl From<&VideoRef> for VideoVm {
    fn from(video: &VideoRef) -> Self {
        Self {
            title: video.title().to_string(),
            url: video.url().to_string(),
            thumbnail: video.thumbnail().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicVm {
    pub name: String,
    pub hours_label: String,
    pub description_html: String,
    pub completed: bool,
    pub video: Option<VideoVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeekVm {
    pub number: u32,
    pub focus_area: String,
    pub hours_label: String,
    pub objectives_label: String,
    pub topics: Vec<TopicVm>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressVm {
    #[must_use]
    pub fn label(&self) -> String {
        format!("Progress: {}%", self.percent)
    }

    #[must_use]
    pub fn bar_style(&self) -> String {
        format!("width: {}%", self.percent)
    }
}

impl From<Completion> for ProgressVm {
    fn from(completion: Completion) -> Self {
        Self {
            completed: completion.completed,
            total: completion.total,
            percent: completion.percent(),
        }
    }
}

/// Everything the roadmap needs to render one plan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapVm {
    pub plan_id: u64,
    pub subject: String,
    pub levels_label: String,
    pub created_at_str: String,
    pub progress: ProgressVm,
    pub weeks: Vec<WeekVm>,
}

#[must_use]
pub fn map_roadmap(session: &PlanSession) -> RoadmapVm {
    let plan = session.plan();
    RoadmapVm {
        plan_id: session.plan_id().value(),
        subject: plan.subject().to_string(),
        levels_label: format!(
            "{} → {} · {} h/week",
            plan.current_level(),
            plan.target_level(),
            plan.hours_per_week()
        ),
        created_at_str: format_datetime(plan.created_at()),
        progress: ProgressVm::from(session.completion()),
        weeks: plan
            .weeks()
            .iter()
            .map(|week| map_week(week, session))
            .collect(),
    }
}

fn map_week(week: &WeekPlan, session: &PlanSession) -> WeekVm {
    WeekVm {
        number: week.week_number(),
        focus_area: week.focus_area().to_string(),
        hours_label: format!("{} hours", format_hours(week.recommended_hours())),
        objectives_label: week.objectives().join(", "),
        topics: week
            .topics()
            .iter()
            .map(|topic| map_topic(topic, session.is_completed(topic.name())))
            .collect(),
    }
}

fn map_topic(topic: &Topic, completed: bool) -> TopicVm {
    TopicVm {
        name: topic.name().to_string(),
        hours_label: format!("{} hours", format_hours(topic.hours())),
        description_html: markdown_to_html(topic.description()),
        completed,
        video: topic.video().map(VideoVm::from),
    }
}
