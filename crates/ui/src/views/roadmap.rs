use dioxus::prelude::*;
use services::PlanSession;
use tracing::warn;

use crate::context::AppContext;
use crate::vm::{ProgressVm, TopicVm, VideoVm, WeekVm, map_roadmap};

const SAVE_FAILED: &str = "Couldn't save progress. Please try again.";

/// Checkbox write state for one roadmap.
#[derive(Clone, Copy, PartialEq)]
pub(crate) struct ProgressToggle {
    pub saving: Signal<bool>,
    pub notice: Signal<Option<&'static str>>,
    /// Bumped when a write fails so rows remount with the cached state.
    pub revision: Signal<u64>,
    pub on_toggle: Callback<(String, bool)>,
}

/// Writes checkbox changes for the plan held in `session`.
///
/// Toggles are ignored while a write is in flight so they are applied in
/// the order they were made.
pub(crate) fn use_progress_toggle(session: Signal<Option<PlanSession>>) -> ProgressToggle {
    let ctx = use_context::<AppContext>();
    let mut saving = use_signal(|| false);
    let mut notice = use_signal(|| None::<&'static str>);
    let mut revision = use_signal(|| 0u64);

    let on_toggle = use_callback(move |(topic, completed): (String, bool)| {
        if *saving.peek() {
            return;
        }
        let Some(mut working) = session.peek().clone() else {
            return;
        };
        saving.set(true);
        notice.set(None);
        let service = ctx.study_plans();
        let mut session = session;
        spawn(async move {
            match service.record_progress(&mut working, &topic, completed).await {
                Ok(_) => {
                    let still_open = session
                        .peek()
                        .as_ref()
                        .is_some_and(|current| current.plan_id() == working.plan_id());
                    if still_open {
                        session.set(Some(working));
                    }
                }
                Err(err) => {
                    warn!(topic = %topic, error = %err, "progress update failed");
                    notice.set(Some(SAVE_FAILED));
                    *revision.write() += 1;
                }
            }
            saving.set(false);
        });
    });

    ProgressToggle {
        saving,
        notice,
        revision,
        on_toggle,
    }
}

/// Roadmap for the plan held in `session`, with live progress tracking.
///
/// Checkboxes are disabled while a write is in flight.
#[component]
pub(crate) fn RoadmapPanel(
    session: Signal<Option<PlanSession>>,
    toggle: ProgressToggle,
) -> Element {
    let Some(vm) = session.read().as_ref().map(map_roadmap) else {
        return rsx! {};
    };

    rsx! {
        section { class: "roadmap",
            header { class: "roadmap-header",
                h2 { "{vm.subject}" }
                p { class: "roadmap-meta", "{vm.levels_label}" }
                p { class: "roadmap-meta", "Created {vm.created_at_str}" }
            }
            ProgressBar { progress: vm.progress }
            if let Some(message) = (toggle.notice)() {
                p { class: "banner banner--error", "{message}" }
            }
            div { class: "weeks",
                for week in vm.weeks {
                    WeekCard {
                        key: "{week.number}",
                        week,
                        saving: (toggle.saving)(),
                        revision: (toggle.revision)(),
                        on_toggle: toggle.on_toggle,
                    }
                }
            }
        }
    }
}

#[component]
fn ProgressBar(progress: ProgressVm) -> Element {
    rsx! {
        div { class: "progress",
            div { class: "progress-track",
                div { class: "progress-fill", style: "{progress.bar_style()}" }
            }
            p { class: "progress-label",
                "{progress.label()} ({progress.completed}/{progress.total} topics)"
            }
        }
    }
}

#[component]
fn WeekCard(
    week: WeekVm,
    saving: bool,
    revision: u64,
    on_toggle: EventHandler<(String, bool)>,
) -> Element {
    rsx! {
        article { class: "week-card",
            h3 { "Week {week.number}: {week.focus_area}" }
            p { class: "week-hours", "Recommended: {week.hours_label}" }
            details { class: "week-objectives",
                summary { "Objectives" }
                p { "{week.objectives_label}" }
            }
            details { class: "week-topics", open: true,
                summary { "Topics" }
                ul { class: "topics",
                    for topic in week.topics {
                        TopicRow {
                            key: "{topic.name}-{revision}",
                            topic,
                            saving,
                            on_toggle,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TopicRow(topic: TopicVm, saving: bool, on_toggle: EventHandler<(String, bool)>) -> Element {
    let name = topic.name.clone();
    let class = if topic.completed { "topic topic--done" } else { "topic" };
    rsx! {
        li { class: "{class}",
            label { class: "topic-check",
                input {
                    r#type: "checkbox",
                    checked: topic.completed,
                    disabled: saving,
                    onchange: move |evt| on_toggle.call((name.clone(), evt.checked())),
                }
                span { class: "topic-name", "{topic.name}" }
                span { class: "topic-hours", "({topic.hours_label})" }
            }
            div { class: "topic-description", dangerous_inner_html: "{topic.description_html}" }
            if let Some(video) = topic.video.clone() {
                VideoCard { video }
            }
        }
    }
}

#[component]
fn VideoCard(video: VideoVm) -> Element {
    let ctx = use_context::<AppContext>();
    let url = video.url.clone();
    rsx! {
        button {
            class: "video-card",
            title: "{video.url}",
            onclick: move |_| ctx.link_opener().open_url(&url),
            img { class: "video-thumb", src: "{video.thumbnail}", alt: "" }
            span { class: "video-title", "{video.title}" }
        }
    }
}
