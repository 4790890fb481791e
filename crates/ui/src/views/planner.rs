use dioxus::prelude::*;
use studypath_core::model::{MAX_HOURS_PER_WEEK, MIN_HOURS_PER_WEEK, PlanRequest, ProficiencyLevel};

use crate::vm::{PlannerForm, level_options};

#[component]
pub fn PlannerPanel(
    busy: bool,
    generation_enabled: bool,
    on_submit: EventHandler<PlanRequest>,
) -> Element {
    let mut form = use_signal(PlannerForm::default);
    let mut invalid = use_signal(|| None::<String>);

    let current_options = level_options(&ProficiencyLevel::CURRENT_CHOICES);
    let target_options = level_options(&ProficiencyLevel::TARGET_CHOICES);
    let values = form.read().clone();

    rsx! {
        section { class: "planner",
            h2 { "Create a study plan" }
            if !generation_enabled {
                p { class: "banner banner--warning",
                    "Plan generation is not configured. Set STUDYPATH_AI_API_KEY to enable it."
                }
            }
            label { class: "planner-field",
                span { "What do you want to learn?" }
                input {
                    r#type: "text",
                    placeholder: "e.g., Machine Learning",
                    value: "{values.subject}",
                    oninput: move |evt| form.write().subject = evt.value(),
                }
            }
            label { class: "planner-field",
                span { "Current level" }
                select {
                    value: "{values.current_level}",
                    onchange: move |evt| form.write().current_level = evt.value(),
                    for level in current_options {
                        option { value: "{level}", "{level}" }
                    }
                }
            }
            label { class: "planner-field",
                span { "Target level" }
                select {
                    value: "{values.target_level}",
                    onchange: move |evt| form.write().target_level = evt.value(),
                    for level in target_options {
                        option { value: "{level}", "{level}" }
                    }
                }
            }
            label { class: "planner-field",
                span { "Hours per week: {values.hours_per_week}" }
                input {
                    r#type: "range",
                    min: "{MIN_HOURS_PER_WEEK}",
                    max: "{MAX_HOURS_PER_WEEK}",
                    value: "{values.hours_per_week}",
                    oninput: move |evt| form.write().hours_per_week = evt.value(),
                }
            }
            if let Some(message) = invalid() {
                p { class: "planner-invalid", "{message}" }
            }
            button {
                class: "planner-submit",
                disabled: busy || !generation_enabled,
                onclick: move |_| {
                    let request = form.read().to_request();
                    match request {
                        Ok(request) => {
                            invalid.set(None);
                            on_submit.call(request);
                        }
                        Err(err) => invalid.set(Some(err.to_string())),
                    }
                },
                "Generate"
            }
        }
    }
}
