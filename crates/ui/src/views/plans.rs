use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{PlanSummaryVm, map_plan_summaries};

const LIST_LIMIT: u32 = 50;

#[component]
pub fn PlansView() -> Element {
    let ctx = use_context::<AppContext>();
    let study_plans = ctx.study_plans();

    let resource = use_resource(move || {
        let study_plans = study_plans.clone();
        async move {
            let summaries = study_plans
                .list_plans(LIST_LIMIT)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok::<_, ViewError>(map_plan_summaries(&summaries))
        }
    });
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Saved plans" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(plans) => rsx! {
                    if plans.is_empty() {
                        p { "No saved plans yet." }
                    } else {
                        ul { class: "plan-list",
                            for plan in plans {
                                PlanRow { key: "{plan.id}", plan }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn PlanRow(plan: PlanSummaryVm) -> Element {
    rsx! {
        li {
            Link { class: "plan-link", to: Route::Plan { plan_id: plan.id },
                span { class: "plan-subject", "{plan.subject}" }
                span { class: "plan-cta", "Open" }
            }
            p { class: "plan-meta",
                "{plan.levels_label} · {plan.hours_label} · {plan.created_at_str}"
            }
        }
    }
}
