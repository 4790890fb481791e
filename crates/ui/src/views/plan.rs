use dioxus::prelude::*;
use services::PlanSession;
use studypath_core::model::PlanId;

use crate::context::AppContext;
use crate::views::roadmap::{RoadmapPanel, use_progress_toggle};
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn PlanView(plan_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let study_plans = ctx.study_plans();
    let session = use_signal(|| None::<PlanSession>);
    let toggle = use_progress_toggle(session);

    let resource = use_resource(use_reactive!(|(plan_id,)| {
        let study_plans = study_plans.clone();
        let mut session = session;
        async move {
            let opened = study_plans
                .open_plan(PlanId::new(plan_id))
                .await
                .map_err(|_| ViewError::Unknown)?;
            let found = opened.ok_or(ViewError::NotFound)?;
            session.set(Some(found));
            Ok::<_, ViewError>(())
        }
    }));
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(()) => rsx! {
                    RoadmapPanel { session, toggle }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}
