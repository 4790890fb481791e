use dioxus::prelude::*;
use services::PlanSession;
use studypath_core::model::PlanRequest;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::views::roadmap::{RoadmapPanel, use_progress_toggle};
use crate::views::planner::PlannerPanel;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::GenerationPhase;

/// Planner form plus the roadmap of the plan being worked on.
///
/// On first render the view restores the requested plan, or the most
/// recent one, so progress survives restarts.
#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_signal(|| None::<PlanSession>);
    let generation = use_plan_generation(session);
    let toggle = use_progress_toggle(session);

    let restore_ctx = ctx.clone();
    let restore = use_resource(move || {
        let ctx = restore_ctx.clone();
        let mut session = session;
        async move {
            if session.peek().is_some() {
                return Ok(());
            }
            let service = ctx.study_plans();
            let requested = match ctx.take_initial_plan_id() {
                Some(id) => {
                    let opened = service.open_plan(id).await.map_err(|_| ViewError::Unknown)?;
                    if opened.is_none() {
                        warn!(plan_id = %id, "requested plan not found, resuming latest");
                    }
                    opened
                }
                None => None,
            };
            let restored = match requested {
                Some(found) => Some(found),
                None => service.resume_latest().await.map_err(|_| ViewError::Unknown)?,
            };
            if let Some(found) = restored {
                info!(plan_id = %found.plan_id(), "restored study plan");
                if session.peek().is_none() {
                    session.set(Some(found));
                }
            }
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(restore);

    let phase = generation.phase.read().clone();
    let busy = phase.is_busy();

    rsx! {
        div { class: "page page--home",
            PlannerPanel {
                busy,
                generation_enabled: ctx.generation_enabled(),
                on_submit: generation.on_generate,
            }
            GenerationBanner { phase }
            match state {
                ViewState::Idle | ViewState::Ready(()) => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
            if session.read().is_some() {
                RoadmapPanel { session, toggle }
            } else if !busy {
                p { class: "empty-state", "No study plan yet. Fill in the form to create one." }
            }
        }
    }
}

/// Generate state behind the planner form.
#[derive(Clone, Copy)]
pub(crate) struct PlanGeneration {
    pub phase: Signal<GenerationPhase>,
    pub on_generate: Callback<PlanRequest>,
}

/// Creates a plan for each submitted request and opens it in `session`.
///
/// Requests arriving while one is running are dropped.
pub(crate) fn use_plan_generation(session: Signal<Option<PlanSession>>) -> PlanGeneration {
    let ctx = use_context::<AppContext>();
    let mut phase = use_signal(|| GenerationPhase::Idle);

    let on_generate = use_callback(move |request: PlanRequest| {
        if phase.peek().is_busy() {
            return;
        }
        phase.set(GenerationPhase::Generating);
        let service = ctx.study_plans();
        let mut session = session;
        spawn(async move {
            match service.create_plan(&request).await {
                Ok(created) => {
                    session.set(Some(created));
                    phase.set(GenerationPhase::Succeeded);
                }
                Err(err) => {
                    warn!(subject = request.subject(), error = %err, "plan generation failed");
                    phase.set(GenerationPhase::Failed(err.to_string()));
                }
            }
        });
    });

    PlanGeneration { phase, on_generate }
}

#[component]
pub(crate) fn GenerationBanner(phase: GenerationPhase) -> Element {
    let Some((class, text)) = phase.banner() else {
        return rsx! {};
    };
    rsx! {
        p { class: "{class}", "{text}" }
    }
}
