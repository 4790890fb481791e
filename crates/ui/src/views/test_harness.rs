use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    Clock, GenerationError, PlanGenerator, PlanSession, StudyPlanService, TextModel,
    VideoLookupError, VideoSearch,
};
use storage::repository::{PlanRepository, PlanSummary, Storage, StorageError};
use studypath_core::model::{
    PlanId, PlanRequest, ProficiencyLevel, StudyPlan, Topic, VideoRef, WeekPlan,
};
use studypath_core::time::fixed_now;
use tokio::sync::Notify;

use crate::context::{AppContext, UiApp, build_app_context};
use crate::platform::{DesktopLinkOpener, LinkOpenerRef};
use crate::views::home::{GenerationBanner, use_plan_generation};
use crate::views::roadmap::{RoadmapPanel, use_progress_toggle};
use crate::views::{HomeView, PlanView, PlansView};

/// Model fake that always answers with the same text, or fails.
pub struct ScriptedModel {
    reply: Option<String>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedModel {
    pub fn failing() -> Self {
        Self {
            reply: None,
            gate: None,
        }
    }

    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            gate: None,
        }
    }

    /// Hold every answer until `gate` is notified.
    pub fn held_by(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn complete(&self, _prompt: &str) -> Result<String, GenerationError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.reply.clone().ok_or(GenerationError::EmptyResponse)
    }
}

/// Repository whose progress writes wait for `gate`, then succeed or fail.
pub struct GatedWrites {
    inner: Arc<dyn PlanRepository>,
    gate: Option<Arc<Notify>>,
    fail: bool,
}

impl GatedWrites {
    pub fn failing(inner: Arc<dyn PlanRepository>) -> Self {
        Self {
            inner,
            gate: None,
            fail: true,
        }
    }

    pub fn held_by(inner: Arc<dyn PlanRepository>, gate: Arc<Notify>) -> Self {
        Self {
            inner,
            gate: Some(gate),
            fail: false,
        }
    }
}

#[async_trait]
impl PlanRepository for GatedWrites {
    async fn insert_plan(&self, plan: &StudyPlan) -> Result<PlanId, StorageError> {
        self.inner.insert_plan(plan).await
    }

    async fn set_topic_progress(
        &self,
        plan_id: PlanId,
        topic: &str,
        completed: bool,
    ) -> Result<(), StorageError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail {
            return Err(StorageError::Connection("disk full".into()));
        }
        self.inner.set_topic_progress(plan_id, topic, completed).await
    }

    async fn get_plan(&self, plan_id: PlanId) -> Result<Option<StudyPlan>, StorageError> {
        self.inner.get_plan(plan_id).await
    }

    async fn list_plans(&self, limit: u32) -> Result<Vec<PlanSummary>, StorageError> {
        self.inner.list_plans(limit).await
    }
}

pub struct NoVideos;

#[async_trait]
impl VideoSearch for NoVideos {
    async fn find(&self, _query: &str) -> Result<Option<VideoRef>, VideoLookupError> {
        Ok(None)
    }
}

struct TestApp {
    study_plans: Arc<StudyPlanService>,
    initial_plan_id: Option<PlanId>,
}

impl UiApp for TestApp {
    fn study_plans(&self) -> Arc<StudyPlanService> {
        Arc::clone(&self.study_plans)
    }

    fn initial_plan_id(&self) -> Option<PlanId> {
        self.initial_plan_id
    }

    fn generation_enabled(&self) -> bool {
        true
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(DesktopLinkOpener)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Plans,
    Plan(u64),
    /// Submit a request for `subject` through the generate flow on mount.
    Generate(&'static str),
    /// Open the plan, then toggle `topic` to `completed` on mount.
    Toggle {
        plan_id: u64,
        topic: &'static str,
        completed: bool,
    },
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Plans => rsx! { PlansView {} },
        ViewKind::Plan(plan_id) => rsx! { PlanView { plan_id } },
        ViewKind::Generate(subject) => rsx! {
            GenerateOnMount { subject: subject.to_string() }
        },
        ViewKind::Toggle {
            plan_id,
            topic,
            completed,
        } => rsx! {
            ToggleOnMount { plan_id, topic: topic.to_string(), completed }
        },
    }
}

#[component]
fn GenerateOnMount(subject: String) -> Element {
    let session = use_signal(|| None::<PlanSession>);
    let generation = use_plan_generation(session);
    let toggle = use_progress_toggle(session);
    use_hook(move || {
        let request = PlanRequest::new(
            subject.as_str(),
            ProficiencyLevel::Beginner,
            ProficiencyLevel::Advanced,
            8,
        )
        .expect("request");
        spawn(async move { generation.on_generate.call(request) });
    });

    let phase = generation.phase.read().clone();
    rsx! {
        GenerationBanner { phase }
        if session.read().is_some() {
            RoadmapPanel { session, toggle }
        }
    }
}

#[component]
fn ToggleOnMount(plan_id: u64, topic: String, completed: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let mut session = use_signal(|| None::<PlanSession>);
    let toggle = use_progress_toggle(session);
    use_hook(move || {
        let service = ctx.study_plans();
        spawn(async move {
            let opened = service
                .open_plan(PlanId::new(plan_id))
                .await
                .expect("open plan")
                .expect("plan exists");
            session.set(Some(opened));
            toggle.on_toggle.call((topic, completed));
        });
    });

    let saving = (toggle.saving)();
    let revision = (toggle.revision)();
    rsx! {
        span { class: "toggle-state", "saving={saving} revision={revision}" }
        RoadmapPanel { session, toggle }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub plans: Arc<dyn PlanRepository>,
}

impl ViewHarness {
    /// First render, then let pending resources settle.
    pub async fn render_settled(&mut self) -> String {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
        self.settle().await
    }

    /// Let spawned work finish and render the result.
    pub async fn settle(&mut self) -> String {
        for _ in 0..4 {
            self.drive_async().await;
        }
        self.render()
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_repo(view, Storage::in_memory().plans, None)
}

pub fn setup_view_harness_with_repo(
    view: ViewKind,
    plans: Arc<dyn PlanRepository>,
    initial_plan_id: Option<PlanId>,
) -> ViewHarness {
    setup_view_harness_with_model(view, plans, initial_plan_id, ScriptedModel::failing())
}

pub fn setup_view_harness_with_model(
    view: ViewKind,
    plans: Arc<dyn PlanRepository>,
    initial_plan_id: Option<PlanId>,
    model: ScriptedModel,
) -> ViewHarness {
    let study_plans = Arc::new(StudyPlanService::new(
        Clock::fixed(fixed_now()),
        PlanGenerator::new(Arc::new(model)),
        Arc::new(NoVideos),
        Arc::clone(&plans),
    ));
    let app = Arc::new(TestApp {
        study_plans,
        initial_plan_id,
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, plans }
}

/// Store a one-week plan about `subject` and mark `done` topics completed.
pub async fn seed_plan(plans: &dyn PlanRepository, subject: &str, done: &[&str]) -> PlanId {
    let request = PlanRequest::new(
        subject,
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        6,
    )
    .expect("request");
    let video = VideoRef::from_search_hit(
        "abc123",
        format!("{subject} crash course"),
        "https://i.ytimg.com/vi/abc123/default.jpg",
    )
    .expect("video");
    let week = WeekPlan::new(
        1,
        "Getting started",
        vec!["Learn the basics".into()],
        vec![
            Topic::new("Basics", 2.0, "The **core** ideas")
                .expect("topic")
                .with_video(Some(video)),
            Topic::new("Practice", 4.0, "Hands-on drills").expect("topic"),
        ],
        6.0,
    )
    .expect("week");
    let plan = StudyPlan::new(&request, vec![week], fixed_now()).expect("plan");
    let id = plans.insert_plan(&plan).await.expect("insert plan");
    for topic in done {
        plans
            .set_topic_progress(id, topic, true)
            .await
            .expect("mark progress");
    }
    id
}
