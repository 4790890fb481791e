use std::sync::Arc;

use async_trait::async_trait;
use storage::repository::{PlanRepository, PlanSummary, Storage, StorageError};
use studypath_core::model::{PlanId, StudyPlan};
use tokio::sync::Notify;

use super::test_harness::{
    GatedWrites, ScriptedModel, ViewKind, seed_plan, setup_view_harness,
    setup_view_harness_with_model, setup_view_harness_with_repo,
};

const PIANO_REPLY: &str = r#"{"weeks": [{"week_number": 1, "focus_area": "Posture",
    "objectives": ["Sit well"],
    "topics": [{"name": "Scales", "hours": 3, "description": "C major"},
               {"name": "Chords", "hours": 2, "description": "Triads"}],
    "recommended_hours": 5}]}"#;

struct BrokenRepo;

#[async_trait]
impl PlanRepository for BrokenRepo {
    async fn insert_plan(&self, _plan: &StudyPlan) -> Result<PlanId, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn set_topic_progress(
        &self,
        _plan_id: PlanId,
        _topic: &str,
        _completed: bool,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn get_plan(&self, _plan_id: PlanId) -> Result<Option<StudyPlan>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn list_plans(&self, _limit: u32) -> Result<Vec<PlanSummary>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn home_without_plans_shows_the_form() {
    let mut harness = setup_view_harness(ViewKind::Home);
    let html = harness.render_settled().await;

    assert!(html.contains("e.g., Machine Learning"), "missing placeholder in {html}");
    assert!(html.contains("Generate"), "missing submit button in {html}");
    assert!(html.contains("No study plan yet"), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_restores_the_latest_plan_with_progress() {
    let mut harness = setup_view_harness(ViewKind::Home);
    seed_plan(harness.plans.as_ref(), "Chess", &[]).await;
    seed_plan(harness.plans.as_ref(), "Rust", &["Basics"]).await;

    let html = harness.render_settled().await;
    assert!(html.contains("Rust"), "missing latest subject in {html}");
    assert!(html.contains("Progress: 50%"), "missing progress in {html}");
    assert!(html.contains("Week 1: Getting started"), "missing week card in {html}");
    assert!(html.contains("<strong>core</strong>"), "missing description in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_prefers_the_requested_plan() {
    let storage = storage::repository::Storage::in_memory();
    let chess = seed_plan(storage.plans.as_ref(), "Chess", &[]).await;
    seed_plan(storage.plans.as_ref(), "Rust", &[]).await;

    let mut harness =
        setup_view_harness_with_repo(ViewKind::Home, Arc::clone(&storage.plans), Some(chess));
    let html = harness.render_settled().await;
    assert!(html.contains("<h2>Chess</h2>"), "missing requested plan in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn plans_view_lists_saved_plans() {
    let mut harness = setup_view_harness(ViewKind::Plans);
    seed_plan(harness.plans.as_ref(), "Chess", &[]).await;
    seed_plan(harness.plans.as_ref(), "Rust", &[]).await;

    let html = harness.render_settled().await;
    assert!(html.contains("Chess"), "missing first plan in {html}");
    assert!(html.contains("Rust"), "missing second plan in {html}");
    assert!(html.contains("Beginner → Intermediate"), "missing levels in {html}");
    assert!(html.contains("6 h/week"), "missing hours in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn plan_view_renders_checkboxes_and_video() {
    let storage = storage::repository::Storage::in_memory();
    let id = seed_plan(storage.plans.as_ref(), "Rust", &["Basics"]).await;

    let mut harness =
        setup_view_harness_with_repo(ViewKind::Plan(id.value()), Arc::clone(&storage.plans), None);
    let html = harness.render_settled().await;
    assert!(html.contains("Progress: 50%"), "missing progress in {html}");
    assert!(html.contains("Rust crash course"), "missing video title in {html}");
    assert!(html.contains("topic topic--done"), "missing completed topic in {html}");
    assert!(html.contains("type=\"checkbox\""), "missing checkbox in {html}");

    let topics = html.find("week-topics").expect("topics section");
    let tag_start = html[..topics].rfind('<').expect("tag start");
    let tag_end = topics + html[topics..].find('>').expect("tag end");
    assert!(html[tag_start..tag_end].contains("open"), "topics collapsed in {html}");
    assert!(html.contains("<summary>Topics</summary>"), "missing topics summary in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn plan_view_reports_missing_plan() {
    let mut harness = setup_view_harness(ViewKind::Plan(42));
    let html = harness.render_settled().await;
    assert!(
        html.contains("That study plan could not be found."),
        "missing not-found message in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn storage_failures_render_an_error() {
    let mut harness = setup_view_harness_with_repo(ViewKind::Plans, Arc::new(BrokenRepo), None);
    let html = harness.render_settled().await;
    assert!(
        html.contains("Something went wrong. Please try again."),
        "missing error in {html}"
    );

    let mut harness = setup_view_harness_with_repo(ViewKind::Home, Arc::new(BrokenRepo), None);
    let html = harness.render_settled().await;
    assert!(html.contains("Something went wrong."), "missing error in {html}");
    assert!(html.contains("Generate"), "form should still render in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn generate_shows_success_banner_and_new_roadmap() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness_with_model(
        ViewKind::Generate("Piano"),
        Arc::clone(&storage.plans),
        None,
        ScriptedModel::replying(PIANO_REPLY),
    );
    let html = harness.render_settled().await;

    assert!(html.contains("Plan generated successfully!"), "missing banner in {html}");
    assert!(html.contains("<h2>Piano</h2>"), "missing roadmap in {html}");
    assert!(html.contains("Progress: 0%"), "missing progress in {html}");
    assert_eq!(storage.plans.list_plans(10).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn generate_failure_shows_error_banner() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness_with_model(
        ViewKind::Generate("Piano"),
        Arc::clone(&storage.plans),
        None,
        ScriptedModel::failing(),
    );
    let html = harness.render_settled().await;

    assert!(
        html.contains("Error generating plan: model returned an empty response"),
        "missing error banner in {html}"
    );
    assert!(!html.contains("<h2>Piano</h2>"), "unexpected roadmap in {html}");
    assert!(storage.plans.list_plans(10).await.unwrap().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn generating_banner_stays_until_the_model_answers() {
    let gate = Arc::new(Notify::new());
    let mut harness = setup_view_harness_with_model(
        ViewKind::Generate("Piano"),
        Storage::in_memory().plans,
        None,
        ScriptedModel::replying(PIANO_REPLY).held_by(Arc::clone(&gate)),
    );
    let html = harness.render_settled().await;
    assert!(
        html.contains("Creating your personalized study plan..."),
        "missing progress banner in {html}"
    );

    gate.notify_one();
    let html = harness.settle().await;
    assert!(html.contains("Plan generated successfully!"), "missing banner in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn toggling_a_topic_saves_progress() {
    let storage = Storage::in_memory();
    let id = seed_plan(storage.plans.as_ref(), "Rust", &[]).await;
    let view = ViewKind::Toggle {
        plan_id: id.value(),
        topic: "Practice",
        completed: true,
    };
    let mut harness = setup_view_harness_with_repo(view, Arc::clone(&storage.plans), None);
    let html = harness.render_settled().await;

    assert!(html.contains("Progress: 50%"), "missing progress in {html}");
    assert!(html.contains("topic topic--done"), "missing completed topic in {html}");
    assert!(html.contains("saving=false revision=0"), "unexpected state in {html}");
    let stored = storage.plans.get_plan(id).await.unwrap().unwrap();
    assert!(stored.progress().is_completed("Practice"));
}

#[tokio::test(flavor = "current_thread")]
async fn checkboxes_wait_for_the_write_to_finish() {
    let storage = Storage::in_memory();
    let id = seed_plan(storage.plans.as_ref(), "Rust", &[]).await;
    let gate = Arc::new(Notify::new());
    let plans = Arc::new(GatedWrites::held_by(
        Arc::clone(&storage.plans),
        Arc::clone(&gate),
    ));
    let view = ViewKind::Toggle {
        plan_id: id.value(),
        topic: "Basics",
        completed: true,
    };
    let mut harness = setup_view_harness_with_repo(view, plans, None);
    let html = harness.render_settled().await;
    assert!(html.contains("saving=true"), "write should be pending in {html}");
    assert!(html.contains("Progress: 0%"), "progress moved early in {html}");

    gate.notify_one();
    let html = harness.settle().await;
    assert!(html.contains("saving=false"), "write should be done in {html}");
    assert!(html.contains("Progress: 50%"), "missing progress in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn failed_write_resets_the_checkbox_and_warns() {
    let storage = Storage::in_memory();
    let id = seed_plan(storage.plans.as_ref(), "Rust", &[]).await;
    let plans = Arc::new(GatedWrites::failing(Arc::clone(&storage.plans)));
    let view = ViewKind::Toggle {
        plan_id: id.value(),
        topic: "Basics",
        completed: true,
    };
    let mut harness = setup_view_harness_with_repo(view, plans, None);
    let html = harness.render_settled().await;

    assert!(html.contains("save progress. Please try again."), "missing notice in {html}");
    assert!(html.contains("saving=false revision=1"), "rows not reset in {html}");
    assert!(html.contains("Progress: 0%"), "progress should not move in {html}");
    assert!(!html.contains("topic topic--done"), "topic marked done in {html}");
    let stored = storage.plans.get_plan(id).await.unwrap().unwrap();
    assert!(!stored.progress().is_completed("Basics"));
}
