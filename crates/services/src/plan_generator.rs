//! Curriculum generation through a hosted text model.
//!
//! The model is asked for a JSON document and its reply is checked against a
//! strict schema before anything downstream sees it. Replies that cannot be
//! turned into a complete set of weeks are rejected as a whole.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use studypath_core::model::{PlanRequest, Topic, WeekPlan, validate_weeks};

use crate::error::GenerationError;
use crate::llm_client::TextModel;

const PROMPT_TEMPLATE: &str = r#"Create a detailed {weeks}-week study plan for {subject} from {current_level} to {target_level} level.
Weekly study hours: {hours_per_week}h.
Respond with JSON only, using exactly this format:
{
    "weeks": [
        {
            "week_number": 1,
            "focus_area": "Introduction to X",
            "objectives": ["Objective 1", "Objective 2"],
            "topics": [
                {
                    "name": "Topic 1",
                    "hours": 2,
                    "description": "Learning fundamentals..."
                }
            ],
            "recommended_hours": 10
        }
    ]
}
Number the weeks from 1 to {weeks} and give every topic a distinct name."#;

/// Validated weeks produced by the model for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub weeks: Vec<WeekPlan>,
}

impl GeneratedPlan {
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.weeks.iter().map(|w| w.topics().len()).sum()
    }
}

/// Turns a `PlanRequest` into validated weeks.
#[derive(Clone)]
pub struct PlanGenerator {
    model: Arc<dyn TextModel>,
}

impl PlanGenerator {
    #[must_use]
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Ask the model for a curriculum and validate the reply.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the model call fails or the reply is not
    /// a valid plan document. No partial plan is ever returned.
    pub async fn generate(&self, request: &PlanRequest) -> Result<GeneratedPlan, GenerationError> {
        let prompt = build_prompt(request);
        let raw = self.model.complete(&prompt).await?;
        let plan = parse_plan(&raw).inspect_err(|err| {
            warn!(subject = request.subject(), error = %err, "model reply rejected");
        })?;
        info!(
            subject = request.subject(),
            weeks = plan.weeks.len(),
            topics = plan.topic_count(),
            "plan generated"
        );
        Ok(plan)
    }
}

/// Fill the prompt template with the request values.
///
/// The subject is user text, so it is substituted last and never rescanned
/// for placeholders.
#[must_use]
pub fn build_prompt(request: &PlanRequest) -> String {
    PROMPT_TEMPLATE
        .replace("{weeks}", &request.weeks().to_string())
        .replace("{current_level}", request.current_level().label())
        .replace("{target_level}", request.target_level().label())
        .replace("{hours_per_week}", &request.hours_per_week().to_string())
        .replace("{subject}", request.subject())
}

/// Remove markdown code-fence markers around a model reply.
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[derive(Debug, Deserialize)]
struct RawPlan {
    weeks: Vec<RawWeek>,
}

#[derive(Debug, Deserialize)]
struct RawWeek {
    week_number: u32,
    focus_area: String,
    objectives: Vec<String>,
    topics: Vec<RawTopic>,
    recommended_hours: f64,
}

#[derive(Debug, Deserialize)]
struct RawTopic {
    name: String,
    hours: f64,
    description: String,
}

/// Parse and validate a raw model reply.
///
/// Duplicate topic names are made unique with ` (2)`, ` (3)`, ... suffixes;
/// blank objectives are dropped. Everything else that breaks the schema is
/// rejected.
///
/// # Errors
///
/// Returns `GenerationError::Malformed` when the reply is not a JSON plan
/// document and `GenerationError::Invalid` when the document breaks plan
/// rules (no weeks, empty topics, bad hours, weeks out of order).
pub fn parse_plan(raw: &str) -> Result<GeneratedPlan, GenerationError> {
    let body = strip_code_fences(raw);
    let parsed: RawPlan =
        serde_json::from_str(&body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut weeks = Vec::with_capacity(parsed.weeks.len());
    for raw_week in parsed.weeks {
        let mut topics = Vec::with_capacity(raw_week.topics.len());
        for raw_topic in raw_week.topics {
            let name = unique_name(raw_topic.name.trim(), &mut seen);
            topics.push(Topic::new(name, raw_topic.hours, raw_topic.description)?);
        }
        weeks.push(WeekPlan::new(
            raw_week.week_number,
            raw_week.focus_area,
            raw_week.objectives,
            topics,
            raw_week.recommended_hours,
        )?);
    }
    validate_weeks(&weeks)?;

    Ok(GeneratedPlan { weeks })
}

fn unique_name(name: &str, seen: &mut HashSet<String>) -> String {
    // Blank names are left for `Topic::new` to reject.
    if name.is_empty() || seen.insert(name.to_string()) {
        return name.to_string();
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{name} ({n})");
        if seen.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
