use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::model::ids::PlanId;
use crate::model::progress::{Completion, ProgressMap};
use crate::model::request::{PlanRequest, ProficiencyLevel};
use crate::model::video::VideoRef;

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// Smallest unit of study within a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    name: String,
    hours: f64,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video: Option<VideoRef>,
}

impl Topic {
    /// # Errors
    ///
    /// Returns `PlanError::EmptyTopicName` for a blank name and
    /// `PlanError::InvalidTopicHours` for negative or non-finite hours.
    pub fn new(
        name: impl Into<String>,
        hours: f64,
        description: impl Into<String>,
    ) -> Result<Self, PlanError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(PlanError::EmptyTopicName);
        }
        if !hours.is_finite() || hours < 0.0 {
            return Err(PlanError::InvalidTopicHours { topic: name });
        }
        Ok(Self {
            name,
            hours,
            description: description.into().trim().to_string(),
            video: None,
        })
    }

    #[must_use]
    pub fn with_video(mut self, video: Option<VideoRef>) -> Self {
        self.video = video;
        self
    }

    pub fn set_video(&mut self, video: Option<VideoRef>) {
        self.video = video;
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn hours(&self) -> f64 {
        self.hours
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn video(&self) -> Option<&VideoRef> {
        self.video.as_ref()
    }
}

//
// ─── WEEK ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    week_number: u32,
    focus_area: String,
    objectives: Vec<String>,
    topics: Vec<Topic>,
    recommended_hours: f64,
}

impl WeekPlan {
    /// # Errors
    ///
    /// Returns `PlanError` if the focus area is blank, there are no topics,
    /// or the recommended hours are negative or non-finite.
    pub fn new(
        week_number: u32,
        focus_area: impl Into<String>,
        objectives: Vec<String>,
        topics: Vec<Topic>,
        recommended_hours: f64,
    ) -> Result<Self, PlanError> {
        let focus_area = focus_area.into().trim().to_string();
        if focus_area.is_empty() {
            return Err(PlanError::EmptyFocusArea { week: week_number });
        }
        if topics.is_empty() {
            return Err(PlanError::EmptyTopics { week: week_number });
        }
        if !recommended_hours.is_finite() || recommended_hours < 0.0 {
            return Err(PlanError::InvalidRecommendedHours { week: week_number });
        }
        let objectives = objectives
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Ok(Self {
            week_number,
            focus_area,
            objectives,
            topics,
            recommended_hours,
        })
    }

    #[must_use]
    pub fn week_number(&self) -> u32 {
        self.week_number
    }

    #[must_use]
    pub fn focus_area(&self) -> &str {
        &self.focus_area
    }

    #[must_use]
    pub fn objectives(&self) -> &[String] {
        &self.objectives
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topics_mut(&mut self) -> &mut [Topic] {
        &mut self.topics
    }

    #[must_use]
    pub fn recommended_hours(&self) -> f64 {
        self.recommended_hours
    }
}

/// Check every plan invariant: non-empty, numbered 1..=n in order, each week
/// with a focus area, topics and valid hours, unique well-formed topics.
///
/// Weeks read back from storage bypass the constructors, so this repeats
/// their checks.
///
/// # Errors
///
/// Returns the first violated invariant as a `PlanError`.
pub fn validate_weeks(weeks: &[WeekPlan]) -> Result<(), PlanError> {
    if weeks.is_empty() {
        return Err(PlanError::NoWeeks);
    }
    let mut seen = HashSet::new();
    for (expected, week) in (1u32..).zip(weeks) {
        if week.week_number != expected {
            return Err(PlanError::WeekOutOfSequence {
                expected,
                found: week.week_number,
            });
        }
        if week.focus_area.trim().is_empty() {
            return Err(PlanError::EmptyFocusArea { week: expected });
        }
        if week.topics.is_empty() {
            return Err(PlanError::EmptyTopics { week: expected });
        }
        if !week.recommended_hours.is_finite() || week.recommended_hours < 0.0 {
            return Err(PlanError::InvalidRecommendedHours { week: expected });
        }
        for topic in &week.topics {
            if topic.name.trim().is_empty() {
                return Err(PlanError::EmptyTopicName);
            }
            if !topic.hours.is_finite() || topic.hours < 0.0 {
                return Err(PlanError::InvalidTopicHours {
                    topic: topic.name.clone(),
                });
            }
            if !seen.insert(topic.name.as_str()) {
                return Err(PlanError::DuplicateTopic(topic.name.clone()));
            }
        }
    }
    Ok(())
}

//
// ─── PLAN ──────────────────────────────────────────────────────────────────────
//

/// Fields of a plan as read back from storage.
#[derive(Debug, Clone)]
pub struct StudyPlanDraft {
    pub id: Option<PlanId>,
    pub subject: String,
    pub current_level: ProficiencyLevel,
    pub target_level: ProficiencyLevel,
    pub hours_per_week: u8,
    pub weeks: Vec<WeekPlan>,
    pub created_at: DateTime<Utc>,
    pub progress: ProgressMap,
}

/// A generated multi-week curriculum with its completion state.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyPlan {
    id: Option<PlanId>,
    subject: String,
    current_level: ProficiencyLevel,
    target_level: ProficiencyLevel,
    hours_per_week: u8,
    weeks: Vec<WeekPlan>,
    created_at: DateTime<Utc>,
    progress: ProgressMap,
}

impl StudyPlan {
    /// Create an unsaved plan for `request` with empty progress.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` if the weeks violate plan invariants.
    pub fn new(
        request: &PlanRequest,
        weeks: Vec<WeekPlan>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, PlanError> {
        Self::from_persisted(StudyPlanDraft {
            id: None,
            subject: request.subject().to_string(),
            current_level: request.current_level(),
            target_level: request.target_level(),
            hours_per_week: request.hours_per_week(),
            weeks,
            created_at,
            progress: ProgressMap::new(),
        })
    }

    /// Rebuild a plan from stored fields.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` if the subject is blank or the weeks violate plan
    /// invariants.
    pub fn from_persisted(draft: StudyPlanDraft) -> Result<Self, PlanError> {
        let subject = draft.subject.trim().to_string();
        if subject.is_empty() {
            return Err(PlanError::EmptySubject);
        }
        validate_weeks(&draft.weeks)?;
        Ok(Self {
            id: draft.id,
            subject,
            current_level: draft.current_level,
            target_level: draft.target_level,
            hours_per_week: draft.hours_per_week,
            weeks: draft.weeks,
            created_at: draft.created_at,
            progress: draft.progress,
        })
    }

    #[must_use]
    pub fn with_id(mut self, id: PlanId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<PlanId> {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn current_level(&self) -> ProficiencyLevel {
        self.current_level
    }

    #[must_use]
    pub fn target_level(&self) -> ProficiencyLevel {
        self.target_level
    }

    #[must_use]
    pub fn hours_per_week(&self) -> u8 {
        self.hours_per_week
    }

    #[must_use]
    pub fn weeks(&self) -> &[WeekPlan] {
        &self.weeks
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.weeks.iter().flat_map(|w| w.topics.iter())
    }

    /// Topics in plan order, for enrichment. Names cannot be changed through
    /// this, so uniqueness holds.
    pub fn topics_mut(&mut self) -> impl Iterator<Item = &mut Topic> {
        self.weeks.iter_mut().flat_map(|w| w.topics.iter_mut())
    }

    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.weeks.iter().map(|w| w.topics.len()).sum()
    }

    #[must_use]
    pub fn has_topic(&self, name: &str) -> bool {
        self.topics().any(|t| t.name == name)
    }

    /// Record a completion flag, returning the previous explicit value.
    pub fn set_progress(&mut self, topic: impl Into<String>, completed: bool) -> Option<bool> {
        self.progress.set(topic, completed)
    }

    #[must_use]
    pub fn completion(&self) -> Completion {
        self.progress.completion(self.topics().map(Topic::name))
    }
}
