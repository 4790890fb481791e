use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlanRequestError;

/// Number of weeks every generated plan covers.
pub const PLAN_WEEKS: u32 = 4;

pub const MIN_HOURS_PER_WEEK: u8 = 1;
pub const MAX_HOURS_PER_WEEK: u8 = 40;
pub const DEFAULT_HOURS_PER_WEEK: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    /// Levels offered for "where am I now".
    pub const CURRENT_CHOICES: [Self; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    /// Levels offered for "where do I want to get".
    pub const TARGET_CHOICES: [Self; 3] = [Self::Intermediate, Self::Advanced, Self::Expert];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = PlanRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            "expert" => Ok(Self::Expert),
            _ => Err(PlanRequestError::UnknownLevel(s.to_string())),
        }
    }
}

/// Validated inputs for generating a study plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    subject: String,
    current_level: ProficiencyLevel,
    target_level: ProficiencyLevel,
    hours_per_week: u8,
}

impl PlanRequest {
    /// Build a request from raw form inputs.
    ///
    /// # Errors
    ///
    /// Returns `PlanRequestError::EmptySubject` for a blank subject and
    /// `PlanRequestError::HoursOutOfRange` when hours fall outside 1..=40.
    pub fn new(
        subject: impl Into<String>,
        current_level: ProficiencyLevel,
        target_level: ProficiencyLevel,
        hours_per_week: u32,
    ) -> Result<Self, PlanRequestError> {
        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(PlanRequestError::EmptySubject);
        }
        let hours = u8::try_from(hours_per_week)
            .ok()
            .filter(|h| (MIN_HOURS_PER_WEEK..=MAX_HOURS_PER_WEEK).contains(h))
            .ok_or(PlanRequestError::HoursOutOfRange {
                hours: hours_per_week,
                min: MIN_HOURS_PER_WEEK,
                max: MAX_HOURS_PER_WEEK,
            })?;

        Ok(Self {
            subject,
            current_level,
            target_level,
            hours_per_week: hours,
        })
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
    pub fn weeks(&self) -> u32 {
        PLAN_WEEKS
    }
}
