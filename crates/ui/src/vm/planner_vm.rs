use studypath_core::PlanRequestError;
use studypath_core::model::{
    DEFAULT_HOURS_PER_WEEK, MAX_HOURS_PER_WEEK, MIN_HOURS_PER_WEEK, PlanRequest, ProficiencyLevel,
};

/// Raw values of the planner form, exactly as the inputs report them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerForm {
    pub subject: String,
    pub current_level: String,
    pub target_level: String,
    pub hours_per_week: String,
}

impl Default for PlannerForm {
    fn default() -> Self {
        Self {
            subject: String::new(),
            current_level: ProficiencyLevel::CURRENT_CHOICES[0].label().to_string(),
            target_level: ProficiencyLevel::TARGET_CHOICES[0].label().to_string(),
            hours_per_week: DEFAULT_HOURS_PER_WEEK.to_string(),
        }
    }
}

impl PlannerForm {
    /// # Errors
    ///
    /// Returns `PlanRequestError` when a field does not parse or is out of
    /// range.
    pub fn to_request(&self) -> Result<PlanRequest, PlanRequestError> {
        let current = self.current_level.parse::<ProficiencyLevel>()?;
        let target = self.target_level.parse::<ProficiencyLevel>()?;
        let hours = self
            .hours_per_week
            .trim()
            .parse::<u32>()
            .map_err(|_| PlanRequestError::HoursOutOfRange {
                hours: 0,
                min: MIN_HOURS_PER_WEEK,
                max: MAX_HOURS_PER_WEEK,
            })?;
        PlanRequest::new(self.subject.as_str(), current, target, hours)
    }
}

#[must_use]
pub fn level_options(choices: &[ProficiencyLevel]) -> Vec<&'static str> {
    choices.iter().map(|level| level.label()).collect()
}

/// Banner text for the generate flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    Generating,
    Succeeded,
    Failed(String),
}

impl GenerationPhase {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Generating)
    }

    #[must_use]
    pub fn banner(&self) -> Option<(&'static str, String)> {
        match self {
            Self::Idle => None,
            Self::Generating => Some((
                "banner banner--info",
                "Creating your personalized study plan...".to_string(),
            )),
            Self::Succeeded => Some((
                "banner banner--success",
                "Plan generated successfully!".to_string(),
            )),
            Self::Failed(message) => Some((
                "banner banner--error",
                format!("Error generating plan: {message}"),
            )),
        }
    }
}
