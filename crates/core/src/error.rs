use thiserror::Error;

/// Validation failures for a plan and its weeks, topics and videos.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
    #[error("plan subject cannot be empty")]
    EmptySubject,

    #[error("plan must contain at least one week")]
    NoWeeks,

    #[error("expected week {expected}, found week {found}")]
    WeekOutOfSequence { expected: u32, found: u32 },

    #[error("week {week} has no focus area")]
    EmptyFocusArea { week: u32 },

    #[error("week {week} has no topics")]
    EmptyTopics { week: u32 },

    #[error("week {week} has invalid recommended hours")]
    InvalidRecommendedHours { week: u32 },

    #[error("topic name cannot be empty")]
    EmptyTopicName,

    #[error("topic `{topic}` has invalid hours")]
    InvalidTopicHours { topic: String },

    #[error("topic `{0}` appears more than once")]
    DuplicateTopic(String),

    #[error("video {0} cannot be empty")]
    EmptyVideoField(&'static str),

    #[error("invalid video url: {0}")]
    InvalidVideoUrl(String),
}

/// Validation failures for the inputs of a plan request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanRequestError {
    #[error("subject cannot be empty")]
    EmptySubject,

    #[error("weekly hours must be between {min} and {max}, got {hours}")]
    HoursOutOfRange { hours: u32, min: u8, max: u8 },

    #[error("unknown proficiency level: {0}")]
    UnknownLevel(String),
}
