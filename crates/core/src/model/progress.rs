use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Completion flags keyed by topic name.
///
/// Keys that no longer match a topic are kept but ignored when computing
/// completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<String, bool>);

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Completion flag for a topic; unknown topics are not completed.
    #[must_use]
    pub fn is_completed(&self, topic: &str) -> bool {
        self.0.get(topic).copied().unwrap_or(false)
    }

    /// Set a flag, returning the previous explicit value if any.
    pub fn set(&mut self, topic: impl Into<String>, completed: bool) -> Option<bool> {
        self.0.insert(topic.into(), completed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count completed topics among `topics`.
    pub fn completion<'a>(&self, topics: impl IntoIterator<Item = &'a str>) -> Completion {
        let mut total = 0;
        let mut completed = 0;
        for topic in topics {
            total += 1;
            if self.is_completed(topic) {
                completed += 1;
            }
        }
        Completion { completed, total }
    }
}

impl FromIterator<(String, bool)> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Checked topics out of all topics in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    pub completed: usize,
    pub total: usize,
}

impl Completion {
    /// Fraction in `[0, 1]`; zero when there are no topics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    /// Whole percentage, rounded to nearest.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u8 {
        (self.ratio() * 100.0).round().clamp(0.0, 100.0) as u8
    }
}
