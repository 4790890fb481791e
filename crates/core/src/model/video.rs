use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::PlanError;

const WATCH_URL: &str = "https://youtube.com/watch";

/// A video attached to a topic during enrichment.
///
/// Derived data: the plan is complete without it. All four fields are
/// always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    id: String,
    title: String,
    url: String,
    thumbnail: String,
}

impl VideoRef {
    /// Build a reference from a search hit, deriving the watch URL from the id.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::EmptyVideoField` if any input is blank.
    pub fn from_search_hit(
        id: impl Into<String>,
        title: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Result<Self, PlanError> {
        let id = non_empty("id", id.into())?;
        let url = Url::parse_with_params(WATCH_URL, &[("v", id.as_str())])
            .map_err(|e| PlanError::InvalidVideoUrl(e.to_string()))?;
        Self::new(id, title, url.to_string(), thumbnail)
    }

    /// Build a reference from already known parts.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::EmptyVideoField` if any field is blank and
    /// `PlanError::InvalidVideoUrl` if `url` does not parse.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Result<Self, PlanError> {
        let url = non_empty("url", url.into())?;
        Url::parse(&url).map_err(|e| PlanError::InvalidVideoUrl(e.to_string()))?;
        Ok(Self {
            id: non_empty("id", id.into())?,
            title: non_empty("title", title.into())?,
            url,
            thumbnail: non_empty("thumbnail", thumbnail.into())?,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn thumbnail(&self) -> &str {
        &self.thumbnail
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, PlanError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlanError::EmptyVideoField(field));
    }
    Ok(trimmed.to_string())
}
