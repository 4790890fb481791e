use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use studypath_core::model::VideoRef;

use crate::config::YouTubeConfig;
use crate::error::VideoLookupError;

/// Finds one instructional video for a free-text query.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Return the top hit for `query`, or `None` when nothing usable matched.
    ///
    /// # Errors
    ///
    /// Returns `VideoLookupError` when the search service is unavailable or
    /// rejects the request.
    async fn find(&self, query: &str) -> Result<Option<VideoRef>, VideoLookupError>;
}

/// `VideoSearch` backed by the YouTube Data API v3 `search` endpoint.
#[derive(Clone)]
pub struct YouTubeVideoFinder {
    client: Client,
    config: Option<YouTubeConfig>,
}

impl YouTubeVideoFinder {
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: Option<YouTubeConfig>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl VideoSearch for YouTubeVideoFinder {
    async fn find(&self, query: &str) -> Result<Option<VideoRef>, VideoLookupError> {
        let config = self
            .config
            .as_ref()
            .ok_or(VideoLookupError::NotConfigured)?;

        let url = format!("{}/search", config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(url)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query),
                ("key", config.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VideoLookupError::HttpStatus(response.status()));
        }

        let body: SearchResponse = response.json().await?;
        let video = body.items.into_iter().next().and_then(SearchItem::into_video);
        debug!(query, found = video.is_some(), "video search finished");
        Ok(video)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl SearchItem {
    /// Map a hit to a `VideoRef`; any missing part drops the whole hit.
    fn into_video(self) -> Option<VideoRef> {
        let id = self.id?.video_id?;
        let snippet = self.snippet?;
        let title = snippet.title?;
        let thumbs = snippet.thumbnails;
        let thumbnail = [thumbs.default, thumbs.medium, thumbs.high]
            .into_iter()
            .flatten()
            .find_map(|t| t.url.filter(|u| !u.trim().is_empty()))?;
        VideoRef::from_search_hit(id, title, thumbnail).ok()
    }
}
