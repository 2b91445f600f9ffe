//! YouTube Data API client
//!
//! One GET to the `videos` endpoint per lookup, returning the first item's
//! snippet. An empty item set is "not found", not an error; only failed or
//! unreachable calls raise, and those are transient.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use tubeinfo_core::{MetadataLookup, Result, Snippet, TubeInfoError, VideoId, YouTubeConfig};

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

/// YouTube Data API v3 client
pub struct YouTubeDataClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeDataClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| TubeInfoError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
        })
    }

    /// Create from config
    pub fn from_config(config: &YouTubeConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| TubeInfoError::Config("YouTube API key required".to_string()))?;

        let mut client = Self::new(api_key.clone(), config.timeout_secs)?;
        client.base_url = config.base_url.clone();
        Ok(client)
    }

    /// Set custom base URL (for tests or proxies)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait::async_trait]
impl MetadataLookup for YouTubeDataClient {
    async fn lookup(&self, id: &VideoId) -> Result<Option<Snippet>> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("id", id.as_str()),
                ("part", "snippet"),
            ])
            .send()
            .await
            .map_err(|e| TubeInfoError::Transport(format!("Data API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TubeInfoError::Transport(format!(
                "Data API returned {status}: {error_text}"
            )));
        }

        let result: VideoListResponse = response
            .json()
            .await
            .map_err(|e| TubeInfoError::Transport(format!("failed to parse response: {e}")))?;

        let snippet = result.items.into_iter().next().map(|item| item.snippet);
        if snippet.is_none() {
            tracing::debug!(video_id = %id, "no metadata for identifier");
        }
        Ok(snippet)
    }

    fn name(&self) -> &str {
        "youtube-data-api"
    }
}
