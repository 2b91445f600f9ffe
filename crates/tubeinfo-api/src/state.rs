//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tubeinfo_core::{AppConfig, LlmClient, MetadataLookup, Result};
use tubeinfo_extractor::create_llm_client;
use tubeinfo_pipeline::ClassificationPipeline;
use tubeinfo_youtube::YouTubeDataClient;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// The classification pipeline, built once at startup
    pub pipeline: ClassificationPipeline,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
}

impl AppState {
    /// Build the state with real collaborators from config.
    ///
    /// Fails when credentials for the LLM provider or the Data API are
    /// missing; there is no degraded mode.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let llm = create_llm_client(&config.llm)?;
        let metadata = Arc::new(YouTubeDataClient::from_config(&config.youtube)?);
        Ok(Self::with_collaborators(config, llm, metadata))
    }

    /// Build the state over injected collaborators
    pub fn with_collaborators(
        config: AppConfig,
        llm: Arc<dyn LlmClient>,
        metadata: Arc<dyn MetadataLookup>,
    ) -> Self {
        let pipeline = ClassificationPipeline::new(llm, metadata, &config.extraction);
        Self {
            config,
            pipeline,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
