//! Tubeinfo Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout tubeinfo:
//! - Video domain models (descriptors, classifications, attribute sets)
//! - The merged result record returned to callers
//! - Common error types
//! - Shared traits for the LLM and video-metadata collaborators
//! - Configuration management

pub mod config;
pub mod models;

pub use config::{AppConfig, ConfigError, ExtractionConfig, LlmConfig, LlmProvider, YouTubeConfig};
pub use models::{
    Category, Classification, GameAttributes, OriginalSongAttributes, ResultRecord, Snippet,
    SongAttributes, VideoDescriptor, VideoId, VideoKind,
};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for tubeinfo operations
#[derive(Error, Debug)]
pub enum TubeInfoError {
    /// Network, timeout, or non-success HTTP status from an external service.
    /// Transient: a retry with backoff may succeed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The extraction service could not produce a value conforming to the
    /// requested schema. Permanent: aborts the whole request.
    #[error("extraction error: {0}")]
    Extraction(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TubeInfoError {
    /// Whether a retry with backoff may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, TubeInfoError>;

// ============================================================================
// Traits
// ============================================================================

/// Trait for LLM clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for the given prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Trait for video-metadata lookup backends
#[async_trait::async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Fetch the title/description snippet for a video identifier.
    ///
    /// `Ok(None)` means the identifier matched no video; only transport
    /// failures are errors.
    async fn lookup(&self, id: &VideoId) -> Result<Option<Snippet>>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_is_transient() {
        assert!(TubeInfoError::Transport("timed out".into()).is_transient());
        assert!(!TubeInfoError::Extraction("bad schema".into()).is_transient());
        assert!(!TubeInfoError::Validation("no title".into()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = TubeInfoError::Extraction("missing field `category`".into());
        assert_eq!(err.to_string(), "extraction error: missing field `category`");
    }
}
