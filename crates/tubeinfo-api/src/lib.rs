//! Tubeinfo API - REST server
//!
//! Provides the HTTP endpoint for the classification pipeline plus
//! liveness and OpenAPI documentation routes.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::classify::classify_handler, handlers::health::health_check),
    components(schemas(
        handlers::classify::ClassifyRequest,
        handlers::classify::ClassifyResponse,
        handlers::health::HealthResponse,
        error::ApiError,
    )),
    tags(
        (name = "classify", description = "Video classification"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", routes::api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Test Support
// ============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    //! Canned collaborators for router-level tests

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tubeinfo_core::{
        AppConfig, LlmClient, MetadataLookup, Result, Snippet, TubeInfoError, VideoId,
    };

    /// LLM stub answering every prompt with the same text
    pub struct StaticLlm(pub &'static str);

    #[async_trait::async_trait]
    impl LlmClient for StaticLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    /// LLM stub answering prompts from a script, in order
    pub struct ScriptedLlm(Mutex<VecDeque<&'static str>>);

    impl ScriptedLlm {
        pub fn new(answers: &[&'static str]) -> Self {
            Self(Mutex::new(answers.iter().copied().collect()))
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for ScriptedLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| TubeInfoError::Extraction("script exhausted".to_string()))
        }
    }

    /// Metadata stub returning a fixed snippet
    pub struct StaticLookup(pub Option<Snippet>);

    #[async_trait::async_trait]
    impl MetadataLookup for StaticLookup {
        async fn lookup(&self, _id: &VideoId) -> Result<Option<Snippet>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "static-lookup"
        }
    }

    /// Router over a single-answer LLM and an empty metadata backend
    pub fn create_router_for_testing() -> Router {
        router_with_collaborators(
            Arc::new(StaticLlm(r#"{"category": "UNKNOWN", "type": "VIDEO"}"#)),
            Arc::new(StaticLookup(None)),
        )
    }

    /// Router over arbitrary collaborators
    pub fn router_with_collaborators(
        llm: Arc<dyn LlmClient>,
        metadata: Arc<dyn MetadataLookup>,
    ) -> Router {
        let state = AppState::with_collaborators(AppConfig::default(), llm, metadata);
        create_router(Arc::new(state))
    }
}
