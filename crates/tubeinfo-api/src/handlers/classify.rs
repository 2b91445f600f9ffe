//! Classification handler
//!
//! Accepts the logical request either directly or wrapped in an envelope
//! whose `body` field is a JSON-encoded string (the shape proxy callers
//! send). The response mirrors that convention: `{statusCode, body}` with
//! the merged ResultRecord as the body.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;

use tubeinfo_core::{ResultRecord, TubeInfoError, VideoDescriptor};

/// Classification request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClassifyRequest {
    /// Video title
    #[schema(example = "【歌ってみた】夜に駆ける / covered by 星川サラ")]
    pub video_title: String,

    /// Video description
    #[schema(example = "original: https://youtu.be/abc12345678")]
    #[serde(default)]
    pub description: String,
}

impl ClassifyRequest {
    /// Unwrap the optional `{body: "<json string>"}` envelope
    pub fn from_value(value: Value) -> Result<Self, TubeInfoError> {
        let inner = match value.get("body") {
            Some(Value::String(body)) => serde_json::from_str(body)
                .map_err(|e| TubeInfoError::Validation(format!("invalid body envelope: {e}")))?,
            _ => value,
        };

        serde_json::from_value(inner)
            .map_err(|e| TubeInfoError::Validation(format!("invalid request: {e}")))
    }
}

/// Classification response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ClassifyResponse {
    /// Always 200; pipeline failures surface as HTTP errors instead
    #[serde(rename = "statusCode")]
    #[schema(example = 200)]
    pub status_code: u16,

    /// The merged result record
    #[schema(value_type = Object)]
    pub body: ResultRecord,
}

/// Classify a video and extract category-specific attributes
#[utoipa::path(
    post,
    path = "/api/v1/classify",
    tag = "classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Classification successful", body = ClassifyResponse),
        (status = 400, description = "Invalid request", body = crate::error::ApiError),
        (status = 502, description = "External service failed", body = crate::error::ApiError),
        (status = 500, description = "Internal error", body = crate::error::ApiError)
    )
)]
pub async fn classify_handler(
    State(state): State<Arc<AppState>>,
    Json(value): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let request = ClassifyRequest::from_value(value)?;
    if request.video_title.trim().is_empty() {
        return Err(TubeInfoError::Validation("video_title cannot be empty".to_string()).into());
    }

    let descriptor = VideoDescriptor::new(request.video_title, request.description);
    let record = state.pipeline.run(&descriptor).await?;

    Ok((
        StatusCode::OK,
        Json(ClassifyResponse {
            status_code: 200,
            body: record,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_request_accepted() {
        let request = ClassifyRequest::from_value(json!({
            "video_title": "歌ってみた",
            "description": "original: https://youtu.be/abc12345678"
        }))
        .unwrap();
        assert_eq!(request.video_title, "歌ってみた");
    }

    #[test]
    fn test_envelope_unwrapped() {
        let inner = json!({"video_title": "t", "description": "d"}).to_string();
        let request = ClassifyRequest::from_value(json!({"body": inner})).unwrap();
        assert_eq!(request.video_title, "t");
        assert_eq!(request.description, "d");
    }

    #[test]
    fn test_description_defaults_to_empty() {
        let request = ClassifyRequest::from_value(json!({"video_title": "t"})).unwrap();
        assert_eq!(request.description, "");
    }

    #[test]
    fn test_missing_title_rejected() {
        assert!(ClassifyRequest::from_value(json!({"description": "d"})).is_err());
    }

    #[test]
    fn test_malformed_envelope_rejected() {
        let result = ClassifyRequest::from_value(json!({"body": "not json"}));
        assert!(matches!(result, Err(TubeInfoError::Validation(_))));
    }
}
