//! Video classifier
//!
//! Produces the {category, type} pair for a descriptor. The cast target is
//! loosely typed on purpose: label normalization happens here, so
//! classification always succeeds with members of the known sets even when
//! the extraction service answers outside the enumeration.

use serde::Deserialize;
use serde_json::json;

use crate::text::{strip_urls, truncate_chars};
use crate::{ExtractionClient, Extractable};
use tubeinfo_core::{Category, Classification, Result, VideoDescriptor, VideoKind};

#[derive(Debug, Deserialize)]
struct RawClassification {
    category: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl Extractable for RawClassification {
    const NAME: &'static str = "Classification";

    fn describe_fields() -> &'static str {
        r#"- category: "SONG" for a song performance, "GAME" for game playthrough or commentary, "UNKNOWN" for anything else
- type: "VIDEO" for an uploaded video, "STREAM" for a live stream or its archive"#
    }
}

/// Classifies videos into a content category and presentation type
#[derive(Clone)]
pub struct Classifier {
    extraction: ExtractionClient,
}

impl Classifier {
    pub fn new(extraction: ExtractionClient) -> Self {
        Self { extraction }
    }

    /// Classify a video from its title and description.
    ///
    /// Embedded URLs are replaced with a placeholder first so incidental
    /// links cannot bias the category.
    pub async fn classify(&self, video: &VideoDescriptor) -> Result<Classification> {
        let description = strip_urls(&video.description);
        let description = truncate_chars(&description, self.extraction.max_description_chars());
        let payload = json!({
            "title": strip_urls(&video.title),
            "description": description,
        });

        let raw: RawClassification = self.extraction.cast(&payload).await?;
        let classification = Classification {
            category: Category::from_label(&raw.category),
            kind: VideoKind::from_label(raw.kind.as_deref()),
        };
        tracing::debug!(
            category = %classification.category,
            kind = %classification.kind,
            "classified video"
        );
        Ok(classification)
    }
}
