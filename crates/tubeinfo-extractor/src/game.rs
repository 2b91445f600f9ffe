//! Game attribute extraction
//!
//! The extraction service sometimes answers with a list of candidate
//! titles instead of a single value. That ambiguity is normalized here, at
//! the adapter boundary, into a fixed optional scalar before the value can
//! enter a ResultRecord.

use serde::Deserialize;
use serde_json::json;

use crate::text::non_empty;
use crate::{ExtractionClient, Extractable};
use tubeinfo_core::{GameAttributes, Result, VideoDescriptor};

/// Scalar-or-list shape observed in extraction answers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TitleAnswer {
    One(Option<String>),
    Many(Vec<String>),
}

impl Default for TitleAnswer {
    fn default() -> Self {
        Self::One(None)
    }
}

impl TitleAnswer {
    /// First non-empty candidate, else None
    fn normalize(self) -> Option<String> {
        match self {
            Self::One(title) => title.and_then(non_empty),
            Self::Many(titles) => titles.into_iter().find_map(non_empty),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGameAttributes {
    #[serde(default)]
    game_title: TitleAnswer,
}

impl Extractable for RawGameAttributes {
    const NAME: &'static str = "GameAttributes";

    fn describe_fields() -> &'static str {
        "- game_title: string or null, the title of the game being played"
    }
}

/// Extracts the game title from video text
#[derive(Clone)]
pub struct GameExtractor {
    extraction: ExtractionClient,
}

impl GameExtractor {
    pub fn new(extraction: ExtractionClient) -> Self {
        Self { extraction }
    }

    /// Extract game attributes. The title alone carries the game name, so
    /// the description is not submitted.
    pub async fn extract(&self, video: &VideoDescriptor) -> Result<GameAttributes> {
        let payload = json!({"title": video.title});

        let raw: RawGameAttributes = self.extraction.cast(&payload).await?;
        Ok(GameAttributes {
            game_title: raw.game_title.normalize(),
        })
    }
}
