//! Song attribute extraction
//!
//! Two schemas share this module: the full cover-capable `SongAttributes`
//! for the primary video, and the reduced `OriginalSongAttributes` applied
//! to a resolved original. Only the reduced schema is ever used for
//! resolved videos, which is what keeps cover resolution at depth one.

use serde::Deserialize;
use serde_json::json;

use crate::text::{non_empty, truncate_chars};
use crate::{ExtractionClient, Extractable};
use tubeinfo_core::{OriginalSongAttributes, Result, SongAttributes, VideoDescriptor};

#[derive(Debug, Deserialize)]
struct RawSongAttributes {
    #[serde(default)]
    song_title: Option<String>,
    #[serde(default)]
    singers: Option<Vec<String>>,
    #[serde(default)]
    is_cover: Option<bool>,
    #[serde(default)]
    cover_artists: Option<Vec<String>>,
    #[serde(default)]
    original_url: Option<String>,
}

impl Extractable for RawSongAttributes {
    const NAME: &'static str = "SongAttributes";

    fn describe_fields() -> &'static str {
        r#"- song_title: string or null, the title of the performed song
- singers: array of performer names; for synthesized-vocal works, the composer's alias
- is_cover: boolean, whether this is a cover of another artist's song
- cover_artists: array of the original authors (covers only, else empty)
- original_url: string or null, URL of the original source video exactly as written in the input (covers only)"#
    }
}

#[derive(Debug, Deserialize)]
struct RawOriginalSong {
    #[serde(default)]
    song_title: Option<String>,
    #[serde(default)]
    singers: Option<Vec<String>>,
}

impl Extractable for RawOriginalSong {
    const NAME: &'static str = "OriginalSongAttributes";

    fn describe_fields() -> &'static str {
        r#"- song_title: string or null, the title of the performed song
- singers: array of performer names; for synthesized-vocal works, the composer's alias"#
    }
}

fn clean_list(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .filter_map(non_empty)
        .collect()
}

/// Extracts song attributes from video text
#[derive(Clone)]
pub struct SongExtractor {
    extraction: ExtractionClient,
}

impl SongExtractor {
    pub fn new(extraction: ExtractionClient) -> Self {
        Self { extraction }
    }

    /// Extract the full cover-capable attribute set for the primary video.
    ///
    /// Works on the raw text: URLs are left in place so `original_url`
    /// stays recoverable.
    pub async fn extract(&self, video: &VideoDescriptor) -> Result<SongAttributes> {
        let payload = json!({
            "title": video.title,
            "description":
                truncate_chars(&video.description, self.extraction.max_description_chars()),
        });

        let raw: RawSongAttributes = self.extraction.cast(&payload).await?;
        Ok(SongAttributes {
            song_title: raw.song_title.and_then(non_empty),
            singers: clean_list(raw.singers),
            is_cover: raw.is_cover.unwrap_or(false),
            cover_artists: clean_list(raw.cover_artists),
            original_url: raw.original_url.and_then(non_empty),
        })
    }

    /// Extract the reduced title/performer pair for a resolved original
    pub async fn extract_original(
        &self,
        video: &VideoDescriptor,
    ) -> Result<OriginalSongAttributes> {
        let payload = json!({
            "title": video.title,
            "description":
                truncate_chars(&video.description, self.extraction.max_description_chars()),
        });

        let raw: RawOriginalSong = self.extraction.cast(&payload).await?;
        Ok(OriginalSongAttributes {
            song_title: raw.song_title.and_then(non_empty),
            singers: clean_list(raw.singers),
        })
    }
}
