//! Video domain models
//!
//! Inputs (descriptors, identifiers, snippets), classification results,
//! per-category attribute sets, and the merged ResultRecord.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Video Input
// ============================================================================

/// Immutable title/description pair fed into classification and extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub title: String,
    pub description: String,
}

impl VideoDescriptor {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Validated 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub const LEN: usize = 11;

    /// Validate and wrap an identifier. Identifiers are exactly 11
    /// characters from `[A-Za-z0-9_-]`.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let valid = id.len() == Self::LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        valid.then_some(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Title/description pair returned by the metadata lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl From<Snippet> for VideoDescriptor {
    fn from(snippet: Snippet) -> Self {
        Self {
            title: snippet.title,
            description: snippet.description,
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Content category of a video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Song performance (歌ってみた and similar)
    Song,
    /// Game playthrough or commentary
    Game,
    #[default]
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Song => "SONG",
            Self::Game => "GAME",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Normalize a label from the extraction service. Anything outside the
    /// enumerated set maps to Unknown; classification never fails on an
    /// out-of-enumeration value.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "SONG" => Self::Song,
            "GAME" => Self::Game,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation type of a video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VideoKind {
    /// Uploaded video
    #[default]
    Video,
    /// Live stream (or its archive)
    Stream,
}

impl VideoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "VIDEO",
            Self::Stream => "STREAM",
        }
    }

    /// Normalize a label from the extraction service. Absent or
    /// unrecognized labels map to Video.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_uppercase()).as_deref() {
            Some("STREAM") => Self::Stream,
            _ => Self::Video,
        }
    }
}

impl std::fmt::Display for VideoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category/type pair produced once per evaluated video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    #[serde(rename = "type")]
    pub kind: VideoKind,
}

// ============================================================================
// Attribute Sets
// ============================================================================

/// Attributes extracted for SONG videos
///
/// `cover_artists` and `original_url` are meaningful only when `is_cover`.
/// Optional text fields are None when the extraction found nothing, never
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongAttributes {
    pub song_title: Option<String>,
    /// Performer names; for synthesized-vocal works, the composer's alias
    pub singers: Vec<String>,
    pub is_cover: bool,
    /// Original authors of a covered song
    pub cover_artists: Vec<String>,
    pub original_url: Option<String>,
}

/// Reduced projection used only for a resolved original video.
///
/// Carries no cover metadata, so a resolved video's own cover status can
/// never be inspected or followed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginalSongAttributes {
    pub song_title: Option<String>,
    pub singers: Vec<String>,
}

/// Attributes extracted for GAME videos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameAttributes {
    pub game_title: Option<String>,
}

// ============================================================================
// Result Record
// ============================================================================

/// Insertion-ordered field map returned as the response body.
///
/// Seeded with classification fields, extended by the category's attribute
/// set, then selectively overwritten by resolver output. Merges are
/// last-writer-wins per key; keys are never deleted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRecord(Map<String, Value>);

impl ResultRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert or overwrite a field
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Extend with every field of a JSON object, in its own order
    pub fn extend_object(&mut self, value: Value) {
        if let Value::Object(map) = value {
            for (key, val) in map {
                self.0.insert(key, val);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
