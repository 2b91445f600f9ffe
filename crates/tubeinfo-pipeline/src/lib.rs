//! Tubeinfo Pipeline - classify, extract, resolve, merge
//!
//! The `ClassificationPipeline` runs one video through the whole cascade:
//! classification, category-specific attribute extraction, the depth-one
//! cover resolution for song videos, and the final field merge. It is built
//! once from injected collaborators and shared via `Arc`; requests never
//! share mutable state.

use serde_json::json;
use std::sync::Arc;

use tubeinfo_core::{
    Category, Classification, ExtractionConfig, LlmClient, MetadataLookup,
    OriginalSongAttributes, Result, ResultRecord, SongAttributes, TubeInfoError, VideoDescriptor,
};
use tubeinfo_extractor::{Classifier, ExtractionClient, GameExtractor, SongExtractor};
use tubeinfo_youtube::parse_video_url;

// ============================================================================
// Pipeline
// ============================================================================

/// Orchestrates the classify-extract-resolve-merge cascade
pub struct ClassificationPipeline {
    classifier: Classifier,
    songs: SongExtractor,
    games: GameExtractor,
    metadata: Arc<dyn MetadataLookup>,
}

impl ClassificationPipeline {
    /// Create a pipeline over the injected collaborators
    pub fn new(
        llm: Arc<dyn LlmClient>,
        metadata: Arc<dyn MetadataLookup>,
        extraction: &ExtractionConfig,
    ) -> Self {
        let client = ExtractionClient::new(llm, extraction);
        Self {
            classifier: Classifier::new(client.clone()),
            songs: SongExtractor::new(client.clone()),
            games: GameExtractor::new(client),
            metadata,
        }
    }

    /// Run one video through the cascade and return the merged record.
    ///
    /// All external calls are strictly sequential: between one round trip
    /// for an UNKNOWN video and five for a cover song whose original
    /// resolves.
    pub async fn run(&self, video: &VideoDescriptor) -> Result<ResultRecord> {
        tracing::info!(title = %video.title, "pipeline started");

        let classification = self.classifier.classify(video).await?;

        let record = match classification.category {
            Category::Song => {
                let attrs = self.songs.extract(video).await?;
                let resolved = if attrs.is_cover && attrs.original_url.is_some() {
                    self.resolve_original(&attrs).await?
                } else {
                    None
                };
                assemble(classification, Some(to_fields(&attrs)?), resolved.as_ref())
            }
            Category::Game => {
                let attrs = self.games.extract(video).await?;
                assemble(classification, Some(to_fields(&attrs)?), None)
            }
            Category::Unknown => assemble(classification, None, None),
        };

        tracing::info!(fields = record.len(), "pipeline finished");
        Ok(record)
    }

    /// Resolve the original video behind a cover.
    ///
    /// Every abort path here is a normal outcome: the caller keeps the
    /// cover-song fields as extracted. Recursion is bounded to one level by
    /// construction, since the resolved video only ever meets the reduced
    /// extractor, which carries no cover metadata.
    async fn resolve_original(
        &self,
        attrs: &SongAttributes,
    ) -> Result<Option<OriginalSongAttributes>> {
        let Some(url) = attrs.original_url.as_deref() else {
            return Ok(None);
        };

        let Some(id) = parse_video_url(url) else {
            tracing::debug!(url, "original URL did not parse, keeping cover fields");
            return Ok(None);
        };

        let Some(snippet) = self.metadata.lookup(&id).await? else {
            tracing::debug!(video_id = %id, "original video not found, keeping cover fields");
            return Ok(None);
        };

        let original = VideoDescriptor::from(snippet);
        let classification = self.classifier.classify(&original).await?;
        if classification.category != Category::Song {
            tracing::debug!(
                category = %classification.category,
                "resolved video is not a song, keeping cover fields"
            );
            return Ok(None);
        }

        let original_attrs = self.songs.extract_original(&original).await?;
        tracing::debug!(video_id = %id, "original resolved");
        Ok(Some(original_attrs))
    }
}

fn to_fields<T: serde::Serialize>(attrs: &T) -> Result<serde_json::Value> {
    serde_json::to_value(attrs).map_err(|e| TubeInfoError::Other(anyhow::Error::new(e)))
}

// ============================================================================
// Result Assembler
// ============================================================================

/// Merge classification, attribute fields, and resolver output into the
/// final record.
///
/// Merge order: classification fields first, then the category's attribute
/// fields, then the override pair. Last-writer-wins per key; keys are never
/// deleted. The override writes `song_title` and exposes the original's
/// singers under `artists`.
pub fn assemble(
    classification: Classification,
    attributes: Option<serde_json::Value>,
    resolved: Option<&OriginalSongAttributes>,
) -> ResultRecord {
    let mut record = ResultRecord::new();
    record.insert("category", json!(classification.category));
    record.insert("type", json!(classification.kind));

    if let Some(fields) = attributes {
        record.extend_object(fields);
    }

    if let Some(original) = resolved {
        record.insert("song_title", json!(original.song_title));
        record.insert("artists", json!(original.singers));
    }

    record
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tubeinfo_core::{Snippet, VideoKind};

    /// Returns scripted answers in order; external calls are strictly
    /// sequential, so the script mirrors the cascade.
    struct ScriptedLlm {
        answers: Mutex<VecDeque<&'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn new(answers: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.iter().copied().collect()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for ScriptedLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let answer = self
                .answers
                .lock()
                .unwrap()
                .pop_front()
                .expect("script exhausted");
            Ok(answer.to_string())
        }
    }

    struct CountingLookup {
        snippet: Option<Snippet>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl CountingLookup {
        fn returning(snippet: Option<Snippet>) -> Arc<Self> {
            Arc::new(Self {
                snippet,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                snippet: None,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait::async_trait]
    impl MetadataLookup for CountingLookup {
        async fn lookup(&self, _id: &tubeinfo_core::VideoId) -> Result<Option<Snippet>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TubeInfoError::Transport("connection refused".into()));
            }
            Ok(self.snippet.clone())
        }

        fn name(&self) -> &str {
            "counting-lookup"
        }
    }

    fn pipeline(
        llm: Arc<ScriptedLlm>,
        lookup: Arc<CountingLookup>,
    ) -> ClassificationPipeline {
        ClassificationPipeline::new(llm, lookup, &ExtractionConfig::default())
    }

    const COVER_SONG: &str = r#"{"song_title": "X", "singers": ["Y"], "is_cover": true,
        "cover_artists": ["W"], "original_url": "https://youtu.be/abc12345678"}"#;

    fn original_snippet() -> Option<Snippet> {
        Some(Snippet {
            title: "original song".to_string(),
            description: "by W".to_string(),
        })
    }

    #[tokio::test]
    async fn test_unknown_yields_classification_only() {
        let llm = ScriptedLlm::new(&[r#"{"category": "UNKNOWN", "type": "VIDEO"}"#]);
        let lookup = CountingLookup::returning(None);
        let record = pipeline(llm.clone(), lookup.clone())
            .run(&VideoDescriptor::new("雑談", ""))
            .await
            .unwrap();

        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, ["category", "type"]);
        assert_eq!(record.get("category"), Some(&json!("UNKNOWN")));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_game_flow_takes_first_candidate_title() {
        let llm = ScriptedLlm::new(&[
            r#"{"category": "GAME", "type": "STREAM"}"#,
            r#"{"game_title": ["Title A", "Title B"]}"#,
        ]);
        let lookup = CountingLookup::returning(None);
        let record = pipeline(llm, lookup.clone())
            .run(&VideoDescriptor::new("【Minecraft】配信", ""))
            .await
            .unwrap();

        assert_eq!(record.get("game_title"), Some(&json!("Title A")));
        assert_eq!(record.get("type"), Some(&json!("STREAM")));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_cover_song_never_invokes_lookup() {
        let llm = ScriptedLlm::new(&[
            r#"{"category": "SONG", "type": "VIDEO"}"#,
            r#"{"song_title": "X", "singers": ["Y"], "is_cover": false,
                "cover_artists": [], "original_url": null}"#,
        ]);
        let lookup = CountingLookup::returning(original_snippet());
        let record = pipeline(llm, lookup.clone())
            .run(&VideoDescriptor::new("オリジナル曲", ""))
            .await
            .unwrap();

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
        assert_eq!(record.get("song_title"), Some(&json!("X")));
        assert!(!record.contains_key("artists"));
    }

    #[tokio::test]
    async fn test_cover_resolution_overrides_title_and_artists() {
        let llm = ScriptedLlm::new(&[
            r#"{"category": "SONG", "type": "VIDEO"}"#,
            COVER_SONG,
            r#"{"category": "SONG", "type": "VIDEO"}"#,
            r#"{"song_title": "Z", "singers": ["W"]}"#,
        ]);
        let lookup = CountingLookup::returning(original_snippet());
        let record = pipeline(llm.clone(), lookup.clone())
            .run(&VideoDescriptor::new(
                "歌ってみた",
                "original: https://youtu.be/abc12345678",
            ))
            .await
            .unwrap();

        assert_eq!(record.get("song_title"), Some(&json!("Z")));
        assert_eq!(record.get("artists"), Some(&json!(["W"])));
        // Everything else stays as extracted from the cover
        assert_eq!(record.get("singers"), Some(&json!(["Y"])));
        assert_eq!(record.get("is_cover"), Some(&json!(true)));
        assert_eq!(
            record.get("original_url"),
            Some(&json!("https://youtu.be/abc12345678"))
        );
        assert_eq!(llm.calls.load(Ordering::SeqCst), 4);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_override_suppressed_when_original_is_not_song() {
        let llm = ScriptedLlm::new(&[
            r#"{"category": "SONG", "type": "VIDEO"}"#,
            COVER_SONG,
            r#"{"category": "GAME", "type": "VIDEO"}"#,
        ]);
        let lookup = CountingLookup::returning(original_snippet());
        let record = pipeline(llm.clone(), lookup.clone())
            .run(&VideoDescriptor::new("歌ってみた", ""))
            .await
            .unwrap();

        assert_eq!(record.get("song_title"), Some(&json!("X")));
        assert!(!record.contains_key("artists"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        // Reduced extraction never ran
        assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unparseable_original_url_aborts_silently() {
        let llm = ScriptedLlm::new(&[
            r#"{"category": "SONG", "type": "VIDEO"}"#,
            r#"{"song_title": "X", "singers": ["Y"], "is_cover": true,
                "cover_artists": [], "original_url": "not a url"}"#,
        ]);
        let lookup = CountingLookup::returning(original_snippet());
        let record = pipeline(llm, lookup.clone())
            .run(&VideoDescriptor::new("歌ってみた", ""))
            .await
            .unwrap();

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
        assert_eq!(record.get("song_title"), Some(&json!("X")));
    }

    #[tokio::test]
    async fn test_lookup_not_found_aborts_silently() {
        let llm = ScriptedLlm::new(&[
            r#"{"category": "SONG", "type": "VIDEO"}"#,
            COVER_SONG,
        ]);
        let lookup = CountingLookup::returning(None);
        let record = pipeline(llm, lookup.clone())
            .run(&VideoDescriptor::new("歌ってみた", ""))
            .await
            .unwrap();

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert_eq!(record.get("song_title"), Some(&json!("X")));
        assert!(!record.contains_key("artists"));
    }

    #[tokio::test]
    async fn test_transient_lookup_failure_propagates() {
        let llm = ScriptedLlm::new(&[
            r#"{"category": "SONG", "type": "VIDEO"}"#,
            COVER_SONG,
        ]);
        let lookup = CountingLookup::failing();
        let err = pipeline(llm, lookup)
            .run(&VideoDescriptor::new("歌ってみた", ""))
            .await
            .unwrap_err();

        assert!(err.is_transient());
    }

    #[test]
    fn test_assemble_merge_order() {
        let classification = Classification {
            category: Category::Song,
            kind: VideoKind::Video,
        };
        let attrs = SongAttributes {
            song_title: Some("X".to_string()),
            singers: vec!["Y".to_string()],
            is_cover: true,
            cover_artists: vec!["W".to_string()],
            original_url: Some("https://youtu.be/abc12345678".to_string()),
        };
        let resolved = OriginalSongAttributes {
            song_title: Some("Z".to_string()),
            singers: vec!["W".to_string()],
        };

        let record = assemble(
            classification,
            Some(serde_json::to_value(&attrs).unwrap()),
            Some(&resolved),
        );

        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(
            keys,
            [
                "category",
                "type",
                "song_title",
                "singers",
                "is_cover",
                "cover_artists",
                "original_url",
                "artists"
            ]
        );
        // Overwrite replaced the value but kept the key's position
        assert_eq!(record.get("song_title"), Some(&json!("Z")));
    }
}
