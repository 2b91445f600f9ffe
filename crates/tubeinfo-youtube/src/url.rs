//! Video reference URL parsing
//!
//! Accepts the two canonical shapes of a YouTube video reference and
//! recovers the 11-character identifier. Matching is anchored at the start
//! of the input; trailing text after a valid prefix is ignored. A
//! non-matching string is a normal outcome, not an error.

use once_cell::sync::Lazy;
use regex::Regex;

use tubeinfo_core::VideoId;

// Long form: youtube.com/watch?v=<id>. Short form: youtu.be/<id>.
// Scheme and www. are optional in both.
static VIDEO_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .expect("video URL pattern is valid")
});

/// Extract the video identifier from a reference URL, if it matches one of
/// the accepted shapes.
pub fn parse_video_url(url: &str) -> Option<VideoId> {
    let captures = VIDEO_URL_PATTERN.captures(url)?;
    VideoId::new(&captures[1])
}
