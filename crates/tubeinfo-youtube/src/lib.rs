//! Tubeinfo YouTube - URL parsing and metadata lookup
//!
//! Two narrow capabilities: a pure parser recovering a video identifier
//! from a reference URL, and a Data API client returning the
//! title/description snippet for an identifier.

pub mod data_api;
pub mod url;

pub use data_api::YouTubeDataClient;
pub use url::parse_video_url;
