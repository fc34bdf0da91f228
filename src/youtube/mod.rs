//! YouTube Data API access: wire models and the latest-video client.

pub mod client;
pub mod models;

pub use client::{extract_search_hit, extract_stats, VideoSource, YouTubeClient};
pub use models::{watch_url, SearchHit, VideoRecord, VideoStats};
