//! YouTube Data API v3 data structures
//!
//! Wire shapes for the two endpoints this crate calls (`search.list` and
//! `videos.list`), plus the flat `VideoRecord` handed to callers.
//! Every wire field is optional: the API omits fields freely and the
//! `fields` projection strips most of the rest.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const SHORT_LINK_BASE: &str = "https://youtu.be";

/// Builds the short watch link for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("{}/{}", SHORT_LINK_BASE, video_id)
}

/// Latest video on a channel, with its counters at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    pub views: u64,
    pub likes: u64,
}

impl VideoRecord {
    pub fn new(hit: SearchHit, stats: VideoStats) -> Self {
        Self {
            url: watch_url(&hit.id),
            id: hit.id,
            title: hit.title,
            thumbnail: hit.thumbnail,
            published: hit.published,
            views: stats.views,
            likes: stats.likes,
        }
    }
}

/// Fields pulled out of the first search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub published: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoStats {
    pub views: u64,
    pub likes: u64,
}

/// Response structure for `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    pub id: Option<SearchResultId>,
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResultId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSnippet {
    pub title: Option<String>,
    pub thumbnails: Option<Thumbnails>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    pub medium: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

/// Response structure for `GET /videos?part=statistics`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<VideoResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoResource {
    pub statistics: Option<VideoStatistics>,
}

/// Counters arrive as decimal strings ("42"); kept loose so a bare number
/// or garbage doesn't fail the whole response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoStatistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<Value>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<Value>,
}

/// `"items": null` reads as no results.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Coerces a counter to a non-negative integer, 0 when absent or non-numeric.
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(Some(&json!("42"))), 42);
        assert_eq!(coerce_count(Some(&json!(7))), 7);
        assert_eq!(coerce_count(Some(&json!(""))), 0);
        assert_eq!(coerce_count(Some(&json!("-3"))), 0);
        assert_eq!(coerce_count(Some(&json!("1.5"))), 0);
        assert_eq!(coerce_count(Some(&json!(null))), 0);
        assert_eq!(coerce_count(None), 0);
    }

    #[test]
    fn test_record_serialization_order() {
        let record = VideoRecord::new(
            SearchHit {
                id: "abc123".into(),
                title: "Hello".into(),
                thumbnail: "http://x/thumb.jpg".into(),
                published: Some("2024-01-01T00:00:00Z".into()),
            },
            VideoStats { views: 42, likes: 7 },
        );
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":"abc123","title":"Hello","url":"https://youtu.be/abc123","thumbnail":"http://x/thumb.jpg","published":"2024-01-01T00:00:00Z","views":42,"likes":7}"#
        );
    }

    #[test]
    fn test_record_without_published_omits_field() {
        let record = VideoRecord::new(
            SearchHit {
                id: "v1".into(),
                title: "T".into(),
                thumbnail: String::new(),
                published: None,
            },
            VideoStats::default(),
        );
        let text = serde_json::to_string(&record).unwrap();
        assert!(!text.contains("published"));
        let back: VideoRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_search_response_tolerates_missing_fields() {
        let resp: SearchListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.items.is_empty());

        let resp: SearchListResponse = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(resp.items.is_empty());

        let resp: VideoListResponse = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(resp.items.is_empty());

        let resp: SearchListResponse =
            serde_json::from_value(json!({"items": [{"snippet": {"title": "x"}}]})).unwrap();
        assert!(resp.items[0].id.is_none());
    }
}
