use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

use crate::{
    config::Config,
    error::{Result, VideoError},
    utils::log_timed_request,
    youtube::models::{
        coerce_count, SearchHit, SearchListResponse, VideoListResponse, VideoRecord, VideoStats,
    },
};

const SEARCH_ENDPOINT: &str = "search";
const VIDEOS_ENDPOINT: &str = "videos";
const SEARCH_FIELDS: &str = "items(id/videoId,snippet(title,thumbnails/medium,publishedAt))";
const USER_AGENT: &str = concat!("latest-video/", env!("CARGO_PKG_VERSION"));

/// Anything that can produce the latest video record.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<VideoRecord>;
}

/// Client for the two YouTube Data API calls, bound to one channel.
#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    api_base: String,
    api_key: String,
    channel_id: String,
}

impl fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

impl YouTubeClient {
    pub fn new(http: Client, api_base: &str, api_key: &str, channel_id: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            channel_id: channel_id.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.youtube_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VideoError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::new(
            http,
            &config.youtube_api_base,
            &config.youtube_api_key,
            &config.channel_id,
        ))
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Search, then statistics. All-or-nothing: any failure yields no record.
    pub async fn fetch_latest_for(&self, channel_id: &str) -> Result<VideoRecord> {
        let hit = self.search_latest(channel_id).await?;
        let stats = self.video_stats(&hit.id).await?;
        let record = VideoRecord::new(hit, stats);
        debug!(
            "Latest video for {}: {} ({} views, {} likes)",
            channel_id, record.id, record.views, record.likes
        );
        Ok(record)
    }

    /// `search.list` for the single most recent video on the channel.
    pub async fn search_latest(&self, channel_id: &str) -> Result<SearchHit> {
        info!("Requesting latest video for channel {} from /search", channel_id);
        let response: SearchListResponse = self
            .get_json(
                SEARCH_ENDPOINT,
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("type", "video"),
                    ("order", "date"),
                    ("maxResults", "1"),
                    ("fields", SEARCH_FIELDS),
                ],
            )
            .await?;
        extract_search_hit(response)
    }

    /// `videos.list` with `part=statistics` for one id.
    pub async fn video_stats(&self, video_id: &str) -> Result<VideoStats> {
        info!("Requesting statistics for video {} from /videos", video_id);
        let response: VideoListResponse = self
            .get_json(VIDEOS_ENDPOINT, &[("part", "statistics"), ("id", video_id)])
            .await?;
        extract_stats(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.api_base, endpoint);
        let label = format!("YouTube /{}", endpoint);

        let response = log_timed_request(
            &label,
            self.http
                .get(&url)
                .query(params)
                .query(&[("key", self.api_key.as_str())])
                .send(),
        )
        .await
        // The request URL carries the API key; keep it out of error text
        .map_err(|e| {
            VideoError::NetworkError(format!("{} request failed: {}", label, e.without_url()))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("{} returned {}: {}", label, status, text);
            return Err(VideoError::NetworkError(format!("{} error {}: {}", label, status, text)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| {
                VideoError::NetworkError(format!("{} body read failed: {}", label, e.without_url()))
            })?;
        serde_json::from_str(&body)
            .map_err(|e| VideoError::ParseError(format!("Failed to parse {} response: {}", label, e)))
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn fetch_latest(&self) -> Result<VideoRecord> {
        self.fetch_latest_for(&self.channel_id).await
    }
}

/// Takes the first search result. Missing results, id or title are `NotFound`.
pub fn extract_search_hit(response: SearchListResponse) -> Result<SearchHit> {
    let first = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| VideoError::NotFound("No search results found".to_string()))?;

    let id = first.id.and_then(|id| id.video_id).unwrap_or_default();
    let snippet = first.snippet.unwrap_or_default();
    let title = snippet.title.unwrap_or_default();
    let thumbnail = snippet
        .thumbnails
        .and_then(|t| t.medium)
        .and_then(|m| m.url)
        .unwrap_or_default();
    let published = snippet.published_at.filter(|p| !p.is_empty());

    if id.is_empty() {
        return Err(VideoError::NotFound("No video id found".to_string()));
    }
    if title.is_empty() {
        return Err(VideoError::NotFound("No title found".to_string()));
    }

    Ok(SearchHit {
        id,
        title,
        thumbnail,
        published,
    })
}

/// Reads counters from the first video resource; absent counters are 0.
pub fn extract_stats(response: VideoListResponse) -> Result<VideoStats> {
    let first = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| VideoError::NotFound("No statistics results found".to_string()))?;
    let statistics = first.statistics.unwrap_or_default();
    Ok(VideoStats {
        views: coerce_count(statistics.view_count.as_ref()),
        likes: coerce_count(statistics.like_count.as_ref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn search(value: serde_json::Value) -> SearchListResponse {
        serde_json::from_value(value).unwrap()
    }

    fn videos(value: serde_json::Value) -> VideoListResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_search_hit() {
        let hit = extract_search_hit(search(json!({
            "items": [{
                "id": {"videoId": "abc123"},
                "snippet": {
                    "title": "Hello",
                    "thumbnails": {"medium": {"url": "http://x/thumb.jpg"}},
                    "publishedAt": "2024-01-01T00:00:00Z"
                }
            }]
        })))
        .unwrap();
        assert_eq!(
            hit,
            SearchHit {
                id: "abc123".into(),
                title: "Hello".into(),
                thumbnail: "http://x/thumb.jpg".into(),
                published: Some("2024-01-01T00:00:00Z".into()),
            }
        );
    }

    #[test]
    fn test_missing_thumbnail_is_empty() {
        let hit = extract_search_hit(search(json!({
            "items": [{"id": {"videoId": "v"}, "snippet": {"title": "t"}}]
        })))
        .unwrap();
        assert_eq!(hit.thumbnail, "");
        assert_eq!(hit.published, None);
    }

    #[test]
    fn test_search_not_found_cases() {
        let cases = [
            json!({"items": []}),
            json!({}),
            json!({"items": [{"id": {"videoId": ""}, "snippet": {"title": "t"}}]}),
            json!({"items": [{"snippet": {"title": "t"}}]}),
            json!({"items": [{"id": {"videoId": "v"}, "snippet": {"title": ""}}]}),
            json!({"items": [{"id": {"videoId": "v"}}]}),
        ];
        for case in cases {
            let err = extract_search_hit(search(case.clone())).unwrap_err();
            assert!(matches!(err, VideoError::NotFound(_)), "case {} gave {:?}", case, err);
        }
    }

    #[test]
    fn test_extract_stats() {
        let stats = extract_stats(videos(json!({
            "items": [{"statistics": {"viewCount": "42", "likeCount": "7"}}]
        })))
        .unwrap();
        assert_eq!(stats, VideoStats { views: 42, likes: 7 });
    }

    #[test]
    fn test_stats_default_to_zero() {
        let stats = extract_stats(videos(json!({
            "items": [{"statistics": {"viewCount": "many"}}]
        })))
        .unwrap();
        assert_eq!(stats, VideoStats { views: 0, likes: 0 });

        let stats = extract_stats(videos(json!({"items": [{}]}))).unwrap();
        assert_eq!(stats, VideoStats::default());
    }

    #[test]
    fn test_stats_without_results_is_not_found() {
        let err = extract_stats(videos(json!({"items": []}))).unwrap_err();
        assert!(matches!(err, VideoError::NotFound(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = YouTubeClient::new(Client::new(), "http://localhost:1/v3", "AIzaSecret", "UC1");
        let printed = format!("{:?}", client);
        assert!(printed.contains("UC1"));
        assert!(!printed.contains("AIzaSecret"));
    }

    #[test]
    fn test_null_items_is_not_found() {
        let err = extract_search_hit(search(json!({"items": null}))).unwrap_err();
        assert!(matches!(err, VideoError::NotFound(_)));
        let err = extract_stats(videos(json!({"items": null}))).unwrap_err();
        assert!(matches!(err, VideoError::NotFound(_)));
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let client = YouTubeClient::new(Client::new(), "http://localhost:1/v3/", "k", "UC1");
        assert_eq!(client.api_base, "http://localhost:1/v3");
        assert_eq!(client.channel_id(), "UC1");
    }
}
