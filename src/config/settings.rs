use crate::error::VideoError;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_CACHE_KEY: &str = "latest_video";
pub const ONE_DAY_IN_SECONDS: u64 = 60 * 60 * 24;

/// How the live page gets its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Read through the Redis cache, fetching on miss.
    Cached,
    /// Call the platform API on every request.
    Direct,
}

impl FromStr for DeliveryMode {
    type Err = VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cached" | "cache" => Ok(DeliveryMode::Cached),
            "direct" => Ok(DeliveryMode::Direct),
            other => Err(VideoError::ConfigError(format!(
                "DELIVERY_MODE must be 'cached' or 'direct', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Cached => write!(f, "cached"),
            DeliveryMode::Direct => write!(f, "direct"),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub channel_id: String,
    pub youtube_api_key: String,
    pub youtube_api_base: String,
    pub youtube_timeout_secs: u64,
    pub redis_url: String,
    pub cache_key: String,
    pub cache_ttl_secs: u64,
    pub delivery_mode: DeliveryMode,
    pub snapshot_path: PathBuf,
    pub bind_addr: String,
}

// Manual Debug so the API key never reaches the logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("channel_id", &self.channel_id)
            .field("youtube_api_key", &mask_secret(&self.youtube_api_key))
            .field("youtube_api_base", &self.youtube_api_base)
            .field("youtube_timeout_secs", &self.youtube_timeout_secs)
            .field("redis_url", &self.redis_url)
            .field("cache_key", &self.cache_key)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("delivery_mode", &self.delivery_mode)
            .field("snapshot_path", &self.snapshot_path)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.chars().count() > 4 {
        format!("{}...", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, VideoError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. `CHANNEL_ID` and
    /// `YOUTUBE_API_KEY` are required; everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, VideoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, VideoError> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(VideoError::ConfigError(format!("{} is not set", key))),
            }
        };

        let channel_id = required("CHANNEL_ID")?;
        let youtube_api_key = required("YOUTUBE_API_KEY")?;

        let delivery_mode = match lookup("DELIVERY_MODE") {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => DeliveryMode::Cached,
        };

        Ok(Config {
            channel_id,
            youtube_api_key,
            youtube_api_base: lookup("YOUTUBE_API_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            youtube_timeout_secs: lookup("YOUTUBE_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://localhost".to_string()),
            cache_key: lookup("VIDEO_CACHE_KEY").unwrap_or_else(|| DEFAULT_CACHE_KEY.to_string()),
            cache_ttl_secs: lookup("VIDEO_CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(ONE_DAY_IN_SECONDS),
            delivery_mode,
            snapshot_path: lookup("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("src").join("data").join("video.json")),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
        })
    }

    pub fn validate_and_log(&self) -> Result<(), VideoError> {
        url::Url::parse(&self.youtube_api_base).map_err(|e| {
            VideoError::ConfigError(format!(
                "YOUTUBE_API_BASE '{}' is not a valid URL: {}",
                self.youtube_api_base, e
            ))
        })?;
        log::info!("Application Configuration Loaded: {:?}", self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("CHANNEL_ID", "UC123"), ("YOUTUBE_API_KEY", "secret-key")]))
                .unwrap();
        assert_eq!(config.channel_id, "UC123");
        assert_eq!(config.youtube_api_base, DEFAULT_API_BASE);
        assert_eq!(config.cache_key, "latest_video");
        assert_eq!(config.cache_ttl_secs, 86400);
        assert_eq!(config.delivery_mode, DeliveryMode::Cached);
        assert_eq!(config.snapshot_path, PathBuf::from("src/data/video.json"));
    }

    #[test]
    fn test_missing_channel_id_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("YOUTUBE_API_KEY", "k")])).unwrap_err();
        assert_eq!(err, VideoError::ConfigError("CHANNEL_ID is not set".into()));
    }

    #[test]
    fn test_blank_api_key_is_fatal() {
        let err =
            Config::from_lookup(lookup_from(&[("CHANNEL_ID", "UC1"), ("YOUTUBE_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, VideoError::ConfigError(_)));
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = Config::from_lookup(lookup_from(&[
            ("CHANNEL_ID", "UC1"),
            ("YOUTUBE_API_KEY", "k"),
            ("YOUTUBE_API_BASE", "http://127.0.0.1:9000/youtube/v3/"),
            ("VIDEO_CACHE_TTL_SECS", "soon"),
            ("DELIVERY_MODE", "Direct"),
        ]))
        .unwrap();
        assert_eq!(config.youtube_api_base, "http://127.0.0.1:9000/youtube/v3");
        assert_eq!(config.cache_ttl_secs, ONE_DAY_IN_SECONDS);
        assert_eq!(config.delivery_mode, DeliveryMode::Direct);
    }

    #[test]
    fn test_unknown_delivery_mode() {
        let err = Config::from_lookup(lookup_from(&[
            ("CHANNEL_ID", "UC1"),
            ("YOUTUBE_API_KEY", "k"),
            ("DELIVERY_MODE", "sometimes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, VideoError::ConfigError(_)));
    }

    #[test]
    fn test_live_is_not_a_delivery_mode() {
        assert!("live".parse::<DeliveryMode>().is_err());
        assert_eq!("direct".parse::<DeliveryMode>().unwrap(), DeliveryMode::Direct);
        assert_eq!("cache".parse::<DeliveryMode>().unwrap(), DeliveryMode::Cached);
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("CHANNEL_ID", "UC1"),
            ("YOUTUBE_API_KEY", "AIzaSyVerySecret"),
        ]))
        .unwrap();
        let printed = format!("{:?}", config);
        assert!(printed.contains("AIza..."));
        assert!(!printed.contains("VerySecret"));
    }
}
