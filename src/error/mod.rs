use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum VideoError {
    /// The platform answered but gave nothing usable (no results, empty id or title, no stats)
    #[error("Not Found: {0}")]
    NotFound(String),

    /// Transport failure or non-success status calling the platform API
    #[error("Network Error: {0}")]
    NetworkError(String),

    /// Cache store unreachable or rejected a command
    #[error("Cache Unavailable: {0}")]
    CacheUnavailable(String),

    /// Response or cached payload did not have the expected shape
    #[error("Parse Error: {0}")]
    ParseError(String),

    /// Configuration errors
    #[error("Config Error: {0}")]
    ConfigError(String),

    /// Snapshot file read/write errors
    #[error("IO Error: {0}")]
    IoError(String),
}

impl From<serde_json::Error> for VideoError {
    fn from(err: serde_json::Error) -> Self {
        VideoError::ParseError(format!("JSON serialization/deserialization error: {}", err))
    }
}

impl From<reqwest::Error> for VideoError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            VideoError::ParseError(format!("Failed to decode API response: {}", err))
        } else {
            VideoError::NetworkError(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<redis::RedisError> for VideoError {
    fn from(err: redis::RedisError) -> Self {
        VideoError::CacheUnavailable(format!("Redis error: {}", err))
    }
}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::IoError(err.to_string())
    }
}

impl VideoError {
    /// Categorizes error for logging
    pub fn categorize(&self) -> ErrorCategory {
        match self {
            VideoError::NotFound(_) | VideoError::ParseError(_) => ErrorCategory::Data,
            VideoError::NetworkError(_) => ErrorCategory::Network,
            VideoError::CacheUnavailable(_) => ErrorCategory::Infrastructure,
            VideoError::ConfigError(_) => ErrorCategory::Configuration,
            VideoError::IoError(_) => ErrorCategory::Storage,
        }
    }

    /// Whether a caller may keep going by fetching directly instead.
    /// Only cache outages qualify; nothing in this crate is retried.
    pub fn is_cache_fallthrough(&self) -> bool {
        matches!(self, VideoError::CacheUnavailable(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Infrastructure,
    Storage,
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, VideoError>;
