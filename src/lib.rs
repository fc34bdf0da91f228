pub mod cache;
pub mod config;
pub mod error;
pub mod publisher;
pub mod utils;
pub mod video_cache;
pub mod youtube;

pub use cache::{KeyValueStore, MemoryStore, RedisStore};
pub use config::{Config, DeliveryMode};
pub use error::{Result, VideoError};
pub use video_cache::{CacheSettings, VideoCache};
pub use youtube::{VideoRecord, VideoSource, YouTubeClient};
