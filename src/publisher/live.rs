//! Live mode: serve the latest record to the page layer on every request.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use futures::future::{BoxFuture, FutureExt};
use log::{error, info};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::{Result, VideoError},
    youtube::{VideoRecord, VideoSource},
};

/// Shown to page visitors; the real cause only goes to the log.
pub const PAGE_ERROR_MESSAGE: &str = "Failed to load latest video";

/// Data handed to the page renderer, same shape as the page load result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageData {
    pub video: VideoRecord,
}

/// Either a record already in hand or one still being fetched.
pub enum PageVideo {
    Ready(VideoRecord),
    Pending(BoxFuture<'static, Result<VideoRecord>>),
}

impl PageVideo {
    pub async fn resolve(self) -> Result<VideoRecord> {
        match self {
            PageVideo::Ready(record) => Ok(record),
            PageVideo::Pending(fut) => fut.await,
        }
    }
}

/// Wraps whichever source the delivery mode picked (cache or direct client).
#[derive(Clone)]
pub struct PageLoader {
    source: Arc<dyn VideoSource>,
}

impl PageLoader {
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self { source }
    }

    pub async fn load(&self) -> Result<PageData> {
        let video = self.source.fetch_latest().await?;
        Ok(PageData { video })
    }

    /// Starts the fetch in the background and returns immediately.
    pub fn load_deferred(&self) -> PageVideo {
        let source = self.source.clone();
        let handle = tokio::spawn(async move { source.fetch_latest().await });
        PageVideo::Pending(
            handle
                .map(|joined| {
                    joined.unwrap_or_else(|e| {
                        Err(VideoError::NetworkError(format!("Fetch task failed: {}", e)))
                    })
                })
                .boxed(),
        )
    }
}

/// Live page server
pub struct LiveServer {
    bind_addr: String,
    loader: PageLoader,
}

impl LiveServer {
    pub fn new(bind_addr: &str, loader: PageLoader) -> Self {
        Self {
            bind_addr: bind_addr.to_string(),
            loader,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = router(self.loader);
        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;

        info!("Live video server listening on {}", self.bind_addr);
        info!("Latest video available at /youtube");

        axum::serve(listener, app).await?;
        Ok(())
    }
}

pub fn router(loader: PageLoader) -> Router {
    Router::new()
        .route("/youtube", get(youtube_page))
        .route("/health", get(health_check))
        .with_state(loader)
}

async fn youtube_page(State(loader): State<PageLoader>) -> Response {
    match loader.load().await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            error!("Failed to load latest video ({:?}): {}", e.categorize(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": PAGE_ERROR_MESSAGE })),
            )
                .into_response()
        }
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "latest-video",
        "timestamp": chrono::Utc::now().timestamp()
    }))
}
