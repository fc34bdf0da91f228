// src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use latest_video::{
    cache::RedisStore,
    config::{load_config, Config, DeliveryMode},
    publisher::{LiveServer, PageLoader, SnapshotOutcome, SnapshotPublisher},
    utils::setup_logging,
    video_cache::{CacheSettings, VideoCache},
    youtube::{VideoSource, YouTubeClient},
};
use log::{error, info, warn};
use std::{path::PathBuf, sync::Arc};

#[derive(Parser)]
#[command(name = "latest-video", about = "Publish a channel's latest video for the web page")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the latest video live on each page request
    Serve {
        /// Overrides BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Refresh the static snapshot file once
    Snapshot {
        /// Overrides SNAPSHOT_PATH
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Fetch once from the API and print the record as JSON
    Fetch,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to initialize logging")?;
    let cli = Cli::parse();

    let app_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load application configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = Arc::new(YouTubeClient::from_config(&app_config)?);

    match cli.command {
        Command::Serve { bind } => serve(&app_config, client, bind).await,
        Command::Snapshot { path } => {
            let path = path.unwrap_or_else(|| app_config.snapshot_path.clone());
            let publisher = SnapshotPublisher::new(client, path);
            let outcome = publisher.run().await?;
            info!("Snapshot run for {} finished: {:?}", publisher.path().display(), outcome);
            if outcome == SnapshotOutcome::Aborted {
                info!("Previous snapshot left in place");
            }
            Ok(())
        }
        Command::Fetch => {
            let record = client.fetch_latest().await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    }
}

async fn serve(config: &Config, client: Arc<YouTubeClient>, bind: Option<String>) -> Result<()> {
    let source: Arc<dyn VideoSource> = match config.delivery_mode {
        DeliveryMode::Direct => client as Arc<dyn VideoSource>,
        DeliveryMode::Cached => match RedisStore::new(&config.redis_url).await {
            Ok(store) => Arc::new(VideoCache::new(
                client,
                Arc::new(store),
                CacheSettings::from_config(config),
            )) as Arc<dyn VideoSource>,
            Err(e) if e.is_cache_fallthrough() => {
                warn!("Redis unavailable ({}), serving directly from the API", e);
                client as Arc<dyn VideoSource>
            }
            Err(e) => return Err(e.into()),
        },
    };
    info!("Live delivery mode: {}", config.delivery_mode);

    let bind_addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    LiveServer::new(&bind_addr, PageLoader::new(source)).start().await?;
    Ok(())
}
