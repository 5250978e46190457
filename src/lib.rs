//! Uraaka Downloader - timeline mirroring for uraaka-joshi.com
//!
//! This library crawls the site's single JSON timeline endpoint and mirrors
//! user posts, media and profile-image history.
//!
//! # Features
//!
//! - Cursor-driven pagination with externally resumable hashtag crawls
//! - Timeline, profile-info, avatar and banner history views
//! - Hashtag fan-out into per-user crawls
//! - Tiered media-URL derivation (video strictly dominates photo)
//! - Uniform politeness delay between requests
//!
//! # Example
//!
//! ```no_run
//! use uraaka_downloader::{Config, DownloadPipeline, UraakaApi};
//! use uraaka_downloader::extract::run_timeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let api = UraakaApi::new(
//!         config.root().to_string(),
//!         &config.site.user_agent,
//!         (config.options.delay_min_ms, config.options.delay_max_ms),
//!     )?;
//!
//!     let mut pipeline = DownloadPipeline::new(&api, &config);
//!     run_timeline(&api, &config, "some_user", &mut pipeline).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fs;
pub mod output;
pub mod pipeline;

// Re-exports for convenience
pub use api::{PagerOptions, Target, TimelineFetch, TimelinePager, UraakaApi};
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{route_url, Event, EventSink, Route};
pub use pipeline::{CrawlStats, DownloadPipeline};
