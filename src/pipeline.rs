//! Download pipeline: consumes the crawl event stream.

use std::path::PathBuf;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::UraakaApi;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::{Event, EventSink, Metadata, ViewKind};
use crate::fs::{author_dir, ensure_dir, event_filename};

/// Counters for one crawl.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrawlStats {
    pub photos: u64,
    pub videos: u64,
    pub profile_images: u64,
    pub text_posts: u64,
    pub skipped: u64,
}

impl CrawlStats {
    pub fn total_downloaded(&self) -> u64 {
        self.photos + self.videos + self.profile_images + self.text_posts
    }

    pub fn add(&mut self, other: &CrawlStats) {
        self.photos += other.photos;
        self.videos += other.videos;
        self.profile_images += other.profile_images;
        self.text_posts += other.text_posts;
        self.skipped += other.skipped;
    }
}

/// What a file event resolves to on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileClass {
    Photo,
    Video,
    ProfileImage,
    Text,
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v"];

/// Classify a file event.
///
/// The merged metadata's `type` field carries the post type (post fields win
/// on merge), so classification falls back to structural cues: a string
/// `media_id` marks a profile image, an empty URL a text entry.
fn classify(url: &str, metadata: &Metadata) -> FileClass {
    if url.is_empty() {
        return FileClass::Text;
    }
    if metadata.get("media_id").map(Value::is_string).unwrap_or(false) {
        return FileClass::ProfileImage;
    }
    let extension = metadata
        .get("extension")
        .and_then(Value::as_str)
        .unwrap_or("");
    if VIDEO_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()) {
        FileClass::Video
    } else {
        FileClass::Photo
    }
}

/// Event sink that mirrors files to disk and collects queued fan-out URLs.
pub struct DownloadPipeline<'a> {
    api: &'a UraakaApi,
    config: &'a Config,
    current_dir: Option<PathBuf>,
    pub queued: Vec<(String, ViewKind)>,
    pub stats: CrawlStats,
}

impl<'a> DownloadPipeline<'a> {
    pub fn new(api: &'a UraakaApi, config: &'a Config) -> Self {
        Self {
            api,
            config,
            current_dir: None,
            queued: Vec::new(),
            stats: CrawlStats::default(),
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.current_dir
            .clone()
            .unwrap_or_else(|| self.config.download_directory())
    }

    async fn handle_directory(&mut self, metadata: &Metadata) -> Result<()> {
        let handle = metadata
            .get("user")
            .and_then(|u| u.get("screen_name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        self.current_dir = Some(author_dir(self.config, handle)?);
        Ok(())
    }

    async fn handle_url(&mut self, url: &str, metadata: &Metadata) -> Result<()> {
        let dir = self.output_dir();
        let output_path = dir.join(event_filename(metadata)?);

        if output_path.exists() {
            tracing::debug!("Skipping existing file: {}", output_path.display());
            self.stats.skipped += 1;
            return Ok(());
        }
        ensure_dir(&dir).await?;

        let class = classify(url, metadata);
        match class {
            FileClass::Text => {
                let content = metadata
                    .get("content")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                tokio::fs::write(&output_path, content).await?;
                self.stats.text_posts += 1;
            }
            _ => {
                self.stream_to_file(url, &output_path).await?;
                match class {
                    FileClass::Photo => self.stats.photos += 1,
                    FileClass::Video => self.stats.videos += 1,
                    FileClass::ProfileImage => self.stats.profile_images += 1,
                    FileClass::Text => unreachable!(),
                }
            }
        }

        if self.config.options.show_downloads {
            tracing::info!("Downloaded: {}", output_path.display());
        }
        Ok(())
    }

    async fn stream_to_file(&self, url: &str, output_path: &PathBuf) -> Result<()> {
        let response = self.api.download_file(url).await?;

        let mut file = File::create(output_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl EventSink for DownloadPipeline<'_> {
    async fn emit(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Directory(metadata) => self.handle_directory(&metadata).await,
            Event::Url { url, metadata } => self.handle_url(&url, &metadata).await,
            Event::Queue { url, view } => {
                self.queued.push((url, view));
                Ok(())
            }
        }
    }
}
