//! Configuration structures and loading logic.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::client::DEFAULT_ROOT;
use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub targets: TargetsConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Crawl targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    /// Site URLs routed through the URL patterns.
    #[serde(default)]
    pub urls: Vec<String>,

    /// User handles, crawled through the user entry view.
    #[serde(default)]
    pub users: Vec<String>,

    /// Hashtags, crawled through the hashtag fan-out view.
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl TargetsConfig {
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.users.is_empty() && self.hashtags.is_empty()
    }
}

/// Site endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site root URL.
    #[serde(default = "default_root")]
    pub root: String,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            user_agent: default_user_agent(),
        }
    }
}

/// Crawl and download options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Whether video attachments are downloaded; when false the photo
    /// variant of an attachment is used instead.
    #[serde(default = "default_true")]
    pub videos: bool,

    /// Whether posts without media emit a text entry.
    #[serde(default)]
    pub text_posts: bool,

    /// Sub-views run by the user entry view. Timeline is on by default,
    /// the rest are opt-in.
    #[serde(default = "default_true")]
    pub timeline: bool,
    #[serde(default)]
    pub info: bool,
    #[serde(default)]
    pub avatar: bool,
    #[serde(default)]
    pub background: bool,

    /// Start page for hashtag crawls.
    #[serde(default = "default_page_start")]
    pub page_start: u64,

    /// Fetch at most this many pages per hashtag crawl.
    #[serde(default)]
    pub max_pages: Option<u64>,

    /// Resumption cursor from a previous hashtag crawl; overrides
    /// `page_start`.
    #[serde(default)]
    pub cursor: Option<u64>,

    /// When false, cursor tracking is disabled (pagination unchanged).
    #[serde(default = "default_true")]
    pub track_cursor: bool,

    /// Politeness delay range between requests, milliseconds.
    #[serde(default = "default_delay_min")]
    pub delay_min_ms: u64,
    #[serde(default = "default_delay_max")]
    pub delay_max_ms: u64,

    /// Whether to log each completed download.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            videos: true,
            text_posts: false,
            timeline: true,
            info: false,
            avatar: false,
            background: false,
            page_start: 1,
            max_pages: None,
            cursor: None,
            track_cursor: true,
            delay_min_ms: default_delay_min(),
            delay_max_ms: default_delay_max(),
            show_downloads: true,
        }
    }
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36".to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_start() -> u64 {
    1
}

fn default_delay_min() -> u64 {
    500
}

fn default_delay_max() -> u64 {
    1500
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Normalized site root, without trailing slash.
    pub fn root(&self) -> &str {
        self.site.root.trim_end_matches('/')
    }
}
