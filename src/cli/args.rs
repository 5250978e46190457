//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Uraaka-joshi content downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "uraaka-downloader",
    version,
    about = "Mirror user timelines and profile images from uraaka-joshi",
    long_about = "A CLI tool to mirror posts, media and avatar/banner history \
                  from uraaka-joshi users and hashtag feeds.\n\n\
                  Accepts site URLs (user pages, view pages, hashtag pages) or \
                  plain handles/tags via --user and --hashtag."
)]
pub struct Args {
    /// Site URLs to crawl (user, user view, or hashtag pages).
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// User handle(s) to crawl.
    #[arg(short, long, num_args = 1..)]
    pub user: Option<Vec<String>>,

    /// Hashtag(s) to fan out over.
    #[arg(long = "hashtag", num_args = 1..)]
    pub hashtags: Option<Vec<String>>,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Site root URL override.
    #[arg(long, env = "URAAKA_ROOT")]
    pub root: Option<String>,

    /// Start page for hashtag crawls.
    #[arg(long)]
    pub page: Option<u64>,

    /// Resume cursor from a previous hashtag crawl (overrides --page).
    #[arg(long)]
    pub cursor: Option<u64>,

    /// Fetch at most this many pages per hashtag crawl.
    #[arg(long)]
    pub max_pages: Option<u64>,

    /// Skip video attachments (photo variants are used instead).
    #[arg(long)]
    pub no_videos: bool,

    /// Emit text entries for posts without media.
    #[arg(long)]
    pub text_posts: bool,

    /// Also crawl profile info for each user.
    #[arg(long)]
    pub info: bool,

    /// Also crawl avatar history for each user.
    #[arg(long)]
    pub avatar: bool,

    /// Also crawl banner history for each user.
    #[arg(long)]
    pub background: bool,

    /// Skip the timeline sub-view (useful with --info/--avatar/--background).
    #[arg(long)]
    pub no_timeline: bool,

    /// Disable cursor tracking (pagination behavior is unchanged).
    #[arg(long)]
    pub no_cursor: bool,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide per-download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where
    /// specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if !self.urls.is_empty() {
            config.targets.urls = self.urls;
        }
        if let Some(users) = self.user {
            config.targets.users = users;
        }
        if let Some(hashtags) = self.hashtags {
            config.targets.hashtags = hashtags;
        }

        if let Some(dir) = self.download_directory {
            config.options.download_directory = Some(dir);
        }
        if let Some(root) = self.root {
            config.site.root = root;
        }
        if let Some(page) = self.page {
            config.options.page_start = page;
        }
        if let Some(cursor) = self.cursor {
            config.options.cursor = Some(cursor);
        }
        if let Some(max_pages) = self.max_pages {
            config.options.max_pages = Some(max_pages);
        }

        // Boolean flags only override their non-default direction
        if self.no_videos {
            config.options.videos = false;
        }
        if self.text_posts {
            config.options.text_posts = true;
        }
        if self.info {
            config.options.info = true;
        }
        if self.avatar {
            config.options.avatar = true;
        }
        if self.background {
            config.options.background = true;
        }
        if self.no_timeline {
            config.options.timeline = false;
        }
        if self.no_cursor {
            config.options.track_cursor = false;
        }
        if self.quiet {
            config.options.show_downloads = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_targets_and_flags() {
        let args = Args::parse_from([
            "uraaka-downloader",
            "--user",
            "alice",
            "--no-videos",
            "--avatar",
            "--cursor",
            "17",
        ]);
        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.targets.users, vec!["alice"]);
        assert!(!config.options.videos);
        assert!(config.options.avatar);
        assert_eq!(config.options.cursor, Some(17));
        // Defaults untouched
        assert!(config.options.timeline);
        assert!(config.options.track_cursor);
    }
}
