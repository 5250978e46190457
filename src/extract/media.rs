//! Media URL derivation from raw records.

use serde::Serialize;

use crate::api::types::{RawProfileEntry, RawRecord};
use crate::extract::transform::parse_created;

/// Kind of a post attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

/// One downloadable file derived from a post attachment.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub url: String,
    pub media_id: i64,
    pub extension: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub width: u32,
    pub height: u32,
}

/// Substring after the final dot, empty when there is none.
fn file_extension(name: &str) -> &str {
    name.rfind('.').map(|i| &name[i + 1..]).unwrap_or("")
}

/// Derive downloadable files from a post's media list.
///
/// Per attachment a video filename strictly dominates a photo filename: an
/// attachment never yields both. With `videos` disabled the video filename is
/// ignored and the photo (if any) is used instead.
pub fn resolve_post_media(record: &RawRecord, root: &str, videos: bool) -> Vec<FileRecord> {
    if record.media.is_empty() {
        return Vec::new();
    }

    let handle = &record.user.screen_name;
    let one_char = handle.chars().next().unwrap_or_default();

    // Both date segments fall back to the literal "unknown" rather than
    // failing the file when the post timestamp does not parse.
    let (date_folder, timestamp_folder) = match parse_created(&record.tweet.created) {
        Some(dt) => (
            dt.format("%Y%m").to_string(),
            dt.format("%Y%m%d%H%M%S").to_string(),
        ),
        None => ("unknown".to_string(), "unknown".to_string()),
    };

    let mut files = Vec::new();
    for media in &record.media {
        let (file_name, kind, width, height) = if videos && !media.video_file_name.is_empty() {
            (&media.video_file_name, MediaKind::Video, 0, 0)
        } else if !media.photo_file_name.is_empty() {
            (
                &media.photo_file_name,
                MediaKind::Photo,
                media.photo_width,
                media.photo_height,
            )
        } else {
            continue;
        };

        files.push(FileRecord {
            url: format!(
                "{}/media/{}/{}/{}/{}/{}",
                root, one_char, handle, date_folder, timestamp_folder, file_name
            ),
            media_id: media.id,
            extension: file_extension(file_name).to_string(),
            kind,
            width,
            height,
        });
    }

    files
}

/// Which half of the profile history list a crawl is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImageKind {
    Avatar,
    Background,
}

impl ProfileImageKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileImageKind::Avatar => "avatar",
            ProfileImageKind::Background => "background",
        }
    }
}

/// One historically observed avatar or banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub screen_name: String,
    pub file_name: String,
    pub kind: ProfileImageKind,
}

impl ProfileImage {
    /// Profile images live under a date-independent path.
    pub fn url(&self, root: &str) -> String {
        let one_char = self.screen_name.chars().next().unwrap_or_default();
        format!(
            "{}/media/{}/{}/profile/{}",
            root, one_char, self.screen_name, self.file_name
        )
    }

    /// Extension of the filename, defaulting to `jpg` when there is no dot.
    ///
    /// The default is deliberately asymmetric with post media, which yields
    /// an empty extension; this mirrors observed upstream behavior.
    pub fn extension(&self) -> &str {
        let ext = file_extension(&self.file_name);
        if ext.is_empty() {
            "jpg"
        } else {
            ext
        }
    }
}

/// Resolve the avatar or banner history of a record.
///
/// De-duplicated by filename in first-seen order; the first occurrence's
/// handle wins. Entries without a handle fall back to the crawl handle.
pub fn resolve_profile_images(
    entries: &[RawProfileEntry],
    kind: ProfileImageKind,
    fallback_handle: &str,
) -> Vec<ProfileImage> {
    let mut seen = std::collections::HashSet::new();
    let mut images = Vec::new();

    for entry in entries {
        let file_name = match kind {
            ProfileImageKind::Avatar => &entry.avatar_file_name,
            ProfileImageKind::Background => &entry.banner_file_name,
        };
        if file_name.is_empty() || !seen.insert(file_name.clone()) {
            continue;
        }

        let screen_name = if entry.screen_name.is_empty() {
            fallback_handle
        } else {
            &entry.screen_name
        };
        images.push(ProfileImage {
            screen_name: screen_name.to_string(),
            file_name: file_name.clone(),
            kind,
        });
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(media: serde_json::Value, created: &str) -> RawRecord {
        serde_json::from_value(json!({
            "user": {"id": 1, "screen_name": "alice"},
            "tweet": {"id": 99, "text": "", "created": created},
            "media": media,
        }))
        .unwrap()
    }

    #[test]
    fn test_video_dominates_photo() {
        let r = record(
            json!([{"id": 7, "video_file_name": "a.mp4", "photo_file_name": "b.jpg"}]),
            "2023-07-13 06:03:38",
        );
        let files = resolve_post_media(&r, "https://example.com", true);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, MediaKind::Video);
        assert_eq!(
            files[0].url,
            "https://example.com/media/a/alice/202307/20230713060338/a.mp4"
        );
        assert_eq!(files[0].extension, "mp4");
    }

    #[test]
    fn test_videos_disabled_falls_back_to_photo() {
        let r = record(
            json!([{"id": 7, "video_file_name": "a.mp4", "photo_file_name": "b.jpg"}]),
            "2023-07-13 06:03:38",
        );
        let files = resolve_post_media(&r, "https://example.com", false);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, MediaKind::Photo);
    }

    #[test]
    fn test_photo_dimensions_default_to_zero() {
        let r = record(json!([{"id": 7, "photo_file_name": "b.jpg"}]), "");
        let files = resolve_post_media(&r, "https://example.com", true);
        assert_eq!(files.len(), 1);
        assert_eq!((files[0].width, files[0].height), (0, 0));
    }

    #[test]
    fn test_unparseable_date_yields_unknown_segments() {
        let r = record(json!([{"id": 7, "photo_file_name": "b.jpg"}]), "garbage");
        let files = resolve_post_media(&r, "https://example.com", true);
        assert_eq!(
            files[0].url,
            "https://example.com/media/a/alice/unknown/unknown/b.jpg"
        );
    }

    #[test]
    fn test_post_media_without_dot_has_empty_extension() {
        let r = record(json!([{"id": 7, "photo_file_name": "noext"}]), "");
        let files = resolve_post_media(&r, "https://example.com", true);
        assert_eq!(files[0].extension, "");
    }

    #[test]
    fn test_empty_attachment_is_skipped() {
        let r = record(json!([{"id": 7}]), "");
        assert!(resolve_post_media(&r, "https://example.com", true).is_empty());
    }

    #[test]
    fn test_profile_images_dedup_first_seen() {
        let entries: Vec<RawProfileEntry> = serde_json::from_value(json!([
            {"screen_name": "old_name", "avatar_file_name": "one.png"},
            {"screen_name": "new_name", "avatar_file_name": "one.png"},
            {"screen_name": "new_name", "avatar_file_name": "two.png"},
            {"screen_name": "new_name"},
        ]))
        .unwrap();

        let images = resolve_profile_images(&entries, ProfileImageKind::Avatar, "alice");
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].file_name, "one.png");
        assert_eq!(images[0].screen_name, "old_name");
        assert_eq!(images[1].file_name, "two.png");
    }

    #[test]
    fn test_profile_image_url_and_default_extension() {
        let image = ProfileImage {
            screen_name: "alice".into(),
            file_name: "banner_noext".into(),
            kind: ProfileImageKind::Background,
        };
        assert_eq!(
            image.url("https://example.com"),
            "https://example.com/media/a/alice/profile/banner_noext"
        );
        assert_eq!(image.extension(), "jpg");

        let image = ProfileImage {
            screen_name: "alice".into(),
            file_name: "av.png".into(),
            kind: ProfileImageKind::Avatar,
        };
        assert_eq!(image.extension(), "png");
    }
}
