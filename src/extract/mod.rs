//! Crawl views over the timeline endpoint.
//!
//! This module provides:
//! - Record normalization (posts, authors)
//! - Media URL derivation (post attachments, profile images)
//! - The crawl views (timeline, info, avatar, background, hashtag, user)
//! - URL routing and the emitted event stream

pub mod event;
pub mod hashtag;
pub mod info;
pub mod media;
pub mod profile;
pub mod route;
pub mod timeline;
pub mod transform;
pub mod user;

pub use event::{Event, EventSink, Metadata};
pub use hashtag::run_hashtag;
pub use info::run_info;
pub use media::{FileRecord, MediaKind, ProfileImage, ProfileImageKind};
pub use profile::run_profile_images;
pub use route::{queued_handle, route_url, Route, ViewKind};
pub use timeline::run_timeline;
pub use transform::{transform_post, Author, Post};
pub use user::run_user;

use crate::api::types::RawRecord;
use crate::error::{Error, Result};
use serde_json::Value;

/// Decode one raw timeline record.
///
/// Unlike page-level decode failures, a structurally unusable record is fatal
/// to the crawl processing it.
fn decode_record(raw: Value) -> Result<RawRecord> {
    let record: RawRecord = serde_json::from_value(raw)
        .map_err(|e| Error::Api(format!("Malformed timeline record: {}", e)))?;
    // An empty handle would leak into request parameters and media URLs.
    if record.user.screen_name.is_empty() {
        return Err(Error::Api(
            "Malformed timeline record: empty screen_name".to_string(),
        ));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_record_rejects_empty_handle() {
        let raw = json!({
            "user": {"id": 1, "screen_name": ""},
            "tweet": {"id": 2},
        });
        let err = decode_record(raw).unwrap_err();
        assert!(err.to_string().contains("screen_name"));
    }

    #[test]
    fn test_decode_record_accepts_minimal_record() {
        let raw = json!({
            "user": {"id": 1, "screen_name": "alice"},
            "tweet": {"id": 2},
        });
        assert!(decode_record(raw).is_ok());
    }
}
