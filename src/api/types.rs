//! Timeline API response type definitions.
//!
//! The site exposes a single JSON endpoint whose records are only loosely
//! structured: numeric ids sometimes arrive as strings, optional fields are
//! omitted entirely, and the `data` array may contain entries this tool does
//! not understand. The envelope therefore keeps records as raw JSON values;
//! individual records are decoded to [`RawRecord`] at the point of use so
//! that a single broken record fails that record, not the whole page.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One page of the `/json/timeline/` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TimelinePage {
    /// Raw timeline records, decoded per-record downstream.
    #[serde(default)]
    pub data: Vec<Value>,

    /// Page number the server actually served.
    #[serde(default = "default_current")]
    pub current: u64,

    /// Server-suggested next page, absent or null at end-of-feed.
    #[serde(default)]
    pub next: Option<u64>,
}

fn default_current() -> u64 {
    1
}

/// One fully-decoded timeline record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub user: RawUser,
    pub tweet: RawTweet,
    #[serde(default)]
    pub media: Vec<RawMedia>,
    /// Historical avatar/banner entries for the record's author.
    #[serde(default)]
    pub screen_name: Vec<RawProfileEntry>,
}

/// Author fields as they appear on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    pub screen_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub followers_count: i64,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub public_date: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub followers_ranking: i64,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub avatar_file_name: String,
    #[serde(default)]
    pub banner_file_name: String,
}

/// Post fields as they appear on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTweet {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created: String,
    #[serde(default, rename = "type")]
    pub post_type: String,
    #[serde(default)]
    pub access_ranking: String,
}

/// One media attachment on a post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: i64,
    #[serde(default)]
    pub photo_file_name: String,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub photo_width: u32,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub photo_height: u32,
    #[serde(default)]
    pub video_file_name: String,
}

/// One entry of the author's avatar/banner history list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProfileEntry {
    #[serde(default)]
    pub screen_name: String,
    #[serde(default)]
    pub avatar_file_name: String,
    #[serde(default)]
    pub banner_file_name: String,
}

/// Parse a JSON number-or-string into an integer, defaulting to 0.
///
/// The upstream API is inconsistent about numeric encoding; a malformed id
/// never fails the record.
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_int(&Value::deserialize(deserializer)?))
}

fn lenient_dimension<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_int(&Value::deserialize(deserializer)?).try_into().unwrap_or(0))
}

/// Lenient integer conversion: numbers pass through, numeric strings are
/// parsed, anything else becomes 0.
pub fn parse_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_int_lenient() {
        assert_eq!(parse_int(&json!(42)), 42);
        assert_eq!(parse_int(&json!("42")), 42);
        assert_eq!(parse_int(&json!("not a number")), 0);
        assert_eq!(parse_int(&json!(null)), 0);
        assert_eq!(parse_int(&json!([1, 2])), 0);
    }

    #[test]
    fn test_record_with_string_ids() {
        let record: RawRecord = serde_json::from_value(json!({
            "user": {"id": "123", "screen_name": "alice"},
            "tweet": {"id": "456", "text": "hi", "created": "2023-07-13 06:03:38"},
        }))
        .unwrap();
        assert_eq!(record.user.id, 123);
        assert_eq!(record.tweet.id, 456);
        assert!(record.media.is_empty());
        assert!(record.screen_name.is_empty());
    }

    #[test]
    fn test_record_missing_handle_fails() {
        let result: std::result::Result<RawRecord, _> = serde_json::from_value(json!({
            "user": {"id": 1},
            "tweet": {"id": 2},
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_user_fields_default() {
        let user: RawUser =
            serde_json::from_value(json!({"id": 1, "screen_name": "bob"})).unwrap();
        assert_eq!(user.followers_ranking, 0);
        assert!(!user.protected);
        assert!(!user.suspended);
        assert!(user.hashtags.is_empty());
        assert!(user.avatar_file_name.is_empty());
    }

    #[test]
    fn test_page_envelope_defaults() {
        let page: TimelinePage = serde_json::from_value(json!({})).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.current, 1);
        assert_eq!(page.next, None);
    }
}
