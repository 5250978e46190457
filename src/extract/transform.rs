//! Raw record normalization into post and author values.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::api::types::RawRecord;

/// Timestamp format used by the upstream API.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalized author snapshot, reconstructed fresh from every raw record.
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub id: i64,
    pub screen_name: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub followers_count: i64,
    pub created: String,
    pub public_date: String,
    pub followers_ranking: i64,
    pub protected: bool,
    pub suspended: bool,
    pub hashtags: Vec<String>,
    pub avatar_file_name: String,
    pub banner_file_name: String,
    pub avatar_url: String,
    pub banner_url: String,
}

/// Normalized post, owning its author snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub tweet_id: i64,
    /// Raw text, verbatim from the wire.
    pub text: String,
    /// HTML-unescaped text.
    pub content: String,
    /// Creation timestamp as received; preserved even when unparseable.
    pub created: String,
    /// Parsed creation instant, `None` when `created` did not parse.
    pub date: Option<NaiveDateTime>,
    #[serde(rename = "type")]
    pub post_type: String,
    pub access_ranking: String,
    pub user: Author,
}

/// Parse an upstream timestamp, `None` on failure.
pub fn parse_created(created: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(created, DATE_FORMAT).ok()
}

/// Transform one raw record into a normalized post.
pub fn transform_post(record: &RawRecord, root: &str) -> Post {
    let raw_user = &record.user;
    let raw_tweet = &record.tweet;

    let avatar_url = if raw_user.avatar_file_name.is_empty() {
        String::new()
    } else {
        format!("{}/images/avatar/{}", root, raw_user.avatar_file_name)
    };
    let banner_url = if raw_user.banner_file_name.is_empty() {
        String::new()
    } else {
        format!("{}/images/banner/{}", root, raw_user.banner_file_name)
    };

    let user = Author {
        id: raw_user.id,
        screen_name: raw_user.screen_name.clone(),
        name: raw_user.name.clone(),
        description: raw_user.description.clone(),
        location: raw_user.location.clone(),
        followers_count: raw_user.followers_count,
        created: raw_user.created.clone(),
        public_date: raw_user.public_date.clone(),
        followers_ranking: raw_user.followers_ranking,
        protected: raw_user.protected,
        suspended: raw_user.suspended,
        hashtags: raw_user.hashtags.clone(),
        avatar_file_name: raw_user.avatar_file_name.clone(),
        banner_file_name: raw_user.banner_file_name.clone(),
        avatar_url,
        banner_url,
    };

    Post {
        tweet_id: raw_tweet.id,
        text: raw_tweet.text.clone(),
        content: html_escape::decode_html_entities(&raw_tweet.text).into_owned(),
        created: raw_tweet.created.clone(),
        date: parse_created(&raw_tweet.created),
        post_type: raw_tweet.post_type.clone(),
        access_ranking: raw_tweet.access_ranking.clone(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(tweet: serde_json::Value, user: serde_json::Value) -> RawRecord {
        serde_json::from_value(json!({"user": user, "tweet": tweet})).unwrap()
    }

    #[test]
    fn test_content_is_unescaped_text_kept_raw() {
        let r = record(
            json!({"id": 1, "text": "a &amp; b &lt;c&gt;", "created": ""}),
            json!({"id": 2, "screen_name": "alice"}),
        );
        let post = transform_post(&r, "https://example.com");
        assert_eq!(post.text, "a &amp; b &lt;c&gt;");
        assert_eq!(post.content, "a & b <c>");
    }

    #[test]
    fn test_date_parsed_from_created() {
        let r = record(
            json!({"id": 1, "text": "", "created": "2023-07-13 06:03:38"}),
            json!({"id": 2, "screen_name": "alice"}),
        );
        let post = transform_post(&r, "https://example.com");
        let date = post.date.unwrap();
        assert_eq!(date.format("%Y%m%d%H%M%S").to_string(), "20230713060338");
    }

    #[test]
    fn test_unparseable_date_preserves_raw_string() {
        let r = record(
            json!({"id": 1, "text": "", "created": "yesterday-ish"}),
            json!({"id": 2, "screen_name": "alice"}),
        );
        let post = transform_post(&r, "https://example.com");
        assert_eq!(post.date, None);
        assert_eq!(post.created, "yesterday-ish");
    }

    #[test]
    fn test_profile_urls_only_when_filenames_present() {
        let r = record(
            json!({"id": 1, "text": "", "created": ""}),
            json!({"id": 2, "screen_name": "alice", "avatar_file_name": "av.png"}),
        );
        let post = transform_post(&r, "https://example.com");
        assert_eq!(post.user.avatar_url, "https://example.com/images/avatar/av.png");
        assert_eq!(post.user.banner_url, "");
    }
}
