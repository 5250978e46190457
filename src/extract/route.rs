//! URL routing for crawl entry points.

use regex::Regex;

use crate::error::{Error, Result};

/// The crawl view a route or queued URL resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    User,
    Timeline,
    Info,
    Avatar,
    Background,
    Hashtag,
}

/// A recognized entry point with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/user/<handle>`, the fan-out entry view.
    User(String),
    /// `/user/<handle>/timeline`
    Timeline(String),
    /// `/user/<handle>/info`
    Info(String),
    /// `/user/<handle>/avatar`
    Avatar(String),
    /// `/user/<handle>/background`
    Background(String),
    /// `/hashtag/<tag>[/page/<n>]`
    Hashtag { tag: String, page: Option<u64> },
}

impl Route {
    pub fn kind(&self) -> ViewKind {
        match self {
            Route::User(_) => ViewKind::User,
            Route::Timeline(_) => ViewKind::Timeline,
            Route::Info(_) => ViewKind::Info,
            Route::Avatar(_) => ViewKind::Avatar,
            Route::Background(_) => ViewKind::Background,
            Route::Hashtag { .. } => ViewKind::Hashtag,
        }
    }
}

const BASE_PATTERN: &str = r"^(?:https?://)?(?:www\.)?uraaka-joshi\.com";

/// Match a site URL against the recognized entry patterns.
pub fn route_url(url: &str) -> Result<Route> {
    let user_re =
        Regex::new(&format!(r"{BASE_PATTERN}/user/([^/?#]+)(?:/(timeline|info|avatar|background))?/?(?:$|[?#])"))
            .unwrap();
    let hashtag_re =
        Regex::new(&format!(r"{BASE_PATTERN}/hashtag/([^/?#]+?)(?:/page/(\d+))?/?(?:$|[?#])"))
            .unwrap();

    if let Some(caps) = user_re.captures(url) {
        let handle = caps[1].to_string();
        return Ok(match caps.get(2).map(|m| m.as_str()) {
            None => Route::User(handle),
            Some("timeline") => Route::Timeline(handle),
            Some("info") => Route::Info(handle),
            Some("avatar") => Route::Avatar(handle),
            Some("background") => Route::Background(handle),
            Some(_) => unreachable!(),
        });
    }

    if let Some(caps) = hashtag_re.captures(url) {
        return Ok(Route::Hashtag {
            tag: caps[1].to_string(),
            page: caps.get(2).and_then(|m| m.as_str().parse().ok()),
        });
    }

    Err(Error::UnsupportedUrl(url.to_string()))
}

/// Handle carried by a queued user URL, whatever site root built it.
///
/// Queued URLs are produced internally with the configured root, which may
/// differ from the public host, so they are not re-matched against
/// `route_url`. Dispatch uses the queue event's view kind and this helper.
pub fn queued_handle(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_routes() {
        assert_eq!(
            route_url("https://www.uraaka-joshi.com/user/alice").unwrap(),
            Route::User("alice".into())
        );
        assert_eq!(
            route_url("https://uraaka-joshi.com/user/alice/timeline").unwrap(),
            Route::Timeline("alice".into())
        );
        assert_eq!(
            route_url("uraaka-joshi.com/user/alice/info").unwrap(),
            Route::Info("alice".into())
        );
        assert_eq!(
            route_url("https://www.uraaka-joshi.com/user/alice/avatar/").unwrap(),
            Route::Avatar("alice".into())
        );
        assert_eq!(
            route_url("https://www.uraaka-joshi.com/user/alice/background").unwrap(),
            Route::Background("alice".into())
        );
    }

    #[test]
    fn test_hashtag_routes() {
        assert_eq!(
            route_url("https://www.uraaka-joshi.com/hashtag/cats").unwrap(),
            Route::Hashtag {
                tag: "cats".into(),
                page: None
            }
        );
        assert_eq!(
            route_url("https://www.uraaka-joshi.com/hashtag/cats/page/42").unwrap(),
            Route::Hashtag {
                tag: "cats".into(),
                page: Some(42)
            }
        );
    }

    #[test]
    fn test_queued_handle_ignores_site_root() {
        assert_eq!(
            queued_handle("https://www.uraaka-joshi.com/user/alice"),
            Some("alice")
        );
        assert_eq!(
            queued_handle("https://mirror.example/user/alice/"),
            Some("alice")
        );
        assert_eq!(queued_handle(""), None);
        assert_eq!(queued_handle("///"), None);
    }

    #[test]
    fn test_unrecognized_urls_are_rejected() {
        assert!(route_url("https://www.uraaka-joshi.com/search?q=x").is_err());
        assert!(route_url("https://example.com/user/alice").is_err());
        assert!(route_url("https://www.uraaka-joshi.com/user/alice/unknown").is_err());
    }
}
