//! Hashtag fan-out crawl view.

use std::collections::HashSet;

use crate::api::{PagerOptions, Target, TimelineFetch, TimelinePager};
use crate::config::Config;
use crate::error::Result;
use crate::extract::decode_record;
use crate::extract::event::{Event, EventSink};
use crate::extract::route::ViewKind;

/// Crawl a hashtag feed and queue each distinct author for a user crawl.
///
/// Authors are queued exactly once, in first-seen order; no file events are
/// emitted directly. An externally supplied cursor overrides the configured
/// start page, and the terminal cursor is surfaced to the operator as a
/// resumption instruction. Returns the terminal cursor.
pub async fn run_hashtag(
    api: &dyn TimelineFetch,
    config: &Config,
    tag: &str,
    page_start: Option<u64>,
    sink: &mut dyn EventSink,
) -> Result<Option<u64>> {
    tracing::info!("Crawling hashtag #{}", tag);
    let root = config.root();

    let options = PagerOptions {
        page_start: page_start.unwrap_or(config.options.page_start),
        max_pages: config.options.max_pages,
        cursor: config.options.cursor,
        track_cursor: config.options.track_cursor,
    };
    let mut pager = TimelinePager::new(api, Target::Hashtag(tag.to_string()), options);

    let mut seen = HashSet::new();
    let result = loop {
        match pager.try_next().await {
            Ok(Some(raw)) => {
                let record = match decode_record(raw) {
                    Ok(record) => record,
                    Err(e) => break Err(e),
                };
                let handle = record.user.screen_name;
                if seen.insert(handle.clone()) {
                    sink.emit(Event::Queue {
                        url: format!("{}/user/{}", root, handle),
                        view: ViewKind::User,
                    })
                    .await?;
                }
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    // The cursor is reported however the crawl ended, so an interrupted or
    // limited crawl can be picked up where it stopped.
    let resume = pager.resume_page();
    match resume {
        Some(page) => tracing::info!(
            "Hashtag #{} crawl stopped before the end; resume with --page {}",
            tag,
            page
        ),
        None => tracing::debug!("Hashtag #{} feed exhausted", tag),
    }

    result.map(|_| resume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{user_record, ScriptedFetch, VecSink};
    use serde_json::json;

    fn queued_urls(sink: &VecSink) -> Vec<String> {
        sink.events
            .iter()
            .map(|e| match e {
                Event::Queue { url, view } => {
                    assert_eq!(*view, ViewKind::User);
                    url.clone()
                }
                other => panic!("expected queue event, got {:?}", other),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_distinct_authors_queued_in_first_seen_order() {
        let fetch = ScriptedFetch::pages(vec![
            (
                1,
                json!({
                    "data": [
                        user_record("a", 1, json!([])),
                        user_record("b", 2, json!([])),
                    ],
                    "current": 1,
                    "next": 2,
                }),
            ),
            (
                2,
                json!({
                    "data": [
                        user_record("a", 3, json!([])),
                        user_record("c", 4, json!([])),
                    ],
                    "current": 2,
                    "next": null,
                }),
            ),
        ]);
        let mut sink = VecSink::default();

        let resume = run_hashtag(&fetch, &Config::default(), "cats", None, &mut sink)
            .await
            .unwrap();

        assert_eq!(
            queued_urls(&sink),
            vec![
                "https://www.uraaka-joshi.com/user/a",
                "https://www.uraaka-joshi.com/user/b",
                "https://www.uraaka-joshi.com/user/c",
            ]
        );
        assert_eq!(resume, None);
    }

    #[tokio::test]
    async fn test_queued_urls_follow_configured_root() {
        let fetch = ScriptedFetch::pages(vec![(
            1,
            json!({
                "data": [user_record("a", 1, json!([]))],
                "current": 1,
                "next": null,
            }),
        )]);
        let mut config = Config::default();
        config.site.root = "https://mirror.example".to_string();
        let mut sink = VecSink::default();

        run_hashtag(&fetch, &config, "cats", None, &mut sink)
            .await
            .unwrap();

        assert_eq!(queued_urls(&sink), vec!["https://mirror.example/user/a"]);
    }

    #[tokio::test]
    async fn test_cursor_overrides_start_page() {
        let fetch = ScriptedFetch::pages(vec![(
            7,
            json!({
                "data": [user_record("a", 1, json!([]))],
                "current": 7,
                "next": null,
            }),
        )]);
        let mut config = Config::default();
        config.options.cursor = Some(7);
        let mut sink = VecSink::default();

        run_hashtag(&fetch, &config, "cats", Some(3), &mut sink)
            .await
            .unwrap();

        assert_eq!(fetch.requested(), vec![7]);
        assert_eq!(queued_urls(&sink).len(), 1);
    }

    #[tokio::test]
    async fn test_page_limit_surfaces_resume_cursor() {
        let fetch = ScriptedFetch::pages(vec![
            (
                1,
                json!({
                    "data": [user_record("a", 1, json!([]))],
                    "current": 1,
                    "next": 5,
                }),
            ),
            (
                5,
                json!({
                    "data": [user_record("b", 2, json!([]))],
                    "current": 5,
                    "next": null,
                }),
            ),
        ]);
        let mut config = Config::default();
        config.options.max_pages = Some(1);
        let mut sink = VecSink::default();

        let resume = run_hashtag(&fetch, &config, "cats", None, &mut sink)
            .await
            .unwrap();

        assert_eq!(resume, Some(5));
        assert_eq!(queued_urls(&sink).len(), 1);
    }
}
