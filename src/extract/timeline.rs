//! User timeline crawl view.

use serde_json::Value;

use crate::api::{PagerOptions, Target, TimelineFetch, TimelinePager};
use crate::config::Config;
use crate::error::Result;
use crate::extract::decode_record;
use crate::extract::event::{merge_file_metadata, metadata_of, Event, EventSink};
use crate::extract::media::resolve_post_media;
use crate::extract::transform::transform_post;

/// Crawl a user's full timeline, emitting a directory event plus numbered
/// file events per post.
///
/// Posts with no resolvable media are skipped unless `text_posts` is enabled,
/// in which case they emit a single empty-URL text entry.
pub async fn run_timeline(
    api: &dyn TimelineFetch,
    config: &Config,
    handle: &str,
    sink: &mut dyn EventSink,
) -> Result<()> {
    tracing::info!("Crawling timeline for {}", handle);
    let root = config.root();

    let mut pager = TimelinePager::new(
        api,
        Target::User(handle.to_string()),
        PagerOptions::default(),
    );

    while let Some(raw) = pager.try_next().await? {
        let record = decode_record(raw)?;
        let post = transform_post(&record, root);
        let files = resolve_post_media(&record, root, config.options.videos);

        if files.is_empty() && !config.options.text_posts {
            continue;
        }

        let post_meta = metadata_of(&post)?;
        sink.emit(Event::Directory(post_meta.clone())).await?;

        if files.is_empty() {
            let mut meta = post_meta;
            meta.insert("num".to_string(), Value::from(1));
            meta.insert("url".to_string(), Value::from(""));
            meta.insert("extension".to_string(), Value::from("txt"));
            sink.emit(Event::Url {
                url: String::new(),
                metadata: meta,
            })
            .await?;
            continue;
        }

        for (index, file) in files.iter().enumerate() {
            let metadata = merge_file_metadata(metadata_of(file)?, &post_meta, index + 1);
            sink.emit(Event::Url {
                url: file.url.clone(),
                metadata,
            })
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::test_support::{user_record, ScriptedFetch, VecSink};
    use serde_json::json;

    #[tokio::test]
    async fn test_posts_without_media_are_skipped() {
        let fetch = ScriptedFetch::single_page(vec![
            user_record("alice", 1, json!([])),
            user_record("alice", 2, json!([{"id": 5, "photo_file_name": "p.jpg"}])),
        ]);
        let mut sink = VecSink::default();

        run_timeline(&fetch, &Config::default(), "alice", &mut sink)
            .await
            .unwrap();

        // Only the post with media produced events: one directory, one file.
        assert_eq!(sink.events.len(), 2);
        match &sink.events[0] {
            Event::Directory(meta) => assert_eq!(meta["tweet_id"], json!(2)),
            other => panic!("expected directory event, got {:?}", other),
        }
        match &sink.events[1] {
            Event::Url { url, metadata } => {
                assert!(url.ends_with("/p.jpg"));
                assert_eq!(metadata["num"], json!(1));
                assert_eq!(metadata["tweet_id"], json!(2));
                assert_eq!(metadata["media_id"], json!(5));
            }
            other => panic!("expected url event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_files_are_numbered_from_one() {
        let fetch = ScriptedFetch::single_page(vec![user_record(
            "alice",
            1,
            json!([
                {"id": 5, "photo_file_name": "a.jpg"},
                {"id": 6, "video_file_name": "b.mp4"},
            ]),
        )]);
        let mut sink = VecSink::default();

        run_timeline(&fetch, &Config::default(), "alice", &mut sink)
            .await
            .unwrap();

        let nums: Vec<_> = sink
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Url { metadata, .. } => Some(metadata["num"].clone()),
                _ => None,
            })
            .collect();
        assert_eq!(nums, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_text_posts_emit_empty_url_entry() {
        let fetch = ScriptedFetch::single_page(vec![user_record("alice", 1, json!([]))]);
        let mut config = Config::default();
        config.options.text_posts = true;
        let mut sink = VecSink::default();

        run_timeline(&fetch, &config, "alice", &mut sink).await.unwrap();

        assert_eq!(sink.events.len(), 2);
        match &sink.events[1] {
            Event::Url { url, metadata } => {
                assert!(url.is_empty());
                assert_eq!(metadata["extension"], json!("txt"));
                assert_eq!(metadata["num"], json!(1));
            }
            other => panic!("expected url event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_structurally_broken_record_is_fatal() {
        let fetch = ScriptedFetch::single_page(vec![json!({"tweet": {"id": 1}})]);
        let mut sink = VecSink::default();

        let result = run_timeline(&fetch, &Config::default(), "alice", &mut sink).await;
        assert!(result.is_err());
    }
}
