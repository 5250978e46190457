//! Avatar and banner history crawl view.

use serde_json::Value;

use crate::api::{PagerOptions, Target, TimelineFetch, TimelinePager};
use crate::config::Config;
use crate::error::Result;
use crate::extract::decode_record;
use crate::extract::event::{metadata_of, Event, EventSink};
use crate::extract::media::{resolve_profile_images, ProfileImageKind};
use crate::extract::transform::transform_post;

/// Crawl the historical avatar or banner list of a user.
///
/// The history rides along on the first timeline record, so only one page is
/// fetched. File events carry the post metadata of that record with
/// `tweet_id` forced to 0 and a synthetic string `media_id`.
pub async fn run_profile_images(
    api: &dyn TimelineFetch,
    config: &Config,
    handle: &str,
    kind: ProfileImageKind,
    sink: &mut dyn EventSink,
) -> Result<()> {
    tracing::info!("Crawling {} history for {}", kind.label(), handle);
    let root = config.root();

    let mut pager = TimelinePager::new(
        api,
        Target::User(handle.to_string()),
        PagerOptions::single_page(),
    );

    let raw = match pager.try_next().await? {
        Some(raw) => raw,
        None => {
            tracing::warn!("No timeline records for {}, {} history unavailable", handle, kind.label());
            return Ok(());
        }
    };

    let record = decode_record(raw)?;
    let post = transform_post(&record, root);
    let images = resolve_profile_images(&record.screen_name, kind, handle);

    let mut dir_meta = metadata_of(&post)?;
    dir_meta.insert("tweet_id".to_string(), Value::from(0));
    sink.emit(Event::Directory(dir_meta.clone())).await?;

    for (index, image) in images.iter().enumerate() {
        let url = image.url(root);
        let mut metadata = dir_meta.clone();
        metadata.insert("url".to_string(), Value::from(url.clone()));
        metadata.insert(
            "media_id".to_string(),
            Value::from(format!("{}_{}", kind.label(), handle)),
        );
        metadata.insert("extension".to_string(), Value::from(image.extension()));
        metadata.insert("type".to_string(), Value::from(kind.label()));
        metadata.insert("file_name".to_string(), Value::from(image.file_name.clone()));
        metadata.insert("num".to_string(), Value::from(index + 1));

        sink.emit(Event::Url { url, metadata }).await?;
    }

    Ok(())
}
