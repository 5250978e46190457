//! Profile-info crawl view.

use crate::api::{PagerOptions, Target, TimelineFetch, TimelinePager};
use crate::config::Config;
use crate::error::Result;
use crate::extract::decode_record;
use crate::extract::event::{Event, EventSink, Metadata};
use crate::extract::transform::transform_post;

/// Emit the author snapshot of a user as a single directory event.
///
/// Fetches one page of the user's timeline and takes the snapshot from the
/// first record; a user with no records emits nothing.
pub async fn run_info(
    api: &dyn TimelineFetch,
    config: &Config,
    handle: &str,
    sink: &mut dyn EventSink,
) -> Result<()> {
    tracing::info!("Fetching profile info for {}", handle);

    let mut pager = TimelinePager::new(
        api,
        Target::User(handle.to_string()),
        PagerOptions::single_page(),
    );

    match pager.try_next().await? {
        Some(raw) => {
            let record = decode_record(raw)?;
            let post = transform_post(&record, config.root());

            let mut metadata = Metadata::new();
            metadata.insert("user".to_string(), serde_json::to_value(&post.user)?);
            sink.emit(Event::Directory(metadata)).await?;
        }
        None => {
            tracing::warn!("No timeline records for {}, profile info unavailable", handle);
        }
    }

    Ok(())
}
