//! Event stream contract between crawl views and the download pipeline.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::extract::route::ViewKind;

/// Free-form metadata attached to events.
pub type Metadata = serde_json::Map<String, Value>;

/// One element of the crawl output stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Opens a logical output group (carries the current author snapshot).
    Directory(Metadata),
    /// Requests one file download.
    Url { url: String, metadata: Metadata },
    /// Re-routes a URL to another view (hashtag fan-out).
    Queue { url: String, view: ViewKind },
}

/// Consumer of the crawl event stream.
///
/// Returning an error stops the crawl; the producing view issues no further
/// requests.
#[async_trait]
pub trait EventSink: Send {
    async fn emit(&mut self, event: Event) -> Result<()>;
}

/// Serialize a value into an event metadata map.
pub fn metadata_of<T: Serialize>(value: &T) -> Result<Metadata> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Api(format!(
            "Metadata must serialize to an object, got {}",
            other
        ))),
    }
}

/// Merge post metadata into file metadata, post fields winning on conflicts,
/// and stamp the 1-based sequence number.
pub fn merge_file_metadata(mut file: Metadata, post: &Metadata, num: usize) -> Metadata {
    for (key, value) in post {
        file.insert(key.clone(), value.clone());
    }
    file.insert("num".to_string(), Value::from(num));
    file
}
