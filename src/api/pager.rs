//! Cursor-driven pagination over the timeline endpoint.
//!
//! The upstream pagination scheme is not monotonic: the server reports the
//! page it served (`current`) and a suggested `next` page, and the pager must
//! jump directly to `next` rather than counting upward. The pager is a
//! pull-based lazy producer: records are buffered per page and the next page
//! is only requested once the buffer is drained, so at most one HTTP request
//! is in flight per crawl and dropping the pager stops all further requests.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;

use crate::api::types::TimelinePage;
use crate::error::Result;

/// Compute the `page_name` bucket for a page number.
///
/// Requests are grouped into buckets of 1000 pages; bucket boundaries fall at
/// page 999, 1999, 2999 and so on, zero-padded to six digits.
pub fn page_bucket(page_no: u64) -> String {
    format!("{:06}", (page_no / 1000) * 1000 + 999)
}

/// What a crawl is paginating over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    User(String),
    Hashtag(String),
}

impl Target {
    /// Value of the `json_item` request parameter.
    pub fn kind(&self) -> &'static str {
        match self {
            Target::User(_) => "user",
            Target::Hashtag(_) => "hashtag",
        }
    }

    /// Value of the `json_val` request parameter.
    pub fn value(&self) -> &str {
        match self {
            Target::User(handle) => handle,
            Target::Hashtag(tag) => tag,
        }
    }
}

/// Page-fetching seam between the pager and the HTTP client.
#[async_trait]
pub trait TimelineFetch: Send + Sync {
    async fn timeline_page(&self, target: &Target, page_no: u64) -> Result<TimelinePage>;
}

/// Pagination options for one crawl.
#[derive(Debug, Clone)]
pub struct PagerOptions {
    /// First page to request (default 1).
    pub page_start: u64,
    /// Stop after this many pages have been fetched.
    pub max_pages: Option<u64>,
    /// Externally supplied resumption cursor; overrides `page_start`.
    pub cursor: Option<u64>,
    /// When false, cursor updates become no-ops.
    pub track_cursor: bool,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            page_start: 1,
            max_pages: None,
            cursor: None,
            track_cursor: true,
        }
    }
}

impl PagerOptions {
    /// Options for views that only need the first page.
    pub fn single_page() -> Self {
        Self {
            max_pages: Some(1),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagerState {
    /// Next fetch will request this page.
    Fetch(u64),
    /// Pagination has stopped; only the buffer remains.
    Done,
}

/// Lazy pull-based producer of raw timeline records.
pub struct TimelinePager<'a> {
    api: &'a dyn TimelineFetch,
    target: Target,
    state: PagerState,
    buffer: VecDeque<Value>,
    pages_fetched: u64,
    max_pages: Option<u64>,
    track_cursor: bool,
    resume_page: Option<u64>,
}

impl<'a> TimelinePager<'a> {
    pub fn new(api: &'a dyn TimelineFetch, target: Target, options: PagerOptions) -> Self {
        let start = options.cursor.unwrap_or(options.page_start).max(1);
        Self {
            api,
            target,
            state: PagerState::Fetch(start),
            buffer: VecDeque::new(),
            pages_fetched: 0,
            max_pages: options.max_pages,
            track_cursor: options.track_cursor,
            resume_page: options.cursor,
        }
    }

    /// Produce the next raw record, fetching pages as needed.
    ///
    /// Returns `Ok(None)` once the feed is exhausted. Transport and decode
    /// failures are treated as end-of-feed and never surfaced; structural
    /// errors in individual records are the consumer's concern.
    pub async fn try_next(&mut self) -> Result<Option<Value>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some(record));
            }

            let page_no = match self.state {
                PagerState::Done => return Ok(None),
                PagerState::Fetch(page_no) => page_no,
            };

            // Page limit applies before the next fetch, leaving the cursor
            // pointing at the page a resumed crawl should request.
            if let Some(limit) = self.max_pages {
                if self.pages_fetched >= limit {
                    self.state = PagerState::Done;
                    return Ok(None);
                }
            }

            let page = match self.api.timeline_page(&self.target, page_no).await {
                Ok(page) => page,
                Err(e) if e.is_end_of_feed() => {
                    // Keep the last reported cursor so an operator can resume
                    // from the page that failed.
                    tracing::debug!("Stopping pagination at page {}: {}", page_no, e);
                    self.state = PagerState::Done;
                    return Ok(None);
                }
                Err(e) => {
                    self.state = PagerState::Done;
                    return Err(e);
                }
            };
            self.pages_fetched += 1;

            if page.data.is_empty() {
                tracing::debug!("No data in page {}, stopping", page_no);
                self.update_cursor(None);
                self.state = PagerState::Done;
                continue;
            }
            self.buffer.extend(page.data);

            // Jump to the server-suggested page; a missing or non-increasing
            // `next` ends the feed.
            match page.next {
                Some(next) if next > page.current => {
                    self.update_cursor(Some(next));
                    self.state = PagerState::Fetch(next);
                }
                _ => {
                    self.update_cursor(None);
                    self.state = PagerState::Done;
                }
            }
        }
    }

    /// The page number a fresh crawl should start from to resume this one,
    /// or `None` after natural termination.
    pub fn resume_page(&self) -> Option<u64> {
        self.resume_page
    }

    fn update_cursor(&mut self, value: Option<u64>) {
        if self.track_cursor {
            self.resume_page = value;
        }
    }
}
