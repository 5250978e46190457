//! Uraaka-joshi API module.
//!
//! This module provides:
//! - HTTP client for the site's JSON timeline endpoint
//! - Cursor-driven pagination engine
//! - Wire-format response types

pub mod client;
pub mod pager;
pub mod types;

pub use client::{UraakaApi, DEFAULT_ROOT};
pub use pager::{page_bucket, PagerOptions, Target, TimelineFetch, TimelinePager};
pub use types::{RawMedia, RawProfileEntry, RawRecord, RawTweet, RawUser, TimelinePage};
