//! Uraaka-joshi HTTP client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Local;
use rand::Rng;
use reqwest::{Client, Response};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::api::pager::{page_bucket, Target, TimelineFetch};
use crate::api::types::TimelinePage;
use crate::error::{Error, Result};

/// Default site root.
pub const DEFAULT_ROOT: &str = "https://www.uraaka-joshi.com";

/// Uraaka-joshi API client with uniform politeness delay.
pub struct UraakaApi {
    client: Client,
    root: String,
    delay_ms: (u64, u64),
    last_request: Mutex<Option<Instant>>,
}

impl UraakaApi {
    /// Create a new API client.
    pub fn new(root: String, user_agent: &str, delay_ms: (u64, u64)) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            root: root.trim_end_matches('/').to_string(),
            delay_ms,
            last_request: Mutex::new(None),
        })
    }

    /// Site root URL, without trailing slash.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Enforce the minimum delay between consecutive requests to the host.
    ///
    /// Applied uniformly to every request, regardless of which view issued
    /// it. The delay is randomized within the configured range.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let (min, max) = self.delay_ms;
            let wait = Duration::from_millis(rand::thread_rng().gen_range(min..=max));
            let elapsed = previous.elapsed();
            if elapsed < wait {
                sleep(wait - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Make a throttled GET request.
    async fn get(&self, url: &str, params: &[(&str, String)]) -> Result<Response> {
        self.throttle().await;

        tracing::debug!("GET {} {:?}", url, params);
        let response = self.client.get(url).query(params).send().await?;
        tracing::debug!("Response status: {}", response.status());

        Ok(response)
    }

    /// Download a file from a URL, returning the streaming response.
    pub async fn download_file(&self, url: &str) -> Result<Response> {
        self.throttle().await;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl TimelineFetch for UraakaApi {
    /// Fetch one page of the timeline endpoint.
    ///
    /// Request parameters follow the upstream scheme: `page_name` groups
    /// requests into buckets of 1000 pages, `one_char` is sent for user
    /// queries only, and `time` is a wall-clock freshness stamp.
    async fn timeline_page(&self, target: &Target, page_no: u64) -> Result<TimelinePage> {
        let mut params = vec![
            ("json_item", target.kind().to_string()),
            ("json_val", target.value().to_string()),
        ];
        if let Target::User(handle) = target {
            let one_char = handle.chars().next().unwrap_or_default();
            params.push(("one_char", one_char.to_string()));
        }
        params.push(("page_name", page_bucket(page_no)));
        params.push(("page_no", page_no.to_string()));
        params.push(("time", Local::now().format("%Y%m%d%H%M").to_string()));

        let url = format!("{}/json/timeline/", self.root);
        let response = self.get(&url, &params).await?;

        let text = response.text().await?;
        let page: TimelinePage = serde_json::from_str(&text)?;
        Ok(page)
    }
}
