//! Shared test helpers for creating BooruDownloader instances in tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::board::{BoardClient, Post, SearchPage, TagQuery};
use crate::config::Config;
use crate::downloader::BooruDownloader;
use crate::error::{FetchError, Result};
use crate::transport::Transport;
use crate::types::ResourceRef;

/// Scripted response for one URL
pub(crate) enum FakeResponse {
    /// Successful fetch with this payload, after an optional delay
    Payload {
        body: Vec<u8>,
        delay: Option<Duration>,
    },
    /// Failed fetch with this HTTP status
    Fail { status: u16 },
}

/// Transport fake: serves scripted responses and instruments concurrency
///
/// Tracks the number of calls and the maximum number of simultaneously
/// in-flight fetches, which is how the worker-pool bound is verified.
#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: HashMap<String, FakeResponse>,
    default_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Apply this delay to every scripted response without its own delay
    pub(crate) fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Script a successful fetch for `url`
    pub(crate) fn respond(&mut self, url: &str, body: &[u8]) {
        self.responses.insert(
            url.to_string(),
            FakeResponse::Payload {
                body: body.to_vec(),
                delay: None,
            },
        );
    }

    /// Script a successful fetch for `url` that completes after `delay`
    pub(crate) fn respond_after(&mut self, url: &str, body: &[u8], delay: Duration) {
        self.responses.insert(
            url.to_string(),
            FakeResponse::Payload {
                body: body.to_vec(),
                delay: Some(delay),
            },
        );
    }

    /// Script a failed fetch for `url`
    pub(crate) fn fail(&mut self, url: &str, status: u16) {
        self.responses
            .insert(url.to_string(), FakeResponse::Fail { status });
    }

    /// Total number of fetch calls observed
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Maximum number of fetches that were in flight at the same time
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, url: &Url) -> std::result::Result<Bytes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (result, delay) = match self.responses.get(url.as_str()) {
            Some(FakeResponse::Payload { body, delay }) => {
                (Ok(Bytes::from(body.clone())), delay.or(self.default_delay))
            }
            Some(FakeResponse::Fail { status }) => (
                Err(FetchError::Status { status: *status }),
                self.default_delay,
            ),
            None => (
                Err(FetchError::Connect(format!(
                    "no scripted response for {url}"
                ))),
                None,
            ),
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Board fake that always returns the same scripted posts
#[derive(Default)]
pub(crate) struct FakeBoard {
    pub(crate) posts: Vec<Post>,
    pub(crate) total_count: Option<u64>,
}

#[async_trait]
impl BoardClient for FakeBoard {
    async fn search(&self, _query: &TagQuery, limit: usize, _page: usize) -> Result<SearchPage> {
        Ok(SearchPage {
            posts: self.posts.iter().take(limit).cloned().collect(),
            total_count: self.total_count,
        })
    }
}

/// Create a test downloader around a scripted transport
pub(crate) fn create_test_downloader(
    config: Config,
    transport: Arc<FakeTransport>,
) -> BooruDownloader {
    BooruDownloader::with_parts(config, Arc::new(FakeBoard::default()), transport)
}

/// Create a test downloader with both a scripted board and transport
pub(crate) fn create_test_downloader_with_board(
    config: Config,
    board: FakeBoard,
    transport: Arc<FakeTransport>,
) -> BooruDownloader {
    BooruDownloader::with_parts(config, Arc::new(board), transport)
}

/// Resource URL used by [`make_resources`] for a given ordinal
pub(crate) fn resource_url(ordinal: u32) -> String {
    format!("http://img.test/{ordinal}.jpg")
}

/// Build `count` resources with ordinals `1..=count` and scripted-style URLs
pub(crate) fn make_resources(count: u32) -> Vec<ResourceRef> {
    (1..=count)
        .map(|ordinal| {
            let url = Url::parse(&resource_url(ordinal)).expect("static test URL parses");
            ResourceRef::new(ordinal, url)
        })
        .collect()
}

/// A post with the given ID, optional file URL, and tags
pub(crate) fn make_post(id: u64, file_url: Option<&str>, tags: &str) -> Post {
    Post {
        id,
        file_url: file_url.map(str::to_string),
        tags: tags.to_string(),
        rating: None,
    }
}
