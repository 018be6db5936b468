//! Board search API client
//!
//! A thin, paginated client for booru-style `dapi` endpoints
//! (`index.php?page=dapi&s=post&q=index&json=1`). Search is a parameter-
//! building wrapper around one bounded-timeout GET; the interesting work
//! happens downstream in the fetch-archive pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::BoardConfig;
use crate::error::{Error, Result};

/// One post as returned by the board's search API
///
/// Only the fields the pipeline consumes are modeled. `file_url` may be
/// absent (deleted or restricted posts); such posts are dropped at filter
/// time and never scheduled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    /// Board-side post ID
    pub id: u64,

    /// Direct URL of the full-size file, when available
    #[serde(default)]
    pub file_url: Option<String>,

    /// Space-separated tag string attached to the post
    #[serde(default)]
    pub tags: String,

    /// Content rating, when the board provides one
    #[serde(default)]
    pub rating: Option<String>,
}

/// One page of search results
#[derive(Clone, Debug, Default)]
pub struct SearchPage {
    /// Posts on this page (may be fewer than requested: best effort, no padding)
    pub posts: Vec<Post>,
    /// Server-side total match count, when the board reports one
    pub total_count: Option<u64>,
}

/// A positive/negative tag query
///
/// Renders as the board's `tags` parameter: include tags first, then
/// `-`-prefixed exclude tags, space-separated. Duplicates are dropped on
/// insertion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagQuery {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl TagQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from a mixed tag list, classifying `-`-prefixed tags as
    /// excludes
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut query = Self::new();
        for tag in tags {
            let tag = tag.as_ref();
            match tag.strip_prefix('-') {
                Some(bare) => query.add_exclude(bare),
                None => query.add_include(tag),
            }
        }
        query
    }

    /// Add a tag the results must carry
    pub fn include(mut self, tag: impl AsRef<str>) -> Self {
        self.add_include(tag.as_ref());
        self
    }

    /// Add a tag the results must not carry
    pub fn exclude(mut self, tag: impl AsRef<str>) -> Self {
        self.add_exclude(tag.as_ref());
        self
    }

    fn add_include(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.include.iter().any(|t| t == tag) {
            self.include.push(tag.to_string());
        }
    }

    fn add_exclude(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.exclude.iter().any(|t| t == tag) {
            self.exclude.push(tag.to_string());
        }
    }

    /// Whether the query has no tags at all
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Render the board's `tags` parameter value
    pub fn render(&self) -> String {
        let mut parts: Vec<String> = self.include.clone();
        parts.extend(self.exclude.iter().map(|t| format!("-{t}")));
        parts.join(" ")
    }
}

impl std::fmt::Display for TagQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Search interface to a booru-style board
///
/// Trait object at the seam so tests can substitute a scripted board.
#[async_trait]
pub trait BoardClient: Send + Sync {
    /// Fetch one page of posts matching the query
    ///
    /// `page` is 0-based (the board's `pid` parameter). Fewer results than
    /// `limit` means the board ran out of matches; no further pages are
    /// fetched to pad the count.
    async fn search(&self, query: &TagQuery, limit: usize, page: usize) -> Result<SearchPage>;
}

/// Raw response envelope from the dapi endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "@attributes")]
    attributes: Option<SearchAttributes>,
    // A response with zero matches omits the "post" field entirely
    #[serde(default)]
    post: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct SearchAttributes {
    #[serde(default)]
    count: Option<u64>,
}

/// HTTP implementation of [`BoardClient`]
#[derive(Clone)]
pub struct HttpBoardClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    user_id: Option<String>,
}

impl HttpBoardClient {
    /// Build a client from board configuration
    pub fn new(config: &BoardConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.search_timeout)
            .user_agent(concat!("booru-dl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            user_id: config.user_id.clone(),
        })
    }

    /// Build a client with an explicit timeout (primarily for tests)
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("booru-dl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: None,
            user_id: None,
        })
    }
}

#[async_trait]
impl BoardClient for HttpBoardClient {
    async fn search(&self, query: &TagQuery, limit: usize, page: usize) -> Result<SearchPage> {
        let mut params: Vec<(&str, String)> = vec![
            ("page", "dapi".to_string()),
            ("s", "post".to_string()),
            ("q", "index".to_string()),
            ("json", "1".to_string()),
            ("tags", query.render()),
            ("limit", limit.to_string()),
            ("pid", page.to_string()),
        ];
        if let Some(api_key) = &self.api_key {
            params.push(("api_key", api_key.clone()));
        }
        if let Some(user_id) = &self.user_id {
            params.push(("user_id", user_id.clone()));
        }

        tracing::debug!(tags = %query, limit, page, "searching board");

        let response = self.client.get(&self.base_url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            return Err(Error::Board {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response.json().await?;
        let total_count = body.attributes.and_then(|a| a.count);

        tracing::debug!(
            returned = body.post.len(),
            total_count,
            "board search complete"
        );

        Ok(SearchPage {
            posts: body.post,
            total_count,
        })
    }
}
