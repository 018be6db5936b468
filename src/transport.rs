//! Payload transport
//!
//! One fetch is one bounded-timeout HTTP GET with no retry. The trait seam
//! exists so the pipeline can be exercised against instrumented fakes.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use url::Url;

use crate::error::{FetchError, Result};

/// Fetches one payload from a URL
///
/// Implementations must be cheap to share: the pipeline clones the trait
/// object handle into each worker task.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the payload at `url`
    ///
    /// Success means a 2xx status and a fully read body; anything else is a
    /// [`FetchError`], which the pipeline treats as a per-resource failure.
    async fn fetch(&self, url: &Url) -> std::result::Result<Bytes, FetchError>;
}

/// HTTP implementation of [`Transport`]
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport with the given per-fetch timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("booru-dl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> std::result::Result<Bytes, FetchError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else if e.is_connect() {
                FetchError::Connect(e.to_string())
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let declared_len = response.content_length();

        let payload = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        // A payload only counts as fetched when it matches its declared size
        if let Some(expected) = declared_len {
            let actual = payload.len() as u64;
            if actual != expected {
                return Err(FetchError::Truncated { expected, actual });
            }
        }

        Ok(payload)
    }
}
