//! Core downloader implementation split into focused submodules.
//!
//! The `BooruDownloader` struct and its methods are organized by domain:
//! - [`search`] - board search and post filtering
//! - [`bulk`] - the bulk fetch-archive pipeline

mod bulk;
mod search;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::board::{BoardClient, HttpBoardClient};
use crate::config::Config;
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use crate::types::Event;

/// Capacity of the progress event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct BooruDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Board search client (trait object for pluggable implementations)
    pub(crate) board: Arc<dyn BoardClient>,
    /// Payload transport (trait object for pluggable implementations)
    pub(crate) transport: Arc<dyn Transport>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
}

impl BooruDownloader {
    /// Create a downloader with HTTP board and transport clients
    ///
    /// Validates the configuration first; see [`Config::validate`].
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let board: Arc<dyn BoardClient> = Arc::new(HttpBoardClient::new(&config.board)?);
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(config.fetch.fetch_timeout)?);

        Ok(Self::with_parts(config, board, transport))
    }

    /// Create a downloader with caller-supplied board and transport
    ///
    /// This is the seam tests use to substitute scripted fakes; it performs
    /// no config validation.
    pub fn with_parts(
        config: Config,
        board: Arc<dyn BoardClient>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            config: Arc::new(config),
            board,
            transport,
            event_tx,
        }
    }

    /// Subscribe to progress events
    ///
    /// Each receiver sees every event emitted after it subscribes. Slow
    /// consumers that fall more than the channel capacity behind observe a
    /// `Lagged` error rather than blocking the pipeline.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Subscribe to progress events as a `Stream`
    pub fn event_stream(&self) -> BroadcastStream<Event> {
        BroadcastStream::new(self.subscribe())
    }

    /// Access the downloader's configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Emit an event; a send error only means nobody is subscribed
    pub(crate) fn emit(&self, event: Event) {
        let _ = self.event_tx.send(event);
    }
}
