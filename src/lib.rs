//! # booru-dl
//!
//! Bulk image fetch-and-archive backend for booru-style image boards.
//!
//! ## Design Philosophy
//!
//! booru-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers subscribe to progress events, no polling required
//! - **Failure-isolating** - One bad image never aborts a bulk run
//! - **Transient** - Everything happens in memory; nothing touches disk
//!
//! ## Quick Start
//!
//! ```no_run
//! use booru_dl::{BooruDownloader, Config, TagQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = BooruDownloader::new(Config::default())?;
//!
//!     // Subscribe to progress events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let query = TagQuery::new().include("landscape").exclude("monochrome");
//!     let outcome = downloader.archive_search(&query, 10).await?;
//!     println!(
//!         "archived {} images ({} failed)",
//!         outcome.stats.succeeded, outcome.stats.failed
//!     );
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// In-memory archive writer
pub mod archive;
/// Board search API client
pub mod board;
/// Configuration types
pub mod config;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Payload transport
pub mod transport;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use archive::ArchiveWriter;
pub use board::{BoardClient, HttpBoardClient, Post, SearchPage, TagQuery};
pub use config::{ArchiveConfig, BoardConfig, Config, FetchConfig};
pub use downloader::BooruDownloader;
pub use error::{ArchiveError, Error, FetchError, Result};
pub use transport::{HttpTransport, Transport};
pub use types::{ArchiveOutcome, ArchiveStats, Event, ResourceRef};
