//! Error types for booru-dl
//!
//! This module provides the error taxonomy for the library:
//! - Per-resource fetch failures ([`FetchError`]), recovered locally by the
//!   pipeline and never fatal to a run
//! - Archive writer failures ([`ArchiveError`]), fatal to the run
//! - Top-level errors ([`Error`]) for configuration, board search, and
//!   everything that propagates to the caller

use thiserror::Error;

/// Result type alias for booru-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for booru-dl
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "fetch.max_concurrent_fetches")
        key: Option<String>,
    },

    /// Board API returned a non-success status for a search request
    #[error("board returned status {status}: {message}")]
    Board {
        /// HTTP status code returned by the board
        status: u16,
        /// Response body or status reason, whichever was available
        message: String,
    },

    /// Archive writer error, fatal to the whole run
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Network error (search request transport failure)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A URL could not be parsed
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL string
        url: String,
        /// Why it failed to parse
        reason: String,
    },
}

/// Per-resource fetch failures
///
/// These are recovered locally by the pipeline: the failing resource is
/// logged, reported over the event channel with its ordinal, counted in
/// `failed`, and the run continues. A [`FetchError`] never aborts a run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Fetch exceeded the configured timeout
    #[error("timed out after {timeout_secs}s")]
    Timeout {
        /// The configured per-fetch timeout in seconds
        timeout_secs: u64,
    },

    /// Connection to the remote host failed
    #[error("connection failed: {0}")]
    Connect(String),

    /// Remote returned a non-2xx status
    #[error("unexpected status {status}")]
    Status {
        /// The HTTP status code that was returned
        status: u16,
    },

    /// Reading the response body failed mid-stream
    #[error("failed to read body: {0}")]
    Body(String),

    /// Payload length did not match the declared Content-Length
    #[error("truncated payload: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes declared by the Content-Length header
        expected: u64,
        /// Bytes actually received
        actual: u64,
    },
}

/// Archive writer errors
///
/// Unlike fetch failures, a writer error is fatal: the run aborts and the
/// error surfaces to the caller. No partial archive is promised as usable.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Writing an entry into the archive failed
    #[error("failed to write entry {name}: {reason}")]
    EntryWrite {
        /// Name of the entry that failed
        name: String,
        /// The underlying failure
        reason: String,
    },

    /// An entry with this name already exists in the archive
    #[error("duplicate entry name: {name}")]
    DuplicateEntry {
        /// The colliding entry name
        name: String,
    },

    /// Finalizing the archive failed
    #[error("failed to finalize archive: {0}")]
    Finish(String),
}
