//! Core types for booru-dl

use serde::{Deserialize, Serialize};
use std::io::Cursor;
use url::Url;

use crate::board::Post;
use crate::config::ArchiveConfig;

/// One remote resource scheduled for download
///
/// Immutable once constructed. The ordinal is assigned at filter time (see
/// [`ResourceRef::from_posts`]) and determines the archive entry name; it
/// carries no ordering guarantee for fetch completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRef {
    /// 1-based ordinal assigned at filter time; used only for entry naming
    pub ordinal: u32,
    /// Source URL the payload is fetched from
    pub url: Url,
    /// Optional annotation written as a `.txt` sidecar entry next to the
    /// image (the post's tag string, when sidecars are enabled)
    pub annotation: Option<String>,
}

impl ResourceRef {
    /// Create a resource from an already-validated URL
    pub fn new(ordinal: u32, url: Url) -> Self {
        Self {
            ordinal,
            url,
            annotation: None,
        }
    }

    /// Attach an annotation to be written as a sidecar entry
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Filter posts into a typed list of fetchable resources
    ///
    /// Posts without a parseable `file_url` are dropped here, before any
    /// scheduling happens, and never count toward a run's `total`. Ordinals
    /// are assigned 1-based over the surviving posts. When `with_tags` is
    /// set, each resource carries the post's tag string as its annotation.
    pub fn from_posts(posts: &[Post], with_tags: bool) -> Vec<Self> {
        let mut resources = Vec::new();
        for post in posts {
            let Some(raw) = post.file_url.as_deref() else {
                continue;
            };
            let Ok(url) = Url::parse(raw) else {
                tracing::debug!(post_id = post.id, url = raw, "skipping unparseable file_url");
                continue;
            };
            let ordinal = resources.len() as u32 + 1;
            let mut resource = Self::new(ordinal, url);
            if with_tags && !post.tags.is_empty() {
                resource.annotation = Some(post.tags.clone());
            }
            resources.push(resource);
        }
        resources
    }

    /// Archive entry name for this resource, derived from the ordinal alone
    pub fn entry_name(&self, archive: &ArchiveConfig) -> String {
        if archive.entry_extension.is_empty() {
            format!("{}{}", archive.entry_prefix, self.ordinal)
        } else {
            format!(
                "{}{}.{}",
                archive.entry_prefix, self.ordinal, archive.entry_extension
            )
        }
    }

    /// Sidecar entry name: same stem as the image entry, `.txt` extension
    pub fn sidecar_name(&self, archive: &ArchiveConfig) -> String {
        format!("{}{}.txt", archive.entry_prefix, self.ordinal)
    }
}

/// Summary statistics for one pipeline run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStats {
    /// Resources fetched and written into the archive
    pub succeeded: usize,
    /// Resources that failed to fetch (excluded from the archive)
    pub failed: usize,
}

impl ArchiveStats {
    /// Total resources processed (always equals the filtered input count)
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Result of one pipeline run: the sealed archive plus summary statistics
///
/// The buffer's read position is rewound to the beginning, so it can be
/// handed straight to any consumer that reads from the start.
#[derive(Debug)]
pub struct ArchiveOutcome {
    /// Sealed zip archive, read position at 0
    pub archive: Cursor<Vec<u8>>,
    /// Success/failure counts for the run
    pub stats: ArchiveStats,
}

impl ArchiveOutcome {
    /// Consume the outcome and return the raw archive bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.archive.into_inner()
    }
}

/// Event emitted over the progress channel during a pipeline run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A run started with this many resources to fetch
    ArchiveStarted {
        /// Filtered resource count for the run
        total: usize,
    },

    /// Progress update, emitted after every individual completion
    Progress {
        /// Resources completed so far (success or failure)
        completed: usize,
        /// Filtered resource count for the run
        total: usize,
    },

    /// One resource failed to fetch; the run continues without it
    ResourceFailed {
        /// Ordinal of the failing resource
        ordinal: u32,
        /// Human-readable failure description
        error: String,
    },

    /// The run finished and the archive is sealed
    ArchiveFinished {
        /// Resources written into the archive
        succeeded: usize,
        /// Resources that failed to fetch
        failed: usize,
    },

    /// The filtered input was empty; nothing was fetched
    NothingToFetch,
}
