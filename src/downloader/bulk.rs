//! Bulk fetch-archive pipeline
//!
//! Fetches every resource with a bounded worker pool and streams successful
//! payloads into one in-memory zip archive. Fetch workers never touch the
//! archive: completions are funneled over an mpsc channel into the single
//! coordinating task below, which owns the writer and the progress counters.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use super::BooruDownloader;
use crate::archive::ArchiveWriter;
use crate::board::TagQuery;
use crate::error::{FetchError, Result};
use crate::types::{ArchiveOutcome, ArchiveStats, Event, ResourceRef};

/// One finished fetch, reported back to the coordinating task
struct Completion {
    resource: ResourceRef,
    outcome: std::result::Result<Bytes, FetchError>,
}

impl BooruDownloader {
    /// Search the board and archive everything the query matched
    ///
    /// Convenience composing [`search`](Self::search), the post filter, and
    /// [`fetch_archive`](Self::fetch_archive).
    pub async fn archive_search(&self, query: &TagQuery, limit: usize) -> Result<ArchiveOutcome> {
        let posts = self.search(query, limit).await?;
        let resources = self.resources_from_posts(&posts);
        self.fetch_archive(resources).await
    }

    /// Run the bulk fetch-archive pipeline over the given resources
    ///
    /// At most `fetch.max_concurrent_fetches` fetches are in flight at once.
    /// Per-resource failures are isolated: they are logged, reported as
    /// [`Event::ResourceFailed`], counted in `failed`, and the run continues.
    /// Only an archive writer error aborts the run.
    ///
    /// An empty input is not an error: the result is a valid zero-entry
    /// archive, zeroed stats, and an [`Event::NothingToFetch`] emission, with
    /// no network calls made.
    pub async fn fetch_archive(&self, resources: Vec<ResourceRef>) -> Result<ArchiveOutcome> {
        let total = resources.len();
        let worker_limit = self.config.fetch.max_concurrent_fetches.max(1);

        if total == 0 {
            debug!("nothing to fetch");
            self.emit(Event::NothingToFetch);
            let archive = ArchiveWriter::new(self.config.archive.compression_level).finish()?;
            return Ok(ArchiveOutcome {
                archive,
                stats: ArchiveStats::default(),
            });
        }

        info!(total, worker_limit, "starting bulk fetch");
        self.emit(Event::ArchiveStarted { total });

        let semaphore = Arc::new(Semaphore::new(worker_limit));
        let (completion_tx, mut completion_rx) = mpsc::channel::<Completion>(worker_limit);

        for resource in resources {
            let semaphore = Arc::clone(&semaphore);
            let transport = Arc::clone(&self.transport);
            let completion_tx = completion_tx.clone();

            tokio::spawn(async move {
                // The permit bounds the number of in-flight fetches
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    // The semaphore is never closed while a run is live
                    Err(_) => return,
                };

                let outcome = transport.fetch(&resource.url).await;

                // A send error means the run was dropped; nothing to do
                let _ = completion_tx.send(Completion { resource, outcome }).await;
            });
        }
        drop(completion_tx);

        let mut writer = ArchiveWriter::new(self.config.archive.compression_level);
        let mut stats = ArchiveStats::default();
        let mut completed = 0usize;

        while let Some(done) = completion_rx.recv().await {
            let ordinal = done.resource.ordinal;
            match done.outcome {
                Ok(payload) => {
                    let name = done.resource.entry_name(&self.config.archive);
                    writer.add_entry(&name, &payload)?;
                    if let Some(annotation) = &done.resource.annotation {
                        writer.add_entry(
                            &done.resource.sidecar_name(&self.config.archive),
                            annotation.as_bytes(),
                        )?;
                    }
                    stats.succeeded += 1;
                    debug!(ordinal, entry = %name, bytes = payload.len(), "entry archived");
                }
                Err(error) => {
                    warn!(ordinal, error = %error, "resource fetch failed");
                    self.emit(Event::ResourceFailed {
                        ordinal,
                        error: error.to_string(),
                    });
                    stats.failed += 1;
                }
            }

            completed += 1;
            self.emit(Event::Progress { completed, total });
        }

        let archive = writer.finish()?;

        info!(
            succeeded = stats.succeeded,
            failed = stats.failed,
            "bulk fetch complete"
        );
        self.emit(Event::ArchiveFinished {
            succeeded: stats.succeeded,
            failed: stats.failed,
        });

        Ok(ArchiveOutcome { archive, stats })
    }
}
