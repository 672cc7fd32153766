//! The orchestration pipeline: drives extraction and summarization across
//! all enabled sources and collects the digest.
//!
//! Failure isolation is the point of this module. A source whose front page
//! cannot be fetched is skipped; an item whose article cannot be fetched or
//! summarized is dropped; the run always completes and returns whatever
//! succeeded. An empty digest is a valid outcome, not an error.
//!
//! Two schedulers drive the same per-source and per-item operations: a
//! serial loop and a bounded worker pool. The pool uses ordered buffering
//! (`buffered`, not `buffer_unordered`), so digest order is always
//! configured-source order then extraction order, no matter which items
//! finish first.

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::extract::Extractor;
use crate::models::{Digest, NewsSource, RawNewsItem, SummarizedNewsItem};
use crate::summarize::Summarizer;

/// How sources and items are driven through the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// One source fully processed before the next begins.
    Sequential,
    /// Up to `workers` sources in flight, and up to `workers` items in
    /// flight within each source.
    Concurrent { workers: usize },
}

/// Drives the end-to-end run and owns the sources for its duration.
pub struct Pipeline {
    extractor: Extractor,
    summarizer: Summarizer,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(extractor: Extractor, summarizer: Summarizer, cancel: CancellationToken) -> Self {
        Self {
            extractor,
            summarizer,
            cancel,
        }
    }

    /// Process every enabled source and return the digest.
    ///
    /// Always completes, even when every source fails or the run is
    /// cancelled mid-flight; items that finished before cancellation are
    /// preserved.
    #[instrument(level = "info", skip_all, fields(schedule = ?schedule))]
    pub async fn run(&self, sources: &[NewsSource], schedule: Schedule) -> Digest {
        let enabled: Vec<&NewsSource> = sources.iter().filter(|s| s.enabled).collect();
        info!(
            enabled = enabled.len(),
            configured = sources.len(),
            "Starting pipeline run"
        );

        let digest: Digest = match schedule {
            Schedule::Sequential => {
                let mut digest = Vec::new();
                for source in enabled {
                    digest.extend(self.process_source(source, 1).await);
                }
                digest
            }
            Schedule::Concurrent { workers } => {
                let workers = workers.max(1);
                stream::iter(enabled)
                    .map(|source| self.process_source(source, workers))
                    .buffered(workers)
                    .collect::<Vec<Vec<SummarizedNewsItem>>>()
                    .await
                    .into_iter()
                    .flatten()
                    .collect()
            }
        };

        info!(items = digest.len(), "Pipeline run complete");
        digest
    }

    /// Extract one source and summarize its items, in extraction order.
    ///
    /// Source-level isolation lives here: any failure produces an empty
    /// contribution and the run moves on.
    async fn process_source(
        &self,
        source: &NewsSource,
        item_workers: usize,
    ) -> Vec<SummarizedNewsItem> {
        // Cancellation wins ties so an already-cancelled run never starts
        // new work.
        let items = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!(source = %source.name, "Run cancelled before extraction finished");
                return Vec::new();
            }
            result = self.extractor.run(&source.url) => match result {
                Ok(items) => items,
                Err(e) => {
                    error!(source = %source.name, error = %e, "Source extraction failed; skipping source");
                    return Vec::new();
                }
            },
        };

        stream::iter(items)
            .map(|item| self.process_item(source, item))
            .buffered(item_workers)
            .collect::<Vec<Option<SummarizedNewsItem>>>()
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Summarize one item and stamp it with its source's name.
    ///
    /// Item-level isolation lives here: a failed or cancelled item is
    /// dropped without touching its siblings.
    async fn process_item(
        &self,
        source: &NewsSource,
        item: RawNewsItem,
    ) -> Option<SummarizedNewsItem> {
        let url = item.url.clone();
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!(source = %source.name, %url, "Run cancelled; dropping in-flight item");
                None
            }
            result = self.summarizer.run(item) => match result {
                Ok(mut summarized) => {
                    summarized.source = source.name.clone();
                    Some(summarized)
                }
                Err(e) => {
                    error!(source = %source.name, %url, error = %e, "Summarization failed; dropping item");
                    None
                }
            },
        }
    }
}
