//! Article summarization: one raw item in, one summarized item out.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiError, Assistant};
use crate::fetch::{html_to_text, ContentFetcher, FetchError};
use crate::limit::CallBudget;
use crate::models::{RawNewsItem, SummarizedNewsItem};

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("failed to fetch article: {0}")]
    Fetch(#[from] FetchError),
    #[error("summarization call failed: {0}")]
    Api(#[from] ApiError),
    #[error("summarization returned empty text")]
    EmptySummary,
}

/// Fetches an article, reduces it to plain text, and asks the capability
/// for a two-to-three-sentence summary.
pub struct Summarizer {
    fetcher: Arc<dyn ContentFetcher>,
    assistant: Arc<dyn Assistant>,
    budget: Arc<CallBudget>,
}

impl Summarizer {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        assistant: Arc<dyn Assistant>,
        budget: Arc<CallBudget>,
    ) -> Self {
        Self {
            fetcher,
            assistant,
            budget,
        }
    }

    /// Summarize the article behind `item.url`.
    ///
    /// Any failure here is scoped to this single item; the caller drops the
    /// item and moves on. The summary is the capability's raw text, taken
    /// verbatim except that an empty reply counts as a failure.
    #[instrument(level = "info", skip_all, fields(title = %item.title, url = %item.url))]
    pub async fn run(&self, item: RawNewsItem) -> Result<SummarizedNewsItem, SummarizeError> {
        info!("Summarizing article");
        let html = self.fetcher.fetch(&item.url).await?;
        let text = html_to_text(&html);

        self.budget.acquire().await;
        let summary = self.assistant.summarize(&text).await?;

        if summary.trim().is_empty() {
            return Err(SummarizeError::EmptySummary);
        }

        Ok(SummarizedNewsItem::from_raw(item, summary))
    }
}
