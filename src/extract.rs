//! Front-page extraction: page content in, candidate news items out.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::api::{ApiError, Assistant};
use crate::fetch::{ContentFetcher, FetchError};
use crate::limit::CallBudget;
use crate::models::{ExtractionReply, RawNewsItem};

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The source's front page could not be retrieved. Propagated so the
    /// aggregator can decide isolation policy; never swallowed here.
    #[error("failed to fetch source page: {0}")]
    Fetch(#[from] FetchError),
    #[error("extraction call failed: {0}")]
    Api(#[from] ApiError),
}

/// Turns one source's front page into a sequence of [`RawNewsItem`]s.
pub struct Extractor {
    fetcher: Arc<dyn ContentFetcher>,
    assistant: Arc<dyn Assistant>,
    budget: Arc<CallBudget>,
}

impl Extractor {
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

    /// Extract candidate news entries from the page at `url`.
    ///
    /// A fetch or capability failure is an error. A reply that yields no
    /// parseable structure is not: it is logged as a warning and produces
    /// an empty sequence, so a flaky model never takes down a source.
    #[instrument(level = "info", skip(self), fields(%url))]
    pub async fn run(&self, url: &str) -> Result<Vec<RawNewsItem>, ExtractError> {
        info!("Extracting news");
        let content = self.fetcher.fetch(url).await?;

        self.budget.acquire().await;
        let reply = self.assistant.extract(&content, url).await?;

        let parsed = match serde_json::from_str::<ExtractionReply>(strip_code_fences(&reply)) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(%url, error = %e, "No structured result from extraction; skipping source");
                return Ok(Vec::new());
            }
        };

        if parsed.news.is_empty() {
            warn!(%url, "No news extracted");
            return Ok(Vec::new());
        }

        let base = Url::parse(url).ok();
        let items: Vec<RawNewsItem> = parsed
            .news
            .into_iter()
            .filter(|entry| entry.is_news)
            .filter_map(|entry| {
                let resolved = resolve_url(base.as_ref(), &entry.url);
                match resolved {
                    Some(absolute) => Some(RawNewsItem {
                        date: entry.date,
                        title: entry.title,
                        url: absolute,
                    }),
                    None => {
                        warn!(title = %entry.title, entry_url = %entry.url, "Unresolvable entry URL; dropping item");
                        None
                    }
                }
            })
            .collect();

        info!(count = items.len(), "Extracted news items");
        Ok(items)
    }
}

/// Make an entry URL absolute, joining relative links against the base.
fn resolve_url(base: Option<&Url>, entry_url: &str) -> Option<String> {
    if let Ok(absolute) = Url::parse(entry_url) {
        return Some(absolute.to_string());
    }
    base.and_then(|b| b.join(entry_url).ok())
        .map(|u| u.to_string())
}

/// Strip a Markdown code fence wrapper from a model reply, if present.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    match inner.rfind("```") {
        Some(end) => inner[..end].trim(),
        None => trimmed,
    }
}
