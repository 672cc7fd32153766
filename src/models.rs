//! Data models for news sources, extracted entries, and summarized items.
//!
//! The pipeline moves values strictly forward through these types:
//! [`NewsSource`] → [`RawNewsItem`] → [`SummarizedNewsItem`] → [`Digest`].
//! Items are value objects and are never mutated after creation; the one
//! apparent exception is `SummarizedNewsItem::source`, which the aggregator
//! fills in when it adopts an item (the summarizer does not know which
//! configured source an item came from).

use serde::{Deserialize, Serialize};

/// A configured news source, loaded from the `[[sources]]` table.
///
/// Identity is the `name` field. Only sources with `enabled == true`
/// participate in a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsSource {
    /// Display name, also stamped onto every item extracted from this source.
    pub name: String,
    /// Front-page URL the extractor reads.
    pub url: String,
    /// Disabled sources are skipped entirely; the extractor is never invoked.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// One candidate news entry as extracted from a source's front page.
///
/// The date is free-form, exactly as the source presents it. The URL is
/// expected to be absolute by the time this struct exists; the extractor
/// resolves relative links against the source base URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawNewsItem {
    pub date: String,
    pub title: String,
    pub url: String,
}

/// A news item with its article summary attached, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SummarizedNewsItem {
    pub date: String,
    pub title: String,
    pub url: String,
    /// The summarization capability's raw text response.
    pub summary: String,
    /// Name of the owning [`NewsSource`]; assigned by the aggregator.
    #[serde(default)]
    pub source: String,
}

impl SummarizedNewsItem {
    /// Build the terminal value from a raw item and its summary.
    ///
    /// `source` starts empty; the aggregator stamps it when the item is
    /// appended to the digest.
    pub fn from_raw(item: RawNewsItem, summary: String) -> Self {
        Self {
            date: item.date,
            title: item.title,
            url: item.url,
            summary,
            source: String::new(),
        }
    }
}

/// The final ordered collection of summarized items for one run.
///
/// Order is encounter order: configured source order, then extraction order
/// within a source. No cross-source sorting or deduplication happens;
/// duplicates across sources are preserved verbatim.
pub type Digest = Vec<SummarizedNewsItem>;

/// One entry in the extraction capability's structured reply.
///
/// `is_news` flags whether the entry is genuinely a news/research item;
/// entries flagged false are filtered out before summarization. Models that
/// omit the flag are given the benefit of the doubt.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractedEntry {
    #[serde(default = "default_enabled")]
    pub is_news: bool,
    #[serde(default)]
    pub date: String,
    pub title: String,
    pub url: String,
}

/// Top-level shape of the extraction capability's JSON reply.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionReply {
    pub news: Vec<ExtractedEntry>,
}
