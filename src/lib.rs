//! # newsbrief
//!
//! A news digest pipeline: extract structured news entries from configured
//! web sources with an LLM, summarize each linked article, render the
//! results into one Markdown digest, and deliver it by email.
//!
//! The library surface exists so the pipeline can be driven end to end by
//! deterministic test doubles; the binary in `main.rs` wires up the real
//! HTTP fetcher, the OpenAI-compatible capability, and Mailgun delivery.

pub mod api;
pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod limit;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod render;
pub mod summarize;

pub use api::Assistant;
pub use config::Config;
pub use extract::Extractor;
pub use fetch::ContentFetcher;
pub use limit::CallBudget;
pub use models::{Digest, NewsSource, RawNewsItem, SummarizedNewsItem};
pub use notify::Notifier;
pub use pipeline::{Pipeline, Schedule};
pub use render::render_digest;
pub use summarize::Summarizer;
