//! Page retrieval and HTML-to-text reduction.
//!
//! [`ContentFetcher`] is the seam for raw HTTP retrieval so the pipeline can
//! be driven by deterministic stubs in tests. [`HttpFetcher`] is the real
//! implementation, built on reqwest.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Node};
use thiserror::Error;
use tracing::debug;

/// Browser-like identifier; some news sites refuse requests without one.
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:142.0) Gecko/20100101 Firefox/142.0";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },
}

/// Retrieves raw content for a URL.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the body at `url`. Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP fetcher with a realistic User-Agent and a request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(%url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Reduce an HTML document to whitespace-normalized plain text.
///
/// Text nodes are walked in document order; anything inside `script`,
/// `style`, or `noscript` is skipped and whitespace is collapsed to single
/// spaces, so the summarization prompt sees one flat run of prose.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut words: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let excluded = node.ancestors().any(|a| match a.value() {
                Node::Element(el) => matches!(el.name(), "script" | "style" | "noscript"),
                _ => false,
            });
            if !excluded {
                words.extend(text.split_whitespace());
            }
        }
    }
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_to_text_strips_tags_and_normalizes_whitespace() {
        let html = "<html><body><h1>Title</h1>\n  <p>First   line.</p>\n<p>Second.</p></body></html>";
        assert_eq!(html_to_text(html), "Title First line. Second.");
    }

    #[test]
    fn html_to_text_drops_script_and_style() {
        let html = r#"<html><head><style>p { color: red }</style></head>
            <body><script>var x = 1;</script><p>Visible</p></body></html>"#;
        assert_eq!(html_to_text(html), "Visible");
    }

    #[test]
    fn html_to_text_handles_fragments() {
        assert_eq!(html_to_text("<p>Just a fragment</p>"), "Just a fragment");
    }

    #[test]
    fn html_to_text_empty_input() {
        assert_eq!(html_to_text(""), "");
    }
}
