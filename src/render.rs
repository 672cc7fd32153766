//! Digest rendering: ordered items in, Markdown document out.
//!
//! Pure function of its input. The template is compiled in, so there is no
//! missing-template failure mode; the same digest always renders to the
//! same document.

use crate::models::SummarizedNewsItem;

const HEADER: &str = "# News Digest";
const EMPTY_NOTICE: &str = "_No news items were gathered in this run._";
const SEPARATOR: &str = "\n\n---\n\n";

/// Render the digest as a Markdown document.
///
/// Items appear in digest order, separated by a horizontal rule with no
/// separator after the last entry. An empty digest renders the header and
/// a fixed notice, nothing else.
pub fn render_digest(digest: &[SummarizedNewsItem]) -> String {
    if digest.is_empty() {
        return format!("{HEADER}\n\n{EMPTY_NOTICE}\n");
    }

    let blocks: Vec<String> = digest.iter().map(render_item).collect();
    format!("{HEADER}\n\n{}\n", blocks.join(SEPARATOR))
}

fn render_item(item: &SummarizedNewsItem) -> String {
    format!(
        "## [{title}]({url})\n\nDate: {date} | Source: {source}\n\n{summary}",
        title = item.title,
        url = item.url,
        date = item.date,
        source = item.source,
        summary = item.summary,
    )
}
