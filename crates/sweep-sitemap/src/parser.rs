//! Extraction of `urlset/url/loc` values.

use crate::error::Result;
use sweep_core::PageUrl;
use tracing::debug;

/// Extract every `url/loc` value of a `urlset` document, in document order.
///
/// Element names are matched by local name, so the standard sitemap
/// namespace (or none) is accepted. A DOCTYPE declaration is allowed.
/// Entries without a `loc`, or whose `loc` has no text, are skipped. The
/// text is passed through as written, whitespace included, and duplicates
/// are kept.
///
/// # Errors
/// Returns [`SitemapError::Parse`](crate::SitemapError::Parse) when the
/// input is not well-formed XML.
pub fn parse_page_urls(xml: &str) -> Result<Vec<PageUrl>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(xml, options)?;
    let root = doc.root_element();

    if root.tag_name().name() != "urlset" {
        debug!(root = root.tag_name().name(), "sitemap root is not a urlset");
        return Ok(Vec::new());
    }

    let urls = root
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "url")
        .filter_map(|entry| {
            entry
                .children()
                .find(|node| node.is_element() && node.tag_name().name() == "loc")
        })
        .filter_map(|loc| loc.text())
        .filter(|loc| !loc.is_empty())
        .map(PageUrl::new)
        .collect();

    Ok(urls)
}
