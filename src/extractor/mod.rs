//! Field extraction from fetched HTML.
//!
//! Every sub-extractor works on the same parsed document and is independent
//! of the others. A failure inside one of them (a malformed JSON-LD block, an
//! unresolvable URL) only drops that piece of data; it never aborts the
//! report.

pub mod content;
pub mod meta;
pub mod schema;
pub mod signals;
pub mod structure;

use crate::models::{ExtractedFields, MetaTags};
use scraper::Html;
use std::collections::HashMap;
use url::Url;

/// Extracts every field of the advanced report from one page.
///
/// `headers` holds the response headers keyed by lowercase name.
pub fn extract(html: &str, page_url: &Url, headers: &HashMap<String, String>) -> ExtractedFields {
    let document = Html::parse_document(html);

    ExtractedFields {
        url: page_url.to_string(),
        meta_tags: meta::extract_meta_tags(&document, page_url),
        headings: structure::extract_headings(&document),
        links: structure::extract_link_stats(&document, page_url),
        images: structure::extract_image_stats(&document, page_url),
        content: content::extract_content_stats(&document),
        schema: schema::extract_schema(&document),
        performance: signals::extract_performance(html, headers),
        security: signals::extract_security(&document, page_url, headers),
    }
}

/// Extracts only the meta tags, for the lightweight meta fetch.
pub fn extract_meta(html: &str, page_url: &Url) -> MetaTags {
    let document = Html::parse_document(html);
    meta::extract_meta_tags(&document, page_url)
}
