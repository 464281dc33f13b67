use super::meta::resolve_url;
use crate::error::ExtractionError;
use crate::models::{Headings, ImageStats, LinkStats};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector should be valid")
});
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));

/// Hrefs that never point at a crawlable page
const NON_NAVIGABLE_PREFIXES: [&str; 4] = ["mailto:", "tel:", "javascript:", "data:"];

pub fn extract_headings(document: &Html) -> Headings {
    let mut headings = Headings::default();

    // Single pass keeps document order within each level
    for element in document.select(&HEADING_SELECTOR) {
        let level = element
            .value()
            .name()
            .strip_prefix('h')
            .and_then(|n| n.parse::<u8>().ok());
        if let Some(slot) = level.and_then(|l| headings.level_mut(l)) {
            slot.push(element.text().collect::<String>().trim().to_string());
        }
    }

    headings
}

fn classify_href(page_url: &Url, href: &str) -> Result<Option<bool>, ExtractionError> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || NON_NAVIGABLE_PREFIXES.iter().any(|p| lower.starts_with(p))
    {
        return Ok(None);
    }

    let target = resolve_url(page_url, href)?;
    Ok(Some(target.origin() == page_url.origin()))
}

/// Counts anchors, split into internal (same origin as the page) and external.
pub fn extract_link_stats(document: &Html, page_url: &Url) -> LinkStats {
    let mut stats = LinkStats::default();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let is_internal = match classify_href(page_url, href) {
            Ok(Some(is_internal)) => is_internal,
            Ok(None) => continue,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unresolvable link");
                continue;
            }
        };

        stats.total += 1;
        if is_internal {
            stats.internal += 1;
        } else {
            stats.external += 1;
        }

        let nofollow = element.value().attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("nofollow"))
        });
        if nofollow {
            stats.nofollow += 1;
        }
    }

    stats
}

/// Lowercase file extension of an image source, ignoring query and fragment.
fn image_extension(page_url: &Url, src: &str) -> Result<Option<String>, ExtractionError> {
    let resolved = resolve_url(page_url, src.trim())?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return Err(ExtractionError::UnsupportedScheme(
            resolved.scheme().to_string(),
        ));
    }

    let file_name = resolved
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    Ok(file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())))
}

pub fn extract_image_stats(document: &Html, page_url: &Url) -> ImageStats {
    let mut stats = ImageStats::default();

    for element in document.select(&IMG_SELECTOR) {
        stats.total += 1;

        let has_alt = element
            .value()
            .attr("alt")
            .is_some_and(|alt| !alt.trim().is_empty());
        if has_alt {
            stats.with_alt += 1;
        }

        let Some(src) = element.value().attr("src").filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        match image_extension(page_url, src) {
            Ok(Some(ext)) => *stats.formats.entry(ext).or_insert(0) += 1,
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "Skipping image format detection"),
        }
    }

    stats.without_alt = stats.total - stats.with_alt;
    stats
}
