use crate::error::ExtractionError;
use crate::models::MetaTags;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[content]").expect("meta selector should be valid"));
static LINK_REL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel][href]").expect("link selector should be valid"));
static HTML_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("html").expect("html selector should be valid"));

/// `<meta>` contents keyed by lowercased `name` and `property`.
/// The first non-empty value for a key wins.
struct MetaIndex {
    by_name: HashMap<String, String>,
    by_property: HashMap<String, String>,
}

impl MetaIndex {
    fn build(document: &Html) -> Self {
        let mut by_name = HashMap::new();
        let mut by_property = HashMap::new();

        for element in document.select(&META_SELECTOR) {
            let Some(content) = element.value().attr("content").and_then(non_empty) else {
                continue;
            };

            if let Some(name) = element.value().attr("name") {
                by_name
                    .entry(name.trim().to_ascii_lowercase())
                    .or_insert_with(|| content.clone());
            }
            if let Some(property) = element.value().attr("property") {
                by_property
                    .entry(property.trim().to_ascii_lowercase())
                    .or_insert(content);
            }
        }

        Self {
            by_name,
            by_property,
        }
    }

    fn name(&self, key: &str) -> Option<String> {
        self.by_name.get(key).cloned()
    }

    /// OpenGraph keys live under `property`, though some sites use `name`.
    fn og(&self, key: &str) -> Option<String> {
        self.by_property
            .get(key)
            .or_else(|| self.by_name.get(key))
            .cloned()
    }

    /// Twitter keys live under `name`, though some sites use `property`.
    fn twitter(&self, key: &str) -> Option<String> {
        self.by_name
            .get(key)
            .or_else(|| self.by_property.get(key))
            .cloned()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// First `<link>` whose `rel` tokens include `rel`.
fn link_href(document: &Html, rel: &str) -> Option<String> {
    document
        .select(&LINK_REL_SELECTOR)
        .find(|element| {
            element.value().attr("rel").is_some_and(|value| {
                value
                    .split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case(rel))
            })
        })
        .and_then(|element| element.value().attr("href"))
        .and_then(non_empty)
}

pub(crate) fn resolve_url(base: &Url, value: &str) -> Result<Url, ExtractionError> {
    base.join(value).map_err(|source| ExtractionError::BadUrl {
        value: value.to_string(),
        source,
    })
}

fn absolutize(base: &Url, value: String) -> String {
    match resolve_url(base, &value) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "Keeping unresolved image URL");
            value
        }
    }
}

/// Extracts basic, OpenGraph and Twitter Card meta information.
///
/// `url`, `image` and `site_name` are resolved through fallback chains so
/// that even a sparse page yields a usable preview.
pub fn extract_meta_tags(document: &Html, page_url: &Url) -> MetaTags {
    let index = MetaIndex::build(document);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .and_then(|element| non_empty(&element.text().collect::<String>()));

    let canonical = link_href(document, "canonical");

    let language = document
        .select(&HTML_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("lang"))
        .and_then(non_empty);

    let og_title = index.og("og:title");
    let og_description = index.og("og:description");
    let og_image = index.og("og:image");
    let og_url = index.og("og:url");
    let og_site_name = index.og("og:site_name");
    let twitter_image = index
        .twitter("twitter:image")
        .or_else(|| index.twitter("twitter:image:src"));

    let url = og_url
        .clone()
        .or_else(|| canonical.clone())
        .unwrap_or_else(|| page_url.to_string());

    let image = og_image
        .clone()
        .or_else(|| twitter_image.clone())
        .or_else(|| link_href(document, "image_src"))
        .map(|value| absolutize(page_url, value));

    let site_name = og_site_name
        .clone()
        .or_else(|| page_url.host_str().map(str::to_string));

    MetaTags {
        title,
        description: index.name("description"),
        url: Some(url),
        image,
        canonical,
        robots: index.name("robots"),
        viewport: index.name("viewport"),
        language,
        author: index.name("author"),
        keywords: index.name("keywords"),
        site_name,
        og_title,
        og_description,
        og_image,
        og_url,
        og_type: index.og("og:type"),
        og_site_name,
        og_locale: index.og("og:locale"),
        twitter_card: index.twitter("twitter:card"),
        twitter_title: index.twitter("twitter:title"),
        twitter_description: index.twitter("twitter:description"),
        twitter_image,
        twitter_site: index.twitter("twitter:site"),
        twitter_creator: index.twitter("twitter:creator"),
    }
}
