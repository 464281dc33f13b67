//! Human-readable validation of meta tags and page structure.
//!
//! Tuned separately from the numeric scorer: the validator produces the
//! feedback list, the scorer produces the badge. They are allowed to disagree.

use crate::models::{ExtractedFields, MetaTags, MetaValidation};
use std::ops::RangeInclusive;

pub const TITLE_CHARS: RangeInclusive<usize> = 30..=60;
pub const DESCRIPTION_CHARS: RangeInclusive<usize> = 120..=160;
pub const MAX_KEYWORDS: usize = 10;
pub const LARGE_HTML_BYTES: usize = 100_000;

/// Points subtracted from 100 per finding.
pub mod penalties {
    pub const ERROR: u32 = 20;
    pub const WARNING: u32 = 10;
    pub const SUGGESTION: u32 = 5;
}

#[derive(Debug, Default)]
struct Findings {
    errors: Vec<String>,
    warnings: Vec<String>,
    suggestions: Vec<String>,
}

impl Findings {
    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn suggestion(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }

    fn finish(self) -> MetaValidation {
        let penalty = penalties::ERROR * self.errors.len() as u32
            + penalties::WARNING * self.warnings.len() as u32
            + penalties::SUGGESTION * self.suggestions.len() as u32;

        MetaValidation {
            is_valid: self.errors.is_empty() && self.warnings.is_empty(),
            score: 100u32.saturating_sub(penalty),
            warnings: self.warnings,
            suggestions: self.suggestions,
            errors: self.errors,
        }
    }
}

fn check_meta(meta: &MetaTags, findings: &mut Findings) {
    // Title
    match meta.title.as_ref().or(meta.og_title.as_ref()) {
        None => findings.error("Missing title tag (no <title> or og:title found)"),
        Some(title) => {
            let len = title.chars().count();
            if len < *TITLE_CHARS.start() {
                findings.warning(format!(
                    "Title is too short ({} chars, recommended: {}-{})",
                    len,
                    TITLE_CHARS.start(),
                    TITLE_CHARS.end()
                ));
            } else if len > *TITLE_CHARS.end() {
                findings.warning(format!(
                    "Title is too long ({} chars, recommended: {}-{})",
                    len,
                    TITLE_CHARS.start(),
                    TITLE_CHARS.end()
                ));
            }
        }
    }

    // Description
    match meta.description.as_ref().or(meta.og_description.as_ref()) {
        None => findings.error("Missing meta description (no description or og:description found)"),
        Some(desc) => {
            let len = desc.chars().count();
            if len < *DESCRIPTION_CHARS.start() {
                findings.warning(format!(
                    "Meta description is too short ({} chars, recommended: {}-{})",
                    len,
                    DESCRIPTION_CHARS.start(),
                    DESCRIPTION_CHARS.end()
                ));
            } else if len > *DESCRIPTION_CHARS.end() {
                findings.warning(format!(
                    "Meta description is too long ({} chars, recommended: {}-{})",
                    len,
                    DESCRIPTION_CHARS.start(),
                    DESCRIPTION_CHARS.end()
                ));
            }
        }
    }

    if meta.image.is_none() && meta.og_image.is_none() && meta.twitter_image.is_none() {
        findings.warning("No image found for social sharing (add og:image or twitter:image)");
    }

    if meta
        .robots
        .as_ref()
        .is_some_and(|robots| robots.to_ascii_lowercase().contains("noindex"))
    {
        findings.warning("Robots meta tag blocks indexing (noindex)");
    }

    if meta.viewport.is_none() {
        findings.warning("Missing viewport meta tag; the page may not render well on mobile");
    }

    if meta.canonical.is_none() {
        findings.suggestion("Add a canonical URL to avoid duplicate content issues");
    }

    if meta.language.is_none() {
        findings.suggestion("Declare the page language with the <html lang> attribute");
    }

    if meta.twitter_card.is_none() {
        findings.suggestion("Add a twitter:card meta tag for richer Twitter previews");
    }

    if let Some(keywords) = &meta.keywords {
        let count = keywords
            .split(',')
            .filter(|k| !k.trim().is_empty())
            .count();
        if count > MAX_KEYWORDS {
            findings.suggestion(format!(
                "Too many meta keywords ({}), keep it to {} or fewer",
                count, MAX_KEYWORDS
            ));
        }
    }
}

fn check_page(fields: &ExtractedFields, findings: &mut Findings) {
    match fields.headings.h1.len() {
        0 => findings.error("Page is missing an H1 tag"),
        1 => {}
        n => findings.warning(format!("Page has multiple H1 tags ({})", n)),
    }

    if !fields.security.https {
        findings.error("Page is not served over HTTPS");
    }

    if fields.images.without_alt > 0 {
        findings.warning(format!(
            "{} image(s) missing alt text",
            fields.images.without_alt
        ));
    }

    if fields.security.mixed_content {
        findings.warning("Mixed content: the HTTPS page loads resources over plain HTTP");
    }

    if fields.performance.html_size > LARGE_HTML_BYTES && !fields.performance.has_compression {
        findings.warning(format!(
            "Large HTML document ({} KB) served without gzip or brotli compression",
            fields.performance.html_size / 1024
        ));
    }

    if !fields.schema.detected {
        findings.suggestion("Add JSON-LD structured data (schema.org) to enable rich results");
    }

    if fields.links.internal == 0 {
        findings.suggestion("Add internal links to help search engines discover related pages");
    }
}

/// Validates meta tags alone, as used by the lightweight meta fetch.
pub fn validate_meta(meta: &MetaTags) -> MetaValidation {
    let mut findings = Findings::default();
    check_meta(meta, &mut findings);
    findings.finish()
}

/// Validates meta tags together with the page's structure and delivery signals.
pub fn validate_page(fields: &ExtractedFields) -> MetaValidation {
    let mut findings = Findings::default();
    check_meta(&fields.meta_tags, &mut findings);
    check_page(fields, &mut findings);
    findings.finish()
}
