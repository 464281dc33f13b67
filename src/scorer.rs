//! Rule-table SEO scoring.
//!
//! Each category is a sum of independent, condition-gated bonuses and is
//! capped at its maximum. Categories never look at each other's results.

use crate::models::{ContentLength, ExtractedFields, SeoScore};

/// Category maximums. They sum to 100.
pub mod max {
    pub const META_TAGS: u32 = 25;
    pub const CONTENT: u32 = 25;
    pub const TECHNICAL: u32 = 20;
    pub const PERFORMANCE: u32 = 15;
    pub const SOCIAL: u32 = 15;
}

/// Points awarded per rule.
pub mod points {
    // meta tags
    pub const TITLE_LENGTH: u32 = 8;
    pub const DESCRIPTION_LENGTH: u32 = 8;
    pub const CANONICAL: u32 = 4;
    pub const SINGLE_H1: u32 = 5;

    // content
    pub const LONG_CONTENT: u32 = 10;
    pub const MEDIUM_CONTENT: u32 = 6;
    pub const EASY_READABILITY: u32 = 5;
    pub const FAIR_READABILITY: u32 = 2;
    pub const SUBHEADINGS: u32 = 5;
    pub const ALT_COVERAGE: u32 = 5;

    // technical
    pub const HTTPS: u32 = 5;
    pub const STRUCTURED_DATA: u32 = 5;
    pub const VIEWPORT: u32 = 3;
    pub const HSTS: u32 = 2;
    pub const SECURITY_HEADERS_FULL: u32 = 5;
    pub const SECURITY_HEADERS_PARTIAL: u32 = 2;

    // performance
    pub const SMALL_HTML: u32 = 5;
    pub const MEDIUM_HTML: u32 = 3;
    pub const COMPRESSION: u32 = 5;
    pub const MINIFIED: u32 = 3;
    pub const NO_MIXED_CONTENT: u32 = 2;

    // social
    pub const OG_TITLE: u32 = 3;
    pub const OG_DESCRIPTION: u32 = 3;
    pub const OG_IMAGE: u32 = 4;
    pub const TWITTER_CARD: u32 = 3;
    pub const TWITTER_CONTENT: u32 = 2;
}

/// Thresholds the rules compare against.
pub mod thresholds {
    use std::ops::RangeInclusive;

    pub const TITLE_CHARS: RangeInclusive<usize> = 30..=60;
    pub const DESCRIPTION_CHARS: RangeInclusive<usize> = 120..=160;
    pub const EASY_READABILITY: f64 = 60.0;
    pub const FAIR_READABILITY: f64 = 30.0;
    pub const FULL_SECURITY_HEADERS: usize = 3;
    pub const SMALL_HTML_BYTES: usize = 100_000;
    pub const MEDIUM_HTML_BYTES: usize = 300_000;
}

fn bonus(condition: bool, points: u32) -> u32 {
    if condition { points } else { 0 }
}

fn char_len(value: Option<&String>) -> Option<usize> {
    value.map(|v| v.chars().count())
}

pub fn score_meta_tags(fields: &ExtractedFields) -> u32 {
    let meta = &fields.meta_tags;

    let title_ok = char_len(meta.title.as_ref())
        .is_some_and(|len| thresholds::TITLE_CHARS.contains(&len));
    let description_ok = char_len(meta.description.as_ref())
        .is_some_and(|len| thresholds::DESCRIPTION_CHARS.contains(&len));

    let total = bonus(title_ok, points::TITLE_LENGTH)
        + bonus(description_ok, points::DESCRIPTION_LENGTH)
        + bonus(meta.canonical.is_some(), points::CANONICAL)
        + bonus(fields.headings.h1.len() == 1, points::SINGLE_H1);

    total.min(max::META_TAGS)
}

pub fn score_content(fields: &ExtractedFields) -> u32 {
    let content = &fields.content;

    let length = match content.content_length {
        ContentLength::Long => points::LONG_CONTENT,
        ContentLength::Medium => points::MEDIUM_CONTENT,
        ContentLength::Short => 0,
    };

    let readability = if content.readability_score >= thresholds::EASY_READABILITY {
        points::EASY_READABILITY
    } else if content.readability_score >= thresholds::FAIR_READABILITY {
        points::FAIR_READABILITY
    } else {
        0
    };

    let total = length
        + readability
        + bonus(!fields.headings.h2.is_empty(), points::SUBHEADINGS)
        + bonus(fields.images.without_alt == 0, points::ALT_COVERAGE);

    total.min(max::CONTENT)
}

pub fn score_technical(fields: &ExtractedFields) -> u32 {
    let security = &fields.security;

    let header_count = security.security_headers.len();
    let headers = if header_count >= thresholds::FULL_SECURITY_HEADERS {
        points::SECURITY_HEADERS_FULL
    } else if header_count > 0 {
        points::SECURITY_HEADERS_PARTIAL
    } else {
        0
    };

    let total = bonus(security.https, points::HTTPS)
        + bonus(fields.schema.valid, points::STRUCTURED_DATA)
        + bonus(fields.meta_tags.viewport.is_some(), points::VIEWPORT)
        + bonus(security.hsts, points::HSTS)
        + headers;

    total.min(max::TECHNICAL)
}

pub fn score_performance(fields: &ExtractedFields) -> u32 {
    let performance = &fields.performance;

    let size = if performance.html_size <= thresholds::SMALL_HTML_BYTES {
        points::SMALL_HTML
    } else if performance.html_size <= thresholds::MEDIUM_HTML_BYTES {
        points::MEDIUM_HTML
    } else {
        0
    };

    let total = size
        + bonus(performance.has_compression, points::COMPRESSION)
        + bonus(performance.has_minified_resources, points::MINIFIED)
        + bonus(!fields.security.mixed_content, points::NO_MIXED_CONTENT);

    total.min(max::PERFORMANCE)
}

pub fn score_social(fields: &ExtractedFields) -> u32 {
    let meta = &fields.meta_tags;

    let total = bonus(meta.og_title.is_some(), points::OG_TITLE)
        + bonus(meta.og_description.is_some(), points::OG_DESCRIPTION)
        + bonus(meta.og_image.is_some(), points::OG_IMAGE)
        + bonus(meta.twitter_card.is_some(), points::TWITTER_CARD)
        + bonus(
            meta.twitter_title.is_some() || meta.twitter_image.is_some(),
            points::TWITTER_CONTENT,
        );

    total.min(max::SOCIAL)
}

/// Scores every category and sums them into `overall`.
pub fn score(fields: &ExtractedFields) -> SeoScore {
    let meta_tags = score_meta_tags(fields);
    let content = score_content(fields);
    let technical = score_technical(fields);
    let performance = score_performance(fields);
    let social = score_social(fields);

    SeoScore {
        meta_tags,
        content,
        technical,
        performance,
        social,
        overall: meta_tags + content + technical + performance + social,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetaTags, SchemaInfo, SecurityInfo};

    fn perfect_fields() -> ExtractedFields {
        let mut fields = ExtractedFields::default();
        fields.meta_tags = MetaTags {
            title: Some("t".repeat(45)),
            description: Some("d".repeat(140)),
            canonical: Some("https://example.com/".into()),
            viewport: Some("width=device-width".into()),
            og_title: Some("OG".into()),
            og_description: Some("OG description".into()),
            og_image: Some("https://example.com/og.png".into()),
            twitter_card: Some("summary".into()),
            twitter_title: Some("Tw".into()),
            ..Default::default()
        };
        fields.headings.h1 = vec!["Heading".into()];
        fields.headings.h2 = vec!["Sub".into()];
        fields.content.content_length = ContentLength::Long;
        fields.content.readability_score = 70.0;
        fields.schema = SchemaInfo {
            detected: true,
            types: vec!["Article".into()],
            count: 1,
            valid: true,
        };
        fields.security = SecurityInfo {
            https: true,
            hsts: true,
            mixed_content: false,
            security_headers: vec![
                "X-Content-Type-Options".into(),
                "X-Frame-Options".into(),
                "Content-Security-Policy".into(),
            ],
        };
        fields.performance.html_size = 20_000;
        fields.performance.has_compression = true;
        fields.performance.has_minified_resources = true;
        fields
    }

    #[test]
    fn test_maximums_sum_to_100() {
        assert_eq!(
            max::META_TAGS + max::CONTENT + max::TECHNICAL + max::PERFORMANCE + max::SOCIAL,
            100
        );
    }

    #[test]
    fn test_perfect_page_scores_100() {
        let score = score(&perfect_fields());
        assert_eq!(score.meta_tags, max::META_TAGS);
        assert_eq!(score.content, max::CONTENT);
        assert_eq!(score.technical, max::TECHNICAL);
        assert_eq!(score.performance, max::PERFORMANCE);
        assert_eq!(score.social, max::SOCIAL);
        assert_eq!(score.overall, 100);
    }

    #[test]
    fn test_empty_page_overall_is_sum() {
        let fields = ExtractedFields::default();
        let score = score(&fields);

        // No images and no mixed content still earn their points
        assert_eq!(score.content, points::ALT_COVERAGE);
        assert_eq!(score.performance, points::SMALL_HTML + points::NO_MIXED_CONTENT);
        assert_eq!(
            score.overall,
            score.meta_tags + score.content + score.technical + score.performance + score.social
        );
        assert!(score.overall <= 100);
    }

    #[test]
    fn test_missing_title_gets_no_title_bonus() {
        let mut fields = perfect_fields();
        fields.meta_tags.title = None;
        assert_eq!(
            score_meta_tags(&fields),
            max::META_TAGS - points::TITLE_LENGTH
        );
    }

    #[test]
    fn test_title_length_boundaries() {
        let mut fields = perfect_fields();
        for (len, expected) in [(29, 0), (30, points::TITLE_LENGTH), (60, points::TITLE_LENGTH), (61, 0)] {
            fields.meta_tags.title = Some("x".repeat(len));
            let without_title = max::META_TAGS - points::TITLE_LENGTH;
            assert_eq!(score_meta_tags(&fields), without_title + expected, "title length {}", len);
        }
    }

    #[test]
    fn test_h1_bonus_requires_exactly_one() {
        let mut fields = perfect_fields();
        fields.headings.h1 = vec![];
        assert_eq!(score_meta_tags(&fields), max::META_TAGS - points::SINGLE_H1);

        fields.headings.h1 = vec!["a".into(), "b".into()];
        assert_eq!(score_meta_tags(&fields), max::META_TAGS - points::SINGLE_H1);
    }

    #[test]
    fn test_partial_security_headers() {
        let mut fields = perfect_fields();
        fields.security.security_headers.truncate(1);
        assert_eq!(
            score_technical(&fields),
            max::TECHNICAL - points::SECURITY_HEADERS_FULL + points::SECURITY_HEADERS_PARTIAL
        );
    }

    #[test]
    fn test_content_tiers() {
        let mut fields = perfect_fields();
        fields.content.content_length = ContentLength::Medium;
        fields.content.readability_score = 45.0;
        assert_eq!(
            score_content(&fields),
            points::MEDIUM_CONTENT + points::FAIR_READABILITY + points::SUBHEADINGS + points::ALT_COVERAGE
        );

        fields.images.total = 3;
        fields.images.without_alt = 1;
        fields.content.readability_score = 10.0;
        assert_eq!(
            score_content(&fields),
            points::MEDIUM_CONTENT + points::SUBHEADINGS
        );
    }

    #[test]
    fn test_performance_size_tiers() {
        let mut fields = perfect_fields();
        fields.performance.html_size = 250_000;
        assert_eq!(
            score_performance(&fields),
            max::PERFORMANCE - points::SMALL_HTML + points::MEDIUM_HTML
        );
        fields.performance.html_size = 400_000;
        fields.security.mixed_content = true;
        assert_eq!(
            score_performance(&fields),
            points::COMPRESSION + points::MINIFIED
        );
    }
}
