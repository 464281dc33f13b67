use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Meta information resolved from a page's `<head>`.
/// Every field is optional; absence is what the validator reports on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_creator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl Headings {
    /// Mutable slot for a heading level (1..=6).
    pub fn level_mut(&mut self, level: u8) -> Option<&mut Vec<String>> {
        match level {
            1 => Some(&mut self.h1),
            2 => Some(&mut self.h2),
            3 => Some(&mut self.h3),
            4 => Some(&mut self.h4),
            5 => Some(&mut self.h5),
            6 => Some(&mut self.h6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub total: usize,
    pub internal: usize,
    pub external: usize,
    pub nofollow: usize,
    /// Never computed; always zero.
    pub broken_links: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub total: usize,
    pub with_alt: usize,
    pub without_alt: usize,
    /// Never computed; always zero.
    pub large_images: usize,
    pub formats: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentLength {
    #[default]
    Short,
    Medium,
    Long,
}

impl ContentLength {
    pub fn from_word_count(words: usize) -> Self {
        if words < 300 {
            ContentLength::Short
        } else if words < 1000 {
            ContentLength::Medium
        } else {
            ContentLength::Long
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLength::Short => "short",
            ContentLength::Medium => "medium",
            ContentLength::Long => "long",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    pub keyword: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub word_count: usize,
    pub paragraph_count: usize,
    pub readability_score: f64,
    pub keyword_density: Vec<KeywordDensity>,
    pub content_length: ContentLength,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub detected: bool,
    pub types: Vec<String>,
    pub count: usize,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceInfo {
    pub html_size: usize,
    pub estimated_load_time: f64,
    pub has_minified_resources: bool,
    pub has_compression: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityInfo {
    pub https: bool,
    pub hsts: bool,
    pub mixed_content: bool,
    pub security_headers: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScore {
    pub meta_tags: u32,
    pub content: u32,
    pub technical: u32,
    pub performance: u32,
    pub social: u32,
    pub overall: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaValidation {
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub errors: Vec<String>,
    pub is_valid: bool,
    pub score: u32,
}

/// Everything the field extractor pulls out of one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    pub url: String,
    pub meta_tags: MetaTags,
    pub headings: Headings,
    pub links: LinkStats,
    pub images: ImageStats,
    pub content: ContentStats,
    pub schema: SchemaInfo,
    pub performance: PerformanceInfo,
    pub security: SecurityInfo,
}

/// Full report returned by `POST /analyze-seo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSeoData {
    #[serde(flatten)]
    pub fields: ExtractedFields,
    pub seo_score: SeoScore,
    pub validation: MetaValidation,
    pub analyzed_at: String,
}

/// Result of the lightweight meta fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaReport {
    pub meta_tags: MetaTags,
    pub validation: MetaValidation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPreview {
    pub platform: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub domain: String,
    pub title_truncated: bool,
    pub description_truncated: bool,
}
