//! Social platform link previews.
//!
//! Resolves which title, description and image a platform would show for a
//! shared link, following each platform's own precedence between
//! Twitter Card, OpenGraph and plain meta tags.

use crate::models::{MetaTags, PlatformPreview};
use std::fmt;
use std::str::FromStr;
use url::Url;

pub const NO_TITLE: &str = "No title";
pub const NO_DESCRIPTION: &str = "No description";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Facebook,
    Twitter,
    Discord,
    Reddit,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::Discord,
        Platform::Reddit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Discord => "discord",
            Platform::Reddit => "reddit",
        }
    }

    /// Characters of title and description shown before the card truncates.
    pub fn display_limits(&self) -> (usize, usize) {
        match self {
            Platform::Facebook => (88, 300),
            Platform::Twitter => (70, 200),
            Platform::Discord => (256, 350),
            Platform::Reddit => (300, 200),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown platform '{0}': expected facebook, twitter, discord or reddit")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "twitter" | "x" => Ok(Platform::Twitter),
            "discord" => Ok(Platform::Discord),
            "reddit" => Ok(Platform::Reddit),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

/// First candidate with visible text; blank values count as absent.
fn first<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .find_map(|c| c.as_deref().filter(|s| !s.trim().is_empty()))
}

pub fn platform_title(meta: &MetaTags, platform: Platform) -> &str {
    let title = match platform {
        Platform::Twitter => first(&[&meta.twitter_title, &meta.og_title, &meta.title]),
        Platform::Facebook | Platform::Reddit => first(&[&meta.og_title, &meta.title]),
        Platform::Discord => first(&[&meta.og_title, &meta.twitter_title, &meta.title]),
    };
    title.unwrap_or(NO_TITLE)
}

pub fn platform_description(meta: &MetaTags, platform: Platform) -> &str {
    let description = match platform {
        Platform::Twitter => first(&[
            &meta.twitter_description,
            &meta.og_description,
            &meta.description,
        ]),
        Platform::Facebook | Platform::Reddit => {
            first(&[&meta.og_description, &meta.description])
        }
        Platform::Discord => first(&[
            &meta.og_description,
            &meta.twitter_description,
            &meta.description,
        ]),
    };
    description.unwrap_or(NO_DESCRIPTION)
}

pub fn platform_image(meta: &MetaTags, platform: Platform) -> Option<&str> {
    match platform {
        Platform::Twitter => first(&[&meta.twitter_image, &meta.og_image, &meta.image]),
        Platform::Facebook | Platform::Reddit => first(&[&meta.og_image, &meta.image]),
        Platform::Discord => first(&[&meta.og_image, &meta.twitter_image, &meta.image]),
    }
}

/// Cuts `text` to at most `limit` characters, ending with an ellipsis.
fn truncate(text: &str, limit: usize) -> (String, bool) {
    if text.chars().count() <= limit {
        return (text.to_string(), false);
    }
    let kept: String = text.chars().take(limit.saturating_sub(1)).collect();
    (format!("{}…", kept.trim_end()), true)
}

fn display_domain(meta: &MetaTags) -> String {
    [&meta.og_url, &meta.url, &meta.canonical]
        .into_iter()
        .flatten()
        .find_map(|u| Url::parse(u).ok())
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default()
}

/// Builds the card a platform would render for these meta tags.
pub fn preview(meta: &MetaTags, platform: Platform) -> PlatformPreview {
    let (title_limit, description_limit) = platform.display_limits();
    let (title, title_truncated) = truncate(platform_title(meta, platform), title_limit);
    let (description, description_truncated) =
        truncate(platform_description(meta, platform), description_limit);

    PlatformPreview {
        platform: platform.as_str().to_string(),
        title,
        description,
        image: platform_image(meta, platform).map(str::to_string),
        domain: display_domain(meta),
        title_truncated,
        description_truncated,
    }
}
