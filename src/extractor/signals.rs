use crate::models::{PerformanceInfo, SecurityInfo};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use url::Url;

static SUBRESOURCE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img[src], script[src], link[href]")
        .expect("subresource selector should be valid")
});

/// Hardening headers recognized in the security report, in report order
pub const SECURITY_HEADERS: [&str; 4] = [
    "X-Content-Type-Options",
    "X-Frame-Options",
    "X-XSS-Protection",
    "Content-Security-Policy",
];

/// Assumed transfer rate for the load time estimate
pub const BYTES_PER_SECOND: f64 = 100_000.0;

const COMPRESSED_ENCODINGS: [&str; 2] = ["gzip", "br"];
const MINIFIED_MARKERS: [&str; 2] = [".min.js", ".min.css"];

/// Size and delivery signals derived from the raw HTML and response headers.
/// `headers` is keyed by lowercase header name.
pub fn extract_performance(html: &str, headers: &HashMap<String, String>) -> PerformanceInfo {
    let html_size = html.len();

    let has_compression = headers.get("content-encoding").is_some_and(|encoding| {
        let encoding = encoding.to_ascii_lowercase();
        COMPRESSED_ENCODINGS.iter().any(|e| encoding.contains(e))
    });

    PerformanceInfo {
        html_size,
        estimated_load_time: ((html_size as f64 / BYTES_PER_SECOND) * 10.0).round() / 10.0,
        has_minified_resources: MINIFIED_MARKERS.iter().any(|m| html.contains(m)),
        has_compression,
    }
}

fn has_mixed_content(document: &Html) -> bool {
    document.select(&SUBRESOURCE_SELECTOR).any(|element| {
        let reference = match element.value().name() {
            "link" => element.value().attr("href"),
            _ => element.value().attr("src"),
        };
        reference.is_some_and(|value| {
            value
                .trim_start()
                .get(..7)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http://"))
        })
    })
}

pub fn extract_security(
    document: &Html,
    page_url: &Url,
    headers: &HashMap<String, String>,
) -> SecurityInfo {
    let https = page_url.scheme() == "https";

    SecurityInfo {
        https,
        hsts: headers.contains_key("strict-transport-security"),
        mixed_content: https && has_mixed_content(document),
        security_headers: SECURITY_HEADERS
            .iter()
            .filter(|name| headers.contains_key(&name.to_ascii_lowercase()))
            .map(|name| name.to_string())
            .collect(),
    }
}
