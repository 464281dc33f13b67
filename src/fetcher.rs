use crate::error::AnalyzeError;
use encoding_rs::{Encoding, UTF_8};
use reqwest::Client;
use std::collections::HashMap;
use std::io::{self, Read};
use std::time::Duration;
use url::Url;

/// Wall-clock budget for the full analysis fetch
pub const ANALYZE_TIMEOUT: Duration = Duration::from_secs(15);
/// Wall-clock budget for the basic meta fetch
pub const META_TIMEOUT: Duration = Duration::from_secs(10);

/// A page fetched with a 2xx status.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: Url,
    /// The URL after redirects
    pub final_url: Url,
    pub status: u16,
    /// Response headers keyed by lowercase name; repeated headers are joined with ", "
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Validates that `input` is an absolute http(s) URL.
pub fn parse_target_url(input: &str) -> Result<Url, AnalyzeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalyzeError::MissingUrl);
    }

    let url = Url::parse(trimmed).map_err(|e| AnalyzeError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        scheme => Err(AnalyzeError::InvalidUrl(format!(
            "unsupported URL scheme '{}': only http and https are supported",
            scheme
        ))),
    }
}

/// Issues single GET requests with a bounded wait. Never retries.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `input`, giving up after `budget`.
    ///
    /// The budget covers both the response head and the body. When it
    /// elapses the in-flight request is dropped and `Timeout` is returned.
    pub async fn fetch(&self, input: &str, budget: Duration) -> Result<FetchedPage, AnalyzeError> {
        let url = parse_target_url(input)?;

        tracing::debug!(url = %url, budget_secs = budget.as_secs_f64(), "Fetching page");

        match tokio::time::timeout(budget, self.fetch_inner(url.clone())).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(url = %url, "Fetch exceeded its time budget");
                Err(AnalyzeError::Timeout)
            }
        }
    }

    async fn fetch_inner(&self, url: Url) -> Result<FetchedPage, AnalyzeError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Upstream returned an error status");
            return Err(AnalyzeError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let headers = collect_headers(response.headers());
        let bytes = response.bytes().await?;

        let encoding = headers.get("content-encoding").map(String::as_str);
        let decoded = match decode_body(&bytes, encoding) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(
                    url = %url,
                    encoding = encoding.unwrap_or_default(),
                    error = %e,
                    "Failed to decode response body, using raw bytes"
                );
                bytes.to_vec()
            }
        };
        let body = decode_text(&decoded, headers.get("content-type").map(String::as_str));

        tracing::debug!(url = %url, final_url = %final_url, bytes = body.len(), "Fetched page");

        Ok(FetchedPage {
            url,
            final_url,
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        map.entry(name.as_str().to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    map
}

/// Undoes the `Content-Encoding` of a response body.
///
/// Stacked codings (`gzip, br`) are listed in the order they were applied
/// and are undone last to first. An unknown coding fails the whole decode.
fn decode_body(bytes: &[u8], encoding: Option<&str>) -> io::Result<Vec<u8>> {
    let mut decoded = bytes.to_vec();
    let Some(encoding) = encoding else {
        return Ok(decoded);
    };

    for coding in encoding.rsplit(',') {
        decoded = decode_coding(&decoded, coding.trim())?;
    }
    Ok(decoded)
}

fn decode_coding(bytes: &[u8], coding: &str) -> io::Result<Vec<u8>> {
    let mut decoded = Vec::new();
    match coding.to_ascii_lowercase().as_str() {
        "" | "identity" => return Ok(bytes.to_vec()),
        "gzip" | "x-gzip" => {
            flate2::read::GzDecoder::new(bytes).read_to_end(&mut decoded)?;
        }
        "deflate" => {
            // Servers disagree on whether deflate is zlib-wrapped
            if flate2::read::ZlibDecoder::new(bytes)
                .read_to_end(&mut decoded)
                .is_err()
            {
                decoded.clear();
                flate2::read::DeflateDecoder::new(bytes).read_to_end(&mut decoded)?;
            }
        }
        "br" => {
            brotli::Decompressor::new(bytes, 4096).read_to_end(&mut decoded)?;
        }
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported content coding '{}'", other),
            ));
        }
    }
    Ok(decoded)
}

/// The `charset` parameter of a `Content-Type` value, unquoted.
fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Decodes body bytes to text using the declared charset, UTF-8 otherwise.
///
/// A byte order mark overrides the label. Malformed sequences become U+FFFD.
fn decode_text(bytes: &[u8], content_type: Option<&str>) -> String {
    let label = content_type.and_then(charset_param);
    let encoding = match label {
        Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            tracing::debug!(charset = label, "Unknown charset label, decoding as UTF-8");
            UTF_8
        }),
        None => UTF_8,
    };

    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_parse_target_url_accepts_http_and_https() {
        assert!(parse_target_url("https://example.com/page").is_ok());
        assert!(parse_target_url("  http://example.com  ").is_ok());
    }

    #[test]
    fn test_parse_target_url_rejects_relative_and_other_schemes() {
        assert!(matches!(parse_target_url("  "), Err(AnalyzeError::MissingUrl)));
        for input in ["example.com", "/relative/path", "ftp://example.com", "mailto:a@b.c"] {
            let result = parse_target_url(input);
            assert!(
                matches!(result, Err(AnalyzeError::InvalidUrl(_))),
                "expected InvalidUrl for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_decode_gzip_body() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<html>hello</html>").unwrap();
        let compressed = encoder.finish().unwrap();

        let decoded = decode_body(&compressed, Some("gzip")).unwrap();
        assert_eq!(decoded, b"<html>hello</html>");
    }

    #[test]
    fn test_decode_identity_body() {
        let decoded = decode_body(b"plain", None).unwrap();
        assert_eq!(decoded, b"plain");
        let decoded = decode_body(b"plain", Some("identity")).unwrap();
        assert_eq!(decoded, b"plain");
    }

    #[test]
    fn test_decode_corrupt_gzip_fails() {
        assert!(decode_body(b"not gzip at all", Some("gzip")).is_err());
    }

    #[test]
    fn test_decode_stacked_codings_in_reverse_order() {
        let mut gzip = GzEncoder::new(Vec::new(), Compression::default());
        gzip.write_all(b"<title>stacked</title>").unwrap();
        let gzipped = gzip.finish().unwrap();

        let mut brotli = brotli::CompressorWriter::new(Vec::new(), 4096, 5, 22);
        brotli.write_all(&gzipped).unwrap();
        let both = brotli.into_inner();

        let decoded = decode_body(&both, Some("gzip, br")).unwrap();
        assert_eq!(decoded, b"<title>stacked</title>");
    }

    #[test]
    fn test_decode_unknown_coding_fails() {
        assert!(decode_body(b"data", Some("compress")).is_err());
        assert!(decode_body(b"data", Some("gzip, zstd")).is_err());
    }

    #[test]
    fn test_charset_param() {
        assert_eq!(
            charset_param("text/html; charset=windows-1252"),
            Some("windows-1252")
        );
        assert_eq!(
            charset_param("text/html;Charset=\"Shift_JIS\""),
            Some("Shift_JIS")
        );
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn test_decode_text_uses_declared_charset() {
        let bytes = b"<title>Caf\xE9</title>";
        assert_eq!(
            decode_text(bytes, Some("text/html; charset=windows-1252")),
            "<title>Café</title>"
        );
        assert_eq!(
            decode_text(bytes, Some("text/html; charset=iso-8859-1")),
            "<title>Café</title>"
        );
    }

    #[test]
    fn test_decode_text_defaults_to_utf8() {
        let bytes = "<title>Café</title>".as_bytes();
        assert_eq!(decode_text(bytes, None), "<title>Café</title>");
        assert_eq!(
            decode_text(bytes, Some("text/html; charset=no-such-charset")),
            "<title>Café</title>"
        );
        assert_eq!(decode_text(b"Caf\xE9", Some("text/html")), "Caf\u{FFFD}");
    }
}
