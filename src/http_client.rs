use anyhow::Result;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;

/// User-Agent sent with every fetch unless the config overrides it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; seolens/0.1; +https://github.com/nelsonlaidev/seolens)";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Creates a reqwest client with the crate's User-Agent and browser-like headers.
///
/// Decompression is left to the fetcher so the `Content-Encoding` header
/// survives. The client-level timeout is a backstop; callers enforce their
/// own budget around each request.
pub fn build_http_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        header::HeaderValue::from_static(ACCEPT_ENCODING),
    );

    let client = ClientBuilder::new()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_with_default_agent() {
        assert!(build_http_client(DEFAULT_USER_AGENT, 15).is_ok());
    }

    #[test]
    fn test_build_client_rejects_invalid_agent() {
        assert!(build_http_client("bad\nagent", 15).is_err());
    }
}
