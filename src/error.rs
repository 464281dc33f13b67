use thiserror::Error;

/// Errors that end an analysis request.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// Request body carried no URL.
    #[error("URL is required")]
    MissingUrl,

    /// Input is not an absolute http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The fetch did not complete within its wall-clock budget.
    #[error("Request timeout")]
    Timeout,

    /// Upstream answered with a non-2xx status.
    #[error("Failed to fetch URL: HTTP {status}")]
    FetchFailed { status: u16 },

    /// Connection, TLS or body decoding failure.
    #[error("Failed to fetch URL: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Failed to analyze SEO: {0}")]
    Internal(String),
}

impl AnalyzeError {
    /// Message returned to HTTP callers. Upstream details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AnalyzeError::MissingUrl => "URL is required",
            AnalyzeError::InvalidUrl(_) => "Invalid URL",
            AnalyzeError::Timeout => "Request timeout",
            AnalyzeError::FetchFailed { .. } | AnalyzeError::Network(_) => "Failed to fetch URL",
            AnalyzeError::Internal(_) => "Failed to analyze SEO",
        }
    }
}

impl From<reqwest::Error> for AnalyzeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalyzeError::Timeout
        } else if let Some(status) = err.status() {
            AnalyzeError::FetchFailed {
                status: status.as_u16(),
            }
        } else {
            AnalyzeError::Network(err)
        }
    }
}

/// A single field that could not be extracted. Never leaves the extractor.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("malformed JSON-LD block: {0}")]
    MalformedJsonLd(#[from] serde_json::Error),

    #[error("unresolvable URL '{value}': {source}")]
    BadUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_messages() {
        assert_eq!(
            AnalyzeError::InvalidUrl("nope".into()).public_message(),
            "Invalid URL"
        );
        assert_eq!(AnalyzeError::Timeout.public_message(), "Request timeout");
        assert_eq!(
            AnalyzeError::FetchFailed { status: 503 }.public_message(),
            "Failed to fetch URL"
        );
        assert_eq!(
            AnalyzeError::Internal("boom".into()).public_message(),
            "Failed to analyze SEO"
        );
    }

    #[test]
    fn test_fetch_failed_display_keeps_status() {
        let err = AnalyzeError::FetchFailed { status: 404 };
        assert_eq!(err.to_string(), "Failed to fetch URL: HTTP 404");
    }
}
