use crate::error::AnalyzeError;
use crate::extractor;
use crate::fetcher::{ANALYZE_TIMEOUT, FetchedPage, Fetcher, META_TIMEOUT};
use crate::models::{AdvancedSeoData, MetaReport};
use crate::scorer;
use crate::validator;
use reqwest::Client;
use std::time::Duration;

/// Fetch budgets for the two analysis paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub analyze: Duration,
    pub meta: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            analyze: ANALYZE_TIMEOUT,
            meta: META_TIMEOUT,
        }
    }
}

/// Runs the fetch → extract → {score, validate} pipeline.
///
/// Holds no per-request state, so one instance serves any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct SeoAnalyzer {
    fetcher: Fetcher,
    timeouts: Timeouts,
}

impl SeoAnalyzer {
    pub fn new(client: Client, timeouts: Timeouts) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            timeouts,
        }
    }

    /// Full analysis: every extracted field, the score and the validation.
    pub async fn analyze_seo(&self, url: &str) -> Result<AdvancedSeoData, AnalyzeError> {
        let page = self.fetcher.fetch(url, self.timeouts.analyze).await?;
        log_fetched(&page);
        let final_url = page.final_url.clone();
        let report = off_runtime(move || build_report(&page)).await?;

        tracing::info!(
            url = %final_url,
            overall = report.seo_score.overall,
            errors = report.validation.errors.len(),
            warnings = report.validation.warnings.len(),
            "SEO analysis complete"
        );

        Ok(report)
    }

    /// Meta tags only, with the shorter budget.
    pub async fn fetch_meta(&self, url: &str) -> Result<MetaReport, AnalyzeError> {
        let page = self.fetcher.fetch(url, self.timeouts.meta).await?;
        log_fetched(&page);
        let final_url = page.final_url.clone();
        let meta_tags =
            off_runtime(move || extractor::extract_meta(&page.body, &page.final_url)).await?;
        let validation = validator::validate_meta(&meta_tags);

        tracing::info!(url = %final_url, valid = validation.is_valid, "Meta fetch complete");

        Ok(MetaReport {
            meta_tags,
            validation,
        })
    }
}

fn log_fetched(page: &FetchedPage) {
    if page.url != page.final_url {
        tracing::debug!(
            requested = %page.url,
            final_url = %page.final_url,
            status = page.status,
            "Followed redirect"
        );
    }
}

/// Runs HTML parsing on the blocking pool. A panic inside extraction
/// surfaces as `Internal` instead of taking the worker down.
async fn off_runtime<T, F>(work: F) -> Result<T, AnalyzeError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "Extraction task failed");
        AnalyzeError::Internal(e.to_string())
    })
}

/// Builds the advanced report for an already fetched page.
///
/// Scoring and validation read the same fields but share nothing else.
pub fn build_report(page: &FetchedPage) -> AdvancedSeoData {
    let fields = extractor::extract(&page.body, &page.final_url, &page.headers);
    let seo_score = scorer::score(&fields);
    let validation = validator::validate_page(&fields);

    AdvancedSeoData {
        fields,
        seo_score,
        validation,
        analyzed_at: chrono::Utc::now().to_rfc3339(),
    }
}
