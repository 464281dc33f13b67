//! HTTP API.
//!
//! Provides four endpoints:
//! - `POST /analyze-seo` - full report: fields, score and validation
//! - `POST /fetch-meta` - meta tags and basic validation
//! - `POST /preview` - platform preview for caller-supplied meta tags
//! - `GET /health` - liveness probe

use crate::analyzer::SeoAnalyzer;
use crate::error::AnalyzeError;
use crate::models::{AdvancedSeoData, MetaTags, MetaValidation, PlatformPreview};
use crate::preview::{self, Platform};
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, web};
use serde::{Deserialize, Serialize};

/// Shared across workers. The analyzer only carries the connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub analyzer: SeoAnalyzer,
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default)]
    pub meta_tags: MetaTags,
    pub platform: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub data: AdvancedSeoData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchMetaResponse {
    pub meta_tags: MetaTags,
    pub validation: MetaValidation,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub preview: PlatformPreview,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_json(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        error: message.into(),
    })
}

impl ResponseError for AnalyzeError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::MissingUrl | AnalyzeError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AnalyzeError::FetchFailed { .. }
            | AnalyzeError::Network(_)
            | AnalyzeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        error_json(status, self.public_message())
    }
}

async fn analyze_seo(
    state: web::Data<AppState>,
    body: web::Json<UrlRequest>,
) -> Result<HttpResponse, AnalyzeError> {
    let url = body.into_inner().url.unwrap_or_default();
    let data = state.analyzer.analyze_seo(&url).await?;
    Ok(HttpResponse::Ok().json(AnalyzeResponse { data }))
}

async fn fetch_meta(
    state: web::Data<AppState>,
    body: web::Json<UrlRequest>,
) -> Result<HttpResponse, AnalyzeError> {
    let url = body.into_inner().url.unwrap_or_default();
    let report = state.analyzer.fetch_meta(&url).await?;
    Ok(HttpResponse::Ok().json(FetchMetaResponse {
        meta_tags: report.meta_tags,
        validation: report.validation,
    }))
}

async fn platform_preview(body: web::Json<PreviewRequest>) -> HttpResponse {
    let request = body.into_inner();
    match request.platform.parse::<Platform>() {
        Ok(platform) => HttpResponse::Ok().json(PreviewResponse {
            preview: preview::preview(&request.meta_tags, platform),
        }),
        Err(e) => error_json(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Registers the routes and the JSON body error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        let response = error_json(StatusCode::BAD_REQUEST, "Invalid request body");
        InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .route("/analyze-seo", web::post().to(analyze_seo))
        .route("/fetch-meta", web::post().to(fetch_meta))
        .route("/preview", web::post().to(platform_preview))
        .route("/health", web::get().to(health));
}

/// Binds and runs the API until the process is stopped.
pub async fn serve(host: &str, port: u16, analyzer: SeoAnalyzer) -> anyhow::Result<()> {
    let state = web::Data::new(AppState { analyzer });

    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))
        .map_err(|e| anyhow::anyhow!("Failed to bind API server to {}:{}: {}", host, port, e))?;

    for addr in server.addrs() {
        tracing::info!(addr = %addr, "API server listening");
    }

    server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("API server error: {}", e))?;

    Ok(())
}
