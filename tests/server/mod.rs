use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, web};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::time::Duration;

const ARTICLE_HTML: &str = include_str!("../static/article.html");
const BARE_HTML: &str = include_str!("../static/bare.html");

async fn article() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .append_header(("X-Content-Type-Options", "nosniff"))
        .append_header(("X-Frame-Options", "DENY"))
        .append_header(("Content-Security-Policy", "default-src 'self'"))
        .append_header(("Strict-Transport-Security", "max-age=63072000"))
        .body(ARTICLE_HTML)
}

async fn compressed() -> HttpResponse {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(ARTICLE_HTML.as_bytes())
        .expect("gzip encoding should not fail");
    let body = encoder.finish().expect("gzip encoding should not fail");

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .append_header(("Content-Encoding", "gzip"))
        .body(body)
}

async fn latin1() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=windows-1252")
        .body(&b"<html><head><title>Caf\xE9 cr\xE8me</title></head><body></body></html>"[..])
}

async fn slow() -> HttpResponse {
    tokio::time::sleep(Duration::from_secs(30)).await;
    HttpResponse::Ok().body(BARE_HTML)
}

/// Starts an upstream site on an ephemeral port and returns its base URL.
///
/// Routes:
/// - `/article` - fully tagged article with security headers
/// - `/compressed` - the article, gzip encoded
/// - `/latin1` - page encoded as windows-1252
/// - `/redirect` - 302 to `/article`
/// - `/not-found` - 404
/// - `/server-error` - 500
/// - `/slow` - answers after 30 seconds
/// - `/static/*` - files under `tests/static/`
pub async fn get_test_server_url() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route("/article", web::get().to(article))
            .route("/compressed", web::get().to(compressed))
            .route("/latin1", web::get().to(latin1))
            .route(
                "/redirect",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/article"))
                        .finish()
                }),
            )
            .route(
                "/not-found",
                web::get().to(|| async { HttpResponse::NotFound().body("Not Found") }),
            )
            .route(
                "/server-error",
                web::get().to(|| async { HttpResponse::InternalServerError().body("Error") }),
            )
            .route("/slow", web::get().to(slow))
            .service(Files::new("/static", "tests/static/").index_file("index.html"))
    })
    .workers(2)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}
