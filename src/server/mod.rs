// src/server/mod.rs — Static asset dev server
//
// Serves the working directory with permissive CORS so the accompanying
// web page can call the Groq API straight from the browser during
// development. Not part of the bot runtime.

use std::path::PathBuf;

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Request paths with these suffixes stay out of the access log.
const QUIET_SUFFIXES: &[&str] = &[".css", ".js", ".ico", ".png", ".jpg", ".woff"];

pub fn build_router(root: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .fallback_service(ServeDir::new(root))
        .layer(middleware::from_fn(log_and_no_cache))
        .layer(cors)
}

fn is_quiet_path(path: &str) -> bool {
    QUIET_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

async fn log_and_no_cache(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache"),
    );

    if !is_quiet_path(&path) {
        tracing::info!("{} {} -> {}", method, path, response.status());
    }
    response
}

/// Serve `root` on 127.0.0.1:<port> until the process is stopped.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let addr = format!("127.0.0.1:{port}");
    let router = build_router(root);

    tracing::info!("dev server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_quiet_path_filter() {
        assert!(is_quiet_path("/app/main.js"));
        assert!(is_quiet_path("/style.css"));
        assert!(is_quiet_path("/favicon.ico"));
        assert!(!is_quiet_path("/index.html"));
        assert!(!is_quiet_path("/"));
    }

    #[tokio::test]
    async fn test_preflight_is_allowed() {
        let app = build_router(std::env::temp_dir());
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/index.html")
            .header("Origin", "http://localhost:8081")
            .header("Access-Control-Request-Method", "GET")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_serves_file_with_cors_and_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let app = build_router(dir.path().to_path_buf());
        let req = Request::builder()
            .uri("/index.html")
            .header("Origin", "http://localhost:8081")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["cache-control"], "no-cache");
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(dir.path().to_path_buf());
        let req = Request::builder()
            .uri("/nope.html")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
