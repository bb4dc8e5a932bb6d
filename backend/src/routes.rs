use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{dashboard, status};
use crate::state::AppState;

pub fn app_routes() -> Router<AppState> {
    Router::new()
        // Dashboard pages
        .route("/", get(dashboard::home))
        .route("/refresh", get(dashboard::manual_refresh))
        .route(
            "/edit/:filename",
            get(dashboard::edit_form).post(dashboard::edit_submit),
        )

        // Machine-readable status
        .route("/health", get(status::health_check))
        .route("/api/status", get(status::get_status))
}

pub fn create_app(state: AppState, cors_allowed_origins: Option<&str>) -> Router {
    app_routes()
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_allowed_origins))
        .with_state(state)
}

/// Build CORS layer from the configured origin list.
///
/// Without a list, CORS is permissive (for development only).
fn build_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS_ALLOWED_ORIGINS not set or empty, using permissive CORS (not recommended for production)"
        );
        return CorsLayer::permissive();
    }

    tracing::info!("CORS configured for origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StatusCache;
    use crate::refresh::RefreshJob;
    use crate::workbook::tests::{cell_text, create_workbook};
    use crate::workbook::{AVAILABLE_AGAIN_CELL, LAST_RESERVED_CELL};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use chrono::NaiveDate;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(dir: &TempDir) -> (Router, Arc<RefreshJob>) {
        let job = Arc::new(RefreshJob::new(dir.path(), StatusCache::new()));
        let state = AppState::new(Arc::clone(&job)).unwrap();
        (create_app(state, None), job)
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(app: Router, uri: &str, body: &'static str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_redirects_home(response: &Response) {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_home_renders_empty_cache() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let response = send_get(app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("No workbooks found"));
    }

    #[tokio::test]
    async fn test_refresh_rebuilds_and_redirects() {
        let dir = TempDir::new().unwrap();
        create_workbook(dir.path(), "golf.xlsx", Some("01.01.2024"), Some("05.01.2024"));
        let (app, job) = test_app(&dir);

        let response = send_get(app.clone(), "/refresh").await;
        assert_redirects_home(&response);
        assert!(job.cache().snapshot().get("golf.xlsx").is_some());

        let html = body_text(send_get(app, "/").await).await;
        assert!(html.contains("golf.xlsx"));
        assert!(html.contains("05.01.2024"));
    }

    #[tokio::test]
    async fn test_edit_unknown_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        create_workbook(dir.path(), "golf.xlsx", None, None);
        let (app, job) = test_app(&dir);
        let before = job.refresh().await.unwrap();

        let response = send_get(app.clone(), "/edit/polo.xlsx").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "File polo.xlsx not found");

        let response = post_form(app, "/edit/polo.xlsx", "last_reserved=2024-01-05").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(Arc::ptr_eq(&before, &job.cache().snapshot()));
    }

    #[tokio::test]
    async fn test_edit_form_prefills_cached_dates() {
        let dir = TempDir::new().unwrap();
        create_workbook(dir.path(), "golf.xlsx", Some("05.01.2024"), Some("10.01.2024"));
        let (app, job) = test_app(&dir);
        job.refresh().await.unwrap();

        let response = send_get(app, "/edit/golf.xlsx").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains(r#"value="2024-01-05""#));
        assert!(html.contains(r#"value="2024-01-10""#));
    }

    #[tokio::test]
    async fn test_edit_submit_writes_cells_and_rebuilds() {
        let dir = TempDir::new().unwrap();
        let path = create_workbook(dir.path(), "golf.xlsx", Some("01.12.2023"), Some("02.12.2023"));
        let (app, job) = test_app(&dir);

        let response = post_form(
            app,
            "/edit/golf.xlsx",
            "last_reserved=2024-01-05&available_again=2024-01-10",
        )
        .await;
        assert_redirects_home(&response);

        assert_eq!(cell_text(&path, LAST_RESERVED_CELL), "05.01.2024");
        assert_eq!(cell_text(&path, AVAILABLE_AGAIN_CELL), "10.01.2024");

        let snapshot = job.cache().snapshot();
        let record = snapshot.get("golf.xlsx").unwrap().record().unwrap();
        assert_eq!(record.last_reserved, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(record.available_again, NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[tokio::test]
    async fn test_edit_submit_blank_fields_clear_cells() {
        let dir = TempDir::new().unwrap();
        let path = create_workbook(dir.path(), "golf.xlsx", Some("01.12.2023"), Some("02.12.2023"));
        let (app, job) = test_app(&dir);

        let response = post_form(app, "/edit/golf.xlsx", "last_reserved=&available_again=").await;
        assert_redirects_home(&response);

        assert_eq!(cell_text(&path, LAST_RESERVED_CELL), "");
        assert_eq!(cell_text(&path, AVAILABLE_AGAIN_CELL), "");

        let snapshot = job.cache().snapshot();
        let record = snapshot.get("golf.xlsx").unwrap().record().unwrap();
        assert_eq!(record.last_reserved, None);
        assert_eq!(record.available_again, None);
        assert!(!record.available);
    }

    #[tokio::test]
    async fn test_edit_submit_failure_is_server_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        fs::write(&path, b"garbage").unwrap();
        let (app, _) = test_app(&dir);

        let response = post_form(app, "/edit/broken.xlsx", "last_reserved=2024-01-05").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.starts_with("Failed to save file:"));
        assert_eq!(fs::read(&path).unwrap(), b"garbage");
    }

    #[tokio::test]
    async fn test_api_status_returns_snapshot() {
        let dir = TempDir::new().unwrap();
        create_workbook(dir.path(), "golf.xlsx", None, Some("2020-01-01"));
        fs::write(dir.path().join("broken.xlsx"), b"garbage").unwrap();
        let (app, job) = test_app(&dir);
        job.refresh().await.unwrap();

        let response = send_get(app, "/api/status").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["cars"]["golf.xlsx"]["status"], "ready");
        assert_eq!(json["cars"]["golf.xlsx"]["available"], true);
        assert_eq!(json["cars"]["broken.xlsx"]["status"], "failed");
        assert_eq!(json["cars"]["broken.xlsx"]["kind"], "unreadable");
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let (app, _) = test_app(&dir);

        let response = send_get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
