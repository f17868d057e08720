//! HTTP request handlers: landing page, metrics exposition, health.

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, Response};
use prometheus::{Encoder, TextEncoder};
use tracing::{debug, error};

use crate::state::AppState;

// ============================================================
// Landing page
// ============================================================

pub(crate) async fn handle_landing(State(state): State<AppState>) -> Html<String> {
    Html(landing_page(&state.metrics_path))
}

fn landing_page(metrics_path: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <title>Ceph Exporter</title>\n\
         <h1>Ceph Exporter</h1>\n\
         <p><a href=\"{path}\">Metrics</a></p>\n",
        path = escape_html(metrics_path)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================
// Metrics
// ============================================================

pub(crate) async fn handle_metrics(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let registry = state.registry.clone();
    // Gathering spawns ceph processes and blocks until they exit.
    let body = tokio::task::spawn_blocking(move || {
        let families = registry.gather();
        let mut buf = Vec::new();
        TextEncoder::new().encode(&families, &mut buf).map(|_| buf)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "metrics gathering panicked");
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!(error = %e, "failed to encode metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    debug!(bytes = body.len(), "metrics rendered");
    Response::builder()
        .header(header::CONTENT_TYPE, TextEncoder::new().format_type())
        .body(Body::from(body))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

// ============================================================
// Health
// ============================================================

pub(crate) async fn handle_health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::Request;
    use ceph_exporter_core::collector::{Collector, MockCeph};
    use ceph_exporter_core::descriptors::DescriptorRegistry;
    use ceph_exporter_core::exporter::CephExporter;
    use prometheus::Registry;
    use tower::ServiceExt;

    fn app(ceph: MockCeph, metrics_path: &str) -> axum::Router {
        let collector = Collector::new(ceph, Arc::new(DescriptorRegistry::new()));
        let registry = Registry::new();
        registry
            .register(Box::new(CephExporter::new(collector).unwrap()))
            .unwrap();
        crate::router(AppState::new(registry, metrics_path))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, String, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("/metrics"), "/metrics");
        assert_eq!(escape_html("/a\"><script>"), "/a&quot;&gt;&lt;script&gt;");
    }

    #[tokio::test]
    async fn test_landing_page_links_metrics_path() {
        let (status, content_type, body) = get(app(MockCeph::new(), "/probe"), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/html"));
        assert!(body.contains("<title>Ceph Exporter</title>"));
        assert!(body.contains(r#"<a href="/probe">Metrics</a>"#));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let (status, content_type, body) =
            get(app(MockCeph::healthy_cluster(), "/metrics"), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/plain"));
        assert!(body.contains("# TYPE ceph_osd_status gauge"));
        assert!(body.contains(r#"ceph_osd_status{class="hdd",name="osd.1"} 1"#));
        assert!(body.contains("ceph_total_used_raw_ratio 0.03125"));
    }

    #[tokio::test]
    async fn test_metrics_with_broken_ceph_still_ok() {
        let (status, _, body) = get(app(MockCeph::new(), "/metrics"), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("ceph_"));
    }

    #[tokio::test]
    async fn test_custom_metrics_path() {
        let (status, _, body) =
            get(app(MockCeph::empty_cluster(), "/ceph/metrics"), "/ceph/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("ceph_num_osds 0"));

        let (status, _, _) = get(app(MockCeph::empty_cluster(), "/ceph/metrics"), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _, body) = get(app(MockCeph::new(), "/metrics"), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
