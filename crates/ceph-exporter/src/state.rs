//! Shared application state.

use std::sync::Arc;

use prometheus::Registry;

#[derive(Clone)]
pub(crate) struct AppState {
    /// Holds the `CephExporter`; gathering it runs a scrape.
    pub(crate) registry: Registry,
    /// Path the metrics are served under, e.g. `/metrics`.
    pub(crate) metrics_path: Arc<str>,
}

impl AppState {
    pub(crate) fn new(registry: Registry, metrics_path: &str) -> Self {
        Self {
            registry,
            metrics_path: Arc::from(metrics_path),
        }
    }
}
