//! ceph-exporter-core — turns `ceph -f json` status snapshots into gauges.
//!
//! Provides:
//! - `descriptors` — the immutable table of exported metric descriptors
//! - `model` — decoded snapshot records and emitted metric samples
//! - `collector` — command invocation, snapshot parsing, metric mapping
//!   and the per-scrape orchestrator (`collector::mock` holds an in-memory
//!   `ceph` replacement with canned scenarios)
//! - `exporter` — bridge to the `prometheus` client registry

pub mod collector;
pub mod descriptors;
pub mod exporter;
pub mod model;

/// Crate version with the short git SHA, e.g. `0.1.0 (a1b2c3d)`.
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");
