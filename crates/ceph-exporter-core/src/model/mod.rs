//! Scrape-scoped records.
//!
//! Snapshots are decoded from one `ceph` invocation and dropped once mapped;
//! samples are handed straight to the Prometheus bridge. Nothing here lives
//! across scrapes.

pub mod sample;
pub mod snapshot;

pub use sample::MetricSample;
pub use snapshot::{ClassUsage, ClusterUsageSnapshot, DeviceUsageRecord};
