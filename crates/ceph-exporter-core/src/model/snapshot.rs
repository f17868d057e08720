//! Decoded `ceph df` and `ceph osd df` snapshots.
//!
//! Field names follow the meaning of the values rather than the JSON keys;
//! the mapping from JSON lives in `collector::parser`.

use std::collections::HashMap;

/// Cluster-wide usage.
///
/// Source: `ceph -f json df`, objects `stats` and `stats_by_class`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ClusterUsageSnapshot {
    /// Raw capacity of all OSDs (bytes).
    /// Source: `stats.total_bytes`
    pub total_bytes: i64,

    /// Raw capacity still available (bytes).
    /// Source: `stats.total_avail_bytes`
    pub avail_bytes: i64,

    /// Raw capacity consumed, including replication overhead (bytes).
    /// Source: `stats.total_used_raw_bytes`
    pub used_raw_bytes: i64,

    /// `used_raw_bytes / total_bytes`, in [0, 1].
    /// Source: `stats.total_used_raw_ratio`
    pub used_raw_ratio: f64,

    /// Source: `stats.num_osds`
    pub num_osds: i64,

    /// Source: `stats.num_per_pool_osds`
    pub pool_per_osd: i64,

    /// Usage aggregated per device class ("hdd", "ssd", ...).
    /// Source: `stats_by_class`
    pub per_class: HashMap<String, ClassUsage>,
}

/// Usage of all OSDs sharing one device class.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ClassUsage {
    pub total_bytes: i64,
    pub avail_bytes: i64,
    pub used_raw_bytes: i64,
    pub used_raw_ratio: f64,
}

/// Usage of a single OSD.
///
/// Source: `ceph -f json osd df`, one entry of `nodes`.
/// Sizes are reported by ceph in kibibytes and kept that way here.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DeviceUsageRecord {
    /// OSD name, e.g. `osd.3`.
    pub name: String,
    pub device_class: String,
    pub total_kb: i64,
    pub used_kb: i64,
    pub data_used_kb: i64,
    pub omap_used_kb: i64,
    pub meta_used_kb: i64,
    /// Placement groups mapped to this OSD.
    pub pg_count: i64,
    /// `"up"` or anything else (`"down"`, `"destroyed"`, ...).
    pub status: String,
}
