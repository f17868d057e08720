//! Exported metric descriptors.
//!
//! Every gauge the exporter can emit is declared here once. A descriptor ties
//! the stable internal key used by the mapper (e.g. `osd_status`) to the name,
//! help text and label schema visible to Prometheus (e.g. `ceph_osd_status`).
//! The table is enumerable before any scrape has run, which is what the
//! registry's describe phase relies on.

use std::collections::BTreeMap;

/// Prefix of every exported metric name.
pub const NAMESPACE: &str = "ceph";

/// Stable internal keys, shared by the mapper and the descriptor table.
pub mod keys {
    pub const TOTAL_BYTES: &str = "total_bytes";
    pub const TOTAL_AVAIL_BYTES: &str = "total_avail_bytes";
    pub const TOTAL_USED_RAW_BYTES: &str = "total_used_raw_bytes";
    pub const TOTAL_USED_RAW_RATIO: &str = "total_used_raw_ratio";
    pub const NUM_OSDS: &str = "num_osds";
    pub const POOL_PER_OSD: &str = "pool_per_osd";

    pub const BY_CLASS_TOTAL_BYTES: &str = "by_class_total_bytes";
    pub const BY_CLASS_TOTAL_AVAIL_BYTES: &str = "by_class_total_avail_bytes";
    pub const BY_CLASS_USED_RAW_BYTES: &str = "by_class_used_raw_bytes";
    pub const BY_CLASS_USED_RAW_RATIO: &str = "by_class_used_raw_ratio";

    pub const OSD_TOTAL_BYTES: &str = "osd_total_bytes";
    pub const OSD_USED_BYTES: &str = "osd_used_bytes";
    pub const OSD_DATA_USED_BYTES: &str = "osd_data_used_bytes";
    pub const OSD_OMAP_USED_BYTES: &str = "osd_omap_used_bytes";
    pub const OSD_META_USED_BYTES: &str = "osd_meta_used_bytes";
    pub const OSD_PGS: &str = "osd_pgs";
    pub const OSD_STATUS: &str = "osd_status";
}

const NO_LABELS: &[&str] = &[];
const CLASS_LABELS: &[&str] = &["class"];
const OSD_LABELS: &[&str] = &["name", "class"];

/// (key, name without namespace, help, label names)
const DESCRIPTOR_TABLE: &[(&str, &str, &str, &[&str])] = &[
    (keys::TOTAL_BYTES, "total_bytes", "cluster total bytes", NO_LABELS),
    (
        keys::TOTAL_AVAIL_BYTES,
        "total_avail_bytes",
        "cluster total avail bytes",
        NO_LABELS,
    ),
    (
        keys::TOTAL_USED_RAW_BYTES,
        "total_used_raw_bytes",
        "cluster total used bytes",
        NO_LABELS,
    ),
    (
        keys::TOTAL_USED_RAW_RATIO,
        "total_used_raw_ratio",
        "cluster total used ratio",
        NO_LABELS,
    ),
    (keys::NUM_OSDS, "num_osds", "number osds", NO_LABELS),
    (
        keys::POOL_PER_OSD,
        "pool_per_osd",
        "number osds per pool",
        NO_LABELS,
    ),
    (
        keys::BY_CLASS_TOTAL_BYTES,
        "stats_by_class_total_bytes",
        "stats by class total bytes",
        CLASS_LABELS,
    ),
    (
        keys::BY_CLASS_TOTAL_AVAIL_BYTES,
        "stats_by_class_total_avail_bytes",
        "stats by class total avail bytes",
        CLASS_LABELS,
    ),
    (
        keys::BY_CLASS_USED_RAW_BYTES,
        "stats_by_class_used_raw_bytes",
        "stats by class used bytes",
        CLASS_LABELS,
    ),
    (
        keys::BY_CLASS_USED_RAW_RATIO,
        "stats_by_class_used_raw_ratio",
        "stats by class used ratio",
        CLASS_LABELS,
    ),
    (
        keys::OSD_TOTAL_BYTES,
        "osd_total_bytes",
        "osd total bytes",
        OSD_LABELS,
    ),
    (
        keys::OSD_USED_BYTES,
        "osd_used_bytes",
        "osd used bytes",
        OSD_LABELS,
    ),
    (
        keys::OSD_DATA_USED_BYTES,
        "osd_data_used_bytes",
        "osd data used bytes",
        OSD_LABELS,
    ),
    (
        keys::OSD_OMAP_USED_BYTES,
        "osd_omap_used_bytes",
        "osd omap used bytes",
        OSD_LABELS,
    ),
    (
        keys::OSD_META_USED_BYTES,
        "osd_meta_used_bytes",
        "osd meta used bytes",
        OSD_LABELS,
    ),
    (keys::OSD_PGS, "osd_pgs", "number pgs in osd", OSD_LABELS),
    (keys::OSD_STATUS, "osd_status", "osd status", OSD_LABELS),
];

/// Name, help text and label schema of one exported gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    /// Internal key, e.g. `osd_used_bytes`.
    pub key: &'static str,
    /// Exported name including the namespace, e.g. `ceph_osd_used_bytes`.
    pub full_name: String,
    pub help_text: &'static str,
    /// Label names in the order samples supply their values.
    pub label_names: &'static [&'static str],
}

/// Immutable set of all descriptors, keyed by internal key.
///
/// Built once at startup and shared (usually behind an `Arc`) by the mapper
/// side and the Prometheus registration side.
#[derive(Debug, Clone)]
pub struct DescriptorRegistry {
    descriptors: BTreeMap<&'static str, MetricDescriptor>,
}

impl DescriptorRegistry {
    /// Creates the registry with the default `ceph` namespace.
    pub fn new() -> Self {
        Self::with_namespace(NAMESPACE)
    }

    /// Creates the registry with a custom namespace prefix.
    pub fn with_namespace(namespace: &str) -> Self {
        let descriptors = DESCRIPTOR_TABLE
            .iter()
            .map(|&(key, name, help_text, label_names)| {
                let descriptor = MetricDescriptor {
                    key,
                    full_name: format!("{namespace}_{name}"),
                    help_text,
                    label_names,
                };
                (key, descriptor)
            })
            .collect();
        Self { descriptors }
    }

    pub fn get(&self, key: &str) -> Option<&MetricDescriptor> {
        self.descriptors.get(key)
    }

    /// Every descriptor by key, in stable key order.
    pub fn descriptors(&self) -> &BTreeMap<&'static str, MetricDescriptor> {
        &self.descriptors
    }

}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
