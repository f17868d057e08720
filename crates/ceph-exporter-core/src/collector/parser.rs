//! Parsers for `ceph -f json` output.
//!
//! Decoding is total: absent objects, absent fields and `null` values fall
//! back to zero values, including `null` map entries, `null` array elements
//! and a bare `null` document. Unknown fields are ignored. Only output that is not
//! JSON, or holds a value of the wrong JSON type, is rejected.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use super::error::ParseError;
use crate::model::{ClassUsage, ClusterUsageSnapshot, DeviceUsageRecord};

/// Treats JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// `ceph df`
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(default)]
struct DfOutput {
    #[serde(deserialize_with = "null_as_default")]
    stats: DfStats,
    #[serde(deserialize_with = "null_as_default")]
    stats_by_class: HashMap<String, Option<DfClassStats>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DfStats {
    #[serde(deserialize_with = "null_as_default")]
    total_bytes: i64,
    #[serde(deserialize_with = "null_as_default")]
    total_avail_bytes: i64,
    #[serde(deserialize_with = "null_as_default")]
    total_used_raw_bytes: i64,
    #[serde(deserialize_with = "null_as_default")]
    total_used_raw_ratio: f64,
    #[serde(deserialize_with = "null_as_default")]
    num_osds: i64,
    #[serde(deserialize_with = "null_as_default")]
    num_per_pool_osds: i64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DfClassStats {
    #[serde(deserialize_with = "null_as_default")]
    total_bytes: i64,
    #[serde(deserialize_with = "null_as_default")]
    total_avail_bytes: i64,
    #[serde(deserialize_with = "null_as_default")]
    total_used_raw_bytes: i64,
    #[serde(deserialize_with = "null_as_default")]
    total_used_raw_ratio: f64,
}

impl From<DfClassStats> for ClassUsage {
    fn from(s: DfClassStats) -> Self {
        Self {
            total_bytes: s.total_bytes,
            avail_bytes: s.total_avail_bytes,
            used_raw_bytes: s.total_used_raw_bytes,
            used_raw_ratio: s.total_used_raw_ratio,
        }
    }
}

impl From<DfOutput> for ClusterUsageSnapshot {
    fn from(df: DfOutput) -> Self {
        Self {
            total_bytes: df.stats.total_bytes,
            avail_bytes: df.stats.total_avail_bytes,
            used_raw_bytes: df.stats.total_used_raw_bytes,
            used_raw_ratio: df.stats.total_used_raw_ratio,
            num_osds: df.stats.num_osds,
            pool_per_osd: df.stats.num_per_pool_osds,
            per_class: df
                .stats_by_class
                .into_iter()
                .map(|(class, stats)| (class, stats.unwrap_or_default().into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// `ceph osd df`
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
#[serde(default)]
struct OsdDfOutput {
    #[serde(deserialize_with = "null_as_default")]
    nodes: Vec<Option<OsdDfNode>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OsdDfNode {
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    device_class: String,
    #[serde(deserialize_with = "null_as_default")]
    kb: i64,
    #[serde(deserialize_with = "null_as_default")]
    kb_used: i64,
    #[serde(deserialize_with = "null_as_default")]
    kb_used_data: i64,
    #[serde(deserialize_with = "null_as_default")]
    kb_used_omap: i64,
    #[serde(deserialize_with = "null_as_default")]
    kb_used_meta: i64,
    #[serde(deserialize_with = "null_as_default")]
    pgs: i64,
    #[serde(deserialize_with = "null_as_default")]
    status: String,
}

impl From<OsdDfNode> for DeviceUsageRecord {
    fn from(n: OsdDfNode) -> Self {
        Self {
            name: n.name,
            device_class: n.device_class,
            total_kb: n.kb,
            used_kb: n.kb_used,
            data_used_kb: n.kb_used_data,
            omap_used_kb: n.kb_used_omap,
            meta_used_kb: n.kb_used_meta,
            pg_count: n.pgs,
            status: n.status,
        }
    }
}

fn trimmed(raw: &[u8]) -> Result<&[u8], ParseError> {
    let raw = raw.trim_ascii();
    if raw.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(raw)
}

/// Parses `ceph -f json df` output.
pub fn parse_cluster_usage(raw: &[u8]) -> Result<ClusterUsageSnapshot, ParseError> {
    let df: Option<DfOutput> = serde_json::from_slice(trimmed(raw)?)?;
    Ok(df.unwrap_or_default().into())
}

/// Parses `ceph -f json osd df` output into one record per OSD, in output order.
pub fn parse_device_usage(raw: &[u8]) -> Result<Vec<DeviceUsageRecord>, ParseError> {
    let osd_df: Option<OsdDfOutput> = serde_json::from_slice(trimmed(raw)?)?;
    Ok(osd_df
        .unwrap_or_default()
        .nodes
        .into_iter()
        .map(|node| node.unwrap_or_default().into())
        .collect())
}
