//! Maps decoded snapshots to gauge samples.
//!
//! This is where units and encodings are decided: `osd df` sizes arrive in
//! kibibytes and leave in bytes, OSD status leaves as 1 (up) or 0 (anything
//! else). Label values are always supplied in descriptor order.

use crate::descriptors::keys;
use crate::model::{ClusterUsageSnapshot, DeviceUsageRecord, MetricSample};

/// Bytes per kibibyte, as reported by `ceph osd df`.
const KIB: i64 = 1024;

/// Samples emitted per device class.
pub const SAMPLES_PER_CLASS: usize = 4;

/// Unlabeled cluster-wide samples emitted per `ceph df` snapshot.
pub const CLUSTER_SAMPLES: usize = 6;

/// Samples emitted per OSD.
pub const SAMPLES_PER_OSD: usize = 7;

fn kb_to_bytes(kb: i64) -> f64 {
    kb.saturating_mul(KIB) as f64
}

/// Encodes an OSD status string: 1 for `"up"`, 0 for everything else.
pub fn status_value(status: &str) -> f64 {
    if status == "up" { 1.0 } else { 0.0 }
}

/// Emits the six cluster-wide samples plus four samples per device class.
///
/// Class samples follow the iteration order of `per_class`, which is not
/// stable.
pub fn map_cluster_usage(cu: &ClusterUsageSnapshot) -> Vec<MetricSample> {
    let mut samples = Vec::with_capacity(CLUSTER_SAMPLES + SAMPLES_PER_CLASS * cu.per_class.len());

    samples.push(MetricSample::new(keys::TOTAL_BYTES, cu.total_bytes as f64));
    samples.push(MetricSample::new(
        keys::TOTAL_AVAIL_BYTES,
        cu.avail_bytes as f64,
    ));
    samples.push(MetricSample::new(
        keys::TOTAL_USED_RAW_BYTES,
        cu.used_raw_bytes as f64,
    ));
    samples.push(MetricSample::new(
        keys::TOTAL_USED_RAW_RATIO,
        cu.used_raw_ratio,
    ));
    samples.push(MetricSample::new(keys::NUM_OSDS, cu.num_osds as f64));
    samples.push(MetricSample::new(keys::POOL_PER_OSD, cu.pool_per_osd as f64));

    for (class, cs) in &cu.per_class {
        let labels = [class.as_str()];
        samples.push(MetricSample::labeled(
            keys::BY_CLASS_TOTAL_BYTES,
            cs.total_bytes as f64,
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::BY_CLASS_TOTAL_AVAIL_BYTES,
            cs.avail_bytes as f64,
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::BY_CLASS_USED_RAW_BYTES,
            cs.used_raw_bytes as f64,
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::BY_CLASS_USED_RAW_RATIO,
            cs.used_raw_ratio,
            labels,
        ));
    }

    samples
}

/// Emits seven samples per OSD, labeled `(name, class)`.
pub fn map_device_usage(osds: &[DeviceUsageRecord]) -> Vec<MetricSample> {
    let mut samples = Vec::with_capacity(SAMPLES_PER_OSD * osds.len());

    for osd in osds {
        let labels = [osd.name.as_str(), osd.device_class.as_str()];
        samples.push(MetricSample::labeled(
            keys::OSD_TOTAL_BYTES,
            kb_to_bytes(osd.total_kb),
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::OSD_USED_BYTES,
            kb_to_bytes(osd.used_kb),
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::OSD_DATA_USED_BYTES,
            kb_to_bytes(osd.data_used_kb),
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::OSD_OMAP_USED_BYTES,
            kb_to_bytes(osd.omap_used_kb),
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::OSD_META_USED_BYTES,
            kb_to_bytes(osd.meta_used_kb),
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::OSD_PGS,
            osd.pg_count as f64,
            labels,
        ));
        samples.push(MetricSample::labeled(
            keys::OSD_STATUS,
            status_value(&osd.status),
            labels,
        ));
    }

    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::parser::parse_cluster_usage;
    use crate::descriptors::DescriptorRegistry;
    use crate::model::ClassUsage;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{BTreeSet, HashMap};

    fn osd(name: &str, class: &str, status: &str) -> DeviceUsageRecord {
        DeviceUsageRecord {
            name: name.to_string(),
            device_class: class.to_string(),
            status: status.to_string(),
            ..DeviceUsageRecord::default()
        }
    }

    fn find<'a>(samples: &'a [MetricSample], key: &str, labels: &[&str]) -> &'a MetricSample {
        samples
            .iter()
            .find(|s| s.key == key && s.label_values == labels)
            .unwrap_or_else(|| panic!("no sample {} {:?}", key, labels))
    }

    fn synthetic_cluster(rng: &mut StdRng) -> ClusterUsageSnapshot {
        let classes = rng.random_range(0..5);
        ClusterUsageSnapshot {
            total_bytes: rng.random_range(0..1_000_000_000),
            avail_bytes: rng.random_range(0..1_000_000_000),
            used_raw_bytes: rng.random_range(0..1_000_000_000),
            used_raw_ratio: rng.random_range(0.0..1.0),
            num_osds: rng.random_range(0..10_000),
            pool_per_osd: rng.random_range(0..10_000),
            per_class: (0..classes)
                .map(|i| {
                    let usage = ClassUsage {
                        total_bytes: rng.random_range(0..1_000_000_000),
                        avail_bytes: rng.random_range(0..1_000_000_000),
                        used_raw_bytes: rng.random_range(0..1_000_000_000),
                        used_raw_ratio: rng.random_range(0.0..1.0),
                    };
                    (format!("class{}", i), usage)
                })
                .collect(),
        }
    }

    fn synthetic_osds(rng: &mut StdRng) -> Vec<DeviceUsageRecord> {
        let statuses = ["up", "down", "", "destroyed"];
        (0..rng.random_range(0..8))
            .map(|i| DeviceUsageRecord {
                name: format!("osd.{}", i),
                device_class: if rng.random_bool(0.5) { "hdd" } else { "ssd" }.to_string(),
                total_kb: rng.random_range(0..i64::MAX / 1024),
                used_kb: rng.random_range(0..1_000_000_000),
                data_used_kb: rng.random_range(0..1_000_000_000),
                omap_used_kb: rng.random_range(0..1_000_000),
                meta_used_kb: rng.random_range(0..1_000_000),
                pg_count: rng.random_range(0..512),
                status: statuses[rng.random_range(0..statuses.len())].to_string(),
            })
            .collect()
    }

    #[test]
    fn test_label_arity_matches_descriptors() {
        let registry = DescriptorRegistry::new();
        let mut rng = StdRng::seed_from_u64(0x9e37_79b9_7f4a_7c15);
        for _ in 0..200 {
            let mut samples = map_cluster_usage(&synthetic_cluster(&mut rng));
            samples.extend(map_device_usage(&synthetic_osds(&mut rng)));
            for sample in &samples {
                let desc = registry.get(sample.key).unwrap();
                assert_eq!(
                    desc.label_names.len(),
                    sample.label_values.len(),
                    "{}",
                    sample.key
                );
            }
        }
    }

    #[test]
    fn test_mapper_and_registry_key_sets_match() {
        let registry = DescriptorRegistry::new();
        let cu = ClusterUsageSnapshot {
            per_class: HashMap::from([("hdd".to_string(), ClassUsage::default())]),
            ..ClusterUsageSnapshot::default()
        };
        let mut samples = map_cluster_usage(&cu);
        samples.extend(map_device_usage(&[osd("osd.0", "hdd", "up")]));

        let emitted: BTreeSet<&str> = samples.iter().map(|s| s.key).collect();
        let declared: BTreeSet<&str> = registry.descriptors().keys().copied().collect();
        assert_eq!(emitted, declared);
    }

    #[test]
    fn test_kb_converted_to_bytes() {
        let record = DeviceUsageRecord {
            total_kb: 1,
            used_kb: 2,
            data_used_kb: 3,
            omap_used_kb: 4,
            meta_used_kb: 5,
            pg_count: 6,
            ..osd("osd.0", "hdd", "up")
        };
        let samples = map_device_usage(&[record]);
        let labels = ["osd.0", "hdd"];
        assert_eq!(find(&samples, keys::OSD_TOTAL_BYTES, &labels).value, 1024.0);
        assert_eq!(find(&samples, keys::OSD_USED_BYTES, &labels).value, 2048.0);
        assert_eq!(find(&samples, keys::OSD_DATA_USED_BYTES, &labels).value, 3072.0);
        assert_eq!(find(&samples, keys::OSD_OMAP_USED_BYTES, &labels).value, 4096.0);
        assert_eq!(find(&samples, keys::OSD_META_USED_BYTES, &labels).value, 5120.0);
        // pg count is a count, not a size
        assert_eq!(find(&samples, keys::OSD_PGS, &labels).value, 6.0);
    }

    #[test]
    fn test_kb_conversion_saturates() {
        let record = DeviceUsageRecord {
            total_kb: i64::MAX,
            ..osd("osd.0", "hdd", "up")
        };
        let samples = map_device_usage(&[record]);
        let total = find(&samples, keys::OSD_TOTAL_BYTES, &["osd.0", "hdd"]).value;
        assert!(total > 0.0);
        assert_eq!(total, i64::MAX as f64);
    }

    #[test]
    fn test_status_encoding() {
        assert_eq!(status_value("up"), 1.0);
        assert_eq!(status_value("down"), 0.0);
        assert_eq!(status_value(""), 0.0);
        assert_eq!(status_value("destroyed"), 0.0);
        assert_eq!(status_value("UP"), 0.0);
        assert_eq!(status_value(" up"), 0.0);

        let samples = map_device_usage(&[osd("osd.0", "hdd", "up"), osd("osd.1", "ssd", "down")]);
        assert_eq!(find(&samples, keys::OSD_STATUS, &["osd.0", "hdd"]).value, 1.0);
        assert_eq!(find(&samples, keys::OSD_STATUS, &["osd.1", "ssd"]).value, 0.0);
    }

    #[test]
    fn test_device_samples_per_osd() {
        let osds = vec![
            osd("osd.0", "hdd", "up"),
            osd("osd.1", "hdd", "up"),
            osd("osd.2", "ssd", "down"),
        ];
        let samples = map_device_usage(&osds);
        assert_eq!(samples.len(), 3 * SAMPLES_PER_OSD);
        assert!(samples.iter().all(|s| s.label_values.len() == 2));
    }

    #[test]
    fn test_empty_device_list() {
        assert!(map_device_usage(&[]).is_empty());
    }

    #[test]
    fn test_empty_per_class_still_emits_cluster_samples() {
        let samples = map_cluster_usage(&ClusterUsageSnapshot::default());
        assert_eq!(samples.len(), CLUSTER_SAMPLES);
        assert!(samples.iter().all(|s| s.label_values.is_empty()));
        assert!(samples.iter().all(|s| s.value == 0.0));
    }

    #[test]
    fn test_class_samples_are_not_cross_labeled() {
        let per_class: HashMap<String, ClassUsage> = ["hdd", "ssd", "nvme"]
            .iter()
            .enumerate()
            .map(|(i, class)| {
                let usage = ClassUsage {
                    total_bytes: (i as i64 + 1) * 100,
                    avail_bytes: (i as i64 + 1) * 10,
                    used_raw_bytes: (i as i64 + 1) * 90,
                    used_raw_ratio: 0.9,
                };
                (class.to_string(), usage)
            })
            .collect();
        let cu = ClusterUsageSnapshot {
            per_class: per_class.clone(),
            ..ClusterUsageSnapshot::default()
        };

        let samples = map_cluster_usage(&cu);
        let labeled: Vec<_> = samples.iter().filter(|s| !s.label_values.is_empty()).collect();
        assert_eq!(labeled.len(), SAMPLES_PER_CLASS * per_class.len());

        for (class, usage) in &per_class {
            let labels = [class.as_str()];
            assert_eq!(
                find(&samples, keys::BY_CLASS_TOTAL_BYTES, &labels).value,
                usage.total_bytes as f64
            );
            assert_eq!(
                find(&samples, keys::BY_CLASS_TOTAL_AVAIL_BYTES, &labels).value,
                usage.avail_bytes as f64
            );
            assert_eq!(
                find(&samples, keys::BY_CLASS_USED_RAW_BYTES, &labels).value,
                usage.used_raw_bytes as f64
            );
            let count = labeled.iter().filter(|s| s.label_values == labels).count();
            assert_eq!(count, SAMPLES_PER_CLASS);
        }
    }

    #[test]
    fn test_df_document_maps_to_ten_samples() {
        let raw = br#"{"stats":{"total_bytes":100,"total_avail_bytes":40,"total_used_raw_bytes":60,"total_used_raw_ratio":0.6,"num_osds":3,"num_per_pool_osds":1},"stats_by_class":{"hdd":{"total_bytes":100,"total_avail_bytes":40,"total_used_bytes":60,"total_used_raw_bytes":60,"total_used_raw_ratio":0.6}},"pools":[]}"#;
        let samples = map_cluster_usage(&parse_cluster_usage(raw).unwrap());

        assert_eq!(samples.len(), 10);
        assert_eq!(find(&samples, keys::TOTAL_BYTES, &[]).value, 100.0);
        assert_eq!(find(&samples, keys::TOTAL_AVAIL_BYTES, &[]).value, 40.0);
        assert_eq!(find(&samples, keys::TOTAL_USED_RAW_BYTES, &[]).value, 60.0);
        assert_eq!(find(&samples, keys::TOTAL_USED_RAW_RATIO, &[]).value, 0.6);
        assert_eq!(find(&samples, keys::NUM_OSDS, &[]).value, 3.0);
        assert_eq!(find(&samples, keys::POOL_PER_OSD, &[]).value, 1.0);
        assert_eq!(find(&samples, keys::BY_CLASS_TOTAL_BYTES, &["hdd"]).value, 100.0);
        assert_eq!(find(&samples, keys::BY_CLASS_USED_RAW_RATIO, &["hdd"]).value, 0.6);
    }
}
