//! Bridge between the sample collector and the `prometheus` registry.
//!
//! `CephExporter` implements `prometheus::core::Collector`: `desc()` advertises
//! every descriptor up front, `collect()` runs a scrape and turns the samples
//! into gauge families.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use prometheus::core::{Collector as PromCollector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts};
use tracing::warn;

use crate::collector::{Collector, CommandRunner, MappingError};
use crate::descriptors::{DescriptorRegistry, MetricDescriptor};
use crate::model::MetricSample;

/// Prometheus collector backed by `ceph` invocations.
pub struct CephExporter<R: CommandRunner> {
    collector: Collector<R>,
    descs: Vec<Desc>,
}

impl<R: CommandRunner> CephExporter<R> {
    /// Builds the Prometheus descriptors for every entry of the collector's
    /// registry. Fails only on names or labels Prometheus rejects.
    pub fn new(collector: Collector<R>) -> prometheus::Result<Self> {
        let descs = collector
            .registry()
            .descriptors()
            .values()
            .map(|d| {
                Desc::new(
                    d.full_name.clone(),
                    d.help_text.to_string(),
                    d.label_names.iter().map(|l| l.to_string()).collect(),
                    HashMap::new(),
                )
            })
            .collect::<prometheus::Result<Vec<_>>>()?;
        Ok(Self { collector, descs })
    }

    /// Turns samples into one gauge family per descriptor that has samples.
    ///
    /// Samples that do not fit their descriptor are logged and dropped.
    pub fn materialize(&self, samples: &[MetricSample]) -> Vec<MetricFamily> {
        let registry = self.collector.registry();
        let mut gauges: BTreeMap<&'static str, GaugeVec> = BTreeMap::new();

        for sample in samples {
            if let Err(e) = set_sample(registry, &mut gauges, sample) {
                warn!(error = %e, "dropping sample");
            }
        }

        gauges.values().flat_map(|g| g.collect()).collect()
    }
}

fn gauge_vec(desc: &MetricDescriptor) -> Result<GaugeVec, MappingError> {
    GaugeVec::new(
        Opts::new(desc.full_name.clone(), desc.help_text),
        desc.label_names,
    )
    .map_err(|e| MappingError::Rejected {
        key: desc.key.to_string(),
        reason: e.to_string(),
    })
}

fn set_sample(
    registry: &DescriptorRegistry,
    gauges: &mut BTreeMap<&'static str, GaugeVec>,
    sample: &MetricSample,
) -> Result<(), MappingError> {
    let desc = registry
        .get(sample.key)
        .ok_or_else(|| MappingError::UnknownKey(sample.key.to_string()))?;
    if desc.label_names.len() != sample.label_values.len() {
        return Err(MappingError::LabelMismatch {
            key: desc.key.to_string(),
            expected: desc.label_names.len(),
            actual: sample.label_values.len(),
        });
    }

    let gauge = match gauges.entry(desc.key) {
        Entry::Occupied(e) => e.into_mut(),
        Entry::Vacant(e) => e.insert(gauge_vec(desc)?),
    };
    let values: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();
    gauge
        .get_metric_with_label_values(&values)
        .map_err(|e| MappingError::Rejected {
            key: desc.key.to_string(),
            reason: e.to_string(),
        })?
        .set(sample.value);
    Ok(())
}

impl<R: CommandRunner> PromCollector for CephExporter<R> {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let samples = self.collector.collect_samples();
        self.materialize(&samples)
    }
}
