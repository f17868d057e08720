//! Per-scrape orchestrator.
//!
//! The `Collector` runs both sub-collections (`ceph df`, `ceph osd df`) and
//! concatenates their samples. A failing sub-collection is logged and
//! contributes nothing; it never hides the other one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::collector::error::CollectError;
use crate::collector::mapper::{map_cluster_usage, map_device_usage};
use crate::collector::parser::{parse_cluster_usage, parse_device_usage};
use crate::collector::traits::CommandRunner;
use crate::descriptors::DescriptorRegistry;
use crate::model::MetricSample;

/// Subcommand for cluster-wide usage.
pub const CLUSTER_USAGE_ARGS: &[&str] = &["df"];

/// Subcommand for per-OSD usage.
pub const DEVICE_USAGE_ARGS: &[&str] = &["osd", "df"];

/// Timing information for each sub-collection of one scrape.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    pub total: Duration,
    /// `ceph df` invoke + parse + map.
    pub cluster_usage: Duration,
    /// `ceph osd df` invoke + parse + map.
    pub device_usage: Duration,
}

/// Collects Ceph usage samples through a `CommandRunner`.
pub struct Collector<R: CommandRunner> {
    runner: R,
    registry: Arc<DescriptorRegistry>,
}

impl<R: CommandRunner> Collector<R> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `runner` - Runs the `ceph` binary (real or mock)
    /// * `registry` - Descriptor table the samples are emitted against
    pub fn new(runner: R, registry: Arc<DescriptorRegistry>) -> Self {
        Self { runner, registry }
    }

    pub fn registry(&self) -> &Arc<DescriptorRegistry> {
        &self.registry
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Cluster-wide and per-class usage from `ceph df`.
    pub fn collect_cluster_usage(&self) -> Result<Vec<MetricSample>, CollectError> {
        let output = self.runner.run(CLUSTER_USAGE_ARGS)?;
        let usage = parse_cluster_usage(&output)?;
        debug!(classes = usage.per_class.len(), "parsed cluster usage");
        Ok(map_cluster_usage(&usage))
    }

    /// Per-OSD usage from `ceph osd df`.
    pub fn collect_device_usage(&self) -> Result<Vec<MetricSample>, CollectError> {
        let output = self.runner.run(DEVICE_USAGE_ARGS)?;
        let osds = parse_device_usage(&output)?;
        debug!(osds = osds.len(), "parsed device usage");
        Ok(map_device_usage(&osds))
    }

    /// Runs both sub-collections and returns whatever succeeded.
    pub fn collect_samples(&self) -> Vec<MetricSample> {
        self.collect_samples_timed().0
    }

    /// Like `collect_samples`, also reporting how long each part took.
    pub fn collect_samples_timed(&self) -> (Vec<MetricSample>, CollectorTiming) {
        let mut timing = CollectorTiming::default();
        let total_start = Instant::now();

        let start = Instant::now();
        let mut samples = degrade("df", self.collect_cluster_usage());
        timing.cluster_usage = start.elapsed();

        let start = Instant::now();
        samples.extend(degrade("osd df", self.collect_device_usage()));
        timing.device_usage = start.elapsed();

        timing.total = total_start.elapsed();
        debug!(
            samples = samples.len(),
            total_ms = timing.total.as_millis() as u64,
            df_ms = timing.cluster_usage.as_millis() as u64,
            osd_df_ms = timing.device_usage.as_millis() as u64,
            "scrape collected"
        );
        (samples, timing)
    }
}

/// Turns a failed sub-collection into zero samples, logging why.
fn degrade(source: &str, result: Result<Vec<MetricSample>, CollectError>) -> Vec<MetricSample> {
    match result {
        Ok(samples) => samples,
        Err(e) => {
            warn!(source, error = %e, "sub-collection failed, skipping its metrics");
            Vec::new()
        }
    }
}
