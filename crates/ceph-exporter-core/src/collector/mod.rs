//! Ceph usage collection.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         Collector                         │
//! │                                                           │
//! │        ceph df                         ceph osd df        │
//! │           │                                 │             │
//! │   parse_cluster_usage             parse_device_usage      │
//! │           │                                 │             │
//! │   map_cluster_usage               map_device_usage        │
//! │           └────────────┬────────────────────┘             │
//! │                        ▼                                  │
//! │               Vec<MetricSample>                           │
//! │                                                           │
//! │      both invocations go through ┌───────────────┐        │
//! │                                  │ CommandRunner │ (trait)│
//! │                                  └───────┬───────┘        │
//! └──────────────────────────────────────────┼────────────────┘
//!                                  ┌─────────┴─────────┐
//!                           ┌──────▼──────┐     ┌──────▼──────┐
//!                           │   CephCli   │     │  MockCeph   │
//!                           │ (real ceph) │     │ (Testing,   │
//!                           │             │     │  Scenarios) │
//!                           └─────────────┘     └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production
//!
//! ```ignore
//! use std::sync::Arc;
//! use ceph_exporter_core::collector::{CephCli, Collector};
//! use ceph_exporter_core::descriptors::DescriptorRegistry;
//!
//! let collector = Collector::new(CephCli::new("/usr/bin/ceph"), Arc::new(DescriptorRegistry::new()));
//! let samples = collector.collect_samples();
//! ```
//!
//! ## Testing (with MockCeph)
//!
//! ```
//! use std::sync::Arc;
//! use ceph_exporter_core::collector::{Collector, MockCeph};
//! use ceph_exporter_core::descriptors::DescriptorRegistry;
//!
//! let collector = Collector::new(MockCeph::healthy_cluster(), Arc::new(DescriptorRegistry::new()));
//! let samples = collector.collect_samples();
//! assert!(!samples.is_empty());
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod error;
pub mod mapper;
pub mod mock;
pub mod parser;
pub mod traits;

pub use collector::{CLUSTER_USAGE_ARGS, Collector, CollectorTiming, DEVICE_USAGE_ARGS};
pub use error::{CollectError, InvocationError, MappingError, ParseError};
pub use mock::MockCeph;
pub use traits::{CephCli, CommandRunner};
