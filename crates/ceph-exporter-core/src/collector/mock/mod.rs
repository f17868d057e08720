//! Mock `ceph` for tests and demos.

mod runner;
mod scenarios;

pub use runner::MockCeph;
