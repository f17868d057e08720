//! In-memory stand-in for the `ceph` binary.
//!
//! `MockCeph` answers subcommands with canned stdout or canned failures, so
//! collectors can be tested without a cluster.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::collector::error::InvocationError;
use crate::collector::traits::CommandRunner;

#[derive(Debug, Clone)]
enum Reply {
    Stdout(Vec<u8>),
    Failure { code: i32, stderr: String },
}

/// Mock `ceph` keyed by subcommand arguments (without `-f json`).
///
/// Subcommands without a registered reply fail with exit status 22 and
/// ceph's "unrecognized command" message.
#[derive(Debug, Default)]
pub struct MockCeph {
    replies: HashMap<Vec<String>, Reply>,
    /// Every argument vector passed to `run`, in call order.
    calls: Mutex<Vec<Vec<String>>>,
}

fn key(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

impl MockCeph {
    /// Creates a mock with no replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `args` succeed with the given stdout.
    pub fn add_output(&mut self, args: &[&str], stdout: impl Into<Vec<u8>>) {
        self.replies
            .insert(key(args), Reply::Stdout(stdout.into()));
    }

    /// Makes `args` exit with `code` and the given stderr.
    pub fn add_failure(&mut self, args: &[&str], code: i32, stderr: impl Into<String>) {
        self.replies.insert(
            key(args),
            Reply::Failure {
                code,
                stderr: stderr.into(),
            },
        );
    }

    /// Argument vectors seen so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for MockCeph {
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, InvocationError> {
        let args = key(args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(args.clone());
        }
        match self.replies.get(&args) {
            Some(Reply::Stdout(out)) => Ok(out.clone()),
            Some(Reply::Failure { code, stderr }) => Err(InvocationError::Failed {
                code: Some(*code),
                stderr: stderr.clone(),
            }),
            None => Err(InvocationError::Failed {
                code: Some(22),
                stderr: format!("no valid command found; unrecognized command: {}", args.join(" ")),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_output() {
        let mut ceph = MockCeph::new();
        ceph.add_output(&["df"], "{}");
        assert_eq!(ceph.run(&["df"]).unwrap(), b"{}");
    }

    #[test]
    fn test_mock_failure() {
        let mut ceph = MockCeph::new();
        ceph.add_failure(&["osd", "df"], 110, "timed out");
        let err = ceph.run(&["osd", "df"]).unwrap_err();
        assert_eq!(err.to_string(), "exited with status 110: timed out");
    }

    #[test]
    fn test_mock_unknown_command() {
        let ceph = MockCeph::new();
        match ceph.run(&["health"]) {
            Err(InvocationError::Failed { code, stderr }) => {
                assert_eq!(code, Some(22));
                assert!(stderr.ends_with("health"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_mock_records_calls() {
        let ceph = MockCeph::new();
        let _ = ceph.run(&["df"]);
        let _ = ceph.run(&["osd", "df"]);
        assert_eq!(ceph.calls().len(), 2);
        assert_eq!(ceph.calls()[1], vec!["osd", "df"]);
    }
}
