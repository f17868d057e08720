//! Error types for snapshot collection.

use std::fmt;
use std::io;
use std::time::Duration;

/// Failure to obtain output from the `ceph` binary.
#[derive(Debug)]
pub enum InvocationError {
    /// The process could not be started (missing binary, permissions).
    Spawn { program: String, source: io::Error },
    /// The process ran but exited unsuccessfully.
    Failed {
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
        /// Trimmed stderr of the process.
        stderr: String,
    },
    /// The process did not finish within the configured timeout and was killed.
    TimedOut(Duration),
    /// Reading the process output failed.
    Io(io::Error),
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationError::Spawn { program, source } => {
                write!(f, "failed to run {}: {}", program, source)
            }
            InvocationError::Failed { code, stderr } => {
                match code {
                    Some(code) => write!(f, "exited with status {}", code)?,
                    None => write!(f, "terminated by signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            InvocationError::TimedOut(timeout) => {
                write!(f, "timed out after {:.1}s", timeout.as_secs_f64())
            }
            InvocationError::Io(e) => write!(f, "failed to read output: {}", e),
        }
    }
}

impl std::error::Error for InvocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvocationError::Spawn { source, .. } => Some(source),
            InvocationError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for InvocationError {
    fn from(e: io::Error) -> Self {
        InvocationError::Io(e)
    }
}

/// The payload is not well-formed JSON of the expected shape.
#[derive(Debug)]
pub enum ParseError {
    /// Nothing but whitespace on stdout.
    Empty,
    Json(serde_json::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty output"),
            ParseError::Json(e) => write!(f, "invalid JSON: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Empty => None,
            ParseError::Json(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Json(e)
    }
}

/// A sample that does not fit its descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum MappingError {
    UnknownKey(String),
    LabelMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },
    /// The metrics library refused the sample.
    Rejected { key: String, reason: String },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::UnknownKey(key) => write!(f, "no descriptor for key {}", key),
            MappingError::LabelMismatch {
                key,
                expected,
                actual,
            } => write!(
                f,
                "{}: expected {} label values, got {}",
                key, expected, actual
            ),
            MappingError::Rejected { key, reason } => write!(f, "{}: {}", key, reason),
        }
    }
}

impl std::error::Error for MappingError {}

/// Any failure of one sub-collection (`ceph df` or `ceph osd df`).
#[derive(Debug)]
pub enum CollectError {
    Invocation(InvocationError),
    Parse(ParseError),
    Mapping(MappingError),
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectError::Invocation(e) => write!(f, "ceph invocation failed: {}", e),
            CollectError::Parse(e) => write!(f, "ceph output parse failed: {}", e),
            CollectError::Mapping(e) => write!(f, "metric mapping failed: {}", e),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Invocation(e) => Some(e),
            CollectError::Parse(e) => Some(e),
            CollectError::Mapping(e) => Some(e),
        }
    }
}

impl From<InvocationError> for CollectError {
    fn from(e: InvocationError) -> Self {
        CollectError::Invocation(e)
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e)
    }
}

impl From<MappingError> for CollectError {
    fn from(e: MappingError) -> Self {
        CollectError::Mapping(e)
    }
}
