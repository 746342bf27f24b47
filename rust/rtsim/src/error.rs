//! Errors returned by the simulator's public entry points.
//!
//! Deadline misses are not errors: they are counted and reported in the
//! [`SimulationResult`](crate::SimulationResult). Everything here rejects a
//! call before any simulated time has elapsed.

use std::fmt;
use std::path::PathBuf;

/// Errors from validating or loading a simulation input.
#[derive(Debug)]
pub enum SimError {
    /// A task's execution time, period or deadline is zero.
    InvalidTaskParameter {
        task: String,
        field: &'static str,
        value: u64,
    },
    /// Two tasks share the same name.
    DuplicateTaskName(String),
    /// A task has an empty (or all-whitespace) name.
    EmptyTaskName,
    /// The simulation window is zero ticks long.
    InvalidSimTime,
    /// The adaptive utilization threshold is outside (0, 1).
    InvalidThreshold(f64),
    /// Reading a scenario file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// TOML scenario parse error.
    Toml(toml::de::Error),
    /// JSON scenario parse error.
    Json(serde_json::Error),
    /// The scenario file extension is neither `.toml` nor `.json`.
    UnknownFormat(PathBuf),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidTaskParameter { task, field, value } => {
                write!(f, "task {task:?}: {field} must be positive, got {value}")
            }
            SimError::DuplicateTaskName(name) => write!(f, "duplicate task name: {name:?}"),
            SimError::EmptyTaskName => write!(f, "task name must not be empty"),
            SimError::InvalidSimTime => write!(f, "simulation time must be positive"),
            SimError::InvalidThreshold(t) => {
                write!(f, "utilization threshold must be in (0, 1), got {t}")
            }
            SimError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            SimError::Toml(e) => write!(f, "TOML parse error: {e}"),
            SimError::Json(e) => write!(f, "JSON parse error: {e}"),
            SimError::UnknownFormat(path) => write!(
                f,
                "unrecognized scenario format for {} (expected .toml or .json)",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io { source, .. } => Some(source),
            SimError::Toml(e) => Some(e),
            SimError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for SimError {
    fn from(e: toml::de::Error) -> Self {
        SimError::Toml(e)
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Json(e)
    }
}
