//! Newtype wrappers and type aliases for domain concepts.
//!
//! Task indices are a newtype so they can't be mixed up with tick counts
//! or execution budgets. Plain quantities (ticks) are type aliases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Simulated time, in abstract units.
pub type Tick = u64;

/// Stable position of a task in the declared task list.
///
/// Assigned once when the simulation starts. Every tie between otherwise
/// equal candidates is broken in favor of the lower index, so the
/// first-declared task wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskIdx(pub usize);

/// A dispatch rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Algorithm {
    /// Rate-Monotonic: shortest period first.
    #[serde(rename = "RMS")]
    Rms,
    /// Earliest-Deadline-First: nearest absolute deadline first.
    #[serde(rename = "EDF")]
    Edf,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Rms => write!(f, "RMS"),
            Algorithm::Edf => write!(f, "EDF"),
        }
    }
}

/// The configured scheduling mode for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Rate-Monotonic for the whole run.
    Rms,
    /// Earliest-Deadline-First for the whole run.
    Edf,
    /// RMS or EDF by utilization, escalating to EDF for good after
    /// repeated deadline misses.
    #[default]
    Adaptive,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Rms => write!(f, "rms"),
            Mode::Edf => write!(f, "edf"),
            Mode::Adaptive => write!(f, "adaptive"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rms" | "rm" => Ok(Mode::Rms),
            "edf" => Ok(Mode::Edf),
            "adaptive" => Ok(Mode::Adaptive),
            other => Err(format!(
                "unknown mode {other:?}; expected one of: rms, edf, adaptive"
            )),
        }
    }
}
