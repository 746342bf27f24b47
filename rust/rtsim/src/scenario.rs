//! Scenario definition, builder API and file loading.
//!
//! A scenario bundles a task set with the run configuration. It can be
//! built in code with [`Scenario::builder`] or read from a TOML or JSON
//! file:
//!
//! ```toml
//! mode = "adaptive"
//! sim_time = 40
//! util_threshold = 0.69
//!
//! [[tasks]]
//! name = "sensor"
//! execution_time = 1
//! period = 4
//!
//! [[tasks]]
//! name = "control"
//! execution_time = 2
//! period = 5
//! deadline = 4
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{simulate, SimulationResult};
use crate::error::SimError;
use crate::task::Task;
use crate::types::{Mode, Tick};

/// Default simulation window, in ticks.
pub const DEFAULT_SIM_TIME: Tick = 20;

/// Default adaptive threshold: roughly ln 2, the Liu & Layland bound for
/// large task sets.
pub const DEFAULT_UTIL_THRESHOLD: f64 = 0.69;

/// A complete simulation scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub tasks: Vec<Task>,
    pub mode: Mode,
    pub sim_time: Tick,
    pub util_threshold: f64,
}

impl Scenario {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder {
            tasks: Vec::new(),
            mode: Mode::default(),
            sim_time: DEFAULT_SIM_TIME,
            util_threshold: DEFAULT_UTIL_THRESHOLD,
        }
    }

    /// Run the scenario.
    pub fn run(&self) -> Result<SimulationResult, SimError> {
        simulate(&self.tasks, self.mode, self.sim_time, self.util_threshold)
    }
}

/// Builder for constructing scenarios.
pub struct ScenarioBuilder {
    tasks: Vec<Task>,
    mode: Mode,
    sim_time: Tick,
    util_threshold: f64,
}

impl ScenarioBuilder {
    /// Add a task with an explicit deadline.
    pub fn task(mut self, name: &str, execution_time: u64, period: u64, deadline: u64) -> Self {
        self.tasks
            .push(Task::new(name, execution_time, period, deadline));
        self
    }

    /// Add a task whose deadline equals its period.
    pub fn implicit_task(mut self, name: &str, execution_time: u64, period: u64) -> Self {
        self.tasks
            .push(Task::implicit(name, execution_time, period));
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn sim_time(mut self, ticks: Tick) -> Self {
        self.sim_time = ticks;
        self
    }

    pub fn util_threshold(mut self, threshold: f64) -> Self {
        self.util_threshold = threshold;
        self
    }

    /// Build the scenario. Validation happens when it runs.
    pub fn build(self) -> Scenario {
        Scenario {
            tasks: self.tasks,
            mode: self.mode,
            sim_time: self.sim_time,
            util_threshold: self.util_threshold,
        }
    }
}

/// One task as written in a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    pub execution_time: u64,
    pub period: u64,
    /// Defaults to the period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u64>,
}

impl From<TaskSpec> for Task {
    fn from(spec: TaskSpec) -> Self {
        let deadline = spec.deadline.unwrap_or(spec.period);
        Task {
            name: spec.name,
            execution_time: spec.execution_time,
            period: spec.period,
            deadline,
        }
    }
}

/// On-disk scenario layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioFile {
    pub mode: Mode,
    pub sim_time: Tick,
    pub util_threshold: f64,
    pub tasks: Vec<TaskSpec>,
}

impl Default for ScenarioFile {
    fn default() -> Self {
        ScenarioFile {
            mode: Mode::default(),
            sim_time: DEFAULT_SIM_TIME,
            util_threshold: DEFAULT_UTIL_THRESHOLD,
            tasks: Vec::new(),
        }
    }
}

impl From<ScenarioFile> for Scenario {
    fn from(file: ScenarioFile) -> Self {
        Scenario {
            tasks: file.tasks.into_iter().map(Task::from).collect(),
            mode: file.mode,
            sim_time: file.sim_time,
            util_threshold: file.util_threshold,
        }
    }
}

/// Scenario file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioFormat {
    Toml,
    Json,
}

impl ScenarioFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(ScenarioFormat::Toml),
            "json" => Some(ScenarioFormat::Json),
            _ => None,
        }
    }
}

/// Parse scenario text in the given format.
pub fn parse_scenario(content: &str, format: ScenarioFormat) -> Result<Scenario, SimError> {
    let file: ScenarioFile = match format {
        ScenarioFormat::Toml => toml::from_str(content)?,
        ScenarioFormat::Json => serde_json::from_str(content)?,
    };
    Ok(file.into())
}

/// Read and parse a `.toml` or `.json` scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, SimError> {
    let format =
        ScenarioFormat::from_path(path).ok_or_else(|| SimError::UnknownFormat(path.to_owned()))?;
    let content = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_scenario(&content, format)
}
