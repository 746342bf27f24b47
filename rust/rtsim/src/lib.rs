//! rtsim - Discrete-time simulator for periodic real-time task sets.
//!
//! Runs a single-processor, preemptive schedule of periodic tasks tick by
//! tick under Rate-Monotonic, Earliest-Deadline-First, or an adaptive
//! policy that starts from a utilization-based choice and escalates to EDF
//! for good after repeated deadline misses.
//!
//! # Architecture
//!
//! - **Utilization**: Σ C/T and the Liu & Layland RMS bound
//! - **Tasks**: Task definitions and the per-task runtime tracker (job
//!   release, deadline-miss detection)
//! - **Policy**: Which dispatch rule is active at each tick
//! - **Engine**: The per-tick simulation loop
//! - **Trace**: Per-tick schedule, run-length segments, text timeline
//!
//! # Usage
//!
//! ```rust
//! use rtsim::*;
//!
//! let tasks = vec![
//!     Task::implicit("T1", 1, 4),
//!     Task::implicit("T2", 2, 5),
//!     Task::implicit("T3", 1, 8),
//! ];
//! let result = simulate(&tasks, Mode::Rms, 20, 0.69).unwrap();
//! assert_eq!(result.schedule.len(), 20);
//!
//! for seg in segment(&result.schedule) {
//!     println!("{} [{}, {})", result.label(seg.assignment), seg.start, seg.end);
//! }
//! ```

pub mod engine;
pub mod error;
pub mod fmt;
pub mod policy;
pub mod report;
pub mod scenario;
pub mod stats;
pub mod task;
pub mod trace;
pub mod types;
pub mod utilization;

// Re-export the main public types for convenience.
pub use engine::{simulate, JobCounts, SimulationResult, Simulator};
pub use error::SimError;
pub use fmt::{init_tracing, sim_clock, FmtTick, SimFormat};
pub use policy::{PolicySelector, ADAPTIVE_MISS_LIMIT};
pub use report::{SegmentReport, SimulationReport};
pub use scenario::{
    load_scenario, parse_scenario, Scenario, ScenarioFile, ScenarioFormat, TaskSpec,
    DEFAULT_SIM_TIME, DEFAULT_UTIL_THRESHOLD,
};
pub use stats::{TaskStats, TraceStats};
pub use task::{validate_tasks, Task, TaskRuntimeState, TaskRuntimeTracker};
pub use trace::{
    expand, render_timeline, segment, Assignment, ScheduleSlot, TraceSegment, IDLE_LABEL,
    UNKNOWN_LABEL,
};
pub use types::{Algorithm, Mode, TaskIdx, Tick};
pub use utilization::{compute_utilization, liu_layland_bound, rms_bound_holds};
