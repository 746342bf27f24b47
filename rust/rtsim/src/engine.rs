//! Discrete-time simulation engine.
//!
//! Each tick runs the same four steps: release due jobs (counting misses),
//! ask the policy selector for the active rule, pick one ready task under
//! that rule, and charge it one unit of execution. One [`ScheduleSlot`] is
//! emitted per tick.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::SimError;
use crate::fmt::set_sim_clock;
use crate::policy::PolicySelector;
use crate::task::{validate_tasks, Task, TaskRuntimeTracker};
use crate::trace::{segment, Assignment, ScheduleSlot, TraceSegment};
use crate::types::{Algorithm, Mode, TaskIdx, Tick};
use crate::utilization::{compute_utilization, liu_layland_bound, rms_bound_holds};

/// Upper bound on the schedule preallocation; longer runs grow as they go.
const SCHEDULE_CAPACITY_HINT: Tick = 1 << 20;

/// Per-task job counters at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounts {
    pub released: u64,
    pub completed: u64,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// The simulated tasks; `TaskIdx` indexes into this.
    pub tasks: Vec<Task>,
    /// One slot per tick, in time order.
    pub schedule: Vec<ScheduleSlot>,
    /// Deadline misses per task name.
    pub miss_counts: BTreeMap<String, u64>,
    /// Share of the window the processor was busy, in percent.
    pub utilization_percent: f64,
    /// Σ C/T.
    pub theoretical_utilization: f64,
    /// Rule active at tick 0.
    pub initial_algorithm: Algorithm,
    /// Rule active at the last tick.
    pub final_algorithm: Algorithm,
    /// Tick at which adaptive mode escalated to EDF.
    pub escalated_at: Option<Tick>,
    pub idle_slots: u64,
    pub total_misses: u64,
    /// Indexed by `TaskIdx`.
    pub jobs: Vec<JobCounts>,
}

impl SimulationResult {
    pub fn sim_time(&self) -> Tick {
        self.schedule.len() as Tick
    }

    /// Run-length segments of the schedule.
    pub fn segments(&self) -> Vec<TraceSegment> {
        segment(&self.schedule)
    }

    /// Task name (or IDLE) for a slot.
    pub fn label(&self, assignment: Assignment) -> &str {
        assignment.label(&self.tasks)
    }

    /// Misses for `name`, or None for an unknown task.
    pub fn misses(&self, name: &str) -> Option<u64> {
        self.miss_counts.get(name).copied()
    }

    /// Ticks in which `idx` ran.
    pub fn units_for(&self, idx: TaskIdx) -> u64 {
        self.schedule
            .iter()
            .filter(|s| s.assignment == Assignment::Task(idx))
            .count() as u64
    }

    /// Pretty-print the schedule for debugging.
    pub fn dump(&self) {
        for slot in &self.schedule {
            eprintln!("[{:>8}] {}", slot.time, self.label(slot.assignment));
        }
    }
}

/// A configured simulator: mode plus adaptive threshold.
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    mode: Mode,
    util_threshold: f64,
}

impl Simulator {
    pub fn new(mode: Mode, util_threshold: f64) -> Self {
        Simulator {
            mode,
            util_threshold,
        }
    }

    /// Simulate `tasks` for `sim_time` ticks.
    pub fn run(&self, tasks: &[Task], sim_time: Tick) -> Result<SimulationResult, SimError> {
        if sim_time == 0 {
            return Err(SimError::InvalidSimTime);
        }
        if !(self.util_threshold > 0.0 && self.util_threshold < 1.0) {
            return Err(SimError::InvalidThreshold(self.util_threshold));
        }
        validate_tasks(tasks)?;

        for task in tasks.iter().filter(|t| t.exceeds_deadline()) {
            warn!(
                task = task.name.as_str(),
                execution_time = task.execution_time,
                deadline = task.deadline,
                "execution time exceeds deadline; every job will be late"
            );
        }

        let theoretical_utilization = compute_utilization(tasks);
        let mut policy =
            PolicySelector::new(self.mode, theoretical_utilization, self.util_threshold);
        info!(
            tasks = tasks.len(),
            mode = %self.mode,
            utilization = theoretical_utilization,
            rms_bound = liu_layland_bound(tasks.len()),
            rms_bound_holds = rms_bound_holds(tasks),
            initial = %policy.initial_rule(),
            "starting simulation"
        );

        let mut tracker = TaskRuntimeTracker::initialize(tasks);
        let mut schedule = Vec::with_capacity(sim_time.min(SCHEDULE_CAPACITY_HINT) as usize);
        let mut total_misses: u64 = 0;
        let mut idle_slots: u64 = 0;
        let mut final_algorithm = policy.initial_rule();

        for time in 0..sim_time {
            set_sim_clock(Some(time));

            total_misses += tracker.release_due_jobs(time).len() as u64;
            let rule = policy.active_rule(time, total_misses);
            final_algorithm = rule;

            let assignment = match pick(rule, &tracker) {
                Some(idx) => {
                    if tracker.execute(idx) {
                        debug!(task = tracker.task(idx).name.as_str(), "job completed");
                    }
                    Assignment::Task(idx)
                }
                None => {
                    idle_slots += 1;
                    Assignment::Idle
                }
            };
            schedule.push(ScheduleSlot { time, assignment });
        }

        let utilization_percent = 100.0 * (1.0 - idle_slots as f64 / sim_time as f64);
        info!(
            busy_percent = utilization_percent,
            misses = total_misses,
            last = %final_algorithm,
            "simulation finished"
        );
        set_sim_clock(None);

        let miss_counts = tasks
            .iter()
            .zip(tracker.states())
            .map(|(t, s)| (t.name.clone(), s.misses))
            .collect();
        let jobs = tracker
            .states()
            .iter()
            .map(|s| JobCounts {
                released: s.released,
                completed: s.completed,
            })
            .collect();

        Ok(SimulationResult {
            tasks: tasks.to_vec(),
            schedule,
            miss_counts,
            utilization_percent,
            theoretical_utilization,
            initial_algorithm: policy.initial_rule(),
            final_algorithm,
            escalated_at: policy.escalated_at(),
            idle_slots,
            total_misses,
            jobs,
        })
    }
}

/// Choose the ready task to run under `rule`. Ties go to the lower index.
fn pick(rule: Algorithm, tracker: &TaskRuntimeTracker<'_>) -> Option<TaskIdx> {
    match rule {
        Algorithm::Rms => tracker
            .ready()
            .min_by_key(|&idx| (tracker.task(idx).period, idx)),
        Algorithm::Edf => tracker
            .ready()
            .min_by_key(|&idx| (tracker.state(idx).abs_deadline, idx)),
    }
}

/// Simulate `tasks` under `mode` for `sim_time` ticks.
///
/// Fails if a task has a zero parameter or a duplicate name, if
/// `sim_time` is zero, or if `util_threshold` is not in (0, 1).
pub fn simulate(
    tasks: &[Task],
    mode: Mode,
    sim_time: Tick,
    util_threshold: f64,
) -> Result<SimulationResult, SimError> {
    Simulator::new(mode, util_threshold).run(tasks, sim_time)
}
