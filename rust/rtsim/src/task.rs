//! Task model and per-task runtime bookkeeping.
//!
//! A [`Task`] is the immutable description of a periodic task. The
//! [`TaskRuntimeTracker`] owns one [`TaskRuntimeState`] per task, stored in
//! an array indexed by [`TaskIdx`] in declaration order, and applies the
//! periodic release rule once per simulated tick.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimError;
use crate::types::{TaskIdx, Tick};

/// A periodic real-time task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier.
    pub name: String,
    /// Execution units needed by each job (C).
    pub execution_time: u64,
    /// Release interval between consecutive jobs (T).
    pub period: u64,
    /// Deadline relative to each release (D).
    pub deadline: u64,
}

impl Task {
    pub fn new(name: &str, execution_time: u64, period: u64, deadline: u64) -> Self {
        Task {
            name: name.to_string(),
            execution_time,
            period,
            deadline,
        }
    }

    /// A task whose deadline equals its period.
    pub fn implicit(name: &str, execution_time: u64, period: u64) -> Self {
        Self::new(name, execution_time, period, period)
    }

    /// C > D: every job is doomed before it starts. Valid input, but worth
    /// a warning.
    pub fn exceeds_deadline(&self) -> bool {
        self.execution_time > self.deadline
    }

    /// C / T, or 0 for a zero period.
    pub fn utilization(&self) -> f64 {
        if self.period == 0 {
            return 0.0;
        }
        self.execution_time as f64 / self.period as f64
    }
}

/// Check that every task has positive parameters and a unique, non-empty
/// name.
pub fn validate_tasks(tasks: &[Task]) -> Result<(), SimError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if task.name.trim().is_empty() {
            return Err(SimError::EmptyTaskName);
        }
        for (field, value) in [
            ("execution time", task.execution_time),
            ("period", task.period),
            ("deadline", task.deadline),
        ] {
            if value == 0 {
                return Err(SimError::InvalidTaskParameter {
                    task: task.name.clone(),
                    field,
                    value,
                });
            }
        }
        if !seen.insert(task.name.as_str()) {
            return Err(SimError::DuplicateTaskName(task.name.clone()));
        }
    }
    Ok(())
}

/// Mutable scheduling state of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRuntimeState {
    /// Execution units left in the current job.
    pub remaining: u64,
    /// When the next job arrives.
    pub next_release: Tick,
    /// Release time + D of the current job.
    pub abs_deadline: Tick,
    /// Deadline misses detected so far. Never decreases.
    pub misses: u64,
    /// Jobs released so far.
    pub released: u64,
    /// Jobs that ran to completion.
    pub completed: u64,
}

/// Owns the runtime state of every task for one simulation run.
pub struct TaskRuntimeTracker<'a> {
    tasks: &'a [Task],
    states: Vec<TaskRuntimeState>,
    by_name: HashMap<&'a str, TaskIdx>,
}

impl<'a> TaskRuntimeTracker<'a> {
    /// One zeroed state per task, in declaration order.
    pub fn initialize(tasks: &'a [Task]) -> Self {
        let by_name = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.as_str(), TaskIdx(i)))
            .collect();
        TaskRuntimeTracker {
            tasks,
            states: vec![TaskRuntimeState::default(); tasks.len()],
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn task(&self, idx: TaskIdx) -> &'a Task {
        &self.tasks[idx.0]
    }

    pub fn state(&self, idx: TaskIdx) -> &TaskRuntimeState {
        &self.states[idx.0]
    }

    /// All states, indexed by `TaskIdx`.
    pub fn states(&self) -> &[TaskRuntimeState] {
        &self.states
    }

    /// Look up a task index by name.
    pub fn lookup(&self, name: &str) -> Option<TaskIdx> {
        self.by_name.get(name).copied()
    }

    /// Release a new job for every task whose next release is due.
    ///
    /// A job that still has work left when its successor is released, and
    /// whose absolute deadline has been reached (`time >= abs_deadline`),
    /// counts as one miss. With D == T that is every unfinished job at its
    /// successor's release; with D < T a job that finishes between its
    /// deadline and the next release is not counted. The check only runs at
    /// release time, so a job that is still late when the window closes is
    /// never counted. Returns the tasks that missed, in index order.
    pub fn release_due_jobs(&mut self, time: Tick) -> Vec<TaskIdx> {
        let mut missed = Vec::new();
        for (i, (task, state)) in self.tasks.iter().zip(self.states.iter_mut()).enumerate() {
            if state.next_release > time {
                continue;
            }

            if state.remaining > 0 && time >= state.abs_deadline {
                state.misses += 1;
                missed.push(TaskIdx(i));
                debug!(
                    task = task.name.as_str(),
                    time,
                    deadline = state.abs_deadline,
                    left = state.remaining,
                    "deadline miss"
                );
            }

            state.remaining = task.execution_time;
            // Saturated values mean "never": no further release, no miss.
            state.abs_deadline = time.saturating_add(task.deadline);
            state.next_release = state.next_release.saturating_add(task.period);
            state.released += 1;
            debug!(
                task = task.name.as_str(),
                time,
                deadline = state.abs_deadline,
                "job released"
            );
        }
        missed
    }

    /// Tasks with pending work, in index order.
    pub fn ready(&self) -> impl Iterator<Item = TaskIdx> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.remaining > 0)
            .map(|(i, _)| TaskIdx(i))
    }

    /// Run `idx` for one tick. Returns true if that finished its job.
    pub fn execute(&mut self, idx: TaskIdx) -> bool {
        let state = &mut self.states[idx.0];
        debug_assert!(state.remaining > 0, "executing a task with no work");
        state.remaining = state.remaining.saturating_sub(1);
        if state.remaining == 0 {
            state.completed += 1;
            return true;
        }
        false
    }
}
