//! Trace statistics derived from a finished run.
//!
//! # Metrics Computed
//!
//! - **Executed units**: ticks each task held the processor, and its share
//!   of the window
//! - **Bursts**: how many separate trace segments a task ran in
//! - **Jobs**: released, completed and missed, from the runtime counters
//! - **Context switches**: direct task-to-task hand-offs (boundaries that
//!   touch IDLE don't count)

use serde::Serialize;

use crate::engine::SimulationResult;
use crate::trace::Assignment;
use crate::types::Tick;

/// Per-task statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskStats {
    pub name: String,
    pub executed: u64,
    pub share_percent: f64,
    pub bursts: u64,
    pub released: u64,
    pub completed: u64,
    pub misses: u64,
}

/// Whole-trace statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceStats {
    /// In declaration order.
    pub tasks: Vec<TaskStats>,
    pub sim_time: Tick,
    pub idle_slots: u64,
    pub context_switches: u64,
}

impl TraceStats {
    pub fn from_result(result: &SimulationResult) -> Self {
        let sim_time = result.sim_time();
        let mut tasks: Vec<TaskStats> = result
            .tasks
            .iter()
            .zip(&result.jobs)
            .map(|(t, jobs)| TaskStats {
                name: t.name.clone(),
                released: jobs.released,
                completed: jobs.completed,
                misses: result.misses(&t.name).unwrap_or(0),
                ..Default::default()
            })
            .collect();

        let segments = result.segments();
        for seg in &segments {
            if let Assignment::Task(idx) = seg.assignment {
                let stats = &mut tasks[idx.0];
                stats.executed += seg.len();
                stats.bursts += 1;
            }
        }
        if sim_time > 0 {
            for stats in &mut tasks {
                stats.share_percent = 100.0 * stats.executed as f64 / sim_time as f64;
            }
        }

        let context_switches = segments
            .windows(2)
            .filter(|pair| !pair[0].assignment.is_idle() && !pair[1].assignment.is_idle())
            .count() as u64;

        TraceStats {
            tasks,
            sim_time,
            idle_slots: result.idle_slots,
            context_switches,
        }
    }

    /// Executed units plus idle slots; always equals `sim_time`.
    pub fn accounted_ticks(&self) -> u64 {
        self.tasks.iter().map(|t| t.executed).sum::<u64>() + self.idle_slots
    }
}
