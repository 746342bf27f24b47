//! Serializable view of a run, with task indices resolved to names.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::SimulationResult;
use crate::stats::TraceStats;
use crate::task::Task;
use crate::types::{Algorithm, Tick};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentReport {
    pub task: String,
    pub start: Tick,
    pub end: Tick,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub tasks: Vec<Task>,
    pub sim_time: Tick,
    pub theoretical_utilization: f64,
    pub utilization_percent: f64,
    pub initial_algorithm: Algorithm,
    pub final_algorithm: Algorithm,
    pub escalated_at: Option<Tick>,
    pub miss_counts: BTreeMap<String, u64>,
    /// Task name (or IDLE) per tick.
    pub schedule: Vec<String>,
    pub segments: Vec<SegmentReport>,
    pub stats: TraceStats,
}

impl From<&SimulationResult> for SimulationReport {
    fn from(result: &SimulationResult) -> Self {
        SimulationReport {
            tasks: result.tasks.clone(),
            sim_time: result.sim_time(),
            theoretical_utilization: result.theoretical_utilization,
            utilization_percent: result.utilization_percent,
            initial_algorithm: result.initial_algorithm,
            final_algorithm: result.final_algorithm,
            escalated_at: result.escalated_at,
            miss_counts: result.miss_counts.clone(),
            schedule: result
                .schedule
                .iter()
                .map(|s| result.label(s.assignment).to_string())
                .collect(),
            segments: result
                .segments()
                .iter()
                .map(|seg| SegmentReport {
                    task: result.label(seg.assignment).to_string(),
                    start: seg.start,
                    end: seg.end,
                })
                .collect(),
            stats: TraceStats::from_result(result),
        }
    }
}
