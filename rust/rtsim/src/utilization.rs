//! Theoretical processor utilization and the Liu & Layland RMS bound.

use crate::task::Task;

/// U = Σ C/T over all tasks. Tasks with a zero period are skipped.
pub fn compute_utilization(tasks: &[Task]) -> f64 {
    tasks
        .iter()
        .filter(|t| t.period > 0)
        .map(Task::utilization)
        .sum()
}

/// n(2^(1/n) - 1): utilization below which n implicit-deadline tasks are
/// guaranteed schedulable under RMS. Tends to ln 2 as n grows.
pub fn liu_layland_bound(n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    n * (2f64.powf(1.0 / n) - 1.0)
}

/// Sufficient (not necessary) RMS schedulability test. Ignores deadlines,
/// so it is only meaningful for implicit-deadline task sets.
pub fn rms_bound_holds(tasks: &[Task]) -> bool {
    tasks.is_empty() || compute_utilization(tasks) <= liu_layland_bound(tasks.len())
}
