#![allow(dead_code)]

use rtsim::{Assignment, SimulationResult, Task};

/// Initialize tracing from `RUST_LOG`, formatted with simulated ticks.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored.
pub fn setup_test() {
    rtsim::init_tracing();
}

/// Task sets exercised by the property tests: schedulable, overloaded,
/// constrained-deadline, C > D, and tie-heavy.
pub fn task_set_family() -> Vec<Vec<Task>> {
    vec![
        vec![
            Task::implicit("T1", 1, 4),
            Task::implicit("T2", 2, 5),
            Task::implicit("T3", 1, 8),
        ],
        vec![Task::implicit("hog", 5, 4)],
        vec![Task::implicit("hi", 3, 6), Task::implicit("lo", 4, 9)],
        vec![
            Task::new("a", 2, 5, 3),
            Task::new("b", 3, 7, 2),
            Task::new("c", 1, 3, 3),
        ],
        vec![
            Task::implicit("x", 1, 4),
            Task::implicit("y", 1, 4),
            Task::implicit("z", 2, 4),
        ],
        vec![
            Task::implicit("p", 3, 5),
            Task::implicit("q", 3, 7),
            Task::new("r", 4, 11, 6),
        ],
    ]
}

/// Compact one-char-per-tick rendering (first letter of the task, `.` for
/// idle), handy for asserting on whole schedules.
pub fn compact(result: &SimulationResult) -> String {
    result
        .schedule
        .iter()
        .map(|s| match s.assignment {
            Assignment::Idle => '.',
            Assignment::Task(idx) => result.tasks[idx.0].name.chars().next().unwrap_or('?'),
        })
        .collect()
}

/// Schedule as names, IDLE included.
pub fn names(result: &SimulationResult) -> Vec<&str> {
    result
        .schedule
        .iter()
        .map(|s| result.label(s.assignment))
        .collect()
}
