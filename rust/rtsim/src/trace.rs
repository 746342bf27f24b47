//! Per-tick schedule and its run-length segmentation.
//!
//! The engine emits one [`ScheduleSlot`] per simulated tick. [`segment`]
//! folds consecutive slots with the same assignment into [`TraceSegment`]s,
//! which is what gets drawn; [`expand`] undoes it.

use std::fmt::Write;

use crate::task::Task;
use crate::types::{TaskIdx, Tick};

/// Label used for ticks where no task ran.
pub const IDLE_LABEL: &str = "IDLE";

/// Label for a task index that does not belong to the given task list.
pub const UNKNOWN_LABEL: &str = "?";

/// Who owned the processor during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assignment {
    Idle,
    Task(TaskIdx),
}

impl Assignment {
    /// Task name, or [`IDLE_LABEL`]. An index outside `tasks` is shown as
    /// [`UNKNOWN_LABEL`].
    pub fn label<'a>(&self, tasks: &'a [Task]) -> &'a str {
        match self {
            Assignment::Idle => IDLE_LABEL,
            Assignment::Task(idx) => tasks.get(idx.0).map_or(UNKNOWN_LABEL, |t| t.name.as_str()),
        }
    }

    pub fn task(&self) -> Option<TaskIdx> {
        match self {
            Assignment::Idle => None,
            Assignment::Task(idx) => Some(*idx),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Assignment::Idle)
    }
}

/// One simulated tick of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub time: Tick,
    pub assignment: Assignment,
}

/// A maximal run of ticks with the same assignment, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSegment {
    pub assignment: Assignment,
    pub start: Tick,
    pub end: Tick,
}

impl TraceSegment {
    pub fn len(&self) -> Tick {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Merge consecutive slots with identical assignments.
///
/// Slots are extended into the current segment only when they are both
/// the same assignment and adjacent in time, so a schedule with gaps still
/// yields segments that cover exactly the ticks present.
pub fn segment(schedule: &[ScheduleSlot]) -> Vec<TraceSegment> {
    let mut segments: Vec<TraceSegment> = Vec::new();
    for slot in schedule {
        match segments.last_mut() {
            Some(seg) if seg.assignment == slot.assignment && seg.end == slot.time => {
                seg.end += 1;
            }
            _ => segments.push(TraceSegment {
                assignment: slot.assignment,
                start: slot.time,
                end: slot.time + 1,
            }),
        }
    }
    segments
}

/// Re-expand segments into one slot per tick.
pub fn expand(segments: &[TraceSegment]) -> Vec<ScheduleSlot> {
    segments
        .iter()
        .flat_map(|seg| {
            (seg.start..seg.end).map(move |time| ScheduleSlot {
                time,
                assignment: seg.assignment,
            })
        })
        .collect()
}

/// Render segments as a text Gantt chart: one row per task plus an IDLE
/// row, `#` where the row owns the tick. Segments naming a task outside
/// `tasks` have no row and are left out.
pub fn render_timeline(segments: &[TraceSegment], tasks: &[Task]) -> String {
    let start = segments.first().map_or(0, |s| s.start);
    let end = segments.last().map_or(0, |s| s.end);
    let width = (end - start) as usize;

    let mut rows: Vec<(&str, Vec<u8>)> = tasks
        .iter()
        .map(|t| (t.name.as_str(), vec![b'.'; width]))
        .collect();
    rows.push((IDLE_LABEL, vec![b'.'; width]));
    let idle_row = rows.len() - 1;

    for seg in segments {
        let row = match seg.assignment {
            Assignment::Idle => idle_row,
            Assignment::Task(idx) if idx.0 < tasks.len() => idx.0,
            Assignment::Task(_) => continue,
        };
        for t in seg.start..seg.end {
            rows[row].1[(t - start) as usize] = b'#';
        }
    }

    let label_w = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let mut out = String::new();

    // Tick ruler: tens digit at each multiple of ten, then units.
    let tens: String = (start..end)
        .map(|t| {
            if t % 10 == 0 {
                char::from(b'0' + ((t / 10) % 10) as u8)
            } else {
                ' '
            }
        })
        .collect();
    let units: String = (start..end)
        .map(|t| char::from(b'0' + (t % 10) as u8))
        .collect();
    let _ = writeln!(out, "{:label_w$}   {}", "", tens.trim_end());
    let _ = writeln!(out, "{:label_w$}   {}", "", units);

    for (label, cells) in &rows {
        let _ = writeln!(
            out,
            "{label:<label_w$} | {}",
            String::from_utf8_lossy(cells)
        );
    }
    out
}
