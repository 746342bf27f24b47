//! Dispatch rule selection.
//!
//! Fixed modes always answer with their own rule. Adaptive mode starts from
//! RMS or EDF depending on utilization versus the threshold, and switches
//! to EDF once the run has accumulated [`ADAPTIVE_MISS_LIMIT`] misses. The
//! switch is one-way.

use tracing::info;

use crate::types::{Algorithm, Mode, Tick};

/// Cumulative misses after which adaptive mode escalates to EDF.
pub const ADAPTIVE_MISS_LIMIT: u64 = 3;

#[derive(Debug, Clone)]
pub struct PolicySelector {
    mode: Mode,
    initial: Algorithm,
    current: Algorithm,
    escalated_at: Option<Tick>,
}

impl PolicySelector {
    pub fn new(mode: Mode, utilization: f64, threshold: f64) -> Self {
        let initial = match mode {
            Mode::Rms => Algorithm::Rms,
            Mode::Edf => Algorithm::Edf,
            Mode::Adaptive if utilization <= threshold => Algorithm::Rms,
            Mode::Adaptive => Algorithm::Edf,
        };
        PolicySelector {
            mode,
            initial,
            current: initial,
            escalated_at: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The rule chosen before any time has elapsed.
    pub fn initial_rule(&self) -> Algorithm {
        self.initial
    }

    /// The rule to dispatch with at `time`, given the misses counted over
    /// the whole run so far. Call once per tick, after releases.
    pub fn active_rule(&mut self, time: Tick, cumulative_misses: u64) -> Algorithm {
        if self.mode == Mode::Adaptive
            && self.current == Algorithm::Rms
            && cumulative_misses >= ADAPTIVE_MISS_LIMIT
        {
            info!(
                time,
                misses = cumulative_misses,
                "adaptive policy escalating RMS -> EDF"
            );
            self.current = Algorithm::Edf;
            self.escalated_at = Some(time);
        }
        self.current
    }

    /// Tick at which adaptive mode switched from RMS to EDF.
    pub fn escalated_at(&self) -> Option<Tick> {
        self.escalated_at
    }
}
