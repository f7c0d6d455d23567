//! QTC State Distribution
//!
//! Fraction of transitions spent in each state over a sequence.

use super::qtc_sequencer::{QtcSequence, QtcState};
use serde::{Deserialize, Serialize};

/// Per-state fractions of a sequence
///
/// Sums to 1 for a non-empty sequence; all zero for an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Distribution {
    pub approach: f64,
    pub diverge: f64,
    pub stationary: f64,
    pub cross: f64,
}

impl Distribution {
    /// Summarize a sequence
    pub fn summarize(sequence: &QtcSequence) -> Self {
        Self::from_states(sequence.states())
    }

    /// Summarize any stream of states
    pub fn from_states(states: impl IntoIterator<Item = QtcState>) -> Self {
        let mut counts = [0usize; 4];
        let mut total = 0usize;
        for state in states {
            counts[Self::slot(state)] += 1;
            total += 1;
        }

        let denom = total.max(1) as f64;
        Self {
            approach: counts[0] as f64 / denom,
            diverge: counts[1] as f64 / denom,
            stationary: counts[2] as f64 / denom,
            cross: counts[3] as f64 / denom,
        }
    }

    fn slot(state: QtcState) -> usize {
        match state {
            QtcState::Approaching => 0,
            QtcState::Diverging => 1,
            QtcState::Stationary => 2,
            QtcState::Crossing => 3,
        }
    }

    /// Fraction for one state
    pub fn fraction(&self, state: QtcState) -> f64 {
        match state {
            QtcState::Approaching => self.approach,
            QtcState::Diverging => self.diverge,
            QtcState::Stationary => self.stationary,
            QtcState::Crossing => self.cross,
        }
    }

    pub fn total(&self) -> f64 {
        self.approach + self.diverge + self.stationary + self.cross
    }

    /// State with the largest share (ties resolve in approach, diverge, stationary, cross order)
    pub fn dominant(&self) -> Option<QtcState> {
        if self.total() == 0.0 {
            return None;
        }
        QtcState::ALL
            .into_iter()
            .fold(None, |best: Option<QtcState>, s| match best {
                Some(b) if self.fraction(b) >= self.fraction(s) => Some(b),
                _ => Some(s),
            })
    }
}

/// Summarize a sequence in one call.
pub fn summarize(sequence: &QtcSequence) -> Distribution {
    Distribution::summarize(sequence)
}
