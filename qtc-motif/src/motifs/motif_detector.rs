//! Approach-Diverge Motif Detection
//!
//! Scans a QTC sequence for gesture episodes where two joints close in on
//! each other and then separate again: a run of approaching (with stationary
//! pauses) immediately followed by diverging or crossing, extended through
//! the diverging run (again tolerating pauses).
//!
//! The scan is a single forward pass driven by an explicit phase machine:
//!
//! ```text
//! Search ──A──▶ ExtendApproach ──▶ ConfirmDiverge ──D/C──▶ ExtendDiverge ──▶ Emit
//!   ▲                                   │                                     │
//!   └───────────────── other ───────────┘◀────────────────────────────────────┘
//! ```

use crate::analysis::qtc_sequencer::{QtcSequence, QtcSequenceEntry, QtcState};
use crate::time::sample_clock::SampleClock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default minimum episode duration (seconds)
pub const DEFAULT_MIN_DURATION_S: f64 = 1.0;

/// Default cap on motifs per pair
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Minimum look-ahead that must remain past the search cursor (seconds)
pub const DEFAULT_LOOKAHEAD_S: f64 = 0.5;

/// Shape of a detected motif
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    #[serde(rename = "approach-diverge")]
    ApproachDiverge,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::ApproachDiverge => "approach-diverge",
        }
    }
}

/// A detected gesture episode for one joint pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motif {
    /// `{pair_id}_motif_{n}`, n counting from 1 within the pair
    pub id: String,
    pub pair_id: String,
    /// Seconds
    pub start_time: f64,
    /// Seconds, never before `start_time`
    pub end_time: f64,
    pub label: String,
    pub pattern_kind: PatternKind,
}

impl Motif {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Same motif under a different label
    pub fn relabeled(self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self
        }
    }
}

/// Scan phase, carrying the cursors it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Looking for an approaching entry at the search cursor
    Search,
    /// Walking `j` over approaching/stationary entries
    ExtendApproach { start: usize, j: usize },
    /// Checking whether `j` opens a diverging run
    ConfirmDiverge { start: usize, j: usize },
    /// Walking `k` over diverging/stationary entries
    ExtendDiverge { start: usize, k: usize },
    /// Episode spans `start..=min(end, len - 1)`
    Emit { start: usize, end: usize },
}

/// Approach-diverge motif detector
pub struct MotifDetector {
    /// Episodes shorter than this are discarded (seconds)
    pub min_duration_s: f64,
    /// At most this many motifs are returned, earliest first
    pub max_results: usize,
    /// Search stops once less than this much sequence remains ahead (seconds)
    pub lookahead_s: f64,
}

impl MotifDetector {
    /// Create with default thresholds
    pub fn new() -> Self {
        Self {
            min_duration_s: DEFAULT_MIN_DURATION_S,
            max_results: DEFAULT_MAX_RESULTS,
            lookahead_s: DEFAULT_LOOKAHEAD_S,
        }
    }

    /// Create with a custom minimum duration and result cap.
    ///
    /// Negative durations are clamped to zero.
    pub fn with_limits(min_duration_s: f64, max_results: usize) -> Self {
        Self {
            min_duration_s: min_duration_s.max(0.0),
            max_results,
            lookahead_s: DEFAULT_LOOKAHEAD_S,
        }
    }

    /// Look-ahead window in entries at the sequence's native rate
    pub fn lookahead_samples(&self, sequence: &QtcSequence) -> usize {
        let clock = match SampleClock::new(sequence.sample_rate) {
            Ok(clock) => clock,
            Err(e) => {
                warn!(error = %e, "Sequence has no usable sample rate; assuming default");
                SampleClock::default()
            }
        };
        clock.samples_in(self.lookahead_s)
    }

    /// Detect motifs in a sequence.
    pub fn detect(&self, sequence: &QtcSequence, pair_id: &str) -> Vec<Motif> {
        let entries = sequence.entries.as_slice();
        let n = entries.len();
        let window = self.lookahead_samples(sequence);

        let mut motifs = Vec::new();
        let mut i = 0usize;
        let mut phase = Phase::Search;

        loop {
            phase = match phase {
                Phase::Search => {
                    if motifs.len() >= self.max_results || i + window >= n {
                        break;
                    }
                    if entries[i].state == QtcState::Approaching {
                        Phase::ExtendApproach { start: i, j: i + 1 }
                    } else {
                        i += 1;
                        Phase::Search
                    }
                }

                Phase::ExtendApproach { start, mut j } => {
                    while j < n && continues_approach(&entries[j]) {
                        j += 1;
                    }
                    Phase::ConfirmDiverge { start, j }
                }

                Phase::ConfirmDiverge { start, j } => {
                    if j < n && opens_diverge(&entries[j]) {
                        Phase::ExtendDiverge { start, k: j }
                    } else {
                        i = j;
                        Phase::Search
                    }
                }

                Phase::ExtendDiverge { start, mut k } => {
                    while k < n && continues_diverge(&entries[k]) {
                        k += 1;
                    }
                    Phase::Emit { start, end: k }
                }

                Phase::Emit { start, end } => {
                    let start_time = entries[start].timestamp;
                    let end_time = entries[end.min(n - 1)].timestamp;

                    if end_time - start_time >= self.min_duration_s {
                        let n_motif = motifs.len() + 1;
                        motifs.push(Motif {
                            id: format!("{}_motif_{}", pair_id, n_motif),
                            pair_id: pair_id.to_string(),
                            start_time,
                            end_time,
                            label: format!("Gesture Pattern {}", n_motif),
                            pattern_kind: PatternKind::ApproachDiverge,
                        });
                    }

                    i = end;
                    Phase::Search
                }
            };
        }

        debug!(pair = %pair_id, entries = n, window, motifs = motifs.len(), "Motif scan complete");
        motifs
    }
}

impl Default for MotifDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn continues_approach(entry: &QtcSequenceEntry) -> bool {
    matches!(entry.state, QtcState::Approaching | QtcState::Stationary)
}

fn opens_diverge(entry: &QtcSequenceEntry) -> bool {
    matches!(entry.state, QtcState::Diverging | QtcState::Crossing)
}

fn continues_diverge(entry: &QtcSequenceEntry) -> bool {
    matches!(entry.state, QtcState::Diverging | QtcState::Stationary)
}

/// Detect motifs in one call.
pub fn detect_motifs(
    sequence: &QtcSequence,
    pair_id: &str,
    min_duration_s: f64,
    max_results: usize,
) -> Vec<Motif> {
    MotifDetector::with_limits(min_duration_s, max_results).detect(sequence, pair_id)
}
