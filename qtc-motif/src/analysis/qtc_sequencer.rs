//! QTC State Sequencer
//!
//! Converts the time series of two joints into a Qualitative Trajectory
//! Calculus state per frame transition: the pair is approaching, diverging,
//! stationary, or crossing (a direction reversal between two moves that both
//! clear the noise threshold).

use crate::capture::types::Frame;
use crate::time::sample_clock::SampleClock;
use serde::{Deserialize, Serialize};

/// Default distance-noise threshold (millimetres)
pub const DEFAULT_THRESHOLD_MM: f64 = 2.5;

/// Qualitative relation between two joints over one frame transition
///
/// Serialized with the QTC_B symbols used by the export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QtcState {
    /// Distance decreasing
    #[serde(rename = "+0")]
    Approaching,
    /// Distance increasing
    #[serde(rename = "0-")]
    Diverging,
    /// Distance change within the noise threshold
    #[serde(rename = "00")]
    Stationary,
    /// Direction reversal between consecutive significant moves
    #[serde(rename = "0c")]
    Crossing,
}

impl QtcState {
    /// All states, in distribution order
    pub const ALL: [QtcState; 4] = [
        QtcState::Approaching,
        QtcState::Diverging,
        QtcState::Stationary,
        QtcState::Crossing,
    ];

    /// QTC_B symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            QtcState::Approaching => "+0",
            QtcState::Diverging => "0-",
            QtcState::Stationary => "00",
            QtcState::Crossing => "0c",
        }
    }

    /// Parse a QTC_B symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.symbol() == symbol)
    }
}

impl std::fmt::Display for QtcState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One state, anchored to the later frame of its transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QtcSequenceEntry {
    /// Seconds
    #[serde(rename = "t")]
    pub timestamp: f64,
    pub state: QtcState,
}

/// State sequence for one joint pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtcSequence {
    /// Sample rate of the frames the sequence was computed from
    pub sample_rate: f64,
    pub entries: Vec<QtcSequenceEntry>,
}

impl QtcSequence {
    pub fn new(sample_rate: f64, entries: Vec<QtcSequenceEntry>) -> Self {
        Self { sample_rate, entries }
    }

    /// Build a sequence from bare states at one sample per frame, starting at frame 1
    pub fn from_states(sample_rate: f64, states: &[QtcState]) -> Self {
        let entries = states
            .iter()
            .enumerate()
            .map(|(i, state)| QtcSequenceEntry {
                timestamp: (i + 1) as f64 / sample_rate,
                state: *state,
            })
            .collect();
        Self { sample_rate, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn states(&self) -> impl Iterator<Item = QtcState> + '_ {
        self.entries.iter().map(|e| e.state)
    }

    /// Every `stride`-th entry, starting with the first
    pub fn sampled(&self, stride: usize) -> Vec<QtcSequenceEntry> {
        self.entries.iter().step_by(stride.max(1)).copied().collect()
    }
}

/// QTC sequencer for joint pairs
pub struct QtcSequencer {
    /// Distance changes within ±threshold are stationary (capture units)
    threshold: f64,
}

impl QtcSequencer {
    /// Create with the default threshold
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_MM,
        }
    }

    /// Create with a custom threshold. Negative or non-finite values are rejected.
    pub fn with_threshold(threshold: f64) -> crate::Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(crate::Error::InvalidConfiguration(format!(
                "threshold must be a non-negative finite number, got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compute the state sequence of `joint_a`/`joint_b` over `frames`.
    ///
    /// Produces `frames.len() - 1` entries (none for fewer than two frames).
    /// A transition where either joint is missing from either frame is
    /// stationary and leaves the carried delta untouched, so a reversal can
    /// still be detected across the gap.
    pub fn compute(
        &self,
        frames: &[Frame],
        joint_a: &str,
        joint_b: &str,
        sample_rate: f64,
    ) -> crate::Result<QtcSequence> {
        let clock = SampleClock::new(sample_rate)?;
        let mut entries = Vec::with_capacity(frames.len().saturating_sub(1));
        let mut prev_delta: Option<f64> = None;

        for pair in frames.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            let timestamp = clock.timestamp(curr.frame_index);

            let positions = (
                prev.joint(joint_a),
                prev.joint(joint_b),
                curr.joint(joint_a),
                curr.joint(joint_b),
            );
            let (Some(a_prev), Some(b_prev), Some(a_curr), Some(b_curr)) = positions else {
                entries.push(QtcSequenceEntry {
                    timestamp,
                    state: QtcState::Stationary,
                });
                continue;
            };

            let delta = a_curr.distance_to(b_curr) - a_prev.distance_to(b_prev);
            let state = self.classify(delta, prev_delta);

            prev_delta = Some(delta);
            entries.push(QtcSequenceEntry { timestamp, state });
        }

        Ok(QtcSequence::new(clock.sample_rate(), entries))
    }

    /// Classify a distance change, given the previous transition's raw delta.
    pub fn classify(&self, delta: f64, prev_delta: Option<f64>) -> QtcState {
        let t = self.threshold;

        let reversed = prev_delta
            .map(|prev| (prev < -t && delta > t) || (prev > t && delta < -t))
            .unwrap_or(false);

        if reversed {
            QtcState::Crossing
        } else if delta < -t {
            QtcState::Approaching
        } else if delta > t {
            QtcState::Diverging
        } else {
            QtcState::Stationary
        }
    }
}

impl Default for QtcSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute a QTC sequence in one call.
pub fn compute_sequence(
    frames: &[Frame],
    joint_a: &str,
    joint_b: &str,
    sample_rate: f64,
    threshold: f64,
) -> crate::Result<QtcSequence> {
    QtcSequencer::with_threshold(threshold)?.compute(frames, joint_a, joint_b, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::JointPosition;

    /// Frames with joint "a" at the origin and "b" on the x axis at each distance
    fn frames_at(distances: &[f64]) -> Vec<Frame> {
        distances
            .iter()
            .enumerate()
            .map(|(i, d)| {
                Frame::new(i as u64)
                    .with_joint("a", JointPosition::new(0.0, 0.0, 0.0))
                    .with_joint("b", JointPosition::new(*d, 0.0, 0.0))
            })
            .collect()
    }

    fn states(seq: &QtcSequence) -> Vec<QtcState> {
        seq.states().collect()
    }

    use super::QtcState::*;

    #[test]
    fn test_empty_and_single_frame() {
        let seq = compute_sequence(&[], "a", "b", 60.0, 2.5).unwrap();
        assert!(seq.is_empty());

        let seq = compute_sequence(&frames_at(&[100.0]), "a", "b", 60.0, 2.5).unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_length_is_frames_minus_one() {
        let frames = frames_at(&[100.0, 90.0, 95.0, 95.0, 120.0, 80.0]);
        let seq = compute_sequence(&frames, "a", "b", 60.0, 2.5).unwrap();
        assert_eq!(seq.len(), frames.len() - 1);
    }

    #[test]
    fn test_basic_classification() {
        let seq = compute_sequence(&frames_at(&[100.0, 90.0, 89.0, 89.0]), "a", "b", 60.0, 2.5)
            .unwrap();
        assert_eq!(states(&seq), vec![Approaching, Stationary, Stationary]);

        let seq = compute_sequence(&frames_at(&[100.0, 110.0]), "a", "b", 60.0, 2.5).unwrap();
        assert_eq!(states(&seq), vec![Diverging]);
    }

    #[test]
    fn test_delta_exactly_at_threshold_is_stationary() {
        let seq = compute_sequence(&frames_at(&[100.0, 102.5, 100.0]), "a", "b", 60.0, 2.5)
            .unwrap();
        assert_eq!(states(&seq), vec![Stationary, Stationary]);
    }

    #[test]
    fn test_timestamps_use_later_frame() {
        let mut frames = frames_at(&[100.0, 90.0, 80.0]);
        frames[1].frame_index = 60;
        frames[2].frame_index = 90;
        let seq = compute_sequence(&frames, "a", "b", 60.0, 2.5).unwrap();
        assert!((seq.entries[0].timestamp - 1.0).abs() < 1e-12);
        assert!((seq.entries[1].timestamp - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_inflection_produces_single_crossing() {
        // deltas: -20, -20, +20, +20
        let frames = frames_at(&[100.0, 80.0, 60.0, 80.0, 100.0]);
        let seq = compute_sequence(&frames, "a", "b", 60.0, 2.5).unwrap();
        assert_eq!(states(&seq), vec![Approaching, Approaching, Crossing, Diverging]);
    }

    #[test]
    fn test_crossing_in_both_directions() {
        let frames = frames_at(&[100.0, 120.0, 100.0, 120.0]);
        let seq = compute_sequence(&frames, "a", "b", 60.0, 2.5).unwrap();
        assert_eq!(states(&seq), vec![Diverging, Crossing, Crossing]);
    }

    #[test]
    fn test_small_reversal_is_not_crossing() {
        // -20 then +2: second move is inside the threshold
        let frames = frames_at(&[100.0, 80.0, 82.0]);
        let seq = compute_sequence(&frames, "a", "b", 60.0, 2.5).unwrap();
        assert_eq!(states(&seq), vec![Approaching, Stationary]);
    }

    #[test]
    fn test_stationary_breaks_crossing_chain() {
        // -20, 0, +20: carried delta is 0 when the increase arrives
        let frames = frames_at(&[100.0, 80.0, 80.0, 100.0]);
        let seq = compute_sequence(&frames, "a", "b", 60.0, 2.5).unwrap();
        assert_eq!(states(&seq), vec![Approaching, Stationary, Diverging]);
    }

    #[test]
    fn test_missing_joint_is_stationary() {
        let mut frames = frames_at(&[100.0, 80.0, 60.0]);
        frames[1].joints.remove("b");
        let seq = compute_sequence(&frames, "a", "b", 60.0, 2.5).unwrap();
        assert_eq!(states(&seq), vec![Stationary, Stationary]);
    }

    #[test]
    fn test_missing_data_keeps_last_valid_delta() {
        // valid -20, then a gap (frame 2 lacks "b"), then +20 between frames 3 and 4.
        let mut frames = frames_at(&[100.0, 80.0, 0.0, 60.0, 80.0]);
        frames[2].joints.remove("b");
        let seq = compute_sequence(&frames, "a", "b", 60.0, 2.5).unwrap();

        // The -20 survives both skipped transitions, so +20 reads as a reversal.
        assert_eq!(states(&seq), vec![Approaching, Stationary, Stationary, Crossing]);
    }

    #[test]
    fn test_unknown_joint_names_degrade_to_stationary() {
        let frames = frames_at(&[100.0, 50.0, 10.0]);
        let seq = compute_sequence(&frames, "a", "nose", 60.0, 2.5).unwrap();
        assert_eq!(states(&seq), vec![Stationary, Stationary]);
    }

    #[test]
    fn test_zero_threshold() {
        let frames = frames_at(&[100.0, 100.0, 100.001, 100.0]);
        let seq = compute_sequence(&frames, "a", "b", 60.0, 0.0).unwrap();
        assert_eq!(states(&seq), vec![Stationary, Diverging, Crossing]);
    }

    #[test]
    fn test_invalid_configuration() {
        let frames = frames_at(&[100.0, 90.0]);
        assert!(matches!(
            compute_sequence(&frames, "a", "b", 0.0, 2.5),
            Err(crate::Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            compute_sequence(&frames, "a", "b", -60.0, 2.5),
            Err(crate::Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            compute_sequence(&frames, "a", "b", 60.0, -1.0),
            Err(crate::Error::InvalidConfiguration(_))
        ));
        assert!(QtcSequencer::with_threshold(f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_rate_rejected_even_for_empty_input() {
        assert!(compute_sequence(&[], "a", "b", 0.0, 2.5).is_err());
    }

    #[test]
    fn test_classify_prev_none() {
        let sequencer = QtcSequencer::new();
        assert_eq!(sequencer.classify(10.0, None), Diverging);
        assert_eq!(sequencer.classify(-10.0, None), Approaching);
        assert_eq!(sequencer.classify(1.0, None), Stationary);
    }

    #[test]
    fn test_symbols_roundtrip() {
        for state in QtcState::ALL {
            assert_eq!(QtcState::from_symbol(state.symbol()), Some(state));
        }
        assert_eq!(QtcState::from_symbol("??"), None);
    }

    #[test]
    fn test_entry_serializes_with_qtc_symbols() {
        let entry = QtcSequenceEntry {
            timestamp: 0.5,
            state: Approaching,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"t":0.5,"state":"+0"}"#);
    }

    #[test]
    fn test_sampled_stride() {
        let seq = QtcSequence::from_states(60.0, &[Approaching, Diverging, Stationary, Crossing, Approaching]);
        let sampled = seq.sampled(2);
        assert_eq!(sampled.len(), 3);
        assert_eq!(sampled[1].state, Stationary);
        assert_eq!(seq.sampled(0).len(), 5);
    }
}
