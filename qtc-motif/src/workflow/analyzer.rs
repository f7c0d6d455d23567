//! Motion Analyzer
//!
//! Runs the per-pair pipeline: frames go through the QTC sequencer, and the
//! resulting sequence feeds the distribution summary and the motif detector
//! independently.

use crate::analysis::distribution::Distribution;
use crate::analysis::qtc_sequencer::{QtcSequence, QtcSequencer, DEFAULT_THRESHOLD_MM};
use crate::capture::types::{Frame, JointPair, MotionCapture};
use crate::motifs::motif_detector::{Motif, MotifDetector, DEFAULT_MAX_RESULTS, DEFAULT_MIN_DURATION_S};
use crate::time::SampleClock;
use serde::Serialize;
use tracing::{debug, info};

/// Analyzer thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Distance-noise threshold (capture units)
    pub threshold: f64,
    /// Minimum motif duration (seconds)
    pub min_motif_duration_s: f64,
    /// Motif cap per pair
    pub max_motifs_per_pair: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD_MM,
            min_motif_duration_s: DEFAULT_MIN_DURATION_S,
            max_motifs_per_pair: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Results for one joint pair
#[derive(Debug, Clone, Serialize)]
pub struct PairAnalysis {
    pub pair: JointPair,
    pub sequence: QtcSequence,
    pub distribution: Distribution,
    pub motifs: Vec<Motif>,
}

impl PairAnalysis {
    pub fn pair_id(&self) -> String {
        self.pair.pair_id()
    }
}

/// Results for a whole capture, pairs in configuration order
#[derive(Debug, Clone, Serialize)]
pub struct SessionAnalysis {
    pub sample_rate: f64,
    pub pairs: Vec<PairAnalysis>,
}

impl SessionAnalysis {
    /// Every pair's motifs, in pair order
    pub fn all_motifs(&self) -> Vec<Motif> {
        self.pairs.iter().flat_map(|p| p.motifs.iter().cloned()).collect()
    }

    pub fn motif_count(&self) -> usize {
        self.pairs.iter().map(|p| p.motifs.len()).sum()
    }

    pub fn get(&self, pair_id: &str) -> Option<&PairAnalysis> {
        self.pairs.iter().find(|p| p.pair.pair_id() == pair_id)
    }
}

/// Per-pair QTC and motif analysis
pub struct MotionAnalyzer {
    config: AnalyzerConfig,
}

impl MotionAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn sequencer(&self) -> crate::Result<QtcSequencer> {
        QtcSequencer::with_threshold(self.config.threshold)
    }

    fn detector(&self) -> MotifDetector {
        MotifDetector::with_limits(self.config.min_motif_duration_s, self.config.max_motifs_per_pair)
    }

    /// Analyze a single pair over `frames`
    pub fn analyze_pair(
        &self,
        frames: &[Frame],
        sample_rate: f64,
        pair: &JointPair,
    ) -> crate::Result<PairAnalysis> {
        let sequence = self
            .sequencer()?
            .compute(frames, &pair.joint_a, &pair.joint_b, sample_rate)?;
        Ok(self.finish_pair(pair, sequence))
    }

    fn finish_pair(&self, pair: &JointPair, sequence: QtcSequence) -> PairAnalysis {
        let pair_id = pair.pair_id();
        let distribution = Distribution::summarize(&sequence);
        let motifs = self.detector().detect(&sequence, &pair_id);

        debug!(
            pair = %pair_id,
            entries = sequence.len(),
            approach = distribution.approach,
            diverge = distribution.diverge,
            "Pair sequenced"
        );

        PairAnalysis {
            pair: pair.clone(),
            sequence,
            distribution,
            motifs,
        }
    }

    /// Analyze every pair of a capture, sequentially in the given order.
    ///
    /// Configuration is checked once up front, so an invalid threshold or
    /// sample rate fails before any pair is processed.
    pub fn analyze(&self, capture: &MotionCapture, pairs: &[JointPair]) -> crate::Result<SessionAnalysis> {
        let sequencer = self.sequencer()?;
        let clock = SampleClock::new(capture.sample_rate)?;

        info!(
            frames = capture.len(),
            pairs = pairs.len(),
            sample_rate = clock.sample_rate(),
            "Analyzing capture"
        );

        let mut results = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let sequence = sequencer.compute(&capture.frames, &pair.joint_a, &pair.joint_b, clock.sample_rate())?;
            let analysis = self.finish_pair(pair, sequence);
            info!(pair = %pair.pair_id(), motifs = analysis.motifs.len(), "Pair analyzed");
            results.push(analysis);
        }

        Ok(SessionAnalysis {
            sample_rate: clock.sample_rate(),
            pairs: results,
        })
    }
}

impl Default for MotionAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
