//! Gesture Motif Mining
//!
//! Finds approach-then-diverge episodes in QTC sequences and gives them
//! human-readable names.

pub mod motif_detector;
pub mod labeling;

pub use motif_detector::{detect_motifs, Motif, MotifDetector, PatternKind};
pub use labeling::MotifLabeler;
