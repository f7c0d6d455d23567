//! # QTC Motif
//!
//! Turns motion-capture recordings into Qualitative Trajectory Calculus (QTC)
//! state sequences for pairs of body joints, then mines those sequences for
//! recurring gesture motifs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qtc_motif::capture::captury::CapturyReader;
//! use qtc_motif::capture::types::JointPair;
//! use qtc_motif::workflow::analyzer::{AnalyzerConfig, MotionAnalyzer};
//!
//! let capture = CapturyReader::new()
//!     .read_path(std::path::Path::new("session.csv"))
//!     .expect("Failed to read capture");
//!
//! let pairs = vec![JointPair::new("l_hand", "head", "L Hand ↔ Head")];
//! let analyzer = MotionAnalyzer::new(AnalyzerConfig::default());
//! let session = analyzer.analyze(&capture, &pairs).expect("Invalid configuration");
//!
//! for pair in &session.pairs {
//!     println!("{}: {} motifs", pair.pair.pair_id(), pair.motifs.len());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`time`]: Sample clock (frame index to seconds)
//! - [`capture`]: Joint/frame data model and Captury CSV ingestion
//! - [`analysis`]: Geometry, QTC sequencer, state distribution
//! - [`motifs`]: Approach-diverge motif detection and labelling
//! - [`workflow`]: Per-pair analysis and JSON export
//! - [`app`]: CLI and configuration management
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌──────────────┐
//! │ Captury CSV │───▶│   Frames    │───▶│ QTC Sequence │──┬──▶ Distribution
//! │  (ingest)   │    │ (per joint) │    │  (per pair)  │  │
//! └─────────────┘    └─────────────┘    └──────────────┘  └──▶ Motifs ──▶ Labels
//!                                                                  │
//!                                                                  ▼
//!                                                            JSON export
//! ```

pub mod time;
pub mod capture;
pub mod analysis;
pub mod motifs;
pub mod app;
pub mod workflow;

// Re-export commonly used types
pub use analysis::{Distribution, QtcSequence, QtcSequenceEntry, QtcSequencer, QtcState};
pub use capture::types::{Frame, JointPair, JointPosition, MotionCapture};
pub use motifs::{Motif, MotifDetector};
pub use time::SampleClock;
pub use workflow::{MotionAnalyzer, SessionAnalysis};

/// Result type alias for the QTC motif miner
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the QTC motif miner
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
