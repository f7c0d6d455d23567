//! Joint-pair trajectory analysis
//!
//! This module turns raw joint positions into qualitative motion:
//! - 3D distance and bounding-box normalisation
//! - QTC state sequencing per joint pair
//! - State distribution summaries

pub mod geometry;
pub mod qtc_sequencer;
pub mod distribution;

pub use distribution::Distribution;
pub use qtc_sequencer::{compute_sequence, QtcSequence, QtcSequenceEntry, QtcSequencer, QtcState};
