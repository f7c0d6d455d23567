//! Workflow Module
//!
//! Runs the analysis over a whole capture and turns the result into the JSON
//! export document.

pub mod analyzer;
pub mod export;

pub use analyzer::{AnalyzerConfig, MotionAnalyzer, PairAnalysis, SessionAnalysis};
pub use export::{ExportDocument, SessionExporter};
