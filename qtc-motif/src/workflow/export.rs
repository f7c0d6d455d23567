//! JSON Export
//!
//! Assembles a visualisation document from a capture and its analysis:
//! downsampled frames, downsampled QTC sequences, per-pair distributions and
//! the labelled motifs of the whole session.

use super::analyzer::SessionAnalysis;
use crate::analysis::distribution::Distribution;
use crate::analysis::geometry::normalize_frames;
use crate::analysis::qtc_sequencer::QtcSequenceEntry;
use crate::app::config::{Config, ExportConfig, SessionConfig};
use crate::capture::captury::{JOINT_DISPLAY_NAMES, TARGET_JOINTS};
use crate::capture::types::{Frame, MotionCapture};
use crate::motifs::labeling::MotifLabeler;
use crate::motifs::motif_detector::Motif;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// QTC variant written into export metadata
pub const QTC_VARIANT: &str = "QTC_B";

/// One exported joint pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSummary {
    pub id: String,
    pub joint_a: String,
    pub joint_b: String,
    pub label: String,
    pub distribution: Distribution,
}

/// Provenance of an export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    pub qtc_threshold: f64,
    pub qtc_variant: String,
    /// RFC 3339 generation time
    pub generated_at: String,
    pub run_id: String,
}

/// Descriptive session fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tradition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&SessionConfig> for SessionInfo {
    fn from(session: &SessionConfig) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            performer: session.performer.clone(),
            tradition: session.tradition.clone(),
            region: session.region.clone(),
            description: session.description.clone(),
        }
    }
}

/// The exported document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub session: SessionInfo,
    /// Seconds (frames over fps)
    pub duration: f64,
    pub fps: f64,
    pub total_frames: usize,
    pub sampled_frames: usize,
    /// Frame stride used for `frames`
    pub sample_rate: usize,
    pub joints: Vec<String>,
    pub joint_display_names: BTreeMap<String, String>,
    pub qtc_pairs: Vec<PairSummary>,
    /// pair id to every n-th sequence entry
    pub qtc_sequences: BTreeMap<String, Vec<QtcSequenceEntry>>,
    pub sam_motifs: Vec<Motif>,
    pub frames: Vec<Frame>,
    pub metadata: ExportMetadata,
}

impl ExportDocument {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories
    pub fn write(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;

        info!(
            path = %path.display(),
            frames = self.sampled_frames,
            motifs = self.sam_motifs.len(),
            "Export written"
        );
        Ok(())
    }
}

/// Builds export documents
pub struct SessionExporter {
    options: ExportConfig,
    session: SessionConfig,
    labeler: MotifLabeler,
    threshold: f64,
}

impl SessionExporter {
    pub fn new(options: ExportConfig, session: SessionConfig, labeler: MotifLabeler, threshold: f64) -> Self {
        Self {
            options,
            session,
            labeler,
            threshold,
        }
    }

    /// Exporter using every relevant section of `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.export.clone(),
            config.session.clone(),
            config.labeler(),
            config.analysis.threshold_mm,
        )
    }

    /// Round the session's motif times, then label, sort and cap them
    pub fn export_motifs(&self, analysis: &SessionAnalysis) -> Vec<Motif> {
        let rounded = analysis
            .all_motifs()
            .into_iter()
            .map(|mut motif| {
                motif.start_time = round_to(motif.start_time, self.options.time_precision);
                motif.end_time = round_to(motif.end_time, self.options.time_precision);
                motif
            })
            .collect();

        self.labeler
            .label(rounded)
            .into_iter()
            .take(self.options.max_exported_motifs)
            .collect()
    }

    /// Every `frame_stride`-th frame, normalised over the whole capture when enabled
    pub fn export_frames(&self, capture: &MotionCapture) -> crate::Result<Vec<Frame>> {
        let stride = checked_stride(self.options.frame_stride, "frame_stride")?;
        let mut frames = capture.frames.clone();
        if self.options.normalize_positions {
            normalize_frames(&mut frames);
        }
        Ok(frames.into_iter().step_by(stride).collect())
    }

    pub fn build(&self, capture: &MotionCapture, analysis: &SessionAnalysis) -> crate::Result<ExportDocument> {
        let sequence_stride = checked_stride(self.options.sequence_stride, "sequence_stride")?;
        let frames = self.export_frames(capture)?;

        let joints = ordered_joints(capture);
        let joint_display_names = joints
            .iter()
            .map(|joint| (joint.clone(), display_name(joint)))
            .collect();

        let qtc_pairs = analysis
            .pairs
            .iter()
            .map(|p| PairSummary {
                id: p.pair_id(),
                joint_a: p.pair.joint_a.clone(),
                joint_b: p.pair.joint_b.clone(),
                label: p.pair.label.clone(),
                distribution: p.distribution,
            })
            .collect();

        let qtc_sequences = analysis
            .pairs
            .iter()
            .map(|p| (p.pair_id(), p.sequence.sampled(sequence_stride)))
            .collect();

        Ok(ExportDocument {
            session: SessionInfo::from(&self.session),
            duration: capture.duration_secs(),
            fps: capture.sample_rate,
            total_frames: capture.len(),
            sampled_frames: frames.len(),
            sample_rate: self.options.frame_stride,
            joints,
            joint_display_names,
            qtc_pairs,
            qtc_sequences,
            sam_motifs: self.export_motifs(analysis),
            frames,
            metadata: ExportMetadata {
                capture_date: self.session.capture_date.clone(),
                capture_system: self.session.capture_system.clone(),
                source_file: capture.source.clone(),
                qtc_threshold: self.threshold,
                qtc_variant: QTC_VARIANT.to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                run_id: uuid::Uuid::new_v4().to_string(),
            },
        })
    }
}

fn checked_stride(stride: usize, name: &str) -> crate::Result<usize> {
    if stride == 0 {
        return Err(crate::Error::Export(format!("{} must be > 0", name)));
    }
    Ok(stride)
}

/// Capture joints in tracking order, unknown joints last in name order
pub fn ordered_joints(capture: &MotionCapture) -> Vec<String> {
    let mut present = capture.joint_names();
    let mut joints: Vec<String> = TARGET_JOINTS
        .iter()
        .filter(|target| present.iter().any(|name| name == *target))
        .map(|target| target.to_string())
        .collect();
    present.retain(|name| !TARGET_JOINTS.contains(&name.as_str()));
    joints.extend(present);
    joints
}

/// Human-readable joint name, falling back to the identifier
pub fn display_name(joint: &str) -> String {
    JOINT_DISPLAY_NAMES
        .iter()
        .find(|(name, _)| *name == joint)
        .map(|(_, display)| display.to_string())
        .unwrap_or_else(|| joint.to_string())
}

/// Round to `places` decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
