//! Core types for motion capture
//!
//! Defines the per-frame joint data consumed by the QTC analysis.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 3D position of a joint in capture units (millimetres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl JointPosition {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &JointPosition) -> f64 {
        crate::analysis::geometry::distance(self, other)
    }
}

/// One captured frame: its index and the joint positions recorded in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Capture frame number (non-decreasing, may have gaps)
    #[serde(rename = "frame")]
    pub frame_index: u64,
    /// Joint name to position
    pub joints: BTreeMap<String, JointPosition>,
}

impl Frame {
    /// Create an empty frame
    pub fn new(frame_index: u64) -> Self {
        Self {
            frame_index,
            joints: BTreeMap::new(),
        }
    }

    /// Builder-style joint insertion
    pub fn with_joint(mut self, name: impl Into<String>, position: JointPosition) -> Self {
        self.joints.insert(name.into(), position);
        self
    }

    /// Insert or replace a joint position
    pub fn set_joint(&mut self, name: impl Into<String>, position: JointPosition) {
        self.joints.insert(name.into(), position);
    }

    /// Position of a joint, if recorded in this frame
    pub fn joint(&self, name: &str) -> Option<&JointPosition> {
        self.joints.get(name)
    }
}

/// A monitored pair of joints
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointPair {
    pub joint_a: String,
    pub joint_b: String,
    /// Human-readable label, e.g. "L Hand ↔ Head"
    pub label: String,
}

impl JointPair {
    pub fn new(joint_a: impl Into<String>, joint_b: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            joint_a: joint_a.into(),
            joint_b: joint_b.into(),
            label: label.into(),
        }
    }

    /// Stable identifier used for motif ids and export keys
    pub fn pair_id(&self) -> String {
        format!("{}-{}", self.joint_a, self.joint_b)
    }
}

/// A complete batch recording ready for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionCapture {
    /// Frames per second
    pub sample_rate: f64,
    /// Frames in capture order
    pub frames: Vec<Frame>,
    /// Source file name, if read from disk
    pub source: Option<String>,
}

impl MotionCapture {
    pub fn new(sample_rate: f64, frames: Vec<Frame>) -> Self {
        Self {
            sample_rate,
            frames,
            source: None,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Recording length in seconds (frame count over sample rate)
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.frames.len() as f64 / self.sample_rate
        } else {
            0.0
        }
    }

    /// Names of every joint seen in any frame, sorted
    pub fn joint_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .frames
            .iter()
            .flat_map(|f| f.joints.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
