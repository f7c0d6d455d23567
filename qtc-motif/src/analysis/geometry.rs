//! 3D Geometry
//!
//! Distance primitive used by the QTC sequencer, plus the bounding-box
//! normalisation applied to positions for visualisation.

use crate::capture::types::{Frame, JointPosition};

/// Euclidean distance between two positions.
///
/// NaN components propagate to the result.
#[inline]
pub fn distance(p1: &JointPosition, p2: &JointPosition) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    let dz = p1.z - p2.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Axis-aligned bounding box over joint positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: JointPosition,
    pub max: JointPosition,
}

impl BoundingBox {
    /// Bounding box of every joint in every frame, `None` when there are no positions
    pub fn of_frames(frames: &[Frame]) -> Option<Self> {
        let mut positions = frames.iter().flat_map(|f| f.joints.values());
        let first = *positions.next()?;

        let mut bbox = Self { min: first, max: first };
        for p in positions {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.min.z = bbox.min.z.min(p.z);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
            bbox.max.z = bbox.max.z.max(p.z);
        }
        Some(bbox)
    }

    pub fn center(&self) -> JointPosition {
        JointPosition::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Largest extent along any axis
    pub fn max_extent(&self) -> f64 {
        (self.max.x - self.min.x)
            .max(self.max.y - self.min.y)
            .max(self.max.z - self.min.z)
    }
}

/// Center all positions on the bounding-box center and scale by the largest
/// extent, so the whole capture fits in a unit cube around the origin.
///
/// A degenerate (zero-extent) capture is only centered.
pub fn normalize_frames(frames: &mut [Frame]) {
    let Some(bbox) = BoundingBox::of_frames(frames) else {
        return;
    };

    let center = bbox.center();
    let extent = bbox.max_extent();
    let scale = if extent > 0.0 { extent } else { 1.0 };

    for frame in frames.iter_mut() {
        for p in frame.joints.values_mut() {
            p.x = (p.x - center.x) / scale;
            p.y = (p.y - center.y) / scale;
            p.z = (p.z - center.z) / scale;
        }
    }
}
