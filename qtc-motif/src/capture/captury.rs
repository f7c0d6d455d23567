//! Captury Live CSV Reader
//!
//! Reads the semicolon-separated export of Captury Live. The file starts with
//! five header rows (one of which declares the frame rate), followed by one
//! row per frame: the frame number in column 0 and X/Y/Z triples per joint at
//! fixed column offsets.

use super::types::{Frame, JointPosition, MotionCapture};
use crate::time::sample_clock::DEFAULT_SAMPLE_RATE;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Number of header rows preceding frame data
pub const HEADER_ROWS: usize = 5;

/// Field delimiter
pub const DELIMITER: char = ';';

/// Header cell preceding the frame rate value
const FRAME_RATE_MARKER: &str = "Frame Rate";

/// Joint name to (X, Y, Z) column indices in a Captury Live export
pub const JOINT_COLUMNS: &[(&str, (usize, usize, usize))] = &[
    ("pelvis", (3, 4, 5)),           // CenterOfGravity
    ("l_hand", (6, 7, 8)),           // LWristPositions
    ("l_elbow", (12, 13, 14)),
    ("l_shoulder", (18, 19, 20)),
    ("r_hand", (24, 25, 26)),        // RWristPositions
    ("r_elbow", (30, 31, 32)),
    ("r_shoulder", (36, 37, 38)),
    ("l_foot", (48, 49, 50)),        // LAnklePositions
    ("l_knee", (54, 55, 56)),
    ("l_hip", (60, 61, 62)),
    ("r_foot", (72, 73, 74)),        // RAnklePositions
    ("r_knee", (78, 79, 80)),
    ("r_hip", (84, 85, 86)),
    ("spine_base", (132, 133, 134)), // SpinePosition
    ("spine_mid", (144, 145, 146)),  // Spine2Position
    ("sternum", (150, 151, 152)),    // Spine3Position
    ("neck", (162, 163, 164)),
    ("head", (168, 169, 170)),
];

/// Joints extracted by default
pub const TARGET_JOINTS: &[&str] = &[
    "head", "sternum", "pelvis", "l_hand", "r_hand", "l_elbow", "r_elbow", "l_foot", "r_foot",
    "spine_mid",
];

/// Display names for the target joints
pub const JOINT_DISPLAY_NAMES: &[(&str, &str)] = &[
    ("head", "Head"),
    ("sternum", "Sternum"),
    ("pelvis", "Pelvis"),
    ("l_hand", "Left Hand"),
    ("r_hand", "Right Hand"),
    ("l_elbow", "Left Elbow"),
    ("r_elbow", "Right Elbow"),
    ("l_foot", "Left Foot"),
    ("r_foot", "Right Foot"),
    ("spine_mid", "Spine Mid"),
];

/// Column indices for a joint, if it is part of the Captury layout
pub fn joint_columns(name: &str) -> Option<(usize, usize, usize)> {
    JOINT_COLUMNS
        .iter()
        .find(|(joint, _)| *joint == name)
        .map(|(_, cols)| *cols)
}

/// Why a data row was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    /// Fewer columns than the widest joint column requires
    TooShort,
    /// Column 0 is not an integer frame number
    BadFrameNumber,
    /// A coordinate failed to parse as a number
    BadCoordinate,
}

/// Counters from a read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub rows_read: usize,
    pub frames_kept: usize,
    pub too_short: usize,
    pub bad_frame_number: usize,
    pub bad_coordinate: usize,
}

impl ReadStats {
    pub fn rejected(&self) -> usize {
        self.too_short + self.bad_frame_number + self.bad_coordinate
    }

    fn record(&mut self, rejection: RowRejection) {
        match rejection {
            RowRejection::TooShort => self.too_short += 1,
            RowRejection::BadFrameNumber => self.bad_frame_number += 1,
            RowRejection::BadCoordinate => self.bad_coordinate += 1,
        }
    }
}

/// Captury Live CSV reader
pub struct CapturyReader {
    /// (joint name, column indices) to extract
    joints: Vec<(String, (usize, usize, usize))>,
    /// Rate used when the header does not declare one
    pub fallback_sample_rate: f64,
}

impl CapturyReader {
    /// Reader extracting the default target joints
    pub fn new() -> Self {
        let joints = TARGET_JOINTS
            .iter()
            .filter_map(|name| joint_columns(name).map(|cols| (name.to_string(), cols)))
            .collect();
        Self {
            joints,
            fallback_sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Reader extracting a custom joint set. Unknown joint names are an error.
    pub fn with_joints<S: AsRef<str>>(names: &[S]) -> crate::Result<Self> {
        let mut joints = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let cols = joint_columns(name).ok_or_else(|| {
                crate::Error::Ingest(format!("joint '{}' is not part of the Captury layout", name))
            })?;
            joints.push((name.to_string(), cols));
        }
        Ok(Self {
            joints,
            fallback_sample_rate: DEFAULT_SAMPLE_RATE,
        })
    }

    /// Names of the joints this reader extracts
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Minimum column count a data row needs
    fn required_columns(&self) -> usize {
        self.joints
            .iter()
            .map(|(_, (x, y, z))| *x.max(y).max(z) + 1)
            .max()
            .unwrap_or(1)
    }

    /// Read a capture from a file
    pub fn read_path(&self, path: &Path) -> crate::Result<MotionCapture> {
        let file = std::fs::File::open(path)?;
        let mut capture = self.read(file)?;
        capture.source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(capture)
    }

    /// Read a capture from any reader
    pub fn read<R: Read>(&self, reader: R) -> crate::Result<MotionCapture> {
        let (capture, stats) = self.read_with_stats(reader)?;
        if stats.rejected() > 0 {
            warn!(
                rejected = stats.rejected(),
                too_short = stats.too_short,
                bad_frame_number = stats.bad_frame_number,
                bad_coordinate = stats.bad_coordinate,
                "Skipped malformed capture rows"
            );
        }
        Ok(capture)
    }

    /// Read a capture and report row counters
    pub fn read_with_stats<R: Read>(&self, reader: R) -> crate::Result<(MotionCapture, ReadStats)> {
        let mut lines = BufReader::new(reader).lines();
        let mut sample_rate = self.fallback_sample_rate;

        for header_row in 0..HEADER_ROWS {
            let line = lines.next().ok_or_else(|| {
                crate::Error::Ingest(format!(
                    "expected {} header rows, found {}",
                    HEADER_ROWS, header_row
                ))
            })??;
            if let Some(rate) = parse_frame_rate(&line) {
                sample_rate = rate;
            }
        }

        let required = self.required_columns();
        let mut stats = ReadStats::default();
        let mut frames = Vec::new();

        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            stats.rows_read += 1;
            match self.parse_row(&line, required) {
                Ok(frame) => frames.push(frame),
                Err(rejection) => {
                    debug!(row = stats.rows_read, ?rejection, "Dropping capture row");
                    stats.record(rejection);
                }
            }
        }

        stats.frames_kept = frames.len();
        info!(
            frames = frames.len(),
            sample_rate,
            "Parsed Captury capture"
        );

        Ok((MotionCapture::new(sample_rate, frames), stats))
    }

    fn parse_row(&self, line: &str, required: usize) -> Result<Frame, RowRejection> {
        let cells: Vec<&str> = line.split(DELIMITER).collect();
        if cells.len() < required {
            return Err(RowRejection::TooShort);
        }

        let frame_index: u64 = clean_cell(cells[0])
            .parse()
            .map_err(|_| RowRejection::BadFrameNumber)?;

        let mut frame = Frame::new(frame_index);
        for (name, (x, y, z)) in &self.joints {
            let position = JointPosition::new(
                parse_coordinate(cells[*x])?,
                parse_coordinate(cells[*y])?,
                parse_coordinate(cells[*z])?,
            );
            frame.set_joint(name.clone(), position);
        }
        Ok(frame)
    }
}

impl Default for CapturyReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Cell text without surrounding whitespace or CSV quotes
fn clean_cell(cell: &str) -> &str {
    cell.trim().trim_matches('"').trim()
}

fn parse_coordinate(cell: &str) -> Result<f64, RowRejection> {
    clean_cell(cell)
        .parse::<f64>()
        .map_err(|_| RowRejection::BadCoordinate)
}

/// Frame rate declared in a header row: the cell after "Frame Rate"
fn parse_frame_rate(line: &str) -> Option<f64> {
    let cells: Vec<&str> = line.split(DELIMITER).collect();
    let idx = cells.iter().position(|c| clean_cell(c) == FRAME_RATE_MARKER)?;
    let rate: f64 = clean_cell(cells.get(idx + 1)?).parse().ok()?;
    if rate.is_finite() && rate > 0.0 {
        Some(rate)
    } else {
        None
    }
}
