//! Configuration Management

use crate::capture::types::JointPair;
use crate::motifs::labeling::MotifLabeler;
use crate::workflow::analyzer::AnalyzerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// QTC and motif thresholds
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// JSON export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Descriptive session metadata copied into exports
    #[serde(default)]
    pub session: SessionConfig,
    /// Joint pairs to analyse, in processing order
    #[serde(default = "default_pairs")]
    pub pairs: Vec<PairConfig>,
}

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Distance-noise threshold (capture units, mm)
    pub threshold_mm: f64,
    /// Minimum motif duration (seconds)
    pub min_motif_duration_s: f64,
    /// Maximum motifs kept per pair
    pub max_motifs_per_pair: usize,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Keep every n-th frame
    pub frame_stride: usize,
    /// Keep every n-th QTC entry
    pub sequence_stride: usize,
    /// Motifs kept across all pairs after time ordering
    pub max_exported_motifs: usize,
    /// Center and scale positions into a unit cube
    pub normalize_positions: bool,
    /// Decimal places for motif start/end times
    pub time_precision: u32,
}

/// Session metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub id: Option<String>,
    pub title: Option<String>,
    pub performer: Option<String>,
    pub tradition: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
    pub capture_date: Option<String>,
    pub capture_system: Option<String>,
}

/// A configured joint pair and its motif label templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairConfig {
    pub joint_a: String,
    pub joint_b: String,
    pub label: String,
    #[serde(default)]
    pub label_templates: Vec<String>,
}

impl PairConfig {
    pub fn joint_pair(&self) -> JointPair {
        JointPair::new(&self.joint_a, &self.joint_b, &self.label)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            export: ExportConfig::default(),
            session: SessionConfig::default(),
            pairs: default_pairs(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold_mm: 2.5,
            min_motif_duration_s: 1.0,
            max_motifs_per_pair: 10,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            frame_stride: 2,
            sequence_stride: 2,
            max_exported_motifs: 15,
            normalize_positions: true,
            time_precision: 2,
        }
    }
}

fn pair(a: &str, b: &str, label: &str, templates: &[&str]) -> PairConfig {
    PairConfig {
        joint_a: a.to_string(),
        joint_b: b.to_string(),
        label: label.to_string(),
        label_templates: templates.iter().map(|t| t.to_string()).collect(),
    }
}

/// The eight limb/trunk pairs tracked for dance captures
pub fn default_pairs() -> Vec<PairConfig> {
    vec![
        pair("l_hand", "head", "L Hand ↔ Head",
             &["Reaching Gesture", "Arm Rise", "Head Approach", "Upward Flow"]),
        pair("r_hand", "head", "R Hand ↔ Head",
             &["Mirror Reach", "Right Arm Rise", "Counter Gesture", "Balanced Flow"]),
        pair("l_hand", "r_hand", "L Hand ↔ R Hand",
             &["Bilateral Wave", "Arm Coordination", "Crossing Arms", "Symmetric Motion"]),
        pair("l_hand", "pelvis", "L Hand ↔ Pelvis",
             &["Cascading Arm", "Downward Flow", "Grounding Gesture", "Center Return"]),
        pair("r_hand", "pelvis", "R Hand ↔ Pelvis",
             &["Right Cascade", "Settling Motion", "Balance Point", "Anchor Movement"]),
        pair("l_foot", "pelvis", "L Foot ↔ Pelvis",
             &["Weight Shift", "Grounded Step", "Base Movement", "Floor Connection"]),
        pair("r_foot", "pelvis", "R Foot ↔ Pelvis",
             &["Counter Step", "Right Anchor", "Stability Point", "Support Shift"]),
        pair("head", "pelvis", "Head ↔ Pelvis",
             &["Torso Wave", "Spinal Flow", "Core Undulation", "Vertical Pulse"]),
    ]
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.analysis.threshold_mm.is_finite() || self.analysis.threshold_mm < 0.0 {
            return Err(crate::Error::Config(format!(
                "threshold_mm must be a non-negative number, got {}", self.analysis.threshold_mm
            )));
        }
        if !self.analysis.min_motif_duration_s.is_finite() || self.analysis.min_motif_duration_s < 0.0 {
            return Err(crate::Error::Config(format!(
                "min_motif_duration_s must be >= 0, got {}", self.analysis.min_motif_duration_s
            )));
        }
        if self.analysis.max_motifs_per_pair == 0 {
            return Err(crate::Error::Config("max_motifs_per_pair must be > 0".to_string()));
        }
        if self.export.frame_stride == 0 || self.export.sequence_stride == 0 {
            return Err(crate::Error::Config("export strides must be > 0".to_string()));
        }
        if self.export.time_precision > 9 {
            return Err(crate::Error::Config(format!(
                "time_precision must be in [0, 9], got {}", self.export.time_precision
            )));
        }
        for (idx, p) in self.pairs.iter().enumerate() {
            if p.joint_a.trim().is_empty() || p.joint_b.trim().is_empty() {
                return Err(crate::Error::Config(format!("pair {} has an empty joint name", idx)));
            }
            if p.joint_a == p.joint_b {
                return Err(crate::Error::Config(format!(
                    "pair {} pairs joint '{}' with itself", idx, p.joint_a
                )));
            }
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".qtc_motif").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Look up a value by dotted key, e.g. `analysis.threshold_mm`
    pub fn get_value(&self, key: &str) -> Result<Option<toml::Value>, crate::Error> {
        let root = toml::Value::try_from(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        let mut node = &root;
        for part in key.split('.') {
            match node.get(part) {
                Some(next) => node = next,
                None => return Ok(None),
            }
        }
        Ok(Some(node.clone()))
    }

    /// Set a scalar value by dotted key.
    ///
    /// `raw` is parsed as a TOML value; anything that does not parse is taken
    /// as a string. The result must still validate.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<(), crate::Error> {
        let mut root = toml::Value::try_from(&*self).map_err(|e| crate::Error::Config(e.to_string()))?;

        let parts: Vec<&str> = key.split('.').collect();
        let (leaf, path) = parts
            .split_last()
            .ok_or_else(|| crate::Error::Config("empty key".to_string()))?;

        let mut node = &mut root;
        for part in path {
            node = node
                .get_mut(*part)
                .ok_or_else(|| crate::Error::Config(format!("unknown key '{}'", key)))?;
        }
        let table = node
            .as_table_mut()
            .ok_or_else(|| crate::Error::Config(format!("'{}' is not inside a section", key)))?;
        table.insert(leaf.to_string(), parse_scalar(raw));

        let updated: Config = root
            .try_into()
            .map_err(|e: toml::de::Error| crate::Error::Config(e.to_string()))?;
        // unknown fields are dropped on deserialization
        if updated.get_value(key)?.is_none() {
            return Err(crate::Error::Config(format!("unknown key '{}'", key)));
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Configured pairs as analysis input
    pub fn joint_pairs(&self) -> Vec<JointPair> {
        self.pairs.iter().map(PairConfig::joint_pair).collect()
    }

    /// Labeler seeded with every pair's templates
    pub fn labeler(&self) -> MotifLabeler {
        self.pairs.iter().fold(MotifLabeler::new(), |labeler, p| {
            labeler.with_templates(p.joint_pair().pair_id(), p.label_templates.iter().cloned())
        })
    }

    /// Analyzer thresholds
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            threshold: self.analysis.threshold_mm,
            min_motif_duration_s: self.analysis.min_motif_duration_s,
            max_motifs_per_pair: self.analysis.max_motifs_per_pair,
        }
    }
}

fn parse_scalar(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("v = {}", raw))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}
