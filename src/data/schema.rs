use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Defaults – the layout written by the LIBS acquisition software
// ---------------------------------------------------------------------------

pub const DEFAULT_EXTENSION: &str = "h5";
pub const DEFAULT_LIBS_GROUP: &str = "libs";
pub const DEFAULT_METADATA_GROUP: &str = "metadata";
pub const DEFAULT_X_FIELD: &str = "X";
pub const DEFAULT_Y_FIELD: &str = "Y";
pub const DEFAULT_DATA_FIELD: &str = "data";
pub const DEFAULT_CALIBRATION_FIELD: &str = "calibration";

// ---------------------------------------------------------------------------
// DescentStep – one hop from the file root towards the `libs` group
// ---------------------------------------------------------------------------

/// How to pick the next group while walking down from the file root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescentStep {
    /// The first member in HDF5 listing order (ascending by name).
    FirstChild,
    /// A member with exactly this name.
    Named(String),
}

impl fmt::Display for DescentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescentStep::FirstChild => write!(f, "<first child>"),
            DescentStep::Named(name) => write!(f, "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// SerpentineAxis – which axis of even rows is mirrored after reshape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerpentineAxis {
    /// Reverse the band axis of every pixel in even rows.
    #[default]
    Bands,
    /// Reverse the pixel order of even rows.
    Columns,
    /// Leave the cube as read.
    None,
}

impl std::str::FromStr for SerpentineAxis {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bands" => Ok(SerpentineAxis::Bands),
            "columns" => Ok(SerpentineAxis::Columns),
            "none" => Ok(SerpentineAxis::None),
            other => Err(format!(
                "unknown serpentine axis '{other}' (expected bands, columns or none)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// LoaderSchema – everything the loader assumes about a file
// ---------------------------------------------------------------------------

/// Declarative description of the container layout the loader accepts.
///
/// The defaults describe the acquisition layout:
///
/// ```text
/// /<first>/<first>/libs
///     metadata/X        per-sample row coordinate
///     metadata/Y        per-sample column coordinate
///     data              all samples, flat or [pixels, bands]
///     calibration       wavelength per band
/// ```
///
/// Every field can be overridden from a JSON file; missing keys keep their
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSchema {
    /// File extension of candidate files, without the dot.
    pub extension: String,
    /// Ordered hops from the file root to the group holding the fields below.
    pub descent: Vec<DescentStep>,
    pub metadata_group: String,
    pub x_field: String,
    pub y_field: String,
    pub data_field: String,
    pub calibration_field: String,
    pub serpentine: SerpentineAxis,
    /// Reject files whose coordinates do not form a dense zero-based grid.
    pub require_dense_grid: bool,
}

impl Default for LoaderSchema {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            descent: vec![
                DescentStep::FirstChild,
                DescentStep::FirstChild,
                DescentStep::Named(DEFAULT_LIBS_GROUP.to_string()),
            ],
            metadata_group: DEFAULT_METADATA_GROUP.to_string(),
            x_field: DEFAULT_X_FIELD.to_string(),
            y_field: DEFAULT_Y_FIELD.to_string(),
            data_field: DEFAULT_DATA_FIELD.to_string(),
            calibration_field: DEFAULT_CALIBRATION_FIELD.to_string(),
            serpentine: SerpentineAxis::default(),
            require_dense_grid: true,
        }
    }
}

impl LoaderSchema {
    /// Read a schema from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading schema file {}", path.display()))?;
        let schema: LoaderSchema = serde_json::from_str(&text).context("parsing schema JSON")?;
        Ok(schema)
    }

    /// Whether `path` carries the candidate extension (case-insensitive).
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(self.extension.trim_start_matches('.')))
    }
}
