use crate::foundation::error::{LuminaError, LuminaResult};
use crate::transport::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Tunable constants for every pipeline stage.
///
/// All fields have defaults, so a partial JSON file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOpts {
    /// Intent assembler settings.
    pub parse: ParseOpts,
    /// Constraint solver thresholds.
    pub solver: SolverOpts,
    /// Confidence scoring weights.
    pub confidence: ConfidenceOpts,
    /// Clarification question shaping.
    pub clarify: ClarifyOpts,
    /// Device payload defaults.
    pub output: OutputOpts,
    /// Delivery settings.
    pub transport: TransportOpts,
}

/// Intent assembler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOpts {
    /// An architectural role matching more segments than this asks which ones were meant.
    pub max_role_segments: usize,
}

impl Default for ParseOpts {
    fn default() -> Self {
        Self {
            max_role_segments: 4,
        }
    }
}

/// Constraint solver thresholds.
///
/// These are empirical. They are kept tunable instead of being derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverOpts {
    /// Distance from the nearest integer under which an equal spacing counts as exact.
    pub integer_tolerance: f64,
    /// Overlapping layers whose normalized contrast is below this are flagged.
    pub min_contrast: f64,
    /// Equally-spaced search covers `count - r ..= count + r`.
    pub equal_spacing_radius: u32,
    /// Every-nth search covers `interval - r ..= interval + r`.
    pub every_nth_radius: u32,
    /// Upper bound on alternatives returned per constraint.
    pub max_alternatives: usize,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            integer_tolerance: 0.01,
            min_contrast: 0.3,
            equal_spacing_radius: 3,
            every_nth_radius: 2,
            max_alternatives: 4,
        }
    }
}

/// Confidence scoring weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfidenceOpts {
    /// Subtracted per ambiguity.
    pub ambiguity_penalty: f64,
    /// Subtracted per layer whose zone fell back to the whole installation.
    pub default_zone_penalty: f64,
    /// Subtracted per layer whose primary color fell back to white.
    pub default_color_penalty: f64,
    /// Added per ambiguity resolved through clarification.
    pub resolved_bonus: f64,
}

impl Default for ConfidenceOpts {
    fn default() -> Self {
        Self {
            ambiguity_penalty: 0.15,
            default_zone_penalty: 0.05,
            default_color_penalty: 0.1,
            resolved_bonus: 0.1,
        }
    }
}

/// Clarification question shaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClarifyOpts {
    /// Maximum options per question.
    pub max_options: usize,
    /// Preview strip length used when no roofline configuration is known.
    pub preview_pixel_count: u32,
}

impl Default for ClarifyOpts {
    fn default() -> Self {
        Self {
            max_options: 4,
            preview_pixel_count: 50,
        }
    }
}

/// Device payload defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputOpts {
    /// Master brightness (`bri`) written into payloads.
    pub brightness: u8,
}

impl Default for OutputOpts {
    fn default() -> Self {
        Self { brightness: 255 }
    }
}

/// Delivery settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportOpts {
    /// Bounded retry applied to every device command.
    pub retry: RetryPolicy,
}

impl EngineOpts {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LuminaResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LuminaError::config(format!("parse engine options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LuminaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LuminaError::config(format!("open engine options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/opts.rs"]
mod tests;
