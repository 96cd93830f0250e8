use crate::foundation::error::{LuminaError, LuminaResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::Path;

/// Architectural type of a physical segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentType {
    /// Straight run along an edge.
    Run,
    /// Corner where two runs meet.
    Corner,
    /// Gable peak or apex.
    Peak,
    /// Vertical column or post.
    Column,
    /// Short connector between features.
    Connector,
}

/// Wiring direction of a strip segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentDirection {
    /// Pixel indices grow left to right.
    #[default]
    LeftToRight,
    /// Pixel indices grow right to left.
    RightToLeft,
    /// Pixel indices grow upwards.
    Upward,
    /// Pixel indices grow downwards.
    Downward,
}

/// Which side of the building a segment is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Location {
    /// Street-facing side.
    Front,
    /// Rear side.
    Back,
    /// Left side seen from the front.
    Left,
    /// Right side seen from the front.
    Right,
}

/// Architectural role a user can name in free text.
///
/// Roles are broader than [`SegmentType`]: eaves, fascia and soffit all describe runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArchitecturalRole {
    /// Gable peaks.
    Peak,
    /// Corners.
    Corner,
    /// Straight runs.
    Run,
    /// Columns and posts.
    Column,
    /// Eaves.
    Eave,
    /// Fascia boards.
    Fascia,
    /// Soffits.
    Soffit,
}

impl ArchitecturalRole {
    /// Whether a segment of type `ty` plays this role.
    pub fn matches(self, ty: SegmentType) -> bool {
        match self {
            Self::Peak => ty == SegmentType::Peak,
            Self::Corner => ty == SegmentType::Corner,
            Self::Column => ty == SegmentType::Column,
            Self::Run | Self::Eave | Self::Fascia | Self::Soffit => ty == SegmentType::Run,
        }
    }

    /// Human-readable plural used in questions.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Peak => "peaks",
            Self::Corner => "corners",
            Self::Run => "runs",
            Self::Column => "columns",
            Self::Eave => "eaves",
            Self::Fascia => "fascia runs",
            Self::Soffit => "soffit runs",
        }
    }
}

fn default_anchor_led_count() -> u32 {
    2
}

fn default_level() -> u32 {
    1
}

/// A named, contiguous pixel range of the installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of pixels in this segment.
    pub pixel_count: u32,
    /// Architectural type.
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    /// Wiring direction.
    #[serde(default)]
    pub direction: SegmentDirection,
    /// Local offsets of anchor zones; empty means type-based defaults.
    #[serde(default)]
    pub anchor_offsets: Vec<u32>,
    /// Width of each anchor zone in pixels.
    #[serde(default = "default_anchor_led_count")]
    pub anchor_led_count: u32,
    /// Side of the building.
    #[serde(default)]
    pub location: Option<Location>,
    /// Floor level, 1 = ground floor.
    #[serde(default = "default_level")]
    pub level: u32,
    /// Visually prominent feature (front gable, entry columns, ...).
    #[serde(default)]
    pub prominent: bool,
    /// Position in the physical chain.
    #[serde(default)]
    pub sort_order: i32,
    /// Global index of the first pixel. Derived from sort order on construction.
    #[serde(default)]
    pub start_pixel: u32,
}

impl Segment {
    /// Construct a segment with defaults for everything but the essentials.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pixel_count: u32,
        segment_type: SegmentType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pixel_count,
            segment_type,
            direction: SegmentDirection::default(),
            anchor_offsets: Vec::new(),
            anchor_led_count: default_anchor_led_count(),
            location: None,
            level: default_level(),
            prominent: false,
            sort_order: 0,
            start_pixel: 0,
        }
    }

    /// Global half-open pixel range `[start, start + pixel_count)`.
    pub fn global_range(&self) -> Range<u32> {
        self.start_pixel..self.start_pixel + self.pixel_count
    }

    /// Local anchor offsets: explicit ones when set, otherwise defaults for the segment type.
    pub fn anchors(&self) -> Vec<u32> {
        if !self.anchor_offsets.is_empty() {
            let mut out = self.anchor_offsets.clone();
            out.sort_unstable();
            out.dedup();
            return out;
        }

        let n = self.pixel_count;
        let k = self.anchor_led_count.max(1);
        if n == 0 {
            return Vec::new();
        }
        let mut out = match self.segment_type {
            SegmentType::Corner => vec![0],
            SegmentType::Peak => vec![(n / 2).saturating_sub(k / 2)],
            SegmentType::Run | SegmentType::Column => {
                if n > k {
                    vec![0, n - k]
                } else {
                    vec![0]
                }
            }
            SegmentType::Connector => Vec::new(),
        };
        out.dedup();
        out
    }

    /// Whether local offset `local` falls inside any anchor zone.
    pub fn in_anchor_zone(&self, local: u32) -> bool {
        let k = self.anchor_led_count.max(1);
        self.anchors()
            .iter()
            .any(|&a| local >= a && local < a.saturating_add(k))
    }
}

/// Raw JSON shape of a roofline; normalized into [`RooflineConfiguration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RooflineDef {
    /// Segments in any order; `sortOrder` decides the chain.
    pub segments: Vec<Segment>,
}

/// Physical installation: segments in chain order with contiguous pixel ranges.
///
/// Invariant: segment `i` starts at the sum of the pixel counts of segments `0..i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RooflineDef", into = "RooflineDef")]
pub struct RooflineConfiguration {
    segments: Vec<Segment>,
    total_pixel_count: u32,
}

impl RooflineConfiguration {
    /// Validate segments, order them by `sort_order` (stable) and assign start pixels.
    pub fn new(mut segments: Vec<Segment>) -> LuminaResult<Self> {
        let mut ids = HashSet::new();
        for (i, seg) in segments.iter().enumerate() {
            if seg.id.trim().is_empty() {
                return Err(LuminaError::validation(format!(
                    "segments[{i}] must have a non-empty id"
                )));
            }
            if !ids.insert(seg.id.as_str()) {
                return Err(LuminaError::validation(format!(
                    "duplicate segment id '{}'",
                    seg.id
                )));
            }
            if seg.anchor_led_count == 0 {
                return Err(LuminaError::validation(format!(
                    "segment '{}' anchorLedCount must be > 0",
                    seg.id
                )));
            }
            if let Some(&bad) = seg.anchor_offsets.iter().find(|&&a| a >= seg.pixel_count) {
                return Err(LuminaError::validation(format!(
                    "segment '{}' anchor offset {bad} is outside its {} pixels",
                    seg.id, seg.pixel_count
                )));
            }
        }

        segments.sort_by_key(|s| s.sort_order);
        let mut next = 0u32;
        for seg in &mut segments {
            seg.start_pixel = next;
            next = next.checked_add(seg.pixel_count).ok_or_else(|| {
                LuminaError::validation("total pixel count overflows u32")
            })?;
        }

        Ok(Self {
            segments,
            total_pixel_count: next,
        })
    }

    /// Parse and validate a roofline from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LuminaResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LuminaError::validation(format!("parse roofline JSON: {e}")))
    }

    /// Parse and validate a roofline from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LuminaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LuminaError::validation(format!("open roofline JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Segments in chain order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Sum of all segment pixel counts.
    pub fn total_pixel_count(&self) -> u32 {
        self.total_pixel_count
    }

    /// Look up a segment by id.
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Segments playing `role`, in chain order.
    pub fn segments_for_role(&self, role: ArchitecturalRole) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|s| role.matches(s.segment_type))
            .collect()
    }

    /// Whether any segment sits on floor `level`.
    pub fn has_level(&self, level: u32) -> bool {
        self.segments.iter().any(|s| s.level == level)
    }

    /// The segment containing global pixel `pixel`, if any.
    pub fn segment_at(&self, pixel: u32) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.global_range().contains(&pixel))
    }
}

impl TryFrom<RooflineDef> for RooflineConfiguration {
    type Error = LuminaError;

    fn try_from(def: RooflineDef) -> Result<Self, Self::Error> {
        Self::new(def.segments)
    }
}

impl From<RooflineConfiguration> for RooflineDef {
    fn from(cfg: RooflineConfiguration) -> Self {
        Self {
            segments: cfg.segments,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/roofline.rs"]
mod tests;
