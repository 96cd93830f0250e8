use crate::foundation::color::Rgbw;
use crate::model::effect::Effect;
use crate::model::roofline::{ArchitecturalRole, Location, RooflineConfiguration};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Inclusive global pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelRange {
    /// First pixel.
    pub start: u32,
    /// Last pixel (inclusive).
    pub end: u32,
}

impl PixelRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    fn intersects(self, other: Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A subset of the installation's pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ZoneSelector {
    /// Every pixel.
    All,
    /// Specific segments by id.
    Segments {
        /// Segment ids.
        ids: Vec<String>,
    },
    /// Every segment playing one of these roles.
    Architectural {
        /// Roles.
        roles: Vec<ArchitecturalRole>,
    },
    /// Every segment on one side of the building.
    Location {
        /// Side.
        location: Location,
    },
    /// Every segment on one floor.
    Level {
        /// Floor, 1 = ground.
        level: u32,
    },
    /// Explicit pixel ranges.
    Custom {
        /// Inclusive ranges.
        ranges: Vec<PixelRange>,
    },
}

impl ZoneSelector {
    /// Whether two selectors name overlapping pixels without consulting a configuration.
    ///
    /// Two `All` selectors always overlap; selectors of the same kind overlap iff their concrete
    /// sets intersect; selectors of different kinds are treated as disjoint.
    pub fn overlaps(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::All, Self::All) => true,
            (Self::Segments { ids: a }, Self::Segments { ids: b }) => {
                a.iter().any(|id| b.contains(id))
            }
            (Self::Architectural { roles: a }, Self::Architectural { roles: b }) => {
                a.iter().any(|r| b.contains(r))
            }
            (Self::Location { location: a }, Self::Location { location: b }) => a == b,
            (Self::Level { level: a }, Self::Level { level: b }) => a == b,
            (Self::Custom { ranges: a }, Self::Custom { ranges: b }) => a
                .iter()
                .any(|ra| b.iter().any(|rb| ra.intersects(*rb))),
            _ => false,
        }
    }

    /// Global half-open pixel ranges this selector covers, in chain order.
    ///
    /// Custom ranges are clipped to the installation; unknown segment ids contribute nothing.
    pub fn resolve(&self, cfg: &RooflineConfiguration) -> Vec<Range<u32>> {
        let total = cfg.total_pixel_count();
        let mut out: Vec<Range<u32>> = match self {
            Self::All => {
                if total == 0 {
                    Vec::new()
                } else {
                    vec![0..total]
                }
            }
            Self::Segments { ids } => cfg
                .segments()
                .iter()
                .filter(|s| ids.contains(&s.id))
                .map(|s| s.global_range())
                .collect(),
            Self::Architectural { roles } => cfg
                .segments()
                .iter()
                .filter(|s| roles.iter().any(|r| r.matches(s.segment_type)))
                .map(|s| s.global_range())
                .collect(),
            Self::Location { location } => cfg
                .segments()
                .iter()
                .filter(|s| s.location == Some(*location))
                .map(|s| s.global_range())
                .collect(),
            Self::Level { level } => cfg
                .segments()
                .iter()
                .filter(|s| s.level == *level)
                .map(|s| s.global_range())
                .collect(),
            Self::Custom { ranges } => ranges
                .iter()
                .filter(|r| r.start < total)
                .map(|r| r.start..r.end.min(total.saturating_sub(1)) + 1)
                .collect(),
        };
        out.retain(|r| !r.is_empty());
        out.sort_by_key(|r| r.start);
        out
    }

    /// Number of pixels covered (overlapping custom ranges count once per range).
    pub fn pixel_count(&self, cfg: &RooflineConfiguration) -> u32 {
        self.resolve(cfg).iter().map(|r| r.end - r.start).sum()
    }

    /// Short human description.
    pub fn describe(&self) -> String {
        match self {
            Self::All => "entire installation".to_owned(),
            Self::Segments { ids } => format!("segments {}", ids.join(", ")),
            Self::Architectural { roles } => roles
                .iter()
                .map(|r| r.plural())
                .collect::<Vec<_>>()
                .join(" and "),
            Self::Location { location } => format!("{location:?} side").to_lowercase(),
            Self::Level { level } => format!("level {level}"),
            Self::Custom { ranges } => format!("{} custom range(s)", ranges.len()),
        }
    }
}

/// How lit pixels are distributed within a zone.
///
/// Counts and intervals must be positive when the variant carries them; the solver reports a
/// zero as an invalid parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SpacingRule {
    /// Repeating `on_count` lit, `off_count` dark.
    #[serde(rename_all = "camelCase")]
    Pattern {
        /// Lit pixels per cycle.
        on_count: u32,
        /// Dark pixels per cycle.
        off_count: u32,
    },
    /// `count` lit pixels spread evenly across the zone.
    EquallySpaced {
        /// Number of lit pixels.
        count: u32,
    },
    /// Every `interval`-th pixel lit.
    EveryNth {
        /// Step between lit pixels.
        interval: u32,
    },
    /// Only the anchor zones.
    AnchorsOnly,
    /// Every pixel.
    Continuous,
}

impl SpacingRule {
    /// Short label, e.g. `"1 on, 2 off"`.
    pub fn label(&self) -> String {
        match *self {
            Self::Pattern {
                on_count,
                off_count,
            } => format!("{on_count} on, {off_count} off"),
            Self::EquallySpaced { count } => format!("{count} equally spaced"),
            Self::EveryNth { interval } => format!("every {interval}"),
            Self::AnchorsOnly => "anchors only".to_owned(),
            Self::Continuous => "continuous".to_owned(),
        }
    }
}

/// Colors for one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAssignment {
    /// Main color.
    pub primary: Rgbw,
    /// Second color (off pixels, gradient end, alternate).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Rgbw>,
    /// Accent applied to anchor zones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<Rgbw>,
    /// Background fill for pixels a spacing rule leaves dark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgbw>,
    /// Optional spacing policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<SpacingRule>,
}

impl ColorAssignment {
    /// Single primary color, nothing else.
    pub fn solid(primary: Rgbw) -> Self {
        Self {
            primary,
            secondary: None,
            accent: None,
            fill: None,
            spacing: None,
        }
    }
}

/// Static arrangement of a layer's colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PatternRule {
    /// One color.
    #[default]
    Solid,
    /// Primary fading into secondary.
    Gradient,
    /// Primary and secondary alternating pixel by pixel.
    Alternating,
    /// Twinkling primary.
    Twinkle,
    /// Wave of primary.
    Wave,
}

/// Kind of animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MotionType {
    /// Chasing blocks.
    Chase,
    /// Traveling wave.
    Wave,
    /// Random twinkles.
    Twinkle,
    /// Breathing brightness.
    Pulse,
    /// Scanner dot.
    Scan,
}

impl MotionType {
    /// Device effect implementing this motion.
    pub fn effect(self) -> Effect {
        match self {
            Self::Chase => Effect::Chase,
            Self::Wave => Effect::Colorwaves,
            Self::Twinkle => Effect::Twinkle,
            Self::Pulse => Effect::Breathe,
            Self::Scan => Effect::Scan,
        }
    }
}

/// Direction of travel for a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MotionDirection {
    /// Left to right.
    #[default]
    LeftToRight,
    /// Right to left.
    RightToLeft,
    /// Towards the center.
    Inward,
    /// Away from the center.
    Outward,
    /// Bottom to top.
    Upward,
    /// Top to bottom.
    Downward,
    /// Clockwise around the building.
    Clockwise,
    /// Counter-clockwise around the building.
    CounterClockwise,
}

impl MotionDirection {
    /// Whether the controller must run the effect reversed relative to pixel order.
    pub fn is_reversed(self) -> bool {
        matches!(
            self,
            Self::RightToLeft | Self::Inward | Self::Downward | Self::CounterClockwise
        )
    }

    /// Human label.
    pub fn label(self) -> &'static str {
        match self {
            Self::LeftToRight => "left to right",
            Self::RightToLeft => "right to left",
            Self::Inward => "inward",
            Self::Outward => "outward",
            Self::Upward => "upward",
            Self::Downward => "downward",
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter-clockwise",
        }
    }
}

/// Animation settings for a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionSettings {
    /// Kind of motion.
    pub motion_type: MotionType,
    /// Direction of travel.
    pub direction: MotionDirection,
    /// Controller speed (`sx`).
    pub speed: u8,
    /// Controller intensity (`ix`).
    pub intensity: u8,
    /// Run reversed relative to pixel order; derived from `direction`.
    pub reverse: bool,
    /// Device effect.
    pub effect: Effect,
}

impl MotionSettings {
    /// Settings for `motion_type` travelling `direction` at default speed and intensity.
    pub fn new(motion_type: MotionType, direction: MotionDirection) -> Self {
        Self {
            motion_type,
            direction,
            speed: 128,
            intensity: 128,
            reverse: direction.is_reversed(),
            effect: motion_type.effect(),
        }
    }
}

/// One color/pattern/motion rule scoped to a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignLayer {
    /// Stable id, `layer-<clause index>`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Pixels this layer applies to.
    pub zone: ZoneSelector,
    /// Colors and spacing.
    pub colors: ColorAssignment,
    /// Static pattern.
    pub pattern: PatternRule,
    /// Optional animation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<MotionSettings>,
    /// Higher wins where zones overlap.
    pub priority: u32,
}

/// What kind of underspecification an ambiguity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmbiguityKind {
    /// Which segments were meant.
    Zone,
    /// Which shade of a vague color.
    Color,
    /// How lit pixels should be spaced.
    Spacing,
    /// The requested spacing does not fit the zone.
    SpacingImpossible,
    /// Which way a motion travels.
    Direction,
    /// Two overlapping layers disagree.
    ConflictResolution,
    /// Which animation was meant.
    Effect,
    /// Two overlapping layers are hard to tell apart.
    LowContrast,
}

/// Structured payload of a choice; applied back onto the intent when chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChoiceValue {
    /// Replace the layer's zone.
    Zone {
        /// New zone.
        zone: ZoneSelector,
    },
    /// Replace the layer's primary color.
    Color {
        /// New primary.
        color: Rgbw,
    },
    /// Replace the layer's spacing rule.
    Spacing {
        /// New rule.
        rule: SpacingRule,
    },
    /// Replace the layer's motion direction.
    Direction {
        /// New direction.
        direction: MotionDirection,
    },
    /// Give the layer a motion of this type.
    Motion {
        /// Motion type.
        motion_type: MotionType,
    },
    /// Let this layer win the conflict.
    #[serde(rename_all = "camelCase")]
    PreferLayer {
        /// Winning layer.
        layer_id: String,
    },
    /// Blend the conflicting layers.
    Blend,
    /// Leave the layer as is.
    Keep,
}

/// One answer offered for an ambiguity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarificationChoice {
    /// Id unique within the ambiguity.
    pub id: String,
    /// User-facing label.
    pub label: String,
    /// Suggested default.
    pub recommended: bool,
    /// Structured value; `None` means the label is all there is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ChoiceValue>,
    /// Short preview text (hex color, spacing label).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_preview: Option<String>,
}

impl ClarificationChoice {
    /// Choice with a structured value.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        recommended: bool,
        value: Option<ChoiceValue>,
    ) -> Self {
        let value_preview = match &value {
            Some(ChoiceValue::Color { color }) => Some(color.to_string()),
            Some(ChoiceValue::Spacing { rule }) => Some(rule.label()),
            _ => None,
        };
        Self {
            id: id.into(),
            label: label.into(),
            recommended,
            value,
            value_preview,
        }
    }
}

/// A detected underspecification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbiguityFlag {
    /// Kind.
    pub kind: AmbiguityKind,
    /// Human description.
    pub description: String,
    /// Clause the ambiguity came from, if any.
    pub source_clause: String,
    /// Layer the answer applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
    /// Offered answers in rank order.
    pub choices: Vec<ClarificationChoice>,
}

/// Parsed, possibly ambiguous representation of an instruction.
///
/// Values are never mutated in place: assembling, solving and clarifying each return a new
/// intent. Confidence is only computed by those stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignIntent {
    original_text: String,
    layers: Vec<DesignLayer>,
    ambiguities: Vec<AmbiguityFlag>,
    confidence: f64,
    created_at: DateTime<Utc>,
}

impl DesignIntent {
    pub(crate) fn from_parts(
        original_text: String,
        layers: Vec<DesignLayer>,
        ambiguities: Vec<AmbiguityFlag>,
        confidence: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            original_text,
            layers,
            ambiguities,
            confidence: confidence.clamp(0.0, 1.0),
            created_at,
        }
    }

    /// Copy with new layers, ambiguities and confidence; text and timestamp carry over.
    pub(crate) fn derive(
        &self,
        layers: Vec<DesignLayer>,
        ambiguities: Vec<AmbiguityFlag>,
        confidence: f64,
    ) -> Self {
        Self::from_parts(
            self.original_text.clone(),
            layers,
            ambiguities,
            confidence,
            self.created_at,
        )
    }

    /// The instruction as typed.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Layers in clause order.
    pub fn layers(&self) -> &[DesignLayer] {
        &self.layers
    }

    /// Outstanding ambiguities.
    pub fn ambiguities(&self) -> &[AmbiguityFlag] {
        &self.ambiguities
    }

    /// Confidence in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// When the intent was first parsed.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up a layer by id.
    pub fn layer(&self, id: &str) -> Option<&DesignLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// `true` once no ambiguities remain.
    pub fn is_resolved(&self) -> bool {
        self.ambiguities.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/intent.rs"]
mod tests;
