use crate::foundation::color::Rgbw;
use crate::foundation::opts::OutputOpts;
use crate::model::effect::Effect;
use crate::model::group::LedColorGroup;
use crate::model::intent::DesignIntent;
use serde::{Deserialize, Serialize};

/// Top-level controller state message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePayload {
    pub on: bool,
    pub bri: u8,
    pub seg: Vec<SegmentPayload>,
}

/// One controller segment.
///
/// `start` and `stop` are always written. A missing or short `stop` makes wraparound effects
/// loop before the last physical pixel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPayload {
    pub id: u32,
    pub start: u32,
    /// Exclusive end pixel.
    pub stop: u32,
    /// Flat `[index, r, g, b, index, r, g, b, ...]` individual-pixel array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i: Option<Vec<u32>>,
    /// Up to three segment colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<Vec<[u8; 3]>>,
    /// Effect index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<u8>,
    /// Effect speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sx: Option<u8>,
    /// Effect intensity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ix: Option<u8>,
    /// Run the effect reversed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<bool>,
}

impl SegmentPayload {
    fn bounds(stop: u32) -> Self {
        Self {
            id: 0,
            start: 0,
            stop,
            i: None,
            col: None,
            fx: None,
            sx: None,
            ix: None,
            rev: None,
        }
    }
}

/// Individual-pixel form.
///
/// `stop` is `total_pixels` when known, else one past the highest pixel in `groups`. Pixels at
/// or beyond a known `total_pixels` are dropped.
pub fn encode_pixels(
    groups: &[LedColorGroup],
    total_pixels: Option<u32>,
    opts: &OutputOpts,
) -> DevicePayload {
    let stop = total_pixels.unwrap_or_else(|| {
        groups
            .iter()
            .map(|g| g.end_led.saturating_add(1))
            .max()
            .unwrap_or(0)
    });

    let mut flat = Vec::with_capacity(groups.iter().map(|g| g.len() as usize * 4).sum());
    let mut dropped = 0u32;
    for group in groups {
        let [r, g, b] = group.color.to_rgb_array();
        for idx in group.leds() {
            if idx >= stop {
                dropped += 1;
                continue;
            }
            flat.extend([idx, u32::from(r), u32::from(g), u32::from(b)]);
        }
    }
    if dropped > 0 {
        tracing::warn!(dropped, stop, "pixels beyond the installation were dropped");
    }

    DevicePayload {
        on: true,
        bri: opts.brightness,
        seg: vec![SegmentPayload {
            i: Some(flat),
            ..SegmentPayload::bounds(stop)
        }],
    }
}

/// Colors and device-native effect for the segment form.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentEffect {
    /// At most three distinct colors, most important first.
    pub colors: Vec<Rgbw>,
    pub effect: Effect,
    pub speed: u8,
    pub intensity: u8,
    pub reverse: bool,
}

impl SegmentEffect {
    /// Summarize an intent: colors by descending layer priority (primaries before secondaries
    /// and accents), motion from the highest-priority animated layer, `Solid` otherwise.
    pub fn from_intent(intent: &DesignIntent) -> Self {
        let mut layers: Vec<_> = intent.layers().iter().collect();
        layers.sort_by_key(|l| std::cmp::Reverse(l.priority));

        let candidates = layers
            .iter()
            .map(|l| Some(l.colors.primary))
            .chain(
                layers
                    .iter()
                    .flat_map(|l| [l.colors.secondary, l.colors.accent]),
            )
            .flatten();
        let mut colors: Vec<Rgbw> = Vec::new();
        for c in candidates {
            if colors.len() == 3 {
                break;
            }
            if !colors.contains(&c) {
                colors.push(c);
            }
        }

        match layers.iter().find_map(|l| l.motion.as_ref()) {
            Some(m) => Self {
                colors,
                effect: m.effect,
                speed: m.speed,
                intensity: m.intensity,
                reverse: m.reverse,
            },
            None => Self {
                colors,
                effect: Effect::Solid,
                speed: 128,
                intensity: 128,
                reverse: false,
            },
        }
    }
}

/// Segment form over `[0, stop)`.
pub fn encode_segment(effect: &SegmentEffect, stop: u32, opts: &OutputOpts) -> DevicePayload {
    let col = effect
        .colors
        .iter()
        .take(3)
        .map(|c| c.to_rgb_array())
        .collect();
    DevicePayload {
        on: true,
        bri: opts.brightness,
        seg: vec![SegmentPayload {
            col: Some(col),
            fx: Some(effect.effect.id()),
            sx: Some(effect.speed),
            ix: Some(effect.intensity),
            rev: effect.reverse.then_some(true),
            ..SegmentPayload::bounds(stop)
        }],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/payload.rs"]
mod tests;
