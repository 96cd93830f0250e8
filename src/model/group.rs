use crate::foundation::color::Rgbw;
use serde::{Deserialize, Serialize};

/// A contiguous run of pixels sharing one color.
///
/// Invariant: `start_led <= end_led < total pixel count` of the installation it was lowered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedColorGroup {
    /// First global pixel.
    pub start_led: u32,
    /// Last global pixel (inclusive).
    pub end_led: u32,
    /// Color of every pixel in the run.
    pub color: Rgbw,
}

impl LedColorGroup {
    /// Build a group over `[start_led, end_led]`, swapping reversed bounds.
    pub fn new(start_led: u32, end_led: u32, color: Rgbw) -> Self {
        Self {
            start_led: start_led.min(end_led),
            end_led: start_led.max(end_led),
            color,
        }
    }

    /// Single-pixel group.
    pub fn pixel(led: u32, color: Rgbw) -> Self {
        Self::new(led, led, color)
    }

    /// Number of pixels covered.
    pub fn len(&self) -> u32 {
        self.end_led.saturating_sub(self.start_led) + 1
    }

    /// Always `false`; a group covers at least one pixel.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the covered pixel indices.
    pub fn leds(&self) -> impl Iterator<Item = u32> {
        self.start_led..=self.end_led
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/group.rs"]
mod tests;
