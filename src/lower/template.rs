use crate::foundation::color::Rgbw;
use crate::lower::merge::merge_groups;
use crate::model::group::LedColorGroup;
use crate::model::roofline::{RooflineConfiguration, Segment, SegmentType};
use serde::{Deserialize, Serialize};

/// Anchors plus evenly spaced pixels in every gap between consecutive anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPattern {
    pub anchor_color: Rgbw,
    pub spaced_color: Rgbw,
    /// Lit pixels per gap; zero means anchors only.
    pub spacing_count: u32,
    pub anchor_always_on: bool,
}

/// Directly specified per-segment patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PatternTemplate {
    /// [`ResolvedPattern`] on every segment.
    Spaced { pattern: ResolvedPattern },
    /// Whole segments, cycling through `colors` in chain order.
    ChaseBySegment { colors: Vec<Rgbw> },
    /// Whole segments, `first` on even chain positions and `second` on odd ones.
    AlternatingSegments { first: Rgbw, second: Rgbw },
    /// Corners in `accent`, every other segment in `base` when given.
    CornerAccent { accent: Rgbw, base: Option<Rgbw> },
    /// One color everywhere.
    Uniform { color: Rgbw },
    /// Anchor zones only.
    AnchorsOnly { color: Rgbw },
}

/// Lower a template to merged pixel groups for `config`.
#[tracing::instrument(skip_all, fields(segments = config.segments().len()))]
pub fn lower_template(
    template: &PatternTemplate,
    config: &RooflineConfiguration,
) -> Vec<LedColorGroup> {
    let mut out = Vec::new();
    let segments = config.segments().iter().filter(|s| s.pixel_count > 0);

    match template {
        PatternTemplate::Spaced { pattern } => {
            for seg in segments {
                emit_spaced(seg, pattern, &mut out);
            }
        }
        PatternTemplate::ChaseBySegment { colors } => {
            if !colors.is_empty() {
                for (i, seg) in segments.enumerate() {
                    out.push(fill(seg, colors[i % colors.len()]));
                }
            }
        }
        PatternTemplate::AlternatingSegments { first, second } => {
            for (i, seg) in segments.enumerate() {
                out.push(fill(seg, if i % 2 == 0 { *first } else { *second }));
            }
        }
        PatternTemplate::CornerAccent { accent, base } => {
            for seg in segments {
                if seg.segment_type == SegmentType::Corner {
                    out.push(fill(seg, *accent));
                } else if let Some(base) = base {
                    out.push(fill(seg, *base));
                }
            }
        }
        PatternTemplate::Uniform { color } => {
            let total = config.total_pixel_count();
            if total > 0 {
                out.push(LedColorGroup::new(0, total - 1, *color));
            }
        }
        PatternTemplate::AnchorsOnly { color } => {
            let pattern = ResolvedPattern {
                anchor_color: *color,
                spaced_color: *color,
                spacing_count: 0,
                anchor_always_on: true,
            };
            for seg in segments {
                emit_spaced(seg, &pattern, &mut out);
            }
        }
    }

    merge_groups(out)
}

fn fill(seg: &Segment, color: Rgbw) -> LedColorGroup {
    LedColorGroup::new(seg.start_pixel, seg.start_pixel + seg.pixel_count - 1, color)
}

/// Anchor groups, then spaced single pixels between consecutive anchors, for one segment.
pub(crate) fn emit_spaced(seg: &Segment, pattern: &ResolvedPattern, out: &mut Vec<LedColorGroup>) {
    if seg.pixel_count == 0 {
        return;
    }
    let anchors = seg.anchors();
    let width = seg.anchor_led_count.max(1);
    let last = seg.start_pixel + seg.pixel_count - 1;

    if pattern.anchor_always_on {
        for &a in &anchors {
            let start = seg.start_pixel + a;
            let end = start.saturating_add(width - 1).min(last);
            out.push(LedColorGroup::new(start, end, pattern.anchor_color));
        }
    }

    if pattern.spacing_count == 0 || anchors.len() < 2 {
        return;
    }
    for pair in anchors.windows(2) {
        let gap_start = pair[0].saturating_add(width);
        let gap_end = pair[1];
        if gap_start >= gap_end {
            continue;
        }
        let gap = gap_end - gap_start;
        if pattern.spacing_count >= gap {
            // More lit pixels than the gap holds fills it.
            for pos in gap_start..gap_end {
                if !seg.in_anchor_zone(pos) {
                    out.push(LedColorGroup::pixel(seg.start_pixel + pos, pattern.spaced_color));
                }
            }
            continue;
        }
        let interval = f64::from(gap) / f64::from(pattern.spacing_count + 1);
        for j in 1..=pattern.spacing_count {
            let pos = gap_start + (interval * f64::from(j)).round() as u32;
            if pos >= gap_end || seg.in_anchor_zone(pos) {
                continue;
            }
            out.push(LedColorGroup::pixel(seg.start_pixel + pos, pattern.spaced_color));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lower/template.rs"]
mod tests;
