use crate::foundation::color::Rgbw;
use crate::lower::merge::merge_groups;
use crate::model::group::LedColorGroup;
use crate::model::intent::{DesignIntent, DesignLayer, PatternRule, SpacingRule};
use crate::model::roofline::RooflineConfiguration;

/// Paint every layer of `intent` onto `config` and return merged pixel groups.
///
/// Layers are painted in ascending priority, clause order breaking ties, so later layers win
/// where zones overlap. Pixels no layer paints come out black; the result covers every pixel
/// of the installation exactly once.
#[tracing::instrument(skip_all, fields(layers = intent.layers().len()))]
pub fn lower_intent(intent: &DesignIntent, config: &RooflineConfiguration) -> Vec<LedColorGroup> {
    let total = config.total_pixel_count();
    let mut buffer: Vec<Option<Rgbw>> = vec![None; total as usize];

    let mut order: Vec<&DesignLayer> = intent.layers().iter().collect();
    order.sort_by_key(|l| l.priority);
    for layer in order {
        paint_layer(layer, config, &mut buffer);
    }

    let mut runs: Vec<LedColorGroup> = Vec::new();
    for (pixel, color) in (0u32..).zip(buffer) {
        let color = color.unwrap_or(Rgbw::BLACK);
        match runs.last_mut() {
            Some(run) if run.color == color => run.end_led = pixel,
            _ => runs.push(LedColorGroup::pixel(pixel, color)),
        }
    }
    merge_groups(runs)
}

fn paint_layer(layer: &DesignLayer, config: &RooflineConfiguration, buffer: &mut [Option<Rgbw>]) {
    let pixels: Vec<u32> = layer
        .zone
        .resolve(config)
        .into_iter()
        .flatten()
        .collect();
    let len = u32::try_from(pixels.len()).unwrap_or(u32::MAX);
    if len == 0 {
        return;
    }

    let colors = &layer.colors;
    let rule = colors.spacing.unwrap_or(SpacingRule::Continuous);
    let mask = match rule {
        SpacingRule::AnchorsOnly => pixels.iter().map(|&p| in_anchor(config, p)).collect(),
        _ => spacing_mask(&rule, len),
    };
    let off_color = colors.fill.or(colors.secondary);

    for (i, (&p, lit)) in (0u32..).zip(pixels.iter().zip(mask)) {
        let Some(slot) = buffer.get_mut(p as usize) else {
            continue;
        };
        let color = if colors.accent.is_some() && in_anchor(config, p) {
            colors.accent
        } else if lit {
            Some(pattern_color(layer, i, len))
        } else {
            off_color
        };
        if let Some(c) = color {
            *slot = Some(c);
        }
    }
    tracing::debug!(layer = layer.id.as_str(), pixels = len, "painted layer");
}

fn pattern_color(layer: &DesignLayer, i: u32, len: u32) -> Rgbw {
    let c = &layer.colors;
    match layer.pattern {
        PatternRule::Gradient => {
            let end = c.secondary.unwrap_or(c.primary);
            let t = if len > 1 {
                f64::from(i) / f64::from(len - 1)
            } else {
                0.0
            };
            c.primary.lerp(end, t)
        }
        PatternRule::Alternating => {
            if i % 2 == 0 {
                c.primary
            } else {
                c.secondary.unwrap_or(Rgbw::BLACK)
            }
        }
        PatternRule::Solid | PatternRule::Twinkle | PatternRule::Wave => c.primary,
    }
}

fn in_anchor(config: &RooflineConfiguration, pixel: u32) -> bool {
    config
        .segment_at(pixel)
        .is_some_and(|s| s.in_anchor_zone(pixel - s.start_pixel))
}

/// Which of `len` zone pixels a spacing rule lights.
///
/// Without segment geometry, `AnchorsOnly` lights the two ends of the zone. Zero counts and
/// intervals light nothing.
pub(crate) fn spacing_mask(rule: &SpacingRule, len: u32) -> Vec<bool> {
    let n = len as usize;
    match *rule {
        SpacingRule::Pattern {
            on_count,
            off_count,
        } => {
            let cycle = u64::from(on_count) + u64::from(off_count);
            (0..len)
                .map(|i| cycle > 0 && u64::from(i) % cycle < u64::from(on_count))
                .collect()
        }
        SpacingRule::EquallySpaced { count } => {
            let mut mask = vec![false; n];
            match count {
                0 => {}
                1 => mask.iter_mut().take(1).for_each(|m| *m = true),
                c if c >= len => mask.iter_mut().for_each(|m| *m = true),
                c => {
                    let step = f64::from(len - 1) / f64::from(c - 1);
                    for k in 0..c {
                        let pos = (step * f64::from(k)).round() as usize;
                        if let Some(m) = mask.get_mut(pos) {
                            *m = true;
                        }
                    }
                }
            }
            mask
        }
        SpacingRule::EveryNth { interval } => {
            (0..len).map(|i| interval > 0 && i % interval == 0).collect()
        }
        SpacingRule::AnchorsOnly => (0..len).map(|i| i == 0 || i + 1 == len).collect(),
        SpacingRule::Continuous => vec![true; n],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lower/intent.rs"]
mod tests;
