use crate::foundation::opts::SolverOpts;
use crate::model::intent::SpacingRule;
use serde::Serialize;

/// A nearby spacing rule that fits the zone better, ranked by `deviation` (lower is closer).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingAlternative {
    /// Proposed rule.
    pub rule: SpacingRule,
    /// User-facing label.
    pub label: String,
    /// Relative distance from the requested rule.
    pub deviation: f64,
}

impl SpacingAlternative {
    fn new(rule: SpacingRule, label: impl Into<String>, deviation: f64) -> Self {
        Self {
            rule,
            label: label.into(),
            deviation,
        }
    }
}

/// Outcome of validating one spacing rule against a zone's pixel count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingCheck {
    /// Whether the rule fits as requested.
    pub satisfied: bool,
    /// Why it does not fit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// `true` when the rule itself is malformed (zero count or interval).
    pub invalid_parameter: bool,
    /// Ranked alternatives, at most `max_alternatives`.
    pub alternatives: Vec<SpacingAlternative>,
}

impl SpacingCheck {
    fn ok() -> Self {
        Self {
            satisfied: true,
            reason: None,
            invalid_parameter: false,
            alternatives: Vec::new(),
        }
    }

    fn invalid(reason: impl Into<String>) -> Self {
        Self {
            satisfied: false,
            reason: Some(reason.into()),
            invalid_parameter: true,
            alternatives: Vec::new(),
        }
    }

    fn unsatisfied(
        reason: impl Into<String>,
        mut alternatives: Vec<SpacingAlternative>,
        max: usize,
    ) -> Self {
        alternatives.sort_by(|a, b| a.deviation.total_cmp(&b.deviation));
        alternatives.truncate(max);
        Self {
            satisfied: false,
            reason: Some(reason.into()),
            invalid_parameter: false,
            alternatives,
        }
    }
}

/// Validate `rule` for a zone of `pixel_count` pixels.
pub fn check_spacing(rule: &SpacingRule, pixel_count: u32, opts: &SolverOpts) -> SpacingCheck {
    match *rule {
        SpacingRule::Pattern {
            on_count,
            off_count,
        } => check_pattern(on_count, off_count, pixel_count, opts),
        SpacingRule::EquallySpaced { count } => check_equally_spaced(count, pixel_count, opts),
        SpacingRule::EveryNth { interval } => check_every_nth(interval, pixel_count, opts),
        SpacingRule::AnchorsOnly | SpacingRule::Continuous => SpacingCheck::ok(),
    }
}

/// `on` lit, `off` dark, repeating. Fits iff the leftover partial cycle is no longer than `on`.
pub fn check_pattern(on: u32, off: u32, pixel_count: u32, opts: &SolverOpts) -> SpacingCheck {
    if on == 0 {
        return SpacingCheck::invalid("pattern needs at least one lit pixel per cycle");
    }
    // Counts come straight from text; the sum can exceed u32. Quotient and remainder are both
    // bounded by `pixel_count`.
    let cycle = u64::from(on) + u64::from(off);
    let pixels = u64::from(pixel_count);
    let remainder = (pixels % cycle) as u32;
    if remainder <= on {
        return SpacingCheck::ok();
    }

    let full_cycles = (pixels / cycle) as u32;
    let mut alternatives = Vec::new();
    let deviation = |new_off: u32| f64::from(new_off.abs_diff(off)) / f64::from(off.max(1));

    if full_cycles > 0 {
        let stretched = pixel_count.div_ceil(full_cycles).saturating_sub(on);
        if stretched >= 1 && stretched != off {
            let rule = SpacingRule::Pattern {
                on_count: on,
                off_count: stretched,
            };
            alternatives.push(SpacingAlternative::new(
                rule,
                format!("Stretch to {}", rule.label()),
                deviation(stretched),
            ));
        }
    }

    let compressed = (pixel_count / full_cycles.saturating_add(1)).saturating_sub(on);
    if compressed >= 1 && compressed != off {
        let rule = SpacingRule::Pattern {
            on_count: on,
            off_count: compressed,
        };
        alternatives.push(SpacingAlternative::new(
            rule,
            format!("Compress to {}", rule.label()),
            deviation(compressed),
        ));
    }

    let original = SpacingRule::Pattern {
        on_count: on,
        off_count: off,
    };
    alternatives.push(SpacingAlternative::new(
        original,
        format!("Keep {} ({remainder} pixels left over)", original.label()),
        f64::from(remainder - on) / cycle as f64,
    ));

    SpacingCheck::unsatisfied(
        format!(
            "{} leaves {remainder} pixels over on {pixel_count} pixels",
            original.label()
        ),
        alternatives,
        opts.max_alternatives,
    )
}

/// `count` lit pixels spread evenly. Fits iff `pixel_count / (count - 1)` is (nearly) an integer.
pub fn check_equally_spaced(count: u32, pixel_count: u32, opts: &SolverOpts) -> SpacingCheck {
    if count == 0 {
        return SpacingCheck::invalid("equal spacing needs a positive count");
    }
    if count == 1 {
        return SpacingCheck::ok();
    }
    if count > pixel_count {
        let mut alternatives = Vec::new();
        if pixel_count > 0 {
            alternatives.push(SpacingAlternative::new(
                SpacingRule::Continuous,
                format!("Use all {pixel_count} pixels"),
                0.0,
            ));
        }
        let half = pixel_count / 2;
        if half > 0 {
            alternatives.push(SpacingAlternative::new(
                SpacingRule::EquallySpaced { count: half },
                format!("Use half ({half} pixels)"),
                f64::from(count - half) / f64::from(count),
            ));
        }
        return SpacingCheck::unsatisfied(
            format!("{count} lights do not fit on {pixel_count} pixels"),
            alternatives,
            opts.max_alternatives,
        );
    }
    if is_even_fit(count, pixel_count, opts) {
        return SpacingCheck::ok();
    }

    let r = opts.equal_spacing_radius;
    let alternatives = (count.saturating_sub(r)..=count.saturating_add(r))
        .filter(|&c| c >= 2 && c != count && c <= pixel_count)
        .filter(|&c| is_even_fit(c, pixel_count, opts))
        .map(|c| {
            let spacing = f64::from(pixel_count) / f64::from(c - 1);
            SpacingAlternative::new(
                SpacingRule::EquallySpaced { count: c },
                format!("{c} lights, {spacing:.0} apart"),
                f64::from(c.abs_diff(count)) / f64::from(count),
            )
        })
        .collect();

    let spacing = f64::from(pixel_count) / f64::from(count - 1);
    SpacingCheck::unsatisfied(
        format!("{count} lights on {pixel_count} pixels would be {spacing:.2} apart"),
        alternatives,
        opts.max_alternatives,
    )
}

fn is_even_fit(count: u32, pixel_count: u32, opts: &SolverOpts) -> bool {
    let spacing = f64::from(pixel_count) / f64::from(count - 1);
    (spacing - spacing.round()).abs() <= opts.integer_tolerance
}

/// Every `interval`-th pixel. Fits iff the remainder is at most half an interval.
pub fn check_every_nth(interval: u32, pixel_count: u32, opts: &SolverOpts) -> SpacingCheck {
    if interval == 0 {
        return SpacingCheck::invalid("interval must be positive");
    }
    let remainder = pixel_count % interval;
    if remainder <= interval / 2 {
        return SpacingCheck::ok();
    }

    let r = opts.every_nth_radius;
    let alternatives = (interval.saturating_sub(r)..=interval.saturating_add(r))
        .filter(|&n| n >= 1 && n != interval)
        .filter(|&n| pixel_count % n < remainder)
        .map(|n| {
            SpacingAlternative::new(
                SpacingRule::EveryNth { interval: n },
                format!("Every {n} pixels ({} left over)", pixel_count % n),
                f64::from(n.abs_diff(interval)) / f64::from(interval),
            )
        })
        .collect();

    SpacingCheck::unsatisfied(
        format!("every {interval} leaves {remainder} pixels over on {pixel_count} pixels"),
        alternatives,
        opts.max_alternatives,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/solve/spacing.rs"]
mod tests;
