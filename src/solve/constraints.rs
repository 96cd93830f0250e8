use crate::foundation::color::{Rgbw, normalized_contrast};
use crate::foundation::opts::{ConfidenceOpts, EngineOpts, SolverOpts};
use crate::model::intent::{
    AmbiguityFlag, AmbiguityKind, ChoiceValue, ClarificationChoice, DesignIntent, DesignLayer,
    ZoneSelector,
};
use crate::model::roofline::RooflineConfiguration;
use crate::solve::spacing::{SpacingAlternative, check_spacing};
use serde::Serialize;
use std::ops::Range;

/// Which rule a [`ConstraintResult`] checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    /// The layer's spacing rule against its zone's pixel count.
    Spacing,
    /// The layer's zone names things the installation has.
    ZoneExists,
    /// Two overlapping layers are distinguishable.
    Contrast,
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintResult {
    /// What was checked.
    pub kind: ConstraintKind,
    /// Layer the check belongs to (for contrast, the later layer of the pair).
    pub layer_id: String,
    /// Whether the constraint holds.
    pub satisfied: bool,
    /// Why it does not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Ranked spacing alternatives, if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<SpacingAlternative>,
}

impl ConstraintResult {
    fn pass(kind: ConstraintKind, layer_id: &str) -> Self {
        Self {
            kind,
            layer_id: layer_id.to_owned(),
            satisfied: true,
            reason: None,
            alternatives: Vec::new(),
        }
    }

    fn fail(kind: ConstraintKind, layer_id: &str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            layer_id: layer_id.to_owned(),
            satisfied: false,
            reason: Some(reason.into()),
            alternatives: Vec::new(),
        }
    }
}

/// Everything one solver pass found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    /// One entry per check, in layer order.
    pub results: Vec<ConstraintResult>,
    /// Ambiguities the checks uncovered.
    pub ambiguities: Vec<AmbiguityFlag>,
    /// `true` iff every result is satisfied.
    pub all_satisfied: bool,
}

impl SolveReport {
    /// Results that did not hold.
    pub fn failures(&self) -> impl Iterator<Item = &ConstraintResult> {
        self.results.iter().filter(|r| !r.satisfied)
    }

    /// New intent with this report's ambiguities appended.
    ///
    /// An ambiguity whose kind and layer already appear on the intent is skipped. Confidence
    /// drops by the ambiguity penalty for each one added.
    pub fn annotate(&self, intent: &DesignIntent, weights: &ConfidenceOpts) -> DesignIntent {
        let mut ambiguities = intent.ambiguities().to_vec();
        let mut added = 0usize;
        for a in &self.ambiguities {
            let seen = ambiguities
                .iter()
                .any(|b| b.kind == a.kind && b.layer_id == a.layer_id);
            if !seen {
                ambiguities.push(a.clone());
                added += 1;
            }
        }
        let confidence = intent.confidence() - weights.ambiguity_penalty * added as f64;
        intent.derive(intent.layers().to_vec(), ambiguities, confidence)
    }
}

/// Check every layer of `intent` against `config`.
#[tracing::instrument(skip_all, fields(layers = intent.layers().len()))]
pub fn solve(
    intent: &DesignIntent,
    config: &RooflineConfiguration,
    opts: &EngineOpts,
) -> SolveReport {
    let mut results = Vec::new();
    let mut ambiguities = Vec::new();

    for layer in intent.layers() {
        let zone_result = check_zone(layer, config);
        let zone_ok = zone_result.satisfied;
        results.push(zone_result);

        if zone_ok && let Some(rule) = layer.colors.spacing {
            let pixels = layer.zone.pixel_count(config);
            let check = check_spacing(&rule, pixels, &opts.solver);
            if check.satisfied {
                results.push(ConstraintResult::pass(ConstraintKind::Spacing, &layer.id));
            } else {
                let reason = check.reason.clone().unwrap_or_default();
                tracing::debug!(layer = layer.id.as_str(), %reason, "spacing does not fit");
                ambiguities.push(spacing_ambiguity(layer, &reason, &check.alternatives));
                results.push(ConstraintResult {
                    alternatives: check.alternatives,
                    ..ConstraintResult::fail(ConstraintKind::Spacing, &layer.id, reason)
                });
            }
        }
    }

    let layers = intent.layers();
    for (i, a) in layers.iter().enumerate() {
        for b in &layers[i + 1..] {
            // Same primary on both layers reads as one color, not a contrast problem.
            if a.colors.primary == b.colors.primary || !zones_intersect(a, b, config) {
                continue;
            }
            let contrast = normalized_contrast(a.colors.primary, b.colors.primary);
            if contrast >= opts.solver.min_contrast {
                results.push(ConstraintResult::pass(ConstraintKind::Contrast, &b.id));
                continue;
            }
            let reason = format!(
                "\"{}\" and \"{}\" overlap with contrast {contrast:.2}",
                a.name, b.name
            );
            let adjusted = adjust_for_contrast(a.colors.primary, b.colors.primary, &opts.solver);
            ambiguities.push(low_contrast_ambiguity(a, b, &reason, adjusted));
            results.push(ConstraintResult::fail(ConstraintKind::Contrast, &b.id, reason));
        }
    }

    let all_satisfied = results.iter().all(|r| r.satisfied);
    tracing::debug!(
        checks = results.len(),
        ambiguities = ambiguities.len(),
        all_satisfied,
        "solve finished"
    );
    SolveReport {
        results,
        ambiguities,
        all_satisfied,
    }
}

fn check_zone(layer: &DesignLayer, config: &RooflineConfiguration) -> ConstraintResult {
    let kind = ConstraintKind::ZoneExists;
    let total = config.total_pixel_count();
    match &layer.zone {
        ZoneSelector::Segments { ids } => {
            let missing: Vec<&str> = ids
                .iter()
                .filter(|id| config.segment(id).is_none())
                .map(String::as_str)
                .collect();
            if missing.is_empty() {
                ConstraintResult::pass(kind, &layer.id)
            } else {
                ConstraintResult::fail(
                    kind,
                    &layer.id,
                    format!("unknown segment(s): {}", missing.join(", ")),
                )
            }
        }
        ZoneSelector::Level { level } => {
            if config.has_level(*level) {
                ConstraintResult::pass(kind, &layer.id)
            } else {
                ConstraintResult::fail(kind, &layer.id, format!("no segment on level {level}"))
            }
        }
        ZoneSelector::Custom { ranges } => match ranges.iter().find(|r| r.end >= total) {
            None => ConstraintResult::pass(kind, &layer.id),
            Some(r) => ConstraintResult::fail(
                kind,
                &layer.id,
                format!(
                    "pixel range {}..={} runs past the last pixel ({})",
                    r.start,
                    r.end,
                    total.saturating_sub(1)
                ),
            ),
        },
        ZoneSelector::Architectural { .. } | ZoneSelector::Location { .. } => {
            if layer.zone.pixel_count(config) > 0 {
                ConstraintResult::pass(kind, &layer.id)
            } else {
                ConstraintResult::fail(
                    kind,
                    &layer.id,
                    format!("no segment matches {}", layer.zone.describe()),
                )
            }
        }
        ZoneSelector::All => ConstraintResult::pass(kind, &layer.id),
    }
}

fn zones_intersect(a: &DesignLayer, b: &DesignLayer, config: &RooflineConfiguration) -> bool {
    let ra = a.zone.resolve(config);
    let rb = b.zone.resolve(config);
    ra.iter().any(|x| rb.iter().any(|y| ranges_overlap(x, y)))
}

fn ranges_overlap(a: &Range<u32>, b: &Range<u32>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Move `later` towards white or black until it separates from `earlier`.
///
/// Tries the direction `later` already leans first in steps of a tenth. Falls back to whichever
/// extreme separates best when the threshold cannot be reached.
pub(crate) fn adjust_for_contrast(earlier: Rgbw, later: Rgbw, opts: &SolverOpts) -> Rgbw {
    let lighter = later.relative_luminance() >= earlier.relative_luminance();
    let (first, second) = if lighter {
        (Rgbw::WHITE, Rgbw::BLACK)
    } else {
        (Rgbw::BLACK, Rgbw::WHITE)
    };
    for target in [first, second] {
        for step in 1..=10 {
            let candidate = later.lerp(target, f64::from(step) / 10.0);
            if normalized_contrast(earlier, candidate) >= opts.min_contrast {
                return candidate;
            }
        }
    }
    if normalized_contrast(earlier, Rgbw::WHITE) >= normalized_contrast(earlier, Rgbw::BLACK) {
        Rgbw::WHITE
    } else {
        Rgbw::BLACK
    }
}

fn spacing_ambiguity(
    layer: &DesignLayer,
    reason: &str,
    alternatives: &[SpacingAlternative],
) -> AmbiguityFlag {
    AmbiguityFlag {
        kind: AmbiguityKind::SpacingImpossible,
        description: format!("Spacing on \"{}\" does not fit: {reason}", layer.name),
        source_clause: layer.name.clone(),
        layer_id: Some(layer.id.clone()),
        choices: alternatives
            .iter()
            .enumerate()
            .map(|(i, alt)| {
                ClarificationChoice::new(
                    format!("alt-{i}"),
                    alt.label.clone(),
                    i == 0,
                    Some(ChoiceValue::Spacing { rule: alt.rule }),
                )
            })
            .collect(),
    }
}

fn low_contrast_ambiguity(
    earlier: &DesignLayer,
    later: &DesignLayer,
    reason: &str,
    adjusted: Rgbw,
) -> AmbiguityFlag {
    AmbiguityFlag {
        kind: AmbiguityKind::LowContrast,
        description: format!("{reason}; they may be hard to tell apart"),
        source_clause: format!("{} / {}", earlier.name, later.name),
        layer_id: Some(later.id.clone()),
        choices: vec![
            ClarificationChoice::new("keep", "Keep as is", true, Some(ChoiceValue::Keep)),
            ClarificationChoice::new(
                "increase-contrast",
                "Increase brightness difference",
                false,
                Some(ChoiceValue::Color { color: adjusted }),
            ),
        ],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/solve/constraints.rs"]
mod tests;
