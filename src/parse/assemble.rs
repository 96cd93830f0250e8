use crate::foundation::color::Rgbw;
use crate::foundation::opts::{ConfidenceOpts, EngineOpts};
use crate::model::intent::{
    AmbiguityFlag, AmbiguityKind, ChoiceValue, ClarificationChoice, ColorAssignment,
    DesignIntent, DesignLayer, MotionDirection, MotionSettings, MotionType, SpacingRule,
    ZoneSelector,
};
use crate::model::roofline::{Location, RooflineConfiguration};
use crate::parse::lexicon::{
    self, ACCENT_WORDS, BACKGROUND_WORDS, ColorMention, INTENSITIES, LOCATIONS, MOTION_DIRECTIONS,
    MOTION_TYPES, PATTERNS, ROLES, SPEEDS, SpacingMatch, VAGUE_ANIMATION_WORDS,
};
use crate::parse::normalize;
use chrono::{DateTime, Utc};

/// Parse `text` into a fresh [`DesignIntent`].
///
/// Never fails: anything the lexicon does not recognize falls back to the whole installation,
/// white and solid, and the confidence score reflects how much was guessed.
pub fn parse_intent(
    text: &str,
    config: Option<&RooflineConfiguration>,
    opts: &EngineOpts,
) -> DesignIntent {
    parse_intent_at(text, config, opts, Utc::now())
}

/// [`parse_intent`] with an explicit creation timestamp.
#[tracing::instrument(skip(text, config, opts), fields(chars = text.len()))]
pub fn parse_intent_at(
    text: &str,
    config: Option<&RooflineConfiguration>,
    opts: &EngineOpts,
    created_at: DateTime<Utc>,
) -> DesignIntent {
    let clauses = normalize::clauses(text);

    let mut layers = Vec::with_capacity(clauses.len());
    let mut ambiguities = Vec::new();
    let mut zone_defaults = 0usize;
    let mut color_defaults = 0usize;

    for (index, clause) in clauses.iter().enumerate() {
        let out = assemble_clause(index, clause, config, opts);
        tracing::debug!(
            clause = clause.as_str(),
            zone = ?out.layer.zone,
            pattern = ?out.layer.pattern,
            ambiguities = out.ambiguities.len(),
            "assembled layer"
        );
        zone_defaults += usize::from(out.zone_defaulted);
        color_defaults += usize::from(out.color_defaulted);
        ambiguities.extend(out.ambiguities);
        layers.push(out.layer);
    }

    ambiguities.extend(detect_conflicts(&layers));

    let confidence = score_confidence(
        layers.len(),
        ambiguities.len(),
        zone_defaults,
        color_defaults,
        &opts.confidence,
    );
    DesignIntent::from_parts(text.to_owned(), layers, ambiguities, confidence, created_at)
}

/// Confidence after assembly, clamped to `[0, 1]`; zero when nothing was parsed.
pub(crate) fn score_confidence(
    layer_count: usize,
    ambiguity_count: usize,
    zone_defaults: usize,
    color_defaults: usize,
    weights: &ConfidenceOpts,
) -> f64 {
    if layer_count == 0 {
        return 0.0;
    }
    let c = 1.0
        - weights.ambiguity_penalty * ambiguity_count as f64
        - weights.default_zone_penalty * zone_defaults as f64
        - weights.default_color_penalty * color_defaults as f64;
    c.clamp(0.0, 1.0)
}

struct ClauseOutcome {
    layer: DesignLayer,
    ambiguities: Vec<AmbiguityFlag>,
    zone_defaulted: bool,
    color_defaulted: bool,
}

fn assemble_clause(
    index: usize,
    clause: &str,
    config: Option<&RooflineConfiguration>,
    opts: &EngineOpts,
) -> ClauseOutcome {
    let layer_id = format!("layer-{index}");
    let mut ambiguities = Vec::new();
    let flag = |kind, description: String, choices| AmbiguityFlag {
        kind,
        description,
        source_clause: clause.to_owned(),
        layer_id: Some(layer_id.clone()),
        choices,
    };

    let (zone, zone_defaulted, zone_choices) = resolve_zone(clause, config, opts);
    if let Some((description, choices)) = zone_choices {
        ambiguities.push(flag(AmbiguityKind::Zone, description, choices));
    }

    let mentions = lexicon::find_colors(clause);
    let mut colors = resolve_colors(clause, &mentions);
    let color_defaulted = mentions.is_empty();
    for m in &mentions {
        if let Some((word, shades)) = &m.vague {
            let choices = shades
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    ClarificationChoice::new(
                        format!("shade-{i}"),
                        capitalize(s.name),
                        i == 0,
                        Some(ChoiceValue::Color { color: s.color }),
                    )
                })
                .collect();
            ambiguities.push(flag(
                AmbiguityKind::Color,
                format!("Which shade of {word}?"),
                choices,
            ));
        }
    }

    match lexicon::match_spacing(clause) {
        Some(SpacingMatch::Rule(rule)) => colors.spacing = Some(rule),
        Some(SpacingMatch::EquallySpacedWithoutCount) => {
            let choices = [5u32, 3, 10]
                .iter()
                .enumerate()
                .map(|(i, &count)| {
                    ClarificationChoice::new(
                        format!("count-{count}"),
                        format!("{count} evenly spaced lights"),
                        i == 0,
                        Some(ChoiceValue::Spacing {
                            rule: SpacingRule::EquallySpaced { count },
                        }),
                    )
                })
                .collect();
            ambiguities.push(flag(
                AmbiguityKind::Spacing,
                "How many evenly spaced lights?".to_owned(),
                choices,
            ));
        }
        None => {}
    }

    let motion = match lexicon::first_match(MOTION_TYPES, clause) {
        Some(motion_type) => {
            let direction = match lexicon::first_match(MOTION_DIRECTIONS, clause) {
                Some(d) => d,
                None => {
                    ambiguities.push(flag(
                        AmbiguityKind::Direction,
                        "Which way should the motion travel?".to_owned(),
                        direction_choices(),
                    ));
                    MotionDirection::LeftToRight
                }
            };
            let mut m = MotionSettings::new(motion_type, direction);
            if let Some(speed) = lexicon::first_match(SPEEDS, clause) {
                m.speed = speed;
            }
            if let Some(intensity) = lexicon::first_match(INTENSITIES, clause) {
                m.intensity = intensity;
            }
            Some(m)
        }
        None => {
            if lexicon::mentions(clause, VAGUE_ANIMATION_WORDS) {
                ambiguities.push(flag(
                    AmbiguityKind::Effect,
                    "Which animation did you have in mind?".to_owned(),
                    effect_choices(),
                ));
            }
            None
        }
    };

    let pattern = lexicon::first_match(PATTERNS, clause).unwrap_or_default();

    let layer = DesignLayer {
        id: layer_id.clone(),
        name: clause.to_owned(),
        zone,
        colors,
        pattern,
        motion,
        priority: u32::try_from(index).unwrap_or(u32::MAX),
    };

    ClauseOutcome {
        layer,
        ambiguities,
        zone_defaulted,
        color_defaulted,
    }
}

type ZoneChoices = Option<(String, Vec<ClarificationChoice>)>;

/// Zone for a clause: segment names, then roles, then locations, then levels, else all.
fn resolve_zone(
    clause: &str,
    config: Option<&RooflineConfiguration>,
    opts: &EngineOpts,
) -> (ZoneSelector, bool, ZoneChoices) {
    if let Some(cfg) = config {
        let ids: Vec<String> = cfg
            .segments()
            .iter()
            .filter(|s| {
                let name = s.name.trim().to_lowercase();
                !name.is_empty() && clause.contains(&name)
            })
            .map(|s| s.id.clone())
            .collect();
        if !ids.is_empty() {
            return (ZoneSelector::Segments { ids }, false, None);
        }
    }

    if let Some(role) = lexicon::first_match(ROLES, clause) {
        let zone = ZoneSelector::Architectural { roles: vec![role] };
        let choices = config.and_then(|cfg| {
            let matching = cfg.segments_for_role(role);
            if matching.len() <= opts.parse.max_role_segments {
                return None;
            }
            let mut choices = vec![ClarificationChoice::new(
                "all-matching",
                format!("All {} {}", matching.len(), role.plural()),
                true,
                Some(ChoiceValue::Zone { zone: zone.clone() }),
            )];
            let prominent: Vec<String> = matching
                .iter()
                .filter(|s| s.prominent)
                .map(|s| s.id.clone())
                .collect();
            if !prominent.is_empty() {
                choices.push(ClarificationChoice::new(
                    "prominent",
                    format!("Only the {} prominent {}", prominent.len(), role.plural()),
                    false,
                    Some(ChoiceValue::Zone {
                        zone: ZoneSelector::Segments { ids: prominent },
                    }),
                ));
            }
            let front: Vec<String> = matching
                .iter()
                .filter(|s| s.location == Some(Location::Front))
                .map(|s| s.id.clone())
                .collect();
            if !front.is_empty() {
                choices.push(ClarificationChoice::new(
                    "front",
                    format!("Only the front {}", role.plural()),
                    false,
                    Some(ChoiceValue::Zone {
                        zone: ZoneSelector::Segments { ids: front },
                    }),
                ));
            }
            choices.push(ClarificationChoice::new(
                "entire",
                "Entire installation",
                false,
                Some(ChoiceValue::Zone {
                    zone: ZoneSelector::All,
                }),
            ));
            Some((
                format!(
                    "{} segments are {}. Which ones did you mean?",
                    matching.len(),
                    role.plural()
                ),
                choices,
            ))
        });
        return (zone, false, choices);
    }

    if let Some(location) = lexicon::first_match(LOCATIONS, clause) {
        return (ZoneSelector::Location { location }, false, None);
    }
    if let Some(level) = lexicon::match_level(clause) {
        return (ZoneSelector::Level { level }, false, None);
    }
    (ZoneSelector::All, true, None)
}

/// Slot colors in reading order: primary, then secondary (accent when the clause says so),
/// then accent if still unset. A background word also makes the secondary the fill.
fn resolve_colors(clause: &str, mentions: &[ColorMention]) -> ColorAssignment {
    let mut colors = ColorAssignment::solid(
        mentions
            .first()
            .map(|m| m.color.color)
            .unwrap_or(Rgbw::WHITE),
    );
    if let Some(second) = mentions.get(1) {
        let color = second.color.color;
        if lexicon::mentions(clause, ACCENT_WORDS) {
            colors.accent = Some(color);
        } else {
            colors.secondary = Some(color);
            if lexicon::mentions(clause, BACKGROUND_WORDS) {
                colors.fill = Some(color);
            }
        }
    }
    if let Some(third) = mentions.get(2) {
        if colors.accent.is_none() {
            colors.accent = Some(third.color.color);
        }
    }
    colors
}

/// One conflict ambiguity per overlapping pair of layers whose primaries differ.
pub(crate) fn detect_conflicts(layers: &[DesignLayer]) -> Vec<AmbiguityFlag> {
    let mut out = Vec::new();
    for (i, a) in layers.iter().enumerate() {
        for b in &layers[i + 1..] {
            if !a.zone.overlaps(&b.zone) || a.colors.primary == b.colors.primary {
                continue;
            }
            out.push(AmbiguityFlag {
                kind: AmbiguityKind::ConflictResolution,
                description: format!(
                    "\"{}\" and \"{}\" light the same pixels in different colors",
                    a.name, b.name
                ),
                source_clause: format!("{} / {}", a.name, b.name),
                layer_id: Some(b.id.clone()),
                choices: vec![
                    ClarificationChoice::new(
                        format!("use-{}", a.id),
                        format!("Use \"{}\"", a.name),
                        false,
                        Some(ChoiceValue::PreferLayer {
                            layer_id: a.id.clone(),
                        }),
                    ),
                    ClarificationChoice::new(
                        format!("use-{}", b.id),
                        format!("Use \"{}\"", b.name),
                        true,
                        Some(ChoiceValue::PreferLayer {
                            layer_id: b.id.clone(),
                        }),
                    ),
                    ClarificationChoice::new(
                        "blend",
                        "Blend both",
                        false,
                        Some(ChoiceValue::Blend),
                    ),
                ],
            });
        }
    }
    out
}

fn direction_choices() -> Vec<ClarificationChoice> {
    [
        MotionDirection::LeftToRight,
        MotionDirection::RightToLeft,
        MotionDirection::Inward,
        MotionDirection::Outward,
    ]
    .iter()
    .enumerate()
    .map(|(i, &direction)| {
        ClarificationChoice::new(
            format!("{direction:?}").to_lowercase(),
            capitalize(direction.label()),
            i == 0,
            Some(ChoiceValue::Direction { direction }),
        )
    })
    .collect()
}

fn effect_choices() -> Vec<ClarificationChoice> {
    [
        MotionType::Chase,
        MotionType::Wave,
        MotionType::Twinkle,
        MotionType::Pulse,
    ]
    .iter()
    .enumerate()
    .map(|(i, &motion_type)| {
        let name = format!("{motion_type:?}");
        ClarificationChoice::new(
            name.to_lowercase(),
            name,
            i == 0,
            Some(ChoiceValue::Motion { motion_type }),
        )
    })
    .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/parse/assemble.rs"]
mod tests;
