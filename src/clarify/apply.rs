use crate::clarify::questions::{ClarificationKind, ClarificationOption, ClarificationQuestion};
use crate::foundation::opts::EngineOpts;
use crate::model::intent::{
    ChoiceValue, DesignIntent, DesignLayer, MotionDirection, MotionSettings,
};
use crate::parse::lexicon::{SpacingMatch, color_by_name, find_colors, match_spacing, parse_on_off};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Answer per question id.
pub type Answers = BTreeMap<String, Answer>;

/// A value the user typed or built instead of picking a prepared one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnteredValue {
    Choice(ChoiceValue),
    /// Free text, read the way instructions are ("2 on, 2 off", "every 4th", "navy").
    Text(String),
}

/// The chosen option, optionally carrying an entered value.
///
/// On the wire a bare string is an option id; `{"option": .., "value": ..}` adds a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Pick(String),
    Entered { option: String, value: EnteredValue },
}

impl Answer {
    /// Option `option` with free text entered.
    pub fn text(option: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Entered {
            option: option.into(),
            value: EnteredValue::Text(text.into()),
        }
    }

    pub fn option_id(&self) -> &str {
        match self {
            Self::Pick(id) | Self::Entered { option: id, .. } => id,
        }
    }

    pub fn entered(&self) -> Option<&EnteredValue> {
        match self {
            Self::Pick(_) => None,
            Self::Entered { value, .. } => Some(value),
        }
    }
}

impl From<&str> for Answer {
    fn from(id: &str) -> Self {
        Self::Pick(id.to_owned())
    }
}

impl From<String> for Answer {
    fn from(id: String) -> Self {
        Self::Pick(id)
    }
}

/// Apply `answers` to `intent`, returning a new intent.
///
/// Each answered question removes every ambiguity with the same layer and a kind that renders
/// as that question, and raises confidence by `confidence.resolved_bonus` per removed ambiguity.
/// An entered value takes precedence over the option's own value. Unknown question or option
/// ids, and answers that end up with no usable value, are ignored.
#[tracing::instrument(skip_all, fields(questions = questions.len(), answers = answers.len()))]
pub fn apply_clarifications(
    intent: &DesignIntent,
    questions: &[ClarificationQuestion],
    answers: &Answers,
    opts: &EngineOpts,
) -> DesignIntent {
    let mut layers = intent.layers().to_vec();
    let mut resolved: HashSet<usize> = HashSet::new();

    for q in questions {
        let Some(answer) = answers.get(&q.id) else {
            continue;
        };
        let Some(option) = q.option(answer.option_id()) else {
            continue;
        };
        let Some(value) = choice_value(q, option, answer.entered()) else {
            tracing::debug!(question = q.id.as_str(), "answer carries no usable value");
            continue;
        };

        let matched: Vec<usize> = intent
            .ambiguities()
            .iter()
            .enumerate()
            .filter(|(_, a)| {
                a.layer_id == q.layer_id && ClarificationKind::for_ambiguity(a.kind) == q.kind
            })
            .map(|(i, _)| i)
            .collect();
        if matched.is_empty() {
            continue;
        }

        if let Some(layer_id) = q.layer_id.as_deref() {
            apply_value(&mut layers, layer_id, q, value);
        }
        tracing::debug!(
            question = q.id.as_str(),
            option = option.id.as_str(),
            removed = matched.len(),
            "applied answer"
        );
        resolved.extend(matched);
    }

    let ambiguities = intent
        .ambiguities()
        .iter()
        .enumerate()
        .filter(|(i, _)| !resolved.contains(i))
        .map(|(_, a)| a.clone())
        .collect();
    let confidence =
        intent.confidence() + opts.confidence.resolved_bonus * resolved.len() as f64;
    intent.derive(layers, ambiguities, confidence.min(1.0))
}

/// What an answer sets: the entered value, else the option's value, else a spacing rule
/// read from the option label.
fn choice_value(
    q: &ClarificationQuestion,
    option: &ClarificationOption,
    entered: Option<&EnteredValue>,
) -> Option<ChoiceValue> {
    match entered {
        Some(EnteredValue::Choice(v)) => Some(v.clone()),
        Some(EnteredValue::Text(text)) => read_entered_text(q.kind, text),
        None => match &option.value {
            Some(v) => Some(v.clone()),
            None if q.kind == ClarificationKind::Spacing => parse_on_off(&option.label)
                .map(|rule| ChoiceValue::Spacing { rule }),
            None => None,
        },
    }
}

fn read_entered_text(kind: ClarificationKind, text: &str) -> Option<ChoiceValue> {
    let text = text.trim().to_lowercase();
    match kind {
        ClarificationKind::Spacing => match match_spacing(&text)? {
            SpacingMatch::Rule(rule) => Some(ChoiceValue::Spacing { rule }),
            SpacingMatch::EquallySpacedWithoutCount => None,
        },
        ClarificationKind::Color | ClarificationKind::Brightness => color_by_name(&text)
            .or_else(|| find_colors(&text).first().map(|m| m.color))
            .map(|c| ChoiceValue::Color { color: c.color }),
        _ => None,
    }
}

fn apply_value(
    layers: &mut [DesignLayer],
    layer_id: &str,
    q: &ClarificationQuestion,
    value: ChoiceValue,
) {
    if let ChoiceValue::PreferLayer { layer_id: winner } = &value {
        prefer_layer(layers, winner, q);
        return;
    }

    let Some(layer) = layers.iter_mut().find(|l| l.id == layer_id) else {
        return;
    };
    match value {
        ChoiceValue::Zone { zone } => layer.zone = zone,
        ChoiceValue::Color { color } => layer.colors.primary = color,
        ChoiceValue::Spacing { rule } => layer.colors.spacing = Some(rule),
        ChoiceValue::Direction { direction } => {
            if let Some(m) = layer.motion.as_mut() {
                m.direction = direction;
                m.reverse = direction.is_reversed();
            }
        }
        ChoiceValue::Motion { motion_type } => match layer.motion.as_mut() {
            Some(m) => {
                m.motion_type = motion_type;
                m.effect = motion_type.effect();
            }
            None => {
                layer.motion = Some(MotionSettings::new(
                    motion_type,
                    MotionDirection::default(),
                ));
            }
        },
        ChoiceValue::Blend => layer.priority = layer.priority.saturating_add(1),
        ChoiceValue::PreferLayer { .. } | ChoiceValue::Keep => {}
    }
}

/// Raise `winner` above every other layer named by the question's options.
fn prefer_layer(layers: &mut [DesignLayer], winner: &str, q: &ClarificationQuestion) {
    let rivals: Vec<&str> = q
        .options
        .iter()
        .filter_map(|o| match &o.value {
            Some(ChoiceValue::PreferLayer { layer_id }) if layer_id != winner => {
                Some(layer_id.as_str())
            }
            _ => None,
        })
        .collect();
    let top = layers
        .iter()
        .filter(|l| rivals.contains(&l.id.as_str()))
        .map(|l| l.priority)
        .max();
    let Some(top) = top else {
        return;
    };
    if let Some(layer) = layers.iter_mut().find(|l| l.id == winner)
        && layer.priority <= top
    {
        layer.priority = top.saturating_add(1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clarify/apply.rs"]
mod tests;
