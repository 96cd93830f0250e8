use crate::foundation::color::Rgbw;
use crate::foundation::opts::EngineOpts;
use crate::lower::intent::spacing_mask;
use crate::lower::merge::merge_groups;
use crate::model::group::LedColorGroup;
use crate::model::intent::{
    AmbiguityFlag, AmbiguityKind, ChoiceValue, ClarificationChoice, DesignIntent, SpacingRule,
    ZoneSelector,
};
use crate::model::roofline::RooflineConfiguration;
use serde::{Deserialize, Serialize};

/// Kind of question put to the user. Declaration order is presentation priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ClarificationKind {
    Zone,
    Color,
    Spacing,
    Direction,
    Effect,
    Conflict,
    Brightness,
    Speed,
    Confirmation,
    ManualFallback,
}

impl ClarificationKind {
    /// Question kind that renders an ambiguity of `kind`.
    pub fn for_ambiguity(kind: AmbiguityKind) -> Self {
        match kind {
            AmbiguityKind::Zone => Self::Zone,
            AmbiguityKind::Color => Self::Color,
            AmbiguityKind::Spacing | AmbiguityKind::SpacingImpossible => Self::Spacing,
            AmbiguityKind::Direction => Self::Direction,
            AmbiguityKind::Effect => Self::Effect,
            AmbiguityKind::ConflictResolution => Self::Conflict,
            AmbiguityKind::LowContrast => Self::Brightness,
        }
    }
}

/// Icon/category hint shown next to an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionHint {
    Zone,
    Color,
    Spacing,
    Direction,
    Motion,
    Layer,
    Blend,
    Keep,
    Manual,
}

impl OptionHint {
    fn for_value(value: Option<&ChoiceValue>, kind: ClarificationKind) -> Self {
        match value {
            Some(ChoiceValue::Zone { .. }) => Self::Zone,
            Some(ChoiceValue::Color { .. }) => Self::Color,
            Some(ChoiceValue::Spacing { .. }) => Self::Spacing,
            Some(ChoiceValue::Direction { .. }) => Self::Direction,
            Some(ChoiceValue::Motion { .. }) => Self::Motion,
            Some(ChoiceValue::PreferLayer { .. }) => Self::Layer,
            Some(ChoiceValue::Blend) => Self::Blend,
            Some(ChoiceValue::Keep) => Self::Keep,
            None if kind == ClarificationKind::Spacing => Self::Spacing,
            None => Self::Manual,
        }
    }
}

/// One answer the user can pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarificationOption {
    pub id: String,
    pub label: String,
    pub hint: OptionHint,
    pub recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ChoiceValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_preview: Option<String>,
    /// What the option would look like on the zone, for color and spacing options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Vec<LedColorGroup>>,
}

/// A multiple-choice rendering of one [`AmbiguityFlag`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarificationQuestion {
    /// `q-<index of the ambiguity>`.
    pub id: String,
    pub kind: ClarificationKind,
    pub prompt: String,
    /// Layer the answer applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
    /// Ranked options, at most `clarify.max_options`.
    pub options: Vec<ClarificationOption>,
}

impl ClarificationQuestion {
    /// Option by id.
    pub fn option(&self, id: &str) -> Option<&ClarificationOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// The recommended option, falling back to the first one.
    pub fn recommended(&self) -> Option<&ClarificationOption> {
        self.options
            .iter()
            .find(|o| o.recommended)
            .or_else(|| self.options.first())
    }
}

/// One question per outstanding ambiguity, sorted by [`ClarificationKind`] priority.
///
/// Previews are scaled to the layer's zone when `config` is known, otherwise to
/// `clarify.preview_pixel_count` pixels.
#[tracing::instrument(skip_all, fields(ambiguities = intent.ambiguities().len()))]
pub fn build_questions(
    intent: &DesignIntent,
    config: Option<&RooflineConfiguration>,
    opts: &EngineOpts,
) -> Vec<ClarificationQuestion> {
    let mut questions: Vec<ClarificationQuestion> = intent
        .ambiguities()
        .iter()
        .enumerate()
        .map(|(i, amb)| build_question(i, amb, intent, config, opts))
        .collect();
    questions.sort_by_key(|q| q.kind);
    questions
}

fn build_question(
    index: usize,
    amb: &AmbiguityFlag,
    intent: &DesignIntent,
    config: Option<&RooflineConfiguration>,
    opts: &EngineOpts,
) -> ClarificationQuestion {
    let kind = ClarificationKind::for_ambiguity(amb.kind);
    let max = opts.clarify.max_options.max(1);
    let catch_all = catch_all_for(kind, &amb.choices);

    let room = if catch_all.is_some() { max - 1 } else { max };
    let mut choices: Vec<ClarificationChoice> = amb.choices.iter().take(room).cloned().collect();
    choices.extend(catch_all);

    let layer = amb.layer_id.as_deref().and_then(|id| intent.layer(id));
    let preview_len = match (config, layer) {
        (Some(cfg), Some(l)) => l.zone.pixel_count(cfg),
        (Some(cfg), None) => cfg.total_pixel_count(),
        _ => opts.clarify.preview_pixel_count,
    };
    let base_color = layer.map_or(Rgbw::WHITE, |l| l.colors.primary);

    let options = choices
        .into_iter()
        .map(|c| {
            let preview = match &c.value {
                Some(ChoiceValue::Color { color }) => color_preview(*color, preview_len),
                Some(ChoiceValue::Spacing { rule }) => {
                    spacing_preview(rule, base_color, preview_len)
                }
                _ => None,
            };
            ClarificationOption {
                hint: OptionHint::for_value(c.value.as_ref(), kind),
                id: c.id,
                label: c.label,
                recommended: c.recommended,
                value: c.value,
                value_preview: c.value_preview,
                preview,
            }
        })
        .collect();

    ClarificationQuestion {
        id: format!("q-{index}"),
        kind,
        prompt: amb.description.clone(),
        layer_id: amb.layer_id.clone(),
        options,
    }
}

/// The always-available answer for `kind`, unless the ambiguity already offers it.
fn catch_all_for(
    kind: ClarificationKind,
    choices: &[ClarificationChoice],
) -> Option<ClarificationChoice> {
    match kind {
        ClarificationKind::Zone => {
            let all = Some(ChoiceValue::Zone {
                zone: ZoneSelector::All,
            });
            (!choices.iter().any(|c| c.value == all))
                .then(|| ClarificationChoice::new("entire", "Entire installation", false, all))
        }
        ClarificationKind::Spacing => (!choices.iter().any(|c| c.id == "manual"))
            .then(|| ClarificationChoice::new("manual", "Set manually", false, None)),
        ClarificationKind::Conflict => {
            (!choices.iter().any(|c| c.value == Some(ChoiceValue::Blend))).then(|| {
                ClarificationChoice::new("blend", "Blend both", false, Some(ChoiceValue::Blend))
            })
        }
        _ => None,
    }
}

fn color_preview(color: Rgbw, len: u32) -> Option<Vec<LedColorGroup>> {
    (len > 0).then(|| vec![LedColorGroup::new(0, len - 1, color)])
}

fn spacing_preview(rule: &SpacingRule, color: Rgbw, len: u32) -> Option<Vec<LedColorGroup>> {
    if len == 0 {
        return None;
    }
    let lit = spacing_mask(rule, len)
        .into_iter()
        .zip(0u32..)
        .filter(|(on, _)| *on)
        .map(|(_, i)| LedColorGroup::pixel(i, color))
        .collect();
    Some(merge_groups(lit))
}

#[cfg(test)]
#[path = "../../tests/unit/clarify/questions.rs"]
mod tests;
