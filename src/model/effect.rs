use serde::{Deserialize, Serialize};

/// Device-native effects lumina can request.
///
/// Numeric ids are the controller's effect indices and only ever come from [`Effect::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Effect {
    /// Static color.
    Solid,
    /// Slow brightness breathing.
    Breathe,
    /// Color wipe along the strip.
    Wipe,
    /// Single bright dot bouncing back and forth.
    Scan,
    /// Moving blocks of color.
    Running,
    /// Random pixels fading in and out.
    Twinkle,
    /// Sparkles over the base color.
    Sparkle,
    /// Color chase.
    Chase,
    /// Smooth traveling color waves.
    Colorwaves,
}

/// Broad grouping shown next to effects in pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectCategory {
    /// No animation.
    Static,
    /// Something travels along the strip.
    Motion,
    /// Brightness changes in place.
    Ambient,
    /// Random per-pixel activity.
    Sparkle,
}

/// One catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectInfo {
    /// Controller effect index (`fx`).
    pub id: u8,
    /// Display name.
    pub name: &'static str,
    /// Grouping.
    pub category: EffectCategory,
}

const fn row(id: u8, name: &'static str, category: EffectCategory) -> EffectInfo {
    EffectInfo { id, name, category }
}

const CATALOG: &[(Effect, EffectInfo)] = &[
    (Effect::Solid, row(0, "Solid", EffectCategory::Static)),
    (Effect::Breathe, row(2, "Breathe", EffectCategory::Ambient)),
    (Effect::Wipe, row(3, "Wipe", EffectCategory::Motion)),
    (Effect::Scan, row(10, "Scan", EffectCategory::Motion)),
    (Effect::Running, row(15, "Running", EffectCategory::Motion)),
    (Effect::Twinkle, row(17, "Twinkle", EffectCategory::Sparkle)),
    (Effect::Sparkle, row(20, "Sparkle", EffectCategory::Sparkle)),
    (Effect::Chase, row(28, "Chase", EffectCategory::Motion)),
    (Effect::Colorwaves, row(67, "Colorwaves", EffectCategory::Motion)),
];

impl Effect {
    /// Catalog entry for this effect.
    pub fn info(self) -> EffectInfo {
        CATALOG
            .iter()
            .find(|(e, _)| *e == self)
            .map(|(_, info)| *info)
            .unwrap_or(row(0, "Solid", EffectCategory::Static))
    }

    /// Controller effect index.
    pub fn id(self) -> u8 {
        self.info().id
    }

    /// Reverse lookup from a controller effect index.
    pub fn from_id(id: u8) -> Option<Self> {
        CATALOG.iter().find(|(_, i)| i.id == id).map(|(e, _)| *e)
    }

    /// Every cataloged effect in catalog order.
    pub fn all() -> impl Iterator<Item = Effect> {
        CATALOG.iter().map(|(e, _)| *e)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/effect.rs"]
mod tests;
