//! Ordered rule tables for the closed lighting vocabulary.
//!
//! Matching is plain substring containment against a normalized clause. Tables are slices of
//! pairs, scanned in listed order, and the first synonym hit decides the category. Entries that
//! are substrings of later entries ("counterclockwise" / "clockwise") rely on that order.

use crate::foundation::color::Rgbw;
use crate::model::intent::{MotionDirection, MotionType, PatternRule, SpacingRule};
use crate::model::roofline::{ArchitecturalRole, Location};
use regex::Regex;
use std::sync::LazyLock;

pub(crate) type Table<T> = &'static [(T, &'static [&'static str])];

/// First value whose synonym list has an entry contained in `text`.
pub(crate) fn first_match<T: Copy>(table: Table<T>, text: &str) -> Option<T> {
    table
        .iter()
        .find(|(_, synonyms)| synonyms.iter().any(|s| text.contains(s)))
        .map(|(v, _)| *v)
}

/// Whether any of `words` occurs in `text`.
pub(crate) fn mentions(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

pub(crate) const ROLES: Table<ArchitecturalRole> = &[
    (ArchitecturalRole::Peak, &["peaks", "peak", "gables", "gable", "apex"]),
    (ArchitecturalRole::Corner, &["corners", "corner"]),
    (ArchitecturalRole::Run, &["runs", "straight sections", "straightaways"]),
    (ArchitecturalRole::Column, &["columns", "column", "pillars", "pillar", "posts"]),
    (ArchitecturalRole::Eave, &["eaves", "eave"]),
    (ArchitecturalRole::Fascia, &["fascia"]),
    (ArchitecturalRole::Soffit, &["soffits", "soffit"]),
];

pub(crate) const LOCATIONS: Table<Location> = &[
    (Location::Front, &["front", "facade", "street side"]),
    (Location::Back, &["back side", "backyard", "rear", "on the back", "in back"]),
    (Location::Left, &["left side", "on the left"]),
    (Location::Right, &["right side", "on the right"]),
];

pub(crate) const LEVELS: Table<u32> = &[
    (1, &["first floor", "ground floor", "ground level", "downstairs"]),
    (2, &["second floor", "upstairs", "upper floor"]),
    (3, &["third floor", "top floor"]),
];

static LEVEL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:level|floor|story|storey)\s+(\d+)\b").expect("level regex is valid")
});

/// Floor named in `text`, by table first and then `level N` / `floor N`.
pub(crate) fn match_level(text: &str) -> Option<u32> {
    first_match(LEVELS, text).or_else(|| capture_u32(&LEVEL_NUMBER, text, 1))
}

/// Canonical spacing phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpacingKeyword {
    EveryOther,
    OneOnTwoOff,
    TwoOnOneOff,
    EquallySpaced,
    AnchorsOnly,
    Continuous,
}

pub(crate) const SPACING: Table<SpacingKeyword> = &[
    (
        SpacingKeyword::EveryOther,
        &["every other", "alternating pixels", "one on one off", "1 on 1 off"],
    ),
    (
        SpacingKeyword::OneOnTwoOff,
        &["one on two off", "one on, two off", "1 on 2 off", "1 on, 2 off"],
    ),
    (
        SpacingKeyword::TwoOnOneOff,
        &["two on one off", "two on, one off", "2 on 1 off", "2 on, 1 off"],
    ),
    (
        SpacingKeyword::EquallySpaced,
        &["equally spaced", "evenly spaced", "evenly distributed", "spread out"],
    ),
    (
        SpacingKeyword::AnchorsOnly,
        &["anchors only", "only anchors", "only the anchors", "anchor points only"],
    ),
    (SpacingKeyword::Continuous, &["continuous", "every pixel", "all pixels"]),
];

static ON_OFF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*on,?\s*(\d+)\s*off").expect("on/off regex is valid")
});
static EVERY_NTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"every\s+(\d+)(?:st|nd|rd|th)?\b").expect("every-nth regex is valid")
});
static SPACED_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s+(?:equally|evenly|lights|bulbs|pixels|dots|points)")
        .expect("count regex is valid")
});

/// Result of spacing recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpacingMatch {
    Rule(SpacingRule),
    /// Equal spacing was asked for without saying how many.
    EquallySpacedWithoutCount,
}

/// Spacing rule named in `text`: the keyword table first, then `N on M off`, then `every N`.
pub(crate) fn match_spacing(text: &str) -> Option<SpacingMatch> {
    if let Some(k) = first_match(SPACING, text) {
        let rule = match k {
            SpacingKeyword::EveryOther => SpacingRule::Pattern {
                on_count: 1,
                off_count: 1,
            },
            SpacingKeyword::OneOnTwoOff => SpacingRule::Pattern {
                on_count: 1,
                off_count: 2,
            },
            SpacingKeyword::TwoOnOneOff => SpacingRule::Pattern {
                on_count: 2,
                off_count: 1,
            },
            SpacingKeyword::EquallySpaced => {
                return Some(match capture_u32(&SPACED_COUNT, text, 1) {
                    Some(count) => SpacingMatch::Rule(SpacingRule::EquallySpaced { count }),
                    None => SpacingMatch::EquallySpacedWithoutCount,
                });
            }
            SpacingKeyword::AnchorsOnly => SpacingRule::AnchorsOnly,
            SpacingKeyword::Continuous => SpacingRule::Continuous,
        };
        return Some(SpacingMatch::Rule(rule));
    }

    if let Some(rule) = parse_on_off(text) {
        return Some(SpacingMatch::Rule(rule));
    }
    capture_u32(&EVERY_NTH, text, 1)
        .map(|interval| SpacingMatch::Rule(SpacingRule::EveryNth { interval }))
}

/// Pull `N on, M off` out of free text such as an option label.
pub(crate) fn parse_on_off(text: &str) -> Option<SpacingRule> {
    let caps = ON_OFF.captures(text)?;
    let on_count = caps.get(1)?.as_str().parse().ok()?;
    let off_count = caps.get(2)?.as_str().parse().ok()?;
    Some(SpacingRule::Pattern {
        on_count,
        off_count,
    })
}

fn capture_u32(re: &Regex, text: &str, group: usize) -> Option<u32> {
    re.captures(text)?.get(group)?.as_str().parse().ok()
}

pub(crate) const PATTERNS: Table<PatternRule> = &[
    (PatternRule::Gradient, &["gradient", "fading from", "fade from", "ombre", "blend"]),
    (PatternRule::Alternating, &["alternating", "alternate"]),
    (PatternRule::Twinkle, &["twinkle", "twinkling", "sparkle", "sparkling"]),
    (PatternRule::Wave, &["waves", "wave", "ripple"]),
];

pub(crate) const MOTION_TYPES: Table<MotionType> = &[
    (MotionType::Chase, &["chase", "chasing", "running lights", "marquee"]),
    (MotionType::Wave, &["wave", "ripple", "flowing", "flow"]),
    (MotionType::Twinkle, &["twinkle", "twinkling", "sparkle", "shimmer", "glitter"]),
    (MotionType::Pulse, &["pulse", "pulsing", "breathe", "breathing", "throb"]),
    (MotionType::Scan, &["scanner", "scan", "sweeping", "sweep"]),
];

pub(crate) const MOTION_DIRECTIONS: Table<MotionDirection> = &[
    (
        MotionDirection::CounterClockwise,
        &["counterclockwise", "counter-clockwise", "anticlockwise"],
    ),
    (MotionDirection::Clockwise, &["clockwise"]),
    (MotionDirection::RightToLeft, &["right to left", "leftward", "towards the left"]),
    (MotionDirection::LeftToRight, &["left to right", "rightward", "towards the right"]),
    (
        MotionDirection::Inward,
        &["inward", "toward the center", "towards the center", "to the center"],
    ),
    (MotionDirection::Outward, &["outward", "from the center", "out from the middle"]),
    (MotionDirection::Upward, &["upward", "bottom to top", "going up", "rising"]),
    (MotionDirection::Downward, &["downward", "top to bottom", "going down", "falling"]),
];

pub(crate) const SPEEDS: Table<u8> = &[
    (64, &["slowly", "slow", "gentle", "lazy"]),
    (200, &["fast", "quick", "rapid"]),
];

pub(crate) const INTENSITIES: Table<u8> = &[
    (64, &["subtle", "soft"]),
    (220, &["intense", "bold", "vivid"]),
];

pub(crate) const ACCENT_WORDS: &[&str] = &["accent", "highlight"];
pub(crate) const BACKGROUND_WORDS: &[&str] = &["background", "backdrop"];
pub(crate) const VAGUE_ANIMATION_WORDS: &[&str] =
    &["animated", "animation", "moving", "dynamic", "effect"];

/// A concrete, named color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NamedColor {
    pub(crate) name: &'static str,
    pub(crate) color: Rgbw,
}

const fn named(name: &'static str, r: u8, g: u8, b: u8) -> NamedColor {
    NamedColor {
        name,
        color: Rgbw::rgb(r, g, b),
    }
}

/// Named colors. Longer names precede names they contain.
pub(crate) const COLORS: Table<NamedColor> = &[
    (named("warm white", 255, 180, 107), &["warm white", "soft white", "incandescent"]),
    (named("cool white", 200, 220, 255), &["cool white", "daylight", "bright white"]),
    (named("white", 255, 255, 255), &["white"]),
    (named("dark green", 0, 100, 0), &["dark green", "deep green", "hunter green"]),
    (named("light green", 144, 238, 144), &["light green", "pale green", "mint green", "mint"]),
    (named("forest green", 34, 139, 34), &["forest green", "pine green"]),
    (named("lime green", 50, 205, 50), &["lime green", "lime"]),
    (named("emerald", 0, 201, 87), &["emerald"]),
    (named("navy blue", 0, 0, 128), &["navy blue", "navy", "dark blue"]),
    (named("sky blue", 135, 206, 235), &["sky blue", "light blue", "baby blue"]),
    (named("royal blue", 65, 105, 225), &["royal blue", "cobalt"]),
    (named("teal", 0, 128, 128), &["teal"]),
    (named("turquoise", 64, 224, 208), &["turquoise", "aqua"]),
    (named("cyan", 0, 255, 255), &["cyan"]),
    (named("dark red", 139, 0, 0), &["dark red", "deep red", "burgundy", "maroon"]),
    (named("crimson", 220, 20, 60), &["crimson"]),
    (named("red", 255, 0, 0), &["red", "scarlet"]),
    (named("orange", 255, 140, 0), &["orange", "tangerine"]),
    (named("amber", 255, 191, 0), &["amber"]),
    (named("gold", 255, 215, 0), &["golden", "gold"]),
    (named("lemon yellow", 255, 247, 0), &["lemon yellow", "lemon"]),
    (named("pale yellow", 255, 255, 153), &["pale yellow", "cream"]),
    (named("magenta", 255, 0, 255), &["magenta", "fuchsia"]),
    (named("hot pink", 255, 105, 180), &["hot pink"]),
    (named("light pink", 255, 182, 193), &["light pink", "blush", "pastel pink"]),
    (named("lavender", 181, 126, 220), &["lavender", "lilac"]),
    (named("deep purple", 75, 0, 130), &["deep purple", "dark purple", "plum"]),
    (named("violet", 143, 0, 255), &["violet", "indigo"]),
    (named("black", 0, 0, 0), &["black"]),
];

/// Words that name a hue family but not a shade; each lists the shades to ask about.
pub(crate) const VAGUE_COLORS: Table<&'static [&'static str]> = &[
    (
        &["forest green", "dark green", "light green", "lime green"],
        &["green"],
    ),
    (&["royal blue", "navy blue", "sky blue", "teal"], &["blue"]),
    (&["violet", "deep purple", "lavender"], &["purple"]),
    (&["hot pink", "light pink", "magenta"], &["pink"]),
    (&["gold", "lemon yellow", "pale yellow", "amber"], &["yellow"]),
];

/// Concrete color by canonical name.
pub(crate) fn color_by_name(name: &str) -> Option<NamedColor> {
    COLORS.iter().map(|(c, _)| *c).find(|c| c.name == name)
}

/// One color mention inside a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColorMention {
    /// Byte offset of the mention.
    pub(crate) position: usize,
    /// The color (for vague words, the first listed shade).
    pub(crate) color: NamedColor,
    /// The vague word and its candidate shades, if the mention was vague.
    pub(crate) vague: Option<(&'static str, Vec<NamedColor>)>,
}

/// Every color mentioned in `text`, in reading order.
///
/// The named table is scanned first; each hit is masked out so that "green" inside
/// "dark green" is not seen again by the vague table.
pub(crate) fn find_colors(text: &str) -> Vec<ColorMention> {
    let mut masked = text.to_owned();
    let mut out = Vec::new();

    for (color, synonyms) in COLORS {
        for syn in *synonyms {
            while let Some(pos) = masked.find(syn) {
                masked.replace_range(pos..pos + syn.len(), &"#".repeat(syn.len()));
                out.push(ColorMention {
                    position: pos,
                    color: *color,
                    vague: None,
                });
            }
        }
    }

    for (shades, words) in VAGUE_COLORS {
        for word in *words {
            while let Some(pos) = masked.find(word) {
                masked.replace_range(pos..pos + word.len(), &"#".repeat(word.len()));
                let candidates: Vec<NamedColor> =
                    shades.iter().filter_map(|s| color_by_name(s)).collect();
                let Some(first) = candidates.first().copied() else {
                    continue;
                };
                out.push(ColorMention {
                    position: pos,
                    color: first,
                    vague: Some((*word, candidates)),
                });
            }
        }
    }

    out.sort_by_key(|m| m.position);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/parse/lexicon.rs"]
mod tests;
