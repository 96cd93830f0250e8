//! Text cleanup and clause splitting.

/// Spelling variants folded before any matching.
const SPELLINGS: &[(&str, &str)] = &[
    ("colours", "colors"),
    ("colour", "color"),
    ("grey", "gray"),
    ("centre", "center"),
    ("anti-clockwise", "counterclockwise"),
    ("counter clockwise", "counterclockwise"),
];

const QUOTES: &[char] = &['"', '\'', '`', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}'];

/// Separators applied in this exact order; each pass re-splits the clauses of the previous one.
pub(crate) const CLAUSE_SEPARATORS: &[&str] = &[
    ", and ", " and ", ", with ", " with ", ", but ", " but ", ". ", "; ",
];

/// Lowercase, strip quotes, fold spellings and collapse whitespace.
pub(crate) fn normalize(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !QUOTES.contains(c))
        .collect();
    let mut s = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    for (from, to) in SPELLINGS {
        if s.contains(from) {
            s = s.replace(from, to);
        }
    }
    s
}

/// Cascading split of normalized text into independent clauses.
///
/// Known limitation: a color or place name containing a separator ("black and white") is split
/// like any other phrase.
pub(crate) fn split_clauses(normalized: &str) -> Vec<String> {
    let mut clauses = vec![normalized.to_owned()];
    for sep in CLAUSE_SEPARATORS {
        clauses = clauses
            .iter()
            .flat_map(|c| c.split(sep))
            .map(str::to_owned)
            .collect();
    }
    clauses
        .into_iter()
        .map(|c| c.trim_matches(is_clause_edge).to_owned())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Normalize then split.
pub(crate) fn clauses(text: &str) -> Vec<String> {
    split_clauses(&normalize(text))
}

fn is_clause_edge(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '.' | ',' | ';' | '!')
}

#[cfg(test)]
#[path = "../../tests/unit/parse/normalize.rs"]
mod tests;
