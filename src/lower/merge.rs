use crate::model::group::LedColorGroup;

/// Sort by start pixel and fold each group into its predecessor when they touch and share a
/// color. Idempotent: merging an already merged list returns it unchanged.
pub fn merge_groups(mut groups: Vec<LedColorGroup>) -> Vec<LedColorGroup> {
    groups.sort_by_key(|g| (g.start_led, g.end_led));
    let mut out: Vec<LedColorGroup> = Vec::with_capacity(groups.len());
    for g in groups {
        if let Some(prev) = out.last_mut()
            && prev.color == g.color
            && prev.end_led.checked_add(1) == Some(g.start_led)
        {
            prev.end_led = g.end_led;
            continue;
        }
        out.push(g);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/lower/merge.rs"]
mod tests;
