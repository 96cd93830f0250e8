use super::*;
use std::collections::HashSet;

#[test]
fn catalog_covers_every_variant_with_unique_ids() {
    let mut ids = HashSet::new();
    for e in Effect::all() {
        assert!(ids.insert(e.id()), "duplicate id for {e:?}");
        assert_eq!(Effect::from_id(e.id()), Some(e));
    }
    assert_eq!(ids.len(), 9);
}

#[test]
fn well_known_ids() {
    assert_eq!(Effect::Solid.id(), 0);
    assert_eq!(Effect::Chase.id(), 28);
    assert_eq!(Effect::Twinkle.info().category, EffectCategory::Sparkle);
    assert_eq!(Effect::from_id(250), None);
}
