use super::*;

#[test]
fn first_listed_entry_wins() {
    assert_eq!(
        first_match(MOTION_DIRECTIONS, "spin counterclockwise"),
        Some(MotionDirection::CounterClockwise)
    );
    assert_eq!(
        first_match(MOTION_DIRECTIONS, "spin clockwise"),
        Some(MotionDirection::Clockwise)
    );
    // Peak is listed before corner.
    assert_eq!(
        first_match(ROLES, "corners and peaks"),
        Some(ArchitecturalRole::Peak)
    );
    assert_eq!(first_match(ROLES, "nothing here"), None);
}

#[test]
fn matching_is_substring_containment() {
    assert_eq!(
        first_match(ROLES, "the gables"),
        Some(ArchitecturalRole::Peak)
    );
    assert_eq!(first_match(LOCATIONS, "storefront"), Some(Location::Front));
    assert_eq!(first_match(LOCATIONS, "dark blue background"), None);
}

#[test]
fn levels_from_table_and_numbers() {
    assert_eq!(match_level("upstairs windows"), Some(2));
    assert_eq!(match_level("level 4 eaves"), Some(4));
    assert_eq!(match_level("floor 3"), Some(3));
    assert_eq!(match_level("the eaves"), None);
}

#[test]
fn spacing_keywords() {
    assert_eq!(
        match_spacing("every other pixel"),
        Some(SpacingMatch::Rule(SpacingRule::Pattern {
            on_count: 1,
            off_count: 1
        }))
    );
    assert_eq!(
        match_spacing("two on one off"),
        Some(SpacingMatch::Rule(SpacingRule::Pattern {
            on_count: 2,
            off_count: 1
        }))
    );
    assert_eq!(
        match_spacing("anchors only"),
        Some(SpacingMatch::Rule(SpacingRule::AnchorsOnly))
    );
    assert_eq!(
        match_spacing("evenly spaced"),
        Some(SpacingMatch::EquallySpacedWithoutCount)
    );
    assert_eq!(
        match_spacing("7 evenly spaced lights"),
        Some(SpacingMatch::Rule(SpacingRule::EquallySpaced { count: 7 }))
    );
}

#[test]
fn spacing_numeric_captures() {
    assert_eq!(
        match_spacing("3 on 4 off"),
        Some(SpacingMatch::Rule(SpacingRule::Pattern {
            on_count: 3,
            off_count: 4
        }))
    );
    assert_eq!(
        match_spacing("every 5th pixel"),
        Some(SpacingMatch::Rule(SpacingRule::EveryNth { interval: 5 }))
    );
    assert_eq!(match_spacing("red peaks"), None);
    assert_eq!(
        parse_on_off("Stretch to 1 on, 3 off"),
        Some(SpacingRule::Pattern {
            on_count: 1,
            off_count: 3
        })
    );
}

#[test]
fn colors_come_back_in_reading_order() {
    let found = find_colors("red accents on corners, light green wave");
    let names: Vec<&str> = found.iter().map(|m| m.color.name).collect();
    assert_eq!(names, ["red", "light green"]);
    assert!(found.iter().all(|m| m.vague.is_none()));
}

#[test]
fn named_colors_mask_vague_words() {
    let found = find_colors("dark green base");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].color.name, "dark green");
    assert!(found[0].vague.is_none());
}

#[test]
fn vague_colors_offer_shades() {
    let found = find_colors("green eaves");
    assert_eq!(found.len(), 1);
    let (word, shades) = found[0].vague.clone().unwrap();
    assert_eq!(word, "green");
    let names: Vec<&str> = shades.iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        ["forest green", "dark green", "light green", "lime green"]
    );
    assert_eq!(found[0].color.name, "forest green");
}

#[test]
fn repeated_mentions_are_all_found() {
    let found = find_colors("white then red then white");
    let names: Vec<&str> = found.iter().map(|m| m.color.name).collect();
    assert_eq!(names, ["white", "red", "white"]);
}

#[test]
fn every_vague_shade_is_a_named_color() {
    for (shades, _) in VAGUE_COLORS {
        for s in *shades {
            assert!(color_by_name(s).is_some(), "{s} missing from color table");
        }
    }
}
