use super::*;
use crate::foundation::color::Rgbw;

const RED: Rgbw = Rgbw::rgb(255, 0, 0);
const BLUE: Rgbw = Rgbw::rgb(0, 0, 255);

#[test]
fn touching_same_color_groups_merge() {
    let merged = merge_groups(vec![
        LedColorGroup::pixel(2, RED),
        LedColorGroup::new(0, 1, RED),
        LedColorGroup::new(3, 5, RED),
    ]);
    assert_eq!(merged, [LedColorGroup::new(0, 5, RED)]);
}

#[test]
fn gaps_and_color_changes_stay_split() {
    let merged = merge_groups(vec![
        LedColorGroup::new(0, 1, RED),
        LedColorGroup::new(2, 3, BLUE),
        LedColorGroup::new(5, 6, BLUE),
    ]);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[1], LedColorGroup::new(2, 3, BLUE));
}

#[test]
fn empty_input_is_empty() {
    assert!(merge_groups(Vec::new()).is_empty());
}

#[test]
fn merging_twice_changes_nothing() {
    let inputs = vec![
        vec![
            LedColorGroup::pixel(7, RED),
            LedColorGroup::pixel(6, RED),
            LedColorGroup::new(0, 5, BLUE),
            LedColorGroup::pixel(9, RED),
        ],
        vec![
            LedColorGroup::new(0, 0, RED),
            LedColorGroup::new(0, 3, BLUE),
            LedColorGroup::new(1, 2, RED),
            LedColorGroup::new(4, 4, BLUE),
        ],
        (0..20)
            .map(|i| LedColorGroup::pixel(i, if i % 3 == 0 { RED } else { BLUE }))
            .collect(),
    ];
    for x in inputs {
        let once = merge_groups(x);
        assert_eq!(merge_groups(once.clone()), once);
    }
}
