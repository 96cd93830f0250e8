use super::*;
use crate::model::roofline::{Segment, SegmentType};
use serde_json::json;

fn cfg() -> RooflineConfiguration {
    let mut front = Segment::new("front", "Front", 40, SegmentType::Run);
    front.location = Some(Location::Front);
    front.sort_order = 1;
    let mut corner = Segment::new("corner", "Corner", 10, SegmentType::Corner);
    corner.sort_order = 2;
    let mut peak = Segment::new("peak", "Peak", 20, SegmentType::Peak);
    peak.sort_order = 3;
    peak.level = 2;
    RooflineConfiguration::new(vec![front, corner, peak]).unwrap()
}

#[test]
fn all_zones_always_overlap() {
    assert!(ZoneSelector::All.overlaps(&ZoneSelector::All));
}

#[test]
fn same_kind_selectors_overlap_on_intersection() {
    let a = ZoneSelector::Segments {
        ids: vec!["a".into(), "b".into()],
    };
    let b = ZoneSelector::Segments {
        ids: vec!["b".into()],
    };
    let c = ZoneSelector::Segments {
        ids: vec!["c".into()],
    };
    assert!(a.overlaps(&b));
    assert!(!a.overlaps(&c));

    let r1 = ZoneSelector::Custom {
        ranges: vec![PixelRange::new(0, 9)],
    };
    let r2 = ZoneSelector::Custom {
        ranges: vec![PixelRange::new(9, 20)],
    };
    let r3 = ZoneSelector::Custom {
        ranges: vec![PixelRange::new(10, 20)],
    };
    assert!(r1.overlaps(&r2));
    assert!(!r1.overlaps(&r3));
}

#[test]
fn different_kinds_do_not_overlap() {
    let roles = ZoneSelector::Architectural {
        roles: vec![ArchitecturalRole::Corner],
    };
    assert!(!roles.overlaps(&ZoneSelector::All));
    assert!(!ZoneSelector::Level { level: 1 }.overlaps(&roles));
}

#[test]
fn resolve_maps_selectors_to_pixels() {
    let cfg = cfg();
    assert_eq!(ZoneSelector::All.resolve(&cfg), vec![0..70]);
    assert_eq!(
        ZoneSelector::Architectural {
            roles: vec![ArchitecturalRole::Corner, ArchitecturalRole::Peak]
        }
        .resolve(&cfg),
        vec![40..50, 50..70]
    );
    assert_eq!(
        ZoneSelector::Location {
            location: Location::Front
        }
        .resolve(&cfg),
        vec![0..40]
    );
    assert_eq!(ZoneSelector::Level { level: 2 }.resolve(&cfg), vec![50..70]);
    assert_eq!(
        ZoneSelector::Custom {
            ranges: vec![PixelRange::new(65, 100), PixelRange::new(80, 90)]
        }
        .resolve(&cfg),
        vec![65..70]
    );
    assert_eq!(
        ZoneSelector::Segments {
            ids: vec!["missing".into()]
        }
        .pixel_count(&cfg),
        0
    );
}

#[test]
fn tagged_json_shapes() {
    let z = ZoneSelector::Segments {
        ids: vec!["a".into()],
    };
    assert_eq!(
        serde_json::to_value(&z).unwrap(),
        json!({"type": "segments", "ids": ["a"]})
    );
    let r = SpacingRule::Pattern {
        on_count: 1,
        off_count: 2,
    };
    assert_eq!(
        serde_json::to_value(r).unwrap(),
        json!({"type": "pattern", "onCount": 1, "offCount": 2})
    );
    assert_eq!(
        serde_json::to_value(SpacingRule::AnchorsOnly).unwrap(),
        json!({"type": "anchorsOnly"})
    );
}

#[test]
fn motion_reverse_follows_direction() {
    let m = MotionSettings::new(MotionType::Wave, MotionDirection::RightToLeft);
    assert!(m.reverse);
    assert_eq!(m.effect, Effect::Colorwaves);
    assert!(!MotionSettings::new(MotionType::Chase, MotionDirection::Outward).reverse);
}

#[test]
fn choice_preview_comes_from_value() {
    let c = ClarificationChoice::new(
        "a",
        "Forest green",
        true,
        Some(ChoiceValue::Color {
            color: Rgbw::rgb(34, 139, 34),
        }),
    );
    assert_eq!(c.value_preview.as_deref(), Some("#228b22"));
}

#[test]
fn confidence_is_clamped_on_construction() {
    let i = DesignIntent::from_parts("x".into(), vec![], vec![], 1.7, Utc::now());
    assert_eq!(i.confidence(), 1.0);
    let j = i.derive(vec![], vec![], -0.2);
    assert_eq!(j.confidence(), 0.0);
    assert_eq!(j.original_text(), "x");
}
