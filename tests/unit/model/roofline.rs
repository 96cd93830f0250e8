use super::*;
use serde_json::json;

fn seg(id: &str, n: u32, ty: SegmentType, order: i32) -> Segment {
    Segment {
        sort_order: order,
        ..Segment::new(id, id.to_uppercase(), n, ty)
    }
}

#[test]
fn start_pixels_follow_sort_order() {
    let cfg = RooflineConfiguration::new(vec![
        seg("b", 30, SegmentType::Corner, 2),
        seg("a", 20, SegmentType::Run, 1),
        seg("c", 10, SegmentType::Peak, 3),
    ])
    .unwrap();

    let ids: Vec<&str> = cfg.segments().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    let starts: Vec<u32> = cfg.segments().iter().map(|s| s.start_pixel).collect();
    assert_eq!(starts, [0, 20, 50]);
    assert_eq!(cfg.total_pixel_count(), 60);
    assert_eq!(cfg.segment_at(49).unwrap().id, "b");
    assert!(cfg.segment_at(60).is_none());
}

#[test]
fn rejects_duplicate_and_empty_ids() {
    let dup = RooflineConfiguration::new(vec![
        seg("a", 1, SegmentType::Run, 0),
        seg("a", 1, SegmentType::Run, 1),
    ]);
    assert!(dup.unwrap_err().to_string().contains("duplicate"));

    let empty = RooflineConfiguration::new(vec![seg(" ", 1, SegmentType::Run, 0)]);
    assert!(empty.is_err());
}

#[test]
fn rejects_anchor_outside_segment() {
    let mut s = seg("a", 10, SegmentType::Run, 0);
    s.anchor_offsets = vec![10];
    assert!(RooflineConfiguration::new(vec![s]).is_err());
}

#[test]
fn default_anchors_depend_on_type() {
    assert_eq!(seg("r", 20, SegmentType::Run, 0).anchors(), [0, 18]);
    assert_eq!(seg("c", 8, SegmentType::Corner, 0).anchors(), [0]);
    assert_eq!(seg("p", 20, SegmentType::Peak, 0).anchors(), [9]);
    assert!(seg("x", 20, SegmentType::Connector, 0).anchors().is_empty());
    assert!(seg("e", 0, SegmentType::Run, 0).anchors().is_empty());
}

#[test]
fn explicit_anchors_win_and_define_zones() {
    let mut s = seg("r", 20, SegmentType::Run, 0);
    s.anchor_offsets = vec![18, 0];
    assert_eq!(s.anchors(), [0, 18]);
    assert!(s.in_anchor_zone(1));
    assert!(!s.in_anchor_zone(2));
    assert!(s.in_anchor_zone(19));
}

#[test]
fn roles_cover_segment_types() {
    assert!(ArchitecturalRole::Eave.matches(SegmentType::Run));
    assert!(!ArchitecturalRole::Peak.matches(SegmentType::Run));
    assert!(ArchitecturalRole::Corner.matches(SegmentType::Corner));
}

#[test]
fn deserializes_through_validation() {
    let cfg: RooflineConfiguration = serde_json::from_value(json!({
        "segments": [
            { "id": "front", "name": "Front", "pixelCount": 40, "type": "run", "sortOrder": 1,
              "location": "front", "prominent": true },
            { "id": "peak", "name": "Peak", "pixelCount": 10, "type": "peak", "sortOrder": 2,
              "level": 2 }
        ]
    }))
    .unwrap();
    assert_eq!(cfg.total_pixel_count(), 50);
    assert_eq!(cfg.segment("peak").unwrap().start_pixel, 40);
    assert!(cfg.has_level(2));
    assert!(!cfg.has_level(3));

    let bad = serde_json::from_value::<RooflineConfiguration>(json!({
        "segments": [
            { "id": "a", "name": "A", "pixelCount": 1, "type": "run" },
            { "id": "a", "name": "A", "pixelCount": 1, "type": "run" }
        ]
    }));
    assert!(bad.is_err());
}
