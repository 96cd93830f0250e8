use super::*;
use crate::model::intent::{
    ColorAssignment, DesignLayer, MotionDirection, MotionSettings, MotionType, PatternRule,
    ZoneSelector,
};
use chrono::Utc;
use serde_json::json;

const RED: Rgbw = Rgbw::rgb(255, 0, 0);
const BLUE: Rgbw = Rgbw::rgb(0, 0, 255);

#[test]
fn pixel_form_expands_groups_and_uses_the_known_total() {
    let groups = [LedColorGroup::new(0, 1, RED), LedColorGroup::pixel(4, BLUE)];
    let payload = encode_pixels(&groups, Some(10), &OutputOpts::default());
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({
            "on": true,
            "bri": 255,
            "seg": [{
                "id": 0,
                "start": 0,
                "stop": 10,
                "i": [0, 255, 0, 0, 1, 255, 0, 0, 4, 0, 0, 255]
            }]
        })
    );
}

#[test]
fn pixel_form_stop_falls_back_to_max_index_plus_one() {
    let groups = [LedColorGroup::pixel(7, RED), LedColorGroup::new(2, 3, BLUE)];
    let payload = encode_pixels(&groups, None, &OutputOpts::default());
    assert_eq!(payload.seg[0].start, 0);
    assert_eq!(payload.seg[0].stop, 8);
    assert_eq!(encode_pixels(&[], None, &OutputOpts::default()).seg[0].stop, 0);
}

#[test]
fn pixel_form_drops_pixels_past_the_total() {
    let groups = [LedColorGroup::new(3, 6, RED)];
    let payload = encode_pixels(&groups, Some(5), &OutputOpts::default());
    assert_eq!(
        payload.seg[0].i.as_deref(),
        Some(&[3, 255, 0, 0, 4, 255, 0, 0][..])
    );
}

fn layer(
    id: &str,
    colors: ColorAssignment,
    motion: Option<MotionSettings>,
    priority: u32,
) -> DesignLayer {
    DesignLayer {
        id: id.to_owned(),
        name: id.to_owned(),
        zone: ZoneSelector::All,
        colors,
        pattern: PatternRule::Solid,
        motion,
        priority,
    }
}

#[test]
fn segment_form_carries_effect_and_colors() {
    let mut base = ColorAssignment::solid(RED);
    base.secondary = Some(Rgbw::WHITE);
    let intent = DesignIntent::from_parts(
        "t".to_owned(),
        vec![
            layer("a", base, None, 0),
            layer(
                "b",
                ColorAssignment::solid(BLUE),
                Some(MotionSettings::new(MotionType::Chase, MotionDirection::RightToLeft)),
                1,
            ),
        ],
        Vec::new(),
        1.0,
        Utc::now(),
    );
    let fx = SegmentEffect::from_intent(&intent);
    assert_eq!(fx.colors, [BLUE, RED, Rgbw::WHITE]);
    assert_eq!(fx.effect, Effect::Chase);

    let mut out = OutputOpts::default();
    out.brightness = 128;
    let payload = encode_segment(&fx, 120, &out);
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({
            "on": true,
            "bri": 128,
            "seg": [{
                "id": 0,
                "start": 0,
                "stop": 120,
                "col": [[0, 0, 255], [255, 0, 0], [255, 255, 255]],
                "fx": 28,
                "sx": 128,
                "ix": 128,
                "rev": true
            }]
        })
    );
}

#[test]
fn static_intent_encodes_as_solid() {
    let intent = DesignIntent::from_parts(
        "t".to_owned(),
        vec![
            layer("a", ColorAssignment::solid(RED), None, 0),
            layer("b", ColorAssignment::solid(RED), None, 1),
        ],
        Vec::new(),
        1.0,
        Utc::now(),
    );
    let fx = SegmentEffect::from_intent(&intent);
    assert_eq!(fx.colors, [RED]);
    let seg = &encode_segment(&fx, 50, &OutputOpts::default()).seg[0];
    assert_eq!(seg.fx, Some(0));
    assert_eq!(seg.rev, None);
    assert_eq!(seg.stop, 50);
}
