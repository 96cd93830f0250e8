use super::*;

const WHITE: Rgbw = Rgbw::WHITE;
const RED: Rgbw = Rgbw::rgb(255, 0, 0);
const GREEN: Rgbw = Rgbw::rgb(0, 255, 0);

fn run(id: &str, n: u32, order: i32) -> Segment {
    let mut s = Segment::new(id, id, n, SegmentType::Run);
    s.sort_order = order;
    s
}

fn spaced(count: u32, always_on: bool) -> PatternTemplate {
    PatternTemplate::Spaced {
        pattern: ResolvedPattern {
            anchor_color: WHITE,
            spaced_color: RED,
            spacing_count: count,
            anchor_always_on: always_on,
        },
    }
}

#[test]
fn anchors_and_spaced_pixels_on_a_twenty_pixel_run() {
    let mut seg = run("eave", 20, 0);
    seg.anchor_offsets = vec![0, 18];
    let cfg = RooflineConfiguration::new(vec![seg]).unwrap();

    let groups = lower_template(&spaced(3, true), &cfg);
    assert_eq!(
        groups,
        [
            LedColorGroup::new(0, 1, WHITE),
            LedColorGroup::pixel(6, RED),
            LedColorGroup::pixel(10, RED),
            LedColorGroup::pixel(14, RED),
            LedColorGroup::new(18, 19, WHITE),
        ]
    );
}

#[test]
fn segments_are_offset_by_their_chain_position() {
    let mut corner = Segment::new("c", "c", 4, SegmentType::Corner);
    corner.sort_order = 0;
    let cfg = RooflineConfiguration::new(vec![run("eave", 20, 1), corner]).unwrap();

    let groups = lower_template(&spaced(3, true), &cfg);
    assert_eq!(groups[0], LedColorGroup::new(0, 1, WHITE));
    assert_eq!(groups[1], LedColorGroup::new(4, 5, WHITE));
    assert_eq!(groups[2], LedColorGroup::pixel(10, RED));
    assert_eq!(groups.last(), Some(&LedColorGroup::new(22, 23, WHITE)));
}

#[test]
fn anchors_can_be_left_dark() {
    let cfg = RooflineConfiguration::new(vec![run("eave", 20, 0)]).unwrap();
    let groups = lower_template(&spaced(3, false), &cfg);
    assert!(groups.iter().all(|g| g.color == RED));
    assert_eq!(groups.len(), 3);
}

#[test]
fn anchor_groups_are_clipped_to_the_segment() {
    let mut seg = run("short", 5, 0);
    seg.anchor_offsets = vec![4];
    seg.anchor_led_count = 3;
    let cfg = RooflineConfiguration::new(vec![seg]).unwrap();
    let groups = lower_template(&PatternTemplate::AnchorsOnly { color: RED }, &cfg);
    assert_eq!(groups, [LedColorGroup::pixel(4, RED)]);
}

#[test]
fn whole_segment_templates() {
    let mut corner = Segment::new("c", "c", 4, SegmentType::Corner);
    corner.sort_order = 1;
    let cfg =
        RooflineConfiguration::new(vec![run("a", 10, 0), corner, run("b", 6, 2)]).unwrap();

    assert_eq!(
        lower_template(
            &PatternTemplate::ChaseBySegment {
                colors: vec![RED, GREEN]
            },
            &cfg
        ),
        [
            LedColorGroup::new(0, 9, RED),
            LedColorGroup::new(10, 13, GREEN),
            LedColorGroup::new(14, 19, RED),
        ]
    );
    assert_eq!(
        lower_template(
            &PatternTemplate::AlternatingSegments {
                first: WHITE,
                second: RED
            },
            &cfg
        )[1],
        LedColorGroup::new(10, 13, RED)
    );
    assert_eq!(
        lower_template(
            &PatternTemplate::CornerAccent {
                accent: RED,
                base: None
            },
            &cfg
        ),
        [LedColorGroup::new(10, 13, RED)]
    );
    // Equal neighbours merge into one run.
    assert_eq!(
        lower_template(
            &PatternTemplate::CornerAccent {
                accent: WHITE,
                base: Some(WHITE)
            },
            &cfg
        ),
        [LedColorGroup::new(0, 19, WHITE)]
    );
    assert_eq!(
        lower_template(&PatternTemplate::Uniform { color: GREEN }, &cfg),
        [LedColorGroup::new(0, 19, GREEN)]
    );
    assert!(lower_template(&PatternTemplate::ChaseBySegment { colors: vec![] }, &cfg).is_empty());
}

#[test]
fn every_group_stays_inside_the_installation() {
    let mut peak = Segment::new("p", "p", 9, SegmentType::Peak);
    peak.sort_order = 1;
    peak.anchor_led_count = 4;
    let mut col = Segment::new("col", "col", 3, SegmentType::Column);
    col.sort_order = 2;
    col.anchor_led_count = 5;
    let cfg = RooflineConfiguration::new(vec![run("a", 17, 0), peak, col]).unwrap();
    let total = cfg.total_pixel_count();

    for count in 0..8 {
        for template in [
            spaced(count, true),
            spaced(count, false),
            PatternTemplate::AnchorsOnly { color: RED },
        ] {
            for g in lower_template(&template, &cfg) {
                assert!(g.start_led <= g.end_led && g.end_led < total, "{g:?}");
            }
        }
    }
}

#[test]
fn spacing_count_beyond_the_gap_fills_it() {
    let mut seg = run("eave", 20, 0);
    seg.anchor_offsets = vec![0, 18];
    let cfg = RooflineConfiguration::new(vec![seg]).unwrap();

    assert_eq!(
        lower_template(&spaced(u32::MAX, true), &cfg),
        [
            LedColorGroup::new(0, 1, WHITE),
            LedColorGroup::new(2, 17, RED),
            LedColorGroup::new(18, 19, WHITE),
        ]
    );
}
