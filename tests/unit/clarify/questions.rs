use super::*;
use crate::model::intent::{ColorAssignment, DesignLayer, PatternRule};
use crate::model::roofline::{Segment, SegmentType};
use chrono::Utc;

const NAVY: Rgbw = Rgbw::rgb(0, 0, 128);
const SKY: Rgbw = Rgbw::rgb(135, 206, 235);

fn layer(id: &str, zone: ZoneSelector) -> DesignLayer {
    DesignLayer {
        id: id.to_owned(),
        name: id.to_owned(),
        zone,
        colors: ColorAssignment::solid(NAVY),
        pattern: PatternRule::Solid,
        motion: None,
        priority: 0,
    }
}

fn flag(
    kind: AmbiguityKind,
    layer_id: &str,
    choices: Vec<ClarificationChoice>,
) -> AmbiguityFlag {
    AmbiguityFlag {
        kind,
        description: format!("{kind:?} question"),
        source_clause: "clause".to_owned(),
        layer_id: Some(layer_id.to_owned()),
        choices,
    }
}

fn intent(layers: Vec<DesignLayer>, ambiguities: Vec<AmbiguityFlag>) -> DesignIntent {
    DesignIntent::from_parts("test".to_owned(), layers, ambiguities, 0.7, Utc::now())
}

fn color_choice(id: &str, color: Rgbw) -> ClarificationChoice {
    ClarificationChoice::new(id, id, false, Some(ChoiceValue::Color { color }))
}

fn zone_choice(id: &str, seg: &str) -> ClarificationChoice {
    ClarificationChoice::new(
        id,
        id,
        false,
        Some(ChoiceValue::Zone {
            zone: ZoneSelector::Segments {
                ids: vec![seg.to_owned()],
            },
        }),
    )
}

#[test]
fn questions_are_sorted_by_kind_priority() {
    let i = intent(
        vec![layer("layer-0", ZoneSelector::All)],
        vec![
            flag(AmbiguityKind::ConflictResolution, "layer-0", Vec::new()),
            flag(AmbiguityKind::Zone, "layer-0", vec![zone_choice("a", "s1")]),
            flag(AmbiguityKind::Color, "layer-0", vec![color_choice("navy", NAVY)]),
        ],
    );
    let qs = build_questions(&i, None, &EngineOpts::default());
    let order: Vec<(&str, ClarificationKind)> =
        qs.iter().map(|q| (q.id.as_str(), q.kind)).collect();
    assert_eq!(
        order,
        vec![
            ("q-1", ClarificationKind::Zone),
            ("q-2", ClarificationKind::Color),
            ("q-0", ClarificationKind::Conflict),
        ]
    );
    assert_eq!(qs[0].prompt, "Zone question");
    assert_eq!(qs[0].layer_id.as_deref(), Some("layer-0"));
}

#[test]
fn zone_questions_end_with_entire_installation() {
    let choices = (0..6)
        .map(|n| zone_choice(&format!("c{n}"), &format!("s{n}")))
        .collect();
    let i = intent(
        vec![layer("layer-0", ZoneSelector::All)],
        vec![flag(AmbiguityKind::Zone, "layer-0", choices)],
    );
    let qs = build_questions(&i, None, &EngineOpts::default());
    let ids: Vec<&str> = qs[0].options.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["c0", "c1", "c2", "entire"]);
    assert_eq!(qs[0].options[3].hint, OptionHint::Zone);
}

#[test]
fn zone_catch_all_is_not_duplicated() {
    let all = ClarificationChoice::new(
        "all",
        "All of them",
        true,
        Some(ChoiceValue::Zone {
            zone: ZoneSelector::All,
        }),
    );
    let i = intent(
        vec![layer("layer-0", ZoneSelector::All)],
        vec![flag(
            AmbiguityKind::Zone,
            "layer-0",
            vec![zone_choice("c0", "s0"), all],
        )],
    );
    let qs = build_questions(&i, None, &EngineOpts::default());
    let ids: Vec<&str> = qs[0].options.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["c0", "all"]);
    assert_eq!(qs[0].recommended().map(|o| o.id.as_str()), Some("all"));
}

#[test]
fn spacing_and_conflict_catch_alls() {
    let i = intent(
        vec![layer("layer-0", ZoneSelector::All)],
        vec![
            flag(AmbiguityKind::SpacingImpossible, "layer-0", Vec::new()),
            flag(AmbiguityKind::ConflictResolution, "layer-0", Vec::new()),
        ],
    );
    let qs = build_questions(&i, None, &EngineOpts::default());
    assert_eq!(qs[0].kind, ClarificationKind::Spacing);
    assert_eq!(qs[0].options.len(), 1);
    assert_eq!(qs[0].options[0].id, "manual");
    assert_eq!(qs[0].options[0].value, None);
    assert_eq!(qs[0].options[0].hint, OptionHint::Spacing);

    assert_eq!(qs[1].kind, ClarificationKind::Conflict);
    assert_eq!(qs[1].options[0].value, Some(ChoiceValue::Blend));
    assert_eq!(qs[1].options[0].hint, OptionHint::Blend);
}

#[test]
fn low_contrast_renders_as_brightness_without_catch_all() {
    let i = intent(
        vec![layer("layer-0", ZoneSelector::All)],
        vec![flag(
            AmbiguityKind::LowContrast,
            "layer-0",
            vec![ClarificationChoice::new("keep", "Keep", true, Some(ChoiceValue::Keep))],
        )],
    );
    let qs = build_questions(&i, None, &EngineOpts::default());
    assert_eq!(qs[0].kind, ClarificationKind::Brightness);
    assert_eq!(qs[0].options.len(), 1);
    assert_eq!(qs[0].options[0].hint, OptionHint::Keep);
}

#[test]
fn color_preview_covers_the_zone() {
    let cfg = RooflineConfiguration::new(vec![
        Segment::new("s1", "Run", 20, SegmentType::Run),
        Segment::new("s2", "Peak", 10, SegmentType::Peak),
    ])
    .unwrap();
    let zone = ZoneSelector::Segments {
        ids: vec!["s1".into()],
    };
    let i = intent(
        vec![layer("layer-0", zone)],
        vec![flag(AmbiguityKind::Color, "layer-0", vec![color_choice("sky", SKY)])],
    );

    let qs = build_questions(&i, Some(&cfg), &EngineOpts::default());
    assert_eq!(
        qs[0].options[0].preview,
        Some(vec![LedColorGroup::new(0, 19, SKY)])
    );
    assert_eq!(qs[0].options[0].value_preview.as_deref(), Some("#87ceeb"));

    let qs = build_questions(&i, None, &EngineOpts::default());
    assert_eq!(
        qs[0].options[0].preview,
        Some(vec![LedColorGroup::new(0, 49, SKY)])
    );
}

#[test]
fn spacing_preview_lights_pattern_pixels_in_the_layer_color() {
    let rule = SpacingRule::Pattern {
        on_count: 1,
        off_count: 1,
    };
    let i = intent(
        vec![layer("layer-0", ZoneSelector::All)],
        vec![flag(
            AmbiguityKind::Spacing,
            "layer-0",
            vec![ClarificationChoice::new(
                "alt",
                "1 on, 1 off",
                true,
                Some(ChoiceValue::Spacing { rule }),
            )],
        )],
    );
    let qs = build_questions(&i, None, &EngineOpts::default());
    let preview = qs[0].options[0].preview.as_ref().unwrap();
    assert_eq!(preview.len(), 25);
    assert!(preview.iter().all(|g| g.len() == 1 && g.color == NAVY));
    assert_eq!(preview[1].start_led, 2);
    assert_eq!(qs[0].options.last().map(|o| o.id.as_str()), Some("manual"));
}

#[test]
fn max_options_is_respected() {
    let mut opts = EngineOpts::default();
    opts.clarify.max_options = 2;
    let choices = vec![
        color_choice("a", NAVY),
        color_choice("b", SKY),
        color_choice("c", Rgbw::WHITE),
    ];
    let i = intent(
        vec![layer("layer-0", ZoneSelector::All)],
        vec![flag(AmbiguityKind::Color, "layer-0", choices)],
    );
    let qs = build_questions(&i, None, &opts);
    assert_eq!(qs[0].options.len(), 2);
}

#[test]
fn no_ambiguities_no_questions() {
    let i = intent(vec![layer("layer-0", ZoneSelector::All)], Vec::new());
    assert!(build_questions(&i, None, &EngineOpts::default()).is_empty());
}
