use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgbw() {
    let c: Rgbw = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(c, Rgbw::rgb(255, 0, 0));

    let c: Rgbw = serde_json::from_value(json!("00FF0080")).unwrap();
    assert_eq!(c, Rgbw::rgbw(0, 255, 0, 128));
}

#[test]
fn parses_arrays_and_rejects_bad_lengths() {
    let c: Rgbw = serde_json::from_value(json!([1, 2, 3])).unwrap();
    assert_eq!(c, Rgbw::rgb(1, 2, 3));
    let c: Rgbw = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c, Rgbw::rgbw(1, 2, 3, 4));
    assert!(serde_json::from_value::<Rgbw>(json!([1, 2])).is_err());
    assert!(serde_json::from_value::<Rgbw>(json!("#12345")).is_err());
}

#[test]
fn serializes_as_hex() {
    assert_eq!(
        serde_json::to_value(Rgbw::rgb(0, 100, 0)).unwrap(),
        json!("#006400")
    );
    assert_eq!(Rgbw::rgbw(1, 2, 3, 4).to_string(), "#01020304");
}

#[test]
fn luminance_extremes() {
    assert!((Rgbw::WHITE.relative_luminance() - 1.0).abs() < 1e-9);
    assert!(Rgbw::BLACK.relative_luminance().abs() < 1e-12);
}

#[test]
fn contrast_is_symmetric_and_normalized() {
    let a = Rgbw::rgb(255, 0, 0);
    let b = Rgbw::rgb(0, 0, 255);
    assert!((normalized_contrast(a, b) - normalized_contrast(b, a)).abs() < 1e-12);
    assert!((normalized_contrast(Rgbw::WHITE, Rgbw::BLACK) - 1.0).abs() < 1e-9);
    assert!((normalized_contrast(a, a) - 1.0 / 21.0).abs() < 1e-9);
}

#[test]
fn lerp_and_scale() {
    let mid = Rgbw::BLACK.lerp(Rgbw::rgb(200, 100, 50), 0.5);
    assert_eq!(mid, Rgbw::rgb(100, 50, 25));
    assert_eq!(Rgbw::rgb(200, 10, 0).scale(2.0), Rgbw::rgb(255, 20, 0));
}
