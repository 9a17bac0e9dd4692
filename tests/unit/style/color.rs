use super::*;
use serde_json::json;

#[test]
fn eight_digit_hex_is_alpha_first() {
    let c = parse_hex_argb("#80112233").unwrap();
    assert_eq!(c, Argb8::new(0x80, 0x11, 0x22, 0x33));
}

#[test]
fn six_digit_hex_is_opaque() {
    let c = parse_hex_argb("#112233").unwrap();
    assert_eq!(c, Argb8::new(0xFF, 0x11, 0x22, 0x33));
    assert_eq!(parse_hex_argb("aabbcc").unwrap().r, 0xAA);
}

#[test]
fn malformed_hex_is_a_style_parse_error() {
    for bad in [
        "#12345",
        "#1122334455",
        "#GG112233",
        "#11223",
        "",
        "#ééé",
        "#+F112233",
        "#+1122",
        "#-1122334",
    ] {
        let err = parse_hex_argb(bad).unwrap_err();
        assert!(matches!(err, PhotoError::StyleParse(_)), "{bad}: {err}");
    }
}

#[test]
fn structured_object_is_copied_through() {
    let c: ColorDef = serde_json::from_value(json!({"a": 10, "r": 20, "g": 30, "b": 40})).unwrap();
    assert_eq!(c.resolve().unwrap(), Argb8::new(10, 20, 30, 40));

    let c: ColorDef = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(c.resolve().unwrap().a, 255);
}

#[test]
fn hex_string_deserializes_lazily() {
    let c: ColorDef = serde_json::from_value(json!("#zz000000")).unwrap();
    assert!(matches!(c.resolve(), Err(PhotoError::StyleParse(_))));
}

#[test]
fn out_of_range_channel_is_rejected() {
    let c: ColorDef = serde_json::from_value(json!({"r": 300, "g": 0, "b": 0})).unwrap();
    assert!(matches!(c.resolve(), Err(PhotoError::StyleParse(_))));
}
