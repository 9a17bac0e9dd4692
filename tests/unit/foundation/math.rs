use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(0, 200), 0);
}

#[test]
fn premultiply_zeroes_transparent_pixels() {
    let mut px = vec![200u8, 100, 50, 0, 200, 100, 50, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0, 200, 100, 50, 255]);
}

#[test]
fn unpremultiply_inverts_premultiply_within_one_step() {
    let straight = [200u8, 100, 50, 128];
    let mut px = straight.to_vec();
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    for c in 0..3 {
        assert!((i16::from(px[c]) - i16::from(straight[c])).abs() <= 1);
    }
    assert_eq!(px[3], 128);
}
