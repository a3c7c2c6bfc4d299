use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_dimensions_and_straight_alpha() {
    let img = image::RgbaImage::from_raw(2, 1, vec![100, 50, 200, 128, 1, 2, 3, 255]).unwrap();
    let src = decode_image(&png_bytes(img)).unwrap();
    assert_eq!((src.width(), src.height()), (2, 1));
    assert_eq!(src.pixels().get_pixel(0, 0).0, [100, 50, 200, 128]);
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, WishlyError::Decode(_)));
    assert!(matches!(decode_image(&[]).unwrap_err(), WishlyError::Decode(_)));
}

#[test]
fn premultiply_then_unpremultiply_is_close() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[50, 25, 100, 128]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);

    unpremultiply_rgba8_in_place(&mut px);
    for (got, want) in px[0..3].iter().zip([100u8, 50, 200]) {
        assert!((i16::from(*got) - i16::from(want)).abs() <= 1);
    }
}
