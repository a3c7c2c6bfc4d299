use super::*;
use crate::placement::model::ImagePlacement;

fn placed(w: u32, h: u32, scale: f64) -> PlacedImage {
    let source =
        SourceImage::from_rgba(image::RgbaImage::from_pixel(w, h, image::Rgba([10, 200, 30, 255])))
            .unwrap();
    PlacedImage {
        source,
        placement: ImagePlacement {
            x: 5.0,
            y: 5.0,
            base_w: f64::from(w) / 2.0,
            base_h: f64::from(h) / 2.0,
            scale,
        },
    }
}

#[test]
fn flattened_snapshot_has_effective_size() {
    let uri = flatten_image(&placed(80, 40, 1.5)).unwrap();
    assert!(uri.starts_with(PNG_DATA_URI_PREFIX));
    let back = decode_data_uri(&uri).unwrap();
    assert_eq!((back.width(), back.height()), (60, 30));
    assert_eq!(back.pixels().get_pixel(30, 15).0, [10, 200, 30, 255]);
}

#[test]
fn malformed_data_uris_are_decode_errors() {
    for bad in [
        "",
        "http://example.com/a.png",
        "data:image/png;base64",
        "data:image/png,plain",
        "data:image/png;base64,@@@",
        "data:image/png;base64,aGVsbG8=",
    ] {
        assert!(
            matches!(decode_data_uri(bad), Err(WishlyError::Decode(_))),
            "{bad}"
        );
    }
}
