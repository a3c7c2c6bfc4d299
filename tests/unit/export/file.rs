use super::*;

fn frame() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 0, 255, 255],
        premultiplied: true,
    }
}

#[test]
fn file_name_collapses_whitespace_and_defaults_to_card() {
    assert_eq!(export_file_name(""), "card_wish.png");
    assert_eq!(export_file_name("Ada"), "Ada_wish.png");
    assert_eq!(export_file_name("Ada  Lovelace"), "Ada_Lovelace_wish.png");
    assert_eq!(export_file_name(" Bo\t\nC "), "_Bo_C__wish.png");
}

#[test]
fn export_writes_decodable_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_png(&frame(), "Mary Ann", dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), "Mary_Ann_wish.png");
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 255]);
}

#[test]
fn export_into_missing_dir_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        export_png(&frame(), "", &missing),
        Err(WishlyError::Storage(_))
    ));
}
