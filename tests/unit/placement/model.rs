use std::io::Cursor;

use rand::{Rng, SeedableRng};

use super::*;

fn surface() -> Surface {
    Surface::new(1000, 800).unwrap()
}

fn source(w: u32, h: u32) -> SourceImage {
    SourceImage::from_rgba(image::RgbaImage::from_pixel(w, h, image::Rgba([9, 9, 9, 255]))).unwrap()
}

fn png(w: u32, h: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::new(w, h))
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn base_size_fits_long_edge_and_centers() {
    let limits = PlacementLimits::default();
    let p = ImagePlacement::for_image(1200, 600, surface(), &limits);
    assert_eq!((p.base_w, p.base_h), (600.0, 300.0));
    assert_eq!(p.scale, 1.0);
    assert_eq!((p.x, p.y), (200.0, 250.0));

    // Small images keep their intrinsic size.
    let p = ImagePlacement::for_image(200, 100, surface(), &limits);
    assert_eq!((p.base_w, p.base_h), (200.0, 100.0));

    let p = ImagePlacement::for_image(300, 1200, surface(), &limits);
    assert_eq!((p.base_w, p.base_h), (150.0, 600.0));
}

#[test]
fn clamp_keeps_forty_percent_visible() {
    let limits = PlacementLimits::default();
    let s = surface();
    let mut p = ImagePlacement {
        x: -10_000.0,
        y: 10_000.0,
        base_w: 100.0,
        base_h: 50.0,
        scale: 1.0,
    };
    p.clamp_to(s, &limits);
    assert_eq!(p.x, -60.0);
    assert_eq!(p.y, 800.0 - 20.0);

    p.x = 10_000.0;
    p.y = -10_000.0;
    p.clamp_to(s, &limits);
    assert_eq!(p.x, 1000.0 - 40.0);
    assert_eq!(p.y, -30.0);
}

#[test]
fn begin_drag_hit_captures_offset_and_drag_follows() {
    let s = surface();
    let mut m = PlacementModel::new(PlacementLimits::default());
    m.set_image(source(200, 100), s);
    let start = *m.placement().unwrap();

    assert!(m.begin_drag(Pointer::surface(Point::new(start.x + 10.0, start.y + 5.0)), s));
    assert!(m.is_dragging());
    assert!(m.drag_to(Pointer::surface(Point::new(110.0, 105.0)), s));
    let p = m.placement().unwrap();
    assert_eq!((p.x, p.y), (100.0, 100.0));

    assert!(m.end_drag());
    assert!(!m.is_dragging());
    assert!(!m.drag_to(Pointer::surface(Point::new(0.0, 0.0)), s));
}

#[test]
fn begin_drag_maps_display_coordinates() {
    let s = surface();
    let mut m = PlacementModel::new(PlacementLimits::default());
    m.set_image(source(200, 100), s);
    // Image spans x 400..600, y 350..450 in surface space; display is half size.
    let display = DisplaySize {
        width: 500.0,
        height: 400.0,
    };
    assert!(m.begin_drag(Pointer::display(Point::new(250.0, 200.0), display), s));
}

#[test]
fn begin_drag_miss_recenters_image() {
    let s = surface();
    let mut m = PlacementModel::new(PlacementLimits::default());
    m.set_image(source(200, 100), s);
    m.begin_drag(Pointer::surface(Point::new(450.0, 400.0)), s);
    m.drag_to(Pointer::surface(Point::new(60.0, 60.0)), s);
    m.end_drag();
    assert_ne!(m.placement().unwrap().x, 400.0);

    assert!(!m.begin_drag(Pointer::surface(Point::new(990.0, 790.0)), s));
    let p = m.placement().unwrap();
    assert_eq!((p.x, p.y), (400.0, 350.0));
    assert!(!m.is_dragging());
}

#[test]
fn begin_drag_without_image_is_noop() {
    let mut m = PlacementModel::default();
    assert!(!m.begin_drag(Pointer::surface(Point::new(1.0, 1.0)), surface()));
    assert!(m.placement().is_none());
}

#[test]
fn set_scale_clamps_to_range() {
    let s = surface();
    let mut m = PlacementModel::new(PlacementLimits::default());
    m.set_image(source(200, 100), s);
    assert_eq!(m.set_scale(5.0, s), 2.0);
    assert_eq!(m.set_scale(0.1, s), 0.5);
    assert_eq!(m.set_scale(f64::NAN, s), 1.0);
    assert_eq!(m.placement().unwrap().scale, 1.0);
}

#[test]
fn failed_decode_leaves_previous_image() {
    let s = surface();
    let mut m = PlacementModel::new(PlacementLimits::default());
    m.load_image(&png(40, 20), s).unwrap();
    let before = *m.placement().unwrap();
    assert!(m.load_image(b"garbage", s).is_err());
    assert_eq!(*m.placement().unwrap(), before);
    assert_eq!(m.image().unwrap().source.width(), 40);
}

#[test]
fn containment_holds_after_any_drag_scale_sequence() {
    let limits = PlacementLimits::default();
    let s = surface();
    let mut rng = rand_pcg::Pcg64::seed_from_u64(0x5eed);
    let mut m = PlacementModel::new(limits);
    m.set_image(source(900, 300), s);

    for _ in 0..500 {
        match rng.gen_range(0..4) {
            0 => {
                let p = Point::new(rng.gen_range(-3000.0..3000.0), rng.gen_range(-3000.0..3000.0));
                m.begin_drag(Pointer::surface(p), s);
            }
            1 => {
                let p = Point::new(rng.gen_range(-3000.0..3000.0), rng.gen_range(-3000.0..3000.0));
                m.drag_to(Pointer::surface(p), s);
            }
            2 => {
                m.set_scale(rng.gen_range(-1.0..4.0), s);
            }
            _ => {
                m.end_drag();
            }
        }
        let p = m.placement().unwrap();
        let (w, h) = p.effective_size();
        assert!(w > 0.0 && h > 0.0);
        assert!(p.x >= -0.6 * w - 1e-9 && p.x <= 1000.0 - 0.4 * w + 1e-9);
        assert!(p.y >= -0.6 * h - 1e-9 && p.y <= 800.0 - 0.4 * h + 1e-9);
        assert!(p.is_contained(s, &limits));
    }
}

#[test]
fn restore_reclamps_and_resize_reclamps() {
    let limits = PlacementLimits::default();
    let mut m = PlacementModel::new(limits);
    let big = surface();
    m.restore(
        source(10, 10),
        ImagePlacement {
            x: 900.0,
            y: 700.0,
            base_w: 100.0,
            base_h: 100.0,
            scale: 9.0,
        },
        big,
    );
    let p = *m.placement().unwrap();
    assert_eq!(p.scale, 2.0);
    assert!(p.is_contained(big, &limits));

    let small = Surface::new(400, 300).unwrap();
    m.on_surface_resized(small);
    assert!(m.placement().unwrap().is_contained(small, &limits));
}
