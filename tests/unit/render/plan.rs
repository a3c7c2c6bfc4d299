use rand::SeedableRng;

use super::*;
use crate::assets::decode::SourceImage;
use crate::design::model::{BgPreset, Edit, Occasion};
use crate::placement::model::{ImagePlacement, PlacementLimits};
use crate::render::text::ApproxMeasure;

fn surface() -> Surface {
    Surface::new(1000, 1000).unwrap()
}

fn compile(design: &DesignState, image: Option<&PlacedImage>, seed: u64) -> CardPlan {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    compile_card(
        design,
        image,
        surface(),
        &mut ApproxMeasure::default(),
        &SpeckleSpec::default(),
        &mut rng,
    )
}

fn placed(w: u32, h: u32) -> PlacedImage {
    let source =
        SourceImage::from_rgba(image::RgbaImage::from_pixel(w, h, image::Rgba([1, 2, 3, 255])))
            .unwrap();
    let placement = ImagePlacement::for_image(w, h, surface(), &PlacementLimits::default());
    PlacedImage { source, placement }
}

fn text_x(plan: &CardPlan, role: TextRole) -> Option<f64> {
    plan.ops.iter().find_map(|op| match op {
        DrawOp::Text { role: r, x, .. } if *r == role => Some(*x),
        _ => None,
    })
}

#[test]
fn custom_background_uses_color_then_lightened_stop() {
    let c = Rgba8::rgb(0x33, 0x66, 0x99);
    let design = DesignState::default()
        .apply_edit(Edit::BgColor(Some(c)))
        .unwrap();
    let plan = compile(&design, None, 1);
    assert_eq!(
        plan.ops[0],
        DrawOp::Background {
            start: c,
            end: lighten(c, 0.14),
        }
    );
}

#[test]
fn preset_background_uses_preset_stops() {
    let design = DesignState {
        bg_preset: BgPreset::Sky,
        bg_color: None,
        ..DesignState::default()
    };
    let plan = compile(&design, None, 1);
    let (start, end) = BgPreset::Sky.stops();
    assert_eq!(plan.ops[0], DrawOp::Background { start, end });
}

#[test]
fn layers_are_in_pipeline_order() {
    let design = DesignState {
        title: "Hi".to_owned(),
        event_date: chrono::NaiveDate::from_ymd_opt(2025, 2, 14),
        ..DesignState::default()
    };
    let img = placed(200, 100);
    let plan = compile(&design, Some(&img), 1);

    let kinds: Vec<&str> = plan
        .ops
        .iter()
        .map(|op| match op {
            DrawOp::Background { .. } => "bg",
            DrawOp::Frame { .. } => "frame",
            DrawOp::Image { .. } => "image",
            DrawOp::Text { role, .. } => match role {
                TextRole::Title => "title",
                TextRole::Message => "message",
                TextRole::Date => "date",
                TextRole::Recipient => "recipient",
            },
            DrawOp::Speckle { .. } => "speckle",
        })
        .collect();
    assert_eq!(
        &kinds[..7],
        &["bg", "frame", "image", "title", "message", "date", "recipient"]
    );
    assert!(kinds[7..].iter().all(|k| *k == "speckle"));
    assert_eq!(kinds.len(), 7 + 6);
}

#[test]
fn frame_is_inset_and_keyed_by_occasion() {
    let design = DesignState {
        occasion: Occasion::Invitation,
        ..DesignState::default()
    };
    let plan = compile(&design, None, 1);
    let DrawOp::Frame {
        rect,
        radius,
        color,
        ..
    } = &plan.ops[1]
    else {
        panic!("expected frame op");
    };
    assert_eq!(*rect, Rect::new(8.0, 8.0, 992.0, 992.0));
    assert_eq!(*radius, 18.0);
    assert_eq!(*color, Palette::for_key("invitation").border);
}

#[test]
fn empty_fields_use_fallbacks() {
    let plan = compile(&DesignState::default(), None, 1);
    assert_eq!(plan.texts(TextRole::Title).count(), 0);
    assert_eq!(plan.texts(TextRole::Date).count(), 0);
    assert_eq!(
        plan.texts(TextRole::Message).collect::<Vec<_>>(),
        vec![DEFAULT_MESSAGE]
    );
    assert_eq!(
        plan.texts(TextRole::Recipient).collect::<Vec<_>>(),
        vec!["— Someone Special"]
    );
}

#[test]
fn title_color_falls_back_to_palette_accent() {
    let design = DesignState {
        title: "Yay".to_owned(),
        title_color: None,
        occasion: Occasion::Anniversary,
        ..DesignState::default()
    };
    let plan = compile(&design, None, 1);
    let color = plan.ops.iter().find_map(|op| match op {
        DrawOp::Text {
            role: TextRole::Title,
            color,
            ..
        } => Some(*color),
        _ => None,
    });
    assert_eq!(color, Some(Palette::for_key("anniversary").accent));
}

#[test]
fn text_column_shifts_right_when_image_present() {
    let design = DesignState {
        title: "Hi".to_owned(),
        ..DesignState::default()
    };
    let plan = compile(&design, None, 1);
    assert_eq!(text_x(&plan, TextRole::Title), Some(80.0));
    assert_eq!(text_x(&plan, TextRole::Message), Some(80.0));

    let img = placed(50, 50);
    let plan = compile(&design, Some(&img), 1);
    assert_eq!(text_x(&plan, TextRole::Title), Some(520.0));
    assert_eq!(text_x(&plan, TextRole::Recipient), Some(520.0));
}

#[test]
fn message_wraps_narrower_with_image() {
    let design = DesignState {
        message: "word ".repeat(60).trim_end().to_owned(),
        ..DesignState::default()
    };
    let without = compile(&design, None, 1).texts(TextRole::Message).count();
    let img = placed(50, 50);
    let with = compile(&design, Some(&img), 1).texts(TextRole::Message).count();
    assert!(with > without, "{with} <= {without}");

    let plan = compile(&design, None, 1);
    let baselines: Vec<f64> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text {
                role: TextRole::Message,
                baseline,
                ..
            } => Some(*baseline),
            _ => None,
        })
        .collect();
    assert_eq!(baselines[0], 150.0);
    assert_eq!(baselines[1], 182.0);
}

#[test]
fn event_date_is_calendar_prefixed_short_weekday_day_month() {
    let d = chrono::NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
    assert_eq!(format_event_date(d), "Fri, 14 Feb");
    let design = DesignState {
        event_date: Some(d),
        ..DesignState::default()
    };
    let plan = compile(&design, None, 1);
    assert_eq!(
        plan.texts(TextRole::Date).collect::<Vec<_>>(),
        vec!["📅 Fri, 14 Feb"]
    );
}

#[test]
fn speckles_are_seeded_and_inside_surface() {
    let design = DesignState::default();
    let a = compile(&design, None, 99);
    let b = compile(&design, None, 99);
    assert_eq!(a, b);

    let c = compile(&design, None, 100);
    assert_ne!(a, c);

    for op in &a.ops {
        if let DrawOp::Speckle { center, radius, .. } = op {
            assert!(center.x >= 0.0 && center.x < 1000.0);
            assert!(center.y >= 0.0 && center.y < 1000.0);
            assert!(*radius >= 2.0 && *radius < 8.0);
        }
    }
}

#[test]
fn cover_fit_crops_centered_overflow() {
    // Wide source into a square target: crop the sides.
    let c = cover_fit_crop(400.0, 200.0, 100.0, 100.0);
    assert_eq!(c, SourceCrop { x: 100.0, y: 0.0, w: 200.0, h: 200.0 });

    // Tall source into a wide target: crop top and bottom.
    let c = cover_fit_crop(100.0, 400.0, 200.0, 100.0);
    assert_eq!(c, SourceCrop { x: 0.0, y: 175.0, w: 100.0, h: 50.0 });

    // Same aspect: whole source.
    let c = cover_fit_crop(300.0, 150.0, 600.0, 300.0);
    assert_eq!(c, SourceCrop { x: 0.0, y: 0.0, w: 300.0, h: 150.0 });
}

#[test]
fn image_op_clip_is_outset_around_effective_rect() {
    let img = placed(200, 100);
    let plan = compile(&DesignState::default(), Some(&img), 1);
    let op = plan
        .ops
        .iter()
        .find(|op| matches!(op, DrawOp::Image { .. }))
        .unwrap();
    let DrawOp::Image {
        rect,
        clip,
        clip_radius,
        ..
    } = op
    else {
        unreachable!()
    };
    assert_eq!(*rect, Rect::new(400.0, 450.0, 600.0, 550.0));
    assert_eq!(*clip, Rect::new(396.0, 446.0, 604.0, 554.0));
    assert_eq!(*clip_radius, 28.0);
}
