use rand::Rng;

use crate::design::model::{Background, DesignState};
use crate::design::palette::Palette;
use crate::foundation::color::{Rgba8, lighten};
use crate::foundation::core::{Point, Rect, Surface};
use crate::placement::model::PlacedImage;
use crate::render::text::{TextMeasure, wrap_greedy};

/// Lightening applied to the second stop of a custom background color.
pub const BG_LIGHTEN: f64 = 0.14;
/// Inset of the frame stroke from the surface edges.
pub const FRAME_INSET: f64 = 8.0;
pub const FRAME_RADIUS: f64 = 18.0;
pub const FRAME_WIDTH: f64 = 2.0;
pub const IMAGE_RADIUS: f64 = 20.0;
/// Outset of the image clip/shadow around the effective image rectangle.
pub const IMAGE_PAD: f64 = 4.0;
pub const TEXT_LEFT_MARGIN: f64 = 80.0;

pub const TITLE_SIZE_PX: f32 = 36.0;
pub const TITLE_BASELINE: f64 = 100.0;
pub const MESSAGE_SIZE_PX: f32 = 24.0;
pub const MESSAGE_BASELINE: f64 = 150.0;
pub const MESSAGE_LINE_HEIGHT: f64 = 32.0;
pub const DATE_SIZE_PX: f32 = 16.0;
pub const RECIPIENT_SIZE_PX: f32 = 18.0;

pub const DEFAULT_MESSAGE: &str = "Sending you love ✨";
pub const DEFAULT_RECIPIENT: &str = "Someone Special";

/// Decorative speckle parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpeckleSpec {
    pub count: u32,
    pub min_radius: f64,
    pub max_radius: f64,
}

impl Default for SpeckleSpec {
    fn default() -> Self {
        Self {
            count: 6,
            min_radius: 2.0,
            max_radius: 8.0,
        }
    }
}

/// Which font a text op is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Message,
    Date,
    Recipient,
}

/// Source sub-rectangle sampled for cover-fit, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceCrop {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// A single compositing step. Ops are drawn in order, later over earlier.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Two-stop linear gradient from the top-left to the bottom-right corner.
    Background { start: Rgba8, end: Rgba8 },
    Frame {
        rect: Rect,
        radius: f64,
        width: f64,
        color: Rgba8,
    },
    Image {
        /// Effective image rectangle.
        rect: Rect,
        /// Rounded clip/shadow rectangle around `rect`.
        clip: Rect,
        clip_radius: f64,
        shadow: Rgba8,
        crop: SourceCrop,
    },
    Text {
        role: TextRole,
        text: String,
        x: f64,
        baseline: f64,
        size_px: f32,
        color: Rgba8,
    },
    Speckle {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
}

/// Backend-agnostic description of one card render.
#[derive(Clone, Debug, PartialEq)]
pub struct CardPlan {
    pub surface: Surface,
    pub ops: Vec<DrawOp>,
}

impl CardPlan {
    pub fn texts(&self, role: TextRole) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(move |op| match op {
            DrawOp::Text { role: r, text, .. } if *r == role => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Cover-fit crop: scale to fully cover `target_w` x `target_h`, center-cropping the overflow.
pub fn cover_fit_crop(src_w: f64, src_h: f64, target_w: f64, target_h: f64) -> SourceCrop {
    let ratio = (target_w / src_w).max(target_h / src_h);
    if !ratio.is_finite() || ratio <= 0.0 {
        return SourceCrop {
            x: 0.0,
            y: 0.0,
            w: src_w,
            h: src_h,
        };
    }
    let ix = src_w / 2.0 - target_w / ratio / 2.0;
    let iy = src_h / 2.0 - target_h / ratio / 2.0;
    SourceCrop {
        x: ix,
        y: iy,
        w: src_w - ix * 2.0,
        h: src_h - iy * 2.0,
    }
}

/// Short weekday/day/month label, e.g. "Fri, 14 Feb".
pub fn format_event_date(date: chrono::NaiveDate) -> String {
    date.format("%a, %-d %b").to_string()
}

/// Compile a design into an ordered list of draw ops.
///
/// Deterministic for a given `rng` state; the speckle layer is the only consumer of `rng`.
#[tracing::instrument(skip_all, fields(w = surface.width, h = surface.height))]
pub fn compile_card<R: Rng + ?Sized>(
    design: &DesignState,
    image: Option<&PlacedImage>,
    surface: Surface,
    measure: &mut dyn TextMeasure,
    speckles: &SpeckleSpec,
    rng: &mut R,
) -> CardPlan {
    let (w, h) = (surface.width_f64(), surface.height_f64());
    let pal = Palette::for_occasion(design.occasion);
    let mut ops = Vec::with_capacity(8 + speckles.count as usize);

    let (start, end) = match design.background() {
        Background::Color(c) => (c, lighten(c, BG_LIGHTEN)),
        Background::Preset(p) => p.stops(),
    };
    ops.push(DrawOp::Background { start, end });

    ops.push(DrawOp::Frame {
        rect: Rect::new(FRAME_INSET, FRAME_INSET, w - FRAME_INSET, h - FRAME_INSET),
        radius: FRAME_RADIUS,
        width: FRAME_WIDTH,
        color: pal.border,
    });

    if let Some(img) = image {
        let rect = img.placement.effective_rect();
        let crop = cover_fit_crop(
            f64::from(img.source.width()),
            f64::from(img.source.height()),
            rect.width(),
            rect.height(),
        );
        ops.push(DrawOp::Image {
            rect,
            clip: rect.inflate(IMAGE_PAD, IMAGE_PAD),
            clip_radius: IMAGE_RADIUS + 2.0 * IMAGE_PAD,
            shadow: Rgba8::with_alpha_f(0, 0, 0, 0.04),
            crop,
        });
    }

    let text_x = if image.is_some() {
        w * 0.52
    } else {
        TEXT_LEFT_MARGIN
    };

    if !design.title.is_empty() {
        ops.push(DrawOp::Text {
            role: TextRole::Title,
            text: design.title.clone(),
            x: text_x,
            baseline: TITLE_BASELINE,
            size_px: TITLE_SIZE_PX,
            color: design.title_color.unwrap_or(pal.accent),
        });
    }

    let max_w = if image.is_some() {
        w * 0.46
    } else {
        w - 2.0 * TEXT_LEFT_MARGIN
    };
    let message = if design.message.is_empty() {
        DEFAULT_MESSAGE
    } else {
        design.message.as_str()
    };
    for (i, line) in wrap_greedy(message, max_w, MESSAGE_SIZE_PX, measure)
        .into_iter()
        .enumerate()
    {
        ops.push(DrawOp::Text {
            role: TextRole::Message,
            text: line,
            x: text_x,
            baseline: MESSAGE_BASELINE + MESSAGE_LINE_HEIGHT * i as f64,
            size_px: MESSAGE_SIZE_PX,
            color: pal.text,
        });
    }

    if let Some(date) = design.event_date {
        ops.push(DrawOp::Text {
            role: TextRole::Date,
            text: format!("📅 {}", format_event_date(date)),
            x: text_x,
            baseline: h - 96.0,
            size_px: DATE_SIZE_PX,
            color: pal.sub,
        });
    }

    let name = if design.recipient.is_empty() {
        DEFAULT_RECIPIENT
    } else {
        design.recipient.as_str()
    };
    ops.push(DrawOp::Text {
        role: TextRole::Recipient,
        text: format!("— {name}"),
        x: text_x,
        baseline: h - 48.0,
        size_px: RECIPIENT_SIZE_PX,
        color: pal.sub,
    });

    let r_lo = speckles.min_radius.max(0.0);
    let r_hi = speckles.max_radius.max(r_lo);
    for _ in 0..speckles.count {
        let center = Point::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));
        let radius = if r_hi > r_lo {
            rng.gen_range(r_lo..r_hi)
        } else {
            r_lo
        };
        ops.push(DrawOp::Speckle {
            center,
            radius,
            color: pal.decor,
        });
    }

    CardPlan { surface, ops }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
