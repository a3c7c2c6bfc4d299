use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use vello_cpu::kurbo::Shape;

use crate::assets::decode::premultiply_rgba8_in_place;
use crate::design::model::DesignState;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Rect, Surface};
use crate::foundation::error::{WishlyError, WishlyResult};
use crate::placement::model::PlacedImage;
use crate::render::frame::FrameRGBA;
use crate::render::plan::{CardPlan, DrawOp, SourceCrop, SpeckleSpec, TextRole, compile_card};
use crate::render::text::{
    ApproxMeasure, FontBook, FontFace, ParleyMeasure, TextBrushRgba8, TextLayoutEngine,
    TextMeasure,
};

const PATH_TOLERANCE: f64 = 0.1;

struct RegisteredFont {
    face: FontFace,
    family: String,
}

/// CPU card renderer powered by `vello_cpu` for vector/text rasterization.
///
/// Holds the font registry and a reusable render context; everything else is per call.
pub struct CardRenderer {
    text_engine: TextLayoutEngine,
    title_font: Option<RegisteredFont>,
    body_font: Option<RegisteredFont>,
    speckles: SpeckleSpec,
    ctx: Option<vello_cpu::RenderContext>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    start: [u8; 4],
    end: [u8; 4],
    w: u32,
    h: u32,
}

impl CardRenderer {
    /// Renderer with the given fonts. Empty slots fall back to the bundled faces.
    pub fn new(fonts: FontBook, speckles: SpeckleSpec) -> WishlyResult<Self> {
        if fonts.title.is_none() || fonts.body.is_none() {
            tracing::debug!(
                title = fonts.title.is_some(),
                body = fonts.body.is_some(),
                "using bundled faces for unset card fonts"
            );
        }
        let fonts = fonts.or_bundled()?;
        let mut text_engine = TextLayoutEngine::new();
        let title_font = register_font(&mut text_engine, fonts.title)?;
        let body_font = register_font(&mut text_engine, fonts.body)?;
        Ok(Self {
            text_engine,
            title_font,
            body_font,
            speckles,
            ctx: None,
            gradient_cache: HashMap::new(),
        })
    }

    /// Renderer without fonts: backgrounds, frame, image and speckles only.
    pub fn without_fonts(speckles: SpeckleSpec) -> Self {
        Self {
            text_engine: TextLayoutEngine::new(),
            title_font: None,
            body_font: None,
            speckles,
            ctx: None,
            gradient_cache: HashMap::new(),
        }
    }

    pub fn compile<R: Rng + ?Sized>(
        &mut self,
        design: &DesignState,
        image: Option<&PlacedImage>,
        surface: Surface,
        rng: &mut R,
    ) -> CardPlan {
        match self.body_font.as_ref() {
            Some(font) => {
                let mut measure = ParleyMeasure {
                    engine: &mut self.text_engine,
                    family: &font.family,
                };
                compile_card(design, image, surface, &mut measure, &self.speckles, rng)
            }
            None => {
                let mut measure = ApproxMeasure::default();
                compile_card(design, image, surface, &mut measure, &self.speckles, rng)
            }
        }
    }

    /// Compile and rasterize in one step.
    #[tracing::instrument(skip_all, fields(w = surface.width, h = surface.height))]
    pub fn render<R: Rng + ?Sized>(
        &mut self,
        design: &DesignState,
        image: Option<&PlacedImage>,
        surface: Surface,
        rng: &mut R,
    ) -> WishlyResult<FrameRGBA> {
        let plan = self.compile(design, image, surface, rng);
        self.execute(&plan, image)
    }

    /// Rasterize a compiled plan. `image` must be the image the plan was compiled with.
    pub fn execute(&mut self, plan: &CardPlan, image: Option<&PlacedImage>) -> WishlyResult<FrameRGBA> {
        let width: u16 = plan
            .surface
            .width
            .try_into()
            .map_err(|_| WishlyError::validation("surface width exceeds u16"))?;
        let height: u16 = plan
            .surface
            .height
            .try_into()
            .map_err(|_| WishlyError::validation("surface height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let drawn = self.draw_ops(&mut ctx, plan, image);
        let out = drawn.map(|()| {
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut pixmap);
            FrameRGBA {
                width: plan.surface.width,
                height: plan.surface.height,
                data: pixmap.data_as_u8_slice().to_vec(),
                premultiplied: true,
            }
        });
        self.ctx = Some(ctx);
        out
    }

    fn draw_ops(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        plan: &CardPlan,
        image: Option<&PlacedImage>,
    ) -> WishlyResult<()> {
        for op in &plan.ops {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match op {
                DrawOp::Background { start, end } => {
                    let paint = self.gradient_paint(*start, *end, plan.surface)?;
                    ctx.set_paint(paint);
                    ctx.fill_rect(&cpu_rect(plan.surface.rect()));
                }
                DrawOp::Frame {
                    rect,
                    radius,
                    width,
                    color,
                } => {
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                    ctx.set_paint(color.to_cpu());
                    ctx.stroke_path(&rounded_rect_path(*rect, *radius));
                }
                DrawOp::Image {
                    rect,
                    clip,
                    clip_radius,
                    shadow,
                    crop,
                } => {
                    let Some(img) = image else {
                        tracing::debug!("image op without an image; skipped");
                        continue;
                    };
                    let clip_path = rounded_rect_path(*clip, *clip_radius);
                    ctx.set_paint(shadow.to_cpu());
                    ctx.fill_path(&clip_path);

                    let Some((paint, pw, ph)) = cover_fit_paint(img, *crop, *rect)? else {
                        continue;
                    };
                    ctx.push_clip_layer(&clip_path);
                    ctx.set_transform(vello_cpu::kurbo::Affine::translate((rect.x0, rect.y0)));
                    ctx.set_paint(paint);
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, pw, ph));
                    ctx.pop_layer();
                }
                DrawOp::Text {
                    role,
                    text,
                    x,
                    baseline,
                    size_px,
                    color,
                } => {
                    self.draw_text(ctx, *role, text, *x, *baseline, *size_px, *color)?;
                }
                DrawOp::Speckle {
                    center,
                    radius,
                    color,
                } => {
                    let circle = vello_cpu::kurbo::Circle::new((center.x, center.y), *radius);
                    ctx.set_paint(color.to_cpu());
                    ctx.fill_path(&circle.to_path(PATH_TOLERANCE));
                }
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        role: TextRole,
        text: &str,
        x: f64,
        baseline: f64,
        size_px: f32,
        color: Rgba8,
    ) -> WishlyResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        let font = match role {
            TextRole::Title => self.title_font.as_ref().or(self.body_font.as_ref()),
            TextRole::Message | TextRole::Date | TextRole::Recipient => self.body_font.as_ref(),
        };
        let Some(font) = font else {
            return Ok(());
        };
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = self
            .text_engine
            .layout_line(text, &font.family, size_px, brush)?;
        let ascent = layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().ascent))
            .unwrap_or(0.0);

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, baseline - ascent)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font.face.data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn gradient_paint(
        &mut self,
        start: Rgba8,
        end: Rgba8,
        surface: Surface,
    ) -> WishlyResult<vello_cpu::Image> {
        let key = GradientKey {
            start: [start.r, start.g, start.b, start.a],
            end: [end.r, end.g, end.b, end.a],
            w: surface.width,
            h: surface.height,
        };
        if let Some(img) = self.gradient_cache.get(&key) {
            return Ok(img.clone());
        }
        let bytes = gradient_pixels(start, end, surface);
        let img = rgba_premul_to_image(&bytes, surface.width, surface.height)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }

    /// Measure a string with the body font (or the font-free estimate).
    pub fn measure(&mut self, text: &str, size_px: f32) -> f64 {
        match self.body_font.as_ref() {
            Some(font) => ParleyMeasure {
                engine: &mut self.text_engine,
                family: &font.family,
            }
            .measure(text, size_px),
            None => ApproxMeasure::default().measure(text, size_px),
        }
    }
}

fn register_font(
    engine: &mut TextLayoutEngine,
    face: Option<FontFace>,
) -> WishlyResult<Option<RegisteredFont>> {
    let Some(face) = face else {
        return Ok(None);
    };
    let family = engine.register(face.bytes())?;
    Ok(Some(RegisteredFont { face, family }))
}

fn cpu_rect(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn rounded_rect_path(r: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    let radius = radius.min(r.width().abs() / 2.0).min(r.height().abs() / 2.0).max(0.0);
    vello_cpu::kurbo::RoundedRect::new(r.x0, r.y0, r.x1, r.y1, radius).to_path(PATH_TOLERANCE)
}

/// Diagonal two-stop gradient from the top-left to the bottom-right corner, sampled at pixel
/// centers and projected onto the diagonal.
pub(crate) fn gradient_pixels(start: Rgba8, end: Rgba8, surface: Surface) -> Vec<u8> {
    let (w, h) = (surface.width, surface.height);
    let (wf, hf) = (surface.width_f64(), surface.height_f64());
    let denom = wf * wf + hf * hf;
    let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
    let s = start.to_premul();
    let e = end.to_premul();
    let lerp = |a: u8, b: u8, t: f64| -> u8 {
        let af = f64::from(a);
        let bf = f64::from(b);
        (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
    };
    for y in 0..h {
        let py = f64::from(y) + 0.5;
        for x in 0..w {
            let px = f64::from(x) + 0.5;
            let t = ((px * wf + py * hf) / denom).clamp(0.0, 1.0);
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx] = lerp(s.r, e.r, t);
            bytes[idx + 1] = lerp(s.g, e.g, t);
            bytes[idx + 2] = lerp(s.b, e.b, t);
            bytes[idx + 3] = lerp(s.a, e.a, t);
        }
    }
    bytes
}

/// Sample `crop` of the source and scale it into the effective rectangle's pixel size.
pub(crate) fn cover_fit_pixels(
    img: &PlacedImage,
    crop: SourceCrop,
    rect: Rect,
) -> Option<image::RgbaImage> {
    let src = img.source.pixels();
    let (sw, sh) = (src.width(), src.height());
    let x0 = crop.x.round().clamp(0.0, f64::from(sw - 1)) as u32;
    let y0 = crop.y.round().clamp(0.0, f64::from(sh - 1)) as u32;
    let cw = (crop.w.round() as i64).clamp(1, i64::from(sw - x0)) as u32;
    let ch = (crop.h.round() as i64).clamp(1, i64::from(sh - y0)) as u32;

    let tw = rect.width().round();
    let th = rect.height().round();
    if !(tw >= 1.0 && th >= 1.0) || tw > f64::from(u16::MAX) || th > f64::from(u16::MAX) {
        return None;
    }
    let cropped = image::imageops::crop_imm(src, x0, y0, cw, ch).to_image();
    Some(image::imageops::resize(
        &cropped,
        tw as u32,
        th as u32,
        image::imageops::FilterType::Triangle,
    ))
}

fn cover_fit_paint(
    img: &PlacedImage,
    crop: SourceCrop,
    rect: Rect,
) -> WishlyResult<Option<(vello_cpu::Image, f64, f64)>> {
    let Some(scaled) = cover_fit_pixels(img, crop, rect) else {
        return Ok(None);
    };
    let (w, h) = scaled.dimensions();
    let mut bytes = scaled.into_raw();
    premultiply_rgba8_in_place(&mut bytes);
    let paint = rgba_premul_to_image(&bytes, w, h)?;
    Ok(Some((paint, f64::from(w), f64::from(h))))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> WishlyResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| WishlyError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| WishlyError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(WishlyError::validation("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> WishlyResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
