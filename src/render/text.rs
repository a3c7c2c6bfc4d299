use std::sync::Arc;

use crate::foundation::error::{WishlyError, WishlyResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Measures the advance width of a single line of text.
pub trait TextMeasure {
    fn measure(&mut self, text: &str, size_px: f32) -> f64;
}

/// Font-free estimate: every char advances `em_advance` x font size.
///
/// Used when no body font is configured, and in tests.
#[derive(Clone, Copy, Debug)]
pub struct ApproxMeasure {
    pub em_advance: f64,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        Self { em_advance: 0.55 }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure(&mut self, text: &str, size_px: f32) -> f64 {
        text.chars().count() as f64 * self.em_advance * f64::from(size_px)
    }
}

/// Greedy line breaking on single spaces.
///
/// Words accumulate into the current line until adding the next one would push the measured
/// width past `max_width`; then the line is emitted and the word starts a new one. A word wider
/// than `max_width` on its own is emitted alone, unbroken. No hyphenation, no justification.
pub fn wrap_greedy(
    text: &str,
    max_width: f64,
    size_px: f32,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split(' ') {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure.measure(&candidate, size_px) > max_width {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        } else {
            line = candidate;
        }
    }
    lines.push(line);
    lines
}

/// A font loaded from raw bytes, ready for both layout and glyph rasterization.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    pub(crate) data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl FontFace {
    pub fn from_bytes(bytes: Vec<u8>) -> WishlyResult<Self> {
        if bytes.is_empty() {
            return Err(WishlyError::validation("font bytes must be non-empty"));
        }
        let bytes = Arc::new(bytes);
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        Ok(Self { bytes, data })
    }

    pub fn from_path(path: &std::path::Path) -> WishlyResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            WishlyError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

static BUNDLED_BODY: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BUNDLED_TITLE: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif-Bold.ttf");

/// Fonts used by the title and body text layers. Empty slots are filled from the bundled faces
/// by [`CardRenderer::new`](crate::render::cpu::CardRenderer::new).
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    pub title: Option<FontFace>,
    pub body: Option<FontFace>,
}

impl FontBook {
    /// The faces shipped with the crate: DejaVu Serif Bold for titles, DejaVu Sans for body text.
    pub fn bundled() -> WishlyResult<Self> {
        Ok(Self {
            title: Some(FontFace::from_bytes(BUNDLED_TITLE.to_vec())?),
            body: Some(FontFace::from_bytes(BUNDLED_BODY.to_vec())?),
        })
    }

    /// Fill empty slots with the bundled faces.
    pub fn or_bundled(self) -> WishlyResult<Self> {
        let title = match self.title {
            Some(face) => face,
            None => FontFace::from_bytes(BUNDLED_TITLE.to_vec())?,
        };
        let body = match self.body {
            Some(face) => face,
            None => FontFace::from_bytes(BUNDLED_BODY.to_vec())?,
        };
        Ok(Self {
            title: Some(title),
            body: Some(body),
        })
    }
}

/// Stateful helper for building Parley text layouts from registered fonts.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Register font bytes and return the family name to select them with.
    pub(crate) fn register(&mut self, font_bytes: &[u8]) -> WishlyResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            WishlyError::validation("no font families registered from font bytes")
        })?;

        Ok(self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| WishlyError::validation("registered font family has no name"))?
            .to_string())
    }

    /// Shape a single unwrapped line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> WishlyResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(WishlyError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Width of a laid-out line: the widest line advance.
pub(crate) fn layout_advance(layout: &parley::Layout<TextBrushRgba8>) -> f64 {
    layout
        .lines()
        .map(|line| f64::from(line.metrics().advance))
        .fold(0.0, f64::max)
}

/// [`TextMeasure`] backed by a registered font.
pub(crate) struct ParleyMeasure<'a> {
    pub(crate) engine: &'a mut TextLayoutEngine,
    pub(crate) family: &'a str,
}

impl TextMeasure for ParleyMeasure<'_> {
    fn measure(&mut self, text: &str, size_px: f32) -> f64 {
        match self
            .engine
            .layout_line(text, self.family, size_px, TextBrushRgba8::default())
        {
            Ok(layout) => layout_advance(&layout),
            Err(_) => ApproxMeasure::default().measure(text, size_px),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
