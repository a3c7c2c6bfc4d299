use crate::foundation::error::{WishlyError, WishlyResult};

pub use kurbo::{Point, Rect, Vec2};

/// Download-quality pixel width of the render surface.
pub const BASE_SURFACE_WIDTH: u32 = 1000;

/// Pixel dimensions of the render surface.
///
/// The surface may be larger than the on-screen display; pointer input is mapped from display
/// space into surface space with [`Surface::display_to_surface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> WishlyResult<Self> {
        if width == 0 || height == 0 {
            return Err(WishlyError::validation("surface dimensions must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(WishlyError::validation("surface dimensions must fit in u16"));
        }
        Ok(Self { width, height })
    }

    /// Size the surface for a card aspect ratio (height / width).
    ///
    /// The width never drops below `base_width`; wider displays get a wider buffer.
    pub fn for_card(base_width: u32, display_width: Option<u32>, ratio: f64) -> WishlyResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(WishlyError::validation("card ratio must be finite and > 0"));
        }
        let width = base_width.max(display_width.unwrap_or(0)).max(1);
        let height = ((width as f64) * ratio).round().max(1.0) as u32;
        Self::new(width, height)
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_f64(), self.height_f64())
    }

    /// Map a pointer in display coordinates (relative to the displayed card's top-left corner)
    /// into surface pixels.
    pub fn display_to_surface(self, pointer: Point, display: DisplaySize) -> Point {
        let sx = if display.width > 0.0 {
            self.width_f64() / display.width
        } else {
            1.0
        };
        let sy = if display.height > 0.0 {
            self.height_f64() / display.height
        } else {
            1.0
        };
        Point::new(pointer.x * sx, pointer.y * sy)
    }
}

/// On-screen size of the displayed card, in display units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
