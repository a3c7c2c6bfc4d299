use crate::assets::decode::{SourceImage, decode_image};
use crate::foundation::core::{DisplaySize, Point, Rect, Surface, Vec2};
use crate::foundation::error::WishlyResult;

/// Default image origin when no image has been placed yet.
pub const DEFAULT_ORIGIN: Point = Point::new(60.0, 60.0);

/// Tunable bounds for image placement.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlacementLimits {
    /// Longest edge of the base (unscaled) image size, in surface pixels.
    pub max_base_edge: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Fraction of the effective width/height that must stay on the surface.
    pub keep_visible: f64,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            max_base_edge: 600.0,
            min_scale: 0.5,
            max_scale: 2.0,
            keep_visible: 0.4,
        }
    }
}

impl PlacementLimits {
    pub fn clamp_scale(&self, factor: f64) -> f64 {
        let (lo, hi) = if self.min_scale <= self.max_scale {
            (self.min_scale, self.max_scale)
        } else {
            (self.max_scale, self.min_scale)
        };
        if !factor.is_finite() {
            return 1.0_f64.clamp(lo, hi);
        }
        factor.clamp(lo, hi)
    }

    fn keep(&self) -> f64 {
        self.keep_visible.clamp(0.0, 1.0)
    }
}

/// Position and size of the uploaded image on the render surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub base_w: f64,
    pub base_h: f64,
    pub scale: f64,
}

impl ImagePlacement {
    /// Fit a `src_w` x `src_h` image inside the base-size bound (aspect preserved) and center it.
    pub fn for_image(src_w: u32, src_h: u32, surface: Surface, limits: &PlacementLimits) -> Self {
        let (sw, sh) = (f64::from(src_w.max(1)), f64::from(src_h.max(1)));
        let long = sw.max(sh);
        let k = if limits.max_base_edge > 0.0 {
            (limits.max_base_edge / long).min(1.0)
        } else {
            1.0
        };
        let mut out = Self {
            x: 0.0,
            y: 0.0,
            base_w: (sw * k).max(1.0),
            base_h: (sh * k).max(1.0),
            scale: 1.0,
        };
        out.center_in(surface);
        out
    }

    pub fn effective_size(&self) -> (f64, f64) {
        (self.base_w * self.scale, self.base_h * self.scale)
    }

    pub fn effective_rect(&self) -> Rect {
        let (w, h) = self.effective_size();
        Rect::new(self.x, self.y, self.x + w, self.y + h)
    }

    /// Edges inclusive.
    pub fn contains(&self, p: Point) -> bool {
        let r = self.effective_rect();
        p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
    }

    pub fn center_in(&mut self, surface: Surface) {
        let (w, h) = self.effective_size();
        self.x = (surface.width_f64() - w) / 2.0;
        self.y = (surface.height_f64() - h) / 2.0;
    }

    /// Containment clamp: at least `keep_visible` of the effective size stays on the surface.
    pub fn clamp_to(&mut self, surface: Surface, limits: &PlacementLimits) {
        let keep = limits.keep();
        let (w, h) = self.effective_size();
        let x_min = -w * (1.0 - keep);
        let x_max = surface.width_f64() - w * keep;
        let y_min = -h * (1.0 - keep);
        let y_max = surface.height_f64() - h * keep;
        self.x = clamp_lenient(self.x, x_min, x_max);
        self.y = clamp_lenient(self.y, y_min, y_max);
    }

    /// Whether the containment bounds hold (with a small tolerance).
    pub fn is_contained(&self, surface: Surface, limits: &PlacementLimits) -> bool {
        let mut c = *self;
        c.clamp_to(surface, limits);
        (c.x - self.x).abs() < 1e-9 && (c.y - self.y).abs() < 1e-9
    }
}

// Not `f64::clamp`: that panics on an inverted range, and NaN origins must not survive.
fn clamp_lenient(v: f64, lo: f64, hi: f64) -> f64 {
    let v = if v.is_finite() { v } else { lo };
    v.max(lo).min(hi)
}

/// An uploaded image together with its placement.
#[derive(Clone, Debug)]
pub struct PlacedImage {
    pub source: SourceImage,
    pub placement: ImagePlacement,
}

/// A pointer event position, optionally in display space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub position: Point,
    /// Size of the displayed card; `None` means `position` is already in surface pixels.
    pub display: Option<DisplaySize>,
}

impl Pointer {
    pub fn surface(position: Point) -> Self {
        Self {
            position,
            display: None,
        }
    }

    pub fn display(position: Point, display: DisplaySize) -> Self {
        Self {
            position,
            display: Some(display),
        }
    }

    pub fn to_surface(self, surface: Surface) -> Point {
        match self.display {
            Some(d) => surface.display_to_surface(self.position, d),
            None => self.position,
        }
    }
}

/// Drag/scale state machine for the uploaded image.
#[derive(Clone, Debug, Default)]
pub struct PlacementModel {
    image: Option<PlacedImage>,
    drag_offset: Option<Vec2>,
    limits: PlacementLimits,
}

impl PlacementModel {
    pub fn new(limits: PlacementLimits) -> Self {
        Self {
            image: None,
            drag_offset: None,
            limits,
        }
    }

    pub fn limits(&self) -> &PlacementLimits {
        &self.limits
    }

    pub fn image(&self) -> Option<&PlacedImage> {
        self.image.as_ref()
    }

    pub fn placement(&self) -> Option<&ImagePlacement> {
        self.image.as_ref().map(|i| &i.placement)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Decode `bytes` and place the result centered at scale 1.
    ///
    /// On failure the current image and placement are left untouched.
    pub fn load_image(&mut self, bytes: &[u8], surface: Surface) -> WishlyResult<ImagePlacement> {
        let source = decode_image(bytes)?;
        Ok(self.set_image(source, surface))
    }

    pub fn set_image(&mut self, source: SourceImage, surface: Surface) -> ImagePlacement {
        let placement =
            ImagePlacement::for_image(source.width(), source.height(), surface, &self.limits);
        self.image = Some(PlacedImage { source, placement });
        self.drag_offset = None;
        placement
    }

    /// Reinstate an image with a previously saved placement; the clamp is reapplied.
    pub fn restore(&mut self, source: SourceImage, mut placement: ImagePlacement, surface: Surface) {
        placement.base_w = placement.base_w.max(1.0);
        placement.base_h = placement.base_h.max(1.0);
        placement.scale = self.limits.clamp_scale(placement.scale);
        placement.clamp_to(surface, &self.limits);
        self.image = Some(PlacedImage { source, placement });
        self.drag_offset = None;
    }

    pub fn clear_image(&mut self) {
        self.image = None;
        self.drag_offset = None;
    }

    /// Start a drag if the pointer hits the image.
    ///
    /// A miss with an image loaded recenters the image instead and returns `false`.
    pub fn begin_drag(&mut self, pointer: Pointer, surface: Surface) -> bool {
        let p = pointer.to_surface(surface);
        let Some(img) = self.image.as_mut() else {
            return false;
        };
        if img.placement.contains(p) {
            self.drag_offset = Some(Vec2::new(p.x - img.placement.x, p.y - img.placement.y));
            true
        } else {
            img.placement.center_in(surface);
            img.placement.clamp_to(surface, &self.limits);
            false
        }
    }

    /// Move the image with the pointer. Returns whether a drag was active.
    pub fn drag_to(&mut self, pointer: Pointer, surface: Surface) -> bool {
        let Some(offset) = self.drag_offset else {
            return false;
        };
        let Some(img) = self.image.as_mut() else {
            self.drag_offset = None;
            return false;
        };
        let p = pointer.to_surface(surface);
        img.placement.x = p.x - offset.x;
        img.placement.y = p.y - offset.y;
        img.placement.clamp_to(surface, &self.limits);
        true
    }

    /// Returns whether a drag was active.
    pub fn end_drag(&mut self) -> bool {
        self.drag_offset.take().is_some()
    }

    /// Set the user scale (clamped to the configured range) and re-clamp the position.
    pub fn set_scale(&mut self, factor: f64, surface: Surface) -> f64 {
        let factor = self.limits.clamp_scale(factor);
        if let Some(img) = self.image.as_mut() {
            img.placement.scale = factor;
            img.placement.clamp_to(surface, &self.limits);
        }
        factor
    }

    pub fn on_surface_resized(&mut self, surface: Surface) {
        if let Some(img) = self.image.as_mut() {
            img.placement.clamp_to(surface, &self.limits);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/placement/model.rs"]
mod tests;
