//! Raster primitives: transparent layers, shape fills and alpha compositing.
//!
//! Every pass of the renderer paints into a fresh [`Layer`] and is then
//! flattened onto the opaque base canvas with [`composite`]. Both painting
//! and flattening go through the same source-over blend.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Source-over blend of `src` onto a possibly translucent `dst`.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let out = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        out.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Blend `src` onto an opaque pixel: `dst * (1 - a) + src * a`.
pub fn blend_opaque(dst: Rgb<u8>, src: Rgba<u8>) -> Rgb<u8> {
    let a = src[3] as f32 / 255.0;
    let channel = |s: u8, d: u8| -> u8 {
        (d as f32 * (1.0 - a) + s as f32 * a).round().clamp(0.0, 255.0) as u8
    };
    Rgb([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
    ])
}

/// Flatten `layer` onto the opaque `canvas`. Both must have the same dimensions.
pub fn composite(canvas: &mut RgbImage, layer: &Layer) {
    debug_assert_eq!(canvas.dimensions(), layer.pixels.dimensions());

    for (dst, src) in canvas.pixels_mut().zip(layer.pixels.pixels()) {
        if src[3] == 0 {
            continue;
        }
        *dst = blend_opaque(*dst, *src);
    }
}

/// Axis-aligned rectangle with circular corners.
///
/// Corners are inclusive pixel coordinates, so `[0, 0, 9, 9]` covers a
/// 10x10 block. The radius is clamped to half the shorter side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundedRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
    pub radius: i32,
}

impl RoundedRect {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32, radius: i32) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            radius,
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            ..self
        }
    }

    /// Shrink the rectangle by `by` pixels on every side, keeping the corners concentric.
    pub fn inset(self, by: i32) -> Self {
        Self {
            x0: self.x0 + by,
            y0: self.y0 + by,
            x1: self.x1 - by,
            y1: self.y1 - by,
            radius: (self.radius - by).max(0),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        if x < self.x0 || x > self.x1 || y < self.y0 || y > self.y1 {
            return false;
        }

        let r = self
            .radius
            .min((self.x1 - self.x0) / 2)
            .min((self.y1 - self.y0) / 2)
            .max(0);

        // Distance to the nearest point of the inner (corner-center) rectangle
        let cx = x.clamp(self.x0 + r, self.x1 - r);
        let cy = y.clamp(self.y0 + r, self.y1 - r);
        let (dx, dy) = (x - cx, y - cy);
        dx * dx + dy * dy <= r * r
    }
}

/// A transparent RGBA layer the size of the icon.
#[derive(Debug, Clone)]
pub struct Layer {
    pixels: RgbaImage,
}

impl Layer {
    pub fn new(size: u32) -> Self {
        Self {
            pixels: RgbaImage::new(size, size),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Blend `color` into the pixel at `(x, y)`. Out of bounds writes are dropped.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if color[3] == 0 || x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return;
        }
        let pixel = self.pixels.get_pixel_mut(x, y);
        *pixel = blend_over(*pixel, color);
    }

    pub fn fill_rounded_rect(&mut self, rect: RoundedRect, color: Rgba<u8>) {
        self.fill_where(rect, color, |x, y| rect.contains(x, y));
    }

    /// Paint a border `width` pixels thick just inside the outline of `rect`.
    pub fn stroke_rounded_rect(&mut self, rect: RoundedRect, width: i32, color: Rgba<u8>) {
        let inner = rect.inset(width);
        self.fill_where(rect, color, |x, y| {
            rect.contains(x, y) && !inner.contains(x, y)
        });
    }

    /// Paint row `y` wherever it falls inside `clip`.
    pub fn fill_row_within(&mut self, y: i32, clip: &RoundedRect, color: Rgba<u8>) {
        for x in clip.x0..=clip.x1 {
            if clip.contains(x, y) {
                self.blend_pixel(x, y, color);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba<u8>) {
        let bounds = RoundedRect::new(cx - radius, cy - radius, cx + radius, cy + radius, 0);
        self.fill_where(bounds, color, |x, y| {
            let (dx, dy) = (x - cx, y - cy);
            dx * dx + dy * dy <= radius * radius
        });
    }

    fn fill_where(
        &mut self,
        bounds: RoundedRect,
        color: Rgba<u8>,
        inside: impl Fn(i32, i32) -> bool,
    ) {
        let max = self.pixels.width() as i32 - 1;
        let (x0, x1) = (bounds.x0.max(0), bounds.x1.min(max));
        let (y0, y1) = (bounds.y0.max(0), bounds.y1.min(max));

        for y in y0..=y1 {
            for x in x0..=x1 {
                if inside(x, y) {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }
}
