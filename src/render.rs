//! The icon design, drawn pass by pass.
//!
//! [`IconRenderer::render`] starts from an opaque radial gradient and stacks
//! the shadow, glass card, card-stack symbol, brand label and sparkles on top
//! of it. Each pass owns one transparent [`Layer`] that is flattened onto the
//! canvas before the next pass starts, so the pass order is the z-order.

use crate::canvas::{composite, Layer, RoundedRect};
use crate::config::IconStyle;
use crate::font::{LabelError, LabelFont};
use image::{Rgb, RgbImage, Rgba};

const SHADOW_COLOR: [u8; 3] = [20, 20, 50];
const SHADOW_STEPS: i32 = 6;
const CARD_FILL: Rgba<u8> = Rgba([255, 255, 255, 35]);
const CARD_BORDER: Rgba<u8> = Rgba([255, 255, 255, 140]);
const REFLECTION_ALPHA: f32 = 25.0;
const TEXT_LINE_COLOR: Rgba<u8> = Rgba([99, 102, 241, 200]);
const LABEL_SHADOW: Rgba<u8> = Rgba([0, 0, 40, 60]);
const LABEL_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SPARKLE_CORE: Rgba<u8> = Rgba([255, 255, 255, 200]);

/// Stacked cards, back to front: offset and opacity.
const STACK: [((i32, i32), u8); 3] = [((-6, 4), 80), ((-3, 2), 120), ((0, 0), 220)];

/// Renders the icon design at arbitrary edge lengths.
///
/// The label font is resolved once, when the renderer is built, and shared by
/// every size it renders.
#[derive(Debug)]
pub struct IconRenderer {
    style: IconStyle,
    font: LabelFont,
}

impl Default for IconRenderer {
    fn default() -> Self {
        Self::new(IconStyle::default())
    }
}

impl IconRenderer {
    pub fn new(style: IconStyle) -> Self {
        let font = LabelFont::resolve(&style.font_candidates);
        Self { style, font }
    }

    /// Render the full icon as an opaque `size` x `size` image.
    pub fn render(&self, size: u32) -> RgbImage {
        let mut canvas = self.background(size);
        let card = self.card_rect(size);

        self.draw_shadow(&mut canvas, card);
        composite(&mut canvas, &self.card_layer(size, card));
        composite(&mut canvas, &self.symbol_layer(size));

        if size >= self.style.label_min_size {
            match self.label_layer(size) {
                Ok(layer) => composite(&mut canvas, &layer),
                Err(err) => tracing::debug!("skipping label at {size}px: {err}"),
            }
        }

        composite(&mut canvas, &self.sparkle_layer(size));
        canvas
    }

    /// Radial gradient from the center (start color) to the corners (end color).
    fn background(&self, size: u32) -> RgbImage {
        let center = (size / 2) as f64;
        let max_radius = (center * center * 2.0).sqrt();
        let (start, end) = (self.style.gradient_start, self.style.gradient_end);

        RgbImage::from_fn(size, size, |x, y| {
            let (dx, dy) = (x as f64 - center, y as f64 - center);
            let ratio = if max_radius > 0.0 {
                ((dx * dx + dy * dy).sqrt() / max_radius).min(1.0)
            } else {
                0.0
            };

            let lerp = |s: u8, e: u8| -> u8 {
                (s as f64 + (e as f64 - s as f64) * ratio).clamp(0.0, 255.0) as u8
            };
            Rgb([
                lerp(start[0], end[0]),
                lerp(start[1], end[1]),
                lerp(start[2], end[2]),
            ])
        })
    }

    fn card_rect(&self, size: u32) -> RoundedRect {
        let s = size as f32;
        let margin = (s * self.style.margin_ratio) as i32;
        let radius = (s * self.style.radius_ratio) as i32;
        let far = size as i32 - margin;
        RoundedRect::new(margin, margin, far, far, radius)
    }

    /// Soft drop shadow: the card silhouette, nudged down-right and faded out.
    fn draw_shadow(&self, canvas: &mut RgbImage, card: RoundedRect) {
        let [r, g, b] = SHADOW_COLOR;
        for step in (1..=SHADOW_STEPS).rev() {
            let alpha = (25 - step * 3) as u8;
            let mut layer = Layer::new(canvas.width());
            layer.fill_rounded_rect(card.offset(step, step), Rgba([r, g, b, alpha]));
            composite(canvas, &layer);
        }
    }

    fn card_layer(&self, size: u32, card: RoundedRect) -> Layer {
        let mut layer = Layer::new(size);
        layer.fill_rounded_rect(card, CARD_FILL);

        // Light reflection fading out downwards from the top edge
        let band = ((card.y1 - card.y0) as f32 * 0.4) as i32;
        for i in 0..band {
            let alpha = (REFLECTION_ALPHA * (1.0 - i as f32 / band as f32)) as u8;
            layer.fill_row_within(card.y0 + i, &card, Rgba([255, 255, 255, alpha]));
        }

        let border = (size as i32 / 250).max(2);
        layer.stroke_rounded_rect(card, border, CARD_BORDER);
        layer
    }

    /// Three stacked cards; the front one carries three "text" bars.
    fn symbol_layer(&self, size: u32) -> Layer {
        let s = size as f32;
        let card_w = (s * 0.32) as i32;
        let card_h = (s * 0.22) as i32;
        let center_x = size as i32 / 2;
        let center_y = (s * 0.38) as i32;
        let radius = (s * 0.04) as i32;
        let compact = size < self.style.compact_symbol_below;

        let mut layer = Layer::new(size);
        for (index, &((mut dx, mut dy), alpha)) in STACK.iter().enumerate() {
            if compact {
                dx = dx.div_euclid(2);
                dy = dy.div_euclid(2);
            }

            let x0 = center_x - card_w / 2 + dx;
            let y0 = center_y - card_h / 2 + dy;
            let x1 = center_x + card_w / 2 + dx;
            let y1 = center_y + card_h / 2 + dy;
            let rect = RoundedRect::new(x0, y0, x1, y1, radius);
            layer.fill_rounded_rect(rect, Rgba([255, 255, 255, alpha]));

            if index == STACK.len() - 1 {
                draw_text_lines(&mut layer, size, x0, y0, card_w, card_h);
            }
        }
        layer
    }

    fn label_layer(&self, size: u32) -> Result<Layer, LabelError> {
        let font_px = ((size as f32 * 0.16) as u32).max(10) as f32;
        let mask = self.font.rasterize(&self.style.label, font_px)?;

        let x = (size as i32 - mask.width) / 2;
        let y = (size as f32 * 0.66) as i32;
        let shadow_offset = (size as i32 / 350).max(1);

        let mut layer = Layer::new(size);
        let mut stamp = |ox: i32, oy: i32, color: Rgba<u8>| {
            for &(dx, dy, coverage) in &mask.coverage {
                let alpha = (color[3] as f32 * coverage).round() as u8;
                let tinted = Rgba([color[0], color[1], color[2], alpha]);
                layer.blend_pixel(ox + dx, oy + dy, tinted);
            }
        };

        for k in (1..=3).rev() {
            stamp(x + k * shadow_offset, y + k * shadow_offset, LABEL_SHADOW);
        }
        stamp(x, y, LABEL_COLOR);

        Ok(layer)
    }

    fn sparkle_layer(&self, size: u32) -> Layer {
        let s = size as f32;
        let spots = [
            ((s * 0.22) as i32, (s * 0.22) as i32),
            ((s * 0.78) as i32, (s * 0.28) as i32),
            ((s * 0.82) as i32, (s * 0.72) as i32),
        ];
        let core = (size as i32 / 150).max(1);

        let mut layer = Layer::new(size);
        for (sx, sy) in spots {
            for r in ((core + 1)..=(core * 3)).rev() {
                let alpha = (60.0 * (1.0 - (r - core) as f32 / (core * 2) as f32)) as u8;
                layer.fill_circle(sx, sy, r, Rgba([255, 255, 255, alpha]));
            }
            layer.fill_circle(sx, sy, core, SPARKLE_CORE);
        }
        layer
    }
}

fn draw_text_lines(layer: &mut Layer, size: u32, x0: i32, y0: i32, card_w: i32, card_h: i32) {
    let line_h = (size as i32 / 300).max(2);
    let inset = (card_w as f32 * 0.18) as i32;
    let first = y0 + (card_h as f32 * 0.3) as i32;
    let spacing = (card_h as f32 * 0.23) as i32;
    let full = card_w - 2 * inset;

    for j in 0..3 {
        let y = first + j * spacing;
        let width = if j == 2 { (full as f32 * 0.7) as i32 } else { full };
        let bar = RoundedRect::new(x0 + inset, y, x0 + inset + width, y + line_h, line_h / 2);
        layer.fill_rounded_rect(bar, TEXT_LINE_COLOR);
    }
}
