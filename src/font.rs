//! Font resolution and text rasterization for the brand label.
//!
//! Fonts are tried from an ordered candidate list; the first file that
//! loads wins. When nothing loads, a small built-in bitmap face is used so
//! the label can always be drawn.

use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Recoverable failures while preparing the label. None of these abort a render.
#[derive(Debug, Error)]
pub enum LabelError {
    #[error("can't read font {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a usable TrueType/OpenType font", .0.display())]
    Unparsable(PathBuf),
    #[error("font has no glyph for {0:?}")]
    MissingGlyph(char),
    #[error("label {0:?} produced no visible pixels")]
    EmptyLayout(String),
}

/// A label rasterized once and stamped as many times as needed.
///
/// Coverage coordinates are relative to the left edge of the ink and to the
/// top of the line box (the ascender line).
#[derive(Debug, Clone, PartialEq)]
pub struct TextMask {
    /// Ink width in pixels.
    pub width: i32,
    pub coverage: Vec<(i32, i32, f32)>,
}

/// The face used for the label.
pub enum LabelFont {
    TrueType { font: Font<'static>, path: PathBuf },
    /// Built-in 5x7 face for when no system font resolves.
    Bitmap,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelFont::TrueType { path, .. } => f.debug_tuple("TrueType").field(path).finish(),
            LabelFont::Bitmap => f.write_str("Bitmap"),
        }
    }
}

impl LabelFont {
    /// Try each candidate in order, falling back to the bitmap face.
    pub fn resolve(candidates: &[PathBuf]) -> Self {
        for path in candidates {
            match load_font(path) {
                Ok(font) => {
                    tracing::debug!("using label font {}", path.display());
                    return LabelFont::TrueType {
                        font,
                        path: path.clone(),
                    };
                }
                Err(err) => tracing::debug!("skipping font candidate: {err}"),
            }
        }

        tracing::debug!("no font candidate resolved, using built-in bitmap font");
        LabelFont::Bitmap
    }

    #[cfg(test)]
    pub(crate) fn is_fallback(&self) -> bool {
        matches!(self, LabelFont::Bitmap)
    }

    /// Rasterize `text` at a nominal height of `px` pixels.
    pub fn rasterize(&self, text: &str, px: f32) -> Result<TextMask, LabelError> {
        let mask = match self {
            LabelFont::TrueType { font, .. } => rasterize_truetype(font, text, px)?,
            LabelFont::Bitmap => rasterize_bitmap(text, px)?,
        };

        if mask.coverage.is_empty() {
            return Err(LabelError::EmptyLayout(text.to_string()));
        }
        Ok(mask)
    }
}

fn load_font(path: &Path) -> Result<Font<'static>, LabelError> {
    let data = std::fs::read(path).map_err(|source| LabelError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    // Collections (.ttc) resolve to their first face
    Font::try_from_vec_and_index(data, 0).ok_or_else(|| LabelError::Unparsable(path.to_path_buf()))
}

fn rasterize_truetype(font: &Font<'static>, text: &str, px: f32) -> Result<TextMask, LabelError> {
    if let Some(c) = text.chars().find(|&c| !c.is_whitespace() && font.glyph(c).id().0 == 0) {
        return Err(LabelError::MissingGlyph(c));
    }

    let scale = Scale::uniform(px);
    let ascent = font.v_metrics(scale).ascent;
    let glyphs: Vec<_> = font.layout(text, scale, point(0.0, ascent)).collect();

    let Some(min_x) = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .map(|bb| bb.min.x)
        .min()
    else {
        return Err(LabelError::EmptyLayout(text.to_string()));
    };

    let mut max_x = min_x;
    let mut coverage = Vec::new();
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            max_x = max_x.max(bb.max.x);
            glyph.draw(|gx, gy, v| {
                if v > 0.0 {
                    coverage.push((bb.min.x - min_x + gx as i32, bb.min.y + gy as i32, v));
                }
            });
        }
    }

    Ok(TextMask {
        width: max_x - min_x,
        coverage,
    })
}

const GLYPH_W: i32 = 5;
const GLYPH_H: i32 = 7;

fn rasterize_bitmap(text: &str, px: f32) -> Result<TextMask, LabelError> {
    let cell = ((px * 0.7 / GLYPH_H as f32).round() as i32).max(1);
    let top = ((px - (GLYPH_H * cell) as f32) / 2.0).max(0.0) as i32;
    let advance = (GLYPH_W + 1) * cell;

    let mut coverage = Vec::new();
    let mut count = 0;
    for (i, c) in text.chars().enumerate() {
        let rows = bitmap_glyph(c).ok_or(LabelError::MissingGlyph(c))?;
        let left = i as i32 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..cell {
                    for dx in 0..cell {
                        coverage.push((left + col * cell + dx, top + row as i32 * cell + dy, 1.0));
                    }
                }
            }
        }
        count += 1;
    }

    if count == 0 {
        return Err(LabelError::EmptyLayout(text.to_string()));
    }

    Ok(TextMask {
        width: count * advance - cell,
        coverage,
    })
}

fn bitmap_glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        ' ' => [0; 7],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_back_to_bitmap() {
        let candidates = vec![
            PathBuf::from("/definitely/not/here/Font.ttf"),
            PathBuf::from("/also/missing.otf"),
        ];
        let font = LabelFont::resolve(&candidates);
        assert!(font.is_fallback());
    }

    #[test]
    fn test_unparsable_candidate_is_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"this is not a font").unwrap();

        let err = load_font(&bogus).err().unwrap();
        assert!(matches!(err, LabelError::Unparsable(_)));
        assert!(LabelFont::resolve(&[bogus]).is_fallback());
    }

    #[test]
    fn test_bitmap_metrics() {
        // 10px -> one pixel per glyph cell, 6px advance, no trailing gap
        let mask = LabelFont::Bitmap.rasterize("DQ", 10.0).unwrap();
        assert_eq!(mask.width, 11);
        assert!(mask.coverage.iter().all(|&(x, _, _)| (0..11).contains(&x)));

        let large = LabelFont::Bitmap.rasterize("DQ", 163.0).unwrap();
        assert_eq!(large.width, 2 * 6 * 16 - 16);
        assert!(large.coverage.len() > mask.coverage.len());
    }

    #[test]
    fn test_bitmap_lowercase_maps_to_uppercase() {
        let upper = LabelFont::Bitmap.rasterize("DQ", 20.0).unwrap();
        let lower = LabelFont::Bitmap.rasterize("dq", 20.0).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_bitmap_errors() {
        assert!(matches!(
            LabelFont::Bitmap.rasterize("D~", 20.0),
            Err(LabelError::MissingGlyph('~'))
        ));
        assert!(matches!(
            LabelFont::Bitmap.rasterize("", 20.0),
            Err(LabelError::EmptyLayout(_))
        ));
        assert!(matches!(
            LabelFont::Bitmap.rasterize("  ", 20.0),
            Err(LabelError::EmptyLayout(_))
        ));
    }
}
