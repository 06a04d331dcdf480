//! Fixed configuration for the generated icon set.
//!
//! Everything the renderer draws is derived from [`IconStyle`] and the edge
//! length of the icon; the defaults here reproduce the shipped DailyQuipAI
//! app icon.

use image::Rgb;
use std::{path::PathBuf, str::FromStr};

/// Edge lengths required by the iOS app icon set, largest first.
pub const REQUIRED_SIZES: [u32; 13] = [
    1024, // App Store
    180,  // iPhone app 60pt@3x
    167,  // iPad Pro app 83.5pt@2x
    152,  // iPad app 76pt@2x
    120,  // iPhone app 60pt@2x, spotlight 40pt@3x
    87,   // iPhone settings 29pt@3x
    80,   // spotlight 40pt@2x
    76,   // iPad app 76pt@1x
    60,   // iPhone notification 20pt@3x
    58,   // settings 29pt@2x
    40,   // spotlight 40pt@1x, notification 20pt@2x
    29,   // settings 29pt@1x
    20,   // iPad notification 20pt@1x
];

/// Where the icons land when no `--output` is given.
pub const DEFAULT_OUTPUT_DIR: &str = "DailyQuipAI/Assets.xcassets/AppIcon.appiconset";

/// Font files tried for the label, in priority order.
pub const FONT_CANDIDATES: [&str; 7] = [
    "/System/Library/Fonts/SF-Pro-Display-Bold.otf",
    "/System/Library/Fonts/SF-Pro.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// File name of the icon rendered at `size` pixels.
pub fn icon_filename(size: u32) -> String {
    format!("icon_{size}x{size}.png")
}

/// Colors, ratios and thresholds for one icon design.
#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    /// Gradient color at the image center.
    pub gradient_start: Rgb<u8>,
    /// Gradient color at the corners.
    pub gradient_end: Rgb<u8>,
    /// Card inset from each image edge, as a fraction of the size.
    pub margin_ratio: f32,
    /// Card corner radius, as a fraction of the size.
    pub radius_ratio: f32,
    /// Brand text drawn below the symbol.
    pub label: String,
    /// Smallest size that still gets the label.
    pub label_min_size: u32,
    /// Sizes below this get halved symbol offsets.
    pub compact_symbol_below: u32,
    pub font_candidates: Vec<PathBuf>,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            gradient_start: Rgb([139, 92, 246]),
            gradient_end: Rgb([99, 102, 202]),
            margin_ratio: 0.18,
            radius_ratio: 0.22,
            label: "DQ".to_string(),
            label_min_size: 40,
            compact_symbol_below: 100,
            font_candidates: FONT_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Parse a CSS color (`#8b5cf6`, `rgb(...)`, `indigo`, ...) into an opaque RGB value.
///
/// Alpha is ignored since the background is always opaque.
pub fn parse_color(value: &str) -> Option<Rgb<u8>> {
    css_color::Srgb::from_str(value).ok().map(|color| {
        Rgb([
            (color.red * 255.).round() as u8,
            (color.green * 255.).round() as u8,
            (color.blue * 255.).round() as u8,
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames_are_unique_per_size() {
        let mut names: Vec<String> = REQUIRED_SIZES.iter().map(|&s| icon_filename(s)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), REQUIRED_SIZES.len());
        assert_eq!(icon_filename(1024), "icon_1024x1024.png");
        assert_eq!(icon_filename(20), "icon_20x20.png");
    }

    #[test]
    fn test_default_style() {
        let style = IconStyle::default();
        assert_eq!(style.gradient_start, Rgb([139, 92, 246]));
        assert_eq!(style.gradient_end, Rgb([99, 102, 202]));
        assert_eq!(style.label, "DQ");
        assert_eq!(style.label_min_size, 40);
        assert_eq!(style.font_candidates.len(), FONT_CANDIDATES.len());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#8B5CF6"), Some(Rgb([139, 92, 246])));
        assert_eq!(parse_color("#fff"), Some(Rgb([255, 255, 255])));
        assert_eq!(parse_color("not a color"), None);
    }
}
