//! Contents.json for the `AppIcon.appiconset` asset catalog.
//!
//! Xcode matches icon files to slots (idiom, point size, scale) through this
//! manifest. One rendered pixel size can fill several slots, e.g. the 40px
//! icon serves both the 20pt@2x notification and the 40pt@1x spotlight slot.

use crate::config::icon_filename;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Root structure of a Contents.json file
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ContentsFile {
    pub images: Vec<ImageEntry>,
    pub info: Info,
}

/// One slot of the app icon set.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub filename: String,
    /// Device family: "iphone", "ipad" or "ios-marketing"
    pub idiom: String,
    /// Point size, e.g. "60x60" or "83.5x83.5"
    pub size: String,
    /// Scale factor, e.g. "2x"
    pub scale: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Info {
    pub version: u8,
    pub author: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            version: 1,
            author: "xcode".to_string(),
        }
    }
}

/// (idiom, points, scale)
type Slot = (&'static str, &'static str, &'static str);

/// The asset catalog slots filled by an icon of `pixels` edge length.
pub fn slots_for(pixels: u32) -> &'static [Slot] {
    match pixels {
        1024 => &[("ios-marketing", "1024x1024", "1x")],
        180 => &[("iphone", "60x60", "3x")],
        167 => &[("ipad", "83.5x83.5", "2x")],
        152 => &[("ipad", "76x76", "2x")],
        120 => &[("iphone", "60x60", "2x"), ("iphone", "40x40", "3x")],
        87 => &[("iphone", "29x29", "3x")],
        80 => &[("iphone", "40x40", "2x"), ("ipad", "40x40", "2x")],
        76 => &[("ipad", "76x76", "1x")],
        60 => &[("iphone", "20x20", "3x")],
        58 => &[("iphone", "29x29", "2x"), ("ipad", "29x29", "2x")],
        40 => &[
            ("iphone", "20x20", "2x"),
            ("ipad", "20x20", "2x"),
            ("ipad", "40x40", "1x"),
        ],
        29 => &[("ipad", "29x29", "1x")],
        20 => &[("ipad", "20x20", "1x")],
        _ => &[],
    }
}

impl ContentsFile {
    /// Build the manifest for the given rendered sizes.
    ///
    /// Sizes without a known slot are left out.
    pub fn for_sizes(sizes: &[u32]) -> Self {
        let images = sizes
            .iter()
            .flat_map(|&pixels| {
                slots_for(pixels).iter().map(move |&(idiom, size, scale)| ImageEntry {
                    filename: icon_filename(pixels),
                    idiom: idiom.to_string(),
                    size: size.to_string(),
                    scale: scale.to_string(),
                })
            })
            .collect();

        Self {
            images,
            info: Info::default(),
        }
    }
}

/// Serialize `contents` into `dir/Contents.json`, returning the written path.
pub fn write_contents_json(dir: &Path, contents: &ContentsFile) -> Result<PathBuf> {
    let path = dir.join("Contents.json");
    let json =
        serde_json::to_string_pretty(contents).context("Failed to serialize Contents.json")?;
    std::fs::write(&path, json).context("Failed to write Contents.json file")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REQUIRED_SIZES;

    #[test]
    fn test_every_required_size_has_a_slot() {
        for size in REQUIRED_SIZES {
            assert!(!slots_for(size).is_empty(), "no slot for {size}");
        }
        assert!(slots_for(64).is_empty());
    }

    #[test]
    fn test_shared_sizes_fill_several_slots() {
        let contents = ContentsFile::for_sizes(&[40]);
        assert_eq!(contents.images.len(), 3);
        assert!(contents.images.iter().all(|i| i.filename == "icon_40x40.png"));
    }

    #[test]
    fn test_unknown_sizes_are_skipped() {
        let contents = ContentsFile::for_sizes(&[64, 1024]);
        assert_eq!(
            contents.images,
            vec![ImageEntry {
                filename: "icon_1024x1024.png".to_string(),
                idiom: "ios-marketing".to_string(),
                size: "1024x1024".to_string(),
                scale: "1x".to_string(),
            }]
        );
    }

    #[test]
    fn test_write_contents_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let contents = ContentsFile::for_sizes(&REQUIRED_SIZES);

        let path = write_contents_json(dir.path(), &contents).unwrap();
        assert_eq!(path, dir.path().join("Contents.json"));

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["info"]["version"], 1);
        assert_eq!(parsed["info"]["author"], "xcode");

        let images = parsed["images"].as_array().unwrap();
        assert_eq!(images.len(), 18);
        assert_eq!(images[0]["filename"], "icon_1024x1024.png");
        assert_eq!(images[2]["size"], "83.5x83.5");
        for image in images {
            assert!(image["idiom"].is_string());
            assert!(image["scale"].is_string());
        }
    }
}
