use crate::config::{icon_filename, IconStyle, DEFAULT_OUTPUT_DIR, REQUIRED_SIZES};
use crate::contents_json::{write_contents_json, ContentsFile};
use crate::render::IconRenderer;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, ImageEncoder, RgbImage,
};
use std::{
    fs::{create_dir_all, File},
    io::Write,
    path::{Path, PathBuf},
};

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct Options {
    pub output: PathBuf,
    pub sizes: Vec<u32>,
    pub style: IconStyle,
    /// Also write the asset catalog's Contents.json
    pub contents_json: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sizes: REQUIRED_SIZES.to_vec(),
            style: IconStyle::default(),
            contents_json: false,
        }
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct Report {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(u32, anyhow::Error)>,
    pub contents_json: Option<PathBuf>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of distinct sizes attempted.
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}

/// `sizes` with repeats dropped, first occurrence kept.
fn unique_sizes(sizes: &[u32]) -> Vec<u32> {
    let mut unique = Vec::with_capacity(sizes.len());
    for &size in sizes {
        if !unique.contains(&size) {
            unique.push(size);
        }
    }
    unique
}

/// Render every requested size into the output directory.
///
/// A size that fails to write is reported and skipped; the remaining sizes
/// are still generated. Only a missing output directory aborts the run.
pub fn generate_icons(options: &Options) -> Result<Report> {
    create_dir_all(&options.output).with_context(|| {
        format!(
            "Can't create output directory {}",
            options.output.display()
        )
    })?;

    let renderer = IconRenderer::new(options.style.clone());
    let sizes = unique_sizes(&options.sizes);
    let mut report = Report::default();

    println!("Generating icons:");
    for &size in &sizes {
        let path = options.output.join(icon_filename(size));
        match generate_icon(&renderer, size, &path) {
            Ok(()) => {
                println!("  ✓ {size}x{size}");
                report.written.push(path);
            }
            Err(err) => {
                tracing::error!("failed to generate {}: {err:#}", path.display());
                eprintln!("  ✗ {size}x{size}: {err:#}");
                report.failed.push((size, err));
            }
        }
    }

    if options.contents_json {
        let produced: Vec<u32> = sizes
            .iter()
            .copied()
            .filter(|size| !report.failed.iter().any(|(failed, _)| failed == size))
            .collect();
        let path = write_contents_json(&options.output, &ContentsFile::for_sizes(&produced))?;
        println!("  ✓ Generated Contents.json");
        report.contents_json = Some(path);
    }

    Ok(report)
}

/// Render one icon and save it to `path`.
pub fn generate_icon(renderer: &IconRenderer, size: u32, path: &Path) -> Result<()> {
    let image = renderer.render(size);
    save_png(&image, path)
}

/// Encode `image` fully in memory, then write it out.
///
/// If the write fails midway the partial file is removed. A file that could
/// not be opened in the first place is left alone.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    write_png(image, &mut buf).context("Failed to encode PNG")?;

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    if let Err(err) = file.write_all(&buf).and_then(|()| file.flush()) {
        drop(file);
        let _ = std::fs::remove_file(path);
        return Err(err).with_context(|| format!("Failed to write {}", path.display()));
    }
    Ok(())
}

// Encode image data as PNG with the best compression
fn write_png<W: Write>(image: &RgbImage, w: W) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)?;
    Ok(())
}

/// Print the closing summary for a run.
pub fn print_summary(options: &Options, report: &Report) {
    println!();
    if report.is_success() {
        println!("✅ All icons generated successfully!");
    } else {
        println!(
            "⚠️  Generated {} of {} icons",
            report.written.len(),
            report.total()
        );
        for (size, err) in &report.failed {
            println!("   ✗ {}: {err:#}", icon_filename(*size));
        }
    }
    println!("📁 Location: {}/", options.output.display());
    for path in &report.written {
        if let Some(name) = path.file_name() {
            println!("   • {}", name.to_string_lossy());
        }
    }

    if report.contents_json.is_none() {
        println!();
        println!("⚠️  Next: Update Contents.json and rebuild in Xcode");
    }
}
