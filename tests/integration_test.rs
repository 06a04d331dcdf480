use image::{ColorType, GenericImageView};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const REQUIRED_SIZES: [u32; 13] = [1024, 180, 167, 152, 120, 87, 80, 76, 60, 58, 40, 29, 20];

/// Runs `quip-icon-gen -o <dir>` with no other flags and checks every
/// required size lands in the output directory, and nothing else does.
#[test]
fn test_default_run_writes_every_required_size() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("AppIcon.appiconset");

    let output = run_generator(&[], &output_dir);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Update Contents.json"));

    let mut names = list_dir(&output_dir);
    names.sort();
    let mut expected: Vec<String> = REQUIRED_SIZES
        .iter()
        .map(|s| format!("icon_{s}x{s}.png"))
        .collect();
    expected.sort();
    assert_eq!(names, expected, "exactly one file per size, nothing extra");

    for size in REQUIRED_SIZES {
        let path = output_dir.join(format!("icon_{size}x{size}.png"));
        let icon = image::open(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {e}", path.display()));

        assert_eq!(icon.width(), size);
        assert_eq!(icon.height(), size);
        assert_eq!(icon.color(), ColorType::Rgb8, "{size}x{size} should be opaque RGB");

        if size > 2 {
            assert_ne!(
                icon.get_pixel(0, 0),
                icon.get_pixel(size / 2, size / 2),
                "gradient should not be flat at {size}"
            );
        }
    }

    println!("✓ Generated {} icons with correct dimensions", REQUIRED_SIZES.len());
}

/// Two runs with the same configuration must produce identical bytes.
#[test]
fn test_output_is_deterministic() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let first = temp_dir.path().join("first");
    let second = temp_dir.path().join("second");

    for dir in [&first, &second] {
        let output = run_generator(&["--png", "180,40,20"], dir);
        assert_success(&output);
    }

    for name in ["icon_180x180.png", "icon_40x40.png", "icon_20x20.png"] {
        let a = std::fs::read(first.join(name)).expect("Failed to read first run");
        let b = std::fs::read(second.join(name)).expect("Failed to read second run");
        assert!(a == b, "{name} differs between runs");
    }
}

/// `--contents-json` adds a valid asset catalog manifest next to the icons.
#[test]
fn test_contents_json_flag() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output_dir = temp_dir.path().join("icons");

    let output = run_generator(&["--png", "120,58", "--contents-json"], &output_dir);
    assert_success(&output);

    let contents = std::fs::read_to_string(output_dir.join("Contents.json"))
        .expect("Contents.json should exist");
    let parsed: serde_json::Value =
        serde_json::from_str(&contents).expect("Contents.json should contain valid JSON");

    let images = parsed["images"].as_array().unwrap();
    assert_eq!(images.len(), 4);
    for image in images {
        let filename = image["filename"].as_str().unwrap();
        assert!(output_dir.join(filename).exists(), "{filename} missing");
        assert!(image["idiom"].is_string());
        assert!(image["size"].is_string());
        assert!(image["scale"].is_string());
    }
    assert_eq!(parsed["info"]["version"], 1);
}

/// An output path that can't be created is a fatal error with a non-zero exit.
#[test]
fn test_unwritable_output_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();

    let output = run_generator(&["--png", "20"], &blocker.join("icons"));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Can't create output directory"), "stderr: {stderr}");
}

#[test]
fn test_zero_size_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run_generator(&["--png", "0"], temp_dir.path());
    assert!(!output.status.success());
    assert!(list_dir(temp_dir.path()).is_empty());
}

fn run_generator(args: &[&str], output_dir: &Path) -> Output {
    Command::new(binary_path())
        .args(args)
        .arg("-o")
        .arg(output_dir)
        .output()
        .expect("Failed to run quip-icon-gen")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        eprintln!("Command failed with status: {}", output.status);
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
        panic!("quip-icon-gen command failed");
    }
}

fn list_dir(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .expect("Failed to read output directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_quip-icon-gen"))
}
