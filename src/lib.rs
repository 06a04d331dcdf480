//! Procedural renderer for the DailyQuipAI app icon.
//!
//! The icon is drawn from scratch at every size the iOS asset catalog asks
//! for: a radial gradient, a frosted glass card with a soft shadow, a stack
//! of cards as the symbol, the "DQ" label and a few sparkles.
//!
//! ```no_run
//! use quip_icon_gen::icon_gen::{generate_icons, Options};
//!
//! let report = generate_icons(&Options::default())?;
//! assert!(report.is_success());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod canvas;
pub mod config;
pub mod contents_json;
pub mod font;
pub mod icon_gen;
pub mod render;

pub use config::{IconStyle, REQUIRED_SIZES};
pub use render::IconRenderer;
