use anyhow::Result;
use clap::Parser;
use quip_icon_gen::{
    config::{parse_color, DEFAULT_OUTPUT_DIR},
    icon_gen::{self, Options},
    IconStyle,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "quip-icon-gen",
    about = "Render the DailyQuipAI app icon at every required iOS size"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Custom PNG icon sizes to generate. When set, only these sizes are generated.
    #[clap(
        short,
        long,
        value_delimiter = ',',
        value_name = "SIZES",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    png: Option<Vec<u32>>,

    /// Gradient color at the center (CSS color format)
    #[clap(long, value_name = "COLOR")]
    start_color: Option<String>,

    /// Gradient color at the corners (CSS color format)
    #[clap(long, value_name = "COLOR")]
    end_color: Option<String>,

    /// Brand label drawn under the symbol
    #[clap(long, value_name = "TEXT")]
    label: Option<String>,

    /// Also write the asset catalog's Contents.json
    #[clap(long)]
    contents_json: bool,

    /// Print debug diagnostics (font probing, skipped labels)
    #[clap(short, long)]
    verbose: bool,
}

fn setup_logger(verbose: bool) -> Result<()> {
    use tracing::Level;
    use tracing_subscriber::{
        filter::LevelFilter, fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, Registry,
    };

    let level = if verbose { Level::DEBUG } else { Level::WARN };
    Registry::default()
        .with(LevelFilter::from(level))
        .with(
            layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init()?;
    Ok(())
}

fn style_from_args(args: &Args) -> IconStyle {
    let mut style = IconStyle::default();

    let pick = |value: &Option<String>, flag: &str| {
        value.as_deref().and_then(|v| {
            let color = parse_color(v);
            if color.is_none() {
                tracing::warn!("ignoring invalid --{flag} {v:?}, keeping the default");
            }
            color
        })
    };
    if let Some(color) = pick(&args.start_color, "start-color") {
        style.gradient_start = color;
    }
    if let Some(color) = pick(&args.end_color, "end-color") {
        style.gradient_end = color;
    }
    if let Some(label) = &args.label {
        style.label = label.clone();
    }
    style
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logger(args.verbose)?;

    let options = Options {
        output: args.output.clone(),
        sizes: args
            .png
            .clone()
            .unwrap_or_else(|| Options::default().sizes),
        style: style_from_args(&args),
        contents_json: args.contents_json,
    };

    println!("🎨 DailyQuipAI App Icon Generator");
    println!("{}", "=".repeat(50));
    println!("Design: Glass morphism knowledge card");
    println!(
        "Colors: radial gradient {:?} → {:?}",
        options.style.gradient_start.0, options.style.gradient_end.0
    );
    println!("{}", "=".repeat(50));

    let report = icon_gen::generate_icons(&options)?;
    icon_gen::print_summary(&options, &report);

    if !report.is_success() {
        anyhow::bail!("{} of {} icons failed", report.failed.len(), report.total());
    }
    Ok(())
}
