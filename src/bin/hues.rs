use clap::Parser;
use std::fs;
use std::path::PathBuf;
use bitmap_hues::{AnalysisOptions, MinAlpha, PaletteReport, palette_from_file};
use anyhow::Context;
use anyhow::Result;

/// Report the dominant hues and an RGB palette for each input image as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors in the RGB palette
    #[arg(short = 'k', long, default_value_t = bitmap_hues::DEFAULT_COUNT)]
    count: usize,

    /// Sample every N-th pixel (must be > 0)
    #[arg(short, long, default_value_t = bitmap_hues::DEFAULT_QUALITY, allow_negative_numbers = true)]
    quality: i64,

    /// Ignore pixels whose alpha is below this value
    #[arg(short = 'a', long, default_value_t = bitmap_hues::DEFAULT_MIN_ALPHA)]
    min_alpha: u8,

    /// Split the hue histogram over this many threads
    #[arg(long, default_value_t = 1)]
    shards: usize,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,

    /// Write one <stem>.json per input here instead of printing to stdout
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Log pipeline statistics (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn to_json(report: &PaletteReport, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let options = AnalysisOptions {
        count: args.count,
        quality: args.quality,
        shards: args.shards.max(1),
    };
    let filter = MinAlpha(args.min_alpha);

    for input in &args.inputs {
        let report = palette_from_file(input, &options, &filter)
            .with_context(|| format!("analysing {} failed", input.display()))?;
        let json = to_json(&report, args.pretty)?;

        match &args.out_dir {
            Some(dir) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let out_path = dir.join(format!("{stem}.json"));
                fs::create_dir_all(dir)?;
                fs::write(&out_path, json)?;
                eprintln!("Saved → {}", out_path.display());
            }
            None => println!("{json}"),
        }
    }

    Ok(())
}
