use anyhow::Context;
use bvh_landmarks::{bvh_to_landmarks, MapperConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Convert a .bvh capture into 33-point pose landmark JSON
#[derive(Parser, Debug)]
#[command(name = "bvh-landmarks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// .bvh file to convert
    input: PathBuf,

    /// Where to write the JSON (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Mapper config JSON (scale, offset, width, height, visibility)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Indent the JSON
    #[arg(long)]
    pretty: bool,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            MapperConfig::from_json_str(&json)?
        }
        None => MapperConfig::default(),
    };

    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let poses = bvh_to_landmarks(&text, &config)
        .with_context(|| format!("converting {}", cli.input.display()))?;
    info!(
        frames = poses.frame_count,
        frame_rate = poses.frame_rate,
        "converted {}",
        cli.input.display()
    );

    let json = if cli.pretty {
        poses.to_json_pretty()?
    } else {
        poses.to_json()?
    };
    match &cli.output {
        Some(path) => std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
