use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use trailview::access::{TagSet, TravelMode, classify};
use trailview::core::config::{CliOverrides, TrailviewConfig, load_config, resolve};

#[derive(Parser)]
#[command(name = "trailview", about = "Trail access viewer for OpenStreetMap")]
struct Args {
    /// Travel mode to map access for
    #[arg(short, long, value_enum)]
    mode: Option<TravelMode>,

    /// Initial URL fragment, e.g. "selected=way/123&style=horse"
    #[arg(short, long)]
    fragment: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the category a tagged segment falls into, without starting the TUI
    Classify {
        #[arg(short, long, default_value_t, value_enum)]
        mode: TravelMode,

        /// Tags as key=value
        #[arg(value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },
}

fn parse_tag(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    if let Some(Command::Classify { mode, tags }) = args.command {
        let tags: TagSet = tags.into_iter().collect();
        println!("{}", classify(mode).categorize(&tags));
        return Ok(());
    }

    // Initialize file logger - writes to trailview.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("trailview.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = load_config().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {}", e);
        TrailviewConfig::default()
    });
    let resolved = resolve(
        &config,
        &CliOverrides {
            mode: args.mode,
            fragment: args.fragment,
        },
    );

    log::info!(
        "Trailview starting up: mode={}, api={}",
        resolved.mode,
        resolved.osm_api_base_url
    );

    trailview::tui::run(resolved)
}
