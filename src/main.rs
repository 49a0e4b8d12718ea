use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flightboard::config::BoardConfig;
use flightboard::log_format::TargetFirstFormat;
use flightboard::query::Direction;
use flightboard::render::{self, Lang};
use flightboard::{FetchError, FileFeedSource, FlightBoard, timestamp};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "flightboard",
    version,
    about = "Live arrivals, departures and flight lookup for the hub airport timetable"
)]
struct Args {
    /// Config file (default: $FLIGHTBOARD_CONFIG or ./flightboard.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the timetable XML from a file instead of the HTTP feed
    #[arg(long, global = true)]
    feed_file: Option<PathBuf>,

    /// Label language: en, ru or uz (default from config)
    #[arg(long, global = true)]
    lang: Option<Lang>,

    /// Reference time in feed format, e.g. "08.11.2025 14:10" (default: now, UTC)
    #[arg(long, global = true)]
    at: Option<String>,

    /// Print results as JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one flight by number
    Flight {
        /// Flight number as it appears in the feed, e.g. 305
        flight_no: String,
    },
    /// Upcoming arrivals to the hub
    Arrivals,
    /// Upcoming departures from the hub
    Departures,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let ansi = std::io::stderr().is_terminal();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(TargetFirstFormat::new(ansi))
        .init();
}

fn reference_time(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(raw) => timestamp::parse(raw).ok_or_else(|| {
            anyhow!(
                "Invalid --at value '{}': expected {}",
                raw,
                timestamp::FEED_TIMESTAMP_FORMAT
            )
        }),
        None => Ok(Utc::now()),
    }
}

/// Outcome of a command: text for the user, or a feed failure
async fn run(args: &Args, board: &FlightBoard, lang: Lang) -> Result<Result<String, FetchError>> {
    let output = match &args.command {
        Command::Flight { flight_no } => board.flight(flight_no).await.map(|found| {
            match (found, args.json) {
                (Some(flight), true) => serde_json::to_string_pretty(&flight)
                    .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
                (Some(flight), false) => render::render_flight(&flight, lang),
                (None, true) => "null".to_string(),
                (None, false) => render::render_not_found(flight_no, lang),
            }
        }),
        Command::Arrivals | Command::Departures => {
            let direction = match args.command {
                Command::Arrivals => Direction::Arrivals,
                _ => Direction::Departures,
            };
            let now = reference_time(args.at.as_deref())?;
            board.board(direction, now).await.map(|rows| {
                if args.json {
                    serde_json::to_string_pretty(&rows)
                        .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
                } else {
                    render::render_board(&rows, direction, board.hub(), lang)
                }
            })
        }
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();
    let config = BoardConfig::resolve(args.config.as_deref()).context("Failed to load config")?;
    let lang = args.lang.unwrap_or(config.lang);

    let board = match &args.feed_file {
        Some(path) => {
            info!("Using timetable file {:?}", path);
            FlightBoard::new(Arc::new(FileFeedSource::new(path)), &config)
        }
        None => FlightBoard::from_config(reqwest::Client::new(), &config),
    };

    match run(&args, &board, lang).await? {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            error!("Query failed: {}", e);
            println!("{}", render::render_unavailable(lang));
            std::process::exit(1);
        }
    }
}
