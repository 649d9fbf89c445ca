use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use compute::{Facility, facilities_from_json, fixtures::nyc_facilities};
use foundation::math::{GeoCoordinate, Rotation};
use scene::{CategoryFilter, HotspotSet, fixtures::globe_hotspots};
use serde::Serialize;
use tools::{PickRequest, markers_report, pick_report, rank_report};
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::ViewerConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless tools for the recycling globe")]
struct Args {
    /// Viewer config JSON (defaults plus GLOBE_* environment overrides if omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the marker set for a filter as JSON
    Markers {
        /// all | plastic | ewaste | recycling
        #[arg(long, default_value = "all")]
        filter: String,

        /// Hotspot JSON file (defaults to the built-in globe dataset)
        #[arg(long)]
        hotspots: Option<PathBuf>,
    },

    /// Resolve a click at a pixel position to a hotspot
    Pick {
        #[arg(long)]
        x: f64,

        #[arg(long)]
        y: f64,

        #[arg(long, default_value_t = 800.0)]
        width: f64,

        #[arg(long, default_value_t = 600.0)]
        height: f64,

        #[arg(long, default_value = "all")]
        filter: String,

        /// Globe yaw in radians
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        yaw: f64,

        /// Globe pitch in radians
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        pitch: f64,

        /// Camera distance (clamped to the configured bounds)
        #[arg(long)]
        zoom: Option<f64>,

        #[arg(long)]
        hotspots: Option<PathBuf>,
    },

    /// Rank recycling facilities by distance
    Rank {
        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,

        /// Free-text item description used to narrow facility categories
        #[arg(long)]
        hint: Option<String>,

        /// Facility JSON file (defaults to the built-in NYC dataset)
        #[arg(long)]
        facilities: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Markers { filter, hotspots } => {
            let set = load_hotspots(hotspots.as_ref())?;
            let rows = markers_report(&config, &set, parse_filter(&filter)?)?;
            info!("{} markers", rows.len());
            print_json(&rows)
        }
        Command::Pick {
            x,
            y,
            width,
            height,
            filter,
            yaw,
            pitch,
            zoom,
            hotspots,
        } => {
            let req = PickRequest {
                x,
                y,
                width,
                height,
                filter: parse_filter(&filter)?,
                rotation: Rotation::new(yaw, pitch),
                zoom,
            };
            let report = pick_report(&config, load_hotspots(hotspots.as_ref())?, &req)?;
            print_json(&report)
        }
        Command::Rank {
            lat,
            lng,
            hint,
            facilities,
        } => {
            let user = match (lat, lng) {
                (Some(lat), Some(lng)) => {
                    Some(GeoCoordinate::new(lat, lng).map_err(|e| e.to_string())?)
                }
                _ => None,
            };
            let list = load_facilities(facilities.as_ref())?;
            let report = rank_report(&config, list, user, hint).await;
            print_json(&report)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig, String> {
    match path {
        Some(p) => {
            let raw = fs::read_to_string(p).map_err(|e| format!("read {p:?}: {e}"))?;
            ViewerConfig::from_json_str(&raw).map_err(|e| e.to_string())
        }
        None => ViewerConfig::from_env().map_err(|e| e.to_string()),
    }
}

fn load_hotspots(path: Option<&PathBuf>) -> Result<HotspotSet, String> {
    match path {
        Some(p) => {
            let raw = fs::read_to_string(p).map_err(|e| format!("read {p:?}: {e}"))?;
            HotspotSet::from_json(&raw).map_err(|e| e.to_string())
        }
        None => globe_hotspots().map_err(|e| e.to_string()),
    }
}

fn load_facilities(path: Option<&PathBuf>) -> Result<Vec<Facility>, String> {
    match path {
        Some(p) => {
            let raw = fs::read_to_string(p).map_err(|e| format!("read {p:?}: {e}"))?;
            facilities_from_json(&raw).map_err(|e| e.to_string())
        }
        None => nyc_facilities().map_err(|e| e.to_string()),
    }
}

fn parse_filter(raw: &str) -> Result<CategoryFilter, String> {
    raw.parse::<CategoryFilter>()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{out}");
    Ok(())
}
