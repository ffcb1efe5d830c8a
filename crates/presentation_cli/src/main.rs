//! Belgian transit departure board CLI
//!
//! Runs departure searches and stop-name lookups in-process, using the same
//! services and configuration as the HTTP API.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;

use std::{path::PathBuf, process::ExitCode};

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use domain::{ClockTime, Network, SearchOptions};
use infrastructure::{AppConfig, LoggingConfig, build_services, init_logging};

/// Belgian transit departure board
#[derive(Debug, Parser)]
#[command(name = "betransit-cli")]
#[command(author, version, about = "Upcoming departures on SNCB, STIB and De Lijn", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "BETRANSIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show upcoming departures from a stop
    ///
    /// Example: betransit-cli departures "Bruxelles-Central" --to Namur --time 08:30
    Departures {
        /// Stop to depart from
        stop: String,

        /// Network: sncb, stib or delijn
        #[arg(short, long, default_value = "sncb")]
        network: Network,

        /// Destination stop
        #[arg(long)]
        to: Option<String>,

        /// Date as YYYY-MM-DD (default: today in Brussels)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Time as HH:MM (default: now in Brussels)
        #[arg(long)]
        time: Option<ClockTime>,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Suggest official stop names for a partial query
    Stops {
        /// Partial stop name
        query: String,

        /// Network: sncb, stib or delijn
        #[arg(short, long, default_value = "sncb")]
        network: Network,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Search moment from optional overrides, filling gaps with the current time
fn search_options(date: Option<NaiveDate>, time: Option<ClockTime>) -> SearchOptions {
    let mut options = SearchOptions::now();
    if let Some(date) = date {
        options.date = date;
    }
    if let Some(time) = time {
        options.time = time;
    }
    options
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(&LoggingConfig {
        level: log_filter_from_verbosity(cli.verbose).to_string(),
        json: false,
    })?;

    let config = load_config(cli.config.as_ref())?;
    let services = build_services(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize services: {e}"))?;

    match cli.command {
        Commands::Departures {
            stop,
            network,
            to,
            date,
            time,
            json,
        } => {
            let options = search_options(date, time);
            let result = match services
                .transport
                .fetch_transport_data(&stop, network, to.as_deref(), &options)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("{}", render::failure_message(&e));
                    return Ok(ExitCode::from(render::exit_code(&e)));
                },
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else if result.is_empty() {
                println!("{}", render::empty_message(&stop, network));
            } else {
                println!("Departures from {stop} ({network}), {}", options.describe());
                print!("{}", render::board(&result));
            }
        },

        Commands::Stops { query, network } => {
            let names = services.resolver.resolve(&query, network).await;
            if names.is_empty() {
                println!("No stops match '{query}'.");
            }
            for name in names {
                println!("{name}");
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
