//! EcoFlow CLI
//!
//! Forecast waste generation, look up collection routes, review insights
//! and check bin fill levels, either in-process or against a running
//! `ecoflow-server`.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{bins, forecast, insights, interactive, route, Backend};
use std::path::PathBuf;
use std::sync::Arc;

/// Model artifact used when neither a flag nor the config file names one
const DEFAULT_MODEL_PATH: &str = "models/waste_generation_forecasting_model.json";

/// EcoFlow waste management CLI
#[derive(Parser)]
#[command(name = "ecoflow")]
#[command(author, version, about = "CLI for EcoFlow waste management", long_about = None)]
pub struct Cli {
    /// Server URL; predict, route and bin are sent there instead of running locally
    #[arg(long, env = "ECOFLOW_API_URL")]
    pub api_url: Option<String>,

    /// Forecast model artifact for local mode (.json or .onnx)
    #[arg(long, env = "ECOFLOW_MODEL_PATH")]
    pub model: Option<PathBuf>,

    /// Output format
    #[arg(long, short, global = true)]
    pub format: Option<output::OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forecast waste generation
    Predict {
        /// Zone name, e.g. "Zone A"
        #[arg(long, short)]
        location: String,

        /// Temperature in °C
        #[arg(long, short, allow_negative_numbers = true)]
        temperature: f64,

        /// Relative humidity in %
        #[arg(long)]
        humidity: f64,

        /// Day of week, e.g. Monday
        #[arg(long, short)]
        day: String,
    },

    /// Show the collection route for a zone
    Route {
        /// Zone name, e.g. "Zone B"
        location: String,
    },

    /// Show historical waste insights
    Insights,

    /// List all bins with their fill levels
    Bins,

    /// Show the fill report for one bin
    Bin {
        /// Bin identifier, e.g. "Bin 4"
        id: String,
    },

    /// Full-screen window with a task list and per-task forms
    Interactive,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load()?;

    let format = match (cli.format, config.default_format.as_deref()) {
        (Some(format), _) => format,
        (None, Some(name)) => output::OutputFormat::from_name(name)?,
        (None, None) => output::OutputFormat::default(),
    };
    let model_path = cli
        .model
        .or(config.model_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

    let backend = match cli.api_url.or(config.api_url) {
        Some(url) => Backend::Remote(client::ApiClient::new(&url)?),
        None => Backend::Local {
            model_path: model_path.clone(),
        },
    };

    match cli.command {
        Commands::Predict {
            location,
            temperature,
            humidity,
            day,
        } => {
            forecast::predict(&backend, &location, temperature, humidity, &day, format).await?;
        }
        Commands::Route { location } => {
            route::optimize_route(&backend, &location, format).await?;
        }
        Commands::Insights => insights::show_insights(format)?,
        Commands::Bins => bins::list_bins(format)?,
        Commands::Bin { id } => bins::show_bin(&backend, &id, format).await?,
        Commands::Interactive => {
            let service = match commands::load_local_service(&model_path) {
                Ok(service) => service,
                Err(err) => {
                    output::print_warning(&format!("{:#}", err));
                    output::print_info("Forecasts are unavailable in this session");
                    commands::service_without_model()
                }
            };
            interactive::run(Arc::new(service))?;
        }
    }

    Ok(())
}
