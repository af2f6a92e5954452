//! # Dream Car Builder CLI (`dreamcar`)
//!
//! Drives the VIN decoder, the recommendation engine, the build wizard,
//! and the affiliate counters from the command line.
//!
//! ## Usage
//!
//! ```bash
//! dreamcar [--config ./config/dreamcar.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dreamcar vin check <VIN>` | Validate a VIN locally |
//! | `dreamcar vin decode <VIN>` | Validate and look up a VIN |
//! | `dreamcar recommend` | Recommend products for a context |
//! | `dreamcar catalog` | List the product catalog |
//! | `dreamcar click <ID>` | Record an affiliate click |
//! | `dreamcar convert <ID> <AMOUNT>` | Record a purchase |
//! | `dreamcar stats` | Show affiliate performance |
//! | `dreamcar build` | Walk the build wizard and show its recommendations |
//!
//! ## Examples
//!
//! ```bash
//! dreamcar vin decode 1HGCM82633A004352
//! dreamcar recommend --build-type track --vehicle "Honda Civic Si"
//! dreamcar recommend --page gallery --json
//! dreamcar build --vehicle "Subaru WRX" --build-type autocross --step 1
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dreamcar::build_cmd::{self, BuildArgs};
use dreamcar::config::{self, Config};
use dreamcar::recommend_cmd::{self, RecommendArgs};
use dreamcar::{logging, stats, vin_cmd};

/// Dream Car Builder: VIN decoding, build planning, and parts recommendations.
#[derive(Parser)]
#[command(name = "dreamcar", version)]
struct Cli {
    /// Path to configuration file (TOML). Built-in defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate or decode a Vehicle Identification Number.
    Vin {
        #[command(subcommand)]
        action: VinAction,
    },

    /// Recommend catalog products for a build context.
    ///
    /// Filters apply in order: category, build type, vehicle, keywords.
    /// Results are ranked by rating and capped at six.
    Recommend {
        /// Category substring, e.g. `suspension`.
        #[arg(long)]
        category: Option<String>,

        /// Build type: track, drift, drag, street, show, autocross.
        #[arg(long)]
        build_type: Option<String>,

        /// Vehicle description, e.g. `"Ford Mustang GT"`.
        #[arg(long)]
        vehicle: Option<String>,

        /// Keyword to match against product keywords (repeatable).
        #[arg(long = "keyword")]
        keywords: Vec<String>,

        /// Start from a page preset: gallery, homepage, or general.
        #[arg(long)]
        page: Option<String>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List every product in the catalog.
    Catalog,

    /// Record an affiliate click and print the product's link.
    Click {
        /// Product id.
        id: String,
    },

    /// Record a purchase attributed to a product.
    Convert {
        /// Product id.
        id: String,
        /// Purchase amount, e.g. `89.99` or `$1,299.99`.
        amount: String,
    },

    /// Show affiliate performance counters.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Walk the build wizard and show the recommendation panel's updates.
    Build {
        /// Decode a VIN and use it as the vehicle.
        #[arg(long, conflicts_with = "vehicle")]
        vin: Option<String>,

        /// Describe the vehicle by hand.
        #[arg(long)]
        vehicle: Option<String>,

        /// Build type to select.
        #[arg(long)]
        build_type: Option<String>,

        /// Wizard step to finish on (1-4).
        #[arg(long)]
        step: Option<u8>,

        /// Print the build summary as JSON.
        #[arg(long)]
        export: bool,
    },
}

#[derive(Subcommand)]
enum VinAction {
    /// Validate a VIN locally, without any network call.
    Check { vin: String },

    /// Validate, then look the vehicle up.
    Decode {
        vin: String,

        /// Print the vehicle record as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    logging::init(&cfg.logging);

    match cli.command {
        Commands::Vin { action } => match action {
            VinAction::Check { vin } => vin_cmd::run_check(&vin)?,
            VinAction::Decode { vin, json } => vin_cmd::run_decode(&cfg, &vin, json).await?,
        },
        Commands::Recommend {
            category,
            build_type,
            vehicle,
            keywords,
            page,
            json,
        } => {
            let args = RecommendArgs {
                category,
                build_type,
                vehicle,
                keywords,
                page,
                json,
            };
            recommend_cmd::run_recommend(&cfg, &args)?;
        }
        Commands::Catalog => recommend_cmd::run_catalog(&cfg)?,
        Commands::Click { id } => stats::run_click(&cfg, &id)?,
        Commands::Convert { id, amount } => stats::run_convert(&cfg, &id, &amount)?,
        Commands::Stats { json } => stats::run_stats(&cfg, json)?,
        Commands::Build {
            vin,
            vehicle,
            build_type,
            step,
            export,
        } => {
            let args = BuildArgs {
                vin,
                vehicle,
                build_type,
                step,
                export,
            };
            build_cmd::run_build(&cfg, &args).await?;
        }
    }

    Ok(())
}
