//! Town Emergency Simulator CLI
//!
//! Stage an emergency across a handful of town locations and let the
//! residents talk it through.
//!
//! # Example
//!
//! ```bash
//! # List the built-in locations
//! townsim locations
//!
//! # Preview an allocation
//! townsim allocate --locations 5 --seed 7
//!
//! # Full run against canned responses, no delays
//! townsim run -l 4 -r 3 -m "Hurricane Category 4 approaching" --offline --no-pace
//!
//! # Full run against a local Ollama model
//! townsim run -l 6 -r 2 -m "Chemical spill at the harbor" --model gemma3:1b
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use townsim_simulation::{
    create_simulation, MemoryChannels, PacePolicy, SimulationRunner, TextGenerator,
};
use townsim_simulator::{
    check_bounds, validate_emergency_message, FileConfig, OfflineGenerator, OllamaGenerator, Town,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "townsim")]
#[command(about = "Town emergency simulator")]
#[command(version)]
struct Cli {
    /// TOML config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// TOML town file with locations and residents (defaults to the coastal town)
    #[arg(long, global = true)]
    town: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the locations in the catalog
    Locations,

    /// Select locations and print the resident allocation
    Allocate {
        /// Number of locations (4-6)
        #[arg(short, long)]
        locations: Option<usize>,

        /// Random seed for selection and allocation (fresh and logged when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a full simulation against in-memory channels
    Run {
        /// Number of locations (4-6)
        #[arg(short, long)]
        locations: Option<usize>,

        /// Number of conversation rounds (1-10)
        #[arg(short, long)]
        rounds: Option<u32>,

        /// The emergency, as broadcast to every location
        #[arg(short, long)]
        message: String,

        /// Random seed for selection and allocation (fresh and logged when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Use canned responses instead of a model
        #[arg(long)]
        offline: bool,

        /// Ollama base URL
        #[arg(long)]
        ollama_url: Option<String>,

        /// Ollama model name
        #[arg(long)]
        model: Option<String>,

        /// Skip all pacing delays
        #[arg(long)]
        no_pace: bool,

        /// Print the report as JSON instead of the transcript
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let town = match &cli.town {
        Some(path) => Town::load(path)?,
        None => Town::coastal(),
    };

    match cli.command {
        Commands::Locations => {
            for location in town.catalog.locations() {
                println!(
                    "{} {} [{}] capacity {}",
                    location.glyph, location.name, location.kind, location.capacity
                );
                if !location.description.is_empty() {
                    println!("   {}", location.description);
                }
            }
        }

        Commands::Allocate { locations, seed } => {
            let mut config = file.simulation;
            if let Some(locations) = locations {
                config.location_count = locations;
            }
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }
            check_bounds(&config)?;

            let mut rng = ChaCha8Rng::seed_from_u64(config.resolve_seed());
            let assignment = town.allocate(config.location_count, &mut rng)?;
            println!("{}", assignment);
        }

        Commands::Run {
            locations,
            rounds,
            message,
            seed,
            offline,
            ollama_url,
            model,
            no_pace,
            json,
        } => {
            let mut config = file.simulation;
            if let Some(locations) = locations {
                config.location_count = locations;
            }
            if let Some(rounds) = rounds {
                config.round_count = rounds;
            }
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }
            if no_pace {
                config.pace = PacePolicy::none();
            }
            check_bounds(&config)?;
            validate_emergency_message(&message)?;

            let mut ollama = file.ollama;
            if let Some(url) = ollama_url {
                ollama.url = url;
            }
            if let Some(model) = model {
                ollama.model = model;
            }

            let generator: Arc<dyn TextGenerator> = if offline {
                Arc::new(OfflineGenerator::new())
            } else {
                Arc::new(
                    OllamaGenerator::new(&ollama, config.generation_timeout)
                        .context("Failed to set up the Ollama client")?,
                )
            };

            let seed = config.resolve_seed();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut record = create_simulation(
                &town.catalog,
                &town.population,
                config.location_count,
                config.round_count,
                &message,
                &mut rng,
                SystemTime::now(),
            )?;

            info!(
                simulation = %record.id(),
                locations = config.location_count,
                rounds = config.round_count,
                seed,
                offline,
                "Starting simulation"
            );

            let channels = Arc::new(MemoryChannels::new());
            let parent = channels.open_root("emergency-simulation");
            let runner = SimulationRunner::new(channels.clone(), generator, config);
            let report = runner.run(&mut record, &parent).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", channels.transcript());
                println!("{}", report);
            }
        }
    }

    Ok(())
}
