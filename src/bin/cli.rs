//! Menu Fusion CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use menu_fusion::{
    config,
    error::{AppError, Result},
    models::{Config, Dataset, Table},
    pipeline::{self, MenuTables},
    services::HttpMenuSource,
    storage::{LocalStore, RestStore},
};

/// Dining menu fusion
#[derive(Parser, Debug)]
#[command(
    name = "menu-fusion",
    version,
    about = "Fuse dining vendor menus into canonical tables"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Menu date (YYYY-MM-DD); defaults to config or today
    #[arg(long)]
    date: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and fuse all vendors, then print a summary
    Fuse {
        /// Write every canonical table as JSON into this directory
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Fetch, fuse and load tables into the store
    Load {
        /// Tables to load (repeatable); all tables when omitted
        #[arg(short, long = "table")]
        tables: Vec<Dataset>,

        /// Write to JSON files in this directory instead of the remote store
        #[arg(long)]
        dry_run: Option<PathBuf>,

        /// Remote store base URL
        #[arg(long, env = "STORE_URL")]
        store_url: Option<String>,

        /// Remote store service key
        #[arg(long, env = "STORE_KEY", hide_env_values = true)]
        store_key: Option<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging with the given default filter. `RUST_LOG` still wins.
fn init_logging(filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_secs()
        .init();
}

/// Fetch and fuse with the configured aggregator.
fn fuse(config: &Config, buildings: Table) -> Result<MenuTables> {
    let source = HttpMenuSource::new(&config.api)?;
    log::info!("Menu date: {}", source.date());
    pipeline::run_fusion(config, &source, buildings)
}

/// Main entry point for the CLI application.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_config(&cli.config);

    init_logging(config.logging.filter(cli.verbose));
    log::info!("Menu fusion starting...");

    let buildings = config::load_configured_buildings(&config, &cli.config)?;
    if let Some(date) = cli.date {
        config.api.date = Some(date);
    }

    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Fuse { out } => {
            let tables = fuse(&config, buildings)?;
            if let Some(dir) = out {
                pipeline::write_tables(&tables, &LocalStore::new(dir), &Dataset::ALL)?;
            }
        }

        Command::Load {
            tables,
            dry_run,
            store_url,
            store_key,
        } => {
            let datasets = if tables.is_empty() {
                Dataset::ALL.to_vec()
            } else {
                tables
            };

            if let Some(url) = store_url {
                config.store.url = url;
            }
            if let Some(key) = store_key {
                config.store.key = key;
            }

            match dry_run {
                Some(dir) => {
                    let store = LocalStore::new(dir);
                    let fused = fuse(&config, buildings)?;
                    pipeline::run_load(&config, &fused, &store, &datasets)?;
                }
                None => {
                    // Fail on missing credentials before fetching anything
                    let store = RestStore::new(&config.store)?;
                    let fused = fuse(&config, buildings)?;
                    pipeline::run_load(&config, &fused, &store, &datasets)?;
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} vendors)", config.vendors.len());

            match config.store.validate_remote() {
                Ok(()) => log::info!("✓ Store settings OK"),
                Err(AppError::Config(msg)) => log::warn!("Store not configured: {msg}"),
                Err(e) => return Err(e),
            }

            log::info!("All validations passed!");
        }
    }

    log::info!("Done!");

    Ok(())
}
