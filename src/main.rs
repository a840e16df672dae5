//! Result-set cache driver - Main entrypoint.
//!
//! Initializes logging, loads configuration and runs a synthetic workload
//! against a cache storage instance.

use clap::{Parser, Subcommand};
use resultset_cache_lib::config::{self, ConfigLoader, LogConfig, ResultsetCacheConfig};
use resultset_cache_lib::error::{
    CacheError, CacheResult, ErrorContext, ErrorReporter, TracingErrorReporter,
};
use resultset_cache_lib::storage::CacheStorage;
use resultset_cache_lib::workload;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the result-set cache driver.
#[derive(Parser, Debug)]
#[clap(name = "resultset_cache", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run the synthetic workload against a fresh storage
    Run {
        /// Print the workload report as JSON on stdout
        #[clap(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system. `RUST_LOG` takes precedence over the
/// configured level.
fn init_logging(log: &LogConfig) -> CacheResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(log.source_location)
        .with_file(log.source_location)
        .with_writer(std::io::stderr);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| CacheError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

fn run_workload(config: &ResultsetCacheConfig, json: bool) -> CacheResult<()> {
    let mut storage = CacheStorage::new();
    let report = workload::run(&mut storage, &config.workload)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!(
            inserted = report.inserted,
            removed = report.removed,
            keys = report.stats.keys,
            nodes = report.stats.nodes,
            max_depth = report.stats.max_depth,
            label_bytes = report.stats.label_bytes,
            "Storage statistics"
        );
    }

    storage.free();
    Ok(())
}

fn gen_config(output: &Path) -> CacheResult<()> {
    let default_config = ResultsetCacheConfig::default();

    // Create parent directories if they don't exist
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml = toml::to_string_pretty(&default_config)?;
    std::fs::write(output, toml)?;

    info!("Default configuration written to {:?}", output);
    Ok(())
}

/// Main entry point for the application.
fn main() {
    let args = Args::parse();
    let reporter = TracingErrorReporter;
    let loader = ConfigLoader::new(args.config.as_deref(), config::ENV_PREFIX);

    // Logging is configured from the file, so a bad file is reported on the
    // default subscriber settings.
    let loaded = loader.load();
    let log = loaded
        .as_ref()
        .map(|c| c.log.clone())
        .unwrap_or_default();
    if let Err(e) = init_logging(&log) {
        eprintln!("{e}");
        process::exit(1);
    }

    let command = args.command.unwrap_or(Command::Run { json: false });
    let outcome = match (command, loaded) {
        (Command::GenConfig { output }, _) => {
            info!("Generating default configuration");
            gen_config(&output).map_err(|e| ("gen-config", e))
        }
        (_, Err(e)) => Err(("config", CacheError::from(e))),
        (Command::Validate, Ok(_)) => {
            info!("Configuration validated successfully");
            Ok(())
        }
        (Command::Run { json }, Ok(config)) => {
            info!(version = resultset_cache_lib::VERSION, "Starting workload run");
            run_workload(&config, json).map_err(|e| ("workload", e))
        }
    };

    if let Err((component, error)) = outcome {
        reporter.report(ErrorContext::new(error, component));
        process::exit(1);
    }
}
