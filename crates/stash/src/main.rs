//! Stash - Entry Point
//!
//! Runs one demo against the backend picked on the command line.
//!
//! | Flag | Backend |
//! |------|---------|
//! | `--memory` | In-process moka cache |
//! | `--redis` | Redis at `127.0.0.1:6379` unless configured |
//! | `--memcache` | Memcached at `127.0.0.1:11211` unless configured |

// Force-link stash-providers to ensure linkme registrations are included
extern crate stash_providers;

use clap::Parser;
use stash::demos::Demo;
use stash::infrastructure::{ConfigLoader, default_runtime, logging::init_logging};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Command line interface for Stash
#[derive(Parser, Debug)]
#[command(name = "stash")]
#[command(about = "Stash - one cache API over memory, Redis and Memcached")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the in-process memory demo
    #[arg(long)]
    pub memory: bool,

    /// Run the Redis demo
    #[arg(long)]
    pub redis: bool,

    /// Run the Memcached demo
    #[arg(long)]
    pub memcache: bool,
}

impl Cli {
    /// First selected demo, checked in the order memory, redis, memcache
    pub fn demo(&self) -> Option<Demo> {
        if self.memory {
            Some(Demo::Memory)
        } else if self.redis {
            Some(Demo::Redis)
        } else if self.memcache {
            Some(Demo::Memcache)
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(config.logging.clone()) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let Some(demo) = cli.demo() else {
        error!("No provider found use --memory, --redis or --memcache");
        return ExitCode::FAILURE;
    };

    let runtime = default_runtime();
    match demo.run(&runtime, &config.cache).await {
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(demo = %demo, error = %e, "Demo failed");
            ExitCode::FAILURE
        }
    }
}
