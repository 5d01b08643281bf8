mod cli;
mod config;
mod credential;
mod error;
mod fetcher;
mod hub;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use credential::Credential;
use fetcher::Fetcher;
use hub::{CacheStatus, HfHub, WeightStatus};

fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::from_env().with_overrides(
        cli.model.clone(),
        cli.revision.clone(),
        cli.cache_dir.clone(),
    );
    config
        .validate()
        .context("Invalid configuration (check --model/--revision and LLAMA_FETCH_*)")?;
    Ok(config)
}

fn print_status(status: &CacheStatus) {
    let cached = |present: bool| if present { "cached" } else { "missing" };

    println!("{} @ {}", status.model_id, status.revision);
    match &status.snapshot_dir {
        Some(dir) => println!("  Snapshot: {:?}", dir),
        None => println!("  Snapshot: not cached"),
    }
    println!("  Tokenizer: {}", cached(status.tokenizer));
    println!("  Config: {}", cached(status.config));
    match &status.weights {
        WeightStatus::Missing => println!("  Weights: missing"),
        WeightStatus::Partial { cached, total, .. } => {
            println!("  Weights: partial ({} of {} shards)", cached, total)
        }
        WeightStatus::Complete { layout, files } => {
            println!("  Weights: cached ({} files, {:?})", files, layout.format())
        }
    }
    if !status.is_complete() {
        println!("\nRun 'llama-fetch fetch' to download the missing files.");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = resolve_config(&cli)?;

    match cli.command.clone().unwrap_or_default() {
        Commands::Fetch { token, no_progress } => {
            // Resolved before anything is printed or requested.
            let credential = Credential::resolve(token, &config.token_env)?;
            config.progress = !no_progress;

            let fetcher = Fetcher::new(HfHub::new(&config), config.model_id.clone(), credential);
            tracing::debug!("Fetching {} at revision {}", fetcher.model_id(), config.revision);

            let stdout = std::io::stdout();
            fetcher
                .run(&mut stdout.lock())
                .with_context(|| format!("Could not fetch {}", config.model_id))?;
        }

        Commands::Status => {
            let status = hub::cache_status(&config)?;
            print_status(&status);
        }
    }

    Ok(())
}
