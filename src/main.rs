//! # Oranguru CLI
//!
//! Development driver around the decision engine: load a snapshot, decide,
//! print.

use clap::Parser;
use oranguru::agent::decide;
use oranguru::config::SearchConfig;
use oranguru::data::GameData;
use oranguru::eval::evaluate;
use oranguru::io::{load_snapshot, print_decision, print_engine_info, Cli, Commands};
use oranguru::types::DecisionError;

fn main() -> Result<(), DecisionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let data = GameData::load_default();

    match cli.command {
        Commands::Decide {
            scenario,
            simulations,
            seed,
            trees,
            config,
            verbose,
        } => {
            let mut cfg = match config {
                Some(path) => SearchConfig::from_file(path)?,
                None => SearchConfig::default(),
            };
            cfg.num_simulations = simulations;
            cfg.seed = seed;
            cfg.root_parallelism = trees;
            cfg = cfg.with_env_overrides()?;

            let snapshot = load_snapshot(&scenario)?;
            let decision = decide(&snapshot, None, &cfg, data)?;
            print_decision(&decision, verbose);
        }

        Commands::Eval { scenario } => {
            let snapshot = load_snapshot(&scenario)?;
            let state = oranguru::core::ShadowState::from_snapshot(&snapshot, &data)?;
            println!("{:+.4}", evaluate(&state, &data));
        }

        Commands::Info => {
            print_engine_info(&data);
        }
    }

    Ok(())
}
