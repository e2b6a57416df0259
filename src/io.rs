//! # CLI Definition and Scenario I/O
//!
//! The binary is a development driver: it loads a battle snapshot from a
//! JSON scenario file, runs one decision and prints the chosen action with
//! its search statistics.

use crate::agent::{Decision, DecisionAction};
use crate::core::snapshot::BattleSnapshot;
use crate::types::{DataError, DataResult};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "oranguru")]
#[command(about = "Belief-aware MCTS decision engine for Pokemon random battles")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one decision on a battle snapshot
    Decide {
        /// Path to a JSON battle snapshot
        scenario: PathBuf,
        /// MCTS simulations
        #[arg(short = 'n', long, default_value_t = 160)]
        simulations: u32,
        /// Root RNG seed
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        /// Number of root-parallel trees
        #[arg(long, default_value_t = 1)]
        trees: u32,
        /// Optional search config JSON (overridden by the flags above)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print per-action statistics
        #[arg(short, long)]
        verbose: bool,
    },
    /// Evaluate a snapshot without searching
    Eval {
        /// Path to a JSON battle snapshot
        scenario: PathBuf,
    },
    /// Print engine information
    Info,
}

/// Load a battle snapshot from a JSON file.
pub fn load_snapshot(path: impl AsRef<Path>) -> DataResult<BattleSnapshot> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| DataError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| DataError::JsonParse {
        file: path.display().to_string(),
        source: e,
    })
}

/// Pretty-print a decision.
pub fn print_decision(decision: &Decision, verbose: bool) {
    match &decision.action {
        DecisionAction::Chosen(action) => {
            println!("{} {}", "chosen:".green().bold(), action.to_string().bold());
        }
        DecisionAction::Fallback => {
            println!("{}", "no action produced; submit any legal action".red());
        }
    }
    println!(
        "simulations: {} ({} failed)",
        decision.simulations_used, decision.failed_simulations
    );

    if verbose && !decision.stats.is_empty() {
        let mut stats = decision.stats.clone();
        stats.sort_by(|a, b| b.visits.cmp(&a.visits));
        let total_visits: u32 = stats.iter().map(|s| s.visits).sum();
        println!("{}", "action                         visits      q   prior".dimmed());
        for stat in stats.iter().take(8) {
            let share = if total_visits > 0 {
                100.0 * stat.visits as f32 / total_visits as f32
            } else {
                0.0
            };
            println!(
                "{:<30} {:>5} ({:>4.1}%) {:>6.2} {:>6.3}",
                stat.action.to_string(),
                stat.visits,
                share,
                stat.q,
                stat.prior
            );
        }
    }
}

/// Print engine information.
pub fn print_engine_info(data: &crate::data::GameData) {
    println!("{}", "oranguru".bold());
    println!("  moves in dex:      {}", data.movedex.len());
    println!(
        "  role db species:   {}{}",
        data.randbats.len(),
        if data.randbats.is_empty() {
            " (not found; beliefs degrade to revealed-only)".dimmed().to_string()
        } else {
            String::new()
        }
    );
    println!("  role db override:  RANDBATS_DB_PATH");
}
