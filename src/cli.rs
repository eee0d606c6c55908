//! Command-line interface for hanabi_engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hanabi_engine::RulesetId;

/// Hanabi engine - deal, play and inspect cooperative card games
#[derive(Parser, Debug)]
#[command(name = "hanabi_engine")]
#[command(about = "Hanabi game engine with pluggable storage", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to an engine config file (falls back to HANABI_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Deal a game and let the built-in bot play every seat to the end
    Simulate {
        /// Name for the new game
        #[arg(short, long, default_value = "simulation")]
        name: String,

        /// Ruleset identifier
        #[arg(short, long, default_value = "standard")]
        ruleset: RulesetId,

        /// Comma-separated player names, in turn order
        #[arg(short, long, value_delimiter = ',', default_value = "alice,bob,carol")]
        players: Vec<String>,

        /// Stop after this many turns even if the game is not over
        #[arg(long, default_value = "200")]
        max_turns: u32,
    },

    /// List the games a player can see
    List {
        /// Player name
        #[arg(short, long)]
        player: String,
    },

    /// Show one game from a player's seat
    Show {
        /// Game name
        #[arg(short, long)]
        game: String,

        /// Viewing player
        #[arg(short, long)]
        player: String,
    },

    /// Delete a game and remove it from every player's list
    Delete {
        /// Game name
        #[arg(short, long)]
        game: String,
    },
}
