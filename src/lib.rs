//! Hanabi engine - server-side state for the cooperative card game
//!
//! Keeps the authoritative state of many concurrent games, applies turns
//! under a per-game lock, and answers each player's restricted view.
//!
//! # Architecture
//!
//! - **Ruleset**: closed set of rule variants answering every rules question
//! - **State**: the game ledger; applies pre-computed turn deltas
//! - **View**: one player's projection, hiding their own cards
//! - **Persister**: in-memory or SQLite storage with a per-player index
//! - **Turns**: rule-checked player actions built on the ledger
//!
//! # Example
//!
//! ```no_run
//! use hanabi_engine::{EngineConfig, Participant, PlayerView, Ruleset, create_game, take_turn_by_hinting_index};
//!
//! # fn example() -> Result<(), hanabi_engine::GameError> {
//! let config = EngineConfig::default();
//! let persister = config.open_persister()?;
//! let players = vec!["alice".to_string(), "bob".to_string()];
//! create_game(persister.as_ref(), &config, "first", Ruleset::default(), &players)?;
//!
//! let game = persister.read_and_write_game("first")?;
//! let alice = Participant::new("alice", "red");
//! take_turn_by_hinting_index(game.as_ref(), &alice, "bob", 1)?;
//!
//! let view = PlayerView::new(game.read()?, "bob")?;
//! println!("{} hints left", view.number_of_ready_hints());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod card;
mod config;
mod db;
mod error;
mod log;
mod persister;
mod ruleset;
mod setup;
mod simple_ai;
mod state;
mod turns;
mod view;

// Crate-level exports - Cards
pub use card::{Card, InHandCard, InferredCard, shuffle_in_place};

// Crate-level exports - Configuration
pub use config::{ConfigError, EngineConfig, StorageConfig};

// Crate-level exports - SQLite persistence
pub use db::{DbError, GamePlayerEntry, GameRecord, GameRepository, NewGameRecord, SqlitePersister};

// Crate-level exports - Errors
pub use error::{GameError, GameErrorKind};

// Crate-level exports - Logs
pub use log::{Message, RollingLog};

// Crate-level exports - Storage contract
pub use persister::{
    InMemoryPersister, ReadAndWriteState, SeedSource, StateChange, StatePersister,
};

// Crate-level exports - Rulesets
pub use ruleset::{
    RAINBOW_SUIT, Rules, Ruleset, RulesetId, StandardWithoutRainbow, WithRainbowAsCompoundSuit,
    WithRainbowAsSeparateSuit,
};

// Crate-level exports - Game lifecycle
pub use setup::create_game;
pub use simple_ai::{BotMove, choose_move};
pub use state::{GameState, Participant, PlayerNameWithHand};
pub use turns::{
    send_chat_message, take_turn_by_discarding, take_turn_by_hinting_color,
    take_turn_by_hinting_index, take_turn_by_playing,
};
pub use view::PlayerView;
