//! SQLite persistence for games and the player index.

mod error;
mod models;
mod persister;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{GamePlayerEntry, GameRecord, NewGameRecord};
pub use persister::SqlitePersister;
pub use repository::GameRepository;
