//! Database models for stored games and the player index.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::state::GameState;

/// One stored game: the ruleset identifier and creation time as columns,
/// the full state as a JSON body.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    name: String,
    ruleset: String,
    created_at: NaiveDateTime,
    body: String,
}

impl GameRecord {
    /// Rebuilds the game state stored in this record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the body is not a valid encoded state or its
    /// turn counter is zero.
    #[instrument(skip(self), fields(name = %self.name, ruleset = %self.ruleset))]
    pub fn decode(&self) -> Result<GameState, DbError> {
        let state: GameState = serde_json::from_str(&self.body)?;
        if state.ruleset().id().to_string() != self.ruleset {
            return Err(DbError::new(format!(
                "Ruleset column '{}' disagrees with stored state '{}'",
                self.ruleset,
                state.ruleset().id()
            )));
        }
        if state.turn() == 0 {
            return Err(DbError::new("Stored state has turn 0; turns start at 1"));
        }
        Ok(state)
    }
}

/// Insertable game record.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    name: String,
    ruleset: String,
    created_at: NaiveDateTime,
    body: String,
}

impl NewGameRecord {
    /// Encodes `state` for storage.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the state cannot be serialized.
    #[instrument(skip(state), fields(name = %state.name()))]
    pub fn encode(state: &GameState) -> Result<Self, DbError> {
        Ok(Self::new(
            state.name().to_string(),
            state.ruleset().id().to_string(),
            state.created_at().naive_utc(),
            serde_json::to_string(state)?,
        ))
    }
}

/// A row of the player index: `player_name` can discover `game_name`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, new, Getters)]
#[diesel(table_name = schema::game_players)]
pub struct GamePlayerEntry {
    game_name: String,
    player_name: String,
}
