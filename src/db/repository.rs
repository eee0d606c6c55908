//! Database repository for stored games and the player index.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GamePlayerEntry, GameRecord, NewGameRecord, schema};
use crate::state::GameState;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for game records.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is invalid.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Creating GameRepository");
        if db_path.is_empty() {
            return Err(DbError::new("Database path must not be empty"));
        }
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })?;
        conn.batch_execute("PRAGMA busy_timeout = 5000;")?;
        Ok(conn)
    }

    /// Applies any schema migrations not yet run.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Inserts a game and its player index rows in one transaction.
    ///
    /// Returns `false` without writing anything if the name is already taken.
    /// The primary key makes the check and the insert a single atomic step,
    /// even against other processes sharing the file.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, record, players), fields(name = %record.name()))]
    pub fn insert_game(&self, record: NewGameRecord, players: &[String]) -> Result<bool, DbError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let inserted = diesel::insert_into(schema::games::table)
                .values(&record)
                .execute(conn);

            match inserted {
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    warn!("Game name already taken");
                    return Ok(false);
                }
                other => {
                    other?;
                }
            }

            let entries: Vec<GamePlayerEntry> = players
                .iter()
                .map(|p| GamePlayerEntry::new(record.name().clone(), p.clone()))
                .collect();
            diesel::insert_into(schema::game_players::table)
                .values(&entries)
                .execute(conn)?;

            info!(players = entries.len(), "Game inserted");
            Ok(true)
        })
    }

    /// Gets a game by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn find_game(&self, name: &str) -> Result<Option<GameRecord>, DbError> {
        debug!("Looking up game by name");
        let mut conn = self.connection()?;

        let record = schema::games::table
            .filter(schema::games::name.eq(name))
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(record)
    }

    /// Loads, changes and stores a game inside one immediate transaction.
    ///
    /// The state is written back whatever `change` returns. Returns `None` if
    /// the game does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or the record is corrupt.
    #[instrument(skip(self, change))]
    pub fn update_game<T>(
        &self,
        name: &str,
        change: impl FnOnce(&mut GameState) -> T,
    ) -> Result<Option<T>, DbError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let record: Option<GameRecord> = schema::games::table
                .filter(schema::games::name.eq(name))
                .select(GameRecord::as_select())
                .first(conn)
                .optional()?;
            let Some(record) = record else {
                debug!("Game not found for update");
                return Ok(None);
            };

            let mut state = record.decode()?;
            let outcome = change(&mut state);
            let encoded = NewGameRecord::encode(&state)?;

            diesel::update(schema::games::table.filter(schema::games::name.eq(name)))
                .set(schema::games::body.eq(encoded.body()))
                .execute(conn)?;

            debug!(turn = state.turn(), "Game stored");
            Ok(Some(outcome))
        })
    }

    /// Gets every game indexed under `player`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn games_for_player(&self, player: &str) -> Result<Vec<GameRecord>, DbError> {
        let mut conn = self.connection()?;

        let names: Vec<String> = schema::game_players::table
            .filter(schema::game_players::player_name.eq(player))
            .select(schema::game_players::game_name)
            .load(&mut conn)?;

        let records = schema::games::table
            .filter(schema::games::name.eq_any(&names))
            .order(schema::games::created_at.asc())
            .select(GameRecord::as_select())
            .load(&mut conn)?;

        info!(count = records.len(), "Player games loaded");
        Ok(records)
    }

    /// Removes one player index row. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn remove_player_entry(&self, game: &str, player: &str) -> Result<bool, DbError> {
        let mut conn = self.connection()?;

        let removed = diesel::delete(
            schema::game_players::table
                .filter(schema::game_players::game_name.eq(game))
                .filter(schema::game_players::player_name.eq(player)),
        )
        .execute(&mut conn)?;

        debug!(removed, "Player index entry removed");
        Ok(removed > 0)
    }

    /// Deletes a game record. Returns its participants, or `None` if it did not exist.
    ///
    /// Player index rows are left for the caller to clean up.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or the record is corrupt.
    #[instrument(skip(self))]
    pub fn delete_game(&self, name: &str) -> Result<Option<Vec<String>>, DbError> {
        let mut conn = self.connection()?;

        conn.immediate_transaction::<_, DbError, _>(|conn| {
            let record: Option<GameRecord> = schema::games::table
                .filter(schema::games::name.eq(name))
                .select(GameRecord::as_select())
                .first(conn)
                .optional()?;
            let Some(record) = record else {
                return Ok(None);
            };

            let participants = record.decode()?.player_names().to_vec();
            diesel::delete(schema::games::table.filter(schema::games::name.eq(name)))
                .execute(conn)?;

            info!("Game record deleted");
            Ok(Some(participants))
        })
    }
}
