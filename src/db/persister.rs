//! Durable persister backed by a SQLite file.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument, warn};

use crate::card::Card;
use crate::db::{GameRepository, NewGameRecord};
use crate::error::{GameError, GameErrorKind};
use crate::log::Message;
use crate::persister::{
    ReadAndWriteState, SeedSource, StateChange, StatePersister, clean_up_index, require_name,
};
use crate::ruleset::Ruleset;
use crate::state::{GameState, PlayerNameWithHand};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(name: &str) -> GameError {
    GameError::new(GameErrorKind::NotFound(name.to_string()))
}

/// Handle to one stored game. Updates hold the game's lock; reads see the
/// last committed state.
#[derive(Debug)]
struct SqliteGame {
    name: String,
    repository: GameRepository,
    lock: Arc<Mutex<()>>,
}

impl ReadAndWriteState for SqliteGame {
    fn game_name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(game = %self.name))]
    fn read(&self) -> Result<GameState, GameError> {
        let record = self
            .repository
            .find_game(&self.name)?
            .ok_or_else(|| not_found(&self.name))?;
        Ok(record.decode()?)
    }

    #[instrument(skip(self, change), fields(game = %self.name))]
    fn update(&self, change: &mut StateChange<'_>) -> Result<(), GameError> {
        let _guard = lock(&self.lock);
        self.repository
            .update_game(&self.name, |state| change(state))?
            .ok_or_else(|| not_found(&self.name))?
    }
}

/// Keeps games in a SQLite database so they survive restarts.
#[derive(Debug)]
pub struct SqlitePersister {
    repository: GameRepository,
    seeds: SeedSource,
    game_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SqlitePersister {
    /// Opens (creating if needed) the database at `db_path` and brings its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns a `Storage` error if the database cannot be opened or migrated.
    #[instrument(skip(seeds))]
    pub fn open(db_path: String, seeds: SeedSource) -> Result<Self, GameError> {
        let repository = GameRepository::new(db_path)?;
        repository.run_migrations()?;
        info!("SQLite persister ready");
        Ok(Self {
            repository,
            seeds,
            game_locks: Mutex::new(HashMap::new()),
        })
    }

    /// The lock serialising access to `name` within this process.
    fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        lock(&self.game_locks)
            .entry(name.to_string())
            .or_default()
            .clone()
    }

    /// Drops the lock for `name` unless a handle still shares it.
    fn release_lock(&self, name: &str) {
        let mut locks = lock(&self.game_locks);
        if locks.get(name).is_some_and(|held| Arc::strong_count(held) == 1) {
            locks.remove(name);
        }
    }

    /// Number of games with an in-process lock.
    pub fn tracked_locks(&self) -> usize {
        lock(&self.game_locks).len()
    }
}

impl StatePersister for SqlitePersister {
    fn random_seed(&self) -> u64 {
        self.seeds.next_seed()
    }

    #[instrument(skip(self, initial_action_log, players_with_hands, initial_deck), fields(ruleset = %ruleset.id()))]
    fn add_game(
        &self,
        name: &str,
        chat_log_length: usize,
        initial_action_log: Vec<Message>,
        ruleset: Ruleset,
        players_with_hands: Vec<PlayerNameWithHand>,
        initial_deck: Vec<Card>,
    ) -> Result<(), GameError> {
        require_name(name)?;

        let inserted = {
            let game_lock = self.lock_for(name);
            let _guard = lock(&game_lock);

            let state = GameState::new(
                name.to_string(),
                ruleset,
                chat_log_length,
                initial_action_log,
                players_with_hands,
                initial_deck,
            );
            NewGameRecord::encode(&state)
                .map_err(GameError::from)
                .and_then(|record| {
                    Ok(self.repository.insert_game(record, state.player_names())?)
                })
        };

        match inserted {
            Ok(true) => {
                info!("Game added");
                Ok(())
            }
            Ok(false) => {
                self.release_lock(name);
                warn!("Game already exists");
                Err(GameError::new(GameErrorKind::AlreadyExists(
                    name.to_string(),
                )))
            }
            Err(err) => {
                self.release_lock(name);
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    fn read_and_write_game(&self, name: &str) -> Result<Arc<dyn ReadAndWriteState>, GameError> {
        if self.repository.find_game(name)?.is_none() {
            debug!("Game not found");
            return Err(not_found(name));
        }

        Ok(Arc::new(SqliteGame {
            name: name.to_string(),
            repository: self.repository.clone(),
            lock: self.lock_for(name),
        }))
    }

    #[instrument(skip(self))]
    fn read_all_with_player(&self, player: &str) -> Result<Vec<GameState>, GameError> {
        let states = self
            .repository
            .games_for_player(player)?
            .iter()
            .map(|record| record.decode())
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = states.len(), "Games listed for player");
        Ok(states)
    }

    #[instrument(skip(self))]
    fn remove_game_from_list_for_player(
        &self,
        game: &str,
        player: &str,
    ) -> Result<(), GameError> {
        if self.repository.remove_player_entry(game, player)? {
            info!("Game removed from player's list");
            Ok(())
        } else {
            warn!("Player not indexed for game");
            Err(GameError::new(GameErrorKind::NotAParticipant {
                player: player.to_string(),
                game: game.to_string(),
            }))
        }
    }

    #[instrument(skip(self))]
    fn delete(&self, game: &str) -> Result<(), GameError> {
        let participants = {
            let game_lock = self.lock_for(game);
            let _guard = lock(&game_lock);
            self.repository.delete_game(game)?
        };
        lock(&self.game_locks).remove(game);

        let Some(participants) = participants else {
            debug!("Game not found");
            return Err(not_found(game));
        };

        info!("Game deleted");
        clean_up_index(self, game, &participants)
    }
}
