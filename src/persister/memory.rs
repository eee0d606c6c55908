//! Volatile in-process persister.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument, warn};

use super::{
    ReadAndWriteState, SeedSource, StateChange, StatePersister, clean_up_index, require_name,
};
use crate::card::Card;
use crate::error::{GameError, GameErrorKind};
use crate::log::Message;
use crate::ruleset::Ruleset;
use crate::state::{GameState, PlayerNameWithHand};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(name: &str) -> GameError {
    GameError::new(GameErrorKind::NotFound(name.to_string()))
}

/// One game held in memory behind its own lock. `None` once deleted, so
/// handles taken earlier stop working.
#[derive(Debug)]
struct InMemoryGame {
    name: String,
    state: Mutex<Option<GameState>>,
}

impl InMemoryGame {
    /// Empties the slot and returns the last state, if it was still live.
    fn take(&self) -> Option<GameState> {
        lock(&self.state).take()
    }
}

impl ReadAndWriteState for InMemoryGame {
    fn game_name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<GameState, GameError> {
        lock(&self.state)
            .clone()
            .ok_or_else(|| not_found(&self.name))
    }

    #[instrument(skip(self, change), fields(game = %self.name))]
    fn update(&self, change: &mut StateChange<'_>) -> Result<(), GameError> {
        let mut state = lock(&self.state);
        match state.as_mut() {
            Some(state) => change(state),
            None => {
                debug!("Game was deleted");
                Err(not_found(&self.name))
            }
        }
    }
}

/// Keeps every game in process memory. Lost on exit.
#[derive(Debug)]
pub struct InMemoryPersister {
    seeds: SeedSource,
    games: Mutex<HashMap<String, Arc<InMemoryGame>>>,
    games_by_player: Mutex<HashMap<String, Vec<String>>>,
}

impl InMemoryPersister {
    /// Creates an empty persister drawing seeds from `seeds`.
    #[instrument(skip(seeds))]
    pub fn new(seeds: SeedSource) -> Self {
        info!("Creating in-memory persister");
        Self {
            seeds,
            games: Mutex::new(HashMap::new()),
            games_by_player: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPersister {
    fn default() -> Self {
        Self::new(SeedSource::from_entropy())
    }
}

impl StatePersister for InMemoryPersister {
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

        let mut games = lock(&self.games);
        if games.contains_key(name) {
            warn!("Game already exists");
            return Err(GameError::new(GameErrorKind::AlreadyExists(
                name.to_string(),
            )));
        }

        let state = GameState::new(
            name.to_string(),
            ruleset,
            chat_log_length,
            initial_action_log,
            players_with_hands,
            initial_deck,
        );
        let participants = state.player_names().to_vec();
        games.insert(
            name.to_string(),
            Arc::new(InMemoryGame {
                name: name.to_string(),
                state: Mutex::new(Some(state)),
            }),
        );

        let mut index = lock(&self.games_by_player);
        for player in participants {
            index.entry(player).or_default().push(name.to_string());
        }

        info!("Game added");
        Ok(())
    }

    #[instrument(skip(self))]
    fn read_and_write_game(&self, name: &str) -> Result<Arc<dyn ReadAndWriteState>, GameError> {
        let games = lock(&self.games);
        match games.get(name) {
            Some(game) => Ok(game.clone() as Arc<dyn ReadAndWriteState>),
            None => {
                debug!("Game not found");
                Err(not_found(name))
            }
        }
    }

    #[instrument(skip(self))]
    fn read_all_with_player(&self, player: &str) -> Result<Vec<GameState>, GameError> {
        let names = lock(&self.games_by_player)
            .get(player)
            .cloned()
            .unwrap_or_default();

        let handles: Vec<Arc<InMemoryGame>> = {
            let games = lock(&self.games);
            names.iter().filter_map(|n| games.get(n).cloned()).collect()
        };

        // A game deleted since the index was read is skipped.
        let states: Vec<GameState> = handles
            .iter()
            .filter_map(|game| lock(&game.state).clone())
            .collect();
        debug!(count = states.len(), "Games listed for player");
        Ok(states)
    }

    #[instrument(skip(self))]
    fn remove_game_from_list_for_player(
        &self,
        game: &str,
        player: &str,
    ) -> Result<(), GameError> {
        let mut index = lock(&self.games_by_player);
        let listed = index.get_mut(player);
        let position = listed
            .as_ref()
            .and_then(|names| names.iter().position(|n| n == game));

        match (listed, position) {
            (Some(names), Some(position)) => {
                names.remove(position);
                info!("Game removed from player's list");
                Ok(())
            }
            _ => {
                warn!("Player not indexed for game");
                Err(GameError::new(GameErrorKind::NotAParticipant {
                    player: player.to_string(),
                    game: game.to_string(),
                }))
            }
        }
    }

    #[instrument(skip(self))]
    fn delete(&self, game: &str) -> Result<(), GameError> {
        let removed = lock(&self.games).remove(game);
        let Some(state) = removed.and_then(|handle| handle.take()) else {
            debug!("Game not found");
            return Err(not_found(game));
        };

        let participants = state.player_names().to_vec();
        info!("Game deleted");
        clean_up_index(self, game, &participants)
    }
}
