//! Storage contract for games, with per-game serialised mutation.
//!
//! A persister keeps games by name and indexes them by participant. Turns
//! are applied through a [`ReadAndWriteState`] handle whose `update` holds
//! that game's lock for the duration of the change; the registry lock is
//! only taken for registration, index removal and deletion.

mod memory;
mod seed;

use std::sync::Arc;

pub use memory::InMemoryPersister;
pub use seed::SeedSource;

use crate::card::{Card, InferredCard};
use crate::error::{GameError, GameErrorKind};
use crate::log::Message;
use crate::ruleset::Ruleset;
use crate::state::{GameState, Participant, PlayerNameWithHand};

/// A change applied to a live game under its lock.
pub type StateChange<'a> = dyn FnMut(&mut GameState) -> Result<(), GameError> + 'a;

/// Access to one stored game.
pub trait ReadAndWriteState: Send + Sync {
    /// Name of the game this handle refers to.
    fn game_name(&self) -> &str;

    /// A consistent copy of the current state.
    fn read(&self) -> Result<GameState, GameError>;

    /// Runs `change` against the live state while holding the game's lock.
    ///
    /// The state is kept (and, for durable backings, written back) whether
    /// or not `change` succeeds, so a rejected turn's log entry survives.
    fn update(&self, change: &mut StateChange<'_>) -> Result<(), GameError>;

    /// See [`GameState::record_chat_message`].
    fn record_chat_message(&self, player: &Participant, text: &str) -> Result<(), GameError> {
        self.update(&mut |state| state.record_chat_message(player, text))
    }

    /// See [`GameState::enact_turn_by_discarding_and_replacing`].
    fn enact_turn_by_discarding_and_replacing(
        &self,
        action_text: &str,
        player: &Participant,
        hand_index: usize,
        knowledge_of_drawn_card: InferredCard,
        hints_to_add: i32,
        mistakes_to_add: i32,
    ) -> Result<(), GameError> {
        self.update(&mut |state| {
            state.enact_turn_by_discarding_and_replacing(
                action_text,
                player,
                hand_index,
                knowledge_of_drawn_card.clone(),
                hints_to_add,
                mistakes_to_add,
            )
        })
    }

    /// See [`GameState::enact_turn_by_playing_and_replacing`].
    fn enact_turn_by_playing_and_replacing(
        &self,
        action_text: &str,
        player: &Participant,
        hand_index: usize,
        knowledge_of_drawn_card: InferredCard,
        hints_to_add: i32,
    ) -> Result<(), GameError> {
        self.update(&mut |state| {
            state.enact_turn_by_playing_and_replacing(
                action_text,
                player,
                hand_index,
                knowledge_of_drawn_card.clone(),
                hints_to_add,
            )
        })
    }

    /// See [`GameState::enact_turn_by_updating_hand_with_hint`].
    fn enact_turn_by_updating_hand_with_hint(
        &self,
        action_text: &str,
        giver: &Participant,
        receiver: &str,
        updated_knowledge: Vec<InferredCard>,
        hints_to_subtract: i32,
    ) -> Result<(), GameError> {
        self.update(&mut |state| {
            state.enact_turn_by_updating_hand_with_hint(
                action_text,
                giver,
                receiver,
                updated_knowledge.clone(),
                hints_to_subtract,
            )
        })
    }
}

/// Where games live.
///
/// Every backing must behave identically from the caller's side.
pub trait StatePersister: Send + Sync {
    /// A fresh seed for shuffling a new deck.
    fn random_seed(&self) -> u64;

    /// Stores a newly dealt game and indexes it under every participant.
    ///
    /// # Errors
    ///
    /// `EmptyName` for `""`, `AlreadyExists` if the name is taken.
    fn add_game(
        &self,
        name: &str,
        chat_log_length: usize,
        initial_action_log: Vec<Message>,
        ruleset: Ruleset,
        players_with_hands: Vec<PlayerNameWithHand>,
        initial_deck: Vec<Card>,
    ) -> Result<(), GameError>;

    /// A handle for reading and mutating the named game.
    ///
    /// # Errors
    ///
    /// `NotFound` if no such game exists.
    fn read_and_write_game(&self, name: &str) -> Result<Arc<dyn ReadAndWriteState>, GameError>;

    /// Snapshots of every game still indexed under `player`.
    ///
    /// An unknown player and a player with no games both get an empty list.
    fn read_all_with_player(&self, player: &str) -> Result<Vec<GameState>, GameError>;

    /// Drops `game` from `player`'s index, leaving the game itself untouched.
    ///
    /// # Errors
    ///
    /// `NotAParticipant` if the player was never indexed for the game or was
    /// already removed.
    fn remove_game_from_list_for_player(&self, game: &str, player: &str)
    -> Result<(), GameError>;

    /// Deletes the game, then removes it from each participant's index.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent. Index failures are gathered into one
    /// `PartialCleanup` error; the game stays deleted.
    fn delete(&self, game: &str) -> Result<(), GameError>;
}

/// Rejects empty game names.
pub(crate) fn require_name(name: &str) -> Result<(), GameError> {
    if name.is_empty() {
        return Err(GameError::new(GameErrorKind::EmptyName));
    }
    Ok(())
}

/// Removes `game` from each participant's index, gathering every failure.
pub(crate) fn clean_up_index(
    persister: &(impl StatePersister + ?Sized),
    game: &str,
    participants: &[String],
) -> Result<(), GameError> {
    let failures: Vec<String> = participants
        .iter()
        .filter_map(|player| {
            persister
                .remove_game_from_list_for_player(game, player)
                .err()
                .map(|e| e.kind().to_string())
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        tracing::warn!(game, failures = failures.len(), "Index cleanup incomplete after delete");
        Err(GameError::new(GameErrorKind::PartialCleanup(failures)))
    }
}
