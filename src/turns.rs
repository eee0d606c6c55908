//! Player actions: playing, discarding, hinting and chatting.
//!
//! Each action runs entirely inside [`ReadAndWriteState::update`], so the
//! turn check, the ruleset decisions and the ledger change see one state.

use tracing::{info, instrument, warn};

use crate::card::Card;
use crate::error::{GameError, GameErrorKind};
use crate::persister::ReadAndWriteState;
use crate::ruleset::Rules;
use crate::state::{GameState, Participant};

/// Rejects the action unless the game is live and it is `player`'s turn.
fn require_turn(state: &GameState, player: &Participant) -> Result<(), GameError> {
    if !state.has_player(player.name()) {
        return Err(GameError::new(GameErrorKind::NotAParticipant {
            player: player.name().clone(),
            game: state.name().to_string(),
        }));
    }
    if state.is_finished()? {
        return Err(GameError::new(GameErrorKind::GameFinished(
            state.name().to_string(),
        )));
    }
    if state.current_player() != player.name() {
        return Err(GameError::new(GameErrorKind::NotPlayersTurn {
            player: player.name().clone(),
            current: state.current_player().to_string(),
        }));
    }
    Ok(())
}

fn card_at(state: &GameState, player: &str, hand_index: usize) -> Result<Option<Card>, GameError> {
    Ok(state
        .hand(player)?
        .get(hand_index)
        .map(|in_hand| in_hand.card().clone()))
}

/// Plays the card at `hand_index`.
///
/// A playable card joins its suit and may return hints; an unplayable one
/// goes to the discard pile and costs a mistake.
///
/// # Errors
///
/// `GameFinished`, `NotPlayersTurn`, `NotAParticipant`, or whatever the
/// ledger reports for a bad hand index.
#[instrument(skip(game), fields(game = %game.game_name(), player = %player.name()))]
pub fn take_turn_by_playing(
    game: &dyn ReadAndWriteState,
    player: &Participant,
    hand_index: usize,
) -> Result<(), GameError> {
    game.update(&mut |state| {
        require_turn(state, player)?;
        let ruleset = *state.ruleset();
        let drawn = ruleset.unknown_card();

        let Some(card) = card_at(state, player.name(), hand_index)? else {
            return state.enact_turn_by_playing_and_replacing("", player, hand_index, drawn, 0);
        };

        if ruleset.is_card_playable(&card, state.played_for_color(card.color_suit())) {
            let room = ruleset.maximum_number_of_hints() - state.number_of_ready_hints();
            let hints = ruleset.hints_for_playing_card(&card).min(room).max(0);
            info!(card = %card, hints, "Card is playable");
            state.enact_turn_by_playing_and_replacing(
                &format!("played {}", card),
                player,
                hand_index,
                drawn,
                hints,
            )
        } else {
            warn!(card = %card, "Card is not playable, counting a mistake");
            state.enact_turn_by_discarding_and_replacing(
                &format!("tried to play {} but it did not fit", card),
                player,
                hand_index,
                drawn,
                0,
                1,
            )
        }
    })
}

/// Discards the card at `hand_index` to regain a hint.
///
/// # Errors
///
/// `HintsAtMaximum` if no hint has been spent, plus the turn errors of
/// [`take_turn_by_playing`].
#[instrument(skip(game), fields(game = %game.game_name(), player = %player.name()))]
pub fn take_turn_by_discarding(
    game: &dyn ReadAndWriteState,
    player: &Participant,
    hand_index: usize,
) -> Result<(), GameError> {
    game.update(&mut |state| {
        require_turn(state, player)?;
        let ruleset = *state.ruleset();
        let maximum = ruleset.maximum_number_of_hints();
        if state.number_of_ready_hints() >= maximum {
            warn!("Discard refused with every hint ready");
            return Err(GameError::new(GameErrorKind::HintsAtMaximum(maximum)));
        }

        let text = match card_at(state, player.name(), hand_index)? {
            Some(card) => format!("discarded {}", card),
            None => String::new(),
        };
        state.enact_turn_by_discarding_and_replacing(
            &text,
            player,
            hand_index,
            ruleset.unknown_card(),
            1,
            0,
        )
    })
}

/// Tells `receiver` which of their cards are `color`.
///
/// # Errors
///
/// `NoHintsAvailable`, `IllegalHint` for a self-hint or a colour the
/// ruleset does not offer, `NotAParticipant` for an unknown receiver, plus
/// the turn errors of [`take_turn_by_playing`].
#[instrument(skip(game), fields(game = %game.game_name(), giver = %giver.name()))]
pub fn take_turn_by_hinting_color(
    game: &dyn ReadAndWriteState,
    giver: &Participant,
    receiver: &str,
    color: &str,
) -> Result<(), GameError> {
    game.update(&mut |state| {
        require_hint(state, giver, receiver)?;
        let ruleset = *state.ruleset();
        if !ruleset.colors_available_as_hint().iter().any(|c| c == color) {
            return Err(GameError::new(GameErrorKind::IllegalHint(format!(
                "{} is not a colour that can be hinted",
                color
            ))));
        }

        let knowledge = ruleset.knowledge_after_color_hint(
            &state.inferred_hand(receiver)?,
            &state.visible_hand(receiver)?,
            color,
        );
        state.enact_turn_by_updating_hand_with_hint(
            &format!("told {} which cards are {}", receiver, color),
            giver,
            receiver,
            knowledge,
            1,
        )
    })
}

/// Tells `receiver` which of their cards have `index`.
///
/// # Errors
///
/// As for [`take_turn_by_hinting_color`].
#[instrument(skip(game), fields(game = %game.game_name(), giver = %giver.name()))]
pub fn take_turn_by_hinting_index(
    game: &dyn ReadAndWriteState,
    giver: &Participant,
    receiver: &str,
    index: u32,
) -> Result<(), GameError> {
    game.update(&mut |state| {
        require_hint(state, giver, receiver)?;
        let ruleset = *state.ruleset();
        if !ruleset.indices_available_as_hint().contains(&index) {
            return Err(GameError::new(GameErrorKind::IllegalHint(format!(
                "{} is not an index that can be hinted",
                index
            ))));
        }

        let knowledge = ruleset.knowledge_after_index_hint(
            &state.inferred_hand(receiver)?,
            &state.visible_hand(receiver)?,
            index,
        );
        state.enact_turn_by_updating_hand_with_hint(
            &format!("told {} which cards are {}s", receiver, index),
            giver,
            receiver,
            knowledge,
            1,
        )
    })
}

fn require_hint(state: &GameState, giver: &Participant, receiver: &str) -> Result<(), GameError> {
    require_turn(state, giver)?;
    if state.number_of_ready_hints() < 1 {
        warn!("No hint ready");
        return Err(GameError::new(GameErrorKind::NoHintsAvailable));
    }
    if receiver == giver.name() {
        return Err(GameError::new(GameErrorKind::IllegalHint(
            "players cannot hint themselves".to_string(),
        )));
    }
    if !state.has_player(receiver) {
        return Err(GameError::new(GameErrorKind::NotAParticipant {
            player: receiver.to_string(),
            game: state.name().to_string(),
        }));
    }
    Ok(())
}

/// Adds a line to the game's chat. Allowed at any time, by any participant.
#[instrument(skip(game, text), fields(game = %game.game_name(), player = %player.name()))]
pub fn send_chat_message(
    game: &dyn ReadAndWriteState,
    player: &Participant,
    text: &str,
) -> Result<(), GameError> {
    game.record_chat_message(player, text)
}
