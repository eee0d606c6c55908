//! Simple bot that always finds a legal move.

use tracing::{debug, instrument};

use crate::card::{Card, InferredCard};
use crate::error::GameError;
use crate::persister::ReadAndWriteState;
use crate::ruleset::Rules;
use crate::state::Participant;
use crate::turns;
use crate::view::PlayerView;

/// A move the bot has settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotMove {
    /// Play the card at this hand position.
    Play(usize),
    /// Discard the card at this hand position.
    Discard(usize),
    /// Tell `receiver` which cards are `color`.
    HintColor {
        /// Who is told.
        receiver: String,
        /// The colour named.
        color: String,
    },
    /// Tell `receiver` which cards have `index`.
    HintIndex {
        /// Who is told.
        receiver: String,
        /// The index named.
        index: u32,
    },
}

impl BotMove {
    /// Performs the move as `player`.
    pub fn take(&self, game: &dyn ReadAndWriteState, player: &Participant) -> Result<(), GameError> {
        match self {
            Self::Play(index) => turns::take_turn_by_playing(game, player, *index),
            Self::Discard(index) => turns::take_turn_by_discarding(game, player, *index),
            Self::HintColor { receiver, color } => {
                turns::take_turn_by_hinting_color(game, player, receiver, color)
            }
            Self::HintIndex { receiver, index } => {
                turns::take_turn_by_hinting_index(game, player, receiver, *index)
            }
        }
    }
}

/// Picks a move for the viewer.
///
/// In order of preference: play a card known to fit, point another player
/// at a card that fits, discard the first card, or spend a hint on the next
/// player when hints are full.
#[instrument(skip(view), fields(game = %view.game_name(), player = %view.viewer()))]
pub fn choose_move(view: &PlayerView) -> Result<BotMove, GameError> {
    let state = view.state();
    let ruleset = state.ruleset();
    let fits = |card: &Card| ruleset.is_card_playable(card, state.played_for_color(card.color_suit()));

    let sure_to_fit = |knowledge: &InferredCard| {
        !knowledge.possible_colors().is_empty()
            && !knowledge.possible_indices().is_empty()
            && knowledge.possible_colors().iter().all(|color| {
                knowledge
                    .possible_indices()
                    .iter()
                    .all(|index| fits(&Card::new(color.clone(), *index)))
            })
    };

    if let Some(index) = view.knowledge_of_own_hand()?.iter().position(sure_to_fit) {
        debug!(index, "Playing a card known to fit");
        return Ok(BotMove::Play(index));
    }

    let (order, _) = view.current_turn_order();
    let others: Vec<&String> = order.iter().filter(|p| *p != view.viewer()).collect();

    if view.number_of_ready_hints() > 0 {
        for other in &others {
            let cards = view.visible_hand(other)?;
            let knowledge = state.inferred_hand(other)?;
            let target = cards
                .iter()
                .zip(&knowledge)
                .find(|(card, known)| fits(*card) && !sure_to_fit(*known));
            if let Some((card, known)) = target {
                debug!(receiver = %other, card = %card, "Hinting a playable card");
                let hint = if known.possible_indices().len() > 1 {
                    BotMove::HintIndex {
                        receiver: other.to_string(),
                        index: *card.sequence_index(),
                    }
                } else if ruleset
                    .colors_available_as_hint()
                    .contains(card.color_suit())
                {
                    BotMove::HintColor {
                        receiver: other.to_string(),
                        color: card.color_suit().clone(),
                    }
                } else {
                    continue;
                };
                return Ok(hint);
            }
        }
    }

    if view.number_of_ready_hints() < ruleset.maximum_number_of_hints() {
        debug!("Discarding the first card");
        return Ok(BotMove::Discard(0));
    }

    let Some(next) = others.first() else {
        return Ok(BotMove::Play(0));
    };
    let index = view
        .visible_hand(next)?
        .first()
        .map_or(1, |card| *card.sequence_index());
    debug!(receiver = %next, index, "Hints are full, spending one");
    Ok(BotMove::HintIndex {
        receiver: next.to_string(),
        index,
    })
}
