//! A single player's read-only projection of a game.

use tracing::{instrument, warn};

use crate::card::{Card, InferredCard};
use crate::error::{GameError, GameErrorKind};
use crate::log::Message;
use crate::ruleset::Rules;
use crate::state::GameState;

/// What one participant is allowed to see of a game.
///
/// Built from a snapshot, so every answer reflects the state at the moment
/// the snapshot was taken. A player never sees their own cards, only their
/// deductions about them.
#[derive(Debug, Clone)]
pub struct PlayerView {
    state: GameState,
    viewer: String,
    viewer_index: usize,
}

impl PlayerView {
    /// Creates the view of `state` for `viewer`.
    ///
    /// # Errors
    ///
    /// Returns `NotAParticipant` if `viewer` is not listed in the game.
    #[instrument(skip(state), fields(game = %state.name()))]
    pub fn new(state: GameState, viewer: &str) -> Result<Self, GameError> {
        let Some(viewer_index) = state.player_names().iter().position(|p| p == viewer) else {
            warn!("Viewer is not a participant");
            return Err(GameError::new(GameErrorKind::NotAParticipant {
                player: viewer.to_string(),
                game: state.name().to_string(),
            }));
        };

        Ok(Self {
            state,
            viewer: viewer.to_string(),
            viewer_index,
        })
    }

    /// The snapshot this view was built from.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Name of the game.
    pub fn game_name(&self) -> &str {
        self.state.name()
    }

    /// The viewing player.
    pub fn viewer(&self) -> &str {
        &self.viewer
    }

    /// Ruleset description for display.
    pub fn ruleset_description(&self) -> String {
        self.state.ruleset().frontend_description()
    }

    /// Current turn number.
    pub fn turn(&self) -> u32 {
        self.state.turn()
    }

    /// Participants starting from whoever's turn it is, and the viewer's
    /// position in that order.
    pub fn current_turn_order(&self) -> (Vec<String>, usize) {
        let names = self.state.player_names();
        let count = names.len();
        let current = (self.state.turn() as usize).saturating_sub(1) % count;

        let rotated = names[current..]
            .iter()
            .chain(&names[..current])
            .cloned()
            .collect();
        let viewer_position = (self.viewer_index + count - current) % count;
        (rotated, viewer_position)
    }

    /// Whether the viewer is the player to act.
    pub fn is_viewers_turn(&self) -> bool {
        self.current_turn_order().1 == 0
    }

    /// Points from played cards, or zero once too many mistakes were made.
    pub fn score(&self) -> i32 {
        let ruleset = self.state.ruleset();
        if self.state.number_of_mistakes_made() >= ruleset.number_of_mistakes_indicating_game_over()
        {
            return 0;
        }
        self.state
            .played()
            .values()
            .flatten()
            .map(|card| ruleset.points_for_card(card))
            .sum()
    }

    /// Score if every suit were completed.
    pub fn maximum_possible_score(&self) -> i32 {
        let ruleset = self.state.ruleset();
        let indices = ruleset.distinct_possible_indices();
        ruleset
            .color_suits()
            .iter()
            .flat_map(|color| indices.iter().map(move |index| Card::new(color.clone(), *index)))
            .map(|card| ruleset.points_for_card(&card))
            .sum()
    }

    /// Whether play has ended. See [`GameState::is_finished`].
    ///
    /// # Errors
    ///
    /// Fails if the current player's hand cannot be read.
    pub fn game_is_finished(&self) -> Result<bool, GameError> {
        self.state.is_finished()
    }

    /// Another player's cards.
    ///
    /// # Errors
    ///
    /// `SelfViewForbidden` if `player` is the viewer; `NoSuchHand` if
    /// `player` holds no hand.
    pub fn visible_hand(&self, player: &str) -> Result<Vec<Card>, GameError> {
        if player == self.viewer {
            warn!(player, "Player asked to see their own hand");
            return Err(GameError::new(GameErrorKind::SelfViewForbidden(
                player.to_string(),
            )));
        }
        self.state.visible_hand(player)
    }

    /// What the viewer has deduced about their own cards.
    pub fn knowledge_of_own_hand(&self) -> Result<Vec<InferredCard>, GameError> {
        self.state.inferred_hand(&self.viewer)
    }

    /// Every discarded card, by suit in ruleset order then by index,
    /// repeated once per copy.
    pub fn discarded_cards(&self) -> Vec<Card> {
        let ruleset = self.state.ruleset();
        let indices = ruleset.distinct_possible_indices();
        let mut cards = Vec::new();
        for color in ruleset.color_suits() {
            for index in &indices {
                let card = Card::new(color.clone(), *index);
                let copies = self.state.number_of_discarded_cards(&card);
                cards.extend(std::iter::repeat_n(card, copies as usize));
            }
        }
        cards
    }

    /// Played sequences, one per suit in ruleset order.
    pub fn played_cards(&self) -> Vec<Vec<Card>> {
        self.state
            .ruleset()
            .color_suits()
            .iter()
            .map(|color| self.state.played_for_color(color).to_vec())
            .collect()
    }

    /// Cards left to draw.
    pub fn deck_size(&self) -> usize {
        self.state.deck_size()
    }

    /// Hint tokens ready to be spent.
    pub fn number_of_ready_hints(&self) -> i32 {
        self.state.number_of_ready_hints()
    }

    /// Mistakes made so far.
    pub fn number_of_mistakes_made(&self) -> i32 {
        self.state.number_of_mistakes_made()
    }

    /// Chat log, oldest first.
    pub fn chat_log(&self) -> Vec<Message> {
        self.state.chat_log().sorted_copy()
    }

    /// Action log, oldest first.
    pub fn action_log(&self) -> Vec<Message> {
        self.state.action_log().sorted_copy()
    }
}
