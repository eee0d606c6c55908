//! The game aggregate and its turn-by-turn ledger updates.
//!
//! `GameState` does bookkeeping only. Whether a play is legal, how many hints
//! a discard earns, or whether a mistake was made is decided by the caller
//! from the ruleset; the deltas arrive here already computed and are applied
//! without clamping.

use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::card::{Card, InHandCard, InferredCard};
use crate::error::{GameError, GameErrorKind};
use crate::log::{Message, RollingLog};
use crate::ruleset::{Rules, Ruleset};

/// The acting player as the log sees them: a name and a text colour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct Participant {
    /// Player name, unique within a game.
    #[new(into)]
    name: String,
    /// Colour used for this player's log lines.
    #[new(into)]
    chat_color: String,
}

/// A player's name with the cards dealt to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct PlayerNameWithHand {
    /// Player name.
    #[new(into)]
    player_name: String,
    /// Dealt cards, in hand order.
    initial_hand: Vec<InHandCard>,
}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    name: String,
    ruleset: Ruleset,
    created_at: DateTime<Utc>,
    player_names: Vec<String>,
    turn: u32,
    chat_log: RollingLog,
    action_log: RollingLog,
    ready_hints: i32,
    mistakes_made: i32,
    deck: VecDeque<Card>,
    played: BTreeMap<String, Vec<Card>>,
    #[serde(with = "discard_pile")]
    discarded: HashMap<Card, u32>,
    hands: BTreeMap<String, Vec<InHandCard>>,
}

impl GameState {
    /// Creates a freshly dealt game at turn 1 with every hint ready.
    ///
    /// Turn order is the order of `players_with_hands`. The action log's
    /// capacity is the length of `initial_action_log`.
    #[instrument(skip(initial_action_log, players_with_hands, initial_deck), fields(players = players_with_hands.len(), deck = initial_deck.len()))]
    pub fn new(
        name: String,
        ruleset: Ruleset,
        chat_log_length: usize,
        initial_action_log: Vec<Message>,
        players_with_hands: Vec<PlayerNameWithHand>,
        initial_deck: Vec<Card>,
    ) -> Self {
        let player_names = players_with_hands
            .iter()
            .map(|p| p.player_name().clone())
            .collect();
        let hands = players_with_hands
            .into_iter()
            .map(|p| (p.player_name, p.initial_hand))
            .collect();

        info!(game = %name, ruleset = %ruleset.id(), "Creating game state");
        Self {
            name,
            ruleset,
            created_at: Utc::now(),
            player_names,
            turn: 1,
            chat_log: RollingLog::with_capacity(chat_log_length),
            action_log: RollingLog::from_messages(initial_action_log),
            ready_hints: ruleset.maximum_number_of_hints(),
            mistakes_made: 0,
            deck: initial_deck.into(),
            played: BTreeMap::new(),
            discarded: HashMap::new(),
            hands,
        }
    }

    /// Unique game name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules the game is played under.
    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// When the game was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Participants in turn order.
    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    /// Whether `player` is one of the participants.
    pub fn has_player(&self, player: &str) -> bool {
        self.player_names.iter().any(|p| p == player)
    }

    /// Current turn, starting at 1.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Name of the player whose turn it is.
    pub fn current_player(&self) -> &str {
        let seat = (self.turn as usize).saturating_sub(1) % self.player_names.len().max(1);
        self.player_names.get(seat).map_or("", String::as_str)
    }

    /// Chat messages.
    pub fn chat_log(&self) -> &RollingLog {
        &self.chat_log
    }

    /// Action history.
    pub fn action_log(&self) -> &RollingLog {
        &self.action_log
    }

    /// Hint tokens ready to be spent.
    pub fn number_of_ready_hints(&self) -> i32 {
        self.ready_hints
    }

    /// Mistakes made so far.
    pub fn number_of_mistakes_made(&self) -> i32 {
        self.mistakes_made
    }

    /// Cards left to draw.
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    /// Undrawn cards, next draw first.
    pub fn deck(&self) -> &VecDeque<Card> {
        &self.deck
    }

    /// Cards played in `color`, in play order.
    pub fn played_for_color(&self, color: &str) -> &[Card] {
        self.played.get(color).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All played sequences keyed by suit.
    pub fn played(&self) -> &BTreeMap<String, Vec<Card>> {
        &self.played
    }

    /// How many copies of `card` have been discarded.
    pub fn number_of_discarded_cards(&self, card: &Card) -> u32 {
        self.discarded.get(card).copied().unwrap_or(0)
    }

    /// The discard multiset.
    pub fn discarded(&self) -> &HashMap<Card, u32> {
        &self.discarded
    }

    /// The cards and knowledge held by `player`.
    pub fn hand(&self, player: &str) -> Result<&[InHandCard], GameError> {
        self.hands
            .get(player)
            .map(Vec::as_slice)
            .ok_or_else(|| GameError::new(GameErrorKind::NoSuchHand(player.to_string())))
    }

    /// The physical cards held by `player`.
    pub fn visible_hand(&self, player: &str) -> Result<Vec<Card>, GameError> {
        Ok(self.hand(player)?.iter().map(|c| c.card().clone()).collect())
    }

    /// What `player` knows about their own cards.
    pub fn inferred_hand(&self, player: &str) -> Result<Vec<InferredCard>, GameError> {
        Ok(self
            .hand(player)?
            .iter()
            .map(|c| c.inferred().clone())
            .collect())
    }

    /// Cards in hands, deck, played piles and discard pile together.
    pub fn total_card_count(&self) -> usize {
        let in_hands: usize = self.hands.values().map(Vec::len).sum();
        let played: usize = self.played.values().map(Vec::len).sum();
        let discarded: u32 = self.discarded.values().sum();
        in_hands + self.deck.len() + played + discarded as usize
    }

    /// Whether play has ended.
    ///
    /// The game ends when the mistake limit is reached, or when the deck is
    /// exhausted and the player now due to act is short of a full hand,
    /// meaning every seat has had its final turn.
    ///
    /// # Errors
    ///
    /// Fails if the current player's hand cannot be read.
    pub fn is_finished(&self) -> Result<bool, GameError> {
        if self.mistakes_made >= self.ruleset.number_of_mistakes_indicating_game_over() {
            debug!(game = %self.name, "Finished by mistakes");
            return Ok(true);
        }

        if !self.deck.is_empty() {
            return Ok(false);
        }

        let full_hand = self
            .ruleset
            .number_of_cards_in_player_hand(self.player_names.len());
        Ok(self.hand(self.current_player())?.len() < full_hand)
    }

    /// Appends a chat line. Advances nothing.
    #[instrument(skip(self, text), fields(game = %self.name, player = %player.name()))]
    pub fn record_chat_message(
        &mut self,
        player: &Participant,
        text: &str,
    ) -> Result<(), GameError> {
        if !self.has_player(player.name()) {
            warn!("Chat from non-participant rejected");
            return Err(GameError::new(GameErrorKind::NotAParticipant {
                player: player.name().clone(),
                game: self.name.clone(),
            }));
        }
        self.chat_log.append(player.name(), player.chat_color(), text);
        debug!("Chat message recorded");
        Ok(())
    }

    /// Moves the card at `hand_index` to the discard pile and draws a replacement.
    ///
    /// With an empty deck the hand shrinks instead. The hint and mistake
    /// deltas are added as given.
    ///
    /// # Errors
    ///
    /// `NoSuchHand` or `IndexOutOfRange`; the error text is still written to
    /// the action log and the turn does not advance.
    #[instrument(skip(self, action_text, knowledge_of_drawn_card), fields(game = %self.name, player = %player.name()))]
    pub fn enact_turn_by_discarding_and_replacing(
        &mut self,
        action_text: &str,
        player: &Participant,
        hand_index: usize,
        knowledge_of_drawn_card: InferredCard,
        hints_to_add: i32,
        mistakes_to_add: i32,
    ) -> Result<(), GameError> {
        let card = self
            .take_card_and_replace(player.name(), hand_index, knowledge_of_drawn_card)
            .map_err(|e| self.log_failure(player, e))?;

        info!(card = %card, "Card discarded");
        *self.discarded.entry(card).or_insert(0) += 1;
        self.ready_hints += hints_to_add;
        self.mistakes_made += mistakes_to_add;
        self.advance_turn(player, action_text);
        Ok(())
    }

    /// Moves the card at `hand_index` onto its suit's played sequence and draws a replacement.
    ///
    /// # Errors
    ///
    /// As for [`GameState::enact_turn_by_discarding_and_replacing`].
    #[instrument(skip(self, action_text, knowledge_of_drawn_card), fields(game = %self.name, player = %player.name()))]
    pub fn enact_turn_by_playing_and_replacing(
        &mut self,
        action_text: &str,
        player: &Participant,
        hand_index: usize,
        knowledge_of_drawn_card: InferredCard,
        hints_to_add: i32,
    ) -> Result<(), GameError> {
        let card = self
            .take_card_and_replace(player.name(), hand_index, knowledge_of_drawn_card)
            .map_err(|e| self.log_failure(player, e))?;

        info!(card = %card, "Card played");
        self.played
            .entry(card.color_suit().clone())
            .or_default()
            .push(card);
        self.ready_hints += hints_to_add;
        self.advance_turn(player, action_text);
        Ok(())
    }

    /// Replaces the receiver's knowledge of every card in their hand.
    ///
    /// # Errors
    ///
    /// `NoSuchHand` if the receiver holds no hand, `SizeMismatch` if
    /// `updated_knowledge` does not have one entry per card.
    #[instrument(skip(self, action_text, updated_knowledge), fields(game = %self.name, giver = %giver.name()))]
    pub fn enact_turn_by_updating_hand_with_hint(
        &mut self,
        action_text: &str,
        giver: &Participant,
        receiver: &str,
        updated_knowledge: Vec<InferredCard>,
        hints_to_subtract: i32,
    ) -> Result<(), GameError> {
        let Some(hand) = self.hands.get_mut(receiver) else {
            let err = GameError::new(GameErrorKind::NoSuchHand(receiver.to_string()));
            return Err(self.log_failure(giver, err));
        };

        if hand.len() != updated_knowledge.len() {
            let err = GameError::new(GameErrorKind::SizeMismatch {
                expected: hand.len(),
                actual: updated_knowledge.len(),
            });
            return Err(self.log_failure(giver, err));
        }

        for (card, inferred) in hand.iter_mut().zip(updated_knowledge) {
            card.set_inferred(inferred);
        }

        info!(receiver, "Hint applied");
        self.ready_hints -= hints_to_subtract;
        self.advance_turn(giver, action_text);
        Ok(())
    }

    fn take_card_and_replace(
        &mut self,
        player: &str,
        hand_index: usize,
        knowledge_of_drawn_card: InferredCard,
    ) -> Result<Card, GameError> {
        let hand = self
            .hands
            .get_mut(player)
            .ok_or_else(|| GameError::new(GameErrorKind::NoSuchHand(player.to_string())))?;

        if hand_index >= hand.len() {
            return Err(GameError::new(GameErrorKind::IndexOutOfRange {
                index: hand_index,
                hand_size: hand.len(),
            }));
        }

        let taken = match self.deck.pop_front() {
            Some(drawn) => std::mem::replace(
                &mut hand[hand_index],
                InHandCard::new(drawn, knowledge_of_drawn_card),
            ),
            None => {
                debug!(player, "Deck empty, hand shrinks");
                hand.remove(hand_index)
            }
        };
        Ok(taken.card().clone())
    }

    fn advance_turn(&mut self, player: &Participant, action_text: &str) {
        self.turn += 1;
        self.action_log
            .append(player.name(), player.chat_color(), action_text);
        debug!(turn = self.turn, "Turn advanced");
    }

    fn log_failure(&mut self, player: &Participant, err: GameError) -> GameError {
        warn!(error = %err.kind(), "Turn rejected");
        self.action_log
            .append(player.name(), player.chat_color(), &err.kind().to_string());
        err
    }
}

/// Stores the discard multiset as a list of `(card, count)` pairs, since
/// JSON map keys must be strings.
mod discard_pile {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::card::Card;

    pub fn serialize<S: Serializer>(
        pile: &HashMap<Card, u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&Card, &u32)> = pile.iter().collect();
        entries.sort();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Card, u32>, D::Error> {
        let entries: Vec<(Card, u32)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
