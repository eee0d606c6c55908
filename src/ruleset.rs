//! Rulesets: deck composition, limits, and how hints and plays are scored.
//!
//! Three variants exist. Each wraps the one it extends and forwards every
//! question it does not answer differently:
//!
//! - [`StandardWithoutRainbow`]: five suits.
//! - [`WithRainbowAsSeparateSuit`]: adds a sixth `rainbow` suit.
//! - [`WithRainbowAsCompoundSuit`]: same deck, but rainbow cards answer to
//!   every colour hint and cannot be hinted as a colour themselves.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::instrument;

use crate::card::{Card, InferredCard};

/// Name of the extra suit used by the rainbow variants.
pub const RAINBOW_SUIT: &str = "rainbow";

const BASIC_SUITS: [&str; 5] = ["red", "green", "blue", "yellow", "white"];

/// Copies of each index in one suit.
const INDEX_MULTIPLICITIES: [(u32, usize); 5] = [(1, 3), (2, 2), (3, 2), (4, 2), (5, 1)];

/// Policy questions every ruleset answers.
pub trait Rules {
    /// Short human-readable description.
    fn frontend_description(&self) -> String;

    /// Every card of a fresh deck, unshuffled.
    fn copy_of_full_cardset(&self) -> Vec<Card>;

    /// Cards dealt to each player for a game of `player_count` players.
    fn number_of_cards_in_player_hand(&self, player_count: usize) -> usize;

    /// Suits in display order.
    fn color_suits(&self) -> Vec<String>;

    /// Each index that appears in a suit, ascending.
    fn distinct_possible_indices(&self) -> Vec<u32>;

    /// Smallest roster allowed.
    fn minimum_number_of_players(&self) -> usize;

    /// Largest roster allowed.
    fn maximum_number_of_players(&self) -> usize;

    /// Hint tokens available at the start and the cap thereafter.
    fn maximum_number_of_hints(&self) -> i32;

    /// Mistake count at which the game ends with no score.
    fn number_of_mistakes_indicating_game_over(&self) -> i32;

    /// Whether `card` may extend `already_played`, the cards played so far in its suit.
    fn is_card_playable(&self, card: &Card, already_played: &[Card]) -> bool;

    /// Hint tokens regained by successfully playing `card`.
    fn hints_for_playing_card(&self, card: &Card) -> i32;

    /// Points `card` contributes to the score once played.
    fn points_for_card(&self, card: &Card) -> i32;

    /// Colours a player may name when giving a hint.
    fn colors_available_as_hint(&self) -> Vec<String>;

    /// Indices a player may name when giving a hint.
    fn indices_available_as_hint(&self) -> Vec<u32>;

    /// Receiver's knowledge after being told which cards are `color`.
    fn knowledge_after_color_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        color: &str,
    ) -> Vec<InferredCard>;

    /// Receiver's knowledge after being told which cards have `index`.
    fn knowledge_after_index_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        index: u32,
    ) -> Vec<InferredCard>;
}

fn cardset_for_suits<'a>(suits: impl IntoIterator<Item = &'a str>) -> Vec<Card> {
    let mut cards = Vec::new();
    for suit in suits {
        for (index, copies) in INDEX_MULTIPLICITIES {
            for _ in 0..copies {
                cards.push(Card::new(suit, index));
            }
        }
    }
    cards
}

/// The plain five-suit game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardWithoutRainbow;

impl Rules for StandardWithoutRainbow {
    fn frontend_description(&self) -> String {
        "standard (without rainbow cards)".to_string()
    }

    fn copy_of_full_cardset(&self) -> Vec<Card> {
        cardset_for_suits(BASIC_SUITS)
    }

    fn number_of_cards_in_player_hand(&self, player_count: usize) -> usize {
        if player_count <= 3 { 5 } else { 4 }
    }

    fn color_suits(&self) -> Vec<String> {
        BASIC_SUITS.iter().map(|s| s.to_string()).collect()
    }

    fn distinct_possible_indices(&self) -> Vec<u32> {
        INDEX_MULTIPLICITIES.iter().map(|(index, _)| *index).collect()
    }

    fn minimum_number_of_players(&self) -> usize {
        2
    }

    fn maximum_number_of_players(&self) -> usize {
        5
    }

    fn maximum_number_of_hints(&self) -> i32 {
        8
    }

    fn number_of_mistakes_indicating_game_over(&self) -> i32 {
        3
    }

    fn is_card_playable(&self, card: &Card, already_played: &[Card]) -> bool {
        match already_played.last() {
            None => *card.sequence_index() == 1,
            Some(top) => *top.sequence_index() + 1 == *card.sequence_index(),
        }
    }

    fn hints_for_playing_card(&self, card: &Card) -> i32 {
        let completes_suit = self
            .distinct_possible_indices()
            .last()
            .is_some_and(|highest| highest == card.sequence_index());
        if completes_suit { 1 } else { 0 }
    }

    fn points_for_card(&self, _card: &Card) -> i32 {
        1
    }

    fn colors_available_as_hint(&self) -> Vec<String> {
        self.color_suits()
    }

    fn indices_available_as_hint(&self) -> Vec<u32> {
        self.distinct_possible_indices()
    }

    fn knowledge_after_color_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        color: &str,
    ) -> Vec<InferredCard> {
        knowledge
            .iter()
            .zip(hand)
            .map(|(inferred, card)| {
                let mut updated = inferred.clone();
                if card.color_suit() == color {
                    updated.retain_colors(|c| c == color);
                } else {
                    updated.retain_colors(|c| c != color);
                }
                updated
            })
            .collect()
    }

    fn knowledge_after_index_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        index: u32,
    ) -> Vec<InferredCard> {
        knowledge
            .iter()
            .zip(hand)
            .map(|(inferred, card)| {
                let mut updated = inferred.clone();
                if *card.sequence_index() == index {
                    updated.retain_indices(|i| i == index);
                } else {
                    updated.retain_indices(|i| i != index);
                }
                updated
            })
            .collect()
    }
}

/// Standard rules plus a sixth suit that behaves like any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithRainbowAsSeparateSuit {
    basis: StandardWithoutRainbow,
}

impl Rules for WithRainbowAsSeparateSuit {
    fn frontend_description(&self) -> String {
        "with rainbow, rainbow is its own separate color".to_string()
    }

    fn copy_of_full_cardset(&self) -> Vec<Card> {
        let mut cards = self.basis.copy_of_full_cardset();
        cards.extend(cardset_for_suits([RAINBOW_SUIT]));
        cards
    }

    fn number_of_cards_in_player_hand(&self, player_count: usize) -> usize {
        self.basis.number_of_cards_in_player_hand(player_count)
    }

    fn color_suits(&self) -> Vec<String> {
        let mut suits = self.basis.color_suits();
        suits.push(RAINBOW_SUIT.to_string());
        suits
    }

    fn distinct_possible_indices(&self) -> Vec<u32> {
        self.basis.distinct_possible_indices()
    }

    fn minimum_number_of_players(&self) -> usize {
        self.basis.minimum_number_of_players()
    }

    fn maximum_number_of_players(&self) -> usize {
        self.basis.maximum_number_of_players()
    }

    fn maximum_number_of_hints(&self) -> i32 {
        self.basis.maximum_number_of_hints()
    }

    fn number_of_mistakes_indicating_game_over(&self) -> i32 {
        self.basis.number_of_mistakes_indicating_game_over()
    }

    fn is_card_playable(&self, card: &Card, already_played: &[Card]) -> bool {
        self.basis.is_card_playable(card, already_played)
    }

    fn hints_for_playing_card(&self, card: &Card) -> i32 {
        self.basis.hints_for_playing_card(card)
    }

    fn points_for_card(&self, card: &Card) -> i32 {
        self.basis.points_for_card(card)
    }

    fn colors_available_as_hint(&self) -> Vec<String> {
        self.color_suits()
    }

    fn indices_available_as_hint(&self) -> Vec<u32> {
        self.basis.indices_available_as_hint()
    }

    fn knowledge_after_color_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        color: &str,
    ) -> Vec<InferredCard> {
        self.basis.knowledge_after_color_hint(knowledge, hand, color)
    }

    fn knowledge_after_index_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        index: u32,
    ) -> Vec<InferredCard> {
        self.basis.knowledge_after_index_hint(knowledge, hand, index)
    }
}

/// Rainbow deck where rainbow cards count as every colour for hints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithRainbowAsCompoundSuit {
    basis: WithRainbowAsSeparateSuit,
}

impl Rules for WithRainbowAsCompoundSuit {
    fn frontend_description(&self) -> String {
        "with rainbow, rainbow is compound color (all colors)".to_string()
    }

    fn copy_of_full_cardset(&self) -> Vec<Card> {
        self.basis.copy_of_full_cardset()
    }

    fn number_of_cards_in_player_hand(&self, player_count: usize) -> usize {
        self.basis.number_of_cards_in_player_hand(player_count)
    }

    fn color_suits(&self) -> Vec<String> {
        self.basis.color_suits()
    }

    fn distinct_possible_indices(&self) -> Vec<u32> {
        self.basis.distinct_possible_indices()
    }

    fn minimum_number_of_players(&self) -> usize {
        self.basis.minimum_number_of_players()
    }

    fn maximum_number_of_players(&self) -> usize {
        self.basis.maximum_number_of_players()
    }

    fn maximum_number_of_hints(&self) -> i32 {
        self.basis.maximum_number_of_hints()
    }

    fn number_of_mistakes_indicating_game_over(&self) -> i32 {
        self.basis.number_of_mistakes_indicating_game_over()
    }

    fn is_card_playable(&self, card: &Card, already_played: &[Card]) -> bool {
        self.basis.is_card_playable(card, already_played)
    }

    fn hints_for_playing_card(&self, card: &Card) -> i32 {
        self.basis.hints_for_playing_card(card)
    }

    fn points_for_card(&self, card: &Card) -> i32 {
        self.basis.points_for_card(card)
    }

    fn colors_available_as_hint(&self) -> Vec<String> {
        self.color_suits()
            .into_iter()
            .filter(|color| color != RAINBOW_SUIT)
            .collect()
    }

    fn indices_available_as_hint(&self) -> Vec<u32> {
        self.basis.indices_available_as_hint()
    }

    fn knowledge_after_color_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        color: &str,
    ) -> Vec<InferredCard> {
        knowledge
            .iter()
            .zip(hand)
            .map(|(inferred, card)| {
                let mut updated = inferred.clone();
                let answers = card.color_suit() == color || card.color_suit() == RAINBOW_SUIT;
                if answers {
                    updated.retain_colors(|c| c == color || c == RAINBOW_SUIT);
                } else {
                    updated.retain_colors(|c| c != color && c != RAINBOW_SUIT);
                }
                updated
            })
            .collect()
    }

    fn knowledge_after_index_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        index: u32,
    ) -> Vec<InferredCard> {
        self.basis.knowledge_after_index_hint(knowledge, hand, index)
    }
}

/// Stable identifier of a ruleset, used in stored records and on the command line.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RulesetId {
    /// [`StandardWithoutRainbow`].
    Standard,
    /// [`WithRainbowAsSeparateSuit`].
    RainbowAsSeparateSuit,
    /// [`WithRainbowAsCompoundSuit`].
    RainbowAsCompoundSuit,
}

/// One of the known rulesets.
///
/// Stored and transmitted as its [`RulesetId`]; the policy object is rebuilt
/// on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RulesetId", from = "RulesetId")]
pub enum Ruleset {
    /// Five suits.
    Standard(StandardWithoutRainbow),
    /// Six suits, rainbow hinted like any colour.
    RainbowAsSeparateSuit(WithRainbowAsSeparateSuit),
    /// Six suits, rainbow answers every colour hint.
    RainbowAsCompoundSuit(WithRainbowAsCompoundSuit),
}

impl Ruleset {
    /// The identifier this ruleset is stored under.
    pub fn id(&self) -> RulesetId {
        match self {
            Self::Standard(_) => RulesetId::Standard,
            Self::RainbowAsSeparateSuit(_) => RulesetId::RainbowAsSeparateSuit,
            Self::RainbowAsCompoundSuit(_) => RulesetId::RainbowAsCompoundSuit,
        }
    }

    /// Every known ruleset, in identifier order.
    pub fn all() -> Vec<Self> {
        RulesetId::iter().map(Self::from).collect()
    }

    /// Knowledge of a card nobody has hinted about yet.
    pub fn unknown_card(&self) -> InferredCard {
        InferredCard::unknown(&self.color_suits(), &self.distinct_possible_indices())
    }

    fn rules(&self) -> &dyn Rules {
        match self {
            Self::Standard(rules) => rules,
            Self::RainbowAsSeparateSuit(rules) => rules,
            Self::RainbowAsCompoundSuit(rules) => rules,
        }
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::from(RulesetId::Standard)
    }
}

impl From<RulesetId> for Ruleset {
    #[instrument]
    fn from(id: RulesetId) -> Self {
        match id {
            RulesetId::Standard => Self::Standard(StandardWithoutRainbow),
            RulesetId::RainbowAsSeparateSuit => {
                Self::RainbowAsSeparateSuit(WithRainbowAsSeparateSuit::default())
            }
            RulesetId::RainbowAsCompoundSuit => {
                Self::RainbowAsCompoundSuit(WithRainbowAsCompoundSuit::default())
            }
        }
    }
}

impl From<Ruleset> for RulesetId {
    fn from(ruleset: Ruleset) -> Self {
        ruleset.id()
    }
}

impl Rules for Ruleset {
    fn frontend_description(&self) -> String {
        self.rules().frontend_description()
    }

    fn copy_of_full_cardset(&self) -> Vec<Card> {
        self.rules().copy_of_full_cardset()
    }

    fn number_of_cards_in_player_hand(&self, player_count: usize) -> usize {
        self.rules().number_of_cards_in_player_hand(player_count)
    }

    fn color_suits(&self) -> Vec<String> {
        self.rules().color_suits()
    }

    fn distinct_possible_indices(&self) -> Vec<u32> {
        self.rules().distinct_possible_indices()
    }

    fn minimum_number_of_players(&self) -> usize {
        self.rules().minimum_number_of_players()
    }

    fn maximum_number_of_players(&self) -> usize {
        self.rules().maximum_number_of_players()
    }

    fn maximum_number_of_hints(&self) -> i32 {
        self.rules().maximum_number_of_hints()
    }

    fn number_of_mistakes_indicating_game_over(&self) -> i32 {
        self.rules().number_of_mistakes_indicating_game_over()
    }

    fn is_card_playable(&self, card: &Card, already_played: &[Card]) -> bool {
        self.rules().is_card_playable(card, already_played)
    }

    fn hints_for_playing_card(&self, card: &Card) -> i32 {
        self.rules().hints_for_playing_card(card)
    }

    fn points_for_card(&self, card: &Card) -> i32 {
        self.rules().points_for_card(card)
    }

    fn colors_available_as_hint(&self) -> Vec<String> {
        self.rules().colors_available_as_hint()
    }

    fn indices_available_as_hint(&self) -> Vec<u32> {
        self.rules().indices_available_as_hint()
    }

    fn knowledge_after_color_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        color: &str,
    ) -> Vec<InferredCard> {
        self.rules().knowledge_after_color_hint(knowledge, hand, color)
    }

    fn knowledge_after_index_hint(
        &self,
        knowledge: &[InferredCard],
        hand: &[Card],
        index: u32,
    ) -> Vec<InferredCard> {
        self.rules().knowledge_after_index_hint(knowledge, hand, index)
    }
}
