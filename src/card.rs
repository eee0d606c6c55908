//! Card identities, hand knowledge and the seeded deck shuffle.

use derive_getters::Getters;
use derive_new::new;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A physical card: a colour suit and a position in that suit's sequence.
///
/// Cards are values. Two cards with the same suit and index are
/// indistinguishable, which is what lets the discard pile count them.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Getters, new,
)]
pub struct Card {
    /// Suit the card belongs to, e.g. `"red"`.
    #[new(into)]
    color_suit: String,
    /// Position in the suit sequence, starting at 1.
    sequence_index: u32,
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color_suit, self.sequence_index)
    }
}

/// What can be deduced about one card in a hand from the hints given so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct InferredCard {
    /// Colours not yet ruled out.
    possible_colors: Vec<String>,
    /// Indices not yet ruled out.
    possible_indices: Vec<u32>,
}

impl InferredCard {
    /// Knowledge of a freshly drawn card: anything the ruleset allows.
    pub fn unknown(colors: &[String], indices: &[u32]) -> Self {
        Self {
            possible_colors: colors.to_vec(),
            possible_indices: indices.to_vec(),
        }
    }

    /// Returns true once hints have pinned down both colour and index.
    pub fn is_fully_known(&self) -> bool {
        self.possible_colors.len() == 1 && self.possible_indices.len() == 1
    }

    /// Keeps only the colours accepted by `keep`.
    pub fn retain_colors(&mut self, keep: impl Fn(&str) -> bool) {
        self.possible_colors.retain(|color| keep(color));
    }

    /// Keeps only the indices accepted by `keep`.
    pub fn retain_indices(&mut self, keep: impl Fn(u32) -> bool) {
        self.possible_indices.retain(|index| keep(*index));
    }
}

/// A card sitting in a player's hand together with the holder's knowledge of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct InHandCard {
    /// The physical card, hidden from its holder.
    card: Card,
    /// The holder's deductions about the card.
    inferred: InferredCard,
}

impl InHandCard {
    /// Replaces the holder's knowledge of this card.
    pub fn set_inferred(&mut self, inferred: InferredCard) {
        self.inferred = inferred;
    }
}

/// Shuffles `cards` with a Fisher–Yates pass driven only by `seed`.
///
/// Walks from the back of the slice, swapping each position with a uniformly
/// chosen position in `[0, remaining)`. The same seed always produces the
/// same permutation.
#[instrument(skip(cards), fields(card_count = cards.len()))]
pub fn shuffle_in_place<T>(cards: &mut [T], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for remaining in (1..=cards.len()).rev() {
        let chosen = rng.gen_range(0..remaining);
        cards.swap(remaining - 1, chosen);
    }
}
