//! Property tests for seeded shuffling.

use hanabi_engine::{Card, Rules, Ruleset, RulesetId, shuffle_in_place};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_shuffle_is_a_permutation(seed in any::<u64>(), len in 0usize..80) {
        let original: Vec<usize> = (0..len).collect();
        let mut shuffled = original.clone();
        shuffle_in_place(&mut shuffled, seed);

        let mut sorted = shuffled.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, original);
    }

    #[test]
    fn prop_same_seed_same_deck(seed in any::<u64>()) {
        let ruleset = Ruleset::from(RulesetId::RainbowAsSeparateSuit);
        let mut first = ruleset.copy_of_full_cardset();
        let mut second = ruleset.copy_of_full_cardset();
        shuffle_in_place(&mut first, seed);
        shuffle_in_place(&mut second, seed);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_shuffle_moves_cards() {
    let mut deck = Ruleset::default().copy_of_full_cardset();
    let unshuffled = deck.clone();
    shuffle_in_place(&mut deck, 2024);
    assert_ne!(deck, unshuffled);
    assert_eq!(deck.len(), 50);
    assert!(deck.contains(&Card::new("white", 5)));
}

#[test]
fn test_shuffles_do_not_pin_positions() {
    let deck: Vec<usize> = (0..50).collect();
    let mut pinned = 0;
    for seed in 0..200 {
        let mut shuffled = deck.clone();
        shuffle_in_place(&mut shuffled, seed);
        pinned += shuffled.iter().zip(&deck).filter(|(a, b)| a == b).count();
    }
    // About one fixed point per shuffle is expected.
    assert!(pinned < 200 * 4, "{} fixed points over 200 shuffles", pinned);
}
