//! Shared fixtures for integration tests.

#![allow(dead_code)]

use hanabi_engine::{
    Card, InHandCard, InMemoryPersister, Message, PlayerNameWithHand, Ruleset, SeedSource,
    SqlitePersister, StatePersister,
};
use tempfile::NamedTempFile;

/// Deals `cards` into a hand with no knowledge yet.
pub fn hand(ruleset: &Ruleset, cards: &[(&str, u32)]) -> Vec<InHandCard> {
    cards
        .iter()
        .map(|(color, index)| InHandCard::new(Card::new(*color, *index), ruleset.unknown_card()))
        .collect()
}

/// Cards in draw order.
pub fn cards(cards: &[(&str, u32)]) -> Vec<Card> {
    cards
        .iter()
        .map(|(color, index)| Card::new(*color, *index))
        .collect()
}

/// Alice and Bob with known hands, and a three-card deck.
///
/// Alice: red 1, red 2, blue 5, green 1, white 3.
/// Bob: yellow 1, red 1, green 2, blue 1, white 1.
/// Deck: red 3, green 3, blue 2.
pub fn two_player_deal(ruleset: &Ruleset) -> (Vec<PlayerNameWithHand>, Vec<Card>) {
    let players = vec![
        PlayerNameWithHand::new(
            "alice",
            hand(
                ruleset,
                &[("red", 1), ("red", 2), ("blue", 5), ("green", 1), ("white", 3)],
            ),
        ),
        PlayerNameWithHand::new(
            "bob",
            hand(
                ruleset,
                &[("yellow", 1), ("red", 1), ("green", 2), ("blue", 1), ("white", 1)],
            ),
        ),
    ];
    let deck = cards(&[("red", 3), ("green", 3), ("blue", 2)]);
    (players, deck)
}

/// An action log of `length` empty slots.
pub fn empty_log(length: usize) -> Vec<Message> {
    vec![Message::default(); length]
}

/// Stores the two-player deal under `name`.
pub fn add_two_player_game(persister: &dyn StatePersister, name: &str, ruleset: Ruleset) {
    let (players, deck) = two_player_deal(&ruleset);
    persister
        .add_game(name, 8, empty_log(8), ruleset, players, deck)
        .expect("Failed to add game");
}

/// A persister of each backing. The temp file must stay alive with its persister.
pub fn backings() -> Vec<(&'static str, Option<NamedTempFile>, Box<dyn StatePersister>)> {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let sqlite = SqlitePersister::open(db_path, SeedSource::from_seed(7))
        .expect("Failed to open SQLite persister");

    vec![
        (
            "memory",
            None,
            Box::new(InMemoryPersister::new(SeedSource::from_seed(7))),
        ),
        ("sqlite", Some(db_file), Box::new(sqlite)),
    ]
}
