//! Tests for ruleset policies.

use std::str::FromStr;

use hanabi_engine::{Card, RAINBOW_SUIT, Rules, Ruleset, RulesetId};

fn standard() -> Ruleset {
    Ruleset::from(RulesetId::Standard)
}

fn separate() -> Ruleset {
    Ruleset::from(RulesetId::RainbowAsSeparateSuit)
}

fn compound() -> Ruleset {
    Ruleset::from(RulesetId::RainbowAsCompoundSuit)
}

#[test]
fn test_full_cardset_sizes() {
    assert_eq!(standard().copy_of_full_cardset().len(), 50);
    assert_eq!(separate().copy_of_full_cardset().len(), 60);
    assert_eq!(compound().copy_of_full_cardset().len(), 60);
}

#[test]
fn test_index_multiplicities_per_suit() {
    let deck = standard().copy_of_full_cardset();
    let count = |index: u32| {
        deck.iter()
            .filter(|c| c.color_suit() == "red" && *c.sequence_index() == index)
            .count()
    };
    assert_eq!(
        [count(1), count(2), count(3), count(4), count(5)],
        [3, 2, 2, 2, 1]
    );
}

#[test]
fn test_hand_size_depends_on_player_count() {
    let rules = standard();
    assert_eq!(rules.number_of_cards_in_player_hand(2), 5);
    assert_eq!(rules.number_of_cards_in_player_hand(3), 5);
    assert_eq!(rules.number_of_cards_in_player_hand(4), 4);
    assert_eq!(rules.number_of_cards_in_player_hand(5), 4);
}

#[test]
fn test_limits() {
    for rules in Ruleset::all() {
        assert_eq!(rules.minimum_number_of_players(), 2);
        assert_eq!(rules.maximum_number_of_players(), 5);
        assert_eq!(rules.maximum_number_of_hints(), 8);
        assert_eq!(rules.number_of_mistakes_indicating_game_over(), 3);
    }
}

#[test]
fn test_playability_follows_sequence() {
    let rules = standard();
    assert!(rules.is_card_playable(&Card::new("red", 1), &[]));
    assert!(!rules.is_card_playable(&Card::new("red", 2), &[]));

    let played = vec![Card::new("red", 1), Card::new("red", 2)];
    assert!(rules.is_card_playable(&Card::new("red", 3), &played));
    assert!(!rules.is_card_playable(&Card::new("red", 2), &played));
    assert!(!rules.is_card_playable(&Card::new("red", 4), &played));
}

#[test]
fn test_completing_a_suit_returns_a_hint() {
    let rules = standard();
    assert_eq!(rules.hints_for_playing_card(&Card::new("blue", 5)), 1);
    assert_eq!(rules.hints_for_playing_card(&Card::new("blue", 4)), 0);
    assert_eq!(rules.points_for_card(&Card::new("blue", 4)), 1);
}

#[test]
fn test_hint_colours_per_variant() {
    assert!(!standard()
        .colors_available_as_hint()
        .iter()
        .any(|c| c == RAINBOW_SUIT));
    assert!(separate()
        .colors_available_as_hint()
        .iter()
        .any(|c| c == RAINBOW_SUIT));
    assert!(!compound()
        .colors_available_as_hint()
        .iter()
        .any(|c| c == RAINBOW_SUIT));
    assert_eq!(compound().color_suits().len(), 6);
}

#[test]
fn test_colour_hint_narrows_knowledge() {
    let rules = standard();
    let hand = vec![Card::new("red", 1), Card::new("blue", 2)];
    let knowledge = vec![rules.unknown_card(), rules.unknown_card()];

    let updated = rules.knowledge_after_color_hint(&knowledge, &hand, "red");
    assert_eq!(updated[0].possible_colors(), &vec!["red".to_string()]);
    assert_eq!(updated[1].possible_colors().len(), 4);
    assert!(!updated[1].possible_colors().contains(&"red".to_string()));
    assert_eq!(updated[1].possible_indices().len(), 5);
}

#[test]
fn test_index_hint_narrows_knowledge() {
    let rules = standard();
    let hand = vec![Card::new("red", 1), Card::new("blue", 2)];
    let knowledge = vec![rules.unknown_card(), rules.unknown_card()];

    let updated = rules.knowledge_after_index_hint(&knowledge, &hand, 2);
    assert_eq!(updated[0].possible_indices(), &vec![1, 3, 4, 5]);
    assert_eq!(updated[1].possible_indices(), &vec![2]);
}

#[test]
fn test_rainbow_answers_every_colour_hint_when_compound() {
    let rules = compound();
    let hand = vec![Card::new(RAINBOW_SUIT, 3), Card::new("green", 3)];
    let knowledge = vec![rules.unknown_card(), rules.unknown_card()];

    let updated = rules.knowledge_after_color_hint(&knowledge, &hand, "red");
    assert_eq!(
        updated[0].possible_colors(),
        &vec!["red".to_string(), RAINBOW_SUIT.to_string()]
    );
    assert!(!updated[1].possible_colors().contains(&RAINBOW_SUIT.to_string()));
    assert!(!updated[1].possible_colors().contains(&"red".to_string()));
}

#[test]
fn test_rainbow_is_plain_suit_when_separate() {
    let rules = separate();
    let hand = vec![Card::new(RAINBOW_SUIT, 3)];
    let knowledge = vec![rules.unknown_card()];

    let updated = rules.knowledge_after_color_hint(&knowledge, &hand, "red");
    assert!(!updated[0].possible_colors().contains(&"red".to_string()));
    assert!(updated[0].possible_colors().contains(&RAINBOW_SUIT.to_string()));
}

#[test]
fn test_identifier_round_trip() {
    for rules in Ruleset::all() {
        let id = rules.id();
        let parsed = RulesetId::from_str(&id.to_string()).expect("Identifier should parse");
        assert_eq!(Ruleset::from(parsed), rules);
    }
    assert_eq!(
        RulesetId::from_str("rainbow_as_compound_suit").expect("parse"),
        RulesetId::RainbowAsCompoundSuit
    );
    assert!(RulesetId::from_str("no_such_rules").is_err());
}

#[test]
fn test_ruleset_serializes_as_identifier() {
    let json = serde_json::to_string(&compound()).expect("serialize");
    assert_eq!(json, "\"rainbow_as_compound_suit\"");
    let back: Ruleset = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, compound());
}

#[test]
fn test_descriptions_differ() {
    let descriptions: Vec<String> = Ruleset::all()
        .iter()
        .map(|r| r.frontend_description())
        .collect();
    assert_eq!(descriptions.len(), 3);
    assert_ne!(descriptions[0], descriptions[1]);
    assert_ne!(descriptions[1], descriptions[2]);
}
