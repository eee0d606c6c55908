//! Tests for the game ledger.

mod common;

use hanabi_engine::{
    Card, GameErrorKind, GameState, InferredCard, Participant, Rules, Ruleset, RulesetId,
};
use proptest::prelude::*;

use common::{empty_log, two_player_deal};

fn new_game() -> GameState {
    let ruleset = Ruleset::from(RulesetId::Standard);
    let (players, deck) = two_player_deal(&ruleset);
    GameState::new("table".to_string(), ruleset, 4, empty_log(4), players, deck)
}

fn alice() -> Participant {
    Participant::new("alice", "red")
}

fn bob() -> Participant {
    Participant::new("bob", "blue")
}

fn unknown() -> InferredCard {
    Ruleset::default().unknown_card()
}

fn newest_action(state: &GameState) -> String {
    state
        .action_log()
        .newest()
        .map(|m| m.text().clone())
        .unwrap_or_default()
}

#[test]
fn test_new_game_starts_at_turn_one_with_full_hints() {
    let state = new_game();
    assert_eq!(state.turn(), 1);
    assert_eq!(state.current_player(), "alice");
    assert_eq!(state.number_of_ready_hints(), 8);
    assert_eq!(state.number_of_mistakes_made(), 0);
    assert_eq!(state.deck_size(), 3);
    assert_eq!(state.total_card_count(), 13);
    assert_eq!(state.chat_log().capacity(), 4);
    assert_eq!(state.action_log().capacity(), 4);
    assert!(state.action_log().newest().is_none());
}

#[test]
fn test_play_moves_card_and_draws_from_deck_front() {
    let mut state = new_game();
    state
        .enact_turn_by_playing_and_replacing("played red 1", &alice(), 0, unknown(), 0)
        .expect("Play should succeed");

    assert_eq!(state.played_for_color("red"), &[Card::new("red", 1)]);
    assert_eq!(
        state.visible_hand("alice").expect("hand")[0],
        Card::new("red", 3)
    );
    assert_eq!(state.deck_size(), 2);
    assert_eq!(state.turn(), 2);
    assert_eq!(state.current_player(), "bob");
    assert_eq!(newest_action(&state), "played red 1");
    assert_eq!(
        state
            .action_log()
            .newest()
            .map(|m| m.player_name().clone()),
        Some("alice".to_string())
    );
}

#[test]
fn test_discard_applies_deltas_without_clamping() {
    let mut state = new_game();
    state
        .enact_turn_by_discarding_and_replacing("discarded", &alice(), 2, unknown(), 1, 2)
        .expect("Discard should succeed");

    assert_eq!(state.number_of_discarded_cards(&Card::new("blue", 5)), 1);
    assert_eq!(state.number_of_ready_hints(), 9);
    assert_eq!(state.number_of_mistakes_made(), 2);
    assert_eq!(state.turn(), 2);
}

#[test]
fn test_hand_shrinks_once_deck_is_empty() {
    let mut state = new_game();
    for (turn, player) in [alice(), bob(), alice()].iter().enumerate() {
        state
            .enact_turn_by_discarding_and_replacing("d", player, 0, unknown(), 0, 0)
            .unwrap_or_else(|e| panic!("Discard {} failed: {}", turn, e));
    }
    assert_eq!(state.deck_size(), 0);
    assert_eq!(state.hand("alice").expect("hand").len(), 5);

    state
        .enact_turn_by_discarding_and_replacing("d", &bob(), 4, unknown(), 0, 0)
        .expect("Discard should succeed");
    assert_eq!(state.hand("bob").expect("hand").len(), 4);
    assert_eq!(state.number_of_discarded_cards(&Card::new("white", 1)), 1);
    assert_eq!(state.total_card_count(), 13);
}

#[test]
fn test_bad_index_logs_error_and_keeps_turn() {
    let mut state = new_game();
    let before = state.hand("alice").expect("hand").to_vec();

    let err = state
        .enact_turn_by_playing_and_replacing("played", &alice(), 5, unknown(), 0)
        .expect_err("Index 5 is outside a five-card hand");

    assert_eq!(
        err.kind(),
        &GameErrorKind::IndexOutOfRange {
            index: 5,
            hand_size: 5
        }
    );
    assert_eq!(state.turn(), 1);
    assert_eq!(state.hand("alice").expect("hand"), before.as_slice());
    assert_eq!(state.deck_size(), 3);
    assert_eq!(newest_action(&state), err.kind().to_string());
}

#[test]
fn test_unknown_player_has_no_hand() {
    let mut state = new_game();
    let stranger = Participant::new("mallory", "black");
    let err = state
        .enact_turn_by_discarding_and_replacing("d", &stranger, 0, unknown(), 1, 0)
        .expect_err("Stranger holds no hand");
    assert_eq!(err.kind(), &GameErrorKind::NoSuchHand("mallory".to_string()));
    assert_eq!(state.number_of_ready_hints(), 8);
}

#[test]
fn test_hint_replaces_knowledge() {
    let mut state = new_game();
    let ruleset = *state.ruleset();
    let knowledge = ruleset.knowledge_after_index_hint(
        &state.inferred_hand("bob").expect("knowledge"),
        &state.visible_hand("bob").expect("hand"),
        1,
    );

    state
        .enact_turn_by_updating_hand_with_hint(
            "told bob about 1s",
            &alice(),
            "bob",
            knowledge.clone(),
            1,
        )
        .expect("Hint should succeed");

    assert_eq!(state.inferred_hand("bob").expect("hand"), knowledge);
    assert_eq!(state.number_of_ready_hints(), 7);
    assert_eq!(state.turn(), 2);
}

#[test]
fn test_hint_size_mismatch_rejected() {
    let mut state = new_game();
    let err = state
        .enact_turn_by_updating_hand_with_hint("hint", &alice(), "bob", vec![unknown(); 3], 1)
        .expect_err("Three entries for a five-card hand");
    assert_eq!(
        err.kind(),
        &GameErrorKind::SizeMismatch {
            expected: 5,
            actual: 3
        }
    );
    assert_eq!(state.number_of_ready_hints(), 8);
    assert_eq!(state.turn(), 1);
    assert_eq!(newest_action(&state), err.kind().to_string());
}

#[test]
fn test_chat_does_not_advance_turn() {
    let mut state = new_game();
    state
        .record_chat_message(&bob(), "hello")
        .expect("Chat should succeed");
    assert_eq!(state.turn(), 1);
    assert_eq!(
        state.chat_log().newest().map(|m| m.text().clone()),
        Some("hello".to_string())
    );

    let err = state
        .record_chat_message(&Participant::new("mallory", "black"), "hi")
        .expect_err("Outsiders cannot chat");
    assert!(matches!(err.kind(), GameErrorKind::NotAParticipant { .. }));
}

#[test]
fn test_state_survives_json() {
    let mut state = new_game();
    state
        .enact_turn_by_discarding_and_replacing("d", &alice(), 0, unknown(), 0, 0)
        .expect("Discard should succeed");
    let json = serde_json::to_string(&state).expect("serialize");
    let back: GameState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, state);
}

/// One ledger call with arbitrary arguments.
#[derive(Debug, Clone)]
enum Step {
    Play(usize),
    Discard(usize),
    Hint(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..7).prop_map(Step::Play),
        (0usize..7).prop_map(Step::Discard),
        (0usize..7).prop_map(Step::Hint),
    ]
}

proptest! {
    #[test]
    fn prop_cards_are_conserved_and_turns_never_go_back(steps in prop::collection::vec(step(), 0..40)) {
        let mut state = new_game();
        let total = state.total_card_count();

        for step in steps {
            let turn_before = state.turn();
            let actor = if state.current_player() == "alice" { alice() } else { bob() };
            let other = if actor.name() == "alice" { "bob" } else { "alice" };

            let outcome = match step {
                Step::Play(i) => state.enact_turn_by_playing_and_replacing("p", &actor, i, unknown(), 0),
                Step::Discard(i) => state.enact_turn_by_discarding_and_replacing("d", &actor, i, unknown(), 0, 0),
                Step::Hint(n) => state.enact_turn_by_updating_hand_with_hint("h", &actor, other, vec![unknown(); n], 0),
            };

            prop_assert_eq!(state.total_card_count(), total);
            if outcome.is_ok() {
                prop_assert_eq!(state.turn(), turn_before + 1);
            } else {
                prop_assert_eq!(state.turn(), turn_before);
            }
        }
    }
}
