//! Tests for a player's restricted view.

mod common;

use hanabi_engine::{
    Card, GameErrorKind, GameState, Participant, PlayerNameWithHand, PlayerView, Ruleset,
    RulesetId,
};

use common::{cards, empty_log, hand, two_player_deal};

fn two_player_game() -> GameState {
    let ruleset = Ruleset::from(RulesetId::Standard);
    let (players, deck) = two_player_deal(&ruleset);
    GameState::new("table".to_string(), ruleset, 4, empty_log(4), players, deck)
}

fn three_player_game() -> GameState {
    let ruleset = Ruleset::default();
    let players = ["alice", "bob", "carol"]
        .iter()
        .map(|name| {
            PlayerNameWithHand::new(
                *name,
                hand(
                    &ruleset,
                    &[("red", 1), ("red", 2), ("red", 3), ("red", 4), ("red", 5)],
                ),
            )
        })
        .collect();
    GameState::new(
        "trio".to_string(),
        ruleset,
        4,
        empty_log(4),
        players,
        cards(&[("blue", 1)]),
    )
}

fn discard(state: &mut GameState, player: &str, index: usize, mistakes: i32) {
    let unknown = state.ruleset().unknown_card();
    state
        .enact_turn_by_discarding_and_replacing(
            "d",
            &Participant::new(player, "grey"),
            index,
            unknown,
            0,
            mistakes,
        )
        .expect("Discard should succeed");
}

#[test]
fn test_viewer_must_be_participant() {
    let err = PlayerView::new(two_player_game(), "mallory").expect_err("Not seated");
    assert_eq!(
        err.kind(),
        &GameErrorKind::NotAParticipant {
            player: "mallory".to_string(),
            game: "table".to_string()
        }
    );
}

#[test]
fn test_own_hand_is_hidden() {
    let view = PlayerView::new(two_player_game(), "alice").expect("view");
    let err = view.visible_hand("alice").expect_err("Own hand is hidden");
    assert_eq!(
        err.kind(),
        &GameErrorKind::SelfViewForbidden("alice".to_string())
    );

    let bob = view.visible_hand("bob").expect("Other hands are visible");
    assert_eq!(bob[0], Card::new("yellow", 1));

    let known = view.knowledge_of_own_hand().expect("knowledge");
    assert_eq!(known.len(), 5);
    assert!(known.iter().all(|k| !k.is_fully_known()));
}

#[test]
fn test_turn_order_starts_with_current_player() {
    let mut state = three_player_game();
    discard(&mut state, "alice", 0, 0);

    let view = PlayerView::new(state, "alice").expect("view");
    let (order, position) = view.current_turn_order();
    assert_eq!(order, ["bob", "carol", "alice"]);
    assert_eq!(position, 2);
    assert!(!view.is_viewers_turn());

    let bob_view = PlayerView::new(view.state().clone(), "bob").expect("view");
    assert_eq!(bob_view.current_turn_order().1, 0);
    assert!(bob_view.is_viewers_turn());
}

#[test]
fn test_score_counts_played_cards() {
    let mut state = two_player_game();
    let unknown = state.ruleset().unknown_card();
    state
        .enact_turn_by_playing_and_replacing("p", &Participant::new("alice", "red"), 0, unknown, 0)
        .expect("Play should succeed");

    let view = PlayerView::new(state, "bob").expect("view");
    assert_eq!(view.score(), 1);
    assert_eq!(view.maximum_possible_score(), 25);
    assert_eq!(view.played_cards()[0], vec![Card::new("red", 1)]);
    assert!(view.played_cards()[1].is_empty());
}

#[test]
fn test_score_is_zero_after_too_many_mistakes() {
    let mut state = two_player_game();
    let unknown = state.ruleset().unknown_card();
    state
        .enact_turn_by_playing_and_replacing("p", &Participant::new("alice", "red"), 0, unknown, 0)
        .expect("Play should succeed");
    discard(&mut state, "bob", 0, 3);

    let view = PlayerView::new(state, "alice").expect("view");
    assert_eq!(view.number_of_mistakes_made(), 3);
    assert_eq!(view.score(), 0);
    assert!(view.game_is_finished().expect("finished check"));
}

#[test]
fn test_rainbow_raises_maximum_score() {
    let ruleset = Ruleset::from(RulesetId::RainbowAsSeparateSuit);
    let (players, deck) = two_player_deal(&ruleset);
    let state = GameState::new("rainbow".to_string(), ruleset, 4, empty_log(4), players, deck);
    let view = PlayerView::new(state, "alice").expect("view");
    assert_eq!(view.maximum_possible_score(), 30);
    assert_eq!(view.played_cards().len(), 6);
}

#[test]
fn test_game_ends_when_deck_runs_out_and_round_completes() {
    let mut state = three_player_game();
    let view = PlayerView::new(state.clone(), "alice").expect("view");
    assert!(!view.game_is_finished().expect("check"));

    // alice draws the last card; bob, carol and alice each get one more turn.
    discard(&mut state, "alice", 0, 0);
    for player in ["bob", "carol"] {
        let view = PlayerView::new(state.clone(), "alice").expect("view");
        assert!(!view.game_is_finished().expect("check"));
        discard(&mut state, player, 0, 0);
    }

    let view = PlayerView::new(state.clone(), "alice").expect("view");
    assert!(!view.game_is_finished().expect("check"));
    discard(&mut state, "alice", 0, 0);

    let view = PlayerView::new(state, "alice").expect("view");
    assert_eq!(view.deck_size(), 0);
    assert!(view.game_is_finished().expect("check"));
}

#[test]
fn test_discards_sorted_by_suit_then_index() {
    let mut state = two_player_game();
    discard(&mut state, "alice", 4, 0); // white 3
    discard(&mut state, "bob", 1, 0); // red 1
    discard(&mut state, "alice", 2, 0); // blue 5

    let view = PlayerView::new(state, "bob").expect("view");
    assert_eq!(
        view.discarded_cards(),
        vec![
            Card::new("red", 1),
            Card::new("blue", 5),
            Card::new("white", 3)
        ]
    );
}

#[test]
fn test_logs_have_fixed_length() {
    let mut state = two_player_game();
    state
        .record_chat_message(&Participant::new("bob", "blue"), "hi")
        .expect("chat");
    let view = PlayerView::new(state, "alice").expect("view");
    assert_eq!(view.chat_log().len(), 4);
    assert_eq!(view.action_log().len(), 4);
    assert_eq!(view.chat_log()[3].text(), "hi");
    assert!(view.chat_log()[0].is_empty());
}
