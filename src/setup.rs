//! Dealing and registering a new game.

use tracing::{info, instrument, warn};

use crate::card::{Card, InHandCard, shuffle_in_place};
use crate::config::EngineConfig;
use crate::error::{GameError, GameErrorKind};
use crate::log::Message;
use crate::persister::StatePersister;
use crate::ruleset::{Rules, Ruleset};
use crate::state::PlayerNameWithHand;

/// Shuffles a full deck, deals every player a hand and stores the game.
///
/// Players act in the order given. The deck is shuffled with a seed drawn
/// from the persister, so a persister with a fixed seed source deals the
/// same games every run.
///
/// # Errors
///
/// `PlayerCount` if the number of players is outside the ruleset's range,
/// `DuplicatePlayer` if a name appears twice.
/// Errors from [`StatePersister::add_game`] are passed through.
#[instrument(skip(persister, config), fields(ruleset = %ruleset.id(), players = players.len()))]
pub fn create_game(
    persister: &dyn StatePersister,
    config: &EngineConfig,
    name: &str,
    ruleset: Ruleset,
    players: &[String],
) -> Result<(), GameError> {
    let minimum = ruleset.minimum_number_of_players();
    let maximum = ruleset.maximum_number_of_players();
    if players.len() < minimum || players.len() > maximum {
        warn!(minimum, maximum, "Player count outside ruleset range");
        return Err(GameError::new(GameErrorKind::PlayerCount {
            requested: players.len(),
            minimum,
            maximum,
        }));
    }

    if let Some(duplicate) = players
        .iter()
        .enumerate()
        .find_map(|(i, p)| players[..i].contains(p).then_some(p))
    {
        warn!(player = %duplicate, "Duplicate player in roster");
        return Err(GameError::new(GameErrorKind::DuplicatePlayer(
            duplicate.clone(),
        )));
    }

    let mut deck = ruleset.copy_of_full_cardset();
    let seed = persister.random_seed();
    shuffle_in_place(&mut deck, seed);

    let hand_size = ruleset.number_of_cards_in_player_hand(players.len());
    let mut remaining = deck.into_iter();
    let players_with_hands = players
        .iter()
        .map(|player| {
            let hand = remaining
                .by_ref()
                .take(hand_size)
                .map(|card| InHandCard::new(card, ruleset.unknown_card()))
                .collect();
            PlayerNameWithHand::new(player.as_str(), hand)
        })
        .collect();
    let deck = remaining.collect();

    add_with_opening_log(persister, config, name, ruleset, players_with_hands, deck)?;
    info!(seed, "Game dealt");
    Ok(())
}

/// Stores the dealt game with an action log whose newest entry announces it.
fn add_with_opening_log(
    persister: &dyn StatePersister,
    config: &EngineConfig,
    name: &str,
    ruleset: Ruleset,
    players_with_hands: Vec<PlayerNameWithHand>,
    deck: Vec<Card>,
) -> Result<(), GameError> {
    let length = *config.action_log_length();
    let mut action_log = vec![Message::default(); length.saturating_sub(1)];
    if length > 0 {
        action_log.push(Message::new(
            "",
            "",
            format!("game {} started: {}", name, ruleset.frontend_description()),
        ));
    }

    persister.add_game(
        name,
        *config.chat_log_length(),
        action_log,
        ruleset,
        players_with_hands,
        deck,
    )
}
