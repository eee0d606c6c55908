//! Hanabi engine - command-line front end
//!
//! Deals games, plays them with the built-in bot and inspects stored games.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use hanabi_engine::{
    EngineConfig, Participant, PlayerView, Ruleset, RulesetId, StatePersister, choose_move,
    create_game,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

const CHAT_COLORS: [&str; 5] = ["#e06c75", "#98c379", "#61afef", "#e5c07b", "#c678dd"];

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    let persister = config
        .open_persister()
        .context("Failed to open game storage")?;

    match cli.command {
        Command::Simulate {
            name,
            ruleset,
            players,
            max_turns,
        } => simulate(persister.as_ref(), &config, &name, ruleset, &players, max_turns),
        Command::List { player } => list(persister.as_ref(), &player),
        Command::Show { game, player } => show(persister.as_ref(), &game, &player),
        Command::Delete { game } => {
            persister.delete(&game)?;
            println!("Deleted {}", game);
            Ok(())
        }
    }
}

#[instrument]
fn load_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    let path = path.or_else(|| std::env::var_os("HANABI_CONFIG").map(PathBuf::from));
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading engine configuration");
            Ok(EngineConfig::from_file(&path)?)
        }
        None => {
            info!("No config file given, using defaults");
            Ok(EngineConfig::default())
        }
    }
}

#[instrument(skip(persister, config, players))]
fn simulate(
    persister: &dyn StatePersister,
    config: &EngineConfig,
    name: &str,
    ruleset: RulesetId,
    players: &[String],
    max_turns: u32,
) -> Result<()> {
    create_game(persister, config, name, Ruleset::from(ruleset), players)?;
    let game = persister.read_and_write_game(name)?;

    let seats: Vec<Participant> = players
        .iter()
        .zip(CHAT_COLORS.iter().cycle())
        .map(|(player, color)| Participant::new(player.as_str(), *color))
        .collect();

    loop {
        let state = game.read()?;
        if state.is_finished()? {
            break;
        }
        if state.turn() > max_turns {
            warn!(max_turns, "Turn limit reached before the game ended");
            break;
        }

        let current = state.current_player().to_string();
        let seat = seats
            .iter()
            .find(|seat| *seat.name() == current)
            .context("Current player has no seat")?;
        let view = PlayerView::new(state, &current)?;
        let choice = choose_move(&view)?;
        info!(turn = view.turn(), player = %current, choice = ?choice, "Bot move");
        choice.take(game.as_ref(), seat)?;
    }

    let narrator = players.first().context("No players")?;
    let view = PlayerView::new(game.read()?, narrator)?;
    print_view(&view)?;
    println!(
        "Final score: {} of {}",
        view.score(),
        view.maximum_possible_score()
    );
    Ok(())
}

#[instrument(skip(persister))]
fn list(persister: &dyn StatePersister, player: &str) -> Result<()> {
    let games = persister.read_all_with_player(player)?;
    if games.is_empty() {
        println!("No games for {}", player);
    }
    for state in games {
        println!(
            "{}  [{}]  turn {}  players: {}",
            state.name(),
            state.ruleset().id(),
            state.turn(),
            state.player_names().join(", ")
        );
    }
    Ok(())
}

#[instrument(skip(persister))]
fn show(persister: &dyn StatePersister, game: &str, player: &str) -> Result<()> {
    let state = persister.read_and_write_game(game)?.read()?;
    print_view(&PlayerView::new(state, player)?)
}

fn print_view(view: &PlayerView) -> Result<()> {
    let (order, _) = view.current_turn_order();
    println!("{} ({})", view.game_name(), view.ruleset_description());
    println!(
        "Turn {}  hints {}  mistakes {}  deck {}  finished: {}",
        view.turn(),
        view.number_of_ready_hints(),
        view.number_of_mistakes_made(),
        view.deck_size(),
        view.game_is_finished()?
    );

    for player in &order {
        if player == view.viewer() {
            let known: Vec<String> = view
                .knowledge_of_own_hand()?
                .iter()
                .map(|k| format!("{:?}/{:?}", k.possible_colors(), k.possible_indices()))
                .collect();
            println!("  {} (you): {}", player, known.join("  "));
        } else {
            let cards: Vec<String> = view
                .visible_hand(player)?
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("  {}: {}", player, cards.join(", "));
        }
    }

    for pile in view.played_cards() {
        if let Some(top) = pile.last() {
            println!("  played: {}", top);
        }
    }
    let discarded: Vec<String> = view.discarded_cards().iter().map(ToString::to_string).collect();
    println!("  discarded: {}", discarded.join(", "));

    for message in view.action_log().iter().filter(|m| !m.is_empty()) {
        println!("  > {} {}", message.player_name(), message.text());
    }
    for message in view.chat_log().iter().filter(|m| !m.is_empty()) {
        println!("  {}: {}", message.player_name(), message.text());
    }
    Ok(())
}
