//! Error taxonomy for the game engine.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::db::DbError;

/// The specific reason an engine operation failed.
///
/// Validation failures (`EmptyName`, `IndexOutOfRange`, `SizeMismatch`, ...)
/// point at a caller bug or stale client state. `NotFound` and `AlreadyExists`
/// are ordinary control flow. `Storage` is the only kind caused by the
/// backing store rather than by the request.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameErrorKind {
    /// A game name was empty.
    #[display("Game name must not be empty")]
    EmptyName,

    /// A game with this name is already registered.
    #[display("Game '{}' already exists", _0)]
    AlreadyExists(String),

    /// No game with this name is registered.
    #[display("Game '{}' not found", _0)]
    NotFound(String),

    /// A hand index was outside the acting player's hand.
    #[display("Hand index {} out of range for a hand of {} cards", index, hand_size)]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The size of the hand at the time of the request.
        hand_size: usize,
    },

    /// The named player holds no hand in this game.
    #[display("Player '{}' has no hand in this game", _0)]
    NoSuchHand(String),

    /// Updated knowledge did not line up with the receiver's hand.
    #[display("Expected knowledge for {} cards, got {}", expected, actual)]
    SizeMismatch {
        /// Number of cards in the receiver's hand.
        expected: usize,
        /// Number of knowledge entries supplied.
        actual: usize,
    },

    /// The player is not (or no longer) listed for the game.
    #[display("Player '{}' is not a participant in game '{}'", player, game)]
    NotAParticipant {
        /// The player that was looked up.
        player: String,
        /// The game that was searched.
        game: String,
    },

    /// A player asked to see their own cards.
    #[display("Player '{}' may not see their own hand", _0)]
    SelfViewForbidden(String),

    /// A player acted out of turn.
    #[display("It is not {}'s turn, waiting for {}", player, current)]
    NotPlayersTurn {
        /// The player who tried to act.
        player: String,
        /// The player whose turn it is.
        current: String,
    },

    /// The game has already ended.
    #[display("Game '{}' is already finished", _0)]
    GameFinished(String),

    /// The hint is not offered by the ruleset or targets the giver.
    #[display("Illegal hint: {}", _0)]
    IllegalHint(String),

    /// No hint tokens are ready.
    #[display("No hints are available")]
    NoHintsAvailable,

    /// Discarding would gain a hint past the ruleset maximum.
    #[display("Hints are already at the maximum of {}", _0)]
    HintsAtMaximum(i32),

    /// The roster does not fit the ruleset's player bounds.
    #[display("{} players requested, ruleset allows {} to {}", requested, minimum, maximum)]
    PlayerCount {
        /// Number of players supplied.
        requested: usize,
        /// Ruleset minimum.
        minimum: usize,
        /// Ruleset maximum.
        maximum: usize,
    },

    /// The same player was listed twice in one roster.
    #[display("Player '{}' is listed more than once", _0)]
    DuplicatePlayer(String),

    /// Deletion succeeded but some index entries could not be removed.
    #[display("Game deleted but index cleanup failed: {}", _0.join("; "))]
    PartialCleanup(Vec<String>),

    /// The backing store failed.
    #[display("Storage failure: {}", _0)]
    Storage(String),
}

/// Engine error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Game error: {} at {}:{}", kind, file, line)]
pub struct GameError {
    /// What went wrong.
    pub kind: GameErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl GameError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind), fields(kind = %kind))]
    pub fn new(kind: GameErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the kind of failure.
    pub fn kind(&self) -> &GameErrorKind {
        &self.kind
    }
}

impl From<GameErrorKind> for GameError {
    #[track_caller]
    fn from(kind: GameErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<DbError> for GameError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        Self::new(GameErrorKind::Storage(err.to_string()))
    }
}
