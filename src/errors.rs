//! Errors used throughout the engine.
//!
//! `ChessError` is returned by parsing, move application and the game
//! controller. `EngineError` covers opponent configuration and selection.
//! A rejected move attempt is not an error: it comes back as
//! [`MoveOutcome::Rejected`](crate::controller::game_controller::MoveOutcome)
//! so callers can retry without unwinding.

use thiserror::Error;

use crate::game_state::game_result::GameResult;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChessError {
    /// Position or square text that does not parse. Never silently repaired.
    #[error("malformed notation: {0}")]
    MalformedNotation(String),

    #[error("no game has been started")]
    GameNotStarted,

    #[error("game has already ended: {0}")]
    GameAlreadyEnded(GameResult),

    #[error("there is no move to undo")]
    NothingToUndo,

    /// A move handed in by an engine that is absent from the legal set.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// Internal inconsistency, e.g. a move applied to the wrong position.
    #[error("invalid game state: {0}")]
    InvalidState(String),

    #[error("game lock was poisoned by a panicking thread")]
    LockPoisoned,

    #[error("i/o error: {0}")]
    Io(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("no legal moves to choose from")]
    NoLegalMoves,

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOption { name: String, value: String },

    #[error("unknown option '{0}'")]
    UnknownOption(String),
}

impl From<std::io::Error> for ChessError {
    fn from(err: std::io::Error) -> Self {
        ChessError::Io(err.to_string())
    }
}
