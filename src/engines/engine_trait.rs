//! Engine abstraction layer used by the controller and console.
//!
//! An engine picks one move out of a legal set it is handed. Different
//! strategies can be swapped at runtime behind this single trait.

use crate::errors::{ChessError, EngineError};
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::ChessMove;

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, name: &str, _value: &str) -> Result<(), EngineError> {
        Err(EngineError::UnknownOption(name.to_owned()))
    }

    /// Choose one of `legal_moves`, which must be the legal set of
    /// `game_state`. Fails with [`EngineError::NoLegalMoves`] when it is empty.
    fn choose_move(
        &mut self,
        game_state: &GameState,
        legal_moves: &[ChessMove],
    ) -> Result<ChessMove, ChessError>;
}

/// Parse the seed option shared by the randomised engines. `none` asks for
/// fresh entropy.
pub fn parse_seed_option(name: &str, value: &str) -> Result<Option<u64>, EngineError> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|_| EngineError::InvalidOption {
            name: name.to_owned(),
            value: value.to_owned(),
        })
}
