use crate::game_state::game_result::GameResult;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::ChessMove;

/// Single History record: the applied move and everything needed to undo it.
#[derive(Debug, Clone)]
pub struct UndoState {
    pub mv: ChessMove,
    pub prev_game_state: GameState,
    pub prev_result: GameResult,
}
