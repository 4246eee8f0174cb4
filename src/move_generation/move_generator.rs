use crate::errors::ChessError;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::ChessMove;

pub type MoveGenResult<T> = Result<T, ChessError>;

/// A legal move together with the position it produces.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub chess_move: ChessMove,
    pub game_after_move: GameState,
    /// Whether the move leaves the opponent's king attacked. Only filled in
    /// by annotating generators.
    pub gives_check: bool,
}

pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>>;
}
