use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::ChessMove;

/// What a piece generator is asked for.
///
/// `Moves` yields pseudo-legal moves. `Attacks` yields every square the
/// piece bears on: pawn diagonals regardless of occupancy and no castling,
/// which is what square-safety queries need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Moves,
    Attacks,
}

#[inline]
pub fn enemy_piece_on(game_state: &GameState, square: Square, color: Color) -> Option<Piece> {
    game_state
        .piece_at(square)
        .filter(|piece| piece.color == color.opposite())
}

/// Push a move onto `to` unless it holds a piece of the mover's color.
/// Returns whether the square was empty, which is when sliders keep going.
#[inline]
pub fn push_step(
    game_state: &GameState,
    from: Square,
    to: Square,
    piece: Piece,
    out: &mut Vec<ChessMove>,
) -> bool {
    match game_state.piece_at(to) {
        None => {
            out.push(ChessMove::quiet(from, to, piece));
            true
        }
        Some(target) if target.color != piece.color => {
            out.push(ChessMove::quiet(from, to, piece).with_capture(Some(target)));
            false
        }
        Some(_) => false,
    }
}
