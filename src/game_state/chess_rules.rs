//! Canonical chess-rule constants.
//!
//! Static literals shared by the codec, the result evaluator, and the
//! heuristic opponent.

use crate::game_state::chess_types::PieceKind;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-moves without a pawn move or capture that end the game in a draw.
pub const FIFTY_MOVE_RULE_HALFMOVES: u16 = 100;

/// Occurrences of a repetition signature that end the game in a draw.
pub const REPETITION_DRAW_COUNT: u8 = 3;

/// Piece types a pawn may become on the last rank, strongest first.
pub const PROMOTION_PIECES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Value of the weakest minor piece, the threshold for "valuable" captures.
pub const MINOR_PIECE_VALUE: i32 = 3;

/// Material value used by the heuristics. Kings are never capture targets
/// and report `None`.
#[inline]
pub const fn piece_value(kind: PieceKind) -> Option<i32> {
    match kind {
        PieceKind::Pawn => Some(1),
        PieceKind::Knight => Some(3),
        PieceKind::Bishop => Some(3),
        PieceKind::Rook => Some(5),
        PieceKind::Queen => Some(9),
        PieceKind::King => None,
    }
}

#[inline]
pub fn is_promotion_piece(kind: PieceKind) -> bool {
    PROMOTION_PIECES.contains(&kind)
}
