//! Ray-casting generators for bishops, rooks and queens.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_step;
use crate::moves::move_descriptions::ChessMove;
use crate::moves::piece_geometry::{ray, BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};

pub fn generate_bishop_moves(
    game_state: &GameState,
    from: Square,
    bishop: Piece,
    out: &mut Vec<ChessMove>,
) {
    generate_sliding_moves(game_state, from, bishop, &BISHOP_DIRECTIONS, out);
}

pub fn generate_rook_moves(
    game_state: &GameState,
    from: Square,
    rook: Piece,
    out: &mut Vec<ChessMove>,
) {
    generate_sliding_moves(game_state, from, rook, &ROOK_DIRECTIONS, out);
}

pub fn generate_queen_moves(
    game_state: &GameState,
    from: Square,
    queen: Piece,
    out: &mut Vec<ChessMove>,
) {
    generate_sliding_moves(game_state, from, queen, &QUEEN_DIRECTIONS, out);
}

fn generate_sliding_moves(
    game_state: &GameState,
    from: Square,
    piece: Piece,
    directions: &[(i8, i8)],
    out: &mut Vec<ChessMove>,
) {
    for direction in directions {
        for to in ray(from, *direction) {
            if !push_step(game_state, from, to, piece, out) {
                break;
            }
        }
    }
}
