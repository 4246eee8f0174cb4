use crate::game_state::chess_rules::PROMOTION_PIECES;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::{enemy_piece_on, GenerationMode};
use crate::moves::move_descriptions::{ChessMove, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT};

pub fn generate_pawn_moves(
    game_state: &GameState,
    from: Square,
    pawn: Piece,
    mode: GenerationMode,
    out: &mut Vec<ChessMove>,
) {
    let side = pawn.color;
    let forward = side.forward();

    if mode == GenerationMode::Attacks {
        for file_delta in [-1i8, 1i8] {
            if let Some(to) = from.offset(file_delta, forward) {
                let captured = enemy_piece_on(game_state, to, side);
                out.push(ChessMove::quiet(from, to, pawn).with_capture(captured));
            }
        }
        return;
    }

    if let Some(to) = from.offset(0, forward) {
        if game_state.piece_at(to).is_none() {
            push_pawn_move(ChessMove::quiet(from, to, pawn), out);

            if from.row == side.pawn_start_row() {
                if let Some(two_step) = to.offset(0, forward) {
                    if game_state.piece_at(two_step).is_none() {
                        out.push(
                            ChessMove::quiet(from, two_step, pawn)
                                .with_flags(FLAG_DOUBLE_PAWN_PUSH),
                        );
                    }
                }
            }
        }
    }

    for file_delta in [-1i8, 1i8] {
        let Some(to) = from.offset(file_delta, forward) else {
            continue;
        };

        if let Some(captured) = enemy_piece_on(game_state, to, side) {
            push_pawn_move(ChessMove::quiet(from, to, pawn).with_capture(Some(captured)), out);
        } else if game_state.en_passant_square == Some(to) {
            // The captured pawn stands beside the mover, on the origin row.
            let victim_square = Square {
                file: to.file,
                row: from.row,
            };
            let victim = Piece::new(side.opposite(), PieceKind::Pawn);
            if game_state.piece_at(victim_square) == Some(victim) {
                out.push(
                    ChessMove::quiet(from, to, pawn)
                        .with_capture(Some(victim))
                        .with_flags(FLAG_EN_PASSANT),
                );
            }
        }
    }
}

/// Expand a last-rank arrival into one move per promotion piece type.
fn push_pawn_move(mv: ChessMove, out: &mut Vec<ChessMove>) {
    if mv.to.row == mv.moved_piece.color.promotion_row() {
        for promotion in PROMOTION_PIECES {
            out.push(mv.with_promotion(promotion));
        }
    } else {
        out.push(mv);
    }
}
