use crate::errors::ChessError;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::ChessMove;

/// Produce the position after `mv`. The move must come from `game_state`.
pub fn apply_move(game_state: &GameState, mv: &ChessMove) -> Result<GameState, ChessError> {
    let moving_color = game_state.side_to_move;
    if mv.moved_piece.color != moving_color || game_state.piece_at(mv.from) != Some(mv.moved_piece)
    {
        return Err(ChessError::InvalidState(format!(
            "move {mv} does not match the piece on {}",
            mv.from
        )));
    }

    let mut next = game_state.clone();

    next.set_piece(mv.from, None);

    if mv.is_en_passant() {
        next.set_piece(
            Square {
                file: mv.to.file,
                row: mv.from.row,
            },
            None,
        );
    }

    next.set_piece(mv.to, Some(mv.piece_after_move()));

    // Castling rook move.
    if mv.is_castling() {
        let row = moving_color.home_row();
        let (rook_from, rook_to) = if mv.to.file == 6 { (7, 5) } else { (0, 3) };
        let rook = next.piece_at(Square { file: rook_from, row });
        next.set_piece(Square { file: rook_from, row }, None);
        next.set_piece(Square { file: rook_to, row }, rook);
    }

    update_castling_rights(&mut next, moving_color, mv);

    next.en_passant_square = if mv.is_double_pawn_push() {
        Some(Square {
            file: mv.from.file,
            row: (mv.from.row + mv.to.row) / 2,
        })
    } else {
        None
    };

    if mv.moved_piece.kind == PieceKind::Pawn || mv.is_capture() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = moving_color.opposite();

    Ok(next)
}

fn update_castling_rights(game_state: &mut GameState, moving_color: Color, mv: &ChessMove) {
    if mv.moved_piece.kind == PieceKind::King {
        game_state.castling_rights &=
            !(kingside_right(moving_color) | queenside_right(moving_color));
    }

    // A rook leaving its corner, or anything landing there, ends that right.
    for square in [mv.from, mv.to] {
        game_state.castling_rights &= !corner_right(square);
    }
}

fn corner_right(square: Square) -> CastlingRights {
    match (square.file, square.row) {
        (0, 7) => CASTLE_WHITE_QUEENSIDE,
        (7, 7) => CASTLE_WHITE_KINGSIDE,
        (0, 0) => CASTLE_BLACK_QUEENSIDE,
        (7, 0) => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::apply_move;
    use crate::game_state::chess_types::{
        Color, Piece, PieceKind, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE,
    };
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::legal_moves;
    use crate::moves::move_descriptions::ChessMove;

    fn find_move(game: &GameState, text: &str) -> ChessMove {
        legal_moves(game)
            .expect("generation should succeed")
            .into_iter()
            .find(|m| m.to_string() == text)
            .expect("move should be legal")
    }

    #[test]
    fn double_push_sets_en_passant_and_resets_clock() {
        let game = GameState::from_fen("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R w KQkq - 3 2")
            .expect("fen should parse");
        let next = apply_move(&game, &find_move(&game, "e2e4")).expect("apply should succeed");
        assert_eq!(next.get_fen(), "rnbqkbnr/pppppppp/8/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq e3 0 2");
    }

    #[test]
    fn quiet_black_move_increments_both_counters() {
        let game = GameState::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        )
        .expect("fen should parse");
        let next = apply_move(&game, &find_move(&game, "g8f6")).expect("apply should succeed");
        assert_eq!(next.halfmove_clock, 1);
        assert_eq!(next.fullmove_number, 2);
        assert_eq!(next.side_to_move, Color::White);
        assert_eq!(next.en_passant_square, None);
    }

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1")
            .expect("fen should parse");
        let next = apply_move(&game, &find_move(&game, "e8c8")).expect("apply should succeed");
        assert_eq!(next.get_fen(), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 1 2");
        assert_eq!(next.castling_rights & (CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE), 0);
    }

    #[test]
    fn capturing_a_corner_rook_removes_that_right() {
        let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("fen should parse");
        let next = apply_move(&game, &find_move(&game, "a1a8")).expect("apply should succeed");
        assert_eq!(next.get_fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2")
            .expect("fen should parse");
        let next = apply_move(&game, &find_move(&game, "e5d6")).expect("apply should succeed");
        assert_eq!(next.get_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn promotion_places_the_chosen_piece() {
        let game = GameState::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("fen should parse");
        let next = apply_move(&game, &find_move(&game, "e7e8n")).expect("apply should succeed");
        let e8 = crate::utils::algebraic::algebraic_to_square("e8").expect("valid square");
        assert_eq!(next.piece_at(e8), Some(Piece::new(Color::White, PieceKind::Knight)));
    }

    #[test]
    fn mismatched_move_is_rejected() {
        let game = GameState::new_game();
        let mv = find_move(&game, "e2e4");
        let after = apply_move(&game, &mv).expect("apply should succeed");
        assert!(apply_move(&after, &mv).is_err());
    }
}
