use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::{push_step, GenerationMode};
use crate::moves::move_descriptions::{ChessMove, FLAG_CASTLING};
use crate::moves::piece_geometry::{leaper_targets, KING_OFFSETS};

const KING_HOME_FILE: u8 = 4;

pub fn generate_king_moves(
    game_state: &GameState,
    from: Square,
    king: Piece,
    mode: GenerationMode,
    out: &mut Vec<ChessMove>,
) {
    for to in leaper_targets(from, &KING_OFFSETS) {
        push_step(game_state, from, to, king, out);
    }

    if mode == GenerationMode::Moves {
        generate_castling_moves(game_state, from, king, out);
    }
}

fn generate_castling_moves(
    game_state: &GameState,
    king_from: Square,
    king: Piece,
    out: &mut Vec<ChessMove>,
) {
    let side = king.color;
    let home_row = side.home_row();
    if king_from != (Square { file: KING_HOME_FILE, row: home_row }) {
        return;
    }

    let kingside = game_state.has_castling_right(kingside_right(side));
    let queenside = game_state.has_castling_right(queenside_right(side));
    if !kingside && !queenside {
        return;
    }

    let enemy = side.opposite();

    // Cannot castle out of check.
    if is_square_attacked(game_state, king_from, enemy) {
        return;
    }

    // (rook file, files that must be empty, files the king crosses or lands on)
    let wings: [(bool, u8, &[u8], &[u8]); 2] = [
        (kingside, 7, &[5, 6], &[5, 6]),
        (queenside, 0, &[1, 2, 3], &[3, 2]),
    ];

    for (allowed, rook_file, between, king_path) in wings {
        if !allowed {
            continue;
        }

        let rook_square = Square { file: rook_file, row: home_row };
        if game_state.piece_at(rook_square) != Some(Piece::new(side, PieceKind::Rook)) {
            continue;
        }

        let path_clear = between
            .iter()
            .all(|file| game_state.piece_at(Square { file: *file, row: home_row }).is_none());
        if !path_clear {
            continue;
        }

        let path_safe = king_path.iter().all(|file| {
            !is_square_attacked(game_state, Square { file: *file, row: home_row }, enemy)
        });
        if !path_safe {
            continue;
        }

        let landing = Square {
            file: king_path[king_path.len() - 1],
            row: home_row,
        };
        out.push(ChessMove::quiet(king_from, landing, king).with_flags(FLAG_CASTLING));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::chess_types::{Color, Piece, PieceKind};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_shared::GenerationMode;
    use crate::utils::algebraic::algebraic_to_square;

    fn castles(fen: &str) -> Vec<String> {
        let game = GameState::from_fen(fen).expect("fen should parse");
        let e1 = algebraic_to_square("e1").expect("valid square");
        let mut out = Vec::new();
        generate_king_moves(
            &game,
            e1,
            Piece::new(Color::White, PieceKind::King),
            GenerationMode::Moves,
            &mut out,
        );
        out.iter()
            .filter(|m| m.is_castling())
            .map(|m| m.to.to_string())
            .collect()
    }

    #[test]
    fn both_wings_available_when_clear() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), vec!["g1", "c1"]);
    }

    #[test]
    fn no_castling_through_attacked_square() {
        // Black rook on f8 covers f1.
        assert_eq!(castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["c1"]);
    }

    #[test]
    fn attacked_b_file_does_not_block_queenside() {
        assert_eq!(castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1"), vec!["c1"]);
    }

    #[test]
    fn no_castling_out_of_check() {
        assert!(castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
    }

    #[test]
    fn no_castling_without_right() {
        assert_eq!(castles("4k3/8/8/8/8/8/8/R3K2R w K - 0 1"), vec!["g1"]);
    }

    #[test]
    fn attack_mode_omits_castling() {
        let game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("fen should parse");
        let e1 = algebraic_to_square("e1").expect("valid square");
        let mut out = Vec::new();
        generate_king_moves(
            &game,
            e1,
            Piece::new(Color::White, PieceKind::King),
            GenerationMode::Attacks,
            &mut out,
        );
        assert!(out.iter().all(|m| !m.is_castling()));
    }
}
