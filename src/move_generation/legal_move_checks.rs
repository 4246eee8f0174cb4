//! Attack detection built on the pseudo-legal generators.
//!
//! A square is attacked when any opponent piece generated in
//! [`GenerationMode::Attacks`] targets it. Legality filtering, castling and
//! the heuristic opponent all share this one primitive.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_pseudo_legal_moves;
use crate::move_generation::legal_move_shared::GenerationMode;

/// Squares attacked by one side, computed once and queried many times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackMap {
    attacked: [[bool; 8]; 8],
}

impl AttackMap {
    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        self.attacked[square.row as usize][square.file as usize]
    }
}

pub fn attack_map(game_state: &GameState, attacker_color: Color) -> AttackMap {
    let mut attacked = [[false; 8]; 8];
    for mv in generate_pseudo_legal_moves(game_state, attacker_color, GenerationMode::Attacks) {
        attacked[mv.to.row as usize][mv.to.file as usize] = true;
    }
    AttackMap { attacked }
}

#[inline]
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    generate_pseudo_legal_moves(game_state, attacker_color, GenerationMode::Attacks)
        .iter()
        .any(|mv| mv.to == square)
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = game_state.king_square(color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

pub fn attackers_to_square(
    game_state: &GameState,
    square: Square,
    attacker_color: Color,
) -> Vec<(Square, Piece)> {
    generate_pseudo_legal_moves(game_state, attacker_color, GenerationMode::Attacks)
        .into_iter()
        .filter(|mv| mv.to == square)
        .map(|mv| (mv.from, mv.moved_piece))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{attack_map, attackers_to_square, is_king_in_check, is_square_attacked};
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::game_state::game_state::GameState;
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn pawns_attack_empty_diagonals() {
        let game = GameState::new_game();
        let f6 = algebraic_to_square("f6").expect("valid square");
        let e5 = algebraic_to_square("e5").expect("valid square");
        assert!(is_square_attacked(&game, f6, Color::Black));
        assert!(!is_square_attacked(&game, e5, Color::Black));
    }

    #[test]
    fn starting_attack_map_covers_third_rank() {
        let game = GameState::new_game();
        let map = attack_map(&game, Color::White);
        for file in ["a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3"] {
            assert!(map.contains(algebraic_to_square(file).expect("valid square")));
        }
        assert!(!map.contains(algebraic_to_square("e4").expect("valid square")));
    }

    #[test]
    fn fools_mate_king_is_checked_by_queen() {
        let game = GameState::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .expect("fen should parse");
        assert!(is_king_in_check(&game, Color::White));
        let e1 = algebraic_to_square("e1").expect("valid square");
        let attackers = attackers_to_square(&game, e1, Color::Black);
        assert_eq!(attackers.len(), 1);
        assert_eq!(attackers[0].1.kind, PieceKind::Queen);
    }
}
