use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_step;
use crate::moves::move_descriptions::ChessMove;
use crate::moves::piece_geometry::{leaper_targets, KNIGHT_OFFSETS};

pub fn generate_knight_moves(
    game_state: &GameState,
    from: Square,
    knight: Piece,
    out: &mut Vec<ChessMove>,
) {
    for to in leaper_targets(from, &KNIGHT_OFFSETS) {
        push_step(game_state, from, to, knight, out);
    }
}

#[cfg(test)]
mod tests {
    use super::generate_knight_moves;
    use crate::game_state::chess_types::{Color, Piece, PieceKind};
    use crate::game_state::game_state::GameState;
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn starting_knight_is_blocked_only_by_own_pieces() {
        let game = GameState::new_game();
        let mut out = Vec::new();
        let b1 = algebraic_to_square("b1").expect("valid square");
        generate_knight_moves(&game, b1, Piece::new(Color::White, PieceKind::Knight), &mut out);
        let mut targets: Vec<String> = out.iter().map(|m| m.to.to_string()).collect();
        targets.sort();
        assert_eq!(targets, vec!["a3", "c3"]);
    }
}
