//! Full legal move generation pipeline.
//!
//! Orchestrates piece-wise pseudo-legal generation, applies candidate moves
//! to scratch copies, filters self-check outcomes, and optionally annotates
//! whether each move gives check.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_shared::GenerationMode;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliding::{
    generate_bishop_moves, generate_queen_moves, generate_rook_moves,
};
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerator};
use crate::moves::move_descriptions::ChessMove;

pub struct LegalMoveGenerator;
pub struct FastLegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        generate_legal_moves_internal(game_state, true)
    }
}

impl MoveGenerator for FastLegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        generate_legal_moves_internal(game_state, false)
    }
}

/// Moves obeying piece geometry and occupancy for `side`, ignoring whether
/// that side's king is left attacked.
pub fn generate_pseudo_legal_moves(
    game_state: &GameState,
    side: Color,
    mode: GenerationMode,
) -> Vec<ChessMove> {
    let mut out = Vec::<ChessMove>::with_capacity(64);

    for (from, piece) in game_state.pieces_of(side) {
        match piece.kind {
            PieceKind::Pawn => generate_pawn_moves(game_state, from, piece, mode, &mut out),
            PieceKind::Knight => generate_knight_moves(game_state, from, piece, &mut out),
            PieceKind::Bishop => generate_bishop_moves(game_state, from, piece, &mut out),
            PieceKind::Rook => generate_rook_moves(game_state, from, piece, &mut out),
            PieceKind::Queen => generate_queen_moves(game_state, from, piece, &mut out),
            PieceKind::King => generate_king_moves(game_state, from, piece, mode, &mut out),
        }
    }

    out
}

/// Legal moves for the side to move.
pub fn legal_moves(game_state: &GameState) -> MoveGenResult<Vec<ChessMove>> {
    Ok(FastLegalMoveGenerator
        .generate_legal_moves(game_state)?
        .into_iter()
        .map(|generated| generated.chess_move)
        .collect())
}

fn generate_legal_moves_internal(
    game_state: &GameState,
    annotate: bool,
) -> MoveGenResult<Vec<GeneratedMove>> {
    let side = game_state.side_to_move;
    let pseudo = generate_pseudo_legal_moves(game_state, side, GenerationMode::Moves);

    let mut legal = Vec::<GeneratedMove>::with_capacity(pseudo.len());
    for mv in pseudo {
        // Kings are never captured; such a move only exists in a broken position.
        if mv.captured_piece.map(|piece| piece.kind) == Some(PieceKind::King) {
            continue;
        }

        let next = apply_move(game_state, &mv)?;

        // Illegal if own king is in check after move.
        if is_king_in_check(&next, side) {
            continue;
        }

        let gives_check = annotate && is_king_in_check(&next, side.opposite());
        legal.push(GeneratedMove {
            chess_move: mv,
            game_after_move: next,
            gives_check,
        });
    }

    Ok(legal)
}

#[cfg(test)]
mod tests {
    use super::{
        generate_pseudo_legal_moves, legal_moves, FastLegalMoveGenerator, LegalMoveGenerator,
    };
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_shared::GenerationMode;
    use crate::move_generation::move_generator::MoveGenerator;

    #[test]
    fn fast_generator_matches_legal_move_count_on_startpos() {
        let game = GameState::new_game();
        let annotated = LegalMoveGenerator
            .generate_legal_moves(&game)
            .expect("annotated move generation should succeed");
        let fast = FastLegalMoveGenerator
            .generate_legal_moves(&game)
            .expect("fast move generation should succeed");
        assert_eq!(annotated.len(), fast.len());
        assert_eq!(fast.len(), 20);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // The e4 knight is pinned against the e1 king by the e8 rook.
        let game = GameState::from_fen("4r1k1/8/8/8/4N3/8/8/4K3 w - - 0 1")
            .expect("fen should parse");
        let pseudo = generate_pseudo_legal_moves(&game, Color::White, GenerationMode::Moves);
        assert!(pseudo.iter().any(|m| m.from.to_string() == "e4"));

        let legal = legal_moves(&game).expect("generation should succeed");
        assert!(legal.iter().all(|m| m.from.to_string() != "e4"));
    }

    #[test]
    fn king_cannot_step_into_pawn_attack() {
        let game = GameState::from_fen("4k3/8/8/8/8/3p4/8/4K3 w - - 0 1")
            .expect("fen should parse");
        let legal = legal_moves(&game).expect("generation should succeed");
        let targets: Vec<String> = legal.iter().map(|m| m.to.to_string()).collect();
        assert!(!targets.contains(&"e2".to_owned()));
        assert!(!targets.contains(&"c2".to_owned()));
        assert!(targets.contains(&"d2".to_owned()));
    }

    #[test]
    fn annotated_generator_flags_checks() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").expect("fen should parse");
        let moves = LegalMoveGenerator
            .generate_legal_moves(&game)
            .expect("generation should succeed");
        let check = moves
            .iter()
            .find(|m| m.chess_move.to.to_string() == "a8")
            .expect("rook can reach a8");
        assert!(check.gives_check);
        let quiet = moves
            .iter()
            .find(|m| m.chess_move.to.to_string() == "a2")
            .expect("rook can reach a2");
        assert!(!quiet.gives_check);
    }
}
