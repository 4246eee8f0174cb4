//! Move-path enumeration for validating the legal generator against
//! published reference counts.

use std::sync::Arc;
use std::thread;

use crate::errors::ChessError;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::FastLegalMoveGenerator;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
    }
}

pub fn perft_legal(game_state: &GameState, depth: u8) -> MoveGenResult<PerftCounts> {
    perft(&FastLegalMoveGenerator, game_state, depth)
}

pub fn perft<G: MoveGenerator>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(game_state)? {
        perft_recurse(generator, &mv, depth, 1, &mut total)?;
    }

    Ok(total)
}

/// One worker thread per root move.
pub fn perft_multi_threaded(
    generator: Arc<dyn MoveGenerator>,
    game_state: &GameState,
    depth: u8,
) -> MoveGenResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let root_moves = generator.generate_legal_moves(game_state)?;
    let mut handles = Vec::with_capacity(root_moves.len());

    for mv in root_moves {
        let generator_ref = Arc::clone(&generator);
        handles.push(thread::spawn(move || {
            let mut local = PerftCounts::default();
            let result = perft_recurse(generator_ref.as_ref(), &mv, depth, 1, &mut local);
            (result, local)
        }));
    }

    let mut total = PerftCounts::default();
    for handle in handles {
        let (result, local) = handle
            .join()
            .map_err(|_| ChessError::InvalidState("perft worker thread panicked".to_owned()))?;
        result?;
        total.merge(local);
    }

    Ok(total)
}

fn perft_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    if current_depth == search_depth {
        let chess_move = &mv.chess_move;
        counts.nodes += 1;
        if chess_move.is_capture() {
            counts.captures += 1;
        }
        if chess_move.is_en_passant() {
            counts.en_passant += 1;
        }
        if chess_move.is_castling() {
            counts.castles += 1;
        }
        if chess_move.is_promotion() {
            counts.promotions += 1;
        }
        return Ok(());
    }

    for child in generator.generate_legal_moves(&mv.game_after_move)? {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts)?;
    }

    Ok(())
}
