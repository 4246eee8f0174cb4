//! Game termination: result type, repetition bookkeeping and the evaluator.

use std::collections::HashMap;
use std::fmt;

use crate::game_state::chess_rules::{FIFTY_MOVE_RULE_HALFMOVES, REPETITION_DRAW_COUNT};
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::game_state::{GameState, RepetitionSignature};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::moves::move_descriptions::ChessMove;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    DrawFiftyMove,
    DrawInsufficientMaterial,
    DrawThreefoldRepetition,
}

impl GameResult {
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != GameResult::InProgress
    }

    /// Stable identifier for the presentation layer.
    pub fn code(self) -> &'static str {
        match self {
            GameResult::InProgress => "in-progress",
            GameResult::Checkmate { .. } => "checkmate",
            GameResult::Stalemate => "stalemate",
            GameResult::DrawFiftyMove => "draw-fifty-move",
            GameResult::DrawInsufficientMaterial => "draw-insufficient-material",
            GameResult::DrawThreefoldRepetition => "draw-threefold-repetition",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            other => f.write_str(other.code()),
        }
    }
}

/// Rolling count of repetition signatures seen in the current game,
/// updated on every applied and undone move.
#[derive(Debug, Clone, Default)]
pub struct RepetitionTable {
    counts: HashMap<RepetitionSignature, u8>,
}

impl RepetitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    /// Record an occurrence and return the new count.
    pub fn record(&mut self, game_state: &GameState) -> u8 {
        let count = self.counts.entry(game_state.repetition_signature()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn forget(&mut self, game_state: &GameState) {
        let signature = game_state.repetition_signature();
        if let Some(count) = self.counts.get_mut(&signature) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(&signature);
            }
        }
    }

    pub fn occurrences(&self, game_state: &GameState) -> u8 {
        self.counts
            .get(&game_state.repetition_signature())
            .copied()
            .unwrap_or(0)
    }
}

/// Classify a position. `legal_moves` must be the legal set of `game_state`
/// and `repetitions` must already include `game_state` itself.
pub fn evaluate(
    game_state: &GameState,
    legal_moves: &[ChessMove],
    repetitions: &RepetitionTable,
) -> GameResult {
    let side = game_state.side_to_move;

    if legal_moves.is_empty() {
        return if is_king_in_check(game_state, side) {
            GameResult::Checkmate {
                winner: side.opposite(),
            }
        } else {
            GameResult::Stalemate
        };
    }

    if game_state.halfmove_clock >= FIFTY_MOVE_RULE_HALFMOVES {
        return GameResult::DrawFiftyMove;
    }

    if has_insufficient_material(game_state) {
        return GameResult::DrawInsufficientMaterial;
    }

    if repetitions.occurrences(game_state) >= REPETITION_DRAW_COUNT {
        return GameResult::DrawThreefoldRepetition;
    }

    GameResult::InProgress
}

/// Drawn material: bare kings, a lone minor against a bare king, or a
/// knight each.
pub fn has_insufficient_material(game_state: &GameState) -> bool {
    let mut minors: [Vec<PieceKind>; 2] = [Vec::new(), Vec::new()];

    for (_, piece) in game_state.pieces() {
        match piece.kind {
            PieceKind::King => {}
            kind if kind.is_minor() => minors[piece.color.index()].push(kind),
            _ => return false,
        }
    }

    match (minors[0].as_slice(), minors[1].as_slice()) {
        ([], []) => true,
        ([_], []) | ([], [_]) => true,
        ([PieceKind::Knight], [PieceKind::Knight]) => true,
        _ => false,
    }
}
