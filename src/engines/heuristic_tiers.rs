//! Prioritised move-selection rules for the heuristic opponent.
//!
//! Each tier either proposes a move or passes to the next one. Scoring is
//! done against a [`TierContext`] built once per decision, so every tier
//! sees the same per-move facts (resulting position, safety of the
//! destination, check, attacked origin) without recomputing them.

use std::fmt;

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::Rng;

use crate::errors::ChessError;
use crate::game_state::chess_rules::{piece_value, MINOR_PIECE_VALUE};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::{
    attack_map, attackers_to_square, is_king_in_check, is_square_attacked,
};
use crate::moves::move_descriptions::ChessMove;

/// Flat bonus for stepping the king itself out of check. Exceeds twice the
/// value of a queen, so a king move outranks any capture.
pub const KING_ESCAPE_BONUS: i32 = 100;

pub const DEFAULT_MIX_CAPTURE_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    CriticalDefense,
    ValuableSafeCapture,
    SafeCheck,
    Escape,
    BalancedMix,
    Positional,
    Random,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::CriticalDefense => "critical-defense",
            Tier::ValuableSafeCapture => "valuable-safe-capture",
            Tier::SafeCheck => "safe-check",
            Tier::Escape => "escape",
            Tier::BalancedMix => "balanced-mix",
            Tier::Positional => "positional",
            Tier::Random => "random",
        };
        f.write_str(name)
    }
}

type TierRule = fn(&TierContext<'_>, &mut StdRng) -> Option<ChessMove>;

/// Evaluated in order; the first rule that proposes a move wins.
pub const TIERS: [(Tier, TierRule); 7] = [
    (Tier::CriticalDefense, critical_defense),
    (Tier::ValuableSafeCapture, valuable_safe_capture),
    (Tier::SafeCheck, safe_check),
    (Tier::Escape, escape),
    (Tier::BalancedMix, balanced_mix),
    (Tier::Positional, positional),
    (Tier::Random, random_fallback),
];

/// Facts about one candidate move.
#[derive(Debug, Clone)]
pub struct MoveInsight {
    pub mv: ChessMove,
    pub game_after_move: GameState,
    /// The destination is not attacked by the opponent once the move is made.
    pub destination_safe: bool,
    pub gives_check: bool,
    /// The moving piece currently stands on a square the opponent attacks.
    pub origin_attacked: bool,
}

pub struct TierContext<'a> {
    pub game_state: &'a GameState,
    pub side: Color,
    /// Squares of the enemy pieces currently giving check.
    pub checkers: Vec<Square>,
    pub insights: Vec<MoveInsight>,
    /// Value of the most valuable own non-king piece currently attacked.
    pub highest_threatened_value: i32,
    pub own_king: Option<Square>,
    pub enemy_king: Option<Square>,
    pub mix_capture_probability: f64,
}

impl<'a> TierContext<'a> {
    pub fn build(
        game_state: &'a GameState,
        legal_moves: &[ChessMove],
        mix_capture_probability: f64,
    ) -> Result<Self, ChessError> {
        let side = game_state.side_to_move;
        let opponent = side.opposite();
        let threats = attack_map(game_state, opponent);
        let own_king = game_state.king_square(side);
        let checkers = own_king.map_or_else(Vec::new, |king| {
            attackers_to_square(game_state, king, opponent)
                .into_iter()
                .map(|(square, _)| square)
                .collect()
        });

        let highest_threatened_value = game_state
            .pieces_of(side)
            .filter(|(square, _)| threats.contains(*square))
            .filter_map(|(_, piece)| piece_value(piece.kind))
            .max()
            .unwrap_or(0);

        let mut insights = Vec::with_capacity(legal_moves.len());
        for mv in legal_moves {
            let game_after_move = apply_move(game_state, mv)?;
            insights.push(MoveInsight {
                mv: *mv,
                destination_safe: !is_square_attacked(&game_after_move, mv.to, opponent),
                gives_check: is_king_in_check(&game_after_move, opponent),
                origin_attacked: threats.contains(mv.from),
                game_after_move,
            });
        }

        Ok(Self {
            game_state,
            side,
            checkers,
            insights,
            highest_threatened_value,
            own_king,
            enemy_king: game_state.king_square(opponent),
            mix_capture_probability: sanitize_probability(mix_capture_probability),
        })
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        !self.checkers.is_empty()
    }
}

/// Clamp into `[0, 1]`; NaN falls back to the default mix.
fn sanitize_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        DEFAULT_MIX_CAPTURE_PROBABILITY
    } else {
        probability.clamp(0.0, 1.0)
    }
}

fn captured_value(mv: &ChessMove) -> i32 {
    mv.captured_piece
        .and_then(|piece| piece_value(piece.kind))
        .unwrap_or(0)
}

fn moved_value(mv: &ChessMove) -> i32 {
    piece_value(mv.moved_piece.kind).unwrap_or(0)
}

/// Highest-scoring candidate, ties broken uniformly at random.
fn pick_best<'i>(
    scored: impl Iterator<Item = (&'i MoveInsight, i32)>,
    rng: &mut StdRng,
) -> Option<(ChessMove, i32)> {
    let mut best_score = i32::MIN;
    let mut best: Vec<ChessMove> = Vec::new();
    for (insight, score) in scored {
        if score > best_score {
            best_score = score;
            best.clear();
        }
        if score == best_score {
            best.push(insight.mv);
        }
    }
    best.choose(rng).map(|mv| (*mv, best_score))
}

fn critical_defense(ctx: &TierContext<'_>, rng: &mut StdRng) -> Option<ChessMove> {
    if !ctx.in_check() {
        return None;
    }
    let scored = ctx.insights.iter().map(|insight| {
        let king_bonus = if insight.mv.moved_piece.kind == PieceKind::King {
            KING_ESCAPE_BONUS
        } else {
            0
        };
        (insight, 2 * captured_value(&insight.mv) + king_bonus)
    });
    pick_best(scored, rng).map(|(mv, _)| mv)
}

fn valuable_safe_capture(ctx: &TierContext<'_>, rng: &mut StdRng) -> Option<ChessMove> {
    let scored = ctx
        .insights
        .iter()
        .filter(|insight| insight.mv.is_capture() && insight.destination_safe)
        .map(|insight| (insight, captured_value(&insight.mv)));
    pick_best(scored, rng)
        .filter(|(_, value)| *value >= MINOR_PIECE_VALUE)
        .map(|(mv, _)| mv)
}

fn safe_check(ctx: &TierContext<'_>, rng: &mut StdRng) -> Option<ChessMove> {
    if ctx.in_check() || ctx.highest_threatened_value >= MINOR_PIECE_VALUE {
        return None;
    }
    let scored = ctx
        .insights
        .iter()
        .filter(|insight| insight.gives_check && insight.destination_safe)
        .map(|insight| (insight, captured_value(&insight.mv)));
    pick_best(scored, rng).map(|(mv, _)| mv)
}

fn escape(ctx: &TierContext<'_>, rng: &mut StdRng) -> Option<ChessMove> {
    let scored = ctx
        .insights
        .iter()
        .filter(|insight| {
            insight.origin_attacked
                && insight.destination_safe
                && insight.mv.moved_piece.kind != PieceKind::King
        })
        .map(|insight| (insight, moved_value(&insight.mv)));
    pick_best(scored, rng).map(|(mv, _)| mv)
}

/// How strongly a square bears on the enemy: central and close to their king.
fn pressure(square: Square, enemy_king: Option<Square>) -> i32 {
    let centrality = 3 - square.center_distance() as i32;
    let proximity = enemy_king.map_or(0, |king| 7 - square.distance(king) as i32);
    centrality + proximity
}

fn balanced_mix(ctx: &TierContext<'_>, rng: &mut StdRng) -> Option<ChessMove> {
    let best_capture = pick_best(
        ctx.insights
            .iter()
            .filter(|insight| insight.mv.is_capture() && insight.destination_safe)
            .map(|insight| (insight, captured_value(&insight.mv))),
        rng,
    )
    .map(|(mv, _)| mv);

    let best_pressure = pick_best(
        ctx.insights
            .iter()
            .filter(|insight| {
                insight.destination_safe && insight.mv.moved_piece.kind != PieceKind::King
            })
            .map(|insight| {
                let gain = pressure(insight.mv.to, ctx.enemy_king)
                    - pressure(insight.mv.from, ctx.enemy_king);
                (insight, gain)
            })
            .filter(|(_, gain)| *gain > 0),
        rng,
    )
    .map(|(mv, _)| mv);

    if rng.random_bool(ctx.mix_capture_probability) {
        best_capture.or(best_pressure)
    } else {
        best_pressure.or(best_capture)
    }
}

/// Development value of a move: pawn advance, minor pieces leaving home and
/// centralising, heavy pieces centralising, the king staying out of the
/// middle.
fn development_gain(mv: &ChessMove, side: Color) -> i32 {
    let toward_center = mv.from.center_distance() as i32 - mv.to.center_distance() as i32;
    match mv.moved_piece.kind {
        PieceKind::Pawn => (mv.to.row as i32 - mv.from.row as i32) * side.forward() as i32,
        PieceKind::Knight | PieceKind::Bishop => {
            let leaves_home = i32::from(mv.from.row == side.home_row());
            toward_center + leaves_home
        }
        PieceKind::Rook | PieceKind::Queen => toward_center,
        PieceKind::King => -toward_center,
    }
}

fn positional(ctx: &TierContext<'_>, rng: &mut StdRng) -> Option<ChessMove> {
    let safe = || {
        ctx.insights
            .iter()
            .filter(|insight| insight.destination_safe)
    };

    if let Some(king) = ctx.own_king {
        let shelter = pick_best(
            safe()
                .filter(|insight| {
                    insight.mv.moved_piece.kind != PieceKind::King
                        && insight.mv.to.distance(king) == 1
                        && insight.mv.from.distance(king) > 1
                })
                .map(|insight| (insight, development_gain(&insight.mv, ctx.side))),
            rng,
        );
        if let Some((mv, _)) = shelter {
            return Some(mv);
        }
    }

    pick_best(
        safe()
            .map(|insight| (insight, development_gain(&insight.mv, ctx.side)))
            .filter(|(_, gain)| *gain > 0),
        rng,
    )
    .map(|(mv, _)| mv)
}

fn random_fallback(ctx: &TierContext<'_>, rng: &mut StdRng) -> Option<ChessMove> {
    ctx.insights.choose(rng).map(|insight| insight.mv)
}
