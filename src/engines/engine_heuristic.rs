//! Rule-based opponent.
//!
//! Walks the tiers in [`TIERS`] and plays the first proposal. Randomness
//! only breaks ties and drives the capture/pressure mix, so with a fixed
//! seed the engine is fully reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{parse_seed_option, Engine};
use crate::engines::heuristic_tiers::{Tier, TierContext, DEFAULT_MIX_CAPTURE_PROBABILITY, TIERS};
use crate::errors::{ChessError, EngineError};
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::ChessMove;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicConfig {
    /// Chance that the balanced-mix tier prefers a capture over a pressure move.
    /// Out-of-range values are clamped when a move is chosen.
    pub mix_capture_probability: f64,
    /// Fixed seed for reproducible play; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            mix_capture_probability: DEFAULT_MIX_CAPTURE_PROBABILITY,
            seed: None,
        }
    }
}

/// A chosen move together with the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub chess_move: ChessMove,
    pub tier: Tier,
}

pub struct HeuristicEngine {
    config: HeuristicConfig,
    rng: StdRng,
}

impl HeuristicEngine {
    pub fn new() -> Self {
        Self::with_config(HeuristicConfig::default())
    }

    pub fn with_config(config: HeuristicConfig) -> Self {
        Self {
            rng: make_rng(config.seed),
            config,
        }
    }

    pub fn config(&self) -> HeuristicConfig {
        self.config
    }

    pub fn select(
        &mut self,
        game_state: &GameState,
        legal_moves: &[ChessMove],
    ) -> Result<Selection, ChessError> {
        if legal_moves.is_empty() {
            return Err(EngineError::NoLegalMoves.into());
        }

        let ctx = TierContext::build(game_state, legal_moves, self.config.mix_capture_probability)?;
        for (tier, rule) in TIERS {
            if let Some(chess_move) = rule(&ctx, &mut self.rng) {
                tracing::debug!(%tier, mv = %chess_move, "heuristic engine selected move");
                return Ok(Selection { chess_move, tier });
            }
        }

        // The random tier always proposes when the legal set is non-empty.
        Err(EngineError::NoLegalMoves.into())
    }
}

impl Default for HeuristicEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

impl Engine for HeuristicEngine {
    fn name(&self) -> &str {
        "Heuristic"
    }

    fn new_game(&mut self) {
        self.rng = make_rng(self.config.seed);
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        match name.to_ascii_lowercase().as_str() {
            "mixprobability" => {
                let probability = value
                    .parse::<f64>()
                    .ok()
                    .filter(|p| (0.0..=1.0).contains(p))
                    .ok_or_else(|| EngineError::InvalidOption {
                        name: name.to_owned(),
                        value: value.to_owned(),
                    })?;
                self.config.mix_capture_probability = probability;
                Ok(())
            }
            "seed" => {
                self.config.seed = parse_seed_option(name, value)?;
                self.rng = make_rng(self.config.seed);
                Ok(())
            }
            _ => Err(EngineError::UnknownOption(name.to_owned())),
        }
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        legal_moves: &[ChessMove],
    ) -> Result<ChessMove, ChessError> {
        self.select(game_state, legal_moves)
            .map(|selection| selection.chess_move)
    }
}
