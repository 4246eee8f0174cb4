//! Uniform random-move engine.
//!
//! Selects uniformly from legal moves. Used for diagnostics, integration
//! testing, and as the lowest-strength opponent.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::{parse_seed_option, Engine};
use crate::errors::{ChessError, EngineError};
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::ChessMove;

pub struct RandomEngine {
    rng: StdRng,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Random"
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), EngineError> {
        if name.eq_ignore_ascii_case("Seed") {
            self.rng = match parse_seed_option(name, value)? {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            Ok(())
        } else {
            Err(EngineError::UnknownOption(name.to_owned()))
        }
    }

    fn choose_move(
        &mut self,
        _game_state: &GameState,
        legal_moves: &[ChessMove],
    ) -> Result<ChessMove, ChessError> {
        let picked = legal_moves
            .choose(&mut self.rng)
            .ok_or(EngineError::NoLegalMoves)?;
        tracing::debug!(mv = %picked, candidates = legal_moves.len(), "random engine picked move");
        Ok(*picked)
    }
}
