//! Crate root module declarations for the Plum Arbiter chess rules engine.
//!
//! Exposes the position model, legal move generation, the position codec,
//! game-state evaluation, the game controller with its opponent scheduling,
//! the opponent engines and the console front end so binaries, tests and
//! benches can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_result;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod move_descriptions;
    pub mod piece_geometry;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliding;
    pub mod move_generator;
    pub mod perft;
}

pub mod engines {
    pub mod engine_heuristic;
    pub mod engine_random;
    pub mod engine_trait;
    pub mod heuristic_tiers;
}

pub mod controller {
    pub mod game_controller;
    pub mod game_events;
    pub mod opponent_turn;
}

pub mod console {
    pub mod console_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
