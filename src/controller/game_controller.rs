//! Game lifecycle: the one live position, its history and its result.
//!
//! The controller is the single writer of the position. It moves through
//! `NotStarted -> InProgress -> Ended`, classifies rejected move attempts
//! without touching state, and notifies injected listeners synchronously
//! whenever a move lands.

use crate::controller::game_events::{
    CheckListenerFn, GameListener, MoveListenerFn, ResultListenerFn,
};
use crate::errors::ChessError;
use crate::game_state::chess_rules::is_promotion_piece;
use crate::game_state::chess_types::*;
use crate::game_state::game_result::{evaluate, GameResult, RepetitionTable};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_pseudo_legal_moves, legal_moves};
use crate::move_generation::legal_move_shared::GenerationMode;
use crate::moves::move_descriptions::ChessMove;
use crate::utils::algebraic::algebraic_to_square;
use crate::utils::long_algebraic::parse_long_algebraic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    NotStarted,
    InProgress,
    Ended,
}

/// Why a move attempt was turned down. The position is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    NoPieceAtOrigin,
    WrongSideToMove,
    /// Not a move this piece can make: bad geometry, blocked path or own piece.
    IllegalDestination,
    /// Geometrically fine but leaves the mover's king attacked.
    WouldExposeOwnKing,
    /// Promotion square reached without a valid promotion piece.
    AmbiguousPromotion,
}

impl RejectionReason {
    pub fn code(self) -> &'static str {
        match self {
            RejectionReason::NoPieceAtOrigin => "no-piece-at-origin",
            RejectionReason::WrongSideToMove => "wrong-side-to-move",
            RejectionReason::IllegalDestination => "illegal-destination",
            RejectionReason::WouldExposeOwnKing => "would-expose-own-king",
            RejectionReason::AmbiguousPromotion => "ambiguous-promotion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub reason: RejectionReason,
    pub origin: Square,
    pub destination: Square,
    /// Piece standing on the origin, if any.
    pub piece: Option<Piece>,
    /// Legal moves available to the side to move.
    pub legal_move_count: usize,
    /// Legal moves starting on the origin square.
    pub legal_moves_from_origin: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedMove {
    pub chess_move: ChessMove,
    /// The opponent of the mover is now in check.
    pub gives_check: bool,
    pub is_capture: bool,
    pub is_castling: bool,
    pub is_promotion: bool,
    pub is_en_passant: bool,
    pub result: GameResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted(AcceptedMove),
    Rejected(Rejection),
}

pub struct GameController {
    phase: GamePhase,
    game_state: GameState,
    legal_moves: Vec<ChessMove>,
    result: GameResult,
    history: Vec<UndoState>,
    repetitions: RepetitionTable,
    listeners: Vec<Box<dyn GameListener>>,
    epoch: u64,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl GameController {
    /// A controller holding the standard start position, not yet started.
    pub fn new() -> Self {
        let game_state = GameState::new_game();
        let legal_moves = legal_moves(&game_state).unwrap_or_default();
        Self {
            phase: GamePhase::NotStarted,
            game_state,
            legal_moves,
            result: GameResult::InProgress,
            history: Vec::new(),
            repetitions: RepetitionTable::new(),
            listeners: Vec::new(),
            epoch: 0,
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn GameListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn add_listener(&mut self, listener: Box<dyn GameListener>) {
        self.listeners.push(listener);
    }

    pub fn register_move_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&AcceptedMove) + Send + 'static,
    {
        self.add_listener(Box::new(MoveListenerFn(listener)));
    }

    pub fn register_check_listener<F>(&mut self, listener: F)
    where
        F: FnMut(Color) + Send + 'static,
    {
        self.add_listener(Box::new(CheckListenerFn(listener)));
    }

    pub fn register_result_listener<F>(&mut self, listener: F)
    where
        F: FnMut(GameResult) + Send + 'static,
    {
        self.add_listener(Box::new(ResultListenerFn(listener)));
    }

    /// Start a fresh game from the standard position.
    pub fn new_game(&mut self) -> Result<(), ChessError> {
        self.install(GameState::new_game())
    }

    /// Alias of [`GameController::new_game`].
    pub fn reset(&mut self) -> Result<(), ChessError> {
        self.new_game()
    }

    /// Replace the position from its text form. On failure the previous
    /// position, history and phase are kept.
    pub fn load_position(&mut self, text: &str) -> Result<(), ChessError> {
        let game_state = GameState::from_fen(text)?;
        self.install(game_state)
    }

    fn install(&mut self, game_state: GameState) -> Result<(), ChessError> {
        let legal = legal_moves(&game_state)?;
        let previous_result = self.result;

        self.game_state = game_state;
        self.legal_moves = legal;
        self.history.clear();
        self.repetitions.clear();
        self.repetitions.record(&self.game_state);
        self.result = evaluate(&self.game_state, &self.legal_moves, &self.repetitions);
        self.phase = phase_for(self.result);
        self.epoch += 1;

        tracing::info!(
            position = %self.game_state.get_fen(),
            result = %self.result,
            "position loaded"
        );
        if self.result != previous_result {
            self.notify_result(self.result);
        }
        Ok(())
    }

    /// Try a move given as square text, e.g. `("e7", "e8", Some('q'))`.
    pub fn attempt_move(
        &mut self,
        origin: &str,
        destination: &str,
        promotion: Option<char>,
    ) -> Result<MoveOutcome, ChessError> {
        self.ensure_in_progress()?;
        let from = algebraic_to_square(origin)?;
        let to = algebraic_to_square(destination)?;
        self.attempt_move_squares(from, to, parse_promotion(promotion)?)
    }

    /// Try a move in long algebraic form such as `e2e4` or `e7e8q`.
    pub fn attempt_long_algebraic(&mut self, text: &str) -> Result<MoveOutcome, ChessError> {
        self.ensure_in_progress()?;
        let parsed = parse_long_algebraic(text)?;
        self.attempt_move_squares(parsed.from, parsed.to, parse_promotion(parsed.promotion)?)
    }

    pub fn attempt_move_squares(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, ChessError> {
        self.ensure_in_progress()?;

        match self.match_legal_move(from, to, promotion) {
            Ok(mv) => self.commit(mv).map(MoveOutcome::Accepted),
            Err(reason) => {
                let rejection = Rejection {
                    reason,
                    origin: from,
                    destination: to,
                    piece: self.game_state.piece_at(from),
                    legal_move_count: self.legal_moves.len(),
                    legal_moves_from_origin: self
                        .legal_moves
                        .iter()
                        .filter(|mv| mv.from == from)
                        .count(),
                };
                tracing::debug!(
                    reason = reason.code(),
                    origin = %from,
                    destination = %to,
                    "move rejected"
                );
                Ok(MoveOutcome::Rejected(rejection))
            }
        }
    }

    /// Apply a move chosen by an engine. It must belong to the current
    /// legal set.
    pub fn apply_engine_move(&mut self, mv: ChessMove) -> Result<AcceptedMove, ChessError> {
        self.ensure_in_progress()?;
        if !self.legal_moves.contains(&mv) {
            return Err(ChessError::IllegalMove(mv.to_string()));
        }
        self.commit(mv)
    }

    /// Undo the most recent move, returning it.
    pub fn undo_last_move(&mut self) -> Result<ChessMove, ChessError> {
        let Some(last) = self.history.last() else {
            return Err(ChessError::NothingToUndo);
        };
        let legal = legal_moves(&last.prev_game_state)?;
        let Some(entry) = self.history.pop() else {
            return Err(ChessError::NothingToUndo);
        };

        let previous_result = self.result;
        self.repetitions.forget(&self.game_state);
        self.game_state = entry.prev_game_state;
        self.legal_moves = legal;
        self.result = entry.prev_result;
        self.phase = phase_for(self.result);
        self.epoch += 1;

        tracing::debug!(mv = %entry.mv, "move undone");
        if self.result != previous_result {
            self.notify_result(self.result);
        }
        Ok(entry.mv)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn side_to_move(&self) -> Color {
        self.game_state.side_to_move
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn position_text(&self) -> String {
        self.game_state.get_fen()
    }

    pub fn legal_moves(&self) -> &[ChessMove] {
        &self.legal_moves
    }

    pub fn legal_move_count(&self) -> usize {
        self.legal_moves.len()
    }

    /// Legal destinations of the piece on `square`, sorted and deduplicated
    /// (promotion choices share a destination).
    pub fn legal_destinations(&self, square: &str) -> Result<Vec<Square>, ChessError> {
        let from = algebraic_to_square(square)?;
        let mut destinations: Vec<Square> = self
            .legal_moves
            .iter()
            .filter(|mv| mv.from == from)
            .map(|mv| mv.to)
            .collect();
        destinations.sort();
        destinations.dedup();
        Ok(destinations)
    }

    pub fn is_in_check(&self) -> bool {
        is_king_in_check(&self.game_state, self.game_state.side_to_move)
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Moves played since the last load, in long algebraic form.
    pub fn move_history(&self) -> Vec<String> {
        self.history.iter().map(|entry| entry.mv.to_string()).collect()
    }

    /// Counter bumped on every load, reset, applied move and undo. A
    /// scheduled opponent turn compares it to detect a stale position.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn ensure_in_progress(&self) -> Result<(), ChessError> {
        match self.phase {
            GamePhase::NotStarted => Err(ChessError::GameNotStarted),
            GamePhase::Ended => Err(ChessError::GameAlreadyEnded(self.result)),
            GamePhase::InProgress => Ok(()),
        }
    }

    fn match_legal_move(
        &self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<ChessMove, RejectionReason> {
        let side = self.game_state.side_to_move;
        let piece = self
            .game_state
            .piece_at(from)
            .ok_or(RejectionReason::NoPieceAtOrigin)?;
        if piece.color != side {
            return Err(RejectionReason::WrongSideToMove);
        }

        let candidates: Vec<&ChessMove> = self
            .legal_moves
            .iter()
            .filter(|mv| mv.from == from && mv.to == to)
            .collect();

        if candidates.is_empty() {
            let geometrically_possible =
                generate_pseudo_legal_moves(&self.game_state, side, GenerationMode::Moves)
                    .iter()
                    .any(|mv| mv.from == from && mv.to == to);
            return Err(if geometrically_possible {
                RejectionReason::WouldExposeOwnKing
            } else {
                RejectionReason::IllegalDestination
            });
        }

        if candidates.iter().any(|mv| mv.is_promotion()) {
            let chosen = promotion
                .filter(|kind| is_promotion_piece(*kind))
                .ok_or(RejectionReason::AmbiguousPromotion)?;
            return candidates
                .into_iter()
                .find(|mv| mv.promotion == Some(chosen))
                .copied()
                .ok_or(RejectionReason::AmbiguousPromotion);
        }

        // Only a promotion can share an origin and destination.
        Ok(*candidates[0])
    }

    fn commit(&mut self, mv: ChessMove) -> Result<AcceptedMove, ChessError> {
        let next = apply_move(&self.game_state, &mv)?;
        let next_legal = legal_moves(&next)?;

        let previous_result = self.result;
        let previous_state = std::mem::replace(&mut self.game_state, next);
        self.history.push(UndoState {
            mv,
            prev_game_state: previous_state,
            prev_result: previous_result,
        });
        self.repetitions.record(&self.game_state);
        self.legal_moves = next_legal;
        self.result = evaluate(&self.game_state, &self.legal_moves, &self.repetitions);
        self.phase = phase_for(self.result);
        self.epoch += 1;

        let side_in_check = self.game_state.side_to_move;
        let accepted = AcceptedMove {
            chess_move: mv,
            gives_check: is_king_in_check(&self.game_state, side_in_check),
            is_capture: mv.is_capture(),
            is_castling: mv.is_castling(),
            is_promotion: mv.is_promotion(),
            is_en_passant: mv.is_en_passant(),
            result: self.result,
        };

        tracing::debug!(mv = %mv, check = accepted.gives_check, "move applied");
        for listener in &mut self.listeners {
            listener.on_move_applied(&accepted);
        }
        if accepted.gives_check {
            for listener in &mut self.listeners {
                listener.on_check(side_in_check);
            }
        }
        if self.result != previous_result {
            self.notify_result(self.result);
        }

        Ok(accepted)
    }

    fn notify_result(&mut self, result: GameResult) {
        if result.is_terminal() {
            tracing::info!(%result, "game ended");
        }
        for listener in &mut self.listeners {
            listener.on_result_changed(result);
        }
    }
}

/// Unknown letters are malformed; `k` and `p` parse here and are turned
/// down later as an ambiguous promotion.
fn parse_promotion(letter: Option<char>) -> Result<Option<PieceKind>, ChessError> {
    letter
        .map(|letter| {
            PieceKind::from_char(letter).ok_or_else(|| {
                ChessError::MalformedNotation(format!("unknown promotion piece '{letter}'"))
            })
        })
        .transpose()
}

fn phase_for(result: GameResult) -> GamePhase {
    if result.is_terminal() {
        GamePhase::Ended
    } else {
        GamePhase::InProgress
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{GameController, GamePhase, MoveOutcome, RejectionReason};
    use crate::errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, Piece, PieceKind};
    use crate::game_state::game_result::GameResult;
    use crate::utils::algebraic::algebraic_to_square;

    fn started() -> GameController {
        let mut controller = GameController::new();
        controller.new_game().expect("start position loads");
        controller
    }

    fn play(controller: &mut GameController, moves: &[&str]) {
        for text in moves {
            let outcome = controller
                .attempt_move(&text[0..2], &text[2..4], text[4..].chars().next())
                .expect("attempt should run");
            assert!(
                matches!(outcome, MoveOutcome::Accepted(_)),
                "{text} should be accepted, got {outcome:?}"
            );
        }
    }

    fn rejection(outcome: MoveOutcome) -> RejectionReason {
        match outcome {
            MoveOutcome::Rejected(rejection) => rejection.reason,
            MoveOutcome::Accepted(accepted) => {
                panic!("expected a rejection, got {}", accepted.chess_move)
            }
        }
    }

    #[test]
    fn moves_require_a_started_game() {
        let mut controller = GameController::new();
        assert_eq!(controller.phase(), GamePhase::NotStarted);
        assert_eq!(
            controller.attempt_move("e2", "e4", None),
            Err(ChessError::GameNotStarted)
        );
        controller.new_game().expect("start position loads");
        assert_eq!(controller.phase(), GamePhase::InProgress);
        assert_eq!(controller.legal_move_count(), 20);
        assert_eq!(controller.position_text(), STARTING_POSITION_FEN);
    }

    #[test]
    fn rejections_are_classified_without_changing_state() {
        let mut controller = started();
        let before = controller.position_text();

        let outcome = controller.attempt_move("e3", "e4", None).expect("attempt should run");
        assert_eq!(rejection(outcome), RejectionReason::NoPieceAtOrigin);

        let outcome = controller.attempt_move("e7", "e5", None).expect("attempt should run");
        assert_eq!(rejection(outcome), RejectionReason::WrongSideToMove);

        let outcome = controller.attempt_move("e2", "e5", None).expect("attempt should run");
        assert_eq!(rejection(outcome), RejectionReason::IllegalDestination);

        let outcome = controller.attempt_move("a1", "a2", None).expect("attempt should run");
        match outcome {
            MoveOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectionReason::IllegalDestination);
                assert_eq!(rejection.piece, Some(Piece::new(Color::White, PieceKind::Rook)));
                assert_eq!(rejection.legal_move_count, 20);
                assert_eq!(rejection.legal_moves_from_origin, 0);
            }
            MoveOutcome::Accepted(_) => panic!("rook cannot capture its own pawn"),
        }

        assert_eq!(controller.position_text(), before);
        assert_eq!(controller.history_len(), 0);
    }

    #[test]
    fn pinned_piece_would_expose_king() {
        let mut controller = GameController::new();
        controller
            .load_position("k3r3/8/8/8/8/8/4R3/4K3 w - - 0 1")
            .expect("fen should parse");
        let outcome = controller.attempt_move("e2", "d2", None).expect("attempt should run");
        match outcome {
            MoveOutcome::Rejected(rejection) => {
                assert_eq!(rejection.reason, RejectionReason::WouldExposeOwnKing);
                assert_eq!(rejection.reason.code(), "would-expose-own-king");
                assert_eq!(rejection.legal_moves_from_origin, 6);
            }
            MoveOutcome::Accepted(_) => panic!("pinned rook must not leave the file"),
        }
    }

    #[test]
    fn promotion_needs_a_valid_piece() {
        let mut controller = GameController::new();
        controller
            .load_position("8/P6k/8/8/8/8/8/K7 w - - 0 1")
            .expect("fen should parse");

        let outcome = controller.attempt_move("a7", "a8", None).expect("attempt should run");
        assert_eq!(rejection(outcome), RejectionReason::AmbiguousPromotion);
        let outcome = controller.attempt_move("a7", "a8", Some('k')).expect("attempt should run");
        assert_eq!(rejection(outcome), RejectionReason::AmbiguousPromotion);
        assert!(matches!(
            controller.attempt_move("a7", "a8", Some('x')),
            Err(ChessError::MalformedNotation(_))
        ));

        let outcome = controller.attempt_move("a7", "a8", Some('Q')).expect("attempt should run");
        match outcome {
            MoveOutcome::Accepted(accepted) => assert!(accepted.is_promotion),
            MoveOutcome::Rejected(rejection) => panic!("promotion rejected: {rejection:?}"),
        }
        let a8 = algebraic_to_square("a8").expect("valid square");
        assert_eq!(
            controller.game_state().piece_at(a8),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
    }

    #[test]
    fn fools_mate_ends_the_game_and_undo_reopens_it() {
        let mut controller = started();
        play(&mut controller, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(
            controller.result(),
            GameResult::Checkmate {
                winner: Color::Black
            }
        );
        assert_eq!(controller.phase(), GamePhase::Ended);
        assert!(controller.is_in_check());
        assert!(matches!(
            controller.attempt_move("a2", "a3", None),
            Err(ChessError::GameAlreadyEnded(_))
        ));

        let undone = controller.undo_last_move().expect("undo should succeed");
        assert_eq!(undone.to_string(), "d8h4");
        assert_eq!(controller.phase(), GamePhase::InProgress);
        assert_eq!(controller.result(), GameResult::InProgress);
    }

    #[test]
    fn undo_restores_the_exact_previous_position() {
        let mut controller = started();
        play(&mut controller, &["e2e4", "d7d5", "e4e5", "f7f5"]);
        let before = controller.position_text();
        play(&mut controller, &["e5f6"]);
        assert_eq!(controller.history_len(), 5);

        controller.undo_last_move().expect("undo should succeed");
        assert_eq!(controller.position_text(), before);
        assert_eq!(
            controller.move_history(),
            vec!["e2e4", "d7d5", "e4e5", "f7f5"]
        );

        while controller.history_len() > 0 {
            controller.undo_last_move().expect("undo should succeed");
        }
        assert_eq!(controller.position_text(), STARTING_POSITION_FEN);
        assert_eq!(controller.undo_last_move(), Err(ChessError::NothingToUndo));
    }

    #[test]
    fn threefold_repetition_on_the_third_occurrence() {
        let mut controller = started();
        let cycle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play(&mut controller, &cycle);
        assert_eq!(controller.result(), GameResult::InProgress);
        play(&mut controller, &cycle[..3]);
        assert_eq!(controller.result(), GameResult::InProgress);
        play(&mut controller, &cycle[3..]);
        assert_eq!(controller.result(), GameResult::DrawThreefoldRepetition);

        controller.undo_last_move().expect("undo should succeed");
        assert_eq!(controller.result(), GameResult::InProgress);
    }

    #[test]
    fn failed_load_keeps_the_previous_position() {
        let mut controller = started();
        play(&mut controller, &["e2e4"]);
        let before = controller.position_text();
        let epoch = controller.epoch();
        assert!(matches!(
            controller.load_position("not a position"),
            Err(ChessError::MalformedNotation(_))
        ));
        assert_eq!(controller.position_text(), before);
        assert_eq!(controller.history_len(), 1);
        assert_eq!(controller.epoch(), epoch);
    }

    #[test]
    fn long_algebraic_attempts() {
        let mut controller = GameController::new();
        controller
            .load_position("8/P6k/8/8/8/8/8/K7 w - - 0 1")
            .expect("fen should parse");
        let outcome = controller.attempt_long_algebraic("a7a8").expect("attempt should run");
        assert_eq!(rejection(outcome), RejectionReason::AmbiguousPromotion);
        assert!(matches!(
            controller.attempt_long_algebraic("a7a8z"),
            Err(ChessError::MalformedNotation(_))
        ));
        let outcome = controller.attempt_long_algebraic("a7a8n").expect("attempt should run");
        assert!(matches!(outcome, MoveOutcome::Accepted(_)));
        assert_eq!(controller.move_history(), vec!["a7a8n"]);
    }

    #[test]
    fn legal_destinations_for_a_square() {
        let controller = started();
        let destinations: Vec<String> = controller
            .legal_destinations("e2")
            .expect("valid square")
            .iter()
            .map(|square| square.to_string())
            .collect();
        assert_eq!(destinations, vec!["e4", "e3"]);
        assert!(controller.legal_destinations("e9").is_err());
    }

    #[test]
    fn engine_moves_must_be_legal() {
        let mut controller = started();
        let legal = controller.legal_moves()[0];
        controller
            .apply_engine_move(legal)
            .expect("legal engine move applies");
        assert_eq!(
            controller.apply_engine_move(legal),
            Err(ChessError::IllegalMove(legal.to_string()))
        );
    }

    #[test]
    fn listeners_fire_in_order() {
        let events = Arc::new(Mutex::new(Vec::<String>::new()));
        let mut controller = GameController::new();

        let sink = Arc::clone(&events);
        controller.register_move_listener(move |accepted| {
            sink.lock()
                .expect("events lock")
                .push(format!("move {}", accepted.chess_move));
        });
        let sink = Arc::clone(&events);
        controller.register_check_listener(move |side| {
            sink.lock().expect("events lock").push(format!("check {side}"));
        });
        let sink = Arc::clone(&events);
        controller.register_result_listener(move |result| {
            sink.lock()
                .expect("events lock")
                .push(format!("result {}", result.code()));
        });

        controller.new_game().expect("start position loads");
        play(&mut controller, &["f2f3", "e7e5", "g2g4", "d8h4"]);

        let events = events.lock().expect("events lock");
        assert_eq!(
            *events,
            vec![
                "move f2f3",
                "move e7e5",
                "move g2g4",
                "move d8h4",
                "check white",
                "result checkmate",
            ]
        );
    }
}
