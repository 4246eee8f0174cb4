//! Observer hooks fired synchronously by the game controller.
//!
//! Listeners are injected into the controller instead of living in global
//! state. Implement [`GameListener`] directly, or register a closure with one
//! of the `register_*_listener` helpers on the controller.

use crate::controller::game_controller::AcceptedMove;
use crate::game_state::chess_types::Color;
use crate::game_state::game_result::GameResult;

/// Callbacks run in this order after a move: applied, check, result.
pub trait GameListener: Send {
    fn on_move_applied(&mut self, _accepted: &AcceptedMove) {}

    /// `side` is the side whose king is now attacked.
    fn on_check(&mut self, _side: Color) {}

    fn on_result_changed(&mut self, _result: GameResult) {}
}

pub(crate) struct MoveListenerFn<F>(pub F);

impl<F> GameListener for MoveListenerFn<F>
where
    F: FnMut(&AcceptedMove) + Send,
{
    fn on_move_applied(&mut self, accepted: &AcceptedMove) {
        (self.0)(accepted)
    }
}

pub(crate) struct CheckListenerFn<F>(pub F);

impl<F> GameListener for CheckListenerFn<F>
where
    F: FnMut(Color) + Send,
{
    fn on_check(&mut self, side: Color) {
        (self.0)(side)
    }
}

pub(crate) struct ResultListenerFn<F>(pub F);

impl<F> GameListener for ResultListenerFn<F>
where
    F: FnMut(GameResult) + Send,
{
    fn on_result_changed(&mut self, result: GameResult) {
        (self.0)(result)
    }
}
