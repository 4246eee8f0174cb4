//! Delayed opponent moves.
//!
//! An opponent turn waits out a thinking delay on a worker thread, then asks
//! the engine for a move and applies it through the shared controller. Only
//! one turn may be outstanding. A turn is dropped without effect when it is
//! cancelled, or when the position changed (load, reset, move or undo) while
//! it was waiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::controller::game_controller::{AcceptedMove, GameController};
use crate::engines::engine_trait::Engine;
use crate::errors::ChessError;

pub type SharedController = Arc<Mutex<GameController>>;
pub type SharedEngine = Arc<Mutex<Box<dyn Engine>>>;

type TurnResult = Result<Option<AcceptedMove>, ChessError>;

pub struct OpponentTurn {
    controller: SharedController,
    engine: SharedEngine,
    pending: Arc<AtomicBool>,
    cancelled: Arc<AtomicBool>,
    cancel_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<TurnResult>>,
}

impl OpponentTurn {
    pub fn new(controller: SharedController, engine: SharedEngine) -> Self {
        Self {
            controller,
            engine,
            pending: Arc::new(AtomicBool::new(false)),
            cancelled: Arc::new(AtomicBool::new(false)),
            cancel_tx: None,
            worker: None,
        }
    }

    pub fn controller(&self) -> &SharedController {
        &self.controller
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// Schedule the side to move's reply after `delay`. Returns `Ok(false)`
    /// when a turn is already pending.
    pub fn request(&mut self, delay: Duration) -> Result<bool, ChessError> {
        if self.pending.swap(true, Ordering::AcqRel) {
            tracing::debug!("opponent turn already pending");
            return Ok(false);
        }

        let epoch = match self.snapshot_epoch() {
            Ok(epoch) => epoch,
            Err(err) => {
                self.pending.store(false, Ordering::Release);
                return Err(err);
            }
        };

        // The previous worker has cleared `pending`, so it is finishing.
        if let Some(previous) = self.worker.take() {
            match previous.join() {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => tracing::warn!(%err, "previous opponent turn failed"),
                Err(_) => tracing::warn!("previous opponent worker panicked"),
            }
        }

        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let cancelled = Arc::new(AtomicBool::new(false));
        self.cancel_tx = Some(cancel_tx);
        self.cancelled = Arc::clone(&cancelled);

        let controller = Arc::clone(&self.controller);
        let engine = Arc::clone(&self.engine);
        let pending = Arc::clone(&self.pending);

        tracing::debug!(delay_ms = delay.as_millis() as u64, epoch, "opponent turn scheduled");
        self.worker = Some(thread::spawn(move || {
            let outcome = match cancel_rx.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => {
                    play_turn(&controller, &engine, &cancelled, epoch)
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("opponent turn cancelled");
                    Ok(None)
                }
            };
            pending.store(false, Ordering::Release);
            outcome
        }));

        Ok(true)
    }

    /// Suppress the pending turn, if any. A turn whose move has already been
    /// applied is unaffected.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Block until the outstanding turn finishes. `Ok(None)` when nothing
    /// was applied.
    pub fn wait(&mut self) -> TurnResult {
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| ChessError::InvalidState("opponent worker panicked".to_owned()))?,
            None => Ok(None),
        }
    }

    fn snapshot_epoch(&self) -> Result<u64, ChessError> {
        let controller = self.controller.lock().map_err(|_| ChessError::LockPoisoned)?;
        controller.ensure_in_progress()?;
        Ok(controller.epoch())
    }
}

impl Drop for OpponentTurn {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn play_turn(
    controller: &SharedController,
    engine: &SharedEngine,
    cancelled: &AtomicBool,
    epoch: u64,
) -> TurnResult {
    let mut controller = controller.lock().map_err(|_| {
        tracing::warn!("controller lock poisoned; opponent turn dropped");
        ChessError::LockPoisoned
    })?;

    if cancelled.load(Ordering::Acquire) {
        tracing::debug!("opponent turn cancelled");
        return Ok(None);
    }
    if controller.epoch() != epoch {
        tracing::warn!(
            scheduled = epoch,
            current = controller.epoch(),
            "position changed while opponent was thinking; turn dropped"
        );
        return Ok(None);
    }
    if controller.ensure_in_progress().is_err() {
        return Ok(None);
    }

    let chess_move = {
        let mut engine = engine.lock().map_err(|_| ChessError::LockPoisoned)?;
        engine.choose_move(controller.game_state(), controller.legal_moves())?
    };
    controller.apply_engine_move(chess_move).map(Some)
}
