//! Line-oriented text front end and command loop.
//!
//! Parses console commands, drives the shared game controller, schedules
//! opponent turns after the configured thinking delay and prints board
//! events as they happen.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::controller::game_controller::{GameController, MoveOutcome, Rejection};
use crate::controller::opponent_turn::{OpponentTurn, SharedEngine};
use crate::engines::engine_heuristic::HeuristicEngine;
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_trait::Engine;
use crate::errors::{ChessError, EngineError};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::utils::render_game_state::render_game_state;

pub const DEFAULT_THINKING_DELAY_MS: u64 = 600;

pub fn run_stdio_loop() -> io::Result<()> {
    let (event_tx, event_rx) = mpsc::channel::<String>();
    let printer = thread::spawn(move || {
        let stdout = io::stdout();
        for line in event_rx {
            let mut out = stdout.lock();
            if writeln!(out, "{line}").and_then(|_| out.flush()).is_err() {
                break;
            }
        }
    });

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut console = ConsoleState::new(event_tx);

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = console.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    drop(console);
    let _ = printer.join();
    Ok(())
}

pub struct ConsoleState {
    turn: OpponentTurn,
    thinking_delay: Duration,
}

impl ConsoleState {
    /// Board events (applied moves, checks, results) are sent to `events`.
    pub fn new(events: Sender<String>) -> Self {
        let mut controller = GameController::new();

        let tx = events.clone();
        controller.register_move_listener(move |accepted| {
            let _ = tx.send(format!("played {}", accepted.chess_move));
        });
        let tx = events.clone();
        controller.register_check_listener(move |side| {
            let _ = tx.send(format!("check {side}"));
        });
        controller.register_result_listener(move |result| {
            let _ = events.send(format!("result {result}"));
        });

        let engine: Box<dyn Engine> = Box::new(HeuristicEngine::new());
        Self {
            turn: OpponentTurn::new(Arc::new(Mutex::new(controller)), Arc::new(Mutex::new(engine))),
            thinking_delay: Duration::from_millis(DEFAULT_THINKING_DELAY_MS),
        }
    }

    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let result = match cmd {
            "new" => self.handle_new(out),
            "position" => self.handle_position(&args, out),
            "move" => self.handle_move(&args, out),
            "undo" => self.handle_undo(out),
            "go" => self.handle_go(out),
            "stop" => {
                self.turn.cancel();
                writeln!(out, "stopped")?;
                Ok(())
            }
            "show" => self.handle_show(out),
            "fen" => self.handle_fen(out),
            "moves" => self.handle_moves(&args, out),
            "status" => self.handle_status(out),
            "setoption" => self.handle_setoption(trimmed, out),
            "quit" => {
                self.turn.cancel();
                return Ok(true);
            }
            other => {
                writeln!(out, "error: unknown command '{other}'")?;
                Ok(())
            }
        };

        if let Err(err) = result {
            writeln!(out, "error: {err}")?;
        }
        Ok(false)
    }

    pub fn thinking_delay(&self) -> Duration {
        self.thinking_delay
    }

    /// Block until a scheduled opponent turn has finished.
    pub fn wait_for_opponent(&mut self) -> Result<(), ChessError> {
        self.turn.wait().map(|_| ())
    }

    fn controller(&self) -> Result<MutexGuard<'_, GameController>, ChessError> {
        self.turn
            .controller()
            .lock()
            .map_err(|_| ChessError::LockPoisoned)
    }

    fn engine(&self) -> &SharedEngine {
        self.turn.engine()
    }

    fn handle_new(&mut self, out: &mut impl Write) -> Result<(), ChessError> {
        self.turn.cancel();
        self.controller()?.new_game()?;
        self.engine()
            .lock()
            .map_err(|_| ChessError::LockPoisoned)?
            .new_game();
        writeln!(out, "ok")?;
        Ok(())
    }

    fn handle_position(&mut self, args: &[&str], out: &mut impl Write) -> Result<(), ChessError> {
        let moves_at = args.iter().position(|tok| *tok == "moves");
        let (setup, moves) = match moves_at {
            Some(idx) => (&args[..idx], &args[idx + 1..]),
            None => (args, &[][..]),
        };

        let text = match setup.first() {
            Some(&"startpos") => STARTING_POSITION_FEN.to_owned(),
            Some(&"fen") => setup[1..].join(" "),
            Some(_) => setup.join(" "),
            None => {
                return Err(ChessError::MalformedNotation(
                    "missing position after 'position'".to_owned(),
                ))
            }
        };

        self.turn.cancel();
        let mut controller = self.controller()?;
        controller.load_position(&text)?;
        for lan in moves {
            if let MoveOutcome::Rejected(rejection) = controller.attempt_long_algebraic(lan)? {
                writeln!(out, "{}", describe_rejection(&rejection))?;
                return Ok(());
            }
        }
        writeln!(out, "ok")?;
        Ok(())
    }

    fn handle_move(&mut self, args: &[&str], out: &mut impl Write) -> Result<(), ChessError> {
        if args.is_empty() {
            return Err(ChessError::MalformedNotation("missing move".to_owned()));
        }
        let text = args.concat();
        let outcome = self.controller()?.attempt_long_algebraic(&text)?;
        match outcome {
            MoveOutcome::Accepted(_) => writeln!(out, "ok")?,
            MoveOutcome::Rejected(rejection) => {
                writeln!(out, "{}", describe_rejection(&rejection))?
            }
        }
        Ok(())
    }

    fn handle_undo(&mut self, out: &mut impl Write) -> Result<(), ChessError> {
        self.turn.cancel();
        let undone = self.controller()?.undo_last_move()?;
        writeln!(out, "undone {undone}")?;
        Ok(())
    }

    fn handle_go(&mut self, out: &mut impl Write) -> Result<(), ChessError> {
        if self.turn.request(self.thinking_delay)? {
            writeln!(out, "thinking")?;
        } else {
            writeln!(out, "busy")?;
        }
        Ok(())
    }

    fn handle_fen(&mut self, out: &mut impl Write) -> Result<(), ChessError> {
        let text = self.controller()?.position_text();
        writeln!(out, "{text}")?;
        Ok(())
    }

    fn handle_show(&mut self, out: &mut impl Write) -> Result<(), ChessError> {
        let controller = self.controller()?;
        writeln!(out, "{}", render_game_state(controller.game_state()))?;
        writeln!(out, "{}", status_line(&controller))?;
        Ok(())
    }

    fn handle_moves(&mut self, args: &[&str], out: &mut impl Write) -> Result<(), ChessError> {
        let controller = self.controller()?;
        let listed: Vec<String> = match args.first() {
            Some(square) => controller
                .legal_destinations(square)?
                .iter()
                .map(|to| to.to_string())
                .collect(),
            None => controller
                .legal_moves()
                .iter()
                .map(|mv| mv.to_string())
                .collect(),
        };
        writeln!(out, "{}", listed.join(" "))?;
        Ok(())
    }

    fn handle_status(&mut self, out: &mut impl Write) -> Result<(), ChessError> {
        let controller = self.controller()?;
        writeln!(out, "{}", status_line(&controller))?;
        Ok(())
    }

    fn handle_setoption(&mut self, line: &str, out: &mut impl Write) -> Result<(), ChessError> {
        let mut tokens = line.split_whitespace();
        let _ = tokens.next(); // setoption

        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in tokens {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");
        let invalid = || EngineError::InvalidOption {
            name: name.clone(),
            value: value.clone(),
        };

        if name.eq_ignore_ascii_case("ThinkingDelay") {
            let millis = value.parse::<u64>().map_err(|_| invalid())?;
            self.thinking_delay = Duration::from_millis(millis);
        } else if name.eq_ignore_ascii_case("Engine") {
            let engine: Box<dyn Engine> = match value.to_ascii_lowercase().as_str() {
                "heuristic" => Box::new(HeuristicEngine::new()),
                "random" => Box::new(RandomEngine::new()),
                _ => return Err(invalid().into()),
            };
            self.turn.cancel();
            *self.engine().lock().map_err(|_| ChessError::LockPoisoned)? = engine;
        } else {
            self.engine()
                .lock()
                .map_err(|_| ChessError::LockPoisoned)?
                .set_option(&name, &value)?;
        }

        tracing::debug!(%name, %value, "option set");
        writeln!(out, "ok")?;
        Ok(())
    }
}

fn status_line(controller: &GameController) -> String {
    format!(
        "side {} | result {} | check {} | legal {} | history {}",
        controller.side_to_move(),
        controller.result().code(),
        controller.is_in_check(),
        controller.legal_move_count(),
        controller.history_len()
    )
}

fn describe_rejection(rejection: &Rejection) -> String {
    let piece = rejection
        .piece
        .map_or_else(|| "none".to_owned(), |piece| format!("{} {}", piece.color, piece.kind));
    format!(
        "rejected {} {}{} piece {} legal {} from-origin {}",
        rejection.reason.code(),
        rejection.origin,
        rejection.destination,
        piece,
        rejection.legal_move_count,
        rejection.legal_moves_from_origin
    )
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    use super::ConsoleState;

    fn console() -> (ConsoleState, Receiver<String>) {
        let (tx, rx) = mpsc::channel();
        (ConsoleState::new(tx), rx)
    }

    fn run(console: &mut ConsoleState, line: &str) -> String {
        let mut out = Vec::<u8>::new();
        let quit = console
            .handle_command(line, &mut out)
            .expect("writing to a buffer cannot fail");
        assert!(!quit);
        String::from_utf8(out).expect("console output is UTF-8")
    }

    #[test]
    fn new_game_and_moves() {
        let (mut console, events) = console();
        assert_eq!(run(&mut console, "new"), "ok\n");
        assert_eq!(run(&mut console, "move e2e4"), "ok\n");
        assert_eq!(run(&mut console, "move e7 e5"), "ok\n");
        assert_eq!(events.try_recv().as_deref(), Ok("played e2e4"));
        assert_eq!(events.try_recv().as_deref(), Ok("played e7e5"));
        assert_eq!(
            run(&mut console, "fen"),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2\n"
        );
    }

    #[test]
    fn move_before_new_is_reported() {
        let (mut console, _events) = console();
        assert_eq!(
            run(&mut console, "move e2e4"),
            "error: no game has been started\n"
        );
    }

    #[test]
    fn rejected_move_is_described() {
        let (mut console, _events) = console();
        run(&mut console, "new");
        assert_eq!(
            run(&mut console, "move e2e5"),
            "rejected illegal-destination e2e5 piece white pawn legal 20 from-origin 2\n"
        );
    }

    #[test]
    fn position_with_moves_and_queries() {
        let (mut console, events) = console();
        assert_eq!(
            run(&mut console, "position startpos moves f2f3 e7e5 g2g4 d8h4"),
            "ok\n"
        );
        assert_eq!(
            run(&mut console, "status"),
            "side white | result checkmate | check true | legal 0 | history 4\n"
        );
        let received: Vec<String> = events.try_iter().collect();
        assert_eq!(received.last().map(String::as_str), Some("result checkmate, black wins"));
        assert_eq!(run(&mut console, "undo"), "undone d8h4\n");
        assert_eq!(run(&mut console, "moves g8"), "e7 f6 h6\n");
    }

    #[test]
    fn placement_only_position_and_bad_text() {
        let (mut console, _events) = console();
        assert_eq!(run(&mut console, "position 4k3/8/8/8/8/8/8/4K3"), "ok\n");
        assert!(run(&mut console, "status").contains("result draw-insufficient-material"));
        assert!(run(&mut console, "position fen 9/8/8/8/8/8/8/8").starts_with("error: malformed"));
    }

    #[test]
    fn setoption_updates_delay_and_engine() {
        let (mut console, _events) = console();
        assert_eq!(
            run(&mut console, "setoption name ThinkingDelay value 5"),
            "ok\n"
        );
        assert_eq!(console.thinking_delay(), Duration::from_millis(5));
        assert_eq!(run(&mut console, "setoption name Seed value 3"), "ok\n");
        assert_eq!(run(&mut console, "setoption name Engine value Random"), "ok\n");
        assert!(run(&mut console, "setoption name Engine value Deep").starts_with("error:"));
        assert!(run(&mut console, "setoption name Hash value 64").starts_with("error:"));
    }

    #[test]
    fn go_plays_the_opponent_move() {
        let (mut console, events) = console();
        run(&mut console, "setoption name ThinkingDelay value 1");
        run(&mut console, "new");
        run(&mut console, "move e2e4");
        assert_eq!(run(&mut console, "go"), "thinking\n");
        console.wait_for_opponent().expect("opponent turn runs");
        let received: Vec<String> = events.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert!(received[1].starts_with("played "));
        assert!(run(&mut console, "status").starts_with("side white"));
    }

    #[test]
    fn unknown_command_and_quit() {
        let (mut console, _events) = console();
        assert_eq!(run(&mut console, "fly"), "error: unknown command 'fly'\n");
        let mut out = Vec::<u8>::new();
        assert!(console.handle_command("quit", &mut out).expect("quit works"));
    }
}
