//! Protocol engine: applies referee commands to the board and asks the
//! search driver for moves
//!
//! The referee owns the real game. `genmove` only reports the chosen move;
//! the referee echoes it back as `move`/`flip` (a flip also carries the
//! revealed identity, which only the referee knows). Board snapshots go to
//! the debug log, never to protocol stdout.

use std::io::{self, BufRead, Write};

use crate::board::{parse_piece, parse_square, Board, Move, NO_PROGRESS_LIMIT};
use crate::search::Searcher;

use super::parser::{parse_command, Command, COMMANDS};

const PROTOCOL_VERSION: &str = "1.0.0";
const ENGINE_NAME: &str = "NegaScout";
const ENGINE_VERSION: &str = "1.0.0";

pub struct Engine {
    board: Board,
    searcher: Searcher,
    depth_override: Option<i32>,
    running: bool,
}

impl Engine {
    pub fn new(seed: u64, depth_override: Option<i32>) -> Self {
        Self {
            board: Board::new(),
            searcher: Searcher::new(seed),
            depth_override,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn handle_command(&mut self, cmd: Command) -> Vec<String> {
        let mut res = Vec::new();
        match cmd {
            Command::ProtocolVersion => res.push(PROTOCOL_VERSION.to_string()),
            Command::Name => res.push(ENGINE_NAME.to_string()),
            Command::Version => res.push(ENGINE_VERSION.to_string()),
            Command::KnownCommand(name) => {
                res.push(COMMANDS.contains(&name.as_str()).to_string());
            }
            Command::ListCommands => res.push(COMMANDS.join("\n")),
            Command::Quit => {
                tracing::info!("bye");
                self.running = false;
            }
            Command::BoardSize { files, ranks } => {
                tracing::info!(%files, %ranks, "boardsize acknowledged (fixed 4x8)");
            }
            Command::ResetBoard => {
                self.board.reset();
                self.searcher.reset();
            }
            Command::NumRepetition => res.push(self.board.repetition().to_string()),
            Command::NumMovesToDraw => {
                let left = NO_PROGRESS_LIMIT.saturating_sub(self.board.no_progress());
                res.push(left.to_string());
            }
            Command::Move { from, to } => match (parse_square(&from), parse_square(&to)) {
                (Some(f), Some(t)) => {
                    match self.board.apply_move(Move::new(f, t)) {
                        Ok(captured) => {
                            if let Some(pc) = captured {
                                tracing::debug!(piece = ?pc, "captured");
                            }
                            tracing::debug!("\n{}", self.board.render());
                        }
                        Err(e) => res.push(format!("illegal move: {e}")),
                    }
                }
                _ => res.push(format!("bad square in 'move {from} {to}'")),
            },
            Command::Flip { square, piece } => {
                match (parse_square(&square), parse_piece(&piece)) {
                    (Some(sq), Some((color, kind))) => {
                        match self.board.apply_flip(Move::new(sq, sq), kind, color) {
                            Ok(()) => tracing::debug!("\n{}", self.board.render()),
                            Err(e) => res.push(format!("illegal flip: {e}")),
                        }
                    }
                    _ => res.push(format!("bad operand in 'flip {square} {piece}'")),
                }
            }
            Command::GenMove => {
                let result = match self.depth_override {
                    Some(depth) => self.searcher.choose_move_at(&self.board, depth),
                    None => self.searcher.choose_move(&self.board),
                };
                if result.best_move == Move::NONE {
                    res.push("no legal moves".to_string());
                } else {
                    res.push(result.best_move.to_string());
                }
            }
            Command::GameOver(outcome) => {
                tracing::info!(%outcome, "game over");
            }
            Command::Ready => {}
            Command::TimeSettings(args) => {
                tracing::info!(?args, "time settings ignored (fixed per-move budget)");
            }
            Command::TimeLeft { side, msec } => {
                tracing::info!(%side, %msec, "time left");
            }
            Command::ShowBoard => res.push(self.board.render()),
            Command::Unknown(line) => {
                if !line.is_empty() {
                    res.push(format!("unknown command: {line}"));
                }
            }
        }
        res
    }
}

/// Parse one line and feed it to the engine; used by the loop and by tests.
pub fn process_line(line: &str, engine: &mut Engine) -> Vec<String> {
    engine.handle_command(parse_command(line))
}

/// Blocking stdin/stdout loop. Every response batch is flushed before the
/// next read so the referee never stalls on buffering.
pub fn run_loop(seed: u64, depth_override: Option<i32>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    let mut engine = Engine::new(seed, depth_override);
    let mut buf = String::new();

    while engine.is_running() {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        let line = buf.trim();
        if line.is_empty() {
            continue;
        }

        for r in process_line(line, &mut engine) {
            writeln!(writer, "{}", r)?;
        }
        writer.flush()?;
    }

    Ok(())
}
