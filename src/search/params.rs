//! Search tunables

use std::time::Duration;

/// Sentinel score for won/lost positions; never produced by evaluation.
pub const INF: i32 = 999_999_999;

/// Score returned for forced draws.
pub const DRAW_SCORE: i32 = 0;

/// Depth for most of the game.
pub const BASE_DEPTH: i32 = 6;

/// Depth once the game is long past the opening: with few face-down pieces
/// left the branching factor drops, so deeper search stays affordable.
pub const LATE_DEPTH: i32 = 12;

/// Ply count past which [`LATE_DEPTH`] applies.
pub const LATE_GAME_PLIES: u16 = 50;

/// Wall-clock budget per `choose_move` call. Checked at recursion entry
/// only, so a branch may overrun by the cost of one subtree.
pub const TIME_BUDGET: Duration = Duration::from_secs(6);

/// Flat ordering bonus so any capture sorts ahead of every quiet move.
pub const CAPTURE_BONUS: i32 = 1000;
