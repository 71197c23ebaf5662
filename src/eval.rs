//! Material and threat evaluation
//!
//! A piece is worth less the more of its natural predators are still on the
//! board. `basic_value` counts, for one kind, the opponent pieces that prey
//! on it: its designated free predator weighs four times an even trade.
//! The material score divides each kind's base value by that exposure, so a
//! rook facing two enemy ministers contributes far less than a safe one.

use crate::board::{Color, PieceKind};

// Base material values (midgame scale)
pub const PAWN_VALUE: i32 = 10;
pub const CANNON_VALUE: i32 = 200;
pub const KNIGHT_VALUE: i32 = 50;
pub const ROOK_VALUE: i32 = 75;
pub const MINISTER_VALUE: i32 = 100;
pub const GUARD_VALUE: i32 = 250;
pub const KING_VALUE: i32 = 320;

#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Cannon => CANNON_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Minister => MINISTER_VALUE,
        PieceKind::Guard => GUARD_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

/// The one kind that captures this kind without fear of the reverse trade:
/// the next rank up the dominance cycle, which wraps King back onto Pawn
/// (the weakest-beats-strongest rule).
fn chain_predator(kind: PieceKind) -> PieceKind {
    match kind {
        PieceKind::Pawn => PieceKind::Cannon,
        PieceKind::Cannon => PieceKind::Knight,
        PieceKind::Knight => PieceKind::Rook,
        PieceKind::Rook => PieceKind::Minister,
        PieceKind::Minister => PieceKind::Guard,
        PieceKind::Guard => PieceKind::King,
        PieceKind::King => PieceKind::Pawn,
    }
}

/// True when `a` may capture `b` at all (adjacency table plus cannon jumps).
fn captures(a: PieceKind, b: PieceKind) -> bool {
    match a {
        PieceKind::Pawn => matches!(b, PieceKind::King | PieceKind::Pawn),
        // The cannon takes anything it can jump to
        PieceKind::Cannon => true,
        PieceKind::Knight => {
            matches!(b, PieceKind::Knight | PieceKind::Cannon | PieceKind::Pawn)
        }
        PieceKind::Rook => matches!(
            b,
            PieceKind::Rook | PieceKind::Knight | PieceKind::Cannon | PieceKind::Pawn
        ),
        PieceKind::Minister => !matches!(b, PieceKind::King | PieceKind::Guard),
        PieceKind::Guard => b != PieceKind::King,
        PieceKind::King => b != PieceKind::Pawn,
    }
}

#[inline]
fn opp_count(counts: &[u8; 14], them: Color, kind: PieceKind) -> i32 {
    counts[them.index() * 7 + kind.index()] as i32
}

/// Exposure of one `us` piece of `kind`: 1 plus four times the opponent's
/// free-predator count plus every opponent kind it trades evenly with.
pub fn basic_value(counts: &[u8; 14], us: Color, kind: PieceKind) -> i32 {
    let them = !us;
    let mut value = 1 + 4 * opp_count(counts, them, chain_predator(kind));
    for other in PieceKind::ALL {
        if other == chain_predator(kind) {
            continue;
        }
        if captures(other, kind) && captures(kind, other) {
            value += opp_count(counts, them, other);
        }
    }
    value
}

/// Material sum for one color, each kind discounted by its exposure.
pub fn material_score(counts: &[u8; 14], us: Color) -> i32 {
    let mut score = 0;
    for kind in PieceKind::ALL {
        let own = counts[us.index() * 7 + kind.index()] as i32;
        if own == 0 {
            continue;
        }
        score += own * piece_value(kind) / basic_value(counts, us, kind);
    }
    score
}

/// Score of the position from `perspective`, negated when that color is not
/// on turn, so the returned value is always from the mover's point of view
/// (negamax convention). Uses the board's cached per-color scores.
pub fn evaluate(board: &crate::board::Board, perspective: Color) -> i32 {
    let score = board.cached_score(perspective) - board.cached_score(!perspective);
    match board.side_to_move() {
        Some(stm) if stm != perspective => -score,
        _ => score,
    }
}
