//! Move ordering heuristic
//!
//! Captures are scored by a flat bonus plus the victim's material value,
//! quiet moves score zero. Ordering only affects cutoff rate, never the
//! search result.

use crate::board::{Board, Move};
use crate::eval::piece_value;

use super::params::CAPTURE_BONUS;

/// Heuristic score per move, parallel to `moves`.
pub fn score_moves(board: &Board, moves: &[Move]) -> Vec<i32> {
    moves
        .iter()
        .map(|m| {
            let victim = board.piece_on(m.to_sq());
            match victim.kind() {
                Some(kind) => CAPTURE_BONUS + piece_value(kind),
                None => 0,
            }
        })
        .collect()
}

/// Reorder `moves` descending by the parallel `scores`. The sort is stable,
/// so equally scored moves keep their generation order.
pub fn order_moves(moves: &mut Vec<Move>, scores: &[i32]) {
    debug_assert_eq!(moves.len(), scores.len());
    let mut paired: Vec<(i32, Move)> = scores.iter().copied().zip(moves.iter().copied()).collect();
    paired.sort_by_key(|&(score, _)| std::cmp::Reverse(score));
    for (slot, (_, m)) in moves.iter_mut().zip(paired) {
        *slot = m;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, PieceKind};

    #[test]
    fn test_captures_sort_first() {
        crate::init();
        let mut board = Board::new();
        // Red guard next to a black pawn and a black rook
        board.set_from_fen("4/4/4/4/4/1P2/Rg2/4 r 0").unwrap();

        let mut moves = board.legal_moves(Color::Red);
        let scores = score_moves(&board, &moves);
        order_moves(&mut moves, &scores);

        // Best victim first: the rook outvalues the pawn, quiets trail
        let first_victim = board.piece_on(moves[0].to_sq());
        assert_eq!(first_victim.kind(), Some(PieceKind::Rook));
        let second_victim = board.piece_on(moves[1].to_sq());
        assert_eq!(second_victim.kind(), Some(PieceKind::Pawn));
        assert!(board.piece_on(moves[2].to_sq()).is_none());
    }

    #[test]
    fn test_stable_for_equal_scores() {
        crate::init();
        let mut board = Board::new();
        board.set_from_fen("4/4/4/4/4/4/4/k3 r 0").unwrap();

        let mut moves = board.legal_moves(Color::Red);
        let original = moves.clone();
        let scores = score_moves(&board, &moves);
        order_moves(&mut moves, &scores);
        // All quiet, all zero: order untouched
        assert_eq!(moves, original);
    }
}
