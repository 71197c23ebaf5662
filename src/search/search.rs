//! NegaScout search driver
//!
//! Negamax with alpha-beta and transposition caching over value-copied
//! boards: every recursion clones the 100-odd-byte board instead of keeping
//! an unmake path. Flip moves are chance nodes — the flipped identity is
//! hidden — and are handled only at the root, where each face-down square
//! is scored by the weighted mean of the search value over every identity
//! still unrevealed. That mean is an approximation of expectiminimax, not
//! an exact game-theoretic value; recursing into every hidden assignment
//! would blow up the branching factor.

use std::time::Instant;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Color, Move, PieceKind, NO_PROGRESS_LIMIT, REPETITION_LIMIT};
use crate::eval::evaluate;

use super::ordering::{order_moves, score_moves};
use super::params::{BASE_DEPTH, DRAW_SCORE, INF, LATE_DEPTH, LATE_GAME_PLIES, TIME_BUDGET};
use super::tt::{Bound, TTEntry, TranspositionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best action found; `Move::NONE` when the side to move has none.
    pub best_move: Move,
    pub score: i32,
}

/// Owns the caches shared across recursive calls, never a board: boards
/// come in by reference, are copied per node and dropped on return.
pub struct Searcher {
    tt: TranspositionTable,
    rng: ChaCha8Rng,
    deadline: Instant,
    root_side: Color,
}

impl Searcher {
    pub fn new(seed: u64) -> Self {
        Self {
            tt: TranspositionTable::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            deadline: Instant::now(),
            root_side: Color::Red,
        }
    }

    /// Drop cached entries, e.g. when a new game starts.
    pub fn reset(&mut self) {
        self.tt.clear();
    }

    /// Pick a move with the depth policy: 6 plies for most of the game,
    /// 12 once past ply 50 when few face-down pieces remain.
    pub fn choose_move(&mut self, board: &Board) -> SearchResult {
        let depth = if board.ply() > LATE_GAME_PLIES {
            LATE_DEPTH
        } else {
            BASE_DEPTH
        };
        self.choose_move_at(board, depth)
    }

    /// Pick a move at a fixed depth.
    pub fn choose_move_at(&mut self, board: &Board, depth: i32) -> SearchResult {
        self.deadline = Instant::now() + TIME_BUDGET;
        let started = Instant::now();
        let result = self.root_search(board, depth);
        tracing::debug!(
            depth,
            score = result.score,
            best = %result.best_move,
            tt_entries = self.tt.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );
        result
    }

    fn root_search(&mut self, board: &Board, depth: i32) -> SearchResult {
        let flips = board.flip_moves();

        // Before the first flip there is no side assignment and nothing to
        // evaluate: open with a uniformly random reveal.
        let Some(us) = board.side_to_move() else {
            let best_move = self.random_flip(&flips);
            return SearchResult {
                best_move,
                score: if best_move == Move::NONE { -INF } else { DRAW_SCORE },
            };
        };
        self.root_side = us;

        let mut moves = board.legal_moves(us);
        if moves.is_empty() && flips.is_empty() {
            // Terminal, not an error: the mover has no action left
            return SearchResult {
                best_move: Move::NONE,
                score: -INF,
            };
        }
        let scores = score_moves(board, &moves);
        order_moves(&mut moves, &scores);

        let mut alpha = -INF;
        let beta = INF;
        let mut best_move = Move::NONE;
        for &m in &moves {
            let mut child = *board;
            let Ok(_) = child.apply_move(m) else { continue };
            let score = -self.nega_scout(&child, depth - 1, -beta, -alpha);
            if score > alpha {
                alpha = score;
                best_move = m;
            }
            if alpha >= beta {
                break;
            }
        }

        // Chance nodes: when no move improves on standing pat (or none
        // exists), a flip is at least as good. Take the square whose
        // expectation beats the baseline, or a uniformly random one when
        // none does.
        let stand_pat = evaluate(board, us);
        if !flips.is_empty() && (alpha <= stand_pat || moves.is_empty()) {
            let mut best_expected = stand_pat;
            let mut best_flip = self.random_flip(&flips);
            for &f in &flips {
                if let Some(expected) = self.flip_expectation(board, f, depth, alpha, beta) {
                    if expected > best_expected {
                        best_expected = expected;
                        best_flip = f;
                    }
                }
            }
            best_move = best_flip;
            alpha = best_expected;
        }

        if best_move == Move::NONE && !moves.is_empty() {
            // Every move scored -INF; any legal move beats resigning
            best_move = moves[0];
        }

        SearchResult {
            best_move,
            score: alpha,
        }
    }

    /// Expected search value of revealing square `f`: the mean over every
    /// identity still unrevealed, weighted by how many of that identity
    /// remain face-down. `None` when the reveal table admits no identity.
    fn flip_expectation(
        &mut self,
        board: &Board,
        f: Move,
        depth: i32,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let mut total: i64 = 0;
        let mut weight: i64 = 0;
        for color in Color::BOTH {
            for kind in PieceKind::ALL {
                let w = board.remaining_unrevealed(crate::board::Piece::new(color, kind)) as i64;
                if w == 0 {
                    continue;
                }
                let mut child = *board;
                let Ok(_) = child.apply_flip(f, kind, color) else {
                    continue;
                };
                let score = -self.nega_scout(&child, depth - 1, -beta, -alpha);
                total += w * score as i64;
                weight += w;
            }
        }
        if weight == 0 {
            None
        } else {
            Some((total / weight) as i32)
        }
    }

    fn random_flip(&mut self, flips: &[Move]) -> Move {
        if flips.is_empty() {
            Move::NONE
        } else {
            flips[self.rng.gen_range(0..flips.len())]
        }
    }

    fn nega_scout(&mut self, board: &Board, depth: i32, mut alpha: i32, mut beta: i32) -> i32 {
        // Out of depth or out of clock: stand pat. The clock is only read
        // here, so one subtree can overrun the budget.
        if depth <= 0 || Instant::now() >= self.deadline {
            return evaluate(board, self.root_side);
        }
        if board.repetition() >= REPETITION_LIMIT {
            return DRAW_SCORE;
        }
        if board.no_progress() >= NO_PROGRESS_LIMIT {
            return DRAW_SCORE;
        }

        let alpha_orig = alpha;
        let key = board.hash();
        if let Some(entry) = self.tt.get(key) {
            if entry.depth >= depth {
                match entry.bound {
                    Bound::Exact => return entry.score,
                    Bound::UpperBound => beta = beta.min(entry.score),
                    Bound::LowerBound => alpha = alpha.max(entry.score),
                }
                if alpha >= beta {
                    return entry.score;
                }
            }
        }

        let Some(us) = board.side_to_move() else {
            return evaluate(board, self.root_side);
        };
        let mut moves = board.legal_moves(us);
        let dark = board.dark_count();

        if moves.is_empty() && dark == 0 {
            let mut resolved = *board;
            resolved.update_status(0);
            return match resolved.status().winner() {
                Some(winner) if winner == us => INF,
                Some(_) => -INF,
                None => DRAW_SCORE,
            };
        }
        if moves.is_empty() {
            // Only flips remain; they are chance nodes and resolved one
            // level up, so stand pat here to bound the branching factor.
            return evaluate(board, self.root_side);
        }

        let scores = score_moves(board, &moves);
        order_moves(&mut moves, &scores);

        let mut best_move = Move::NONE;
        for &m in &moves {
            let mut child = *board;
            let Ok(_) = child.apply_move(m) else { continue };
            let score = -self.nega_scout(&child, depth - 1, -beta, -alpha);
            if score >= beta {
                self.tt.set(
                    key,
                    TTEntry {
                        score: beta,
                        depth,
                        best_move: m,
                        bound: Bound::LowerBound,
                    },
                );
                return beta;
            }
            if score > alpha {
                alpha = score;
                best_move = m;
            }
        }

        if best_move == Move::NONE {
            best_move = moves[0];
        }
        let bound = if alpha <= alpha_orig {
            Bound::UpperBound
        } else {
            Bound::Exact
        };
        self.tt.set(
            key,
            TTEntry {
                score: alpha,
                depth,
                best_move,
                bound,
            },
        );
        alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_legal_actions_is_terminal_result() {
        crate::init();
        let mut board = Board::new();
        // Lone black king, red to move with nothing on the board
        board.set_from_fen("3K/4/4/4/4/4/4/4 r 0").unwrap();
        let mut searcher = Searcher::new(1);
        let result = searcher.choose_move_at(&board, 4);
        assert_eq!(result.best_move, Move::NONE);
        assert_eq!(result.score, -INF);
    }

    #[test]
    fn test_fresh_game_answers_with_flip() {
        crate::init();
        let board = Board::new();
        let mut searcher = Searcher::new(7);
        let result = searcher.choose_move(&board);
        assert!(result.best_move.is_flip());
    }

    #[test]
    fn test_search_is_deterministic_for_a_seed() {
        crate::init();
        let mut board = Board::new();
        board.set_from_fen("3R/4/1x2/4/2c1/4/1n2/r3 r 4").unwrap();
        let a = Searcher::new(11).choose_move_at(&board, 3);
        let b = Searcher::new(11).choose_move_at(&board, 3);
        assert_eq!(a, b);
    }
}
