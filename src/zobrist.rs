//! Zobrist hashing with precomputed key tables
//!
//! One 64-bit key per (square, canonical piece index) pair plus a turn key
//! that is folded in whenever Black is to move. The tables are built once
//! behind a `OnceLock` and never mutated afterwards.

use std::sync::OnceLock;

use crate::board::{Board, Color, Piece};
use crate::utils::SQUARE_NB;

/// Canonical piece indices that carry a hash contribution: 14 revealed
/// color/kind combinations plus the face-down slot. Empty squares
/// contribute nothing.
pub const HASHED_PIECE_NB: usize = 15;

pub struct ZobristKeys {
    piece: [[u64; SQUARE_NB]; HASHED_PIECE_NB],
    turn: u64,
}

static KEYS: OnceLock<ZobristKeys> = OnceLock::new();

fn split_mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        split_mix64(self.state)
    }
}

fn init_keys() -> ZobristKeys {
    let mut stream = SplitMix64::new(0x0ddc0ffee_bad5eed);
    let mut piece = [[0u64; SQUARE_NB]; HASHED_PIECE_NB];
    for row in piece.iter_mut() {
        for key in row.iter_mut() {
            *key = stream.next();
        }
    }
    ZobristKeys {
        piece,
        turn: stream.next(),
    }
}

#[inline(always)]
pub fn init() {
    KEYS.get_or_init(init_keys);
}

fn keys() -> &'static ZobristKeys {
    KEYS.get_or_init(init_keys)
}

/// Hash contribution of `pc` standing on `sq`. Must not be called for an
/// empty square.
#[inline]
pub fn piece_key(pc: Piece, sq: usize) -> u64 {
    let idx = pc.index();
    debug_assert!(idx < HASHED_PIECE_NB, "empty squares carry no key");
    keys().piece[idx][sq]
}

/// Key folded in whenever the side to move is Black.
#[inline]
pub fn turn_key() -> u64 {
    keys().turn
}

/// From-scratch recomputation over the current occupancy; the board's
/// incrementally maintained hash must always equal this.
pub fn recalc(board: &Board) -> u64 {
    let mut h = 0u64;
    for sq in 0..SQUARE_NB {
        let pc = board.piece_on(sq);
        if !pc.is_none() {
            h ^= piece_key(pc, sq);
        }
    }
    if board.side_to_move() == Some(Color::Black) {
        h ^= turn_key();
    }
    h
}
