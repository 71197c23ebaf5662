//! Exhaustive validation of the cannon magic tables against the reference
//! ray walk.

use banqi::board::{Color, Move, PieceKind};
use banqi::magic::{cannon_attacks, cannon_attacks_ref, relevant_mask};
use banqi::utils::{square_bb, Bitboard, SQUARE_NB};

/// Every blocker subset of a mask, Carry-Rippler style.
fn subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut out = Vec::new();
    let mut subset: Bitboard = 0;
    loop {
        out.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    out
}

#[test]
fn test_fast_lookup_matches_slow_walk_everywhere() {
    banqi::init();
    for sq in 0..SQUARE_NB {
        let mask = relevant_mask(sq);
        for blockers in subsets(mask) {
            assert_eq!(
                cannon_attacks(sq, blockers),
                cannon_attacks_ref(sq, blockers),
                "square {sq} blockers {blockers:#010x}"
            );
        }
    }
}

#[test]
fn test_lookup_masks_out_off_line_occupancy() {
    banqi::init();
    for sq in 0..SQUARE_NB {
        let mask = relevant_mask(sq);
        let noise = !mask;
        for blockers in subsets(mask).into_iter().step_by(7) {
            assert_eq!(
                cannon_attacks(sq, blockers),
                cannon_attacks(sq, blockers | noise),
                "square {sq}"
            );
        }
    }
}

/// Single hurdle, single target: the generated capture set is exactly that
/// target.
#[test]
fn test_single_hurdle_single_target_capture() {
    banqi::init();
    let mut board = banqi::board::Board::new();
    // Red cannon a1, face-down hurdle a3, black pawn a5
    board.set_from_fen("4/4/4/P3/4/x3/4/c3 r 0").unwrap();

    let captures = board.capture_moves(Color::Red);
    assert_eq!(captures, vec![Move::new(0, 16)]);

    // The raw attack set may cover empty squares past the hurdle, but the
    // only enemy piece in it is a5
    let attacks = cannon_attacks(0, board.occupied());
    assert_eq!(attacks & board.color_bb(Color::Black), square_bb(16));
}

#[test]
fn test_cannon_cannot_capture_adjacent() {
    banqi::init();
    let mut board = banqi::board::Board::new();
    // Red cannon b2 directly beside a black rook: no hurdle, no capture
    board.set_from_fen("4/4/4/4/4/4/1cR1/4 r 0").unwrap();
    assert!(board.capture_moves(Color::Red).is_empty());
    // The rook, however, does take the cannon
    let black_caps = board.capture_moves(Color::Black);
    assert_eq!(black_caps, vec![Move::new(6, 5)]);
}

#[test]
fn test_cannon_jumps_over_either_color() {
    banqi::init();
    let mut board = banqi::board::Board::new();
    // Hurdles of both colors work: red knight at b4 screens b2 -> b6
    board.set_from_fen("4/4/1G2/4/1n2/4/1c2/4 r 0").unwrap();
    let captures = board.capture_moves(Color::Red);
    // Cannon b2 (5) jumps the knight b4 (13) onto the guard b6 (21)
    assert!(captures.contains(&Move::new(5, 21)));
    // The knight itself has no capture against the distant guard
    assert_eq!(
        captures
            .iter()
            .filter(|m| m.from_sq() == 13 && !board.piece_on(m.to_sq()).is_none())
            .count(),
        0
    );
}

#[test]
fn test_flip_moves_cover_every_dark_square() {
    banqi::init();
    let board = banqi::board::Board::new();
    let flips = board.flip_moves();
    assert_eq!(flips.len(), SQUARE_NB);
    for (sq, m) in flips.iter().enumerate() {
        assert!(m.is_flip());
        assert_eq!(m.from_sq(), sq);
    }
    // Kind sanity for the revealed-identity loop the search runs
    assert_eq!(PieceKind::ALL.len(), 7);
}
