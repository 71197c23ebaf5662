//! Board invariants under mutation: bitboards, counts and hash must agree
//! with each other and with a from-scratch recomputation after every
//! operation, and every generated move must apply cleanly.

use banqi::board::{Board, Color, Move, Piece, PieceKind};
use banqi::utils::{square_bb, SQUARE_NB};

/// The §-invariant bundle: occupancy unions, per-square membership, count
/// popcounts and the incremental hash.
fn assert_consistent(board: &Board) {
    let mut color_union = 0u32;
    for c in Color::BOTH {
        color_union |= board.color_bb(c);
    }
    let mut kind_union = 0u32;
    for k in PieceKind::ALL {
        kind_union |= board.kind_bb(k);
    }
    assert_eq!(color_union | board.dark_bb(), board.occupied());
    assert_eq!(kind_union | board.dark_bb(), board.occupied());

    for sq in 0..SQUARE_NB {
        let pc = board.piece_on(sq);
        let occupied = board.occupied() & square_bb(sq) != 0;
        assert_eq!(!pc.is_none(), occupied, "square {sq}");
        if let (Some(c), Some(k)) = (pc.color(), pc.kind()) {
            assert_ne!(board.color_bb(c) & square_bb(sq), 0);
            assert_ne!(board.kind_bb(k) & square_bb(sq), 0);
        }
        if pc.is_dark() {
            assert_ne!(board.dark_bb() & square_bb(sq), 0);
        }
    }

    for c in Color::BOTH {
        for k in PieceKind::ALL {
            let pc = Piece::new(c, k);
            assert_eq!(
                board.count(pc) as u32,
                board.pieces_of(c, k).count_ones(),
                "count mismatch for {pc:?}"
            );
        }
    }

    assert_eq!(board.hash(), board.recalc_hash());
}

#[test]
fn test_fresh_and_loaded_boards_are_consistent() {
    banqi::init();
    assert_consistent(&Board::new());

    let mut board = Board::new();
    board.set_from_fen("1KxR/4/p1c1/4/x2n/2G1/4/r2x b 12").unwrap();
    assert_consistent(&board);
}

#[test]
fn test_consistency_through_flips_and_moves() {
    banqi::init();
    let mut board = Board::new();

    // Scripted referee: reveal a few pieces, then shuffle them around
    let reveals = [
        (0usize, PieceKind::Rook, Color::Red),
        (31, PieceKind::Rook, Color::Black),
        (13, PieceKind::Cannon, Color::Red),
        (22, PieceKind::Guard, Color::Black),
        (5, PieceKind::Pawn, Color::Red),
    ];
    for (sq, kind, color) in reveals {
        board.apply_flip(Move::new(sq, sq), kind, color).unwrap();
        assert_consistent(&board);
    }
}

#[test]
fn test_move_legality_closure() {
    banqi::init();
    let mut board = Board::new();
    board.set_from_fen("3R/4/4/2c1/4/1n2/4/r3 r 0").unwrap();

    for _ in 0..20 {
        let Some(us) = board.side_to_move() else { break };
        let moves = board.legal_moves(us);
        if moves.is_empty() || board.status().is_terminal() {
            break;
        }
        // Move legality closure: every generated move applies cleanly
        for &m in &moves {
            let mut probe = board;
            probe.apply_move(m).unwrap();
            assert_consistent(&probe);
        }
        board.apply_move(moves[0]).unwrap();
        assert_consistent(&board);
    }
}

#[test]
fn test_capture_updates_counts_and_resets_progress() {
    banqi::init();
    let mut board = Board::new();
    board.set_from_fen("4/4/4/4/4/1P2/1g2/4 r 3").unwrap();
    let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
    assert_eq!(board.count(black_pawn), 1);

    // A quiet move first, to push the no-progress counter up
    board.apply_move(Move::new(5, 4)).unwrap();
    assert_eq!(board.no_progress(), 1);
    board.apply_move(Move::new(9, 13)).unwrap();
    assert_eq!(board.no_progress(), 2);

    // Guard a2 -> a3 chases; pawn walks into the guard's reach; capture
    board.apply_move(Move::new(4, 8)).unwrap();
    board.apply_move(Move::new(13, 9)).unwrap();
    let captured = board.apply_move(Move::new(8, 9)).unwrap();
    assert_eq!(captured, Some(black_pawn));
    assert_eq!(board.count(black_pawn), 0);
    assert_eq!(board.no_progress(), 0);
    assert_consistent(&board);
}

#[test]
fn test_capture_asymmetry_table() {
    banqi::init();

    // Documented adjacency rule: who may step onto whom. The cannon never
    // captures by stepping, and the pawn-takes-king exception holds.
    fn may_step_capture(a: PieceKind, b: PieceKind) -> bool {
        use PieceKind::*;
        match a {
            Pawn => matches!(b, King | Pawn),
            Cannon => false,
            Knight => matches!(b, Knight | Cannon | Pawn),
            Rook => matches!(b, Rook | Knight | Cannon | Pawn),
            Minister => !matches!(b, King | Guard),
            Guard => b != King,
            King => b != Pawn,
        }
    }

    for a in PieceKind::ALL {
        for b in PieceKind::ALL {
            // Red `a` on b2, black `b` on b3, red to move
            let fen = format!(
                "4/4/4/4/4/1{}2/1{}2/4 r 0",
                b.letter().to_ascii_uppercase(),
                a.letter()
            );
            let mut board = Board::new();
            board.set_from_fen(&fen).unwrap();
            let generated = board
                .capture_moves(Color::Red)
                .contains(&Move::new(5, 9));
            assert_eq!(
                generated,
                may_step_capture(a, b),
                "red {:?} vs black {:?}",
                a,
                b
            );
        }
    }
}

#[test]
fn test_update_status_resolves_no_moves() {
    banqi::init();
    let mut board = Board::new();
    // Red pawn boxed into a1 by black guards it cannot take; red has no
    // action at all, yet both sides still own pieces
    board.set_from_fen("4/4/4/4/4/4/G3/pG2 r 0").unwrap();
    assert_eq!(board.legal_moves(Color::Red).len(), 0);
    board.update_status(0);
    assert_eq!(board.status(), banqi::board::Status::Draw);
}
