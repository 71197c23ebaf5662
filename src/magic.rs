//! Magic bitboards for O(1) cannon jump-capture lookup
//!
//! The cannon captures by jumping: along a rank or file, the first occupied
//! square is the hurdle, and anything beyond it up to the next occupied
//! square can be taken. For every square we precompute a collision-free
//! multiply-and-shift hash from "blockers on the relevant line" to the
//! attacked-square set, one table per axis, so a lookup is two multiplies
//! and a union instead of four ray walks.
//!
//! Unlike orthodox chess engines there is no published magic constant list
//! for a 4x8 board, so the magics themselves are searched at startup from a
//! seeded random stream. Construction is one-time; the tables live behind a
//! `OnceLock` and are immutable afterwards.

use std::sync::OnceLock;

use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::utils::{
    file_of, make_square, rank_of, square_bb, Bitboard, FILE_MASKS, FILE_NB, RANK_MASKS, RANK_NB,
    SQUARE_NB,
};

/// Largest relevant-line popcount (corner squares: 6 inner ranks + 2 inner
/// files), so every per-axis table fits in 2^8 slots.
const MAX_TABLE_SIZE: usize = 256;

/// Upper bound on random candidates tried per magic. Exhausting it is a
/// construction-time defect, not a runtime condition.
const MAX_MAGIC_TRIES: usize = 100_000_000;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// Square deltas for the axis as (file, rank) steps.
    fn steps(self) -> [(i8, i8); 2] {
        match self {
            Axis::Horizontal => [(1, 0), (-1, 0)],
            Axis::Vertical => [(0, 1), (0, -1)],
        }
    }
}

struct SquareMagic {
    mask: Bitboard,
    shift: u32,
    h_magic: u64,
    v_magic: u64,
    h_attacks: [Bitboard; MAX_TABLE_SIZE],
    v_attacks: [Bitboard; MAX_TABLE_SIZE],
}

struct CannonTables {
    squares: Vec<SquareMagic>,
}

static TABLES: OnceLock<CannonTables> = OnceLock::new();

// ============================================================================
// MASK GENERATION
// ============================================================================

/// Relevant blocker squares for `sq`: same file on the inner ranks 2..7 and
/// same rank on the inner files b..c, minus the square itself. The outer
/// edge squares are excluded because nothing lies beyond them, so their
/// occupancy can never change the attack set.
pub fn relevant_mask(sq: usize) -> Bitboard {
    let inner_ranks = RANK_MASKS[1..RANK_NB - 1]
        .iter()
        .fold(0, |acc, m| acc | m);
    let inner_files = FILE_MASKS[1] | FILE_MASKS[2];
    let line = (FILE_MASKS[file_of(sq)] & inner_ranks) | (RANK_MASKS[rank_of(sq)] & inner_files);
    line & !square_bb(sq)
}

// ============================================================================
// ATTACK GENERATION (ground truth, used to build and validate the tables)
// ============================================================================

/// Reference ray walk for one axis: the first occupied square becomes the
/// hurdle; every square after it up to and including the second occupied
/// square is part of the attack set. Callers intersect with enemy occupancy,
/// so empty squares past the hurdle are harmless to include.
pub fn cannon_attacks_slow(sq: usize, blockers: Bitboard, axis: Axis) -> Bitboard {
    let mut attacks: Bitboard = 0;

    for (df, dr) in axis.steps() {
        let mut file = file_of(sq) as i8;
        let mut rank = rank_of(sq) as i8;
        let mut hurdle = false;
        loop {
            file += df;
            rank += dr;
            if !(0..FILE_NB as i8).contains(&file) || !(0..RANK_NB as i8).contains(&rank) {
                break;
            }
            let bit = square_bb(make_square(file as usize, rank as usize));
            if hurdle {
                attacks |= bit;
            }
            if blockers & bit != 0 {
                if hurdle {
                    break;
                }
                hurdle = true;
            }
        }
    }

    attacks
}

// ============================================================================
// TABLE CONSTRUCTION
// ============================================================================

/// Generate all blocker subsets of a mask (Carry-Rippler enumeration).
fn enumerate_subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut subsets = Vec::new();
    let mut subset: Bitboard = 0;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

#[inline]
fn magic_index(blockers: Bitboard, magic: u64, shift: u32) -> usize {
    (((blockers as u64).wrapping_mul(magic)) >> shift) as usize
}

/// Search a collision-free multiplier for one square and axis. Candidates
/// are the AND of three random words (sparse bit population) and must push
/// at least 5 mask bits into the high byte of the product.
fn find_magic(sq: usize, mask: Bitboard, shift: u32, axis: Axis, rng: &mut ChaCha8Rng) -> u64 {
    let subsets = enumerate_subsets(mask);
    let truth: Vec<Bitboard> = subsets
        .iter()
        .map(|&b| cannon_attacks_slow(sq, b, axis))
        .collect();

    for _ in 0..MAX_MAGIC_TRIES {
        let magic = rng.next_u64() & rng.next_u64() & rng.next_u64();
        if ((mask as u64).wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 5 {
            continue;
        }

        let mut used = [Bitboard::MAX; MAX_TABLE_SIZE];
        let mut collided = false;
        for (i, &blockers) in subsets.iter().enumerate() {
            let idx = magic_index(blockers, magic, shift);
            if used[idx] == Bitboard::MAX {
                used[idx] = truth[i];
            } else if used[idx] != truth[i] {
                collided = true;
                break;
            }
        }
        if !collided {
            return magic;
        }
    }

    panic!("no cannon magic found for square {sq}");
}

fn build_square(sq: usize, rng: &mut ChaCha8Rng) -> SquareMagic {
    let mask = relevant_mask(sq);
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let h_magic = find_magic(sq, mask, shift, Axis::Horizontal, rng);
    let v_magic = find_magic(sq, mask, shift, Axis::Vertical, rng);

    let mut h_attacks = [0u32; MAX_TABLE_SIZE];
    let mut v_attacks = [0u32; MAX_TABLE_SIZE];
    for blockers in enumerate_subsets(mask) {
        h_attacks[magic_index(blockers, h_magic, shift)] =
            cannon_attacks_slow(sq, blockers, Axis::Horizontal);
        v_attacks[magic_index(blockers, v_magic, shift)] =
            cannon_attacks_slow(sq, blockers, Axis::Vertical);
    }

    SquareMagic {
        mask,
        shift,
        h_magic,
        v_magic,
        h_attacks,
        v_attacks,
    }
}

fn init_cannon_tables() -> CannonTables {
    // Fixed seed: table construction must be reproducible run to run
    let mut rng = ChaCha8Rng::seed_from_u64(0xCA77_0217);
    let squares = (0..SQUARE_NB).map(|sq| build_square(sq, &mut rng)).collect();
    CannonTables { squares }
}

/// Build the tables (thread-safe, effective once).
#[inline(always)]
pub fn init() {
    TABLES.get_or_init(init_cannon_tables);
}

// ============================================================================
// PUBLIC LOOKUP
// ============================================================================

/// Squares a cannon on `sq` attacks given full board occupancy.
#[inline]
pub fn cannon_attacks(sq: usize, occ: Bitboard) -> Bitboard {
    let tables = TABLES.get_or_init(init_cannon_tables);
    let entry = &tables.squares[sq];
    let blockers = occ & entry.mask;
    let h = magic_index(blockers, entry.h_magic, entry.shift);
    let v = magic_index(blockers, entry.v_magic, entry.shift);
    entry.h_attacks[h] | entry.v_attacks[v]
}

/// Both-axis reference walk, for tests and validation.
pub fn cannon_attacks_ref(sq: usize, blockers: Bitboard) -> Bitboard {
    Axis::BOTH
        .iter()
        .fold(0, |acc, &axis| acc | cannon_attacks_slow(sq, blockers, axis))
}
