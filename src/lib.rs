pub mod board;
pub mod eval;
pub mod magic;
pub mod protocol;
pub mod search;
pub mod utils;
pub mod zobrist;

/// Build every precomputed table: step-move adjacency, Zobrist keys and the
/// cannon magics. Safe to call more than once; the magic search is the only
/// slow part and runs on first use either way.
pub fn init() {
    utils::init_step_tables();
    zobrist::init();
    magic::init();
}
