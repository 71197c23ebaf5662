//! Fixed-depth NegaScout search with transposition caching and
//! chance-node handling for flips

pub mod ordering;
pub mod params;
pub mod search;
pub mod tt;

pub use self::search::{SearchResult, Searcher};
pub use self::tt::{Bound, TTEntry, TranspositionTable};
