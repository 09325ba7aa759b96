mod traits;
pub use self::traits::*;

pub mod iterated;
pub use self::iterated::{Config, Convergence, IteratedPageRank, Outcome};

pub mod ranking;
pub use self::ranking::{publish, rank_airports, rank_order};
