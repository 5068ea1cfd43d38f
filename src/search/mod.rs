//! Candidate retrieval
//!
//! - [`lexical`]: term-frequency density score between a chunk and a query
//! - [`hybrid`]: vector neighbors re-ranked by a weighted blend with the lexical score

pub mod hybrid;
pub mod lexical;

pub use hybrid::hybrid_score;
pub use hybrid::hybrid_search;
pub use hybrid::rank_neighbors;
pub use hybrid::DEFAULT_ALPHA;
pub use lexical::lexical_score;
