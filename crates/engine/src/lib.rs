//! # Engine Crate
//!
//! Item-based collaborative filtering over a sparse movie x user rating
//! matrix.
//!
//! ## Main Components
//!
//! - **matrix**: Sparse matrix construction with id<->index mappings
//! - **knn**: Brute-force cosine nearest-neighbor search between movies
//! - **recommend**: Single-seed and multi-seed recommendation queries
//! - **popular**: Popularity fallback ranking
//! - **catalog**: Movie lookups and the outbound `MovieInfo` record
//! - **error**: Error types for query failures
//!
//! Every entry point takes the current ratings/movies tables as explicit
//! input and rebuilds the matrix from scratch: no model state survives a
//! call, so results always reflect the snapshot passed in. I/O and
//! persistence are the caller's responsibility.
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{Recommender, popular_movies};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let recommender = Recommender::new();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! match recommender.recommend(&ratings, &movies, user_id, 5, 20, &mut rng)? {
//!     Some(picks) => println!("{} recommendations", picks.len()),
//!     None => println!("no history (or capacity exceeded) for user {user_id}"),
//! }
//!
//! let fallback = popular_movies(&ratings, &movies);
//! ```

// Public modules
pub mod catalog;
pub mod error;
pub mod knn;
pub mod matrix;
pub mod popular;
pub mod recommend;

// Re-export commonly used items for convenience
pub use catalog::{Catalog, MovieInfo};
pub use error::{EngineError, Result};
pub use knn::{cosine_distance, find_similar};
pub use matrix::RatingMatrix;
pub use popular::{POPULAR_COUNT, popular_movies};
pub use recommend::{
    DEFAULT_RECOMMEND_K, DEFAULT_RECOMMEND_NUM, DEFAULT_SIMILAR_K, Recommender,
};
