//! # Dataset Crate
//!
//! Loading and cleaning of the raw rating tables.
//!
//! ## Main Components
//!
//! - **types**: Raw CSV rows and the canonical domain types (User, Movie, Rating)
//! - **parser**: CSV readers/writers for the tables
//! - **clean**: The data cleaner that normalizes raw rows into the canonical schema
//! - **error**: Error types for loading and writing
//!
//! ## Example Usage
//!
//! ```ignore
//! use dataset::{clean, load_raw_movies, load_raw_ratings};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use std::path::Path;
//!
//! let raw_ratings = load_raw_ratings(Path::new("data/ratings.csv"))?;
//! let raw_movies = load_raw_movies(Path::new("data/movies.csv"))?;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let tables = clean(&raw_ratings, &raw_movies, &mut rng);
//!
//! println!(
//!     "{} users, {} movies, {} ratings",
//!     tables.users.len(),
//!     tables.movies.len(),
//!     tables.ratings.len()
//! );
//! ```

// Public modules
pub mod clean;
pub mod error;
pub mod parser;
pub mod types;

// Re-export commonly used items for convenience
pub use clean::{CleanTables, DEFAULT_PASSWORD, NAME_POOL, clean, hash_password, split_title_year};
pub use error::{DatasetError, Result};
pub use parser::{load_raw_movies, load_raw_ratings, write_table};
pub use types::{Movie, MovieId, Rating, RatingId, RawMovie, RawRating, User, UserId};
