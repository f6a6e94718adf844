//! Error types for the recommendation engine.
//!
//! Only conditions that must fail loudly live here. Recoverable
//! "nothing to recommend" outcomes (unknown user, capacity exceeded) are
//! `None` sentinels on the query functions instead, so callers can turn
//! them into user-facing messages without unwinding.

use dataset::MovieId;
use thiserror::Error;

/// Errors that can occur while answering a recommendation query
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// An id was resolved against a matrix built from a different
    /// ratings snapshot
    #[error("Unknown {entity} id {id} for this matrix build")]
    UnknownId { entity: &'static str, id: u64 },

    /// The seed movie has no rated entries in the current snapshot
    #[error("Movie {movie_id} has no ratings to compare against")]
    UnknownMovie { movie_id: MovieId },

    /// A query parameter fell outside its valid range
    #[error("Parameter {name}={value} outside valid range [1, {max}]")]
    InvalidParameter {
        name: &'static str,
        value: usize,
        max: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EngineError>;
