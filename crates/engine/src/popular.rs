//! Popularity fallback: top movies by rating-row count.
//!
//! User-independent, so it serves visitors with no rating history. Counts
//! rating rows, not distinct raters, and duplicate rows count each time.

use crate::catalog::{Catalog, MovieInfo};
use dataset::{Movie, MovieId, Rating};
use std::collections::HashMap;
use tracing::instrument;

/// How many movies the popularity ranking returns at most
pub const POPULAR_COUNT: usize = 10;

/// The `min(10, distinct rated movies)` most-rated movies, by descending
/// rating-row count; equal counts order by ascending movie id. Rated ids
/// missing from the catalog are skipped.
#[instrument(skip(ratings, movies), fields(n_ratings = ratings.len()))]
pub fn popular_movies(ratings: &[Rating], movies: &[Movie]) -> Vec<MovieInfo> {
    let mut counts: HashMap<MovieId, u32> = HashMap::new();
    for rating in ratings {
        *counts.entry(rating.movie_id).or_insert(0) += 1;
    }

    let mut ranked: Vec<(MovieId, u32)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let catalog = Catalog::new(movies);
    ranked
        .into_iter()
        .take(POPULAR_COUNT)
        .filter_map(|(id, _)| catalog.info(id))
        .collect()
}
