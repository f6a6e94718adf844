//! Brute-force cosine k-nearest-neighbor search over movie row vectors.
//!
//! ## Algorithm
//! 1. Rebuild the sparse matrix from the full ratings snapshot
//! 2. Compute the cosine distance from the target row to every movie row
//!    (rayon sweep)
//! 3. Sort by ascending distance, ascending movie id on ties
//! 4. Drop the target itself and keep the first k ids
//!
//! Step 4 relies on the target being its own nearest neighbor, which is why
//! the sweep conceptually asks for k+1 rows.

use crate::error::{EngineError, Result};
use crate::matrix::RatingMatrix;
use dataset::{MovieId, Rating};
use rayon::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Cosine distance between two sparse vectors sorted by column.
///
/// Returns `1 - dot(a, b) / (|a| * |b|)`; a zero-norm vector is at distance
/// 1 from everything.
pub fn cosine_distance(a: &[(u32, f32)], b: &[(u32, f32)]) -> f32 {
    let norm_a: f64 = a.iter().map(|&(_, v)| (v as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|&(_, v)| (v as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    // Merge join over the sorted columns
    let mut dot = 0.0f64;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a[i].1 as f64 * b[j].1 as f64;
                i += 1;
                j += 1;
            }
        }
    }

    (1.0 - dot / (norm_a * norm_b)) as f32
}

/// Find the k movies most similar to `target` under cosine distance.
///
/// Rebuilds the matrix from the snapshot, so results always reflect the
/// ratings passed in. The returned ids are ordered by ascending distance
/// and never include the target itself.
#[instrument(skip(ratings), fields(n_ratings = ratings.len()))]
pub fn find_similar(ratings: &[Rating], target: MovieId, k: usize) -> Result<Vec<MovieId>> {
    let matrix = RatingMatrix::build(ratings);
    let target_row = matrix
        .movie_row(target)
        .map_err(|_| EngineError::UnknownMovie { movie_id: target })?;

    let movie_count = matrix.movie_count();
    if k < 1 || k > movie_count - 1 {
        return Err(EngineError::InvalidParameter {
            name: "k",
            value: k,
            max: movie_count.saturating_sub(1),
        });
    }

    let target_vec = matrix.row(target_row);
    let mut scored: Vec<(f32, MovieId)> = (0..movie_count)
        .into_par_iter()
        .map(|row| {
            let distance = cosine_distance(target_vec, matrix.row(row));
            (distance, matrix.movie_ids()[row])
        })
        .collect();

    // Ascending distance; ascending movie id keeps equal distances stable
    scored.sort_unstable_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });

    let neighbors: Vec<MovieId> = scored
        .into_iter()
        .map(|(_, id)| id)
        .filter(|&id| id != target)
        .take(k)
        .collect();

    debug!(target, k, found = neighbors.len(), "similarity search complete");
    Ok(neighbors)
}
