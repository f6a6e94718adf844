//! Sparse movie x user rating matrix.
//!
//! Built fresh from a ratings snapshot on every query and discarded
//! afterwards; the id<->index mappings are only valid against the snapshot
//! they were built from. Rows are movies, columns are users, both assigned
//! dense indices over the sorted distinct id sets.
//!
//! Duplicate (user, movie) pairs are resolved keep-latest: the row with the
//! greatest (timestamp, rating_id) wins. Values are never summed.

use crate::error::{EngineError, Result};
use dataset::{MovieId, Rating, RatingId, UserId};
use std::collections::{BTreeSet, HashMap};

/// Sparse rating matrix plus the id<->index bijections for one snapshot
#[derive(Debug)]
pub struct RatingMatrix {
    /// Per-movie row: (user column, rating value), sorted by column
    rows: Vec<Vec<(u32, f32)>>,
    /// Row index -> movie id
    movie_ids: Vec<MovieId>,
    /// Column index -> user id
    user_ids: Vec<UserId>,
    movie_rows: HashMap<MovieId, usize>,
    user_cols: HashMap<UserId, usize>,
}

impl RatingMatrix {
    /// Build the matrix from a ratings snapshot
    pub fn build(ratings: &[Rating]) -> Self {
        let movie_set: BTreeSet<MovieId> = ratings.iter().map(|r| r.movie_id).collect();
        let user_set: BTreeSet<UserId> = ratings.iter().map(|r| r.user_id).collect();

        let movie_ids: Vec<MovieId> = movie_set.into_iter().collect();
        let user_ids: Vec<UserId> = user_set.into_iter().collect();

        let movie_rows: HashMap<MovieId, usize> =
            movie_ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let user_cols: HashMap<UserId, usize> =
            user_ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        // Keep-latest resolution for duplicate (movie, user) cells
        let mut cells: HashMap<(usize, usize), (i64, RatingId, f32)> = HashMap::new();
        for rating in ratings {
            let key = (movie_rows[&rating.movie_id], user_cols[&rating.user_id]);
            let candidate = (rating.timestamp, rating.rating_id, rating.rating);
            match cells.get(&key) {
                Some(&(ts, id, _)) if (ts, id) >= (rating.timestamp, rating.rating_id) => {}
                _ => {
                    cells.insert(key, candidate);
                }
            }
        }

        let mut rows: Vec<Vec<(u32, f32)>> = vec![Vec::new(); movie_ids.len()];
        for ((row, col), (_, _, value)) in cells {
            rows[row].push((col as u32, value));
        }
        for row in &mut rows {
            row.sort_unstable_by_key(|&(col, _)| col);
        }

        Self {
            rows,
            movie_ids,
            user_ids,
            movie_rows,
            user_cols,
        }
    }

    /// (distinct movies, distinct users) in the snapshot
    pub fn shape(&self) -> (usize, usize) {
        (self.movie_ids.len(), self.user_ids.len())
    }

    /// Number of stored (movie, user) cells
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    pub fn movie_count(&self) -> usize {
        self.movie_ids.len()
    }

    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    /// Resolve a movie id to its row index
    pub fn movie_row(&self, id: MovieId) -> Result<usize> {
        self.movie_rows
            .get(&id)
            .copied()
            .ok_or(EngineError::UnknownId {
                entity: "movie",
                id: id as u64,
            })
    }

    /// Resolve a user id to its column index
    pub fn user_col(&self, id: UserId) -> Result<usize> {
        self.user_cols
            .get(&id)
            .copied()
            .ok_or(EngineError::UnknownId {
                entity: "user",
                id: id as u64,
            })
    }

    /// Inverse mapping: row index -> movie id
    pub fn movie_id(&self, row: usize) -> Result<MovieId> {
        self.movie_ids
            .get(row)
            .copied()
            .ok_or(EngineError::UnknownId {
                entity: "movie row",
                id: row as u64,
            })
    }

    /// Inverse mapping: column index -> user id
    pub fn user_id(&self, col: usize) -> Result<UserId> {
        self.user_ids
            .get(col)
            .copied()
            .ok_or(EngineError::UnknownId {
                entity: "user column",
                id: col as u64,
            })
    }

    /// Sparse row vector for a movie, sorted by user column
    pub fn row(&self, row: usize) -> &[(u32, f32)] {
        &self.rows[row]
    }

    /// All movie ids in row order
    pub fn movie_ids(&self) -> &[MovieId] {
        &self.movie_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(rating_id: u64, user_id: UserId, movie_id: MovieId, value: f32, ts: i64) -> Rating {
        Rating {
            rating_id,
            user_id,
            movie_id,
            rating: value,
            timestamp: ts,
            names: String::new(),
            title: String::new(),
            genres: String::new(),
            year: None,
        }
    }

    #[test]
    fn test_shape_and_nnz() {
        let ratings = vec![
            rating(0, 1, 10, 5.0, 100),
            rating(1, 1, 20, 4.5, 101),
            rating(2, 2, 10, 3.0, 102),
            rating(3, 2, 30, 5.0, 103),
        ];
        let matrix = RatingMatrix::build(&ratings);

        // 3 distinct movies x 2 distinct users, one cell per rating row
        assert_eq!(matrix.shape(), (3, 2));
        assert_eq!(matrix.nnz(), 4);
    }

    #[test]
    fn test_dense_indices_in_sorted_id_order() {
        let ratings = vec![
            rating(0, 9, 30, 1.0, 0),
            rating(1, 3, 20, 2.0, 0),
            rating(2, 5, 10, 3.0, 0),
        ];
        let matrix = RatingMatrix::build(&ratings);

        assert_eq!(matrix.movie_row(10).unwrap(), 0);
        assert_eq!(matrix.movie_row(20).unwrap(), 1);
        assert_eq!(matrix.movie_row(30).unwrap(), 2);
        assert_eq!(matrix.user_col(3).unwrap(), 0);
        assert_eq!(matrix.user_col(5).unwrap(), 1);
        assert_eq!(matrix.user_col(9).unwrap(), 2);

        // Inverse mappings round-trip
        assert_eq!(matrix.movie_id(1).unwrap(), 20);
        assert_eq!(matrix.user_id(2).unwrap(), 9);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let ratings = vec![rating(0, 1, 10, 5.0, 0)];
        let matrix = RatingMatrix::build(&ratings);

        assert_eq!(
            matrix.movie_row(999),
            Err(EngineError::UnknownId {
                entity: "movie",
                id: 999
            })
        );
        assert!(matrix.user_col(999).is_err());
        assert!(matrix.movie_id(5).is_err());
    }

    #[test]
    fn test_duplicate_pair_keeps_latest_by_timestamp() {
        let ratings = vec![
            rating(0, 1, 10, 2.0, 100),
            rating(1, 1, 10, 4.5, 200),
            rating(2, 1, 10, 1.0, 150),
        ];
        let matrix = RatingMatrix::build(&ratings);

        // One stored cell, holding the latest value. Never the sum.
        assert_eq!(matrix.nnz(), 1);
        let row = matrix.row(matrix.movie_row(10).unwrap());
        assert_eq!(row, &[(0, 4.5)]);
    }

    #[test]
    fn test_duplicate_pair_timestamp_tie_breaks_on_rating_id() {
        let ratings = vec![
            rating(5, 1, 10, 2.0, 100),
            rating(9, 1, 10, 3.5, 100),
        ];
        let matrix = RatingMatrix::build(&ratings);

        let row = matrix.row(matrix.movie_row(10).unwrap());
        assert_eq!(row, &[(0, 3.5)]);
    }

    #[test]
    fn test_rows_sorted_by_column() {
        let ratings = vec![
            rating(0, 9, 10, 1.0, 0),
            rating(1, 1, 10, 2.0, 0),
            rating(2, 5, 10, 3.0, 0),
        ];
        let matrix = RatingMatrix::build(&ratings);

        let row = matrix.row(0);
        assert_eq!(row, &[(0, 2.0), (1, 3.0), (2, 1.0)]);
    }

    #[test]
    fn test_empty_snapshot() {
        let matrix = RatingMatrix::build(&[]);
        assert_eq!(matrix.shape(), (0, 0));
        assert_eq!(matrix.nnz(), 0);
    }
}
