//! The two recommendation query modes.
//!
//! Both run on top of the similarity search and filter against the movies
//! the user has already rated. Recoverable "nothing to recommend"
//! outcomes are `None` sentinels:
//!
//! - `similar_movie` -> `Ok(None)` when `k` exceeds the number of movies
//!   the user hasn't rated yet
//! - `recommend` -> `Ok(None)` when the user has no rating history, or
//!   when `k`/`num` exceed that same capacity
//!
//! Everything else (unknown seed movie, out-of-range parameters) is an
//! `EngineError`.

use crate::catalog::{Catalog, MovieInfo};
use crate::error::{EngineError, Result};
use crate::knn::find_similar;
use dataset::{Movie, MovieId, Rating, UserId};
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Default neighbor count for the single-seed mode
pub const DEFAULT_SIMILAR_K: usize = 10;
/// Default per-seed neighbor count for the multi-seed mode
pub const DEFAULT_RECOMMEND_K: usize = 5;
/// Default result-list size for the multi-seed mode
pub const DEFAULT_RECOMMEND_NUM: usize = 20;

/// What the sampler needs to know about one user, gathered once per query
struct TasteProfile {
    /// Every distinct movie the user has rated
    rated: HashSet<MovieId>,
    /// Rated movies with rating >= (user's max rating - 0.5), sorted for
    /// reproducible seed draws
    liked: Vec<MovieId>,
}

impl TasteProfile {
    /// Returns `None` when the user has no rating rows
    fn build(ratings: &[Rating], user_id: UserId) -> Option<Self> {
        let user_ratings: Vec<&Rating> =
            ratings.iter().filter(|r| r.user_id == user_id).collect();
        if user_ratings.is_empty() {
            return None;
        }

        let rate_max = user_ratings
            .iter()
            .map(|r| r.rating)
            .fold(f32::MIN, f32::max);

        let rated: HashSet<MovieId> = user_ratings.iter().map(|r| r.movie_id).collect();
        let mut liked: Vec<MovieId> = user_ratings
            .iter()
            .filter(|r| r.rating >= rate_max - 0.5)
            .map(|r| r.movie_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        liked.sort_unstable();

        Some(Self { rated, liked })
    }
}

/// Recommendation queries over a per-call ratings snapshot.
///
/// Holds no model state; the stall budget is the only knob. Every call
/// rebuilds the matrix from the snapshot it is handed.
#[derive(Debug, Clone)]
pub struct Recommender {
    /// Consecutive zero-yield seed draws allowed before the sampling loop
    /// gives up and returns a partial result
    stall_budget: u32,
}

impl Recommender {
    pub fn new() -> Self {
        Self { stall_budget: 10 }
    }

    /// Configure the sampling stall budget (default: 10)
    pub fn with_stall_budget(mut self, budget: u32) -> Self {
        self.stall_budget = budget;
        self
    }

    /// Single-seed mode: the k movies most similar to `movie_id` that
    /// `user_id` hasn't rated.
    ///
    /// Returns the base movie's record plus the filtered recommendations;
    /// the list may be shorter than `k` after filtering. `Ok(None)` when
    /// fewer than `k` unrated movies exist.
    #[instrument(skip(self, ratings, movies), fields(n_ratings = ratings.len()))]
    pub fn similar_movie(
        &self,
        ratings: &[Rating],
        movies: &[Movie],
        user_id: UserId,
        movie_id: MovieId,
        k: usize,
    ) -> Result<Option<(MovieInfo, Vec<MovieInfo>)>> {
        let catalog = Catalog::new(movies);
        let rated: HashSet<MovieId> = ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.movie_id)
            .collect();

        let capacity = catalog.len().saturating_sub(rated.len());
        if k > capacity {
            debug!(k, capacity, "similar_movie over capacity");
            return Ok(None);
        }

        let base = catalog
            .info(movie_id)
            .ok_or(EngineError::UnknownMovie { movie_id })?;

        let recommendations: Vec<MovieInfo> = find_similar(ratings, movie_id, k)?
            .into_iter()
            .filter(|id| !rated.contains(id))
            .filter_map(|id| catalog.info(id))
            .collect();

        Ok(Some((base, recommendations)))
    }

    /// Multi-seed mode: up to `num` recommendations sampled from the
    /// user's full taste profile.
    ///
    /// Repeatedly draws a random seed from the liked set, pulls its k
    /// nearest neighbors, and keeps the ones the user hasn't rated and
    /// that aren't already collected. Stops at `num` results or after
    /// `stall_budget` consecutive draws that add nothing; a partial (even
    /// empty) list is a valid outcome, not an error.
    #[instrument(skip(self, ratings, movies, rng), fields(n_ratings = ratings.len()))]
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        ratings: &[Rating],
        movies: &[Movie],
        user_id: UserId,
        k: usize,
        num: usize,
        rng: &mut R,
    ) -> Result<Option<Vec<MovieInfo>>> {
        let catalog = Catalog::new(movies);

        let Some(profile) = TasteProfile::build(ratings, user_id) else {
            debug!(user_id, "no rating history");
            return Ok(None);
        };

        if k < 1 {
            return Err(EngineError::InvalidParameter {
                name: "k",
                value: k,
                max: catalog.len(),
            });
        }
        if num < 1 {
            return Err(EngineError::InvalidParameter {
                name: "num",
                value: num,
                max: catalog.len(),
            });
        }

        let capacity = catalog.len().saturating_sub(profile.rated.len());
        if k > capacity || num > capacity {
            debug!(k, num, capacity, "recommend over capacity");
            return Ok(None);
        }

        let mut picked: Vec<MovieId> = Vec::with_capacity(num);
        let mut seen: HashSet<MovieId> = HashSet::new();
        let mut stalls = 0u32;

        while picked.len() < num && stalls < self.stall_budget {
            let seed = profile.liked[rng.random_range(0..profile.liked.len())];
            let fresh: Vec<MovieId> = find_similar(ratings, seed, k)?
                .into_iter()
                .filter(|id| !profile.rated.contains(id) && !seen.contains(id))
                .collect();

            if fresh.is_empty() {
                stalls += 1;
                continue;
            }
            stalls = 0;

            for id in fresh {
                seen.insert(id);
                if picked.len() < num {
                    picked.push(id);
                }
            }
        }

        debug!(
            user_id,
            picked = picked.len(),
            stalls,
            "sampling loop finished"
        );

        Ok(Some(
            picked.iter().filter_map(|&id| catalog.info(id)).collect(),
        ))
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rating(rating_id: u64, user_id: u32, movie_id: u32, value: f32) -> Rating {
        Rating {
            rating_id,
            user_id,
            movie_id,
            rating: value,
            timestamp: rating_id as i64,
            names: String::new(),
            title: String::new(),
            genres: String::new(),
            year: None,
        }
    }

    fn movie(id: u32) -> Movie {
        Movie {
            movie_id: id,
            title: format!("Movie {id}"),
            genres: "Drama".to_string(),
            year: Some(2000),
        }
    }

    #[test]
    fn test_taste_profile_liked_set() {
        let ratings = vec![
            rating(0, 1, 10, 5.0),
            rating(1, 1, 20, 4.5),
            rating(2, 1, 30, 2.0),
            rating(3, 2, 40, 5.0),
        ];
        let profile = TasteProfile::build(&ratings, 1).unwrap();

        // Max is 5.0 -> liked threshold is 4.5
        assert_eq!(profile.liked, vec![10, 20]);
        assert_eq!(profile.rated.len(), 3);

        assert!(TasteProfile::build(&ratings, 999).is_none());
    }

    #[test]
    fn test_similar_movie_filters_rated() {
        // User 1 rated 100 and 200; movie 200 is 100's nearest neighbor
        let ratings = vec![
            rating(0, 1, 100, 5.0),
            rating(1, 1, 200, 4.5),
            rating(2, 2, 100, 3.0),
            rating(3, 2, 300, 5.0),
        ];
        let movies: Vec<Movie> = [100, 200, 300, 400, 500].map(movie).to_vec();

        let (base, recs) = Recommender::new()
            .similar_movie(&ratings, &movies, 1, 100, 2)
            .unwrap()
            .unwrap();

        assert_eq!(base.movie_id, 100);
        // 200 is filtered out as already rated; 300 survives
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie_id, 300);
    }

    #[test]
    fn test_similar_movie_capacity_sentinel() {
        let ratings = vec![rating(0, 1, 100, 5.0), rating(1, 2, 200, 4.0)];
        let movies: Vec<Movie> = [100, 200].map(movie).to_vec();

        // capacity = 2 - 1 = 1, so k=2 is over
        let result = Recommender::new()
            .similar_movie(&ratings, &movies, 1, 100, 2)
            .unwrap();
        assert!(result.is_none());

        // k=1 is exactly at capacity
        let result = Recommender::new()
            .similar_movie(&ratings, &movies, 1, 100, 1)
            .unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn test_similar_movie_unknown_seed() {
        let ratings = vec![rating(0, 2, 100, 5.0)];
        let movies: Vec<Movie> = [100, 200].map(movie).to_vec();

        let err = Recommender::new()
            .similar_movie(&ratings, &movies, 1, 200, 1)
            .unwrap_err();
        assert_eq!(err, EngineError::UnknownMovie { movie_id: 200 });
    }

    #[test]
    fn test_recommend_unknown_user_sentinel() {
        let ratings = vec![rating(0, 2, 100, 5.0)];
        let movies: Vec<Movie> = [100, 200].map(movie).to_vec();
        let mut rng = StdRng::seed_from_u64(1);

        let result = Recommender::new()
            .recommend(&ratings, &movies, 1, 1, 1, &mut rng)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_recommend_capacity_sentinel() {
        let ratings = vec![rating(0, 1, 100, 5.0), rating(1, 2, 200, 4.0)];
        let movies: Vec<Movie> = [100, 200].map(movie).to_vec();
        let mut rng = StdRng::seed_from_u64(1);

        // capacity = 1, num = 5 -> sentinel
        let result = Recommender::new()
            .recommend(&ratings, &movies, 1, 1, 5, &mut rng)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_recommend_properties() {
        // Three users with overlapping taste over six movies
        let ratings = vec![
            rating(0, 1, 10, 5.0),
            rating(1, 1, 20, 4.8),
            rating(2, 2, 10, 4.5),
            rating(3, 2, 30, 5.0),
            rating(4, 2, 40, 4.0),
            rating(5, 3, 20, 4.0),
            rating(6, 3, 50, 4.5),
            rating(7, 3, 60, 3.0),
        ];
        let movies: Vec<Movie> = [10, 20, 30, 40, 50, 60, 70, 80].map(movie).to_vec();
        let mut rng = StdRng::seed_from_u64(42);

        let rated: HashSet<MovieId> = [10, 20].into_iter().collect();
        let recs = Recommender::new()
            .recommend(&ratings, &movies, 1, 2, 4, &mut rng)
            .unwrap()
            .unwrap();

        assert!(recs.len() <= 4);
        assert!(!recs.is_empty());

        // No duplicates, nothing the user already rated
        let ids: Vec<MovieId> = recs.iter().map(|r| r.movie_id).collect();
        let distinct: HashSet<MovieId> = ids.iter().copied().collect();
        assert_eq!(distinct.len(), ids.len());
        for id in &ids {
            assert!(!rated.contains(id));
        }
    }

    #[test]
    fn test_recommend_stall_budget_terminates() {
        // User 1 rated every movie that appears in the ratings snapshot,
        // so every neighbor of every liked seed is already rated. The
        // catalog is padded with unrated movies to keep capacity open.
        let ratings = vec![
            rating(0, 1, 10, 5.0),
            rating(1, 1, 20, 5.0),
            rating(2, 1, 30, 5.0),
            rating(3, 2, 10, 4.0),
            rating(4, 2, 20, 3.0),
        ];
        let movies: Vec<Movie> = [10, 20, 30, 40, 50, 60, 70, 80, 90, 95].map(movie).to_vec();
        let mut rng = StdRng::seed_from_u64(7);

        let recs = Recommender::new()
            .with_stall_budget(10)
            .recommend(&ratings, &movies, 1, 2, 5, &mut rng)
            .unwrap()
            .unwrap();

        // Terminates with a partial (here empty) result instead of looping
        assert!(recs.is_empty());
    }

    #[test]
    fn test_recommend_rejects_non_positive_parameters() {
        let ratings = vec![rating(0, 1, 10, 5.0), rating(1, 2, 20, 4.0)];
        let movies: Vec<Movie> = [10, 20, 30].map(movie).to_vec();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(matches!(
            Recommender::new().recommend(&ratings, &movies, 1, 0, 5, &mut rng),
            Err(EngineError::InvalidParameter { name: "k", .. })
        ));
        assert!(matches!(
            Recommender::new().recommend(&ratings, &movies, 1, 1, 0, &mut rng),
            Err(EngineError::InvalidParameter { name: "num", .. })
        ));
    }
}
