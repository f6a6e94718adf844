//! Catalog lookups and the outbound record type.

use dataset::{Movie, MovieId};
use serde::Serialize;
use std::collections::HashMap;

/// Plain movie record returned to callers.
///
/// This is the whole outbound surface of the engine: no scores, no
/// presentation, just the catalog fields for the recommended ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieInfo {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    pub year: Option<u16>,
    pub genres: String,
}

impl From<&Movie> for MovieInfo {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title.clone(),
            year: movie.year,
            genres: movie.genres.clone(),
        }
    }
}

/// Per-query id lookup over a borrowed movies table
pub struct Catalog<'a> {
    by_id: HashMap<MovieId, &'a Movie>,
}

impl<'a> Catalog<'a> {
    pub fn new(movies: &'a [Movie]) -> Self {
        Self {
            by_id: movies.iter().map(|m| (m.movie_id, m)).collect(),
        }
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.by_id.get(&id).copied()
    }

    pub fn info(&self, id: MovieId) -> Option<MovieInfo> {
        self.get(id).map(MovieInfo::from)
    }

    /// Distinct movies in the catalog
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
