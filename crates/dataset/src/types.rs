//! Canonical domain types for the rating dataset.
//!
//! Two layers live here:
//! - raw rows as they come off the inbound CSV tables (`RawRating`, `RawMovie`)
//! - the cleaned schema the engine consumes (`User`, `Movie`, `Rating`)
//!
//! The cleaned `Rating` row carries denormalized movie/user metadata the way
//! the persisted ratings table does, so a ratings snapshot is self-describing.

use serde::{Deserialize, Serialize};

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie (primary key of the catalog)
pub type MovieId = u32;

/// Dense positional identifier assigned to a rating row by the cleaner
pub type RatingId = u64;

/// A rating row as read from the raw ratings CSV.
///
/// Header format: `userId,movieId,rating,timestamp`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RawRating {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub rating: f32,
    pub timestamp: i64,
}

/// A movie row as read from the raw movies CSV.
///
/// Header format: `movieId,title,genres`. The title usually embeds the
/// release year: `"Toy Story (1995)"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMovie {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    pub genres: String,
}

/// A synthesized user account.
///
/// Display names are drawn from a fixed pool, usernames are assigned
/// sequentially in user-id order, and every user starts with the same
/// seeded default credential. None of this is a security model; the
/// engine only ever looks at `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub names: String,
    pub username: String,
    pub password_hash: String,
}

/// A catalog movie after cleaning.
///
/// `title` has any trailing `" (YYYY)"` suffix stripped; `year` is `None`
/// when the raw title carried no such suffix. `genres` keeps the raw
/// pipe-separated tag string (the catalog contains tags like
/// `"(no genres listed)"` that an enum could not represent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    pub genres: String,
    pub year: Option<u16>,
}

/// A cleaned rating row.
///
/// `rating_id` is the only key: the same (user, movie) pair may appear in
/// multiple rows. The trailing fields are copies of the movie metadata and
/// the rater's display name taken at write time; they stay empty/`None`
/// for ratings that reference a movie id missing from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "ratingId")]
    pub rating_id: RatingId,
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub rating: f32,
    pub timestamp: i64,
    pub names: String,
    pub title: String,
    pub genres: String,
    pub year: Option<u16>,
}
