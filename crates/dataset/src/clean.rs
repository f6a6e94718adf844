//! Data cleaning: raw CSV rows -> canonical {users, movies, ratings} tables.
//!
//! ## Steps
//! 1. Split the trailing `(YYYY)` suffix out of every movie title
//! 2. Synthesize a display name for each distinct user id from a fixed pool
//! 3. Assign dense 0-based rating ids in input row order
//! 4. Left-join movie metadata and display names into every rating row
//! 5. Build the users table with sequential usernames and the seeded
//!    default credential
//!
//! The cleaner is pure: it consumes borrowed raw tables and returns new
//! ones. Persisting the result is the caller's job.

use crate::types::{Movie, Rating, RawMovie, RawRating, User, UserId};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Fixed pool display names are drawn from. Draws are independent, so
/// duplicates across users are expected.
pub const NAME_POOL: [&str; 19] = [
    "Liam",
    "Olivia",
    "Noah",
    "Emma",
    "Oliver",
    "Ava",
    "Elijah",
    "Charlotte",
    "William",
    "Sophia",
    "Amelia",
    "Benjamin",
    "Isabella",
    "Lucas",
    "Mia",
    "Henry",
    "Evelyn",
    "Alexander",
    "Harper",
];

/// Default password every synthesized user starts with
pub const DEFAULT_PASSWORD: &str = "password";

/// The canonical tables produced by [`clean`]
#[derive(Debug, Clone)]
pub struct CleanTables {
    pub users: Vec<User>,
    pub movies: Vec<Movie>,
    pub ratings: Vec<Rating>,
}

/// Normalize raw rating and movie rows into the canonical schema.
///
/// The rng drives display-name synthesis only; pass a seeded rng for
/// reproducible tables.
pub fn clean<R: Rng + ?Sized>(
    raw_ratings: &[RawRating],
    raw_movies: &[RawMovie],
    rng: &mut R,
) -> CleanTables {
    // Movies: strip the year suffix out of each title
    let movies: Vec<Movie> = raw_movies
        .iter()
        .map(|raw| {
            let (title, year) = split_title_year(&raw.title);
            Movie {
                movie_id: raw.movie_id,
                title,
                genres: raw.genres.clone(),
                year,
            }
        })
        .collect();

    let movies_by_id: HashMap<_, _> = movies.iter().map(|m| (m.movie_id, m)).collect();

    // One display name per distinct user id. Iterating the sorted id set
    // keeps name assignment reproducible under a seeded rng.
    let user_ids: BTreeSet<UserId> = raw_ratings.iter().map(|r| r.user_id).collect();
    let names: HashMap<UserId, &str> = user_ids
        .iter()
        .map(|&id| (id, NAME_POOL[rng.random_range(0..NAME_POOL.len())]))
        .collect();

    // Ratings: dense positional ids plus the metadata left-join. Unknown
    // movie ids keep empty metadata rather than erroring.
    let ratings: Vec<Rating> = raw_ratings
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let movie = movies_by_id.get(&raw.movie_id);
            Rating {
                rating_id: idx as u64,
                user_id: raw.user_id,
                movie_id: raw.movie_id,
                rating: raw.rating,
                timestamp: raw.timestamp,
                names: names[&raw.user_id].to_string(),
                title: movie.map(|m| m.title.clone()).unwrap_or_default(),
                genres: movie.map(|m| m.genres.clone()).unwrap_or_default(),
                year: movie.and_then(|m| m.year),
            }
        })
        .collect();

    // Users table: sequential usernames in user-id order, one shared
    // seeded credential
    let password_hash = hash_password(DEFAULT_PASSWORD);
    let users: Vec<User> = user_ids
        .iter()
        .enumerate()
        .map(|(pos, &id)| User {
            id,
            names: names[&id].to_string(),
            username: (pos + 1).to_string(),
            password_hash: password_hash.clone(),
        })
        .collect();

    debug!(
        users = users.len(),
        movies = movies.len(),
        ratings = ratings.len(),
        "cleaned raw tables"
    );

    CleanTables {
        users,
        movies,
        ratings,
    }
}

/// SHA-256 hex digest of a password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Split a trailing `" (YYYY)"` suffix off a movie title.
///
/// `"Toy Story (1995)"` -> `("Toy Story", Some(1995))`. Titles without the
/// suffix come back unmodified with no year.
pub fn split_title_year(raw: &str) -> (String, Option<u16>) {
    let bytes = raw.as_bytes();
    // Expect: <title> SPACE '(' d d d d ')'
    if bytes.len() >= 7
        && bytes[bytes.len() - 1] == b')'
        && bytes[bytes.len() - 6] == b'('
        && bytes[bytes.len() - 7] == b' '
        && bytes[bytes.len() - 5..bytes.len() - 1]
            .iter()
            .all(u8::is_ascii_digit)
    {
        let title = raw[..raw.len() - 7].to_string();
        let year = raw[raw.len() - 5..raw.len() - 1].parse().ok();
        return (title, year);
    }
    (raw.to_string(), None)
}
