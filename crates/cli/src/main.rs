use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dataset::{CleanTables, clean, load_raw_movies, load_raw_ratings, write_table};
use engine::{
    DEFAULT_RECOMMEND_K, DEFAULT_RECOMMEND_NUM, DEFAULT_SIMILAR_K, MovieInfo, Recommender,
    popular_movies,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;

/// CineMatch - item-based collaborative filtering movie recommender
#[derive(Parser)]
#[command(name = "cinematch")]
#[command(about = "Movie recommendations from a sparse rating matrix", long_about = None)]
struct Cli {
    /// Path to the raw ratings CSV (userId,movieId,rating,timestamp)
    #[arg(long, default_value = "data/ratings.csv")]
    ratings: PathBuf,

    /// Path to the raw movies CSV (movieId,title,genres)
    #[arg(long, default_value = "data/movies.csv")]
    movies: PathBuf,

    /// Seed for the sampling rng; omit for a fresh seed each run
    #[arg(long)]
    seed: Option<u64>,

    /// Emit results as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw tables and write users/movies/ratings CSVs
    Clean {
        /// Directory to write the cleaned tables into
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Movies similar to one seed movie, minus what the user has rated
    Similar {
        /// User whose rated movies are filtered out
        #[arg(long)]
        user_id: u32,

        /// Seed movie to search around
        #[arg(long)]
        movie_id: u32,

        /// Number of neighbors to request
        #[arg(long, default_value_t = DEFAULT_SIMILAR_K)]
        k: usize,
    },

    /// Personalized recommendations sampled from the user's taste profile
    Recommend {
        /// User to recommend for
        #[arg(long)]
        user_id: u32,

        /// Neighbors fetched per sampled seed movie
        #[arg(long, default_value_t = DEFAULT_RECOMMEND_K)]
        k: usize,

        /// Number of recommendations to accumulate
        #[arg(long, default_value_t = DEFAULT_RECOMMEND_NUM)]
        num: usize,
    },

    /// Most-rated movies, independent of any user
    Popular,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // Load and clean the raw tables; every query works off this snapshot
    let start = Instant::now();
    let raw_ratings = load_raw_ratings(&cli.ratings)
        .with_context(|| format!("Failed to load ratings from {}", cli.ratings.display()))?;
    let raw_movies = load_raw_movies(&cli.movies)
        .with_context(|| format!("Failed to load movies from {}", cli.movies.display()))?;
    let tables = clean(&raw_ratings, &raw_movies, &mut rng);
    eprintln!(
        "{} Loaded {} ratings / {} movies / {} users in {:?}",
        "✓".green(),
        tables.ratings.len(),
        tables.movies.len(),
        tables.users.len(),
        start.elapsed()
    );

    match cli.command {
        Commands::Clean { out_dir } => handle_clean(&tables, &out_dir),
        Commands::Similar {
            user_id,
            movie_id,
            k,
        } => handle_similar(&tables, user_id, movie_id, k, cli.json),
        Commands::Recommend { user_id, k, num } => {
            handle_recommend(&tables, user_id, k, num, &mut rng, cli.json)
        }
        Commands::Popular => handle_popular(&tables, cli.json),
    }
}

/// Handle the 'clean' command
fn handle_clean(tables: &CleanTables, out_dir: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    write_table(&out_dir.join("users.csv"), &tables.users)?;
    write_table(&out_dir.join("movies.csv"), &tables.movies)?;
    write_table(&out_dir.join("ratings.csv"), &tables.ratings)?;

    println!(
        "{} Wrote cleaned tables to {}",
        "✓".green(),
        out_dir.display()
    );
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(
    tables: &CleanTables,
    user_id: u32,
    movie_id: u32,
    k: usize,
    json: bool,
) -> Result<()> {
    let recommender = Recommender::new();
    let result = recommender.similar_movie(&tables.ratings, &tables.movies, user_id, movie_id, k)?;

    let Some((base, recommendations)) = result else {
        return Err(anyhow!(
            "Number to recommend exceeds capacity, try to recommend less."
        ));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Because you looked at {} ({}):",
            base.title,
            format_year(base.year)
        )
        .bold()
        .blue()
    );
    print_movie_list(&recommendations);
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    tables: &CleanTables,
    user_id: u32,
    k: usize,
    num: usize,
    rng: &mut StdRng,
    json: bool,
) -> Result<()> {
    let recommender = Recommender::new();
    let start = Instant::now();
    let result = recommender.recommend(&tables.ratings, &tables.movies, user_id, k, num, rng)?;

    let Some(recommendations) = result else {
        // Either no history or the request is over capacity; the capacity
        // case requires at least one rating, so check history first.
        let has_history = tables.ratings.iter().any(|r| r.user_id == user_id);
        if !has_history {
            return Err(anyhow!("Input ratings to get recommendations."));
        }
        return Err(anyhow!(
            "Number to recommend exceeds capacity, try to recommend less."
        ));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Picked {} movies for user {} in {:?}:",
            recommendations.len(),
            user_id,
            start.elapsed()
        )
        .bold()
        .blue()
    );
    print_movie_list(&recommendations);
    Ok(())
}

/// Handle the 'popular' command
fn handle_popular(tables: &CleanTables, json: bool) -> Result<()> {
    let popular = popular_movies(&tables.ratings, &tables.movies);

    if json {
        println!("{}", serde_json::to_string_pretty(&popular)?);
        return Ok(());
    }

    println!("{}", "Most rated movies:".bold().blue());
    print_movie_list(&popular);
    Ok(())
}

fn print_movie_list(movies: &[MovieInfo]) {
    for (rank, movie) in movies.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}]",
            (rank + 1).to_string().green(),
            movie.title,
            format_year(movie.year),
            movie.genres
        );
    }
}

fn format_year(year: Option<u16>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "n/a".to_string())
}
