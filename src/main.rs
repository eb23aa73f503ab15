use clap::Parser;
use colored::*;
use sqlx::postgres::PgPoolOptions;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use spotify_sync::config::load_config;
use spotify_sync::fetch::fetch_all;
use spotify_sync::records::tables;
use spotify_sync::spotify::SpotifyClient;
use spotify_sync::upsert::upsert;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "spotify-sync",
    about = "Fetch Spotify catalog metadata and upsert it into PostgreSQL"
)]
struct Args {
    /// Load configuration from this env file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

/// The artists this job fetches on every run.
const ARTISTS: &[&str] = &[
    "The Weeknd",
    "Drake",
    "Ed Sheeran",
    "Shawn Mendes",
    "Billie Eilish",
    "Sai Abhyankkar",
    "Anirudh Ravichander",
    "Hanumankind",
    "A.R.Rahman",
    "Arijith Singh",
    "Shreya Ghoshal",
    "Taylor Swift",
];

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    let args = Args::parse();

    println!("Spotify Catalog Sync");
    println!("====================");
    println!();

    let config = match load_config(&args.env_file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let error_log = Mutex::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("errors.log")
            .expect("Cannot open errors.log"),
    );

    println!("Connecting to database...");
    let pool = match PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
    {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    println!("  {} Connected", "✓".green());

    println!("Authenticating with Spotify...");
    let mut client = match SpotifyClient::connect(
        &config.client_id,
        &config.client_secret,
        Duration::from_millis(config.api_delay_ms),
    )
    .await
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to authenticate with Spotify: {}", e);
            std::process::exit(1);
        }
    };
    println!("  {} Authenticated", "✓".green());

    let start = Instant::now();

    // Phase 1: fetch everything into memory.
    let report = fetch_all(&mut client, ARTISTS).await;

    for (name, reason) in &report.skipped {
        if let Ok(mut f) = error_log.lock() {
            writeln!(f, "[FETCH] Skipped artist '{}': {}", name, reason).ok();
        }
    }

    // Phase 2: drain the collections into PostgreSQL.
    println!();
    println!(
        "{}",
        "Writing collected data to PostgreSQL".white().bold()
    );

    let profiles = upsert(&pool, &tables::ARTIST_PROFILES, &report.collections.profiles).await;
    let tracks = upsert(&pool, &tables::TOP_TRACKS, &report.collections.tracks).await;
    let albums = upsert(&pool, &tables::ALBUMS, &report.collections.albums).await;

    let results = [
        (tables::ARTIST_PROFILES.table, &profiles),
        (tables::TOP_TRACKS.table, &tracks),
        (tables::ALBUMS.table, &albums),
    ];

    for (table, outcome) in &results {
        for (key, error) in &outcome.failures {
            if let Ok(mut f) = error_log.lock() {
                writeln!(f, "[WRITE] {}: {} ({})", table, error, key).ok();
            }
        }
    }

    // Summary.
    let elapsed = start.elapsed();
    println!();
    println!("{}", "═".repeat(60).bright_black());
    println!();
    println!(
        "{} {:.1}s",
        "Completed in:".white().bold(),
        elapsed.as_secs_f64()
    );
    println!(
        "  {} {} of {}",
        "Artists fetched:".white(),
        ARTISTS.len() - report.skipped.len(),
        ARTISTS.len()
    );
    for (table, outcome) in &results {
        let failed = if outcome.failed > 0 {
            outcome.failed.to_string().red().to_string()
        } else {
            outcome.failed.to_string()
        };
        println!(
            "  {:<24} {} attempted, {} succeeded, {} failed",
            table,
            outcome.attempted,
            outcome.succeeded.to_string().green(),
            failed
        );
    }

    if !report.skipped.is_empty() {
        println!();
        println!("{}", "Skipped Artists:".red().bold());
        for (name, reason) in &report.skipped {
            println!(
                "  {} {} - {}",
                "✗".red(),
                name.bright_white(),
                reason.bright_black()
            );
        }
    }
}
