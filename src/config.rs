use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Config from .env
// ---------------------------------------------------------------------------

pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub database_url: String,
    pub api_delay_ms: u64,
}

/// Load configuration from the environment, seeding it from a dotenv file
/// first. A missing required variable is a setup failure; the caller aborts
/// the run.
pub fn load_config(env_file: &Option<PathBuf>) -> Result<Config, String> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .map_err(|e| format!("Cannot read env file {}: {}", path.display(), e))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    let client_id = std::env::var("SPOTIFY_CLIENT_ID")
        .map_err(|_| "SPOTIFY_CLIENT_ID not set".to_string())?;
    let client_secret = std::env::var("SPOTIFY_CLIENT_SECRET")
        .map_err(|_| "SPOTIFY_CLIENT_SECRET not set".to_string())?;
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL not set".to_string())?;

    let api_delay_ms = match std::env::var("SPOTIFY_API_DELAY_MS") {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("SPOTIFY_API_DELAY_MS is not a number: {}", raw))?,
        Err(_) => 500,
    };

    Ok(Config {
        client_id,
        client_secret,
        database_url,
        api_delay_ms,
    })
}
