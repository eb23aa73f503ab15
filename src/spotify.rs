use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::rate_limit::RateLimiter;

// ---------------------------------------------------------------------------
// Spotify API types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ArtistSearchResponse {
    artists: ArtistSearchPage,
}

#[derive(Debug, Deserialize)]
struct ArtistSearchPage {
    items: Vec<ArtistMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistMatch {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ArtistDetail {
    pub id: String,
    pub name: String,
    pub followers: Followers,
    pub popularity: i64,
    pub genres: Vec<String>,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
pub struct Followers {
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Deserialize)]
struct TopTracksResponse {
    tracks: Vec<TopTrack>,
}

#[derive(Debug, Deserialize)]
pub struct TopTrack {
    pub id: String,
    pub name: String,
    pub popularity: i64,
    pub album: TrackAlbum,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
pub struct TrackAlbum {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlbumsResponse {
    items: Vec<Album>,
}

#[derive(Debug, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub album_type: String,
    pub release_date: Option<String>,
    pub total_tracks: i64,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct RelatedArtistsResponse {
    artists: Vec<ArtistMatch>,
}

// ---------------------------------------------------------------------------
// Catalog API boundary
// ---------------------------------------------------------------------------

/// The remote catalog surface the fetch loop depends on. The production
/// implementation talks to the Spotify Web API; tests substitute a stub.
#[async_trait]
pub trait CatalogApi {
    async fn search_artist(&mut self, name: &str) -> Result<Option<ArtistMatch>, String>;
    async fn artist_detail(&mut self, artist_id: &str) -> Result<ArtistDetail, String>;
    async fn top_tracks(&mut self, artist_id: &str) -> Result<Vec<TopTrack>, String>;
    async fn albums(&mut self, artist_id: &str) -> Result<Vec<Album>, String>;
    async fn related_artists(&mut self, artist_id: &str) -> Result<Vec<ArtistMatch>, String>;
}

// ---------------------------------------------------------------------------
// Spotify client
// ---------------------------------------------------------------------------

const ACCOUNTS_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";

pub struct SpotifyClient {
    http: Client,
    access_token: String,
    limiter: RateLimiter,
}

impl SpotifyClient {
    /// Authenticate with the client-credentials flow. A failure here is a
    /// setup failure: the caller aborts the whole run.
    pub async fn connect(
        client_id: &str,
        client_secret: &str,
        delay: Duration,
    ) -> Result<Self, String> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        let resp = http
            .post(ACCOUNTS_TOKEN_URL)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| format!("Token request failed: {}", e))?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Err(format!("Token request returned HTTP {}", status));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| format!("Token parse error: {}", e))?;

        Ok(Self {
            http,
            access_token: token.access_token,
            limiter: RateLimiter::new(delay),
        })
    }

    async fn get(&mut self, url: &str) -> Result<String, String> {
        self.limiter.wait().await;

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = resp.status().as_u16();
        if status != 200 {
            return Err(format!("HTTP {} for {}", status, url));
        }

        resp.text()
            .await
            .map_err(|e| format!("Read body failed: {}", e))
    }
}

#[async_trait]
impl CatalogApi for SpotifyClient {
    async fn search_artist(&mut self, name: &str) -> Result<Option<ArtistMatch>, String> {
        let query = format!("artist:{}", name);
        let url = format!(
            "{}/search?q={}&type=artist&limit=1",
            API_BASE,
            urlencoding::encode(&query)
        );
        let body = self.get(&url).await?;
        let result: ArtistSearchResponse =
            serde_json::from_str(&body).map_err(|e| format!("Parse error: {}", e))?;
        Ok(result.artists.items.into_iter().next())
    }

    async fn artist_detail(&mut self, artist_id: &str) -> Result<ArtistDetail, String> {
        let url = format!("{}/artists/{}", API_BASE, artist_id);
        let body = self.get(&url).await?;
        serde_json::from_str(&body).map_err(|e| format!("Parse error: {}", e))
    }

    async fn top_tracks(&mut self, artist_id: &str) -> Result<Vec<TopTrack>, String> {
        let url = format!("{}/artists/{}/top-tracks?market=US", API_BASE, artist_id);
        let body = self.get(&url).await?;
        let result: TopTracksResponse =
            serde_json::from_str(&body).map_err(|e| format!("Parse error: {}", e))?;
        Ok(result.tracks)
    }

    async fn albums(&mut self, artist_id: &str) -> Result<Vec<Album>, String> {
        // One bounded page of album-type releases; no pagination.
        let url = format!(
            "{}/artists/{}/albums?include_groups=album&limit=50",
            API_BASE, artist_id
        );
        let body = self.get(&url).await?;
        let result: AlbumsResponse =
            serde_json::from_str(&body).map_err(|e| format!("Parse error: {}", e))?;
        Ok(result.items)
    }

    async fn related_artists(&mut self, artist_id: &str) -> Result<Vec<ArtistMatch>, String> {
        let url = format!("{}/artists/{}/related-artists", API_BASE, artist_id);
        let body = self.get(&url).await?;
        let result: RelatedArtistsResponse =
            serde_json::from_str(&body).map_err(|e| format!("Parse error: {}", e))?;
        Ok(result.artists)
    }
}
