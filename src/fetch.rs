use colored::*;

use crate::records::{AlbumRecord, ArtistProfileRecord, TopTrackRecord};
use crate::spotify::CatalogApi;

// ---------------------------------------------------------------------------
// Per-artist staging
// ---------------------------------------------------------------------------

/// Everything fetched for one artist. Staged separately so an artist whose
/// fetch fails halfway contributes zero records to the run collections.
#[derive(Debug)]
pub struct ArtistBundle {
    pub profile: ArtistProfileRecord,
    pub tracks: Vec<TopTrackRecord>,
    pub albums: Vec<AlbumRecord>,
}

/// The three record collections accumulated over the whole run.
#[derive(Debug, Default)]
pub struct Collections {
    pub profiles: Vec<ArtistProfileRecord>,
    pub tracks: Vec<TopTrackRecord>,
    pub albums: Vec<AlbumRecord>,
}

impl Collections {
    fn absorb(&mut self, bundle: ArtistBundle) {
        self.profiles.push(bundle.profile);
        self.tracks.extend(bundle.tracks);
        self.albums.extend(bundle.albums);
    }
}

/// Fetch-phase result: the collections plus the artists that were skipped,
/// with reasons.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub collections: Collections,
    pub skipped: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

/// Resolve one artist name and pull its profile, top tracks, and albums.
/// `Ok(None)` means the name did not resolve. The related-artists call is
/// enrichment only: its result is discarded and its errors are swallowed.
pub async fn fetch_artist<C: CatalogApi + Send>(
    api: &mut C,
    name: &str,
) -> Result<Option<ArtistBundle>, String> {
    let matched = match api.search_artist(name).await? {
        Some(m) => m,
        None => return Ok(None),
    };
    println!(
        "    {} Found: {} ({})",
        "✓".green(),
        matched.name.bright_white(),
        matched.id.bright_black()
    );

    println!("  {} Fetching artist profile...", "→".bright_black());
    let detail = api.artist_detail(&matched.id).await?;
    let profile = ArtistProfileRecord {
        artist_spotify_id: matched.id.clone(),
        artist_name: matched.name.clone(),
        followers_total: detail.followers.total,
        popularity_score: detail.popularity,
        genres: detail.genres.join(", "),
        spotify_url: detail.external_urls.spotify,
    };
    println!("    Followers : {}", profile.followers_total);
    println!("    Popularity: {}", profile.popularity_score);
    println!("    Genres    : {}", profile.genres);

    println!("  {} Fetching top tracks...", "→".bright_black());
    let tracks: Vec<TopTrackRecord> = api
        .top_tracks(&matched.id)
        .await?
        .into_iter()
        .map(|t| TopTrackRecord {
            artist_spotify_id: matched.id.clone(),
            artist_name: matched.name.clone(),
            track_id: t.id,
            track_name: t.name,
            album_id: t.album.id,
            album_name: t.album.name,
            track_popularity: t.popularity,
            release_date: t.album.release_date,
            track_url: t.external_urls.spotify,
        })
        .collect();

    println!("  {} Fetching albums...", "→".bright_black());
    let albums: Vec<AlbumRecord> = api
        .albums(&matched.id)
        .await?
        .into_iter()
        .map(|a| AlbumRecord {
            artist_spotify_id: matched.id.clone(),
            artist_name: matched.name.clone(),
            album_id: a.id,
            album_name: a.name,
            album_type: a.album_type,
            release_date: a.release_date,
            total_tracks: a.total_tracks,
            album_url: a.external_urls.spotify,
        })
        .collect();

    // Not persisted; the endpoint is deprecated upstream and failures here
    // must not disturb the bundle.
    match api.related_artists(&matched.id).await {
        Ok(related) => println!(
            "    {} {} related artist(s) (not persisted)",
            "✓".green(),
            related.len()
        ),
        Err(e) => println!("    {} Related artists unavailable: {}", "↷".yellow(), e),
    }

    Ok(Some(ArtistBundle {
        profile,
        tracks,
        albums,
    }))
}

/// One pass over the configured artist list. A failure inside any primary
/// lookup skips that artist entirely; the loop always moves on to the next
/// name.
pub async fn fetch_all<C: CatalogApi + Send>(api: &mut C, names: &[&str]) -> FetchReport {
    let mut report = FetchReport::default();
    let total = names.len();

    for (idx, name) in names.iter().copied().enumerate() {
        println!(
            "\n{} {} {}",
            format!("[{}/{}]", idx + 1, total).bright_blue().bold(),
            "Fetching:".white(),
            name.bright_cyan().bold()
        );
        println!("  {} Searching Spotify...", "→".bright_black());

        match fetch_artist(api, name).await {
            Ok(Some(bundle)) => {
                println!(
                    "  {} Staged {} track(s), {} album(s)",
                    "✓".green().bold(),
                    bundle.tracks.len(),
                    bundle.albums.len()
                );
                report.collections.absorb(bundle);
            }
            Ok(None) => {
                println!("  {} No match found, skipping", "✗".red());
                report
                    .skipped
                    .push((name.to_string(), "no Spotify match".to_string()));
            }
            Err(e) => {
                println!("  {} Error: {}, skipping", "✗".red(), e.bright_red());
                report.skipped.push((name.to_string(), e));
            }
        }
    }

    report
}
