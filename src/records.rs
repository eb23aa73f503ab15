use std::fmt;

// ---------------------------------------------------------------------------
// Record kinds
// ---------------------------------------------------------------------------

/// One row destined for `spotify_artist_profiles`.
#[derive(Debug, Clone)]
pub struct ArtistProfileRecord {
    pub artist_spotify_id: String,
    pub artist_name: String,
    pub followers_total: i64,
    pub popularity_score: i64,
    pub genres: String,
    pub spotify_url: String,
}

/// One row destined for `spotify_top_tracks`. Artist id/name and album
/// id/name are denormalized snapshots taken at fetch time.
#[derive(Debug, Clone)]
pub struct TopTrackRecord {
    pub artist_spotify_id: String,
    pub artist_name: String,
    pub track_id: String,
    pub track_name: String,
    pub album_id: String,
    pub album_name: String,
    pub track_popularity: i64,
    pub release_date: Option<String>,
    pub track_url: String,
}

/// One row destined for `spotify_albums`. Release dates stay text because
/// Spotify returns partial dates ("1981", "1981-10") for older releases.
#[derive(Debug, Clone)]
pub struct AlbumRecord {
    pub artist_spotify_id: String,
    pub artist_name: String,
    pub album_id: String,
    pub album_name: String,
    pub album_type: String,
    pub release_date: Option<String>,
    pub total_tracks: i64,
    pub album_url: String,
}

// ---------------------------------------------------------------------------
// Column extraction
// ---------------------------------------------------------------------------

/// A single bindable SQL value. `None` binds as NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i64>),
}

impl SqlValue {
    pub fn text(value: &str) -> Self {
        Self::Text(Some(value.to_string()))
    }

    pub fn int(value: i64) -> Self {
        Self::Int(Some(value))
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(Some(s)) => write!(f, "{}", s),
            Self::Int(Some(i)) => write!(f, "{}", i),
            Self::Text(None) | Self::Int(None) => write!(f, "NULL"),
        }
    }
}

/// Column extraction for the upsert writer: the ordered column set of a
/// record kind, and the value behind each column. Columns the record does
/// not carry read as NULL, so shapes wider than the record stay writable.
pub trait TableRecord {
    fn columns() -> &'static [&'static str];
    fn value(&self, column: &str) -> SqlValue;
}

impl TableRecord for ArtistProfileRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "artist_spotify_id",
            "artist_name",
            "followers_total",
            "popularity_score",
            "genres",
            "spotify_url",
        ]
    }

    fn value(&self, column: &str) -> SqlValue {
        match column {
            "artist_spotify_id" => SqlValue::text(&self.artist_spotify_id),
            "artist_name" => SqlValue::text(&self.artist_name),
            "followers_total" => SqlValue::int(self.followers_total),
            "popularity_score" => SqlValue::int(self.popularity_score),
            "genres" => SqlValue::text(&self.genres),
            "spotify_url" => SqlValue::text(&self.spotify_url),
            _ => SqlValue::Text(None),
        }
    }
}

impl TableRecord for TopTrackRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "artist_spotify_id",
            "artist_name",
            "track_id",
            "track_name",
            "album_id",
            "album_name",
            "track_popularity",
            "release_date",
            "track_url",
        ]
    }

    fn value(&self, column: &str) -> SqlValue {
        match column {
            "artist_spotify_id" => SqlValue::text(&self.artist_spotify_id),
            "artist_name" => SqlValue::text(&self.artist_name),
            "track_id" => SqlValue::text(&self.track_id),
            "track_name" => SqlValue::text(&self.track_name),
            "album_id" => SqlValue::text(&self.album_id),
            "album_name" => SqlValue::text(&self.album_name),
            "track_popularity" => SqlValue::int(self.track_popularity),
            "release_date" => SqlValue::Text(self.release_date.clone()),
            "track_url" => SqlValue::text(&self.track_url),
            _ => SqlValue::Text(None),
        }
    }
}

impl TableRecord for AlbumRecord {
    fn columns() -> &'static [&'static str] {
        &[
            "artist_spotify_id",
            "artist_name",
            "album_id",
            "album_name",
            "album_type",
            "release_date",
            "total_tracks",
            "album_url",
        ]
    }

    fn value(&self, column: &str) -> SqlValue {
        match column {
            "artist_spotify_id" => SqlValue::text(&self.artist_spotify_id),
            "artist_name" => SqlValue::text(&self.artist_name),
            "album_id" => SqlValue::text(&self.album_id),
            "album_name" => SqlValue::text(&self.album_name),
            "album_type" => SqlValue::text(&self.album_type),
            "release_date" => SqlValue::Text(self.release_date.clone()),
            "total_tracks" => SqlValue::int(self.total_tracks),
            "album_url" => SqlValue::text(&self.album_url),
            _ => SqlValue::Text(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Table configuration
// ---------------------------------------------------------------------------

/// Per-table upsert configuration. The refresh lists deliberately differ:
/// the artist display name is immutable on the profile table but a
/// refreshable denormalized snapshot on tracks and albums, and the owning
/// ids are never rewritten once set.
pub mod tables {
    use crate::upsert::TableSpec;

    pub const ARTIST_PROFILES: TableSpec = TableSpec {
        table: "spotify_artist_profiles",
        key_columns: &["artist_spotify_id"],
        refresh_columns: &["followers_total", "popularity_score", "genres", "spotify_url"],
    };

    pub const TOP_TRACKS: TableSpec = TableSpec {
        table: "spotify_top_tracks",
        key_columns: &["track_id"],
        refresh_columns: &[
            "track_name",
            "album_name",
            "track_popularity",
            "release_date",
            "track_url",
            "artist_name",
        ],
    };

    pub const ALBUMS: TableSpec = TableSpec {
        table: "spotify_albums",
        key_columns: &["album_id"],
        refresh_columns: &[
            "album_name",
            "album_type",
            "release_date",
            "total_tracks",
            "album_url",
            "artist_name",
        ],
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_track() -> TopTrackRecord {
        TopTrackRecord {
            artist_spotify_id: "1Xyo4u8uXC1ZmMpatF05PJ".to_string(),
            artist_name: "The Weeknd".to_string(),
            track_id: "0VjIjW4GlUZAMYd2vXMi3b".to_string(),
            track_name: "Blinding Lights".to_string(),
            album_id: "4yP0hdKOZPNshxUOjY0cZj".to_string(),
            album_name: "After Hours".to_string(),
            track_popularity: 90,
            release_date: None,
            track_url: "https://open.spotify.com/track/0VjIjW4GlUZAMYd2vXMi3b".to_string(),
        }
    }

    #[test]
    fn track_values_match_their_columns() {
        let track = sample_track();
        assert_eq!(
            track.value("track_id"),
            SqlValue::text("0VjIjW4GlUZAMYd2vXMi3b")
        );
        assert_eq!(track.value("track_popularity"), SqlValue::int(90));
        assert_eq!(track.value("release_date"), SqlValue::Text(None));
    }

    #[test]
    fn unknown_column_reads_as_null() {
        let track = sample_track();
        assert_eq!(track.value("no_such_column"), SqlValue::Text(None));
    }

    #[test]
    fn key_columns_are_part_of_the_column_set() {
        for key in tables::TOP_TRACKS.key_columns {
            assert!(TopTrackRecord::columns().contains(key));
        }
        for key in tables::ALBUMS.key_columns {
            assert!(AlbumRecord::columns().contains(key));
        }
        for key in tables::ARTIST_PROFILES.key_columns {
            assert!(ArtistProfileRecord::columns().contains(key));
        }
    }

    #[test]
    fn refresh_columns_never_touch_the_key() {
        for spec in [
            tables::ARTIST_PROFILES,
            tables::TOP_TRACKS,
            tables::ALBUMS,
        ] {
            for col in spec.refresh_columns {
                assert!(!spec.key_columns.contains(col));
            }
        }
    }

    #[test]
    fn profile_name_is_not_in_the_refresh_set() {
        // First insert wins for the display name on the profile table.
        assert!(!tables::ARTIST_PROFILES
            .refresh_columns
            .contains(&"artist_name"));
    }

    #[test]
    fn null_renders_for_log_lines() {
        assert_eq!(SqlValue::Text(None).to_string(), "NULL");
        assert_eq!(SqlValue::int(7).to_string(), "7");
        assert_eq!(SqlValue::text("x").to_string(), "x");
    }
}
