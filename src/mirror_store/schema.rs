//! Layout of the mirror database written by the sync job.
//!
//! Column names are the JSON field names of the normalized records. Tooling
//! and tests use this definition to prepare an empty mirror; the store uses it
//! to check an existing one.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::Result;
use rusqlite::{params, Connection};

/// Version recorded by the sync job in its `schema_version` table.
pub const MIRROR_SCHEMA_VERSION: usize = 3;

const SHOW_FK: ForeignKey = ForeignKey {
    foreign_table: "tv_shows",
    foreign_column: "ratingKey",
    on_delete: ForeignKeyOnChange::Cascade,
};

const SEASON_FK: ForeignKey = ForeignKey {
    foreign_table: "seasons",
    foreign_column: "seasonRatingKey",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "ratingKey",
    on_delete: ForeignKeyOnChange::Cascade,
};

const ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "ratingKey",
    on_delete: ForeignKeyOnChange::Cascade,
};

const MOVIES_TABLE: Table = Table {
    name: "movies",
    columns: &[
        sqlite_column!("ratingKey", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("contentRating", &SqlType::Text),
        sqlite_column!("duration", &SqlType::Integer), // milliseconds
        sqlite_column!("durationHuman", &SqlType::Text),
        sqlite_column!("audioCodec", &SqlType::Text),
        sqlite_column!("container", &SqlType::Text),
        sqlite_column!("videoCodec", &SqlType::Text),
        sqlite_column!("videoResolution", &SqlType::Text),
        sqlite_column!("sizeBytes", &SqlType::Integer),
        sqlite_column!("sizeHuman", &SqlType::Text),
        sqlite_column!("mediaHash", &SqlType::Text),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("tagline", &SqlType::Text),
        sqlite_column!("genres", &SqlType::Text),
        sqlite_column!("studio", &SqlType::Text),
        sqlite_column!("directors", &SqlType::Text),
        sqlite_column!("writers", &SqlType::Text),
        sqlite_column!("producers", &SqlType::Text),
        sqlite_column!("actors", &SqlType::Text), // "Name as Role, ..."
        sqlite_column!("originallyAvailableAt", &SqlType::Text),
        sqlite_column!("rating", &SqlType::Real),
        sqlite_column!("audienceRating", &SqlType::Real),
        sqlite_column!("available", &SqlType::Integer, default_value = Some("1")),
        sqlite_column!("lastSeen", &SqlType::Text, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[("idx_movies_available", "available")],
};

const TV_SHOWS_TABLE: Table = Table {
    name: "tv_shows",
    columns: &[
        sqlite_column!("ratingKey", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("contentRating", &SqlType::Text),
        sqlite_column!("avgEpisodeDuration", &SqlType::Integer),
        sqlite_column!("avgEpisodeDurationHuman", &SqlType::Text),
        sqlite_column!("seasonCount", &SqlType::Integer),
        sqlite_column!("showTotalEpisode", &SqlType::Integer),
        sqlite_column!("showSizeBytes", &SqlType::Integer),
        sqlite_column!("showSizeHuman", &SqlType::Text),
        sqlite_column!("avgVideoResolutions", &SqlType::Text),
        sqlite_column!("avgAudioCodecs", &SqlType::Text),
        sqlite_column!("avgVideoCodecs", &SqlType::Text),
        sqlite_column!("avgContainers", &SqlType::Text),
        sqlite_column!("showYearRange", &SqlType::Text),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("genres", &SqlType::Text),
        sqlite_column!("studio", &SqlType::Text),
        sqlite_column!("actors", &SqlType::Text),
        sqlite_column!("originallyAvailableAt", &SqlType::Text),
        sqlite_column!("rating", &SqlType::Real),
        sqlite_column!("audienceRating", &SqlType::Real),
        sqlite_column!("available", &SqlType::Integer, default_value = Some("1")),
        sqlite_column!("lastSeen", &SqlType::Text, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[("idx_tv_shows_available", "available")],
};

const SEASONS_TABLE: Table = Table {
    name: "seasons",
    columns: &[
        sqlite_column!("seasonRatingKey", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "showRatingKey",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SHOW_FK)
        ),
        sqlite_column!("seasonNumber", &SqlType::Integer),
        sqlite_column!("seasonTotalEpisode", &SqlType::Integer),
        sqlite_column!("avgSeasonEpisodeDuration", &SqlType::Integer),
        sqlite_column!("avgSeasonEpisodeDurationHuman", &SqlType::Text),
        sqlite_column!("seasonSizeBytes", &SqlType::Integer),
        sqlite_column!("seasonSizeHuman", &SqlType::Text),
        sqlite_column!("avgSeasonVideoResolution", &SqlType::Text),
        sqlite_column!("avgSeasonAudioCodec", &SqlType::Text),
        sqlite_column!("avgSeasonVideoCodec", &SqlType::Text),
        sqlite_column!("avgSeasonContainer", &SqlType::Text),
        sqlite_column!("yearRange", &SqlType::Text),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("originallyAvailableAt", &SqlType::Text),
        sqlite_column!("available", &SqlType::Integer, default_value = Some("1")),
        sqlite_column!("lastSeen", &SqlType::Text, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[
        ("idx_seasons_show", "showRatingKey"),
        ("idx_seasons_available", "available"),
    ],
};

const EPISODES_TABLE: Table = Table {
    name: "episodes",
    columns: &[
        sqlite_column!("ratingKey", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "seasonRatingKey",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SEASON_FK)
        ),
        sqlite_column!(
            "showRatingKey",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SHOW_FK)
        ),
        sqlite_column!("episodeNumber", &SqlType::Integer),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!("durationHuman", &SqlType::Text),
        sqlite_column!("audioCodec", &SqlType::Text),
        sqlite_column!("container", &SqlType::Text),
        sqlite_column!("videoCodec", &SqlType::Text),
        sqlite_column!("videoResolution", &SqlType::Text),
        sqlite_column!("sizeBytes", &SqlType::Integer),
        sqlite_column!("sizeHuman", &SqlType::Text),
        sqlite_column!("mediaHash", &SqlType::Text),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("originallyAvailableAt", &SqlType::Text),
        sqlite_column!("directors", &SqlType::Text),
        sqlite_column!("writers", &SqlType::Text),
        sqlite_column!("actors", &SqlType::Text),
        sqlite_column!("rating", &SqlType::Real),
        sqlite_column!("audienceRating", &SqlType::Real),
        sqlite_column!("available", &SqlType::Integer, default_value = Some("1")),
        sqlite_column!("lastSeen", &SqlType::Text, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[
        ("idx_episodes_season", "seasonRatingKey"),
        ("idx_episodes_show", "showRatingKey"),
        ("idx_episodes_available", "available"),
    ],
};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("ratingKey", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("artistName", &SqlType::Text, non_null = true),
        sqlite_column!("totalAlbums", &SqlType::Integer),
        sqlite_column!("totalTracks", &SqlType::Integer),
        sqlite_column!("totalSizeBytes", &SqlType::Integer),
        sqlite_column!("totalSizeHuman", &SqlType::Text),
        sqlite_column!("yearRange", &SqlType::Text),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("genres", &SqlType::Text),
        sqlite_column!("available", &SqlType::Integer, default_value = Some("1")),
        sqlite_column!("lastSeen", &SqlType::Text, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[("idx_artists_available", "available")],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("ratingKey", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "artistRatingKey",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("tracks", &SqlType::Integer),
        sqlite_column!("albumSizeBytes", &SqlType::Integer),
        sqlite_column!("albumSizeHuman", &SqlType::Text),
        sqlite_column!("albumDuration", &SqlType::Integer),
        sqlite_column!("albumDurationHuman", &SqlType::Text),
        sqlite_column!("albumContainers", &SqlType::Text),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("genres", &SqlType::Text),
        sqlite_column!("originallyAvailableAt", &SqlType::Text),
        sqlite_column!("studio", &SqlType::Text),
        sqlite_column!("available", &SqlType::Integer, default_value = Some("1")),
        sqlite_column!("lastSeen", &SqlType::Text, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[
        ("idx_albums_artist", "artistRatingKey"),
        ("idx_albums_available", "available"),
    ],
};

const TRACKS_TABLE: Table = Table {
    name: "tracks",
    columns: &[
        sqlite_column!("ratingKey", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "albumRatingKey",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ALBUM_FK)
        ),
        sqlite_column!(
            "artistRatingKey",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&ARTIST_FK)
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("trackNumber", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!("durationHuman", &SqlType::Text),
        sqlite_column!("sizeBytes", &SqlType::Integer),
        sqlite_column!("sizeHuman", &SqlType::Text),
        sqlite_column!("container", &SqlType::Text),
        sqlite_column!("mediaHash", &SqlType::Text),
        sqlite_column!("summary", &SqlType::Text),
        sqlite_column!("originallyAvailableAt", &SqlType::Text),
        sqlite_column!("genres", &SqlType::Text),
        sqlite_column!("available", &SqlType::Integer, default_value = Some("1")),
        sqlite_column!("lastSeen", &SqlType::Text, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[
        ("idx_tracks_album", "albumRatingKey"),
        ("idx_tracks_artist", "artistRatingKey"),
        ("idx_tracks_available", "available"),
    ],
};

const SCHEMA_VERSION_TABLE: Table = Table {
    name: "schema_version",
    columns: &[
        sqlite_column!("version", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("applied_at", &SqlType::Text, default_value = Some(DEFAULT_TIMESTAMP)),
    ],
    indices: &[],
};

/// Full-text index over movie, show and artist rows.
pub const SEARCH_INDEX_DDL: &str = "CREATE VIRTUAL TABLE search_fts USING fts5(
    type,
    ratingKey UNINDEXED,
    title,
    summary,
    year UNINDEXED,
    available UNINDEXED
);";

pub const MIRROR_SCHEMA: VersionedSchema = VersionedSchema {
    version: MIRROR_SCHEMA_VERSION,
    tables: &[
        MOVIES_TABLE,
        TV_SHOWS_TABLE,
        SEASONS_TABLE,
        EPISODES_TABLE,
        ARTISTS_TABLE,
        ALBUMS_TABLE,
        TRACKS_TABLE,
        SCHEMA_VERSION_TABLE,
    ],
    extra_statements: &[SEARCH_INDEX_DDL],
};

/// Creates an empty mirror and records its version the way the sync job does.
pub fn create_mirror_schema(conn: &Connection) -> Result<()> {
    MIRROR_SCHEMA.create(conn)?;
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
        params![MIRROR_SCHEMA_VERSION as i64],
    )?;
    Ok(())
}

/// Refills `search_fts` from the available movie, show and artist rows.
pub fn rebuild_search_index(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM search_fts", [])?;
    let mut indexed = conn.execute(
        "INSERT INTO search_fts(type, ratingKey, title, summary, year, available)
         SELECT 'movie', ratingKey, title, COALESCE(summary, ''), year, available
         FROM movies WHERE available = 1",
        [],
    )?;
    indexed += conn.execute(
        "INSERT INTO search_fts(type, ratingKey, title, summary, year, available)
         SELECT 'show', ratingKey, title, COALESCE(summary, ''), NULL, available
         FROM tv_shows WHERE available = 1",
        [],
    )?;
    indexed += conn.execute(
        "INSERT INTO search_fts(type, ratingKey, title, summary, year, available)
         SELECT 'artist', ratingKey, artistName, COALESCE(summary, ''), NULL, available
         FROM artists WHERE available = 1",
        [],
    )?;
    Ok(indexed)
}
