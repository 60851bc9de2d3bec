//! Test fixture creation for the mirror database
//!
//! The mirror is normally written by the sync job, so fixtures use the
//! schema helpers plus direct SQL inserts.

use anyhow::Result;
use plex_mirror::mirror_store::{create_mirror_schema, rebuild_search_index};
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

const LIBRARY_SQL: &str = "
    INSERT INTO movies (ratingKey, title, year, summary, durationHuman, sizeHuman, available, lastSeen) VALUES
        (1, 'The Matrix', 1999, 'A hacker learns the truth', '2h16m', '8.20 GB', 1, '2024-05-01 10:00:00'),
        (2, 'Alien', 1979, 'In space no one can hear you scream', '1h57m', '6.10 GB', 1, '2024-05-01T12:00:00.500000'),
        (3, 'Matrix Revisited', 2001, NULL, NULL, NULL, 0, '2024-05-02 10:00:00'),
        (4, 'brazil', 1985, NULL, NULL, NULL, 1, '2024-04-01 10:00:00');
    INSERT INTO tv_shows (ratingKey, title, summary, lastSeen) VALUES
        (10, 'Dark', 'Time travel in a small town', '2024-05-01T11:00:00');
    INSERT INTO seasons (seasonRatingKey, showRatingKey, seasonNumber, title) VALUES
        (12, 10, 2, 'Season 2'),
        (11, 10, 1, 'Season 1');
    INSERT INTO episodes (ratingKey, seasonRatingKey, showRatingKey, episodeNumber, title, available) VALUES
        (102, 11, 10, 2, 'Lies', 1),
        (101, 11, 10, 1, 'Secrets', 1),
        (103, 11, 10, 3, 'Past and Present', 0);
    INSERT INTO artists (ratingKey, artistName) VALUES (20, 'Muse');
    INSERT INTO albums (ratingKey, artistRatingKey, title, year, lastSeen) VALUES
        (21, 20, 'Origin of Symmetry', 2001, '2024-04-15 10:00:00');
    INSERT INTO tracks (ratingKey, albumRatingKey, artistRatingKey, title, trackNumber) VALUES
        (22, 21, 20, 'Plug In Baby', 3);
";

/// Creates a temporary mirror database with a small library and a populated
/// search index.
/// Returns (temp_dir, db_path)
pub fn create_test_mirror() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("plex_mirror.db");

    let conn = Connection::open(&db_path)?;
    create_mirror_schema(&conn)?;
    conn.execute_batch(LIBRARY_SQL)?;
    rebuild_search_index(&conn)?;

    Ok((dir, db_path))
}
