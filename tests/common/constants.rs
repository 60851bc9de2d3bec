//! Shared constants for end-to-end tests
//!
//! When the fixture library changes, update only this file.

// ============================================================================
// Mirror Fixture IDs
// ============================================================================

/// "The Matrix", available
pub const MOVIE_MATRIX_ID: i64 = 1;

/// "Alien", available, most recently seen movie
pub const MOVIE_ALIEN_ID: i64 = 2;

/// "Matrix Revisited", marked unavailable by the sync job
pub const MOVIE_UNAVAILABLE_ID: i64 = 3;

/// "brazil", lowercase on purpose to exercise case-insensitive ordering
pub const MOVIE_BRAZIL_ID: i64 = 4;

/// Number of available movies in the mirror
pub const AVAILABLE_MOVIES: usize = 3;

pub const SHOW_DARK_ID: i64 = 10;
pub const SEASON_1_ID: i64 = 11;
pub const SEASON_2_ID: i64 = 12;
pub const EPISODE_1_ID: i64 = 101;
pub const EPISODE_2_ID: i64 = 102;

pub const ARTIST_MUSE_ID: i64 = 20;
pub const ALBUM_ORIGIN_ID: i64 = 21;
pub const TRACK_PLUG_IN_BABY_ID: i64 = 22;

/// Id known to neither the upstream nor the mirror
pub const MISSING_ID: i64 = 999;

// ============================================================================
// Upstream Fixture Values
// ============================================================================

/// Token the fake upstream expects in `X-Plex-Token`
pub const PLEX_TOKEN: &str = "test-plex-token";

/// `totalSize` reported by the fake upstream movie listing
pub const UPSTREAM_MOVIE_TOTAL: u64 = 150;

pub const UPSTREAM_MOVIE_1_ID: i64 = 500;
pub const UPSTREAM_MOVIE_2_ID: i64 = 501;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Remote timeout configured on test servers (milliseconds)
pub const REMOTE_TIMEOUT_MS: u64 = 300;

/// Delay used by the fake upstream to trigger a timeout (milliseconds)
pub const SLOW_UPSTREAM_DELAY_MS: u64 = 3000;

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
