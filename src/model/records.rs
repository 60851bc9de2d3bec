//! Normalized records, one struct per mirrored kind.
//!
//! Field names serialize to the mirror column names so a record built from a
//! live payload and one read back from the mirror are indistinguishable.

use super::MediaKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub rating_key: i64,
    pub title: String,
    pub year: Option<i32>,
    pub content_rating: Option<String>,
    pub duration: Option<i64>,
    pub duration_human: Option<String>,
    pub audio_codec: Option<String>,
    pub container: Option<String>,
    pub video_codec: Option<String>,
    pub video_resolution: Option<String>,
    pub size_bytes: Option<i64>,
    pub size_human: Option<String>,
    pub media_hash: Option<String>,
    pub summary: Option<String>,
    pub tagline: Option<String>,
    pub genres: Option<String>,
    pub studio: Option<String>,
    pub directors: Option<String>,
    pub writers: Option<String>,
    pub producers: Option<String>,
    pub actors: Option<String>,
    pub originally_available_at: Option<String>,
    pub rating: Option<f64>,
    pub audience_rating: Option<f64>,
    pub available: bool,
    pub last_seen: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub rating_key: i64,
    pub title: String,
    pub content_rating: Option<String>,
    pub avg_episode_duration: Option<i64>,
    pub avg_episode_duration_human: Option<String>,
    pub season_count: Option<i64>,
    pub show_total_episode: Option<i64>,
    pub show_size_bytes: Option<i64>,
    pub show_size_human: Option<String>,
    pub avg_video_resolutions: Option<String>,
    pub avg_audio_codecs: Option<String>,
    pub avg_video_codecs: Option<String>,
    pub avg_containers: Option<String>,
    pub show_year_range: Option<String>,
    pub summary: Option<String>,
    pub genres: Option<String>,
    pub studio: Option<String>,
    pub actors: Option<String>,
    pub originally_available_at: Option<String>,
    pub rating: Option<f64>,
    pub audience_rating: Option<f64>,
    pub available: bool,
    pub last_seen: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_rating_key: i64,
    pub show_rating_key: i64,
    pub season_number: Option<i64>,
    pub season_total_episode: Option<i64>,
    pub avg_season_episode_duration: Option<i64>,
    pub avg_season_episode_duration_human: Option<String>,
    pub season_size_bytes: Option<i64>,
    pub season_size_human: Option<String>,
    pub avg_season_video_resolution: Option<String>,
    pub avg_season_audio_codec: Option<String>,
    pub avg_season_video_codec: Option<String>,
    pub avg_season_container: Option<String>,
    pub year_range: Option<String>,
    pub summary: Option<String>,
    pub title: Option<String>,
    pub originally_available_at: Option<String>,
    pub available: bool,
    pub last_seen: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub rating_key: i64,
    pub season_rating_key: i64,
    pub show_rating_key: i64,
    pub episode_number: Option<i64>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub duration: Option<i64>,
    pub duration_human: Option<String>,
    pub audio_codec: Option<String>,
    pub container: Option<String>,
    pub video_codec: Option<String>,
    pub video_resolution: Option<String>,
    pub size_bytes: Option<i64>,
    pub size_human: Option<String>,
    pub media_hash: Option<String>,
    pub summary: Option<String>,
    pub originally_available_at: Option<String>,
    pub directors: Option<String>,
    pub writers: Option<String>,
    pub actors: Option<String>,
    pub rating: Option<f64>,
    pub audience_rating: Option<f64>,
    pub available: bool,
    pub last_seen: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub rating_key: i64,
    pub artist_name: String,
    pub total_albums: Option<i64>,
    pub total_tracks: Option<i64>,
    pub total_size_bytes: Option<i64>,
    pub total_size_human: Option<String>,
    pub year_range: Option<String>,
    pub summary: Option<String>,
    pub genres: Option<String>,
    pub available: bool,
    pub last_seen: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub rating_key: i64,
    pub artist_rating_key: i64,
    pub title: String,
    pub year: Option<i32>,
    pub tracks: Option<i64>,
    pub album_size_bytes: Option<i64>,
    pub album_size_human: Option<String>,
    pub album_duration: Option<i64>,
    pub album_duration_human: Option<String>,
    pub album_containers: Option<String>,
    pub summary: Option<String>,
    pub genres: Option<String>,
    pub originally_available_at: Option<String>,
    pub studio: Option<String>,
    pub available: bool,
    pub last_seen: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub rating_key: i64,
    pub album_rating_key: i64,
    pub artist_rating_key: i64,
    pub title: String,
    pub track_number: Option<i64>,
    pub duration: Option<i64>,
    pub duration_human: Option<String>,
    pub size_bytes: Option<i64>,
    pub size_human: Option<String>,
    pub container: Option<String>,
    pub media_hash: Option<String>,
    pub summary: Option<String>,
    pub originally_available_at: Option<String>,
    pub genres: Option<String>,
    pub available: bool,
    pub last_seen: Option<String>,
}

/// A normalized record of any kind. Serializes as the bare inner record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Movie(Movie),
    Show(Show),
    Season(Season),
    Episode(Episode),
    Artist(Artist),
    Album(Album),
    Track(Track),
}

impl Record {
    pub fn kind(&self) -> MediaKind {
        match self {
            Record::Movie(_) => MediaKind::Movie,
            Record::Show(_) => MediaKind::Show,
            Record::Season(_) => MediaKind::Season,
            Record::Episode(_) => MediaKind::Episode,
            Record::Artist(_) => MediaKind::Artist,
            Record::Album(_) => MediaKind::Album,
            Record::Track(_) => MediaKind::Track,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Record::Movie(r) => r.rating_key,
            Record::Show(r) => r.rating_key,
            Record::Season(r) => r.season_rating_key,
            Record::Episode(r) => r.rating_key,
            Record::Artist(r) => r.rating_key,
            Record::Album(r) => r.rating_key,
            Record::Track(r) => r.rating_key,
        }
    }

    /// Display title; the artist name for artists.
    pub fn title(&self) -> Option<&str> {
        match self {
            Record::Movie(r) => Some(&r.title),
            Record::Show(r) => Some(&r.title),
            Record::Season(r) => r.title.as_deref(),
            Record::Episode(r) => r.title.as_deref(),
            Record::Artist(r) => Some(&r.artist_name),
            Record::Album(r) => Some(&r.title),
            Record::Track(r) => Some(&r.title),
        }
    }

    pub fn last_seen(&self) -> Option<&str> {
        match self {
            Record::Movie(r) => r.last_seen.as_deref(),
            Record::Show(r) => r.last_seen.as_deref(),
            Record::Season(r) => r.last_seen.as_deref(),
            Record::Episode(r) => r.last_seen.as_deref(),
            Record::Artist(r) => r.last_seen.as_deref(),
            Record::Album(r) => r.last_seen.as_deref(),
            Record::Track(r) => r.last_seen.as_deref(),
        }
    }

    pub fn tagged(self) -> TaggedRecord {
        TaggedRecord {
            kind: self.kind(),
            record: self,
        }
    }
}

/// A record plus its kind, used where results mix kinds (search, recent).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaggedRecord {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(flatten)]
    pub record: Record,
}
