//! Per-kind table layout and row parsing.

use crate::model::{Album, Artist, Episode, MediaKind, Movie, Record, Season, Show, Track};
use rusqlite::Row;

/// Where a kind lives in the mirror and how its rows are ordered.
pub(super) struct KindTable {
    pub table: &'static str,
    pub key: &'static str,
    pub title: &'static str,
}

pub(super) fn kind_table(kind: MediaKind) -> KindTable {
    match kind {
        MediaKind::Movie => KindTable {
            table: "movies",
            key: "ratingKey",
            title: "title",
        },
        MediaKind::Show => KindTable {
            table: "tv_shows",
            key: "ratingKey",
            title: "title",
        },
        MediaKind::Season => KindTable {
            table: "seasons",
            key: "seasonRatingKey",
            title: "title",
        },
        MediaKind::Episode => KindTable {
            table: "episodes",
            key: "ratingKey",
            title: "title",
        },
        MediaKind::Artist => KindTable {
            table: "artists",
            key: "ratingKey",
            title: "artistName",
        },
        MediaKind::Album => KindTable {
            table: "albums",
            key: "ratingKey",
            title: "title",
        },
        MediaKind::Track => KindTable {
            table: "tracks",
            key: "ratingKey",
            title: "title",
        },
    }
}

/// Parent column and ordering for `list_children`, keyed by the parent kind.
pub(super) fn children_query(parent_kind: MediaKind) -> Option<(MediaKind, &'static str, &'static str)> {
    match parent_kind {
        MediaKind::Show => Some((
            MediaKind::Season,
            "showRatingKey",
            "seasonNumber ASC, seasonRatingKey ASC",
        )),
        MediaKind::Season => Some((
            MediaKind::Episode,
            "seasonRatingKey",
            "episodeNumber ASC, ratingKey ASC",
        )),
        MediaKind::Artist => Some((
            MediaKind::Album,
            "artistRatingKey",
            "year ASC, title COLLATE NOCASE ASC, ratingKey ASC",
        )),
        MediaKind::Album => Some((
            MediaKind::Track,
            "albumRatingKey",
            "trackNumber ASC, ratingKey ASC",
        )),
        MediaKind::Movie | MediaKind::Episode | MediaKind::Track => None,
    }
}

fn available(row: &Row) -> rusqlite::Result<bool> {
    Ok(row
        .get::<_, Option<i64>>("available")?
        .map_or(true, |flag| flag != 0))
}

pub(super) fn parse_record(kind: MediaKind, row: &Row) -> rusqlite::Result<Record> {
    Ok(match kind {
        MediaKind::Movie => Record::Movie(parse_movie(row)?),
        MediaKind::Show => Record::Show(parse_show(row)?),
        MediaKind::Season => Record::Season(parse_season(row)?),
        MediaKind::Episode => Record::Episode(parse_episode(row)?),
        MediaKind::Artist => Record::Artist(parse_artist(row)?),
        MediaKind::Album => Record::Album(parse_album(row)?),
        MediaKind::Track => Record::Track(parse_track(row)?),
    })
}

fn parse_movie(row: &Row) -> rusqlite::Result<Movie> {
    Ok(Movie {
        rating_key: row.get("ratingKey")?,
        title: row.get("title")?,
        year: row.get("year")?,
        content_rating: row.get("contentRating")?,
        duration: row.get("duration")?,
        duration_human: row.get("durationHuman")?,
        audio_codec: row.get("audioCodec")?,
        container: row.get("container")?,
        video_codec: row.get("videoCodec")?,
        video_resolution: row.get("videoResolution")?,
        size_bytes: row.get("sizeBytes")?,
        size_human: row.get("sizeHuman")?,
        media_hash: row.get("mediaHash")?,
        summary: row.get("summary")?,
        tagline: row.get("tagline")?,
        genres: row.get("genres")?,
        studio: row.get("studio")?,
        directors: row.get("directors")?,
        writers: row.get("writers")?,
        producers: row.get("producers")?,
        actors: row.get("actors")?,
        originally_available_at: row.get("originallyAvailableAt")?,
        rating: row.get("rating")?,
        audience_rating: row.get("audienceRating")?,
        available: available(row)?,
        last_seen: row.get("lastSeen")?,
    })
}

fn parse_show(row: &Row) -> rusqlite::Result<Show> {
    Ok(Show {
        rating_key: row.get("ratingKey")?,
        title: row.get("title")?,
        content_rating: row.get("contentRating")?,
        avg_episode_duration: row.get("avgEpisodeDuration")?,
        avg_episode_duration_human: row.get("avgEpisodeDurationHuman")?,
        season_count: row.get("seasonCount")?,
        show_total_episode: row.get("showTotalEpisode")?,
        show_size_bytes: row.get("showSizeBytes")?,
        show_size_human: row.get("showSizeHuman")?,
        avg_video_resolutions: row.get("avgVideoResolutions")?,
        avg_audio_codecs: row.get("avgAudioCodecs")?,
        avg_video_codecs: row.get("avgVideoCodecs")?,
        avg_containers: row.get("avgContainers")?,
        show_year_range: row.get("showYearRange")?,
        summary: row.get("summary")?,
        genres: row.get("genres")?,
        studio: row.get("studio")?,
        actors: row.get("actors")?,
        originally_available_at: row.get("originallyAvailableAt")?,
        rating: row.get("rating")?,
        audience_rating: row.get("audienceRating")?,
        available: available(row)?,
        last_seen: row.get("lastSeen")?,
    })
}

fn parse_season(row: &Row) -> rusqlite::Result<Season> {
    Ok(Season {
        season_rating_key: row.get("seasonRatingKey")?,
        show_rating_key: row.get("showRatingKey")?,
        season_number: row.get("seasonNumber")?,
        season_total_episode: row.get("seasonTotalEpisode")?,
        avg_season_episode_duration: row.get("avgSeasonEpisodeDuration")?,
        avg_season_episode_duration_human: row.get("avgSeasonEpisodeDurationHuman")?,
        season_size_bytes: row.get("seasonSizeBytes")?,
        season_size_human: row.get("seasonSizeHuman")?,
        avg_season_video_resolution: row.get("avgSeasonVideoResolution")?,
        avg_season_audio_codec: row.get("avgSeasonAudioCodec")?,
        avg_season_video_codec: row.get("avgSeasonVideoCodec")?,
        avg_season_container: row.get("avgSeasonContainer")?,
        year_range: row.get("yearRange")?,
        summary: row.get("summary")?,
        title: row.get("title")?,
        originally_available_at: row.get("originallyAvailableAt")?,
        available: available(row)?,
        last_seen: row.get("lastSeen")?,
    })
}

fn parse_episode(row: &Row) -> rusqlite::Result<Episode> {
    Ok(Episode {
        rating_key: row.get("ratingKey")?,
        season_rating_key: row.get("seasonRatingKey")?,
        show_rating_key: row.get("showRatingKey")?,
        episode_number: row.get("episodeNumber")?,
        title: row.get("title")?,
        year: row.get("year")?,
        duration: row.get("duration")?,
        duration_human: row.get("durationHuman")?,
        audio_codec: row.get("audioCodec")?,
        container: row.get("container")?,
        video_codec: row.get("videoCodec")?,
        video_resolution: row.get("videoResolution")?,
        size_bytes: row.get("sizeBytes")?,
        size_human: row.get("sizeHuman")?,
        media_hash: row.get("mediaHash")?,
        summary: row.get("summary")?,
        originally_available_at: row.get("originallyAvailableAt")?,
        directors: row.get("directors")?,
        writers: row.get("writers")?,
        actors: row.get("actors")?,
        rating: row.get("rating")?,
        audience_rating: row.get("audienceRating")?,
        available: available(row)?,
        last_seen: row.get("lastSeen")?,
    })
}

fn parse_artist(row: &Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        rating_key: row.get("ratingKey")?,
        artist_name: row.get("artistName")?,
        total_albums: row.get("totalAlbums")?,
        total_tracks: row.get("totalTracks")?,
        total_size_bytes: row.get("totalSizeBytes")?,
        total_size_human: row.get("totalSizeHuman")?,
        year_range: row.get("yearRange")?,
        summary: row.get("summary")?,
        genres: row.get("genres")?,
        available: available(row)?,
        last_seen: row.get("lastSeen")?,
    })
}

fn parse_album(row: &Row) -> rusqlite::Result<Album> {
    Ok(Album {
        rating_key: row.get("ratingKey")?,
        artist_rating_key: row.get("artistRatingKey")?,
        title: row.get("title")?,
        year: row.get("year")?,
        tracks: row.get("tracks")?,
        album_size_bytes: row.get("albumSizeBytes")?,
        album_size_human: row.get("albumSizeHuman")?,
        album_duration: row.get("albumDuration")?,
        album_duration_human: row.get("albumDurationHuman")?,
        album_containers: row.get("albumContainers")?,
        summary: row.get("summary")?,
        genres: row.get("genres")?,
        originally_available_at: row.get("originallyAvailableAt")?,
        studio: row.get("studio")?,
        available: available(row)?,
        last_seen: row.get("lastSeen")?,
    })
}

fn parse_track(row: &Row) -> rusqlite::Result<Track> {
    Ok(Track {
        rating_key: row.get("ratingKey")?,
        album_rating_key: row.get("albumRatingKey")?,
        artist_rating_key: row.get("artistRatingKey")?,
        title: row.get("title")?,
        track_number: row.get("trackNumber")?,
        duration: row.get("duration")?,
        duration_human: row.get("durationHuman")?,
        size_bytes: row.get("sizeBytes")?,
        size_human: row.get("sizeHuman")?,
        container: row.get("container")?,
        media_hash: row.get("mediaHash")?,
        summary: row.get("summary")?,
        originally_available_at: row.get("originallyAvailableAt")?,
        genres: row.get("genres")?,
        available: available(row)?,
        last_seen: row.get("lastSeen")?,
    })
}
