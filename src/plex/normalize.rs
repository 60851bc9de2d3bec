//! Conversion of remote items into normalized records.

use super::payload::{RawItem, RawPayload};
use super::LiveFetchError;
use crate::model::display::{
    format_actor, format_codec, format_resolution, human_readable_duration, human_readable_size,
    join_list, media_fingerprint, FingerprintInput,
};
use crate::model::{Album, Artist, Episode, MediaKind, Movie, Record, Season, Show, Track};
use chrono::{DateTime, SecondsFormat};

/// One page of normalized live results.
#[derive(Debug, Clone, PartialEq)]
pub struct LivePage {
    pub items: Vec<Record>,
    /// Total reported by the container, or the item count when it reports none.
    pub total: usize,
}

/// Normalizes every item of a container.
///
/// With an `expected` kind, items announcing another type are skipped and
/// untyped items are read as `expected`. Without one, each item's kind comes
/// from its `type` and items of unsupported types are skipped.
pub fn normalize_page(
    payload: &RawPayload,
    expected: Option<MediaKind>,
) -> Result<LivePage, LiveFetchError> {
    let container = payload.container()?;
    let mut items = Vec::new();
    for item in container.items() {
        let announced = item.text("type");
        let kind = match (announced.as_deref(), expected) {
            (Some(announced), expected) => match MediaKind::from_plex_type(announced) {
                Some(kind) if expected.is_none() || expected == Some(kind) => kind,
                _ => continue,
            },
            (None, Some(expected)) => expected,
            (None, None) => continue,
        };
        items.push(normalize_item(&item, kind)?);
    }
    let total = container
        .int("totalSize")
        .and_then(|t| usize::try_from(t).ok())
        .unwrap_or(items.len());
    Ok(LivePage { items, total })
}

/// Produces exactly one record of `kind` from `item`.
pub fn normalize_item(item: &RawItem<'_>, kind: MediaKind) -> Result<Record, LiveFetchError> {
    Ok(match kind {
        MediaKind::Movie => Record::Movie(movie(item)?),
        MediaKind::Show => Record::Show(show(item)?),
        MediaKind::Season => Record::Season(season(item)?),
        MediaKind::Episode => Record::Episode(episode(item)?),
        MediaKind::Artist => Record::Artist(artist(item)?),
        MediaKind::Album => Record::Album(album(item)?),
        MediaKind::Track => Record::Track(track(item)?),
    })
}

fn rating_key(item: &RawItem<'_>) -> Result<i64, LiveFetchError> {
    item.int("ratingKey")
        .ok_or_else(|| LiveFetchError::malformed("missing or non-integer ratingKey"))
}

fn ancestor_key(item: &RawItem<'_>, field: &str) -> Result<i64, LiveFetchError> {
    item.int(field)
        .ok_or_else(|| LiveFetchError::malformed(format!("missing or non-integer {}", field)))
}

fn required_text(item: &RawItem<'_>, field: &str) -> Result<String, LiveFetchError> {
    item.text(field)
        .ok_or_else(|| LiveFetchError::malformed(format!("missing {}", field)))
}

fn year(item: &RawItem<'_>, field: &str) -> Option<i32> {
    item.int(field).and_then(|y| i32::try_from(y).ok())
}

fn joined_tags(item: &RawItem<'_>, name: &str) -> Option<String> {
    join_list(item.tags(name))
}

fn actors(item: &RawItem<'_>) -> Option<String> {
    join_list(item.children("Role").iter().filter_map(|role| {
        let name = role.text("tag")?;
        Some(format_actor(&name, role.text("role").as_deref()))
    }))
}

fn duration_human(duration: Option<i64>) -> Option<String> {
    duration.filter(|d| *d > 0).map(human_readable_duration)
}

/// `updatedAt`, else `addedAt`, as an ISO-8601 UTC timestamp.
fn last_seen(item: &RawItem<'_>) -> Option<String> {
    let epoch = item.int("updatedAt").or_else(|| item.int("addedAt"))?;
    DateTime::from_timestamp(epoch, 0).map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Stream facts of the first media version and its first part.
#[derive(Default)]
struct VideoMedia {
    audio_codec: Option<String>,
    video_codec: Option<String>,
    video_resolution: Option<String>,
    container: Option<String>,
    size_bytes: Option<i64>,
}

fn video_media(item: &RawItem<'_>) -> VideoMedia {
    let Some(media) = item.first_child("Media") else {
        return VideoMedia::default();
    };
    let part = media.first_child("Part");
    VideoMedia {
        audio_codec: media.text("audioCodec").map(|c| format_codec(&c)),
        video_codec: media.text("videoCodec").map(|c| format_codec(&c)),
        video_resolution: media.text("videoResolution").map(|r| format_resolution(&r)),
        container: part
            .and_then(|p| p.text("container"))
            .or_else(|| media.text("container")),
        size_bytes: part.and_then(|p| p.int("size")),
    }
}

fn video_fingerprint(
    media: &VideoMedia,
    duration: Option<i64>,
    title: Option<&str>,
    year: Option<i32>,
) -> String {
    media_fingerprint(&FingerprintInput {
        size_bytes: Some(media.size_bytes.unwrap_or(0)),
        duration: Some(duration.unwrap_or(0)),
        codec: media.video_codec.as_deref(),
        resolution: media.video_resolution.as_deref(),
        container: media.container.as_deref(),
        title,
        year,
    })
}

fn movie(item: &RawItem<'_>) -> Result<Movie, LiveFetchError> {
    let rating_key = rating_key(item)?;
    let title = required_text(item, "title")?;
    let year = year(item, "year");
    let duration = item.int("duration");
    let media = video_media(item);
    let media_hash = video_fingerprint(&media, duration, Some(&title), year);
    Ok(Movie {
        rating_key,
        year,
        content_rating: item.text("contentRating"),
        duration,
        duration_human: duration_human(duration),
        size_human: media.size_bytes.map(human_readable_size),
        media_hash: Some(media_hash),
        audio_codec: media.audio_codec,
        container: media.container,
        video_codec: media.video_codec,
        video_resolution: media.video_resolution,
        size_bytes: media.size_bytes,
        summary: item.text("summary"),
        tagline: item.text("tagline"),
        genres: joined_tags(item, "Genre"),
        studio: item.text("studio"),
        directors: joined_tags(item, "Director"),
        writers: joined_tags(item, "Writer"),
        producers: joined_tags(item, "Producer"),
        actors: actors(item),
        originally_available_at: item.text("originallyAvailableAt"),
        rating: item.float("rating"),
        audience_rating: item.float("audienceRating"),
        available: true,
        last_seen: last_seen(item),
        title,
    })
}

fn show(item: &RawItem<'_>) -> Result<Show, LiveFetchError> {
    Ok(Show {
        rating_key: rating_key(item)?,
        title: required_text(item, "title")?,
        content_rating: item.text("contentRating"),
        avg_episode_duration: None,
        avg_episode_duration_human: None,
        season_count: item.int("childCount"),
        show_total_episode: item.int("leafCount"),
        show_size_bytes: None,
        show_size_human: None,
        avg_video_resolutions: None,
        avg_audio_codecs: None,
        avg_video_codecs: None,
        avg_containers: None,
        show_year_range: year(item, "year").map(|y| y.to_string()),
        summary: item.text("summary"),
        genres: joined_tags(item, "Genre"),
        studio: item.text("studio"),
        actors: actors(item),
        originally_available_at: item.text("originallyAvailableAt"),
        rating: item.float("rating"),
        audience_rating: item.float("audienceRating"),
        available: true,
        last_seen: last_seen(item),
    })
}

fn season(item: &RawItem<'_>) -> Result<Season, LiveFetchError> {
    Ok(Season {
        season_rating_key: rating_key(item)?,
        show_rating_key: ancestor_key(item, "parentRatingKey")?,
        season_number: item.int("index"),
        season_total_episode: item.int("leafCount"),
        avg_season_episode_duration: None,
        avg_season_episode_duration_human: None,
        season_size_bytes: None,
        season_size_human: None,
        avg_season_video_resolution: None,
        avg_season_audio_codec: None,
        avg_season_video_codec: None,
        avg_season_container: None,
        year_range: year(item, "year")
            .or_else(|| year(item, "parentYear"))
            .map(|y| y.to_string()),
        summary: item.text("summary"),
        title: item.text("title"),
        originally_available_at: item.text("originallyAvailableAt"),
        available: true,
        last_seen: last_seen(item),
    })
}

fn episode(item: &RawItem<'_>) -> Result<Episode, LiveFetchError> {
    let rating_key = rating_key(item)?;
    let season_rating_key = ancestor_key(item, "parentRatingKey")?;
    let show_rating_key = ancestor_key(item, "grandparentRatingKey")?;
    let title = item.text("title");
    let year = year(item, "year");
    let duration = item.int("duration");
    let media = video_media(item);
    let media_hash = video_fingerprint(&media, duration, title.as_deref(), year);
    Ok(Episode {
        rating_key,
        season_rating_key,
        show_rating_key,
        episode_number: item.int("index"),
        title,
        year,
        duration,
        duration_human: duration_human(duration),
        size_human: media.size_bytes.map(human_readable_size),
        media_hash: Some(media_hash),
        audio_codec: media.audio_codec,
        container: media.container,
        video_codec: media.video_codec,
        video_resolution: media.video_resolution,
        size_bytes: media.size_bytes,
        summary: item.text("summary"),
        originally_available_at: item.text("originallyAvailableAt"),
        directors: joined_tags(item, "Director"),
        writers: joined_tags(item, "Writer"),
        actors: actors(item),
        rating: item.float("rating"),
        audience_rating: item.float("audienceRating"),
        available: true,
        last_seen: last_seen(item),
    })
}

fn artist(item: &RawItem<'_>) -> Result<Artist, LiveFetchError> {
    Ok(Artist {
        rating_key: rating_key(item)?,
        artist_name: required_text(item, "title")?,
        total_albums: item.int("childCount"),
        total_tracks: item.int("leafCount"),
        total_size_bytes: None,
        total_size_human: None,
        year_range: year(item, "year").map(|y| y.to_string()),
        summary: item.text("summary"),
        genres: joined_tags(item, "Genre"),
        available: true,
        last_seen: last_seen(item),
    })
}

fn album(item: &RawItem<'_>) -> Result<Album, LiveFetchError> {
    let duration = item.int("duration");
    Ok(Album {
        rating_key: rating_key(item)?,
        artist_rating_key: ancestor_key(item, "parentRatingKey")?,
        title: required_text(item, "title")?,
        year: year(item, "year"),
        tracks: item.int("leafCount"),
        album_size_bytes: None,
        album_size_human: None,
        album_duration: duration,
        album_duration_human: duration_human(duration),
        album_containers: None,
        summary: item.text("summary"),
        genres: joined_tags(item, "Genre"),
        originally_available_at: item.text("originallyAvailableAt"),
        studio: item.text("studio"),
        available: true,
        last_seen: last_seen(item),
    })
}

fn track(item: &RawItem<'_>) -> Result<Track, LiveFetchError> {
    let rating_key = rating_key(item)?;
    let album_rating_key = ancestor_key(item, "parentRatingKey")?;
    let artist_rating_key = ancestor_key(item, "grandparentRatingKey")?;
    let title = required_text(item, "title")?;

    // Sizes add up over every part; duration and container come from the media versions.
    let medias = item.children("Media");
    let part_sizes: Vec<i64> = medias
        .iter()
        .flat_map(|m| m.children("Part"))
        .filter_map(|p| p.int("size"))
        .collect();
    let size_bytes = (!part_sizes.is_empty()).then(|| part_sizes.iter().sum::<i64>());
    let duration = medias
        .iter()
        .rev()
        .find_map(|m| m.int("duration"))
        .or_else(|| item.int("duration"));
    let container = medias.iter().find_map(|m| {
        m.text("container")
            .or_else(|| m.first_child("Part").and_then(|p| p.text("container")))
    });

    let media_hash = media_fingerprint(&FingerprintInput {
        size_bytes: Some(size_bytes.unwrap_or(0)),
        duration: Some(duration.unwrap_or(0)),
        codec: None,
        resolution: None,
        container: container.as_deref(),
        title: Some(&title),
        year: year(item, "parentYear"),
    });

    Ok(Track {
        rating_key,
        album_rating_key,
        artist_rating_key,
        track_number: item.int("index"),
        duration,
        duration_human: duration_human(duration),
        size_bytes,
        size_human: size_bytes.map(human_readable_size),
        container,
        media_hash: Some(media_hash),
        summary: item.text("summary"),
        originally_available_at: item.text("originallyAvailableAt"),
        genres: joined_tags(item, "Genre"),
        available: true,
        last_seen: last_seen(item),
        title,
    })
}
