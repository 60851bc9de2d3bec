use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The seven entity kinds mirrored from the media server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Show,
    Season,
    Episode,
    Artist,
    Album,
    Track,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown media kind: {0}")]
pub struct UnknownMediaKind(pub String);

impl MediaKind {
    pub const ALL: [MediaKind; 7] = [
        MediaKind::Movie,
        MediaKind::Show,
        MediaKind::Season,
        MediaKind::Episode,
        MediaKind::Artist,
        MediaKind::Album,
        MediaKind::Track,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "show",
            MediaKind::Season => "season",
            MediaKind::Episode => "episode",
            MediaKind::Artist => "artist",
            MediaKind::Album => "album",
            MediaKind::Track => "track",
        }
    }

    /// Numeric `type` filter understood by the media server's library endpoints.
    pub fn plex_type_code(&self) -> u8 {
        match self {
            MediaKind::Movie => 1,
            MediaKind::Show => 2,
            MediaKind::Season => 3,
            MediaKind::Episode => 4,
            MediaKind::Artist => 8,
            MediaKind::Album => 9,
            MediaKind::Track => 10,
        }
    }

    /// Maps the `type` attribute carried by remote items.
    pub fn from_plex_type(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaKind::Movie),
            "show" => Some(MediaKind::Show),
            "season" => Some(MediaKind::Season),
            "episode" => Some(MediaKind::Episode),
            "artist" => Some(MediaKind::Artist),
            "album" => Some(MediaKind::Album),
            "track" => Some(MediaKind::Track),
            _ => None,
        }
    }

    /// The kind listed by `list_children` for a parent of this kind.
    pub fn child_kind(&self) -> Option<MediaKind> {
        match self {
            MediaKind::Show => Some(MediaKind::Season),
            MediaKind::Season => Some(MediaKind::Episode),
            MediaKind::Artist => Some(MediaKind::Album),
            MediaKind::Album => Some(MediaKind::Track),
            MediaKind::Movie | MediaKind::Episode | MediaKind::Track => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = UnknownMediaKind;

    /// Accepts singular and plural names, plus the `tv_show` spelling used by the mirror tables.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let singular = lowered.strip_suffix('s').unwrap_or(&lowered);
        match singular {
            "movie" => Ok(MediaKind::Movie),
            "show" | "tv_show" | "tvshow" => Ok(MediaKind::Show),
            "season" => Ok(MediaKind::Season),
            "episode" => Ok(MediaKind::Episode),
            "artist" => Ok(MediaKind::Artist),
            "album" => Ok(MediaKind::Album),
            "track" => Ok(MediaKind::Track),
            _ => Err(UnknownMediaKind(s.to_string())),
        }
    }
}
