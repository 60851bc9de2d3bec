use crate::model::MediaKind;
use std::fmt;

/// A logical read query with every parameter resolved. Doubles as the
/// result-cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiveQuery {
    ListByKind {
        kind: MediaKind,
        limit: usize,
        offset: usize,
    },
    GetById {
        kind: MediaKind,
        id: i64,
    },
    ListChildren {
        parent_kind: MediaKind,
        parent_id: i64,
    },
    Search {
        text: String,
        limit: usize,
    },
    Recent {
        limit: usize,
    },
}

impl LiveQuery {
    pub fn name(&self) -> &'static str {
        match self {
            LiveQuery::ListByKind { .. } => "list_by_kind",
            LiveQuery::GetById { .. } => "get_by_id",
            LiveQuery::ListChildren { .. } => "list_children",
            LiveQuery::Search { .. } => "search",
            LiveQuery::Recent { .. } => "list_recent",
        }
    }

    /// The kind every returned item is expected to have, `None` for mixed results.
    pub fn expected_kind(&self) -> Option<MediaKind> {
        match self {
            LiveQuery::ListByKind { kind, .. } | LiveQuery::GetById { kind, .. } => Some(*kind),
            LiveQuery::ListChildren { parent_kind, .. } => parent_kind.child_kind(),
            LiveQuery::Search { .. } | LiveQuery::Recent { .. } => None,
        }
    }

    /// Path and query string on the media server, relative to its base URL.
    pub fn path_and_query(&self) -> String {
        match self {
            LiveQuery::ListByKind {
                kind,
                limit,
                offset,
            } => format!(
                "/library/all?type={}&sort=titleSort&X-Plex-Container-Start={}&X-Plex-Container-Size={}",
                kind.plex_type_code(),
                offset,
                limit
            ),
            LiveQuery::GetById { id, .. } => format!("/library/metadata/{}", id),
            LiveQuery::ListChildren { parent_id, .. } => {
                format!("/library/metadata/{}/children", parent_id)
            }
            LiveQuery::Search { text, limit } => format!(
                "/search?query={}&limit={}",
                urlencoding::encode(text),
                limit
            ),
            LiveQuery::Recent { limit } => format!(
                "/library/recentlyAdded?X-Plex-Container-Start=0&X-Plex-Container-Size={}",
                limit
            ),
        }
    }
}

/// Renders the query name and key parameters for log lines.
impl fmt::Display for LiveQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveQuery::ListByKind {
                kind,
                limit,
                offset,
            } => write!(
                f,
                "list_by_kind(kind={}, limit={}, offset={})",
                kind, limit, offset
            ),
            LiveQuery::GetById { kind, id } => write!(f, "get_by_id(kind={}, id={})", kind, id),
            LiveQuery::ListChildren {
                parent_kind,
                parent_id,
            } => write!(
                f,
                "list_children(parent_kind={}, parent_id={})",
                parent_kind, parent_id
            ),
            LiveQuery::Search { text, limit } => {
                write!(f, "search(text={:?}, limit={})", text, limit)
            }
            LiveQuery::Recent { limit } => write!(f, "list_recent(limit={})", limit),
        }
    }
}
