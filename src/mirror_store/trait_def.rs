//! MirrorStore trait definition.

use crate::model::{MediaKind, Record, TaggedRecord};

/// Read-only access to the local mirror.
///
/// Implementations never fail: storage errors are logged and reported as an
/// empty list or a missing record. Every operation skips rows whose
/// `available` flag is cleared.
pub trait MirrorStore: Send + Sync {
    /// Whether a database is actually behind this store.
    fn is_open(&self) -> bool;

    /// Records of one kind, ordered by title (artist name for artists).
    fn list_by_kind(&self, kind: MediaKind, limit: usize, offset: usize) -> Vec<Record>;

    fn get_by_id(&self, kind: MediaKind, id: i64) -> Option<Record>;

    /// Direct children of a parent, by ordinal. Empty for kinds without children.
    fn list_children(&self, parent_kind: MediaKind, parent_id: i64) -> Vec<Record>;

    /// Full-text search over movies, shows and artists, falling back to a
    /// substring match across every kind.
    fn search(&self, text: &str, limit: usize) -> Vec<TaggedRecord>;

    /// Most recently seen movies, shows and albums, newest first.
    fn list_recent(&self, limit: usize) -> Vec<TaggedRecord>;
}
