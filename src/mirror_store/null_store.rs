//! Null mirror store implementation.
//!
//! Stands in when the mirror database could not be opened, so every fallback
//! answers immediately with an empty result.

use super::trait_def::MirrorStore;
use crate::model::{MediaKind, Record, TaggedRecord};

/// A no-op mirror store that returns empty/none for all operations.
pub struct NullMirrorStore;

impl MirrorStore for NullMirrorStore {
    fn is_open(&self) -> bool {
        false
    }

    fn list_by_kind(&self, _kind: MediaKind, _limit: usize, _offset: usize) -> Vec<Record> {
        Vec::new()
    }

    fn get_by_id(&self, _kind: MediaKind, _id: i64) -> Option<Record> {
        None
    }

    fn list_children(&self, _parent_kind: MediaKind, _parent_id: i64) -> Vec<Record> {
        Vec::new()
    }

    fn search(&self, _text: &str, _limit: usize) -> Vec<TaggedRecord> {
        Vec::new()
    }

    fn list_recent(&self, _limit: usize) -> Vec<TaggedRecord> {
        Vec::new()
    }
}
