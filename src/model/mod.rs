pub mod display;
mod kind;
pub mod recency;
mod records;

pub use kind::{MediaKind, UnknownMediaKind};
pub use records::{Album, Artist, Episode, Movie, Record, Season, Show, TaggedRecord, Track};

#[cfg(test)]
pub(crate) use records::test_records;
