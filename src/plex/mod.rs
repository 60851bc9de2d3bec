//! Live access to the media server: queries, transport, payload views and
//! normalization.

mod client;
mod error;
mod normalize;
mod payload;
mod query;

pub use client::{PlexClient, RemoteSource};
pub use error::LiveFetchError;
pub use normalize::{normalize_item, normalize_page, LivePage};
pub use payload::{array_or_single, RawItem, RawPayload};
pub use query::LiveQuery;
