//! Plex Mirror Library
//!
//! Live-first read access to a Plex library with a local SQLite mirror as
//! fallback. Exposes the internal modules for testing and reuse.

pub mod cache;
pub mod config;
pub mod mirror_store;
pub mod model;
pub mod plex;
pub mod resolver;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use mirror_store::{MirrorStore, NullMirrorStore, SqliteMirrorStore};
pub use model::{MediaKind, Record, TaggedRecord};
pub use plex::{LiveFetchError, PlexClient, RemoteSource};
pub use resolver::{HealthStatus, Provenance, Resolved, Resolver};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
