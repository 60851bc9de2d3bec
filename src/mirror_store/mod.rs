mod null_store;
mod rows;
pub mod schema;
mod store;
mod trait_def;

pub use null_store::NullMirrorStore;
pub use schema::{create_mirror_schema, rebuild_search_index, MIRROR_SCHEMA};
pub use store::SqliteMirrorStore;
pub use trait_def::MirrorStore;
