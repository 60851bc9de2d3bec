//! SQLite-backed mirror store.
//!
//! Opens the database written by the sync job read-only and serves every
//! fallback query from a small pool of rotated read connections.

use super::rows::{children_query, kind_table, parse_record};
use super::schema::MIRROR_SCHEMA;
use super::trait_def::MirrorStore;
use crate::model::recency::sort_most_recent_first;
use crate::model::{MediaKind, Record, TaggedRecord};
use anyhow::{anyhow, bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Kinds merged by `list_recent`.
const RECENT_KINDS: [MediaKind; 3] = [MediaKind::Movie, MediaKind::Show, MediaKind::Album];

/// Substring search order: indexed kinds first, then the rest of the hierarchy.
const SUBSTRING_SEARCH_KINDS: [MediaKind; 7] = [
    MediaKind::Movie,
    MediaKind::Show,
    MediaKind::Artist,
    MediaKind::Season,
    MediaKind::Episode,
    MediaKind::Album,
    MediaKind::Track,
];

/// Read-only SQLite mirror.
#[derive(Clone)]
pub struct SqliteMirrorStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    read_index: Arc<AtomicUsize>,
}

fn table_exists(conn: &Connection, name: &str) -> bool {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE name = ?1 AND type IN ('table', 'view')",
        params![name],
        |_| Ok(true),
    )
    .unwrap_or(false)
}

/// SQL integer for a row count; counts past `i64::MAX` saturate.
fn sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// The full-text table is optional; the sync job may create it after we open.
fn is_missing_table(e: &anyhow::Error) -> bool {
    e.to_string().contains("no such table")
}

/// Escapes `%`, `_` and the escape character itself for a `LIKE ... ESCAPE '\'` pattern.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Quotes user text as a single FTS5 string so operators in it are inert.
fn fts_phrase(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

impl SqliteMirrorStore {
    /// Open an existing mirror database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database written by the sync job
    /// * `read_pool_size` - Number of connections for concurrent reads (at least 1)
    pub fn open<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();
        if !db_path.is_file() {
            bail!("Mirror database {} does not exist", db_path.display());
        }

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .with_context(|| format!("Failed to open mirror database {}", db_path.display()))?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let (has_search_index, counts) = {
            let conn = read_pool[0]
                .lock()
                .map_err(|_| anyhow!("mirror connection poisoned"))?;
            if let Err(e) = MIRROR_SCHEMA.validate(&conn) {
                warn!("Mirror schema differs from the expected layout: {}", e);
            }
            let count = |table: &str| -> i64 {
                conn.query_row(
                    &format!("SELECT COUNT(*) FROM {} WHERE available = 1", table),
                    [],
                    |r| r.get(0),
                )
                .unwrap_or(0)
            };
            (
                table_exists(&conn, "search_fts"),
                [count("movies"), count("tv_shows"), count("artists")],
            )
        };

        info!(
            "Opened mirror {}: {} movies, {} shows, {} artists (full-text index: {})",
            db_path.display(),
            counts[0],
            counts[1],
            counts[2],
            if has_search_index { "yes" } else { "no" }
        );

        Ok(Self {
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let read_conn = self.get_read_conn();
        let conn = read_conn
            .lock()
            .map_err(|_| anyhow!("mirror connection poisoned"))?;
        f(&conn)
    }

    fn query_records(
        conn: &Connection,
        kind: MediaKind,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Record>> {
        let mut stmt = conn.prepare_cached(sql)?;
        let records = stmt
            .query_map(params, |row| parse_record(kind, row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn list_by_kind_inner(
        conn: &Connection,
        kind: MediaKind,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Record>> {
        let table = kind_table(kind);
        let sql = format!(
            "SELECT * FROM {} WHERE available = 1 ORDER BY {} COLLATE NOCASE ASC, {} ASC LIMIT ?1 OFFSET ?2",
            table.table, table.title, table.key
        );
        Self::query_records(conn, kind, &sql, params![sql_count(limit), sql_count(offset)])
    }

    fn get_by_id_inner(conn: &Connection, kind: MediaKind, id: i64) -> Result<Option<Record>> {
        let table = kind_table(kind);
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 AND available = 1",
            table.table, table.key
        );
        Ok(Self::query_records(conn, kind, &sql, params![id])?
            .into_iter()
            .next())
    }

    fn list_children_inner(
        conn: &Connection,
        parent_kind: MediaKind,
        parent_id: i64,
    ) -> Result<Vec<Record>> {
        let Some((child_kind, parent_column, order_by)) = children_query(parent_kind) else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 AND available = 1 ORDER BY {}",
            kind_table(child_kind).table,
            parent_column,
            order_by
        );
        Self::query_records(conn, child_kind, &sql, params![parent_id])
    }

    /// Ranked full-text hits, resolved back to available mirror rows.
    fn search_index_inner(conn: &Connection, text: &str, limit: usize) -> Result<Vec<TaggedRecord>> {
        let mut stmt = conn.prepare_cached(
            "SELECT type, ratingKey FROM search_fts
             WHERE search_fts MATCH ?1
             ORDER BY rank
             LIMIT ?2",
        )?;
        let hits = stmt
            .query_map(params![fts_phrase(text), sql_count(limit)], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<i64>>(1)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut results = Vec::with_capacity(hits.len());
        for (kind, id) in hits {
            // Contentless indexes return NULL columns; those hits cannot be resolved.
            let (Some(kind), Some(id)) = (kind.as_deref().and_then(MediaKind::from_plex_type), id)
            else {
                continue;
            };
            if let Some(record) = Self::get_by_id_inner(conn, kind, id)? {
                results.push(record.tagged());
            }
        }
        Ok(results)
    }

    fn search_substring_inner(
        conn: &Connection,
        text: &str,
        limit: usize,
    ) -> Result<Vec<TaggedRecord>> {
        let pattern = like_pattern(text);
        let mut results = Vec::new();
        for kind in SUBSTRING_SEARCH_KINDS {
            let remaining = limit.saturating_sub(results.len());
            if remaining == 0 {
                break;
            }
            let table = kind_table(kind);
            let sql = format!(
                "SELECT * FROM {table} WHERE available = 1
                 AND ({title} LIKE ?1 ESCAPE '\\' OR summary LIKE ?1 ESCAPE '\\')
                 ORDER BY {title} COLLATE NOCASE ASC, {key} ASC
                 LIMIT ?2",
                table = table.table,
                title = table.title,
                key = table.key
            );
            results.extend(
                Self::query_records(conn, kind, &sql, params![pattern, sql_count(remaining)])?
                    .into_iter()
                    .map(Record::tagged),
            );
        }
        Ok(results)
    }

    fn list_recent_inner(conn: &Connection, limit: usize) -> Result<Vec<TaggedRecord>> {
        let mut merged = Vec::new();
        for kind in RECENT_KINDS {
            let sql = format!(
                "SELECT * FROM {} WHERE available = 1
                 ORDER BY datetime(lastSeen) DESC, lastSeen DESC
                 LIMIT ?1",
                kind_table(kind).table
            );
            merged.extend(
                Self::query_records(conn, kind, &sql, params![sql_count(limit)])?
                    .into_iter()
                    .map(Record::tagged),
            );
        }
        sort_most_recent_first(&mut merged);
        merged.truncate(limit);
        Ok(merged)
    }
}

/// Logs a failed read and substitutes the empty value.
fn demote<T: Default>(operation: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(operation, error = %e, "Mirror read failed");
            T::default()
        }
    }
}

impl MirrorStore for SqliteMirrorStore {
    fn is_open(&self) -> bool {
        true
    }

    fn list_by_kind(&self, kind: MediaKind, limit: usize, offset: usize) -> Vec<Record> {
        demote(
            "list_by_kind",
            self.with_conn(|conn| Self::list_by_kind_inner(conn, kind, limit, offset)),
        )
    }

    fn get_by_id(&self, kind: MediaKind, id: i64) -> Option<Record> {
        demote(
            "get_by_id",
            self.with_conn(|conn| Self::get_by_id_inner(conn, kind, id)),
        )
    }

    fn list_children(&self, parent_kind: MediaKind, parent_id: i64) -> Vec<Record> {
        demote(
            "list_children",
            self.with_conn(|conn| Self::list_children_inner(conn, parent_kind, parent_id)),
        )
    }

    fn search(&self, text: &str, limit: usize) -> Vec<TaggedRecord> {
        let text = text.trim();
        if text.is_empty() || limit == 0 {
            return Vec::new();
        }
        demote(
            "search",
            self.with_conn(|conn| {
                match Self::search_index_inner(conn, text, limit) {
                    Ok(hits) if !hits.is_empty() => return Ok(hits),
                    Ok(_) => debug!("No full-text hits for {:?}, using substring match", text),
                    Err(e) if is_missing_table(&e) => {
                        debug!("No full-text index, using substring match")
                    }
                    Err(e) => warn!(
                        error = %e,
                        "Full-text search failed, using substring match"
                    ),
                }
                Self::search_substring_inner(conn, text, limit)
            }),
        )
    }

    fn list_recent(&self, limit: usize) -> Vec<TaggedRecord> {
        if limit == 0 {
            return Vec::new();
        }
        demote(
            "list_recent",
            self.with_conn(|conn| Self::list_recent_inner(conn, limit)),
        )
    }
}
