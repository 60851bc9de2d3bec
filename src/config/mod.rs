mod file_config;

pub use file_config::{CacheConfig, FileConfig, RemoteConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_CACHE_TTL_SEC: u64 = 300;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub plex_url: Option<String>,
    pub plex_token: Option<String>,
    pub offline: bool,
    pub timeout_ms: u64,
    pub cache_ttl_sec: u64,
    pub cache_max_entries: usize,
    pub read_pool_size: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            port: 3001,
            logging_level: RequestsLoggingLevel::Path,
            plex_url: None,
            plex_token: None,
            offline: false,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cache_ttl_sec: DEFAULT_CACHE_TTL_SEC,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            read_pool_size: DEFAULT_READ_POOL_SIZE,
        }
    }
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("db_path", &self.db_path)
            .field("port", &self.port)
            .field("logging_level", &self.logging_level)
            .field("plex_url", &self.plex_url)
            .field("plex_token", &self.plex_token.as_ref().map(|_| "<redacted>"))
            .field("offline", &self.offline)
            .field("timeout_ms", &self.timeout_ms)
            .field("cache_ttl_sec", &self.cache_ttl_sec)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("read_pool_size", &self.read_pool_size)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub read_pool_size: usize,
    pub remote: RemoteSettings,
    pub cache: CacheSettings,
}

#[derive(Clone)]
pub struct RemoteSettings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub live_mode: bool,
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSettings")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("live_mode", &self.live_mode)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let read_pool_size = file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        let remote_file = file.remote.unwrap_or_default();
        let url = non_blank(remote_file.url).or_else(|| non_blank(cli.plex_url.clone()));
        if let Some(url) = &url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("Media server URL must start with http:// or https://: {}", url);
            }
        }
        let token = non_blank(remote_file.token).or_else(|| non_blank(cli.plex_token.clone()));

        let live_mode = if cli.offline || cfg!(feature = "offline") {
            false
        } else {
            remote_file.live_mode.unwrap_or(true)
        };

        let timeout_ms = remote_file.timeout_ms.unwrap_or(cli.timeout_ms);
        if timeout_ms == 0 {
            bail!("timeout_ms must be greater than 0");
        }

        let cache_file = file.cache.unwrap_or_default();
        let cache = CacheSettings {
            ttl: Duration::from_secs(cache_file.ttl_sec.unwrap_or(cli.cache_ttl_sec)),
            max_entries: cache_file.max_entries.unwrap_or(cli.cache_max_entries),
        };

        Ok(Self {
            db_path,
            port,
            logging_level,
            read_pool_size,
            remote: RemoteSettings {
                url,
                token,
                live_mode,
                timeout: Duration::from_millis(timeout_ms),
            },
            cache,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
