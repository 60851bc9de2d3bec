use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use plex_mirror::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SEC,
    DEFAULT_READ_POOL_SIZE, DEFAULT_TIMEOUT_MS,
};
use plex_mirror::{run_server, RequestsLoggingLevel, Resolver, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite mirror database written by the sync job.
    #[clap(long, env = "DB_PATH", value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Base URL of the Plex server.
    #[clap(long, env = "PLEX_URL")]
    pub plex_url: Option<String>,

    /// Plex access token.
    #[clap(long, env = "PLEX_TOKEN", hide_env_values = true)]
    pub plex_token: Option<String>,

    /// Serve from the mirror only, never contacting the Plex server.
    #[clap(long)]
    pub offline: bool,

    /// Timeout in milliseconds for each Plex request.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// How long live results stay cached, in seconds. 0 disables the cache.
    #[clap(long, default_value_t = DEFAULT_CACHE_TTL_SEC)]
    pub cache_ttl_sec: u64,

    /// Maximum number of cached live results.
    #[clap(long, default_value_t = DEFAULT_CACHE_MAX_ENTRIES)]
    pub cache_max_entries: usize,

    /// Number of read connections to the mirror database.
    #[clap(long, default_value_t = DEFAULT_READ_POOL_SIZE)]
    pub read_pool_size: usize,
}

impl Debug for CliArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliArgs")
            .field("config", &self.config)
            .field("db_path", &self.db_path)
            .field("port", &self.port)
            .field("plex_url", &self.plex_url)
            .field("offline", &self.offline)
            .finish_non_exhaustive()
    }
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            plex_url: self.plex_url.clone(),
            plex_token: self.plex_token.clone(),
            offline: self.offline,
            timeout_ms: self.timeout_ms,
            cache_ttl_sec: self.cache_ttl_sec,
            cache_max_entries: self.cache_max_entries,
            read_pool_size: self.read_pool_size,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}...", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    info!("Resolved configuration: {:?}", config);

    info!("Opening mirror database at {:?}...", config.db_path);
    let resolver = Resolver::from_config(&config)?;

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level.clone(),
        port: config.port,
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(server_config, Arc::new(resolver)).await
}
