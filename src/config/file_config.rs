use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub read_pool_size: Option<usize>,

    pub remote: Option<RemoteConfig>,
    pub cache: Option<CacheConfig>,
}

#[derive(Deserialize, Default, Clone)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub live_mode: Option<bool>,
    pub timeout_ms: Option<u64>,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("live_mode", &self.live_mode)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_sec: Option<u64>,
    pub max_entries: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_sections() {
        let config = FileConfig::parse(
            r#"
            db_path = "/data/plex_mirror.db"
            port = 4000

            [remote]
            url = "http://plex.lan:32400"
            token = "abc"
            timeout_ms = 1500

            [cache]
            ttl_sec = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.db_path.as_deref(), Some("/data/plex_mirror.db"));
        assert_eq!(config.port, Some(4000));
        let remote = config.remote.unwrap();
        assert_eq!(remote.timeout_ms, Some(1500));
        assert_eq!(remote.live_mode, None);
        assert_eq!(config.cache.unwrap().ttl_sec, Some(60));
    }

    #[test]
    fn debug_output_hides_token() {
        let remote = RemoteConfig {
            token: Some("super-secret".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", remote);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(FileConfig::parse("port = \"not a number\"").is_err());
    }
}
