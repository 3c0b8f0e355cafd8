use std::env;

use serde::Deserialize;

/// Default catalogs crawled when `SYNC_FAMILY_SOURCES` is not set.
const DEFAULT_FAMILY_SOURCES: &[&str] = &[
    "https://sreday.com",
    "https://llmday.com",
    "https://devopsnotts.com",
];
const DEFAULT_CONF42_URL: &str = "https://www.conf42.com/events.yml";
const DEFAULT_CONF42_SITE: &str = "https://www.conf42.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Master switch for the background catalog sync (`SYNC_ENABLED`).
    pub enabled: bool,
    /// Delay between the end of one run and the start of the next.
    pub interval_seconds: u64,
    /// Ordered organizer user ids. The first one becomes the creator of new events.
    pub organizer_ids: Vec<String>,
    pub family_sources: Vec<FamilySourceConfig>,
    /// URL of the flat conf42 catalog document.
    pub conf42_url: String,
    /// Site base used to build conf42 event websites.
    pub conf42_site: String,
    pub http_timeout_seconds: u64,
    /// Shared secret for `POST /api/sync/run`. Manual runs are refused when unset.
    pub admin_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FamilySourceConfig {
    pub base_url: String,
    /// The home source owns its own slug namespace and gets no prefix.
    pub home: bool,
}

impl FamilySourceConfig {
    /// Parse one `SYNC_FAMILY_SOURCES` entry: a base URL, optionally prefixed with `home:`.
    pub fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }
        let (home, url) = match entry.strip_prefix("home:") {
            Some(rest) => (true, rest.trim()),
            None => (false, entry),
        };
        if url.is_empty() {
            return None;
        }
        Some(Self {
            base_url: url.trim_end_matches('/').to_string(),
            home,
        })
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => true,
        "0" | "false" | "no" => false,
        _ => default,
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Sync interval in seconds. Zero would turn the scheduler into a busy loop.
fn parse_interval_seconds(value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(seconds),
        _ => Err(ConfigError::InvalidValue(
            "SYNC_INTERVAL_SECONDS".to_string(),
        )),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let family_sources = match env::var("SYNC_FAMILY_SOURCES") {
            Ok(v) => {
                let sources: Vec<FamilySourceConfig> = v
                    .split(',')
                    .filter_map(FamilySourceConfig::parse)
                    .collect();
                if sources.is_empty() {
                    return Err(ConfigError::InvalidValue("SYNC_FAMILY_SOURCES".to_string()));
                }
                sources
            }
            Err(_) => default_family_sources(),
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://data/app.db".to_string()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
            sync: SyncConfig {
                enabled: env::var("SYNC_ENABLED")
                    .map(|v| parse_bool(&v, true))
                    .unwrap_or(true),
                interval_seconds: parse_interval_seconds(
                    &env::var("SYNC_INTERVAL_SECONDS").unwrap_or_else(|_| "3600".to_string()),
                )?,
                organizer_ids: env::var("SYNC_ORGANIZER_IDS")
                    .map(|v| parse_list(&v))
                    .unwrap_or_default(),
                family_sources,
                conf42_url: env::var("SYNC_CONF42_URL")
                    .unwrap_or_else(|_| DEFAULT_CONF42_URL.to_string()),
                conf42_site: env::var("SYNC_CONF42_SITE")
                    .unwrap_or_else(|_| DEFAULT_CONF42_SITE.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                http_timeout_seconds: env::var("SYNC_HTTP_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
                admin_token: env::var("SYNC_ADMIN_TOKEN")
                    .ok()
                    .filter(|t| !t.trim().is_empty()),
            },
        })
    }
}

impl SyncConfig {
    /// Sync runs only when switched on and someone can own the created events.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.organizer_ids.is_empty()
    }
}

fn default_family_sources() -> Vec<FamilySourceConfig> {
    DEFAULT_FAMILY_SOURCES
        .iter()
        .filter_map(|s| FamilySourceConfig::parse(s))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://data/app.db".to_string(),
                max_connections: 5,
            },
            sync: SyncConfig {
                enabled: true,
                interval_seconds: 3600,
                organizer_ids: Vec::new(),
                family_sources: default_family_sources(),
                conf42_url: DEFAULT_CONF42_URL.to_string(),
                conf42_site: DEFAULT_CONF42_SITE.to_string(),
                http_timeout_seconds: 30,
                admin_token: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_source_entry_parsing() {
        assert_eq!(
            FamilySourceConfig::parse(" https://sreday.com/ "),
            Some(FamilySourceConfig {
                base_url: "https://sreday.com".to_string(),
                home: false,
            })
        );
        assert_eq!(
            FamilySourceConfig::parse("home:https://cfp.example.com"),
            Some(FamilySourceConfig {
                base_url: "https://cfp.example.com".to_string(),
                home: true,
            })
        );
        assert_eq!(FamilySourceConfig::parse("home:"), None);
        assert_eq!(FamilySourceConfig::parse("  "), None);
    }

    #[test]
    fn organizer_list_parsing_skips_blanks() {
        assert_eq!(parse_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn interval_must_be_positive() {
        assert_eq!(parse_interval_seconds("3600").unwrap(), 3600);
        assert_eq!(parse_interval_seconds(" 60 ").unwrap(), 60);
        assert!(matches!(
            parse_interval_seconds("0"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(parse_interval_seconds("-5").is_err());
        assert!(parse_interval_seconds("hourly").is_err());
    }

    #[test]
    fn sync_is_gated_on_organizers() {
        let mut config = Config::default();
        assert!(!config.sync.is_active());
        config.sync.organizer_ids = vec!["u1".to_string()];
        assert!(config.sync.is_active());
        config.sync.enabled = false;
        assert!(!config.sync.is_active());
    }

    #[test]
    fn default_sources_are_prefixed() {
        let config = Config::default();
        assert_eq!(config.sync.family_sources.len(), 3);
        assert!(config.sync.family_sources.iter().all(|s| !s.home));
    }
}
