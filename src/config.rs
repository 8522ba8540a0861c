//! Environment-derived server configuration (spec §6.3).

use std::env;
use std::time::Duration;

/// Server-wide options, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub idle_room_timeout: Duration,
    pub reconnect_grace: Duration,
    pub max_rooms: usize,
    pub min_players: usize,
    pub log_level: String,
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            idle_room_timeout: Duration::from_secs(15 * 60),
            reconnect_grace: Duration::from_secs(60),
            max_rooms: 1000,
            min_players: 3,
            log_level: "info".to_string(),
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    /// Loads configuration from the environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_parsed("WARLOCK_PORT", defaults.port),
            idle_room_timeout: Duration::from_secs(env_parsed(
                "WARLOCK_IDLE_TIMEOUT_SECS",
                defaults.idle_room_timeout.as_secs(),
            )),
            reconnect_grace: Duration::from_secs(env_parsed(
                "WARLOCK_RECONNECT_GRACE_SECS",
                defaults.reconnect_grace.as_secs(),
            )),
            max_rooms: env_parsed("WARLOCK_MAX_ROOMS", defaults.max_rooms),
            min_players: env_parsed("WARLOCK_MIN_PLAYERS", defaults.min_players),
            log_level: env::var("WARLOCK_LOG_LEVEL").unwrap_or(defaults.log_level),
            allowed_origins: env::var("WARLOCK_ALLOWED_ORIGINS")
                .map(|raw| raw.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.allowed_origins),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
