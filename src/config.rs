//! Node configuration read from the environment (after loading `.env`).

use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::{DEFAULT_DIFFICULTY, MAX_DIFFICULTY};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    /// Peers registered (and synced with) before the server starts.
    pub bootstrap_peers: Vec<String>,
    pub peer_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            difficulty: DEFAULT_DIFFICULTY,
            bootstrap_peers: Vec::new(),
            peer_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("HOST") {
            cfg.host = host;
        }
        if let Some(port) = lookup("PORT") {
            cfg.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                expected: "a port number",
                value: port.clone(),
            })?;
        }
        if let Some(raw) = lookup("DIFFICULTY") {
            cfg.difficulty = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|d| (1..=MAX_DIFFICULTY).contains(d))
                .ok_or(ConfigError::Invalid {
                    key: "DIFFICULTY",
                    expected: "an integer between 1 and 64",
                    value: raw.clone(),
                })?;
        }
        if let Some(peers) = lookup("PEERS") {
            cfg.bootstrap_peers = peers
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(raw) = lookup("PEER_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Invalid {
                    key: "PEER_TIMEOUT_SECS",
                    expected: "a positive number of seconds",
                    value: raw.clone(),
                })?;
            cfg.peer_timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }
}
