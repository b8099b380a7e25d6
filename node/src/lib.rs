use pc28_types::constants::{
    BLOCKS_PER_ISSUE, FETCH_TIMEOUT_MS, INITIAL_HOUSE_BALANCE, INITIAL_PLAYER_BALANCE, LOCK_MARGIN,
    POLL_INTERVAL_MS,
};
use pc28_types::{default_games, GameConfig};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

pub mod ingress;
pub mod poller;

/// Configuration for the node service, loaded from YAML.
#[derive(Deserialize, Serialize)]
pub struct Config {
    /// TronGrid-compatible node URL.
    pub node_url: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    #[serde(default = "default_blocks_per_issue")]
    pub blocks_per_issue: u64,
    #[serde(default = "default_lock_margin")]
    pub lock_margin: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_player_balance")]
    pub player_balance: u64,
    #[serde(default = "default_house_balance")]
    pub house_balance: i64,

    /// Game catalog override; the stock catalog when omitted.
    #[serde(default)]
    pub games: Option<Vec<GameConfig>>,
}

fn default_poll_interval_ms() -> u64 {
    POLL_INTERVAL_MS
}

fn default_fetch_timeout_ms() -> u64 {
    FETCH_TIMEOUT_MS
}

fn default_blocks_per_issue() -> u64 {
    BLOCKS_PER_ISSUE
}

fn default_lock_margin() -> u64 {
    LOCK_MARGIN
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_player_balance() -> u64 {
    INITIAL_PLAYER_BALANCE
}

fn default_house_balance() -> i64 {
    INITIAL_HOUSE_BALANCE
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("lock_margin {margin} must be between 1 and blocks_per_issue {blocks}")]
    InvalidLockMargin { margin: u64, blocks: u64 },
}

/// A [`Config`] whose fields have been checked and parsed.
pub struct ValidatedConfig {
    pub node_url: String,
    pub poll_interval: Duration,
    pub fetch_timeout: Duration,
    pub blocks_per_issue: u64,
    pub lock_margin: u64,
    pub log_level: Level,
    pub player_balance: u64,
    pub house_balance: i64,
    pub games: Vec<GameConfig>,
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "poll_interval_ms",
                value: self.poll_interval_ms,
            });
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "fetch_timeout_ms",
                value: self.fetch_timeout_ms,
            });
        }
        if self.blocks_per_issue == 0 {
            return Err(ConfigError::InvalidNonZero {
                field: "blocks_per_issue",
                value: self.blocks_per_issue,
            });
        }
        // A zero margin would leave no lock window at all; a margin past the
        // issue length would never open one.
        if self.lock_margin == 0 || self.lock_margin > self.blocks_per_issue {
            return Err(ConfigError::InvalidLockMargin {
                margin: self.lock_margin,
                blocks: self.blocks_per_issue,
            });
        }

        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        Ok(ValidatedConfig {
            node_url: self.node_url,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
            blocks_per_issue: self.blocks_per_issue,
            lock_margin: self.lock_margin,
            log_level,
            player_balance: self.player_balance,
            house_balance: self.house_balance,
            games: self.games.unwrap_or_else(default_games),
        })
    }
}
