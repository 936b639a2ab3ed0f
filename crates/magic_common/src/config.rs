//! Tracker configuration.
//!
//! Config file: `~/.config/magic/config.toml`, overridable with
//! `$MAGIC_CONFIG` or an explicit path. Every section is optional.

use crate::session::SessionOptions;
use crate::sqlite_store::SqliteStore;
use anyhow::{bail, Context, Result};
use magic_shared::streaks::DEFAULT_MAX_LOOKBACK_DAYS;
use magic_shared::voting::{VotingRules, DEFAULT_BATCHES_REQUIRED, DEFAULT_BATCH_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "MAGIC_CONFIG";

/// Store location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database path; defaults to ~/.local/share/magic/tracker.db
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(SqliteStore::default_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Upper bound on the backward streak walk
    #[serde(default = "default_lookback")]
    pub max_lookback_days: u32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Items per ranking batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Batches to submit before the day counts as ranked
    #[serde(default = "default_batches_required")]
    pub batches_required: u32,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batches_required: DEFAULT_BATCHES_REQUIRED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_lookback() -> u32 {
    DEFAULT_MAX_LOOKBACK_DAYS
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_batches_required() -> u32 {
    DEFAULT_BATCHES_REQUIRED
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Main tracker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MagicConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub streak: StreakConfig,

    #[serde(default)]
    pub voting: VotingConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl MagicConfig {
    /// Default user config path: ~/.config/magic/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("magic").join("config.toml"))
    }

    /// Load and validate a config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: MagicConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. Explicit path
    /// 2. $MAGIC_CONFIG
    /// 3. User config (~/.config/magic/config.toml) if it exists
    /// 4. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&env_path));
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.streak.max_lookback_days == 0 {
            bail!("streak.max_lookback_days must be at least 1");
        }
        if self.voting.batch_size == 0 || self.voting.batch_size > u8::MAX as usize {
            bail!(
                "voting.batch_size must be between 1 and {}, got {}",
                u8::MAX,
                self.voting.batch_size
            );
        }
        if self.voting.batches_required == 0 {
            bail!("voting.batches_required must be at least 1");
        }
        Ok(())
    }

    pub fn voting_rules(&self) -> VotingRules {
        VotingRules {
            batch_size: self.voting.batch_size,
            batches_required: self.voting.batches_required,
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            max_lookback_days: self.streak.max_lookback_days,
            voting: self.voting_rules(),
        }
    }
}
