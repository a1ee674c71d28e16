//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to load layered config: {0}")]
    SourceError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Prefix for environment overrides, e.g. `TWLOG__API__API_KEY`.
pub const ENV_PREFIX: &str = "TWLOG";

/// Our guild identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildConfig {
    /// Own guild id; decides which attacks are ours
    #[serde(default = "default_guild_id")]
    pub id: String,

    /// Display name used in reports
    #[serde(default = "default_guild_name")]
    pub name: String,

    /// Player whose log feed is fetched upstream
    #[serde(default)]
    pub ally_code: String,
}

fn default_guild_id() -> String {
    "BQ4f8IJyRma4IWSSCurp4Q".to_string()
}

fn default_guild_name() -> String {
    "DarthJedii56".to_string()
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            id: default_guild_id(),
            name: default_guild_name(),
            ally_code: String::new(),
        }
    }
}

/// Report thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Attacking players below this total are underperformers
    #[serde(default = "default_min_banners")]
    pub min_banners: u32,

    /// Attacks needed to count as offensive participation
    #[serde(default = "default_min_attacks")]
    pub min_attacks: u32,

    #[serde(default = "default_top_performers_limit")]
    pub top_performers_limit: usize,

    #[serde(default = "default_leader_limit")]
    pub leader_limit: usize,
}

fn default_min_banners() -> u32 {
    50
}

fn default_min_attacks() -> u32 {
    1
}

fn default_top_performers_limit() -> usize {
    10
}

fn default_leader_limit() -> usize {
    50
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_banners: default_min_banners(),
            min_attacks: default_min_attacks(),
            top_performers_limit: default_top_performers_limit(),
            leader_limit: default_leader_limit(),
        }
    }
}

/// Banners awarded for placing defense. Game-economy constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerConfig {
    #[serde(default = "default_squad_deploy_bonus")]
    pub squad_deploy_bonus: u32,

    #[serde(default = "default_fleet_deploy_bonus")]
    pub fleet_deploy_bonus: u32,
}

fn default_squad_deploy_bonus() -> u32 {
    30
}

fn default_fleet_deploy_bonus() -> u32 {
    34
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            squad_deploy_bonus: default_squad_deploy_bonus(),
            fleet_deploy_bonus: default_fleet_deploy_bonus(),
        }
    }
}

/// Activity-log marker strings and status codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventKeys {
    #[serde(default = "default_win_key")]
    pub win: String,

    #[serde(default = "default_empty_key")]
    pub empty: String,

    /// Defense placement marker, shared by squads and fleets
    #[serde(default = "default_deploy_key")]
    pub deploy: String,

    /// Separate fleet placement marker, for feeds that have one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_deploy: Option<String>,

    /// Leader id prefix that marks a placement as a fleet
    #[serde(default = "default_fleet_leader_prefix")]
    pub fleet_leader_prefix: String,

    /// Separator between base unit id and tier suffix
    #[serde(default = "default_leader_separator")]
    pub leader_separator: String,

    /// `squadStatus` value that marks a defeated squad
    #[serde(default = "default_win_status")]
    pub win_status: i64,

    /// `squadStatus` value of a transient lock; never retained
    #[serde(default = "default_lock_status")]
    pub lock_status: i64,
}

fn default_win_key() -> String {
    "TERRITORY_CHANNEL_ACTIVITY_CONFLICT_SQUAD_WIN".to_string()
}

fn default_empty_key() -> String {
    "TERRITORY_CHANNEL_ACTIVITY_CONFLICT_EMPTY".to_string()
}

fn default_deploy_key() -> String {
    "TERRITORY_CHANNEL_ACTIVITY_CONFLICT_DEFENSE_DEPLOY".to_string()
}

fn default_fleet_leader_prefix() -> String {
    "CAPITAL".to_string()
}

fn default_leader_separator() -> String {
    ":".to_string()
}

fn default_win_status() -> i64 {
    3
}

fn default_lock_status() -> i64 {
    2
}

impl Default for EventKeys {
    fn default() -> Self {
        Self {
            win: default_win_key(),
            empty: default_empty_key(),
            deploy: default_deploy_key(),
            fleet_deploy: None,
            fleet_leader_prefix: default_fleet_leader_prefix(),
            leader_separator: default_leader_separator(),
            win_status: default_win_status(),
            lock_status: default_lock_status(),
        }
    }
}

/// Upstream data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub discord_id: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_base_url() -> String {
    "https://mhanndalorianbot.work".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            api_key: String::new(),
            discord_id: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.discord_id.is_empty()
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub guild: GuildConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub banners: BannerConfig,

    #[serde(default)]
    pub event_keys: EventKeys,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            guild: GuildConfig::default(),
            analysis: AnalysisConfig::default(),
            banners: BannerConfig::default(),
            event_keys: EventKeys::default(),
            api: ApiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an optional TOML file layered under `TWLOG__*` environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guild.id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Guild id must not be empty".to_string(),
            ));
        }

        if self.analysis.min_attacks == 0 {
            return Err(ConfigError::ValidationError(
                "Minimum attacks must be greater than 0".to_string(),
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
