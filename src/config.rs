use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use tracing::{info, warn};

use crate::auth::MAX_TOKEN_TTL_HOURS;

/// Server configuration for BitPOS
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the HTTP server binds to
    pub bind_address: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens in hours
    pub token_ttl_hours: i64,
}

/// Update structure for Config with all fields optional
///
/// This is also the shape of `config.toml`. `server_url` is only read by
/// the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_ttl_hours: Option<i64>,
    /// Server the CLI talks to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[clap(name = "bitpos", about = "Bitcoin point-of-sale server")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind to
    #[clap(long, env = "BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Port to listen on
    #[clap(long, env = "PORT")]
    pub port: Option<u16>,

    /// Secret used to sign bearer tokens
    #[clap(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Token lifetime in hours
    #[clap(
        long,
        env = "TOKEN_TTL_HOURS",
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_HOURS)
    )]
    pub token_ttl_hours: Option<i64>,

    /// Debug mode
    #[clap(long, env = "BITPOS_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Insert the demo vendor, customer and products before serving
    #[clap(long, default_value_t = false)]
    pub seed: bool,
}

/// Secret used when none is configured. Fine for the demo, never for production.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key";

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            bind_address: update.bind_address.unwrap_or(self.bind_address),
            port: update.port.unwrap_or(self.port),
            jwt_secret: update.jwt_secret.unwrap_or(self.jwt_secret),
            token_ttl_hours: update.token_ttl_hours.unwrap_or(self.token_ttl_hours),
        }
    }

    /// Checks values that a config file can set out of range
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(format!(
                "token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS, self.token_ttl_hours
            ));
        }
        Ok(())
    }

    /// The `host:port` string to bind the listener to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Returns the base (default) configuration
///
/// The database lives in `config_path` when one is given.
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("bitpos.db".to_string(), |path| {
        path.join("bitpos.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        bind_address: "0.0.0.0".to_string(),
        port: 3000,
        jwt_secret: DEFAULT_JWT_SECRET.to_string(),
        token_ttl_hours: 24 * 7,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or file yields an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        warn!("Failed to read config file: {}", e);
        format!("Failed to read config file: {}", e)
    })?;

    toml::from_str::<ConfigUpdate>(&content)
        .map(|config| {
            info!("Loaded configuration from {:?}", config_path);
            config
        })
        .map_err(|e| {
            warn!("Failed to parse config file: {}", e);
            format!("Failed to parse config file: {}", e)
        })
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        bind_address: args.bind_address,
        port: args.port,
        jwt_secret: args.jwt_secret,
        token_ttl_hours: args.token_ttl_hours,
        server_url: None,
    }
}

/// Returns the platform config directory if it exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "bitpos", "bitpos") else {
        warn!("Could not determine XDG config directory, skipping config file");
        return None;
    };

    let path = proj_dirs.config_dir().to_path_buf();
    if path.exists() {
        Some(path)
    } else {
        info!("Config path not found at {:?}, using defaults", path);
        None
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
///
/// ### Errors
///
/// Returns an error if the merged configuration fails [`Config::validate`]
pub fn get_config(args: CliArgs) -> Result<Config, String> {
    let config_path = get_config_dir_path();

    let base = base_config(config_path.clone());
    let config = base
        .apply_update(config_from_file(config_path.map(|dir| dir.join("config.toml"))).unwrap_or_default())
        .apply_update(config_from_args(args));
    config.validate()?;

    if config.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret; set JWT_SECRET outside of demos");
    }
    info!(
        "Final configuration: database_url={}, listen={}, token_ttl={}h",
        config.database_url,
        config.listen_address(),
        config.token_ttl_hours
    );

    Ok(config)
}
