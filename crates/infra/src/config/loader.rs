//! Configuration loader
//!
//! Loads application configuration from a file and layers environment
//! overrides on top.
//!
//! ## Loading Strategy
//! 1. `STUDYSYNC_CONFIG` names an explicit file (must exist)
//! 2. Otherwise the standard locations are searched; if none exists the
//!    built-in defaults are used
//! 3. Environment overrides are applied
//! 4. The result is validated
//!
//! ## Environment Variables
//! - `STUDYSYNC_CONFIG`: Path to the config file
//! - `STUDYSYNC_DB_PATH`: Database file path
//! - `STUDYSYNC_BIND_ADDR`: HTTP listen address
//! - `STUDYSYNC_SECRET_KEY`: Session signing key (required, never read from
//!   the file)
//!
//! ## File Locations
//! The loader searches the following paths in the working directory (in
//! order): `studysync.toml`, `studysync.json`, `config.toml`, `config.json`.

use std::path::{Path, PathBuf};

use studysync_domain::{Config, Result, Secret, StudySyncError};

/// Explicit config file path; a missing file is an error.
pub const CONFIG_PATH_ENV: &str = "STUDYSYNC_CONFIG";
/// Overrides `database.path`.
pub const DB_PATH_ENV: &str = "STUDYSYNC_DB_PATH";
/// Overrides `server.bind_addr`.
pub const BIND_ADDR_ENV: &str = "STUDYSYNC_BIND_ADDR";
/// The only source of `session.secret_key`.
pub const SECRET_KEY_ENV: &str = "STUDYSYNC_SECRET_KEY";

const CANDIDATE_FILE_NAMES: [&str; 4] =
    ["studysync.toml", "studysync.json", "config.toml", "config.json"];

/// Load configuration from the process environment and the file system.
///
/// # Errors
/// Returns `StudySyncError::Config` if the file cannot be read or parsed,
/// or if the merged configuration fails validation (for example a missing
/// `STUDYSYNC_SECRET_KEY`).
pub fn load() -> Result<Config> {
    load_with_env(|key| std::env::var(key).ok())
}

/// Load configuration, reading environment variables through `env`.
///
/// # Errors
/// See [`load`].
pub fn load_with_env<F>(env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = env(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()).map(PathBuf::from);

    let mut config = match explicit {
        Some(path) => load_from_file(Some(path))?,
        None => match discover_config_path() {
            Some(path) => load_from_file(Some(path))?,
            None => {
                tracing::info!("No config file found; using built-in defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config, &env);
    config.validate()?;

    tracing::info!(
        db_path = %config.database.path,
        bind_addr = %config.server.bind_addr,
        time_zone = %config.study.time_zone,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Environment overrides and validation are not applied.
///
/// # Errors
/// Returns `StudySyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(StudySyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => discover_config_path().ok_or_else(|| {
            StudySyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| StudySyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Search the working directory for a configuration file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn discover_config_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_in(&cwd)
}

fn discover_in(dir: &Path) -> Option<PathBuf> {
    CANDIDATE_FILE_NAMES.iter().map(|name| dir.join(name)).find(|path| path.exists())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `StudySyncError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| StudySyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| StudySyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(StudySyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn apply_env_overrides<F>(config: &mut Config, env: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = non_empty(env(DB_PATH_ENV)) {
        config.database.path = path;
    }
    if let Some(addr) = non_empty(env(BIND_ADDR_ENV)) {
        config.server.bind_addr = addr;
    }
    if let Some(key) = non_empty(env(SECRET_KEY_ENV)) {
        config.session.secret_key = Secret::new(key);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
