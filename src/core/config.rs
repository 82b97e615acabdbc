//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.trailview/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::access::TravelMode;
use crate::osm::api::{DEFAULT_OSM_API_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TrailviewConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub osm: OsmConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_mode: Option<String>,
    /// Fragment to load at startup, e.g. `selected=way/123&style=horse`.
    pub initial_fragment: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OsmConfig {
    pub api_base_url: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub mode: TravelMode,
    pub osm_api_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub fragment: String,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub mode: Option<TravelMode>,
    pub fragment: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.trailview/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".trailview").join("config.toml"))
}

/// Load config from `~/.trailview/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TrailviewConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TrailviewConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TrailviewConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(TrailviewConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<TrailviewConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

const DEFAULT_CONFIG: &str = r#"# trailview configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_mode = "foot"              # foot, wheelchair, bicycle, horse, atv, canoe, snowmobile
# initial_fragment = "selected=way/123"

# [osm]
# api_base_url = "https://api.openstreetmap.org/api/0.6"   # Or set TRAILVIEW_OSM_API
# user_agent = "trailview/0.1"
# request_timeout_secs = 20
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TrailviewConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |name| std::env::var(name).ok())
}

fn resolve_with_env(
    config: &TrailviewConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Mode: CLI → env → config → default. Unknown names fall through.
    let mode = cli.mode.unwrap_or_else(|| {
        env("TRAILVIEW_MODE")
            .and_then(|name| parse_mode(&name, "TRAILVIEW_MODE"))
            .or_else(|| {
                config
                    .general
                    .default_mode
                    .as_deref()
                    .and_then(|name| parse_mode(name, "default_mode"))
            })
            .unwrap_or_default()
    });

    // OSM API base URL: env → config → default
    let osm_api_base_url = env("TRAILVIEW_OSM_API")
        .or_else(|| config.osm.api_base_url.clone())
        .unwrap_or_else(|| DEFAULT_OSM_API_BASE_URL.to_string());

    let fragment = cli
        .fragment
        .clone()
        .or_else(|| config.general.initial_fragment.clone())
        .unwrap_or_default();

    ResolvedConfig {
        mode,
        osm_api_base_url,
        user_agent: config
            .osm
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        request_timeout_secs: config
            .osm
            .request_timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        fragment,
    }
}

fn parse_mode(name: &str, origin: &str) -> Option<TravelMode> {
    match name.parse() {
        Ok(mode) => Some(mode),
        Err(e) => {
            warn!("Ignoring {}: {}", origin, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&TrailviewConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.mode, TravelMode::Foot);
        assert_eq!(resolved.osm_api_base_url, DEFAULT_OSM_API_BASE_URL);
        assert_eq!(resolved.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(resolved.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(resolved.fragment, "");
    }

    #[test]
    fn test_toml_values_override_defaults() {
        let config = parse_config(
            r#"
[general]
default_mode = "horse"
initial_fragment = "selected=relation/5"

[osm]
api_base_url = "http://localhost:3000/api/0.6"
user_agent = "test-agent"
request_timeout_secs = 5
"#,
        )
        .unwrap();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.mode, TravelMode::Horse);
        assert_eq!(resolved.osm_api_base_url, "http://localhost:3000/api/0.6");
        assert_eq!(resolved.user_agent, "test-agent");
        assert_eq!(resolved.request_timeout_secs, 5);
        assert_eq!(resolved.fragment, "selected=relation/5");
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let config = parse_config("[general]\ndefault_mode = \"horse\"\n[osm]\napi_base_url = \"http://file\"\n").unwrap();
        let env = |name: &str| match name {
            "TRAILVIEW_MODE" => Some("bicycle".to_string()),
            "TRAILVIEW_OSM_API" => Some("http://env".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.mode, TravelMode::Bicycle);
        assert_eq!(resolved.osm_api_base_url, "http://env");

        let cli = CliOverrides {
            mode: Some(TravelMode::Wheelchair),
            fragment: Some("style=atv".to_string()),
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.mode, TravelMode::Wheelchair);
        assert_eq!(resolved.fragment, "style=atv");
    }

    #[test]
    fn test_unknown_mode_name_falls_through() {
        let config = parse_config("[general]\ndefault_mode = \"horse\"\n").unwrap();
        let env = |name: &str| (name == "TRAILVIEW_MODE").then(|| "hovercraft".to_string());
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.mode, TravelMode::Horse);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config = parse_config("[osm]\nrequest_timeout_secs = 3\n").unwrap();
        assert_eq!(config.osm.request_timeout_secs, Some(3));
        assert!(config.general.default_mode.is_none());
        assert!(config.osm.api_base_url.is_none());
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(parse_config("[osm\n"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert!(config.general.default_mode.is_none());
    }
}
