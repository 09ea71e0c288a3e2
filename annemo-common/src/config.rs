//! Settings loading and layered resolution
//!
//! Priority order, highest first:
//! 1. Command-line argument
//! 2. Environment variable (both arrive through `SettingsOverrides`)
//! 3. TOML settings file
//! 4. Compiled default

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::{Error, Result};

/// File name probed in the working directory when no settings path is given
pub const LOCAL_CONFIG_FILE: &str = "annemo.toml";

/// How log files are keyed on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyLayout {
    /// One file per subject, content item and dimension
    #[default]
    PerStream,
    /// Legacy layout: one file per subject
    PerSubject,
}

impl fmt::Display for KeyLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyLayout::PerStream => f.write_str("per-stream"),
            KeyLayout::PerSubject => f.write_str("per-subject"),
        }
    }
}

impl FromStr for KeyLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "per-stream" => Ok(KeyLayout::PerStream),
            "per-subject" => Ok(KeyLayout::PerSubject),
            other => Err(Error::ConfigInvalid(format!(
                "unknown key layout '{}' (expected per-stream or per-subject)",
                other
            ))),
        }
    }
}

/// Logging section of the TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is unset
    pub level: Option<String>,
}

/// TOML settings file contents; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
    pub registry: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub key_layout: Option<KeyLayout>,
    pub sync_writes: Option<bool>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ConfigInvalid(format!("settings file: {}", e)))
    }

    /// Read a settings file; a missing file is a hard error here
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigInvalid(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_file: Option<PathBuf>,
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
    pub registry: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub key_layout: Option<KeyLayout>,
    pub sync_writes: Option<bool>,
    pub log_level: Option<String>,
}

/// Compiled fallback values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub bind: IpAddr,
    pub port: u16,
    pub registry: PathBuf,
    pub results_dir: PathBuf,
    pub key_layout: KeyLayout,
    pub sync_writes: bool,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3001,
            registry: PathBuf::from("config.json"),
            results_dir: PathBuf::from("results"),
            key_layout: KeyLayout::PerStream,
            sync_writes: false,
            log_level: "info".to_string(),
        }
    }
}

/// Fully resolved ingest service settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind: IpAddr,
    pub port: u16,
    pub registry: PathBuf,
    pub results_dir: PathBuf,
    pub key_layout: KeyLayout,
    pub sync_writes: bool,
    pub log_level: String,
}

impl Settings {
    /// Merge overrides, an optional settings file and compiled defaults
    pub fn resolve(overrides: SettingsOverrides, file: Option<TomlConfig>) -> Self {
        let defaults = CompiledDefaults::default();
        let file = file.unwrap_or_default();

        Self {
            bind: overrides.bind.or(file.bind).unwrap_or(defaults.bind),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            registry: overrides
                .registry
                .or(file.registry)
                .unwrap_or(defaults.registry),
            results_dir: overrides
                .results_dir
                .or(file.results_dir)
                .unwrap_or(defaults.results_dir),
            key_layout: overrides
                .key_layout
                .or(file.key_layout)
                .unwrap_or(defaults.key_layout),
            sync_writes: overrides
                .sync_writes
                .or(file.sync_writes)
                .unwrap_or(defaults.sync_writes),
            log_level: overrides
                .log_level
                .or(file.logging.level)
                .unwrap_or(defaults.log_level),
        }
    }

    /// Locate and read the settings file, then resolve
    ///
    /// An explicitly named file must exist. Otherwise `./annemo.toml` and
    /// `<config_dir>/annemo/config.toml` are probed; finding neither is fine.
    pub fn load(overrides: SettingsOverrides) -> Result<Self> {
        let file = match overrides.config_file.as_deref() {
            Some(path) => Some(TomlConfig::load(path)?),
            None => match discover_config_file() {
                Some(path) => {
                    info!("Using settings file {}", path.display());
                    Some(TomlConfig::load(&path)?)
                }
                None => {
                    debug!("No settings file found, using defaults");
                    None
                }
            },
        };
        Ok(Self::resolve(overrides, file))
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// First existing settings file among the well-known locations
fn discover_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|d| d.join("annemo").join("config.toml"))
        .filter(|p| p.is_file())
}
