//! Startup configuration file
//!
//! Config is loaded from (in order of precedence):
//! 1. `--config <path>` (must exist)
//! 2. `$XDG_CONFIG_HOME/dv/config.toml`
//! 3. `~/.config/dv/config.toml`
//! 4. Platform config dir (`~/Library/Application Support/dv/config.toml` on macOS)
//!
//! `--no-config` skips all of them.
//!
//! Example config:
//! ```toml
//! view = "split"
//! sidebar = false
//! theme = "tokyonight"
//! intraline-style = "underline"
//! show-symbols = true
//! ```
//!
//! A value from the file is used only when the matching flag was not given.

use crate::options::{parse_intraline_style, parse_layout, parse_theme, OptionError, StartupValues};
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "dv";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct StartupConfig {
    pub view: Option<String>,
    pub sidebar: Option<bool>,
    pub theme: Option<String>,
    pub intraline_style: Option<String>,
    pub show_symbols: Option<bool>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value for key {key:?} in {path:?}: {source}")]
    Invalid {
        key: &'static str,
        path: PathBuf,
        #[source]
        source: OptionError,
    },
}

/// Where startup config should come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Disabled,
    /// Given on the command line; missing is an error
    Required(PathBuf),
    /// Default locations; the first that exists wins
    Optional(Vec<PathBuf>),
}

impl ConfigSource {
    pub fn resolve(explicit: Option<&Path>, no_config: bool) -> Self {
        if no_config {
            return ConfigSource::Disabled;
        }
        match explicit {
            Some(path) => ConfigSource::Required(path.to_path_buf()),
            None => ConfigSource::Optional(default_config_paths()),
        }
    }
}

/// Candidate config paths in priority order
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            paths.push(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE));
        }
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config").join(APP_DIR).join(CONFIG_FILE));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let platform_path = config_dir.join(APP_DIR).join(CONFIG_FILE);
        if !paths.contains(&platform_path) {
            paths.push(platform_path);
        }
    }

    paths
}

pub fn load_config(source: &ConfigSource) -> Result<StartupConfig, ConfigError> {
    match source {
        ConfigSource::Disabled => Ok(StartupConfig::default()),
        ConfigSource::Required(path) => read_config(path, true),
        ConfigSource::Optional(paths) => match paths.iter().find(|path| path.exists()) {
            Some(path) => read_config(path, false),
            None => Ok(StartupConfig::default()),
        },
    }
}

fn read_config(path: &Path, required: bool) -> Result<StartupConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(StartupConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config: StartupConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(path, &config)?;
    Ok(config)
}

fn validate(path: &Path, config: &StartupConfig) -> Result<(), ConfigError> {
    let invalid = |key: &'static str| {
        move |source: OptionError| ConfigError::Invalid {
            key,
            path: path.to_path_buf(),
            source,
        }
    };
    if let Some(view) = &config.view {
        parse_layout(view).map_err(invalid("view"))?;
    }
    if let Some(theme) = &config.theme {
        parse_theme(theme).map_err(invalid("theme"))?;
    }
    if let Some(style) = &config.intraline_style {
        parse_intraline_style(style).map_err(invalid("intraline-style"))?;
    }
    Ok(())
}

/// Which startup flags were given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplicitFlags {
    pub view: bool,
    pub sidebar: bool,
    pub theme: bool,
    pub intraline_style: bool,
    pub show_symbols: bool,
}

/// Fill in values from the config file where no flag overrides them
pub fn apply_config(
    mut values: StartupValues,
    config: StartupConfig,
    explicit: ExplicitFlags,
) -> StartupValues {
    if let Some(view) = config.view.filter(|_| !explicit.view) {
        values.view = view;
    }
    if let Some(sidebar) = config.sidebar.filter(|_| !explicit.sidebar) {
        values.sidebar = sidebar;
    }
    if let Some(theme) = config.theme.filter(|_| !explicit.theme) {
        values.theme = theme;
    }
    if let Some(style) = config.intraline_style.filter(|_| !explicit.intraline_style) {
        values.intraline_style = style;
    }
    if let Some(show) = config.show_symbols.filter(|_| !explicit.show_symbols) {
        values.show_symbols = show;
    }
    values
}
