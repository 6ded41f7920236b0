//! Command-line flags and the optional settings file.

use crate::error::{ConfigError, Error, Result};
use clap::Parser;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Interactive in-memory to-do list")]
pub struct Cli {
    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub color: bool,
    pub banner: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            banner: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let wrap = |source: ConfigError| Error::Config {
            path: path.to_path_buf(),
            source,
        };
        let data = fs::read_to_string(path).map_err(|e| wrap(e.into()))?;
        serde_json::from_str(&data).map_err(|e| wrap(e.into()))
    }

    /// Settings file (or defaults) with command-line overrides applied.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if cli.no_color {
            settings.color = false;
        }
        tracing::debug!(?settings, "settings resolved");
        Ok(settings)
    }
}
