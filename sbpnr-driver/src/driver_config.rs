// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use sbpnr_netlist::blif::BlifOptions;
use serde::Deserialize;

/// Name of the config file picked up from the working directory when no
/// `--config` flag is given.
pub const CWD_CONFIG_NAME: &str = "sbpnr.toml";

/// Contents of an `sbpnr.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct DriverConfig {
    /// Settings for the BLIF reader.
    pub blif: Option<BlifOptions>,
}

impl DriverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse driver config")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read driver config {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}

/// The config path given on the command line, or `sbpnr.toml` in `cwd` if
/// that exists.
pub fn find_config_path(explicit: Option<&str>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    let cwd_config = cwd.join(CWD_CONFIG_NAME);
    if cwd_config.exists() {
        log::info!(
            "Using {} in current directory: {}",
            CWD_CONFIG_NAME,
            cwd_config.display()
        );
        Some(cwd_config)
    } else {
        None
    }
}

/// Reader options from the command line flags, falling back to the config
/// file and then to the defaults.
pub fn get_blif_options(matches: &ArgMatches, config: &Option<DriverConfig>) -> BlifOptions {
    let mut options = config
        .as_ref()
        .and_then(|c| c.blif.clone())
        .unwrap_or_default();
    if let Some(io_model) = matches.get_one::<String>("io_model") {
        options.io_model = io_model.to_string();
    }
    if let Some(io_pin) = matches.get_one::<String>("io_pin") {
        options.io_pin = io_pin.to_string();
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_blif_table_keeps_defaults() {
        let config = DriverConfig::from_toml_str("[blif]\nio_model = \"SB_GB_IO\"\n").unwrap();
        assert_eq!(
            config.blif,
            Some(BlifOptions {
                io_model: "SB_GB_IO".to_string(),
                io_pin: "PACKAGE_PIN".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_config() {
        let config = DriverConfig::from_toml_str("").unwrap();
        assert_eq!(config.blif, None);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        assert!(DriverConfig::from_toml_str("[blif]\nio_model = 3\n").is_err());
    }

    #[test]
    fn test_find_config_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_config_path(None, dir.path()), None);
        assert_eq!(
            find_config_path(Some("other.toml"), dir.path()),
            Some(PathBuf::from("other.toml"))
        );
        std::fs::write(dir.path().join(CWD_CONFIG_NAME), "").unwrap();
        assert_eq!(
            find_config_path(None, dir.path()),
            Some(dir.path().join(CWD_CONFIG_NAME))
        );
    }
}
