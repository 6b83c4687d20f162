//! Where `config.toml` lives.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory under `~/.config` used when `--dir` is not given.
const APP_DIR: &str = "moviesearch";

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Returns the path of `config.toml`.
///
/// `--dir` replaces the whole directory, which is how tests point the
/// binary at a throwaway config. Without it the file is
/// `~/.config/moviesearch/config.toml`.
///
/// # Errors
///
/// Returns an error if `dir` is `None` and `HOME` is not set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    let base = match dir {
        Some(dir) => dir.clone(),
        None => {
            let home = std::env::var("HOME").context("HOME environment variable is not set")?;
            PathBuf::from(home).join(".config").join(APP_DIR)
        }
    };
    Ok(base.join(CONFIG_FILE))
}
