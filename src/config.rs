//! Runtime configuration read from the environment.

use std::path::PathBuf;

pub const ASSET_DIR_VAR: &str = "SIDE_SCROLLER_ASSETS";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Directory searched for sprite files.
    pub asset_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            asset_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let asset_dir = lookup(ASSET_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| Config::default().asset_dir);
        Config { asset_dir }
    }
}
