//! YAML persistence for the library view config
//!
//! Loading never fails: a missing or malformed file yields the defaults.
//! Saving reports errors to the caller.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;

/// Read a config from `path`, or the default config if that fails
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let yaml = match std::fs::read_to_string(path) {
        Ok(yaml) => yaml,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No library view config at {:?}, starting with defaults", path);
            return T::default();
        }
        Err(e) => {
            log::warn!("Cannot read library view config {:?}: {}", path, e);
            return T::default();
        }
    };

    serde_yaml::from_str(&yaml).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed library view config {:?}: {}", path, e);
        T::default()
    })
}

/// Write `config` to `path` as YAML, creating missing directories
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    let yaml = serde_yaml::to_string(config).context("Serializing library view config")?;
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Creating {:?}", dir))?;
    }
    std::fs::write(path, yaml).with_context(|| format!("Writing {:?}", path))?;
    log::debug!("Saved library view config to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LibraryViewConfig, TrackDoubleClickAction};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config: LibraryViewConfig = load_config(&dir.path().join("absent.yaml"));
        assert_eq!(config, LibraryViewConfig::default());
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library-view.yaml");
        std::fs::write(&path, "sorting_enabled: [yes").unwrap();

        let config: LibraryViewConfig = load_config(&path);
        assert_eq!(config, LibraryViewConfig::default());
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackview").join("library-view.yaml");

        let mut config = LibraryViewConfig::default();
        config.track_double_click_action = TrackDoubleClickAction::Ignore;
        save_config(&config, &path).unwrap();

        let loaded: LibraryViewConfig = load_config(&path);
        assert_eq!(loaded.track_double_click_action, TrackDoubleClickAction::Ignore);
    }
}
