//! Standard locations for trackview configuration files

use std::path::PathBuf;

/// Application directory name under the platform config dir
const APP_DIR: &str = "trackview";

/// Get the default music collection path
///
/// Returns: `~/Music`
pub fn default_collection_path() -> PathBuf {
    dirs::audio_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Music")
    })
}

/// Get the default path of a config file
///
/// Returns: `{config_dir}/trackview/{filename}`
pub fn default_config_path(filename: &str) -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(filename)
}
