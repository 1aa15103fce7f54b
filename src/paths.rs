//! Path resolution for the settings file and bundled resources.
//!
//! In development mode (debug builds or `cargo run`) everything resolves
//! relative to the working directory. Installed builds keep settings in the
//! platform config directory and resources next to the executable.

use std::path::PathBuf;

const APP_DIR_NAME: &str = "milton";
const STATE_FILE_NAME: &str = "state.json";
const RESOURCES_DIR_NAME: &str = "resources";

/// Returns true when running in development mode.
pub fn is_dev_mode() -> bool {
    std::env::var("CARGO").is_ok() || cfg!(debug_assertions)
}

/// Location of the persisted settings file.
///
/// - Dev mode: `./state.json`
/// - Installed: `{config_dir}/milton/state.json`
pub fn state_file() -> PathBuf {
    if is_dev_mode() {
        return PathBuf::from(STATE_FILE_NAME);
    }

    dirs::config_dir()
        .map(|p| p.join(APP_DIR_NAME).join(STATE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(STATE_FILE_NAME))
}

/// Directory holding resources that ship with the binary.
///
/// - Dev mode: `./resources/`
/// - Installed: `{exe_dir}/resources/`
pub fn resources_dir() -> PathBuf {
    if is_dev_mode() {
        return PathBuf::from(RESOURCES_DIR_NAME);
    }

    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.join(RESOURCES_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(RESOURCES_DIR_NAME))
}

/// Newline-delimited word list.
pub fn word_list_file() -> PathBuf {
    resources_dir().join("nouns.txt")
}

/// Sample images used when no source directory has been chosen.
pub fn default_source_dir() -> PathBuf {
    resources_dir().join("img").join("birds")
}
