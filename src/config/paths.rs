//! Platform application paths resolved via the `dirs` crate.
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\hold-to-type\
//!   macOS:   ~/Library/Application Support/hold-to-type/
//!   Linux:   ~/.config/hold-to-type/
//!
//! Data dir (whisper binary + model):
//!   Windows: %LOCALAPPDATA%\hold-to-type\
//!   macOS:   ~/Library/Application Support/hold-to-type/
//!   Linux:   ~/.local/share/hold-to-type/

use std::path::PathBuf;

/// Resolved application directory and file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Default location of the whisper-cli binary.
    pub whisper_binary: PathBuf,
    /// Default location of the GGML speech model.
    pub whisper_model: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "hold-to-type";

    /// Resolve all paths, falling back to the current directory when the
    /// platform cannot provide a standard location.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            whisper_binary: data_dir.join("whisper").join("whisper-cli"),
            whisper_model: data_dir.join("models").join("ggml-base.en.bin"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
