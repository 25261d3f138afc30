//! Configuration: `AppConfig` (settings + TOML persistence) and `AppPaths`
//! (platform data directories).  Defaults carry the tuned hold/gate/timeout
//! constants so a missing `settings.toml` is fully functional.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, AudioConfig, HotkeyConfig, LlmConfig, SttConfig, TimingConfig,
};
