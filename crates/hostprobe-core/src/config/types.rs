//! Configuration type definitions.
//!
//! These types are deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [window]
//! process = "code.exe"
//! title_buffer_len = 512
//!
//! [output]
//! json = false
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.hostprobe/config.toml`
/// 2. Project config: `./.hostprobe/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HostprobeConfig {
    /// Window title lookup settings
    #[serde(default)]
    pub window: WindowConfig,

    /// Output formatting preferences
    #[serde(default)]
    pub output: OutputConfig,
}

/// Window title lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct WindowConfig {
    /// Executable name used when `--process` is not given (e.g. `notepad.exe`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process: Option<String>,

    /// Size of the window text buffer in UTF-16 code units.
    /// Default: 200.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_buffer_len: Option<usize>,
}

impl WindowConfig {
    /// Effective title buffer length, falling back to the built-in default.
    pub fn title_buffer_len(&self) -> usize {
        self.title_buffer_len
            .unwrap_or_else(super::defaults::default_title_buffer_len)
    }
}

/// Output formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Emit JSON instead of human-readable text.
    /// Default: false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl OutputConfig {
    /// Effective JSON preference, false when no config file sets it.
    pub fn json(&self) -> bool {
        self.json.unwrap_or(false)
    }
}
