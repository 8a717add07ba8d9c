//! # Configuration System
//!
//! Hierarchical TOML configuration for hostprobe.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.hostprobe/config.toml` (global user preferences)
//! 3. **Project config** - `./.hostprobe/config.toml` (directory-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.hostprobe/config.toml
//! [window]
//! process = "windowsterminal.exe"
//! title_buffer_len = 200
//!
//! [output]
//! json = true
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use hostprobe_core::config::HostprobeConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HostprobeConfig::load_hierarchy()?;
//!     let buffer_len = config.window.title_buffer_len();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use types::{HostprobeConfig, OutputConfig, WindowConfig};
pub use validation::validate_config;

impl HostprobeConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
