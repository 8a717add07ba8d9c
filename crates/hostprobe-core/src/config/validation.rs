//! Configuration validation.

use crate::config::defaults::{MAX_TITLE_BUFFER_LEN, MIN_TITLE_BUFFER_LEN};
use crate::config::types::HostprobeConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidConfiguration`] when the title buffer length
/// is out of range or the default process name is blank.
pub fn validate_config(config: &HostprobeConfig) -> Result<(), ConfigError> {
    if let Some(len) = config.window.title_buffer_len
        && !(MIN_TITLE_BUFFER_LEN..=MAX_TITLE_BUFFER_LEN).contains(&len)
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "window.title_buffer_len must be between {} and {}, got {}",
                MIN_TITLE_BUFFER_LEN, MAX_TITLE_BUFFER_LEN, len
            ),
        });
    }

    if let Some(process) = &config.window.process
        && process.trim().is_empty()
    {
        return Err(ConfigError::InvalidConfiguration {
            message: "window.process must not be empty".to_string(),
        });
    }

    Ok(())
}
