//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.hostprobe/config.toml`
//! 3. **Project config** - `./.hostprobe/config.toml`

use crate::config::types::{HostprobeConfig, OutputConfig, WindowConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR: &str = ".hostprobe";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the hierarchy of config files.
///
/// Loads and merges configuration from:
/// 1. Default values
/// 2. User config (`~/.hostprobe/config.toml`)
/// 3. Project config (`./.hostprobe/config.toml`)
///
/// # Errors
///
/// Returns an error if a file exists but cannot be parsed, or if validation
/// fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<HostprobeConfig, ConfigError> {
    let user_path = user_config_path();
    let project_path = std::env::current_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    load_hierarchy_from(user_path.as_deref(), Some(&project_path))
}

/// Load and merge the given config files in order, then validate.
pub fn load_hierarchy_from(
    user_path: Option<&Path>,
    project_path: Option<&Path>,
) -> Result<HostprobeConfig, ConfigError> {
    let mut config = HostprobeConfig::default();

    for path in [user_path, project_path].into_iter().flatten() {
        if let Some(file_config) = load_config_file(path)? {
            config = merge_configs(config, file_config);
        }
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load a configuration file, returning `None` when it does not exist.
fn load_config_file(path: &Path) -> Result<Option<HostprobeConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                event = "core.config.file_not_found",
                path = %path.display()
            );
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::ConfigReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            });
        }
    };

    let config: HostprobeConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields are replaced only when the override sets them.
pub fn merge_configs(base: HostprobeConfig, override_config: HostprobeConfig) -> HostprobeConfig {
    HostprobeConfig {
        window: WindowConfig {
            process: override_config.window.process.or(base.window.process),
            title_buffer_len: override_config
                .window
                .title_buffer_len
                .or(base.window.title_buffer_len),
        },
        output: OutputConfig {
            json: override_config.output.json.or(base.output.json),
        },
    }
}

/// Path of the user config file, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let config = load_hierarchy_from(Some(&missing), Some(&missing)).unwrap();
        assert_eq!(config, HostprobeConfig::default());
        assert_eq!(config.window.title_buffer_len(), 200);
    }

    #[test]
    fn test_project_overrides_user() {
        let dir = TempDir::new().unwrap();
        let user = write_config(
            &dir,
            "user.toml",
            "[window]\nprocess = \"notepad.exe\"\ntitle_buffer_len = 300\n",
        );
        let project = write_config(&dir, "project.toml", "[window]\ntitle_buffer_len = 64\n");

        let config = load_hierarchy_from(Some(&user), Some(&project)).unwrap();
        assert_eq!(config.window.process.as_deref(), Some("notepad.exe"));
        assert_eq!(config.window.title_buffer_len(), 64);
        assert!(!config.output.json());
    }

    #[test]
    fn test_user_json_kept_when_project_silent() {
        let dir = TempDir::new().unwrap();
        let user = write_config(&dir, "user.toml", "[output]\njson = true\n");
        let project = write_config(&dir, "project.toml", "[window]\nprocess = \"code.exe\"\n");

        let config = load_hierarchy_from(Some(&user), Some(&project)).unwrap();
        assert!(config.output.json());
        assert_eq!(config.window.process.as_deref(), Some("code.exe"));
    }

    #[test]
    fn test_project_json_false_overrides_user_true() {
        let dir = TempDir::new().unwrap();
        let user = write_config(&dir, "user.toml", "[output]\njson = true\n");
        let project = write_config(&dir, "project.toml", "[output]\njson = false\n");

        let config = load_hierarchy_from(Some(&user), Some(&project)).unwrap();
        assert_eq!(config.output.json, Some(false));
        assert!(!config.output.json());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let dir = TempDir::new().unwrap();
        let broken = write_config(&dir, "broken.toml", "[window\nprocess = ");

        let err = load_hierarchy_from(Some(&broken), None).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_invalid_merged_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let user = write_config(&dir, "user.toml", "[window]\ntitle_buffer_len = 0\n");

        let err = load_hierarchy_from(Some(&user), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_merge_keeps_base_when_override_empty() {
        let base = HostprobeConfig {
            window: WindowConfig {
                process: Some("explorer.exe".to_string()),
                title_buffer_len: Some(120),
            },
            output: OutputConfig { json: Some(true) },
        };

        let merged = merge_configs(base.clone(), HostprobeConfig::default());
        assert_eq!(merged, base);
    }
}
