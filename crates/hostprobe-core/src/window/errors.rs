use crate::errors::ProbeError;

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(" ({})", reason),
        None => String::new(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error(
        "No matching window title found for process '{process}' and pattern '{pattern}'{}",
        reason_suffix(.reason)
    )]
    NoMatchingWindow {
        process: String,
        pattern: String,
        reason: Option<String>,
    },

    #[error("Cannot resolve the owning process of window: {message}")]
    OwnerUnavailable { message: String },

    #[error("Cannot open process {pid}: {message}")]
    ProcessAccess { pid: u32, message: String },

    #[error("Cannot read executable name of process {pid}: {message}")]
    ModuleNameUnavailable { pid: u32, message: String },

    #[error("Cannot read window text: {message}")]
    WindowTextUnavailable { message: String },

    #[error("Window enumeration failed: {message}")]
    EnumerationFailed { message: String },

    #[error("Window enumeration is not supported on this platform")]
    UnsupportedPlatform,

    #[error("Invalid title pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ProbeError for WindowError {
    fn error_code(&self) -> &'static str {
        match self {
            WindowError::NoMatchingWindow { .. } => "WINDOW_NO_MATCH",
            WindowError::OwnerUnavailable { .. } => "WINDOW_OWNER_UNAVAILABLE",
            WindowError::ProcessAccess { .. } => "WINDOW_PROCESS_ACCESS_DENIED",
            WindowError::ModuleNameUnavailable { .. } => "WINDOW_MODULE_NAME_UNAVAILABLE",
            WindowError::WindowTextUnavailable { .. } => "WINDOW_TEXT_UNAVAILABLE",
            WindowError::EnumerationFailed { .. } => "WINDOW_ENUMERATION_FAILED",
            WindowError::UnsupportedPlatform => "WINDOW_UNSUPPORTED_PLATFORM",
            WindowError::InvalidPattern { .. } => "WINDOW_INVALID_PATTERN",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            WindowError::NoMatchingWindow { .. } | WindowError::InvalidPattern { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_window_without_reason() {
        let error = WindowError::NoMatchingWindow {
            process: "notepad.exe".to_string(),
            pattern: "^Untitled".to_string(),
            reason: None,
        };
        assert_eq!(
            error.to_string(),
            "No matching window title found for process 'notepad.exe' and pattern '^Untitled'"
        );
        assert_eq!(error.error_code(), "WINDOW_NO_MATCH");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_no_matching_window_with_reason() {
        let error = WindowError::NoMatchingWindow {
            process: "code.exe".to_string(),
            pattern: ".*".to_string(),
            reason: Some("Window enumeration failed: access denied".to_string()),
        };
        assert!(
            error
                .to_string()
                .ends_with("(Window enumeration failed: access denied)")
        );
    }

    #[test]
    fn test_process_access_error() {
        let error = WindowError::ProcessAccess {
            pid: 4,
            message: "Access is denied.".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot open process 4: Access is denied.");
        assert_eq!(error.error_code(), "WINDOW_PROCESS_ACCESS_DENIED");
        assert!(!error.is_user_error());
    }
}
