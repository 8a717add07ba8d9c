use regex::Regex;
use tracing::info;

use super::errors::WindowError;
use super::matcher::find_matching_window;
use super::native::DesktopWindows;
use super::system::WindowSystem;
use super::types::{WindowRecord, WindowTitleQuery};
use crate::errors::ProbeError;

/// Title of the first window owned by `process_name` whose title matches `pattern`.
///
/// `process_name` is an executable base name such as `notepad.exe`; the
/// comparison ignores case.
///
/// # Errors
///
/// [`WindowError::NoMatchingWindow`] when no window qualifies.
pub fn find_window_title(process_name: &str, pattern: &Regex) -> Result<String, WindowError> {
    let query = WindowTitleQuery::new(process_name, pattern.clone());
    find_window(&query).map(WindowRecord::into_title)
}

/// Search the desktop for a window satisfying `query`.
pub fn find_window(query: &WindowTitleQuery) -> Result<WindowRecord, WindowError> {
    find_window_with(&DesktopWindows::new(), query)
}

/// Search the windows exposed by `system` for one satisfying `query`.
pub fn find_window_with<S: WindowSystem>(
    system: &S,
    query: &WindowTitleQuery,
) -> Result<WindowRecord, WindowError> {
    info!(
        event = "core.window.find_started",
        process = query.process_name(),
        pattern = query.pattern().as_str()
    );

    let result = find_matching_window(system, query);

    match &result {
        Ok(record) => info!(
            event = "core.window.find_completed",
            pid = record.pid(),
            title = record.title()
        ),
        Err(e) => info!(
            event = "core.window.find_failed",
            error_code = e.error_code(),
            error = %e
        ),
    }

    result
}

#[cfg(all(test, not(any(windows, target_os = "macos"))))]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_platform_reports_no_match() {
        let pattern = Regex::new("Notepad").unwrap();
        let err = find_window_title("notepad.exe", &pattern).unwrap_err();
        match err {
            WindowError::NoMatchingWindow {
                process, reason, ..
            } => {
                assert_eq!(process, "notepad.exe");
                assert!(reason.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
