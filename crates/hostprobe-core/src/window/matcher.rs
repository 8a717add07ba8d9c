use std::ops::ControlFlow;

use tracing::{debug, info};

use crate::errors::ProbeError;

use super::errors::WindowError;
use super::system::WindowSystem;
use super::types::{EnumerationOutcome, WindowRecord, WindowTitleQuery};

/// Find the first window owned by the query's executable whose title matches.
///
/// Failures on individual windows (process cannot be opened, module name or
/// text unreadable) skip that window and enumeration continues. The search
/// stops at the first match.
///
/// # Errors
///
/// [`WindowError::NoMatchingWindow`] when no window qualifies, whether the
/// enumeration ran to completion or the primitive failed.
pub fn find_matching_window<S: WindowSystem>(
    system: &S,
    query: &WindowTitleQuery,
) -> Result<WindowRecord, WindowError> {
    let mut visited = 0usize;
    let mut skipped = 0usize;

    let outcome = system.enumerate_windows(&mut |window| {
        visited += 1;
        match inspect_window(system, query, window) {
            Ok(Some(record)) => ControlFlow::Break(record),
            Ok(None) => ControlFlow::Continue(()),
            Err(e) => {
                skipped += 1;
                debug!(
                    event = "core.window.window_skipped",
                    error_code = e.error_code(),
                    error = %e
                );
                ControlFlow::Continue(())
            }
        }
    });

    let no_match = |reason: Option<String>| WindowError::NoMatchingWindow {
        process: query.process_name().to_string(),
        pattern: query.pattern().as_str().to_string(),
        reason,
    };

    match outcome {
        EnumerationOutcome::Stopped(record) => {
            info!(
                event = "core.window.match_found",
                pid = record.pid(),
                executable = record.executable(),
                title = record.title(),
                visited = visited
            );
            Ok(record)
        }
        EnumerationOutcome::Completed => {
            debug!(
                event = "core.window.match_not_found",
                visited = visited,
                skipped = skipped
            );
            Err(no_match(None))
        }
        EnumerationOutcome::Failed(e) => {
            debug!(
                event = "core.window.enumeration_failed",
                visited = visited,
                error = %e
            );
            Err(no_match(Some(e.to_string())))
        }
    }
}

/// Evaluate one window against the query.
///
/// The executable is checked before the window text is read.
fn inspect_window<S: WindowSystem>(
    system: &S,
    query: &WindowTitleQuery,
    window: &S::Handle,
) -> Result<Option<WindowRecord>, WindowError> {
    let pid = system.owner_process_id(window)?;
    let executable = system.owner_executable_name(pid)?;
    if !query.matches_executable(&executable) {
        return Ok(None);
    }

    let title = system.window_text(window, query.title_buffer_len())?;
    if title.is_empty() || !query.pattern().is_match(&title) {
        return Ok(None);
    }

    Ok(Some(WindowRecord::new(
        pid,
        executable.to_lowercase(),
        title,
    )))
}
