use std::ops::ControlFlow;
use std::sync::{LazyLock, Mutex};

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;

use crate::window::errors::WindowError;
use crate::window::system::{WindowSystem, bounded_text};
use crate::window::types::EnumerationOutcome;

// Shared system instance so repeated lookups reuse the process table
static SYSTEM: LazyLock<Mutex<System>> = LazyLock::new(|| Mutex::new(System::new()));

/// On-screen windows as reported by the window server.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopWindows;

impl DesktopWindows {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSystem for DesktopWindows {
    type Handle = xcap::Window;

    fn enumerate_windows<T>(
        &self,
        visit: &mut dyn FnMut(&xcap::Window) -> ControlFlow<T>,
    ) -> EnumerationOutcome<T> {
        let windows = match xcap::Window::all() {
            Ok(windows) => windows,
            Err(e) => {
                return EnumerationOutcome::Failed(WindowError::EnumerationFailed {
                    message: e.to_string(),
                });
            }
        };

        for window in &windows {
            if let ControlFlow::Break(value) = visit(window) {
                return EnumerationOutcome::Stopped(value);
            }
        }
        EnumerationOutcome::Completed
    }

    fn owner_process_id(&self, window: &xcap::Window) -> Result<u32, WindowError> {
        window.pid().map_err(|e| WindowError::OwnerUnavailable {
            message: e.to_string(),
        })
    }

    fn owner_executable_name(&self, pid: u32) -> Result<String, WindowError> {
        let pid_obj = Pid::from_u32(pid);
        let mut system = SYSTEM.lock().map_err(|_| WindowError::ProcessAccess {
            pid,
            message: "process table lock poisoned".to_string(),
        })?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid_obj]),
            true,
            ProcessRefreshKind::nothing(),
        );

        match system.process(pid_obj) {
            Some(process) => Ok(process.name().to_string_lossy().into_owned()),
            None => {
                debug!(event = "core.window.process_not_found", pid = pid);
                Err(WindowError::ModuleNameUnavailable {
                    pid,
                    message: "process not found".to_string(),
                })
            }
        }
    }

    fn window_text(&self, window: &xcap::Window, buffer_len: usize) -> Result<String, WindowError> {
        let title = window
            .title()
            .map_err(|e| WindowError::WindowTextUnavailable {
                message: e.to_string(),
            })?;
        Ok(bounded_text(&title, buffer_len))
    }
}
