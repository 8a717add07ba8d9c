use std::io;
use std::ops::ControlFlow;

use tracing::debug;
use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::System::ProcessStatus::GetModuleBaseNameW;
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_READ,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetWindowTextW, GetWindowThreadProcessId,
};
use windows::core::BOOL;

use crate::platform::windows::OwnedHandle;
use crate::window::errors::WindowError;
use crate::window::system::WindowSystem;
use crate::window::types::EnumerationOutcome;

/// Longest module base name read from a process.
const MODULE_NAME_LEN: usize = 260;

/// Top-level windows of the current desktop via `EnumWindows`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopWindows;

impl DesktopWindows {
    pub fn new() -> Self {
        Self
    }
}

type Visitor<'a> = &'a mut dyn FnMut(HWND) -> bool;

unsafe extern "system" fn enum_trampoline(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // lparam carries a pointer to the visitor for the duration of EnumWindows
    let visit = unsafe { &mut *(lparam.0 as *mut Visitor<'_>) };
    BOOL::from(visit(hwnd))
}

impl WindowSystem for DesktopWindows {
    type Handle = HWND;

    fn enumerate_windows<T>(
        &self,
        visit: &mut dyn FnMut(&HWND) -> ControlFlow<T>,
    ) -> EnumerationOutcome<T> {
        let mut stopped = None;
        let mut adapter = |hwnd: HWND| match visit(&hwnd) {
            ControlFlow::Continue(()) => true,
            ControlFlow::Break(value) => {
                stopped = Some(value);
                false
            }
        };
        let mut visitor: Visitor<'_> = &mut adapter;

        let result = unsafe {
            EnumWindows(
                Some(enum_trampoline),
                LPARAM(&mut visitor as *mut Visitor<'_> as isize),
            )
        };

        // EnumWindows reports a visitor stop as failure, so check the stop first
        if let Some(value) = stopped {
            return EnumerationOutcome::Stopped(value);
        }
        match result {
            Ok(()) => EnumerationOutcome::Completed,
            Err(e) => EnumerationOutcome::Failed(WindowError::EnumerationFailed {
                message: e.message(),
            }),
        }
    }

    fn owner_process_id(&self, window: &HWND) -> Result<u32, WindowError> {
        let mut pid = 0u32;
        let thread = unsafe { GetWindowThreadProcessId(*window, Some(&mut pid)) };
        if thread == 0 {
            return Err(WindowError::OwnerUnavailable {
                message: io::Error::last_os_error().to_string(),
            });
        }
        Ok(pid)
    }

    fn owner_executable_name(&self, pid: u32) -> Result<String, WindowError> {
        let process = unsafe {
            OpenProcess(PROCESS_QUERY_INFORMATION | PROCESS_VM_READ, false, pid)
        }
        .map_err(|e| WindowError::ProcessAccess {
            pid,
            message: e.message(),
        })?;
        let process = OwnedHandle::new(process);

        let mut buffer = [0u16; MODULE_NAME_LEN];
        let len = unsafe { GetModuleBaseNameW(process.get(), None, &mut buffer) } as usize;
        if len == 0 {
            let message = io::Error::last_os_error().to_string();
            debug!(event = "core.window.module_name_failed", pid = pid, error = %message);
            return Err(WindowError::ModuleNameUnavailable { pid, message });
        }

        Ok(String::from_utf16_lossy(&buffer[..len]))
    }

    fn window_text(&self, window: &HWND, buffer_len: usize) -> Result<String, WindowError> {
        let mut buffer = vec![0u16; buffer_len.max(2)];
        let len = unsafe { GetWindowTextW(*window, &mut buffer) };
        if len < 0 {
            return Err(WindowError::WindowTextUnavailable {
                message: io::Error::last_os_error().to_string(),
            });
        }
        // zero covers both an empty title and a failed read; both are skipped
        Ok(String::from_utf16_lossy(&buffer[..len as usize]))
    }
}
