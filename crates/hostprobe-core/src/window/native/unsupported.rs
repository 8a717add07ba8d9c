use std::ops::ControlFlow;

use crate::window::errors::WindowError;
use crate::window::system::WindowSystem;
use crate::window::types::EnumerationOutcome;

/// Targets without a window enumeration backend.
///
/// Enumeration always fails, so lookups report no matching window.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopWindows;

impl DesktopWindows {
    pub fn new() -> Self {
        Self
    }
}

impl WindowSystem for DesktopWindows {
    type Handle = ();

    fn enumerate_windows<T>(
        &self,
        _visit: &mut dyn FnMut(&()) -> ControlFlow<T>,
    ) -> EnumerationOutcome<T> {
        EnumerationOutcome::Failed(WindowError::UnsupportedPlatform)
    }

    fn owner_process_id(&self, _window: &()) -> Result<u32, WindowError> {
        Err(WindowError::UnsupportedPlatform)
    }

    fn owner_executable_name(&self, _pid: u32) -> Result<String, WindowError> {
        Err(WindowError::UnsupportedPlatform)
    }

    fn window_text(&self, _window: &(), _buffer_len: usize) -> Result<String, WindowError> {
        Err(WindowError::UnsupportedPlatform)
    }
}
