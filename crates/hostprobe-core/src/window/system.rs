use std::ops::ControlFlow;

use super::errors::WindowError;
use super::types::EnumerationOutcome;

/// Access to the host's top-level windows.
///
/// Enumeration is synchronous: `visit` runs on the calling thread once per
/// window, in OS order, before the next window is produced. Returning
/// [`ControlFlow::Break`] stops the walk.
pub trait WindowSystem {
    /// Opaque window identifier, valid only during enumeration.
    type Handle;

    fn enumerate_windows<T>(
        &self,
        visit: &mut dyn FnMut(&Self::Handle) -> ControlFlow<T>,
    ) -> EnumerationOutcome<T>;

    fn owner_process_id(&self, window: &Self::Handle) -> Result<u32, WindowError>;

    /// Base name of the owning process's main module, e.g. `Notepad.exe`.
    fn owner_executable_name(&self, pid: u32) -> Result<String, WindowError>;

    /// Window text read into a buffer of `buffer_len` UTF-16 units.
    ///
    /// Longer text is truncated to `buffer_len - 1` units.
    fn window_text(&self, window: &Self::Handle, buffer_len: usize) -> Result<String, WindowError>;
}

/// Truncate `text` the way a bounded UTF-16 read would.
///
/// Keeps at most `buffer_len - 1` code units and never splits a surrogate pair.
pub fn bounded_text(text: &str, buffer_len: usize) -> String {
    let limit = buffer_len.saturating_sub(1);
    let mut used = 0;
    let mut end = 0;
    for (index, ch) in text.char_indices() {
        let units = ch.len_utf16();
        if used + units > limit {
            return text[..end].to_string();
        }
        used += units;
        end = index + ch.len_utf8();
    }
    text.to_string()
}
