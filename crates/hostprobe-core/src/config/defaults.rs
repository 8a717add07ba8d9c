//! Default values for configuration types.

/// Returns the default window text buffer length (200 UTF-16 code units).
///
/// Titles longer than the buffer are truncated silently.
pub fn default_title_buffer_len() -> usize {
    crate::window::DEFAULT_TITLE_BUFFER_LEN
}

pub use crate::window::types::{MAX_TITLE_BUFFER_LEN, MIN_TITLE_BUFFER_LEN};
