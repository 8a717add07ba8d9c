use regex::Regex;
use serde::Serialize;

use super::errors::WindowError;

/// Window text buffer length in UTF-16 code units, terminator included.
pub const DEFAULT_TITLE_BUFFER_LEN: usize = 200;

/// Smallest usable title buffer: one code unit of text plus the terminator.
pub const MIN_TITLE_BUFFER_LEN: usize = 2;

/// Largest title buffer accepted.
pub const MAX_TITLE_BUFFER_LEN: usize = 32_768;

/// Result of driving a callback enumeration.
///
/// Separates an early stop requested by the visitor from a failure of the
/// enumeration primitive, which report identically at the OS layer.
#[derive(Debug)]
pub enum EnumerationOutcome<T> {
    /// Every window was visited without the visitor stopping.
    Completed,
    /// The visitor stopped enumeration with a value.
    Stopped(T),
    /// The primitive failed before the visitor stopped it.
    Failed(WindowError),
}

/// The window that satisfied a [`WindowTitleQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowRecord {
    pid: u32,
    executable: String,
    title: String,
}

impl WindowRecord {
    pub fn new(pid: u32, executable: String, title: String) -> Self {
        Self {
            pid,
            executable,
            title,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Lower-cased executable base name, e.g. `notepad.exe`.
    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn into_title(self) -> String {
        self.title
    }
}

/// What to look for: an owning executable and a title pattern.
#[derive(Debug, Clone)]
pub struct WindowTitleQuery {
    process_name: String,
    pattern: Regex,
    title_buffer_len: usize,
}

impl WindowTitleQuery {
    pub fn new(process_name: &str, pattern: Regex) -> Self {
        Self {
            process_name: process_name.to_lowercase(),
            pattern,
            title_buffer_len: DEFAULT_TITLE_BUFFER_LEN,
        }
    }

    /// Compile `pattern` and build a query.
    pub fn from_pattern(process_name: &str, pattern: &str) -> Result<Self, WindowError> {
        let regex = Regex::new(pattern).map_err(|e| WindowError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(process_name, regex))
    }

    /// Override the window text buffer length.
    ///
    /// Clamped to `MIN_TITLE_BUFFER_LEN..=MAX_TITLE_BUFFER_LEN`.
    pub fn with_title_buffer_len(mut self, len: usize) -> Self {
        self.title_buffer_len = len.clamp(MIN_TITLE_BUFFER_LEN, MAX_TITLE_BUFFER_LEN);
        self
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn title_buffer_len(&self) -> usize {
        self.title_buffer_len
    }

    /// Case-insensitive comparison against a resolved executable base name.
    pub fn matches_executable(&self, executable: &str) -> bool {
        executable.to_lowercase() == self.process_name
    }
}
