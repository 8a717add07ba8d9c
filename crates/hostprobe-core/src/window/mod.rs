//! Window title search.
//!
//! Walks the top-level windows of the desktop, resolves each window's owning
//! executable and returns the first title matching a pattern. Per-window
//! failures are skipped; the search only fails when nothing matched.

pub mod errors;
pub mod handler;
pub mod matcher;
pub mod native;
pub mod system;
pub mod types;

pub use errors::WindowError;
pub use handler::{find_window, find_window_title, find_window_with};
pub use matcher::find_matching_window;
pub use native::DesktopWindows;
pub use system::{WindowSystem, bounded_text};
pub use types::{
    DEFAULT_TITLE_BUFFER_LEN, EnumerationOutcome, MAX_TITLE_BUFFER_LEN, MIN_TITLE_BUFFER_LEN,
    WindowRecord, WindowTitleQuery,
};
