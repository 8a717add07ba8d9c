//! Platform window enumeration backends.

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::DesktopWindows;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::DesktopWindows;

#[cfg(not(any(windows, target_os = "macos")))]
mod unsupported;
#[cfg(not(any(windows, target_os = "macos")))]
pub use unsupported::DesktopWindows;
