//! Platform memory counter backends.

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use self::windows::SystemMemory;

#[cfg(not(windows))]
mod portable;
#[cfg(not(windows))]
pub use portable::SystemMemory;
