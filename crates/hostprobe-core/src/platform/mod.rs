//! Shared platform plumbing for the native backends.

#[cfg(windows)]
pub(crate) mod windows;
