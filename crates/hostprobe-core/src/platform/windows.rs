//! Scoped ownership of Win32 resources.
//!
//! Every handle or allocation obtained from the OS is wrapped immediately so
//! that early returns release it.

use std::ffi::{OsStr, c_void};
use std::os::windows::ffi::OsStrExt;

use windows::Win32::Foundation::{CloseHandle, HANDLE, HLOCAL, LocalFree};

/// Closes a kernel handle (process, token) on drop.
pub(crate) struct OwnedHandle(HANDLE);

impl OwnedHandle {
    pub(crate) fn new(handle: HANDLE) -> Self {
        Self(handle)
    }

    pub(crate) fn get(&self) -> HANDLE {
        self.0
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        if !self.0.is_invalid() {
            unsafe {
                let _ = CloseHandle(self.0);
            }
        }
    }
}

/// Frees a `LocalAlloc`-ed block (security descriptors) on drop.
pub(crate) struct LocalAllocGuard(*mut c_void);

impl LocalAllocGuard {
    pub(crate) fn new(ptr: *mut c_void) -> Self {
        Self(ptr)
    }
}

impl Drop for LocalAllocGuard {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe {
                let _ = LocalFree(Some(HLOCAL(self.0)));
            }
        }
    }
}

/// NUL-terminated UTF-16 copy of an OS string.
pub(crate) fn to_wide(value: &OsStr) -> Vec<u16> {
    value.encode_wide().chain(Some(0)).collect()
}
