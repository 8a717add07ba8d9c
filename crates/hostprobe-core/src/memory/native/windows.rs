use windows::Win32::System::SystemInformation::{GlobalMemoryStatusEx, MEMORYSTATUSEX};

use crate::memory::errors::MemoryError;
use crate::memory::probe::MemoryProbe;
use crate::memory::types::MemorySnapshot;

/// Counters from `GlobalMemoryStatusEx`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMemory;

impl SystemMemory {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryProbe for SystemMemory {
    fn snapshot(&self) -> Result<MemorySnapshot, MemoryError> {
        let mut status = MEMORYSTATUSEX {
            dwLength: std::mem::size_of::<MEMORYSTATUSEX>() as u32,
            ..Default::default()
        };

        unsafe { GlobalMemoryStatusEx(&mut status) }.map_err(|e| MemoryError::QueryFailed {
            code: e.code().0,
            message: e.message(),
        })?;

        Ok(MemorySnapshot {
            total_physical_bytes: status.ullTotalPhys,
            available_physical_bytes: status.ullAvailPhys,
            load_percentage: status.dwMemoryLoad,
            total_page_file_bytes: status.ullTotalPageFile,
            available_page_file_bytes: status.ullAvailPageFile,
        })
    }
}
