use std::sync::{LazyLock, Mutex};

use sysinfo::{MemoryRefreshKind, System};
use tracing::debug;

use crate::memory::errors::MemoryError;
use crate::memory::probe::MemoryProbe;
use crate::memory::types::{MemorySnapshot, load_percentage};

// Shared system instance, refreshed on every query
static SYSTEM: LazyLock<Mutex<System>> = LazyLock::new(|| Mutex::new(System::new()));

/// Counters read through sysinfo; swap stands in for the page file.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemMemory;

impl SystemMemory {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryProbe for SystemMemory {
    fn snapshot(&self) -> Result<MemorySnapshot, MemoryError> {
        let mut system = SYSTEM
            .lock()
            .map_err(|_| MemoryError::CountersUnavailable {
                message: "system information lock poisoned".to_string(),
            })?;
        system.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram().with_swap());

        let total = system.total_memory();
        if total == 0 {
            debug!(event = "core.memory.counters_empty");
            return Err(MemoryError::CountersUnavailable {
                message: "total physical memory reported as zero".to_string(),
            });
        }
        let available = system.available_memory().min(total);

        Ok(MemorySnapshot {
            total_physical_bytes: total,
            available_physical_bytes: available,
            load_percentage: load_percentage(total - available, total),
            total_page_file_bytes: total.saturating_add(system.total_swap()),
            available_page_file_bytes: available.saturating_add(system.free_swap()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_snapshot_is_consistent() {
        let snapshot = SystemMemory::new().snapshot().unwrap();
        assert!(snapshot.total_physical_bytes > 0);
        assert!(snapshot.available_physical_bytes <= snapshot.total_physical_bytes);
        assert!(snapshot.load_percentage <= 100);
        assert!(snapshot.total_page_file_bytes >= snapshot.total_physical_bytes);
    }
}
