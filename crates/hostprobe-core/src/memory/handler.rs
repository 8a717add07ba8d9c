use tracing::{info, warn};

use super::errors::MemoryError;
use super::native::SystemMemory;
use super::probe::MemoryProbe;
use super::types::MemorySnapshot;
use crate::errors::ProbeError;

/// Query system-wide memory counters.
///
/// One blocking OS call per invocation. Failures are returned as-is; there is
/// no retry and no zero-filled fallback.
pub fn query_memory_status() -> Result<MemorySnapshot, MemoryError> {
    query_memory_status_with(&SystemMemory::new())
}

pub fn query_memory_status_with<P: MemoryProbe>(probe: &P) -> Result<MemorySnapshot, MemoryError> {
    info!(event = "core.memory.query_started");

    match probe.snapshot() {
        Ok(snapshot) => {
            info!(
                event = "core.memory.query_completed",
                total_physical_bytes = snapshot.total_physical_bytes,
                available_physical_bytes = snapshot.available_physical_bytes,
                load_percentage = snapshot.load_percentage
            );
            Ok(snapshot)
        }
        Err(e) => {
            warn!(
                event = "core.memory.query_failed",
                error_code = e.error_code(),
                error = %e
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeProbe {
        result: fn() -> Result<MemorySnapshot, MemoryError>,
        calls: Cell<u32>,
    }

    impl FakeProbe {
        fn new(result: fn() -> Result<MemorySnapshot, MemoryError>) -> Self {
            Self {
                result,
                calls: Cell::new(0),
            }
        }
    }

    impl MemoryProbe for FakeProbe {
        fn snapshot(&self) -> Result<MemorySnapshot, MemoryError> {
            self.calls.set(self.calls.get() + 1);
            (self.result)()
        }
    }

    #[test]
    fn test_zero_available_memory() {
        let probe = FakeProbe::new(|| {
            Ok(MemorySnapshot {
                total_physical_bytes: 4096,
                available_physical_bytes: 0,
                load_percentage: 100,
                total_page_file_bytes: 8192,
                available_page_file_bytes: 0,
            })
        });

        let snapshot = query_memory_status_with(&probe).unwrap();
        assert_eq!(snapshot.available_physical_bytes, 0);
        assert_eq!(snapshot.load_percentage, 100);
    }

    #[test]
    fn test_failure_is_propagated_without_retry() {
        let probe = FakeProbe::new(|| {
            Err(MemoryError::QueryFailed {
                code: 8,
                message: "Not enough memory resources".to_string(),
            })
        });

        let err = query_memory_status_with(&probe).unwrap_err();
        assert!(matches!(err, MemoryError::QueryFailed { code: 8, .. }));
        assert_eq!(probe.calls.get(), 1);
    }

    #[test]
    fn test_each_query_hits_the_probe() {
        let probe = FakeProbe::new(|| {
            Ok(MemorySnapshot {
                total_physical_bytes: 1,
                available_physical_bytes: 1,
                load_percentage: 0,
                total_page_file_bytes: 1,
                available_page_file_bytes: 1,
            })
        });

        query_memory_status_with(&probe).unwrap();
        query_memory_status_with(&probe).unwrap();
        assert_eq!(probe.calls.get(), 2);
    }

    #[test]
    fn test_native_query() {
        let snapshot = query_memory_status().unwrap();
        assert!(snapshot.total_physical_bytes > 0);
    }
}
