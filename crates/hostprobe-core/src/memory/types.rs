use serde::Serialize;

/// System-wide memory counters captured by a single query.
///
/// Page-file counters are the commit limit and remaining commit charge:
/// physical memory plus swap or page file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub total_physical_bytes: u64,
    pub available_physical_bytes: u64,
    /// Approximate share of physical memory in use, 0 to 100, as reported by the OS.
    pub load_percentage: u32,
    pub total_page_file_bytes: u64,
    pub available_page_file_bytes: u64,
}

impl MemorySnapshot {
    pub fn used_physical_bytes(&self) -> u64 {
        self.total_physical_bytes
            .saturating_sub(self.available_physical_bytes)
    }

    /// Exact used share of physical memory, or 0.0 when the total is unknown.
    pub fn physical_percent_used(&self) -> f64 {
        if self.total_physical_bytes == 0 {
            return 0.0;
        }
        self.used_physical_bytes() as f64 * 100.0 / self.total_physical_bytes as f64
    }
}

/// Load percentage from used and total counters, rounded and clamped to 100.
pub fn load_percentage(used: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let used = used.min(total) as u128;
    ((used * 100 + total as u128 / 2) / total as u128) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    fn snapshot(total: u64, available: u64) -> MemorySnapshot {
        MemorySnapshot {
            total_physical_bytes: total,
            available_physical_bytes: available,
            load_percentage: load_percentage(total.saturating_sub(available), total),
            total_page_file_bytes: total,
            available_page_file_bytes: available,
        }
    }

    #[test]
    fn test_used_bytes() {
        let s = snapshot(16 * GIB, 4 * GIB);
        assert_eq!(s.used_physical_bytes(), 12 * GIB);
        assert_eq!(s.load_percentage, 75);
        assert!((s.physical_percent_used() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_available() {
        let s = snapshot(8 * GIB, 0);
        assert_eq!(s.available_physical_bytes, 0);
        assert_eq!(s.used_physical_bytes(), 8 * GIB);
        assert_eq!(s.load_percentage, 100);
    }

    #[test]
    fn test_zero_total_does_not_divide() {
        let s = snapshot(0, 0);
        assert_eq!(s.load_percentage, 0);
        assert_eq!(s.physical_percent_used(), 0.0);
    }

    #[test]
    fn test_available_above_total_saturates() {
        let s = MemorySnapshot {
            total_physical_bytes: GIB,
            available_physical_bytes: 2 * GIB,
            load_percentage: 0,
            total_page_file_bytes: GIB,
            available_page_file_bytes: GIB,
        };
        assert_eq!(s.used_physical_bytes(), 0);
    }

    #[test]
    fn test_load_percentage_rounds() {
        assert_eq!(load_percentage(1, 3), 33);
        assert_eq!(load_percentage(2, 3), 67);
        assert_eq!(load_percentage(u64::MAX, u64::MAX), 100);
        assert_eq!(load_percentage(10, 5), 100);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(snapshot(100, 40)).unwrap();
        assert_eq!(json["total_physical_bytes"], 100);
        assert_eq!(json["available_physical_bytes"], 40);
        assert_eq!(json["load_percentage"], 60);
    }
}
