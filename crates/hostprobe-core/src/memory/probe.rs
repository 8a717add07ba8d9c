use super::errors::MemoryError;
use super::types::MemorySnapshot;

/// A single-shot source of system memory counters.
///
/// Each call queries live OS state; implementations never cache.
pub trait MemoryProbe {
    fn snapshot(&self) -> Result<MemorySnapshot, MemoryError>;
}

impl<T: MemoryProbe + ?Sized> MemoryProbe for &T {
    fn snapshot(&self) -> Result<MemorySnapshot, MemoryError> {
        (**self).snapshot()
    }
}
