//! System memory status.

pub mod errors;
pub mod handler;
pub mod native;
pub mod probe;
pub mod types;

pub use errors::MemoryError;
pub use handler::{query_memory_status, query_memory_status_with};
pub use native::SystemMemory;
pub use probe::MemoryProbe;
pub use types::MemorySnapshot;
