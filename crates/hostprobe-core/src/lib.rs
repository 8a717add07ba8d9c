//! hostprobe-core: native host introspection queries
//!
//! Answers three platform-level questions about the running host by talking
//! directly to the operating system:
//!
//! - [`window`] - is there a visible window owned by a given executable whose
//!   title matches a pattern?
//! - [`security`] - can the current user write to a path, given its
//!   access-control list?
//! - [`memory`] - what is the current physical memory utilization?
//!
//! Every query is synchronous and independent. No state is shared between
//! calls beyond immutable platform bindings.

pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod memory;
mod platform;
pub mod security;
pub mod window;

// Re-export commonly used types at crate root for convenience
pub use config::HostprobeConfig;
pub use errors::ProbeError;
pub use memory::{MemoryError, MemoryProbe, MemorySnapshot};
pub use security::{AccessError, AccessMask, Sid, WriteDecision};
pub use window::{EnumerationOutcome, WindowError, WindowRecord, WindowSystem, WindowTitleQuery};

// Re-export handler modules as the primary API
pub use memory::handler as memory_ops;
pub use security::handler as security_ops;
pub use window::handler as window_ops;

// Re-export logging initialization
pub use logging::init_logging;
