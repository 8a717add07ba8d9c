use crate::errors::ProbeError;

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("Memory status query failed (code {code}): {message}")]
    QueryFailed { code: i32, message: String },

    #[error("Memory counters unavailable: {message}")]
    CountersUnavailable { message: String },
}

impl ProbeError for MemoryError {
    fn error_code(&self) -> &'static str {
        match self {
            MemoryError::QueryFailed { .. } => "MEMORY_QUERY_FAILED",
            MemoryError::CountersUnavailable { .. } => "MEMORY_COUNTERS_UNAVAILABLE",
        }
    }

    fn is_user_error(&self) -> bool {
        false
    }
}
