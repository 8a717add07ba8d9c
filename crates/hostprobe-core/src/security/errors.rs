use crate::errors::ProbeError;

/// Failures while decoding binary security records (SIDs, ACLs, ACEs).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclDecodeError {
    #[error("{record} truncated: need {needed} bytes, have {available}")]
    Truncated {
        record: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Unsupported SID revision {revision}")]
    UnsupportedSidRevision { revision: u8 },

    #[error("SID declares {count} sub-authorities, at most 15 are allowed")]
    TooManySubAuthorities { count: u8 },

    #[error("Unsupported ACL revision {revision}")]
    UnsupportedAclRevision { revision: u8 },

    #[error("ACL header declares {declared} bytes but only {available} are readable")]
    AclSizeMismatch { declared: usize, available: usize },

    #[error("ACE at offset {offset} has invalid size {size}")]
    InvalidAceSize { offset: usize, size: u16 },

    #[error("ACL of {size} bytes exceeds the 65535-byte record limit")]
    AclTooLarge { size: usize },

    #[error("Malformed SID string '{input}'")]
    MalformedSidString { input: String },

    #[error("Allow or deny entry {index} has no subject SID")]
    MissingAceSubject { index: usize },
}

/// Failures while evaluating write access for a path.
///
/// Every variant degrades `can_current_user_write` to `false`.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("Failed to resolve current security identity: {message}")]
    IdentityResolution { message: String },

    #[error("Failed to read security descriptor for '{path}': {message}")]
    DescriptorQuery { path: String, message: String },

    #[error("Failed to read access-control entry {index}: {source}")]
    AceRead {
        index: usize,
        #[source]
        source: AclDecodeError,
    },

    #[error("Access-control queries are not supported on this platform")]
    UnsupportedPlatform,
}

impl ProbeError for AclDecodeError {
    fn error_code(&self) -> &'static str {
        match self {
            AclDecodeError::Truncated { .. } => "ACL_TRUNCATED",
            AclDecodeError::UnsupportedSidRevision { .. } => "SID_UNSUPPORTED_REVISION",
            AclDecodeError::TooManySubAuthorities { .. } => "SID_TOO_MANY_SUB_AUTHORITIES",
            AclDecodeError::UnsupportedAclRevision { .. } => "ACL_UNSUPPORTED_REVISION",
            AclDecodeError::AclSizeMismatch { .. } => "ACL_SIZE_MISMATCH",
            AclDecodeError::InvalidAceSize { .. } => "ACE_INVALID_SIZE",
            AclDecodeError::AclTooLarge { .. } => "ACL_TOO_LARGE",
            AclDecodeError::MalformedSidString { .. } => "SID_MALFORMED_STRING",
            AclDecodeError::MissingAceSubject { .. } => "ACE_MISSING_SUBJECT",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, AclDecodeError::MalformedSidString { .. })
    }
}

impl ProbeError for AccessError {
    fn error_code(&self) -> &'static str {
        match self {
            AccessError::IdentityResolution { .. } => "ACCESS_IDENTITY_RESOLUTION_FAILED",
            AccessError::DescriptorQuery { .. } => "ACCESS_DESCRIPTOR_QUERY_FAILED",
            AccessError::AceRead { .. } => "ACCESS_ACE_READ_FAILED",
            AccessError::UnsupportedPlatform => "ACCESS_UNSUPPORTED_PLATFORM",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, AccessError::DescriptorQuery { .. })
    }
}
