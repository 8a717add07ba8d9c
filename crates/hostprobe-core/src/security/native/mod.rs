//! Platform identity and descriptor sources.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::{EffectiveCredentials, ModeBits};
#[cfg(windows)]
pub use self::windows::{NamedSecurityInfo, ProcessToken};

#[cfg(unix)]
pub type NativeIdentity = EffectiveCredentials;
#[cfg(unix)]
pub type NativeDescriptors = ModeBits;

#[cfg(windows)]
pub type NativeIdentity = ProcessToken;
#[cfg(windows)]
pub type NativeDescriptors = NamedSecurityInfo;

#[cfg(not(any(unix, windows)))]
mod unsupported {
    use std::path::Path;

    use crate::security::acl::AccessControlList;
    use crate::security::errors::AccessError;
    use crate::security::evaluator::DescriptorSource;
    use crate::security::identity::{IdentitySource, SecurityIdentity};

    #[derive(Debug, Clone, Copy, Default)]
    pub struct Unsupported;

    impl IdentitySource for Unsupported {
        fn current_identity(&self) -> Result<SecurityIdentity, AccessError> {
            Err(AccessError::UnsupportedPlatform)
        }
    }

    impl DescriptorSource for Unsupported {
        fn discretionary_acl(
            &self,
            _path: &Path,
        ) -> Result<Option<AccessControlList>, AccessError> {
            Err(AccessError::UnsupportedPlatform)
        }
    }
}

#[cfg(not(any(unix, windows)))]
pub type NativeIdentity = unsupported::Unsupported;
#[cfg(not(any(unix, windows)))]
pub type NativeDescriptors = unsupported::Unsupported;
