//! Process token and NTFS security descriptor access.

use std::path::Path;
use std::ptr;

use tracing::debug;
use windows::Win32::Foundation::{ERROR_SUCCESS, HANDLE};
use windows::Win32::Security::Authorization::{GetNamedSecurityInfoW, SE_FILE_OBJECT};
use windows::Win32::Security::{
    ACL, DACL_SECURITY_INFORMATION, GetLengthSid, GetTokenInformation, IsValidSid,
    PSECURITY_DESCRIPTOR, PSID, TOKEN_GROUPS, TOKEN_INFORMATION_CLASS, TOKEN_QUERY, TOKEN_USER,
    TokenGroups, TokenUser,
};
use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};
use windows::core::PCWSTR;

use crate::platform::windows::{LocalAllocGuard, OwnedHandle, to_wide};
use crate::security::acl::AccessControlList;
use crate::security::errors::AccessError;
use crate::security::evaluator::DescriptorSource;
use crate::security::identity::{IdentitySource, SecurityIdentity};
use crate::security::sid::Sid;

/// Reads the user and group SIDs from the current process token.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessToken;

impl IdentitySource for ProcessToken {
    fn current_identity(&self) -> Result<SecurityIdentity, AccessError> {
        let mut raw = HANDLE::default();
        unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut raw) }.map_err(|e| {
            AccessError::IdentityResolution {
                message: format!("OpenProcessToken failed: {}", e),
            }
        })?;
        let token = OwnedHandle::new(raw);

        let user_buffer = token_information(&token, TokenUser)?;
        // SAFETY: the buffer was filled by GetTokenInformation(TokenUser) and is 8-byte aligned
        let user = unsafe { &*(user_buffer.as_ptr() as *const TOKEN_USER) };
        let principal = sid_from_psid(user.User.Sid)?;

        let group_buffer = token_information(&token, TokenGroups)?;
        // SAFETY: as above, for TokenGroups; Groups is a GroupCount-long trailing array
        let groups = unsafe {
            let header = &*(group_buffer.as_ptr() as *const TOKEN_GROUPS);
            std::slice::from_raw_parts(header.Groups.as_ptr(), header.GroupCount as usize)
        };
        let groups = groups
            .iter()
            .map(|entry| sid_from_psid(entry.Sid))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            event = "core.security.identity_resolved",
            principal = %principal,
            group_count = groups.len()
        );

        Ok(SecurityIdentity::new(principal, groups))
    }
}

/// Query a variable-length token information class into an aligned buffer.
fn token_information(
    token: &OwnedHandle,
    class: TOKEN_INFORMATION_CLASS,
) -> Result<Vec<u64>, AccessError> {
    let mut needed = 0u32;
    // The sizing call fails with ERROR_INSUFFICIENT_BUFFER by contract
    let _ = unsafe { GetTokenInformation(token.get(), class, None, 0, &mut needed) };
    if needed == 0 {
        return Err(AccessError::IdentityResolution {
            message: format!("GetTokenInformation({}) reported an empty result", class.0),
        });
    }

    let mut buffer = vec![0u64; (needed as usize).div_ceil(8)];
    unsafe {
        GetTokenInformation(
            token.get(),
            class,
            Some(buffer.as_mut_ptr().cast()),
            needed,
            &mut needed,
        )
    }
    .map_err(|e| AccessError::IdentityResolution {
        message: format!("GetTokenInformation({}) failed: {}", class.0, e),
    })?;

    Ok(buffer)
}

fn sid_from_psid(psid: PSID) -> Result<Sid, AccessError> {
    if psid.is_invalid() || !unsafe { IsValidSid(psid) }.as_bool() {
        return Err(AccessError::IdentityResolution {
            message: "token contains an invalid SID".to_string(),
        });
    }

    // SAFETY: psid is valid and GetLengthSid bounds the readable region
    let bytes = unsafe {
        let len = GetLengthSid(psid) as usize;
        std::slice::from_raw_parts(psid.0 as *const u8, len)
    };

    Sid::decode(bytes)
        .map(|(sid, _)| sid)
        .map_err(|e| AccessError::IdentityResolution {
            message: e.to_string(),
        })
}

/// Reads a file or directory DACL through `GetNamedSecurityInfoW`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedSecurityInfo;

impl DescriptorSource for NamedSecurityInfo {
    fn discretionary_acl(&self, path: &Path) -> Result<Option<AccessControlList>, AccessError> {
        let query_error = |message: String| AccessError::DescriptorQuery {
            path: path.display().to_string(),
            message,
        };

        let wide = to_wide(path.as_os_str());
        let mut dacl: *mut ACL = ptr::null_mut();
        let mut descriptor = PSECURITY_DESCRIPTOR::default();

        let status = unsafe {
            GetNamedSecurityInfoW(
                PCWSTR(wide.as_ptr()),
                SE_FILE_OBJECT,
                DACL_SECURITY_INFORMATION,
                None,
                None,
                Some(&mut dacl),
                None,
                &mut descriptor,
            )
        };
        // The DACL points into the descriptor, so it is copied out before this drops
        let _descriptor = LocalAllocGuard::new(descriptor.0);

        if status != ERROR_SUCCESS {
            return Err(query_error(
                std::io::Error::from_raw_os_error(status.0 as i32).to_string(),
            ));
        }

        if dacl.is_null() {
            return Ok(None);
        }

        // SAFETY: a non-null DACL returned with the descriptor spans AclSize bytes
        let bytes = unsafe {
            let size = usize::from((*dacl).AclSize);
            std::slice::from_raw_parts(dacl as *const u8, size).to_vec()
        };

        AccessControlList::parse(bytes)
            .map(Some)
            .map_err(|e| query_error(e.to_string()))
    }
}
