//! POSIX credentials and mode bits expressed as SIDs and an ordered ACL.
//!
//! Users map to `S-1-22-1-<uid>` and groups to `S-1-22-2-<gid>`. A path's
//! mode bits become up to three entries in owner, group, other order. A
//! class lacking the write bit gets a deny entry, so the first-match walk
//! stops at the caller's class exactly as the kernel does. Superuser
//! overrides are not modelled.

use std::os::unix::fs::MetadataExt;
use std::path::Path;

use nix::unistd::{Gid, getegid, geteuid};
use tracing::debug;

use crate::security::acl::{AccessControlList, AclBuilder};
use crate::security::errors::{AccessError, AclDecodeError};
use crate::security::evaluator::DescriptorSource;
use crate::security::identity::{IdentitySource, SecurityIdentity};
use crate::security::mask::AccessMask;
use crate::security::sid::Sid;

const OWNER_WRITE: u32 = 0o200;
const GROUP_WRITE: u32 = 0o020;
const OTHER_WRITE: u32 = 0o002;
const OWNER_READ: u32 = 0o400;
const GROUP_READ: u32 = 0o040;
const OTHER_READ: u32 = 0o004;

/// Effective uid, effective gid and supplementary groups of this process.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectiveCredentials;

impl IdentitySource for EffectiveCredentials {
    fn current_identity(&self) -> Result<SecurityIdentity, AccessError> {
        let uid = geteuid().as_raw();
        let egid = getegid();

        let mut groups: Vec<Sid> = supplementary_groups(uid)?
            .into_iter()
            .map(|gid| Sid::unix_group(gid.as_raw()))
            .collect();
        groups.push(Sid::unix_group(egid.as_raw()));
        groups.push(Sid::everyone());

        debug!(
            event = "core.security.identity_resolved",
            uid = uid,
            group_count = groups.len()
        );

        Ok(SecurityIdentity::new(Sid::unix_user(uid), groups))
    }
}

#[cfg(not(target_vendor = "apple"))]
fn supplementary_groups(_uid: u32) -> Result<Vec<Gid>, AccessError> {
    nix::unistd::getgroups().map_err(|e| AccessError::IdentityResolution {
        message: format!("getgroups failed: {}", e),
    })
}

// nix does not expose getgroups or getgrouplist on Apple targets, so the
// memberships come from the user database instead.
#[cfg(target_vendor = "apple")]
fn supplementary_groups(uid: u32) -> Result<Vec<Gid>, AccessError> {
    let users = sysinfo::Users::new_with_refreshed_list();
    let user = users
        .list()
        .iter()
        .find(|user| **user.id() == uid)
        .ok_or_else(|| AccessError::IdentityResolution {
            message: format!("no user record for uid {}", uid),
        })?;

    Ok(user
        .groups()
        .iter()
        .map(|group| Gid::from_raw(**group.id()))
        .collect())
}

/// Renders a path's permission bits as a DACL.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeBits;

impl ModeBits {
    /// Build the ordered ACL for the given owner, group and mode.
    pub fn acl_for(uid: u32, gid: u32, mode: u32) -> Result<AccessControlList, AclDecodeError> {
        let class = |write_bit: u32, read_bit: u32| {
            let mut mask = AccessMask::empty();
            if mode & read_bit != 0 {
                mask |= AccessMask::GENERIC_READ;
            }
            if mode & write_bit != 0 {
                mask |= AccessMask::GENERIC_WRITE;
            }
            mask
        };

        let mut builder = AclBuilder::new();
        for (subject, write_bit, read_bit) in [
            (Sid::unix_user(uid), OWNER_WRITE, OWNER_READ),
            (Sid::unix_group(gid), GROUP_WRITE, GROUP_READ),
        ] {
            builder = if mode & write_bit != 0 {
                builder.allow(subject, class(write_bit, read_bit))
            } else {
                builder.deny(subject, AccessMask::GENERIC_WRITE)
            };
        }
        if mode & OTHER_WRITE != 0 {
            builder = builder.allow(Sid::everyone(), class(OTHER_WRITE, OTHER_READ));
        }

        builder.build()
    }
}

impl DescriptorSource for ModeBits {
    fn discretionary_acl(&self, path: &Path) -> Result<Option<AccessControlList>, AccessError> {
        let metadata = std::fs::metadata(path).map_err(|e| AccessError::DescriptorQuery {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::acl_for(metadata.uid(), metadata.gid(), metadata.mode())
            .map(Some)
            .map_err(|e| AccessError::DescriptorQuery {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::evaluator::{WriteDecision, evaluate_write_access};

    fn member(uid: u32, groups: &[u32]) -> SecurityIdentity {
        SecurityIdentity::new(
            Sid::unix_user(uid),
            groups
                .iter()
                .map(|g| Sid::unix_group(*g))
                .chain([Sid::everyone()]),
        )
    }

    fn decide(identity: &SecurityIdentity, mode: u32) -> WriteDecision {
        let acl = ModeBits::acl_for(1000, 100, mode).unwrap();
        evaluate_write_access(identity, Some(&acl)).unwrap()
    }

    #[test]
    fn test_owner_with_write_bit() {
        assert!(decide(&member(1000, &[100]), 0o644).allows_write());
    }

    #[test]
    fn test_owner_without_write_bit_is_denied_even_if_others_may_write() {
        let decision = decide(&member(1000, &[100]), 0o466);
        assert!(matches!(decision, WriteDecision::Denied { index: 0, .. }));
    }

    #[test]
    fn test_group_member_uses_group_bits() {
        assert!(decide(&member(2000, &[100]), 0o664).allows_write());
        assert!(!decide(&member(2000, &[100]), 0o646).allows_write());
    }

    #[test]
    fn test_other_uses_other_bits() {
        assert!(decide(&member(2000, &[200]), 0o646).allows_write());
        assert_eq!(
            decide(&member(2000, &[200]), 0o644),
            WriteDecision::NoGrant { entries_checked: 2 }
        );
    }

    #[test]
    fn test_acl_shape() {
        let acl = ModeBits::acl_for(0, 0, 0o755).unwrap();
        assert_eq!(acl.len(), 2);
        let acl = ModeBits::acl_for(0, 0, 0o777).unwrap();
        assert_eq!(acl.len(), 3);
    }

    #[test]
    fn test_identity_includes_effective_ids() {
        let identity = EffectiveCredentials.current_identity().unwrap();
        assert_eq!(identity.principal(), &Sid::unix_user(geteuid().as_raw()));
        assert!(identity.is_member_of(&Sid::unix_group(getegid().as_raw())));
        assert!(identity.is_member_of(&Sid::everyone()));
    }

    #[test]
    fn test_supplementary_groups_are_members() {
        let uid = geteuid().as_raw();
        let identity = EffectiveCredentials.current_identity().unwrap();
        for gid in supplementary_groups(uid).unwrap() {
            assert!(identity.is_member_of(&Sid::unix_group(gid.as_raw())));
        }
    }

    #[cfg(target_vendor = "apple")]
    #[test]
    fn test_user_database_groups_include_primary_group() {
        let groups = supplementary_groups(geteuid().as_raw()).unwrap();
        assert!(!groups.is_empty());
        assert!(groups.contains(&getegid()));
    }

    #[test]
    fn test_missing_path_is_descriptor_error() {
        let err = ModeBits
            .discretionary_acl(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(err, AccessError::DescriptorQuery { .. }));
    }

    #[test]
    fn test_own_temp_dir_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        let acl = ModeBits.discretionary_acl(dir.path()).unwrap();
        let identity = EffectiveCredentials.current_identity().unwrap();
        assert!(
            evaluate_write_access(&identity, acl.as_ref())
                .unwrap()
                .allows_write()
        );
    }
}
