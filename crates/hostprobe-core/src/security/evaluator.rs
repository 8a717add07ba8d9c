use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use super::acl::{AccessControlList, AceKind};
use super::errors::AccessError;
use super::identity::{IdentitySource, SecurityIdentity};
use super::mask::AccessMask;
use super::sid::Sid;

/// Reads a path's discretionary ACL.
///
/// `Ok(None)` means the object has no DACL at all, which grants everyone
/// full access. It is distinct from an empty list, which grants nothing.
pub trait DescriptorSource {
    fn discretionary_acl(&self, path: &Path) -> Result<Option<AccessControlList>, AccessError>;
}

impl<T: DescriptorSource + ?Sized> DescriptorSource for &T {
    fn discretionary_acl(&self, path: &Path) -> Result<Option<AccessControlList>, AccessError> {
        (**self).discretionary_acl(path)
    }
}

/// Outcome of walking an ACL for the current identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum WriteDecision {
    /// The object carries no DACL.
    NoAccessControlList,
    /// A matching allow entry grants a write-capable right.
    Granted {
        index: usize,
        subject: Sid,
        mask: AccessMask,
    },
    /// A matching deny entry was reached first.
    Denied {
        index: usize,
        subject: Sid,
        mask: AccessMask,
    },
    /// The list was exhausted without a grant.
    NoGrant { entries_checked: usize },
}

impl WriteDecision {
    pub fn allows_write(&self) -> bool {
        matches!(
            self,
            WriteDecision::NoAccessControlList | WriteDecision::Granted { .. }
        )
    }
}

/// Walk `dacl` in stored order and decide whether `identity` may write.
///
/// The first entry whose subject matches the identity decides when it is a
/// deny, or when it is an allow carrying a write-capable right. Allow
/// entries without such a right, entries for other subjects, and entry kinds
/// other than allow/deny are passed over. A corrupt entry aborts the walk.
pub fn evaluate_write_access(
    identity: &SecurityIdentity,
    dacl: Option<&AccessControlList>,
) -> Result<WriteDecision, AccessError> {
    let Some(dacl) = dacl else {
        debug!(event = "core.security.no_dacl");
        return Ok(WriteDecision::NoAccessControlList);
    };

    let mut checked = 0;
    for (index, entry) in dacl.entries().enumerate() {
        let entry = entry.map_err(|source| AccessError::AceRead { index, source })?;
        checked += 1;

        let subject = match (entry.kind, entry.subject) {
            (AceKind::Allow | AceKind::Deny, Some(subject)) => subject,
            (kind, _) => {
                debug!(
                    event = "core.security.ace_skipped",
                    index = index,
                    kind = ?kind,
                    reason = "uninterpreted_kind"
                );
                continue;
            }
        };

        if !identity.is_member_of(&subject) {
            debug!(
                event = "core.security.ace_skipped",
                index = index,
                subject = %subject,
                reason = "subject_mismatch"
            );
            continue;
        }

        debug!(
            event = "core.security.ace_matched",
            index = index,
            subject = %subject,
            kind = ?entry.kind,
            permissions = %entry.mask
        );

        if entry.kind == AceKind::Deny {
            return Ok(WriteDecision::Denied {
                index,
                subject,
                mask: entry.mask,
            });
        }

        if entry.mask.grants_write() {
            return Ok(WriteDecision::Granted {
                index,
                subject,
                mask: entry.mask,
            });
        }
    }

    debug!(event = "core.security.no_write_grant", entries_checked = checked);
    Ok(WriteDecision::NoGrant {
        entries_checked: checked,
    })
}

/// Decides writability by combining an identity source with a descriptor source.
#[derive(Debug, Clone)]
pub struct AccessEvaluator<I, D> {
    identity: I,
    descriptors: D,
}

impl<I: IdentitySource, D: DescriptorSource> AccessEvaluator<I, D> {
    pub fn new(identity: I, descriptors: D) -> Self {
        Self {
            identity,
            descriptors,
        }
    }

    /// Resolve the identity, read the DACL, and walk it.
    pub fn check(&self, path: &Path) -> Result<WriteDecision, AccessError> {
        let identity = self.identity.current_identity()?;
        let dacl = self.descriptors.discretionary_acl(path)?;
        evaluate_write_access(&identity, dacl.as_ref())
    }

    /// Like [`check`](Self::check), but any failure means "not writable".
    pub fn can_write(&self, path: &Path) -> bool {
        match self.check(path) {
            Ok(decision) => {
                debug!(
                    event = "core.security.write_check_completed",
                    path = %path.display(),
                    decision = ?decision
                );
                decision.allows_write()
            }
            Err(e) => {
                warn!(
                    event = "core.security.write_check_failed",
                    path = %path.display(),
                    error = %e
                );
                false
            }
        }
    }
}
