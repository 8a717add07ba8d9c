use serde::Serialize;

use super::errors::AccessError;
use super::sid::Sid;

/// The principal behind the calling process and the groups it belongs to.
///
/// Resolved fresh for every write-access check and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityIdentity {
    principal: Sid,
    groups: Vec<Sid>,
}

impl SecurityIdentity {
    pub fn new(principal: Sid, groups: impl IntoIterator<Item = Sid>) -> Self {
        let mut groups: Vec<Sid> = groups.into_iter().collect();
        groups.sort();
        groups.dedup();
        Self { principal, groups }
    }

    pub fn principal(&self) -> &Sid {
        &self.principal
    }

    pub fn groups(&self) -> &[Sid] {
        &self.groups
    }

    /// True iff `sid` is the principal or one of its group memberships.
    pub fn is_member_of(&self, sid: &Sid) -> bool {
        self.principal == *sid || self.groups.binary_search(sid).is_ok()
    }
}

/// Resolves the identity of the calling process.
pub trait IdentitySource {
    fn current_identity(&self) -> Result<SecurityIdentity, AccessError>;
}

impl<T: IdentitySource + ?Sized> IdentitySource for &T {
    fn current_identity(&self) -> Result<SecurityIdentity, AccessError> {
        (**self).current_identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_is_member() {
        let user = Sid::unix_user(501);
        let identity = SecurityIdentity::new(user.clone(), []);
        assert!(identity.is_member_of(&user));
        assert!(!identity.is_member_of(&Sid::everyone()));
    }

    #[test]
    fn test_group_membership() {
        let identity = SecurityIdentity::new(
            Sid::unix_user(501),
            [Sid::unix_group(20), Sid::everyone(), Sid::unix_group(20)],
        );
        assert_eq!(identity.groups().len(), 2);
        assert!(identity.is_member_of(&Sid::unix_group(20)));
        assert!(identity.is_member_of(&Sid::everyone()));
        assert!(!identity.is_member_of(&Sid::unix_group(80)));
        assert!(!identity.is_member_of(&Sid::unix_user(0)));
    }
}
