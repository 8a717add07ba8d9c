use std::fmt;

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Rights granted or denied by an access-control entry.
    ///
    /// Object-specific rights (the low 16 bits) are retained but unnamed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct AccessMask: u32 {
        const DELETE = 0x0001_0000;
        const READ_CONTROL = 0x0002_0000;
        const WRITE_DAC = 0x0004_0000;
        const WRITE_OWNER = 0x0008_0000;
        const SYNCHRONIZE = 0x0010_0000;
        const ACCESS_SYSTEM_SECURITY = 0x0100_0000;
        const MAXIMUM_ALLOWED = 0x0200_0000;
        const GENERIC_ALL = 0x1000_0000;
        const GENERIC_EXECUTE = 0x2000_0000;
        const GENERIC_WRITE = 0x4000_0000;
        const GENERIC_READ = 0x8000_0000;

        const _ = !0;
    }
}

impl AccessMask {
    /// Rights that amount to write capability: a holder of WRITE_DAC or
    /// WRITE_OWNER can grant itself write access.
    pub const WRITE_CAPABLE: Self = Self::GENERIC_WRITE
        .union(Self::WRITE_DAC)
        .union(Self::WRITE_OWNER);

    /// Order used for diagnostic output.
    const DIAGNOSTIC_ORDER: [(Self, &'static str); 11] = [
        (Self::GENERIC_READ, "GENERIC_READ"),
        (Self::GENERIC_WRITE, "GENERIC_WRITE"),
        (Self::GENERIC_EXECUTE, "GENERIC_EXECUTE"),
        (Self::GENERIC_ALL, "GENERIC_ALL"),
        (Self::WRITE_DAC, "WRITE_DAC"),
        (Self::WRITE_OWNER, "WRITE_OWNER"),
        (Self::SYNCHRONIZE, "SYNCHRONIZE"),
        (Self::DELETE, "DELETE"),
        (Self::READ_CONTROL, "READ_CONTROL"),
        (Self::ACCESS_SYSTEM_SECURITY, "ACCESS_SYSTEM_SECURITY"),
        (Self::MAXIMUM_ALLOWED, "MAXIMUM_ALLOWED"),
    ];

    /// Whether this mask grants generic-write, write-DAC or write-owner.
    pub fn grants_write(self) -> bool {
        self.intersects(Self::WRITE_CAPABLE)
    }

    /// Names of the standard and generic rights present, for logging only.
    pub fn permission_names(self) -> Vec<&'static str> {
        Self::DIAGNOSTIC_ORDER
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for AccessMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.permission_names();
        if names.is_empty() {
            write!(f, "0x{:08X}", self.bits())
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_capable_rights() {
        assert!(AccessMask::GENERIC_WRITE.grants_write());
        assert!(AccessMask::WRITE_DAC.grants_write());
        assert!(AccessMask::WRITE_OWNER.grants_write());
        assert!((AccessMask::GENERIC_READ | AccessMask::WRITE_OWNER).grants_write());
    }

    #[test]
    fn test_read_only_rights_do_not_grant_write() {
        let read = AccessMask::GENERIC_READ | AccessMask::READ_CONTROL | AccessMask::SYNCHRONIZE;
        assert!(!read.grants_write());
        assert!(!AccessMask::GENERIC_ALL.grants_write());
        assert!(!AccessMask::empty().grants_write());
    }

    #[test]
    fn test_specific_rights_are_retained() {
        // FILE_ALL_ACCESS as stored on NTFS objects
        let mask = AccessMask::from_bits_retain(0x001F_01FF);
        assert_eq!(mask.bits(), 0x001F_01FF);
        assert!(mask.contains(AccessMask::WRITE_DAC));
        assert!(mask.grants_write());
    }

    #[test]
    fn test_permission_names_order() {
        let mask = AccessMask::DELETE | AccessMask::GENERIC_READ | AccessMask::WRITE_DAC;
        assert_eq!(
            mask.permission_names(),
            vec!["GENERIC_READ", "WRITE_DAC", "DELETE"]
        );
        assert_eq!(mask.to_string(), "GENERIC_READ|WRITE_DAC|DELETE");
    }

    #[test]
    fn test_display_without_named_rights() {
        let mask = AccessMask::from_bits_retain(0x0000_0003);
        assert!(mask.permission_names().is_empty());
        assert_eq!(mask.to_string(), "0x00000003");
    }
}
