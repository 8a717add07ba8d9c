//! Discretionary access-control list records.
//!
//! An ACL is an 8-byte header followed by `ace_count` variable-length
//! entries packed back to back:
//!
//! ```text
//! ACL header   revision:u8 sbz1:u8 acl_size:u16 ace_count:u16 sbz2:u16
//! ACE header   ace_type:u8 ace_flags:u8 ace_size:u16
//! allow/deny   mask:u32 sid:[u8; 8 + 4n]
//! ```
//!
//! All multi-byte integers are little-endian. Entries are decoded lazily and
//! in stored order, so a corrupt entry is only reported when the walk
//! reaches it.

use serde::Serialize;

use super::errors::AclDecodeError;
use super::mask::AccessMask;
use super::sid::Sid;

pub const ACL_REVISION: u8 = 2;
pub const ACL_REVISION_DS: u8 = 4;

pub const ACCESS_ALLOWED_ACE_TYPE: u8 = 0;
pub const ACCESS_DENIED_ACE_TYPE: u8 = 1;

const ACL_HEADER_LEN: usize = 8;
const ACE_HEADER_LEN: usize = 4;
const ACE_MASK_LEN: usize = 4;
const MIN_SID_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AceKind {
    Allow,
    Deny,
    /// Any other ACE type (audit, object, callback, ...). Never interpreted.
    Other(u8),
}

impl AceKind {
    pub fn from_type(ace_type: u8) -> Self {
        match ace_type {
            ACCESS_ALLOWED_ACE_TYPE => AceKind::Allow,
            ACCESS_DENIED_ACE_TYPE => AceKind::Deny,
            other => AceKind::Other(other),
        }
    }

    pub fn type_code(self) -> u8 {
        match self {
            AceKind::Allow => ACCESS_ALLOWED_ACE_TYPE,
            AceKind::Deny => ACCESS_DENIED_ACE_TYPE,
            AceKind::Other(code) => code,
        }
    }
}

/// One decoded access-control entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessControlEntry {
    pub kind: AceKind,
    pub flags: u8,
    /// `None` for [`AceKind::Other`], whose body is not decoded.
    pub subject: Option<Sid>,
    pub mask: AccessMask,
}

impl AccessControlEntry {
    pub fn allow(subject: Sid, mask: AccessMask) -> Self {
        Self {
            kind: AceKind::Allow,
            flags: 0,
            subject: Some(subject),
            mask,
        }
    }

    pub fn deny(subject: Sid, mask: AccessMask) -> Self {
        Self {
            kind: AceKind::Deny,
            flags: 0,
            subject: Some(subject),
            mask,
        }
    }
}

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Decode the entry starting at `offset` within an ACL body.
///
/// Returns the entry and its declared size.
pub fn decode_ace(acl: &[u8], offset: usize) -> Result<(AccessControlEntry, usize), AclDecodeError> {
    let available = acl.len().saturating_sub(offset);
    if available < ACE_HEADER_LEN {
        return Err(AclDecodeError::Truncated {
            record: "ACE header",
            needed: ACE_HEADER_LEN,
            available,
        });
    }

    let ace_type = acl[offset];
    let flags = acl[offset + 1];
    let size = read_u16(acl, offset + 2);
    let size_usize = usize::from(size);

    if size_usize < ACE_HEADER_LEN || size_usize % 4 != 0 || size_usize > available {
        return Err(AclDecodeError::InvalidAceSize { offset, size });
    }

    let ace = &acl[offset..offset + size_usize];
    let kind = AceKind::from_type(ace_type);

    let entry = match kind {
        AceKind::Allow | AceKind::Deny => {
            let needed = ACE_HEADER_LEN + ACE_MASK_LEN + MIN_SID_LEN;
            if ace.len() < needed {
                return Err(AclDecodeError::Truncated {
                    record: "ACE body",
                    needed,
                    available: ace.len(),
                });
            }
            let mask = AccessMask::from_bits_retain(read_u32(ace, ACE_HEADER_LEN));
            let (subject, _) = Sid::decode(&ace[ACE_HEADER_LEN + ACE_MASK_LEN..])?;
            AccessControlEntry {
                kind,
                flags,
                subject: Some(subject),
                mask,
            }
        }
        AceKind::Other(_) => AccessControlEntry {
            kind,
            flags,
            subject: None,
            mask: AccessMask::empty(),
        },
    };

    Ok((entry, size_usize))
}

/// A read-only snapshot of a discretionary ACL in its binary form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlList {
    ace_count: u16,
    bytes: Vec<u8>,
}

impl AccessControlList {
    /// Validate the header and take ownership of the record.
    ///
    /// Bytes past the declared ACL size are discarded. Entries are not
    /// decoded until [`entries`](Self::entries) reaches them.
    pub fn parse(mut bytes: Vec<u8>) -> Result<Self, AclDecodeError> {
        if bytes.len() < ACL_HEADER_LEN {
            return Err(AclDecodeError::Truncated {
                record: "ACL header",
                needed: ACL_HEADER_LEN,
                available: bytes.len(),
            });
        }

        let revision = bytes[0];
        if revision != ACL_REVISION && revision != ACL_REVISION_DS {
            return Err(AclDecodeError::UnsupportedAclRevision { revision });
        }

        let declared = usize::from(read_u16(&bytes, 2));
        if declared < ACL_HEADER_LEN || declared > bytes.len() {
            return Err(AclDecodeError::AclSizeMismatch {
                declared,
                available: bytes.len(),
            });
        }

        let ace_count = read_u16(&bytes, 4);
        bytes.truncate(declared);

        Ok(Self {
            ace_count,
            bytes,
        })
    }

    /// Number of entries declared by the header.
    pub fn len(&self) -> usize {
        usize::from(self.ace_count)
    }

    pub fn is_empty(&self) -> bool {
        self.ace_count == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Walk entries in stored order.
    ///
    /// The iterator yields `Err` once for the first undecodable entry and
    /// then stops.
    pub fn entries(&self) -> AceIter<'_> {
        AceIter {
            acl: &self.bytes,
            offset: ACL_HEADER_LEN,
            remaining: self.ace_count,
            failed: false,
        }
    }
}

pub struct AceIter<'a> {
    acl: &'a [u8],
    offset: usize,
    remaining: u16,
    failed: bool,
}

impl Iterator for AceIter<'_> {
    type Item = Result<AccessControlEntry, AclDecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        match decode_ace(self.acl, self.offset) {
            Ok((entry, size)) => {
                self.offset += size;
                Some(Ok(entry))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Encodes entries into the binary ACL layout.
#[derive(Debug, Clone, Default)]
pub struct AclBuilder {
    body: Vec<u8>,
    count: u16,
    error: Option<AclDecodeError>,
}

impl AclBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a typed entry.
    ///
    /// An allow or deny entry without a subject makes [`build`](Self::build) fail.
    pub fn entry(mut self, entry: &AccessControlEntry) -> Self {
        match (&entry.subject, entry.kind) {
            (Some(subject), _) => {
                let size = ACE_HEADER_LEN + ACE_MASK_LEN + subject.encoded_len();
                self.push_header(entry.kind.type_code(), entry.flags, size);
                self.body.extend_from_slice(&entry.mask.bits().to_le_bytes());
                subject.encode_into(&mut self.body);
            }
            (None, AceKind::Allow | AceKind::Deny) => {
                if self.error.is_none() {
                    self.error = Some(AclDecodeError::MissingAceSubject {
                        index: usize::from(self.count),
                    });
                }
            }
            (None, AceKind::Other(_)) => {
                self.push_header(entry.kind.type_code(), entry.flags, ACE_HEADER_LEN)
            }
        }
        self.count = self.count.saturating_add(1);
        self
    }

    pub fn allow(self, subject: Sid, mask: AccessMask) -> Self {
        self.entry(&AccessControlEntry::allow(subject, mask))
    }

    pub fn deny(self, subject: Sid, mask: AccessMask) -> Self {
        self.entry(&AccessControlEntry::deny(subject, mask))
    }

    /// Append an entry of arbitrary type with an opaque body (padded to 4 bytes).
    pub fn raw(mut self, ace_type: u8, flags: u8, body: &[u8]) -> Self {
        let padded = body.len().div_ceil(4) * 4;
        self.push_header(ace_type, flags, ACE_HEADER_LEN + padded);
        self.body.extend_from_slice(body);
        self.body.resize(self.body.len() + (padded - body.len()), 0);
        self.count = self.count.saturating_add(1);
        self
    }

    fn push_header(&mut self, ace_type: u8, flags: u8, size: usize) {
        self.body.push(ace_type);
        self.body.push(flags);
        self.body
            .extend_from_slice(&u16::try_from(size).unwrap_or(u16::MAX).to_le_bytes());
    }

    pub fn build(self) -> Result<AccessControlList, AclDecodeError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let size = ACL_HEADER_LEN + self.body.len();
        let declared = u16::try_from(size).map_err(|_| AclDecodeError::AclTooLarge { size })?;

        let mut bytes = Vec::with_capacity(size);
        bytes.push(ACL_REVISION);
        bytes.push(0);
        bytes.extend_from_slice(&declared.to_le_bytes());
        bytes.extend_from_slice(&self.count.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend_from_slice(&self.body);

        AccessControlList::parse(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Sid {
        "S-1-5-21-1-2-3-1001".parse().unwrap()
    }

    #[test]
    fn test_builder_rejects_allow_without_subject() {
        let entry = AccessControlEntry {
            kind: AceKind::Allow,
            flags: 0,
            subject: None,
            mask: AccessMask::GENERIC_WRITE,
        };
        let err = AclBuilder::new()
            .allow(user(), AccessMask::GENERIC_READ)
            .entry(&entry)
            .build()
            .unwrap_err();
        assert_eq!(err, AclDecodeError::MissingAceSubject { index: 1 });
    }

    #[test]
    fn test_builder_accepts_other_kind_without_subject() {
        let entry = AccessControlEntry {
            kind: AceKind::Other(7),
            flags: 0,
            subject: None,
            mask: AccessMask::empty(),
        };
        let acl = AclBuilder::new().entry(&entry).build().unwrap();
        let entries: Vec<_> = acl.entries().collect::<Result<_, _>>().unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[test]
    fn test_empty_acl() {
        let acl = AclBuilder::new().build().unwrap();
        assert!(acl.is_empty());
        assert_eq!(acl.as_bytes(), &[2, 0, 8, 0, 0, 0, 0, 0]);
        assert_eq!(acl.entries().count(), 0);
    }

    #[test]
    fn test_decode_hand_written_acl() {
        // One ACCESS_DENIED ACE for S-1-1-0 with WRITE_DAC
        let bytes = vec![
            0x02, 0x00, 0x1C, 0x00, 0x01, 0x00, 0x00, 0x00, // ACL header, size 28, 1 ACE
            0x01, 0x00, 0x14, 0x00, // deny, flags 0, size 20
            0x00, 0x00, 0x04, 0x00, // WRITE_DAC
            0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, // S-1-1-0
        ];
        let acl = AccessControlList::parse(bytes).unwrap();
        let entries: Vec<_> = acl.entries().collect::<Result<_, _>>().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, AceKind::Deny);
        assert_eq!(entries[0].subject, Some(Sid::everyone()));
        assert_eq!(entries[0].mask, AccessMask::WRITE_DAC);
    }

    #[test]
    fn test_builder_preserves_order() {
        let acl = AclBuilder::new()
            .deny(Sid::everyone(), AccessMask::GENERIC_WRITE)
            .allow(user(), AccessMask::GENERIC_READ)
            .allow(Sid::unix_group(20), AccessMask::WRITE_OWNER)
            .build()
            .unwrap();

        let kinds: Vec<_> = acl.entries().map(|e| e.unwrap().kind).collect();
        assert_eq!(kinds, vec![AceKind::Deny, AceKind::Allow, AceKind::Allow]);

        let last = acl.entries().last().unwrap().unwrap();
        assert_eq!(last.subject, Some(Sid::unix_group(20)));
    }

    #[test]
    fn test_other_ace_types_are_opaque() {
        // SYSTEM_AUDIT_ACE_TYPE (2) with a body we never interpret
        let acl = AclBuilder::new()
            .raw(2, 0x40, &[0xFF; 10])
            .allow(user(), AccessMask::GENERIC_WRITE)
            .build()
            .unwrap();

        let entries: Vec<_> = acl.entries().collect::<Result<_, _>>().unwrap();
        assert_eq!(entries[0].kind, AceKind::Other(2));
        assert_eq!(entries[0].flags, 0x40);
        assert!(entries[0].subject.is_none());
        assert_eq!(entries[1].kind, AceKind::Allow);
    }

    #[test]
    fn test_header_too_short() {
        let err = AccessControlList::parse(vec![2, 0, 8]).unwrap_err();
        assert!(matches!(err, AclDecodeError::Truncated { needed: 8, .. }));
    }

    #[test]
    fn test_unsupported_revision() {
        let err = AccessControlList::parse(vec![3, 0, 8, 0, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(err, AclDecodeError::UnsupportedAclRevision { revision: 3 });
    }

    #[test]
    fn test_declared_size_beyond_buffer() {
        let err = AccessControlList::parse(vec![2, 0, 64, 0, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(
            err,
            AclDecodeError::AclSizeMismatch {
                declared: 64,
                available: 8
            }
        );
    }

    #[test]
    fn test_trailing_bytes_are_discarded() {
        let acl = AccessControlList::parse(vec![2, 0, 8, 0, 0, 0, 0, 0, 0xEE, 0xEE]).unwrap();
        assert_eq!(acl.as_bytes().len(), 8);
    }

    #[test]
    fn test_corrupt_entry_stops_iteration() {
        let acl = AclBuilder::new()
            .allow(user(), AccessMask::GENERIC_READ)
            .build()
            .unwrap();

        // Claim a second entry that is not there
        let mut bytes = acl.as_bytes().to_vec();
        bytes[4] = 2;
        let acl = AccessControlList::parse(bytes).unwrap();

        let results: Vec<_> = acl.entries().collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(AclDecodeError::Truncated {
                record: "ACE header",
                ..
            })
        ));
    }

    #[test]
    fn test_ace_size_smaller_than_header() {
        let mut bytes = vec![2, 0, 12, 0, 1, 0, 0, 0];
        bytes.extend_from_slice(&[0, 0, 2, 0]);
        let acl = AccessControlList::parse(bytes).unwrap();

        let err = acl.entries().next().unwrap().unwrap_err();
        assert_eq!(err, AclDecodeError::InvalidAceSize { offset: 8, size: 2 });
    }

    #[test]
    fn test_allow_ace_too_small_for_sid() {
        let mut bytes = vec![2, 0, 16, 0, 1, 0, 0, 0];
        bytes.extend_from_slice(&[0, 0, 8, 0, 0, 0, 0, 0x40]);
        let acl = AccessControlList::parse(bytes).unwrap();

        let err = acl.entries().next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            AclDecodeError::Truncated {
                record: "ACE body",
                ..
            }
        ));
    }

    #[test]
    fn test_sid_overrunning_ace_is_rejected() {
        let acl = AclBuilder::new()
            .allow(user(), AccessMask::GENERIC_WRITE)
            .build()
            .unwrap();

        // Inflate the SID's sub-authority count past the ACE boundary
        let mut bytes = acl.as_bytes().to_vec();
        bytes[8 + 4 + 4 + 1] = 9;
        let acl = AccessControlList::parse(bytes).unwrap();

        let err = acl.entries().next().unwrap().unwrap_err();
        assert!(matches!(err, AclDecodeError::Truncated { record: "SID", .. }));
    }
}
