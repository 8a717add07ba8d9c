//! Security identifiers.
//!
//! Binary layout (little-endian sub-authorities, big-endian authority):
//!
//! | offset | size  | field                  |
//! |--------|-------|------------------------|
//! | 0      | 1     | revision (always 1)    |
//! | 1      | 1     | sub-authority count    |
//! | 2      | 6     | identifier authority   |
//! | 8      | 4 * n | sub-authorities        |

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::errors::AclDecodeError;

/// Opaque principal or group identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sid {
    authority: [u8; 6],
    sub_authorities: Vec<u32>,
}

impl Sid {
    pub const REVISION: u8 = 1;
    pub const MAX_SUB_AUTHORITIES: usize = 15;
    const HEADER_LEN: usize = 8;

    /// Build a SID from a 48-bit authority and its sub-authorities.
    ///
    /// Authority bits above 48 are discarded and sub-authorities beyond
    /// [`Sid::MAX_SUB_AUTHORITIES`] are dropped.
    pub fn new(authority: u64, sub_authorities: &[u32]) -> Self {
        let bytes = authority.to_be_bytes();
        let mut auth = [0u8; 6];
        auth.copy_from_slice(&bytes[2..]);
        let count = sub_authorities.len().min(Self::MAX_SUB_AUTHORITIES);
        Self {
            authority: auth,
            sub_authorities: sub_authorities[..count].to_vec(),
        }
    }

    /// `S-1-1-0`, the group every principal belongs to.
    pub fn everyone() -> Self {
        Self::new(1, &[0])
    }

    /// `S-1-22-1-<uid>`, a Unix user mapped into SID space.
    pub fn unix_user(uid: u32) -> Self {
        Self::new(22, &[1, uid])
    }

    /// `S-1-22-2-<gid>`, a Unix group mapped into SID space.
    pub fn unix_group(gid: u32) -> Self {
        Self::new(22, &[2, gid])
    }

    pub fn authority(&self) -> u64 {
        self.authority
            .iter()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte))
    }

    pub fn sub_authorities(&self) -> &[u32] {
        &self.sub_authorities
    }

    /// Number of bytes the binary form occupies.
    pub fn encoded_len(&self) -> usize {
        Self::HEADER_LEN + 4 * self.sub_authorities.len()
    }

    /// Decode a SID from the start of `bytes`.
    ///
    /// Returns the SID and the number of bytes it occupied. Trailing bytes
    /// are ignored.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), AclDecodeError> {
        if bytes.len() < Self::HEADER_LEN {
            return Err(AclDecodeError::Truncated {
                record: "SID",
                needed: Self::HEADER_LEN,
                available: bytes.len(),
            });
        }

        let revision = bytes[0];
        if revision != Self::REVISION {
            return Err(AclDecodeError::UnsupportedSidRevision { revision });
        }

        let count = bytes[1];
        if usize::from(count) > Self::MAX_SUB_AUTHORITIES {
            return Err(AclDecodeError::TooManySubAuthorities { count });
        }

        let len = Self::HEADER_LEN + 4 * usize::from(count);
        if bytes.len() < len {
            return Err(AclDecodeError::Truncated {
                record: "SID",
                needed: len,
                available: bytes.len(),
            });
        }

        let mut authority = [0u8; 6];
        authority.copy_from_slice(&bytes[2..8]);

        let sub_authorities = bytes[Self::HEADER_LEN..len]
            .chunks_exact(4)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok((
            Self {
                authority,
                sub_authorities,
            },
            len,
        ))
    }

    /// Append the binary form to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(Self::REVISION);
        // Bounded by MAX_SUB_AUTHORITIES in every constructor
        out.push(self.sub_authorities.len() as u8);
        out.extend_from_slice(&self.authority);
        for sub in &self.sub_authorities {
            out.extend_from_slice(&sub.to_le_bytes());
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authority = self.authority();
        if authority >> 32 == 0 {
            write!(f, "S-{}-{}", Self::REVISION, authority)?;
        } else {
            write!(f, "S-{}-0x{:012X}", Self::REVISION, authority)?;
        }
        for sub in &self.sub_authorities {
            write!(f, "-{}", sub)?;
        }
        Ok(())
    }
}

impl FromStr for Sid {
    type Err = AclDecodeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = || AclDecodeError::MalformedSidString {
            input: input.to_string(),
        };

        let mut parts = input.split('-');
        if !parts.next().is_some_and(|p| p.eq_ignore_ascii_case("S")) {
            return Err(malformed());
        }
        if parts.next() != Some("1") {
            return Err(malformed());
        }

        let authority_str = parts.next().ok_or_else(malformed)?;
        let authority = match authority_str
            .strip_prefix("0x")
            .or_else(|| authority_str.strip_prefix("0X"))
        {
            Some(hex) => u64::from_str_radix(hex, 16).map_err(|_| malformed())?,
            None => authority_str.parse::<u64>().map_err(|_| malformed())?,
        };
        if authority >> 48 != 0 {
            return Err(malformed());
        }

        let sub_authorities = parts
            .map(|p| p.parse::<u32>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;
        if sub_authorities.len() > Self::MAX_SUB_AUTHORITIES {
            return Err(malformed());
        }

        Ok(Self::new(authority, &sub_authorities))
    }
}

impl Serialize for Sid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
