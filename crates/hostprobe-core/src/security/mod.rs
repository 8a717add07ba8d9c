//! Write-access evaluation against access-control lists.
//!
//! [`handler::can_current_user_write`] resolves the calling identity, reads
//! the path's DACL and walks it with first-match semantics. The decision
//! logic in [`evaluator`] is platform-independent; [`native`] supplies the
//! OS-specific sources.

pub mod acl;
pub mod errors;
pub mod evaluator;
pub mod handler;
pub mod identity;
pub mod mask;
pub mod native;
pub mod sid;

pub use acl::{AccessControlEntry, AccessControlList, AceKind, AclBuilder};
pub use errors::{AccessError, AclDecodeError};
pub use evaluator::{AccessEvaluator, DescriptorSource, WriteDecision, evaluate_write_access};
pub use handler::{can_current_user_write, check_write_access};
pub use identity::{IdentitySource, SecurityIdentity};
pub use mask::AccessMask;
pub use sid::Sid;
