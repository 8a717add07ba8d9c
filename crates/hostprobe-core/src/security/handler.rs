use std::path::Path;

use tracing::info;

use super::errors::AccessError;
use super::evaluator::{AccessEvaluator, WriteDecision};
use super::native::{NativeDescriptors, NativeIdentity};
use crate::errors::ProbeError;

fn native_evaluator() -> AccessEvaluator<NativeIdentity, NativeDescriptors> {
    AccessEvaluator::new(NativeIdentity::default(), NativeDescriptors::default())
}

/// Decide whether the current user can write to `path`, with the reason.
pub fn check_write_access(path: &Path) -> Result<WriteDecision, AccessError> {
    info!(event = "core.security.check_started", path = %path.display());

    let result = native_evaluator().check(path);

    match &result {
        Ok(decision) => info!(
            event = "core.security.check_completed",
            path = %path.display(),
            writable = decision.allows_write()
        ),
        Err(e) => info!(
            event = "core.security.check_failed",
            path = %path.display(),
            error_code = e.error_code(),
            error = %e
        ),
    }

    result
}

/// Whether the current user can write to `path`.
///
/// Never fails: any error reading the identity or the descriptor is logged
/// and reported as `false`. A path without a DACL is writable.
pub fn can_current_user_write(path: &Path) -> bool {
    native_evaluator().can_write(path)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(can_current_user_write(dir.path()));
        assert!(check_write_access(dir.path()).unwrap().allows_write());
    }

    #[test]
    fn test_missing_path_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(!can_current_user_write(&missing));
        assert!(matches!(
            check_write_access(&missing),
            Err(AccessError::DescriptorQuery { .. })
        ));
    }
}
