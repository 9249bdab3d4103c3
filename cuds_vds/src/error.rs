//! Error types for cuds_vds operations.
//!
//! The adapters report through the CUDS error taxonomy; dataset-level
//! failures from `vds_io` arrive as [`CudsError::InvalidDataset`].

use tracing::warn;
use uuid::Uuid;

pub use cuds_core::error::{CudsError, ErrorKind, Result};

/// UID of an item passed to an update, which must carry one.
pub(crate) fn require_uid(uid: Option<Uuid>, what: &str) -> Result<Uuid> {
    uid.ok_or_else(|| CudsError::value_error(format!("{what} has no uid")))
}

/// True for failures that mean "not adoptable as this kind".
pub(crate) fn is_type_error(error: &CudsError) -> bool {
    error.kind() == ErrorKind::Type
}

/// Item of a container iterator; a row that cannot be read is logged and
/// skipped.
pub(crate) fn read_or_warn<T>(item: Result<T>, what: &str) -> Option<T> {
    match item {
        Ok(item) => Some(item),
        Err(error) => {
            warn!(%error, what, "skipping unreadable item");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_uid() {
        let uid = Uuid::new_v4();
        assert_eq!(require_uid(Some(uid), "point").unwrap(), uid);
        let err = require_uid(None, "point").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("point has no uid"));
    }

    #[test]
    fn test_vds_errors_are_invalid_dataset() {
        let err: CudsError = vds_io::VdsError::MalformedConnectivity { offset: 3 }.into();
        assert_eq!(err.kind(), ErrorKind::InvalidDataset);
        assert!(!is_type_error(&err));
        assert!(is_type_error(&CudsError::type_error("not a mesh")));
    }

    #[test]
    fn test_read_or_warn() {
        assert_eq!(read_or_warn(Ok(3), "row"), Some(3));
        let failed: Result<i32> = Err(CudsError::InvalidState {
            message: "columns differ in length".into(),
        });
        assert_eq!(read_or_warn(failed, "row"), None);
    }
}
