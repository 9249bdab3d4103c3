//! Error types for CUDS operations.
//!
//! Every adapter, container and classifier in the workspace reports failures
//! through [`CudsError`]; [`ErrorKind`] gives callers a stable category to
//! branch on.

use thiserror::Error;
use uuid::Uuid;

/// Category of a [`CudsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Attribute key not in the registry.
    UnknownKey,
    /// Value inconsistent with its key, or dataset not adoptable as a kind.
    Type,
    /// Out-of-range row, node or point.
    Index,
    /// Invalid argument value.
    Value,
    /// Dataset arrays do not form a valid attribute table.
    InvalidDataset,
    /// Primitive vectors match no Bravais family.
    NoMatchingFamily,
    /// A mutation left a table in a partially updated state.
    InvalidState,
    /// No item with the requested UID.
    UnknownUid,
}

/// Errors that can occur while reading or mutating CUDS containers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CudsError {
    /// Attribute key name not in the registry.
    #[error("unknown attribute key: {name}")]
    UnknownKey {
        /// The rejected name.
        name: String,
    },

    /// Value shape/type inconsistent with a key, or a dataset that cannot be
    /// adopted as the requested container kind.
    #[error("type error: {message}")]
    Type {
        /// Description of the mismatch.
        message: String,
    },

    /// Index outside the valid range.
    #[error("index {index} out of range for length {len}")]
    Index {
        /// The requested index.
        index: usize,
        /// Number of valid entries.
        len: usize,
    },

    /// Node or point index outside the structured extent.
    #[error("index {index:?} out of bounds for size {size:?}")]
    NodeIndex {
        /// The requested node index.
        index: [usize; 3],
        /// Extent of the lattice.
        size: [usize; 3],
    },

    /// Invalid argument value.
    #[error("value error: {message}")]
    Value {
        /// Description of the error.
        message: String,
    },

    /// The dataset has arrays with non-registry names or unequal lengths.
    #[error("invalid dataset: {message}")]
    InvalidDataset {
        /// Description of the error.
        message: String,
    },

    /// The lattice classifier found no family for the primitive vectors.
    #[error("primitive vectors do not match any Bravais lattice family")]
    NoMatchingFamily,

    /// A mutation stopped halfway through updating several columns.
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of the inconsistency.
        message: String,
    },

    /// No item with the given UID.
    #[error("no item with uid {uid}")]
    UnknownUid {
        /// The missing UID.
        uid: Uuid,
    },
}

impl CudsError {
    /// Build a [`CudsError::Type`].
    pub fn type_error(message: impl Into<String>) -> Self {
        CudsError::Type {
            message: message.into(),
        }
    }

    /// Build a [`CudsError::Value`].
    pub fn value_error(message: impl Into<String>) -> Self {
        CudsError::Value {
            message: message.into(),
        }
    }

    /// Build a [`CudsError::InvalidDataset`].
    pub fn invalid_dataset(message: impl Into<String>) -> Self {
        CudsError::InvalidDataset {
            message: message.into(),
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CudsError::UnknownKey { .. } => ErrorKind::UnknownKey,
            CudsError::Type { .. } => ErrorKind::Type,
            CudsError::Index { .. } | CudsError::NodeIndex { .. } => ErrorKind::Index,
            CudsError::Value { .. } => ErrorKind::Value,
            CudsError::InvalidDataset { .. } => ErrorKind::InvalidDataset,
            CudsError::NoMatchingFamily => ErrorKind::NoMatchingFamily,
            CudsError::InvalidState { .. } => ErrorKind::InvalidState,
            CudsError::UnknownUid { .. } => ErrorKind::UnknownUid,
        }
    }
}

/// Result type for CUDS operations.
pub type Result<T> = std::result::Result<T, CudsError>;
