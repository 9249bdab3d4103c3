//! Error types for vds_io operations.
//!
//! Provides specific variants for malformed arrays, connectivity and dataset
//! geometry.

use cuds_core::CudsError;
use thiserror::Error;

/// Errors that can occur while building or validating VDS datasets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VdsError {
    /// Array value count is not a multiple of its component count.
    #[error("array '{name}' has {len} values, not a multiple of {components} components")]
    ComponentMismatch {
        /// Array name.
        name: String,
        /// Declared components per tuple.
        components: usize,
        /// Number of stored values.
        len: usize,
    },

    /// Array tuple count differs from the number of points or cells.
    #[error("array '{name}' has {got} tuples, expected {expected}")]
    TupleCountMismatch {
        /// Array name.
        name: String,
        /// Expected tuple count.
        expected: usize,
        /// Actual tuple count.
        got: usize,
    },

    /// Tuple written with the wrong element type or width.
    #[error("tuple for array '{name}' does not match its element type or width")]
    TupleMismatch {
        /// Array name.
        name: String,
    },

    /// Tuple index outside the array.
    #[error("tuple {index} out of range for array '{name}' with {len} tuples")]
    TupleOutOfRange {
        /// Array name.
        name: String,
        /// Requested index.
        index: usize,
        /// Number of tuples.
        len: usize,
    },

    /// Flat connectivity array is not a sequence of length-headed blocks.
    #[error("malformed connectivity at offset {offset}")]
    MalformedConnectivity {
        /// Offset of the bad header.
        offset: usize,
    },

    /// Connectivity references a point that does not exist.
    #[error("cell {cell} references point {point}, dataset has {points} points")]
    PointOutOfRange {
        /// Cell index.
        cell: usize,
        /// Referenced point id.
        point: usize,
        /// Number of points.
        points: usize,
    },

    /// A fixed-size cell type has the wrong number of points.
    #[error("cell {cell} of type {cell_type} has {got} points")]
    CellSize {
        /// Cell index.
        cell: usize,
        /// Cell type name.
        cell_type: &'static str,
        /// Number of points found.
        got: usize,
    },

    /// Cell type tag is not in the registry.
    #[error("unknown cell type tag {tag}")]
    UnknownCellType {
        /// The rejected tag.
        tag: u8,
    },

    /// Cell type array and connectivity disagree on the cell count.
    #[error("{types} cell types for {cells} cells")]
    CellTypeCount {
        /// Length of the cell type array.
        types: usize,
        /// Number of cells.
        cells: usize,
    },

    /// Image spacing is not positive and finite.
    #[error("invalid spacing {spacing:?}")]
    InvalidSpacing {
        /// The rejected spacing.
        spacing: [f64; 3],
    },
}

impl From<VdsError> for CudsError {
    fn from(err: VdsError) -> Self {
        CudsError::invalid_dataset(err.to_string())
    }
}

/// Result type for vds_io operations.
pub type Result<T> = std::result::Result<T, VdsError>;
