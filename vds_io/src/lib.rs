//! vds_io - visualization dataset model for CUDS adapters.
//!
//! This crate provides the storage layer the adapters in `cuds_vds` sit on:
//! flat point arrays, length-headed connectivity arrays and named per-point /
//! per-cell attribute arrays, grouped into the three dataset shapes.
//!
//! # Core Types
//!
//! - [`DataArray`]: named numeric array of fixed-width tuples
//! - [`AttributeData`]: ordered set of arrays attached to points or cells
//! - [`CellArray`]: connectivity blocks `[n, ids.., m, ids..]`
//! - [`CellType`]: cell type registry with toolkit tags
//! - [`ImageData`], [`PolyData`], [`UnstructuredGrid`]: dataset shapes
//! - [`Dataset`]: tagged sum over the shapes, with the [`DataSet`] capabilities
//!
//! # Example
//!
//! ```ignore
//! use vds_io::{CellType, DataArray, DataSet, Point3, UnstructuredGrid};
//!
//! let mut grid = UnstructuredGrid::new();
//! grid.points_mut().extend([
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//! ]);
//! grid.insert_next_cell(CellType::Tetra, &[0, 1, 2, 3])?;
//! grid.point_data_mut()
//!     .add(DataArray::from_f64("TEMPERATURE", 1, vec![1.0, 2.0, 3.0, 4.0])?);
//! grid.validate()?;
//! ```

#![warn(missing_docs)]

pub mod array;
pub mod attributes;
pub mod cell_array;
pub mod cell_type;
pub mod dataset;
pub mod error;

// Re-export core types from cuds_core
pub use cuds_core::{NodeIndex, Point3};

// Re-export main types
pub use array::{ArrayValues, DataArray, Tuple};
pub use attributes::AttributeData;
pub use cell_array::{CellArray, CellIter};
pub use cell_type::{CellFamily, CellType};
pub use dataset::{DataSet, Dataset, DatasetKind, ImageData, PolyData, UnstructuredGrid};
pub use error::{Result, VdsError};
