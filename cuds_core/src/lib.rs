//! # cuds_core
//!
//! Common Universal Data Structure (CUDS) model for simulation data.
//!
//! This crate holds the storage-independent half of the CUDS/VDS bridge:
//! the attribute key registry, typed sparse rows, container interfaces with
//! in-memory implementations, and Bravais lattice classification.
//!
//! ## Modules
//!
//! - [`types`]: `Point3`, node indices and flat index conversion
//! - [`keys`]: Attribute key registry (`AttributeKey`, element types, shapes)
//! - [`value`]: Attribute values and `DataContainer` rows
//! - [`cuds`]: Items held by containers (points, particles, elements, nodes)
//! - [`container`]: Particles, mesh and lattice interfaces plus in-memory containers
//! - [`primitive_cell`]: Bravais families and primitive cell factories
//! - [`lattice_tools`]: Lattice family classifier and layout guessing
//! - [`config`]: Classifier tolerance
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use cuds_core::prelude::*;
//!
//! let mut particles = Particles::new("argon");
//! let row = DataContainer::new().with(AttributeKey::Mass, 39.9)?;
//! let uid = particles.add_particle(Particle::new([0.0, 0.0, 0.0], row))?;
//!
//! let cell = PrimitiveCell::face_centered_cubic(0.5);
//! assert_eq!(find_lattice_type(cell.p1, cell.p2, cell.p3)?, BravaisLattice::FaceCenteredCubic);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod container;
pub mod cuds;
pub mod error;
pub mod keys;
pub mod lattice_tools;
pub mod primitive_cell;
pub mod types;
pub mod value;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::ClassifierConfig;
    pub use crate::container::{
        Lattice, LatticeContainer, Mesh, MeshContainer, Named, Particles, ParticlesContainer,
    };
    pub use crate::cuds::{
        Bond, Cell, CudsItem, Edge, Element, ElementKind, Face, LatticeNode, Particle, Point,
    };
    pub use crate::error::{CudsError, ErrorKind, Result};
    pub use crate::keys::{supported_keys, AttributeKey, ElementType, Shape};
    pub use crate::lattice_tools::{find_lattice_type, find_lattice_type_with, is_lattice_of};
    pub use crate::primitive_cell::{BravaisLattice, PrimitiveCell};
    pub use crate::types::{NodeIndex, Point3};
    pub use crate::value::{AttributeValue, DataContainer};
}

// Re-export the common surface at crate root
pub use config::ClassifierConfig;
pub use container::{
    Lattice, LatticeContainer, Mesh, MeshContainer, Named, Particles, ParticlesContainer,
};
pub use cuds::{Bond, Cell, CudsItem, Edge, Element, ElementKind, Face, LatticeNode, Particle, Point};
pub use error::{CudsError, ErrorKind, Result};
pub use keys::{supported_keys, AttributeKey, ElementType, Shape};
pub use lattice_tools::{
    find_lattice_type, find_lattice_type_with, guess_lattice_layout, guess_primitive_vectors,
    is_lattice_of, LatticeLayout,
};
pub use primitive_cell::{BravaisLattice, PrimitiveCell};
pub use types::{ravel_index, unravel_index, NodeIndex, Point3};
pub use value::{AttributeValue, DataContainer};
