//! # cuds_vds
//!
//! Bidirectional bridge between CUDS containers and VDS datasets.
//!
//! The adapters expose a dataset through the CUDS container interfaces, so
//! simulation code can read and edit dataset points, cells and arrays as
//! particles, mesh elements or lattice nodes. The export side turns any
//! container back into the matching dataset shape.
//!
//! - **Particles**: poly data points as particles, poly lines as bonds
//! - **Mesh**: unstructured grid points and cells as points and elements
//! - **Lattice**: image data or explicit poly points as lattice nodes
//!
//! ## Quick Start
//!
//! ```ignore
//! use cuds_vds::prelude::*;
//!
//! // Adopt a dataset produced elsewhere
//! let config = AdoptConfig::default().rename("mass", AttributeKey::Mass);
//! let adapted = adapt2cuds(&dataset, "argon", &config)?;
//! let particles = adapted.as_particles().unwrap();
//!
//! for particle in particles.iter_particles() {
//!     println!("{:?} {:?}", particle.uid, particle.data.get(AttributeKey::Mass));
//! }
//!
//! // Export any container back
//! let poly = particles2vds(particles)?;
//! ```
//!
//! ## Architecture
//!
//! Each adapter owns its dataset and keeps side state next to it:
//!
//! - **Attribute tables**: row view over the arrays of point or cell data,
//!   with a per-row null mask
//! - **Cell collections**: list view over connectivity arrays
//! - **Identity maps**: UID to index bookkeeping kept dense under removal
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Lattice point generation via rayon

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accumulator;
pub mod adopt;
pub mod attribute_table;
pub mod cell_collection;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod extractor;
pub mod identity;
pub mod lattice;
pub mod mesh;
pub mod particles;

pub use accumulator::{AccumulatorMode, DataAccumulator};
pub use adopt::{adapt2cuds, Adapted};
pub use attribute_table::{AttributeTable, ColumnMask, TableState};
pub use cell_collection::CellCollection;
pub use config::{AdoptConfig, AdoptKind};
pub use engine::{export_file, run_and_export, run_duration, Container, CudsFile, ModelingEngine};
pub use error::{CudsError, ErrorKind, Result};
pub use export::{cuds2vds, lattice2vds, mesh2vds, particles2vds, CudsRef};
pub use extractor::DataExtractor;
pub use identity::IdentityMap;
pub use lattice::{BaseVectors, VdsLattice};
pub use mesh::{family_of, VdsMesh};
pub use particles::VdsParticles;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use cuds_vds::prelude::*;
/// ```
pub mod prelude {
    pub use crate::adopt::{adapt2cuds, Adapted};
    pub use crate::config::{AdoptConfig, AdoptKind};
    pub use crate::export::{cuds2vds, lattice2vds, mesh2vds, particles2vds, CudsRef};
    pub use crate::lattice::{BaseVectors, VdsLattice};
    pub use crate::mesh::VdsMesh;
    pub use crate::particles::VdsParticles;

    pub use cuds_core::prelude::*;
    pub use vds_io::{DataSet, Dataset, ImageData, PolyData, UnstructuredGrid};
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuds_core::{
        AttributeKey, AttributeValue, BravaisLattice, DataContainer, LatticeContainer, Particle,
        ParticlesContainer, PrimitiveCell,
    };
    use vds_io::{DataSet, DatasetKind};

    #[test]
    fn test_adopt_edit_export() {
        let mut particles = VdsParticles::empty("p");
        particles
            .add_particle(Particle::new(
                [1.0, 2.0, 3.0],
                DataContainer::new().with(AttributeKey::Mass, 2.0).unwrap(),
            ))
            .unwrap();
        let dataset: vds_io::Dataset = particles.into_dataset().into();

        let adapted = adapt2cuds(&dataset, "again", &AdoptConfig::default()).unwrap();
        assert_eq!(adapted.kind(), AdoptKind::Particles);
        let adopted = adapted.as_particles().unwrap();
        let row = adopted.iter_particles().next().unwrap();
        assert_eq!(
            row.data.get(AttributeKey::Mass),
            Some(&AttributeValue::Float(2.0))
        );
    }

    #[test]
    fn test_lattice_export_reimports() {
        let lattice = VdsLattice::empty(
            "cubic",
            BravaisLattice::Cubic,
            BaseVectors::Spacing([0.1, 0.1, 0.1]),
            [3, 3, 3],
            [0.0; 3],
        )
        .unwrap();
        let dataset = cuds2vds(CudsRef::Lattice(&lattice)).unwrap();
        assert_eq!(dataset.kind(), DatasetKind::Image);
        assert_eq!(dataset.number_of_points(), 27);

        let adapted = adapt2cuds(&dataset, "cubic", &AdoptConfig::default()).unwrap();
        let again = adapted.as_lattice().unwrap();
        assert_eq!(
            again.primitive_cell().bravais_lattice,
            PrimitiveCell::cubic(0.1).bravais_lattice
        );
    }
}
