//! Contracts of the collaborators that produce CUDS containers.
//!
//! A [`ModelingEngine`] holds containers and advances them in time; a
//! [`CudsFile`] reads them from storage. Neither is implemented here: the
//! helpers only run an engine and turn what it or a file holds into
//! datasets.

use cuds_core::{
    AttributeKey, AttributeValue, CudsError, DataContainer, Lattice, LatticeContainer, Mesh,
    MeshContainer, Named, Particles, ParticlesContainer, Result,
};
use tracing::debug;
use vds_io::Dataset;

use crate::adopt::Adapted;
use crate::export::{cuds2vds, CudsRef};

/// Owned container of any kind.
pub enum Container {
    /// Particles container.
    Particles(Box<dyn ParticlesContainer>),
    /// Mesh container.
    Mesh(Box<dyn MeshContainer>),
    /// Lattice container.
    Lattice(Box<dyn LatticeContainer>),
}

impl Container {
    /// Container name.
    pub fn name(&self) -> &str {
        match self {
            Container::Particles(c) => c.name(),
            Container::Mesh(c) => c.name(),
            Container::Lattice(c) => c.name(),
        }
    }

    /// Borrow as a [`CudsRef`].
    pub fn as_cuds(&self) -> CudsRef<'_> {
        match self {
            Container::Particles(c) => CudsRef::Particles(c.as_ref()),
            Container::Mesh(c) => CudsRef::Mesh(c.as_ref()),
            Container::Lattice(c) => CudsRef::Lattice(c.as_ref()),
        }
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.as_cuds(), f)
    }
}

impl From<Particles> for Container {
    fn from(c: Particles) -> Self {
        Container::Particles(Box::new(c))
    }
}

impl From<Mesh> for Container {
    fn from(c: Mesh) -> Self {
        Container::Mesh(Box::new(c))
    }
}

impl From<Lattice> for Container {
    fn from(c: Lattice) -> Self {
        Container::Lattice(Box::new(c))
    }
}

impl From<Adapted> for Container {
    fn from(adapted: Adapted) -> Self {
        match adapted {
            Adapted::Particles(c) => Container::Particles(Box::new(c)),
            Adapted::Mesh(c) => Container::Mesh(Box::new(c)),
            Adapted::Lattice(c) => Container::Lattice(Box::new(c)),
        }
    }
}

/// A simulation engine holding named containers.
///
/// `cm`, `sp` and `bc` are the computational method, system parameter and
/// boundary condition rows.
pub trait ModelingEngine {
    /// Advance the state by `TIME_STEP * NUMBER_OF_TIME_STEPS` of the
    /// computational method row (see [`run_duration`]).
    fn run(&mut self) -> Result<()>;

    /// Add a container; `Value` if one with the same name exists.
    fn add_dataset(&mut self, container: Container) -> Result<()>;

    /// Remove a container by name.
    fn remove_dataset(&mut self, name: &str) -> Result<()>;

    /// Container by name.
    fn get_dataset(&self, name: &str) -> Result<&Container>;

    /// Names of the held containers.
    fn get_dataset_names(&self) -> Vec<String>;

    /// Computational method row.
    fn cm(&self) -> &DataContainer;

    /// System parameter row.
    fn sp(&self) -> &DataContainer;

    /// Boundary condition row.
    fn bc(&self) -> &DataContainer;

    /// Containers with the given names, or all of them.
    fn iter_datasets<'a>(
        &'a self,
        names: Option<&'a [&'a str]>,
    ) -> Box<dyn Iterator<Item = Result<&'a Container>> + 'a> {
        match names {
            Some(names) => Box::new(names.iter().map(move |name| self.get_dataset(name))),
            None => Box::new(
                self.get_dataset_names()
                    .into_iter()
                    .map(move |name| self.get_dataset(&name)),
            ),
        }
    }
}

/// Read side of a CUDS file.
pub trait CudsFile {
    /// Names of the stored containers.
    fn dataset_names(&self) -> Vec<String>;

    /// Load a container by name.
    fn get_dataset(&self, name: &str) -> Result<Container>;

    /// Load every stored container.
    fn iter_datasets(&self) -> Box<dyn Iterator<Item = Result<Container>> + '_> {
        Box::new(
            self.dataset_names()
                .into_iter()
                .map(move |name| self.get_dataset(&name)),
        )
    }
}

/// Simulated time covered by one `run()`: `TIME_STEP * NUMBER_OF_TIME_STEPS`.
///
/// # Errors
/// `Value` if either entry is missing from `cm`.
pub fn run_duration(cm: &DataContainer) -> Result<f64> {
    let step = match cm.get(AttributeKey::TimeStep) {
        Some(AttributeValue::Float(step)) => *step,
        _ => return Err(CudsError::value_error("TIME_STEP is not set")),
    };
    let steps = match cm.get(AttributeKey::NumberOfTimeSteps) {
        Some(AttributeValue::Int(steps)) => *steps,
        _ => return Err(CudsError::value_error("NUMBER_OF_TIME_STEPS is not set")),
    };
    Ok(step * steps as f64)
}

/// Run the engine once, then export the named containers (all when `None`).
pub fn run_and_export(
    engine: &mut dyn ModelingEngine,
    names: Option<&[&str]>,
) -> Result<Vec<(String, Dataset)>> {
    engine.run()?;
    let exported = engine
        .iter_datasets(names)
        .map(|container| {
            let container = container?;
            Ok((container.name().to_string(), cuds2vds(container.as_cuds())?))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(count = exported.len(), "exported engine datasets");
    Ok(exported)
}

/// Export every container stored in a file.
pub fn export_file(file: &dyn CudsFile) -> Result<Vec<(String, Dataset)>> {
    file.iter_datasets()
        .map(|container| {
            let container = container?;
            Ok((container.name().to_string(), cuds2vds(container.as_cuds())?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuds_core::{ErrorKind, Particle, PrimitiveCell};
    use indexmap::IndexMap;
    use vds_io::{DataSet, DatasetKind};

    /// Moves every particle along x by its velocity times the run duration.
    struct DriftEngine {
        cm: DataContainer,
        sp: DataContainer,
        bc: DataContainer,
        datasets: IndexMap<String, Container>,
    }

    impl DriftEngine {
        fn new(time_step: f64, steps: i64) -> Self {
            let cm = DataContainer::new()
                .with(AttributeKey::TimeStep, time_step)
                .unwrap()
                .with(AttributeKey::NumberOfTimeSteps, steps)
                .unwrap();
            Self {
                cm,
                sp: DataContainer::new(),
                bc: DataContainer::new(),
                datasets: IndexMap::new(),
            }
        }
    }

    impl ModelingEngine for DriftEngine {
        fn run(&mut self) -> Result<()> {
            let duration = run_duration(&self.cm)?;
            for container in self.datasets.values_mut() {
                if let Container::Particles(particles) = container {
                    let moved: Vec<Particle> = particles
                        .iter_particles()
                        .map(|mut p| {
                            if let Some(AttributeValue::Float3(v)) =
                                p.data.get(AttributeKey::Velocity)
                            {
                                p.coordinates.x += v[0] * duration;
                            }
                            p
                        })
                        .collect();
                    for p in &moved {
                        particles.update_particle(p)?;
                    }
                }
            }
            Ok(())
        }

        fn add_dataset(&mut self, container: Container) -> Result<()> {
            let name = container.name().to_string();
            if self.datasets.contains_key(&name) {
                return Err(CudsError::value_error(format!("{name} exists")));
            }
            self.datasets.insert(name, container);
            Ok(())
        }

        fn remove_dataset(&mut self, name: &str) -> Result<()> {
            self.datasets
                .shift_remove(name)
                .map(|_| ())
                .ok_or_else(|| CudsError::value_error(format!("no dataset {name}")))
        }

        fn get_dataset(&self, name: &str) -> Result<&Container> {
            self.datasets
                .get(name)
                .ok_or_else(|| CudsError::value_error(format!("no dataset {name}")))
        }

        fn get_dataset_names(&self) -> Vec<String> {
            self.datasets.keys().cloned().collect()
        }

        fn cm(&self) -> &DataContainer {
            &self.cm
        }

        fn sp(&self) -> &DataContainer {
            &self.sp
        }

        fn bc(&self) -> &DataContainer {
            &self.bc
        }
    }

    struct MemoryFile;

    impl CudsFile for MemoryFile {
        fn dataset_names(&self) -> Vec<String> {
            vec!["grid".to_string()]
        }

        fn get_dataset(&self, name: &str) -> Result<Container> {
            let lattice = Lattice::new(name, PrimitiveCell::cubic(1.0), [2, 2, 2], [0.0; 3])?;
            Ok(lattice.into())
        }
    }

    #[test]
    fn test_run_duration() {
        let engine = DriftEngine::new(0.5, 4);
        assert_eq!(run_duration(engine.cm()).unwrap(), 2.0);
        let err = run_duration(&DataContainer::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_run_and_export() {
        let mut engine = DriftEngine::new(0.5, 4);
        let mut particles = Particles::new("gas");
        particles
            .add_particle(Particle::new(
                [0.0, 0.0, 0.0],
                DataContainer::new()
                    .with(AttributeKey::Velocity, [1.0, 0.0, 0.0])
                    .unwrap(),
            ))
            .unwrap();
        engine.add_dataset(particles.into()).unwrap();
        engine.add_dataset(Mesh::new("walls").into()).unwrap();
        assert!(engine.add_dataset(Mesh::new("walls").into()).is_err());

        let exported = run_and_export(&mut engine, Some(&["gas"])).unwrap();
        assert_eq!(exported.len(), 1);
        let (name, dataset) = &exported[0];
        assert_eq!(name, "gas");
        assert_eq!(dataset.point(0).unwrap().x, 2.0);

        let all = run_and_export(&mut engine, None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].1.kind(), DatasetKind::Unstructured);
        assert_eq!(all[0].1.point(0).unwrap().x, 4.0);

        engine.remove_dataset("walls").unwrap();
        assert_eq!(engine.get_dataset_names(), vec!["gas".to_string()]);
    }

    #[test]
    fn test_export_file() {
        let exported = export_file(&MemoryFile).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].1.kind(), DatasetKind::Image);
        assert_eq!(exported[0].1.number_of_points(), 8);
    }
}
