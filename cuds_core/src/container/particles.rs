use indexmap::IndexMap;
use uuid::Uuid;

use super::{unsupported_item, Named, ParticlesContainer};
use crate::cuds::{Bond, CudsItem, Particle};
use crate::error::{CudsError, Result};
use crate::value::DataContainer;

/// In-memory particles container.
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct Particles {
    name: String,
    data: DataContainer,
    particles: IndexMap<Uuid, Particle>,
    bonds: IndexMap<Uuid, Bond>,
}

impl Particles {
    /// Create an empty container.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

fn assign_uid<T>(uid: &mut Option<Uuid>, store: &IndexMap<Uuid, T>, what: &str) -> Result<Uuid> {
    let uid = *uid.get_or_insert_with(Uuid::new_v4);
    if store.contains_key(&uid) {
        return Err(CudsError::value_error(format!("{what} {uid} already exists")));
    }
    Ok(uid)
}

fn stored_uid(uid: Option<Uuid>, what: &str) -> Result<Uuid> {
    uid.ok_or_else(|| CudsError::value_error(format!("{what} has no uid")))
}

impl Named for Particles {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn data(&self) -> &DataContainer {
        &self.data
    }

    fn set_data(&mut self, data: DataContainer) {
        self.data = data;
    }
}

impl ParticlesContainer for Particles {
    fn add_particle(&mut self, mut particle: Particle) -> Result<Uuid> {
        let uid = assign_uid(&mut particle.uid, &self.particles, "particle")?;
        self.particles.insert(uid, particle);
        Ok(uid)
    }

    fn update_particle(&mut self, particle: &Particle) -> Result<()> {
        let uid = stored_uid(particle.uid, "particle")?;
        let slot = self
            .particles
            .get_mut(&uid)
            .ok_or(CudsError::UnknownUid { uid })?;
        *slot = particle.clone();
        Ok(())
    }

    fn get_particle(&self, uid: Uuid) -> Result<Particle> {
        self.particles
            .get(&uid)
            .cloned()
            .ok_or(CudsError::UnknownUid { uid })
    }

    fn remove_particle(&mut self, uid: Uuid) -> Result<()> {
        if !self.particles.contains_key(&uid) {
            return Err(CudsError::UnknownUid { uid });
        }
        if let Some(bond) = self.bonds.values().find(|b| b.points.contains(&uid)) {
            return Err(CudsError::value_error(format!(
                "particle {uid} is referenced by bond {}",
                bond.uid.unwrap_or_default()
            )));
        }
        self.particles.shift_remove(&uid);
        Ok(())
    }

    fn has_particle(&self, uid: Uuid) -> bool {
        self.particles.contains_key(&uid)
    }

    fn iter_particles(&self) -> Box<dyn Iterator<Item = Particle> + '_> {
        Box::new(self.particles.values().cloned())
    }

    fn add_bond(&mut self, mut bond: Bond) -> Result<Uuid> {
        if let Some(missing) = bond.points.iter().find(|p| !self.particles.contains_key(*p)) {
            return Err(CudsError::UnknownUid { uid: *missing });
        }
        let uid = assign_uid(&mut bond.uid, &self.bonds, "bond")?;
        self.bonds.insert(uid, bond);
        Ok(uid)
    }

    fn update_bond(&mut self, bond: &Bond) -> Result<()> {
        let uid = stored_uid(bond.uid, "bond")?;
        if !self.bonds.contains_key(&uid) {
            return Err(CudsError::UnknownUid { uid });
        }
        if let Some(missing) = bond.points.iter().find(|p| !self.particles.contains_key(*p)) {
            return Err(CudsError::UnknownUid { uid: *missing });
        }
        self.bonds.insert(uid, bond.clone());
        Ok(())
    }

    fn get_bond(&self, uid: Uuid) -> Result<Bond> {
        self.bonds
            .get(&uid)
            .cloned()
            .ok_or(CudsError::UnknownUid { uid })
    }

    fn remove_bond(&mut self, uid: Uuid) -> Result<()> {
        self.bonds
            .shift_remove(&uid)
            .map(|_| ())
            .ok_or(CudsError::UnknownUid { uid })
    }

    fn has_bond(&self, uid: Uuid) -> bool {
        self.bonds.contains_key(&uid)
    }

    fn iter_bonds(&self) -> Box<dyn Iterator<Item = Bond> + '_> {
        Box::new(self.bonds.values().cloned())
    }

    fn count_of(&self, item: CudsItem) -> Result<usize> {
        match item {
            CudsItem::Particle => Ok(self.particles.len()),
            CudsItem::Bond => Ok(self.bonds.len()),
            other => Err(unsupported_item(other)),
        }
    }
}
