//! Particles container stored in poly data.
//!
//! Particles are the dataset points, bonds are its line cells. Particle rows
//! go to point data and bond rows to cell data.

use cuds_core::{
    Bond, CudsError, CudsItem, DataContainer, Named, Particle, ParticlesContainer, Result,
};
use tracing::debug;
use uuid::Uuid;
use vds_io::{AttributeData, DataSet, PolyData};

use crate::attribute_table::{AttributeTable, TableState};
use crate::cell_collection::CellCollection;
use crate::error::{read_or_warn, require_uid};
use crate::identity::IdentityMap;

type Table<'a> = AttributeTable<&'a AttributeData, &'a TableState>;
type TableMut<'a> = AttributeTable<&'a mut AttributeData, &'a mut TableState>;

/// Particles and bonds backed by a [`PolyData`].
#[derive(Debug, Clone)]
pub struct VdsParticles {
    name: String,
    data: DataContainer,
    poly: PolyData,
    point_state: TableState,
    bond_state: TableState,
    particles: IdentityMap,
    bonds: IdentityMap,
}

impl VdsParticles {
    /// Create an empty container.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: DataContainer::new(),
            poly: PolyData::new(),
            point_state: TableState::new(),
            bond_state: TableState::new(),
            particles: IdentityMap::new(),
            bonds: IdentityMap::new(),
        }
    }

    /// Adopt poly data holding only points and line cells.
    ///
    /// Every point and line gets a fresh UID.
    ///
    /// # Errors
    /// `Type` if the dataset has vertex or polygon cells; `InvalidDataset` if
    /// its arrays or connectivity are malformed.
    pub fn from_dataset(name: impl Into<String>, poly: PolyData) -> Result<Self> {
        let name = name.into();
        if !poly.verts().is_empty() || !poly.polys().is_empty() {
            return Err(CudsError::type_error(
                "poly data with vertex or polygon cells is not a particles container",
            ));
        }
        poly.validate()?;
        let point_state = TableState::adopt(poly.point_data())?;
        let bond_state = TableState::adopt(poly.cell_data())?;
        let particles = IdentityMap::with_fresh_uids(poly.number_of_points());
        let bonds = IdentityMap::with_fresh_uids(poly.lines().len());
        debug!(
            name = %name,
            particles = particles.len(),
            bonds = bonds.len(),
            "adopted poly data as particles"
        );
        Ok(Self {
            name,
            data: DataContainer::new(),
            poly,
            point_state: point_state.with_virtual_size(particles.len()),
            bond_state: bond_state.with_virtual_size(bonds.len()),
            particles,
            bonds,
        })
    }

    /// Copy any particles container, keeping UIDs.
    pub fn from_particles(source: &dyn ParticlesContainer) -> Result<Self> {
        let mut target = Self::empty(source.name());
        target.data = source.data().clone();
        for particle in source.iter_particles() {
            target.add_particle(particle)?;
        }
        for bond in source.iter_bonds() {
            target.add_bond(bond)?;
        }
        Ok(target)
    }

    /// Backing dataset.
    pub fn dataset(&self) -> &PolyData {
        &self.poly
    }

    /// Consume the container, returning the dataset.
    pub fn into_dataset(self) -> PolyData {
        self.poly
    }

    fn point_table(&self) -> Result<Table<'_>> {
        AttributeTable::new(self.poly.point_data(), &self.point_state)
    }

    fn point_table_mut(&mut self) -> Result<TableMut<'_>> {
        AttributeTable::new(self.poly.point_data_mut(), &mut self.point_state)
    }

    fn bond_table(&self) -> Result<Table<'_>> {
        AttributeTable::new(self.poly.cell_data(), &self.bond_state)
    }

    fn bond_table_mut(&mut self) -> Result<TableMut<'_>> {
        AttributeTable::new(self.poly.cell_data_mut(), &mut self.bond_state)
    }

    fn particle_at(&self, index: usize) -> Result<Particle> {
        let uid = self.particles.uid_at(index)?;
        Ok(Particle {
            uid: Some(uid),
            coordinates: self.poly.points()[index],
            data: self.point_table()?.get(index)?,
        })
    }

    fn bond_at(&self, index: usize) -> Result<Bond> {
        let uid = self.bonds.uid_at(index)?;
        let ids = CellCollection::new(self.poly.lines()).get(index)?;
        let points = ids
            .iter()
            .map(|i| self.particles.uid_at(*i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Bond {
            uid: Some(uid),
            points,
            data: self.bond_table()?.get(index)?,
        })
    }

    /// Point indices of a bond's particles.
    fn bond_indices(&self, bond: &Bond) -> Result<Vec<usize>> {
        if bond.points.len() < 2 {
            return Err(CudsError::value_error(format!(
                "a bond needs at least two particles, got {}",
                bond.points.len()
            )));
        }
        bond.points
            .iter()
            .map(|uid| self.particles.index_of(uid))
            .collect()
    }
}

impl Named for VdsParticles {
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

impl ParticlesContainer for VdsParticles {
    fn add_particle(&mut self, particle: Particle) -> Result<Uuid> {
        let uid = particle.uid.unwrap_or_else(Uuid::new_v4);
        if self.particles.contains(&uid) {
            return Err(CudsError::value_error(format!(
                "particle {uid} already exists"
            )));
        }
        self.point_table_mut()?.push(&particle.data)?;
        self.poly.points_mut().push(particle.coordinates);
        self.particles.push(uid)?;
        Ok(uid)
    }

    fn update_particle(&mut self, particle: &Particle) -> Result<()> {
        let uid = require_uid(particle.uid, "particle")?;
        let index = self.particles.index_of(&uid)?;
        self.point_table_mut()?.set(index, &particle.data)?;
        self.poly.points_mut()[index] = particle.coordinates;
        Ok(())
    }

    fn get_particle(&self, uid: Uuid) -> Result<Particle> {
        self.particle_at(self.particles.index_of(&uid)?)
    }

    fn remove_particle(&mut self, uid: Uuid) -> Result<()> {
        let index = self.particles.index_of(&uid)?;
        if let Some(bond) = self
            .poly
            .lines()
            .iter()
            .position(|ids| ids.contains(&index))
        {
            return Err(CudsError::value_error(format!(
                "particle {uid} is referenced by bond {}",
                self.bonds.uid_at(bond)?
            )));
        }
        let last = self.particles.len() - 1;
        self.point_table_mut()?.swap_remove(index)?;
        self.poly.points_mut().swap_remove(index);
        self.particles.swap_remove(&uid)?;

        if index != last {
            let moved: Vec<(usize, Vec<usize>)> = self
                .poly
                .lines()
                .iter()
                .enumerate()
                .filter(|(_, ids)| ids.contains(&last))
                .map(|(i, ids)| {
                    let ids = ids
                        .iter()
                        .map(|&p| if p == last { index } else { p })
                        .collect();
                    (i, ids)
                })
                .collect();
            let mut lines = CellCollection::new(self.poly.lines_mut());
            for (bond, ids) in moved {
                lines.set(bond, &ids)?;
            }
        }
        Ok(())
    }

    fn has_particle(&self, uid: Uuid) -> bool {
        self.particles.contains(&uid)
    }

    fn iter_particles(&self) -> Box<dyn Iterator<Item = Particle> + '_> {
        Box::new(
            (0..self.particles.len()).filter_map(move |i| read_or_warn(self.particle_at(i), "particle")),
        )
    }

    fn add_bond(&mut self, bond: Bond) -> Result<Uuid> {
        let uid = bond.uid.unwrap_or_else(Uuid::new_v4);
        if self.bonds.contains(&uid) {
            return Err(CudsError::value_error(format!("bond {uid} already exists")));
        }
        let ids = self.bond_indices(&bond)?;
        self.bond_table_mut()?.push(&bond.data)?;
        CellCollection::new(self.poly.lines_mut()).push(&ids);
        self.bonds.push(uid)?;
        Ok(uid)
    }

    fn update_bond(&mut self, bond: &Bond) -> Result<()> {
        let uid = require_uid(bond.uid, "bond")?;
        let index = self.bonds.index_of(&uid)?;
        let ids = self.bond_indices(bond)?;
        self.bond_table_mut()?.set(index, &bond.data)?;
        CellCollection::new(self.poly.lines_mut()).set(index, &ids)
    }

    fn get_bond(&self, uid: Uuid) -> Result<Bond> {
        self.bond_at(self.bonds.index_of(&uid)?)
    }

    fn remove_bond(&mut self, uid: Uuid) -> Result<()> {
        let index = self.bonds.index_of(&uid)?;
        self.bond_table_mut()?.delete(index)?;
        CellCollection::new(self.poly.lines_mut()).delete(index)?;
        self.bonds.remove_shift(&uid)?;
        Ok(())
    }

    fn has_bond(&self, uid: Uuid) -> bool {
        self.bonds.contains(&uid)
    }

    fn iter_bonds(&self) -> Box<dyn Iterator<Item = Bond> + '_> {
        Box::new(
            (0..self.bonds.len()).filter_map(move |i| read_or_warn(self.bond_at(i), "bond")),
        )
    }

    fn count_of(&self, item: CudsItem) -> Result<usize> {
        match item {
            CudsItem::Particle => Ok(self.particles.len()),
            CudsItem::Bond => Ok(self.bonds.len()),
            other => Err(CudsError::value_error(format!(
                "item {other} is not supported by a particles container"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuds_core::{AttributeKey, AttributeValue, ErrorKind, Particles, Point3};
    use vds_io::DataArray;

    fn particle(x: f64, mass: f64) -> Particle {
        Particle::new(
            [x, 0.0, 0.0],
            DataContainer::new().with(AttributeKey::Mass, mass).unwrap(),
        )
    }

    #[test]
    fn test_add_get_update() {
        let mut pc = VdsParticles::empty("argon");
        let uid = pc.add_particle(particle(1.0, 2.0)).unwrap();
        let mut p = pc.get_particle(uid).unwrap();
        assert_eq!(p.coordinates, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(p.data.get(AttributeKey::Mass), Some(&AttributeValue::Float(2.0)));

        p.coordinates = Point3::new(5.0, 5.0, 5.0);
        p.data.insert(AttributeKey::Velocity, [1.0, 0.0, 0.0]).unwrap();
        pc.update_particle(&p).unwrap();
        assert_eq!(pc.get_particle(uid).unwrap(), p);

        let dup = particle(0.0, 1.0).with_uid(uid);
        assert_eq!(pc.add_particle(dup).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(pc.count_of(CudsItem::Particle).unwrap(), 1);
    }

    #[test]
    fn test_non_numeric_keys_are_not_stored() {
        let mut pc = VdsParticles::empty("p");
        let mut p = particle(0.0, 1.0);
        p.data.insert(AttributeKey::ChemicalSpecie, "Ar").unwrap();
        let uid = pc.add_particle(p).unwrap();
        let stored = pc.get_particle(uid).unwrap();
        assert!(!stored.data.contains_key(AttributeKey::ChemicalSpecie));
        assert_eq!(stored.data.get(AttributeKey::Mass), Some(&AttributeValue::Float(1.0)));
        assert!(pc.dataset().point_data().get("CHEMICAL_SPECIE").is_none());
    }

    #[test]
    fn test_missing_uid_on_update() {
        let mut pc = VdsParticles::empty("p");
        pc.add_particle(particle(0.0, 1.0)).unwrap();
        let err = pc.update_particle(&particle(1.0, 1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        let err = pc
            .update_particle(&particle(1.0, 1.0).with_uid(Uuid::new_v4()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownUid);
    }

    #[test]
    fn test_remove_swaps_with_last_and_repoints_bonds() {
        let mut pc = VdsParticles::empty("p");
        let ids: Vec<Uuid> = (0..4)
            .map(|i| pc.add_particle(particle(i as f64, i as f64)).unwrap())
            .collect();
        let bond = pc
            .add_bond(Bond::new(vec![ids[1], ids[3]], DataContainer::new()))
            .unwrap();

        assert_eq!(pc.remove_particle(ids[1]).unwrap_err().kind(), ErrorKind::Value);
        pc.remove_particle(ids[0]).unwrap();

        assert_eq!(pc.count_of(CudsItem::Particle).unwrap(), 3);
        assert_eq!(pc.get_bond(bond).unwrap().points, vec![ids[1], ids[3]]);
        assert_eq!(
            pc.get_particle(ids[3]).unwrap().coordinates,
            Point3::new(3.0, 0.0, 0.0)
        );
        assert_eq!(pc.dataset().lines().as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn test_bonds() {
        let mut pc = VdsParticles::empty("p");
        let ids = pc
            .add_particles(vec![particle(0.0, 1.0), particle(1.0, 1.0), particle(2.0, 1.0)])
            .unwrap();
        let row = DataContainer::new().with(AttributeKey::BondLabel, 7i64).unwrap();
        let b1 = pc.add_bond(Bond::new(ids[..2].to_vec(), row.clone())).unwrap();
        let b2 = pc.add_bond(Bond::new(ids.clone(), DataContainer::new())).unwrap();
        assert_eq!(pc.get_bond(b1).unwrap().data, row);

        let err = pc
            .add_bond(Bond::new(vec![ids[0]], DataContainer::new()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        let err = pc
            .add_bond(Bond::new(vec![ids[0], Uuid::new_v4()], DataContainer::new()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownUid);

        pc.remove_bond(b1).unwrap();
        assert!(!pc.has_bond(b1));
        assert_eq!(pc.get_bond(b2).unwrap().points, ids);
        assert_eq!(pc.count_of(CudsItem::Bond).unwrap(), 1);
        assert!(pc.dataset().validate().is_ok());
    }

    #[test]
    fn test_from_dataset() {
        let mut poly = PolyData::from_points(vec![Point3::zero(), Point3::new(1.0, 0.0, 0.0)]);
        poly.lines_mut().push_cell(&[0, 1]);
        poly.point_data_mut()
            .add(DataArray::from_f64("MASS", 1, vec![1.0, 2.0]).unwrap());
        let pc = VdsParticles::from_dataset("adopted", poly.clone()).unwrap();
        assert_eq!(pc.count_of(CudsItem::Particle).unwrap(), 2);
        assert_eq!(pc.count_of(CudsItem::Bond).unwrap(), 1);
        let masses: Vec<_> = pc
            .iter_particles()
            .map(|p| p.data.get(AttributeKey::Mass).cloned())
            .collect();
        assert_eq!(
            masses,
            vec![Some(AttributeValue::Float(1.0)), Some(AttributeValue::Float(2.0))]
        );

        poly.polys_mut().push_cell(&[0, 1, 1]);
        let err = VdsParticles::from_dataset("mixed", poly).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_from_particles_keeps_uids() {
        let mut source = Particles::new("source");
        let ids = source
            .add_particles(vec![particle(0.0, 1.0), particle(1.0, 2.0)])
            .unwrap();
        let bond = source
            .add_bond(Bond::new(ids.clone(), DataContainer::new()))
            .unwrap();
        let copy = VdsParticles::from_particles(&source).unwrap();
        assert_eq!(copy.name(), "source");
        for uid in &ids {
            assert_eq!(copy.get_particle(*uid).unwrap(), source.get_particle(*uid).unwrap());
        }
        assert_eq!(copy.get_bond(bond).unwrap(), source.get_bond(bond).unwrap());
    }
}
