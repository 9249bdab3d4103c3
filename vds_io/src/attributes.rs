//! Per-point and per-cell attribute containers.

use crate::array::DataArray;
use crate::error::{Result, VdsError};

/// Ordered collection of named data arrays.
///
/// Array names are unique; adding an array with an existing name replaces it
/// in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeData {
    arrays: Vec<DataArray>,
}

impl AttributeData {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arrays.
    #[inline]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// True if there are no arrays.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Array by name.
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name() == name)
    }

    /// Mutable array by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut DataArray> {
        self.arrays.iter_mut().find(|a| a.name() == name)
    }

    /// True if an array with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add an array, replacing any array with the same name.
    pub fn add(&mut self, array: DataArray) {
        match self.arrays.iter().position(|a| a.name() == array.name()) {
            Some(pos) => self.arrays[pos] = array,
            None => self.arrays.push(array),
        }
    }

    /// Remove and return an array by name.
    pub fn remove(&mut self, name: &str) -> Option<DataArray> {
        let pos = self.arrays.iter().position(|a| a.name() == name)?;
        Some(self.arrays.remove(pos))
    }

    /// Remove every array.
    pub fn clear(&mut self) {
        self.arrays.clear();
    }

    /// Rename an array. Returns false if `from` does not exist.
    ///
    /// An existing array named `to` is replaced.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.contains(from);
        }
        match self.remove(from) {
            Some(mut array) => {
                array.set_name(to);
                self.add(array);
                true
            }
            None => false,
        }
    }

    /// Array names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.arrays.iter().map(|a| a.name())
    }

    /// Arrays in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataArray> {
        self.arrays.iter()
    }

    /// Arrays in insertion order, mutably.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, DataArray> {
        self.arrays.iter_mut()
    }

    /// Check that every array holds exactly `expected` tuples.
    pub fn check_tuples(&self, expected: usize) -> Result<()> {
        for array in &self.arrays {
            let got = array.number_of_tuples();
            if got != expected {
                return Err(VdsError::TupleCountMismatch {
                    name: array.name().to_string(),
                    expected,
                    got,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AttributeData {
    type Item = &'a DataArray;
    type IntoIter = std::slice::Iter<'a, DataArray>;

    fn into_iter(self) -> Self::IntoIter {
        self.arrays.iter()
    }
}
