//! Mutable sequence of cells over a flat connectivity array.

use std::ops::{Deref, DerefMut};

use cuds_core::{CudsError, Result};
use vds_io::{CellArray, CellIter};

/// Sequence view over a [`CellArray`].
///
/// Lookups scan block headers from the start, so `get(i)` is linear in `i`.
/// Appending is O(1); inserting or resizing a cell rebuilds the array.
#[derive(Debug)]
pub struct CellCollection<C> {
    cells: C,
}

impl<C> CellCollection<C>
where
    C: Deref<Target = CellArray>,
{
    /// Wrap a connectivity array.
    pub fn new(cells: C) -> Self {
        Self { cells }
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if there are no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Offset of the header of cell `index` and the cell's point count.
    fn locate(&self, index: usize) -> Result<(usize, usize)> {
        let len = self.len();
        if index >= len {
            return Err(CudsError::Index { index, len });
        }
        let flat = self.cells.as_slice();
        let mut offset = 0;
        for _ in 0..index {
            offset += flat[offset] + 1;
        }
        Ok((offset, flat[offset]))
    }

    /// Point ids of cell `index`.
    ///
    /// # Errors
    /// `Index` if `index` is out of range.
    pub fn get(&self, index: usize) -> Result<Vec<usize>> {
        let (offset, n) = self.locate(index)?;
        Ok(self.cells.as_slice()[offset + 1..offset + 1 + n].to_vec())
    }

    /// Iterate over all cells.
    pub fn iter(&self) -> CellIter<'_> {
        self.cells.iter()
    }
}

impl<C> CellCollection<C>
where
    C: DerefMut<Target = CellArray>,
{
    fn rebuild(&mut self, offset: usize, old: usize, ids: Option<&[usize]>) -> Result<()> {
        let flat = self.cells.as_slice();
        let mut data = Vec::with_capacity(flat.len() + ids.map_or(0, |ids| ids.len() + 1));
        data.extend_from_slice(&flat[..offset]);
        if let Some(ids) = ids {
            data.push(ids.len());
            data.extend_from_slice(ids);
        }
        data.extend_from_slice(&flat[offset + old..]);
        self.cells.replace(data).map_err(|e| CudsError::InvalidState {
            message: format!("connectivity rebuild failed: {e}"),
        })
    }

    /// Replace the point ids of cell `index`.
    ///
    /// Overwrites in place when the point count is unchanged.
    pub fn set(&mut self, index: usize, ids: &[usize]) -> Result<()> {
        let (offset, n) = self.locate(index)?;
        if n == ids.len() {
            self.cells.as_mut_slice()[offset + 1..offset + 1 + n].copy_from_slice(ids);
            return Ok(());
        }
        self.rebuild(offset, n + 1, Some(ids))
    }

    /// Remove cell `index`, shifting later cells down.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        let (offset, n) = self.locate(index)?;
        self.rebuild(offset, n + 1, None)
    }

    /// Append a cell.
    pub fn push(&mut self, ids: &[usize]) {
        self.cells.push_cell(ids);
    }

    /// Insert a cell before `index`; `index == len()` appends.
    pub fn insert(&mut self, index: usize, ids: &[usize]) -> Result<()> {
        let len = self.len();
        if index == len {
            self.push(ids);
            return Ok(());
        }
        let (offset, _) = self.locate(index)?;
        self.rebuild(offset, 0, Some(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuds_core::ErrorKind;

    fn sample() -> CellArray {
        CellArray::from_cells([vec![0, 1, 2, 3], vec![4, 5, 6, 7, 8, 9, 10, 11]])
    }

    #[test]
    fn test_get() {
        let cells = sample();
        let ccs = CellCollection::new(&cells);
        assert_eq!(ccs.len(), 2);
        assert_eq!(ccs.get(1).unwrap(), vec![4, 5, 6, 7, 8, 9, 10, 11]);
        assert_eq!(ccs.get(2).unwrap_err().kind(), ErrorKind::Index);
    }

    #[test]
    fn test_set_in_place_and_resized() {
        let mut cells = sample();
        let mut ccs = CellCollection::new(&mut cells);
        ccs.set(0, &[3, 2, 1, 0]).unwrap();
        assert_eq!(ccs.get(0).unwrap(), vec![3, 2, 1, 0]);
        ccs.set(0, &[7, 8]).unwrap();
        assert_eq!(ccs.len(), 2);
        assert_eq!(ccs.get(0).unwrap(), vec![7, 8]);
        assert_eq!(ccs.get(1).unwrap(), vec![4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_insert_delete() {
        let mut cells = sample();
        let mut ccs = CellCollection::new(&mut cells);
        ccs.insert(0, &[9, 9, 9]).unwrap();
        ccs.insert(3, &[1]).unwrap();
        assert_eq!(ccs.len(), 4);
        assert_eq!(ccs.get(0).unwrap(), vec![9, 9, 9]);
        assert_eq!(ccs.get(3).unwrap(), vec![1]);
        assert!(ccs.insert(9, &[1]).is_err());

        ccs.delete(0).unwrap();
        ccs.delete(2).unwrap();
        assert_eq!(cells.as_slice(), sample().as_slice());
    }
}
