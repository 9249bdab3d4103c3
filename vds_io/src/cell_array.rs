//! Flat connectivity arrays.
//!
//! Layout: `[n0, v00, .., v0(n0-1), n1, v10, ..]`, each cell block headed by
//! its point count.

use crate::error::{Result, VdsError};

/// Length-headed connectivity blocks plus a cached cell count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellArray {
    data: Vec<usize>,
    num_cells: usize,
}

impl CellArray {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a list of point id lists.
    pub fn from_cells<I, C>(cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[usize]>,
    {
        let mut array = Self::new();
        for cell in cells {
            array.push_cell(cell.as_ref());
        }
        array
    }

    /// Adopt a raw flat array after checking its block structure.
    ///
    /// # Errors
    /// `MalformedConnectivity` if a header runs past the end.
    pub fn from_raw(data: Vec<usize>) -> Result<Self> {
        let num_cells = count_blocks(&data)?;
        Ok(Self { data, num_cells })
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_cells
    }

    /// True if there are no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_cells == 0
    }

    /// The flat array.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.data
    }

    /// Mutable view of the flat array; its length cannot change.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [usize] {
        &mut self.data
    }

    /// Append one cell block.
    pub fn push_cell(&mut self, ids: &[usize]) {
        self.data.reserve(ids.len() + 1);
        self.data.push(ids.len());
        self.data.extend_from_slice(ids);
        self.num_cells += 1;
    }

    /// Replace the whole flat array.
    ///
    /// # Errors
    /// `MalformedConnectivity` if the new array is not well formed; the old
    /// contents are kept in that case.
    pub fn replace(&mut self, data: Vec<usize>) -> Result<()> {
        let num_cells = count_blocks(&data)?;
        self.data = data;
        self.num_cells = num_cells;
        Ok(())
    }

    /// Iterate over cell blocks.
    pub fn iter(&self) -> CellIter<'_> {
        CellIter {
            data: &self.data,
            offset: 0,
        }
    }

    /// Unflatten into owned lists.
    pub fn to_cells(&self) -> Vec<Vec<usize>> {
        self.iter().map(<[usize]>::to_vec).collect()
    }
}

fn count_blocks(data: &[usize]) -> Result<usize> {
    let mut offset = 0;
    let mut cells = 0;
    while offset < data.len() {
        let n = data[offset];
        if offset + 1 + n > data.len() {
            return Err(VdsError::MalformedConnectivity { offset });
        }
        offset += n + 1;
        cells += 1;
    }
    Ok(cells)
}

/// Iterator over the blocks of a [`CellArray`].
#[derive(Debug, Clone)]
pub struct CellIter<'a> {
    data: &'a [usize],
    offset: usize,
}

impl<'a> Iterator for CellIter<'a> {
    type Item = &'a [usize];

    fn next(&mut self) -> Option<Self::Item> {
        let n = *self.data.get(self.offset)?;
        let start = self.offset + 1;
        let block = self.data.get(start..start + n)?;
        self.offset = start + n;
        Some(block)
    }
}

impl<'a> IntoIterator for &'a CellArray {
    type Item = &'a [usize];
    type IntoIter = CellIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten() {
        let cells = CellArray::from_cells([vec![0, 1, 2, 3], vec![4, 5, 6, 7, 8, 9, 10, 11]]);
        assert_eq!(
            cells.as_slice(),
            &[4, 0, 1, 2, 3, 8, 4, 5, 6, 7, 8, 9, 10, 11]
        );
        assert_eq!(cells.len(), 2);
        assert_eq!(cells.to_cells()[1], vec![4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_from_raw() {
        let cells = CellArray::from_raw(vec![2, 0, 1, 0, 3, 1, 2, 3]).unwrap();
        assert_eq!(cells.len(), 3);
        let blocks: Vec<&[usize]> = cells.iter().collect();
        assert_eq!(blocks, vec![&[0, 1][..], &[][..], &[1, 2, 3][..]]);

        let err = CellArray::from_raw(vec![2, 0, 1, 3, 1]).unwrap_err();
        assert_eq!(err, VdsError::MalformedConnectivity { offset: 3 });
    }

    #[test]
    fn test_replace_keeps_old_on_error() {
        let mut cells = CellArray::from_cells([[0usize, 1]]);
        assert!(cells.replace(vec![5, 0]).is_err());
        assert_eq!(cells.as_slice(), &[2, 0, 1]);
        cells.replace(vec![1, 7, 1, 8]).unwrap();
        assert_eq!(cells.len(), 2);
    }
}
