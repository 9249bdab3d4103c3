//! Named, typed data arrays.
//!
//! A [`DataArray`] is a flat buffer of numeric values grouped into tuples of
//! `components` values each, the storage format of every per-point and
//! per-cell attribute.

use crate::error::{Result, VdsError};

/// Element storage of a [`DataArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValues {
    /// Double precision values.
    Float(Vec<f64>),
    /// 64-bit integer values.
    Int(Vec<i64>),
}

impl ArrayValues {
    /// Number of stored scalars.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            ArrayValues::Float(v) => v.len(),
            ArrayValues::Int(v) => v.len(),
        }
    }

    /// True if no scalars are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A borrowed tuple of an array, or a tuple to write into one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tuple<'a> {
    /// Floating point components.
    Float(&'a [f64]),
    /// Integer components.
    Int(&'a [i64]),
}

impl Tuple<'_> {
    /// Number of components.
    #[inline]
    pub fn width(&self) -> usize {
        match self {
            Tuple::Float(v) => v.len(),
            Tuple::Int(v) => v.len(),
        }
    }
}

/// A named attribute array.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: String,
    components: usize,
    values: ArrayValues,
}

impl DataArray {
    /// Create an array from raw values.
    ///
    /// # Errors
    /// `ComponentMismatch` if `components` is zero or does not divide the
    /// value count.
    pub fn new(name: impl Into<String>, components: usize, values: ArrayValues) -> Result<Self> {
        let name = name.into();
        if components == 0 || values.len() % components != 0 {
            return Err(VdsError::ComponentMismatch {
                name,
                components,
                len: values.len(),
            });
        }
        Ok(Self {
            name,
            components,
            values,
        })
    }

    /// Floating point array.
    pub fn from_f64(name: impl Into<String>, components: usize, values: Vec<f64>) -> Result<Self> {
        Self::new(name, components, ArrayValues::Float(values))
    }

    /// Integer array.
    pub fn from_i64(name: impl Into<String>, components: usize, values: Vec<i64>) -> Result<Self> {
        Self::new(name, components, ArrayValues::Int(values))
    }

    /// Array name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the array.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Components per tuple.
    #[inline]
    pub fn components(&self) -> usize {
        self.components
    }

    /// Raw values.
    #[inline]
    pub fn values(&self) -> &ArrayValues {
        &self.values
    }

    /// True for floating point storage.
    #[inline]
    pub fn is_float(&self) -> bool {
        matches!(self.values, ArrayValues::Float(_))
    }

    /// Number of tuples.
    #[inline]
    pub fn number_of_tuples(&self) -> usize {
        self.values.len() / self.components
    }

    /// Tuple at `index`.
    pub fn tuple(&self, index: usize) -> Option<Tuple<'_>> {
        if index >= self.number_of_tuples() {
            return None;
        }
        let range = index * self.components..(index + 1) * self.components;
        Some(match &self.values {
            ArrayValues::Float(v) => Tuple::Float(&v[range]),
            ArrayValues::Int(v) => Tuple::Int(&v[range]),
        })
    }

    fn check_tuple(&self, tuple: &Tuple<'_>) -> Result<()> {
        let same_type = matches!(
            (&self.values, tuple),
            (ArrayValues::Float(_), Tuple::Float(_)) | (ArrayValues::Int(_), Tuple::Int(_))
        );
        if !same_type || tuple.width() != self.components {
            return Err(VdsError::TupleMismatch {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    fn out_of_range(&self, index: usize) -> VdsError {
        VdsError::TupleOutOfRange {
            name: self.name.clone(),
            index,
            len: self.number_of_tuples(),
        }
    }

    /// Overwrite the tuple at `index`.
    pub fn set_tuple(&mut self, index: usize, tuple: Tuple<'_>) -> Result<()> {
        self.check_tuple(&tuple)?;
        if index >= self.number_of_tuples() {
            return Err(self.out_of_range(index));
        }
        let start = index * self.components;
        match (&mut self.values, tuple) {
            (ArrayValues::Float(v), Tuple::Float(t)) => {
                v[start..start + t.len()].copy_from_slice(t)
            }
            (ArrayValues::Int(v), Tuple::Int(t)) => v[start..start + t.len()].copy_from_slice(t),
            _ => {
                return Err(VdsError::TupleMismatch {
                    name: self.name.clone(),
                })
            }
        }
        Ok(())
    }

    /// Insert a tuple before `index`; `index == number_of_tuples()` appends.
    pub fn insert_tuple(&mut self, index: usize, tuple: Tuple<'_>) -> Result<()> {
        self.check_tuple(&tuple)?;
        if index > self.number_of_tuples() {
            return Err(self.out_of_range(index));
        }
        let start = index * self.components;
        match (&mut self.values, tuple) {
            (ArrayValues::Float(v), Tuple::Float(t)) => {
                v.splice(start..start, t.iter().copied());
            }
            (ArrayValues::Int(v), Tuple::Int(t)) => {
                v.splice(start..start, t.iter().copied());
            }
            _ => {
                return Err(VdsError::TupleMismatch {
                    name: self.name.clone(),
                })
            }
        }
        Ok(())
    }

    /// Append a tuple.
    pub fn push_tuple(&mut self, tuple: Tuple<'_>) -> Result<()> {
        self.insert_tuple(self.number_of_tuples(), tuple)
    }

    /// Remove the tuple at `index`.
    pub fn remove_tuple(&mut self, index: usize) -> Result<()> {
        if index >= self.number_of_tuples() {
            return Err(self.out_of_range(index));
        }
        let range = index * self.components..(index + 1) * self.components;
        match &mut self.values {
            ArrayValues::Float(v) => {
                v.drain(range);
            }
            ArrayValues::Int(v) => {
                v.drain(range);
            }
        }
        Ok(())
    }

    /// Move the last tuple into `index` and truncate.
    pub fn swap_remove_tuple(&mut self, index: usize) -> Result<()> {
        let len = self.number_of_tuples();
        if index >= len {
            return Err(self.out_of_range(index));
        }
        let c = self.components;
        let (dst, last) = (index * c, (len - 1) * c);
        match &mut self.values {
            ArrayValues::Float(v) => {
                v.copy_within(last..last + c, dst);
                v.truncate(last);
            }
            ArrayValues::Int(v) => {
                v.copy_within(last..last + c, dst);
                v.truncate(last);
            }
        }
        Ok(())
    }
}
