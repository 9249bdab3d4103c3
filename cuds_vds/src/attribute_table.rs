//! Row view over a columnar attribute store.
//!
//! Data columns live in a `vds_io::AttributeData`, one array per attribute
//! key, named with the key's name and holding only numeric values so they can
//! be exported as-is. Which rows actually carry a value is recorded apart from
//! the data, in a [`TableState`] holding a [`ColumnMask`] per column:
//!
//! | has_value | is_null | meaning |
//! |---|---|---|
//! | 0 | 0 | absent |
//! | 1 | 0 | value |
//! | 1 | 1 | explicit null |
//!
//! Absent and null slots hold the key's default value in the data column.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};

use bitvec::prelude::*;
use cuds_core::{
    supported_keys, AttributeKey, AttributeValue, CudsError, DataContainer, ElementType, Result,
    Shape,
};
use tracing::trace;
use vds_io::{AttributeData, DataArray, Tuple};

/// Presence and null bits of one column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMask {
    present: BitVec<u64, Lsb0>,
    null: BitVec<u64, Lsb0>,
}

impl ColumnMask {
    /// Mask of `len` rows, all present or all absent.
    pub fn filled(len: usize, present: bool) -> Self {
        Self {
            present: BitVec::repeat(present, len),
            null: bitvec![u64, Lsb0; 0; len],
        }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.present.len()
    }

    /// True if the mask covers no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    /// `(has_value, is_null)` of a row.
    pub fn get(&self, index: usize) -> Option<(bool, bool)> {
        Some((*self.present.get(index)?, *self.null.get(index)?))
    }

    fn set(&mut self, index: usize, (present, null): (bool, bool)) {
        self.present.set(index, present);
        self.null.set(index, null);
    }

    fn insert(&mut self, index: usize, (present, null): (bool, bool)) {
        self.present.insert(index, present);
        self.null.insert(index, null);
    }

    fn remove(&mut self, index: usize) {
        self.present.remove(index);
        self.null.remove(index);
    }

    fn swap_remove(&mut self, index: usize) {
        self.present.swap_remove(index);
        self.null.swap_remove(index);
    }
}

/// Table bookkeeping kept beside the data columns: the mask field, the row
/// count while no column exists, and the keys the table may store.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    masks: BTreeMap<AttributeKey, ColumnMask>,
    virtual_size: usize,
    stored_keys: BTreeSet<AttributeKey>,
}

impl Default for TableState {
    fn default() -> Self {
        Self::with_stored_keys(supported_keys().iter().copied())
    }
}

impl TableState {
    /// Empty state storing every supported key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty state restricted to `keys`; unsupported keys are dropped.
    pub fn with_stored_keys(keys: impl IntoIterator<Item = AttributeKey>) -> Self {
        let supported = supported_keys();
        Self {
            masks: BTreeMap::new(),
            virtual_size: 0,
            stored_keys: keys.into_iter().filter(|k| supported.contains(k)).collect(),
        }
    }

    /// State for existing columns: every value present.
    ///
    /// # Errors
    /// `InvalidDataset` if a column is not named after a storable key, has the
    /// wrong type or width, or the columns differ in length.
    pub fn adopt(data: &AttributeData) -> Result<Self> {
        let len = check_columns(data)?;
        let mut state = Self::new();
        for array in data {
            let key = column_key(array)?;
            state.masks.insert(key, ColumnMask::filled(len, true));
        }
        state.virtual_size = len;
        Ok(state)
    }

    /// Builder-style row count for a table without columns.
    pub fn with_virtual_size(mut self, size: usize) -> Self {
        self.virtual_size = size;
        self
    }

    /// Mask of a column.
    pub fn mask(&self, key: AttributeKey) -> Option<&ColumnMask> {
        self.masks.get(&key)
    }

    /// Keys the table may store.
    pub fn stored_keys(&self) -> &BTreeSet<AttributeKey> {
        &self.stored_keys
    }

    /// Row count recorded for a table without columns.
    pub fn virtual_size(&self) -> usize {
        self.virtual_size
    }
}

/// Column key for an array, checking name, element type and width.
fn column_key(array: &DataArray) -> Result<AttributeKey> {
    let key = AttributeKey::from_name(array.name()).map_err(|_| {
        CudsError::invalid_dataset(format!("array '{}' is not an attribute key", array.name()))
    })?;
    if !key.is_representable() {
        return Err(CudsError::invalid_dataset(format!(
            "key {key} cannot be stored as a column"
        )));
    }
    let float = key.element_type() == ElementType::Float;
    if array.components() != key.shape().components() || array.is_float() != float {
        return Err(CudsError::invalid_dataset(format!(
            "array '{}' does not match the type of key {key}",
            array.name()
        )));
    }
    Ok(key)
}

/// Validate every column and return the common length.
fn check_columns(data: &AttributeData) -> Result<usize> {
    let mut len = None;
    for array in data {
        column_key(array)?;
        let n = array.number_of_tuples();
        match len {
            None => len = Some(n),
            Some(expected) if expected != n => {
                return Err(CudsError::invalid_dataset(format!(
                    "array '{}' has {n} rows, expected {expected}",
                    array.name()
                )))
            }
            Some(_) => {}
        }
    }
    Ok(len.unwrap_or(0))
}

#[derive(Debug, Clone, Copy)]
enum Slots {
    Float([f64; 3]),
    Int([i64; 3]),
}

/// A value encoded as a column tuple.
#[derive(Debug, Clone, Copy)]
struct Encoded {
    slots: Slots,
    width: usize,
}

impl Encoded {
    fn tuple(&self) -> Tuple<'_> {
        match &self.slots {
            Slots::Float(v) => Tuple::Float(&v[..self.width]),
            Slots::Int(v) => Tuple::Int(&v[..self.width]),
        }
    }
}

/// Encode a value for the key's column; nulls encode as the key default.
fn encode(key: AttributeKey, value: &AttributeValue) -> Result<Encoded> {
    key.check_value(value)?;
    let value = if value.is_null() {
        key.default_value()
    } else {
        value.clone()
    };
    let slots = match value {
        AttributeValue::Float(v) => Slots::Float([v, 0.0, 0.0]),
        AttributeValue::Float3(v) => Slots::Float(v),
        AttributeValue::Int(v) => Slots::Int([v, 0, 0]),
        AttributeValue::Int3(v) => Slots::Int(v),
        _ => {
            return Err(CudsError::type_error(format!(
                "key {key} cannot be stored as a column"
            )))
        }
    };
    Ok(Encoded {
        slots,
        width: key.shape().components(),
    })
}

fn decode(key: AttributeKey, tuple: Tuple<'_>) -> Result<AttributeValue> {
    let value = match (key.shape(), tuple) {
        (Shape::Scalar, Tuple::Float([v])) => AttributeValue::Float(*v),
        (Shape::Scalar, Tuple::Int([v])) => AttributeValue::Int(*v),
        (Shape::Vector3, Tuple::Float([x, y, z])) => AttributeValue::Float3([*x, *y, *z]),
        (Shape::Vector3, Tuple::Int([x, y, z])) => AttributeValue::Int3([*x, *y, *z]),
        _ => {
            return Err(CudsError::invalid_dataset(format!(
                "column {key} does not match its key"
            )))
        }
    };
    Ok(value)
}

fn new_column(key: AttributeKey, len: usize) -> Result<DataArray> {
    let default = encode(key, &AttributeValue::Null)?;
    let array = match default.tuple() {
        Tuple::Float(t) => DataArray::from_f64(key.name(), t.len(), t.repeat(len)),
        Tuple::Int(t) => DataArray::from_i64(key.name(), t.len(), t.repeat(len)),
    };
    Ok(array?)
}

fn inconsistent(key: AttributeKey, detail: impl std::fmt::Display) -> CudsError {
    CudsError::InvalidState {
        message: format!("column {key} left inconsistent: {detail}"),
    }
}

/// Row-indexed sparse view over attribute columns.
///
/// Reads need shared access to the data and the state; mutations need
/// exclusive access to both.
#[derive(Debug)]
pub struct AttributeTable<D, S> {
    data: D,
    state: S,
}

impl<D, S> AttributeTable<D, S>
where
    D: Deref<Target = AttributeData>,
    S: Deref<Target = TableState>,
{
    /// Create a view, validating the columns against the state.
    ///
    /// # Errors
    /// `InvalidDataset` for badly named, typed or sized columns;
    /// `InvalidState` if a column has no matching mask.
    pub fn new(data: D, state: S) -> Result<Self> {
        let len = check_columns(&data)?;
        for array in data.iter() {
            let key = column_key(array)?;
            match state.masks.get(&key) {
                Some(mask) if mask.len() == len => {}
                _ => return Err(inconsistent(key, "mask does not cover the column")),
            }
        }
        Ok(Self { data, state })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self.data.iter().next() {
            Some(array) => array.number_of_tuples(),
            None => self.state.virtual_size,
        }
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys with a column, in column order.
    pub fn keys(&self) -> Vec<AttributeKey> {
        self.data
            .names()
            .filter_map(|name| AttributeKey::from_name(name).ok())
            .collect()
    }

    /// Data column of a key.
    pub fn column(&self, key: AttributeKey) -> Option<&DataArray> {
        self.data.get(key.name())
    }

    /// Mask of a key's column.
    pub fn mask(&self, key: AttributeKey) -> Option<&ColumnMask> {
        self.state.masks.get(&key)
    }

    /// Row `index` with only the keys that have a value.
    ///
    /// # Errors
    /// `Index` if `index` is out of range.
    pub fn get(&self, index: usize) -> Result<DataContainer> {
        let len = self.len();
        if index >= len {
            return Err(CudsError::Index { index, len });
        }
        let mut row = DataContainer::new();
        for array in self.data.iter() {
            let key = column_key(array)?;
            let (present, null) = self
                .state
                .masks
                .get(&key)
                .and_then(|mask| mask.get(index))
                .ok_or_else(|| inconsistent(key, "mask is shorter than the column"))?;
            if !present {
                continue;
            }
            let value = if null {
                AttributeValue::Null
            } else {
                let tuple = array
                    .tuple(index)
                    .ok_or_else(|| inconsistent(key, "column is shorter than the table"))?;
                decode(key, tuple)?
            };
            row.insert(key, value)?;
        }
        Ok(row)
    }

    /// Iterate over all rows.
    pub fn iter(&self) -> impl Iterator<Item = Result<DataContainer>> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Encode the storable part of a row, validating every value.
    fn encode_row(&self, row: &DataContainer) -> Result<Vec<(AttributeKey, Encoded, bool)>> {
        let mut encoded = Vec::with_capacity(row.len());
        for (key, value) in row {
            if !self.state.stored_keys.contains(key) {
                trace!(key = %key, "ignoring key not stored by this table");
                continue;
            }
            encoded.push((*key, encode(*key, value)?, value.is_null()));
        }
        Ok(encoded)
    }
}

impl<D, S> AttributeTable<D, S>
where
    D: DerefMut<Target = AttributeData>,
    S: DerefMut<Target = TableState>,
{
    fn ensure_column(&mut self, key: AttributeKey, len: usize) -> Result<()> {
        if self.data.contains(key.name()) {
            return Ok(());
        }
        self.data.add(new_column(key, len)?);
        self.state.masks.insert(key, ColumnMask::filled(len, false));
        Ok(())
    }

    fn column_mut(&mut self, key: AttributeKey) -> Result<(&mut DataArray, &mut ColumnMask)> {
        let array = self
            .data
            .get_mut(key.name())
            .ok_or_else(|| inconsistent(key, "column disappeared"))?;
        let mask = self
            .state
            .masks
            .get_mut(&key)
            .ok_or_else(|| inconsistent(key, "mask disappeared"))?;
        Ok((array, mask))
    }

    fn drop_columns_if_empty(&mut self) {
        if self.state.virtual_size == 0 {
            self.data.clear();
            self.state.masks.clear();
        }
    }

    /// Replace row `index`: stored keys of `row` get its values, every other
    /// column becomes absent at that row.
    ///
    /// # Errors
    /// `Index` if `index` is out of range; `Type` if a value does not match
    /// its key. Nothing is modified in either case.
    pub fn set(&mut self, index: usize, row: &DataContainer) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(CudsError::Index { index, len });
        }
        let encoded = self.encode_row(row)?;
        for (key, ..) in &encoded {
            self.ensure_column(*key, len)?;
        }
        for key in self.keys() {
            let (array, mask) = self.column_mut(key)?;
            match encoded.iter().find(|(k, ..)| *k == key) {
                Some((_, value, null)) => {
                    array
                        .set_tuple(index, value.tuple())
                        .map_err(|e| inconsistent(key, e))?;
                    mask.set(index, (true, *null));
                }
                None => {
                    let default = encode(key, &AttributeValue::Null)?;
                    array
                        .set_tuple(index, default.tuple())
                        .map_err(|e| inconsistent(key, e))?;
                    mask.set(index, (false, false));
                }
            }
        }
        Ok(())
    }

    /// Insert a row before `index`; `index == len()` appends.
    ///
    /// Existing columns get the key default (absent) where `row` has no
    /// value; new columns are back-filled with absent defaults.
    ///
    /// # Errors
    /// `Index` if `index > len()`; `Type` on a mismatched value;
    /// `InvalidState` if a column turns out shorter than the table.
    pub fn insert(&mut self, index: usize, row: &DataContainer) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(CudsError::Index { index, len });
        }
        let encoded = self.encode_row(row)?;
        for (key, ..) in &encoded {
            self.ensure_column(*key, len)?;
        }
        for key in self.keys() {
            let (array, mask) = self.column_mut(key)?;
            if array.number_of_tuples() != len || mask.len() != len {
                return Err(inconsistent(key, "length differs from the table"));
            }
            let (value, bits) = match encoded.iter().find(|(k, ..)| *k == key) {
                Some((_, value, null)) => (*value, (true, *null)),
                None => (encode(key, &AttributeValue::Null)?, (false, false)),
            };
            array
                .insert_tuple(index, value.tuple())
                .map_err(|e| inconsistent(key, e))?;
            mask.insert(index, bits);
        }
        self.state.virtual_size = len + 1;
        Ok(())
    }

    /// Append a row.
    pub fn push(&mut self, row: &DataContainer) -> Result<()> {
        let len = self.len();
        self.insert(len, row)
    }

    /// Remove row `index`, shifting later rows down.
    ///
    /// Removing the last remaining row drops every column.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(CudsError::Index { index, len });
        }
        for key in self.keys() {
            let (array, mask) = self.column_mut(key)?;
            array.remove_tuple(index).map_err(|e| inconsistent(key, e))?;
            mask.remove(index);
        }
        self.state.virtual_size = len - 1;
        self.drop_columns_if_empty();
        Ok(())
    }

    /// Move the last row into `index` and shrink by one.
    pub fn swap_remove(&mut self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(CudsError::Index { index, len });
        }
        for key in self.keys() {
            let (array, mask) = self.column_mut(key)?;
            array
                .swap_remove_tuple(index)
                .map_err(|e| inconsistent(key, e))?;
            mask.swap_remove(index);
        }
        self.state.virtual_size = len - 1;
        self.drop_columns_if_empty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuds_core::ErrorKind;
    use vds_io::ArrayValues;

    type Table<'a> = AttributeTable<&'a mut AttributeData, &'a mut TableState>;

    fn row(pairs: &[(AttributeKey, AttributeValue)]) -> DataContainer {
        let mut row = DataContainer::new();
        for (k, v) in pairs {
            row.insert(*k, v.clone()).unwrap();
        }
        row
    }

    fn floats(array: &DataArray) -> Vec<f64> {
        match array.values() {
            ArrayValues::Float(v) => v.clone(),
            ArrayValues::Int(_) => panic!("expected float column"),
        }
    }

    #[test]
    fn test_insert_at_tail_backfills() {
        use AttributeKey::{Mass, Radius, Temperature, Velocity};
        let mut data = AttributeData::new();
        let mut state = TableState::new();
        let mut table: Table = AttributeTable::new(&mut data, &mut state).unwrap();
        for (t, r) in [(1.0, 4.0), (2.0, 2.0), (3.0, 1.0)] {
            table
                .push(&row(&[(Temperature, t.into()), (Radius, r.into())]))
                .unwrap();
        }
        table
            .insert(
                3,
                &row(&[(Velocity, [0.0, 0.0, 0.34].into()), (Mass, 0.3.into())]),
            )
            .unwrap();
        assert_eq!(table.len(), 4);

        let t = floats(table.column(Temperature).unwrap());
        assert_eq!(&t[..3], &[1.0, 2.0, 3.0]);
        assert!(t[3].is_nan());
        let r = floats(table.column(Radius).unwrap());
        assert_eq!(&r[..3], &[4.0, 2.0, 1.0]);
        assert!(r[3].is_nan());

        let v = table.mask(Velocity).unwrap();
        assert_eq!(v.get(0), Some((false, false)));
        assert_eq!(v.get(3), Some((true, false)));

        let last = table.get(3).unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(
            last.get(Velocity),
            Some(&AttributeValue::Float3([0.0, 0.0, 0.34]))
        );
        assert!(!table.get(0).unwrap().contains_key(Velocity));
    }

    #[test]
    fn test_null_and_absent() {
        let mut data = AttributeData::new();
        let mut state = TableState::new();
        let mut table: Table = AttributeTable::new(&mut data, &mut state).unwrap();
        table
            .push(&row(&[(AttributeKey::Status, AttributeValue::Null)]))
            .unwrap();
        table.push(&DataContainer::new()).unwrap();

        let first = table.get(0).unwrap();
        assert_eq!(first.get(AttributeKey::Status), Some(&AttributeValue::Null));
        assert_eq!(table.mask(AttributeKey::Status).unwrap().get(0), Some((true, true)));
        assert!(table.get(1).unwrap().is_empty());
        assert_eq!(
            table.column(AttributeKey::Status).unwrap().values(),
            &ArrayValues::Int(vec![-1, -1])
        );
    }

    #[test]
    fn test_set_replaces_row() {
        let mut data = AttributeData::new();
        let mut state = TableState::new();
        let mut table: Table = AttributeTable::new(&mut data, &mut state).unwrap();
        table
            .push(&row(&[
                (AttributeKey::Mass, 1.0.into()),
                (AttributeKey::Charge, 2.0.into()),
            ]))
            .unwrap();
        table
            .set(0, &row(&[(AttributeKey::Mass, 5.0.into())]))
            .unwrap();
        let got = table.get(0).unwrap();
        assert_eq!(got.get(AttributeKey::Mass), Some(&AttributeValue::Float(5.0)));
        assert!(!got.contains_key(AttributeKey::Charge));

        let err = table.set(1, &DataContainer::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
    }

    #[test]
    fn test_unsupported_keys_ignored() {
        let mut data = AttributeData::new();
        let mut state = TableState::new();
        let mut table: Table = AttributeTable::new(&mut data, &mut state).unwrap();
        table
            .push(&row(&[
                (AttributeKey::Name, "argon".into()),
                (AttributeKey::Mass, 1.0.into()),
            ]))
            .unwrap();
        assert_eq!(table.keys(), vec![AttributeKey::Mass]);
    }

    #[test]
    fn test_delete_last_row_drops_columns() {
        let mut data = AttributeData::new();
        let mut state = TableState::new();
        {
            let mut table: Table = AttributeTable::new(&mut data, &mut state).unwrap();
            table.push(&row(&[(AttributeKey::Mass, 1.0.into())])).unwrap();
            table.push(&row(&[(AttributeKey::Mass, 2.0.into())])).unwrap();
            table.delete(0).unwrap();
            assert_eq!(
                table.get(0).unwrap().get(AttributeKey::Mass),
                Some(&AttributeValue::Float(2.0))
            );
            table.delete(0).unwrap();
            assert!(table.is_empty());
            assert_eq!(table.delete(0).unwrap_err().kind(), ErrorKind::Index);
        }
        assert!(data.is_empty());
        assert!(state.mask(AttributeKey::Mass).is_none());
    }

    #[test]
    fn test_virtual_size_without_columns() {
        let mut data = AttributeData::new();
        let mut state = TableState::new().with_virtual_size(3);
        let mut table: Table = AttributeTable::new(&mut data, &mut state).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.get(2).unwrap().is_empty());
        table
            .set(1, &row(&[(AttributeKey::Radius, 0.5.into())]))
            .unwrap();
        assert_eq!(table.column(AttributeKey::Radius).unwrap().number_of_tuples(), 3);
        assert!(table.get(0).unwrap().is_empty());
    }

    #[test]
    fn test_adopt_validates_columns() {
        let mut data = AttributeData::new();
        data.add(DataArray::from_f64("TEMPERATURE", 1, vec![1.0, 2.0]).unwrap());
        let state = TableState::adopt(&data).unwrap();
        let table = AttributeTable::new(&data, &state).unwrap();
        assert_eq!(
            table.get(1).unwrap().get(AttributeKey::Temperature),
            Some(&AttributeValue::Float(2.0))
        );

        data.add(DataArray::from_f64("MASS", 1, vec![1.0]).unwrap());
        let err = TableState::adopt(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDataset);

        let mut data = AttributeData::new();
        data.add(DataArray::from_f64("scalars", 1, vec![1.0]).unwrap());
        assert_eq!(
            TableState::adopt(&data).unwrap_err().kind(),
            ErrorKind::InvalidDataset
        );

        let mut data = AttributeData::new();
        data.add(DataArray::from_f64("VELOCITY", 1, vec![1.0]).unwrap());
        assert_eq!(
            TableState::adopt(&data).unwrap_err().kind(),
            ErrorKind::InvalidDataset
        );
    }

    #[test]
    fn test_missing_mask_is_invalid_state() {
        let mut data = AttributeData::new();
        data.add(DataArray::from_f64("TEMPERATURE", 1, vec![1.0]).unwrap());
        let state = TableState::new();
        let err = AttributeTable::new(&data, &state).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }
}
