//! Row-to-column accumulation for export.
//!
//! A [`DataAccumulator`] collects CUDS rows one at a time and writes them out
//! as one data array per key. In [`AccumulatorMode::Fixed`] the key set is
//! declared up front and other keys are ignored; in
//! [`AccumulatorMode::Expand`] every new key becomes a column, back-filled
//! with nulls for the rows seen before it.

use std::collections::BTreeMap;

use cuds_core::{AttributeKey, AttributeValue, DataContainer, ElementType, Result};
use tracing::{trace, warn};
use vds_io::{AttributeData, DataArray};

/// Key handling of a [`DataAccumulator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccumulatorMode {
    /// Only these keys are collected; rows missing one store a null.
    Fixed(Vec<AttributeKey>),
    /// Every key seen becomes a column.
    Expand,
}

/// Collects rows into per-key columns.
#[derive(Debug, Clone)]
pub struct DataAccumulator {
    expand: bool,
    keys: Vec<AttributeKey>,
    columns: BTreeMap<AttributeKey, Vec<AttributeValue>>,
    len: usize,
}

impl DataAccumulator {
    /// Create an empty accumulator.
    ///
    /// Fixed keys that cannot be stored as a numeric column are dropped
    /// with a warning.
    pub fn new(mode: AccumulatorMode) -> Self {
        let (expand, requested) = match mode {
            AccumulatorMode::Fixed(keys) => (false, keys),
            AccumulatorMode::Expand => (true, Vec::new()),
        };
        let mut keys = Vec::with_capacity(requested.len());
        for key in requested {
            if !key.is_representable() {
                warn!(key = %key, "key cannot be stored as a data array, dropped");
            } else if !keys.contains(&key) {
                keys.push(key);
            }
        }
        let columns = keys.iter().map(|k| (*k, Vec::new())).collect();
        Self {
            expand,
            keys,
            columns,
            len: 0,
        }
    }

    /// Accumulator in expand mode.
    pub fn expanding() -> Self {
        Self::new(AccumulatorMode::Expand)
    }

    /// Collected keys in column order.
    pub fn keys(&self) -> &[AttributeKey] {
        &self.keys
    }

    /// Number of rows appended.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no row has been appended.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Values of a key, one per row.
    pub fn column(&self, key: AttributeKey) -> Option<&[AttributeValue]> {
        self.columns.get(&key).map(Vec::as_slice)
    }

    /// Append a row.
    pub fn append(&mut self, row: &DataContainer) {
        if self.expand {
            for key in row.keys() {
                if self.columns.contains_key(&key) {
                    continue;
                }
                if !key.is_representable() {
                    trace!(key = %key, "skipping key without a data array form");
                    continue;
                }
                self.keys.push(key);
                self.columns
                    .insert(key, vec![AttributeValue::Null; self.len]);
            }
        }
        for key in &self.keys {
            let value = row.get(*key).cloned().unwrap_or(AttributeValue::Null);
            if let Some(column) = self.columns.get_mut(key) {
                column.push(value);
            }
        }
        self.len += 1;
    }

    /// Write one array per key into `data`, named with the key name.
    ///
    /// Nulls are written as the key default. Arrays with the same name are
    /// replaced.
    pub fn load_onto(&self, data: &mut AttributeData) -> Result<()> {
        for key in &self.keys {
            let Some(column) = self.columns.get(key) else {
                continue;
            };
            data.add(to_array(*key, column)?);
        }
        Ok(())
    }
}

fn to_array(key: AttributeKey, values: &[AttributeValue]) -> Result<DataArray> {
    let width = key.shape().components();
    let default = key.default_value();
    let resolved = values.iter().map(|v| if v.is_null() { &default } else { v });
    let array = if key.element_type() == ElementType::Float {
        let mut flat = Vec::with_capacity(values.len() * width);
        for value in resolved {
            match value {
                AttributeValue::Float(v) => flat.push(*v),
                AttributeValue::Float3(v) => flat.extend_from_slice(v),
                other => key.check_value(other)?,
            }
        }
        DataArray::from_f64(key.name(), width, flat)?
    } else {
        let mut flat = Vec::with_capacity(values.len() * width);
        for value in resolved {
            match value {
                AttributeValue::Int(v) => flat.push(*v),
                AttributeValue::Int3(v) => flat.extend_from_slice(v),
                other => key.check_value(other)?,
            }
        }
        DataArray::from_i64(key.name(), width, flat)?
    };
    Ok(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vds_io::ArrayValues;

    fn row(pairs: Vec<(AttributeKey, AttributeValue)>) -> DataContainer {
        let mut row = DataContainer::new();
        for (k, v) in pairs {
            row.insert(k, v).unwrap();
        }
        row
    }

    #[test]
    fn test_fixed_mode() {
        let mut acc = DataAccumulator::new(AccumulatorMode::Fixed(vec![
            AttributeKey::Mass,
            AttributeKey::Name,
            AttributeKey::Mass,
        ]));
        assert_eq!(acc.keys(), &[AttributeKey::Mass]);
        acc.append(&row(vec![
            (AttributeKey::Mass, 1.0.into()),
            (AttributeKey::Velocity, [1.0, 0.0, 0.0].into()),
        ]));
        acc.append(&DataContainer::new());
        assert_eq!(acc.len(), 2);
        assert_eq!(
            acc.column(AttributeKey::Mass).unwrap(),
            &[AttributeValue::Float(1.0), AttributeValue::Null]
        );
        assert!(acc.column(AttributeKey::Velocity).is_none());
    }

    #[test]
    fn test_expand_mode_back_fills() {
        let mut acc = DataAccumulator::expanding();
        acc.append(&row(vec![(AttributeKey::Label, 3i64.into())]));
        acc.append(&row(vec![
            (AttributeKey::Velocity, [0.0, 0.0, 0.34].into()),
            (AttributeKey::ChemicalSpecie, "Ar".into()),
        ]));
        assert_eq!(acc.keys(), &[AttributeKey::Label, AttributeKey::Velocity]);
        assert_eq!(
            acc.column(AttributeKey::Velocity).unwrap(),
            &[AttributeValue::Null, AttributeValue::Float3([0.0, 0.0, 0.34])]
        );
        assert_eq!(
            acc.column(AttributeKey::Label).unwrap(),
            &[AttributeValue::Int(3), AttributeValue::Null]
        );
    }

    #[test]
    fn test_load_onto_writes_defaults() {
        let mut acc = DataAccumulator::expanding();
        acc.append(&row(vec![(AttributeKey::Label, 3i64.into())]));
        acc.append(&row(vec![(AttributeKey::Temperature, 2.0.into())]));
        let mut data = AttributeData::new();
        acc.load_onto(&mut data).unwrap();

        let label = data.get("LABEL").unwrap();
        assert_eq!(label.values(), &ArrayValues::Int(vec![3, -1]));
        match data.get("TEMPERATURE").unwrap().values() {
            ArrayValues::Float(v) => {
                assert!(v[0].is_nan());
                assert_eq!(v[1], 2.0);
            }
            other => panic!("unexpected values {other:?}"),
        }
    }
}
