//! Adoption configuration.

use std::collections::BTreeMap;

use cuds_core::{AttributeKey, Result};

/// Container kind requested when adopting a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdoptKind {
    /// Try particles, then mesh, then lattice.
    #[default]
    Auto,
    /// Particles from poly data.
    Particles,
    /// Mesh from an unstructured grid.
    Mesh,
    /// Lattice from image data or lattice-ordered poly data.
    Lattice,
}

/// Settings for [`adapt2cuds`](crate::adopt::adapt2cuds).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdoptConfig {
    /// Requested container kind.
    pub kind: AdoptKind,
    /// Array renames applied to a copy of the dataset before adoption.
    pub rename_arrays: BTreeMap<String, AttributeKey>,
}

impl AdoptConfig {
    /// Configuration for `kind` without renames.
    pub fn new(kind: AdoptKind) -> Self {
        Self {
            kind,
            rename_arrays: BTreeMap::new(),
        }
    }

    /// Builder-style kind setter.
    pub fn with_kind(mut self, kind: AdoptKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder-style rename: arrays called `from` become `to`.
    pub fn rename(mut self, from: impl Into<String>, to: AttributeKey) -> Self {
        self.rename_arrays.insert(from.into(), to);
        self
    }

    /// Builder-style rename by key name.
    ///
    /// # Errors
    /// `UnknownKey` if `to` is not a registered key name.
    pub fn rename_to_name(self, from: impl Into<String>, to: &str) -> Result<Self> {
        Ok(self.rename(from, AttributeKey::from_name(to)?))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some((from, _)) = self
            .rename_arrays
            .iter()
            .find(|(from, _)| from.is_empty())
        {
            return Err(format!("empty array name in rename map: {from:?}"));
        }
        Ok(())
    }
}
