//! Column extraction from CUDS iteration.
//!
//! The inverse of [`DataAccumulator`](crate::accumulator::DataAccumulator):
//! a [`DataExtractor`] walks a source of `(uid, row)` pairs and returns the
//! value of one selected key per UID, plus the union of keys seen.

use std::collections::{BTreeSet, HashSet};

use cuds_core::{
    AttributeKey, AttributeValue, DataContainer, ElementKind, MeshContainer, ParticlesContainer,
};
use indexmap::IndexMap;
use uuid::Uuid;

type Rows<'a> = Box<dyn Iterator<Item = (Uuid, DataContainer)> + 'a>;
type Source<'a> = Box<dyn Fn() -> Rows<'a> + 'a>;

#[derive(Debug, Clone, Default)]
struct Snapshot {
    available: BTreeSet<AttributeKey>,
    data: IndexMap<Uuid, AttributeValue>,
}

/// Extracts `{uid -> value}` for a selected key.
///
/// Results are computed on first access and cached until [`reset`] or
/// [`select`] is called.
///
/// [`reset`]: DataExtractor::reset
/// [`select`]: DataExtractor::select
pub struct DataExtractor<'a> {
    source: Source<'a>,
    uids: Option<HashSet<Uuid>>,
    selected: Option<AttributeKey>,
    cache: Option<Snapshot>,
}

impl std::fmt::Debug for DataExtractor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataExtractor")
            .field("uids", &self.uids.as_ref().map(HashSet::len))
            .field("selected", &self.selected)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl<'a> DataExtractor<'a> {
    /// Create an extractor over a row source.
    ///
    /// The source is called again after every [`reset`](Self::reset).
    pub fn new<F>(source: F) -> Self
    where
        F: Fn() -> Rows<'a> + 'a,
    {
        Self {
            source: Box::new(source),
            uids: None,
            selected: None,
            cache: None,
        }
    }

    /// Extractor over the particles of a container.
    pub fn particles(container: &'a dyn ParticlesContainer) -> Self {
        Self::new(move || {
            Box::new(
                container
                    .iter_particles()
                    .filter_map(|p| Some((p.uid?, p.data))),
            )
        })
    }

    /// Extractor over the bonds of a container.
    pub fn bonds(container: &'a dyn ParticlesContainer) -> Self {
        Self::new(move || {
            Box::new(
                container
                    .iter_bonds()
                    .filter_map(|b| Some((b.uid?, b.data))),
            )
        })
    }

    /// Extractor over the points of a mesh.
    pub fn points(container: &'a dyn MeshContainer) -> Self {
        Self::new(move || {
            Box::new(
                container
                    .iter_points()
                    .filter_map(|p| Some((p.uid?, p.data))),
            )
        })
    }

    /// Extractor over the elements of one kind of a mesh.
    pub fn elements(container: &'a dyn MeshContainer, kind: ElementKind) -> Self {
        Self::new(move || {
            Box::new(
                container
                    .iter_elements(kind)
                    .filter_map(|e| Some((e.uid?, e.data))),
            )
        })
    }

    /// Builder-style restriction to a subset of UIDs.
    pub fn with_uids(mut self, uids: impl IntoIterator<Item = Uuid>) -> Self {
        self.uids = Some(uids.into_iter().collect());
        self.cache = None;
        self
    }

    /// Select the key to extract.
    pub fn select(&mut self, key: AttributeKey) {
        if self.selected != Some(key) {
            self.selected = Some(key);
            self.cache = None;
        }
    }

    /// Currently selected key.
    pub fn selected(&self) -> Option<AttributeKey> {
        self.selected
    }

    /// Drop cached results so the next access reads the source again.
    pub fn reset(&mut self) {
        self.cache = None;
    }

    fn snapshot(&mut self) -> &Snapshot {
        if self.cache.is_none() {
            let mut snapshot = Snapshot::default();
            for (uid, row) in (self.source)() {
                if let Some(uids) = &self.uids {
                    if !uids.contains(&uid) {
                        continue;
                    }
                }
                snapshot.available.extend(row.keys());
                if let Some(key) = self.selected {
                    let value = row.get(key).cloned().unwrap_or(AttributeValue::Null);
                    snapshot.data.insert(uid, value);
                }
            }
            self.cache = Some(snapshot);
        }
        self.cache.get_or_insert_with(Snapshot::default)
    }

    /// Union of keys over the rows in scope.
    pub fn available(&mut self) -> &BTreeSet<AttributeKey> {
        &self.snapshot().available
    }

    /// Value of the selected key per UID, in source order.
    ///
    /// Rows without the key map to [`AttributeValue::Null`]. Empty when no
    /// key is selected.
    pub fn data(&mut self) -> &IndexMap<Uuid, AttributeValue> {
        &self.snapshot().data
    }
}
