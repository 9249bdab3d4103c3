//! Bidirectional map between UIDs and dense row indices.

use std::collections::HashMap;

use cuds_core::{CudsError, Result};
use uuid::Uuid;

/// `uid -> index` and `index -> uid`, mutual inverses over `[0, len)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityMap {
    indices: HashMap<Uuid, usize>,
    uids: Vec<Uuid>,
}

impl IdentityMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `n` fresh random UIDs to `0..n`.
    pub fn with_fresh_uids(n: usize) -> Self {
        let uids: Vec<Uuid> = (0..n).map(|_| Uuid::new_v4()).collect();
        let indices = uids.iter().enumerate().map(|(i, u)| (*u, i)).collect();
        Self { indices, uids }
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.uids.len()
    }

    /// True if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    /// True if `uid` is mapped.
    #[inline]
    pub fn contains(&self, uid: &Uuid) -> bool {
        self.indices.contains_key(uid)
    }

    /// Map `uid` to the next index.
    ///
    /// # Errors
    /// `Value` if `uid` is already mapped.
    pub fn push(&mut self, uid: Uuid) -> Result<usize> {
        if self.contains(&uid) {
            return Err(CudsError::value_error(format!("uid {uid} already exists")));
        }
        let index = self.uids.len();
        self.uids.push(uid);
        self.indices.insert(uid, index);
        Ok(index)
    }

    /// Index of `uid`.
    ///
    /// # Errors
    /// `UnknownUid` if `uid` is not mapped.
    pub fn index_of(&self, uid: &Uuid) -> Result<usize> {
        self.indices
            .get(uid)
            .copied()
            .ok_or(CudsError::UnknownUid { uid: *uid })
    }

    /// UID at `index`.
    ///
    /// # Errors
    /// `Index` if `index` is out of range.
    pub fn uid_at(&self, index: usize) -> Result<Uuid> {
        self.uids.get(index).copied().ok_or(CudsError::Index {
            index,
            len: self.uids.len(),
        })
    }

    /// Remove `uid`, moving the last entry into its index.
    ///
    /// Returns the freed index and the UID that now occupies it, if any.
    pub fn swap_remove(&mut self, uid: &Uuid) -> Result<(usize, Option<Uuid>)> {
        let index = self.index_of(uid)?;
        self.indices.remove(uid);
        self.uids.swap_remove(index);
        let moved = self.uids.get(index).copied();
        if let Some(moved) = moved {
            self.indices.insert(moved, index);
        }
        Ok((index, moved))
    }

    /// Remove `uid`, shifting every later index down by one.
    ///
    /// Returns the freed index.
    pub fn remove_shift(&mut self, uid: &Uuid) -> Result<usize> {
        let index = self.index_of(uid)?;
        self.indices.remove(uid);
        self.uids.remove(index);
        for (i, u) in self.uids.iter().enumerate().skip(index) {
            self.indices.insert(*u, i);
        }
        Ok(index)
    }

    /// UIDs in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Uuid> {
        self.uids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuds_core::ErrorKind;

    fn is_consistent(map: &IdentityMap) -> bool {
        map.iter()
            .enumerate()
            .all(|(i, u)| map.index_of(u).ok() == Some(i))
            && map.indices.len() == map.len()
    }

    #[test]
    fn test_push_and_lookup() {
        let mut map = IdentityMap::new();
        let a = Uuid::new_v4();
        assert_eq!(map.push(a).unwrap(), 0);
        assert_eq!(map.push(a).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(map.uid_at(0).unwrap(), a);
        assert_eq!(map.uid_at(1).unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(
            map.index_of(&Uuid::new_v4()).unwrap_err().kind(),
            ErrorKind::UnknownUid
        );
    }

    #[test]
    fn test_swap_remove() {
        let mut map = IdentityMap::with_fresh_uids(4);
        let first = map.uid_at(0).unwrap();
        let last = map.uid_at(3).unwrap();
        assert_eq!(map.swap_remove(&first).unwrap(), (0, Some(last)));
        assert_eq!(map.index_of(&last).unwrap(), 0);
        assert!(is_consistent(&map));

        let tail = map.uid_at(2).unwrap();
        assert_eq!(map.swap_remove(&tail).unwrap(), (2, None));
        assert_eq!(map.len(), 2);
        assert!(is_consistent(&map));
    }

    #[test]
    fn test_remove_shift() {
        let mut map = IdentityMap::with_fresh_uids(4);
        let second = map.uid_at(1).unwrap();
        let third = map.uid_at(2).unwrap();
        assert_eq!(map.remove_shift(&second).unwrap(), 1);
        assert_eq!(map.index_of(&third).unwrap(), 1);
        assert!(is_consistent(&map));
    }
}
