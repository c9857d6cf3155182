//! Saved table state.
//!
//! A [`Snapshot`] pairs the raw table bytes with the reverse cache. The table
//! bytes carry no delimiters: name boundaries are only known through the
//! atoms that were handed out, so the bytes must be restored verbatim.

use crate::atom::{Atom, AtomRepr};
use crate::error::SnapshotError;
use rustc_hash::FxHashMap;

/// Reverse cache: content hash to the atom holding that content.
pub type AtomCache = FxHashMap<u64, Atom>;

/// Copy of a table's bytes and cache, owned by the caller.
///
/// Either half may be empty. An empty cache only costs lookup speed until
/// names are looked up again; an empty `data` resets the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Concatenated bytes of every referenced name.
    pub data: Vec<u8>,
    /// Content hash to atom.
    pub cache: AtomCache,
}

impl Snapshot {
    pub fn new(data: Vec<u8>, cache: AtomCache) -> Self {
        Snapshot { data, cache }
    }

    /// Snapshot with table bytes but no cache.
    pub fn from_data(data: Vec<u8>) -> Self {
        Snapshot {
            data,
            cache: AtomCache::default(),
        }
    }

    /// Check that every cached atom is embedded or addresses bytes inside
    /// `data`.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let data_len = self.data.len();
        for &atom in self.cache.values() {
            let in_range = match atom.repr() {
                AtomRepr::Referenced { offset, len } => {
                    len > 0 && offset as usize + usize::from(len) <= data_len
                }
                AtomRepr::Embedded { .. } => true,
                AtomRepr::Empty => false,
            };
            if !in_range {
                return Err(SnapshotError::OutOfRange { atom, data_len });
            }
        }
        Ok(())
    }
}

#[cfg(feature = "persist")]
impl Snapshot {
    /// Encode for storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Decode a snapshot written by [`Snapshot::to_bytes`] and validate it.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot =
            bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
