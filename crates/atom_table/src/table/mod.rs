//! Shared name table with a hash-keyed reverse cache.
//!
//! Short names never reach the table: they are embedded in the atom itself.
//! Longer names are appended once to a single byte buffer and addressed by
//! offset. The buffer and the cache sit behind one `RwLock` and change
//! together.

use crate::atom::{Atom, AtomRepr, MAX_ATOM_LEN, MAX_OFFSET};
use crate::error::AtomError;
use crate::hash::hash_bytes;
use crate::snapshot::{AtomCache, Snapshot};
use parking_lot::RwLock;
use std::sync::Arc;

/// State guarded by the table lock.
struct TableState {
    /// Append-only name bytes. Offsets into it never move.
    data: Vec<u8>,
    /// Content hash to atom. May be partial, never authoritative.
    cache: AtomCache,
}

impl TableState {
    /// Table bytes of a referenced atom, if they are in bounds.
    fn slice(&self, atom: Atom) -> Option<&[u8]> {
        match atom.repr() {
            AtomRepr::Referenced { offset, len } => {
                let start = offset as usize;
                self.data.get(start..start + usize::from(len))
            }
            AtomRepr::Empty | AtomRepr::Embedded { .. } => None,
        }
    }

    /// Cache hit for `s`, checked against the table bytes.
    fn cached(&self, s: &[u8], hash: u64) -> Option<Atom> {
        let atom = *self.cache.get(&hash)?;
        (self.slice(atom)? == s).then_some(atom)
    }

    /// First occurrence of `s` anywhere in the table.
    fn scan(&self, s: &[u8]) -> Option<Atom> {
        let offset = memchr::memmem::find(&self.data, s)?;
        let atom = Atom::referenced(offset, s.len());
        (!atom.is_empty()).then_some(atom)
    }

    fn append(&mut self, s: &[u8], hash: u64) -> Result<Atom, AtomError> {
        let offset = self.data.len();
        if offset > MAX_OFFSET {
            return Err(AtomError::TableFull { offset });
        }

        self.data.extend_from_slice(s);
        let atom = Atom::referenced(offset, s.len());
        self.cache.insert(hash, atom);
        tracing::trace!(offset, len = s.len(), "appended atom name");
        Ok(atom)
    }
}

/// Interning table for [`Atom`]s.
///
/// Provides lookup and find-or-create for names up to [`MAX_ATOM_LEN`]
/// bytes. Names are never removed.
///
/// # Thread Safety
/// One `RwLock` guards the table bytes and the cache. Lookups take the read
/// lock; appends, cache promotion and [`AtomTable::load`] take the write
/// lock. Embedded atoms never lock.
pub struct AtomTable {
    state: RwLock<TableState>,
}

impl AtomTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty table with room for `bytes` bytes of names.
    pub fn with_capacity(bytes: usize) -> Self {
        AtomTable {
            state: RwLock::new(TableState {
                data: Vec::with_capacity(bytes),
                cache: AtomCache::default(),
            }),
        }
    }

    /// Create a table holding the state of `snapshot`.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let table = Self::new();
        table.load(snapshot);
        table
    }

    fn check_len(s: &[u8]) -> Result<(), AtomError> {
        match s.len() {
            0 => Err(AtomError::Empty),
            len if len > MAX_ATOM_LEN => Err(AtomError::TooLong { len }),
            _ => Ok(()),
        }
    }

    /// Find the atom for `s` without adding it.
    ///
    /// Returns [`Atom::EMPTY`] if `s` is empty, too long, or has never been
    /// interned. Names of up to four bytes are embedded and always found.
    pub fn lookup(&self, s: impl AsRef<[u8]>) -> Atom {
        let s = s.as_ref();
        if Self::check_len(s).is_err() {
            return Atom::EMPTY;
        }

        let embedded = Atom::embed(s);
        if !embedded.is_empty() {
            return embedded;
        }

        self.find(s, hash_bytes(s)).unwrap_or(Atom::EMPTY)
    }

    /// Cache, then table scan. A scan hit is promoted into the cache.
    fn find(&self, s: &[u8], hash: u64) -> Option<Atom> {
        let atom = {
            let state = self.state.read();
            if let Some(atom) = state.cached(s, hash) {
                return Some(atom);
            }
            state.scan(s)?
        };

        // Read lock is released here. Other readers may promote the same
        // entry; a `load` may have swapped the table, so recheck the slice.
        let mut state = self.state.write();
        if state.slice(atom) == Some(s) {
            state.cache.insert(hash, atom);
            tracing::trace!(atom = ?atom, "promoted table hit into cache");
        }
        Some(atom)
    }

    /// Find or create the atom for `s`.
    ///
    /// Returns [`Atom::EMPTY`] only when [`AtomTable::try_intern`] would fail.
    #[inline]
    pub fn intern(&self, s: impl AsRef<[u8]>) -> Atom {
        match self.try_intern(s) {
            Ok(atom) => atom,
            Err(err @ AtomError::TableFull { .. }) => {
                tracing::warn!(%err, "atom table exhausted");
                Atom::EMPTY
            }
            Err(AtomError::Empty | AtomError::TooLong { .. }) => Atom::EMPTY,
        }
    }

    /// Find or create the atom for `s`, reporting why none could be made.
    pub fn try_intern(&self, s: impl AsRef<[u8]>) -> Result<Atom, AtomError> {
        let s = s.as_ref();
        Self::check_len(s)?;

        let embedded = Atom::embed(s);
        if !embedded.is_empty() {
            return Ok(embedded);
        }

        // Fast path: already interned
        let hash = hash_bytes(s);
        if let Some(atom) = self.find(s, hash) {
            return Ok(atom);
        }

        // Slow path: need to append
        let mut state = self.state.write();

        // Double-check after acquiring write lock
        if let Some(atom) = state.cached(s, hash).or_else(|| state.scan(s)) {
            state.cache.insert(hash, atom);
            return Ok(atom);
        }

        state.append(s, hash)
    }

    /// Run `f` on the name bytes of `atom`.
    ///
    /// The read lock is held while `f` runs for referenced atoms. Atoms that
    /// do not address this table see an empty slice.
    pub fn with_bytes<R>(&self, atom: Atom, f: impl FnOnce(&[u8]) -> R) -> R {
        match atom.repr() {
            AtomRepr::Empty => f(&[]),
            repr @ AtomRepr::Embedded { .. } => f(repr.inline_bytes().unwrap_or_default()),
            AtomRepr::Referenced { .. } => {
                let state = self.state.read();
                f(state.slice(atom).unwrap_or_default())
            }
        }
    }

    /// Copy of the name bytes of `atom`.
    pub fn bytes(&self, atom: Atom) -> Vec<u8> {
        self.with_bytes(atom, <[u8]>::to_vec)
    }

    /// Name of `atom` as text. Invalid UTF-8 is replaced.
    pub fn text(&self, atom: Atom) -> String {
        self.with_bytes(atom, |bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Content hash of the name of `atom`, as used by the cache.
    pub fn content_hash(&self, atom: Atom) -> u64 {
        self.with_bytes(atom, hash_bytes)
    }

    /// Copy out the table bytes and cache.
    pub fn save(&self) -> Snapshot {
        let state = self.state.read();
        let snapshot = Snapshot::new(state.data.clone(), state.cache.clone());
        tracing::debug!(
            data_len = snapshot.data.len(),
            cached = snapshot.cache.len(),
            "saved atom table"
        );
        snapshot
    }

    /// Replace the table bytes and cache with `snapshot`.
    ///
    /// Atoms handed out before a [`AtomTable::save`] decode the same after
    /// loading that snapshot.
    pub fn load(&self, snapshot: Snapshot) {
        let Snapshot { data, cache } = snapshot;
        tracing::debug!(data_len = data.len(), cached = cache.len(), "loaded atom table");
        *self.state.write() = TableState { data, cache };
    }

    /// Number of bytes in the table.
    pub fn data_len(&self) -> usize {
        self.state.read().data.len()
    }

    /// Number of cache entries.
    pub fn cache_len(&self) -> usize {
        self.state.read().cache.len()
    }
}

impl Default for AtomTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Snapshot> for AtomTable {
    fn from(snapshot: Snapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

/// Atom table shared across threads.
///
/// Cloning shares the same table; use `&AtomTable` where the owner outlives
/// every caller.
#[derive(Clone, Default)]
pub struct SharedAtomTable(Arc<AtomTable>);

impl SharedAtomTable {
    /// Create a new shared table.
    pub fn new() -> Self {
        SharedAtomTable(Arc::new(AtomTable::new()))
    }
}

impl From<AtomTable> for SharedAtomTable {
    fn from(table: AtomTable) -> Self {
        SharedAtomTable(Arc::new(table))
    }
}

impl std::ops::Deref for SharedAtomTable {
    type Target = AtomTable;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
