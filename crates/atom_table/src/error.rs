//! Error types for interning and snapshot persistence.

use crate::atom::{Atom, MAX_ATOM_LEN, MAX_OFFSET};
use std::fmt;

/// Reason an interning request produced no atom.
///
/// [`AtomTable::intern`](crate::AtomTable::intern) folds all of these into
/// [`Atom::EMPTY`]; [`AtomTable::try_intern`](crate::AtomTable::try_intern)
/// reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomError {
    /// The name was empty.
    Empty,
    /// The name was longer than [`MAX_ATOM_LEN`] bytes.
    TooLong { len: usize },
    /// The table has grown past what a 24-bit offset can address.
    TableFull { offset: usize },
}

impl fmt::Display for AtomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomError::Empty => write!(f, "atom name is empty"),
            AtomError::TooLong { len } => {
                write!(f, "atom name is {len} bytes long, max is {MAX_ATOM_LEN}")
            }
            AtomError::TableFull { offset } => write!(
                f,
                "atom table is full: next offset 0x{offset:X} exceeds 0x{MAX_OFFSET:X}"
            ),
        }
    }
}

impl std::error::Error for AtomError {}

/// Failure to encode, decode or accept a [`Snapshot`](crate::Snapshot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Serializing the snapshot failed.
    Encode(String),
    /// The byte stream is not a valid snapshot.
    Decode(String),
    /// A cached atom does not address a slice of the snapshot's table.
    OutOfRange { atom: Atom, data_len: usize },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Encode(msg) => write!(f, "failed to encode atom snapshot: {msg}"),
            SnapshotError::Decode(msg) => write!(f, "failed to decode atom snapshot: {msg}"),
            SnapshotError::OutOfRange { atom, data_len } => {
                write!(f, "cached {atom:?} is outside the {data_len} byte table")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
