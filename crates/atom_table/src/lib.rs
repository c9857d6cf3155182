//! Atom Table - 32-bit Atoms for Short Byte Strings
//!
//! Maps names (tag and attribute names, identifiers, keys) of up to 127 bytes
//! to [`Atom`]s, so that comparing, hashing and storing them costs a `u32`.
//!
//! - Names of 1-4 bytes are embedded in the atom word and never touch the
//!   table or its lock.
//! - Longer names are appended once to a shared byte table and addressed by
//!   offset and length.
//! - A content-hash cache avoids scanning the table for names seen before.
//! - [`Snapshot`]s copy the table out and back in; atoms stay valid across a
//!   save and load.
//!
//! Names are never removed and there is no iteration over live atoms.
//!
//! # Example
//!
//! ```
//! use atom_table::AtomTable;
//!
//! let table = AtomTable::new();
//! let section = table.intern("section");
//! assert_eq!(table.lookup("section"), section);
//! assert_eq!(table.text(section), "section");
//!
//! let div = table.intern("div");
//! assert!(div.is_embedded());
//! ```
//!
//! # Features
//!
//! - `persist`: serde derives on [`Atom`] and [`Snapshot`], and
//!   `Snapshot::to_bytes`/`Snapshot::from_bytes` via bincode.
//!
//! # Debugging
//!
//! Enable tracing with `RUST_LOG=atom_table=debug` (snapshots) or
//! `RUST_LOG=atom_table=trace` (every append and cache promotion) after
//! calling [`init_tracing`].

mod atom;
mod error;
mod hash;
mod snapshot;
mod table;

pub use atom::{Atom, AtomRepr, MAX_ATOM_LEN, MAX_OFFSET};
pub use error::{AtomError, SnapshotError};
pub use hash::hash_bytes;
pub use snapshot::{AtomCache, Snapshot};
pub use table::{AtomTable, SharedAtomTable};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber if `RUST_LOG` is
/// set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
