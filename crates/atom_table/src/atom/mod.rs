//! Atom handle and its 32-bit encoding.
//!
//! Bits are packed in exactly two places: [`AtomRepr::encode`] and
//! [`Atom::repr`]. Everything else works on the decoded [`AtomRepr`].

use std::fmt;

/// Maximum length of an atom name, in bytes.
pub const MAX_ATOM_LEN: usize = 127;

/// Largest table offset a referenced atom can address.
pub const MAX_OFFSET: usize = 0x00FF_FFFF;

const EMBEDDED_TAG: u32 = 1 << 31;
const LEN_SHIFT: u32 = 24;
const LEN_MASK: u32 = 0x7F;
const PAYLOAD_MASK: u32 = 0x00FF_FFFF;

/// Longest name that fits inside the atom word.
const MAX_EMBEDDED_LEN: usize = 4;

/// A four byte name overlaps the length field with its first byte, so that
/// byte must decode as a length of at least 4 and leave the tag bit alone.
const FOUR_BYTE_LEAD: std::ops::Range<u8> = 0x04..0x80;

/// Interned byte string.
///
/// Layout: bit 31 selects between two payload shapes.
/// - Embedded (bit 31 set): for 1-3 byte names, bits 30-24 hold the length
///   and bits 23-0 the bytes, right-aligned. A 4 byte name fills bits 30-0
///   directly; its first byte doubles as a length of 4 or more.
/// - Referenced (bit 31 clear): bits 30-24 hold the length (1-127) and
///   bits 23-0 the byte offset into the name table.
///
/// The all-zero word is the empty atom.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "persist", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Atom(u32);

/// Decoded form of an [`Atom`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AtomRepr {
    /// The empty name.
    Empty,
    /// Name stored inside the atom word. Only `bytes[..len]` is meaningful.
    Embedded { len: u8, bytes: [u8; 4] },
    /// Name stored in the table at `offset..offset + len`.
    Referenced { offset: u32, len: u8 },
}

fn fits_inline(s: &[u8]) -> bool {
    match s {
        [_] | [_, _] | [_, _, _] => true,
        [lead, _, _, _] => FOUR_BYTE_LEAD.contains(lead),
        _ => false,
    }
}

impl AtomRepr {
    /// Embedded form of `s`, or `None` if `s` cannot live inside the word.
    pub fn embedded(s: &[u8]) -> Option<Self> {
        if !fits_inline(s) {
            return None;
        }

        let mut bytes = [0; 4];
        bytes[..s.len()].copy_from_slice(s);
        Some(AtomRepr::Embedded {
            len: u8::try_from(s.len()).ok()?,
            bytes,
        })
    }

    /// Referenced form for a table slice, or `None` if it cannot be addressed.
    pub fn referenced(offset: usize, len: usize) -> Option<Self> {
        if len == 0 || len > MAX_ATOM_LEN || offset > MAX_OFFSET {
            return None;
        }
        Some(AtomRepr::Referenced {
            offset: u32::try_from(offset).ok()?,
            len: u8::try_from(len).ok()?,
        })
    }

    /// Pack into the 32-bit word. Invalid field values yield [`Atom::EMPTY`].
    pub fn encode(self) -> Atom {
        match self {
            AtomRepr::Empty => Atom::EMPTY,
            AtomRepr::Embedded { len, bytes } => {
                let n = usize::from(len);
                let Some(name) = bytes.get(..n).filter(|name| fits_inline(name)) else {
                    return Atom::EMPTY;
                };

                let packed = name
                    .iter()
                    .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                if n == MAX_EMBEDDED_LEN {
                    Atom(EMBEDDED_TAG | packed)
                } else {
                    Atom(EMBEDDED_TAG | (u32::from(len) << LEN_SHIFT) | packed)
                }
            }
            AtomRepr::Referenced { offset, len } => {
                if len == 0 || usize::from(len) > MAX_ATOM_LEN || offset > PAYLOAD_MASK {
                    return Atom::EMPTY;
                }
                Atom((u32::from(len) << LEN_SHIFT) | offset)
            }
        }
    }

    /// The name bytes of an embedded atom.
    pub fn inline_bytes(&self) -> Option<&[u8]> {
        match self {
            AtomRepr::Embedded { len, bytes } => bytes.get(..usize::from(*len)),
            _ => None,
        }
    }
}

impl Atom {
    /// The empty name.
    pub const EMPTY: Atom = Atom(0);

    /// Create from a raw 32-bit value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Atom(raw)
    }

    /// Get the raw 32-bit value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether the name is stored inside the atom word.
    #[inline]
    pub const fn is_embedded(self) -> bool {
        self.0 & EMBEDDED_TAG != 0
    }

    /// Name length in bytes.
    #[inline]
    pub const fn len(self) -> usize {
        let n = ((self.0 >> LEN_SHIFT) & LEN_MASK) as usize;
        if self.is_embedded() && n > MAX_EMBEDDED_LEN {
            MAX_EMBEDDED_LEN
        } else {
            n
        }
    }

    /// Embedded atom for `s`, or [`Atom::EMPTY`] when `s` needs the table.
    pub fn embed(s: &[u8]) -> Atom {
        AtomRepr::embedded(s).map_or(Atom::EMPTY, AtomRepr::encode)
    }

    /// Referenced atom for a table slice, or [`Atom::EMPTY`] when out of range.
    pub(crate) fn referenced(offset: usize, len: usize) -> Atom {
        AtomRepr::referenced(offset, len).map_or(Atom::EMPTY, AtomRepr::encode)
    }

    /// Unpack the word.
    pub fn repr(self) -> AtomRepr {
        if self.is_empty() {
            return AtomRepr::Empty;
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "len() is at most LEN_MASK (127)"
        )]
        let len = self.len() as u8;

        if self.is_embedded() {
            let word = (self.0 & !EMBEDDED_TAG).to_be_bytes();
            let mut bytes = [0; 4];
            let n = usize::from(len);
            bytes[..n].copy_from_slice(&word[MAX_EMBEDDED_LEN - n..]);
            AtomRepr::Embedded { len, bytes }
        } else {
            AtomRepr::Referenced {
                offset: self.0 & PAYLOAD_MASK,
                len,
            }
        }
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr() {
            AtomRepr::Empty => write!(f, "Atom(empty)"),
            repr @ AtomRepr::Embedded { .. } => {
                let bytes = repr.inline_bytes().unwrap_or_default();
                write!(f, "Atom({:?})", String::from_utf8_lossy(bytes))
            }
            AtomRepr::Referenced { offset, len } => {
                write!(f, "Atom(offset={offset}, len={len})")
            }
        }
    }
}

impl Default for Atom {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<Atom> for u32 {
    #[inline]
    fn from(atom: Atom) -> u32 {
        atom.0
    }
}
