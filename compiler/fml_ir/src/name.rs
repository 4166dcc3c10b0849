//! Handles for interned text.

use std::fmt;

/// An identifier or literal text, as an index into the formula's
/// [`StringInterner`](crate::StringInterner).
///
/// Handles from one interner mean nothing to another. Renames swap one
/// handle for another in the AST; the text itself is never edited.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// The empty string, interned up front by every interner.
    pub const EMPTY: Name = Name(0);

    pub(crate) const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name#{}", self.0)
    }
}
