//! Node IDs and ranges for the flat AST.
//!
//! Children are referenced by `u32` indices into [`ExprArena`](crate::ExprArena)
//! rather than boxed, and child lists are `(start, len)` windows into the
//! arena's flattened list storage.

use std::fmt;

/// Index into the expression arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Index into the statement arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct StmtId(u32);

impl StmtId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        StmtId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StmtId({})", self.0)
    }
}

macro_rules! define_range {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            #[inline]
            pub const fn new(start: u32, len: u32) -> Self {
                $name { start, len }
            }

            #[inline]
            pub const fn is_empty(&self) -> bool {
                self.len == 0
            }

            #[inline]
            pub const fn len(&self) -> usize {
                self.len as usize
            }

            #[inline]
            pub(crate) fn to_range(self) -> std::ops::Range<usize> {
                self.start as usize..(self.start + self.len) as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}..{})", stringify!($name), self.start, self.start + self.len)
            }
        }
    };
}

define_range!(
    /// Window into the arena's flattened expression lists.
    ExprRange
);
define_range!(
    /// Window into the arena's flattened statement lists.
    StmtRange
);
define_range!(
    /// Window into the arena's parameter storage.
    ParamRange
);
