//! Byte ranges into the formula text.
//!
//! Every token, AST node and error carries one. Errors report the start
//! offset as their position.

use std::fmt;
use std::ops::Range;

/// Half-open byte range `start..end` in the formula source.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Placeholder for nodes that have no source text.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    /// Offsets past `u32::MAX` saturate.
    pub fn from_range(range: Range<usize>) -> Self {
        Span {
            start: saturate(range.start),
            end: saturate(range.end),
        }
    }

    /// The empty span at `offset`, where end-of-input errors point.
    pub fn at(offset: usize) -> Self {
        let offset = saturate(offset);
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Smallest span covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

fn saturate(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_covers_both() {
        let call = Span::from_range(4..9);
        let args = Span::from_range(7..15);
        assert_eq!(call.merge(args), Span::from_range(4..15));
        assert_eq!(args.merge(call), Span::from_range(4..15));
    }

    #[test]
    fn test_offsets_saturate() {
        assert_eq!(Span::at(usize::MAX), Span { start: u32::MAX, end: u32::MAX });
        assert_eq!(Span::at(3), Span::from_range(3..3));
    }
}
