//! String interner for identifiers and literal text.
//!
//! Each formula owns one interner. Strings live exactly as long as it does;
//! lookups borrow from the interner.

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::Name;

/// Error when interning a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// More than `u32::MAX` distinct strings.
    Overflow { count: usize },
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "string interner exceeded capacity: {count} strings, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

/// String interner shared by every stage of one formula.
///
/// Interning needs `&mut self`; every later stage only reads.
pub struct StringInterner {
    map: FxHashMap<Rc<str>, Name>,
    strings: Vec<Rc<str>>,
}

impl StringInterner {
    pub fn new() -> Self {
        let empty: Rc<str> = Rc::from("");
        let mut map = FxHashMap::default();
        map.insert(Rc::clone(&empty), Name::EMPTY);
        StringInterner {
            map,
            strings: vec![empty],
        }
    }

    /// Try to intern a string, returning its Name or an error on overflow.
    pub fn try_intern(&mut self, s: &str) -> Result<Name, InternError> {
        if let Some(&name) = self.map.get(s) {
            return Ok(name);
        }
        let index = u32::try_from(self.strings.len()).map_err(|_| InternError::Overflow {
            count: self.strings.len(),
        })?;
        let name = Name::from_raw(index);
        let text: Rc<str> = Rc::from(s);
        self.strings.push(Rc::clone(&text));
        self.map.insert(text, name);
        Ok(name)
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics past `u32::MAX` distinct strings. Use `try_intern` to handle
    /// that case.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Name {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// The Name of `s` if it has been interned.
    pub fn get(&self, s: &str) -> Option<Name> {
        self.map.get(s).copied()
    }

    /// Look up the string for a Name.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &str {
        self.strings.get(name.index()).map_or("", |s| s)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        // The empty string is always present.
        false
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedupes() {
        let mut interner = StringInterner::new();
        let a = interner.intern("alpha");
        let b = interner.intern("beta");
        assert_eq!(a, interner.intern("alpha"));
        assert_ne!(a, b);
        assert_eq!(interner.lookup(b), "beta");
        assert_eq!(interner.len(), 3);
    }

    #[test]
    fn test_empty_is_preinterned() {
        let mut interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_get_does_not_intern() {
        let mut interner = StringInterner::new();
        assert_eq!(interner.get("x"), None);
        let x = interner.intern("x");
        assert_eq!(interner.get("x"), Some(x));
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_strings_are_freed_with_the_interner() {
        let mut interner = StringInterner::new();
        interner.intern("short-lived");
        let text = Rc::clone(&interner.strings[1]);
        assert_eq!(Rc::strong_count(&text), 3);
        drop(interner);
        assert_eq!(Rc::strong_count(&text), 1);
    }
}
