use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};

/// A total order over byte-string keys.
///
/// The order must be stable across calls: a table relies on it to place and find entries, and
/// changing the answer for keys already stored is a logic error.
pub trait KeyComparator {
    /// Compares two keys, returning their relative order.
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;

    /// Returns true if the keys are considered the same key.
    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        self.compare(a, b).is_eq()
    }

    /// Returns true if keys that are [`equal`](KeyComparator::equal) are always byte-identical.
    ///
    /// When this holds, tables may reject candidate matches by comparing key fingerprints before
    /// comparing the keys themselves. It must be false for any folding comparator.
    fn is_bytewise(&self) -> bool {
        false
    }
}

/// Byte-lexicographic order: compares the common prefix, then the shorter key is less.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lexical;

impl KeyComparator for Lexical {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }

    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        a == b
    }

    fn is_bytewise(&self) -> bool {
        true
    }
}

/// Byte-lexicographic order after ASCII case folding. Non-ASCII bytes are compared as-is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaseInsensitive;

impl KeyComparator for CaseInsensitive {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.iter()
            .map(u8::to_ascii_lowercase)
            .cmp(b.iter().map(u8::to_ascii_lowercase))
    }

    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        a.eq_ignore_ascii_case(b)
    }
}

/// Adapts a closure into a [`KeyComparator`].
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<F: Fn(&[u8], &[u8]) -> Ordering> KeyComparator for FnComparator<F> {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> Debug for FnComparator<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComparator").finish_non_exhaustive()
    }
}

/// A comparator chosen at run time.
pub type DynComparator = Box<dyn KeyComparator + Send>;

impl<C: KeyComparator + ?Sized> KeyComparator for Box<C> {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        (**self).compare(a, b)
    }

    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        (**self).equal(a, b)
    }

    fn is_bytewise(&self) -> bool {
        (**self).is_bytewise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical() {
        assert_eq!(Lexical.compare(b"abc", b"abd"), Ordering::Less);
        assert_eq!(
            Lexical.compare(b"ab", b"abc"),
            Ordering::Less,
            "A shorter key with an equal prefix should compare less."
        );
        assert_eq!(Lexical.compare(b"B", b"a"), Ordering::Less, "Lexical order is by byte value.");
        assert!(Lexical.is_bytewise());
    }

    #[test]
    fn test_case_insensitive() {
        assert!(CaseInsensitive.equal(b"Key", b"kEY"));
        assert_eq!(CaseInsensitive.compare(b"B", b"a"), Ordering::Greater);
        assert_eq!(CaseInsensitive.compare(b"ab", b"AbC"), Ordering::Less);
        assert!(!CaseInsensitive.is_bytewise(), "Folding comparators can't use fingerprints.");
    }

    #[test]
    fn test_dyn_and_fn() {
        let reversed: DynComparator = Box::new(FnComparator(|a: &[u8], b: &[u8]| b.cmp(a)));
        assert_eq!(reversed.compare(b"a", b"b"), Ordering::Greater);
        assert!(reversed.equal(b"a", b"a"));
        assert!(!reversed.is_bytewise());
    }
}
