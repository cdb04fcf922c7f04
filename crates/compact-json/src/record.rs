//! Fixed-shape records every compact document is made of.
//!
//! Records never hold pointers: strings, arrays and objects refer to their content through
//! `(offset, len)` pairs into the tables of the owning [`Document`](crate::Document), which
//! keeps a whole document relocatable and lets it live in `static` memory.
use core::fmt;

use crate::hash::hash;

/// Number of UTF-8 code units a string may have and still be stored inside its record.
///
/// One 64-bit word. It does not follow the target's pointer width so that tables emitted on one
/// machine describe the same layout on any other.
pub const INLINE_CAPACITY: usize = core::mem::size_of::<u64>();

/// The type of a JSON value stored in a [`Record`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    UInteger,
    Float,
    String,
    Array,
    Object,
}

impl Kind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::UInteger => "unsigned integer",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous run of records (for arrays) or pairs (for objects).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Run {
    pub offset: u32,
    pub len: u32,
}

impl Run {
    /// The run every empty container points at.
    pub const EMPTY: Run = Run { offset: 0, len: 0 };

    #[must_use]
    pub const fn new(offset: u32, len: u32) -> Run {
        Run { offset, len }
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn range(self) -> core::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.len as usize
    }
}

/// String storage: short strings live in the record, longer ones in the document's string buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Str {
    Inline {
        len: u8,
        bytes: [u8; INLINE_CAPACITY],
        hash: u32,
    },
    Indirect {
        offset: u32,
        len: u32,
        hash: u32,
    },
}

impl Str {
    /// Store `value` inline.
    ///
    /// Returns `None` when `value` is longer than [`INLINE_CAPACITY`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn inline(value: &str) -> Option<Str> {
        let source = value.as_bytes();
        if source.len() > INLINE_CAPACITY {
            return None;
        }
        let mut bytes = [0; INLINE_CAPACITY];
        let mut idx = 0;
        while idx < source.len() {
            bytes[idx] = source[idx];
            idx += 1;
        }
        Some(Str::Inline {
            len: source.len() as u8,
            bytes,
            hash: hash(source),
        })
    }

    /// Refer to `len` bytes at `offset` in the string buffer. `hash` must be the hash of those bytes.
    #[must_use]
    pub const fn indirect(offset: u32, len: u32, hash: u32) -> Str {
        Str::Indirect { offset, len, hash }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Str::Inline { len, .. } => *len as usize,
            Str::Indirect { len, .. } => *len as usize,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(self, Str::Inline { .. })
    }

    /// Precomputed 28-bit hash of the string bytes.
    #[must_use]
    pub const fn hash(&self) -> u32 {
        match self {
            Str::Inline { hash, .. } | Str::Indirect { hash, .. } => *hash,
        }
    }

    /// Resolve the string content against the string buffer of its document.
    ///
    /// Returns `None` if the record does not describe valid UTF-8 within `strings`.
    pub(crate) fn resolve<'a>(&'a self, strings: &'a str) -> Option<&'a str> {
        match self {
            Str::Inline { len, bytes, .. } => {
                core::str::from_utf8(bytes.get(..usize::from(*len))?).ok()
            }
            Str::Indirect { offset, len, .. } => {
                let start = *offset as usize;
                strings.get(start..start + *len as usize)
            }
        }
    }
}

/// One JSON value.
///
/// Scalars are stored directly; strings, arrays and objects refer to shared storage, and the
/// same run may be referenced by any number of records.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Record {
    Null,
    Boolean(bool),
    Integer(i64),
    UInteger(u64),
    Float(f64),
    String(Str),
    Array(Run),
    /// `sorted` is set when keys are strictly ascending by bytes, which enables binary search.
    Object { run: Run, sorted: bool },
}

impl Record {
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Record::Null => Kind::Null,
            Record::Boolean(_) => Kind::Boolean,
            Record::Integer(_) => Kind::Integer,
            Record::UInteger(_) => Kind::UInteger,
            Record::Float(_) => Kind::Float,
            Record::String(_) => Kind::String,
            Record::Array(_) => Kind::Array,
            Record::Object { .. } => Kind::Object,
        }
    }

    /// Element count for containers, byte length for strings, 0 for null and 1 for other scalars.
    #[must_use]
    pub const fn size(&self) -> usize {
        match self {
            Record::Null => 0,
            Record::Boolean(_) | Record::Integer(_) | Record::UInteger(_) | Record::Float(_) => 1,
            Record::String(s) => s.len(),
            Record::Array(run) | Record::Object { run, .. } => run.len(),
        }
    }
}

/// An object member. Keys are always strings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pair {
    pub key: Str,
    pub value: Record,
}

impl Pair {
    #[must_use]
    pub const fn new(key: Str, value: Record) -> Pair {
        Pair { key, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn record_stays_small() {
        assert!(core::mem::size_of::<Record>() <= 24);
        assert!(core::mem::size_of::<Pair>() <= 48);
    }

    #[test_case(""; "empty")]
    #[test_case("a"; "single byte")]
    #[test_case("12345678"; "exactly capacity")]
    fn short_strings_are_inline(value: &str) {
        let s = Str::inline(value).expect("Fits inline");
        assert!(s.is_inline());
        assert_eq!(s.len(), value.len());
        assert_eq!(s.resolve(""), Some(value));
        assert_eq!(s.hash(), hash(value.as_bytes()));
    }

    #[test]
    fn one_byte_over_capacity_is_rejected() {
        assert_eq!(Str::inline("123456789"), None);
    }

    #[test]
    fn multibyte_inline() {
        // 4 x 2-byte code points fill the record exactly.
        let s = Str::inline("éééé").expect("Fits inline");
        assert_eq!(s.len(), 8);
        assert_eq!(s.resolve(""), Some("éééé"));
    }

    #[test]
    fn indirect_resolves_against_buffer() {
        let buffer = "xxhello, worldyy";
        let s = Str::indirect(2, 12, hash(b"hello, world"));
        assert_eq!(s.resolve(buffer), Some("hello, world"));
        assert_eq!(Str::indirect(10, 12, 0).resolve(buffer), None);
    }

    #[test_case(Record::Null, 0; "null")]
    #[test_case(Record::Boolean(false), 1; "boolean")]
    #[test_case(Record::Integer(-5), 1; "integer")]
    #[test_case(Record::Float(0.5), 1; "float")]
    #[test_case(Record::Array(Run::new(3, 4)), 4; "array")]
    #[test_case(Record::Object { run: Run::EMPTY, sorted: false }, 0; "empty object")]
    fn sizes(record: Record, expected: usize) {
        assert_eq!(record.size(), expected);
    }
}
