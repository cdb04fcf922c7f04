use core::fmt;
use std::borrow::Cow;

use crate::{
    error::Error,
    extract::FromValue,
    hash::hash,
    iter::{Entries, Iter},
    record::{Kind, Pair, Record, Run, Str},
};

/// A read-only view of a compact document.
///
/// All tables are borrowed, so a `Document<'static>` can be assembled in a `static` or `const`
/// context from tables emitted at build time. A document whose runs point outside its tables
/// behaves as if those runs were empty.
#[derive(Copy, Clone)]
pub struct Document<'a> {
    records: &'a [Record],
    pairs: &'a [Pair],
    strings: &'a str,
    root: &'a Record,
}

impl<'a> Document<'a> {
    #[must_use]
    pub const fn new(
        records: &'a [Record],
        pairs: &'a [Pair],
        strings: &'a str,
        root: &'a Record,
    ) -> Document<'a> {
        Document {
            records,
            pairs,
            strings,
            root,
        }
    }
    #[must_use]
    pub fn root(self) -> Value<'a> {
        self.value(self.root)
    }
    #[inline]
    pub(crate) fn value(self, record: &'a Record) -> Value<'a> {
        Value { doc: self, record }
    }
    pub(crate) fn elements(self, run: Run) -> &'a [Record] {
        self.records.get(run.range()).unwrap_or(&[])
    }
    pub(crate) fn members(self, run: Run) -> &'a [Pair] {
        self.pairs.get(run.range()).unwrap_or(&[])
    }
    /// Content of a stored string. Unresolvable strings read as empty.
    pub(crate) fn text<'s>(self, value: &'s Str) -> &'s str
    where
        'a: 's,
    {
        value.resolve(self.strings).unwrap_or_default()
    }
}

impl fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("records", &self.records.len())
            .field("pairs", &self.pairs.len())
            .field("strings", &self.strings.len())
            .field("root", &self.root.kind())
            .finish()
    }
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root(), f)
    }
}

/// A single value inside a [`Document`].
///
/// ```rust
/// use serde_json::json;
///
/// let input = json!({"name": "compact", "tags": ["json", "static"]});
/// let compiled = compact_json::build(&input);
/// let root = compiled.document().root();
/// assert_eq!(root.get("name")?, "compact");
/// assert_eq!(root.get("tags")?.at(1)?.extract::<&str>()?, "static");
/// assert!(!root.contains("missing"));
/// # Ok::<(), compact_json::Error>(())
/// ```
#[derive(Copy, Clone)]
pub struct Value<'a> {
    doc: Document<'a>,
    record: &'a Record,
}

impl<'a> Value<'a> {
    #[must_use]
    pub fn record(&self) -> &'a Record {
        self.record
    }
    #[must_use]
    pub fn document(&self) -> Document<'a> {
        self.doc
    }
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.record.kind()
    }
    /// Element count for arrays and objects, byte length for strings, 0 for `null` and 1 for
    /// other scalars.
    #[must_use]
    pub fn size(&self) -> usize {
        self.record.size()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.record, Record::Null)
    }
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self.record, Record::Boolean(_))
    }
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self.record, Record::Integer(_))
    }
    #[must_use]
    pub fn is_uinteger(&self) -> bool {
        matches!(self.record, Record::UInteger(_))
    }
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self.record, Record::Float(_))
    }
    #[must_use]
    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_uinteger() || self.is_float()
    }
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.record, Record::String(_))
    }
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.record, Record::Array(_))
    }
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.record, Record::Object { .. })
    }
    /// Array or object.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.is_array() || self.is_object()
    }
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        !self.is_structured()
    }

    /// The `index`-th element of an array, or the value of the `index`-th member of an object in
    /// storage order.
    ///
    /// # Errors
    ///
    /// [`Error::NotAContainer`] for scalars and [`Error::IndexOutOfRange`] past the end.
    pub fn at(&self, index: usize) -> Result<Value<'a>, Error> {
        let found = match self.record {
            Record::Array(run) => self.doc.elements(*run).get(index),
            Record::Object { run, .. } => self.doc.members(*run).get(index).map(|pair| &pair.value),
            _ => {
                return Err(Error::NotAContainer {
                    found: self.kind(),
                })
            }
        };
        found
            .map(|record| self.doc.value(record))
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.size(),
            })
    }

    /// Look up a member by key.
    ///
    /// Objects flagged as sorted are searched with binary search, others with a linear scan that
    /// returns the first match in storage order.
    ///
    /// # Errors
    ///
    /// [`Error::NotAnObject`] for non-objects and [`Error::KeyNotFound`] if no member has this key.
    pub fn get(&self, key: &str) -> Result<Value<'a>, Error> {
        let Record::Object { run, sorted } = self.record else {
            return Err(Error::NotAnObject {
                found: self.kind(),
            });
        };
        self.lookup(*run, *sorted, key)
            .map(|pair| self.doc.value(&pair.value))
            .ok_or_else(|| Error::key_not_found(key))
    }

    /// Like [`Value::get`], but returns `None` instead of an error.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<Value<'a>> {
        let Record::Object { run, sorted } = self.record else {
            return None;
        };
        self.lookup(*run, *sorted, key)
            .map(|pair| self.doc.value(&pair.value))
    }

    /// Whether this is an object with a member named `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    fn lookup(&self, run: Run, sorted: bool, key: &str) -> Option<&'a Pair> {
        let members = self.doc.members(run);
        let expected = hash(key.as_bytes());
        let is_key = |pair: &Pair| pair.key.hash() == expected && self.doc.text(&pair.key) == key;
        if sorted {
            members
                .binary_search_by(|pair| {
                    if is_key(pair) {
                        core::cmp::Ordering::Equal
                    } else {
                        self.doc.text(&pair.key).as_bytes().cmp(key.as_bytes())
                    }
                })
                .ok()
                .map(|idx| &members[idx])
        } else {
            members.iter().find(|pair| is_key(pair))
        }
    }

    /// Resolve a JSON Pointer (RFC 6901) relative to this value.
    ///
    /// ```rust
    /// use serde_json::json;
    ///
    /// let input = json!({"a/b": [{"~": 42}]});
    /// let compiled = compact_json::build(&input);
    /// let value = compiled.document().root().pointer("/a~1b/0/~0");
    /// assert_eq!(value.and_then(|v| v.as_i64()), Some(42));
    /// ```
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<Value<'a>> {
        if pointer.is_empty() {
            return Some(*self);
        }
        if !pointer.starts_with('/') {
            return None;
        }
        pointer
            .split('/')
            .skip(1)
            .map(unescape_segment)
            .try_fold(*self, |target, token| match target.record {
                Record::Object { .. } => target.find(&token),
                Record::Array(_) => parse_index(&token).and_then(|idx| target.at(idx).ok()),
                _ => None,
            })
    }

    /// Convert into a Rust value.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if the value can not be represented as `T`.
    pub fn extract<T: FromValue<'a>>(&self) -> Result<T, Error> {
        T::from_value(*self)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.extract().ok()
    }
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.extract().ok()
    }
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.extract().ok()
    }
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.extract().ok()
    }
    #[must_use]
    pub fn as_str(&self) -> Option<&'a str> {
        match self.record {
            Record::String(s) => Some(self.doc.text(s)),
            _ => None,
        }
    }
    #[must_use]
    pub fn as_null(&self) -> Option<()> {
        self.is_null().then_some(())
    }

    /// Array elements or object member values in storage order.
    ///
    /// `null` yields nothing and any other scalar yields itself once. Each call starts over.
    #[must_use]
    pub fn iter(&self) -> Iter<'a> {
        Iter::new(*self)
    }

    /// Object members as `(key, value)` in storage order. Empty for non-objects.
    #[must_use]
    pub fn entries(&self) -> Entries<'a> {
        match self.record {
            Record::Object { run, .. } => Entries::new(self.doc, self.doc.members(*run)),
            _ => Entries::new(self.doc, &[]),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({}: {self})", self.kind())
    }
}

impl<'a> IntoIterator for Value<'a> {
    type Item = Value<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self)
    }
}

impl<'a> IntoIterator for &Value<'a> {
    type Item = Value<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(*self)
    }
}

fn unescape_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

// Same rules as `serde_json`: no sign, no leading zeros.
fn parse_index(s: &str) -> Option<usize> {
    if s.starts_with('+') || (s.starts_with('0') && s.len() != 1) {
        return None;
    }
    s.parse().ok()
}
