use ahash::RandomState;
use indexmap::{map::Entry, IndexMap};

use crate::{
    hash::hash,
    record::{Str, INLINE_CAPACITY},
};

/// Identifier of a distinct string content within a [`StringTable`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct StrId(u32);

impl StrId {
    #[inline]
    pub(crate) fn get(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub(crate) struct StringEntry {
    pub(crate) hash: u32,
    pub(crate) count: u32,
    /// Pre-order position of the first occurrence.
    pub(crate) first_seen: u32,
}

/// Every distinct string of a document, keys included, in order of first encounter.
///
/// Strings are compared by bytes only: different encodings of the same text are different
/// strings.
#[derive(Debug, Default)]
pub(crate) struct StringTable<'doc> {
    entries: IndexMap<&'doc str, StringEntry, RandomState>,
}

impl<'doc> StringTable<'doc> {
    /// Record one occurrence of `value` at the given pre-order `position`.
    pub(crate) fn intern(&mut self, value: &'doc str, position: u32) -> StrId {
        let id = StrId(to_u32(self.entries.len(), "distinct strings"));
        match self.entries.entry(value) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().count += 1;
                StrId(to_u32(entry.index(), "distinct strings"))
            }
            Entry::Vacant(entry) => {
                entry.insert(StringEntry {
                    hash: hash(value.as_bytes()),
                    count: 1,
                    first_seen: position,
                });
                id
            }
        }
    }

    pub(crate) fn id(&self, value: &str) -> Option<StrId> {
        self.entries
            .get_index_of(value)
            .map(|idx| StrId(to_u32(idx, "distinct strings")))
    }

    pub(crate) fn get(&self, id: StrId) -> (&'doc str, &StringEntry) {
        let (value, entry) = self
            .entries
            .get_index(id.get())
            .expect("String id from a different table");
        (*value, entry)
    }

    /// Whether occurrences of this string need a slot in the string buffer at all.
    pub(crate) fn is_inline(&self, id: StrId) -> bool {
        self.get(id).0.len() <= INLINE_CAPACITY
    }

    /// Stored out of line and used more than once.
    pub(crate) fn is_shared(&self, id: StrId) -> bool {
        !self.is_inline(id) && self.get(id).1.count > 1
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Ids of shared strings in order of first encounter.
    pub(crate) fn shared(&self) -> impl Iterator<Item = (StrId, &StringEntry)> + '_ {
        self.entries
            .values()
            .enumerate()
            .map(|(idx, entry)| (StrId(to_u32(idx, "distinct strings")), entry))
            .filter(|(id, _)| self.is_shared(*id))
    }
}

/// Out-of-line string storage of a document under construction.
#[derive(Debug, Default)]
pub(crate) struct StringBuffer {
    buffer: String,
    /// Materialized spans of shared strings, indexed by `StrId`.
    spans: Vec<Option<Str>>,
}

impl StringBuffer {
    pub(crate) fn new(table: &StringTable<'_>) -> Self {
        StringBuffer {
            buffer: String::new(),
            spans: vec![None; table.len()],
        }
    }

    /// Record for the string `id`: inline if it fits, otherwise a span that is shared across all
    /// occurrences when `share` is set.
    pub(crate) fn store(&mut self, table: &StringTable<'_>, id: StrId, share: bool) -> Str {
        let (value, entry) = table.get(id);
        if let Some(inline) = Str::inline(value) {
            return inline;
        }
        let share = share && table.is_shared(id);
        if share {
            if let Some(span) = self.spans[id.get()] {
                return span;
            }
        }
        let span = Str::indirect(
            to_u32(self.buffer.len(), "string bytes"),
            to_u32(value.len(), "string bytes"),
            entry.hash,
        );
        self.buffer.push_str(value);
        if share {
            self.spans[id.get()] = Some(span);
        }
        span
    }

    pub(crate) fn finish(self) -> String {
        self.buffer
    }
}

/// Offsets and lengths are stored as `u32`.
pub(crate) fn to_u32(value: usize, what: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic!("Document has more than 4Gi {what}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_occurrences_in_first_encounter_order() {
        let mut table = StringTable::default();
        let a = table.intern("a considerably long string", 0);
        let b = table.intern("b", 1);
        let again = table.intern("a considerably long string", 2);
        assert_eq!(a, again);
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 1);
        assert_eq!(table.get(a).1.count, 2);
        assert_eq!(table.get(b).1.count, 1);
        assert_eq!(table.id("b"), Some(b));
        assert_eq!(table.id("c"), None);
    }

    #[test]
    fn short_strings_are_never_shared() {
        let mut table = StringTable::default();
        let id = table.intern("short", 0);
        table.intern("short", 1);
        assert!(table.is_inline(id));
        assert!(!table.is_shared(id));
        assert_eq!(table.shared().count(), 0);
    }

    #[test]
    fn shared_long_strings_are_stored_once() {
        let mut table = StringTable::default();
        let shared = table.intern("repeated long string", 0);
        table.intern("repeated long string", 1);
        let single = table.intern("a single long string", 2);
        let mut buffer = StringBuffer::new(&table);

        let first = buffer.store(&table, shared, true);
        let second = buffer.store(&table, shared, true);
        let third = buffer.store(&table, single, true);
        assert_eq!(first, second);
        assert_ne!(first, third);
        let strings = buffer.finish();
        assert_eq!(strings, "repeated long stringa single long string");
        assert_eq!(first.resolve(&strings), Some("repeated long string"));
        assert_eq!(third.resolve(&strings), Some("a single long string"));
    }

    #[test]
    fn sharing_can_be_disabled() {
        let mut table = StringTable::default();
        let id = table.intern("repeated long string", 0);
        table.intern("repeated long string", 1);
        let mut buffer = StringBuffer::new(&table);
        let first = buffer.store(&table, id, false);
        let second = buffer.store(&table, id, false);
        assert_ne!(first, second);
        assert_eq!(buffer.finish().len(), 40);
    }

    #[test]
    fn boundary_between_inline_and_indirect() {
        let mut table = StringTable::default();
        let exact = table.intern("12345678", 0);
        let over = table.intern("123456789", 1);
        let mut buffer = StringBuffer::new(&table);
        let exact = buffer.store(&table, exact, true);
        let over = buffer.store(&table, over, true);
        assert!(exact.is_inline());
        assert!(!over.is_inline());
        assert_eq!(exact.len(), 8);
        assert_eq!(over.len(), 9);
    }
}
