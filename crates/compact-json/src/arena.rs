use crate::{
    document::Document,
    record::{Pair, Record},
};

/// Owned storage of a built document.
///
/// Arrays point into `records`, objects into `pairs`, long strings into `strings`. Nothing
/// here is mutated once the builder returns; all queries go through [`Arena::document`].
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    pub(crate) records: Vec<Record>,
    pub(crate) pairs: Vec<Pair>,
    pub(crate) strings: String,
    pub(crate) root: Record,
}

impl Arena {
    /// Borrow the arena as a queryable document.
    #[must_use]
    pub fn document(&self) -> Document<'_> {
        Document::new(&self.records, &self.pairs, &self.strings, &self.root)
    }
    /// Array elements of every array, each array a contiguous run.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }
    /// Members of every object, each object a contiguous run.
    #[must_use]
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }
    /// Content of strings that do not fit inline.
    #[must_use]
    pub fn strings(&self) -> &str {
        &self.strings
    }
    #[must_use]
    pub fn root(&self) -> &Record {
        &self.root
    }
}
