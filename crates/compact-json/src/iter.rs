use core::{iter::FusedIterator, slice};

use crate::{
    document::{Document, Value},
    record::{Pair, Record},
};

/// Iterator over the values of a [`Value`]. See [`Value::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    doc: Document<'a>,
    inner: Inner<'a>,
}

#[derive(Debug, Clone)]
enum Inner<'a> {
    Once(Option<&'a Record>),
    Elements(slice::Iter<'a, Record>),
    Members(slice::Iter<'a, Pair>),
}

impl<'a> Iter<'a> {
    pub(crate) fn new(value: Value<'a>) -> Iter<'a> {
        let doc = value.document();
        let inner = match value.record() {
            Record::Null => Inner::Once(None),
            Record::Array(run) => Inner::Elements(doc.elements(*run).iter()),
            Record::Object { run, .. } => Inner::Members(doc.members(*run).iter()),
            record => Inner::Once(Some(record)),
        };
        Iter { doc, inner }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Value<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match &mut self.inner {
            Inner::Once(record) => record.take(),
            Inner::Elements(records) => records.next(),
            Inner::Members(pairs) => pairs.next().map(|pair| &pair.value),
        }?;
        Some(self.doc.value(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match &self.inner {
            Inner::Once(record) => usize::from(record.is_some()),
            Inner::Elements(records) => records.len(),
            Inner::Members(pairs) => pairs.len(),
        };
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let record = match &mut self.inner {
            Inner::Once(record) => record.take(),
            Inner::Elements(records) => records.next_back(),
            Inner::Members(pairs) => pairs.next_back().map(|pair| &pair.value),
        }?;
        Some(self.doc.value(record))
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// Iterator over the members of an object. See [`Value::entries`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    doc: Document<'a>,
    pairs: slice::Iter<'a, Pair>,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(doc: Document<'a>, pairs: &'a [Pair]) -> Entries<'a> {
        Entries {
            doc,
            pairs: pairs.iter(),
        }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, Value<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let pair = self.pairs.next()?;
        Some((self.doc.text(&pair.key), self.doc.value(&pair.value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

impl DoubleEndedIterator for Entries<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let pair = self.pairs.next_back()?;
        Some((self.doc.text(&pair.key), self.doc.value(&pair.value)))
    }
}

impl ExactSizeIterator for Entries<'_> {}
impl FusedIterator for Entries<'_> {}

#[cfg(test)]
mod tests {
    use crate::build;
    use serde_json::json;

    #[test]
    fn scalar_yields_itself_once() {
        let input = json!("value");
        let compiled = build(&input);
        let mut iter = compiled.document().root().iter();
        assert_eq!(iter.next().and_then(|v| v.as_str()), Some("value"));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn object_yields_member_values() {
        let input = json!({"x": 1, "y": 2, "z": 3});
        let compiled = build(&input);
        let values: Vec<_> = compiled
            .document()
            .root()
            .iter()
            .rev()
            .filter_map(|v| v.as_u64())
            .collect();
        assert_eq!(values, [3, 2, 1]);
    }

    #[test]
    fn entries_from_both_ends() {
        let input = json!({"first": 1, "middle": 2, "last": 3});
        let compiled = build(&input);
        let mut entries = compiled.document().root().entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries.next().map(|(key, _)| key), Some("first"));
        assert_eq!(entries.next_back().map(|(key, _)| key), Some("last"));
        assert_eq!(entries.len(), 1);
    }
}
