//! Input documents.
//!
//! The builder does not parse JSON itself. Anything that can describe a parsed tree node by node,
//! with children in source order, can be compiled through [`JsonSource`].
use serde_json::Value;

/// A JSON number as reported by the input tree.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Number {
    /// An integer that fits `i64` and is not explicitly unsigned.
    Signed(i64),
    /// A non-negative integer outside of `i64`, or one the source marks as unsigned.
    Unsigned(u64),
    Float(f64),
}

impl From<&serde_json::Number> for Number {
    fn from(value: &serde_json::Number) -> Self {
        if let Some(i) = value.as_i64() {
            Number::Signed(i)
        } else if let Some(u) = value.as_u64() {
            Number::Unsigned(u)
        } else {
            // Always `Some` without `arbitrary_precision`
            Number::Float(value.as_f64().unwrap_or(f64::NAN))
        }
    }
}

/// A borrowed view of one input node.
pub enum Node<'a, J: JsonSource + 'a> {
    Null,
    Bool(bool),
    Number(Number),
    String(&'a str),
    Array(J::Items<'a>),
    Object(J::Members<'a>),
}

/// A parsed JSON tree that can be compiled into a compact document.
///
/// Iteration order of arrays and objects must match the source order: it decides which
/// occurrence of a duplicated subtree is materialized first.
pub trait JsonSource: Sized {
    type Items<'a>: Iterator<Item = &'a Self>
    where
        Self: 'a;
    type Members<'a>: Iterator<Item = (&'a str, &'a Self)>
    where
        Self: 'a;

    fn node(&self) -> Node<'_, Self>;
}

impl JsonSource for Value {
    type Items<'a> = core::slice::Iter<'a, Value>;
    type Members<'a> = MapIter<'a>;

    fn node(&self) -> Node<'_, Self> {
        match self {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => Node::Number(Number::from(n)),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Array(items.iter()),
            Value::Object(members) => Node::Object(MapIter(members.iter())),
        }
    }
}

/// Object members of a [`serde_json::Value`] in declaration order.
pub struct MapIter<'a>(serde_json::map::Iter<'a>);

impl<'a> Iterator for MapIter<'a> {
    type Item = (&'a str, &'a Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for MapIter<'_> {}
