//! # compact-json
//!
//! A compact, read-only representation of JSON documents.
//!
//! A parsed tree is flattened into three tables: array elements, object members and out-of-line
//! string bytes. Structurally identical arrays, objects and members are stored once, short strings
//! live inside their records, and objects whose keys are already sorted are searched with binary
//! search. Nothing in the result holds a pointer, so a document can be emitted as Rust source and
//! loaded from `static` memory with no work at startup.
//!
//! ```rust
//! use serde_json::json;
//!
//! let input = json!({"a": 1, "b": [1, 2, 1], "c": {"a": 1, "b": [1, 2, 1]}});
//! let compiled = compact_json::build(&input);
//! let root = compiled.document().root();
//!
//! let b = root.get("b")?;
//! let nested = root.get("c")?.get("b")?;
//! // Both occurrences refer to the same stored array
//! assert_eq!(b.record(), nested.record());
//! assert_eq!(nested.at(1)?.extract::<i64>()?, 2);
//! let arrays = compiled
//!     .shared_slots()
//!     .iter()
//!     .filter(|slot| slot.kind == compact_json::SlotKind::Array);
//! assert_eq!(arrays.count(), 1);
//! # Ok::<(), compact_json::Error>(())
//! ```
mod arena;
mod builder;
#[cfg(feature = "codegen")]
pub mod codegen;
mod dedup;
mod display;
mod document;
mod error;
mod extract;
mod hash;
mod iter;
mod options;
mod record;
mod source;
mod strings;

pub use arena::Arena;
pub use builder::{Compiled, Stats};
pub use dedup::{SharedSlot, SlotKind};
pub use document::{Document, Value};
pub use error::Error;
pub use extract::FromValue;
pub use hash::hash;
pub use iter::{Entries, Iter};
pub use options::BuildOptions;
pub use record::{Kind, Pair, Record, Run, Str, INLINE_CAPACITY};
pub use source::{JsonSource, MapIter, Node, Number};

/// Build a compact document from `root` with default options.
///
/// # Panics
///
/// Panics if the document needs more than `u32::MAX` records, pairs or string bytes.
#[must_use]
pub fn build<J: JsonSource>(root: &J) -> Compiled<'_, J> {
    BuildOptions::default().build(root)
}

/// Configure how documents are built. See [`BuildOptions`].
#[must_use]
pub fn options() -> BuildOptions {
    BuildOptions::default()
}
