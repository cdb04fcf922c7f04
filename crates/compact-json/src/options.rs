use crate::{builder::Compiled, source::JsonSource};

/// Configuration for building compact documents.
///
/// ```rust
/// use serde_json::json;
///
/// let input = json!({"a": [1, 2], "b": [1, 2]});
/// let compiled = compact_json::options().deduplicate(false).build(&input);
/// assert_eq!(compiled.shared_slots().len(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    pub(crate) deduplicate: bool,
    pub(crate) share_strings: bool,
    pub(crate) detect_sorted: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            deduplicate: true,
            share_strings: true,
            detect_sorted: true,
        }
    }
}

impl BuildOptions {
    /// Create [`BuildOptions`] with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Store structurally identical arrays, objects and object members once. Enabled by default.
    ///
    /// When disabled, every container is emitted at its own use site.
    #[must_use]
    pub fn deduplicate(mut self, yes: bool) -> Self {
        self.deduplicate = yes;
        self
    }
    /// Store repeated strings that do not fit inline once. Enabled by default.
    #[must_use]
    pub fn share_strings(mut self, yes: bool) -> Self {
        self.share_strings = yes;
        self
    }
    /// Flag objects whose keys are already strictly ascending so lookups can use binary search.
    /// Enabled by default.
    ///
    /// Input members are never reordered.
    #[must_use]
    pub fn detect_sorted(mut self, yes: bool) -> Self {
        self.detect_sorted = yes;
        self
    }
    /// Build a compact document from `root` using these options.
    ///
    /// # Panics
    ///
    /// Panics if the document needs more than `u32::MAX` records, pairs or string bytes.
    #[must_use]
    pub fn build<J: JsonSource>(self, root: &J) -> Compiled<'_, J> {
        Compiled::build(root, self)
    }
}
