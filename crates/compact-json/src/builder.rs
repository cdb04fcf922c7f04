use core::marker::PhantomData;

use ahash::AHashMap;

use crate::{
    arena::Arena,
    dedup::{address, Plan, SharedSlot, SigId},
    document::Document,
    options::BuildOptions,
    record::{Pair, Record, Run, Str},
    source::{JsonSource, Node, Number},
    strings::{to_u32, StringBuffer},
};

/// Summary of a single build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    /// JSON values in the input.
    pub nodes: u32,
    /// Array elements stored.
    pub records: usize,
    /// Object members stored.
    pub pairs: usize,
    /// Bytes of out-of-line string content.
    pub string_bytes: usize,
    /// Distinct contents referenced from more than one place.
    pub shared_slots: usize,
    /// Occurrences that reused an already materialized slot.
    pub reused: u32,
}

/// A compact document together with the information gathered while building it.
///
/// Borrows the input tree, so [`Compiled::reference`] can map input nodes to records.
#[derive(Debug)]
pub struct Compiled<'doc, J> {
    arena: Arena,
    plan: Plan<'doc>,
    references: AHashMap<usize, Record>,
    stats: Stats,
    _input: PhantomData<&'doc J>,
}

impl<'doc, J: JsonSource> Compiled<'doc, J> {
    pub(crate) fn build(root: &'doc J, options: BuildOptions) -> Self {
        let plan = Plan::new(root, options);
        let signatures = plan.signature_count();
        let mut builder = Builder {
            plan: &plan,
            options,
            records: Vec::new(),
            pairs: Vec::new(),
            strings: StringBuffer::new(&plan.strings),
            containers: vec![None; signatures],
            members: vec![None; signatures],
            references: AHashMap::new(),
            reused: 0,
        };
        let root = builder.build(root);
        let Builder {
            records,
            pairs,
            strings,
            references,
            reused,
            ..
        } = builder;
        let arena = Arena {
            records,
            pairs,
            strings: strings.finish(),
            root,
        };
        let stats = Stats {
            nodes: plan.visited(),
            records: arena.records.len(),
            pairs: arena.pairs.len(),
            string_bytes: arena.strings.len(),
            shared_slots: plan.slots().len(),
            reused,
        };
        tracing::debug!(
            nodes = stats.nodes,
            records = stats.records,
            pairs = stats.pairs,
            string_bytes = stats.string_bytes,
            shared_slots = stats.shared_slots,
            reused = stats.reused,
            "Built compact document"
        );
        Compiled {
            arena,
            plan,
            references,
            stats,
            _input: PhantomData,
        }
    }
}

impl<J> Compiled<'_, J> {
    /// Query the built document.
    #[must_use]
    pub fn document(&self) -> Document<'_> {
        self.arena.document()
    }
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.arena
    }
    /// Drop the build metadata and keep only the document storage.
    #[must_use]
    pub fn into_arena(self) -> Arena {
        self.arena
    }
    /// The record of the document root.
    #[must_use]
    pub fn root(&self) -> Record {
        self.arena.root
    }
    /// The record an input node was compiled into.
    ///
    /// Nodes inside a repeated subtree resolve to the records of the single stored copy.
    /// Returns `None` for nodes that are not part of the compiled input.
    #[must_use]
    pub fn reference(&self, node: &J) -> Option<Record> {
        self.references.get(&address(node)).copied()
    }
    /// Contents stored once and referenced from several places, in order of first encounter.
    #[must_use]
    pub fn shared_slots(&self) -> &[SharedSlot] {
        self.plan.slots()
    }
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats
    }
}

struct Builder<'p, 'doc> {
    plan: &'p Plan<'doc>,
    options: BuildOptions,
    records: Vec<Record>,
    pairs: Vec<Pair>,
    strings: StringBuffer,
    /// Materialized shared arrays and objects, indexed by signature.
    containers: Vec<Option<Record>>,
    /// Materialized shared members, indexed by signature.
    members: Vec<Option<Pair>>,
    references: AHashMap<usize, Record>,
    reused: u32,
}

impl<'doc> Builder<'_, 'doc> {
    fn build<J: JsonSource>(&mut self, node: &'doc J) -> Record {
        let record = match node.node() {
            Node::Null => Record::Null,
            Node::Bool(b) => Record::Boolean(b),
            Node::Number(Number::Signed(i)) => Record::Integer(i),
            Node::Number(Number::Unsigned(u)) => Record::UInteger(u),
            Node::Number(Number::Float(f)) => Record::Float(f),
            Node::String(s) => Record::String(self.string(s)),
            Node::Array(items) => {
                let id = self.signature(node);
                if let Some(record) = self.reuse(id, node) {
                    return record;
                }
                let items: Vec<Record> = items.map(|item| self.build(item)).collect();
                let run = append(&mut self.records, items);
                let record = Record::Array(run);
                self.materialize(id, record);
                record
            }
            Node::Object(members) => {
                let id = self.signature(node);
                if let Some(record) = self.reuse(id, node) {
                    return record;
                }
                let mut sorted = self.options.detect_sorted;
                let mut previous: Option<&str> = None;
                let mut pairs = Vec::new();
                for (index, (key, value)) in members.enumerate() {
                    if previous.is_some_and(|previous| previous >= key) {
                        sorted = false;
                    }
                    previous = Some(key);
                    pairs.push(self.member(node, index, key, value));
                }
                let run = append(&mut self.pairs, pairs);
                let record = Record::Object { run, sorted };
                self.materialize(id, record);
                record
            }
        };
        self.references.insert(address(node), record);
        record
    }

    fn member<J: JsonSource>(
        &mut self,
        object: &'doc J,
        index: usize,
        key: &'doc str,
        value: &'doc J,
    ) -> Pair {
        let id = self
            .plan
            .member(object, index)
            .expect("Every member is visited by the pre-pass");
        let shared = self.plan.is_shared(id);
        if shared {
            if let Some(pair) = self.members[id.get()] {
                self.reused += 1;
                tracing::trace!(signature = id.get(), "Reusing shared member");
                self.alias(value, pair.value);
                return pair;
            }
        }
        let key = self.string(key);
        let pair = Pair::new(key, self.build(value));
        if shared {
            self.members[id.get()] = Some(pair);
        }
        pair
    }

    fn string(&mut self, value: &str) -> Str {
        let id = self
            .plan
            .strings
            .id(value)
            .expect("Every string is interned by the pre-pass");
        self.strings
            .store(&self.plan.strings, id, self.options.share_strings)
    }

    fn signature<J: JsonSource>(&self, node: &J) -> SigId {
        self.plan
            .node(node)
            .expect("Every container is visited by the pre-pass")
    }

    fn reuse<J: JsonSource>(&mut self, id: SigId, node: &'doc J) -> Option<Record> {
        if !self.plan.is_shared(id) {
            return None;
        }
        let record = self.containers[id.get()]?;
        self.reused += 1;
        tracing::trace!(signature = id.get(), "Reusing shared container");
        self.alias(node, record);
        Some(record)
    }

    fn materialize(&mut self, id: SigId, record: Record) {
        if self.plan.is_shared(id) {
            tracing::trace!(
                signature = id.get(),
                kind = %record.kind(),
                "Materialized shared container"
            );
            self.containers[id.get()] = Some(record);
        }
    }

    /// Map a subtree that was not emitted onto the records of its stored copy.
    fn alias<J: JsonSource>(&mut self, node: &'doc J, record: Record) {
        self.references.insert(address(node), record);
        match (node.node(), record) {
            (Node::Array(items), Record::Array(run)) => {
                for (item, idx) in items.zip(run.range()) {
                    let child = self.records[idx];
                    self.alias(item, child);
                }
            }
            (Node::Object(members), Record::Object { run, .. }) => {
                for ((_, value), idx) in members.zip(run.range()) {
                    let child = self.pairs[idx].value;
                    self.alias(value, child);
                }
            }
            _ => {}
        }
    }
}

/// Append a run, children first: everything `items` refers to is already in the table.
fn append<T>(table: &mut Vec<T>, items: Vec<T>) -> Run {
    if items.is_empty() {
        return Run::EMPTY;
    }
    let offset = to_u32(table.len(), "table entries");
    let len = to_u32(items.len(), "table entries");
    table.extend(items);
    Run::new(offset, len)
}
