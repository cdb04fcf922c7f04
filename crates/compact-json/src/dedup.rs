//! Structural deduplication.
//!
//! A pre-pass over the input computes a signature for every array, object and object member.
//! Nested containers appear in their parent's signature by the id of their own signature, so
//! two signatures are equal exactly when the subtrees are equal. Signatures seen more than once
//! get a shared slot; everything else is emitted at its single use site.
use ahash::{AHashMap, RandomState};
use indexmap::{map::Entry, IndexMap};

use crate::{
    options::BuildOptions,
    source::{JsonSource, Node, Number},
    strings::{to_u32, StrId, StringTable},
};

/// Identifier of a distinct signature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SigId(u32);

impl SigId {
    #[inline]
    pub(crate) fn get(self) -> usize {
        self.0 as usize
    }
}

/// A value as it appears inside a signature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Atom {
    Null,
    Bool(bool),
    Integer(i64),
    UInteger(u64),
    /// Bit pattern, so `0.0` and `-0.0` stay distinct.
    Float(u64),
    String(StrId),
    Node(SigId),
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) enum Signature {
    Array(Box<[Atom]>),
    Object(Box<[SigId]>),
    Pair(StrId, Atom),
}

impl Signature {
    fn kind(&self) -> SlotKind {
        match self {
            Signature::Array(_) => SlotKind::Array,
            Signature::Object(_) => SlotKind::Object,
            Signature::Pair(..) => SlotKind::Pair,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Signature::Array(items) => items.is_empty(),
            Signature::Object(pairs) => pairs.is_empty(),
            Signature::Pair(..) => false,
        }
    }
}

#[derive(Debug)]
struct SigEntry {
    count: u32,
    first_seen: u32,
    shared: bool,
}

/// What a shared slot holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SlotKind {
    String,
    Array,
    Object,
    /// An object member: key and value together.
    Pair,
}

/// A piece of content stored once and referenced from several places.
///
/// Slots are numbered by the position of their first occurrence in a depth-first, pre-order
/// walk of the input, with object members visited in declaration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SharedSlot {
    pub kind: SlotKind,
    /// Number of places in the input that refer to this content.
    pub uses: u32,
}

/// Address of an input node, used as its identity while the input is borrowed.
#[inline]
pub(crate) fn address<J>(node: &J) -> usize {
    core::ptr::from_ref(node) as usize
}

/// Result of the pre-pass.
#[derive(Debug)]
pub(crate) struct Plan<'doc> {
    pub(crate) strings: StringTable<'doc>,
    signatures: IndexMap<Signature, SigEntry, RandomState>,
    /// Container node address -> signature.
    nodes: AHashMap<usize, SigId>,
    /// (Object node address, member index) -> signature of the whole member.
    members: AHashMap<(usize, usize), SigId>,
    slots: Vec<SharedSlot>,
    visited: u32,
}

impl<'doc> Plan<'doc> {
    pub(crate) fn new<J: JsonSource>(root: &'doc J, options: BuildOptions) -> Plan<'doc> {
        let mut scanner = Scanner {
            strings: StringTable::default(),
            signatures: IndexMap::default(),
            nodes: AHashMap::new(),
            members: AHashMap::new(),
            position: 0,
            visited: 0,
        };
        scanner.scan(root);
        let Scanner {
            strings,
            mut signatures,
            nodes,
            members,
            visited,
            ..
        } = scanner;

        let mut ordered = Vec::new();
        if options.deduplicate {
            for (signature, entry) in &mut signatures {
                if entry.count > 1 && !signature.is_empty() {
                    entry.shared = true;
                    ordered.push((
                        entry.first_seen,
                        SharedSlot {
                            kind: signature.kind(),
                            uses: entry.count,
                        },
                    ));
                }
            }
        }
        if options.share_strings {
            ordered.extend(strings.shared().map(|(_, entry)| {
                (
                    entry.first_seen,
                    SharedSlot {
                        kind: SlotKind::String,
                        uses: entry.count,
                    },
                )
            }));
        }
        // Positions are unique, so the order is total.
        ordered.sort_unstable_by_key(|(first_seen, _)| *first_seen);

        Plan {
            strings,
            signatures,
            nodes,
            members,
            slots: ordered.into_iter().map(|(_, slot)| slot).collect(),
            visited,
        }
    }

    /// Signature of a container node.
    pub(crate) fn node<J>(&self, node: &J) -> Option<SigId> {
        self.nodes.get(&address(node)).copied()
    }

    /// Signature of the `index`-th member of `object`.
    ///
    /// Keyed by position, so one value node handed out under several keys gets a signature per key.
    pub(crate) fn member<J>(&self, object: &J, index: usize) -> Option<SigId> {
        self.members.get(&(address(object), index)).copied()
    }

    pub(crate) fn is_shared(&self, id: SigId) -> bool {
        self.signatures
            .get_index(id.get())
            .is_some_and(|(_, entry)| entry.shared)
    }

    pub(crate) fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    pub(crate) fn slots(&self) -> &[SharedSlot] {
        &self.slots
    }

    /// Number of JSON values in the input.
    pub(crate) fn visited(&self) -> u32 {
        self.visited
    }
}

struct Scanner<'doc> {
    strings: StringTable<'doc>,
    signatures: IndexMap<Signature, SigEntry, RandomState>,
    nodes: AHashMap<usize, SigId>,
    members: AHashMap<(usize, usize), SigId>,
    position: u32,
    visited: u32,
}

impl<'doc> Scanner<'doc> {
    fn next_position(&mut self) -> u32 {
        let position = self.position;
        self.position = position
            .checked_add(1)
            .unwrap_or_else(|| panic!("Document has more than 4Gi positions"));
        position
    }

    fn scan<J: JsonSource>(&mut self, node: &'doc J) -> Atom {
        let position = self.next_position();
        self.visited += 1;
        match node.node() {
            Node::Null => Atom::Null,
            Node::Bool(b) => Atom::Bool(b),
            Node::Number(Number::Signed(i)) => Atom::Integer(i),
            Node::Number(Number::Unsigned(u)) => Atom::UInteger(u),
            Node::Number(Number::Float(f)) => Atom::Float(f.to_bits()),
            Node::String(s) => Atom::String(self.strings.intern(s, position)),
            Node::Array(items) => {
                let atoms = items.map(|item| self.scan(item)).collect();
                let id = self.insert(Signature::Array(atoms), position);
                self.nodes.insert(address(node), id);
                Atom::Node(id)
            }
            Node::Object(members) => {
                let object = address(node);
                let pairs = members
                    .enumerate()
                    .map(|(index, (key, value))| {
                        let position = self.next_position();
                        let key_position = self.next_position();
                        let key = self.strings.intern(key, key_position);
                        let value_atom = self.scan(value);
                        let id = self.insert(Signature::Pair(key, value_atom), position);
                        self.members.insert((object, index), id);
                        id
                    })
                    .collect();
                let id = self.insert(Signature::Object(pairs), position);
                self.nodes.insert(address(node), id);
                Atom::Node(id)
            }
        }
    }

    fn insert(&mut self, signature: Signature, position: u32) -> SigId {
        let next = SigId(to_u32(self.signatures.len(), "signatures"));
        match self.signatures.entry(signature) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().count += 1;
                SigId(to_u32(entry.index(), "signatures"))
            }
            Entry::Vacant(entry) => {
                entry.insert(SigEntry {
                    count: 1,
                    first_seen: position,
                    shared: false,
                });
                next
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn plan(input: &Value) -> Plan<'_> {
        Plan::new(input, BuildOptions::default())
    }

    #[test]
    fn identical_arrays_share_a_signature() {
        let input = json!([[1, 2], [1, 2], [2, 1]]);
        let plan = plan(&input);
        let first = plan.node(&input[0]).expect("Array");
        let second = plan.node(&input[1]).expect("Array");
        let third = plan.node(&input[2]).expect("Array");
        assert_eq!(first, second);
        assert_ne!(first, third);
        assert!(plan.is_shared(first));
        assert!(!plan.is_shared(third));
    }

    #[test]
    fn nested_structure_is_compared_by_content() {
        let input = json!({"a": {"x": [1, {"y": null}]}, "b": {"x": [1, {"y": null}]}});
        let plan = plan(&input);
        assert_eq!(plan.node(&input["a"]), plan.node(&input["b"]));
        assert_eq!(
            plan.node(&input["a"]["x"][1]),
            plan.node(&input["b"]["x"][1])
        );
    }

    #[test_case(json!([1, 1.0]); "integer and float")]
    #[test_case(json!([0.0, -0.0]); "signed zero")]
    #[test_case(json!(["1", 1]); "string and number")]
    #[test_case(json!([null, false]); "null and false")]
    fn different_scalars_do_not_collide(pair: Value) {
        let input = json!([[pair[0].clone()], [pair[1].clone()]]);
        let plan = plan(&input);
        assert_ne!(plan.node(&input[0]), plan.node(&input[1]));
    }

    #[test]
    fn member_order_matters() {
        let input = json!([{"a": 1, "b": 2}, {"b": 2, "a": 1}]);
        let plan = plan(&input);
        assert_ne!(plan.node(&input[0]), plan.node(&input[1]));
        // Members themselves are still shared
        assert_eq!(plan.member(&input[0], 0), plan.member(&input[1], 1));
        assert!(plan.is_shared(plan.member(&input[0], 0).expect("Member")));
    }

    #[test_case(json!([[], []]); "arrays")]
    #[test_case(json!([{}, {}]); "objects")]
    fn empty_containers_are_never_shared(input: Value) {
        let plan = plan(&input);
        let id = plan.node(&input[0]).expect("Container");
        assert_eq!(plan.node(&input[1]), Some(id));
        assert!(!plan.is_shared(id));
        assert!(plan.slots().is_empty());
    }

    #[test]
    fn scalars_are_never_shared() {
        let input = json!([1, 1, 1, true, true, "x", "x"]);
        let plan = plan(&input);
        // Only the top-level array has a signature
        assert_eq!(plan.signature_count(), 1);
        assert!(plan.slots().is_empty());
    }

    #[test]
    fn slots_follow_first_encounter_in_pre_order() {
        let input = json!({
            "z": {"deep": [7, 8]},
            "a": [7, 8],
            "m": {"deep": [7, 8]},
            "long": "a string that does not fit",
            "again": "a string that does not fit"
        });
        let plan = plan(&input);
        let kinds: Vec<_> = plan.slots().iter().map(|slot| slot.kind).collect();
        // `"z"`'s object, its member, the array inside it, then the long string
        assert_eq!(
            kinds,
            [
                SlotKind::Object,
                SlotKind::Pair,
                SlotKind::Array,
                SlotKind::String
            ]
        );
        let uses: Vec<_> = plan.slots().iter().map(|slot| slot.uses).collect();
        assert_eq!(uses, [2, 2, 3, 2]);
    }

    #[test]
    fn deduplication_can_be_disabled() {
        let input = json!([[1, 2], [1, 2], "a string that does not fit", "a string that does not fit"]);
        let plan = Plan::new(&input, BuildOptions::default().deduplicate(false));
        assert!(!plan.is_shared(plan.node(&input[0]).expect("Array")));
        assert_eq!(
            plan.slots().iter().map(|slot| slot.kind).collect::<Vec<_>>(),
            [SlotKind::String]
        );
    }

    #[test]
    #[should_panic(expected = "Document has more than 4Gi positions")]
    fn position_overflow_panics() {
        let input = json!(null);
        let mut scanner = Scanner {
            strings: StringTable::default(),
            signatures: IndexMap::default(),
            nodes: AHashMap::new(),
            members: AHashMap::new(),
            position: u32::MAX,
            visited: 0,
        };
        scanner.scan(&input);
    }

    #[test]
    fn counts_visited_values() {
        let input = json!({"a": [1, 2, {"b": null}]});
        assert_eq!(plan(&input).visited(), 6);
    }
}
