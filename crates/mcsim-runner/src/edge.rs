//! The global edge-scratch table (spec §3 `InternalPeer`).
//!
//! This is deliberately a separate structure from [`crate::node::PeerRef`].
//! Grounded in the original Go `simulator.go`'s `updateLocations`/
//! `connectNodes` split: the *scratch* record (`InternalPeer`, here) is
//! created and removed synchronously inside the mobility tick the instant
//! topology changes, while the *connectivity* record each node consults
//! for "is this still a peer" (`InternalNode::peers`) is only populated
//! once the deferred Connect/Disconnect event actually dispatches ten
//! milliseconds later. Collapsing the two into one structure would make a
//! node's peer-table membership change before its `OnConnect`/
//! `OnDisconnect` callback ever fires, which the spec's dedup logic
//! (§4.6) depends on *not* happening.

use mcsim_common::InternalId;
use mcsim_model::PropertyValue;
use std::collections::HashMap;

pub struct InternalPeer {
    pub a: InternalId,
    pub b: InternalId,
    pub data_a: HashMap<String, PropertyValue>,
    pub data_b: HashMap<String, PropertyValue>,
}

impl InternalPeer {
    pub fn new(a: InternalId, b: InternalId) -> Self {
        InternalPeer {
            a,
            b,
            data_a: HashMap::new(),
            data_b: HashMap::new(),
        }
    }

    /// The scratch map belonging to `node`'s side of this edge, or `None`
    /// if `node` isn't one of the two endpoints.
    pub fn data_for(&mut self, node: InternalId) -> Option<&mut HashMap<String, PropertyValue>> {
        if node == self.a {
            Some(&mut self.data_a)
        } else if node == self.b {
            Some(&mut self.data_b)
        } else {
            None
        }
    }
}

pub fn canonical_pair(a: InternalId, b: InternalId) -> (InternalId, InternalId) {
    if a.0 <= b.0 {
        (a, b)
    } else {
        (b, a)
    }
}

/// `peers` plus an index by unordered pair, trading the original's O(E)
/// linear scan on every edge removal (`removePeer`/`getPeerIndex` in
/// `internal_node.go`) for O(1) — a deliberate improvement invited by the
/// spec's own Open Questions (§9), recorded in DESIGN.md.
#[derive(Default)]
pub struct EdgeTable {
    edges: Vec<InternalPeer>,
    index: HashMap<(InternalId, InternalId), usize>,
}

impl EdgeTable {
    pub fn new() -> Self {
        EdgeTable::default()
    }

    pub fn insert(&mut self, a: InternalId, b: InternalId) {
        let key = canonical_pair(a, b);
        let idx = self.edges.len();
        self.edges.push(InternalPeer::new(a, b));
        self.index.insert(key, idx);
    }

    pub fn remove(&mut self, a: InternalId, b: InternalId) {
        let key = canonical_pair(a, b);
        if let Some(idx) = self.index.remove(&key) {
            let last = self.edges.len() - 1;
            self.edges.swap_remove(idx);
            if idx != last {
                let moved = &self.edges[idx];
                self.index.insert(canonical_pair(moved.a, moved.b), idx);
            }
        }
    }

    pub fn contains(&self, a: InternalId, b: InternalId) -> bool {
        self.index.contains_key(&canonical_pair(a, b))
    }

    pub fn get_mut(&mut self, a: InternalId, b: InternalId) -> Option<&mut InternalPeer> {
        let key = canonical_pair(a, b);
        let idx = *self.index.get(&key)?;
        self.edges.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_round_trip() {
        let mut table = EdgeTable::new();
        let a = InternalId(1);
        let b = InternalId(2);
        let c = InternalId(3);

        table.insert(a, b);
        table.insert(a, c);
        assert!(table.contains(b, a));
        assert_eq!(table.len(), 2);

        table.remove(a, b);
        assert!(!table.contains(a, b));
        assert!(table.contains(a, c));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn scratch_data_is_per_endpoint() {
        let mut table = EdgeTable::new();
        let a = InternalId(1);
        let b = InternalId(2);
        table.insert(a, b);

        let edge = table.get_mut(a, b).unwrap();
        edge.data_for(a).unwrap().insert("color".into(), PropertyValue::String("red".into()));

        let edge = table.get_mut(b, a).unwrap();
        assert!(edge.data_for(b).unwrap().get("color").is_none());
        assert_eq!(
            edge.data_for(a).unwrap().get("color"),
            Some(&PropertyValue::String("red".into()))
        );
    }
}
