//! Link manager (spec §4.3, C4): the Connect/Disconnect event handlers
//! and `NodeId` reassignment.

use mcsim_common::{EngineError, InternalId, NodeId};
use mcsim_metrics::{metric_defs, metrics};

use crate::node::PeerRef;
use crate::simulator::Simulator;

impl Simulator {
    /// `connectNodes(A,B)` (spec §4.3): invoked once per direction,
    /// inserting a peer-table entry on each side and notifying
    /// `OnConnect`. The backing `InternalPeer` scratch record was already
    /// created by the mobility tick that scheduled this event (§4.6); if
    /// it wasn't (a bug, or a hand-built `Connect` event from a test),
    /// that's still fine — the scratch lookup just returns `None`.
    pub(crate) fn dispatch_connect(&mut self, a: InternalId, b: InternalId) {
        if self.has_peer(a, b) || self.has_peer(b, a) {
            panic!("{}", EngineError::PeerAlreadyConnected { a, b });
        }

        self.node_mut(a).peers.insert(b, PeerRef { target: b });
        self.node_mut(b).peers.insert(a, PeerRef { target: a });

        metrics::counter!(metric_defs::CONNECT_EVENTS.name).increment(1);

        let b_node_id = self.node(b).node_id;
        let a_node_id = self.node(a).node_id;
        self.call_node(a, |node, ctx| node.on_connect(b_node_id, ctx));
        self.call_node(b, |node, ctx| node.on_connect(a_node_id, ctx));
    }

    /// `disconnectNodes(A,B)` (spec §4.3). Disconnecting a peer that
    /// isn't present is a programmer error (spec §7): it aborts the run
    /// rather than being silently absorbed.
    pub(crate) fn dispatch_disconnect(&mut self, a: InternalId, b: InternalId) {
        if !self.has_peer(a, b) {
            panic!("{}", EngineError::UnknownPeer { a, b });
        }
        if !self.has_peer(b, a) {
            panic!("{}", EngineError::UnknownPeer { a: b, b: a });
        }

        let b_node_id = self.node(b).node_id;
        let a_node_id = self.node(a).node_id;

        self.node_mut(a).peers.remove(&b);
        self.node_mut(b).peers.remove(&a);

        metrics::counter!(metric_defs::DISCONNECT_EVENTS.name).increment(1);

        self.call_node(a, |node, ctx| node.on_disconnect(b_node_id, ctx));
        self.call_node(b, |node, ctx| node.on_disconnect(a_node_id, ctx));
    }

    /// `UpdateID` (spec §4.3/§4.7): renames a node, forcing a disconnect
    /// of every current peer under the old identity first. Peer-table
    /// iteration order is the shared-PRNG deterministic shuffle (§5) so
    /// the disconnect sequence is reproducible despite `HashMap`
    /// iteration order not being part of Rust's stability guarantees.
    pub(crate) fn update_node_id(&mut self, id: InternalId, new_id: NodeId) {
        let old_node_id = self.node(id).node_id;
        self.node_id_index.remove(&old_node_id);

        let peer_ids: Vec<InternalId> = self.node(id).peers.keys().copied().collect();
        let shuffled = mcsim_common::deterministic_shuffle(peer_ids, &mut self.rng);
        for peer in shuffled {
            self.dispatch_disconnect(id, peer);
        }

        self.node_mut(id).node_id = new_id;
        self.node_id_index.insert(new_id, id);
    }
}
