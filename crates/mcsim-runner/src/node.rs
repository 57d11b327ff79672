//! The engine's private record for one simulated node (spec §3
//! `InternalNode`) and the bookkeeping the registry needs before a node's
//! `AddNode` event has actually dispatched.

use mcsim_common::{Coordinate, InternalId, MovementInstruction, NodeId, SimTime};
use mcsim_model::{MobilityProfile, Node, PropertyValue, TransmissionBehavior};
use std::collections::HashMap;
use std::time::Duration;

/// One hop-neighbour entry in a node's peer table, keyed by the peer's
/// `InternalId` (stable under `NodeId` renaming, per spec §3).
pub struct PeerRef {
    pub target: InternalId,
}

/// A node that has been handed to [`crate::Simulator::add_node`] but whose
/// `AddNode` event hasn't dispatched yet — it doesn't exist in the
/// registry or the spatial index until then (spec §4.3).
pub struct PendingNode {
    pub app: Box<dyn Node>,
    pub mobility: Box<dyn MobilityProfile>,
    pub transmission: Box<dyn TransmissionBehavior>,
    pub buffer_capacity: usize,
}

/// The engine's record for one live simulated node.
///
/// `app` is an `Option` so the dispatch loop can move it out for the
/// duration of a callback (see `Simulator::call_node`) without aliasing
/// the rest of the node's fields, which the callback's `NodeContext`
/// needs mutable access to at the same time.
pub struct InternalNode {
    pub app: Option<Box<dyn Node>>,
    pub node_id: NodeId,
    pub internal_id: InternalId,
    pub position: Coordinate,
    pub mobility: Box<dyn MobilityProfile>,
    pub transmission: Box<dyn TransmissionBehavior>,
    pub instruction: MovementInstruction,
    pub remaining: Duration,
    pub peers: HashMap<InternalId, PeerRef>,
    pub buffer_count: usize,
    pub buffer_capacity: usize,
    pub last_message_sent: SimTime,
    pub data: HashMap<String, PropertyValue>,
}

impl InternalNode {
    pub fn has_peer(&self, other: InternalId) -> bool {
        self.peers.contains_key(&other)
    }
}
