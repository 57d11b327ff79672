//! `SimNodeContext`: the live `NodeContext` (spec §4.7, C8) handed to
//! application code inside every `Node` callback.

use mcsim_common::{EventKind, InternalId, NodeId, SimTime, TerminateError};
use mcsim_model::{NodeContext, PropertyValue};
use std::collections::HashMap;
use std::time::Duration;

use crate::simulator::Simulator;

pub struct SimNodeContext<'a> {
    sim: &'a mut Simulator,
    internal_id: InternalId,
}

impl<'a> SimNodeContext<'a> {
    pub(crate) fn new(sim: &'a mut Simulator, internal_id: InternalId) -> Self {
        SimNodeContext { sim, internal_id }
    }
}

impl<'a> NodeContext for SimNodeContext<'a> {
    fn data(&mut self) -> &mut HashMap<String, PropertyValue> {
        &mut self.sim.node_mut(self.internal_id).data
    }

    fn update_id(&mut self, new_id: NodeId) {
        self.sim.update_node_id(self.internal_id, new_id);
    }

    fn delay_by(&mut self, delay: Duration, callback: Box<dyn FnOnce(SimTime)>) {
        let fire_at = self.sim.now() + delay;
        let target = self.internal_id;
        self.sim.push_event(fire_at, EventKind::Delay(mcsim_common::DelayPayload { target, callback }));
    }

    fn now(&self) -> SimTime {
        self.sim.now()
    }

    fn terminate(&mut self, err: Option<TerminateError>) {
        let now = self.sim.now();
        self.sim.push_event(now, EventKind::Terminate { error: err });
    }

    fn log(&mut self, msg: &str) {
        self.sim.log_debug(msg);
    }

    fn send_packet(&mut self, peer: NodeId, packet: Vec<u8>) {
        self.sim.send_packet(self.internal_id, peer, packet);
    }

    fn peer_data(&mut self, peer: NodeId) -> Option<&mut HashMap<String, PropertyValue>> {
        let peer_internal = *self.sim.node_id_index.get(&peer)?;
        if !self.sim.has_peer(self.internal_id, peer_internal) {
            return None;
        }
        let edge = self.sim.edges.get_mut(self.internal_id, peer_internal)?;
        edge.data_for(self.internal_id)
    }
}
