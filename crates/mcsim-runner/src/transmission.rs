//! Transmission pipeline (spec §4.4, C5): per-origin serialization,
//! bounded outbound buffering, and the Send/Receive event handlers.

use mcsim_common::{EventKind, InternalId, NodeId, ReceivePayload, SendPayload, SimTime};
use mcsim_metrics::{metric_defs, metrics};

use crate::simulator::Simulator;

impl Simulator {
    /// `SendPacket` (spec §4.4 steps 1-5), called through
    /// `NodeContext::send_packet`.
    pub(crate) fn send_packet(&mut self, origin: InternalId, target_node_id: NodeId, packet: Vec<u8>) {
        let Some(&target) = self.node_id_index.get(&target_node_id) else {
            // Unknown NodeID: nothing this origin is peered with resolves
            // to it. Treated the same as "Send on a non-existent peer" --
            // a programmer error per spec §7.
            panic!(
                "send_packet: target NodeId {target_node_id} does not resolve to any live node"
            );
        };
        if !self.has_peer(origin, target) {
            panic!(
                "send_packet: {origin} is not connected to target NodeId {target_node_id} ({target})"
            );
        }

        let node = self.node(origin);
        if node.buffer_count + 1 > node.buffer_capacity {
            self.log_debug(&format!("packet:buffer_full:{origin}:{target}"));
            metrics::counter!(metric_defs::PACKETS_DROPPED.name, "reason" => "buffer_full").increment(1);
            return;
        }

        let origin_pos = node.position;
        let target_pos = self.node(target).position;
        let (should_drop, propagation_delay) =
            self.node_mut(origin).transmission.transmission(origin_pos, target_pos, &packet);

        metrics::histogram!(metric_defs::PACKET_SIZE.name).record(packet.len() as f64);

        let node = self.node_mut(origin);
        node.buffer_count += 1;
        let now = self.clock;
        let last_sent = node.last_message_sent;
        let send_time = now.max(last_sent) + self.transmission_delay;
        node.last_message_sent = send_time + propagation_delay;

        let target_node_id = self.node(target).node_id;

        metrics::counter!(metric_defs::PACKETS_SENT.name).increment(1);
        metrics::gauge!(metric_defs::BUFFER_OCCUPANCY.name)
            .set(self.node(origin).buffer_count as f64);

        self.push_event(
            send_time,
            EventKind::Send(SendPayload {
                origin,
                target,
                target_node_id,
                packet,
                should_drop,
                propagation_delay,
            }),
        );
    }

    /// Send event dispatch (spec §4.4 step 6): enqueue the Receive unless
    /// the behaviour dropped it or the edge broke in flight. The
    /// neighbour check is made symmetric on both ends (spec §9's
    /// instruction to "pick one policy and apply it consistently").
    pub(crate) fn dispatch_send(&mut self, payload: SendPayload) {
        let SendPayload { origin, target, target_node_id: _, packet, should_drop, propagation_delay } = payload;

        if !should_drop && self.has_peer(origin, target) && self.has_peer(target, origin) {
            let origin_node_id = self.node(origin).node_id;
            self.push_event(
                self.clock + propagation_delay,
                EventKind::Receive(ReceivePayload { origin, target, origin_node_id, packet }),
            );
        } else {
            self.node_mut(origin).buffer_count -= 1;
            let reason = if should_drop { "behavior_drop" } else { "edge_broken" };
            metrics::counter!(metric_defs::PACKETS_DROPPED.name, "reason" => reason).increment(1);
            self.log_debug(&format!("packet:drop:{origin}:{target}"));
        }
    }

    /// Receive event dispatch (spec §4.4 step 7): always decrements the
    /// origin's buffer; delivers to the target only if the edge still
    /// exists.
    pub(crate) fn dispatch_receive(&mut self, payload: ReceivePayload) {
        let ReceivePayload { origin, target, origin_node_id, packet } = payload;

        self.node_mut(origin).buffer_count -= 1;
        metrics::gauge!(metric_defs::BUFFER_OCCUPANCY.name)
            .set(self.node(origin).buffer_count as f64);

        if self.has_peer(target, origin) {
            metrics::counter!(metric_defs::PACKETS_DELIVERED.name).increment(1);
            self.call_node(target, |node, ctx| node.on_receive_packet(origin_node_id, &packet, ctx));
        }
    }
}
