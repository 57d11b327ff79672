//! The public interfaces (spec §4.7 / §6): the trait surface the core
//! engine dispatches through without ever inspecting what's on the other
//! side of it.

use crate::properties::PropertyValue;
use mcsim_common::{Coordinate, Event, MovementInstruction, NodeId, SimTime, TerminateError};
use std::collections::HashMap;
use std::time::Duration;

/// The capability surface handed to application code inside every
/// callback (`Data`, `UpdateID`, `DelayBy`, `Now`, `Terminate`, `Log`,
/// plus `SendPacket`, the one operation node code actually drives). This
/// is the engine's half of the boundary; `mcsim-runner` implements it
/// against the live `Simulator`.
pub trait NodeContext {
    /// Per-node free-form scratch map, exposed as `Data()`.
    fn data(&mut self) -> &mut HashMap<String, PropertyValue>;

    /// Rename this node. Forces a disconnect/reconnect of every peer
    /// under the new identity (spec §4.3).
    fn update_id(&mut self, new_id: NodeId);

    /// Schedule a closure to run at `now() + delay`.
    fn delay_by(&mut self, delay: Duration, callback: Box<dyn FnOnce(SimTime)>);

    /// The virtual clock.
    fn now(&self) -> SimTime;

    /// Request termination of the whole run, optionally carrying an
    /// application error out through `Advance`.
    fn terminate(&mut self, err: Option<TerminateError>);

    /// Fan a debug string out to every registered logger.
    fn log(&mut self, msg: &str);

    /// Hand `packet` to the transmission pipeline addressed to `peer`.
    fn send_packet(&mut self, peer: NodeId, packet: Vec<u8>);

    /// The scratch map belonging to the live edge to `peer`, keyed from
    /// this node's side (spec §3 `InternalPeer`: "two independent scratch
    /// maps, one per endpoint"). `None` if `peer` isn't currently
    /// connected, or if the edge's scratch record has already been torn
    /// down by a mobility tick that hasn't yet reached its deferred
    /// Disconnect event.
    fn peer_data(&mut self, peer: NodeId) -> Option<&mut HashMap<String, PropertyValue>>;
}

/// Application-level behaviour attached to one simulated node. The
/// engine never inspects packet bytes; it only calls these hooks in
/// response to events it has already decided to dispatch.
pub trait Node {
    fn id(&self) -> NodeId;

    /// Called once, on `AddNode` dispatch.
    fn on_start(&mut self, ctx: &mut dyn NodeContext);

    fn on_connect(&mut self, peer: NodeId, ctx: &mut dyn NodeContext);

    fn on_disconnect(&mut self, peer: NodeId, ctx: &mut dyn NodeContext);

    fn on_receive_packet(&mut self, from: NodeId, packet: &[u8], ctx: &mut dyn NodeContext);

    /// Called once, when the run terminates.
    fn on_terminate(&mut self, ctx: &mut dyn NodeContext);
}

/// A pluggable sequence of movement instructions for one node (spec §4.7,
/// supplemented with concrete implementations in `mcsim-mobility`).
pub trait MobilityProfile {
    /// The initial coordinate, read once on `AddNode` dispatch.
    fn start_position(&mut self) -> Coordinate;

    /// Returns the next movement instruction whenever the previous one
    /// expires.
    fn register_movements(&mut self, current: Coordinate) -> MovementInstruction;
}

/// A pluggable policy mapping a would-be packet to a drop decision and a
/// propagation delay. Must be a pure function of positions and bytes
/// except for draws from the shared, seeded PRNG passed at construction
/// time — anything else breaks run-to-run determinism.
pub trait TransmissionBehavior {
    /// Returns `(should_drop, propagation_delay)`.
    fn transmission(&mut self, origin: Coordinate, target: Coordinate, packet: &[u8]) -> (bool, Duration);
}

/// Observes every dispatched event and debug string. Loggers must not
/// enqueue events or mutate engine state; the engine calls them
/// read-only, in dispatch order.
pub trait Logger {
    /// Called once, before the first event is dispatched.
    fn init(&mut self);

    /// Called once per dispatched event, in dispatch order.
    fn new_event(&mut self, event: &Event);

    /// Called for every debug string produced by `NodeContext::log` or
    /// the engine's own routine-drop diagnostics.
    fn log(&mut self, msg: &str);
}
