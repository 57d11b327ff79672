//! The `Simulator` root aggregate (spec §3) and the scheduler loop
//! (§4.5, C6). Link management (§4.3/4.4, C3/C4), the transmission
//! pipeline (§4.4, C5) and the mobility tick (§4.6, C7) are implemented
//! as further `impl Simulator` blocks in sibling modules; this file owns
//! construction, the event-kind dispatch table, and the public
//! `AddNode`/`Advance`/`Terminate` surface (§6).

use mcsim_common::{
    EngineError, EntityTracer, Event, EventKind, EventSummary, EventQueue, InternalId, NodeId,
    Sequence, SimTime, TerminateError, TraceEvent, RegionMap, TIMESTEP_PERIOD,
};
use mcsim_model::{Logger, MobilityProfile, Node, TransmissionBehavior};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::time::Duration;

use crate::context::SimNodeContext;
use crate::edge::EdgeTable;
use crate::node::{InternalNode, PendingNode};

/// Root aggregate. Owns every node, every edge, the event queue, the
/// spatial index, the shared PRNG, and the registered loggers (spec §3).
pub struct Simulator {
    pub(crate) queue: EventQueue,
    pub(crate) nodes: Vec<InternalNode>,
    pub(crate) node_index: HashMap<InternalId, usize>,
    pub(crate) node_id_index: HashMap<NodeId, InternalId>,
    pub(crate) pending: HashMap<InternalId, PendingNode>,
    pub(crate) edges: EdgeTable,
    pub(crate) region: RegionMap,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) loggers: Vec<Box<dyn Logger>>,
    pub(crate) clock: SimTime,
    pub(crate) seq_counter: u64,
    pub(crate) terminate_enqueued: bool,
    pub(crate) last_event: Option<EventSummary>,
    pub(crate) running: bool,
    pub(crate) terminating: bool,
    pub(crate) transmission_delay: Duration,
    pub(crate) default_buffer_size: usize,
    tracer: EntityTracer,
    started: bool,
}

impl Simulator {
    /// `range_m` is the radio range in metres (squared internally for
    /// distance comparisons, used unsquared as the region cell size).
    /// `transmission_delay` is the minimum gap between consecutive Sends
    /// from the same origin (spec §6).
    pub fn new(
        range_m: f64,
        transmission_delay: Duration,
        rng: ChaCha8Rng,
        loggers: Vec<Box<dyn Logger>>,
    ) -> Self {
        Simulator {
            queue: EventQueue::new(),
            nodes: Vec::new(),
            node_index: HashMap::new(),
            node_id_index: HashMap::new(),
            pending: HashMap::new(),
            edges: EdgeTable::new(),
            region: RegionMap::new(range_m),
            rng,
            loggers,
            clock: SimTime::ZERO,
            seq_counter: 0,
            terminate_enqueued: false,
            last_event: None,
            running: false,
            terminating: false,
            transmission_delay,
            default_buffer_size: 400,
            tracer: EntityTracer::disabled(),
            started: false,
        }
    }

    pub fn with_default_buffer_size(mut self, size: usize) -> Self {
        self.default_buffer_size = size;
        self
    }

    /// Attaches an [`EntityTracer`] watching the nodes named in its
    /// config. Separate from `Logger`: a logger sees every event, a
    /// tracer is a cheap opt-in filter for following one or two nodes
    /// during development (spec's ambient debugging surface).
    pub fn with_tracer(mut self, tracer: EntityTracer) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_terminating(&self) -> bool {
        self.terminating
    }

    pub fn now(&self) -> SimTime {
        self.clock
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn live_edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn node(&self, id: InternalId) -> &InternalNode {
        let idx = self.node_index[&id];
        &self.nodes[idx]
    }

    pub(crate) fn node_mut(&mut self, id: InternalId) -> &mut InternalNode {
        let idx = self.node_index[&id];
        &mut self.nodes[idx]
    }

    pub(crate) fn has_peer(&self, a: InternalId, b: InternalId) -> bool {
        self.node_index
            .get(&a)
            .map(|&idx| self.nodes[idx].has_peer(b))
            .unwrap_or(false)
    }

    /// Generates a fresh `InternalId` from the shared deterministic PRNG
    /// (spec §3), retrying on the (astronomically unlikely) collision.
    fn fresh_internal_id(&mut self) -> InternalId {
        loop {
            let candidate = InternalId(self.rng.gen::<u64>());
            if !self.node_index.contains_key(&candidate) && !self.pending.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// The node an event is "about", for `EntityTracer` filtering. `None`
    /// for kinds with no single obvious owner (`Timestep`, `Terminate`).
    fn traced_entity(kind: &EventKind) -> Option<InternalId> {
        match kind {
            EventKind::Connect { a, .. } | EventKind::Disconnect { a, .. } => Some(*a),
            EventKind::AddNode { internal_id } | EventKind::RemoveNode { internal_id } => Some(*internal_id),
            EventKind::Send(payload) => Some(payload.origin),
            EventKind::Receive(payload) => Some(payload.target),
            EventKind::Delay(payload) => Some(payload.target),
            EventKind::Timestep | EventKind::Terminate { .. } => None,
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let s = self.seq_counter;
        self.seq_counter += 1;
        s
    }

    /// Enqueues `kind` at `time`, stamping it with the next sequence
    /// number (or the dedicated `Terminate` ordering key) and the most
    /// recently dispatched event as its parent (spec §3/§4.1).
    pub(crate) fn push_event(&mut self, time: SimTime, kind: EventKind) {
        let sequence = if matches!(kind, EventKind::Terminate { .. }) {
            if self.terminate_enqueued {
                panic!("{}", EngineError::DuplicateSequenceAssignment);
            }
            self.terminate_enqueued = true;
            Sequence::Terminate
        } else {
            Sequence::Numbered(self.next_sequence())
        };
        let parent = self.last_event;
        self.queue.push(Event { time, sequence, parent, kind });
    }

    pub(crate) fn log_debug(&mut self, msg: &str) {
        tracing::debug!(target: "mcsim::engine", "{msg}");
        for logger in &mut self.loggers {
            logger.log(msg);
        }
    }

    /// Calls `f` with the node's application object and a freshly built
    /// `NodeContext`. The app is moved out of its slot for the duration
    /// of the call so `SimNodeContext` can mutably borrow the rest of
    /// `Simulator` (including the node's own non-`app` fields) without
    /// aliasing it.
    pub(crate) fn call_node<F>(&mut self, id: InternalId, f: F)
    where
        F: FnOnce(&mut dyn Node, &mut SimNodeContext),
    {
        let idx = self.node_index[&id];
        let mut app = self.nodes[idx].app.take().expect("node app present during dispatch");
        {
            let mut ctx = SimNodeContext::new(self, id);
            f(app.as_mut(), &mut ctx);
        }
        self.nodes[idx].app = Some(app);
    }

    /// Registers a node for creation. The node does not exist in the
    /// registry or spatial index until its `AddNode` event dispatches
    /// (spec §4.3); `initial_delay` is the absolute virtual time of that
    /// event, mirroring the original's literal (not `now`-relative)
    /// scheduling.
    pub fn add_node(
        &mut self,
        node: Box<dyn Node>,
        mobility: Box<dyn MobilityProfile>,
        transmission: Box<dyn TransmissionBehavior>,
        initial_delay: Duration,
        buffer_size: Option<usize>,
    ) -> InternalId {
        let internal_id = self.fresh_internal_id();
        let buffer_capacity = buffer_size.unwrap_or(self.default_buffer_size);
        self.pending.insert(
            internal_id,
            PendingNode { app: node, mobility, transmission, buffer_capacity },
        );
        self.push_event(SimTime::from_duration(initial_delay), EventKind::AddNode { internal_id });
        internal_id
    }

    fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.running = true;
        self.push_event(SimTime::ZERO, EventKind::Timestep);
        for logger in &mut self.loggers {
            logger.init();
        }
    }

    /// Drains the event queue up to (and including) virtual time `until`.
    /// Returns `Ok(())` on a clean drain or an empty queue, `Err` if a
    /// `Terminate` carrying an application error was dispatched.
    pub fn advance(&mut self, until: SimTime) -> Result<(), TerminateError> {
        self.start();

        loop {
            let Some(head_time) = self.queue.peek().map(|e| e.time) else { break };
            if head_time > until {
                break;
            }
            let event = self.queue.pop().expect("peeked event must be present");
            self.clock = event.time;
            for logger in &mut self.loggers {
                logger.new_event(&event);
            }
            self.last_event = Some(event.summary());

            if self.tracer.is_enabled() {
                if let Some(id) = Self::traced_entity(&event.kind) {
                    self.tracer.log(TraceEvent::event_dispatched(None, id, self.clock, &event.kind));
                }
            }

            match event.kind {
                EventKind::Timestep => {
                    self.mobility_tick();
                    self.push_event(self.clock + TIMESTEP_PERIOD, EventKind::Timestep);
                }
                EventKind::Connect { a, b } => self.dispatch_connect(a, b),
                EventKind::Disconnect { a, b } => self.dispatch_disconnect(a, b),
                EventKind::AddNode { internal_id } => self.dispatch_add_node(internal_id),
                EventKind::RemoveNode { internal_id } => self.dispatch_remove_node(internal_id),
                EventKind::Send(payload) => self.dispatch_send(payload),
                EventKind::Receive(payload) => self.dispatch_receive(payload),
                EventKind::Delay(payload) => (payload.callback)(self.clock),
                EventKind::Terminate { error } => {
                    self.terminating = true;
                    if error.is_none() {
                        let ids: Vec<InternalId> = self.nodes.iter().map(|n| n.internal_id).collect();
                        for id in ids {
                            self.call_node(id, |node, ctx| node.on_terminate(ctx));
                        }
                    }
                    self.running = false;
                    return match error {
                        Some(e) => Err(e),
                        None => Ok(()),
                    };
                }
            }
        }
        Ok(())
    }

    /// Enqueues a `Terminate` at the current virtual time and drains it
    /// immediately (spec §6).
    pub fn terminate(&mut self) -> Result<(), TerminateError> {
        self.terminate_with_error(None)
    }

    pub fn terminate_with_error(&mut self, error: Option<TerminateError>) -> Result<(), TerminateError> {
        self.terminating = true;
        let now = self.clock;
        self.push_event(now, EventKind::Terminate { error });
        self.advance(now)
    }

    fn dispatch_add_node(&mut self, internal_id: InternalId) {
        let pending = self
            .pending
            .remove(&internal_id)
            .expect("AddNode dispatched for an id with no pending registration");
        let PendingNode { app, mut mobility, transmission, buffer_capacity } = pending;
        let start_pos = mobility.start_position();
        let node_id = app.id();

        let internal_node = InternalNode {
            app: Some(app),
            node_id,
            internal_id,
            position: start_pos,
            mobility,
            transmission,
            instruction: mcsim_common::MovementInstruction::expired(start_pos),
            remaining: Duration::ZERO,
            peers: HashMap::new(),
            buffer_count: 0,
            buffer_capacity,
            last_message_sent: SimTime::ZERO,
            data: HashMap::new(),
        };

        let idx = self.nodes.len();
        self.nodes.push(internal_node);
        self.node_index.insert(internal_id, idx);
        self.node_id_index.insert(node_id, internal_id);
        self.region.add_node(internal_id, start_pos);

        self.call_node(internal_id, |node, ctx| node.on_start(ctx));
    }

    fn dispatch_remove_node(&mut self, internal_id: InternalId) {
        let peers: Vec<InternalId> = self.node(internal_id).peers.keys().copied().collect();
        for peer in peers {
            self.dispatch_disconnect(internal_id, peer);
        }

        let idx = self.node_index.remove(&internal_id).expect("RemoveNode for unknown node");
        let removed = self.nodes.swap_remove(idx);
        self.node_id_index.remove(&removed.node_id);
        self.region.remove_node(internal_id);
        if idx < self.nodes.len() {
            let moved_id = self.nodes[idx].internal_id;
            self.node_index.insert(moved_id, idx);
        }
    }
}
