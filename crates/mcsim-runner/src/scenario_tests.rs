//! End-to-end scenario tests exercising the full event pipeline: event
//! queue, spatial index, link manager, transmission pipeline, and
//! mobility tick together, rather than one component in isolation. Ground
//! truth is the concrete scenarios the engine's invariants are checked
//! against (two-node connect/send/receive, guaranteed drops, bounded
//! buffering, move-apart-then-back, mid-flight termination, send
//! serialization).

use mcsim_common::{Event, EventKindTag, NodeId, SimTime};
use mcsim_mobility::{LinearMobility, StationaryMobility};
use mcsim_model::{Logger, Node, NodeContext};
use mcsim_transmission::{FixedDelayTransmission, NoDropTransmission, RandomDropTransmission};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::Simulator;

#[derive(Default, Clone)]
struct Recorder {
    connects: Rc<RefCell<Vec<NodeId>>>,
    disconnects: Rc<RefCell<Vec<NodeId>>>,
    received: Rc<RefCell<Vec<(NodeId, Vec<u8>)>>>,
    terminated: Rc<RefCell<bool>>,
}

/// A node that logs every lifecycle callback through a shared `Recorder`
/// and optionally fires one `send_packet` the first time it connects to
/// anyone, and/or terminates the run the first time it connects to
/// anyone.
struct RecordingNode {
    id: NodeId,
    recorder: Recorder,
    send_on_connect: Option<Vec<u8>>,
    terminate_on_connect: bool,
}

impl RecordingNode {
    fn new(id: i64, recorder: Recorder) -> Self {
        RecordingNode { id: NodeId(id), recorder, send_on_connect: None, terminate_on_connect: false }
    }

    fn sending(mut self, packet: Vec<u8>) -> Self {
        self.send_on_connect = Some(packet);
        self
    }

    fn terminating(mut self) -> Self {
        self.terminate_on_connect = true;
        self
    }
}

impl Node for RecordingNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn on_start(&mut self, _ctx: &mut dyn NodeContext) {}

    fn on_connect(&mut self, peer: NodeId, ctx: &mut dyn NodeContext) {
        self.recorder.connects.borrow_mut().push(peer);
        if let Some(packet) = self.send_on_connect.take() {
            ctx.send_packet(peer, packet);
        }
        if self.terminate_on_connect {
            ctx.terminate(None);
        }
    }

    fn on_disconnect(&mut self, peer: NodeId, _ctx: &mut dyn NodeContext) {
        self.recorder.disconnects.borrow_mut().push(peer);
    }

    fn on_receive_packet(&mut self, from: NodeId, packet: &[u8], _ctx: &mut dyn NodeContext) {
        self.recorder.received.borrow_mut().push((from, packet.to_vec()));
    }

    fn on_terminate(&mut self, _ctx: &mut dyn NodeContext) {
        *self.recorder.terminated.borrow_mut() = true;
    }
}

#[derive(Default, Clone)]
struct EventLog {
    events: Rc<RefCell<Vec<(SimTime, EventKindTag)>>>,
    debug_lines: Rc<RefCell<Vec<String>>>,
}

struct RecordingLogger {
    log: EventLog,
}

impl Logger for RecordingLogger {
    fn init(&mut self) {}

    fn new_event(&mut self, event: &Event) {
        self.log.events.borrow_mut().push((event.time, event.kind.tag()));
    }

    fn log(&mut self, msg: &str) {
        self.log.debug_lines.borrow_mut().push(msg.to_string());
    }
}

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// S1: two stationary nodes within range. One sends a 10-byte packet.
/// Expect exactly one Connect (both sides), one Send, one Receive
/// delivering the identical bytes, no Disconnect.
#[test]
fn s1_stationary_pair_connects_and_delivers() {
    let log = EventLog::default();
    let mut sim = Simulator::new(
        50.0,
        Duration::from_millis(10),
        rng(1),
        vec![Box::new(RecordingLogger { log: log.clone() })],
    );

    let sender = Recorder::default();
    let receiver = Recorder::default();
    let packet = vec![0xABu8; 10];

    sim.add_node(
        Box::new(RecordingNode::new(1, sender.clone()).sending(packet.clone())),
        Box::new(StationaryMobility::new(0.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );
    sim.add_node(
        Box::new(RecordingNode::new(2, receiver.clone())),
        Box::new(StationaryMobility::new(10.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );

    sim.advance(SimTime::from_millis(200)).unwrap();

    assert_eq!(sender.connects.borrow().len(), 1);
    assert_eq!(receiver.connects.borrow().len(), 1);
    assert!(sender.disconnects.borrow().is_empty());
    assert!(receiver.disconnects.borrow().is_empty());
    assert_eq!(receiver.received.borrow().as_slice(), &[(NodeId(1), packet)]);

    let connect_count = log.events.borrow().iter().filter(|(_, k)| *k == EventKindTag::Connect).count();
    let send_count = log.events.borrow().iter().filter(|(_, k)| *k == EventKindTag::Send).count();
    let receive_count = log.events.borrow().iter().filter(|(_, k)| *k == EventKindTag::Receive).count();
    assert_eq!(connect_count, 1);
    assert_eq!(send_count, 1);
    assert_eq!(receive_count, 1);
}

/// S2: transmission behaviour drops with probability 1. Expect no
/// Receive, the origin's buffer back at 0, and one `packet:drop` line.
#[test]
fn s2_guaranteed_drop_never_delivers() {
    let log = EventLog::default();
    let mut sim = Simulator::new(
        50.0,
        Duration::from_millis(10),
        rng(2),
        vec![Box::new(RecordingLogger { log: log.clone() })],
    );

    let sender = Recorder::default();
    let receiver = Recorder::default();

    let sender_id = sim.add_node(
        Box::new(RecordingNode::new(1, sender.clone()).sending(vec![1, 2, 3])),
        Box::new(StationaryMobility::new(0.0, 0.0)),
        Box::new(RandomDropTransmission::new(1.0, Duration::ZERO, rng(99))),
        Duration::ZERO,
        None,
    );
    sim.add_node(
        Box::new(RecordingNode::new(2, receiver.clone())),
        Box::new(StationaryMobility::new(10.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );

    sim.advance(SimTime::from_millis(200)).unwrap();

    assert!(receiver.received.borrow().is_empty());
    assert_eq!(sim.node(sender_id).buffer_count, 0);
    assert!(sim.node(sender_id).buffer_capacity >= 1);

    let drop_lines =
        log.debug_lines.borrow().iter().filter(|line| line.starts_with("packet:drop:")).count();
    assert_eq!(drop_lines, 1);
}

/// S3: buffer capacity 2, three sends at the same instant. Expect two
/// delivered and one `packet:buffer_full` line; buffer back at 0 once
/// the two admitted sends are delivered.
#[test]
fn s3_buffer_overflow_drops_the_excess() {
    struct TripleSender {
        id: NodeId,
        recorder: Recorder,
        packet: Vec<u8>,
    }

    impl Node for TripleSender {
        fn id(&self) -> NodeId {
            self.id
        }
        fn on_start(&mut self, _ctx: &mut dyn NodeContext) {}
        fn on_connect(&mut self, peer: NodeId, ctx: &mut dyn NodeContext) {
            self.recorder.connects.borrow_mut().push(peer);
            for _ in 0..3 {
                ctx.send_packet(peer, self.packet.clone());
            }
        }
        fn on_disconnect(&mut self, _peer: NodeId, _ctx: &mut dyn NodeContext) {}
        fn on_receive_packet(&mut self, _from: NodeId, _packet: &[u8], _ctx: &mut dyn NodeContext) {}
        fn on_terminate(&mut self, _ctx: &mut dyn NodeContext) {}
    }

    let log = EventLog::default();
    let mut sim = Simulator::new(
        50.0,
        Duration::from_millis(10),
        rng(3),
        vec![Box::new(RecordingLogger { log: log.clone() })],
    );
    let sender_recorder = Recorder::default();
    let receiver = Recorder::default();

    let sender_id = sim.add_node(
        Box::new(TripleSender { id: NodeId(1), recorder: sender_recorder, packet: vec![7; 4] }),
        Box::new(StationaryMobility::new(0.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        Some(2),
    );
    sim.add_node(
        Box::new(RecordingNode::new(2, receiver.clone())),
        Box::new(StationaryMobility::new(10.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );

    sim.advance(SimTime::from_millis(300)).unwrap();

    assert_eq!(receiver.received.borrow().len(), 2);
    assert_eq!(sim.node(sender_id).buffer_count, 0);
    let buffer_full_lines =
        log.debug_lines.borrow().iter().filter(|line| line.starts_with("packet:buffer_full:")).count();
    assert_eq!(buffer_full_lines, 1);
}

/// S4: two nodes begin 2R apart; mobility moves them to 0.5R over 1s,
/// then back to 2R over 1s. Expect exactly one Connect followed later by
/// exactly one Disconnect.
#[test]
fn s4_move_together_then_apart_connects_once_and_disconnects_once() {
    let range_m = 50.0;
    let mut sim = Simulator::new(range_m, Duration::from_millis(10), rng(4), vec![]);

    let stationary = Recorder::default();
    let mover = Recorder::default();

    sim.add_node(
        Box::new(RecordingNode::new(1, stationary.clone())),
        Box::new(StationaryMobility::new(0.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );
    sim.add_node(
        Box::new(RecordingNode::new(2, mover.clone())),
        Box::new(LinearMobility::new(
            mcsim_common::Coordinate::new(2.0 * range_m, 0.0),
            mcsim_common::Coordinate::new(0.5 * range_m, 0.0),
            Duration::from_secs(1),
        )),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );

    sim.advance(SimTime::from_millis(2500)).unwrap();

    assert_eq!(stationary.connects.borrow().len(), 1);
    assert_eq!(stationary.disconnects.borrow().len(), 1);
    assert_eq!(mover.connects.borrow().len(), 1);
    assert_eq!(mover.disconnects.borrow().len(), 1);
}

/// S5: Terminate dispatched at T=500ms while an unrelated Send is in
/// flight for T=600ms. Advance must return at T=500ms with `on_terminate`
/// called on every node, including the pair whose Send never fires.
#[test]
fn s5_terminate_preempts_a_later_in_flight_send() {
    let range_m = 50.0;
    // A per-origin gap long enough that the sender/receiver pair's Send
    // lands at 600ms (10ms connect + 590ms gap), strictly after the
    // 500ms Terminate triggered by the second pair's Connect.
    let mut sim = Simulator::new(range_m, Duration::from_millis(590), rng(5), vec![]);

    let sender = Recorder::default();
    let receiver = Recorder::default();
    let trigger = Recorder::default();
    let bystander = Recorder::default();

    sim.add_node(
        Box::new(RecordingNode::new(1, sender.clone()).sending(vec![9; 5])),
        Box::new(StationaryMobility::new(0.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );
    sim.add_node(
        Box::new(RecordingNode::new(2, receiver.clone())),
        Box::new(StationaryMobility::new(10.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );

    sim.add_node(
        Box::new(RecordingNode::new(3, trigger.clone()).terminating()),
        Box::new(StationaryMobility::new(1_000.0, 1_000.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );
    sim.add_node(
        Box::new(RecordingNode::new(4, bystander.clone())),
        Box::new(LinearMobility::new(
            mcsim_common::Coordinate::new(1_000.0, 1_000.0 + 2.0 * range_m),
            mcsim_common::Coordinate::new(1_000.0, 1_000.0 + 0.5 * range_m),
            Duration::from_millis(500),
        )),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );

    let result = sim.advance(SimTime::from_millis(10_000));

    assert!(result.is_ok(), "Terminate carried no error, Advance should return Ok");
    assert_eq!(sim.now(), SimTime::from_millis(500));
    assert!(*sender.terminated.borrow());
    assert!(*receiver.terminated.borrow());
    assert!(*trigger.terminated.borrow());
    assert!(*bystander.terminated.borrow());
    assert!(receiver.received.borrow().is_empty(), "the 600ms Send must never dispatch");
}

/// S6: three sends at the same instant on one origin. Consecutive Send
/// dispatch times must be spaced by at least `transmission_delay` (spec
/// §8 invariant 7, "Send serialization").
#[test]
fn s6_same_origin_sends_are_serialized() {
    let log = EventLog::default();
    let mut sim = Simulator::new(
        50.0,
        Duration::from_millis(20),
        rng(6),
        vec![Box::new(RecordingLogger { log: log.clone() })],
    );

    struct TripleSender {
        id: NodeId,
    }
    impl Node for TripleSender {
        fn id(&self) -> NodeId {
            self.id
        }
        fn on_start(&mut self, _ctx: &mut dyn NodeContext) {}
        fn on_connect(&mut self, peer: NodeId, ctx: &mut dyn NodeContext) {
            for _ in 0..3 {
                ctx.send_packet(peer, vec![1]);
            }
        }
        fn on_disconnect(&mut self, _peer: NodeId, _ctx: &mut dyn NodeContext) {}
        fn on_receive_packet(&mut self, _from: NodeId, _packet: &[u8], _ctx: &mut dyn NodeContext) {}
        fn on_terminate(&mut self, _ctx: &mut dyn NodeContext) {}
    }

    sim.add_node(
        Box::new(TripleSender { id: NodeId(1) }),
        Box::new(StationaryMobility::new(0.0, 0.0)),
        Box::new(FixedDelayTransmission::new(Duration::ZERO)),
        Duration::ZERO,
        Some(10),
    );
    sim.add_node(
        Box::new(RecordingNode::new(2, Recorder::default())),
        Box::new(StationaryMobility::new(10.0, 0.0)),
        Box::new(NoDropTransmission),
        Duration::ZERO,
        None,
    );

    sim.advance(SimTime::from_millis(200)).unwrap();

    let send_times: Vec<SimTime> =
        log.events.borrow().iter().filter(|(_, k)| *k == EventKindTag::Send).map(|(t, _)| *t).collect();
    assert_eq!(send_times.len(), 3);
    assert_eq!(send_times[1] - send_times[0], Duration::from_millis(20));
    assert_eq!(send_times[2] - send_times[1], Duration::from_millis(20));
}
