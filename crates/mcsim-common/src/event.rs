//! The tagged event model and its ordering queue.
//!
//! Events are a flat enum with per-kind payload rather than a polymorphic
//! class hierarchy: a match arm per kind in the scheduler loop is clearer
//! than a deep inheritance tree, and there is exactly one place (this
//! file) where dispatch order is decided.

use crate::{InternalId, NodeId, SimTime, TerminateError};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

/// The ordering key assigned to an event at enqueue time. `Terminate`
/// events get the dedicated `Terminate` variant, which an `#[derive(Ord)]`
/// sorts ahead of every `Numbered(_)` regardless of the counter value —
/// the same "always sorts first" guarantee the original's sequence `-1`
/// sentinel gave, without needing a signed counter to make room for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sequence {
    Terminate,
    Numbered(u64),
}

/// The event kind, stripped of payload, for logging, tracing, and the
/// `parent` back-link (which only needs to say *what* happened before,
/// not carry its payload around forever).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKindTag {
    Timestep,
    Connect,
    Disconnect,
    AddNode,
    RemoveNode,
    Send,
    Receive,
    Delay,
    Terminate,
}

impl fmt::Display for EventKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventKindTag::Timestep => "Timestep",
            EventKindTag::Connect => "Connect",
            EventKindTag::Disconnect => "Disconnect",
            EventKindTag::AddNode => "AddNode",
            EventKindTag::RemoveNode => "RemoveNode",
            EventKindTag::Send => "Send",
            EventKindTag::Receive => "Receive",
            EventKindTag::Delay => "Delay",
            EventKindTag::Terminate => "Terminate",
        };
        write!(f, "{s}")
    }
}

/// A lightweight summary of a dispatched event, used as the `parent`
/// back-link so the scheduler doesn't have to keep full payloads (and
/// any packet bytes they carry) alive indefinitely.
#[derive(Debug, Clone, Copy)]
pub struct EventSummary {
    pub kind: EventKindTag,
    pub time: SimTime,
    pub sequence: Sequence,
}

pub struct SendPayload {
    pub origin: InternalId,
    pub target: InternalId,
    pub target_node_id: NodeId,
    pub packet: Vec<u8>,
    pub should_drop: bool,
    pub propagation_delay: Duration,
}

pub struct ReceivePayload {
    pub origin: InternalId,
    pub target: InternalId,
    pub origin_node_id: NodeId,
    pub packet: Vec<u8>,
}

/// A deferred callback scheduled by a node via `DelayBy`. The callback is
/// opaque to the core: it captures whatever node-specific state it needs
/// and is simply invoked with the virtual time it fires at.
pub struct DelayPayload {
    pub target: InternalId,
    pub callback: Box<dyn FnOnce(SimTime)>,
}

impl fmt::Debug for DelayPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayPayload")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for SendPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendPayload")
            .field("origin", &self.origin)
            .field("target", &self.target)
            .field("packet_len", &self.packet.len())
            .field("should_drop", &self.should_drop)
            .field("propagation_delay", &self.propagation_delay)
            .finish()
    }
}

impl fmt::Debug for ReceivePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceivePayload")
            .field("origin", &self.origin)
            .field("target", &self.target)
            .field("packet_len", &self.packet.len())
            .finish()
    }
}

#[derive(Debug)]
pub enum EventKind {
    Timestep,
    Connect { a: InternalId, b: InternalId },
    Disconnect { a: InternalId, b: InternalId },
    AddNode { internal_id: InternalId },
    RemoveNode { internal_id: InternalId },
    Send(SendPayload),
    Receive(ReceivePayload),
    Delay(DelayPayload),
    Terminate { error: Option<TerminateError> },
}

impl EventKind {
    pub fn tag(&self) -> EventKindTag {
        match self {
            EventKind::Timestep => EventKindTag::Timestep,
            EventKind::Connect { .. } => EventKindTag::Connect,
            EventKind::Disconnect { .. } => EventKindTag::Disconnect,
            EventKind::AddNode { .. } => EventKindTag::AddNode,
            EventKind::RemoveNode { .. } => EventKindTag::RemoveNode,
            EventKind::Send(_) => EventKindTag::Send,
            EventKind::Receive(_) => EventKindTag::Receive,
            EventKind::Delay(_) => EventKindTag::Delay,
            EventKind::Terminate { .. } => EventKindTag::Terminate,
        }
    }
}

/// One atomic state transition at a virtual timestamp. Equality and
/// ordering only ever consider `(time, sequence)` — the queue does not
/// care what the payload is, only when it fires and in what order among
/// same-time events.
#[derive(Debug)]
pub struct Event {
    pub time: SimTime,
    pub sequence: Sequence,
    pub parent: Option<EventSummary>,
    pub kind: EventKind,
}

impl Event {
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            kind: self.kind.tag(),
            time: self.time,
            sequence: self.sequence,
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time).then(self.sequence.cmp(&other.sequence))
    }
}

/// Binary min-heap over events, ordered `(time, sequence)` ascending.
/// Wraps `std::collections::BinaryHeap` (a max-heap) via `Reverse` so the
/// public API reads as a min-heap without a bespoke heap implementation.
#[derive(Default)]
pub struct EventQueue {
    heap: BinaryHeap<std::cmp::Reverse<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue { heap: BinaryHeap::new() }
    }

    pub fn push(&mut self, event: Event) {
        self.heap.push(std::cmp::Reverse(event));
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|std::cmp::Reverse(e)| e)
    }

    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|std::cmp::Reverse(e)| e)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(time_ms: u64, seq: Sequence) -> Event {
        Event {
            time: SimTime::from_millis(time_ms),
            sequence: seq,
            parent: None,
            kind: EventKind::Timestep,
        }
    }

    #[test]
    fn orders_by_time_then_sequence() {
        let mut q = EventQueue::new();
        q.push(ev(10, Sequence::Numbered(2)));
        q.push(ev(5, Sequence::Numbered(0)));
        q.push(ev(10, Sequence::Numbered(1)));

        assert_eq!(q.pop().unwrap().time, SimTime::from_millis(5));
        let second = q.pop().unwrap();
        assert_eq!(second.time, SimTime::from_millis(10));
        assert_eq!(second.sequence, Sequence::Numbered(1));
        let third = q.pop().unwrap();
        assert_eq!(third.sequence, Sequence::Numbered(2));
        assert!(q.is_empty());
    }

    #[test]
    fn terminate_sorts_before_same_time_events() {
        let mut q = EventQueue::new();
        q.push(ev(10, Sequence::Numbered(0)));
        q.push(ev(10, Sequence::Terminate));

        let first = q.pop().unwrap();
        assert_eq!(first.sequence, Sequence::Terminate);
    }

    #[test]
    fn terminate_does_not_jump_earlier_times() {
        let mut q = EventQueue::new();
        q.push(ev(5, Sequence::Numbered(0)));
        q.push(ev(10, Sequence::Terminate));

        assert_eq!(q.pop().unwrap().time, SimTime::from_millis(5));
        assert_eq!(q.pop().unwrap().sequence, Sequence::Terminate);
    }
}
