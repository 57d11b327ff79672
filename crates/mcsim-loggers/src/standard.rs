//! A `tracing`-based logger that emits one line per dispatched event
//! (matching `loggers/standard.go`'s `NewEvent` switch), collapsing
//! consecutive `Timestep` events down to a single line the way the
//! original's `lastEvent`-based dedup does.

use mcsim_common::{Event, EventKind, EventKindTag};
use mcsim_model::Logger;

#[derive(Default)]
pub struct StandardLogger {
    last_kind: Option<EventKindTag>,
}

impl StandardLogger {
    pub fn new() -> Self {
        StandardLogger::default()
    }
}

impl Logger for StandardLogger {
    fn init(&mut self) {
        tracing::info!(target: "mcsim::standard", "starting logging");
    }

    fn new_event(&mut self, event: &Event) {
        let tag = event.kind.tag();
        if tag == EventKindTag::Timestep && self.last_kind == Some(EventKindTag::Timestep) {
            self.last_kind = Some(tag);
            return;
        }

        match &event.kind {
            EventKind::Timestep => {
                tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[STEP]");
            }
            EventKind::Connect { a, b } => {
                tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[CONNECT] {a}, {b}");
            }
            EventKind::Disconnect { a, b } => {
                tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[DISCONNECT] {a}, {b}");
            }
            EventKind::AddNode { internal_id } => {
                tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[ADD_NODE] {internal_id}");
            }
            EventKind::RemoveNode { internal_id } => {
                tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[REMOVE_NODE] {internal_id}");
            }
            EventKind::Send(payload) => {
                tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[SEND] {} to {}", payload.origin, payload.target_node_id);
            }
            EventKind::Receive(payload) => {
                tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[RECEIVE] {} from {}", payload.target, payload.origin_node_id);
            }
            EventKind::Delay(_) => {
                tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[DELAY]");
            }
            EventKind::Terminate { error } => match error {
                None => tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[TERMINATE]"),
                Some(e) => tracing::info!(target: "mcsim::standard", time = %event.time, seq = ?event.sequence, "[TERMINATE] with error: '{e}'"),
            },
        }

        self.last_kind = Some(tag);
    }

    fn log(&mut self, msg: &str) {
        tracing::debug!(target: "mcsim::standard", "{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcsim_common::{InternalId, Sequence, SimTime};

    #[test]
    fn collapses_consecutive_timesteps() {
        let mut logger = StandardLogger::new();
        let e1 = Event { time: SimTime::ZERO, sequence: Sequence::Numbered(0), parent: None, kind: EventKind::Timestep };
        let e2 = Event { time: SimTime::from_millis(10), sequence: Sequence::Numbered(1), parent: None, kind: EventKind::Timestep };
        logger.new_event(&e1);
        logger.new_event(&e2);
        assert_eq!(logger.last_kind, Some(EventKindTag::Timestep));
    }

    #[test]
    fn tracks_last_kind_for_non_timestep() {
        let mut logger = StandardLogger::new();
        let e = Event {
            time: SimTime::ZERO,
            sequence: Sequence::Numbered(0),
            parent: None,
            kind: EventKind::Connect { a: InternalId(1), b: InternalId(2) },
        };
        logger.new_event(&e);
        assert_eq!(logger.last_kind, Some(EventKindTag::Connect));
    }
}
