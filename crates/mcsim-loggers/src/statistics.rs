//! Tallies packets sent/received/dropped across a run and prints a
//! human-readable summary on `Terminate`, matching `loggers/statistics.go`
//! generalized away from MeshCore-specific packet-layer decoding -- the
//! core only ever sees opaque bytes, so there is no routing-packet
//! breakdown to tally, only the transmission-pipeline-level counts.

use mcsim_common::{Event, EventKind};
use mcsim_model::Logger;
use std::time::Instant;

#[derive(Default)]
pub struct StatisticsLogger {
    real_start: Option<Instant>,
    packets_sent: u64,
    packets_received: u64,
    bytes_received: u64,
}

impl StatisticsLogger {
    pub fn new() -> Self {
        StatisticsLogger::default()
    }
}

impl Logger for StatisticsLogger {
    fn init(&mut self) {
        self.real_start = Some(Instant::now());
    }

    fn new_event(&mut self, event: &Event) {
        match &event.kind {
            EventKind::Send(_) => {
                self.packets_sent += 1;
            }
            EventKind::Receive(payload) => {
                self.packets_received += 1;
                self.bytes_received += payload.packet.len() as u64;
            }
            EventKind::Terminate { .. } => {
                self.print_summary(event.time.as_secs_f64());
            }
            _ => {}
        }
    }

    fn log(&mut self, _msg: &str) {}
}

impl StatisticsLogger {
    fn print_summary(&self, sim_seconds: f64) {
        let real_elapsed = self.real_start.map(|t| t.elapsed()).unwrap_or_default();
        let dropped = self.packets_sent.saturating_sub(self.packets_received);
        let kb_received = self.bytes_received as f64 / 1000.0;
        let throughput = if sim_seconds > 0.0 { kb_received / sim_seconds } else { 0.0 };

        println!("\n\n----==== STATISTICS ====----\n");
        println!("Simulated time: \t\t{:.3}s", sim_seconds);
        println!("Real time: \t\t\t{:.3}s", real_elapsed.as_secs_f64());
        println!();
        println!("Packets Sent: \t\t\t{}", self.packets_sent);
        println!("Packets Received: \t\t{}", self.packets_received);
        println!("Dropped Packets (approx): \t{}", dropped);
        println!();
        println!("Data Received: \t\t\t{:.2} kb", kb_received);
        println!("Throughput: \t\t\t{:.2} kb/s", throughput);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcsim_common::{InternalId, NodeId, ReceivePayload, SendPayload, Sequence, SimTime};
    use std::time::Duration;

    fn send_event() -> Event {
        Event {
            time: SimTime::ZERO,
            sequence: Sequence::Numbered(0),
            parent: None,
            kind: EventKind::Send(SendPayload {
                origin: InternalId(1),
                target: InternalId(2),
                target_node_id: NodeId(2),
                packet: vec![0u8; 10],
                should_drop: false,
                propagation_delay: Duration::ZERO,
            }),
        }
    }

    fn receive_event() -> Event {
        Event {
            time: SimTime::ZERO,
            sequence: Sequence::Numbered(1),
            parent: None,
            kind: EventKind::Receive(ReceivePayload {
                origin: InternalId(1),
                target: InternalId(2),
                origin_node_id: NodeId(1),
                packet: vec![0u8; 10],
            }),
        }
    }

    #[test]
    fn tallies_sent_and_received() {
        let mut logger = StatisticsLogger::new();
        logger.init();
        logger.new_event(&send_event());
        logger.new_event(&receive_event());
        assert_eq!(logger.packets_sent, 1);
        assert_eq!(logger.packets_received, 1);
        assert_eq!(logger.bytes_received, 10);
    }
}
