//! Logger implementations (spec §4.7/§4.13): observers that watch every
//! dispatched event and debug string without ever mutating engine state.
//!
//! Grounded in the original simulator's `loggers/*.go` and `pcap/pcap.go`:
//! a terminal logger (`StandardLogger`), a run-summary logger
//! (`StatisticsLogger`), and a libpcap-format capture logger
//! (`PcapCaptureLogger`).

mod pcap;
mod standard;
mod statistics;

pub use pcap::{PcapCaptureLogger, PcapWriteError};
pub use standard::StandardLogger;
pub use statistics::StatisticsLogger;
