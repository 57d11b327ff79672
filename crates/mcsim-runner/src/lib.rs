//! The simulation engine: the `Simulator` root aggregate (spec §3), the
//! node registry and link manager (§4.3/§4.4, C3/C4), the transmission
//! pipeline (§4.4, C5), the scheduler loop (§4.5, C6), and the mobility
//! tick (§4.6, C7). `mcsim-runner`'s `[[bin]]` (`src/main.rs`) is the CLI
//! driver that wires a YAML scenario into a running `Simulator`.

mod build;
mod context;
mod edge;
mod link;
mod mobility_tick;
mod node;
#[cfg(test)]
mod scenario_tests;
mod simulator;
mod transmission;
pub mod watchdog;

pub use build::{build_simulation, BuildError};
pub use context::SimNodeContext;
pub use edge::{EdgeTable, InternalPeer};
pub use node::{InternalNode, PeerRef};
pub use simulator::Simulator;
