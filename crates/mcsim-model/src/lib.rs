//! Trait surface (`Node`, `MobilityProfile`, `TransmissionBehavior`,
//! `Logger`, `NodeContext`), the dynamic scratch-data value type, and
//! YAML scenario loading.
//!
//! `mcsim-runner` depends on this crate for the vocabulary it dispatches
//! through; `mcsim-mobility`, `mcsim-transmission`, and `mcsim-loggers`
//! depend on it for the traits they implement.

pub mod properties;
pub mod scenario;
pub mod traits;

pub use properties::PropertyValue;
pub use scenario::{LoggerSpec, MobilitySpec, NodeSpec, ScenarioConfig, ScenarioError, TransmissionSpec};
pub use traits::{Logger, MobilityProfile, Node, NodeContext, TransmissionBehavior};
