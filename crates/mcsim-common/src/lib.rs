//! Primitives shared by every MCSim crate: geometry, virtual time, node
//! identifiers, the tagged event model and its ordering queue, the
//! spatial index, the error taxonomy, and entity-level debug tracing.
//!
//! This crate is deliberately free of any node/mobility/transmission
//! trait surface — that lives in `mcsim-model` — and of any engine state
//! machine — that lives in `mcsim-runner`. It is the vocabulary both of
//! those crates build on.

pub mod entity_tracer;
pub mod error;
pub mod event;
pub mod geometry;
pub mod ids;
pub mod region;
pub mod rng;
pub mod time;

pub use entity_tracer::{EntityTracer, EntityTracerConfig, TraceCategory, TraceEvent};
pub use error::{EngineError, TerminateError};
pub use event::{
    DelayPayload, Event, EventKind, EventKindTag, EventQueue, EventSummary, ReceivePayload,
    Sequence, SendPayload,
};
pub use geometry::{Coordinate, MovementInstruction};
pub use ids::{InternalId, NodeId};
pub use region::RegionMap;
pub use rng::deterministic_shuffle;
pub use time::{SimTime, TIMESTEP_PERIOD};
