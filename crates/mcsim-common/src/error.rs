//! Error taxonomy.
//!
//! The core distinguishes programmer errors (invariant violations that
//! abort a run — these are bugs, never recovered) from an application's
//! own `Terminate` payload (a typed error the caller gets back from
//! `Advance`). Routine drops (buffer full, transmission-behaviour drop,
//! broken edge) never produce an `Err` at all; they are logged.

use crate::InternalId;
use thiserror::Error;

/// Invariant violations. Every call site that can hit one of these calls
/// `panic!` with it rather than threading it through a `Result` — per the
/// spec these are bugs, not recoverable conditions.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown peer: {a} is not connected to {b}")]
    UnknownPeer { a: InternalId, b: InternalId },

    #[error("peer already connected: {a} -- {b}")]
    PeerAlreadyConnected { a: InternalId, b: InternalId },

    #[error("duplicate sequence assignment")]
    DuplicateSequenceAssignment,

    #[error("unrecognized event kind")]
    UnrecognizedEventKind,
}

/// An application-level failure carried as a `Terminate` event's payload
/// and surfaced out of `Advance` to the caller.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TerminateError {
    pub message: String,
}

impl TerminateError {
    pub fn new(message: impl Into<String>) -> Self {
        TerminateError {
            message: message.into(),
        }
    }
}
