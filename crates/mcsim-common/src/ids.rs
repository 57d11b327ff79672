//! Node identifiers.

use std::fmt;

/// Opaque public identifier for a node. May be reassigned during a run
/// (see the link manager's `UpdateID`); reassignment forces disconnection
/// of all peers under the old identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engine-private, immutable identifier assigned at node creation from the
/// deterministic random stream. Used as the map key for peer tables so
/// they remain stable under `NodeId` renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InternalId(pub u64);

impl fmt::Display for InternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
