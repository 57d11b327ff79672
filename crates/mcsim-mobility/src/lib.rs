//! Mobility profile implementations (`MobilityProfile`): the pluggable
//! collaborators a node's position is driven by. Each one is a thin state
//! machine over `register_movements`, ground in the original simulator's
//! `movement_profiles/*.go`.

mod linear;
mod random;
mod random_waypoint;
mod stationary;
mod waypoint;

pub use linear::LinearMobility;
pub use random::RandomMobility;
pub use random_waypoint::RandomWaypointMobility;
pub use stationary::StationaryMobility;
pub use waypoint::WaypointMobility;
