use mcsim_common::{Coordinate, MovementInstruction};
use mcsim_model::MobilityProfile;
use std::time::Duration;

/// Never moves. `register_movements` keeps handing back a one-second
/// instruction targeting wherever the node already is, so the mobility
/// tick's "instruction expired, ask again" path fires once a second
/// instead of the node sitting on a permanently-expired instruction.
pub struct StationaryMobility {
    start: Coordinate,
}

impl StationaryMobility {
    pub fn new(x: f64, y: f64) -> Self {
        StationaryMobility { start: Coordinate::new(x, y) }
    }
}

impl MobilityProfile for StationaryMobility {
    fn start_position(&mut self) -> Coordinate {
        self.start
    }

    fn register_movements(&mut self, current: Coordinate) -> MovementInstruction {
        MovementInstruction::new(current, Duration::from_secs(1))
    }
}
