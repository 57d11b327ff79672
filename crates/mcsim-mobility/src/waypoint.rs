use mcsim_common::{Coordinate, MovementInstruction};
use mcsim_model::MobilityProfile;
use std::collections::VecDeque;

/// Consumes a fixed, caller-supplied queue of waypoints in order. Once
/// exhausted it holds at the last waypoint indefinitely rather than
/// panicking, since a scenario that runs longer than its waypoint queue
/// is a normal outcome, not a programmer error.
pub struct WaypointMobility {
    points: VecDeque<MovementInstruction>,
    last: Option<Coordinate>,
}

impl WaypointMobility {
    pub fn new(points: Vec<MovementInstruction>) -> Self {
        WaypointMobility { points: points.into(), last: None }
    }
}

impl MobilityProfile for WaypointMobility {
    fn start_position(&mut self) -> Coordinate {
        let pos = self.points.front().map(|p| p.target).unwrap_or_default();
        self.last = Some(pos);
        pos
    }

    fn register_movements(&mut self, current: Coordinate) -> MovementInstruction {
        match self.points.pop_front() {
            Some(instr) => {
                self.last = Some(instr.target);
                instr
            }
            None => MovementInstruction::expired(self.last.unwrap_or(current)),
        }
    }
}
