use mcsim_common::{Coordinate, MovementInstruction};
use mcsim_model::MobilityProfile;
use std::time::Duration;

/// Shuttles back and forth between two fixed endpoints, each leg taking
/// the same fixed duration.
pub struct LinearMobility {
    start: Coordinate,
    end: Coordinate,
    leg_duration: Duration,
    at_start: bool,
}

impl LinearMobility {
    pub fn new(start: Coordinate, end: Coordinate, leg_duration: Duration) -> Self {
        LinearMobility { start, end, leg_duration, at_start: true }
    }
}

impl MobilityProfile for LinearMobility {
    fn start_position(&mut self) -> Coordinate {
        self.start
    }

    fn register_movements(&mut self, _current: Coordinate) -> MovementInstruction {
        let target = if self.at_start { self.end } else { self.start };
        self.at_start = !self.at_start;
        MovementInstruction::new(target, self.leg_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_endpoints() {
        let mut m = LinearMobility::new(
            Coordinate::new(0.0, 0.0),
            Coordinate::new(10.0, 0.0),
            Duration::from_secs(5),
        );
        let first = m.register_movements(Coordinate::new(0.0, 0.0));
        assert_eq!(first.target, Coordinate::new(10.0, 0.0));
        let second = m.register_movements(Coordinate::new(10.0, 0.0));
        assert_eq!(second.target, Coordinate::new(0.0, 0.0));
        let third = m.register_movements(Coordinate::new(0.0, 0.0));
        assert_eq!(third.target, Coordinate::new(10.0, 0.0));
    }
}
