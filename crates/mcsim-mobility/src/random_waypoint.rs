use mcsim_common::{Coordinate, MovementInstruction};
use mcsim_model::MobilityProfile;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// The random waypoint mobility model (Johnson & Maltz, "A Performance
/// Comparison of Multi-Hop Wireless Ad Hoc Network Routing Protocols"):
/// alternates a fixed pause with a move to a uniformly sampled point at a
/// uniformly sampled speed.
pub struct RandomWaypointMobility {
    x_range: f64,
    y_range: f64,
    max_speed_mps: f64,
    pause_time: Duration,
    paused: bool,
    rng: ChaCha8Rng,
}

impl RandomWaypointMobility {
    pub fn new(x_range: f64, y_range: f64, max_speed_mps: f64, pause_time: Duration, rng: ChaCha8Rng) -> Self {
        RandomWaypointMobility { x_range, y_range, max_speed_mps, pause_time, paused: false, rng }
    }

    pub fn default_profile(rng: ChaCha8Rng) -> Self {
        RandomWaypointMobility::new(1500.0, 300.0, 20.0, Duration::from_secs(30), rng)
    }

    fn sample_point(&mut self) -> Coordinate {
        let x = self.rng.gen_range(-self.x_range..self.x_range);
        let y = self.rng.gen_range(-self.y_range..self.y_range);
        Coordinate::new(x, y)
    }
}

impl MobilityProfile for RandomWaypointMobility {
    fn start_position(&mut self) -> Coordinate {
        self.sample_point()
    }

    fn register_movements(&mut self, current: Coordinate) -> MovementInstruction {
        if !self.paused {
            self.paused = true;
            MovementInstruction::new(current, self.pause_time)
        } else {
            self.paused = false;
            let target = self.sample_point();
            let dist = current.distance(target);
            let speed = self.rng.gen_range(0.0..self.max_speed_mps).max(f64::EPSILON);
            let travel_time = Duration::from_secs_f64(dist / speed);
            MovementInstruction::new(target, travel_time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn alternates_pause_and_move() {
        let rng = ChaCha8Rng::seed_from_u64(7);
        let mut m = RandomWaypointMobility::default_profile(rng);
        let here = Coordinate::new(0.0, 0.0);

        let pause = m.register_movements(here);
        assert_eq!(pause.target, here);
        assert_eq!(pause.duration, Duration::from_secs(30));

        let moving = m.register_movements(here);
        assert_ne!(moving.target, here);
    }
}
