use mcsim_common::{Coordinate, MovementInstruction};
use mcsim_model::MobilityProfile;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Start position and every subsequent target are drawn uniformly from a
/// rectangle centred on the origin; leg duration is drawn uniformly from
/// `[min_time, max_time)`.
///
/// `min_time >= max_time` is rejected by [`RandomMobility::new`] rather
/// than left as a runtime panic deep in the mobility tick — scenario
/// construction is where a misconfigured profile should surface.
pub struct RandomMobility {
    x_range: f64,
    y_range: f64,
    min_time: Duration,
    max_time: Duration,
    rng: ChaCha8Rng,
}

impl RandomMobility {
    pub fn new(
        x_range: f64,
        y_range: f64,
        min_time: Duration,
        max_time: Duration,
        rng: ChaCha8Rng,
    ) -> Result<Self, String> {
        if min_time >= max_time {
            return Err("RandomMobility: min_time must be less than max_time".to_string());
        }
        Ok(RandomMobility { x_range, y_range, min_time, max_time, rng })
    }

    fn sample_point(&mut self) -> Coordinate {
        let x = self.rng.gen_range(-self.x_range..self.x_range);
        let y = self.rng.gen_range(-self.y_range..self.y_range);
        Coordinate::new(x, y)
    }
}

impl MobilityProfile for RandomMobility {
    fn start_position(&mut self) -> Coordinate {
        self.sample_point()
    }

    fn register_movements(&mut self, _current: Coordinate) -> MovementInstruction {
        let target = self.sample_point();
        let min_secs = self.min_time.as_secs_f64();
        let max_secs = self.max_time.as_secs_f64();
        let duration = Duration::from_secs_f64(self.rng.gen_range(min_secs..max_secs));
        MovementInstruction::new(target, duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn rejects_inverted_time_range() {
        let rng = ChaCha8Rng::seed_from_u64(1);
        let result = RandomMobility::new(
            10.0,
            10.0,
            Duration::from_secs(5),
            Duration::from_secs(5),
            rng,
        );
        assert!(result.is_err());
    }

    #[test]
    fn samples_stay_within_rectangle() {
        let rng = ChaCha8Rng::seed_from_u64(42);
        let mut m = RandomMobility::new(
            5.0,
            3.0,
            Duration::from_secs(1),
            Duration::from_secs(2),
            rng,
        )
        .unwrap();
        for _ in 0..50 {
            let instr = m.register_movements(Coordinate::new(0.0, 0.0));
            assert!(instr.target.x.abs() <= 5.0);
            assert!(instr.target.y.abs() <= 3.0);
            assert!(instr.duration >= Duration::from_secs(1) && instr.duration < Duration::from_secs(2));
        }
    }
}
