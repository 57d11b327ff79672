use mcsim_common::Coordinate;
use mcsim_model::TransmissionBehavior;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Bernoulli drop at `drop_chance`; constant delay when not dropped.
pub struct RandomDropTransmission {
    pub drop_chance: f64,
    pub delay: Duration,
    rng: ChaCha8Rng,
}

impl RandomDropTransmission {
    pub fn new(drop_chance: f64, delay: Duration, rng: ChaCha8Rng) -> Self {
        RandomDropTransmission { drop_chance, delay, rng }
    }
}

impl TransmissionBehavior for RandomDropTransmission {
    fn transmission(&mut self, _origin: Coordinate, _target: Coordinate, _packet: &[u8]) -> (bool, Duration) {
        if self.rng.gen::<f64>() < self.drop_chance {
            (true, self.delay)
        } else {
            (false, self.delay)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn never_drops_at_zero_chance() {
        let rng = ChaCha8Rng::seed_from_u64(3);
        let mut t = RandomDropTransmission::new(0.0, Duration::from_millis(5), rng);
        for _ in 0..20 {
            let (drop, _) = t.transmission(Coordinate::default(), Coordinate::default(), &[]);
            assert!(!drop);
        }
    }

    #[test]
    fn always_drops_at_full_chance() {
        let rng = ChaCha8Rng::seed_from_u64(3);
        let mut t = RandomDropTransmission::new(1.0, Duration::from_millis(5), rng);
        let (drop, _) = t.transmission(Coordinate::default(), Coordinate::default(), &[]);
        assert!(drop);
    }
}
