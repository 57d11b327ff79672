use mcsim_common::Coordinate;
use mcsim_model::TransmissionBehavior;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Pareto};
use std::time::Duration;

/// Bernoulli drop at `drop_chance`; otherwise a Pareto(`alpha`, `x_m`)
/// distributed delay. The original (`long_tail_delay.go`) hand-rolled this
/// by scaling an exponential draw (`x_m * exp(Exp(1) / alpha)`), which is
/// exactly the inverse-transform construction of a Pareto variate --
/// `rand_distr::Pareto` gives the same distribution without re-deriving it.
pub struct LongTailDelayTransmission {
    pub alpha: f64,
    pub x_m_ms: f64,
    pub drop_chance: f64,
    rng: ChaCha8Rng,
}

impl LongTailDelayTransmission {
    pub fn new(alpha: f64, x_m_ms: f64, drop_chance: f64, rng: ChaCha8Rng) -> Self {
        LongTailDelayTransmission { alpha, x_m_ms, drop_chance, rng }
    }
}

impl TransmissionBehavior for LongTailDelayTransmission {
    fn transmission(&mut self, _origin: Coordinate, _target: Coordinate, _packet: &[u8]) -> (bool, Duration) {
        if self.rng.gen::<f64>() < self.drop_chance {
            return (true, Duration::ZERO);
        }
        let pareto = Pareto::new(self.x_m_ms, self.alpha).expect("x_m_ms and alpha must be positive");
        let delay_ms = pareto.sample(&mut self.rng);
        (false, Duration::from_secs_f64(delay_ms / 1000.0))
    }
}
