use mcsim_common::Coordinate;
use mcsim_model::TransmissionBehavior;
use std::time::Duration;

/// Never drops, constant propagation delay.
pub struct FixedDelayTransmission {
    pub delay: Duration,
}

impl FixedDelayTransmission {
    pub fn new(delay: Duration) -> Self {
        FixedDelayTransmission { delay }
    }
}

impl TransmissionBehavior for FixedDelayTransmission {
    fn transmission(&mut self, _origin: Coordinate, _target: Coordinate, _packet: &[u8]) -> (bool, Duration) {
        (false, self.delay)
    }
}
