use mcsim_common::Coordinate;
use mcsim_model::TransmissionBehavior;
use std::time::Duration;

/// Never drops, zero propagation delay.
pub struct NoDropTransmission;

impl TransmissionBehavior for NoDropTransmission {
    fn transmission(&mut self, _origin: Coordinate, _target: Coordinate, _packet: &[u8]) -> (bool, Duration) {
        (false, Duration::ZERO)
    }
}
