use mcsim_common::Coordinate;
use mcsim_model::TransmissionBehavior;
use std::time::Duration;

/// Log-distance path-loss model for BLE: `40 + 25*log10(d)` dB (matches
/// `ble_transmission.go`). Drops whenever that exceeds 78dB; otherwise a
/// fixed 2ms delay.
pub struct BleTransmission;

impl BleTransmission {
    pub fn new() -> Self {
        BleTransmission
    }
}

impl Default for BleTransmission {
    fn default() -> Self {
        BleTransmission::new()
    }
}

impl TransmissionBehavior for BleTransmission {
    fn transmission(&mut self, origin: Coordinate, target: Coordinate, _packet: &[u8]) -> (bool, Duration) {
        let dist = origin.distance(target);
        let pathloss = 40.0 + 25.0 * dist.log10();
        if pathloss > 78.0 {
            (true, Duration::ZERO)
        } else {
            (false, Duration::from_millis(2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_range_never_drops() {
        let mut t = BleTransmission::new();
        let (drop, delay) = t.transmission(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0), &[]);
        assert!(!drop);
        assert_eq!(delay, Duration::from_millis(2));
    }

    #[test]
    fn long_range_drops() {
        let mut t = BleTransmission::new();
        let (drop, _) = t.transmission(Coordinate::new(0.0, 0.0), Coordinate::new(500.0, 0.0), &[]);
        assert!(drop);
    }
}
