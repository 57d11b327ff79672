//! Transmission behaviour implementations (`TransmissionBehavior`): the
//! pluggable drop/delay policy consulted once per `SendPacket`. Ground in
//! the original simulator's `transmission_behavior/*.go`.

mod ble;
mod fixed_delay;
mod long_tail;
mod no_drop;
mod random_drop;

pub use ble::BleTransmission;
pub use fixed_delay::FixedDelayTransmission;
pub use long_tail::LongTailDelayTransmission;
pub use no_drop::NoDropTransmission;
pub use random_drop::RandomDropTransmission;
