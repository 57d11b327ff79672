//! Turns a [`ScenarioConfig`] into a wired [`Simulator`] (spec §4.9, the
//! spiritual descendant of the teacher's `build_model.rs`).
//!
//! The core has no opinion on node application logic (spec §1 "out of
//! scope"), so `ScenarioConfig` never names one; callers supply a
//! `node_factory` that turns each configured `NodeId` into the
//! `Box<dyn Node>` that will actually run on top of the engine. The
//! `mcsim` CLI binary passes a small logging-only demo node; a real
//! embedder would pass their own routing/session layer.

use mcsim_common::{Coordinate, MovementInstruction, NodeId};
use mcsim_mobility::{LinearMobility, RandomMobility, RandomWaypointMobility, StationaryMobility, WaypointMobility};
use mcsim_model::{
    LoggerSpec, MobilityProfile, MobilitySpec, Node, NodeSpec, ScenarioConfig, TransmissionBehavior,
    TransmissionSpec,
};
use mcsim_transmission::{BleTransmission, FixedDelayTransmission, LongTailDelayTransmission, NoDropTransmission, RandomDropTransmission};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use thiserror::Error;

use crate::Simulator;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("node {node_id}: {reason}")]
    InvalidMobility { node_id: i64, reason: String },
}

/// Derives a node-private PRNG stream from the scenario seed and the
/// node's configured id, so re-running the same scenario always hands
/// each node's mobility/transmission profile the same sequence of draws
/// regardless of what order nodes happen to be constructed in (spec §5).
fn node_rng(seed: u64, node_id: i64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed ^ (node_id as u64).wrapping_mul(0x9E3779B97F4A7C15))
}

fn build_mobility(spec: &MobilitySpec, rng: ChaCha8Rng) -> Result<Box<dyn MobilityProfile>, String> {
    match spec {
        MobilitySpec::Stationary { x, y } => Ok(Box::new(StationaryMobility::new(*x, *y))),
        MobilitySpec::Linear { from, to, leg_duration_ms } => Ok(Box::new(LinearMobility::new(
            Coordinate::new(from.0, from.1),
            Coordinate::new(to.0, to.1),
            Duration::from_millis(*leg_duration_ms),
        ))),
        MobilitySpec::Random { min_x, max_x, min_y, max_y, min_time_ms, max_time_ms } => {
            let x_range = (max_x - min_x).abs() / 2.0;
            let y_range = (max_y - min_y).abs() / 2.0;
            RandomMobility::new(
                x_range,
                y_range,
                Duration::from_millis(*min_time_ms),
                Duration::from_millis(*max_time_ms),
                rng,
            )
            .map(|m| Box::new(m) as Box<dyn MobilityProfile>)
        }
        MobilitySpec::RandomWaypoint {
            min_x, max_x, min_y, max_y, min_speed_mps: _, max_speed_mps, min_pause_ms: _, max_pause_ms,
        } => {
            let x_range = (max_x - min_x).abs() / 2.0;
            let y_range = (max_y - min_y).abs() / 2.0;
            Ok(Box::new(RandomWaypointMobility::new(
                x_range,
                y_range,
                *max_speed_mps,
                Duration::from_millis(*max_pause_ms),
                rng,
            )))
        }
        MobilitySpec::Waypoint { points, leg_duration_ms } => {
            let duration = Duration::from_millis(*leg_duration_ms);
            let instructions = points
                .iter()
                .map(|(x, y)| MovementInstruction::new(Coordinate::new(*x, *y), duration))
                .collect();
            Ok(Box::new(WaypointMobility::new(instructions)))
        }
    }
}

fn build_transmission(spec: &TransmissionSpec, rng: ChaCha8Rng) -> Box<dyn TransmissionBehavior> {
    match spec {
        TransmissionSpec::NoDrop => Box::new(NoDropTransmission),
        TransmissionSpec::FixedDelay { delay_ms } => {
            Box::new(FixedDelayTransmission::new(Duration::from_millis(*delay_ms)))
        }
        TransmissionSpec::RandomDrop { drop_chance, delay_ms } => {
            Box::new(RandomDropTransmission::new(*drop_chance, Duration::from_millis(*delay_ms), rng))
        }
        TransmissionSpec::LongTailDelay { alpha, x_m_ms, drop_chance } => {
            Box::new(LongTailDelayTransmission::new(*alpha, *x_m_ms, *drop_chance, rng))
        }
        TransmissionSpec::Ble => Box::new(BleTransmission::new()),
    }
}

fn build_logger(spec: &LoggerSpec) -> Box<dyn mcsim_model::Logger> {
    match spec {
        LoggerSpec::Standard => Box::new(mcsim_loggers::StandardLogger::new()),
        LoggerSpec::Statistics => Box::new(mcsim_loggers::StatisticsLogger::new()),
        LoggerSpec::Pcap { path } => Box::new(mcsim_loggers::PcapCaptureLogger::new(path.clone())),
    }
}

/// Builds a [`Simulator`] from `config`, constructing each node's
/// mobility/transmission collaborators from its [`NodeSpec`] and its
/// application object from `node_factory`.
pub fn build_simulation<F>(config: &ScenarioConfig, node_factory: F) -> Result<Simulator, BuildError>
where
    F: Fn(&NodeSpec) -> Box<dyn Node>,
{
    let sim_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let loggers: Vec<Box<dyn mcsim_model::Logger>> = config.loggers.iter().map(build_logger).collect();

    let mut sim = Simulator::new(
        config.radio_range_m,
        Duration::from_millis(config.transmission_delay_ms),
        sim_rng,
        loggers,
    )
    .with_default_buffer_size(config.default_buffer_size);

    for spec in &config.nodes {
        let mobility = build_mobility(&spec.mobility, node_rng(config.seed, spec.id))
            .map_err(|reason| BuildError::InvalidMobility { node_id: spec.id, reason })?;
        let transmission = build_transmission(&spec.transmission, node_rng(config.seed, spec.id.wrapping_add(1)));
        let node = node_factory(spec);
        debug_assert_eq!(node.id(), NodeId(spec.id), "node_factory must return a Node with the spec's id");

        sim.add_node(
            node,
            mobility,
            transmission,
            Duration::from_millis(spec.initial_delay_ms),
            spec.buffer_size,
        );
    }

    Ok(sim)
}
