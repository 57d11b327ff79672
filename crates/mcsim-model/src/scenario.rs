//! YAML scenario loading (spec §4.9, ambient configuration surface).
//!
//! A scenario names the radio range, the minimum per-origin transmission
//! gap, the PRNG seed, one entry per node (mobility profile + parameters,
//! transmission behaviour + parameters, optional buffer-size override),
//! and which logger implementations to attach. Malformed scenarios always
//! surface a typed [`ScenarioError`]; the engine itself never panics on
//! bad input, only on its own invariant violations.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid mobility configuration for node {node_id}: {reason}")]
    InvalidMobility { node_id: i64, reason: String },

    #[error("invalid transmission configuration for node {node_id}: {reason}")]
    InvalidTransmission { node_id: i64, reason: String },

    #[error("duplicate node id {0} in scenario")]
    DuplicateNodeId(i64),
}

fn default_buffer_size() -> usize {
    400
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    pub seed: u64,
    pub radio_range_m: f64,
    pub transmission_delay_ms: u64,
    #[serde(default = "default_buffer_size")]
    pub default_buffer_size: usize,
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub loggers: Vec<LoggerSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub id: i64,
    pub mobility: MobilitySpec,
    #[serde(default)]
    pub transmission: TransmissionSpec,
    #[serde(default)]
    pub buffer_size: Option<usize>,
    #[serde(default)]
    pub initial_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MobilitySpec {
    Stationary {
        x: f64,
        y: f64,
    },
    Linear {
        from: (f64, f64),
        to: (f64, f64),
        leg_duration_ms: u64,
    },
    Random {
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        min_time_ms: u64,
        max_time_ms: u64,
    },
    RandomWaypoint {
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
        min_speed_mps: f64,
        max_speed_mps: f64,
        min_pause_ms: u64,
        max_pause_ms: u64,
    },
    Waypoint {
        points: Vec<(f64, f64)>,
        leg_duration_ms: u64,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransmissionSpec {
    #[default]
    NoDrop,
    FixedDelay {
        delay_ms: u64,
    },
    RandomDrop {
        drop_chance: f64,
        delay_ms: u64,
    },
    LongTailDelay {
        alpha: f64,
        x_m_ms: f64,
        drop_chance: f64,
    },
    Ble,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoggerSpec {
    Standard,
    Statistics,
    Pcap { path: String },
}

impl ScenarioConfig {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(ScenarioError::DuplicateNodeId(node.id));
            }
            if let MobilitySpec::Random { min_time_ms, max_time_ms, .. } = &node.mobility {
                if min_time_ms >= max_time_ms {
                    return Err(ScenarioError::InvalidMobility {
                        node_id: node.id,
                        reason: "min_time_ms must be strictly less than max_time_ms".into(),
                    });
                }
            }
            if let TransmissionSpec::RandomDrop { drop_chance, .. }
            | TransmissionSpec::LongTailDelay { drop_chance, .. } = &node.transmission
            {
                if !(0.0..=1.0).contains(drop_chance) {
                    return Err(ScenarioError::InvalidTransmission {
                        node_id: node.id,
                        reason: "drop_chance must be within [0, 1]".into(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
seed: 42
radio_range_m: 50.0
transmission_delay_ms: 10
nodes:
  - id: 1
    mobility:
      kind: stationary
      x: 0.0
      y: 0.0
  - id: 2
    mobility:
      kind: stationary
      x: 10.0
      y: 0.0
"#;

    #[test]
    fn parses_minimal_scenario() {
        let config = ScenarioConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.nodes.len(), 2);
        assert_eq!(config.default_buffer_size, 400);
    }

    #[test]
    fn rejects_duplicate_node_ids() {
        let text = MINIMAL.replace("id: 2", "id: 1");
        let err = ScenarioConfig::from_yaml_str(&text).unwrap_err();
        assert!(matches!(err, ScenarioError::DuplicateNodeId(1)));
    }

    #[test]
    fn rejects_inverted_random_time_range() {
        let text = r#"
seed: 1
radio_range_m: 50.0
transmission_delay_ms: 10
nodes:
  - id: 1
    mobility:
      kind: random
      min_x: 0.0
      max_x: 10.0
      min_y: 0.0
      max_y: 10.0
      min_time_ms: 5000
      max_time_ms: 1000
"#;
        let err = ScenarioConfig::from_yaml_str(text).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidMobility { .. }));
    }
}
