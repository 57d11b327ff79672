//! Entity-level trace logging for simulation debugging.
//!
//! This is a generalized tracing framework for simulation entities,
//! separate from the `Logger` trait: it allows detailed tracing of a
//! specific node's behavior during development without requiring every
//! logger implementation to know about it.
//!
//! ```rust,ignore
//! use mcsim_common::entity_tracer::{EntityTracer, EntityTracerConfig, TraceEvent};
//!
//! let config = EntityTracerConfig::from_spec("Alice,Bob,entity:42");
//! let tracer = EntityTracer::new(config);
//!
//! if tracer.should_trace_name("Alice") {
//!     tracer.log(TraceEvent::custom(Some("Alice"), id, sim_time, "state changed"));
//! }
//! ```

use crate::{EventKind, InternalId, SimTime};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Categories of trace events for filtering and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceCategory {
    EventReceived,
    EventEmitted,
    StateChange,
    Operation,
    Custom,
}

impl fmt::Display for TraceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceCategory::EventReceived => write!(f, "EVENT_RX"),
            TraceCategory::EventEmitted => write!(f, "EVENT_TX"),
            TraceCategory::StateChange => write!(f, "STATE"),
            TraceCategory::Operation => write!(f, "OP"),
            TraceCategory::Custom => write!(f, "TRACE"),
        }
    }
}

/// A trace event record.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub entity_name: Option<String>,
    pub entity_id: InternalId,
    pub sim_time: SimTime,
    pub category: TraceCategory,
    pub description: String,
    pub details: Vec<(String, String)>,
}

impl TraceEvent {
    pub fn event_dispatched(
        entity_name: Option<&str>,
        entity_id: InternalId,
        sim_time: SimTime,
        kind: &EventKind,
    ) -> Self {
        TraceEvent {
            entity_name: entity_name.map(str::to_string),
            entity_id,
            sim_time,
            category: TraceCategory::EventReceived,
            description: kind.tag().to_string(),
            details: Vec::new(),
        }
    }

    pub fn state_change(
        entity_name: Option<&str>,
        entity_id: InternalId,
        sim_time: SimTime,
        description: impl Into<String>,
    ) -> Self {
        TraceEvent {
            entity_name: entity_name.map(str::to_string),
            entity_id,
            sim_time,
            category: TraceCategory::StateChange,
            description: description.into(),
            details: Vec::new(),
        }
    }

    pub fn operation(
        entity_name: Option<&str>,
        entity_id: InternalId,
        sim_time: SimTime,
        description: impl Into<String>,
    ) -> Self {
        TraceEvent {
            entity_name: entity_name.map(str::to_string),
            entity_id,
            sim_time,
            category: TraceCategory::Operation,
            description: description.into(),
            details: Vec::new(),
        }
    }

    pub fn custom(
        entity_name: Option<&str>,
        entity_id: InternalId,
        sim_time: SimTime,
        description: impl Into<String>,
    ) -> Self {
        TraceEvent {
            entity_name: entity_name.map(str::to_string),
            entity_id,
            sim_time,
            category: TraceCategory::Custom,
            description: description.into(),
            details: Vec::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }
}

/// Configuration for entity tracing, parsed from a `--trace` CLI spec.
#[derive(Debug, Clone)]
pub struct EntityTracerConfig {
    pub traced_names: HashSet<String>,
    pub traced_ids: HashSet<u64>,
}

impl EntityTracerConfig {
    pub fn none() -> Self {
        EntityTracerConfig {
            traced_names: HashSet::new(),
            traced_ids: HashSet::new(),
        }
    }

    /// Parses a comma-separated spec: bare tokens trace by node name,
    /// `entity:N` traces by `InternalId`, and `*` traces everything.
    pub fn from_spec(spec: &str) -> Self {
        if spec.is_empty() {
            return Self::none();
        }

        let mut traced_names = HashSet::new();
        let mut traced_ids = HashSet::new();

        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if part == "*" {
                traced_names.insert("*".to_string());
            } else if let Some(id_str) = part.strip_prefix("entity:") {
                if let Ok(id) = id_str.parse::<u64>() {
                    traced_ids.insert(id);
                }
            } else {
                traced_names.insert(part.to_string());
            }
        }

        EntityTracerConfig { traced_names, traced_ids }
    }

    pub fn is_enabled(&self) -> bool {
        !self.traced_names.is_empty() || !self.traced_ids.is_empty()
    }

    pub fn traces_all(&self) -> bool {
        self.traced_names.contains("*")
    }

    pub fn should_trace_name(&self, name: &str) -> bool {
        self.is_enabled() && (self.traces_all() || self.traced_names.contains(name))
    }

    pub fn should_trace_id(&self, id: InternalId) -> bool {
        self.is_enabled() && (self.traces_all() || self.traced_ids.contains(&id.0))
    }

    pub fn should_trace(&self, name: Option<&str>, id: InternalId) -> bool {
        if !self.is_enabled() {
            return false;
        }
        if self.traces_all() {
            return true;
        }
        if let Some(n) = name {
            if self.traced_names.contains(n) {
                return true;
            }
        }
        self.traced_ids.contains(&id.0)
    }
}

impl Default for EntityTracerConfig {
    fn default() -> Self {
        Self::none()
    }
}

/// Shared, cloneable tracer handed to every node so each can cheaply check
/// whether it's being watched before paying for a formatted trace line.
#[derive(Clone)]
pub struct EntityTracer {
    config: Arc<EntityTracerConfig>,
}

impl EntityTracer {
    pub fn new(config: EntityTracerConfig) -> Self {
        EntityTracer { config: Arc::new(config) }
    }

    pub fn disabled() -> Self {
        EntityTracer::new(EntityTracerConfig::none())
    }

    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    pub fn should_trace_name(&self, name: &str) -> bool {
        self.config.should_trace_name(name)
    }

    pub fn should_trace_id(&self, id: InternalId) -> bool {
        self.config.should_trace_id(id)
    }

    pub fn should_trace(&self, name: Option<&str>, id: InternalId) -> bool {
        self.config.should_trace(name, id)
    }

    pub fn config(&self) -> &EntityTracerConfig {
        &self.config
    }

    pub fn log(&self, event: TraceEvent) {
        if !self.config.should_trace(event.entity_name.as_deref(), event.entity_id) {
            return;
        }
        self.output_trace(&event);
    }

    fn output_trace(&self, event: &TraceEvent) {
        let entity_str = match &event.entity_name {
            Some(name) => format!("{} ({})", name, event.entity_id),
            None => format!("{}", event.entity_id),
        };

        let details_str = if event.details.is_empty() {
            String::new()
        } else {
            let parts: Vec<String> = event.details.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!(" [{}]", parts.join(", "))
        };

        tracing::trace!(
            target: "mcsim::entity_trace",
            "{} @ {}: {} {}{}",
            entity_str,
            event.sim_time,
            event.category,
            event.description,
            details_str,
        );
    }
}

impl Default for EntityTracer {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_spec_empty() {
        let config = EntityTracerConfig::from_spec("");
        assert!(!config.is_enabled());
    }

    #[test]
    fn config_from_spec_names() {
        let config = EntityTracerConfig::from_spec("Alice,Bob");
        assert!(config.should_trace_name("Alice"));
        assert!(config.should_trace_name("Bob"));
        assert!(!config.should_trace_name("Charlie"));
    }

    #[test]
    fn config_from_spec_ids() {
        let config = EntityTracerConfig::from_spec("entity:1,entity:2");
        assert!(config.should_trace_id(InternalId(1)));
        assert!(!config.should_trace_id(InternalId(3)));
    }

    #[test]
    fn config_from_spec_all() {
        let config = EntityTracerConfig::from_spec("*");
        assert!(config.traces_all());
        assert!(config.should_trace_name("AnyName"));
        assert!(config.should_trace_id(InternalId(999)));
    }

    #[test]
    fn tracer_should_trace_mixed() {
        let config = EntityTracerConfig::from_spec("Alice,entity:42");
        let tracer = EntityTracer::new(config);
        assert!(tracer.should_trace(Some("Alice"), InternalId(1)));
        assert!(tracer.should_trace(None, InternalId(42)));
        assert!(!tracer.should_trace(Some("Bob"), InternalId(1)));
    }
}
