//! Metrics infrastructure for the MCSim ad-hoc network simulator.
//!
//! This crate provides metric label helpers and describes all metrics emitted by the
//! simulation engine and its loggers. It re-exports the `metrics` crate for convenience
//! and defines all metrics as structured [`Metric`] constants to avoid typos and provide
//! rich metadata.
//!
//! # Example
//!
//! ```rust,ignore
//! use mcsim_metrics::{MetricLabels, metric_defs, describe_metrics};
//!
//! // Initialize metrics descriptions at startup
//! describe_metrics();
//!
//! // Create labels for a node
//! let labels = MetricLabels::new("7");
//!
//! // Use labels with metrics
//! metrics::counter!(metric_defs::PACKETS_SENT.name, &labels.to_labels()).increment(1);
//! ```
//!
//! # Metric Type
//!
//! The [`Metric`] type provides a structured way to declare metrics with their metadata:
//!
//! ```rust
//! use mcsim_metrics::{Metric, MetricKind};
//! use metrics::Unit;
//!
//! const MY_COUNTER: Metric = Metric::counter("my.counter")
//!     .with_description("A counter metric")
//!     .with_unit(Unit::Count)
//!     .with_labels(&["node", "reason"]);
//!
//! // Register the metric description
//! MY_COUNTER.describe();
//!
//! // Use with metrics crate
//! metrics::counter!(MY_COUNTER.name).increment(1);
//! ```

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A gauge that can go up and down.
    Gauge,
    /// A histogram for recording distributions.
    Histogram,
}

impl MetricKind {
    /// Returns the kind as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric declaration with its metadata.
///
/// This type allows declaring metrics with their name, description, unit, and expected labels
/// in a structured way. Use the const constructors to create metrics at compile time.
///
/// # Example
///
/// ```rust
/// use mcsim_metrics::{Metric, MetricKind};
/// use metrics::Unit;
///
/// const PACKETS_SENT: Metric = Metric::counter("mcsim.packet.sent")
///     .with_description("Total packets sent")
///     .with_unit(Unit::Count)
///     .with_labels(&["node"]);
///
/// // Get the metric name for use with the metrics crate
/// assert_eq!(PACKETS_SENT.name, "mcsim.packet.sent");
/// assert_eq!(PACKETS_SENT.kind, MetricKind::Counter);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "mcsim.packet.sent").
    pub name: &'static str,
    /// The kind of metric (counter, gauge, histogram).
    pub kind: MetricKind,
    /// Human-readable description of the metric.
    pub description: &'static str,
    /// The unit of measurement (optional).
    pub unit: Option<Unit>,
    /// Expected label keys for this metric.
    pub labels: &'static [&'static str],
}

impl Metric {
    /// Creates a new counter metric with the given name.
    pub const fn counter(name: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Counter,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Creates a new gauge metric with the given name.
    pub const fn gauge(name: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Gauge,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Creates a new histogram metric with the given name.
    pub const fn histogram(name: &'static str) -> Self {
        Self {
            name,
            kind: MetricKind::Histogram,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    /// Sets the description for the metric.
    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Sets the unit for the metric.
    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Sets the expected label keys for the metric.
    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the metrics recorder.
    ///
    /// This should be called once at startup for each metric.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Gauge, Some(unit)) => {
                describe_gauge!(self.name, unit, self.description);
            }
            (MetricKind::Gauge, None) => {
                describe_gauge!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }

    /// Returns the unit as a human-readable string.
    pub fn unit_str(&self) -> &'static str {
        match self.unit {
            Some(Unit::Count) => "count",
            Some(Unit::Percent) => "percent",
            Some(Unit::Seconds) => "seconds",
            Some(Unit::Milliseconds) => "milliseconds",
            Some(Unit::Microseconds) => "microseconds",
            Some(Unit::Nanoseconds) => "nanoseconds",
            Some(Unit::Tebibytes) => "tebibytes",
            Some(Unit::Gibibytes) => "gibibytes",
            Some(Unit::Mebibytes) => "mebibytes",
            Some(Unit::Kibibytes) => "kibibytes",
            Some(Unit::Bytes) => "bytes",
            Some(Unit::TerabitsPerSecond) => "terabits/second",
            Some(Unit::GigabitsPerSecond) => "gigabits/second",
            Some(Unit::MegabitsPerSecond) => "megabits/second",
            Some(Unit::KilobitsPerSecond) => "kilobits/second",
            Some(Unit::BitsPerSecond) => "bits/second",
            Some(Unit::CountPerSecond) => "count/second",
            None => "",
        }
    }
}

/// All metric definitions for the simulator.
///
/// Each metric is defined as a const [`Metric`] with its name, kind, description,
/// unit, and expected labels. These mirror the quantities the original Go
/// simulator's `StatisticsLogger` accumulated by hand, expressed through the
/// `metrics` facade instead of ad-hoc counters so any recorder (Prometheus,
/// a test harness) can observe them uniformly.
pub mod metric_defs {
    use super::{Metric, Unit};

    /// Standard label present on every node-scoped metric: the node's current
    /// public `NodeId`, stringified.
    pub const STANDARD_LABELS: &[&str] = &["node"];

    /// Reason label used on drop-related counters.
    ///
    /// One of `buffer_full`, `behavior_drop`, `edge_broken`.
    pub const DROP_REASON_LABELS: &[&str] = &["reason"];

    // ========================================================================
    // Transmission pipeline metrics (spec §4.4)
    // ========================================================================

    /// Packets that entered the transmission pipeline (passed the buffer check).
    pub const PACKETS_SENT: Metric = Metric::counter("mcsim.packet.sent")
        .with_description("Packets accepted into the transmission pipeline")
        .with_unit(Unit::Count)
        .with_labels(STANDARD_LABELS);

    /// Packets successfully delivered to their target's application layer.
    pub const PACKETS_DELIVERED: Metric = Metric::counter("mcsim.packet.delivered")
        .with_description("Packets delivered to the target application")
        .with_unit(Unit::Count)
        .with_labels(STANDARD_LABELS);

    /// Packets dropped, broken down by reason (buffer full, transmission
    /// behaviour drop, or edge broken between send and receive).
    pub const PACKETS_DROPPED: Metric = Metric::counter("mcsim.packet.dropped")
        .with_description("Packets dropped before delivery")
        .with_unit(Unit::Count)
        .with_labels(DROP_REASON_LABELS);

    /// Size in bytes of packets passed to `SendPacket`.
    pub const PACKET_SIZE: Metric = Metric::histogram("mcsim.packet.size_bytes")
        .with_description("Size of packets passed to SendPacket")
        .with_unit(Unit::Bytes);

    /// End-to-end delivery latency (enqueue to delivery) in microseconds.
    pub const DELIVERY_LATENCY: Metric = Metric::histogram("mcsim.packet.delivery_latency_us")
        .with_description("Virtual time from SendPacket to OnReceivePacket")
        .with_unit(Unit::Microseconds);

    /// Current outbound buffer occupancy for a node.
    pub const BUFFER_OCCUPANCY: Metric = Metric::gauge("mcsim.node.buffer_occupancy")
        .with_description("Current outbound buffer occupancy")
        .with_unit(Unit::Count)
        .with_labels(STANDARD_LABELS);

    // ========================================================================
    // Topology metrics (spec §4.2, §4.6)
    // ========================================================================

    /// Connect events dispatched.
    pub const CONNECT_EVENTS: Metric = Metric::counter("mcsim.topology.connect")
        .with_description("Connect events dispatched")
        .with_unit(Unit::Count);

    /// Disconnect events dispatched.
    pub const DISCONNECT_EVENTS: Metric = Metric::counter("mcsim.topology.disconnect")
        .with_description("Disconnect events dispatched")
        .with_unit(Unit::Count);

    /// Number of live peer edges, sampled after each mobility tick.
    pub const LIVE_EDGES: Metric = Metric::gauge("mcsim.topology.live_edges")
        .with_description("Number of live peer edges")
        .with_unit(Unit::Count);

    // ========================================================================
    // Scheduler / performance metrics (ambient)
    // ========================================================================

    /// Wall-clock time to process one mobility tick (Timestep dispatch).
    pub const TIMESTEP_DURATION: Metric = Metric::histogram("mcsim.scheduler.timestep_duration_us")
        .with_description("Wall-clock time spent processing one Timestep dispatch")
        .with_unit(Unit::Microseconds);

    /// Number of events pending in the event queue, sampled periodically.
    pub const QUEUE_DEPTH: Metric = Metric::gauge("mcsim.scheduler.queue_depth")
        .with_description("Number of events pending in the event queue")
        .with_unit(Unit::Count);

    /// Returns a slice of all defined metrics.
    pub const ALL: &[&Metric] = &[
        &PACKETS_SENT,
        &PACKETS_DELIVERED,
        &PACKETS_DROPPED,
        &PACKET_SIZE,
        &DELIVERY_LATENCY,
        &BUFFER_OCCUPANCY,
        &CONNECT_EVENTS,
        &DISCONNECT_EVENTS,
        &LIVE_EDGES,
        &TIMESTEP_DURATION,
        &QUEUE_DEPTH,
    ];
}

/// Metric labels identifying the node (and, optionally, ad-hoc groupings) a
/// sample belongs to.
///
/// # Example
///
/// ```rust
/// use mcsim_metrics::MetricLabels;
///
/// let labels = MetricLabels::new("7")
///     .with_groups(vec!["region_a".to_string()]);
///
/// let label_vec = labels.to_labels();
/// assert_eq!(label_vec.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MetricLabels {
    /// The node's current public `NodeId`, stringified.
    pub node: String,
    /// Custom grouping tags (scenario-defined, e.g. a named cluster).
    pub groups: Vec<String>,
}

impl MetricLabels {
    /// Creates a new `MetricLabels` instance for the given node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcsim_metrics::MetricLabels;
    ///
    /// let labels = MetricLabels::new("7");
    /// assert_eq!(labels.node, "7");
    /// ```
    pub fn new(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            groups: Vec::new(),
        }
    }

    /// Adds custom grouping tags to the labels.
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Converts the labels to the metrics crate label format.
    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        let mut labels = vec![("node", self.node.clone())];

        if !self.groups.is_empty() {
            labels.push(("groups", self.groups.join(",")));
        }

        labels
    }

    /// Returns labels with additional key-value pairs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mcsim_metrics::MetricLabels;
    ///
    /// let labels = MetricLabels::new("7");
    /// let extended = labels.with(&[("reason", "buffer_full".to_string())]);
    ///
    /// assert!(extended.iter().any(|(k, v)| *k == "reason" && v == "buffer_full"));
    /// ```
    pub fn with(&self, extra: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut labels = self.to_labels();
        labels.extend_from_slice(extra);
        labels
    }
}

/// Describes all metrics used in the simulator.
///
/// This function should be called once at startup to register all metric descriptions
/// with the metrics recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}
