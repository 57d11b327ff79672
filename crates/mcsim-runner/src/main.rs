//! CLI driver for the simulation engine (spec §4.10): loads a YAML
//! scenario, attaches a logging-only demo [`Node`] to every configured
//! node (the engine never owns application/routing logic, spec §1), and
//! advances the [`Simulator`] to completion or a caller-given deadline.

use clap::Parser;
use mcsim_common::{EntityTracer, EntityTracerConfig, NodeId, SimTime, TerminateError};
use mcsim_model::{NodeContext, NodeSpec, ScenarioConfig, ScenarioError};
use mcsim_runner::{build_simulation, BuildError, Simulator};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("simulation terminated: {0}")]
    Terminate(#[from] TerminateError),
}

#[derive(Parser)]
#[command(name = "mcsim", about = "Deterministic discrete-event simulator for wireless ad-hoc networks", version)]
struct Cli {
    /// Path to a YAML scenario file.
    #[arg(short, long)]
    scenario: PathBuf,

    /// Virtual run length in milliseconds.
    #[arg(short, long, default_value_t = 60_000)]
    until_ms: u64,

    /// Comma-separated entity trace filter, e.g. "entity:1,entity:2" or
    /// "*" for everyone. Emitted at `trace` level under the
    /// `mcsim::entity_trace` target; unset traces nothing.
    #[arg(long, default_value = "")]
    trace: String,
}

/// A node whose only behaviour is logging its own lifecycle. Stands in
/// for the routing/session/message-sync layer spec.md §1 places out of
/// scope: a real deployment swaps this for its own `Node` impl and wires
/// it in wherever `build_simulation` is called.
struct LoggingNode {
    id: NodeId,
}

impl mcsim_model::Node for LoggingNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn on_start(&mut self, ctx: &mut dyn NodeContext) {
        ctx.log(&format!("node {} started", self.id));
    }

    fn on_connect(&mut self, peer: NodeId, ctx: &mut dyn NodeContext) {
        ctx.log(&format!("node {} connected to {peer}", self.id));
    }

    fn on_disconnect(&mut self, peer: NodeId, ctx: &mut dyn NodeContext) {
        ctx.log(&format!("node {} disconnected from {peer}", self.id));
    }

    fn on_receive_packet(&mut self, from: NodeId, packet: &[u8], ctx: &mut dyn NodeContext) {
        ctx.log(&format!("node {} received {} bytes from {from}", self.id, packet.len()));
    }

    fn on_terminate(&mut self, ctx: &mut dyn NodeContext) {
        ctx.log(&format!("node {} terminating", self.id));
    }
}

fn node_factory(spec: &NodeSpec) -> Box<dyn mcsim_model::Node> {
    Box::new(LoggingNode { id: NodeId(spec.id) })
}

fn run(cli: Cli) -> Result<(), RunError> {
    let config = ScenarioConfig::load(&cli.scenario)?;
    let mut sim: Simulator = build_simulation(&config, node_factory)?
        .with_tracer(EntityTracer::new(EntityTracerConfig::from_spec(&cli.trace)));

    let until = SimTime::from_duration(Duration::from_millis(cli.until_ms));
    sim.advance(until)?;

    tracing::info!(
        nodes = sim.node_count(),
        edges = sim.live_edge_count(),
        sim_time = %sim.now(),
        "run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "simulation terminated with an error");
            ExitCode::FAILURE
        }
    }
}
