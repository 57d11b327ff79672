//! The per-timestep mobility and topology-reconciliation pass (spec §4.6,
//! C7): advance every node along its current movement instruction, then
//! re-query the spatial index to synchronously create/remove edge-scratch
//! records and schedule the Connect/Disconnect events that make the change
//! visible to application code ten milliseconds later.

use mcsim_common::{InternalId, TIMESTEP_PERIOD};
use std::collections::HashSet;

use crate::simulator::Simulator;

fn canonical(a: InternalId, b: InternalId) -> (InternalId, InternalId) {
    if a.0 <= b.0 { (a, b) } else { (b, a) }
}

impl Simulator {
    pub(crate) fn mobility_tick(&mut self) {
        self.advance_positions();
        self.reconcile_topology();
    }

    /// Moves every node along its current instruction, pulling a fresh one
    /// from its mobility profile once the current one runs out. Velocity is
    /// recomputed from the remaining distance and remaining time on every
    /// tick rather than cached, so a profile that keeps returning the same
    /// target produces a straight line while one that changes its mind
    /// mid-flight bends smoothly instead of overshooting.
    fn advance_positions(&mut self) {
        let ids: Vec<InternalId> = self.nodes.iter().map(|n| n.internal_id).collect();

        for id in ids {
            let node = self.node_mut(id);

            if node.remaining.is_zero() {
                let current = node.position;
                let instruction = node.mobility.register_movements(current);
                node.remaining = instruction.duration;
                node.instruction = instruction;
                if node.remaining.is_zero() {
                    // A profile that hands back a zero-duration instruction
                    // (e.g. already standing on its target) stays put this
                    // tick; it'll be asked again next tick.
                    continue;
                }
            }

            let node = self.node_mut(id);
            let remaining_secs = node.remaining.as_secs_f64();
            let step_secs = TIMESTEP_PERIOD.as_secs_f64();
            let target = node.instruction.target;
            let current = node.position;

            let new_pos = if remaining_secs <= step_secs {
                target
            } else {
                let vx = (target.x - current.x) / remaining_secs;
                let vy = (target.y - current.y) / remaining_secs;
                mcsim_common::Coordinate::new(current.x + vx * step_secs, current.y + vy * step_secs)
            };

            node.remaining = node.remaining.saturating_sub(TIMESTEP_PERIOD);
            node.position = new_pos;
            self.region.move_node(id, new_pos);
        }
    }

    /// Queries the region map for every node and synchronously updates the
    /// edge-scratch table, scheduling the matching Connect/Disconnect events
    /// ten milliseconds out. A pair found from both ends would otherwise be
    /// scheduled twice; `seen` collapses the two A-to-B and B-to-A
    /// observations into one event per unordered pair per tick.
    fn reconcile_topology(&mut self) {
        let ids: Vec<InternalId> = self.nodes.iter().map(|n| n.internal_id).collect();
        let fire_at = self.clock + TIMESTEP_PERIOD;

        let mut connected: HashSet<(InternalId, InternalId)> = HashSet::new();
        let mut disconnected: HashSet<(InternalId, InternalId)> = HashSet::new();

        for &a in &ids {
            let (within_range, ex_peers) = {
                let nodes = &self.nodes;
                let node_index = &self.node_index;
                self.region.query(a, |x, y| {
                    node_index.get(&x).map(|&idx| nodes[idx].has_peer(y)).unwrap_or(false)
                })
            };

            for b in ex_peers {
                let key = canonical(a, b);
                if !disconnected.insert(key) {
                    continue;
                }
                self.edges.remove(a, b);
                self.push_event(
                    fire_at,
                    mcsim_common::EventKind::Disconnect { a: key.0, b: key.1 },
                );
            }

            for b in within_range {
                let key = canonical(a, b);
                if !connected.insert(key) {
                    continue;
                }
                self.edges.insert(a, b);
                self.push_event(fire_at, mcsim_common::EventKind::Connect { a: key.0, b: key.1 });
            }
        }
    }
}
