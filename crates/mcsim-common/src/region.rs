//! Spatial index: a sparse grid of cells sized to the radio range, used to
//! find candidate neighbours without an O(n^2) scan over every node pair.

use crate::{Coordinate, InternalId};
use std::collections::HashMap;

type CellCoord = (i64, i64);

fn cell_of(pos: Coordinate, region_size: f64) -> CellCoord {
    ((pos.x / region_size).floor() as i64, (pos.y / region_size).floor() as i64)
}

/// Maps a grid cell to the nodes currently positioned in it. The cell
/// edge length equals the nominal radio range; two points within range
/// of each other can never be more than one cell apart in either axis, so
/// a 3x3 block around a node's own cell is always a complete candidate
/// set.
#[derive(Debug, Default)]
pub struct RegionMap {
    cells: HashMap<CellCoord, Vec<InternalId>>,
    nodes: HashMap<InternalId, (CellCoord, Coordinate)>,
    range_squared: f64,
    region_size: f64,
}

impl RegionMap {
    pub fn new(range_m: f64) -> Self {
        RegionMap {
            cells: HashMap::new(),
            nodes: HashMap::new(),
            range_squared: range_m * range_m,
            region_size: range_m,
        }
    }

    pub fn range_squared(&self) -> f64 {
        self.range_squared
    }

    pub fn position_of(&self, id: InternalId) -> Option<Coordinate> {
        self.nodes.get(&id).map(|(_, pos)| *pos)
    }

    pub fn add_node(&mut self, id: InternalId, pos: Coordinate) {
        let cell = cell_of(pos, self.region_size);
        self.cells.entry(cell).or_default().push(id);
        self.nodes.insert(id, (cell, pos));
    }

    pub fn remove_node(&mut self, id: InternalId) {
        if let Some((cell, _)) = self.nodes.remove(&id) {
            if let Some(bucket) = self.cells.get_mut(&cell) {
                bucket.retain(|&x| x != id);
                if bucket.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    /// Moves a node to a new position, relocating it between cells only
    /// if the new position maps to a different cell.
    pub fn move_node(&mut self, id: InternalId, new_pos: Coordinate) {
        let new_cell = cell_of(new_pos, self.region_size);
        match self.nodes.get(&id) {
            Some((old_cell, _)) if *old_cell == new_cell => {
                self.nodes.insert(id, (new_cell, new_pos));
            }
            _ => {
                self.remove_node(id);
                self.add_node(id, new_pos);
            }
        }
    }

    /// Queries the 3x3 block around `id`'s cell, partitioning the other
    /// nodes found there into `within_range` (strictly closer than the
    /// radio range and not already a peer) and `ex_peers` (a peer, now at
    /// or beyond range, where the reverse peer relation also holds).
    ///
    /// `is_peer(a, b)` must report whether `a`'s peer table contains `b`.
    pub fn query<F>(&self, id: InternalId, is_peer: F) -> (Vec<InternalId>, Vec<InternalId>)
    where
        F: Fn(InternalId, InternalId) -> bool,
    {
        let mut within_range = Vec::new();
        let mut ex_peers = Vec::new();

        let (cell, pos) = match self.nodes.get(&id) {
            Some(v) => *v,
            None => return (within_range, ex_peers),
        };

        for dx in -1..=1 {
            for dy in -1..=1 {
                let probe = (cell.0 + dx, cell.1 + dy);
                let Some(bucket) = self.cells.get(&probe) else { continue };
                for &other in bucket {
                    if other == id {
                        continue;
                    }
                    let Some(other_pos) = self.position_of(other) else { continue };
                    let d2 = pos.distance_squared(other_pos);
                    let peer = is_peer(id, other);
                    if d2 < self.range_squared && !peer {
                        within_range.push(other);
                    } else if peer && d2 >= self.range_squared && is_peer(other, id) {
                        ex_peers.push(other);
                    }
                }
            }
        }

        (within_range, ex_peers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_node_in_adjacent_cell() {
        let mut map = RegionMap::new(10.0);
        map.add_node(InternalId(1), Coordinate::new(0.0, 0.0));
        map.add_node(InternalId(2), Coordinate::new(5.0, 0.0));

        let (within, ex) = map.query(InternalId(1), |_, _| false);
        assert_eq!(within, vec![InternalId(2)]);
        assert!(ex.is_empty());
    }

    #[test]
    fn excludes_nodes_outside_range() {
        let mut map = RegionMap::new(10.0);
        map.add_node(InternalId(1), Coordinate::new(0.0, 0.0));
        map.add_node(InternalId(2), Coordinate::new(100.0, 100.0));

        let (within, _) = map.query(InternalId(1), |_, _| false);
        assert!(within.is_empty());
    }

    #[test]
    fn ex_peer_requires_symmetric_peer_relation() {
        let mut map = RegionMap::new(10.0);
        map.add_node(InternalId(1), Coordinate::new(0.0, 0.0));
        map.add_node(InternalId(2), Coordinate::new(50.0, 0.0));

        // Only node 1 thinks node 2 is a peer; node 2 disagrees. Not a
        // sound ex-peer because the reverse relation doesn't hold.
        let (_, ex) = map.query(InternalId(1), |a, b| a == InternalId(1) && b == InternalId(2));
        assert!(ex.is_empty());
    }

    #[test]
    fn ex_peer_detected_when_symmetric() {
        let mut map = RegionMap::new(10.0);
        map.add_node(InternalId(1), Coordinate::new(0.0, 0.0));
        map.add_node(InternalId(2), Coordinate::new(50.0, 0.0));

        let (_, ex) = map.query(InternalId(1), |_, _| true);
        assert_eq!(ex, vec![InternalId(2)]);
    }

    #[test]
    fn move_relocates_between_cells() {
        let mut map = RegionMap::new(10.0);
        map.add_node(InternalId(1), Coordinate::new(0.0, 0.0));
        map.move_node(InternalId(1), Coordinate::new(100.0, 100.0));
        assert_eq!(map.position_of(InternalId(1)), Some(Coordinate::new(100.0, 100.0)));
    }
}
