//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_cost`) are sorted by source
//! node and indexed by `EdgeId`, so iterating a node's neighbors is a
//! contiguous memory scan — ideal for the A* inner loop.
//!
//! # Construction
//!
//! [`NavGraph::build`] samples the level on a regular grid: every cell whose
//! center has `clearance` of free space becomes a node, and each node probes
//! four of its eight neighbor offsets — west, north-west, north, north-east.
//! Each unordered node pair is therefore considered exactly once, and a clear
//! capsule sweep between them inserts the edge in **both** directions, giving
//! an up-to-8-connected symmetric graph.  Node registration order is the
//! row-major grid scan, so identical geometry and parameters always produce
//! identical graphs.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) answers nearest-node queries for snapping start
//! and goal positions; an exact cell-index map answers "is this position a
//! node" without float comparisons.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use nav_core::{EdgeId, NodeId, Vec2};

use crate::clearance::ClearanceOracle;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Axis-aligned sampling bounds, typically the footprint of the ground plane.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

/// Parameters for graph construction.
///
/// Construction cost is quadratic in `bounds / spacing` (one `point_clear`
/// per cell plus up to four `segment_clear` per node), so spacing and bounds
/// must be chosen together to keep level-load time bounded.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Sampling region.
    pub bounds: Bounds,
    /// Distance between adjacent grid samples.
    pub spacing: f32,
    /// Free radius required to place a node or traverse an edge.
    pub clearance: f32,
}

impl GraphConfig {
    pub fn new(bounds: Bounds, spacing: f32, clearance: f32) -> Self {
        Self { bounds, spacing, clearance }
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D point with its `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// The navigable graph over one level's geometry.
///
/// Built once at level load, immutable and safe to query from any number of
/// agents for the rest of the session.  If the geometry changes afterwards
/// the graph is stale; rebuilding is the caller's responsibility.
pub struct NavGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Sampled position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Vec2>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge, sorted by source.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Traversal cost of each edge: the Euclidean distance between its
    /// endpoints.  Symmetric by construction.
    pub edge_cost: Vec<f32>,

    // ── Parameters the graph was built with ───────────────────────────────
    /// Required clearance radius; reused for goal-validity probes.
    pub clearance: f32,

    // ── Lookup structures ─────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
    /// Exact membership: grid cell `(col, row)` → node.
    cell_idx: FxHashMap<(i32, i32), NodeId>,
    /// Cell-index origin and scale for quantizing world positions.
    origin: Vec2,
    spacing: f32,
}

impl NavGraph {
    /// Sample `oracle` over `config.bounds` and build the graph.
    ///
    /// Deterministic: identical geometry and parameters yield identical node
    /// and edge sets in identical order.
    pub fn build<O: ClearanceOracle>(config: &GraphConfig, oracle: &O) -> NavGraph {
        let d = config.spacing;
        let w = config.clearance;
        let b = config.bounds;

        // Inclusive cell counts; the epsilon keeps bounds that are an exact
        // multiple of the spacing from losing their far edge to f32 rounding.
        let cols = ((b.max.x - b.min.x) / d + 1e-4).floor() as i32;
        let rows = ((b.max.y - b.min.y) / d + 1e-4).floor() as i32;

        // Pass 1: place nodes on clear cells, row-major.
        let mut node_pos = Vec::new();
        let mut cell_idx = FxHashMap::default();
        for col in 0..=cols {
            for row in 0..=rows {
                let pos = Vec2::new(b.min.x + col as f32 * d, b.min.y + row as f32 * d);
                if oracle.point_clear(pos, w) {
                    let id = NodeId(node_pos.len() as u32);
                    node_pos.push(pos);
                    cell_idx.insert((col, row), id);
                }
            }
        }

        // Pass 2: probe west, north-west, north, and north-east from every
        // node.  Each unordered pair comes up exactly once; a clear sweep
        // inserts the edge in both directions.
        const OFFSETS: [(i32, i32); 4] = [(-1, 0), (-1, 1), (0, 1), (1, 1)];
        let mut raw: Vec<(NodeId, NodeId, f32)> = Vec::new();
        for col in 0..=cols {
            for row in 0..=rows {
                let Some(&from) = cell_idx.get(&(col, row)) else {
                    continue;
                };
                for (dc, dr) in OFFSETS {
                    let Some(&to) = cell_idx.get(&(col + dc, row + dr)) else {
                        continue;
                    };
                    let (pa, pb) = (node_pos[from.index()], node_pos[to.index()]);
                    if oracle.segment_clear(pa, pb, w) {
                        let cost = pa.distance(pb);
                        raw.push((from, to, cost));
                        raw.push((to, from, cost));
                    }
                }
            }
        }

        Self::finish(node_pos, cell_idx, raw, b.min, d, w)
    }

    /// Assemble CSR arrays and lookup structures from raw directed edges.
    fn finish(
        node_pos: Vec<Vec2>,
        cell_idx: FxHashMap<(i32, i32), NodeId>,
        mut raw: Vec<(NodeId, NodeId, f32)>,
        origin: Vec2,
        spacing: f32,
        clearance: f32,
    ) -> NavGraph {
        let node_count = node_pos.len();

        // Sort by (source, destination) for CSR construction and a stable
        // neighbor iteration order.
        raw.sort_unstable_by_key(|&(from, to, _)| (from, to));

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.0).collect();
        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.1).collect();
        let edge_cost: Vec<f32> = raw.iter().map(|e| e.2).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.0.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        // Bulk-load R-tree for O(N log N) construction.
        let entries: Vec<NodeEntry> = node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.x, pos.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        NavGraph {
            node_pos,
            node_out_start,
            edge_from,
            edge_to,
            edge_cost,
            clearance,
            spatial_idx,
            cell_idx,
            origin,
            spacing,
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Sampled world position of `node`.
    #[inline]
    pub fn position(&self, node: NodeId) -> Vec2 {
        self.node_pos[node.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `pos`, or `None` on an empty graph.
    pub fn nearest_node(&self, pos: Vec2) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.id)
    }

    /// The node whose sampled position coincides with `pos`, if any.
    ///
    /// Quantizes `pos` to its grid cell and checks exact membership, so a
    /// position returned by an earlier search snaps back to the same node.
    pub fn node_at(&self, pos: Vec2) -> Option<NodeId> {
        let col = ((pos.x - self.origin.x) / self.spacing).round() as i32;
        let row = ((pos.y - self.origin.y) / self.spacing).round() as i32;
        let id = *self.cell_idx.get(&(col, row))?;
        // The cell must actually hold this position, not just share it.
        (self.node_pos[id.index()].distance(pos) < self.spacing * 1e-3).then_some(id)
    }
}
