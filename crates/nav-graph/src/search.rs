//! A* shortest-path search over the navigation graph.
//!
//! # Optimality
//!
//! Edge cost is exactly the Euclidean distance between connected nodes, so
//! straight-line distance to the goal is an admissible heuristic and the
//! plain search returns a true shortest path.  When an [`InfluenceSource`]
//! is supplied, its scalar is added to a node's *estimated* total cost only
//! — a heuristic perturbation that steers the search toward allied space and
//! away from contested space without touching the cost-so-far accounting.
//! With influence active the result may be sub-optimal by design.
//!
//! # Determinism
//!
//! The open set is a binary min-heap keyed on `(estimated cost, NodeId)`.
//! Equal estimates break ties on the lower node id, so a search over a given
//! graph is fully deterministic regardless of insertion order.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use nav_core::{NodeId, Vec2};

use crate::clearance::ClearanceOracle;
use crate::error::{GraphError, GraphResult};
use crate::graph::NavGraph;

// ── Influence ─────────────────────────────────────────────────────────────────

/// Collaborator-supplied tactical bias, already resolved for the querying
/// agent's faction: negative near allies (cheaper), positive near enemies
/// (dearer).
pub trait InfluenceSource {
    /// Signed influence scalar at `pos`.
    fn influence_at(&self, pos: Vec2) -> f32;
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a search: waypoints from the snapped start to the literal
/// goal, plus the summed edge cost along the graph portion.
///
/// Ephemeral — produced per query, consumed by one steering task, never
/// cached by the graph.
#[derive(Debug, Clone)]
pub struct Path {
    /// Waypoint positions: `[snapped start .. snapped goal, literal goal]`.
    /// The literal goal is appended only when it differs from the snapped
    /// goal node's position.
    pub waypoints: Vec<Vec2>,

    /// Cost-so-far at the goal node — equal to the summed segment length of
    /// the node portion of the path.
    pub cost: f32,
}

impl Path {
    /// The final waypoint (the position the agent is being sent to).
    pub fn goal(&self) -> Vec2 {
        *self.waypoints.last().unwrap_or(&Vec2::ZERO)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

// ── Search options ────────────────────────────────────────────────────────────

/// Knobs for one search call.
#[derive(Default)]
pub struct PathOptions<'a> {
    /// When `true` and the literal goal is obstructed at the graph's
    /// clearance radius, the goal is replaced by the nearest node instead of
    /// the search failing against an unreachable position.
    pub approximate: bool,

    /// Optional tactical bias (see [`InfluenceSource`]).
    pub influence: Option<&'a dyn InfluenceSource>,
}

impl<'a> PathOptions<'a> {
    /// The common steering case: snap obstructed goals, no influence.
    pub fn approximate() -> Self {
        Self { approximate: true, influence: None }
    }

    pub fn with_influence(mut self, influence: &'a dyn InfluenceSource) -> Self {
        self.influence = Some(influence);
        self
    }
}

// ── Open-set entry ────────────────────────────────────────────────────────────

/// Heap entry: estimated total cost plus the node, ordered by
/// `(cost, NodeId)` via total float ordering for deterministic ties.
#[derive(Copy, Clone, PartialEq)]
struct OpenEntry {
    est: f32,
    node: NodeId,
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.est.total_cmp(&other.est).then(self.node.cmp(&other.node))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// Compute the shortest path from `start` to `goal` in world coordinates.
///
/// Start and goal snap to their nearest nodes unless they coincide with one
/// exactly; with [`PathOptions::approximate`] an obstructed goal position is
/// first replaced by the nearest node (used to reject goals inside or on top
/// of geometry).
///
/// # Errors
///
/// [`GraphError::EmptyGraph`] when the graph has no nodes, and
/// [`GraphError::NoPath`] when the open set is exhausted without reaching
/// the goal node (disconnected region).
pub fn find_path<O: ClearanceOracle>(
    graph: &NavGraph,
    oracle: &O,
    start: Vec2,
    goal: Vec2,
    opts: &PathOptions<'_>,
) -> GraphResult<Path> {
    if graph.is_empty() {
        return Err(GraphError::EmptyGraph);
    }

    // Goal validity: an obstructed literal goal snaps to the nearest node.
    let goal = if opts.approximate && !oracle.point_clear(goal, graph.clearance) {
        // Non-empty graph, so the nearest node exists.
        graph
            .nearest_node(goal)
            .map(|n| graph.position(n))
            .ok_or(GraphError::EmptyGraph)?
    } else {
        goal
    };

    let start_node = match graph.node_at(start) {
        Some(n) => n,
        None => graph.nearest_node(start).ok_or(GraphError::EmptyGraph)?,
    };
    let goal_node = match graph.node_at(goal) {
        Some(n) => n,
        None => graph.nearest_node(goal).ok_or(GraphError::EmptyGraph)?,
    };

    let n = graph.node_count();
    let goal_pos = graph.position(goal_node);

    // cost_so_far[v] = best known path cost to v; untouched nodes are +inf.
    let mut cost_so_far = vec![f32::INFINITY; n];
    // prev[v] = predecessor of v on the best known path.
    let mut prev = vec![NodeId::INVALID; n];
    let mut closed = vec![false; n];

    // Reverse makes BinaryHeap (max) behave as a min-heap.
    let mut open: BinaryHeap<Reverse<OpenEntry>> = BinaryHeap::new();

    cost_so_far[start_node.index()] = 0.0;
    open.push(Reverse(OpenEntry {
        est: graph.position(start_node).distance(goal_pos),
        node: start_node,
    }));

    while let Some(Reverse(OpenEntry { node, .. })) = open.pop() {
        if closed[node.index()] {
            continue; // stale heap entry
        }
        closed[node.index()] = true;

        if node == goal_node {
            return Ok(reconstruct(graph, &prev, start_node, goal_node, goal, cost_so_far[node.index()]));
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            if closed[neighbor.index()] {
                continue;
            }
            let cost = cost_so_far[node.index()] + graph.edge_cost[edge.index()];
            if cost >= cost_so_far[neighbor.index()] {
                continue;
            }
            cost_so_far[neighbor.index()] = cost;
            prev[neighbor.index()] = node;

            let neighbor_pos = graph.position(neighbor);
            let mut est = cost + neighbor_pos.distance(goal_pos);
            if let Some(influence) = opts.influence {
                est += influence.influence_at(neighbor_pos);
            }
            open.push(Reverse(OpenEntry { est, node: neighbor }));
        }
    }

    Err(GraphError::NoPath { from: start_node, to: goal_node })
}

/// Walk the predecessor chain back from the goal node and append the literal
/// goal position when it is distinct from the snapped goal node.
fn reconstruct(
    graph: &NavGraph,
    prev: &[NodeId],
    start_node: NodeId,
    goal_node: NodeId,
    literal_goal: Vec2,
    cost: f32,
) -> Path {
    let mut waypoints = vec![graph.position(goal_node)];
    let mut cur = goal_node;
    while cur != start_node {
        cur = prev[cur.index()];
        waypoints.push(graph.position(cur));
    }
    waypoints.reverse();

    let snapped_goal = graph.position(goal_node);
    if snapped_goal.distance(literal_goal) > 1e-4 {
        waypoints.push(literal_goal);
    }

    Path { waypoints, cost }
}
