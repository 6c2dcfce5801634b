//! Unit tests for nav-graph.
//!
//! All tests build graphs from hand-placed `StaticGeometry`, so they exercise
//! the same probe-driven construction path production uses.

#[cfg(test)]
mod helpers {
    use nav_core::Vec2;

    use crate::{Bounds, GraphConfig, NavGraph, StaticGeometry};

    pub const EPS: f32 = 1e-3;

    /// Standard test arena: a 10×10 grid at spacing 1, clearance 0.45.
    pub fn open_config() -> GraphConfig {
        GraphConfig::new(
            Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(9.0, 9.0)),
            1.0,
            0.45,
        )
    }

    pub fn open_arena() -> NavGraph {
        NavGraph::build(&open_config(), &StaticGeometry::open())
    }

    /// Arena cut in two by a vertical wall between x=4 and x=5, spanning the
    /// full height.  No node survives in columns 4 and 5, so the halves are
    /// disconnected.
    pub fn split_arena() -> (NavGraph, StaticGeometry) {
        let mut geo = StaticGeometry::open();
        geo.add_wall(Vec2::new(4.5, -1.0), Vec2::new(4.5, 10.0), 0.2);
        let graph = NavGraph::build(&open_config(), &geo);
        (graph, geo)
    }

    /// Brute-force shortest path cost by O(V²) Dijkstra over the CSR arrays.
    /// Slow but obviously correct; used to validate A* admissibility.
    pub fn brute_force_cost(graph: &NavGraph, from: nav_core::NodeId, to: nav_core::NodeId) -> f32 {
        let n = graph.node_count();
        let mut dist = vec![f32::INFINITY; n];
        let mut done = vec![false; n];
        dist[from.index()] = 0.0;
        loop {
            let mut best = None;
            for i in 0..n {
                if !done[i] && dist[i].is_finite() {
                    if best.is_none_or(|b: usize| dist[i] < dist[b]) {
                        best = Some(i);
                    }
                }
            }
            let Some(u) = best else { break };
            done[u] = true;
            for e in graph.out_edges(nav_core::NodeId(u as u32)) {
                let v = graph.edge_to[e.index()].index();
                let c = dist[u] + graph.edge_cost[e.index()];
                if c < dist[v] {
                    dist[v] = c;
                }
            }
        }
        dist[to.index()]
    }
}

// ── Clearance oracle ──────────────────────────────────────────────────────────

#[cfg(test)]
mod clearance {
    use std::cell::Cell;

    use nav_core::Vec2;

    use crate::{ClearanceOracle, ProbeGuard, StaticGeometry};

    #[test]
    fn open_level_is_always_clear() {
        let geo = StaticGeometry::open();
        assert!(geo.point_clear(Vec2::new(3.0, -7.5), 10.0));
        assert!(geo.segment_clear(Vec2::ZERO, Vec2::new(100.0, 100.0), 5.0));
    }

    #[test]
    fn circle_blocks_point_within_combined_radius() {
        let mut geo = StaticGeometry::open();
        geo.add_circle(Vec2::new(5.0, 5.0), 1.0);
        assert!(!geo.point_clear(Vec2::new(5.0, 5.0), 0.5)); // inside
        assert!(!geo.point_clear(Vec2::new(6.2, 5.0), 0.5)); // 1.2 < 1.0 + 0.5
        assert!(geo.point_clear(Vec2::new(6.6, 5.0), 0.5)); // 1.6 > 1.5
    }

    #[test]
    fn circle_blocks_crossing_segment() {
        let mut geo = StaticGeometry::open();
        geo.add_circle(Vec2::new(5.0, 5.0), 1.0);
        // Sweep passes straight through the circle.
        assert!(!geo.segment_clear(Vec2::new(0.0, 5.0), Vec2::new(10.0, 5.0), 0.3));
        // Sweep passes well clear of it.
        assert!(geo.segment_clear(Vec2::new(0.0, 8.0), Vec2::new(10.0, 8.0), 0.3));
        // Sweep grazes: distance 1.25 from center, 1.0 + 0.3 blocks it.
        assert!(!geo.segment_clear(Vec2::new(0.0, 6.25), Vec2::new(10.0, 6.25), 0.3));
    }

    #[test]
    fn box_blocks_point_and_segment() {
        let mut geo = StaticGeometry::open();
        geo.add_box(Vec2::new(2.0, 2.0), Vec2::new(4.0, 3.0));
        assert!(!geo.point_clear(Vec2::new(3.0, 2.5), 0.1)); // inside
        assert!(!geo.point_clear(Vec2::new(4.3, 2.5), 0.5)); // 0.3 from face
        assert!(geo.point_clear(Vec2::new(5.0, 2.5), 0.5));
        // Vertical sweep through the box.
        assert!(!geo.segment_clear(Vec2::new(3.0, 0.0), Vec2::new(3.0, 5.0), 0.2));
        // Sweep along a parallel line outside the inflated box.
        assert!(geo.segment_clear(Vec2::new(4.5, 0.0), Vec2::new(4.5, 5.0), 0.2));
    }

    #[test]
    fn wall_is_an_inflated_box() {
        let mut geo = StaticGeometry::open();
        geo.add_wall(Vec2::new(4.5, 0.0), Vec2::new(4.5, 9.0), 0.2);
        assert!(!geo.point_clear(Vec2::new(4.5, 4.0), 0.1));
        assert!(!geo.segment_clear(Vec2::new(0.0, 4.0), Vec2::new(9.0, 4.0), 0.1));
    }

    #[test]
    fn probe_guard_restores_on_drop() {
        let flag = Cell::new(true);
        {
            let _guard = ProbeGuard::disable(&flag);
            assert!(!flag.get());
        }
        assert!(flag.get());
    }

    #[test]
    fn probe_guard_restores_on_early_exit() {
        let flag = Cell::new(true);
        let scan = |flag: &Cell<bool>| -> bool {
            let _guard = ProbeGuard::disable(flag);
            for i in 0..10 {
                if i == 3 {
                    return false; // early exit with the guard live
                }
            }
            true
        };
        assert!(!scan(&flag));
        assert!(flag.get());
    }

    #[test]
    fn probe_guard_nests() {
        let flag = Cell::new(true);
        {
            let _outer = ProbeGuard::disable(&flag);
            {
                let _inner = ProbeGuard::disable(&flag);
                assert!(!flag.get());
            }
            // Inner guard restores the (disabled) prior state, not `true`.
            assert!(!flag.get());
        }
        assert!(flag.get());
    }
}

// ── Graph construction ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use nav_core::Vec2;

    use super::helpers::{open_arena, open_config, split_arena};
    use crate::{NavGraph, StaticGeometry};

    #[test]
    fn open_arena_is_fully_sampled() {
        let graph = open_arena();
        assert_eq!(graph.node_count(), 100);
        // Interior nodes connect to all eight neighbors.
        let center = graph.node_at(Vec2::new(5.0, 5.0)).unwrap();
        assert_eq!(graph.out_degree(center), 8);
        // A corner has three neighbors.
        let corner = graph.node_at(Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(graph.out_degree(corner), 3);
    }

    #[test]
    fn edges_are_symmetric_with_equal_cost() {
        let graph = open_arena();
        for e in 0..graph.edge_count() {
            let (from, to) = (graph.edge_from[e], graph.edge_to[e]);
            let reverse = graph
                .out_edges(to)
                .find(|r| graph.edge_to[r.index()] == from)
                .expect("every edge has a reverse edge");
            assert_eq!(graph.edge_cost[e], graph.edge_cost[reverse.index()]);
        }
    }

    #[test]
    fn edge_cost_is_euclidean_distance() {
        let graph = open_arena();
        for e in 0..graph.edge_count() {
            let d = graph
                .position(graph.edge_from[e])
                .distance(graph.position(graph.edge_to[e]));
            assert!((graph.edge_cost[e] - d).abs() < 1e-6);
        }
    }

    #[test]
    fn build_is_deterministic() {
        let a = open_arena();
        let b = open_arena();
        assert_eq!(a.node_pos, b.node_pos);
        assert_eq!(a.edge_from, b.edge_from);
        assert_eq!(a.edge_to, b.edge_to);
        assert_eq!(a.edge_cost, b.edge_cost);
    }

    #[test]
    fn obstructed_cells_get_no_node() {
        let mut geo = StaticGeometry::open();
        geo.add_circle(Vec2::new(5.0, 5.0), 1.0);
        let graph = NavGraph::build(&open_config(), &geo);
        // (5,5) is inside the obstacle, (5,4) is 1.0 away < 1.0 + 0.45.
        assert!(graph.node_at(Vec2::new(5.0, 5.0)).is_none());
        assert!(graph.node_at(Vec2::new(5.0, 4.0)).is_none());
        assert!(graph.node_at(Vec2::new(5.0, 3.0)).is_some());
        assert!(graph.node_count() < 100);
    }

    #[test]
    fn wall_disconnects_the_arena() {
        let (graph, _) = split_arena();
        // Columns 4 and 5 are gone entirely.
        for y in 0..10 {
            assert!(graph.node_at(Vec2::new(4.0, y as f32)).is_none());
            assert!(graph.node_at(Vec2::new(5.0, y as f32)).is_none());
        }
        // The surviving halves are intact.
        assert!(graph.node_at(Vec2::new(3.0, 5.0)).is_some());
        assert!(graph.node_at(Vec2::new(6.0, 5.0)).is_some());
    }

    #[test]
    fn nearest_node_snaps() {
        let graph = open_arena();
        let n = graph.nearest_node(Vec2::new(3.2, 6.9)).unwrap();
        assert_eq!(graph.position(n), Vec2::new(3.0, 7.0));
    }

    #[test]
    fn node_at_requires_exact_position() {
        let graph = open_arena();
        assert!(graph.node_at(Vec2::new(3.0, 7.0)).is_some());
        assert!(graph.node_at(Vec2::new(3.2, 6.9)).is_none());
    }

    #[test]
    fn fully_obstructed_bounds_yield_empty_graph() {
        let mut geo = StaticGeometry::open();
        geo.add_box(Vec2::new(-1.0, -1.0), Vec2::new(10.0, 10.0));
        let graph = NavGraph::build(&open_config(), &geo);
        assert!(graph.is_empty());
        assert!(graph.nearest_node(Vec2::ZERO).is_none());
    }
}

// ── A* search ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use nav_core::Vec2;

    use super::helpers::{brute_force_cost, open_arena, open_config, split_arena, EPS};
    use crate::{
        find_path, ClearanceOracle, GraphError, InfluenceSource, NavGraph, PathOptions,
        StaticGeometry,
    };

    #[test]
    fn diagonal_across_open_arena() {
        let graph = open_arena();
        let geo = StaticGeometry::open();
        let path = find_path(
            &graph,
            &geo,
            Vec2::ZERO,
            Vec2::new(9.0, 9.0),
            &PathOptions::approximate(),
        )
        .unwrap();

        // Nine diagonal steps, cost 9√2.
        assert_eq!(path.len(), 10);
        assert!((path.cost - 9.0 * std::f32::consts::SQRT_2).abs() < EPS);
        assert_eq!(path.goal(), Vec2::new(9.0, 9.0));
    }

    #[test]
    fn reported_cost_equals_summed_segment_length() {
        let mut geo = StaticGeometry::open();
        geo.add_circle(Vec2::new(4.0, 4.0), 1.2);
        let graph = NavGraph::build(&open_config(), &geo);

        let path = find_path(
            &graph,
            &geo,
            Vec2::ZERO,
            Vec2::new(9.0, 9.0),
            &PathOptions::approximate(),
        )
        .unwrap();

        let summed: f32 = path
            .waypoints
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum();
        assert!((summed - path.cost).abs() < EPS, "summed {summed} vs cost {}", path.cost);
    }

    #[test]
    fn matches_brute_force_on_obstructed_arena() {
        let mut geo = StaticGeometry::open();
        geo.add_circle(Vec2::new(4.0, 4.0), 1.2);
        geo.add_box(Vec2::new(6.5, 0.5), Vec2::new(7.5, 4.5));
        let graph = NavGraph::build(&open_config(), &geo);

        let start = graph.node_at(Vec2::new(0.0, 0.0)).unwrap();
        let goal = graph.node_at(Vec2::new(9.0, 3.0)).unwrap();

        let path = find_path(
            &graph,
            &geo,
            graph.position(start),
            graph.position(goal),
            &PathOptions::default(),
        )
        .unwrap();

        let exact = brute_force_cost(&graph, start, goal);
        assert!(
            (path.cost - exact).abs() < EPS,
            "A* {} vs Dijkstra {exact}",
            path.cost
        );
    }

    #[test]
    fn off_node_start_and_goal_snap() {
        let graph = open_arena();
        let geo = StaticGeometry::open();
        let path = find_path(
            &graph,
            &geo,
            Vec2::new(0.3, 0.2),
            Vec2::new(8.8, 9.3),
            &PathOptions::approximate(),
        )
        .unwrap();

        // First waypoint is the snapped start node, last is the literal goal,
        // second-to-last the snapped goal node.
        assert_eq!(path.waypoints[0], Vec2::new(0.0, 0.0));
        assert_eq!(path.goal(), Vec2::new(8.8, 9.3));
        assert_eq!(path.waypoints[path.len() - 2], Vec2::new(9.0, 9.0));
    }

    #[test]
    fn obstructed_goal_snaps_to_nearest_node() {
        let mut geo = StaticGeometry::open();
        geo.add_circle(Vec2::new(5.0, 5.0), 1.0);
        let graph = NavGraph::build(&open_config(), &geo);

        let path = find_path(
            &graph,
            &geo,
            Vec2::ZERO,
            Vec2::new(5.0, 5.0), // center of the obstacle
            &PathOptions::approximate(),
        )
        .unwrap();

        // The effective goal is a real node, clear of the obstacle.
        let goal = path.goal();
        assert!(graph.node_at(goal).is_some());
        assert!(geo.point_clear(goal, graph.clearance));
    }

    #[test]
    fn disconnected_goal_reports_no_path() {
        let (graph, geo) = split_arena();
        let result = find_path(
            &graph,
            &geo,
            Vec2::new(1.0, 5.0),
            Vec2::new(8.0, 5.0),
            &PathOptions::approximate(),
        );
        assert!(matches!(result, Err(GraphError::NoPath { .. })));
    }

    #[test]
    fn empty_graph_reports_error() {
        let mut geo = StaticGeometry::open();
        geo.add_box(Vec2::new(-1.0, -1.0), Vec2::new(10.0, 10.0));
        let graph = NavGraph::build(&open_config(), &geo);
        let result = find_path(&graph, &geo, Vec2::ZERO, Vec2::new(9.0, 9.0), &PathOptions::default());
        assert!(matches!(result, Err(GraphError::EmptyGraph)));
    }

    #[test]
    fn search_is_deterministic() {
        let graph = open_arena();
        let geo = StaticGeometry::open();
        let opts = PathOptions::approximate();
        let a = find_path(&graph, &geo, Vec2::ZERO, Vec2::new(9.0, 4.0), &opts).unwrap();
        let b = find_path(&graph, &geo, Vec2::ZERO, Vec2::new(9.0, 4.0), &opts).unwrap();
        assert_eq!(a.waypoints, b.waypoints);
    }

    /// A hot spot of enemy presence at one point.
    struct HotSpot {
        at: Vec2,
        strength: f32,
        radius: f32,
    }

    impl InfluenceSource for HotSpot {
        fn influence_at(&self, pos: Vec2) -> f32 {
            if pos.distance(self.at) <= self.radius {
                self.strength
            } else {
                0.0
            }
        }
    }

    #[test]
    fn influence_steers_around_contested_node() {
        let graph = open_arena();
        let geo = StaticGeometry::open();
        let start = Vec2::new(0.0, 4.0);
        let goal = Vec2::new(9.0, 4.0);

        let plain = find_path(&graph, &geo, start, goal, &PathOptions::approximate()).unwrap();
        assert!((plain.cost - 9.0).abs() < EPS);
        assert!(plain.waypoints.contains(&Vec2::new(5.0, 4.0)));

        // Heavy enemy presence squatting on the straight route.
        let spot = HotSpot { at: Vec2::new(5.0, 4.0), strength: 50.0, radius: 0.5 };
        let opts = PathOptions::approximate().with_influence(&spot);
        let biased = find_path(&graph, &geo, start, goal, &opts).unwrap();

        assert!(!biased.waypoints.contains(&Vec2::new(5.0, 4.0)));
        // The detour really costs more — influence warps the estimate, not
        // the cost accounting.
        assert!(biased.cost > plain.cost);
    }
}
