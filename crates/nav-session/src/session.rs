//! The `Session` — explicit owner of one level's movement state.
//!
//! Construction order is explicit and linear: geometry in, graph built once,
//! agents spawned, then the caller's fixed-tick loop calls [`Session::tick`]
//! until teardown.  Nothing here is reachable through globals; collaborators
//! hold the `Session` and address agents by [`AgentId`].

use nav_core::{AgentClass, AgentId, Faction, Tick, TickClock, Vec2};
use nav_graph::{GraphConfig, InfluenceSource, NavGraph, Path, StaticGeometry};
use nav_steer::{Completion, SteerContext, SteerParams, SteeringController, TargetLookup};

use crate::error::{SessionError, SessionResult};
use crate::influence::{AgentSnapshot, InfluenceField};
use crate::observer::SessionObserver;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Session-wide tuning.
#[derive(Copy, Clone, Debug)]
pub struct SessionConfig {
    /// Graph construction parameters (bounds, spacing, clearance).
    pub graph: GraphConfig,

    /// Fixed physics timestep, seconds.
    pub dt: f32,

    /// Radius of the influence query around each sampled position.
    pub influence_radius: f32,

    /// Steering parameters applied to every spawned agent.
    pub steer: SteerParams,
}

impl SessionConfig {
    pub fn new(graph: GraphConfig) -> Self {
        Self {
            graph,
            dt: 0.02,
            influence_radius: 10.0,
            steer: SteerParams::default(),
        }
    }
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// One roster entry: identity, team, class, and the exclusively owned
/// steering controller.
pub struct Agent {
    pub id: AgentId,
    pub faction: Faction,
    pub class: AgentClass,
    /// Whether this agent's searches (including chase replans) apply the
    /// influence field.  Set per movement request.
    pub weighted: bool,
    pub controller: SteeringController,
}

/// Per-tick position snapshot acting as the chase-target lookup.
///
/// Taken once at the top of each tick (and per request), so all agents see
/// a consistent view; chasers react to a target's move on the next tick.
struct SnapshotLookup(Vec<AgentSnapshot>);

impl TargetLookup for SnapshotLookup {
    fn target_position(&self, target: AgentId) -> Option<Vec2> {
        self.0.iter().find(|e| e.id == target).map(|e| e.position)
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Owns the static geometry, the navigation graph, the tick clock, and the
/// agent roster for one level session.
pub struct Session {
    config: SessionConfig,
    geometry: StaticGeometry,
    graph: NavGraph,
    clock: TickClock,
    /// Indexed by `AgentId`; despawned agents leave a `None` slot so ids
    /// stay stable for the whole session.
    agents: Vec<Option<Agent>>,
}

impl Session {
    /// Build the navigation graph from `geometry` and start an empty session.
    pub fn new(geometry: StaticGeometry, config: SessionConfig) -> Self {
        let graph = NavGraph::build(&config.graph, &geometry);
        log::debug!(
            "session graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Self {
            clock: TickClock::new(config.dt),
            config,
            geometry,
            graph,
            agents: Vec::new(),
        }
    }

    // ── Roster ────────────────────────────────────────────────────────────

    pub fn spawn(
        &mut self,
        faction: Faction,
        class: AgentClass,
        position: Vec2,
        heading: f32,
    ) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        self.agents.push(Some(Agent {
            id,
            faction,
            class,
            weighted: false,
            controller: SteeringController::new(position, heading, self.config.steer),
        }));
        id
    }

    /// Remove `agent` from the session.  Its id is never reused; chasers
    /// pursuing it observe target loss on their next tick.
    pub fn despawn(&mut self, agent: AgentId) -> SessionResult<()> {
        let slot = self
            .agents
            .get_mut(agent.index())
            .ok_or(SessionError::AgentNotFound(agent))?;
        if slot.take().is_none() {
            return Err(SessionError::AgentNotFound(agent));
        }
        Ok(())
    }

    pub fn agent(&self, agent: AgentId) -> SessionResult<&Agent> {
        self.agents
            .get(agent.index())
            .and_then(Option::as_ref)
            .ok_or(SessionError::AgentNotFound(agent))
    }

    pub fn agent_count(&self) -> usize {
        self.agents.iter().flatten().count()
    }

    // ── Read-only state ───────────────────────────────────────────────────

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn position(&self, agent: AgentId) -> SessionResult<Vec2> {
        Ok(self.agent(agent)?.controller.body.position)
    }

    pub fn velocity(&self, agent: AgentId) -> SessionResult<Vec2> {
        Ok(self.agent(agent)?.controller.velocity())
    }

    pub fn is_still(&self, agent: AgentId) -> SessionResult<bool> {
        Ok(self.agent(agent)?.controller.is_still())
    }

    /// Direct firing-line check against the static geometry, for combat AI
    /// that wants a yes/no without running a search.
    pub fn has_clear_path(&self, a: Vec2, b: Vec2, width: f32) -> bool {
        use nav_graph::ClearanceOracle;
        self.geometry.segment_clear(a, b, width)
    }

    /// Compute (but do not follow) a path from `agent`'s position to
    /// `target`, optionally influence-weighted.
    pub fn plan(&self, agent: AgentId, target: Vec2, weighted: bool) -> SessionResult<Path> {
        let entry = self.agent(agent)?;
        let snapshot = SnapshotLookup(self.snapshot());
        let field;
        let influence: Option<&dyn InfluenceSource> = if weighted {
            field = InfluenceField::new(
                &snapshot.0,
                entry.faction,
                self.config.influence_radius,
                agent,
            );
            Some(&field)
        } else {
            None
        };
        let ctx = SteerContext {
            graph: &self.graph,
            oracle: &self.geometry,
            targets: &snapshot,
            influence,
        };
        Ok(ctx.find_path(entry.controller.body.position, target)?)
    }

    // ── Movement requests ─────────────────────────────────────────────────

    /// Send `agent` to `target` along the shortest clear path.
    pub fn move_to(&mut self, agent: AgentId, target: Vec2) -> SessionResult<()> {
        self.arrive(agent, target, 0.0, false, None)
    }

    /// Send `agent` to `target`, easing to a stop within `acceptance`.
    pub fn arrive(
        &mut self,
        agent: AgentId,
        target: Vec2,
        acceptance: f32,
        weighted: bool,
        on_complete: Option<Completion>,
    ) -> SessionResult<()> {
        let snapshot = SnapshotLookup(self.snapshot());
        let slot = self
            .agents
            .get_mut(agent.index())
            .and_then(Option::as_mut)
            .ok_or(SessionError::AgentNotFound(agent))?;

        let field;
        let influence: Option<&dyn InfluenceSource> = if weighted {
            field = InfluenceField::new(
                &snapshot.0,
                slot.faction,
                self.config.influence_radius,
                agent,
            );
            Some(&field)
        } else {
            None
        };
        let ctx = SteerContext {
            graph: &self.graph,
            oracle: &self.geometry,
            targets: &snapshot,
            influence,
        };
        slot.controller.arrive(&ctx, target, acceptance, on_complete)?;
        slot.weighted = weighted;
        Ok(())
    }

    /// Rotate `agent` in place toward `target`.
    pub fn face(
        &mut self,
        agent: AgentId,
        target: Vec2,
        on_complete: Option<Completion>,
    ) -> SessionResult<()> {
        let slot = self
            .agents
            .get_mut(agent.index())
            .and_then(Option::as_mut)
            .ok_or(SessionError::AgentNotFound(agent))?;
        slot.controller.face(target, on_complete);
        Ok(())
    }

    /// Make `agent` pursue `target`, finishing within `acceptance` of it.
    pub fn chase(
        &mut self,
        agent: AgentId,
        target: AgentId,
        acceptance: f32,
        weighted: bool,
        on_complete: Option<Completion>,
    ) -> SessionResult<()> {
        let snapshot = SnapshotLookup(self.snapshot());
        let slot = self
            .agents
            .get_mut(agent.index())
            .and_then(Option::as_mut)
            .ok_or(SessionError::AgentNotFound(agent))?;

        let field;
        let influence: Option<&dyn InfluenceSource> = if weighted {
            field = InfluenceField::new(
                &snapshot.0,
                slot.faction,
                self.config.influence_radius,
                agent,
            );
            Some(&field)
        } else {
            None
        };
        let ctx = SteerContext {
            graph: &self.graph,
            oracle: &self.geometry,
            targets: &snapshot,
            influence,
        };
        slot.controller.chase(&ctx, target, acceptance, on_complete)?;
        slot.weighted = weighted;
        Ok(())
    }

    pub fn stop(&mut self, agent: AgentId, completed: bool) -> SessionResult<()> {
        let slot = self
            .agents
            .get_mut(agent.index())
            .and_then(Option::as_mut)
            .ok_or(SessionError::AgentNotFound(agent))?;
        slot.controller.stop(completed);
        Ok(())
    }

    pub fn disable(&mut self, agent: AgentId) -> SessionResult<()> {
        let slot = self
            .agents
            .get_mut(agent.index())
            .and_then(Option::as_mut)
            .ok_or(SessionError::AgentNotFound(agent))?;
        slot.controller.disable();
        Ok(())
    }

    pub fn enable(&mut self, agent: AgentId) -> SessionResult<()> {
        let slot = self
            .agents
            .get_mut(agent.index())
            .and_then(Option::as_mut)
            .ok_or(SessionError::AgentNotFound(agent))?;
        slot.controller.enable();
        Ok(())
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance every agent by one fixed timestep.
    ///
    /// All agents step against the same start-of-tick position snapshot, so
    /// iteration order cannot leak one agent's movement into another's view
    /// of the world within a tick.
    pub fn tick<O: SessionObserver>(&mut self, observer: &mut O) {
        let now: Tick = self.clock.current;
        observer.on_tick_start(now);

        let snapshot = SnapshotLookup(self.snapshot());
        let dt = self.clock.dt;

        for i in 0..self.agents.len() {
            let Some(agent) = self.agents[i].as_mut() else {
                continue;
            };
            let field;
            let influence: Option<&dyn InfluenceSource> = if agent.weighted {
                field = InfluenceField::new(
                    &snapshot.0,
                    agent.faction,
                    self.config.influence_radius,
                    agent.id,
                );
                Some(&field)
            } else {
                None
            };
            let ctx = SteerContext {
                graph: &self.graph,
                oracle: &self.geometry,
                targets: &snapshot,
                influence,
            };
            let status = agent.controller.tick(&ctx, dt);
            observer.on_agent_step(now, agent.id, status);
        }

        observer.on_tick_end(now);
        self.clock.advance();
    }

    /// Run exactly `n` ticks.  Useful for tests and incremental stepping.
    pub fn run_ticks<O: SessionObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick(observer);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .flatten()
            .map(|a| AgentSnapshot {
                id: a.id,
                faction: a.faction,
                class: a.class,
                position: a.controller.body.position,
            })
            .collect()
    }
}
