//! The per-agent steering state machine.
//!
//! # States
//!
//! | State      | Meaning                                                      |
//! |------------|--------------------------------------------------------------|
//! | `Idle`     | No active task, zero velocity.  Initial and terminal.        |
//! | `Facing`   | Rotating toward a fixed point; no translation.               |
//! | `Arriving` | Following a smoothed path to a fixed goal, easing near it.   |
//! | `Chasing`  | Following a smoothed path to a *moving* target, replanning.  |
//! | `Disabled` | Inert.  Every request is a silent no-op until `enable()`.    |
//!
//! Every public request first performs `stop()` — cancelling the in-flight
//! task and clearing velocity — then computes what it needs and arms the new
//! state.  Requests never queue.
//!
//! # Per-tick algorithm (`Arriving` / `Chasing`)
//!
//! 1. (`Chasing` only) if the target drifted beyond the recalculation
//!    distance, recompute the path from the current position; a failed
//!    replan degrades to holding position until the next window.
//! 2. Re-smooth: pick the furthest visible waypoint from the *current*
//!    position.
//! 3. Rotate the heading toward it at the bounded angular rate.
//! 4. If the remaining angle exceeds the movement-angle threshold, skip
//!    translation this tick (finish turning first).
//! 5. Speed: full while off the final waypoint or outside the satisfaction
//!    radius; eased (`distance / time_to_target`) inside it; full stop —
//!    firing the completion — inside the arrival threshold.
//! 6. Advance the waypoint index once within the arrival threshold of a
//!    non-final waypoint.

use nav_core::vec2::{angle_between, rotate_toward};
use nav_core::{AgentId, Vec2};
use nav_graph::Path;

use crate::body::Body;
use crate::context::SteerContext;
use crate::error::{SteerError, SteerResult};
use crate::smoother::smooth_index;

/// Continuation fired exactly once when a task completes successfully.
pub type Completion = Box<dyn FnOnce()>;

/// Outcome of one `tick` call.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickStatus {
    /// No active task (`Idle` or `Disabled`).
    Still,
    /// Task in progress — rotating or translating.
    Moving,
    /// Task finished this tick; the completion, if any, has fired.
    Completed,
    /// The chase target ceased to exist; task abandoned without completion.
    TargetLost,
}

// ── Tuning parameters ─────────────────────────────────────────────────────────

/// Steering tuning knobs.  Defaults match the reference arena agents.
#[derive(Copy, Clone, Debug)]
pub struct SteerParams {
    /// Maximum translation speed, units/second.
    pub max_linear_speed: f32,

    /// Maximum rotation rate, radians/second.
    pub max_turn_rate: f32,

    /// Distance at which a waypoint counts as reached and movement stops.
    pub arrive_threshold: f32,

    /// Distance from the final waypoint inside which speed eases down.
    pub satisfaction_radius: f32,

    /// Easing divisor: eased speed = remaining distance / this (seconds).
    pub time_to_target: f32,

    /// Heading error above which the agent turns in place instead of
    /// translating, radians.
    pub max_movement_angle: f32,

    /// Residual heading error at which a `face` task counts as done, radians.
    pub facing_tolerance: f32,

    /// Target drift beyond which a chase recomputes its path.
    pub chase_recalc_distance: f32,

    /// The agent's clearance radius, used for smoothing probes.
    pub clearance: f32,
}

impl Default for SteerParams {
    fn default() -> Self {
        Self {
            max_linear_speed: 3.0,
            // 7.5° per 20 ms physics tick.
            max_turn_rate: 7.5f32.to_radians() / 0.02,
            arrive_threshold: 0.1,
            satisfaction_radius: 1.0,
            time_to_target: 0.25,
            max_movement_angle: 90.0f32.to_radians(),
            facing_tolerance: 1.0f32.to_radians(),
            chase_recalc_distance: 1.0,
            clearance: 0.45,
        }
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

/// An active path-following task.
struct Travel {
    path: Path,
    /// Index of the current steering target within `path.waypoints`.
    index: usize,
    /// Caller-specified "close enough" distance to the literal goal.
    acceptance: f32,
}

enum Mode {
    Idle,
    Disabled,
    Facing { target: Vec2 },
    Arriving { travel: Travel },
    Chasing { travel: Travel, target: AgentId, last_known: Vec2 },
}

/// Steering state and behavior for one agent.
///
/// Exclusively owned by its agent and mutated only from that agent's own
/// requests and per-tick step; never shared.
pub struct SteeringController {
    /// The agent's kinematic body.
    pub body: Body,
    params: SteerParams,
    mode: Mode,
    completion: Option<Completion>,
}

impl SteeringController {
    pub fn new(position: Vec2, heading: f32, params: SteerParams) -> Self {
        Self {
            body: Body::new(position, heading),
            params,
            mode: Mode::Idle,
            completion: None,
        }
    }

    // ── Read-only state ───────────────────────────────────────────────────

    /// `true` when the agent's velocity is zero.
    #[inline]
    pub fn is_still(&self) -> bool {
        self.body.velocity.is_zero()
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        matches!(self.mode, Mode::Disabled)
    }

    /// `true` when no task is armed (also `true` while disabled).
    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Idle | Mode::Disabled)
    }

    pub fn params(&self) -> &SteerParams {
        &self.params
    }

    // ── Requests ──────────────────────────────────────────────────────────

    /// Move to `target` along the shortest clear path.
    ///
    /// Specialization of [`arrive`](Self::arrive) with a zero acceptance
    /// radius and no completion.
    pub fn move_to(&mut self, ctx: &SteerContext<'_>, target: Vec2) -> SteerResult<()> {
        self.arrive(ctx, target, 0.0, None)
    }

    /// Move to `target`, decelerating on approach and finishing within
    /// `acceptance` of it.
    ///
    /// An unreachable goal stops the agent in place and reports
    /// [`SteerError::NoPath`]; the agent never moves on an invalid path.
    /// Silent no-op while disabled.
    pub fn arrive(
        &mut self,
        ctx: &SteerContext<'_>,
        target: Vec2,
        acceptance: f32,
        on_complete: Option<Completion>,
    ) -> SteerResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        self.stop(false);

        let path = self.compute_path(ctx, target)?;
        self.completion = on_complete;
        self.mode = Mode::Arriving {
            travel: Travel { path, index: 0, acceptance },
        };
        Ok(())
    }

    /// Rotate in place until facing `target`.  Silent no-op while disabled.
    pub fn face(&mut self, target: Vec2, on_complete: Option<Completion>) {
        if self.is_disabled() {
            return;
        }
        self.stop(false);
        self.completion = on_complete;
        self.mode = Mode::Facing { target };
    }

    /// Pursue the moving agent `target`, replanning as it drifts, finishing
    /// within `acceptance` of it.  Silent no-op while disabled.
    pub fn chase(
        &mut self,
        ctx: &SteerContext<'_>,
        target: AgentId,
        acceptance: f32,
        on_complete: Option<Completion>,
    ) -> SteerResult<()> {
        if self.is_disabled() {
            return Ok(());
        }
        self.stop(false);

        let Some(target_pos) = ctx.targets.target_position(target) else {
            return Err(SteerError::TargetLost(target));
        };
        let path = self.compute_path(ctx, target_pos)?;
        self.completion = on_complete;
        self.mode = Mode::Chasing {
            travel: Travel { path, index: 0, acceptance },
            target,
            last_known: target_pos,
        };
        Ok(())
    }

    /// Cancel the active task and zero the velocity.
    ///
    /// With `completed = true` a registered completion continuation fires
    /// exactly once before being cleared; otherwise it is discarded unfired.
    /// Does not leave the `Disabled` state.
    pub fn stop(&mut self, completed: bool) {
        self.body.velocity = Vec2::ZERO;
        if !self.is_disabled() {
            self.mode = Mode::Idle;
        }
        let continuation = self.completion.take();
        if completed {
            if let Some(continuation) = continuation {
                continuation();
            }
        }
    }

    /// Stop and ignore all further requests until [`enable`](Self::enable).
    pub fn disable(&mut self) {
        self.stop(false);
        self.mode = Mode::Disabled;
    }

    /// Re-arm a disabled controller (back to `Idle`).
    pub fn enable(&mut self) {
        if self.is_disabled() {
            self.mode = Mode::Idle;
        }
    }

    // ── Per-tick step ─────────────────────────────────────────────────────

    /// Advance the active task by one fixed timestep of `dt` seconds.
    pub fn tick(&mut self, ctx: &SteerContext<'_>, dt: f32) -> TickStatus {
        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => TickStatus::Still,
            Mode::Disabled => {
                self.mode = Mode::Disabled;
                TickStatus::Still
            }
            Mode::Facing { target } => self.tick_facing(target, dt),
            Mode::Arriving { travel } => self.tick_travel(ctx, travel, None, dt),
            Mode::Chasing { travel, target, last_known } => {
                self.tick_travel(ctx, travel, Some((target, last_known)), dt)
            }
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn compute_path(&mut self, ctx: &SteerContext<'_>, target: Vec2) -> SteerResult<Path> {
        match ctx.find_path(self.body.position, target) {
            Ok(path) => Ok(path),
            Err(err) => {
                log::warn!("path to {target} could not be computed: {err}");
                self.stop(false);
                Err(err.into())
            }
        }
    }

    fn tick_facing(&mut self, target: Vec2, dt: f32) -> TickStatus {
        let to_target = target - self.body.position;
        if to_target.length() <= f32::EPSILON {
            // Facing a point we are standing on: trivially done.
            self.stop(true);
            return TickStatus::Completed;
        }
        let desired = to_target.angle();
        self.body.heading =
            rotate_toward(self.body.heading, desired, self.params.max_turn_rate * dt);

        if angle_between(self.body.heading, desired) <= self.params.facing_tolerance {
            self.stop(true);
            TickStatus::Completed
        } else {
            self.mode = Mode::Facing { target };
            TickStatus::Moving
        }
    }

    /// One step of `Arriving` (`chase == None`) or `Chasing`.
    fn tick_travel(
        &mut self,
        ctx: &SteerContext<'_>,
        mut travel: Travel,
        chase: Option<(AgentId, Vec2)>,
        dt: f32,
    ) -> TickStatus {
        let p = self.params;

        // Chase bookkeeping: live target position, replanning, arrival.
        let chase = if let Some((target, last_known)) = chase {
            let Some(current) = ctx.targets.target_position(target) else {
                log::debug!("chase target {target} lost");
                self.stop(false);
                return TickStatus::TargetLost;
            };

            if self.body.position.distance(current)
                <= travel.acceptance.max(p.arrive_threshold)
            {
                self.stop(true);
                return TickStatus::Completed;
            }

            let mut last_known = last_known;
            if last_known.distance(current) > p.chase_recalc_distance {
                match ctx.find_path(self.body.position, current) {
                    Ok(path) => {
                        travel = Travel { path, index: 0, acceptance: travel.acceptance };
                        last_known = current;
                    }
                    Err(err) => {
                        // Hold position; the drift check fires again next
                        // tick, giving a natural retry window.
                        log::warn!("chase replan failed: {err}");
                        self.body.velocity = Vec2::ZERO;
                        self.mode = Mode::Chasing { travel, target, last_known };
                        return TickStatus::Moving;
                    }
                }
            }
            Some((target, last_known))
        } else {
            None
        };

        if travel.path.is_empty() {
            // Precondition violation — a request never arms an empty path.
            log::warn!("steering tick on an empty path; stopping");
            self.stop(false);
            return TickStatus::Still;
        }

        // String-pulling from the current position.
        travel.index = smooth_index(
            ctx.oracle,
            &self.body.collision_enabled,
            self.body.position,
            &travel.path.waypoints,
            travel.index,
            p.clearance,
            travel.acceptance.max(p.arrive_threshold),
        );

        let target_wp = travel.path.waypoints[travel.index];
        let to_target = target_wp - self.body.position;
        let distance = to_target.length();
        let on_final = travel.index == travel.path.waypoints.len() - 1;
        let arrive_radius = travel.acceptance.max(p.arrive_threshold);

        // Rotate first; translate only once roughly facing the target.
        if distance > f32::EPSILON {
            let desired = to_target.angle();
            self.body.heading =
                rotate_toward(self.body.heading, desired, p.max_turn_rate * dt);
            if angle_between(self.body.heading, desired) > p.max_movement_angle {
                self.body.velocity = Vec2::ZERO;
                self.restore_travel(travel, chase);
                return TickStatus::Moving;
            }
        }

        // Speed selection.
        let speed = if on_final && distance <= arrive_radius {
            self.stop(true);
            return TickStatus::Completed;
        } else if !on_final || distance > p.satisfaction_radius.max(arrive_radius) {
            p.max_linear_speed
        } else {
            (distance / p.time_to_target).min(p.max_linear_speed)
        };

        self.body.velocity = self.body.forward() * speed;
        self.body.position += self.body.velocity * dt;

        // Advance past a reached intermediate waypoint.
        if !on_final && self.body.position.distance(target_wp) < p.arrive_threshold {
            travel.index += 1;
        }

        self.restore_travel(travel, chase);
        TickStatus::Moving
    }

    fn restore_travel(&mut self, travel: Travel, chase: Option<(AgentId, Vec2)>) {
        self.mode = match chase {
            Some((target, last_known)) => Mode::Chasing { travel, target, last_known },
            None => Mode::Arriving { travel },
        };
    }
}
