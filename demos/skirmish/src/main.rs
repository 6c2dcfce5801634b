//! skirmish — smallest end-to-end demo of the nav stack.
//!
//! Builds a 20×12 arena with a few obstacles, spawns a champion and two
//! minions per faction, and scripts a short engagement: the minions push
//! toward the enemy side while the red champion, wary of the blue champion's
//! position, takes an influence-weighted route and then chases the nearest
//! blue minion down.  Progress is printed once per simulated second.
//!
//! Run with `RUST_LOG=debug` to see graph construction and replanning logs.

use anyhow::Result;

use nav_core::{AgentClass, AgentId, Faction, Tick, Vec2};
use nav_graph::{Bounds, GraphConfig, StaticGeometry};
use nav_session::{Session, SessionConfig, SessionObserver};
use nav_steer::TickStatus;

// ── Constants ─────────────────────────────────────────────────────────────────

const TICKS_PER_SECOND: u64 = 50;
const RUN_SECONDS: u64 = 30;

// ── Arena ─────────────────────────────────────────────────────────────────────

/// A lane arena: open ground with a center pillar and two side blocks.
fn arena() -> StaticGeometry {
    let mut geo = StaticGeometry::open();
    geo.add_circle(Vec2::new(10.0, 6.0), 1.2)
        .add_box(Vec2::new(5.0, 0.5), Vec2::new(6.5, 3.0))
        .add_box(Vec2::new(13.5, 9.0), Vec2::new(15.0, 11.5));
    geo
}

// ── Progress reporting ────────────────────────────────────────────────────────

struct Reporter {
    names: Vec<(AgentId, &'static str)>,
}

impl SessionObserver for Reporter {
    fn on_agent_step(&mut self, tick: Tick, agent: AgentId, status: TickStatus) {
        if matches!(status, TickStatus::Completed | TickStatus::TargetLost) {
            let name = self
                .names
                .iter()
                .find(|(id, _)| *id == agent)
                .map(|(_, n)| *n)
                .unwrap_or("?");
            println!("[{tick}] {name}: {status:?}");
        }
    }
}

fn print_positions(session: &Session, reporter: &Reporter) -> Result<()> {
    let tick = session.clock().current;
    print!("[{tick}]");
    for (id, name) in &reporter.names {
        match session.position(*id) {
            Ok(pos) => print!("  {name} {pos}"),
            Err(_) => print!("  {name} (gone)"),
        }
    }
    println!();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let config = SessionConfig::new(GraphConfig::new(
        Bounds::new(Vec2::new(0.0, 0.0), Vec2::new(20.0, 12.0)),
        1.0,
        0.45,
    ));
    let mut session = Session::new(arena(), config);
    println!(
        "arena graph: {} nodes, {} edges",
        session.graph().node_count(),
        session.graph().edge_count()
    );

    // Red pushes east, blue pushes west.
    let red_champ = session.spawn(Faction::Red, AgentClass::Champion, Vec2::new(1.0, 6.0), 0.0);
    let red_minion_a = session.spawn(Faction::Red, AgentClass::Minion, Vec2::new(1.0, 4.0), 0.0);
    let red_minion_b = session.spawn(Faction::Red, AgentClass::Minion, Vec2::new(1.0, 8.0), 0.0);
    let blue_champ = session.spawn(
        Faction::Blue,
        AgentClass::Champion,
        Vec2::new(19.0, 6.0),
        std::f32::consts::PI,
    );
    let blue_minion = session.spawn(
        Faction::Blue,
        AgentClass::Minion,
        Vec2::new(19.0, 4.0),
        std::f32::consts::PI,
    );

    let mut reporter = Reporter {
        names: vec![
            (red_champ, "red-champ"),
            (red_minion_a, "red-minion-a"),
            (red_minion_b, "red-minion-b"),
            (blue_champ, "blue-champ"),
            (blue_minion, "blue-minion"),
        ],
    };

    // Opening moves.  The red champion's route is influence-weighted, so it
    // drifts away from the blue champion's side of the pillar.
    session.arrive(red_champ, Vec2::new(16.0, 6.0), 1.0, true, None)?;
    session.move_to(red_minion_a, Vec2::new(18.0, 4.0))?;
    session.move_to(red_minion_b, Vec2::new(18.0, 8.0))?;
    session.arrive(blue_champ, Vec2::new(12.0, 6.0), 1.0, false, None)?;
    session.chase(blue_minion, red_minion_a, 1.0, false, None)?;

    // Ten seconds in, the red champion switches to hunting the blue minion.
    let retarget_at = Tick(10 * TICKS_PER_SECOND);

    for second in 0..RUN_SECONDS {
        if session.clock().current == retarget_at {
            log::info!("red champion retargets the blue minion");
            session.chase(red_champ, blue_minion, 1.0, true, None)?;
        }
        session.run_ticks(TICKS_PER_SECOND, &mut reporter);
        if second % 5 == 4 {
            print_positions(&session, &reporter)?;
        }
    }

    Ok(())
}
