//! Unit tests for nav-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EdgeId, NodeId};

    #[test]
    fn index_cast() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(usize::from(id), 42);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod vec2 {
    use std::f32::consts::{FRAC_PI_2, PI};

    use crate::vec2::{angle_between, point_segment_distance, rotate_toward, wrap_angle};
    use crate::Vec2;

    const EPS: f32 = 1e-5;

    #[test]
    fn length_and_distance() {
        let v = Vec2::new(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < EPS);
        assert!((Vec2::ZERO.distance(v) - 5.0).abs() < EPS);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let unit = Vec2::new(0.0, 2.5).normalized();
        assert!((unit.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn angle_roundtrip() {
        let v = Vec2::from_angle(FRAC_PI_2);
        assert!((v.angle() - FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn wrap_stays_in_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < EPS);
        assert!((wrap_angle(-3.0 * PI) - PI).abs() < EPS);
        assert!(wrap_angle(0.1) - 0.1 < EPS);
    }

    #[test]
    fn angle_between_takes_shorter_arc() {
        // 350° vs 10° are 20° apart, not 340°.
        let a = (350.0f32).to_radians();
        let b = (10.0f32).to_radians();
        assert!((angle_between(a, b) - (20.0f32).to_radians()).abs() < EPS);
    }

    #[test]
    fn rotate_toward_never_overshoots() {
        // A quarter turn limited to 0.1 rad per step.
        let stepped = rotate_toward(0.0, FRAC_PI_2, 0.1);
        assert!((stepped - 0.1).abs() < EPS);
        // Within the step limit the rotation snaps to the target exactly.
        assert_eq!(rotate_toward(0.0, 0.05, 0.1), 0.05);
    }

    #[test]
    fn rotate_toward_crosses_pi_seam() {
        // From just below +π toward just above -π: the shorter arc crosses
        // the seam instead of sweeping the full circle.
        let from = PI - 0.05;
        let to = -PI + 0.05;
        let stepped = rotate_toward(from, to, 0.2);
        assert_eq!(stepped, to);
    }

    #[test]
    fn segment_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        // Perpendicular off the middle.
        assert!((point_segment_distance(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < EPS);
        // Beyond the endpoint clamps to the endpoint.
        assert!((point_segment_distance(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < EPS);
        // Degenerate segment.
        assert!((point_segment_distance(Vec2::new(3.0, 4.0), a, a) - 5.0).abs() < EPS);
    }
}

#[cfg(test)]
mod team {
    use crate::{AgentClass, Faction};

    #[test]
    fn enemy_is_involutive() {
        assert_eq!(Faction::Red.enemy(), Faction::Blue);
        assert_eq!(Faction::Blue.enemy().enemy(), Faction::Blue);
    }

    #[test]
    fn champion_outweighs_minion() {
        assert!(AgentClass::Champion.influence_weight() > AgentClass::Minion.influence_weight());
    }
}

#[cfg(test)]
mod time {
    use crate::{Tick, TickClock};

    #[test]
    fn clock_advances() {
        let mut clock = TickClock::new(0.02);
        assert_eq!(clock.current, Tick(0));
        clock.advance();
        clock.advance();
        assert_eq!(clock.current, Tick(2));
        assert!((clock.elapsed_secs() - 0.04).abs() < 1e-6);
    }
}
