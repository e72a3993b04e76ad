//! Fixed timestep simulation tick
//!
//! Order within a tick: player input, gap carriers, obstacles, player
//! kinematics, then hazards. The player always collides against the
//! post-motion layout of the same tick.

use serde::{Deserialize, Serialize};

use super::collision::is_crushed;
use super::player::VerticalContact;
use super::state::World;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump request; ignored while airborne
    pub jump: bool,
}

/// Most significant thing that happened to the player this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Running,
    HeadBlocked,
    Landed,
    Crushed,
    ObstacleHit(u32),
}

impl TickOutcome {
    /// Outcomes that cost the player a life
    pub fn is_fatal(&self) -> bool {
        matches!(self, TickOutcome::Crushed | TickOutcome::ObstacleHit(_))
    }
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) -> TickOutcome {
    world.time_ticks += 1;

    let physics = world.config.physics;
    let field_width = world.config.field_width;

    if input.left {
        world.player.move_left(physics.move_speed, field_width);
    }
    if input.right {
        world.player.move_right(physics.move_speed, field_width);
    }
    if input.jump {
        world.player.jump(physics.jump_strength);
    }

    let lane_count = world.lanes.len();
    world.gaps.advance(world.config.gap_speed, lane_count);
    for obstacle in &mut world.obstacles {
        obstacle.advance(&world.lanes, field_width);
    }

    let contact = world
        .player
        .step(&world.lanes, &world.gaps, &physics, world.config.floor_y);

    world.invulnerable_ticks = world.invulnerable_ticks.saturating_sub(1);
    if !world.is_invulnerable() {
        let bounds = world.player.bounds();
        if is_crushed(&world.lanes, &world.gaps, &bounds) {
            log::debug!("Player crushed at tick {}", world.time_ticks);
            return TickOutcome::Crushed;
        }
        if let Some(hit) = world.obstacles.iter().find(|o| o.intersects(&bounds)) {
            log::debug!("Player hit by {} #{}", hit.kind.as_str(), hit.id);
            return TickOutcome::ObstacleHit(hit.id);
        }
    }

    match contact {
        VerticalContact::HeadBlocked { .. } => TickOutcome::HeadBlocked,
        VerticalContact::Landed { .. } => TickOutcome::Landed,
        VerticalContact::None => TickOutcome::Running,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::LevelConfig;
    use crate::sim::motion::{Bias, Heading};
    use crate::sim::obstacle::ObstacleKind;
    use glam::Vec2;

    fn quiet_world(config: LevelConfig) -> World {
        let mut world = World::empty(config, 7).expect("valid config");
        world.invulnerable_ticks = 0;
        world
    }

    #[test]
    fn test_idle_on_floor_keeps_running() {
        let mut world = quiet_world(LevelConfig::default());
        for _ in 0..120 {
            assert_eq!(world.advance_tick(&TickInput::default()), TickOutcome::Running);
        }
        assert_eq!(world.time_ticks, 120);
    }

    #[test]
    fn test_crushed_between_two_lanes() {
        let mut config = LevelConfig::default();
        config.lane_ys = vec![200.0, 180.0];
        config.gap_count = 0;
        let mut world = quiet_world(config);
        world.player.pos = Vec2::new(100.0, 175.0);
        world.player.airborne = true;

        assert_eq!(world.advance_tick(&TickInput::default()), TickOutcome::Crushed);
    }

    #[test]
    fn test_invulnerability_suppresses_crush() {
        let mut config = LevelConfig::default();
        config.lane_ys = vec![200.0, 180.0];
        let mut world = World::empty(config, 7).expect("valid config");
        world.invulnerable_ticks = 10;
        world.player.pos = Vec2::new(100.0, 175.0);
        world.player.airborne = true;

        assert_ne!(world.advance_tick(&TickInput::default()), TickOutcome::Crushed);
    }

    #[test]
    fn test_obstacle_hit_reports_id() {
        let mut world = quiet_world(LevelConfig::default());
        // Player stands on the floor at x 100..120, y 338..370; put a car on
        // the floor-level lane row moving into the player
        world.config.obstacle_speed = 2.0;
        let id = world
            .add_obstacle(ObstacleKind::Car, 0, 125.0, Heading::Left, Bias::Up)
            .expect("lane exists");
        // Car body spans y 322..340 which overlaps the player's 338..370
        let mut outcome = TickOutcome::Running;
        for _ in 0..10 {
            outcome = world.advance_tick(&TickInput::default());
            if outcome != TickOutcome::Running {
                break;
            }
        }
        assert_eq!(outcome, TickOutcome::ObstacleHit(id));
    }

    #[test]
    fn test_gap_moves_before_player_checks() {
        let mut config = LevelConfig::default();
        config.gap_speed = 10.0;
        let mut world = quiet_world(config);
        // Player resting on lane 1 with center at x=110
        world.player.pos = Vec2::new(100.0, 280.0 - 32.0);
        // Gap [50, 105) moving right: covers 110 only after this tick's motion
        world
            .add_gap(1, 50.0, 55.0, Heading::Right, Bias::Up)
            .expect("lane exists");
        assert!(!world.is_passable(1, 110.0));

        world.advance_tick(&TickInput::default());
        assert!(world.is_passable(1, 110.0));
        assert!(!world.player.airborne);
        assert!(world.player.bottom() > 280.0);
    }

    #[test]
    fn test_jump_head_bump_then_landing() {
        let mut world = quiet_world(LevelConfig::default());
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        let mut outcomes = vec![world.advance_tick(&jump)];
        for _ in 0..40 {
            outcomes.push(world.advance_tick(&TickInput::default()));
        }
        let head = outcomes.iter().position(|o| *o == TickOutcome::HeadBlocked);
        let land = outcomes.iter().position(|o| *o == TickOutcome::Landed);
        assert!(head.is_some());
        assert!(land.is_some());
        assert!(head < land);
        // All lanes are solid, so the player came down on lane 0
        assert_eq!(world.player.bottom(), 340.0);
    }

    #[test]
    fn test_movement_wraps_player() {
        let mut world = quiet_world(LevelConfig::default());
        world.player.pos.x = 0.0;
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..5 {
            world.advance_tick(&left);
        }
        assert_eq!(world.player.pos.x, world.config.field_width);
        assert!(!world.player.airborne);
    }

    #[test]
    fn test_entities_stay_in_lane_range() {
        let mut config = LevelConfig::for_speed(6.0);
        config.obstacle_count = 6;
        let mut world = World::new(config, 2024).expect("valid config");
        for _ in 0..5000 {
            world.advance_tick(&TickInput::default());
            assert!(world.query_gap_carriers().iter().all(|g| g.lane < 5));
            assert!(world.query_obstacles().iter().all(|o| o.lane < 5));
        }
    }
}
