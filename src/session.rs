//! Run-level game state wrapped around the simulation
//!
//! The `World` knows nothing about lives, score or levels. `Session` owns one
//! world at a time, reacts to its tick outcomes and rebuilds it on level
//! change.

use serde::{Deserialize, Serialize};

use crate::consts::FPS;
use crate::sim::{
    ConfigError, LevelConfig, ObstacleKind, SpawnPolicy, TickInput, TickOutcome, World,
};

/// Lives at the start of a run
pub const START_LIVES: u32 = 5;
/// Points awarded per second of play
pub const SCORE_PER_SECOND: u64 = 10;
/// Level-complete screen duration unless skipped with jump
pub const TRANSITION_TICKS: u32 = 3 * FPS;
/// Grace period after losing a life
pub const RESPAWN_INVULNERABLE_TICKS: u32 = FPS;
/// Delay between trickled-in obstacles
pub const SPAWN_INTERVAL_TICKS: u32 = 10 * FPS;
pub const MAX_INITIAL_OBSTACLES: usize = 6;
pub const MAX_TRICKLE_OBSTACLES: usize = 4;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    /// Level cleared, waiting before the next one is built
    LevelTransition,
    GameOver,
}

/// Notable session changes, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    LifeLost { cause: TickOutcome, lives_left: u32 },
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u64, level: u32 },
}

/// Base horizontal speed of gaps for a level (obstacles move at 0.8x)
pub fn level_speed(level: u32) -> f32 {
    1.5 + 0.5 * level.saturating_sub(1) as f32
}

/// Obstacle kinds unlocked by `level`: four at level 1, one more per level
pub fn roster_for_level(level: u32) -> Vec<ObstacleKind> {
    let unlocked = (3 + level as usize).clamp(4, ObstacleKind::ALL.len());
    ObstacleKind::ALL[..unlocked].to_vec()
}

/// Level configuration derived from `template` for `level`
pub fn level_config(template: &LevelConfig, level: u32) -> LevelConfig {
    let speed = level_speed(level);
    let mut config = LevelConfig::for_speed(speed);
    config.field_width = template.field_width;
    config.floor_y = template.floor_y;
    config.lane_ys = template.lane_ys.clone();
    config.lane_thickness = template.lane_thickness;
    config.gap_count = template.lane_ys.len();
    config.gap_width_min = template.gap_width_min;
    config.gap_width_max = template.gap_width_max;
    config.player_size = template.player_size;
    config.player_spawn = template.player_spawn;
    config.physics = template.physics;
    config.start_invulnerable_ticks = template.start_invulnerable_ticks;
    config.obstacle_count = (1 + level as usize).min(MAX_INITIAL_OBSTACLES);
    config
}

/// A run: lives, score and level progression over a sequence of worlds
#[derive(Debug, Clone)]
pub struct Session {
    pub world: World,
    pub phase: SessionPhase,
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    pub seed: u64,
    template: LevelConfig,
    start_lives: u32,
    policy: SpawnPolicy,
    score_timer: u32,
    transition_timer: u32,
    spawn_timer: u32,
    pending_spawns: usize,
}

impl Session {
    /// Start a run at level 1 with the standard layout
    pub fn new(seed: u64, lives: u32) -> Result<Self, ConfigError> {
        Self::with_template(LevelConfig::default(), seed, lives)
    }

    /// Start a run whose levels share `template`'s geometry and physics
    pub fn with_template(template: LevelConfig, seed: u64, lives: u32) -> Result<Self, ConfigError> {
        template.validate()?;
        let mut policy = SpawnPolicy::new(roster_for_level(1));
        let world = World::with_policy(level_config(&template, 1), level_seed(seed, 1), &mut policy)?;
        let lives = lives.max(1);
        log::info!("Session started: seed={}, lives={}", seed, lives);
        Ok(Self {
            world,
            phase: SessionPhase::Playing,
            level: 1,
            lives,
            score: 0,
            seed,
            template,
            start_lives: lives,
            policy,
            score_timer: 0,
            transition_timer: 0,
            spawn_timer: 0,
            pending_spawns: 1,
        })
    }

    /// Reset lives, score and level and rebuild level 1
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.level = 1;
        self.lives = self.start_lives;
        self.score = 0;
        self.score_timer = 0;
        self.start_level()?;
        log::info!("Session restarted");
        Ok(())
    }

    fn start_level(&mut self) -> Result<(), ConfigError> {
        let config = level_config(&self.template, self.level);
        self.policy = SpawnPolicy::new(roster_for_level(self.level));
        self.world = World::with_policy(config, level_seed(self.seed, self.level), &mut self.policy)?;
        self.phase = SessionPhase::Playing;
        self.transition_timer = 0;
        self.spawn_timer = 0;
        self.pending_spawns = (self.level as usize).min(MAX_TRICKLE_OBSTACLES);
        log::info!(
            "Level {} started (speed {:.1}, {} obstacles)",
            self.level,
            level_speed(self.level),
            self.world.obstacles.len()
        );
        Ok(())
    }

    /// Advance the session by one tick
    pub fn tick(&mut self, input: &TickInput) -> Result<Option<SessionEvent>, ConfigError> {
        match self.phase {
            SessionPhase::GameOver => Ok(None),
            SessionPhase::LevelTransition => {
                self.transition_timer += 1;
                if input.jump || self.transition_timer >= TRANSITION_TICKS {
                    self.start_level()?;
                    return Ok(Some(SessionEvent::LevelStarted { level: self.level }));
                }
                Ok(None)
            }
            SessionPhase::Playing => Ok(self.play(input)),
        }
    }

    fn play(&mut self, input: &TickInput) -> Option<SessionEvent> {
        let outcome = self.world.advance_tick(input);

        // Reaching the top wins over any hazard on the same tick
        if self.world.player.top() <= 0.0 {
            let cleared = self.level;
            self.level += 1;
            self.phase = SessionPhase::LevelTransition;
            self.transition_timer = 0;
            log::info!("Level {} complete, score {}", cleared, self.score);
            return Some(SessionEvent::LevelComplete { level: cleared });
        }

        let mut event = None;
        if outcome.is_fatal() {
            self.lives = self.lives.saturating_sub(1);
            self.world.reset_player(RESPAWN_INVULNERABLE_TICKS);
            if self.lives == 0 {
                self.phase = SessionPhase::GameOver;
                log::info!("Game over at level {} with {} points", self.level, self.score);
                return Some(SessionEvent::GameOver {
                    score: self.score,
                    level: self.level,
                });
            }
            log::info!("Life lost ({:?}), {} left", outcome, self.lives);
            event = Some(SessionEvent::LifeLost {
                cause: outcome,
                lives_left: self.lives,
            });
        }

        self.score_timer += 1;
        if self.score_timer >= FPS {
            self.score += SCORE_PER_SECOND;
            self.score_timer = 0;
        }

        if self.pending_spawns > 0 {
            self.spawn_timer += 1;
            if self.spawn_timer >= SPAWN_INTERVAL_TICKS {
                self.world.spawn_obstacle(&mut self.policy);
                self.pending_spawns -= 1;
                self.spawn_timer = 0;
            }
        }

        event
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }
}

/// Per-level seed so every level of a run gets its own layout
fn level_seed(seed: u64, level: u32) -> u64 {
    seed ^ u64::from(level).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Simple AI that climbs by waiting under gaps in the lane above
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
    /// Input for the next tick
    pub fn decide(&self, world: &World) -> TickInput {
        let player = &world.player;
        // Mid-jump or falling through a gap
        if player.airborne || player.velocity_y != 0.0 {
            return TickInput::default();
        }

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let center_x = player.center_x();
        let standing = world
            .lanes
            .iter()
            .find(|lane| (player.bottom() - lane.y).abs() < 0.5)
            .map(|lane| lane.index);

        // Any jump from the floor ends on the bottom lane
        let Some(lane) = standing else {
            return jump;
        };
        let above = lane + 1;
        if above >= world.lanes.len() || world.is_passable(above, center_x) {
            return jump;
        }

        let field_width = world.config.field_width;
        let nearest = world
            .gaps
            .open_spans(above)
            .into_iter()
            .map(|(start, end)| {
                let target = (start + end) / 2.0;
                // Shortest signed distance across the wraparound seam
                crate::wrap_coord(target - center_x + field_width / 2.0, field_width)
                    - field_width / 2.0
            })
            .min_by(|a, b| a.abs().total_cmp(&b.abs()));

        match nearest {
            Some(d) if d < -world.config.physics.move_speed => TickInput {
                left: true,
                ..Default::default()
            },
            Some(d) if d > world.config.physics.move_speed => TickInput {
                right: true,
                ..Default::default()
            },
            _ => TickInput::default(),
        }
    }
}
