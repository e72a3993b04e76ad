//! World state
//!
//! Everything one level needs: the lane table, the gap field, the obstacles
//! and the player, plus the seeded RNG used for setup and spawning.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::{ConfigError, LevelConfig};
use super::gap::{GapCarrier, GapField};
use super::lane::LaneTable;
use super::motion::{Bias, Heading};
use super::obstacle::{Obstacle, ObstacleKind};
use super::player::Player;
use super::spawn::{SpawnPolicy, choose_variant, place};
use super::tick::{TickInput, TickOutcome, tick};

/// Read-only gap carrier snapshot for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapView {
    pub id: u32,
    pub home_lane: usize,
    pub lane: usize,
    /// Normalized start in [0, W)
    pub start: f32,
    pub width: f32,
    pub heading: Heading,
}

/// Read-only obstacle snapshot for renderers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub variant: u8,
    pub pos: Vec2,
    pub size: Vec2,
    pub lane: usize,
    pub heading: Heading,
}

/// Complete simulation state for one level
#[derive(Debug, Clone)]
pub struct World {
    pub config: LevelConfig,
    pub lanes: LaneTable,
    pub gaps: GapField,
    /// Sorted by id for deterministic iteration
    pub obstacles: Vec<Obstacle>,
    pub player: Player,
    /// Ticks left during which crushes and hits are ignored
    pub invulnerable_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seed the RNG was built from
    pub seed: u64,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Build a level with the default spawn policy
    pub fn new(config: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_policy(config, seed, &mut SpawnPolicy::default())
    }

    /// Build a level: one randomly placed gap carrier per configured gap
    /// (cycling through the lanes) and `obstacle_count` obstacles chosen by
    /// `policy`
    pub fn with_policy(
        config: LevelConfig,
        seed: u64,
        policy: &mut SpawnPolicy,
    ) -> Result<Self, ConfigError> {
        let mut world = Self::empty(config, seed)?;

        let field_width = world.config.field_width;
        for i in 0..world.config.gap_count {
            let lane = i % world.lanes.len();
            let start = world.rng.random_range(0.0..field_width);
            let width = world
                .rng
                .random_range(world.config.gap_width_min..=world.config.gap_width_max);
            let heading = Heading::random(&mut world.rng);
            let bias = Bias::random(&mut world.rng);
            world.add_gap(lane, start, width, heading, bias)?;
        }
        for _ in 0..world.config.obstacle_count {
            world.spawn_obstacle(policy);
        }

        log::info!(
            "Level built: seed={}, lanes={}, gaps={}, obstacles={}",
            seed,
            world.lanes.len(),
            world.gaps.carriers.len(),
            world.obstacles.len()
        );
        Ok(world)
    }

    /// A validated level with no gaps or obstacles yet
    pub fn empty(config: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let lanes = LaneTable::new(&config.lane_ys, config.lane_thickness);
        let gaps = GapField::new(config.field_width);
        let player = Player::new(config.player_spawn, config.player_size);
        let invulnerable_ticks = config.start_invulnerable_ticks;
        Ok(Self {
            config,
            lanes,
            gaps,
            obstacles: Vec::new(),
            player,
            invulnerable_ticks,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a gap carrier with its raw offset at zero
    pub fn add_gap(
        &mut self,
        lane: usize,
        start: f32,
        width: f32,
        heading: Heading,
        bias: Bias,
    ) -> Result<u32, ConfigError> {
        self.check_lane(lane)?;
        let field = self.config.field_width;
        if !(width > 0.0 && width < field) {
            return Err(ConfigError::GapTooWide { width, field });
        }
        let id = self.next_entity_id();
        let start = crate::wrap_coord(start, field);
        self.gaps
            .push(GapCarrier::new(id, lane, start, width, heading, bias));
        Ok(id)
    }

    /// Place an obstacle at an explicit spot
    pub fn add_obstacle(
        &mut self,
        kind: ObstacleKind,
        lane: usize,
        x: f32,
        heading: Heading,
        bias: Bias,
    ) -> Result<u32, ConfigError> {
        self.check_lane(lane)?;
        let id = self.next_entity_id();
        let speed = self.config.obstacle_speed;
        self.obstacles.push(Obstacle::new(
            id, kind, 0, &self.lanes, lane, x, heading, bias, speed,
        ));
        Ok(id)
    }

    /// Spawn an obstacle chosen and placed by `policy`
    pub fn spawn_obstacle(&mut self, policy: &mut SpawnPolicy) -> u32 {
        let kind = policy.choose_kind(&mut self.rng);
        let variant = choose_variant(
            kind,
            self.obstacles.iter().map(|o| (o.kind, o.variant)),
            &mut self.rng,
        );
        let at = place(
            kind,
            &self.lanes,
            &self.obstacles,
            self.config.field_width,
            self.config.player_spawn.x,
            &mut self.rng,
        );
        let bias = Bias::random(&mut self.rng);

        let id = self.next_entity_id();
        let speed = self.config.obstacle_speed;
        self.obstacles.push(Obstacle::new(
            id,
            kind,
            variant,
            &self.lanes,
            at.lane,
            at.x,
            at.heading,
            bias,
            speed,
        ));
        log::debug!(
            "Spawned {} #{} on lane {} at x={:.0}",
            kind.as_str(),
            id,
            at.lane,
            at.x
        );
        id
    }

    fn check_lane(&self, lane: usize) -> Result<(), ConfigError> {
        if lane < self.lanes.len() {
            Ok(())
        } else {
            Err(ConfigError::LaneOutOfRange {
                lane,
                count: self.lanes.len(),
            })
        }
    }

    /// Send the player back to the spawn point with a grace period
    pub fn reset_player(&mut self, invulnerable_ticks: u32) {
        self.player.reset(self.config.player_spawn);
        self.invulnerable_ticks = invulnerable_ticks;
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    /// Whether horizontal position `x` is open on `lane`
    pub fn is_passable(&self, lane: usize, x: f32) -> bool {
        self.gaps.is_passable(lane, x)
    }

    /// Advance gaps, obstacles and player by one tick
    pub fn advance_tick(&mut self, input: &TickInput) -> TickOutcome {
        tick(self, input)
    }

    pub fn query_gap_carriers(&self) -> Vec<GapView> {
        let field_width = self.config.field_width;
        self.gaps
            .carriers
            .iter()
            .map(|c| GapView {
                id: c.id,
                home_lane: c.home_lane,
                lane: c.lane(),
                start: c.normalized_start(field_width),
                width: c.width,
                heading: c.motion.heading,
            })
            .collect()
    }

    pub fn query_obstacles(&self) -> Vec<ObstacleView> {
        self.obstacles
            .iter()
            .map(|o| ObstacleView {
                id: o.id,
                kind: o.kind,
                variant: o.variant,
                pos: o.pos,
                size: o.size,
                lane: o.lane(),
                heading: o.motion.heading,
            })
            .collect()
    }
}
