//! Lane traversal motion shared by gap carriers and obstacles
//!
//! An entity sweeps horizontally along its lane. Once its leading edge has
//! travelled `exit_width` past the edge of the field it fires a boundary
//! event: it steps one lane in the direction of its vertical bias, reappears
//! flush against the edge it just left, and sweeps back the other way. At the
//! top or bottom of the stack the lane index is clamped and the bias flips,
//! so entities snake up and down the stack forever.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Horizontal sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) {
            Heading::Right
        } else {
            Heading::Left
        }
    }
}

/// Persistent lane-stepping direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bias {
    /// Toward higher lane indices (up the stack)
    Up,
    /// Toward lane 0
    Down,
}

impl Bias {
    #[inline]
    pub fn step(self) -> i64 {
        match self {
            Bias::Up => 1,
            Bias::Down => -1,
        }
    }

    #[inline]
    pub fn inverted(self) -> Self {
        match self {
            Bias::Up => Bias::Down,
            Bias::Down => Bias::Up,
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) { Bias::Up } else { Bias::Down }
    }
}

/// Horizontal footprint of a travelling entity
///
/// The entity covers `[origin + offset, origin + offset + span)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    /// Fixed base the raw offset is measured from
    pub origin: f32,
    /// Entity width along the lane
    pub span: f32,
    /// How far past the field edge the leading edge must travel before the
    /// entity counts as gone
    pub exit_width: f32,
}

/// What happened when an entity left the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryEvent {
    pub from_lane: usize,
    pub to_lane: usize,
    pub heading_before: Heading,
    pub heading_after: Heading,
    /// Whether the lane stack clamped the step and inverted the bias
    pub bias_inverted: bool,
}

/// Mutable traversal state carried by every travelling entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneMotion {
    /// Raw horizontal offset, relative to the sweep origin
    pub offset: f32,
    pub heading: Heading,
    pub lane: usize,
    pub bias: Bias,
}

impl LaneMotion {
    pub fn new(offset: f32, heading: Heading, lane: usize, bias: Bias) -> Self {
        Self {
            offset,
            heading,
            lane,
            bias,
        }
    }

    /// Left edge of the entity in field coordinates (unwrapped)
    #[inline]
    pub fn left_edge(&self, sweep: &Sweep) -> f32 {
        sweep.origin + self.offset
    }

    /// Advance one tick. Returns the boundary event if one fired; at most one
    /// fires per call.
    pub fn advance(
        &mut self,
        sweep: &Sweep,
        speed: f32,
        field_width: f32,
        lane_count: usize,
    ) -> Option<BoundaryEvent> {
        self.offset += self.heading.sign() * speed;

        let left = self.left_edge(sweep);
        let exited = match self.heading {
            Heading::Right => left + sweep.span >= field_width + sweep.exit_width,
            Heading::Left => left <= -sweep.exit_width,
        };
        if !exited {
            return None;
        }

        let from_lane = self.lane;
        let heading_before = self.heading;
        let bias_inverted = self.step_lane(lane_count);

        // Reappear flush with the edge just left, still outside by exit_width
        self.offset = match heading_before {
            Heading::Right => field_width + sweep.exit_width - sweep.span - sweep.origin,
            Heading::Left => -sweep.exit_width - sweep.origin,
        };
        self.heading = heading_before.reversed();

        Some(BoundaryEvent {
            from_lane,
            to_lane: self.lane,
            heading_before,
            heading_after: self.heading,
            bias_inverted,
        })
    }

    /// Move one lane along the bias, clamping at the ends of the stack
    fn step_lane(&mut self, lane_count: usize) -> bool {
        let last = lane_count.saturating_sub(1);
        let next = self.lane as i64 + self.bias.step();
        if next < 0 {
            self.lane = 0;
            self.bias = Bias::Up;
            true
        } else if next as usize > last {
            self.lane = last;
            self.bias = Bias::Down;
            true
        } else {
            self.lane = next as usize;
            false
        }
    }
}

/// Capability shared by everything that moves with `LaneMotion`
pub trait LaneTraveler {
    fn motion(&self) -> &LaneMotion;
    fn motion_mut(&mut self) -> &mut LaneMotion;
    fn sweep(&self) -> Sweep;

    /// Advance one tick along the lane stack
    fn travel(
        &mut self,
        speed: f32,
        field_width: f32,
        lane_count: usize,
    ) -> Option<BoundaryEvent> {
        let sweep = self.sweep();
        let event = self
            .motion_mut()
            .advance(&sweep, speed, field_width, lane_count);
        if let Some(ev) = &event {
            log::debug!(
                "boundary: lane {} -> {}, {:?} -> {:?}",
                ev.from_lane,
                ev.to_lane,
                ev.heading_before,
                ev.heading_after
            );
        }
        event
    }
}
