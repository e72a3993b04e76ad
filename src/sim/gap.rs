//! Moving gaps and the lane passability query
//!
//! A gap carrier is a passable interval drifting through an otherwise solid
//! lane. Intervals are half-open and may straddle the wraparound seam, in
//! which case they cover `[start, W)` and `[0, end - W)`.

use serde::{Deserialize, Serialize};

use super::motion::{Bias, BoundaryEvent, Heading, LaneMotion, LaneTraveler, Sweep};
use crate::wrap_coord;

/// A passable breach that travels through the lane stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapCarrier {
    pub id: u32,
    /// Lane the carrier was created on
    pub home_lane: usize,
    /// Fixed start offset in [0, W)
    pub start: f32,
    /// Interval width, always below the field width
    pub width: f32,
    pub motion: LaneMotion,
}

impl GapCarrier {
    pub fn new(id: u32, lane: usize, start: f32, width: f32, heading: Heading, bias: Bias) -> Self {
        Self {
            id,
            home_lane: lane,
            start,
            width,
            motion: LaneMotion::new(0.0, heading, lane, bias),
        }
    }

    /// Lane the carrier currently occupies
    #[inline]
    pub fn lane(&self) -> usize {
        self.motion.lane
    }

    /// Interval start normalized into [0, W)
    #[inline]
    pub fn normalized_start(&self, field_width: f32) -> f32 {
        wrap_coord(self.start + self.motion.offset, field_width)
    }

    /// Whether horizontal position `x` falls inside this gap
    pub fn covers(&self, x: f32, field_width: f32) -> bool {
        let x = wrap_coord(x, field_width);
        let start = self.normalized_start(field_width);
        let end = start + self.width;

        if end <= field_width {
            x >= start && x < end
        } else {
            // Wraps through the seam
            x >= start || x < end - field_width
        }
    }

    /// The interval as one or two non-wrapping spans
    pub fn spans(&self, field_width: f32) -> Vec<(f32, f32)> {
        let start = self.normalized_start(field_width);
        let end = start + self.width;
        if end <= field_width {
            vec![(start, end)]
        } else {
            vec![(start, field_width), (0.0, end - field_width)]
        }
    }
}

impl LaneTraveler for GapCarrier {
    fn motion(&self) -> &LaneMotion {
        &self.motion
    }

    fn motion_mut(&mut self) -> &mut LaneMotion {
        &mut self.motion
    }

    fn sweep(&self) -> Sweep {
        Sweep {
            origin: self.start,
            span: self.width,
            exit_width: 0.0,
        }
    }
}

/// Every gap carrier in the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapField {
    pub field_width: f32,
    /// Sorted by id for deterministic iteration
    pub carriers: Vec<GapCarrier>,
}

impl GapField {
    pub fn new(field_width: f32) -> Self {
        Self {
            field_width,
            carriers: Vec::new(),
        }
    }

    pub fn push(&mut self, carrier: GapCarrier) {
        self.carriers.push(carrier);
        self.carriers.sort_by_key(|c| c.id);
    }

    /// Carriers currently assigned to a lane
    pub fn on_lane(&self, lane: usize) -> impl Iterator<Item = &GapCarrier> {
        self.carriers.iter().filter(move |c| c.lane() == lane)
    }

    /// Whether `x` is open on `lane`: the union of every carrier on the lane.
    /// A lane without carriers is solid everywhere.
    pub fn is_passable(&self, lane: usize, x: f32) -> bool {
        self.on_lane(lane).any(|c| c.covers(x, self.field_width))
    }

    /// Open spans on a lane, unmerged, for drawing
    pub fn open_spans(&self, lane: usize) -> Vec<(f32, f32)> {
        self.on_lane(lane)
            .flat_map(|c| c.spans(self.field_width))
            .collect()
    }

    /// Advance every carrier one tick
    pub fn advance(&mut self, speed: f32, lane_count: usize) -> Vec<(u32, BoundaryEvent)> {
        let field_width = self.field_width;
        self.carriers
            .iter_mut()
            .filter_map(|c| c.travel(speed, field_width, lane_count).map(|ev| (c.id, ev)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn carrier(id: u32, lane: usize, start: f32, width: f32) -> GapCarrier {
        GapCarrier::new(id, lane, start, width, Heading::Right, Bias::Up)
    }

    #[test]
    fn test_union_of_two_gaps() {
        let mut field = GapField::new(200.0);
        field.push(carrier(1, 2, 10.0, 30.0));
        field.push(carrier(2, 2, 150.0, 20.0));

        assert!(field.is_passable(2, 25.0));
        assert!(!field.is_passable(2, 100.0));
        assert!(field.is_passable(2, 160.0));
    }

    #[test]
    fn test_wraparound_interval() {
        let mut field = GapField::new(200.0);
        field.push(carrier(1, 0, 190.0, 30.0));

        assert!(field.is_passable(0, 195.0));
        assert!(field.is_passable(0, 10.0));
        assert!(!field.is_passable(0, 100.0));
        // Half-open: the far end is solid
        assert!(!field.is_passable(0, 20.0));
    }

    #[test]
    fn test_lane_without_carriers_is_solid() {
        let mut field = GapField::new(200.0);
        field.push(carrier(1, 0, 0.0, 150.0));

        for x in (0..200).map(|x| x as f32) {
            assert!(!field.is_passable(1, x));
        }
    }

    #[test]
    fn test_query_x_is_normalized() {
        let mut field = GapField::new(200.0);
        field.push(carrier(1, 0, 10.0, 30.0));
        assert!(field.is_passable(0, 225.0));
        assert!(field.is_passable(0, -175.0));
    }

    #[test]
    fn test_raw_offset_moves_interval() {
        let mut gap = carrier(1, 0, 10.0, 30.0);
        gap.motion.offset = -30.0;
        // Start at -20 wraps to 180, end wraps to 10
        assert_eq!(gap.normalized_start(200.0), 180.0);
        assert!(gap.covers(5.0, 200.0));
        assert!(gap.covers(185.0, 200.0));
        assert!(!gap.covers(15.0, 200.0));
        assert_eq!(gap.spans(200.0), vec![(180.0, 200.0), (0.0, 10.0)]);
    }

    #[test]
    fn test_carrier_leaves_lane_after_sweep() {
        let mut field = GapField::new(200.0);
        field.push(carrier(1, 0, 150.0, 40.0));

        // End reaches 200 after 10 ticks at 1/tick
        for _ in 0..9 {
            assert!(field.advance(1.0, 3).is_empty());
        }
        let events = field.advance(1.0, 3);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, 1);
        assert_eq!(field.on_lane(0).count(), 0);
        assert!(!field.is_passable(0, 170.0));
        // Now on lane 1 flush against the right edge
        assert!(field.is_passable(1, 170.0));
        assert!(field.is_passable(1, 199.0));
    }

    proptest! {
        #[test]
        fn prop_passable_is_union_of_spans(
            gaps in prop::collection::vec((0.0f32..200.0, 1.0f32..120.0, -400.0f32..400.0), 1..4),
            x in 0.0f32..200.0,
        ) {
            let mut field = GapField::new(200.0);
            for (i, &(start, width, offset)) in gaps.iter().enumerate() {
                let mut c = carrier(i as u32 + 1, 0, start, width);
                c.motion.offset = offset;
                field.push(c);
            }
            let in_spans = field.open_spans(0).iter().any(|&(a, b)| x >= a && x < b);
            prop_assert_eq!(field.is_passable(0, x), in_spans);
            prop_assert!(!field.is_passable(1, x));
        }
    }
}
