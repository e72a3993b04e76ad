//! Collision queries between the player and the lane stack
//!
//! The subtle part of the game: ascending is tested predictively against the
//! velocity, descending is tested positionally with a tolerance, and both
//! scan the nearest lane first so the closest obstruction always wins.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::gap::GapField;
use super::lane::LaneTable;

/// Axis-aligned box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.min.x + self.size.x / 2.0
    }

    /// Strict overlap on both axes; shared edges do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// First solid lane the top edge would cross this tick while rising
///
/// A lane is a candidate when the top is at or below its underside now and
/// at or above it after moving by `velocity`.
pub fn head_block(
    lanes: &LaneTable,
    gaps: &GapField,
    top: f32,
    velocity: f32,
    center_x: f32,
) -> Option<usize> {
    let next_top = top + velocity;
    lanes
        .nearest_first(|lane| {
            let underside = lane.y + lanes.thickness();
            (top >= underside && next_top <= underside).then(|| top - underside)
        })
        .into_iter()
        .find(|&lane| !gaps.is_passable(lane, center_x))
}

/// First solid lane within reach of the bottom edge while falling or resting
pub fn landing_lane(
    lanes: &LaneTable,
    gaps: &GapField,
    bottom: f32,
    velocity: f32,
    tolerance: f32,
    center_x: f32,
) -> Option<usize> {
    let reach = velocity.abs() + tolerance;
    lanes
        .nearest_first(|lane| {
            let distance = (bottom - lane.y).abs();
            (distance <= reach).then_some(distance)
        })
        .into_iter()
        .find(|&lane| !gaps.is_passable(lane, center_x))
}

/// Distinct heights of every lane pressing on the player
///
/// A lane presses when its band overlaps the player's vertical extent and
/// either its home carrier has drifted to another lane or the lane is solid
/// under the player's horizontal center.
pub fn pressing_levels(lanes: &LaneTable, gaps: &GapField, player: &Aabb) -> Vec<f32> {
    let (top, bottom) = (player.min.y, player.max().y);
    let center_x = player.center_x();

    let mut levels: Vec<f32> = lanes
        .iter()
        .filter(|lane| lanes.band_overlaps(lane.index, top, bottom))
        .filter(|lane| {
            let home = gaps.carriers.iter().find(|c| c.home_lane == lane.index);
            match home {
                // A displaced carrier always pins
                Some(carrier) if carrier.lane() != carrier.home_lane => true,
                _ => !gaps.is_passable(lane.index, center_x),
            }
        })
        .map(|lane| lane.y)
        .collect();
    levels.sort_by(f32::total_cmp);
    levels.dedup();
    levels
}

/// Pinned between two or more solid lane levels at once
pub fn is_crushed(lanes: &LaneTable, gaps: &GapField, player: &Aabb) -> bool {
    pressing_levels(lanes, gaps, player).len() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::gap::GapCarrier;
    use crate::sim::motion::{Bias, Heading};

    const W: f32 = 800.0;

    fn standard_lanes() -> LaneTable {
        LaneTable::new(&[340.0, 280.0, 220.0, 160.0, 100.0], 3.0)
    }

    fn gap_on(lane: usize, start: f32, width: f32) -> GapCarrier {
        GapCarrier::new(lane as u32 + 1, lane, start, width, Heading::Right, Bias::Up)
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0))));
        assert!(!a.overlaps(&Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0))));
        assert!(!a.overlaps(&Aabb::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0))));
        assert!(!a.overlaps(&Aabb::new(Vec2::new(20.0, 20.0), Vec2::new(1.0, 1.0))));
    }

    #[test]
    fn test_head_blocked_by_solid_lane() {
        let lanes = standard_lanes();
        let gaps = GapField::new(W);
        // Top at 287, rising 10: crosses the underside of lane 1 (283)
        assert_eq!(head_block(&lanes, &gaps, 287.0, -10.0, 110.0), Some(1));
        // Not moving far enough to reach it
        assert_eq!(head_block(&lanes, &gaps, 287.0, -3.0, 110.0), None);
    }

    #[test]
    fn test_head_passes_through_gap() {
        let lanes = standard_lanes();
        let mut gaps = GapField::new(W);
        gaps.push(gap_on(1, 90.0, 60.0));
        assert_eq!(head_block(&lanes, &gaps, 287.0, -10.0, 110.0), None);
    }

    #[test]
    fn test_head_block_prefers_nearest_lane() {
        // Two lanes close enough to both be crossed in one tick
        let lanes = LaneTable::new(&[200.0, 190.0], 3.0);
        let gaps = GapField::new(W);
        // Top at 210 rising 30: crosses 203 and 193; 203 is nearer
        assert_eq!(head_block(&lanes, &gaps, 210.0, -30.0, 50.0), Some(0));

        let mut open_lower = GapField::new(W);
        open_lower.push(gap_on(0, 0.0, 100.0));
        assert_eq!(head_block(&lanes, &open_lower, 210.0, -30.0, 50.0), Some(1));
    }

    #[test]
    fn test_landing_within_tolerance() {
        let lanes = standard_lanes();
        let gaps = GapField::new(W);
        assert_eq!(landing_lane(&lanes, &gaps, 283.0, 0.8, 5.0, 110.0), Some(1));
        assert_eq!(landing_lane(&lanes, &gaps, 250.0, 0.8, 5.0, 110.0), None);
    }

    #[test]
    fn test_landing_falls_through_gap() {
        let lanes = standard_lanes();
        let mut gaps = GapField::new(W);
        gaps.push(gap_on(1, 100.0, 60.0));
        assert_eq!(landing_lane(&lanes, &gaps, 281.0, 2.0, 5.0, 110.0), None);
        // Outside the gap the lane catches
        assert_eq!(landing_lane(&lanes, &gaps, 281.0, 2.0, 5.0, 400.0), Some(1));
    }

    #[test]
    fn test_landing_prefers_nearest_lane() {
        let lanes = LaneTable::new(&[220.0, 200.0], 3.0);
        let gaps = GapField::new(W);
        // Fast fall reaches both lanes; 220 is nearer to a bottom at 215
        assert_eq!(landing_lane(&lanes, &gaps, 215.0, 20.0, 5.0, 50.0), Some(0));
    }

    #[test]
    fn test_crushed_between_two_solid_lanes() {
        let lanes = LaneTable::new(&[200.0, 180.0], 3.0);
        let gaps = GapField::new(W);
        let player = Aabb::new(Vec2::new(100.0, 175.0), Vec2::new(20.0, 32.0));
        assert_eq!(pressing_levels(&lanes, &gaps, &player), vec![180.0, 200.0]);
        assert!(is_crushed(&lanes, &gaps, &player));
    }

    #[test]
    fn test_not_crushed_when_one_lane_is_open() {
        let lanes = LaneTable::new(&[200.0, 180.0], 3.0);
        let mut gaps = GapField::new(W);
        gaps.push(gap_on(1, 90.0, 40.0));
        let player = Aabb::new(Vec2::new(100.0, 175.0), Vec2::new(20.0, 32.0));
        assert!(!is_crushed(&lanes, &gaps, &player));
    }

    #[test]
    fn test_crushed_by_swapped_carriers() {
        let lanes = LaneTable::new(&[200.0, 180.0], 3.0);
        let mut gaps = GapField::new(W);
        // Each carrier covers the player's center on the other's home lane
        let mut lower = gap_on(0, 90.0, 40.0);
        lower.motion.lane = 1;
        let mut upper = gap_on(1, 90.0, 40.0);
        upper.motion.lane = 0;
        gaps.push(lower);
        gaps.push(upper);
        assert!(gaps.is_passable(0, 110.0) && gaps.is_passable(1, 110.0));

        let player = Aabb::new(Vec2::new(100.0, 175.0), Vec2::new(20.0, 32.0));
        assert_eq!(pressing_levels(&lanes, &gaps, &player), vec![180.0, 200.0]);
        assert!(is_crushed(&lanes, &gaps, &player));
    }

    #[test]
    fn test_displaced_carrier_pins_only_its_home_lane() {
        let lanes = LaneTable::new(&[200.0, 180.0], 3.0);
        let mut gaps = GapField::new(W);
        let mut drifted = gap_on(0, 300.0, 40.0);
        drifted.motion.lane = 1;
        gaps.push(drifted);
        gaps.push(gap_on(1, 90.0, 40.0));

        let player = Aabb::new(Vec2::new(100.0, 175.0), Vec2::new(20.0, 32.0));
        // Lane 1 is still open at the player's center
        assert_eq!(pressing_levels(&lanes, &gaps, &player), vec![200.0]);
        assert!(!is_crushed(&lanes, &gaps, &player));
    }

    #[test]
    fn test_standing_on_one_lane_is_not_crushed() {
        let lanes = standard_lanes();
        let gaps = GapField::new(W);
        let player = Aabb::new(Vec2::new(100.0, 248.0), Vec2::new(20.0, 32.0));
        assert_eq!(pressing_levels(&lanes, &gaps, &player), vec![280.0]);
        assert!(!is_crushed(&lanes, &gaps, &player));
    }
}
