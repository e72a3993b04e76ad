//! Static lane table
//!
//! Lanes are thin horizontal bands at fixed heights. Index 0 is the lowest
//! lane (largest screen y); the table never changes during a level.

use serde::{Deserialize, Serialize};

/// One lane of the climbable stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub index: usize,
    /// Screen y of the lane's top surface
    pub y: f32,
}

/// Ordered, read-only lane heights shared by every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneTable {
    lanes: Vec<Lane>,
    thickness: f32,
}

impl LaneTable {
    pub fn new(ys: &[f32], thickness: f32) -> Self {
        Self {
            lanes: ys
                .iter()
                .enumerate()
                .map(|(index, &y)| Lane { index, y })
                .collect(),
            thickness,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    #[inline]
    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn get(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    /// Surface y of a lane. Panics on an index outside the table, which the
    /// traversal clamp rules out.
    #[inline]
    pub fn y(&self, index: usize) -> f32 {
        self.lanes[index].y
    }

    /// Underside of a lane band
    #[inline]
    pub fn underside(&self, index: usize) -> f32 {
        self.lanes[index].y + self.thickness
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lane> {
        self.lanes.iter()
    }

    /// Whether the vertical span [top, bottom] touches a lane's band (inclusive)
    pub fn band_overlaps(&self, index: usize, top: f32, bottom: f32) -> bool {
        bottom >= self.y(index) && top <= self.underside(index)
    }

    /// Lane indices whose key is `Some`, ordered by that key ascending
    ///
    /// Used for nearest-first scans: the key is the distance from the player
    /// to a candidate lane, or `None` if the lane is not a candidate.
    pub fn nearest_first(&self, mut key: impl FnMut(&Lane) -> Option<f32>) -> Vec<usize> {
        let mut candidates: Vec<(f32, usize)> = self
            .lanes
            .iter()
            .filter_map(|lane| key(lane).map(|d| (d, lane.index)))
            .collect();
        // Stable sort keeps lane-index order for equal distances
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        candidates.into_iter().map(|(_, index)| index).collect()
    }
}
