//! Obstacle spawn selection
//!
//! Variety bookkeeping is explicit state owned by the caller and handed to
//! the world on every spawn, so two levels never share hidden history.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::lane::LaneTable;
use super::motion::Heading;
use super::obstacle::{Obstacle, ObstacleKind};

/// Placement attempts before accepting a crowded spot
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10;
/// Minimum horizontal spacing between obstacles sharing a lane
pub const MIN_LANE_SPACING: f32 = 100.0;
/// Clearance kept around the player's spawn point on the bottom lane
pub const SPAWN_CLEARANCE: f32 = 150.0;

/// Where and which way a new obstacle starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub lane: usize,
    pub x: f32,
    pub heading: Heading,
}

/// Kind rotation state: unused kinds are preferred until every kind in the
/// roster has appeared, then the cycle starts over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    roster: Vec<ObstacleKind>,
    used: Vec<ObstacleKind>,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::new(ObstacleKind::ALL.to_vec())
    }
}

impl SpawnPolicy {
    /// An empty roster falls back to snakes only
    pub fn new(roster: Vec<ObstacleKind>) -> Self {
        let roster = if roster.is_empty() {
            vec![ObstacleKind::Snake]
        } else {
            roster
        };
        Self {
            roster,
            used: Vec::new(),
        }
    }

    pub fn roster(&self) -> &[ObstacleKind] {
        &self.roster
    }

    pub fn choose_kind(&mut self, rng: &mut impl Rng) -> ObstacleKind {
        let mut available: Vec<ObstacleKind> = self
            .roster
            .iter()
            .copied()
            .filter(|k| !self.used.contains(k))
            .collect();
        if available.is_empty() {
            self.used.clear();
            available = self.roster.clone();
        }
        let kind = available[rng.random_range(0..available.len())];
        self.used.push(kind);
        kind
    }
}

/// Pick a colour variant of `kind` that is not already on screen, if any is left
pub fn choose_variant(
    kind: ObstacleKind,
    on_screen: impl Iterator<Item = (ObstacleKind, u8)>,
    rng: &mut impl Rng,
) -> u8 {
    let taken: Vec<u8> = on_screen
        .filter(|(k, _)| *k == kind)
        .map(|(_, v)| v)
        .collect();
    let free: Vec<u8> = (0..ObstacleKind::VARIANTS)
        .filter(|v| !taken.contains(v))
        .collect();
    if free.is_empty() {
        rng.random_range(0..ObstacleKind::VARIANTS)
    } else {
        free[rng.random_range(0..free.len())]
    }
}

/// Find a starting spot near one edge, away from other obstacles on the same
/// lane and from the player's spawn on the bottom lane. After
/// `MAX_PLACEMENT_ATTEMPTS` crowded tries the last one is used anyway.
pub fn place(
    kind: ObstacleKind,
    lanes: &LaneTable,
    existing: &[Obstacle],
    field_width: f32,
    player_spawn_x: f32,
    rng: &mut impl Rng,
) -> Placement {
    let width = kind.size().x;
    let mut placement = random_placement(width, lanes.len(), field_width, rng);

    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let crowded = existing
            .iter()
            .any(|o| o.lane() == placement.lane && (o.pos.x - placement.x).abs() < MIN_LANE_SPACING);
        let near_player =
            placement.lane == 0 && (placement.x - player_spawn_x).abs() < SPAWN_CLEARANCE;
        if !crowded && !near_player {
            return placement;
        }
        if attempt < MAX_PLACEMENT_ATTEMPTS {
            placement = random_placement(width, lanes.len(), field_width, rng);
        }
    }

    log::debug!("no clear spot for {}, placing on lane {}", kind.as_str(), placement.lane);
    placement
}

fn random_placement(width: f32, lane_count: usize, field_width: f32, rng: &mut impl Rng) -> Placement {
    let lane = rng.random_range(0..lane_count);
    if rng.random_bool(0.5) {
        // Enter from the left: somewhere off-screen up to a quarter across
        Placement {
            lane,
            x: rng.random_range(-2.0 * width..=field_width * 0.25),
            heading: Heading::Right,
        }
    } else {
        Placement {
            lane,
            x: rng.random_range(field_width * 0.75..=field_width + width),
            heading: Heading::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::motion::Bias;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_kinds_cycle_before_repeating() {
        let roster = vec![ObstacleKind::Snake, ObstacleKind::Plane, ObstacleKind::Axel];
        let mut policy = SpawnPolicy::new(roster.clone());
        let mut rng = Pcg32::seed_from_u64(7);

        let mut first_cycle: Vec<_> = (0..3).map(|_| policy.choose_kind(&mut rng)).collect();
        first_cycle.sort_by_key(|k| k.as_str());
        let mut expected = roster.clone();
        expected.sort_by_key(|k| k.as_str());
        assert_eq!(first_cycle, expected);

        // Fourth pick starts a fresh cycle
        let fourth = policy.choose_kind(&mut rng);
        assert!(roster.contains(&fourth));
    }

    #[test]
    fn test_empty_roster_falls_back() {
        let mut policy = SpawnPolicy::new(Vec::new());
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(policy.choose_kind(&mut rng), ObstacleKind::Snake);
    }

    #[test]
    fn test_variant_avoids_on_screen_colours() {
        let mut rng = Pcg32::seed_from_u64(3);
        let on_screen = vec![
            (ObstacleKind::Car, 0),
            (ObstacleKind::Car, 1),
            (ObstacleKind::Car, 2),
            (ObstacleKind::Car, 3),
            (ObstacleKind::Car, 4),
            (ObstacleKind::Ghost, 5),
        ];
        for _ in 0..20 {
            assert_eq!(choose_variant(ObstacleKind::Car, on_screen.iter().copied(), &mut rng), 5);
        }
    }

    #[test]
    fn test_placement_keeps_spacing() {
        let lanes = LaneTable::new(&[340.0, 280.0], 3.0);
        let mut rng = Pcg32::seed_from_u64(11);
        let existing = vec![Obstacle::new(
            1,
            ObstacleKind::Snake,
            0,
            &lanes,
            1,
            50.0,
            Heading::Right,
            Bias::Up,
            1.0,
        )];

        for _ in 0..50 {
            let p = place(ObstacleKind::Axel, &lanes, &existing, 800.0, 100.0, &mut rng);
            assert!(p.lane < 2);
            match p.heading {
                Heading::Right => assert!(p.x >= -50.0 && p.x <= 200.0),
                Heading::Left => assert!(p.x >= 600.0 && p.x <= 825.0),
            }
        }
    }
}
