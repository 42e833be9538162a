//! Wave scheduling
//!
//! Each wave picks a forbidden horizontal band somewhere near the player and
//! queues its hazards outside it, so the player always has room to move.

use std::ops::Range;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EntityTag, GameState, ScheduledSpawn};
use crate::consts::*;

/// Horizontal span where hazards may be released
pub const SPAWN_MIN_X: f32 = FIELD_MIN_X + HAZARD_WIDTH / 2.0;
pub const SPAWN_MAX_X: f32 = FIELD_MAX_X - HAZARD_WIDTH / 2.0;

/// Half-width of the forbidden zone around its center
pub const ZONE_HALF_WIDTH: f32 = HAZARD_WIDTH / 2.0 + PLAYER_WIDTH / 2.0 + ZONE_LEEWAY / 2.0;

/// Horizontal band no hazard may be released in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForbiddenZone {
    pub min: f32,
    pub max: f32,
}

/// Which side(s) of the zone can take hazards
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnRanges {
    Left(Range<f32>),
    Right(Range<f32>),
    Both(Range<f32>, Range<f32>),
}

impl SpawnRanges {
    /// Sample a release position, picking a side at random when both are open
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        let range = match self {
            SpawnRanges::Left(r) | SpawnRanges::Right(r) => r,
            SpawnRanges::Both(left, right) => {
                if rng.random_bool(0.5) {
                    left
                } else {
                    right
                }
            }
        };
        rng.random_range(range.clone())
    }
}

impl ForbiddenZone {
    /// Zone of the standard width centered on `center`
    pub fn around(center: f32) -> Self {
        Self {
            min: center - ZONE_HALF_WIDTH,
            max: center + ZONE_HALF_WIDTH,
        }
    }

    /// Place a zone relative to the player, biased to the side the player is not on
    pub fn pick<R: Rng>(player_x: f32, rng: &mut R) -> Self {
        let probe = rng.random_range(FIELD_MIN_X..=FIELD_MAX_X);
        let direction = if probe > player_x { -1.0 } else { 1.0 };
        let distance = rng.random_range(ZONE_DISTANCE_MIN..=ZONE_DISTANCE_MAX);
        let center = (player_x + distance * direction).clamp(FIELD_MIN_X, FIELD_MAX_X);
        Self::around(center)
    }

    pub fn center(&self) -> f32 {
        (self.min + self.max) / 2.0
    }

    /// Open release span left of the zone, if any
    pub fn left_range(&self) -> Option<Range<f32>> {
        (self.min > SPAWN_MIN_X).then(|| SPAWN_MIN_X..self.min.min(SPAWN_MAX_X))
    }

    /// Open release span right of the zone, if any
    pub fn right_range(&self) -> Option<Range<f32>> {
        (self.max < SPAWN_MAX_X).then(|| self.max.max(SPAWN_MIN_X)..SPAWN_MAX_X)
    }

    /// Usable release spans. Panics if the zone leaves no room on either side;
    /// field bounds and zone width make that impossible.
    pub fn spawn_ranges(&self) -> SpawnRanges {
        match (self.left_range(), self.right_range()) {
            (Some(left), Some(right)) => SpawnRanges::Both(left, right),
            (Some(left), None) => SpawnRanges::Left(left),
            (None, Some(right)) => SpawnRanges::Right(right),
            (None, None) => panic!(
                "forbidden zone [{}, {}] leaves no room to spawn in [{}, {}]",
                self.min, self.max, SPAWN_MIN_X, SPAWN_MAX_X
            ),
        }
    }

    pub fn contains(&self, x: f32) -> bool {
        x > self.min && x < self.max
    }
}

/// Build the next wave's spawn queue, replacing any pending spawns.
///
/// Queues `state.hazards_to_spawn` hazards outside the forbidden zone, each
/// released after [`HAZARD_SPAWN_DELAY`], and sometimes a pickup at the zone
/// center. The pickup is pushed last so it is released first.
pub fn begin_wave<R: Rng>(state: &mut GameState, player_x: f32, rng: &mut R) -> ForbiddenZone {
    let zone = ForbiddenZone::pick(player_x, rng);
    let ranges = zone.spawn_ranges();

    state.pending_spawns.clear();
    for _ in 0..state.hazards_to_spawn {
        let x = ranges.sample(rng);
        let velocity = Vec2::new(
            rng.random_range(-HAZARD_JITTER..=HAZARD_JITTER),
            rng.random_range(HAZARD_MIN_FALL_SPEED..=0.0),
        );
        state.pending_spawns.push(ScheduledSpawn {
            kind: EntityTag::Hazard,
            countdown: HAZARD_SPAWN_DELAY,
            velocity,
            x,
        });
    }

    if state.lives < MAX_LIVES && rng.random_bool(PICKUP_CHANCE) {
        state.pending_spawns.push(ScheduledSpawn {
            kind: EntityTag::Pickup,
            countdown: 0.0,
            velocity: Vec2::ZERO,
            x: zone.center(),
        });
    }

    zone
}
