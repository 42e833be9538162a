//! Idle/demo mode - the computer plays
//!
//! Dodges the closest hazard coming down over the player, otherwise walks
//! under a falling pickup.

use super::session::Session;
use super::state::InputIntent;
use crate::consts::*;
use crate::physics::PhysicsWorld;

/// Horizontal distance at which a falling hazard counts as a threat
const DANGER_MARGIN: f32 = HAZARD_WIDTH / 2.0 + PLAYER_WIDTH / 2.0 + 0.5;
/// Close enough to a pickup to stop walking
const PICKUP_TOLERANCE: f32 = 0.2;
/// Keep this far from the walls when dodging
const WALL_MARGIN: f32 = 1.5;

/// Choose held movement keys for this tick
pub fn steer<W: PhysicsWorld>(session: &Session<W>) -> InputIntent {
    let player = session.player_position();
    let world = &session.world;

    let threat = session
        .registry
        .hazards()
        .iter()
        .filter_map(|&h| world.position(h))
        .filter(|p| p.y > player.y && (p.x - player.x).abs() < DANGER_MARGIN)
        .min_by(|a, b| a.y.total_cmp(&b.y));

    if let Some(hazard) = threat {
        // Run away from the hazard unless a wall is in the way
        let go_left = if hazard.x > player.x {
            player.x - WALL_MARGIN > FIELD_MIN_X
        } else {
            player.x + WALL_MARGIN >= FIELD_MAX_X
        };
        return InputIntent {
            move_left: go_left,
            move_right: !go_left,
        };
    }

    let target = session
        .registry
        .pickups()
        .iter()
        .filter_map(|&p| world.position(p))
        .filter(|p| p.y > player.y)
        .min_by(|a, b| a.y.total_cmp(&b.y));

    match target {
        Some(pickup) if (pickup.x - player.x).abs() > PICKUP_TOLERANCE => InputIntent {
            move_left: pickup.x < player.x,
            move_right: pickup.x > player.x,
        },
        _ => InputIntent::default(),
    }
}
