//! Static level geometry and the player body

use glam::Vec2;

use crate::consts::*;
use crate::physics::{BodyDef, BodyHandle, BodyKind, CollisionFilter, PhysicsWorld, Shape, category};

/// Player collides with the level and with everything that falls
pub const PLAYER_FILTER: CollisionFilter = CollisionFilter::new(
    category::PLAYER,
    category::GROUND | category::HAZARD | category::PICKUP,
);

/// Ground probe: only sees level geometry
pub const GROUND_PROBE_FILTER: CollisionFilter =
    CollisionFilter::new(category::PLAYER, category::GROUND);

const LEVEL_FILTER: CollisionFilter = CollisionFilter::new(category::GROUND, category::ALL);

/// Player start position (standing on the ground)
pub fn player_start() -> Vec2 {
    Vec2::new(0.0, GROUND_Y + PLAYER_HEIGHT / 2.0)
}

/// Create the ground, both walls and the player. Returns the player handle.
pub fn build<W: PhysicsWorld>(world: &mut W) -> BodyHandle {
    let ground = level_box(
        Vec2::new(0.0, GROUND_Y - GROUND_THICKNESS / 2.0),
        Vec2::new(WALL_OUTER_X, GROUND_THICKNESS / 2.0),
    );
    world.create_body(&ground);

    let wall_half = Vec2::new((WALL_OUTER_X - FIELD_MAX_X) / 2.0, WALL_HEIGHT / 2.0);
    let wall_x = (WALL_OUTER_X + FIELD_MAX_X) / 2.0;
    for side in [-1.0, 1.0] {
        let wall = level_box(Vec2::new(side * wall_x, GROUND_Y + WALL_HEIGHT / 2.0), wall_half);
        world.create_body(&wall);
    }

    let mut player = BodyDef::new(
        BodyKind::Dynamic,
        player_start(),
        Shape::Box {
            half_extents: Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0),
        },
    );
    player.density = PLAYER_DENSITY;
    player.friction = PLAYER_FRICTION;
    player.filter = PLAYER_FILTER;
    player.fixed_rotation = true;
    world.create_body(&player)
}

fn level_box(position: Vec2, half_extents: Vec2) -> BodyDef {
    let mut def = BodyDef::new(BodyKind::Static, position, Shape::Box { half_extents });
    def.filter = LEVEL_FILTER;
    def
}
