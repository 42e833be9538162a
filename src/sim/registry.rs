//! Live hazard and pickup bodies
//!
//! The tag of every tracked body lives here, keyed by handle, and is dropped
//! together with the body.

use std::collections::HashMap;

use glam::Vec2;

use super::state::{EntityTag, ScheduledSpawn};
use crate::consts::*;
use crate::physics::{BodyDef, BodyHandle, BodyKind, CollisionFilter, PhysicsWorld, Shape, category};

#[derive(Debug, Default)]
pub struct EntityRegistry {
    hazards: Vec<BodyHandle>,
    pickups: Vec<BodyHandle>,
    tags: HashMap<BodyHandle, EntityTag>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag of a tracked body, `None` for anything else (ground, walls, player)
    pub fn tag(&self, body: BodyHandle) -> Option<EntityTag> {
        self.tags.get(&body).copied()
    }

    pub fn hazards(&self) -> &[BodyHandle] {
        &self.hazards
    }

    pub fn pickups(&self) -> &[BodyHandle] {
        &self.pickups
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty() && self.pickups.is_empty()
    }

    /// Create the body for a scheduled spawn of either kind
    pub fn spawn<W: PhysicsWorld>(&mut self, world: &mut W, spawn: &ScheduledSpawn) -> BodyHandle {
        match spawn.kind {
            EntityTag::Hazard => self.spawn_hazard(world, spawn),
            EntityTag::Pickup => self.spawn_pickup(world, spawn),
        }
    }

    pub fn spawn_hazard<W: PhysicsWorld>(&mut self, world: &mut W, spawn: &ScheduledSpawn) -> BodyHandle {
        let mut def = BodyDef::new(
            BodyKind::Dynamic,
            Vec2::new(spawn.x, SPAWN_HEIGHT),
            Shape::Box {
                half_extents: Vec2::new(HAZARD_WIDTH / 2.0, HAZARD_HEIGHT / 2.0),
            },
        );
        def.velocity = spawn.velocity;
        def.density = HAZARD_DENSITY;
        def.filter = CollisionFilter::new(category::HAZARD, category::PLAYER);

        let body = world.create_body(&def);
        self.hazards.push(body);
        self.tags.insert(body, EntityTag::Hazard);
        log::debug!("Hazard spawned at x={:.2}", spawn.x);
        body
    }

    pub fn spawn_pickup<W: PhysicsWorld>(&mut self, world: &mut W, spawn: &ScheduledSpawn) -> BodyHandle {
        let mut def = BodyDef::new(
            BodyKind::Dynamic,
            Vec2::new(spawn.x, SPAWN_HEIGHT),
            Shape::Circle {
                radius: PICKUP_RADIUS,
            },
        );
        def.velocity = spawn.velocity;
        def.density = PICKUP_DENSITY;
        def.filter = CollisionFilter::new(category::PICKUP, category::PLAYER);

        let body = world.create_body(&def);
        self.pickups.push(body);
        self.tags.insert(body, EntityTag::Pickup);
        log::debug!("Pickup spawned at x={:.2}", spawn.x);
        body
    }

    /// Destroy every live hazard. Safe on an empty registry.
    pub fn clear_hazards<W: PhysicsWorld>(&mut self, world: &mut W) {
        for body in self.hazards.drain(..) {
            self.tags.remove(&body);
            world.destroy_body(body);
        }
    }

    /// Destroy every live pickup. Safe on an empty registry.
    pub fn clear_pickups<W: PhysicsWorld>(&mut self, world: &mut W) {
        for body in self.pickups.drain(..) {
            self.tags.remove(&body);
            world.destroy_body(body);
        }
    }

    pub fn clear<W: PhysicsWorld>(&mut self, world: &mut W) {
        self.clear_hazards(world);
        self.clear_pickups(world);
    }

    /// Every tracked body with its tag, hazards first
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, EntityTag)> + '_ {
        self.hazards
            .iter()
            .map(|&h| (h, EntityTag::Hazard))
            .chain(self.pickups.iter().map(|&h| (h, EntityTag::Pickup)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::scripted::ScriptedWorld;

    fn spawn(kind: EntityTag, x: f32) -> ScheduledSpawn {
        ScheduledSpawn {
            kind,
            countdown: 0.0,
            velocity: Vec2::new(0.1, -2.0),
            x,
        }
    }

    #[test]
    fn test_spawn_hazard_body() {
        let mut world = ScriptedWorld::new();
        let mut registry = EntityRegistry::new();
        let body = registry.spawn(&mut world, &spawn(EntityTag::Hazard, 3.0));

        assert_eq!(registry.tag(body), Some(EntityTag::Hazard));
        assert_eq!(registry.hazards(), &[body]);
        let created = world.body(body).unwrap();
        assert_eq!(created.position, Vec2::new(3.0, SPAWN_HEIGHT));
        assert_eq!(created.velocity, Vec2::new(0.1, -2.0));
        assert_eq!(created.def.kind, BodyKind::Dynamic);
        assert_eq!(created.def.filter.mask, category::PLAYER);
    }

    #[test]
    fn test_spawn_pickup_body() {
        let mut world = ScriptedWorld::new();
        let mut registry = EntityRegistry::new();
        let body = registry.spawn(&mut world, &spawn(EntityTag::Pickup, -4.0));

        assert_eq!(registry.tag(body), Some(EntityTag::Pickup));
        assert_eq!(registry.pickups(), &[body]);
        assert!(matches!(
            world.body(body).unwrap().def.shape,
            Shape::Circle { .. }
        ));
    }

    #[test]
    fn test_hazards_and_pickups_ignore_each_other_and_ground() {
        let mut world = ScriptedWorld::new();
        let mut registry = EntityRegistry::new();
        let h = registry.spawn(&mut world, &spawn(EntityTag::Hazard, 0.0));
        let p = registry.spawn(&mut world, &spawn(EntityTag::Pickup, 0.0));
        let hazard = world.body(h).unwrap().def.filter;
        let pickup = world.body(p).unwrap().def.filter;
        let ground = CollisionFilter::new(category::GROUND, category::ALL);

        assert!(!hazard.accepts(&pickup));
        assert!(!hazard.accepts(&hazard));
        assert!(!hazard.accepts(&ground));
        assert!(!pickup.accepts(&ground));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut world = ScriptedWorld::new();
        let mut registry = EntityRegistry::new();
        let h = registry.spawn(&mut world, &spawn(EntityTag::Hazard, 1.0));
        let p = registry.spawn(&mut world, &spawn(EntityTag::Pickup, 2.0));

        registry.clear_hazards(&mut world);
        registry.clear_pickups(&mut world);
        assert!(registry.is_empty());
        assert_eq!(registry.tag(h), None);
        assert_eq!(registry.tag(p), None);
        assert_eq!(world.body_count(), 0);

        registry.clear_hazards(&mut world);
        registry.clear_pickups(&mut world);
        assert!(registry.is_empty());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_untracked_body_has_no_tag() {
        let registry = EntityRegistry::new();
        assert_eq!(registry.tag(BodyHandle(99)), None);
    }
}
