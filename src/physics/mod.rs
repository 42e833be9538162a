//! Rigid-body world contract
//!
//! The simulation never owns bodies. It asks a [`PhysicsWorld`] to create them,
//! refers to them by [`BodyHandle`], and reads back the contact and hit events
//! produced by the last step.

pub mod rapier;
#[cfg(test)]
pub mod scripted;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use rapier::RapierWorld;

/// Opaque identifier of a body owned by the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// Collision category bits
pub mod category {
    /// Ground and walls
    pub const GROUND: u32 = 0x0001;
    pub const PLAYER: u32 = 0x0002;
    pub const HAZARD: u32 = 0x0004;
    pub const PICKUP: u32 = 0x0008;
    pub const ALL: u32 = u32::MAX;
}

/// Category/mask pair. Two shapes collide when each one's category is in the other's mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionFilter {
    pub category: u32,
    pub mask: u32,
}

impl CollisionFilter {
    pub const fn new(category: u32, mask: u32) -> Self {
        Self { category, mask }
    }

    pub fn accepts(&self, other: &CollisionFilter) -> bool {
        self.category & other.mask != 0 && other.category & self.mask != 0
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::new(category::ALL, category::ALL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { half_extents: Vec2 },
    Circle { radius: f32 },
}

/// Everything needed to create one body with a single shape
#[derive(Debug, Clone)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub shape: Shape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub filter: CollisionFilter,
    pub fixed_rotation: bool,
}

impl BodyDef {
    pub fn new(kind: BodyKind, position: Vec2, shape: Shape) -> Self {
        Self {
            kind,
            position,
            velocity: Vec2::ZERO,
            shape,
            density: 1.0,
            friction: 0.6,
            restitution: 0.0,
            filter: CollisionFilter::default(),
            fixed_rotation: false,
        }
    }
}

/// Two bodies started touching during the last step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactBeginEvent {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
}

/// A contact began with enough relative speed to count as an impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Relative speed along the normal before the impact
    pub approach_speed: f32,
    /// World-space contact normal (from `body_a` toward `body_b`)
    pub normal: Vec2,
}

impl ContactBeginEvent {
    /// The body paired with `body`, if the event involves it
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        pair_other(self.body_a, self.body_b, body)
    }
}

impl HitEvent {
    /// The body paired with `body`, if the event involves it
    pub fn other(&self, body: BodyHandle) -> Option<BodyHandle> {
        pair_other(self.body_a, self.body_b, body)
    }
}

fn pair_other(a: BodyHandle, b: BodyHandle, body: BodyHandle) -> Option<BodyHandle> {
    if a == body {
        Some(b)
    } else if b == body {
        Some(a)
    } else {
        None
    }
}

/// The rigid-body simulator the gameplay layer drives
///
/// Operations on handles that no longer exist are no-ops.
pub trait PhysicsWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;
    fn destroy_body(&mut self, body: BodyHandle);
    fn contains(&self, body: BodyHandle) -> bool;

    fn position(&self, body: BodyHandle) -> Option<Vec2>;
    fn rotation(&self, body: BodyHandle) -> Option<f32>;
    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2>;

    /// Apply a force at a world point for the next step only
    fn apply_force(&mut self, body: BodyHandle, force: Vec2, point: Vec2);

    /// Advance by `dt` seconds split into `sub_steps` solver steps
    fn step(&mut self, dt: f32, sub_steps: u32);

    fn contact_begin_events(&self) -> &[ContactBeginEvent];
    fn hit_events(&self) -> &[HitEvent];

    /// Whether a ray from `origin` along `translation` hits any shape accepted by `filter`
    fn cast_ray(&self, origin: Vec2, translation: Vec2, filter: CollisionFilter) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_accepts_both_ways() {
        let player = CollisionFilter::new(category::PLAYER, category::GROUND | category::HAZARD);
        let hazard = CollisionFilter::new(category::HAZARD, category::PLAYER);
        let ground = CollisionFilter::new(category::GROUND, category::ALL);

        assert!(player.accepts(&hazard));
        assert!(hazard.accepts(&player));
        assert!(player.accepts(&ground));
        // Hazard mask excludes ground even though ground accepts everything
        assert!(!hazard.accepts(&ground));
        assert!(!hazard.accepts(&hazard));
    }

    #[test]
    fn test_event_other() {
        let a = BodyHandle(1);
        let b = BodyHandle(2);
        let event = ContactBeginEvent { body_a: a, body_b: b };
        assert_eq!(event.other(a), Some(b));
        assert_eq!(event.other(b), Some(a));
        assert_eq!(event.other(BodyHandle(3)), None);
    }
}
