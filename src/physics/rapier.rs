//! rapier2d-backed physics world
//!
//! Contact begins are found by diffing the narrow phase's active pairs against
//! the previous sub-step. A begin whose relative normal speed (measured before
//! the sub-step) exceeds [`HIT_EVENT_THRESHOLD`] is also reported as a hit.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use rapier2d::prelude::*;

use super::{
    BodyDef, BodyHandle, BodyKind, CollisionFilter, ContactBeginEvent, HitEvent, PhysicsWorld,
    Shape,
};
use crate::consts::GRAVITY;

/// Minimum approach speed for a contact begin to also produce a hit event
pub const HIT_EVENT_THRESHOLD: f32 = 1.0;

/// Central physics world state
pub struct RapierWorld {
    gravity: Vector<Real>,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_params: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    collider_to_body: HashMap<ColliderHandle, BodyHandle>,
    // Pairs touching at the end of the previous sub-step
    active_contact_pairs: HashSet<(ColliderHandle, ColliderHandle)>,

    contact_begin_events: Vec<ContactBeginEvent>,
    hit_events: Vec<HitEvent>,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, GRAVITY))
    }
}

impl RapierWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vector![gravity.x, gravity.y],
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_params: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collider_to_body: HashMap::new(),
            active_contact_pairs: HashSet::new(),
            contact_begin_events: Vec::new(),
            hit_events: Vec::new(),
        }
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Record contact begins (and hits) for pairs that became active this sub-step
    fn collect_contact_events(&mut self, velocities: &HashMap<RigidBodyHandle, Vector<Real>>) {
        let mut current_pairs = HashSet::new();

        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let key = (pair.collider1, pair.collider2);
            current_pairs.insert(key);
            if self.active_contact_pairs.contains(&key) {
                continue;
            }

            let (Some(&body_a), Some(&body_b)) = (
                self.collider_to_body.get(&pair.collider1),
                self.collider_to_body.get(&pair.collider2),
            ) else {
                continue;
            };
            self.contact_begin_events.push(ContactBeginEvent { body_a, body_b });

            let Some(manifold) = pair.manifolds.iter().find(|m| !m.points.is_empty()) else {
                continue;
            };
            let normal = manifold.data.normal;
            let zero = vector![0.0, 0.0];
            let vel_a = velocities.get(&to_rapier(body_a)).copied().unwrap_or(zero);
            let vel_b = velocities.get(&to_rapier(body_b)).copied().unwrap_or(zero);
            let approach_speed = (vel_a - vel_b).dot(&normal);

            if approach_speed > HIT_EVENT_THRESHOLD {
                self.hit_events.push(HitEvent {
                    body_a,
                    body_b,
                    approach_speed,
                    normal: Vec2::new(normal.x, normal.y),
                });
            }
        }

        self.active_contact_pairs = current_pairs;
    }
}

impl PhysicsWorld for RapierWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let builder = match def.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        }
        .translation(vector![def.position.x, def.position.y])
        .linvel(vector![def.velocity.x, def.velocity.y]);
        let builder = if def.fixed_rotation {
            builder.lock_rotations()
        } else {
            builder
        };
        let rb_handle = self.rigid_body_set.insert(builder.build());

        let collider = shape_to_collider(&def.shape)
            .density(def.density)
            .friction(def.friction)
            .restitution(def.restitution)
            .collision_groups(interaction_groups(def.filter))
            .build();
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);

        let handle = from_rapier(rb_handle);
        self.collider_to_body.insert(col_handle, handle);
        self.query_pipeline.update(&self.collider_set);
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        let rb_handle = to_rapier(body);
        let Some(rb) = self.rigid_body_set.get(rb_handle) else {
            return;
        };

        let colliders: Vec<ColliderHandle> = rb.colliders().to_vec();
        for col in &colliders {
            self.collider_to_body.remove(col);
        }
        self.active_contact_pairs
            .retain(|(a, b)| !colliders.contains(a) && !colliders.contains(b));

        self.rigid_body_set.remove(
            rb_handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.query_pipeline.update(&self.collider_set);
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.rigid_body_set.get(to_rapier(body)).is_some()
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.rigid_body_set.get(to_rapier(body)).map(|rb| {
            let t = rb.translation();
            Vec2::new(t.x, t.y)
        })
    }

    fn rotation(&self, body: BodyHandle) -> Option<f32> {
        self.rigid_body_set
            .get(to_rapier(body))
            .map(|rb| rb.rotation().angle())
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.rigid_body_set.get(to_rapier(body)).map(|rb| {
            let v = rb.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2, point: Vec2) {
        if let Some(rb) = self.rigid_body_set.get_mut(to_rapier(body)) {
            rb.add_force_at_point(vector![force.x, force.y], point![point.x, point.y], true);
        }
    }

    fn step(&mut self, dt: f32, sub_steps: u32) {
        self.contact_begin_events.clear();
        self.hit_events.clear();

        let sub_steps = sub_steps.max(1);
        self.integration_params.dt = dt / sub_steps as f32;

        for _ in 0..sub_steps {
            let velocities: HashMap<RigidBodyHandle, Vector<Real>> = self
                .rigid_body_set
                .iter()
                .map(|(handle, rb)| (handle, *rb.linvel()))
                .collect();

            self.physics_pipeline.step(
                &self.gravity,
                &self.integration_params,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.rigid_body_set,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );

            self.collect_contact_events(&velocities);
        }

        // User forces persist in rapier; forces here last exactly one step
        for (_, rb) in self.rigid_body_set.iter_mut() {
            rb.reset_forces(false);
        }
    }

    fn contact_begin_events(&self) -> &[ContactBeginEvent] {
        &self.contact_begin_events
    }

    fn hit_events(&self) -> &[HitEvent] {
        &self.hit_events
    }

    fn cast_ray(&self, origin: Vec2, translation: Vec2, filter: CollisionFilter) -> bool {
        let length = translation.length();
        if length <= f32::EPSILON {
            return false;
        }
        let dir = translation / length;
        let ray = Ray::new(point![origin.x, origin.y], vector![dir.x, dir.y]);
        let query = QueryFilter::default().groups(interaction_groups(filter));

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                length,
                true,
                query,
            )
            .is_some()
    }
}

fn shape_to_collider(shape: &Shape) -> ColliderBuilder {
    match shape {
        Shape::Box { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
        Shape::Circle { radius } => ColliderBuilder::ball(*radius),
    }
}

fn interaction_groups(filter: CollisionFilter) -> InteractionGroups {
    InteractionGroups::new(
        Group::from_bits_truncate(filter.category),
        Group::from_bits_truncate(filter.mask),
    )
}

fn from_rapier(handle: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = handle.into_raw_parts();
    BodyHandle(((generation as u64) << 32) | index as u64)
}

fn to_rapier(handle: BodyHandle) -> RigidBodyHandle {
    RigidBodyHandle::from_raw_parts(handle.0 as u32, (handle.0 >> 32) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::physics::category;

    fn ground(world: &mut RapierWorld) -> BodyHandle {
        let mut def = BodyDef::new(
            BodyKind::Static,
            Vec2::new(0.0, -1.0),
            Shape::Box {
                half_extents: Vec2::new(10.0, 1.0),
            },
        );
        def.filter = CollisionFilter::new(category::GROUND, category::ALL);
        world.create_body(&def)
    }

    fn crate_box(world: &mut RapierWorld, pos: Vec2, vel: Vec2, filter: CollisionFilter) -> BodyHandle {
        let mut def = BodyDef::new(
            BodyKind::Dynamic,
            pos,
            Shape::Box {
                half_extents: Vec2::splat(0.5),
            },
        );
        def.velocity = vel;
        def.filter = filter;
        def.fixed_rotation = true;
        world.create_body(&def)
    }

    #[test]
    fn test_handle_roundtrip_through_rapier() {
        let handle = RigidBodyHandle::from_raw_parts(7, 3);
        assert_eq!(to_rapier(from_rapier(handle)), handle);
    }

    #[test]
    fn test_create_and_destroy_body() {
        let mut world = RapierWorld::default();
        let body = ground(&mut world);
        assert_eq!(world.body_count(), 1);
        assert!(world.contains(body));

        world.destroy_body(body);
        assert_eq!(world.body_count(), 0);
        assert!(!world.contains(body));

        // Destroying again is a no-op
        world.destroy_body(body);
        assert_eq!(world.body_count(), 0);
        assert!(world.position(body).is_none());
    }

    #[test]
    fn test_ground_ray_cast() {
        let mut world = RapierWorld::default();
        ground(&mut world);
        let probe = CollisionFilter::new(category::PLAYER, category::GROUND);

        assert!(world.cast_ray(Vec2::new(0.0, 0.5), Vec2::new(0.0, -0.6), probe));
        assert!(!world.cast_ray(Vec2::new(0.0, 5.0), Vec2::new(0.0, -0.6), probe));
        // Outside the ground's extent
        assert!(!world.cast_ray(Vec2::new(20.0, 0.5), Vec2::new(0.0, -0.6), probe));
    }

    #[test]
    fn test_ray_ignores_filtered_categories() {
        let mut world = RapierWorld::default();
        let player_filter = CollisionFilter::new(category::PLAYER, category::ALL);
        crate_box(&mut world, Vec2::new(0.0, 0.0), Vec2::ZERO, player_filter);
        let probe = CollisionFilter::new(category::PLAYER, category::GROUND);

        assert!(!world.cast_ray(Vec2::new(0.0, 2.0), Vec2::new(0.0, -3.0), probe));
    }

    #[test]
    fn test_masked_body_falls_through_ground() {
        let mut world = RapierWorld::default();
        ground(&mut world);
        let hazard = crate_box(
            &mut world,
            Vec2::new(0.0, 2.0),
            Vec2::ZERO,
            CollisionFilter::new(category::HAZARD, category::PLAYER),
        );

        for _ in 0..120 {
            world.step(SIM_DT, 4);
            assert!(world.contact_begin_events().is_empty());
        }
        let pos = world.position(hazard).unwrap();
        assert!(pos.y < -2.0, "hazard should fall through the ground, y = {}", pos.y);
    }

    #[test]
    fn test_falling_body_reports_vertical_hit() {
        let mut world = RapierWorld::default();
        ground(&mut world);
        let resting = crate_box(
            &mut world,
            Vec2::new(0.0, 0.5),
            Vec2::ZERO,
            CollisionFilter::new(category::PLAYER, category::ALL),
        );
        let falling = crate_box(
            &mut world,
            Vec2::new(0.0, 6.0),
            Vec2::new(0.0, -8.0),
            CollisionFilter::new(category::HAZARD, category::PLAYER),
        );

        let mut hit = None;
        for _ in 0..120 {
            world.step(SIM_DT, 4);
            hit = world
                .hit_events()
                .iter()
                .find(|e| e.other(resting) == Some(falling))
                .copied();
            if hit.is_some() {
                break;
            }
        }

        let hit = hit.expect("falling box should hit the resting box");
        assert!(hit.approach_speed > 5.0, "approach speed {}", hit.approach_speed);
        assert!(hit.normal.dot(Vec2::Y).abs() > 0.8);
    }

    #[test]
    fn test_force_lasts_one_step() {
        let mut world = RapierWorld::new(Vec2::ZERO);
        let body = crate_box(
            &mut world,
            Vec2::ZERO,
            Vec2::ZERO,
            CollisionFilter::new(category::PLAYER, category::ALL),
        );

        world.apply_force(body, Vec2::new(60.0, 0.0), Vec2::ZERO);
        world.step(SIM_DT, 4);
        let after_push = world.linear_velocity(body).unwrap().x;
        assert!(after_push > 0.0);

        world.step(SIM_DT, 4);
        let after_coast = world.linear_velocity(body).unwrap().x;
        assert!((after_coast - after_push).abs() < 1e-4);
    }
}
