//! In-memory world for driving the simulation from tests
//!
//! Bodies never move on their own. Contacts and hits are queued by the test and
//! delivered by the next `step`, and ray casts answer with [`ScriptedWorld::grounded`].

use std::collections::BTreeMap;

use glam::Vec2;

use super::{
    BodyDef, BodyHandle, CollisionFilter, ContactBeginEvent, HitEvent, PhysicsWorld, category,
};

#[derive(Debug, Clone)]
pub struct ScriptedBody {
    pub def: BodyDef,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Default)]
pub struct ScriptedWorld {
    bodies: BTreeMap<BodyHandle, ScriptedBody>,
    next_id: u64,
    /// Answer for ground ray casts
    pub grounded: bool,
    pending_forces: Vec<(BodyHandle, Vec2)>,
    /// Forces consumed by the most recent step
    pub stepped_forces: Vec<(BodyHandle, Vec2)>,
    pending_contacts: Vec<ContactBeginEvent>,
    pending_hits: Vec<HitEvent>,
    contact_begin_events: Vec<ContactBeginEvent>,
    hit_events: Vec<HitEvent>,
    pub steps: u32,
    pub last_sub_steps: u32,
}

impl ScriptedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, body: BodyHandle) -> Option<&ScriptedBody> {
        self.bodies.get(&body)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Live bodies whose category matches `bits`
    pub fn bodies_in(&self, bits: u32) -> Vec<BodyHandle> {
        self.bodies
            .iter()
            .filter(|(_, b)| b.def.filter.category & bits != 0)
            .map(|(&h, _)| h)
            .collect()
    }

    pub fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.position = position;
        }
    }

    /// Deliver a contact begin on the next step
    pub fn queue_contact(&mut self, body_a: BodyHandle, body_b: BodyHandle) {
        self.pending_contacts.push(ContactBeginEvent { body_a, body_b });
    }

    /// Deliver a hit on the next step
    pub fn queue_hit(&mut self, body_a: BodyHandle, body_b: BodyHandle, approach_speed: f32, normal: Vec2) {
        self.pending_hits.push(HitEvent {
            body_a,
            body_b,
            approach_speed,
            normal,
        });
    }

    /// Sum of forces applied to `body` during the most recent step
    pub fn stepped_force_on(&self, body: BodyHandle) -> Vec2 {
        self.stepped_forces
            .iter()
            .filter(|(h, _)| *h == body)
            .map(|(_, f)| *f)
            .sum()
    }
}

impl PhysicsWorld for ScriptedWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        self.next_id += 1;
        let handle = BodyHandle(self.next_id);
        self.bodies.insert(
            handle,
            ScriptedBody {
                def: def.clone(),
                position: def.position,
                velocity: def.velocity,
            },
        );
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn rotation(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(&body).map(|_| 0.0)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2, _point: Vec2) {
        if self.bodies.contains_key(&body) {
            self.pending_forces.push((body, force));
        }
    }

    fn step(&mut self, _dt: f32, sub_steps: u32) {
        self.steps += 1;
        self.last_sub_steps = sub_steps;
        self.stepped_forces = std::mem::take(&mut self.pending_forces);
        self.contact_begin_events = std::mem::take(&mut self.pending_contacts);
        self.hit_events = std::mem::take(&mut self.pending_hits);
    }

    fn contact_begin_events(&self) -> &[ContactBeginEvent] {
        &self.contact_begin_events
    }

    fn hit_events(&self) -> &[HitEvent] {
        &self.hit_events
    }

    fn cast_ray(&self, _origin: Vec2, _translation: Vec2, filter: CollisionFilter) -> bool {
        self.grounded && filter.mask & category::GROUND != 0
    }
}
