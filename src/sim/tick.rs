//! Fixed timestep simulation tick
//!
//! One call advances the session by `dt`: wave trigger, spawn draining, player
//! locomotion, physics step, then contact and hit resolution.

use glam::Vec2;

use super::session::Session;
use super::state::{EntityTag, GameEvent};
use super::wave;
use crate::consts::*;
use crate::physics::{HitEvent, PhysicsWorld};

/// Advance the session by one timestep
pub fn tick<W: PhysicsWorld>(session: &mut Session<W>, dt: f32) {
    session.events.clear();
    session.state.elapsed += dt;

    if session.state.wave_due() {
        start_wave(session);
    }

    if session.state.spawning {
        drain_spawn_queue(session, dt);
    }

    apply_locomotion(session, dt);

    session.world.step(dt, PHYSICS_SUB_STEPS);

    resolve_contacts(session);
    resolve_hits(session);
}

/// A hit that counts as a hazard landing on the player rather than grazing it
pub fn is_qualifying_hit(hit: &HitEvent) -> bool {
    hit.approach_speed > HIT_SPEED_THRESHOLD
        && hit.normal.dot(Vec2::Y).abs() > HIT_NORMAL_THRESHOLD
}

/// Clear the previous wave and queue the next one
fn start_wave<W: PhysicsWorld>(session: &mut Session<W>) {
    let player_x = session.player_position().x;
    let Session {
        world,
        registry,
        state,
        rng,
        events,
        ..
    } = session;

    registry.clear_hazards(world);
    registry.clear_pickups(world);
    state.player_was_hit = false;

    let hazards = state.hazards_to_spawn;
    let zone = wave::begin_wave(state, player_x, rng);
    debug_assert!(!state.pending_spawns.is_empty(), "wave queued no spawns");
    state.spawning = true;

    // The first wave is free
    if hazards > 1 {
        state.score += 1;
    }
    state.hazards_to_spawn += 1;

    let pickup = state
        .pending_spawns
        .iter()
        .any(|s| s.kind == EntityTag::Pickup);
    let wave = state.wave();
    log::info!(
        "Wave {}: {} hazards, forbidden zone [{:.2}, {:.2}]{}",
        wave,
        hazards,
        zone.min,
        zone.max,
        if pickup { ", with pickup" } else { "" }
    );
    events.push(GameEvent::WaveStarted {
        wave,
        hazards,
        pickup,
    });
}

/// Count down the most recently queued spawn and release it when due
fn drain_spawn_queue<W: PhysicsWorld>(session: &mut Session<W>, dt: f32) {
    let Session {
        world,
        registry,
        state,
        events,
        ..
    } = session;

    let due = match state.pending_spawns.last_mut() {
        Some(next) => {
            next.countdown -= dt;
            next.countdown <= 0.0
        }
        None => {
            debug_assert!(false, "spawning with an empty spawn queue");
            state.spawning = false;
            return;
        }
    };
    if !due {
        return;
    }

    if let Some(spawn) = state.pending_spawns.pop() {
        registry.spawn(world, &spawn);
        state.last_wave_time = state.elapsed;
        events.push(GameEvent::Spawned {
            kind: spawn.kind,
            x: spawn.x,
        });
    }
    if state.pending_spawns.is_empty() {
        state.spawning = false;
    }
}

/// Drive the player horizontally while grounded
fn apply_locomotion<W: PhysicsWorld>(session: &mut Session<W>, dt: f32) {
    if session.state.lost {
        return;
    }
    let axis = session.input.axis();
    if axis == 0.0 || !session.is_grounded() {
        return;
    }
    let pos = session.player_position();
    let player = session.player;
    session
        .world
        .apply_force(player, Vec2::new(axis * MOVE_FORCE * dt, 0.0), pos);
}

/// Player touching any pickup collects it: every live pickup goes, one life comes back
fn resolve_contacts<W: PhysicsWorld>(session: &mut Session<W>) {
    if session.state.lost {
        return;
    }
    let player = session.player;
    let contacts = session.world.contact_begin_events().to_vec();

    for contact in contacts {
        let Some(other) = contact.other(player) else {
            continue;
        };
        if session.registry.tag(other) != Some(EntityTag::Pickup) {
            continue;
        }

        session.registry.clear_pickups(&mut session.world);
        if session.state.restore_life() {
            let lives = session.state.lives;
            log::info!("Life restored: {} lives", lives);
            session.events.push(GameEvent::LifeRestored { lives });
        }
    }
}

/// A hazard landing on the player costs a life and ends the wave early
fn resolve_hits<W: PhysicsWorld>(session: &mut Session<W>) {
    let player = session.player;
    let hits = session.world.hit_events().to_vec();

    for hit in hits {
        let Some(other) = hit.other(player) else {
            continue;
        };
        if session.registry.tag(other) != Some(EntityTag::Hazard) {
            continue;
        }
        if !is_qualifying_hit(&hit) {
            log::debug!(
                "Glancing hit ignored (speed {:.2}, normal {:?})",
                hit.approach_speed,
                hit.normal
            );
            continue;
        }
        if session.state.player_was_hit {
            continue;
        }

        let state = &mut session.state;
        let newly_lost = state.register_hit();
        log::info!("Player hit: {} lives, score {}", state.lives, state.score);
        session.events.push(GameEvent::PlayerHit {
            lives: state.lives,
            score: state.score,
        });

        if newly_lost {
            log::info!("Player lost at wave {} with score {}", state.wave(), state.score);
            session.events.push(GameEvent::PlayerLost {
                score: state.score,
                wave: state.wave(),
            });
        }
    }
}
