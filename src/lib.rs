//! Skyfall - survive waves of falling hazards
//!
//! Core modules:
//! - `physics`: Rigid-body world contract and the rapier2d-backed world
//! - `sim`: Deterministic gameplay (wave scheduling, spawning, hit resolution, game state)

pub mod physics;
pub mod sim;

pub use physics::{BodyHandle, PhysicsWorld, RapierWorld};
pub use sim::{GameState, Session, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Physics sub-steps per tick
    pub const PHYSICS_SUB_STEPS: u32 = 4;

    /// Gravity (units/s², pointing down)
    pub const GRAVITY: f32 = -10.0;

    /// Playable field: inner faces of the side walls
    pub const FIELD_MIN_X: f32 = -11.0;
    pub const FIELD_MAX_X: f32 = 11.0;
    /// Outer faces of the side walls
    pub const WALL_OUTER_X: f32 = 13.0;
    pub const WALL_HEIGHT: f32 = 30.0;
    /// Ground surface height
    pub const GROUND_Y: f32 = 0.0;
    pub const GROUND_THICKNESS: f32 = 2.0;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 1.0;
    pub const PLAYER_HEIGHT: f32 = 1.0;
    pub const PLAYER_DENSITY: f32 = 1.0;
    pub const PLAYER_FRICTION: f32 = 0.6;

    /// Hazard box
    pub const HAZARD_WIDTH: f32 = 1.0;
    pub const HAZARD_HEIGHT: f32 = 1.0;
    pub const HAZARD_DENSITY: f32 = 1.0;
    /// Pickup circle
    pub const PICKUP_RADIUS: f32 = 0.4;
    pub const PICKUP_DENSITY: f32 = 0.5;
    /// Height at which hazards and pickups are released
    pub const SPAWN_HEIGHT: f32 = 20.0;

    /// Extra horizontal room added to the forbidden zone
    pub const ZONE_LEEWAY: f32 = 2.0;
    /// Distance of the zone center from the player
    pub const ZONE_DISTANCE_MIN: f32 = 4.0;
    pub const ZONE_DISTANCE_MAX: f32 = 10.0;
    /// Countdown before each hazard of a wave is released (seconds)
    pub const HAZARD_SPAWN_DELAY: f32 = 0.2;
    /// Initial hazard velocity ranges
    pub const HAZARD_MIN_FALL_SPEED: f32 = -3.0;
    pub const HAZARD_JITTER: f32 = 0.2;
    /// Chance that a wave carries a life pickup
    pub const PICKUP_CHANCE: f64 = 0.2;

    /// Lives at session start (and cap)
    pub const MAX_LIVES: u8 = 5;
    /// Cooldown between waves (seconds)
    pub const WAVE_INTERVAL: f32 = 3.0;
    /// Minimum approach speed for a hit to count
    pub const HIT_SPEED_THRESHOLD: f32 = 5.0;
    /// Minimum |normal . up| for a hit to count (~37 degrees from vertical)
    pub const HIT_NORMAL_THRESHOLD: f32 = 0.8;
    /// Score lost on a qualifying hit
    pub const HIT_SCORE_PENALTY: u32 = 5;

    /// Horizontal drive force (multiplied by dt)
    pub const MOVE_FORCE: f32 = 2400.0;
    /// Upward force applied for one tick on jump
    pub const JUMP_FORCE: f32 = 350.0;
    /// Length of the ground probe below the player center
    pub const GROUND_PROBE: f32 = PLAYER_HEIGHT / 2.0 + 0.1;
}
