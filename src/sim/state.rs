//! Game state and core simulation types
//!
//! Everything the tick mutates besides the physics world and the registry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What a tracked body is, for classifying contacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Hazard,
    Pickup,
}

/// One pending spawn produced by the wave scheduler
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSpawn {
    pub kind: EntityTag,
    /// Seconds left before release (only ticks while this is the last entry)
    pub countdown: f32,
    pub velocity: Vec2,
    /// Horizontal release position
    pub x: f32,
}

/// Held movement keys (last writer wins)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub move_left: bool,
    pub move_right: bool,
}

impl InputIntent {
    /// Net horizontal direction: -1, 0 or 1
    pub fn axis(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Discrete input signals delivered by the platform layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Phase of the session, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting out the wave interval
    Idle,
    /// Draining the spawn queue
    Spawning,
    /// Out of lives (physics keeps running)
    Lost,
}

/// Things that happened during a tick, for rendering/audio feedback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted { wave: u32, hazards: u32, pickup: bool },
    Spawned { kind: EntityTag, x: f32 },
    LifeRestored { lives: u8 },
    PlayerHit { lives: u8, score: u32 },
    PlayerLost { score: u32, wave: u32 },
}

/// Read-only numbers the HUD draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub lives: u8,
    pub score: u32,
    pub wave: u32,
    pub lost: bool,
}

/// Complete mutable game record for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Seconds since session start
    pub elapsed: f32,
    /// Time of the last spawn (or of the last hit), start of the wave cooldown
    pub last_wave_time: f32,
    /// Cooldown between waves
    pub wave_interval: f32,
    /// Hazards the next wave will queue
    pub hazards_to_spawn: u32,
    /// Draining the spawn queue
    pub spawning: bool,
    /// Pending spawns, drained from the end
    pub pending_spawns: Vec<ScheduledSpawn>,
    pub score: u32,
    /// Player already took a hit during the current wave
    pub player_was_hit: bool,
    pub lives: u8,
    pub lost: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            last_wave_time: 0.0,
            wave_interval: WAVE_INTERVAL,
            hazards_to_spawn: 1,
            spawning: false,
            pending_spawns: Vec::new(),
            score: 0,
            player_was_hit: false,
            lives: MAX_LIVES,
            lost: false,
        }
    }

    /// Number of waves started so far
    pub fn wave(&self) -> u32 {
        self.hazards_to_spawn.saturating_sub(1)
    }

    pub fn phase(&self) -> Phase {
        if self.lost {
            Phase::Lost
        } else if self.spawning {
            Phase::Spawning
        } else {
            Phase::Idle
        }
    }

    /// Whether the cooldown has run out and a new wave may begin
    pub fn wave_due(&self) -> bool {
        !self.lost && !self.spawning && self.elapsed - self.last_wave_time >= self.wave_interval
    }

    pub fn hud(&self) -> Hud {
        Hud {
            lives: self.lives,
            score: self.score,
            wave: self.wave(),
            lost: self.lost,
        }
    }

    /// Add one life, up to the cap. Returns true if a life was added.
    pub fn restore_life(&mut self) -> bool {
        if self.lives < MAX_LIVES {
            self.lives += 1;
            true
        } else {
            false
        }
    }

    /// Apply a qualifying hit and abort the current wave.
    /// Returns true if this hit took the last life.
    pub fn register_hit(&mut self) -> bool {
        let was_lost = self.lost;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.lost = true;
        }
        self.score = self.score.saturating_sub(HIT_SCORE_PENALTY);
        self.player_was_hit = true;
        self.last_wave_time = self.elapsed;
        self.abort_wave();
        self.lost && !was_lost
    }

    /// Drop every pending spawn and leave the spawning phase
    pub fn abort_wave(&mut self) {
        self.pending_spawns.clear();
        self.spawning = false;
    }
}
