//! Per-session context
//!
//! Owns the physics world, the entity registry, the game state, the held input
//! and the RNG. Passed by reference into every [`tick`](super::tick::tick).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arena::{self, GROUND_PROBE_FILTER};
use super::registry::EntityRegistry;
use super::state::{EntityTag, GameEvent, GameState, Hud, InputAction, InputIntent, Phase};
use crate::consts::*;
use crate::physics::{BodyHandle, PhysicsWorld};

/// What a rendered body is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyViewKind {
    Player,
    Hazard,
    Pickup,
}

/// Transform of one dynamic body, for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub kind: BodyViewKind,
    pub position: Vec2,
    pub rotation: f32,
}

/// One running game over a physics world
pub struct Session<W: PhysicsWorld> {
    pub world: W,
    pub registry: EntityRegistry,
    pub state: GameState,
    pub input: InputIntent,
    pub(crate) player: BodyHandle,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
    seed: u64,
}

impl<W: PhysicsWorld> Session<W> {
    /// Build the level in `world` and start a fresh session
    pub fn new(mut world: W, seed: u64) -> Self {
        let player = arena::build(&mut world);
        log::info!("Session started with seed: {}", seed);
        Self {
            world,
            registry: EntityRegistry::new(),
            state: GameState::new(),
            input: InputIntent::default(),
            player,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self) -> BodyHandle {
        self.player
    }

    pub fn player_position(&self) -> Vec2 {
        self.world
            .position(self.player)
            .unwrap_or_else(arena::player_start)
    }

    pub fn set_move_left(&mut self, held: bool) {
        self.input.move_left = held;
    }

    pub fn set_move_right(&mut self, held: bool) {
        self.input.move_right = held;
    }

    /// Route a press/release from the platform layer. Jump fires on press only.
    pub fn apply_input(&mut self, action: InputAction, pressed: bool) {
        match action {
            InputAction::MoveLeft => self.set_move_left(pressed),
            InputAction::MoveRight => self.set_move_right(pressed),
            InputAction::Jump => {
                if pressed {
                    self.try_jump();
                }
            }
        }
    }

    /// Whether the ground probe below the player touches level geometry
    pub fn is_grounded(&self) -> bool {
        self.world.cast_ray(
            self.player_position(),
            Vec2::new(0.0, -GROUND_PROBE),
            GROUND_PROBE_FILTER,
        )
    }

    /// Push the player upward if standing on the ground and still alive.
    /// Returns true if the jump was applied.
    pub fn try_jump(&mut self) -> bool {
        if self.state.lost || !self.is_grounded() {
            return false;
        }
        let pos = self.player_position();
        self.world
            .apply_force(self.player, Vec2::new(0.0, JUMP_FORCE), pos);
        true
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn hud(&self) -> Hud {
        self.state.hud()
    }

    pub fn wave(&self) -> u32 {
        self.state.wave()
    }

    /// Events recorded by the most recent tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Player, hazard and pickup transforms
    pub fn bodies(&self) -> Vec<BodyView> {
        let player = self.world.position(self.player).map(|position| BodyView {
            kind: BodyViewKind::Player,
            position,
            rotation: self.world.rotation(self.player).unwrap_or(0.0),
        });

        let tracked = self.registry.iter().filter_map(|(body, tag)| {
            let position = self.world.position(body)?;
            Some(BodyView {
                kind: match tag {
                    EntityTag::Hazard => BodyViewKind::Hazard,
                    EntityTag::Pickup => BodyViewKind::Pickup,
                },
                position,
                rotation: self.world.rotation(body).unwrap_or(0.0),
            })
        });

        player.into_iter().chain(tracked).collect()
    }

    /// Tear down: destroy tracked bodies, release the pending queue and hand back the final state
    pub fn end(mut self) -> GameState {
        self.registry.clear(&mut self.world);
        self.state.abort_wave();
        log::info!(
            "Session ended: score {}, wave {}, lives {}",
            self.state.score,
            self.state.wave(),
            self.state.lives
        );
        self.state
    }
}
