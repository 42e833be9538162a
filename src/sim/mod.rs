//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Bodies referenced by handle, never owned
//! - No rendering or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod registry;
pub mod session;
pub mod state;
pub mod tick;
pub mod wave;

pub use registry::EntityRegistry;
pub use session::{BodyView, BodyViewKind, Session};
pub use state::{
    EntityTag, GameEvent, GameState, Hud, InputAction, InputIntent, Phase, ScheduledSpawn,
};
pub use tick::{is_qualifying_hit, tick};
pub use wave::{ForbiddenZone, begin_wave};
