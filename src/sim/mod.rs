//! Game simulation
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - One step per rendered frame (no fixed timestep)
//! - Seeded RNG only, so a session replays from its seed and input
//! - Deferred work runs on the game thread at the start of a tick

pub mod blade;
pub mod collision;
pub mod deferred;
pub mod physics;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use blade::{BladeTrail, build_ribbon};
pub use collision::{find_slices, is_hit};
pub use deferred::{Deferred, DeferredQueue};
pub use scoring::{ScoringEngine, SliceOutcome};
pub use spawn::{Launch, Spawner, batch_size, launch_velocity_y, plan_launch, time_to_apex};
pub use state::{Entity, GameObject, GamePhase, ObjectKind, UiElement, UiTag};
pub use tick::{CutSignal, GameSession, TickInput, TickReport};
