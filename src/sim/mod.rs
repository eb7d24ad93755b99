//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module reads a clock or
//! touches the filesystem:
//! - Time comes in as a millisecond timestamp on every call
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod animation;
pub mod autopilot;
pub mod collision;
pub mod grid;
pub mod obstacles;
pub mod particles;
pub mod powerup;
pub mod rng;
pub mod state;
pub mod tick;
pub mod view;

pub use animation::{AnimationSequencer, CountdownFrame, DeathFrame, DeathStage, FrameEffects};
pub use collision::{Collision, HAZARD_ORDER, Resolution, classify, resolve};
pub use grid::{Cell, Direction, DirectionQueue, Food, GridWorld, Snake};
pub use obstacles::{ObstacleSet, Shape};
pub use particles::{Particle, ParticleSystem, ParticleVisual};
pub use powerup::{PowerupChoice, PowerupKind, PowerupSystem, Remaining};
pub use rng::RandomSource;
pub use state::{GameEvent, GamePhase, GameState, Round};
pub use tick::{Command, TickInput, tick};
pub use view::{FrameView, PowerupHud};
