//! hall-core: Core game logic for the great-hall rampage game
//!
//! One monster (the player) against a hall full of human defenders.
//! This crate contains the whole turn-based simulation with no I/O
//! dependencies: the tile grid, the physical-object registry, the
//! per-archetype AI, the combat rules, and the procedural level
//! generator. Rendering, audio, and raw input live in other crates
//! and only read the state exposed here.

pub mod action;
pub mod combat;
pub mod flavor;
pub mod hall;
pub mod object;

mod consts;
mod error;
mod gameloop;
mod rng;

pub use action::{Command, Direction};
pub use consts::*;
pub use error::SpawnError;
pub use gameloop::{GameState, InputState};
pub use rng::GameRng;
