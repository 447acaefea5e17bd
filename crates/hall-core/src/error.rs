//! Crate error types

use thiserror::Error;

/// Why an object could not be placed in the level.
///
/// Never fatal: callers log the failure and treat the object as
/// "not placed".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    #[error("no free object slots")]
    RegistryFull,

    #[error("tile ({0}, {1}) is blocked")]
    TileBlocked(i32, i32),
}
