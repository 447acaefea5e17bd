//! The hall: tile grid, terrain queries, and level generation

pub mod generation;
pub mod level;
pub mod tile;

pub use level::Level;
pub use tile::{Neighbors, Tile, TileFlags, TileImage};
