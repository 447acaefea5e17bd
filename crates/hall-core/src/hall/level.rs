//! The tile grid and terrain queries

use serde::{Deserialize, Serialize};

use super::tile::{wall_appearance, Neighbors, Tile, TileFlags, TileImage};
use crate::consts::{LEVEL_HEIGHT, LEVEL_SIZE, LEVEL_WIDTH, TILE_PIXELS};

/// The fixed-size tile grid
///
/// Regenerated wholesale for each new hall; immutable during play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    tiles: Vec<Tile>,
}

impl Level {
    /// A level of solid stone, ready to be carved
    pub fn solid() -> Self {
        let mut tiles = Vec::with_capacity(LEVEL_SIZE);
        for y in 0..LEVEL_HEIGHT {
            for x in 0..LEVEL_WIDTH {
                tiles.push(Tile {
                    image: None,
                    rotation: 0.0,
                    render_pos: (
                        TILE_PIXELS / 2.0 + x as f32 * TILE_PIXELS,
                        TILE_PIXELS / 2.0 + y as f32 * TILE_PIXELS,
                    ),
                    flags: TileFlags::OBSTRUCTS,
                });
            }
        }
        Self { tiles }
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= LEVEL_WIDTH || y < 0 || y >= LEVEL_HEIGHT {
            None
        } else {
            Some((x + y * LEVEL_WIDTH) as usize)
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        Self::index(x, y).map(|i| &self.tiles[i])
    }

    /// All tiles in row-major order, for rendering
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// True if the coordinate is out of bounds or the terrain obstructs
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        match self.tile(x, y) {
            Some(tile) => tile.obstructs(),
            None => true,
        }
    }

    /// Clear the obstruction flag inside an inclusive rectangle
    pub fn carve_rect(&mut self, left: i32, right: i32, top: i32, bottom: i32) {
        for y in 0..LEVEL_HEIGHT {
            for x in 0..LEVEL_WIDTH {
                if x >= left && x <= right && y >= top && y <= bottom {
                    let i = Self::index(x, y).unwrap_or_default();
                    self.tiles[i].flags.remove(TileFlags::OBSTRUCTS);
                }
            }
        }
    }

    /// Recompute every tile's image and rotation from the obstruction
    /// grid. Must be rerun whenever the grid changes.
    pub fn derive_images(&mut self) {
        for y in 0..LEVEL_HEIGHT {
            for x in 0..LEVEL_WIDTH {
                let (image, rotation) = if self.is_blocked(x, y) {
                    wall_appearance(self.neighbor_mask(x, y))
                } else {
                    (Some(TileImage::Floor), 0.0)
                };
                let i = Self::index(x, y).unwrap_or_default();
                self.tiles[i].image = image;
                self.tiles[i].rotation = rotation;
            }
        }
    }

    fn neighbor_mask(&self, x: i32, y: i32) -> Neighbors {
        let mut n = Neighbors::empty();
        let mut set = |flag, bx, by| {
            if self.is_blocked(bx, by) {
                n |= flag;
            }
        };
        set(Neighbors::UP, x, y - 1);
        set(Neighbors::UP_RIGHT, x + 1, y - 1);
        set(Neighbors::RIGHT, x + 1, y);
        set(Neighbors::DOWN_RIGHT, x + 1, y + 1);
        set(Neighbors::DOWN, x, y + 1);
        set(Neighbors::DOWN_LEFT, x - 1, y + 1);
        set(Neighbors::LEFT, x - 1, y);
        set(Neighbors::UP_LEFT, x - 1, y - 1);
        n
    }
}
