//! Tiles and wall-shape derivation

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

bitflags! {
    /// Terrain flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TileFlags: u8 {
        const OBSTRUCTS = 0x01;
    }
}

// Manual serde impl for TileFlags
impl Serialize for TileFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(TileFlags::from_bits_truncate(bits))
    }
}

bitflags! {
    /// Obstruction state of the 8 neighboring tiles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Neighbors: u8 {
        const UP = 1 << 0;
        const UP_RIGHT = 1 << 1;
        const RIGHT = 1 << 2;
        const DOWN_RIGHT = 1 << 3;
        const DOWN = 1 << 4;
        const DOWN_LEFT = 1 << 5;
        const LEFT = 1 << 6;
        const UP_LEFT = 1 << 7;
    }
}

/// Visual tile variants the renderer knows how to draw
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum TileImage {
    Floor,
    Wall,
    InnerCorner,
    OuterCorner,
}

/// A single grid tile
///
/// `image` and `rotation` are derived from the obstruction grid after
/// generation; `None` means the tile is fully interior wall and is not
/// drawn at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tile {
    /// Visual variant, or `None` for undrawn interior stone
    pub image: Option<TileImage>,

    /// Sprite rotation in degrees
    pub rotation: f32,

    /// Center of the tile in render units
    pub render_pos: (f32, f32),

    /// Terrain flags
    pub flags: TileFlags,
}

impl Tile {
    pub fn obstructs(&self) -> bool {
        self.flags.contains(TileFlags::OBSTRUCTS)
    }
}

/// Pick the image and rotation for an obstructing tile from the
/// obstruction state of its 8 neighbors.
///
/// Pure function of the neighbor mask: a fully enclosed tile is not
/// drawn, the four outer and four inner corner cases and the four
/// straight-wall cases get the matching sprite, anything else falls
/// back to a floor sprite rotated 45 degrees.
pub fn wall_appearance(n: Neighbors) -> (Option<TileImage>, f32) {
    let diag = |a: Neighbors, b: Neighbors| n.contains(a) && !n.intersects(b);

    if n.is_all() {
        (None, 0.0)
    } else if diag(
        Neighbors::UP | Neighbors::LEFT | Neighbors::UP_LEFT,
        Neighbors::RIGHT | Neighbors::DOWN | Neighbors::DOWN_RIGHT,
    ) {
        (Some(TileImage::OuterCorner), 0.0)
    } else if diag(
        Neighbors::UP | Neighbors::RIGHT | Neighbors::UP_RIGHT,
        Neighbors::LEFT | Neighbors::DOWN | Neighbors::DOWN_LEFT,
    ) {
        (Some(TileImage::OuterCorner), 90.0)
    } else if diag(
        Neighbors::DOWN | Neighbors::RIGHT | Neighbors::DOWN_RIGHT,
        Neighbors::LEFT | Neighbors::UP | Neighbors::UP_LEFT,
    ) {
        (Some(TileImage::OuterCorner), 180.0)
    } else if diag(
        Neighbors::DOWN | Neighbors::LEFT | Neighbors::DOWN_LEFT,
        Neighbors::RIGHT | Neighbors::UP | Neighbors::UP_RIGHT,
    ) {
        (Some(TileImage::OuterCorner), 270.0)
    } else if diag(Neighbors::RIGHT | Neighbors::DOWN, Neighbors::DOWN_RIGHT) {
        (Some(TileImage::InnerCorner), 0.0)
    } else if diag(Neighbors::LEFT | Neighbors::DOWN, Neighbors::DOWN_LEFT) {
        (Some(TileImage::InnerCorner), 90.0)
    } else if diag(Neighbors::LEFT | Neighbors::UP, Neighbors::UP_LEFT) {
        (Some(TileImage::InnerCorner), 180.0)
    } else if diag(Neighbors::RIGHT | Neighbors::UP, Neighbors::UP_RIGHT) {
        (Some(TileImage::InnerCorner), 270.0)
    } else if n.contains(Neighbors::LEFT | Neighbors::RIGHT | Neighbors::UP) {
        (Some(TileImage::Wall), 0.0)
    } else if n.contains(Neighbors::LEFT | Neighbors::RIGHT | Neighbors::DOWN) {
        (Some(TileImage::Wall), 180.0)
    } else if n.contains(Neighbors::LEFT | Neighbors::UP | Neighbors::DOWN) {
        (Some(TileImage::Wall), -90.0)
    } else if n.contains(Neighbors::RIGHT | Neighbors::UP | Neighbors::DOWN) {
        (Some(TileImage::Wall), 90.0)
    } else {
        (Some(TileImage::Floor), 45.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_enclosed_not_drawn() {
        assert_eq!(wall_appearance(Neighbors::all()), (None, 0.0));
    }

    #[test]
    fn test_outer_corners() {
        let ul = Neighbors::UP | Neighbors::LEFT | Neighbors::UP_LEFT;
        assert_eq!(wall_appearance(ul), (Some(TileImage::OuterCorner), 0.0));

        let ur = Neighbors::UP | Neighbors::RIGHT | Neighbors::UP_RIGHT;
        assert_eq!(wall_appearance(ur), (Some(TileImage::OuterCorner), 90.0));

        let dr = Neighbors::DOWN | Neighbors::RIGHT | Neighbors::DOWN_RIGHT;
        assert_eq!(wall_appearance(dr), (Some(TileImage::OuterCorner), 180.0));

        let dl = Neighbors::DOWN | Neighbors::LEFT | Neighbors::DOWN_LEFT;
        assert_eq!(wall_appearance(dl), (Some(TileImage::OuterCorner), 270.0));
    }

    #[test]
    fn test_inner_corner_beats_straight_wall() {
        // everything but the lower-right diagonal: an inner corner
        // opening toward it
        let n = Neighbors::all() - Neighbors::DOWN_RIGHT;
        assert_eq!(wall_appearance(n), (Some(TileImage::InnerCorner), 0.0));
    }

    #[test]
    fn test_straight_walls() {
        let top = Neighbors::LEFT | Neighbors::RIGHT | Neighbors::UP | Neighbors::UP_LEFT
            | Neighbors::UP_RIGHT;
        assert_eq!(wall_appearance(top), (Some(TileImage::Wall), 0.0));

        let bottom = Neighbors::LEFT | Neighbors::RIGHT | Neighbors::DOWN
            | Neighbors::DOWN_LEFT | Neighbors::DOWN_RIGHT;
        assert_eq!(wall_appearance(bottom), (Some(TileImage::Wall), 180.0));

        let left = Neighbors::LEFT | Neighbors::UP | Neighbors::DOWN | Neighbors::UP_LEFT
            | Neighbors::DOWN_LEFT;
        assert_eq!(wall_appearance(left), (Some(TileImage::Wall), -90.0));

        let right = Neighbors::RIGHT | Neighbors::UP | Neighbors::DOWN
            | Neighbors::UP_RIGHT | Neighbors::DOWN_RIGHT;
        assert_eq!(wall_appearance(right), (Some(TileImage::Wall), 90.0));
    }

    #[test]
    fn test_isolated_block_falls_back_to_floor() {
        assert_eq!(
            wall_appearance(Neighbors::empty()),
            (Some(TileImage::Floor), 45.0)
        );
    }
}
