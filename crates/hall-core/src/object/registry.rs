//! Fixed-capacity slot table of all simulated objects

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ObjectFlags, PhysicalObject};
use crate::consts::MAX_OBJECTS;
use crate::error::SpawnError;
use crate::hall::Level;

/// What occupies a tile, from a mover's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blockage {
    /// Nothing in the way
    Free,
    /// The terrain itself obstructs
    Terrain,
    /// An object stands there (slot index)
    Object(usize),
}

/// Owner of every simulated object, by fixed slot index
///
/// Slots are never removed; `destroy` only clears the in-use flag and
/// the slot is recycled by the next `create`. Indices therefore stay
/// valid for the lifetime of a level, which is what lets the corpse
/// conversion happen in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    slots: Vec<PhysicalObject>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            slots: vec![PhysicalObject::default(); MAX_OBJECTS],
        }
    }

    /// Free every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = PhysicalObject::default();
        }
    }

    /// Claim the first free slot for `template`.
    ///
    /// Exhaustion is logged and reported, never fatal; the caller
    /// treats it as "object not placed".
    pub fn create(&mut self, mut template: PhysicalObject) -> Result<usize, SpawnError> {
        match self.slots.iter().position(|slot| !slot.in_use()) {
            Some(idx) => {
                template.flags |= ObjectFlags::IN_USE;
                template.status = super::StatusFlags::empty();
                self.slots[idx] = template;
                Ok(idx)
            }
            None => {
                warn!("unable to find empty object slot");
                Err(SpawnError::RegistryFull)
            }
        }
    }

    /// Clear the in-use flag; slot contents stay stale until reuse
    pub fn destroy(&mut self, idx: usize) {
        if let Some(slot) = self.slots.get_mut(idx) {
            slot.flags.remove(ObjectFlags::IN_USE);
        }
    }

    pub fn get(&self, idx: usize) -> &PhysicalObject {
        &self.slots[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut PhysicalObject {
        &mut self.slots[idx]
    }

    pub fn is_in_use(&self, idx: usize) -> bool {
        self.slots.get(idx).is_some_and(PhysicalObject::in_use)
    }

    /// All occupied slots
    pub fn iter_in_use(&self) -> impl Iterator<Item = (usize, &PhysicalObject)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, obj)| obj.in_use())
    }

    /// Manhattan distance between two objects
    pub fn distance(&self, a: usize, b: usize) -> i32 {
        let (a, b) = (&self.slots[a], &self.slots[b]);
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    /// Manhattan distance from an object to a tile
    pub fn distance_to_tile(&self, idx: usize, x: i32, y: i32) -> i32 {
        let obj = &self.slots[idx];
        (obj.x - x).abs() + (obj.y - y).abs()
    }

    /// Living humans left in the hall; zero means the monster has won
    pub fn humans_alive(&self) -> usize {
        self.iter_in_use()
            .filter(|(_, obj)| obj.is_human())
            .count()
    }

    /// The in-use, targetable object at a tile whose flags contain ALL
    /// of `filter` (an empty filter matches any). Out-of-bounds tiles
    /// hold nothing.
    pub fn object_at(&self, x: i32, y: i32, filter: ObjectFlags) -> Option<usize> {
        if x < 0 || x >= crate::consts::LEVEL_WIDTH || y < 0 || y >= crate::consts::LEVEL_HEIGHT
        {
            return None;
        }
        self.iter_in_use()
            .find(|(_, obj)| {
                !obj.flags.contains(ObjectFlags::NON_TARGETABLE)
                    && obj.flags.contains(filter)
                    && obj.x == x
                    && obj.y == y
            })
            .map(|(idx, _)| idx)
    }

    /// Whether a tile is free to step onto.
    ///
    /// Background objects do not block unless the mover asks for
    /// avoidance AND the object is avoid-flagged — creatures shun
    /// fire but can still be shoved into it.
    pub fn blockage_at(&self, level: &Level, x: i32, y: i32, avoidance: bool) -> Blockage {
        if level.is_blocked(x, y) {
            return Blockage::Terrain;
        }

        for (idx, obj) in self.iter_in_use() {
            if obj.flags.contains(ObjectFlags::BACKGROUND)
                && !(avoidance && obj.flags.contains(ObjectFlags::AVOID))
            {
                continue;
            }
            if obj.x == x && obj.y == y {
                return Blockage::Object(idx);
            }
        }

        Blockage::Free
    }

    /// Single-step move; succeeds iff the destination is free under
    /// the avoidance semantics above. No partial moves.
    pub fn try_move(
        &mut self,
        level: &Level,
        idx: usize,
        dx: i32,
        dy: i32,
        avoidance: bool,
    ) -> bool {
        let (new_x, new_y) = {
            let obj = &self.slots[idx];
            (obj.x + dx, obj.y + dy)
        };
        if self.blockage_at(level, new_x, new_y, avoidance) == Blockage::Free {
            let obj = &mut self.slots[idx];
            obj.x = new_x;
            obj.y = new_y;
            true
        } else {
            false
        }
    }
}
