//! Physical objects
//!
//! Everything simulated in the hall — the monster, the humans, the
//! furniture, the fires, the corpses — is a `PhysicalObject` living in
//! a slot of the fixed-capacity [`Registry`]. Capabilities are flag
//! bits rather than types so that a slot can change role in place
//! (a slain warrior becomes a corpse, which is at once shovable,
//! edible, a weapon, and horrifying).

pub mod archetype;
pub mod registry;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub use archetype::Archetype;
pub use registry::{Blockage, Registry};

bitflags! {
    /// Capability flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ObjectFlags: u16 {
        /// Can be grabbed and wielded
        const WEAPON = 0x001;
        /// Restores health when eaten
        const EDIBLE = 0x002;
        /// Can be displaced by a shove
        const SHOVABLE = 0x004;
        /// The player's monster
        const MONSTER = 0x008;
        /// A living human defender
        const HUMAN = 0x010;
        /// Slot is occupied; nothing else is meaningful without this
        const IN_USE = 0x020;
        /// Floor clutter that does not block movement
        const BACKGROUND = 0x040;
        /// Excluded from occupant queries (fire)
        const NON_TARGETABLE = 0x080;
        /// Frightens humans when wielded, broken, or eaten
        const HORRIFYING = 0x100;
        /// Living creatures path around this even though it is background
        const AVOID = 0x200;
        /// Attacks at range; changes combat narration
        const RANGED = 0x400;
    }
}

bitflags! {
    /// Transient status flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StatusFlags: u8 {
        const HORRIFIED = 0x01;
        const PRONE = 0x02;
        const BRAVE = 0x04;
    }
}

// Manual serde impls for the bitflags types
impl Serialize for ObjectFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ObjectFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(ObjectFlags::from_bits_truncate(bits))
    }
}

impl Serialize for StatusFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatusFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(StatusFlags::from_bits_truncate(bits))
    }
}

/// Per-turn behavior, dispatched by the scheduler
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Behavior {
    /// Close and attack the monster
    Melee,
    /// Keep distance and shoot
    Ranged,
    /// Embolden the other humans, stay in a comfort band
    Skald,
    /// Acts twice per turn
    DoubleMelee,
    /// Burn whatever stands in it
    Fire,
    /// Win/loss bookkeeping on the player slot
    MonsterMeta,
}

/// Sprite identifiers handed to the renderer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Sprite {
    Monster,
    Warrior,
    Berserker,
    Ulfhednar,
    Archer,
    Skald,
    Pillar,
    Table,
    Chair,
    Fire,
    Corpse,
}

/// A simulated entity occupying one registry slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalObject {
    /// Display name ("Warrior")
    pub name: String,

    /// Narrative reference ("the warrior"); lowercase, the flavor log
    /// capitalizes line starts
    pub reference: String,

    pub health: i32,

    /// Negative = indestructible, health tracking suppressed (fire)
    pub max_health: i32,

    /// Bare damage when not wielding anything
    pub damage: i32,

    /// Percent chance to resist fear, 0-100
    pub will: i32,

    pub flags: ObjectFlags,
    pub status: StatusFlags,

    pub sprite: Sprite,

    /// Tile coordinates; (-1, -1) while held off-grid
    pub x: i32,
    pub y: i32,

    pub turns_prone: i32,
    pub turns_brave: i32,

    /// Slot index of the object this one is holding
    pub held: Option<usize>,

    /// What this object does on its turn; `None` slots are skipped by
    /// the scheduler
    pub behavior: Option<Behavior>,
}

impl PhysicalObject {
    pub fn in_use(&self) -> bool {
        self.flags.contains(ObjectFlags::IN_USE)
    }

    pub fn is_human(&self) -> bool {
        self.flags.contains(ObjectFlags::HUMAN)
    }

    pub fn is_monster(&self) -> bool {
        self.flags.contains(ObjectFlags::MONSTER)
    }

    pub fn is_brave(&self) -> bool {
        self.status.contains(StatusFlags::BRAVE)
    }

    pub fn is_prone(&self) -> bool {
        self.status.contains(StatusFlags::PRONE)
    }

    pub fn is_horrified(&self) -> bool {
        self.status.contains(StatusFlags::HORRIFIED)
    }
}

impl Default for PhysicalObject {
    /// An empty, free slot
    fn default() -> Self {
        Self {
            name: String::new(),
            reference: String::new(),
            health: 0,
            max_health: 0,
            damage: 0,
            will: 0,
            flags: ObjectFlags::empty(),
            status: StatusFlags::empty(),
            sprite: Sprite::Corpse,
            x: 0,
            y: 0,
            turns_prone: 0,
            turns_brave: 0,
            held: None,
            behavior: None,
        }
    }
}
