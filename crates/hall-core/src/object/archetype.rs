//! Archetype templates
//!
//! Each archetype is a named template of starting stats, flags, and
//! behavior. Creation goes through a template so that every spawn of a
//! kind is identical and the corpse conversion can re-stamp a slot.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::{Behavior, ObjectFlags, PhysicalObject, Sprite, StatusFlags};

/// Everything that can be spawned into the hall
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Archetype {
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

impl Archetype {
    /// Difficulty cost of spawning this archetype as an enemy
    pub fn threat_score(self) -> i32 {
        match self {
            Archetype::Warrior => 10,
            Archetype::Archer => 15,
            Archetype::Berserker => 20,
            Archetype::Skald | Archetype::Ulfhednar => 30,
            _ => 0,
        }
    }

    /// The starting object for this archetype, before placement
    pub fn template(self) -> PhysicalObject {
        let base = PhysicalObject::default();
        match self {
            Archetype::Monster => PhysicalObject {
                name: "You".into(),
                reference: "you".into(),
                health: 25,
                max_health: 25,
                damage: 5,
                flags: ObjectFlags::MONSTER,
                sprite: Sprite::Monster,
                behavior: Some(Behavior::MonsterMeta),
                ..base
            },
            Archetype::Warrior => PhysicalObject {
                name: "Warrior".into(),
                reference: "the warrior".into(),
                health: 5,
                max_health: 5,
                damage: 3,
                will: 25,
                flags: ObjectFlags::EDIBLE | ObjectFlags::HUMAN | ObjectFlags::SHOVABLE,
                sprite: Sprite::Warrior,
                behavior: Some(Behavior::Melee),
                ..base
            },
            Archetype::Berserker => PhysicalObject {
                name: "Berserker".into(),
                reference: "the berserker".into(),
                health: 15,
                max_health: 15,
                damage: 5,
                will: 50,
                flags: ObjectFlags::EDIBLE | ObjectFlags::HUMAN | ObjectFlags::SHOVABLE,
                sprite: Sprite::Berserker,
                behavior: Some(Behavior::Melee),
                ..base
            },
            Archetype::Ulfhednar => PhysicalObject {
                name: "Ulfhednar".into(),
                reference: "the ulfhednar".into(),
                health: 10,
                max_health: 10,
                damage: 3,
                will: 50,
                flags: ObjectFlags::EDIBLE | ObjectFlags::HUMAN | ObjectFlags::SHOVABLE,
                sprite: Sprite::Ulfhednar,
                behavior: Some(Behavior::DoubleMelee),
                ..base
            },
            Archetype::Archer => PhysicalObject {
                name: "Archer".into(),
                reference: "the archer".into(),
                health: 5,
                max_health: 5,
                damage: 2,
                will: 25,
                flags: ObjectFlags::EDIBLE
                    | ObjectFlags::HUMAN
                    | ObjectFlags::SHOVABLE
                    | ObjectFlags::RANGED,
                sprite: Sprite::Archer,
                behavior: Some(Behavior::Ranged),
                ..base
            },
            Archetype::Skald => PhysicalObject {
                name: "Skald".into(),
                reference: "the skald".into(),
                health: 5,
                max_health: 5,
                damage: 2,
                will: 25,
                flags: ObjectFlags::EDIBLE | ObjectFlags::HUMAN | ObjectFlags::SHOVABLE,
                sprite: Sprite::Skald,
                behavior: Some(Behavior::Skald),
                ..base
            },
            Archetype::Pillar => PhysicalObject {
                name: "Pillar".into(),
                reference: "the pillar".into(),
                health: 75,
                max_health: 75,
                sprite: Sprite::Pillar,
                ..base
            },
            Archetype::Table => PhysicalObject {
                name: "Table".into(),
                reference: "the table".into(),
                health: 10,
                max_health: 10,
                flags: ObjectFlags::SHOVABLE,
                sprite: Sprite::Table,
                ..base
            },
            Archetype::Chair => PhysicalObject {
                name: "Chair".into(),
                reference: "the chair".into(),
                health: 3,
                max_health: 3,
                damage: 10,
                flags: ObjectFlags::SHOVABLE | ObjectFlags::WEAPON | ObjectFlags::BACKGROUND,
                sprite: Sprite::Chair,
                ..base
            },
            Archetype::Fire => PhysicalObject {
                name: "Fire".into(),
                reference: "the fire".into(),
                health: -1,
                max_health: -1,
                damage: 5,
                flags: ObjectFlags::BACKGROUND
                    | ObjectFlags::NON_TARGETABLE
                    | ObjectFlags::AVOID,
                sprite: Sprite::Fire,
                behavior: Some(Behavior::Fire),
                ..base
            },
            Archetype::Corpse => PhysicalObject {
                name: "Corpse".into(),
                reference: "the corpse".into(),
                health: 5,
                max_health: 5,
                damage: 10,
                flags: ObjectFlags::SHOVABLE
                    | ObjectFlags::EDIBLE
                    | ObjectFlags::WEAPON
                    | ObjectFlags::HORRIFYING,
                sprite: Sprite::Corpse,
                ..base
            },
        }
    }
}

/// Convert a slain human or monster into a corpse, in place.
///
/// The slot keeps its index and coordinates; everything else is
/// re-stamped from the Corpse archetype. The corpse is at once
/// shovable, edible, a weapon, and horrifying.
pub fn make_corpse(obj: &mut PhysicalObject) {
    if !(obj.in_use() || obj.is_human()) {
        return;
    }

    let corpse = Archetype::Corpse.template();
    obj.name = corpse.name;
    obj.reference = corpse.reference;
    obj.health = corpse.health;
    obj.max_health = corpse.max_health;
    obj.damage = corpse.damage;
    obj.will = corpse.will;
    obj.flags = corpse.flags | ObjectFlags::IN_USE;
    obj.status = StatusFlags::empty();
    obj.sprite = corpse.sprite;
    obj.behavior = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_templates_are_human() {
        for kind in [
            Archetype::Warrior,
            Archetype::Berserker,
            Archetype::Ulfhednar,
            Archetype::Archer,
            Archetype::Skald,
        ] {
            let obj = kind.template();
            assert!(obj.flags.contains(ObjectFlags::HUMAN), "{kind}");
            assert!(obj.flags.contains(ObjectFlags::EDIBLE), "{kind}");
            assert!(obj.behavior.is_some(), "{kind}");
            assert!(obj.health > 0 && obj.health == obj.max_health, "{kind}");
        }
    }

    #[test]
    fn test_fire_is_indestructible_background() {
        let fire = Archetype::Fire.template();
        assert!(fire.max_health < 0);
        assert!(fire.flags.contains(
            ObjectFlags::BACKGROUND | ObjectFlags::NON_TARGETABLE | ObjectFlags::AVOID
        ));
        assert_eq!(fire.behavior, Some(Behavior::Fire));
    }

    #[test]
    fn test_furniture_has_no_behavior() {
        for kind in [Archetype::Pillar, Archetype::Table, Archetype::Chair] {
            assert!(kind.template().behavior.is_none(), "{kind}");
        }
    }

    #[test]
    fn test_make_corpse_restamps_in_place() {
        let mut obj = Archetype::Warrior.template();
        obj.flags |= ObjectFlags::IN_USE;
        obj.x = 7;
        obj.y = 9;
        obj.status = StatusFlags::BRAVE;
        obj.health = -2;

        make_corpse(&mut obj);

        assert!(obj.in_use());
        assert!(!obj.is_human());
        assert_eq!((obj.x, obj.y), (7, 9));
        assert_eq!((obj.health, obj.max_health), (5, 5));
        assert_eq!(obj.damage, 10);
        assert!(obj.status.is_empty());
        assert!(obj.behavior.is_none());
        assert!(obj.flags.contains(
            ObjectFlags::SHOVABLE
                | ObjectFlags::EDIBLE
                | ObjectFlags::WEAPON
                | ObjectFlags::HORRIFYING
        ));
    }

    #[test]
    fn test_threat_scores() {
        assert_eq!(Archetype::Warrior.threat_score(), 10);
        assert_eq!(Archetype::Archer.threat_score(), 15);
        assert_eq!(Archetype::Berserker.threat_score(), 20);
        assert_eq!(Archetype::Skald.threat_score(), 30);
        assert_eq!(Archetype::Ulfhednar.threat_score(), 30);
        assert_eq!(Archetype::Table.threat_score(), 0);
    }
}
