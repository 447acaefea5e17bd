//! Combat and interaction rules
//!
//! Attack resolution, fear, shoving, grabbing, eating, and throwing.
//! The same functions resolve both AI turns and player intents, so a
//! rule change here changes it for everyone.

use crate::consts::{
    EAT_BURST_RADIUS, HIT_BURST_RADIUS, MELEE_BREAK_BURST_RADIUS, SHATTER_BURST_RADIUS,
    THROWN_BREAK_BURST_RADIUS,
};
use crate::gameloop::GameState;
use crate::object::archetype::make_corpse;
use crate::object::{Behavior, Blockage, ObjectFlags, PhysicalObject, StatusFlags};
use crate::rng::GameRng;

/// Roll against an object's will to resist fear.
///
/// A brave object gets a second independent roll; either success
/// passes.
pub fn will_test(obj: &PhysicalObject, rng: &mut GameRng) -> bool {
    let tries = if obj.is_brave() { 2 } else { 1 };
    for _ in 0..tries {
        if rng.rn2(100) as i32 <= obj.will {
            return true;
        }
    }
    false
}

/// One object faces something horrifying; on a failed will test it
/// becomes horrified.
pub fn horrify_check(state: &mut GameState, idx: usize) {
    let passed = will_test(state.registry.get(idx), &mut state.rng);
    let obj = state.registry.get_mut(idx);
    let line = if passed {
        format!("{} resists their fear.", obj.reference)
    } else {
        obj.status |= StatusFlags::HORRIFIED;
        format!("{} is shaking with fear.", obj.reference)
    };
    state.flavor.push(line);
}

/// Apply the fear check to every living human within a square radius
/// of the epicenter.
pub fn horrify_burst(state: &mut GameState, x: i32, y: i32, radius: i32) {
    let nearby: Vec<usize> = state
        .registry
        .iter_in_use()
        .filter(|(_, obj)| {
            obj.is_human() && (obj.x - x).abs() <= radius && (obj.y - y).abs() <= radius
        })
        .map(|(idx, _)| idx)
        .collect();
    for idx in nearby {
        horrify_check(state, idx);
    }
}

/// Resolve one attack.
///
/// Damage is a uniform roll up to the attacker's bare damage, or the
/// held weapon's damage if wielding one; brave attackers roll twice
/// and keep the better. `multiplier` 1 is a normal swing that wears a
/// held weapon by one point; anything higher is a thrown impact that
/// breaks the weapon outright. Lethal damage converts humans and the
/// monster into corpses in place and removes anything else; the
/// defeated monster keeps its slot scheduled so the loss still
/// resolves.
pub fn attack(state: &mut GameState, attacker: usize, defender: usize, multiplier: i32) {
    let mut horrifying = false;
    let mut weapon_broke = false;
    let mut max_damage = state.registry.get(attacker).damage + 1;

    if let Some(weapon_idx) = state.registry.get(attacker).held {
        let weapon = state.registry.get_mut(weapon_idx);
        horrifying = weapon.flags.contains(ObjectFlags::HORRIFYING);
        max_damage = weapon.damage + 1;

        if multiplier > 1 {
            weapon.health = 0;
        } else {
            weapon.health -= 1;
        }

        if weapon.health <= 0 {
            let line = if horrifying {
                weapon_broke = true;
                format!(
                    "{} was smashed open, spraying gore everywhere.",
                    weapon.reference
                )
            } else {
                format!("{} was smashed into pieces.", weapon.reference)
            };
            state.flavor.push(line);
            state.registry.destroy(weapon_idx);
            state.registry.get_mut(attacker).held = None;
        }
    }

    let mut damage = state.rng.rn2(max_damage.max(0) as u32) as i32;
    if state.registry.get(attacker).is_brave() {
        let second = state.rng.rn2(max_damage.max(0) as u32) as i32;
        damage = damage.max(second);
    }

    let attacker_ref = state.registry.get(attacker).reference.clone();
    let ranged = state
        .registry
        .get(attacker)
        .flags
        .contains(ObjectFlags::RANGED);
    let is_player = attacker == state.player_idx;

    let (defender_ref, def_x, def_y) = {
        let def = state.registry.get_mut(defender);
        def.health -= damage;
        (def.reference.clone(), def.x, def.y)
    };

    let def = state.registry.get(defender);
    if def.health <= 0 {
        if def.is_human() {
            state
                .flavor
                .push(format!("{attacker_ref} killed {defender_ref}."));
            make_corpse(state.registry.get_mut(defender));
        } else if def.is_monster() {
            state
                .flavor
                .push(format!("{attacker_ref} killed {defender_ref}."));
            let def = state.registry.get_mut(defender);
            make_corpse(def);
            // keep the slot scheduled so the loss check still runs
            def.health = 0;
            def.behavior = Some(Behavior::MonsterMeta);
        } else {
            state
                .flavor
                .push(format!("{attacker_ref} destroyed {defender_ref}."));
            state.registry.destroy(defender);
        }
    } else if damage > 0 {
        let verb = match (is_player, ranged) {
            (true, true) => "shoot",
            (false, true) => "shoots",
            (true, false) => "hit",
            (false, false) => "hits",
        };
        state.flavor.push(format!(
            "{attacker_ref} {verb} {defender_ref} for {damage} damage."
        ));
    } else {
        let verb = if is_player { "miss" } else { "misses" };
        state
            .flavor
            .push(format!("{attacker_ref} {verb} {defender_ref}."));
    }

    if horrifying {
        let radius = if weapon_broke {
            if multiplier <= 1 {
                MELEE_BREAK_BURST_RADIUS
            } else {
                THROWN_BREAK_BURST_RADIUS
            }
        } else {
            HIT_BURST_RADIUS
        };
        horrify_burst(state, def_x, def_y, radius);
    }
}

/// Shove an object one tile, pushing whatever stands in the way ahead
/// of it first.
///
/// The chain resolves recursively in the shove direction; the target
/// moves only if the chain succeeded or the tile was free. Recursion
/// is bounded by the grid edge. A shoved human always ends up prone,
/// moved or not.
pub fn shove(state: &mut GameState, shoved: usize, dx: i32, dy: i32) -> bool {
    if !state
        .registry
        .get(shoved)
        .flags
        .contains(ObjectFlags::SHOVABLE)
    {
        return false;
    }

    let (tx, ty) = {
        let obj = state.registry.get(shoved);
        (obj.x + dx, obj.y + dy)
    };

    let success = match state.registry.blockage_at(&state.level, tx, ty, false) {
        Blockage::Free => {
            state.registry.try_move(&state.level, shoved, dx, dy, false);
            true
        }
        Blockage::Terrain => false,
        Blockage::Object(next) => {
            let chain = shove(state, next, dx, dy);
            if chain {
                state.registry.try_move(&state.level, shoved, dx, dy, false);
            }
            chain
        }
    };

    let obj = state.registry.get_mut(shoved);
    let line = if obj.is_human() {
        obj.status |= StatusFlags::PRONE;
        obj.turns_prone = 0;
        if success {
            format!("{} is shoved back and to the floor.", obj.reference)
        } else {
            format!("{} is shoved to the floor.", obj.reference)
        }
    } else if success {
        format!("{} is shoved back.", obj.reference)
    } else {
        format!("{} doesn't budge.", obj.reference)
    };
    state.flavor.push(line);

    success
}

/// Pick up a weapon-capable object; it leaves the grid and rides along
/// with the grabber.
pub fn grab(state: &mut GameState, grabber: usize, grabbed: usize) {
    if !state
        .registry
        .get(grabbed)
        .flags
        .contains(ObjectFlags::WEAPON)
    {
        return;
    }

    let verb = if grabber == state.player_idx {
        "grab"
    } else {
        "grabs"
    };
    let line = format!(
        "{} {verb} {}.",
        state.registry.get(grabber).reference,
        state.registry.get(grabbed).reference
    );
    state.flavor.push(line);

    let grabbed_obj = state.registry.get_mut(grabbed);
    grabbed_obj.x = -1;
    grabbed_obj.y = -1;
    state.registry.get_mut(grabber).held = Some(grabbed);
}

/// Devour the held object, if edible: restores its health value to the
/// eater (clamped), destroys it, and horrifies everyone nearby.
pub fn eat_held(state: &mut GameState, eater: usize) {
    let Some(held_idx) = state.registry.get(eater).held else {
        state.flavor.push("Not holding anything to eat.");
        return;
    };

    let held = state.registry.get(held_idx);
    let reference = held.reference.clone();
    if !held.flags.contains(ObjectFlags::EDIBLE) {
        state.flavor.push(format!("You can't eat {reference}."));
        return;
    }

    let restore = held.health;
    let (ex, ey) = {
        let obj = state.registry.get_mut(eater);
        obj.health = (obj.health + restore).min(obj.max_health);
        (obj.x, obj.y)
    };
    state
        .flavor
        .push(format!("You quickly devour {reference}. Yum!"));
    horrify_burst(state, ex, ey, EAT_BURST_RADIUS);

    state.registry.destroy(held_idx);
    state.registry.get_mut(eater).held = None;
}

/// Hurl the held object at a tile.
///
/// An occupied tile resolves as a doubled attack (preferring a human
/// target); an empty one shatters the projectile on the floor, with a
/// horrify burst if it was something horrifying. Either way the held
/// link ends up cleared — the occupied path breaks the weapon inside
/// the attack, the empty path destroys it here.
pub fn throw_held(state: &mut GameState, thrower: usize, x: i32, y: i32) {
    let target = state
        .registry
        .object_at(x, y, ObjectFlags::HUMAN)
        .or_else(|| state.registry.object_at(x, y, ObjectFlags::empty()));

    if let Some(target) = target {
        attack(state, thrower, target, 2);
        return;
    }

    let Some(held_idx) = state.registry.get(thrower).held else {
        return;
    };
    let held = state.registry.get(held_idx);
    let reference = held.reference.clone();
    if held.flags.contains(ObjectFlags::HORRIFYING) {
        horrify_burst(state, x, y, SHATTER_BURST_RADIUS);
        state
            .flavor
            .push(format!("{reference} bursts open on hitting the floor."));
    } else {
        state
            .flavor
            .push(format!("{reference} shatters on hitting the floor."));
    }

    state.registry.destroy(held_idx);
    state.registry.get_mut(thrower).held = None;
}
