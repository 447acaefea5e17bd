//! Turn behaviors
//!
//! Each scheduled object runs exactly one behavior per turn. Humans
//! share a standard pre-action (bravery countdown, getting up, panic)
//! and then act per role; the fire pit and the player's meta slot are
//! scheduled the same way.

use serde::{Deserialize, Serialize};

use crate::combat;
use crate::consts::{BRAVE_DURATION_TURNS, PRONE_RECOVERY_TURNS, RANGED_PREFERRED_RANGE};
use crate::gameloop::{GameState, InputState};
use crate::object::{Behavior, ObjectFlags, StatusFlags};

/// A cardinal step, as fed in by the embedding UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Player intents, decoupled from key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Attack,
    Grab,
    Shove,
    Throw,
    Look,
    Eat,
    Confirm,
    Cancel,
    SkipTurn,
}

/// Run one turn for the object at `idx`. Slots without a behavior are
/// inert scenery and never reach this point.
pub fn run_behavior(state: &mut GameState, idx: usize) {
    let Some(behavior) = state.registry.get(idx).behavior else {
        return;
    };
    match behavior {
        Behavior::Melee => melee_action(state, idx),
        Behavior::Ranged => ranged_action(state, idx),
        Behavior::Skald => skald_action(state, idx),
        Behavior::DoubleMelee => {
            melee_action(state, idx);
            melee_action(state, idx);
        }
        Behavior::Fire => fire_action(state, idx),
        Behavior::MonsterMeta => monster_meta_action(state),
    }
}

/// Shared human pre-action. Returns true when the turn was consumed
/// by recovering or panicking.
fn standard_human_action(state: &mut GameState, idx: usize) -> bool {
    {
        let obj = state.registry.get_mut(idx);
        if obj.is_brave() {
            obj.turns_brave += 1;
            if obj.turns_brave >= BRAVE_DURATION_TURNS {
                obj.status.remove(StatusFlags::BRAVE);
            }
        }
    }

    if state.registry.get(idx).is_prone() {
        let obj = state.registry.get_mut(idx);
        obj.turns_prone += 1;
        let line = if obj.turns_prone >= PRONE_RECOVERY_TURNS {
            obj.status.remove(StatusFlags::PRONE);
            format!("{} stands up.", obj.reference)
        } else {
            format!("{} is pulling themself up.", obj.reference)
        };
        state.flavor.push(line);
        return true;
    }

    if state.registry.get(idx).is_horrified() {
        if combat::will_test(state.registry.get(idx), &mut state.rng) {
            let obj = state.registry.get_mut(idx);
            obj.status.remove(StatusFlags::HORRIFIED);
            state.flavor.push(format!(
                "{} steels their will and looks your way.",
                state.registry.get(idx).reference
            ));
        } else {
            let reference = state.registry.get(idx).reference.clone();
            match state.rng.rn2(4) {
                0 => state.flavor.push(format!("{reference} vomits in terror.")),
                1 => {
                    state.flavor.push(format!("{reference} runs away."));
                    let player = state.player_idx;
                    move_away(state, idx, player);
                }
                2 => state.flavor.push(format!("{reference} soils themself.")),
                _ => {
                    state
                        .flavor
                        .push(format!("{reference} collapses into a trembling heap."));
                    let obj = state.registry.get_mut(idx);
                    obj.status |= StatusFlags::PRONE;
                    obj.turns_prone = 0;
                }
            }
        }
        return true;
    }

    false
}

/// Step one tile toward another object, trying each axis in random
/// order. When both direct axes are blocked, retry with a random
/// perpendicular nudge so walkers slide around obstacles.
pub(crate) fn move_towards(state: &mut GameState, our: usize, their: usize) -> bool {
    let (dx, dy) = {
        let us = state.registry.get(our);
        let them = state.registry.get(their);
        ((them.x - us.x).signum(), (them.y - us.y).signum())
    };
    if try_axes(state, our, dx, dy) {
        return true;
    }
    let nudge_x = if dx == 0 { state.rng.sign() } else { dx };
    let nudge_y = if dy == 0 { state.rng.sign() } else { dy };
    try_axes(state, our, nudge_x, nudge_y)
}

/// Step one tile away from another object. No nudge fallback; a
/// cornered object stays put.
pub(crate) fn move_away(state: &mut GameState, our: usize, their: usize) -> bool {
    let (dx, dy) = {
        let us = state.registry.get(our);
        let them = state.registry.get(their);
        ((us.x - them.x).signum(), (us.y - them.y).signum())
    };
    try_axes(state, our, dx, dy)
}

fn try_axes(state: &mut GameState, idx: usize, dx: i32, dy: i32) -> bool {
    if state.rng.coin() {
        state.registry.try_move(&state.level, idx, dx, 0, true)
            || state.registry.try_move(&state.level, idx, 0, dy, true)
    } else {
        state.registry.try_move(&state.level, idx, 0, dy, true)
            || state.registry.try_move(&state.level, idx, dx, 0, true)
    }
}

/// Close to arm's reach and swing.
fn melee_action(state: &mut GameState, idx: usize) {
    if standard_human_action(state, idx) {
        return;
    }
    let player = state.player_idx;
    if state.registry.distance(idx, player) == 1 {
        if state.registry.get(player).health > 0 {
            combat::attack(state, idx, player, 1);
        }
    } else {
        move_towards(state, idx, player);
    }
}

/// Hold a preferred range and loose arrows when standing still.
fn ranged_action(state: &mut GameState, idx: usize) {
    if standard_human_action(state, idx) {
        return;
    }
    let player = state.player_idx;
    let dist = state.registry.distance(idx, player);
    let mut moved = false;
    if dist < RANGED_PREFERRED_RANGE {
        moved = move_away(state, idx, player);
    } else if dist > RANGED_PREFERRED_RANGE {
        moved = move_towards(state, idx, player);
    }
    if !moved && dist <= RANGED_PREFERRED_RANGE && state.registry.get(player).health > 0 {
        combat::attack(state, idx, player, 1);
    }
}

const RECITATIONS: [&str; 4] = [
    "the skald sings of the glorious dead.",
    "the skald recites the deeds of your victims' ancestors.",
    "the skald bellows a saga of monster-slaying.",
    "the skald calls every soul in the hall to courage.",
];

/// Half the time, embolden every human in the hall, then keep an
/// awkward middle distance from the monster.
fn skald_action(state: &mut GameState, idx: usize) {
    if standard_human_action(state, idx) {
        return;
    }

    if state.rng.coin() {
        let humans: Vec<usize> = state
            .registry
            .iter_in_use()
            .filter(|(_, obj)| obj.is_human())
            .map(|(i, _)| i)
            .collect();
        for human in humans {
            let obj = state.registry.get_mut(human);
            obj.status |= StatusFlags::BRAVE;
            obj.turns_brave = 0;
        }
        let line = RECITATIONS[state.rng.rn2(4) as usize];
        state.flavor.push(line);
    }

    let player = state.player_idx;
    let dist = state.registry.distance(idx, player);
    if dist < 4 {
        melee_action(state, idx);
    } else if dist > 8 {
        move_towards(state, idx, player);
    } else {
        move_away(state, idx, player);
    }
}

/// Burn whatever stands in the pit. Fires act instantly so they never
/// slow the turn cycle down.
fn fire_action(state: &mut GameState, idx: usize) {
    let (x, y) = {
        let obj = state.registry.get(idx);
        (obj.x, obj.y)
    };
    if let Some(occupant) = state.registry.object_at(x, y, ObjectFlags::empty()) {
        if state.registry.get(occupant).health > 0 {
            combat::attack(state, idx, occupant, 1);
        }
    }
    state.turn_delay = 0.0;
}

/// The player's scheduled slot: checks win and loss, then opens the
/// command window.
fn monster_meta_action(state: &mut GameState) {
    if state.input_state != InputState::Ignore {
        return;
    }
    state.input_state = if state.registry.humans_alive() == 0 {
        state.flavor.push("The hall falls silent. You have won.");
        InputState::Won
    } else if state.registry.get(state.player_idx).health <= 0 {
        state.flavor.push("You collapse. The hall has bested you.");
        InputState::Lost
    } else {
        InputState::Waiting
    };
}
