//! Game state and turn loop
//!
//! [`GameState`] owns the level, the object registry, the RNG, and
//! the flavor log. The embedding screen drives it with two calls:
//! [`GameState::advance`] with the frame delta, and
//! [`GameState::handle_command`] with player intents. Everything else
//! is read access for rendering.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use crate::action::{self, Command, Direction};
use crate::combat;
use crate::consts::{
    AI_TURN_DELAY, DEFAULT_DIFFICULTY, DEFAULT_MAX_ENEMY_SCORE, MAX_OBJECTS, THROW_RANGE,
};
use crate::flavor::FlavorLog;
use crate::hall::{generation, Level};
use crate::object::{ObjectFlags, PhysicalObject, Registry};
use crate::rng::GameRng;

/// Where player input currently goes.
///
/// `Ignore` means the AI is taking turns; `Waiting` is the open
/// command window; the aiming states wait for a direction or a
/// reticle confirm; `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum InputState {
    Ignore,
    Waiting,
    Attacking,
    Grabbing,
    Shoving,
    Throwing,
    Looking,
    Won,
    Lost,
}

/// The whole simulation. Fields are public; collaborating modules and
/// the embedding screen read and write them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub level: Level,
    pub registry: Registry,
    pub rng: GameRng,
    pub flavor: FlavorLog,
    pub input_state: InputState,
    /// Slot index whose turn the scheduler cursor is on
    pub turn_idx: usize,
    pub turn_delay: f32,
    pub player_idx: usize,
    /// Reticle position while throwing or looking
    pub highlight: Option<(i32, i32)>,
    pub difficulty: i32,
    pub max_enemy_score: i32,
}

impl GameState {
    pub fn new(rng: GameRng) -> Self {
        Self::with_settings(rng, DEFAULT_DIFFICULTY, DEFAULT_MAX_ENEMY_SCORE)
    }

    pub fn with_settings(rng: GameRng, difficulty: i32, max_enemy_score: i32) -> Self {
        let mut state = Self {
            level: Level::solid(),
            registry: Registry::new(),
            rng,
            flavor: FlavorLog::new(),
            input_state: InputState::Ignore,
            turn_idx: 0,
            turn_delay: 0.0,
            player_idx: 0,
            highlight: None,
            difficulty,
            max_enemy_score,
        };
        state.generate_level(difficulty, max_enemy_score);
        state
    }

    /// Rebuild the hall from scratch at the given difficulty. Returns
    /// the player's slot index.
    pub fn generate_level(&mut self, difficulty: i32, max_enemy_score: i32) -> usize {
        self.difficulty = difficulty;
        self.max_enemy_score = max_enemy_score;
        self.input_state = InputState::Ignore;
        self.highlight = None;
        self.turn_idx = 0;
        self.turn_delay = 0.0;
        self.flavor.clear();
        self.flavor
            .push("You have entered the great hall, slay them all!");
        self.player_idx = generation::generate(
            &mut self.level,
            &mut self.registry,
            &mut self.rng,
            difficulty,
            max_enemy_score,
        );
        debug!(
            player = self.player_idx,
            difficulty, max_enemy_score, "hall generated"
        );
        self.player_idx
    }

    /// Tick the scheduler by `dt` seconds and run at most one turn.
    ///
    /// The cursor parks on the player's slot until the command window
    /// closes again, then resumes circularly over scheduled slots.
    pub fn advance(&mut self, dt: f32) {
        self.turn_delay -= dt;
        if self.turn_delay > 0.0 {
            return;
        }
        if self.turn_idx == self.player_idx && self.input_state != InputState::Ignore {
            return;
        }

        let mut next = self.turn_idx;
        for _ in 0..MAX_OBJECTS {
            next = (next + 1) % MAX_OBJECTS;
            let obj = self.registry.get(next);
            if obj.in_use() && obj.behavior.is_some() {
                self.turn_idx = next;
                self.turn_delay = AI_TURN_DELAY;
                action::run_behavior(self, next);
                return;
            }
        }
    }

    /// Feed one player intent through the input state machine and
    /// report where input goes next.
    pub fn handle_command(&mut self, cmd: Command) -> InputState {
        match self.input_state {
            InputState::Ignore | InputState::Won | InputState::Lost => return self.input_state,
            _ => {}
        }

        match cmd {
            Command::Attack => {
                self.input_state = InputState::Attacking;
                self.flavor.push("Choose direction to attack.");
            }
            Command::Grab => {
                if self.registry.get(self.player_idx).held.is_none() {
                    self.input_state = InputState::Grabbing;
                    self.flavor.push("Choose direction to grab.");
                } else {
                    self.flavor
                        .push("Already holding onto something, get rid of it first.");
                }
            }
            Command::Shove => {
                self.input_state = InputState::Shoving;
                self.flavor.push("Choose direction to shove.");
            }
            Command::Throw => {
                if self.registry.get(self.player_idx).held.is_some() {
                    let player = self.registry.get(self.player_idx);
                    self.highlight = Some((player.x, player.y));
                    self.input_state = InputState::Throwing;
                    self.flavor.push("Use the arrow keys to move the reticle.");
                } else {
                    self.flavor.push("Not holding anything to throw.");
                }
            }
            Command::Look => {
                let player = self.registry.get(self.player_idx);
                self.highlight = Some((player.x, player.y));
                self.input_state = InputState::Looking;
                self.flavor.push("Use the arrow keys to move the reticle.");
            }
            // eating is a free action; input state stays put
            Command::Eat => {
                let player = self.player_idx;
                combat::eat_held(self, player);
            }
            Command::Cancel => {
                if self.input_state != InputState::Waiting {
                    self.highlight = None;
                    self.flavor.push("Action cancelled.");
                }
                self.input_state = InputState::Waiting;
            }
            Command::SkipTurn => {
                self.highlight = None;
                self.flavor.push("Skipping turn.");
                self.input_state = InputState::Ignore;
            }
            Command::Move(dir) => self.handle_direction(dir),
            Command::Confirm => self.handle_confirm(),
        }

        self.input_state
    }

    fn handle_direction(&mut self, dir: Direction) {
        let (dx, dy) = dir.delta();
        let player = self.player_idx;
        let (px, py) = {
            let obj = self.registry.get(player);
            (obj.x, obj.y)
        };

        match self.input_state {
            InputState::Waiting => {
                match self
                    .registry
                    .object_at(px + dx, py + dy, ObjectFlags::HUMAN)
                {
                    Some(target) => {
                        combat::attack(self, player, target, 1);
                        self.input_state = InputState::Ignore;
                    }
                    None => {
                        if self.registry.try_move(&self.level, player, dx, dy, false) {
                            self.input_state = InputState::Ignore;
                        }
                    }
                }
            }
            InputState::Attacking => {
                let target = self
                    .registry
                    .object_at(px + dx, py + dy, ObjectFlags::HUMAN)
                    .or_else(|| self.registry.object_at(px + dx, py + dy, ObjectFlags::empty()));
                match target {
                    Some(target) => {
                        combat::attack(self, player, target, 1);
                        self.input_state = InputState::Ignore;
                    }
                    None => {
                        self.flavor.push("There is nothing there to attack.");
                        self.input_state = InputState::Waiting;
                    }
                }
            }
            InputState::Shoving => {
                let target = self
                    .registry
                    .object_at(px + dx, py + dy, ObjectFlags::HUMAN | ObjectFlags::SHOVABLE)
                    .or_else(|| {
                        self.registry
                            .object_at(px + dx, py + dy, ObjectFlags::SHOVABLE)
                    });
                match target {
                    Some(target) => {
                        combat::shove(self, target, dx, dy);
                        self.input_state = InputState::Ignore;
                    }
                    None => {
                        self.flavor.push("There is nothing there to shove.");
                        self.input_state = InputState::Waiting;
                    }
                }
            }
            InputState::Grabbing => {
                let target = self
                    .registry
                    .object_at(px + dx, py + dy, ObjectFlags::WEAPON | ObjectFlags::HORRIFYING)
                    .or_else(|| {
                        self.registry
                            .object_at(px + dx, py + dy, ObjectFlags::WEAPON)
                    });
                match target {
                    Some(target) => {
                        combat::grab(self, player, target);
                        self.input_state = InputState::Ignore;
                    }
                    None => {
                        self.flavor.push("There is nothing there to grab.");
                        self.input_state = InputState::Waiting;
                    }
                }
            }
            InputState::Throwing => {
                if let Some((hx, hy)) = self.highlight {
                    let (nx, ny) = (hx + dx, hy + dy);
                    if self.registry.distance_to_tile(player, nx, ny) >= THROW_RANGE {
                        self.flavor.push("Spot is too far away.");
                    } else if !self.level.is_blocked(nx, ny) {
                        self.highlight = Some((nx, ny));
                    }
                }
            }
            InputState::Looking => {
                if let Some((hx, hy)) = self.highlight {
                    let (nx, ny) = (hx + dx, hy + dy);
                    if !self.level.is_blocked(nx, ny) {
                        self.highlight = Some((nx, ny));
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_confirm(&mut self) {
        if self.input_state != InputState::Throwing {
            return;
        }
        if let Some((hx, hy)) = self.highlight {
            let player = self.player_idx;
            combat::throw_held(self, player, hx, hy);
        }
        self.highlight = None;
        self.input_state = InputState::Ignore;
    }

    /// The object under the reticle, preferring humans, for the
    /// examine panel.
    pub fn examined_object(&self) -> Option<&PhysicalObject> {
        let (hx, hy) = self.highlight?;
        self.registry
            .object_at(hx, hy, ObjectFlags::HUMAN)
            .or_else(|| self.registry.object_at(hx, hy, ObjectFlags::empty()))
            .map(|idx| self.registry.get(idx))
    }

    /// Up to `n` living humans nearest the player, for the sidebar.
    pub fn closest_humans(&self, n: usize) -> Vec<usize> {
        let mut humans: Vec<usize> = self
            .registry
            .iter_in_use()
            .filter(|(_, obj)| obj.is_human())
            .map(|(idx, _)| idx)
            .collect();
        humans.sort_by_key(|&idx| self.registry.distance(idx, self.player_idx));
        humans.truncate(n);
        humans
    }

    pub fn player(&self) -> &PhysicalObject {
        self.registry.get(self.player_idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Archetype;

    fn bare_state() -> GameState {
        let mut state = GameState::with_settings(GameRng::new(3), 0, 0);
        state.level = Level::solid();
        state.level.carve_rect(0, 20, 0, 20);
        state.registry.clear();
        let mut monster = Archetype::Monster.template();
        monster.x = 5;
        monster.y = 5;
        state.player_idx = state.registry.create(monster).unwrap();
        state.input_state = InputState::Waiting;
        state
    }

    fn put(state: &mut GameState, kind: Archetype, x: i32, y: i32) -> usize {
        let mut obj = kind.template();
        obj.x = x;
        obj.y = y;
        state.registry.create(obj).unwrap()
    }

    #[test]
    fn test_move_into_open_tile_ends_turn() {
        let mut state = bare_state();
        let next = state.handle_command(Command::Move(Direction::Right));
        assert_eq!(next, InputState::Ignore);
        assert_eq!((state.player().x, state.player().y), (6, 5));
    }

    #[test]
    fn test_move_into_wall_keeps_turn() {
        let mut state = bare_state();
        state.registry.get_mut(state.player_idx).x = 0;
        let next = state.handle_command(Command::Move(Direction::Left));
        assert_eq!(next, InputState::Waiting);
        assert_eq!(state.player().x, 0);
    }

    #[test]
    fn test_move_into_human_attacks() {
        let mut state = bare_state();
        let warrior = put(&mut state, Archetype::Warrior, 6, 5);
        let next = state.handle_command(Command::Move(Direction::Right));
        assert_eq!(next, InputState::Ignore);
        assert_eq!((state.player().x, state.player().y), (5, 5));
        assert!(state.registry.get(warrior).health <= 5);
        assert!(!state.flavor.is_empty());
    }

    #[test]
    fn test_attack_empty_tile_returns_to_waiting() {
        let mut state = bare_state();
        assert_eq!(state.handle_command(Command::Attack), InputState::Attacking);
        let next = state.handle_command(Command::Move(Direction::Up));
        assert_eq!(next, InputState::Waiting);
        assert_eq!(
            state.flavor.latest(),
            Some("There is nothing there to attack.")
        );
    }

    #[test]
    fn test_attack_prefers_human_over_furniture() {
        let mut state = bare_state();
        // table and warrior can't share a tile, so seed only a table
        // and confirm non-humans are still attackable
        let table = put(&mut state, Archetype::Table, 6, 5);
        state.handle_command(Command::Attack);
        let next = state.handle_command(Command::Move(Direction::Right));
        assert_eq!(next, InputState::Ignore);
        assert!(state.registry.get(table).health <= 10);
    }

    #[test]
    fn test_grab_requires_empty_hands() {
        let mut state = bare_state();
        let chair = put(&mut state, Archetype::Chair, 6, 5);
        state.handle_command(Command::Grab);
        state.handle_command(Command::Move(Direction::Right));
        assert_eq!(state.player().held, Some(chair));

        state.input_state = InputState::Waiting;
        let next = state.handle_command(Command::Grab);
        assert_eq!(next, InputState::Waiting);
        assert_eq!(
            state.flavor.latest(),
            Some("Already holding onto something, get rid of it first.")
        );
    }

    #[test]
    fn test_shove_empty_tile_returns_to_waiting() {
        let mut state = bare_state();
        state.handle_command(Command::Shove);
        let next = state.handle_command(Command::Move(Direction::Down));
        assert_eq!(next, InputState::Waiting);
        assert_eq!(
            state.flavor.latest(),
            Some("There is nothing there to shove.")
        );
    }

    #[test]
    fn test_throw_needs_something_held() {
        let mut state = bare_state();
        let next = state.handle_command(Command::Throw);
        assert_eq!(next, InputState::Waiting);
        assert_eq!(
            state.flavor.latest(),
            Some("Not holding anything to throw.")
        );
    }

    #[test]
    fn test_throw_reticle_range_limit() {
        let mut state = bare_state();
        let chair = put(&mut state, Archetype::Chair, 6, 5);
        state.handle_command(Command::Grab);
        state.handle_command(Command::Move(Direction::Right));
        state.input_state = InputState::Waiting;
        state.handle_command(Command::Throw);
        assert_eq!(state.highlight, Some((5, 5)));

        for _ in 0..9 {
            state.handle_command(Command::Move(Direction::Right));
        }
        assert_eq!(state.highlight, Some((14, 5)));
        state.handle_command(Command::Move(Direction::Right));
        // tenth step refused
        assert_eq!(state.highlight, Some((14, 5)));
        assert_eq!(state.flavor.latest(), Some("Spot is too far away."));

        state.handle_command(Command::Confirm);
        assert_eq!(state.input_state, InputState::Ignore);
        assert_eq!(state.highlight, None);
        assert!(!state.registry.is_in_use(chair));
    }

    #[test]
    fn test_look_reticle_stops_at_walls() {
        let mut state = bare_state();
        state.registry.get_mut(state.player_idx).x = 19;
        state.handle_command(Command::Look);
        state.handle_command(Command::Move(Direction::Right));
        assert_eq!(state.highlight, Some((20, 5)));
        state.handle_command(Command::Move(Direction::Right));
        // wall at x=21
        assert_eq!(state.highlight, Some((20, 5)));
    }

    #[test]
    fn test_cancel_restores_waiting() {
        let mut state = bare_state();
        state.handle_command(Command::Look);
        assert_eq!(state.input_state, InputState::Looking);
        let next = state.handle_command(Command::Cancel);
        assert_eq!(next, InputState::Waiting);
        assert_eq!(state.highlight, None);
        assert_eq!(state.flavor.latest(), Some("Action cancelled."));
    }

    #[test]
    fn test_eat_is_a_free_action() {
        let mut state = bare_state();
        let corpse = put(&mut state, Archetype::Corpse, 6, 5);
        state.handle_command(Command::Grab);
        state.handle_command(Command::Move(Direction::Right));
        state.input_state = InputState::Waiting;
        state.registry.get_mut(state.player_idx).health = 10;

        let next = state.handle_command(Command::Eat);
        assert_eq!(next, InputState::Waiting);
        assert_eq!(state.player().health, 15);
        assert!(!state.registry.is_in_use(corpse));
    }

    #[test]
    fn test_skip_turn_hands_over() {
        let mut state = bare_state();
        assert_eq!(state.handle_command(Command::SkipTurn), InputState::Ignore);
        assert_eq!(state.flavor.latest(), Some("Skipping turn."));
    }

    #[test]
    fn test_terminal_states_ignore_commands() {
        let mut state = bare_state();
        state.input_state = InputState::Won;
        assert_eq!(
            state.handle_command(Command::Move(Direction::Up)),
            InputState::Won
        );
        state.input_state = InputState::Lost;
        assert_eq!(state.handle_command(Command::Attack), InputState::Lost);
    }

    #[test]
    fn test_advance_waits_on_player_window() {
        let mut state = bare_state();
        put(&mut state, Archetype::Warrior, 15, 15);
        state.turn_idx = state.player_idx;
        state.input_state = InputState::Waiting;
        let log = state.flavor.len();
        state.advance(1.0);
        // parked on the player; nothing ran
        assert_eq!(state.turn_idx, state.player_idx);
        assert_eq!(state.flavor.len(), log);
    }

    #[test]
    fn test_advance_runs_ai_after_player_moves() {
        let mut state = bare_state();
        let warrior = put(&mut state, Archetype::Warrior, 15, 5);
        state.turn_idx = state.player_idx;
        state.handle_command(Command::Move(Direction::Left));
        assert_eq!(state.input_state, InputState::Ignore);

        // warrior's turn, then back around to the player's meta slot
        state.advance(1.0);
        assert_eq!(state.turn_idx, warrior);
        assert_eq!(state.registry.distance(warrior, state.player_idx), 10);
        state.advance(1.0);
        assert_eq!(state.turn_idx, state.player_idx);
        assert_eq!(state.input_state, InputState::Waiting);
    }

    #[test]
    fn test_generate_level_resets_everything() {
        let mut state = GameState::new(GameRng::new(11));
        state.flavor.push("stale line");
        state.input_state = InputState::Won;
        let player = state.generate_level(50, 15);
        assert_eq!(player, state.player_idx);
        assert_eq!(state.input_state, InputState::Ignore);
        assert!(state.registry.is_in_use(player));
        assert!(state.registry.get(player).is_monster());
        assert_eq!(
            state.flavor.latest(),
            Some("You have entered the great hall, slay them all!")
        );
    }

    #[test]
    fn test_closest_humans_sorted_by_distance() {
        let mut state = bare_state();
        let far = put(&mut state, Archetype::Warrior, 18, 18);
        let near = put(&mut state, Archetype::Warrior, 6, 6);
        let mid = put(&mut state, Archetype::Archer, 10, 10);
        assert_eq!(state.closest_humans(2), vec![near, mid]);
        assert_eq!(state.closest_humans(10), vec![near, mid, far]);
    }

    #[test]
    fn test_examined_object_prefers_humans() {
        let mut state = bare_state();
        let warrior = put(&mut state, Archetype::Warrior, 8, 8);
        state.highlight = Some((8, 8));
        let examined = state.examined_object().unwrap();
        assert_eq!(examined.name, state.registry.get(warrior).name);
        state.highlight = None;
        assert!(state.examined_object().is_none());
    }
}
