//! Global tuning constants

/// Level grid width in tiles
pub const LEVEL_WIDTH: i32 = 32;
/// Level grid height in tiles
pub const LEVEL_HEIGHT: i32 = 32;
/// Total tile count
pub const LEVEL_SIZE: usize = (LEVEL_WIDTH * LEVEL_HEIGHT) as usize;

/// Fixed capacity of the physical-object registry
pub const MAX_OBJECTS: usize = 128;

/// Lines kept in the flavor-text ring
pub const FLAVOR_CAPACITY: usize = 32;

/// Tile edge length in render units
pub const TILE_PIXELS: f32 = 32.0;

/// Delay between AI turns, in seconds
pub const AI_TURN_DELAY: f32 = 0.0;

/// Turns a shoved or collapsed human spends prone before standing
pub const PRONE_RECOVERY_TURNS: i32 = 2;
/// Turns the skald's blessing lasts
pub const BRAVE_DURATION_TURNS: i32 = 3;

/// Distance archers try to keep from the monster
pub const RANGED_PREFERRED_RANGE: i32 = 4;
/// Maximum Manhattan distance the throw reticle may travel
pub const THROW_RANGE: i32 = 10;

/// Horrify radius when the monster eats something
pub const EAT_BURST_RADIUS: i32 = 6;
/// Horrify radius when a thrown object shatters on the floor
pub const SHATTER_BURST_RADIUS: i32 = 8;
/// Horrify radius when a horrifying weapon breaks on a thrown hit
pub const THROWN_BREAK_BURST_RADIUS: i32 = 5;
/// Horrify radius when a horrifying weapon breaks mid-melee; large
/// enough to reach every tile in the hall
pub const MELEE_BREAK_BURST_RADIUS: i32 = 1000;
/// Horrify radius on an ordinary hit with a horrifying weapon
pub const HIT_BURST_RADIUS: i32 = 3;

/// Starting difficulty budget for enemy spawning
pub const DEFAULT_DIFFICULTY: i32 = 50;
/// Starting per-spawn threat-score cap
pub const DEFAULT_MAX_ENEMY_SCORE: i32 = 15;
/// Spawning stops once the remaining budget falls to this or below;
/// matches the cheapest entry in the spawn table
pub const MIN_THREAT_SCORE: i32 = 10;
