//! Geometry, timing and gameplay tuning
//!
//! Compile-time constants describe the hardware (128×64 OLED with a 16 px
//! status strip on top) and the fixed task periods. Gameplay numbers that were
//! tuned by hand live in [`GameConfig`] so they can be swapped per build or per
//! test without touching the simulation code.

// ── Display geometry ────────────────────────────────────────────────────────
pub const SCREEN_WIDTH: i32 = 128;
pub const SCREEN_HEIGHT: i32 = 64;
/// Height of the HUD strip (yellow half of the two-tone panel).
pub const HUD_HEIGHT: i32 = 16;
pub const GAME_AREA_Y: i32 = HUD_HEIGHT;
pub const GAME_AREA_HEIGHT: i32 = SCREEN_HEIGHT - HUD_HEIGHT;

// ── Task periods ────────────────────────────────────────────────────────────
pub const TARGET_FPS: u64 = 30;
pub const FRAME_TIME_MS: u64 = 1000 / TARGET_FPS;
pub const INPUT_PERIOD_MS: u64 = 10;
pub const FEEDBACK_PERIOD_MS: u64 = 30;

// ── Pool capacities ─────────────────────────────────────────────────────────
pub const MAX_BULLETS: usize = 10;
pub const MAX_ENEMY_BULLETS: usize = 20;
pub const MAX_ENEMIES: usize = 8;
pub const MAX_POWERUPS: usize = 3;

// ── Player ──────────────────────────────────────────────────────────────────
pub const PLAYER_WIDTH: i32 = 16;
pub const PLAYER_HEIGHT: i32 = 12;
pub const PLAYER_START_X: f32 = 10.0;
pub const PLAYER_START_Y: f32 = 32.0;
pub const PLAYER_SPEED: f32 = 2.5;
pub const PLAYER_MAX_LIVES: u8 = 3;
pub const PLAYER_MAX_SHIELD: u8 = 100;

// ── Projectiles & enemies ───────────────────────────────────────────────────
pub const BULLET_SPEED: f32 = 4.0;
pub const BULLET_WIDTH: i32 = 4;
pub const BULLET_HEIGHT: i32 = 2;
pub const ENEMY_BULLET_SIZE: i32 = 3;
pub const ENEMY_SIZE: i32 = 8;
pub const BOSS_SIZE: i32 = 32;
pub const POWERUP_SIZE: i32 = 8;

// ── Accelerometer mapping ───────────────────────────────────────────────────
pub const ACCEL_DEADZONE: i16 = 2000;
pub const ACCEL_SENSITIVITY: f32 = 8000.0;

// ── Input classifier ────────────────────────────────────────────────────────
pub const HOLD_TRIGGER_MS: u32 = 1000;
pub const CHARGE_VISIBLE_MS: u32 = 200;

// ── World ───────────────────────────────────────────────────────────────────
pub const INTRO_FRAMES: u32 = 150;
pub const DAY_NIGHT_FRAMES: u32 = 900;
pub const BOSS_SCORE_STEP: u32 = 5000;
/// Score window above each boss multiple in which the boss may appear.
pub const BOSS_SCORE_WINDOW: u32 = 500;
pub const BOSS_ENTRY_X: f32 = 90.0;
pub const BOSS_ENTRY_Y: f32 = 16.0;
pub const BOSS_HEALTH: i16 = 100;
pub const BOSS_ATTACK_FRAMES: u32 = 60;

/// Hand-tuned gameplay numbers.
///
/// The defaults reproduce the shipped firmware. Durations are in update
/// frames unless the field name says otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Chance (0..=100) that a destroyed grunt drops a power-up.
    pub powerup_drop_percent: u32,
    pub double_shot_frames: u32,
    pub turbo_frames: u32,
    /// Movement multiplier while the turbo buff is active.
    pub turbo_speed_factor: f32,
    pub shield_pickup: u8,
    pub enemy_bullet_damage: u8,
    pub kamikaze_damage: u8,
    /// Half-height of the laser band around the player's y coordinate.
    pub laser_band: f32,
    pub laser_frames: u8,
    pub grunt_score: u32,
    pub boss_score: u32,
    pub laser_score: u32,
    pub base_spawn_interval: u32,
    pub min_spawn_interval: u32,
    pub spawn_interval_step: u32,
}

impl GameConfig {
    pub const DEFAULT: Self = Self {
        powerup_drop_percent: 10,
        double_shot_frames: 300,
        turbo_frames: 240,
        turbo_speed_factor: 1.5,
        shield_pickup: 50,
        enemy_bullet_damage: 25,
        kamikaze_damage: 30,
        laser_band: 20.0,
        laser_frames: 10,
        grunt_score: 100,
        boss_score: 2000,
        laser_score: 50,
        base_spawn_interval: 60,
        min_spawn_interval: 20,
        spawn_interval_step: 5,
    };

    /// Frames between regular enemy spawns at the given difficulty.
    pub fn spawn_interval(&self, difficulty: u8) -> u32 {
        self.base_spawn_interval
            .saturating_sub(difficulty as u32 * self.spawn_interval_step)
            .max(self.min_spawn_interval)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
