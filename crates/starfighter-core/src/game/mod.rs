//! Shared game state
//!
//! [`GameState`] is the one aggregate every task touches. It lives behind a
//! single [`SharedGame`] lock; each task takes the lock for exactly one pass
//! and never holds it across an await.

pub mod entities;
pub mod pool;
mod update;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use log::info;

use crate::config::{
    GameConfig, MAX_BULLETS, MAX_ENEMIES, MAX_ENEMY_BULLETS, MAX_POWERUPS,
};
use crate::feedback::{FeedbackTimers, Track};
use crate::input::InputSnapshot;
use crate::rng::Rng;

pub use entities::{
    DamageOutcome, Enemy, EnemyKind, Player, PowerUp, PowerUpKind, Projectile, Vec2,
};
pub use pool::Pool;

/// The game state behind its single lock.
pub type SharedGame = Mutex<CriticalSectionRawMutex, GameState>;

const DEFAULT_SEED: u32 = 0x5EED_F00D;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Menu,
    Playing,
    /// Reserved; no transition leads here.
    Paused,
    GameOver,
}

/// Frame-based visual effects, decremented by update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    pub shake_frames: u8,
    pub flash_frames: u8,
    pub laser_frames: u8,
}

/// Active power-up buffs, in frames remaining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buffs {
    pub double_shot: u32,
    pub turbo: u32,
}

impl Buffs {
    pub const fn has_double_shot(&self) -> bool {
        self.double_shot > 0
    }

    pub const fn has_turbo(&self) -> bool {
        self.turbo > 0
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: Phase,
    pub config: GameConfig,
    pub player: Player,
    pub bullets: Pool<Projectile, MAX_BULLETS>,
    pub enemy_bullets: Pool<Projectile, MAX_ENEMY_BULLETS>,
    pub enemies: Pool<Enemy, MAX_ENEMIES>,
    pub powerups: Pool<PowerUp, MAX_POWERUPS>,
    pub input: InputSnapshot,
    pub feedback: FeedbackTimers,
    pub effects: Effects,
    pub buffs: Buffs,

    /// Update frames since power-on or the last reset.
    pub frame: u32,
    pub intro_frame: u32,
    /// Day palette (inverted display) is showing.
    pub is_day: bool,
    pub last_cycle_frame: u32,
    pub boss_active: bool,
    /// `score / BOSS_SCORE_STEP` when the last boss appeared; each multiple
    /// brings at most one boss.
    pub boss_wave: u32,
    /// Raised by each boss kill; drives spawn rate and enemy stats.
    pub difficulty: u8,

    /// Button level as last seen by update, for edge detection.
    button_seen: bool,
    rng: Rng,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Power-on state: empty pools, intro showing, intro jingle queued.
    pub fn new() -> Self {
        Self::with_config(GameConfig::DEFAULT)
    }

    pub fn with_config(config: GameConfig) -> Self {
        let mut feedback = FeedbackTimers::new();
        feedback.melody.play(Track::Intro);

        Self {
            phase: Phase::Intro,
            config,
            player: Player::new(),
            bullets: Pool::new(),
            enemy_bullets: Pool::new(),
            enemies: Pool::new(),
            powerups: Pool::new(),
            input: InputSnapshot::new(),
            feedback,
            effects: Effects::default(),
            buffs: Buffs::default(),
            frame: 0,
            intro_frame: 0,
            is_day: false,
            last_cycle_frame: 0,
            boss_active: false,
            boss_wave: 0,
            difficulty: 1,
            button_seen: false,
            rng: Rng::new(DEFAULT_SEED),
        }
    }

    /// Reseed the spawn generator.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = Rng::new(seed);
        self
    }

    /// Start a fresh run: player restored, pools cleared in place, pending
    /// requests dropped.
    pub fn reset(&mut self) {
        self.player = Player::new();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.enemies.clear();
        self.powerups.clear();
        self.input.clear_requests();
        self.effects = Effects::default();
        self.buffs = Buffs::default();
        self.frame = 0;
        self.is_day = false;
        self.last_cycle_frame = 0;
        self.boss_active = false;
        self.boss_wave = 0;
        self.difficulty = 1;
    }

    pub(crate) fn enter(&mut self, phase: Phase) {
        if self.phase != phase {
            info!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Rising edge of the button since update last looked.
    pub(crate) fn button_pressed_edge(&mut self) -> bool {
        let pressed = self.input.button;
        let edge = pressed && !self.button_seen;
        self.button_seen = pressed;
        edge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PLAYER_MAX_LIVES, PLAYER_MAX_SHIELD};

    #[test]
    fn new_state_is_intro_with_empty_pools() {
        let state = GameState::new();
        assert_eq!(state.phase, Phase::Intro);
        assert!(state.bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert_eq!(state.feedback.melody.track(), Some(Track::Intro));
    }

    #[test]
    fn reset_restores_player_and_clears_pools() {
        let mut state = GameState::new();
        state.player.score = 4200;
        state.player.apply_damage(120);
        state
            .bullets
            .spawn(Projectile::new(Vec2::new(1.0, 2.0), Vec2::ZERO));
        state.enemies.spawn(Enemy {
            pos: Vec2::new(100.0, 30.0),
            vel: Vec2::ZERO,
            kind: EnemyKind::Boss,
            health: 3,
        });
        state.boss_active = true;
        state.boss_wave = 3;
        state.input.laser_trigger.raise();

        state.reset();

        assert_eq!(state.player.pos, Vec2::new(10.0, 32.0));
        assert_eq!(state.player.shield, PLAYER_MAX_SHIELD);
        assert_eq!(state.player.lives, PLAYER_MAX_LIVES);
        assert_eq!(state.player.score, 0);
        assert!(state.bullets.is_empty());
        assert!(state.enemies.is_empty());
        assert!(!state.boss_active);
        assert_eq!(state.boss_wave, 0);
        assert!(!state.input.laser_trigger.is_raised());
    }

    #[test]
    fn rising_edge_is_reported_once() {
        let mut state = GameState::new();
        state.input.button = true;
        assert!(state.button_pressed_edge());
        assert!(!state.button_pressed_edge());
        state.input.button = false;
        assert!(!state.button_pressed_edge());
        state.input.button = true;
        assert!(state.button_pressed_edge());
    }
}
