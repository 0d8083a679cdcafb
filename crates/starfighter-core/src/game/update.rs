//! Per-frame state machine and simulation.

use log::info;

use super::entities::{DamageOutcome, Enemy, EnemyKind, PowerUp, PowerUpKind, Projectile, Vec2, overlaps};
use super::{GameState, Phase};
use crate::config::{
    ACCEL_DEADZONE, ACCEL_SENSITIVITY, BOSS_ATTACK_FRAMES, BOSS_ENTRY_X, BOSS_ENTRY_Y,
    BOSS_HEALTH, BOSS_SCORE_STEP, BOSS_SCORE_WINDOW, BULLET_HEIGHT, BULLET_SPEED, BULLET_WIDTH,
    DAY_NIGHT_FRAMES, ENEMY_BULLET_SIZE, ENEMY_SIZE, GAME_AREA_Y, INTRO_FRAMES, MAX_BULLETS,
    MAX_ENEMIES, MAX_ENEMY_BULLETS, MAX_POWERUPS, PLAYER_HEIGHT, PLAYER_SPEED, PLAYER_WIDTH,
    POWERUP_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use crate::feedback::{LedColor, Track};

const REGULAR_SPAWN_X: f32 = SCREEN_WIDTH as f32;
const BASE_ENEMY_SPEED: f32 = 1.5;
const ENEMY_SPEED_STEP: f32 = 0.2;
const ENEMY_DRIFT: f32 = 0.5;
const POWERUP_DRIFT: f32 = 0.5;
const BOSS_SWAY: f32 = 20.0;
const BOSS_SWAY_RATE: f32 = 0.05;
const BOSS_SPREAD: [Vec2; 3] = [Vec2::new(-2.5, 0.0), Vec2::new(-2.0, -1.0), Vec2::new(-2.0, 1.0)];
const LASER_FLASH_FRAMES: u8 = 2;
const LASER_SHAKE_FRAMES: u8 = 10;
const DAMAGE_SHAKE_FRAMES: u8 = 6;

impl GameState {
    /// Advance the game by one frame.
    pub fn step(&mut self) {
        let pressed = self.button_pressed_edge();

        match self.phase {
            Phase::Intro => {
                self.intro_frame += 1;
                if self.intro_frame > INTRO_FRAMES || self.input.button {
                    self.intro_frame = 0;
                    self.enter(Phase::Menu);
                    self.feedback.melody.play(Track::Menu);
                }
            }
            Phase::Menu => {
                if pressed {
                    self.reset();
                    self.feedback.melody.stop();
                    self.enter(Phase::Playing);
                }
            }
            Phase::Playing => self.simulate(),
            Phase::GameOver => {
                if pressed {
                    self.enter(Phase::Menu);
                    self.feedback.melody.play(Track::Menu);
                }
            }
            Phase::Paused => {}
        }

        self.frame = self.frame.wrapping_add(1);
    }

    fn simulate(&mut self) {
        self.move_player();
        if self.input.fire_request.take() {
            self.fire();
        }

        self.bullets.retain(|b| {
            b.advance();
            b.pos.x <= SCREEN_WIDTH as f32
        });
        self.enemy_bullets.retain(|b| {
            b.advance();
            b.pos.x >= 0.0 && b.pos.y >= 0.0 && b.pos.y <= SCREEN_HEIGHT as f32
        });
        self.enemies.retain(Enemy::advance);
        self.boss_attack();

        self.spawn_boss();
        self.spawn_enemy();

        self.effects.flash_frames = self.effects.flash_frames.saturating_sub(1);
        self.cycle_day_night();

        if self.input.laser_trigger.take() {
            self.fire_laser();
        }
        self.effects.laser_frames = self.effects.laser_frames.saturating_sub(1);

        self.resolve_bullet_hits();
        self.update_powerups();
        self.buffs.double_shot = self.buffs.double_shot.saturating_sub(1);
        self.buffs.turbo = self.buffs.turbo.saturating_sub(1);

        self.resolve_enemy_fire();
        self.resolve_rams();

        self.effects.shake_frames = self.effects.shake_frames.saturating_sub(1);
    }

    fn move_player(&mut self) {
        if !self.player.alive {
            return;
        }

        let mut speed = PLAYER_SPEED;
        if self.buffs.has_turbo() {
            speed *= self.config.turbo_speed_factor;
        }
        let axis = |raw: i16| {
            if (raw as i32).abs() > ACCEL_DEADZONE as i32 {
                raw as f32 / ACCEL_SENSITIVITY * speed
            } else {
                0.0
            }
        };

        let pos = &mut self.player.pos;
        pos.x = (pos.x + axis(self.input.accel.x)).clamp(0.0, (SCREEN_WIDTH / 2) as f32);
        pos.y = (pos.y + axis(self.input.accel.y))
            .clamp(GAME_AREA_Y as f32, (SCREEN_HEIGHT - PLAYER_HEIGHT) as f32);
    }

    fn fire(&mut self) {
        let origin = self.player.pos;
        let x = origin.x + PLAYER_WIDTH as f32;
        let velocity = Vec2::new(BULLET_SPEED, 0.0);

        self.bullets
            .spawn(Projectile::new(Vec2::new(x, origin.y + 5.0), velocity));
        if self.buffs.has_double_shot() {
            self.bullets
                .spawn(Projectile::new(Vec2::new(x, origin.y + 10.0), velocity));
        }

        self.feedback.flash(LedColor::Blue, 100);
        self.feedback.tone(4000, 50);
    }

    fn boss_attack(&mut self) {
        if !self.boss_active {
            return;
        }

        let sway = libm::sinf(self.frame as f32 * BOSS_SWAY_RATE) * BOSS_SWAY;
        let attack = self.frame % BOSS_ATTACK_FRAMES == 0;
        let mut muzzle = None;
        for boss in self.enemies.iter_mut().filter(|e| e.kind.is_boss()) {
            boss.pos.y = (SCREEN_HEIGHT / 2) as f32 + sway;
            if attack {
                muzzle = Some(boss.pos);
            }
        }

        if let Some(origin) = muzzle {
            for velocity in BOSS_SPREAD {
                self.enemy_bullets.spawn(Projectile::new(origin, velocity));
            }
            self.feedback.tone(100, 50);
        }
    }

    fn spawn_boss(&mut self) {
        let score = self.player.score;
        let wave = score / BOSS_SCORE_STEP;
        if self.boss_active || wave <= self.boss_wave || score % BOSS_SCORE_STEP >= BOSS_SCORE_WINDOW {
            return;
        }

        let boss = Enemy {
            pos: Vec2::new(BOSS_ENTRY_X, BOSS_ENTRY_Y),
            vel: Vec2::new(0.0, 1.0),
            kind: EnemyKind::Boss,
            health: BOSS_HEALTH,
        };
        if self.enemies.spawn(boss).is_none() {
            return;
        }

        info!("boss incoming at score {score}");
        self.boss_active = true;
        self.boss_wave = wave;
        self.feedback.melody.play(Track::Boss);
        self.feedback.tone(800, 1000);
    }

    fn spawn_enemy(&mut self) {
        if self.boss_active || self.frame % self.config.spawn_interval(self.difficulty) != 0 {
            return;
        }

        let y = self
            .rng
            .range_i32(GAME_AREA_Y, SCREEN_HEIGHT - ENEMY_SIZE) as f32;
        let kind = if self.rng.below(2) == 0 {
            EnemyKind::Grunt
        } else {
            EnemyKind::Zigzag
        };
        let mut drift = if self.rng.below(2) == 0 {
            ENEMY_DRIFT
        } else {
            -ENEMY_DRIFT
        };
        if kind == EnemyKind::Zigzag {
            drift *= 2.0;
        }

        let difficulty = self.difficulty;
        self.enemies.spawn(Enemy {
            pos: Vec2::new(REGULAR_SPAWN_X, y),
            vel: Vec2::new(BASE_ENEMY_SPEED + ENEMY_SPEED_STEP * difficulty as f32, drift),
            kind,
            health: difficulty as i16,
        });
    }

    fn cycle_day_night(&mut self) {
        if self.frame.wrapping_sub(self.last_cycle_frame) > DAY_NIGHT_FRAMES {
            self.is_day = !self.is_day;
            self.last_cycle_frame = self.frame;
            self.feedback.flash(LedColor::White, 500);
        }
    }

    fn fire_laser(&mut self) {
        self.effects.laser_frames = self.config.laser_frames;
        self.effects.flash_frames = LASER_FLASH_FRAMES;
        self.effects.shake_frames = LASER_SHAKE_FRAMES;
        self.feedback.tone(100, 500);
        self.feedback.flash(LedColor::White, 100);

        let row = self.player.pos.y;
        let band = self.config.laser_band;
        for i in 0..MAX_ENEMIES {
            let in_band = self
                .enemies
                .get(i)
                .is_some_and(|e| libm::fabsf(e.pos.y - row) < band);
            if in_band && let Some(enemy) = self.enemies.remove(i) {
                self.player.add_score(self.config.laser_score);
                if enemy.kind.is_boss() {
                    self.boss_defeated();
                }
            }
        }
    }

    fn resolve_bullet_hits(&mut self) {
        for bi in 0..MAX_BULLETS {
            let Some(bullet) = self.bullets.get(bi).copied() else {
                continue;
            };
            let target = (0..MAX_ENEMIES).find(|&ei| {
                self.enemies.get(ei).is_some_and(|e| {
                    overlaps(bullet.pos, (BULLET_WIDTH, BULLET_HEIGHT), e.pos, e.kind.size())
                })
            });
            let Some(ei) = target else {
                continue;
            };

            self.bullets.remove(bi);
            self.feedback.flash(LedColor::Blue, 100);
            self.feedback.tone(2000, 50);

            let destroyed = self.enemies.get_mut(ei).is_some_and(|e| {
                e.health -= 1;
                e.health <= 0
            });
            if destroyed && let Some(enemy) = self.enemies.remove(ei) {
                self.enemy_destroyed(enemy);
            }
        }
    }

    fn enemy_destroyed(&mut self, enemy: Enemy) {
        if enemy.kind.is_boss() {
            self.player.add_score(self.config.boss_score);
            self.boss_defeated();
            return;
        }

        self.player.add_score(self.config.grunt_score);
        if self.rng.chance(self.config.powerup_drop_percent) {
            let kind = PowerUpKind::ALL[self.rng.below(PowerUpKind::ALL.len() as u32) as usize];
            self.powerups.spawn(PowerUp {
                pos: enemy.pos,
                kind,
            });
        }
    }

    fn boss_defeated(&mut self) {
        self.boss_active = false;
        self.difficulty = self.difficulty.saturating_add(1);
        self.feedback.melody.play(Track::Victory);
        self.feedback.tone(1500, 500);
        info!("boss down, difficulty now {}", self.difficulty);
    }

    fn update_powerups(&mut self) {
        let player = self.player.pos;
        for i in 0..MAX_POWERUPS {
            let Some(powerup) = self.powerups.get_mut(i) else {
                continue;
            };
            powerup.pos.x -= POWERUP_DRIFT;
            let (pos, kind) = (powerup.pos, powerup.kind);

            if pos.x < -(POWERUP_SIZE as f32) {
                self.powerups.remove(i);
            } else if overlaps(player, super::Player::SIZE, pos, (POWERUP_SIZE, POWERUP_SIZE)) {
                self.powerups.remove(i);
                self.collect(kind);
            }
        }
    }

    fn collect(&mut self, kind: PowerUpKind) {
        self.feedback.flash(LedColor::Green, 300);
        self.feedback.tone(1000, 100);

        match kind {
            PowerUpKind::Shield => self.player.restore_shield(self.config.shield_pickup),
            PowerUpKind::DoubleShot => self.buffs.double_shot = self.config.double_shot_frames,
            PowerUpKind::Turbo => self.buffs.turbo = self.config.turbo_frames,
            PowerUpKind::ExtraBomb => self.input.laser_trigger.raise(),
        }
    }

    fn resolve_enemy_fire(&mut self) {
        let player = self.player.pos;
        for i in 0..MAX_ENEMY_BULLETS {
            let hit = self.enemy_bullets.get(i).is_some_and(|b| {
                overlaps(b.pos, (ENEMY_BULLET_SIZE, ENEMY_BULLET_SIZE), player, super::Player::SIZE)
            });
            if hit {
                self.enemy_bullets.remove(i);
                self.damage(self.config.enemy_bullet_damage);
            }
        }
    }

    fn resolve_rams(&mut self) {
        let player = self.player.pos;
        for i in 0..MAX_ENEMIES {
            // the boss is pinned to the right half, out of the player's reach
            let hit = self.enemies.get(i).is_some_and(|e| {
                !e.kind.is_boss() && overlaps(player, super::Player::SIZE, e.pos, e.kind.size())
            });
            if hit {
                self.enemies.remove(i);
                self.damage(self.config.kamikaze_damage);
            }
        }
    }

    fn damage(&mut self, amount: u8) {
        if !self.player.alive {
            return;
        }

        self.feedback.flash(LedColor::Red, 300);
        self.feedback.tone(150, 150);
        self.effects.shake_frames = DAMAGE_SHAKE_FRAMES;

        match self.player.apply_damage(amount) {
            DamageOutcome::Absorbed => {}
            DamageOutcome::LifeLost => info!("life lost, {} left", self.player.lives),
            DamageOutcome::Killed => {
                info!("game over with score {}", self.player.score);
                self.enter(Phase::GameOver);
                self.feedback.melody.play(Track::GameOver);
            }
        }
    }
}
