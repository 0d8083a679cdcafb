//! Player, projectile, enemy and power-up records stored in the game pools.

use crate::config::{
    BOSS_SIZE, ENEMY_SIZE, GAME_AREA_Y, PLAYER_HEIGHT, PLAYER_MAX_LIVES, PLAYER_MAX_SHIELD,
    PLAYER_START_X, PLAYER_START_Y, PLAYER_WIDTH, SCREEN_HEIGHT,
};

/// Real-valued 2D position or velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box overlap test.
pub fn overlaps(a: Vec2, a_size: (i32, i32), b: Vec2, b_size: (i32, i32)) -> bool {
    a.x < b.x + b_size.0 as f32
        && a.x + a_size.0 as f32 > b.x
        && a.y < b.y + b_size.1 as f32
        && a.y + a_size.1 as f32 > b.y
}

/// What a single damage application did to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shield absorbed the hit.
    Absorbed,
    /// Shield ran out; one life was consumed and the shield refilled.
    LifeLost,
    /// Last life consumed.
    Killed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub lives: u8,
    pub shield: u8,
    pub score: u32,
    pub alive: bool,
    pub level: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub const SIZE: (i32, i32) = (PLAYER_WIDTH, PLAYER_HEIGHT);

    pub const fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            lives: PLAYER_MAX_LIVES,
            shield: PLAYER_MAX_SHIELD,
            score: 0,
            alive: true,
            level: 1,
        }
    }

    /// Reduce the shield, cascading into lives when it is exhausted.
    ///
    /// Shield stays within `0..=PLAYER_MAX_SHIELD` and lives within
    /// `0..=PLAYER_MAX_LIVES`. A dead player ignores further damage.
    pub fn apply_damage(&mut self, damage: u8) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Killed;
        }

        self.shield = self.shield.saturating_sub(damage);
        if self.shield > 0 {
            return DamageOutcome::Absorbed;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.alive = false;
            DamageOutcome::Killed
        } else {
            self.shield = PLAYER_MAX_SHIELD;
            DamageOutcome::LifeLost
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        let level = 1 + self.score / 1000;
        self.level = self.level.max(level.min(u8::MAX as u32) as u8);
    }

    pub fn restore_shield(&mut self, amount: u8) {
        self.shield = self.shield.saturating_add(amount).min(PLAYER_MAX_SHIELD);
    }
}

/// Player or enemy projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Projectile {
    pub const fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    pub fn advance(&mut self) {
        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    /// Straight flyer with a gentle vertical drift.
    Grunt,
    /// Grunt with doubled vertical speed.
    Zigzag,
    Boss,
}

impl EnemyKind {
    pub const fn size(self) -> (i32, i32) {
        match self {
            Self::Boss => (BOSS_SIZE, BOSS_SIZE),
            Self::Grunt | Self::Zigzag => (ENEMY_SIZE, ENEMY_SIZE),
        }
    }

    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: EnemyKind,
    pub health: i16,
}

impl Enemy {
    /// Move one frame. Returns `false` once the enemy has left the screen.
    pub fn advance(&mut self) -> bool {
        let (_, h) = self.kind.size();
        if !self.kind.is_boss() {
            self.pos.x -= self.vel.x;
        }
        self.pos.y += self.vel.y;

        let floor = (SCREEN_HEIGHT - h) as f32;
        if self.pos.y <= GAME_AREA_Y as f32 || self.pos.y >= floor {
            self.vel.y = -self.vel.y;
        }

        self.pos.x >= -(BOSS_SIZE as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Shield,
    DoubleShot,
    Turbo,
    ExtraBomb,
}

impl PowerUpKind {
    pub const ALL: [Self; 4] = [Self::Shield, Self::DoubleShot, Self::Turbo, Self::ExtraBomb];
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_sequence_cascades_into_lives() {
        let mut player = Player::new();
        assert_eq!(player.pos, Vec2::new(10.0, 32.0));

        let mut shields = [0u8; 3];
        for s in &mut shields {
            assert_eq!(player.apply_damage(30), DamageOutcome::Absorbed);
            *s = player.shield;
        }
        assert_eq!(shields, [70, 40, 10]);

        assert_eq!(player.apply_damage(30), DamageOutcome::LifeLost);
        assert_eq!(player.lives, 2);
        assert_eq!(player.shield, PLAYER_MAX_SHIELD);
    }

    #[test]
    fn last_life_kills_and_stays_in_bounds() {
        let mut player = Player::new();
        let mut outcome = DamageOutcome::Absorbed;
        for _ in 0..20 {
            outcome = player.apply_damage(u8::MAX);
            assert!(player.shield <= PLAYER_MAX_SHIELD);
            assert!(player.lives <= PLAYER_MAX_LIVES);
        }
        assert_eq!(outcome, DamageOutcome::Killed);
        assert!(!player.alive);
        assert_eq!(player.lives, 0);
        assert_eq!(player.shield, 0);
    }

    #[test]
    fn level_follows_score() {
        let mut player = Player::new();
        player.add_score(999);
        assert_eq!(player.level, 1);
        player.add_score(1);
        assert_eq!(player.level, 2);
        player.add_score(2500);
        assert_eq!(player.level, 4);
    }

    #[test]
    fn shield_pickup_is_clamped() {
        let mut player = Player::new();
        player.apply_damage(20);
        player.restore_shield(50);
        assert_eq!(player.shield, PLAYER_MAX_SHIELD);
    }

    #[test]
    fn aabb_overlap() {
        let a = Vec2::new(0.0, 0.0);
        assert!(overlaps(a, (8, 8), Vec2::new(7.0, 7.0), (8, 8)));
        assert!(!overlaps(a, (8, 8), Vec2::new(8.0, 0.0), (8, 8)));
    }

    #[test]
    fn grunt_leaves_screen_on_the_left() {
        let mut enemy = Enemy {
            pos: Vec2::new(-31.0, 30.0),
            vel: Vec2::new(2.0, 0.0),
            kind: EnemyKind::Grunt,
            health: 1,
        };
        assert!(!enemy.advance());
    }
}
