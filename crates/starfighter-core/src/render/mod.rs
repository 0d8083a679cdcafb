//! Frame renderer
//!
//! Draws a read-only view of [`GameState`] onto any one-bit draw target. The
//! only state the renderer owns is its shake generator.

mod sprites;

use core::fmt::Write;

use embedded_graphics::image::{GetPixel, ImageRaw};
use embedded_graphics::mono_font::ascii::{FONT_5X7, FONT_6X10, FONT_10X20};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Line, PointsIter, PrimitiveStyle, Rectangle, RoundedRectangle,
};
use embedded_graphics::text::{Baseline, Text};

use crate::config::{
    BOSS_HEALTH, BOSS_SIZE, GAME_AREA_HEIGHT, GAME_AREA_Y, PLAYER_HEIGHT, PLAYER_MAX_SHIELD,
    PLAYER_WIDTH, SCREEN_WIDTH,
};
use crate::game::{Enemy, EnemyKind, GameState, Phase, Vec2};
use crate::rng::Rng;

const STAR_COUNT: i64 = 15;
const TITLE: &str = "ESP WARS";
const SUBTITLE: &str = "STAR GUARDIAN";
const PROMPT: &str = "PRESS FIRE";
const SHIELD_BAR_WIDTH: i32 = 40;
const POWERUP_ICON: u32 = 6;

fn point(v: Vec2) -> Point {
    Point::new(v.x as i32, v.y as i32)
}

fn text<D>(target: &mut D, s: &str, at: Point, font: &MonoFont<'_>, color: BinaryColor) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(font, color);
    Text::with_baseline(s, at, style, Baseline::Top).draw(target)?;
    Ok(())
}

/// Draw the set bits of `raw` in `color`, leaving clear bits untouched.
fn blit<D>(target: &mut D, raw: &ImageRaw<'_, BinaryColor>, at: Point, color: BinaryColor) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let area = Rectangle::new(Point::zero(), raw.size());
    let pixels = area
        .points()
        .filter(|p| raw.pixel(*p) == Some(BinaryColor::On))
        .map(|p| Pixel(at + p, color));
    target.draw_iter(pixels)
}

pub struct Renderer {
    rng: Rng,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(0x00C0_FFEE)
    }
}

impl Renderer {
    pub const fn new(seed: u32) -> Self {
        Self { rng: Rng::new(seed) }
    }

    /// Draw one complete frame for the current phase.
    pub fn draw<D>(&mut self, state: &GameState, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match state.phase {
            Phase::Intro => {
                target.clear(BinaryColor::Off)?;
                draw_intro(state.intro_frame, target)
            }
            Phase::Menu => {
                target.clear(BinaryColor::Off)?;
                draw_menu(state.frame, target)
            }
            Phase::Playing | Phase::Paused => {
                // day swaps ink and paper
                let ink = BinaryColor::from(!state.is_day);
                target.clear(ink.invert())?;
                draw_hud(state, ink, target)?;
                self.draw_field(state, ink, target)
            }
            Phase::GameOver => {
                target.clear(BinaryColor::Off)?;
                draw_game_over(state, target)
            }
        }
    }

    fn draw_field<D>(&mut self, state: &GameState, ink: BinaryColor, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let shake = if state.effects.shake_frames > 0 {
            Point::new(self.rng.range_i32(-2, 3), self.rng.range_i32(-1, 2))
        } else {
            Point::zero()
        };
        let frame = state.frame;
        let fill = PrimitiveStyle::with_fill(ink);
        let outline = PrimitiveStyle::with_stroke(ink, 1);

        let stars = (0..STAR_COUNT).map(|i| {
            let speed = i % 3 + 1;
            let x = (i * 37 - frame as i64 * speed).rem_euclid(SCREEN_WIDTH as i64);
            let y = GAME_AREA_Y as i64 + (i * 23) % GAME_AREA_HEIGHT as i64;
            Pixel(Point::new(x as i32, y as i32) + shake, ink)
        });
        target.draw_iter(stars)?;

        let player = &state.player;
        if player.alive {
            let at = point(player.pos);
            let ship = if frame % 10 < 5 {
                &sprites::PLAYER_THRUST
            } else {
                &sprites::PLAYER
            };
            blit(target, ship, at + shake, ink)?;

            if state.input.charging {
                let radius = (frame % 5) + 8;
                let centre = at + Point::new(PLAYER_WIDTH / 2, PLAYER_HEIGHT / 2);
                Circle::with_center(centre, radius * 2 + 1)
                    .into_styled(outline)
                    .draw(target)?;
            }

            if state.effects.laser_frames > 0 {
                Rectangle::new(at + Point::new(PLAYER_WIDTH, 4), Size::new(SCREEN_WIDTH as u32, 4))
                    .into_styled(fill)
                    .draw(target)?;
            }
        }

        for bullet in state.bullets.iter() {
            blit(target, &sprites::BULLET, point(bullet.pos), ink)?;
        }

        for enemy in state.enemies.iter() {
            draw_enemy(enemy, ink, target)?;
        }

        let solid_icon = (frame / 5) % 2 == 0;
        for powerup in state.powerups.iter() {
            let icon = Rectangle::new(point(powerup.pos) + shake, Size::new(POWERUP_ICON, POWERUP_ICON));
            icon.into_styled(if solid_icon { fill } else { outline })
                .draw(target)?;
        }

        for shot in state.enemy_bullets.iter() {
            Circle::with_center(point(shot.pos), 5)
                .into_styled(outline)
                .draw(target)?;
        }

        if state.effects.flash_frames > 0 {
            target.clear(ink)?;
        }
        Ok(())
    }
}

fn draw_enemy<D>(enemy: &Enemy, ink: BinaryColor, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let at = point(enemy.pos);
    match enemy.kind {
        EnemyKind::Grunt => blit(target, &sprites::GRUNT, at, ink),
        EnemyKind::Zigzag => blit(target, &sprites::ZIGZAG, at, ink),
        EnemyKind::Boss => {
            let size = BOSS_SIZE as u32;
            let hull = Rectangle::new(at, Size::new(size, size));
            RoundedRectangle::with_equal_corners(hull, Size::new(6, 6))
                .into_styled(PrimitiveStyle::with_stroke(ink, 1))
                .draw(target)?;
            Circle::with_center(hull.center(), 11)
                .into_styled(PrimitiveStyle::with_fill(ink))
                .draw(target)?;
            for y in [8, 23] {
                Line::new(at + Point::new(-6, y), at + Point::new(4, y))
                    .into_styled(PrimitiveStyle::with_stroke(ink, 2))
                    .draw(target)?;
            }

            let bar = Rectangle::new(at - Point::new(0, 4), Size::new(size, 3));
            bar.into_styled(PrimitiveStyle::with_stroke(ink, 1))
                .draw(target)?;
            let hp = (enemy.health.max(0) as u32 * size) / BOSS_HEALTH as u32;
            Rectangle::new(bar.top_left, Size::new(hp, 3))
                .into_styled(PrimitiveStyle::with_fill(ink))
                .draw(target)
        }
    }
}

fn draw_hud<D>(state: &GameState, ink: BinaryColor, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let player = &state.player;
    let mut line: heapless::String<12> = heapless::String::new();

    text(target, "*", Point::new(0, 0), &FONT_5X7, ink)?;
    let _ = write!(line, "{:06}", player.score);
    text(target, &line, Point::new(8, 0), &FONT_5X7, ink)?;

    for i in 0..player.lives as i32 {
        blit(target, &sprites::HEART, Point::new(60 + i * 10, 0), ink)?;
    }

    line.clear();
    let _ = write!(line, "N{}", player.level);
    text(target, &line, Point::new(100, 0), &FONT_5X7, ink)?;

    text(target, "EG", Point::new(0, 8), &FONT_5X7, ink)?;
    Rectangle::new(Point::new(15, 9), Size::new(SHIELD_BAR_WIDTH as u32 + 2, 6))
        .into_styled(PrimitiveStyle::with_stroke(ink, 1))
        .draw(target)?;
    let filled = player.shield as i32 * SHIELD_BAR_WIDTH / PLAYER_MAX_SHIELD as i32;
    Rectangle::new(Point::new(16, 10), Size::new(filled as u32, 4))
        .into_styled(PrimitiveStyle::with_fill(ink))
        .draw(target)?;

    Line::new(Point::new(0, 15), Point::new(SCREEN_WIDTH - 1, 15))
        .into_styled(PrimitiveStyle::with_stroke(ink, 1))
        .draw(target)?;
    Ok(())
}

fn draw_intro<D>(frame: u32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let on = BinaryColor::On;
    let ship_home = Point::new(56, 24);

    if frame < 20 {
        return blit(target, &sprites::PLAYER, Point::new(56, 64 - frame as i32 * 2), on);
    }

    blit(target, &sprites::PLAYER, ship_home, on)?;
    let title_len = (((frame - 20) / 5) as usize).min(TITLE.len());
    text(target, &TITLE[..title_len], Point::new(24, 0), &FONT_10X20, on)?;
    if frame < 50 {
        return Ok(());
    }

    let subtitle_len = (((frame - 50) / 2) as usize).min(SUBTITLE.len());
    text(target, &SUBTITLE[..subtitle_len], Point::new(25, 40), &FONT_6X10, on)?;
    if frame >= 90 && (frame / 15) % 2 == 0 {
        text(target, PROMPT, Point::new(34, 53), &FONT_6X10, on)?;
    }
    Ok(())
}

fn draw_menu<D>(frame: u32, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let on = BinaryColor::On;
    text(target, "ESP32 SQUADRON", Point::new(22, 2), &FONT_6X10, on)?;
    Line::new(Point::new(0, 14), Point::new(SCREEN_WIDTH - 1, 14))
        .into_styled(PrimitiveStyle::with_stroke(on, 1))
        .draw(target)?;
    text(target, "> START <", Point::new(37, 22), &FONT_6X10, on)?;
    text(target, "Tilt to move", Point::new(28, 42), &FONT_6X10, on)?;
    text(target, "FIRE to attack", Point::new(22, 53), &FONT_6X10, on)?;

    let bob = ((frame / 10) % 3) as i32;
    blit(target, &sprites::PLAYER, Point::new(5, 22 + bob), on)?;
    blit(target, &sprites::PLAYER, Point::new(107, 22 + bob), on)
}

fn draw_game_over<D>(state: &GameState, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let on = BinaryColor::On;
    let mut line: heapless::String<24> = heapless::String::new();

    text(target, "GAME OVER", Point::new(19, 0), &FONT_10X20, on)?;
    let _ = write!(line, "SCORE: {}", state.player.score);
    text(target, &line, Point::new(25, 26), &FONT_6X10, on)?;
    line.clear();
    let _ = write!(line, "LEVEL: {}", state.player.level);
    text(target, &line, Point::new(25, 38), &FONT_6X10, on)?;

    if (state.frame / 20) % 2 == 0 {
        text(target, PROMPT, Point::new(34, 53), &FONT_6X10, on)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::FrameBuffer;

    fn playing() -> GameState {
        let mut state = GameState::new();
        state.reset();
        state.phase = Phase::Playing;
        state
    }

    fn render(state: &GameState) -> FrameBuffer {
        let mut fb = FrameBuffer::new();
        Renderer::default().draw(state, &mut fb).unwrap();
        fb
    }

    fn lit(fb: &FrameBuffer, rows: core::ops::Range<i32>) -> usize {
        rows.flat_map(|y| (0..SCREEN_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.pixel(x, y).is_on())
            .count()
    }

    #[test]
    fn hud_divider_and_shield_bar() {
        let mut state = playing();
        state.player.shield = 50;
        let fb = render(&state);

        assert!((0..SCREEN_WIDTH).all(|x| fb.pixel(x, 15).is_on()));
        assert!(fb.pixel(35, 11).is_on());
        assert!(!fb.pixel(36, 11).is_on());
    }

    #[test]
    fn player_sprite_is_drawn_at_its_position() {
        let mut state = playing();
        state.frame = 7;
        let fb = render(&state);
        // nose of the ship: sprite row 5, last column
        assert!(fb.pixel(10 + 15, 32 + 5).is_on());
        assert!(!fb.pixel(10, 32 + 5).is_on());
    }

    #[test]
    fn day_inverts_the_background() {
        let mut state = playing();
        assert!(!render(&state).pixel(120, 63).is_on());
        state.is_day = true;
        assert!(render(&state).pixel(120, 63).is_on());
    }

    #[test]
    fn flash_fills_the_screen() {
        let mut state = playing();
        state.effects.flash_frames = 1;
        let fb = render(&state);
        assert_eq!(lit(&fb, 0..64), 128 * 64);
    }

    #[test]
    fn boss_health_bar_tracks_health() {
        let mut state = playing();
        state.enemies.spawn(Enemy {
            pos: Vec2::new(90.0, 30.0),
            vel: Vec2::ZERO,
            kind: EnemyKind::Boss,
            health: 50,
        });
        let fb = render(&state);
        assert!(fb.pixel(90 + 15, 27).is_on());
        assert!(!fb.pixel(90 + 17, 27).is_on());
    }

    #[test]
    fn menu_and_game_over_draw_text() {
        let mut state = GameState::new();
        state.phase = Phase::Menu;
        assert!(lit(&render(&state), 0..14) > 0);

        state.phase = Phase::GameOver;
        state.frame = 0;
        assert!(lit(&render(&state), 0..20) > 0);
    }

    #[test]
    fn intro_starts_blank_above_the_ship() {
        let state = GameState::new();
        assert_eq!(lit(&render(&state), 0..64), 0);
    }
}
