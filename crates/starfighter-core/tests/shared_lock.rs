//! Four threads doing what the four tasks do, all through the one lock.

use std::thread;

use embassy_futures::block_on;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PointsIter;
use starfighter_core::config::{PLAYER_MAX_LIVES, PLAYER_MAX_SHIELD};
use starfighter_core::feedback::FeedbackDriver;
use starfighter_core::framebuffer::FrameBuffer;
use starfighter_core::game::{Enemy, EnemyKind, Vec2};
use starfighter_core::input::RawInput;
use starfighter_core::render::Renderer;
use starfighter_core::sensors::AccelSample;
use starfighter_core::{GameState, Phase, SharedGame};

const PASSES: u32 = 2_000;

fn check(state: &GameState) {
    assert!(state.player.shield <= PLAYER_MAX_SHIELD);
    assert!(state.player.lives <= PLAYER_MAX_LIVES);
    assert_ne!(state.phase, Phase::Paused);
}

#[test]
fn concurrent_passes_keep_state_consistent() {
    let shared = SharedGame::new(GameState::new().with_seed(42));

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..PASSES * 3 {
                let raw = RawInput {
                    accel: AccelSample::new(
                        if i % 400 < 200 { 9000 } else { -9000 },
                        if i % 300 < 150 { 7000 } else { -7000 },
                        0,
                    ),
                    pressed: i % 50 < 10 || (i % 1000) > 850,
                };
                let mut state = block_on(shared.lock());
                state.input.poll(raw);
                check(&state);
            }
        });

        s.spawn(|| {
            for _ in 0..PASSES {
                let mut state = block_on(shared.lock());
                state.step();
                check(&state);
            }
        });

        s.spawn(|| {
            let mut renderer = Renderer::default();
            let mut frame = FrameBuffer::new();
            for _ in 0..PASSES / 4 {
                let state = block_on(shared.lock());
                renderer.draw(&state, &mut frame).unwrap();
                check(&state);
            }
        });

        s.spawn(|| {
            let mut driver = FeedbackDriver::new();
            for i in 0..PASSES {
                let mut state = block_on(shared.lock());
                driver.step(&mut state, i as u64 * 30);
                check(&state);
            }
        });
    });

    let state = block_on(shared.lock());
    check(&state);
    assert!(state.frame > 0);
}

#[test]
fn frame_buffer_survives_a_full_game_over() {
    let shared = SharedGame::new(GameState::new());
    {
        let mut state = block_on(shared.lock());
        state.reset();
        state.phase = Phase::Playing;
        state.player.lives = 1;
        state.player.shield = 1;
        let at = state.player.pos;
        state.enemies.spawn(Enemy {
            pos: at,
            vel: Vec2::ZERO,
            kind: EnemyKind::Grunt,
            health: 1,
        });
        state.frame = 1;
        state.step();
        assert_eq!(state.phase, Phase::GameOver);
    }

    let mut frame = FrameBuffer::new();
    let state = block_on(shared.lock());
    Renderer::default().draw(&state, &mut frame).unwrap();
    let lit = frame
        .bounding_box()
        .points()
        .filter(|p| frame.pixel(p.x, p.y) == BinaryColor::On)
        .count();
    assert!(lit > 0);
}
