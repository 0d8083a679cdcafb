//! Hardware-independent core library for the ESP Starfighter handheld
//!
//! This crate contains all platform-agnostic logic for the side-scrolling
//! shooter: the shared game state and its single lock, the tap/hold input
//! classifier, the per-frame simulation and state machine, the renderer, the
//! buzzer/LED feedback driver, and the four periodic task loops that tie them
//! together. It also carries the packed status/command packets used by the
//! relay nodes that sit next to the game on the same bench.
//!
//! It is `#![no_std]` so it compiles on both the ESP32 target and desktop
//! hosts (for the simulator and tests).

#![no_std]

pub mod config;
pub mod feedback;
pub mod framebuffer;
pub mod game;
pub mod input;
pub mod link;
pub mod render;
pub mod rng;
pub mod sensors;
pub mod tasks;

pub use game::{GameState, Phase, SharedGame};
