//! 1-bit sprite bitmaps, MSB first, rows padded to whole bytes.

use embedded_graphics::image::ImageRaw;
use embedded_graphics::pixelcolor::BinaryColor;

use crate::config::{BULLET_WIDTH, ENEMY_SIZE, PLAYER_WIDTH};

#[rustfmt::skip]
const PLAYER_DATA: [u8; 24] = [
    0b0011_0000, 0b0000_0000,
    0b0011_1100, 0b0000_0000,
    0b0001_1111, 0b0000_0000,
    0b0000_1111, 0b1111_0000,
    0b0000_1111, 0b1111_1100,
    0b0001_1111, 0b1111_1111,
    0b0001_1111, 0b1111_1111,
    0b0000_1111, 0b1111_1100,
    0b0000_1111, 0b1111_0000,
    0b0001_1111, 0b0000_0000,
    0b0011_1100, 0b0000_0000,
    0b0011_0000, 0b0000_0000,
];

#[rustfmt::skip]
const PLAYER_THRUST_DATA: [u8; 24] = [
    0b0011_0000, 0b0000_0000,
    0b0011_1100, 0b0000_0000,
    0b0001_1111, 0b0000_0000,
    0b0000_1111, 0b1111_0000,
    0b0000_1111, 0b1111_1100,
    0b1101_1111, 0b1111_1111,
    0b1101_1111, 0b1111_1111,
    0b0000_1111, 0b1111_1100,
    0b0000_1111, 0b1111_0000,
    0b0001_1111, 0b0000_0000,
    0b0011_1100, 0b0000_0000,
    0b0011_0000, 0b0000_0000,
];

#[rustfmt::skip]
const GRUNT_DATA: [u8; 8] = [
    0b0011_1100,
    0b0111_1110,
    0b1101_1011,
    0b1111_1111,
    0b1111_1111,
    0b0010_0100,
    0b0101_1010,
    0b1010_0101,
];

#[rustfmt::skip]
const ZIGZAG_DATA: [u8; 8] = [
    0b1000_0001,
    0b1100_0011,
    0b0110_0110,
    0b0011_1100,
    0b0011_1100,
    0b0110_0110,
    0b1100_0011,
    0b1000_0001,
];

const BULLET_DATA: [u8; 2] = [0b1111_0000, 0b1111_0000];

#[rustfmt::skip]
const HEART_DATA: [u8; 7] = [
    0b0110_1100,
    0b1111_1110,
    0b1111_1110,
    0b1111_1110,
    0b0111_1100,
    0b0011_1000,
    0b0001_0000,
];

pub const PLAYER: ImageRaw<'static, BinaryColor> = ImageRaw::new(&PLAYER_DATA, PLAYER_WIDTH as u32);
pub const PLAYER_THRUST: ImageRaw<'static, BinaryColor> =
    ImageRaw::new(&PLAYER_THRUST_DATA, PLAYER_WIDTH as u32);
pub const GRUNT: ImageRaw<'static, BinaryColor> = ImageRaw::new(&GRUNT_DATA, ENEMY_SIZE as u32);
pub const ZIGZAG: ImageRaw<'static, BinaryColor> = ImageRaw::new(&ZIGZAG_DATA, ENEMY_SIZE as u32);
pub const BULLET: ImageRaw<'static, BinaryColor> = ImageRaw::new(&BULLET_DATA, BULLET_WIDTH as u32);
pub const HEART: ImageRaw<'static, BinaryColor> = ImageRaw::new(&HEART_DATA, 8);
