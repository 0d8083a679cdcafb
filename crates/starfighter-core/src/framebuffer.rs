//! Monochrome RAM framebuffer with change tracking.
//!
//! The renderer draws into this buffer while it holds the game lock. After
//! the lock is released, only the rectangle containing changed pixels is
//! pushed to the panel.

use core::convert::Infallible;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};
use log::trace;

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

const WIDTH: usize = SCREEN_WIDTH as usize;
const HEIGHT: usize = SCREEN_HEIGHT as usize;
/// One bit per pixel, row-major.
const BYTES: usize = WIDTH * HEIGHT / 8;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// 128×64 one-bit framebuffer implementing `DrawTarget<Color = BinaryColor>`.
pub struct FrameBuffer {
    bits: [u8; BYTES],
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// All pixels off, nothing dirty.
    pub const fn new() -> Self {
        Self {
            bits: [0; BYTES],
            dirty: None,
        }
    }

    /// Read back a pixel. Out-of-range coordinates read as off.
    pub fn pixel(&self, x: i32, y: i32) -> BinaryColor {
        if !in_bounds(x, y) {
            return BinaryColor::Off;
        }
        let idx = y as usize * WIDTH + x as usize;
        BinaryColor::from(self.bits[idx / 8] & (1 << (idx % 8)) != 0)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: BinaryColor) {
        let idx = y * WIDTH + x;
        let mask = 1u8 << (idx % 8);
        let byte = &mut self.bits[idx / 8];
        let on = color.is_on();
        if (*byte & mask != 0) == on {
            return;
        }

        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        match &mut self.dirty {
            Some(rect) => rect.expand(x, y),
            None => self.dirty = Some(DirtyRect::from_point(x, y)),
        }
    }

    /// Push the dirty region to `display` and reset the dirty state.
    ///
    /// A no-op when nothing changed since the last flush.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;
        trace!(
            "flushing {}x{} dirty region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );
        let this = &*self;
        let colors = (rect.min_y..=rect.max_y).flat_map(move |y| {
            (rect.min_x..=rect.max_x).map(move |x| this.pixel(x as i32, y as i32))
        });

        display.fill_contiguous(&area, colors)
    }
}

/// Panel the render task presents finished frames to.
pub trait FrameSink {
    type Error: core::fmt::Debug;

    /// Push `frame`'s changes to the panel and make them visible.
    fn present(&mut self, frame: &mut FrameBuffer) -> impl Future<Output = Result<(), Self::Error>>;
}

fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as usize) < WIDTH && (y as usize) < HEIGHT
}

/// Intersect `area` with the screen, as half-open pixel ranges.
fn clip(area: &Rectangle) -> (core::ops::Range<usize>, core::ops::Range<usize>) {
    let x0 = area.top_left.x.clamp(0, SCREEN_WIDTH);
    let y0 = area.top_left.y.clamp(0, SCREEN_HEIGHT);
    let x1 = area
        .top_left
        .x
        .saturating_add(area.size.width as i32)
        .clamp(0, SCREEN_WIDTH);
    let y1 = area
        .top_left
        .y
        .saturating_add(area.size.height as i32)
        .clamp(0, SCREEN_HEIGHT);
    (x0 as usize..x1 as usize, y0 as usize..y1 as usize)
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if in_bounds(coord.x, coord.y) {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let points = area.points();
        for (point, color) in points.zip(colors) {
            if in_bounds(point.x, point.y) {
                self.set_pixel(point.x as usize, point.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let (xs, ys) = clip(area);
        for y in ys {
            for x in xs.clone() {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    /// Records the area and pixels of every `fill_contiguous` call.
    struct Recorder {
        area: Option<Rectangle>,
        lit: usize,
        total: usize,
    }

    impl OriginDimensions for Recorder {
        fn size(&self) -> Size {
            Size::new(WIDTH as u32, HEIGHT as u32)
        }
    }

    impl DrawTarget for Recorder {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            Ok(())
        }

        fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Self::Color>,
        {
            self.area = Some(*area);
            for c in colors {
                self.total += 1;
                if c.is_on() {
                    self.lit += 1;
                }
            }
            Ok(())
        }
    }

    fn recorder() -> Recorder {
        Recorder {
            area: None,
            lit: 0,
            total: 0,
        }
    }

    #[test]
    fn flush_sends_only_the_dirty_rectangle() {
        let mut fb = FrameBuffer::new();
        Rectangle::new(Point::new(10, 20), Size::new(4, 3))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();

        let mut out = recorder();
        fb.flush(&mut out).unwrap();

        assert_eq!(
            out.area,
            Some(Rectangle::new(Point::new(10, 20), Size::new(4, 3)))
        );
        assert_eq!(out.total, 12);
        assert_eq!(out.lit, 12);
        assert!(!fb.is_dirty());
    }

    #[test]
    fn redrawing_identical_pixels_is_clean() {
        let mut fb = FrameBuffer::new();
        fb.clear(BinaryColor::Off).unwrap();
        assert!(!fb.is_dirty());

        let mut out = recorder();
        fb.flush(&mut out).unwrap();
        assert_eq!(out.area, None);
    }

    #[test]
    fn clipped_drawing_stays_in_bounds() {
        let mut fb = FrameBuffer::new();
        fb.fill_solid(
            &Rectangle::new(Point::new(-5, 60), Size::new(10, 10)),
            BinaryColor::On,
        )
        .unwrap();

        assert_eq!(fb.pixel(0, 63), BinaryColor::On);
        assert_eq!(fb.pixel(4, 60), BinaryColor::On);
        assert_eq!(fb.pixel(5, 60), BinaryColor::Off);
        assert_eq!(fb.pixel(-1, 60), BinaryColor::Off);
    }

    #[test]
    fn clearing_a_pixel_marks_dirty() {
        let mut fb = FrameBuffer::new();
        Pixel(Point::new(127, 63), BinaryColor::On).draw(&mut fb).unwrap();
        fb.flush(&mut recorder()).unwrap();

        Pixel(Point::new(127, 63), BinaryColor::Off).draw(&mut fb).unwrap();
        assert!(fb.is_dirty());
        assert_eq!(fb.pixel(127, 63), BinaryColor::Off);
    }
}
