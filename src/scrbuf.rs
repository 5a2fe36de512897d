//! ScreenBuffer - an in-memory RGB frame, painted by the 3D renderer
//! and then presented once per frame via a `Painter`.

use crate::Painter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RGB {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RGB {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply each component by `factor` (clamped to the 0..=255 range).
    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        let f = |c: u8| -> u8 { (c as f64 * factor).clamp(0.0, 255.0) as u8 };
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

pub type Point = (i32, i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// The drawing primitives needed to render a frame.
pub trait Surface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn draw_line(&mut self, p0: Point, p1: Point, color: RGB);
    fn fill_rect(&mut self, rect: Rect, color: RGB);
    /// Draw a square point of `size` x `size` pixels, centered on `p`.
    fn draw_point(&mut self, p: Point, color: RGB, size: i32);
}

pub struct ScreenBuffer {
    width: i32,
    height: i32,
    pixels: Vec<RGB>,
}

impl ScreenBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "Invalid screen size");
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![RGB::default(); len],
        }
    }

    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, color: RGB) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            let idx = (y * self.width + x) as usize;
            self.pixels[idx] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<RGB> {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            let idx = (y * self.width + x) as usize;
            Some(self.pixels[idx])
        } else {
            None
        }
    }

    /// Present the whole buffer.
    pub fn paint(&self, painter: &mut dyn Painter) {
        let w = self.width as usize;
        for (y, row) in self.pixels.chunks_exact(w).enumerate() {
            for (x, color) in row.iter().enumerate() {
                painter.draw_pixel(x as i32, y as i32, *color);
            }
        }
    }
}

impl Surface for ScreenBuffer {
    #[inline]
    fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    fn height(&self) -> i32 {
        self.height
    }

    /// Bresenham line, clipped per pixel.
    fn draw_line(&mut self, p0: Point, p1: Point, color: RGB) {
        let (mut x, mut y) = p0;
        let (x1, y1) = p1;
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: RGB) {
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.w).min(self.width);
        let y1 = (rect.y + rect.h).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for y in y0..y1 {
            let start = (y * self.width + x0) as usize;
            let end = (y * self.width + x1) as usize;
            self.pixels[start..end].fill(color);
        }
    }

    fn draw_point(&mut self, p: Point, color: RGB, size: i32) {
        let size = size.max(1);
        let half = size / 2;
        self.fill_rect(Rect::new(p.0 - half, p.1 - half, size, size), color);
    }
}
