//! Owned RGB pixel buffer and the rasterization primitives generators draw with.
//!
//! A [`Canvas`] stores `width * height` [`Rgb`] pixels in row-major order with
//! `(0, 0)` at the top-left. Its dimensions are fixed at creation. Drawing
//! calls take signed or fractional coordinates and silently clip anything that
//! falls outside the buffer, so ray endpoints far off-canvas are legal.

use glam::DVec2;

use crate::color::Rgb;
use crate::error::GenError;

/// Fixed-size RGB canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Canvas {
    /// Creates a black canvas.
    ///
    /// Returns `GenError::InvalidDimensions` if either dimension is zero or
    /// `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, GenError> {
        Self::filled(width, height, Rgb::BLACK)
    }

    /// Creates a canvas with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Result<Self, GenError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![color; len],
        })
    }

    /// Wraps a packed `RGBRGB...` byte buffer.
    ///
    /// Returns `GenError::InvalidDimensions` if the buffer length is not
    /// `width * height * 3`.
    pub fn from_rgb_bytes(width: usize, height: usize, bytes: &[u8]) -> Result<Self, GenError> {
        let len = checked_len(width, height)?;
        if bytes.len() != len * 3 {
            return Err(GenError::InvalidDimensions);
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixel slice.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the canvas.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Writes one pixel; coordinates outside the canvas are ignored.
    #[inline]
    pub fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.pixels[idx] = color;
    }

    /// Fills the axis-aligned rectangle `[x, x + w) × [y, y + h)`, clipped.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        if x >= x_end {
            return;
        }
        for row in y..y_end {
            let start = row * self.width;
            self.pixels[start + x..start + x_end].fill(color);
        }
    }

    /// Draws a straight segment between two points in pixel space.
    ///
    /// Endpoints are rounded to the nearest pixel. A `thickness` of 1 (or 0)
    /// produces a one-pixel Bresenham line; larger values fill the rectangle
    /// of that width centred on the segment.
    pub fn draw_line(&mut self, from: DVec2, to: DVec2, thickness: u32, color: Rgb) {
        if !(from.is_finite() && to.is_finite()) {
            return;
        }
        if thickness <= 1 {
            self.bresenham(
                from.x.round() as i64,
                from.y.round() as i64,
                to.x.round() as i64,
                to.y.round() as i64,
                color,
            );
        } else {
            self.thick_segment(from, to, f64::from(thickness) / 2.0, color);
        }
    }

    /// Draws a connected path through `points`.
    pub fn draw_polyline(&mut self, points: &[DVec2], thickness: u32, color: Rgb) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], thickness, color);
        }
    }

    /// Packed `RGBRGB...` bytes, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_array()).collect()
    }

    fn bresenham(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb) {
        let (w, h) = (self.width as i64, self.height as i64);
        if x0.max(x1) < 0 || y0.max(y1) < 0 || x0.min(x1) >= w || y0.min(y1) >= h {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.put(x, y, color);
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

    /// Scanline fill of the quad swept by a segment of half-width `half`.
    fn thick_segment(&mut self, from: DVec2, to: DVec2, half: f64, color: Rgb) {
        let dir = to - from;
        let normal = match dir.try_normalize() {
            Some(d) => d.perp() * half,
            // Zero-length segment: stamp a square brush.
            None => {
                let side = (half * 2.0).round().max(1.0) as i64;
                let x0 = (from.x - half).round() as i64;
                let y0 = (from.y - half).round() as i64;
                let (x_start, x_end) = (x0.max(0), (x0 + side).min(self.width as i64));
                let (y_start, y_end) = (y0.max(0), (y0 + side).min(self.height as i64));
                if x_start >= x_end || y_start >= y_end {
                    return;
                }
                self.fill_rect(
                    x_start as usize,
                    y_start as usize,
                    (x_end - x_start) as usize,
                    (y_end - y_start) as usize,
                    color,
                );
                return;
            }
        };
        let quad = [from + normal, to + normal, to - normal, from - normal];
        self.fill_convex(&quad, color);
    }

    /// Fills a convex polygon, sampling pixel centres (half-open on the
    /// bottom and right edges).
    fn fill_convex(&mut self, poly: &[DVec2], color: Rgb) {
        let min_y = poly.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = poly.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let first_row = (min_y - 0.5).ceil().max(0.0) as i64;
        let last_row = ((max_y - 0.5).ceil() - 1.0).min(self.height as f64 - 1.0) as i64;

        for row in first_row..=last_row {
            let yc = row as f64 + 0.5;
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for i in 0..poly.len() {
                let a = poly[i];
                let b = poly[(i + 1) % poly.len()];
                let (top, bottom) = if a.y <= b.y { (a, b) } else { (b, a) };
                if yc < top.y || yc > bottom.y || top.y == bottom.y {
                    continue;
                }
                let t = (yc - top.y) / (bottom.y - top.y);
                let x = top.x + t * (bottom.x - top.x);
                lo = lo.min(x);
                hi = hi.max(x);
            }
            if lo > hi {
                continue;
            }
            let first_col = (lo - 0.5).ceil().max(0.0);
            let last_col = ((hi - 0.5).ceil() - 1.0).min(self.width as f64 - 1.0);
            if first_col > last_col {
                continue;
            }
            let start = row as usize * self.width;
            self.pixels[start + first_col as usize..=start + last_col as usize].fill(color);
        }
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, GenError> {
    if width == 0 || height == 0 {
        return Err(GenError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(GenError::InvalidDimensions)
}
