#![deny(unsafe_code)]
//! Polygon chord mesh: a dense mandala texture built from every pairing of
//! points on a circle.
//!
//! `points + 1` angles are sampled over `[0, 2π]` (the extra sample closes
//! the polygon on its starting vertex). The path then visits, for every
//! ordered pair `(a, b)` of angles, the point `(sin a, cos a)` followed by
//! `(sin b, cos b)`, and the whole sequence is stroked as one continuous
//! polyline. Because consecutive pairs share `a`, the pen keeps returning to
//! the same vertex and fans out to every other one; the overlapping hairline
//! strokes are what produce the moiré density.

use art_forge_core::error::GenError;
use art_forge_core::geometry::full_turn;
use art_forge_core::params::{schema_of, IntParam};
use art_forge_core::{CancelToken, Canvas, Generator, Rgb, Xorshift64};
use glam::DVec2;
use log::debug;
use serde_json::{json, Value};

const POINTS: IntParam = IntParam::new(
    "points",
    150,
    1,
    1000,
    "Number of polygon vertices (recommended 50-300)",
);
const SIZE: IntParam = IntParam::new("size", 2000, 16, 8000, "Square canvas edge in pixels");
const LINE_WIDTH: IntParam = IntParam::new("line_width", 1, 1, 10, "Stroke width in pixels");

/// Stroke color.
pub const INK: Rgb = Rgb::new(0x1f, 0x77, 0xb4);
/// Fraction of the data range left empty on each side of the plot.
const MARGIN: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshParams {
    pub points: usize,
    pub size: usize,
    pub line_width: u32,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            points: POINTS.default as usize,
            size: SIZE.default as usize,
            line_width: LINE_WIDTH.default as u32,
        }
    }
}

impl MeshParams {
    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Ok(Self {
            points: POINTS.read_usize(params)?,
            size: SIZE.read_usize(params)?,
            line_width: LINE_WIDTH.read(params)? as u32,
        })
    }
}

pub fn param_schema() -> Value {
    schema_of(&[&POINTS, &SIZE, &LINE_WIDTH])
}

pub struct PolygonMesh {
    params: MeshParams,
}

impl PolygonMesh {
    /// Returns `GenError::InvalidParameter` if `points` is 0, and
    /// `GenError::InvalidDimensions` for a zero-sized canvas.
    pub fn new(params: MeshParams) -> Result<Self, GenError> {
        if params.points == 0 {
            return Err(GenError::invalid(POINTS.name, "must be >= 1, got 0"));
        }
        if params.size == 0 {
            return Err(GenError::InvalidDimensions);
        }
        Ok(Self { params })
    }

    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Self::new(MeshParams::from_json(params)?)
    }

    /// The pen path in plot space (both axes in `[-1, 1]`, y up).
    ///
    /// Holds `2 * (points + 1)^2` vertices.
    pub fn path(&self) -> Vec<DVec2> {
        let angles = full_turn(self.params.points + 1);
        let mut path = Vec::with_capacity(2 * angles.len() * angles.len());
        for &a in &angles {
            for &b in &angles {
                path.push(DVec2::new(a.sin(), a.cos()));
                path.push(DVec2::new(b.sin(), b.cos()));
            }
        }
        path
    }

    /// Maps a plot-space point to pixel coordinates.
    fn to_pixel(&self, p: DVec2) -> DVec2 {
        let lo = -1.0 - 2.0 * MARGIN;
        let span = 2.0 * (1.0 + 2.0 * MARGIN);
        let extent = (self.params.size - 1) as f64;
        DVec2::new((p.x - lo) / span * extent, (-p.y - lo) / span * extent)
    }
}

impl Generator for PolygonMesh {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn render(&self, _rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError> {
        let size = self.params.size;
        let mut canvas = Canvas::filled(size, size, Rgb::WHITE)?;
        let path: Vec<DVec2> = self.path().into_iter().map(|p| self.to_pixel(p)).collect();
        let fan = 2 * (self.params.points + 1);

        // One fan per outer vertex; the extra vertex bridges into the next fan.
        for (i, chunk) in path.chunks(fan).enumerate() {
            cancel.check()?;
            let end = (chunk.len() + 1).min(path.len() - i * fan);
            let start = i * fan;
            canvas.draw_polyline(&path[start..start + end], self.params.line_width, INK);
        }
        debug!("mesh: stroked {} vertices", path.len());
        Ok(canvas)
    }

    fn params(&self) -> Value {
        json!({
            "points": self.params.points,
            "size": self.params.size,
            "line_width": self.params.line_width,
        })
    }

    fn param_schema(&self) -> Value {
        param_schema()
    }

    fn file_prefix(&self) -> &'static str {
        "mandala"
    }
}
