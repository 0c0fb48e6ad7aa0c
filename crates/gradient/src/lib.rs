#![deny(unsafe_code)]
//! Linear gradient field.
//!
//! Red ramps from 0 to 255 across the columns, green ramps from 0 to 255 down
//! the rows, and blue stays at 0, giving a black-to-yellow wash. Each axis is
//! sampled as `linspace(0, 256, n)` and the channel value is
//! `trunc(sample - 1)` clamped into a byte, which is why the first column
//! and row are 0 and the last ones are 255.

use art_forge_core::error::GenError;
use art_forge_core::geometry::linspace;
use art_forge_core::params::{schema_of, IntParam};
use art_forge_core::{CancelToken, Canvas, Generator, Rgb, Xorshift64};
use serde_json::{json, Value};

const WIDTH: IntParam = IntParam::new("width", 800, 1, 16_384, "Width of the image in pixels");
const HEIGHT: IntParam = IntParam::new("height", 600, 1, 16_384, "Height of the image in pixels");

/// Upper end of the per-axis ramp before the `- 1` offset.
const RAMP_END: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientParams {
    pub width: usize,
    pub height: usize,
}

impl Default for GradientParams {
    fn default() -> Self {
        Self {
            width: WIDTH.default as usize,
            height: HEIGHT.default as usize,
        }
    }
}

impl GradientParams {
    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Ok(Self {
            width: WIDTH.read_usize(params)?,
            height: HEIGHT.read_usize(params)?,
        })
    }
}

/// Parameter schema, available without constructing the generator.
pub fn param_schema() -> Value {
    schema_of(&[&WIDTH, &HEIGHT])
}

/// Deterministic two-axis gradient.
pub struct LinearGradient {
    params: GradientParams,
}

impl LinearGradient {
    /// Returns `GenError::InvalidDimensions` if either side is zero.
    pub fn new(params: GradientParams) -> Result<Self, GenError> {
        if params.width == 0 || params.height == 0 {
            return Err(GenError::InvalidDimensions);
        }
        Ok(Self { params })
    }

    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Self::new(GradientParams::from_json(params)?)
    }

    /// Renders without needing a PRNG; the gradient has no randomness.
    pub fn canvas(&self) -> Result<Canvas, GenError> {
        let GradientParams { width, height } = self.params;
        let reds = ramp(width);
        let greens = ramp(height);
        let mut canvas = Canvas::new(width, height)?;
        for (y, &g) in greens.iter().enumerate() {
            for (x, &r) in reds.iter().enumerate() {
                canvas.put(x as i64, y as i64, Rgb::new(r, g, 0));
            }
        }
        Ok(canvas)
    }
}

impl Generator for LinearGradient {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn render(&self, _rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError> {
        cancel.check()?;
        self.canvas()
    }

    fn params(&self) -> Value {
        json!({
            "width": self.params.width,
            "height": self.params.height,
        })
    }

    fn param_schema(&self) -> Value {
        param_schema()
    }

    fn file_prefix(&self) -> &'static str {
        "gradient"
    }
}

/// Channel values along one axis of `len` pixels.
fn ramp(len: usize) -> Vec<u8> {
    linspace(0.0, RAMP_END, len)
        .into_iter()
        .map(|v| ((v - 1.0) as i64).clamp(0, 255) as u8)
        .collect()
}
