#![deny(unsafe_code)]
//! Sun-ray patterns: straight chords joining an outer ring of points to an
//! inner ring.
//!
//! Both rings are sampled with `line_number` angles over `[0, 2π]`; the inner
//! ring's sequence is circularly shifted by `shift` positions before pairing,
//! which twists the rays into a vortex. [`RingRays`] draws the pattern
//! deterministically (optionally redrawn `ring_number` times);
//! [`PerturbedRingRays`] picks each line's endpoints at randomly jittered
//! positions on the rings, producing dense organic starbursts.

mod perturbed;
mod ring;

pub use perturbed::{param_schema as perturbed_schema, PerturbedParams, PerturbedRingRays};
pub use ring::{param_schema as ring_schema, RingRayParams, RingRays};

use art_forge_core::geometry::{circular_shift, full_turn, ring_point};
use art_forge_core::params::{FloatParam, IntParam};
use art_forge_core::{GenError, Rgb};
use glam::DVec2;
use serde_json::{json, Value};

/// Outer ring radius at `out_ratio = 1`, as a fraction of the canvas size.
const RADIUS_SCALE: f64 = 0.9;

const SHIFT: IntParam = IntParam::new(
    "shift",
    5,
    i64::MIN,
    i64::MAX,
    "Rotation offset between inner and outer rings (0 - line_number)",
);
const RED: IntParam = IntParam::new("r", 255, 0, 255, "Red value for line color");
const GREEN: IntParam = IntParam::new("g", 0, 0, 255, "Green value for line color");
const BLUE: IntParam = IntParam::new("b", 0, 0, 255, "Blue value for line color");
const IN_RATIO: FloatParam = FloatParam::new("in_ratio", 0.3, 0.0, 1.0, "Ratio for inner ring radius");
const OUT_RATIO: FloatParam =
    FloatParam::new("out_ratio", 1.0, 0.0, 1.0, "Ratio for outer ring radius");

/// One drawn ray, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub outer: DVec2,
    pub inner: DVec2,
}

/// Geometry shared by both ray generators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingLayout {
    pub line_number: usize,
    pub size: usize,
    pub shift: i64,
    pub color: Rgb,
    pub line_thickness: u32,
    pub in_ratio: f64,
    pub out_ratio: f64,
}

impl RingLayout {
    fn read(
        params: &Value,
        line_number: &IntParam,
        size: &IntParam,
        thickness: &IntParam,
    ) -> Result<Self, GenError> {
        Ok(Self {
            line_number: line_number.read_usize(params)?,
            size: size.read_usize(params)?,
            shift: SHIFT.read(params)?,
            color: Rgb::new(
                RED.read(params)? as u8,
                GREEN.read(params)? as u8,
                BLUE.read(params)? as u8,
            ),
            line_thickness: thickness.read(params)? as u32,
            in_ratio: IN_RATIO.read(params)?,
            out_ratio: OUT_RATIO.read(params)?,
        })
    }

    fn validate(&self) -> Result<(), GenError> {
        if self.line_number == 0 {
            return Err(GenError::invalid("line_number", "must be >= 1, got 0"));
        }
        if self.size == 0 {
            return Err(GenError::InvalidDimensions);
        }
        for (name, ratio) in [("in_ratio", self.in_ratio), ("out_ratio", self.out_ratio)] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(GenError::invalid(
                    name,
                    format!("must be between 0 and 1, got {ratio}"),
                ));
            }
        }
        Ok(())
    }

    fn to_json(self) -> Value {
        json!({
            "line_number": self.line_number,
            "size": self.size,
            "shift": self.shift,
            "r": self.color.r,
            "g": self.color.g,
            "b": self.color.b,
            "line_thickness": self.line_thickness,
            "in_ratio": self.in_ratio,
            "out_ratio": self.out_ratio,
        })
    }

    pub fn center(&self) -> DVec2 {
        DVec2::splat((self.size / 2) as f64)
    }

    pub fn max_radius(&self) -> f64 {
        RADIUS_SCALE * self.size as f64
    }

    /// Angle sequence of the outer endpoints.
    pub fn outer_angles(&self) -> Vec<f64> {
        full_turn(self.line_number)
    }

    /// Outer sequence circularly shifted by `shift`.
    pub fn inner_angles(&self) -> Vec<f64> {
        circular_shift(&self.outer_angles(), self.shift)
    }

    pub fn segment(&self, outer_angle: f64, inner_angle: f64) -> Segment {
        let center = self.center();
        let r = self.max_radius();
        Segment {
            outer: ring_point(center, self.out_ratio * r, outer_angle),
            inner: ring_point(center, self.in_ratio * r, inner_angle),
        }
    }
}
