use art_forge_core::error::GenError;
use art_forge_core::params::{schema_of, BoolParam, IntParam};
use art_forge_core::{CancelToken, Canvas, Generator, Rgb, Xorshift64};
use log::{debug, warn};
use serde_json::Value;

use crate::{RingLayout, Segment, BLUE, GREEN, IN_RATIO, OUT_RATIO, RED, SHIFT};

const LINE_NUMBER: IntParam = IntParam::new("line_number", 2000, 1, 100_000, "Number of rays");
const SIZE: IntParam = IntParam::new("size", 1080, 1, 10_000, "Image size (px)");
const LINE_THICKNESS: IntParam = IntParam::new("line_thickness", 1, 1, 64, "Line thickness");
const MAX_VAR_OUT: IntParam = IntParam::new(
    "max_var_out",
    300,
    0,
    100_000,
    "Max index jitter for the outer endpoint",
);
const MAX_VAR_IN: IntParam = IntParam::new(
    "max_var_in",
    300,
    0,
    100_000,
    "Max index jitter for the inner endpoint",
);
const RANDOM_COLOR: BoolParam = BoolParam::new(
    "random_color",
    false,
    "Accepted for compatibility; has no effect (every line uses r, g, b)",
);

/// Lines between cancellation checks.
const CANCEL_STRIDE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerturbedParams {
    pub layout: RingLayout,
    pub max_var_out: i64,
    pub max_var_in: i64,
    pub random_color: bool,
}

impl Default for PerturbedParams {
    fn default() -> Self {
        Self {
            layout: RingLayout {
                line_number: LINE_NUMBER.default as usize,
                size: SIZE.default as usize,
                shift: SHIFT.default,
                color: Rgb::new(255, 0, 0),
                line_thickness: LINE_THICKNESS.default as u32,
                in_ratio: IN_RATIO.default,
                out_ratio: OUT_RATIO.default,
            },
            max_var_out: MAX_VAR_OUT.default,
            max_var_in: MAX_VAR_IN.default,
            random_color: RANDOM_COLOR.default,
        }
    }
}

impl PerturbedParams {
    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Ok(Self {
            layout: RingLayout::read(params, &LINE_NUMBER, &SIZE, &LINE_THICKNESS)?,
            max_var_out: MAX_VAR_OUT.read(params)?,
            max_var_in: MAX_VAR_IN.read(params)?,
            random_color: RANDOM_COLOR.read(params)?,
        })
    }
}

pub fn param_schema() -> Value {
    schema_of(&[
        &LINE_NUMBER,
        &SIZE,
        &SHIFT,
        &RED,
        &GREEN,
        &BLUE,
        &LINE_THICKNESS,
        &IN_RATIO,
        &OUT_RATIO,
        &MAX_VAR_OUT,
        &MAX_VAR_IN,
        &RANDOM_COLOR,
    ])
}

/// Sun rays whose endpoints are picked at jittered ring positions.
///
/// Line `i` joins outer angle `A[(i + jo) mod N]` to inner angle
/// `B[(i + ji) mod N]`, with `jo` and `ji` drawn uniformly from
/// `[-max_var_out, max_var_out]` and `[-max_var_in, max_var_in]`. With both
/// maxima at 0 the result is exactly one ring of [`RingRays`](crate::RingRays).
pub struct PerturbedRingRays {
    params: PerturbedParams,
}

impl PerturbedRingRays {
    pub fn new(params: PerturbedParams) -> Result<Self, GenError> {
        params.layout.validate()?;
        for (name, value) in [
            (MAX_VAR_OUT.name, params.max_var_out),
            (MAX_VAR_IN.name, params.max_var_in),
        ] {
            if value < 0 {
                return Err(GenError::invalid(name, format!("must be >= 0, got {value}")));
            }
        }
        if params.random_color {
            warn!("random_sunray: random_color has no effect; lines use the fixed r, g, b color");
        }
        Ok(Self { params })
    }

    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Self::new(PerturbedParams::from_json(params)?)
    }

    pub fn layout(&self) -> &RingLayout {
        &self.params.layout
    }

    /// Draws the jitter for every line and returns the resulting rays.
    ///
    /// Per line the outer jitter is drawn before the inner one.
    pub fn segments(&self, rng: &mut Xorshift64) -> Vec<Segment> {
        let layout = &self.params.layout;
        let outer = layout.outer_angles();
        let inner = layout.inner_angles();
        let n = layout.line_number as i64;
        (0..n)
            .map(|i| {
                let jo = rng.next_int_inclusive(-self.params.max_var_out, self.params.max_var_out);
                let ji = rng.next_int_inclusive(-self.params.max_var_in, self.params.max_var_in);
                let a = outer[(i + jo).rem_euclid(n) as usize];
                let b = inner[(i + ji).rem_euclid(n) as usize];
                layout.segment(a, b)
            })
            .collect()
    }
}

impl Generator for PerturbedRingRays {
    fn name(&self) -> &'static str {
        "random-sunray"
    }

    fn render(&self, rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError> {
        let layout = &self.params.layout;
        let mut canvas = Canvas::new(layout.size, layout.size)?;
        let segments = self.segments(rng);
        for (i, seg) in segments.iter().enumerate() {
            if i % CANCEL_STRIDE == 0 {
                cancel.check()?;
            }
            canvas.draw_line(seg.outer, seg.inner, layout.line_thickness, layout.color);
        }
        debug!("random_sunray: drew {} lines", segments.len());
        Ok(canvas)
    }

    fn params(&self) -> Value {
        let mut json = self.params.layout.to_json();
        json["max_var_out"] = self.params.max_var_out.into();
        json["max_var_in"] = self.params.max_var_in.into();
        json["random_color"] = self.params.random_color.into();
        json
    }

    fn param_schema(&self) -> Value {
        param_schema()
    }

    fn file_prefix(&self) -> &'static str {
        "randsun"
    }
}
