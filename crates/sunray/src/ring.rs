use art_forge_core::error::GenError;
use art_forge_core::params::{schema_of, IntParam};
use art_forge_core::{CancelToken, Canvas, Generator, Xorshift64};
use serde_json::Value;

use crate::{RingLayout, Segment, BLUE, GREEN, IN_RATIO, OUT_RATIO, RED, SHIFT};

const LINE_NUMBER: IntParam = IntParam::new("line_number", 30, 1, 100_000, "Number of rays to draw");
const RING_NUMBER: IntParam =
    IntParam::new("ring_number", 1, 1, 64, "Number of times the ring pattern is drawn");
const SIZE: IntParam = IntParam::new("size", 1000, 1, 10_000, "Image size (px)");
const LINE_THICKNESS: IntParam = IntParam::new("line_thickness", 5, 1, 64, "Thickness of lines");

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingRayParams {
    pub layout: RingLayout,
    pub ring_number: usize,
}

impl Default for RingRayParams {
    fn default() -> Self {
        Self {
            layout: RingLayout {
                line_number: LINE_NUMBER.default as usize,
                size: SIZE.default as usize,
                shift: SHIFT.default,
                color: art_forge_core::Rgb::new(255, 0, 0),
                line_thickness: LINE_THICKNESS.default as u32,
                in_ratio: IN_RATIO.default,
                out_ratio: OUT_RATIO.default,
            },
            ring_number: RING_NUMBER.default as usize,
        }
    }
}

impl RingRayParams {
    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Ok(Self {
            layout: RingLayout::read(params, &LINE_NUMBER, &SIZE, &LINE_THICKNESS)?,
            ring_number: RING_NUMBER.read_usize(params)?,
        })
    }
}

pub fn param_schema() -> Value {
    schema_of(&[
        &LINE_NUMBER,
        &RING_NUMBER,
        &SIZE,
        &SHIFT,
        &RED,
        &GREEN,
        &BLUE,
        &LINE_THICKNESS,
        &IN_RATIO,
        &OUT_RATIO,
    ])
}

/// Deterministic sun rays: line `i` joins outer angle `A[i]` to inner angle
/// `B[i]`, where `B` is `A` shifted by `shift`.
pub struct RingRays {
    params: RingRayParams,
}

impl RingRays {
    pub fn new(params: RingRayParams) -> Result<Self, GenError> {
        params.layout.validate()?;
        if params.ring_number == 0 {
            return Err(GenError::invalid(RING_NUMBER.name, "must be >= 1, got 0"));
        }
        Ok(Self { params })
    }

    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Self::new(RingRayParams::from_json(params)?)
    }

    pub fn layout(&self) -> &RingLayout {
        &self.params.layout
    }

    /// The rays of a single ring, in drawing order.
    pub fn segments(&self) -> Vec<Segment> {
        let layout = &self.params.layout;
        layout
            .outer_angles()
            .into_iter()
            .zip(layout.inner_angles())
            .map(|(a, b)| layout.segment(a, b))
            .collect()
    }
}

impl Generator for RingRays {
    fn name(&self) -> &'static str {
        "sunray"
    }

    fn render(&self, _rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError> {
        let layout = &self.params.layout;
        let mut canvas = Canvas::new(layout.size, layout.size)?;
        for _ in 0..self.params.ring_number {
            cancel.check()?;
            for seg in self.segments() {
                canvas.draw_line(seg.outer, seg.inner, layout.line_thickness, layout.color);
            }
        }
        Ok(canvas)
    }

    fn params(&self) -> Value {
        let mut json = self.params.layout.to_json();
        json["ring_number"] = self.params.ring_number.into();
        json
    }

    fn param_schema(&self) -> Value {
        param_schema()
    }

    fn file_prefix(&self) -> &'static str {
        "sunray"
    }
}
