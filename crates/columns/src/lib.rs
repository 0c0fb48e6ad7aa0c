#![deny(unsafe_code)]
//! Stochastic color columns.
//!
//! The canvas is cut into vertical strips `column_width` pixels wide. Each
//! strip starts from a base color and random-walks down the rows: per row,
//! every channel draws a uniform integer in `[0, var_total)`, darkens by
//! `increment` when the draw is below the dark threshold and lightens when it
//! is above `var_total - light_threshold`. The walk restarts at the top of
//! every strip. With `random_variation > 0` the two thresholds random-walk as
//! well, and they carry over from strip to strip for the whole render.
//!
//! Channel state is kept as unbounded integers and only clamped to [0, 255]
//! when written, so a channel that drifts below 0 must climb back above 0
//! before it becomes visible again.

use art_forge_core::error::GenError;
use art_forge_core::params::{schema_of, BoolParam, IntParam, TextParam};
use art_forge_core::{CancelToken, Canvas, Generator, Rgb, Xorshift64};
use log::debug;
use serde_json::{json, Value};

const WIDTH: IntParam = IntParam::new("width", 1920, 1, 16_384, "Width of image (px)");
const HEIGHT: IntParam = IntParam::new("height", 1080, 1, 16_384, "Height of image (px)");
const COLUMN_WIDTH: IntParam = IntParam::new("column_width", 10, 1, 16_384, "Width of each column");
const INCREMENT: IntParam = IntParam::new("increment", 1, 1, 255, "Amount a channel changes per step");
const DARK: IntParam = IntParam::new(
    "dark_variation",
    10,
    0,
    1_000_000,
    "Chance of darkening (draws below this darken)",
);
const LIGHT: IntParam = IntParam::new(
    "light_variation",
    10,
    0,
    1_000_000,
    "Chance of brightening (draws above var_total minus this lighten)",
);
const VAR_TOTAL: IntParam = IntParam::new("var_total", 100, 1, 1_000_000, "Random scale total");
const RED: IntParam = IntParam::new("r", 127, 0, 255, "Starting red value");
const GREEN: IntParam = IntParam::new("g", 127, 0, 255, "Starting green value");
const BLUE: IntParam = IntParam::new("b", 127, 0, 255, "Starting blue value");
const RANDOM_START: BoolParam =
    BoolParam::new("random_start", false, "Draw a random start color for every column");
const RANDOM_VARIATION: IntParam = IntParam::new(
    "random_variation",
    0,
    0,
    1_000_000,
    "Per-row jitter applied to both thresholds",
);
const NAME: TextParam = TextParam::new("name", false, "Custom output file name (without .png)");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnParams {
    pub width: usize,
    pub height: usize,
    pub column_width: usize,
    pub increment: i64,
    pub dark_variation: i64,
    pub light_variation: i64,
    pub var_total: i64,
    pub start: Rgb,
    pub random_start: bool,
    pub random_variation: i64,
    pub name: Option<String>,
}

impl Default for ColumnParams {
    fn default() -> Self {
        Self {
            width: WIDTH.default as usize,
            height: HEIGHT.default as usize,
            column_width: COLUMN_WIDTH.default as usize,
            increment: INCREMENT.default,
            dark_variation: DARK.default,
            light_variation: LIGHT.default,
            var_total: VAR_TOTAL.default,
            start: Rgb::new(127, 127, 127),
            random_start: RANDOM_START.default,
            random_variation: RANDOM_VARIATION.default,
            name: None,
        }
    }
}

impl ColumnParams {
    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Ok(Self {
            width: WIDTH.read_usize(params)?,
            height: HEIGHT.read_usize(params)?,
            column_width: COLUMN_WIDTH.read_usize(params)?,
            increment: INCREMENT.read(params)?,
            dark_variation: DARK.read(params)?,
            light_variation: LIGHT.read(params)?,
            var_total: VAR_TOTAL.read(params)?,
            start: Rgb::new(
                RED.read(params)? as u8,
                GREEN.read(params)? as u8,
                BLUE.read(params)? as u8,
            ),
            random_start: RANDOM_START.read(params)?,
            random_variation: RANDOM_VARIATION.read(params)?,
            name: NAME.read(params)?,
        })
    }

    /// Number of whole columns; the right-hand remainder is left black.
    pub fn column_count(&self) -> usize {
        self.width / self.column_width
    }
}

pub fn param_schema() -> Value {
    schema_of(&[
        &WIDTH,
        &HEIGHT,
        &COLUMN_WIDTH,
        &INCREMENT,
        &DARK,
        &LIGHT,
        &VAR_TOTAL,
        &RED,
        &GREEN,
        &BLUE,
        &RANDOM_START,
        &RANDOM_VARIATION,
        &NAME,
    ])
}

/// Running color plus the (possibly drifting) thresholds of one render.
#[derive(Debug, Clone)]
pub struct ColumnWalk {
    color: [i64; 3],
    dark: i64,
    light: i64,
    increment: i64,
    var_total: i64,
    jitter: i64,
}

impl ColumnWalk {
    pub fn new(params: &ColumnParams) -> Self {
        Self {
            color: channels(params.start),
            dark: params.dark_variation,
            light: params.light_variation,
            increment: params.increment,
            var_total: params.var_total,
            jitter: params.random_variation,
        }
    }

    /// Restarts the running color at the top of a column. Thresholds keep
    /// whatever drift they have accumulated.
    pub fn reset(&mut self, start: [i64; 3]) {
        self.color = start;
    }

    /// Advances one row and returns the unclamped running color.
    pub fn step(&mut self, rng: &mut Xorshift64) -> [i64; 3] {
        if self.jitter > 0 {
            self.dark += rng.next_int(-self.jitter, self.jitter);
            self.light += rng.next_int(-self.jitter, self.jitter);
        }
        let draws = [
            rng.next_int(0, self.var_total),
            rng.next_int(0, self.var_total),
            rng.next_int(0, self.var_total),
        ];
        for (channel, draw) in self.color.iter_mut().zip(draws) {
            if draw < self.dark {
                *channel -= self.increment;
            }
            if draw > self.var_total - self.light {
                *channel += self.increment;
            }
        }
        self.color
    }

    pub fn thresholds(&self) -> (i64, i64) {
        (self.dark, self.light)
    }
}

pub struct StochasticColumns {
    params: ColumnParams,
}

impl StochasticColumns {
    /// Returns `GenError::InvalidDimensions` for a zero-sized canvas and
    /// `GenError::InvalidParameter` for a zero column width or `var_total`.
    pub fn new(params: ColumnParams) -> Result<Self, GenError> {
        if params.width == 0 || params.height == 0 {
            return Err(GenError::InvalidDimensions);
        }
        if params.column_width == 0 {
            return Err(GenError::invalid(COLUMN_WIDTH.name, "must be >= 1, got 0"));
        }
        if params.var_total < 1 {
            return Err(GenError::invalid(
                VAR_TOTAL.name,
                format!("must be >= 1, got {}", params.var_total),
            ));
        }
        Ok(Self { params })
    }

    pub fn from_json(params: &Value) -> Result<Self, GenError> {
        Self::new(ColumnParams::from_json(params)?)
    }
}

impl Generator for StochasticColumns {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn render(&self, rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError> {
        let p = &self.params;
        let mut canvas = Canvas::new(p.width, p.height)?;
        let mut walk = ColumnWalk::new(p);
        let columns = p.column_count();

        for col in 0..columns {
            cancel.check()?;
            debug!(
                "columns: progress {:.2}%",
                col as f64 * 100.0 / columns as f64
            );
            let start = if p.random_start {
                [rng.next_int(0, 256), rng.next_int(0, 256), rng.next_int(0, 256)]
            } else {
                channels(p.start)
            };
            walk.reset(start);
            let x = col * p.column_width;
            for y in 0..p.height {
                let [r, g, b] = walk.step(rng);
                canvas.fill_rect(x, y, p.column_width, 1, Rgb::from_channels_clamped(r, g, b));
            }
        }
        Ok(canvas)
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "width": p.width,
            "height": p.height,
            "column_width": p.column_width,
            "increment": p.increment,
            "dark_variation": p.dark_variation,
            "light_variation": p.light_variation,
            "var_total": p.var_total,
            "r": p.start.r,
            "g": p.start.g,
            "b": p.start.b,
            "random_start": p.random_start,
            "random_variation": p.random_variation,
            "name": p.name,
        })
    }

    fn param_schema(&self) -> Value {
        param_schema()
    }

    fn file_prefix(&self) -> &'static str {
        "colorcolumn"
    }

    fn custom_stem(&self) -> Option<&str> {
        self.params.name.as_deref()
    }
}

fn channels(c: Rgb) -> [i64; 3] {
    [i64::from(c.r), i64::from(c.g), i64::from(c.b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(overrides: Value) -> StochasticColumns {
        let mut params = json!({"width": 40, "height": 30, "column_width": 5});
        for (k, v) in overrides.as_object().unwrap() {
            params[k] = v.clone();
        }
        StochasticColumns::from_json(&params).unwrap()
    }

    fn render(gen: &StochasticColumns, seed: u64) -> Canvas {
        gen.render(&mut Xorshift64::new(seed), &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn frozen_walk_keeps_start_color_everywhere() {
        let gen = small(json!({
            "var_total": 1, "dark_variation": 0, "light_variation": 0,
            "r": 12, "g": 200, "b": 99,
        }));
        let c = render(&gen, 42);
        assert!(c.pixels().iter().all(|&p| p == Rgb::new(12, 200, 99)));
    }

    #[test]
    fn remainder_columns_stay_black() {
        let gen = small(json!({"width": 23, "column_width": 5}));
        let c = render(&gen, 1);
        for y in 0..30 {
            for x in 20..23 {
                assert_eq!(c.get(x, y), Some(Rgb::BLACK), "({x}, {y})");
            }
        }
        assert_ne!(c.get(0, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn column_wider_than_canvas_renders_nothing() {
        let gen = small(json!({"width": 4, "column_width": 5}));
        assert!(render(&gen, 3).pixels().iter().all(|&p| p == Rgb::BLACK));
    }

    #[test]
    fn every_pixel_of_a_strip_row_matches() {
        let c = render(&small(json!({})), 9);
        for y in 0..30 {
            for col in 0..8 {
                let first = c.get(col * 5, y);
                for dx in 1..5 {
                    assert_eq!(c.get(col * 5 + dx, y), first);
                }
            }
        }
    }

    #[test]
    fn always_dark_walks_down_by_increment() {
        // Every draw in [0, 10) is below 10, none exceeds 10 - 0.
        let gen = small(json!({
            "var_total": 10, "dark_variation": 10, "light_variation": 0,
            "increment": 3, "r": 200, "g": 200, "b": 200,
        }));
        let c = render(&gen, 5);
        assert_eq!(c.get(0, 0), Some(Rgb::new(197, 197, 197)));
        assert_eq!(c.get(0, 9), Some(Rgb::new(170, 170, 170)));
    }

    #[test]
    fn always_light_walks_up_and_clamps_at_write() {
        let gen = small(json!({
            "var_total": 10, "dark_variation": 0, "light_variation": 11,
            "increment": 10, "r": 200, "g": 0, "b": 250,
        }));
        let c = render(&gen, 5);
        assert_eq!(c.get(0, 0), Some(Rgb::new(210, 10, 255)));
        assert_eq!(c.get(0, 29), Some(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn running_state_is_not_clamped() {
        let params = ColumnParams {
            var_total: 10,
            dark_variation: 10,
            light_variation: 0,
            increment: 50,
            start: Rgb::new(20, 20, 20),
            ..ColumnParams::default()
        };
        let mut walk = ColumnWalk::new(&params);
        let mut rng = Xorshift64::new(1);
        walk.step(&mut rng);
        let state = walk.step(&mut rng);
        assert_eq!(state, [-80, -80, -80]);
    }

    #[test]
    fn columns_restart_from_the_start_color() {
        let gen = small(json!({
            "var_total": 10, "dark_variation": 10, "light_variation": 0,
            "r": 100, "g": 100, "b": 100,
        }));
        let c = render(&gen, 2);
        for col in 0..8 {
            assert_eq!(c.get(col * 5, 0), Some(Rgb::new(99, 99, 99)));
        }
    }

    #[test]
    fn thresholds_drift_only_with_random_variation() {
        let mut rng = Xorshift64::new(77);
        let mut still = ColumnWalk::new(&ColumnParams::default());
        for _ in 0..100 {
            still.step(&mut rng);
        }
        assert_eq!(still.thresholds(), (10, 10));

        let mut drifting = ColumnWalk::new(&ColumnParams {
            random_variation: 5,
            ..ColumnParams::default()
        });
        for _ in 0..100 {
            drifting.step(&mut rng);
        }
        assert_ne!(drifting.thresholds(), (10, 10));
    }

    #[test]
    fn random_start_varies_between_columns() {
        let gen = small(json!({
            "random_start": true, "var_total": 1, "dark_variation": 0, "light_variation": 0,
        }));
        let c = render(&gen, 1234);
        let tops: std::collections::HashSet<Rgb> =
            (0..8).map(|col| c.get(col * 5, 0).unwrap()).collect();
        assert!(tops.len() > 1, "all columns started alike: {tops:?}");
    }

    #[test]
    fn same_seed_same_image_different_seed_differs() {
        let gen = small(json!({"random_variation": 2}));
        assert_eq!(render(&gen, 10), render(&gen, 10));
        assert_ne!(render(&gen, 10), render(&gen, 11));
    }

    #[test]
    fn custom_name_becomes_stem() {
        assert_eq!(small(json!({"name": "stripes"})).custom_stem(), Some("stripes"));
        assert_eq!(small(json!({})).custom_stem(), None);
    }

    #[test]
    fn invalid_parameters_are_rejected_before_rendering() {
        for bad in [
            json!({"width": -10}),
            json!({"height": 0}),
            json!({"column_width": 0}),
            json!({"var_total": 0}),
            json!({"r": 256}),
            json!({"random_start": "yes"}),
        ] {
            assert!(StochasticColumns::from_json(&bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn cancelled_render_returns_error() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = small(json!({})).render(&mut Xorshift64::new(1), &cancel);
        assert!(matches!(result, Err(GenError::Cancelled)));
    }

    #[test]
    fn schema_covers_every_param() {
        let gen = small(json!({}));
        let schema = gen.param_schema();
        for key in gen.params().as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn deterministic_for_any_seed(seed: u64, cw in 1_usize..12) {
                let gen = StochasticColumns::new(ColumnParams {
                    width: 30,
                    height: 20,
                    column_width: cw,
                    random_variation: 1,
                    ..ColumnParams::default()
                }).unwrap();
                let cancel = CancelToken::new();
                let a = gen.render(&mut Xorshift64::new(seed), &cancel).unwrap();
                let b = gen.render(&mut Xorshift64::new(seed), &cancel).unwrap();
                prop_assert_eq!(a, b);
            }

            #[test]
            fn frozen_walk_for_any_start(seed: u64, r: u8, g: u8, b: u8) {
                let gen = StochasticColumns::new(ColumnParams {
                    width: 12,
                    height: 12,
                    column_width: 3,
                    var_total: 1,
                    dark_variation: 0,
                    light_variation: 0,
                    start: Rgb::new(r, g, b),
                    ..ColumnParams::default()
                }).unwrap();
                let c = gen.render(&mut Xorshift64::new(seed), &CancelToken::new()).unwrap();
                prop_assert!(c.pixels().iter().all(|&p| p == Rgb::new(r, g, b)));
            }
        }
    }
}
