//! The `Generator` trait every pixel-synthesis algorithm implements.
//!
//! The trait is object-safe so the registry can hand out `&dyn Generator`
//! and callers can treat all generators uniformly.

use serde_json::Value;

use crate::cancel::CancelToken;
use crate::canvas::Canvas;
use crate::error::GenError;
use crate::prng::Xorshift64;

/// A self-contained image generator over an already-validated parameter set.
///
/// Construction (typically `from_json`) is where parameters are checked;
/// `render` assumes they are in range and only fails on cancellation or
/// resource errors.
pub trait Generator {
    /// Registry name, e.g. `"sunray"`.
    fn name(&self) -> &'static str;

    /// Synthesizes a fresh canvas.
    ///
    /// Deterministic generators ignore `rng`. Stochastic ones draw from it in
    /// a fixed order, so equal seeds give equal canvases.
    fn render(&self, rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError>;

    /// Current parameter values as a JSON object (the form recorded in the
    /// run history and accepted back by `from_json`).
    fn params(&self) -> Value;

    /// Schema describing every parameter's type, bounds, and default.
    fn param_schema(&self) -> Value;

    /// Prefix for timestamp-derived output names, e.g. `"mandala"`.
    fn file_prefix(&self) -> &'static str;

    /// Caller-chosen output stem overriding the timestamped name.
    fn custom_stem(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use serde_json::json;

    /// Minimal generator used to verify trait object safety.
    struct Solid {
        size: usize,
    }

    impl Generator for Solid {
        fn name(&self) -> &'static str {
            "solid"
        }

        fn render(&self, rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError> {
            cancel.check()?;
            let shade = rng.next_below(256) as u8;
            Canvas::filled(self.size, self.size, Rgb::new(shade, shade, shade))
        }

        fn params(&self) -> Value {
            json!({"size": self.size})
        }

        fn param_schema(&self) -> Value {
            json!({"size": {"type": "integer", "default": 4, "description": "Edge length"}})
        }

        fn file_prefix(&self) -> &'static str {
            "solid"
        }
    }

    #[test]
    fn generator_trait_is_object_safe() {
        let gen: Box<dyn Generator> = Box::new(Solid { size: 4 });
        let canvas = gen
            .render(&mut Xorshift64::new(1), &CancelToken::new())
            .unwrap();
        assert_eq!(canvas.width(), 4);
        assert_eq!(gen.name(), "solid");
    }

    #[test]
    fn default_custom_stem_is_none() {
        assert!(Solid { size: 2 }.custom_stem().is_none());
    }

    #[test]
    fn same_seed_same_canvas_through_dyn() {
        let gen: &dyn Generator = &Solid { size: 3 };
        let cancel = CancelToken::new();
        let a = gen.render(&mut Xorshift64::new(9), &cancel).unwrap();
        let b = gen.render(&mut Xorshift64::new(9), &cancel).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn cancelled_token_stops_render() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result = Solid { size: 2 }.render(&mut Xorshift64::new(1), &cancel);
        assert!(matches!(result, Err(GenError::Cancelled)));
    }

    #[test]
    fn params_reflect_state() {
        assert_eq!(Solid { size: 7 }.params()["size"], 7);
    }
}
