#![deny(unsafe_code)]
//! Generator registry: maps generator names to implementations, plus the
//! I/O the pure generators leave out (PNG load/save, output naming, run
//! history).
//!
//! This crate sits between `art-forge-core` and the individual generator
//! crates. Dispatch is a closed enum with exhaustive matches; there is no
//! lookup by reflection.

pub mod history;
pub mod naming;
pub mod snapshot;

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use art_forge_columns::StochasticColumns;
use art_forge_core::error::GenError;
use art_forge_core::{CancelToken, Canvas, Generator, Xorshift64};
use art_forge_gradient::LinearGradient;
use art_forge_mesh::PolygonMesh;
use art_forge_mosaic::{BlockMosaic, MosaicParams};
use art_forge_sunray::{PerturbedRingRays, RingRays};
use serde_json::Value;

/// All generator names with a one-line description, in menu order.
const GENERATORS: &[(&str, &str)] = &[
    (
        "mesh",
        "Mandala-like figure from every point-to-point connection on a polygon",
    ),
    ("gradient", "Smooth linear gradient from black to yellow"),
    (
        "columns",
        "Color columns whose RGB values random-walk down the image",
    ),
    (
        "sunray",
        "Symmetrical rays between two concentric rings of points",
    ),
    (
        "random-sunray",
        "Like sunray, with random jitter on both ends of every ray",
    ),
    ("mosaic", "Pixelates an image into blocks of their average color"),
];

/// Every available generator.
pub enum GeneratorKind {
    Mesh(PolygonMesh),
    Gradient(LinearGradient),
    Columns(StochasticColumns),
    Sunray(RingRays),
    RandomSunray(PerturbedRingRays),
    Mosaic(BlockMosaic),
}

impl GeneratorKind {
    /// Constructs and validates a generator by name.
    ///
    /// Every parameter is checked here, before any pixel work. For `mosaic`
    /// the `source` image is also loaded, so decode errors surface here too.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, GenError> {
        Ok(match name {
            "mesh" => GeneratorKind::Mesh(PolygonMesh::from_json(params)?),
            "gradient" => GeneratorKind::Gradient(LinearGradient::from_json(params)?),
            "columns" => GeneratorKind::Columns(StochasticColumns::from_json(params)?),
            "sunray" => GeneratorKind::Sunray(RingRays::from_json(params)?),
            "random-sunray" => GeneratorKind::RandomSunray(PerturbedRingRays::from_json(params)?),
            "mosaic" => {
                let params = MosaicParams::from_json(params)?;
                let source = snapshot::load_rgb(Path::new(&params.source))?;
                GeneratorKind::Mosaic(BlockMosaic::new(params, source)?)
            }
            _ => return Err(GenError::UnknownGenerator(name.to_string())),
        })
    }

    /// Returns all recognized generator names.
    pub fn list_generators() -> Vec<&'static str> {
        GENERATORS.iter().map(|(name, _)| *name).collect()
    }

    /// One-line description of a generator.
    pub fn describe(name: &str) -> Option<&'static str> {
        GENERATORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, desc)| *desc)
    }

    /// Parameter schema by name, without constructing the generator.
    pub fn schema_for(name: &str) -> Result<Value, GenError> {
        Ok(match name {
            "mesh" => art_forge_mesh::param_schema(),
            "gradient" => art_forge_gradient::param_schema(),
            "columns" => art_forge_columns::param_schema(),
            "sunray" => art_forge_sunray::ring_schema(),
            "random-sunray" => art_forge_sunray::perturbed_schema(),
            "mosaic" => art_forge_mosaic::param_schema(),
            _ => return Err(GenError::UnknownGenerator(name.to_string())),
        })
    }

    fn inner(&self) -> &dyn Generator {
        match self {
            GeneratorKind::Mesh(g) => g,
            GeneratorKind::Gradient(g) => g,
            GeneratorKind::Columns(g) => g,
            GeneratorKind::Sunray(g) => g,
            GeneratorKind::RandomSunray(g) => g,
            GeneratorKind::Mosaic(g) => g,
        }
    }
}

impl Generator for GeneratorKind {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn render(&self, rng: &mut Xorshift64, cancel: &CancelToken) -> Result<Canvas, GenError> {
        self.inner().render(rng, cancel)
    }

    fn params(&self) -> Value {
        self.inner().params()
    }

    fn param_schema(&self) -> Value {
        self.inner().param_schema()
    }

    fn file_prefix(&self) -> &'static str {
        self.inner().file_prefix()
    }

    fn custom_stem(&self) -> Option<&str> {
        self.inner().custom_stem()
    }
}

/// Seed for runs where the caller asked for none: wall-clock nanoseconds.
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use art_forge_core::Rgb;
    use serde_json::json;

    fn render(gen: &GeneratorKind, seed: u64) -> Canvas {
        gen.render(&mut Xorshift64::new(seed), &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn every_listed_generator_has_a_schema_and_description() {
        for name in GeneratorKind::list_generators() {
            let schema = GeneratorKind::schema_for(name).unwrap();
            assert!(schema.as_object().is_some_and(|o| !o.is_empty()), "{name}");
            assert!(GeneratorKind::describe(name).is_some(), "{name}");
        }
    }

    #[test]
    fn from_name_builds_each_synthesizing_generator() {
        let cases = [
            ("mesh", json!({"points": 6, "size": 64})),
            ("gradient", json!({"width": 16, "height": 8})),
            ("columns", json!({"width": 20, "height": 10, "column_width": 4})),
            ("sunray", json!({"size": 64, "line_number": 10})),
            ("random-sunray", json!({"size": 64, "line_number": 100})),
        ];
        for (name, params) in cases {
            let gen = GeneratorKind::from_name(name, &params).unwrap();
            assert_eq!(gen.name(), name);
            let canvas = render(&gen, 1);
            assert!(canvas.width() > 0);
        }
    }

    #[test]
    fn from_name_unknown_returns_error() {
        let result = GeneratorKind::from_name("maxlines", &json!({}));
        assert!(matches!(result, Err(GenError::UnknownGenerator(_))));
        assert!(GeneratorKind::schema_for("nope").is_err());
    }

    #[test]
    fn from_name_propagates_invalid_parameters() {
        let result = GeneratorKind::from_name("sunray", &json!({"line_number": 0}));
        assert!(matches!(result, Err(GenError::InvalidParameter { .. })));
        let result = GeneratorKind::from_name("gradient", &json!({"width": -3}));
        assert!(matches!(result, Err(GenError::InvalidParameter { .. })));
    }

    #[test]
    fn mosaic_loads_its_source_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("src.png");
        let source = Canvas::filled(25, 14, Rgb::new(9, 8, 7)).unwrap();
        snapshot::write_png(&source, &path).unwrap();

        let params = json!({"source": path.to_str().unwrap(), "block_size": 4});
        let gen = GeneratorKind::from_name("mosaic", &params).unwrap();
        let out = render(&gen, 0);
        assert_eq!((out.width(), out.height()), (24, 12));
        assert!(out.pixels().iter().all(|&p| p == Rgb::new(9, 8, 7)));
    }

    #[test]
    fn mosaic_missing_source_is_a_decode_error() {
        let params = json!({"source": "/definitely/not/here.png"});
        let result = GeneratorKind::from_name("mosaic", &params);
        assert!(matches!(result, Err(GenError::Decode(_))));
    }

    #[test]
    fn delegation_preserves_custom_stem_and_prefix() {
        let gen = GeneratorKind::from_name("columns", &json!({"name": "stripes"})).unwrap();
        assert_eq!(gen.custom_stem(), Some("stripes"));
        assert_eq!(gen.file_prefix(), "colorcolumn");
        assert_eq!(gen.params()["name"], "stripes");
    }

    #[test]
    fn determinism_same_seed() {
        let params = json!({"width": 30, "height": 20, "column_width": 3, "random_start": true});
        let gen = GeneratorKind::from_name("columns", &params).unwrap();
        assert_eq!(render(&gen, 99), render(&gen, 99));
    }

    #[test]
    fn object_safety() {
        let gen = GeneratorKind::from_name("gradient", &json!({"width": 4, "height": 4})).unwrap();
        let boxed: Box<dyn Generator> = Box::new(gen);
        assert_eq!(boxed.param_schema()["width"]["type"], "integer");
    }

    #[test]
    fn clock_seed_changes_over_time() {
        let a = clock_seed();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert_ne!(a, clock_seed());
    }
}
