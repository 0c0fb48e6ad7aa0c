#![deny(unsafe_code)]
//! Core types and traits for the art-forge procedural image generators.
//!
//! Provides the `Generator` trait, the RGB `Canvas` with its line
//! rasterizer, `Rgb`, the injectable `Xorshift64` PRNG, `CancelToken`,
//! angle/ring geometry, validated parameter descriptors, and `Recipe`.

pub mod cancel;
pub mod canvas;
pub mod color;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod params;
pub mod prng;
pub mod recipe;

pub use cancel::CancelToken;
pub use canvas::Canvas;
pub use color::Rgb;
pub use error::GenError;
pub use generator::Generator;
pub use prng::Xorshift64;
pub use recipe::Recipe;
