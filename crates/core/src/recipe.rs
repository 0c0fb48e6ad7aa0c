//! Reproducible description of a single render.
//!
//! A [`Recipe`] captures everything needed to recreate an image: generator
//! name, validated parameters, and PRNG seed. Feeding the same recipe to the
//! same binary produces a byte-identical canvas.

use serde::{Deserialize, Serialize};

use crate::error::GenError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub generator: String,
    pub params: serde_json::Value,
    pub seed: u64,
}

impl Recipe {
    /// Creates a recipe with an empty params object (all defaults).
    pub fn new(generator: &str, seed: u64) -> Self {
        Self {
            generator: generator.to_string(),
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
        }
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    /// Checks the shape of the recipe: a non-empty generator name and a JSON
    /// object for params. Value ranges are the generator's job.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.generator.trim().is_empty() {
            return Err(GenError::UnknownGenerator(self.generator.clone()));
        }
        if !self.params.is_object() {
            return Err(GenError::invalid("params", "must be a JSON object"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_has_empty_params() {
        let r = Recipe::new("gradient", 42);
        assert_eq!(r.generator, "gradient");
        assert_eq!(r.seed, 42);
        assert_eq!(r.params, json!({}));
    }

    #[test]
    fn json_round_trip_with_params() {
        let r = Recipe::new("sunray", 7).with_params(json!({"shift": -3, "in_ratio": 0.25}));
        let text = serde_json::to_string_pretty(&r).unwrap();
        let back: Recipe = serde_json::from_str(&text).unwrap();
        assert_eq!(r, back);
    }

    #[test]
    fn validate_rejects_blank_name_and_non_object_params() {
        assert!(Recipe::new("  ", 1).validate().is_err());
        assert!(Recipe::new("mesh", 1)
            .with_params(json!([1, 2]))
            .validate()
            .is_err());
        assert!(Recipe::new("mesh", 1).validate().is_ok());
    }
}
