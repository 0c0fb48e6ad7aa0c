//! Declarative parameter descriptors: each one both validates a value from a
//! `serde_json::Value` object and describes itself in the parameter schema.
//!
//! A missing (or `null`) key takes the descriptor's default. A present key
//! with the wrong JSON type yields `GenError::ParamTypeMismatch`; a value
//! outside `[min, max]` yields `GenError::InvalidParameter`. Generators read
//! every parameter up front, so nothing out of range reaches a pixel loop.

use serde_json::{json, Map, Value};

use crate::error::GenError;

/// Anything that can describe itself in a generator's parameter schema.
pub trait ParamDescriptor {
    fn name(&self) -> &'static str;

    /// Schema entry with `type`, `default`, optional `min`/`max`, and `description`.
    fn schema(&self) -> Value;
}

/// Builds the schema object `{ name: entry, ... }` for a list of descriptors.
pub fn schema_of(params: &[&dyn ParamDescriptor]) -> Value {
    let map: Map<String, Value> = params
        .iter()
        .map(|p| (p.name().to_string(), p.schema()))
        .collect();
    Value::Object(map)
}

/// Integer parameter bounded to `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct IntParam {
    pub name: &'static str,
    pub default: i64,
    pub min: i64,
    pub max: i64,
    pub description: &'static str,
}

impl IntParam {
    pub const fn new(
        name: &'static str,
        default: i64,
        min: i64,
        max: i64,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            default,
            min,
            max,
            description,
        }
    }

    /// Reads and range-checks the value.
    ///
    /// Whole-valued floats such as `12.0` are accepted as integers.
    pub fn read(&self, params: &Value) -> Result<i64, GenError> {
        let value = match lookup(params, self.name) {
            None => return Ok(self.default),
            Some(v) => v,
        };
        let parsed = value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        });
        let v = match parsed {
            Some(v) => v,
            None if value.is_number() => {
                return Err(GenError::invalid(
                    self.name,
                    format!("expected a whole number, got {value}"),
                ))
            }
            None => return Err(mismatch(self.name, "integer", value)),
        };
        if v < self.min || v > self.max {
            return Err(GenError::invalid(self.name, range_reason(self.min, self.max, v)));
        }
        Ok(v)
    }

    /// [`read`](Self::read) for parameters whose minimum is non-negative.
    pub fn read_usize(&self, params: &Value) -> Result<usize, GenError> {
        let v = self.read(params)?;
        usize::try_from(v)
            .map_err(|_| GenError::invalid(self.name, format!("must be >= 0, got {v}")))
    }
}

impl ParamDescriptor for IntParam {
    fn name(&self) -> &'static str {
        self.name
    }

    fn schema(&self) -> Value {
        let mut entry = json!({
            "type": "integer",
            "default": self.default,
            "description": self.description,
        });
        if self.min > i64::MIN {
            entry["min"] = json!(self.min);
        }
        if self.max < i64::MAX {
            entry["max"] = json!(self.max);
        }
        entry
    }
}

/// Floating-point parameter bounded to `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct FloatParam {
    pub name: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub description: &'static str,
}

impl FloatParam {
    pub const fn new(
        name: &'static str,
        default: f64,
        min: f64,
        max: f64,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            default,
            min,
            max,
            description,
        }
    }

    pub fn read(&self, params: &Value) -> Result<f64, GenError> {
        let value = match lookup(params, self.name) {
            None => return Ok(self.default),
            Some(v) => v,
        };
        let v = value
            .as_f64()
            .ok_or_else(|| mismatch(self.name, "number", value))?;
        if !(self.min..=self.max).contains(&v) {
            return Err(GenError::invalid(self.name, range_reason(self.min, self.max, v)));
        }
        Ok(v)
    }
}

impl ParamDescriptor for FloatParam {
    fn name(&self) -> &'static str {
        self.name
    }

    fn schema(&self) -> Value {
        json!({
            "type": "number",
            "default": self.default,
            "min": self.min,
            "max": self.max,
            "description": self.description,
        })
    }
}

/// Boolean flag.
#[derive(Debug, Clone, Copy)]
pub struct BoolParam {
    pub name: &'static str,
    pub default: bool,
    pub description: &'static str,
}

impl BoolParam {
    pub const fn new(name: &'static str, default: bool, description: &'static str) -> Self {
        Self {
            name,
            default,
            description,
        }
    }

    pub fn read(&self, params: &Value) -> Result<bool, GenError> {
        match lookup(params, self.name) {
            None => Ok(self.default),
            Some(v) => v.as_bool().ok_or_else(|| mismatch(self.name, "boolean", v)),
        }
    }
}

impl ParamDescriptor for BoolParam {
    fn name(&self) -> &'static str {
        self.name
    }

    fn schema(&self) -> Value {
        json!({
            "type": "boolean",
            "default": self.default,
            "description": self.description,
        })
    }
}

/// Optional free-text parameter (paths, file stems).
#[derive(Debug, Clone, Copy)]
pub struct TextParam {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

impl TextParam {
    pub const fn new(name: &'static str, required: bool, description: &'static str) -> Self {
        Self {
            name,
            required,
            description,
        }
    }

    /// Returns `Ok(None)` for an absent optional key. Empty strings count as absent.
    pub fn read(&self, params: &Value) -> Result<Option<String>, GenError> {
        let text = match lookup(params, self.name) {
            None => None,
            Some(v) => Some(v.as_str().ok_or_else(|| mismatch(self.name, "string", v))?),
        }
        .filter(|s| !s.is_empty());
        match text {
            None if self.required => Err(GenError::invalid(self.name, "is required")),
            other => Ok(other.map(str::to_owned)),
        }
    }
}

impl ParamDescriptor for TextParam {
    fn name(&self) -> &'static str {
        self.name
    }

    fn schema(&self) -> Value {
        json!({
            "type": "string",
            "required": self.required,
            "description": self.description,
        })
    }
}

fn lookup<'a>(params: &'a Value, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|v| !v.is_null())
}

fn mismatch(name: &str, expected: &str, got: &Value) -> GenError {
    GenError::ParamTypeMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: json_type_name(got).to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn range_reason<T: std::fmt::Display + PartialEq + Bounded>(min: T, max: T, got: T) -> String {
    if max == T::UPPER {
        format!("must be >= {min}, got {got}")
    } else {
        format!("must be between {min} and {max}, got {got}")
    }
}

trait Bounded {
    const UPPER: Self;
}

impl Bounded for i64 {
    const UPPER: Self = i64::MAX;
}

impl Bounded for f64 {
    const UPPER: Self = f64::INFINITY;
}
