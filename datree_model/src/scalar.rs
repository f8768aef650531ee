//! Fixed-arity floating point tuples used by slot transforms.

use serde_json::Value;

use crate::context::{DeserializationContext, SerializationContext};
use crate::error::Issues;
use crate::field::FieldValue;
use crate::value::{expect_array, expect_f64, index_path};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Double3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Double3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Double4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Double4 {
    /// Identity rotation.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

fn decode_tuple<const N: usize>(
    value: &Value,
    path: &str,
    issues: &mut Issues,
) -> Option<[f64; N]> {
    let array = expect_array(value, path, issues)?;
    if array.len() != N {
        issues.push(path, format!("expected {N} numbers, got {}", array.len()));
        return None;
    }
    let mut out = [0.0; N];
    let mut clean = true;
    for (i, element) in array.iter().enumerate() {
        match expect_f64(element, &index_path(path, i), issues) {
            Some(n) => out[i] = n,
            None => clean = false,
        }
    }
    clean.then_some(out)
}

impl FieldValue for Double3 {
    fn decode(
        value: &Value,
        path: &str,
        _ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        decode_tuple::<3>(value, path, issues).map(|[x, y, z]| Self::new(x, y, z))
    }

    fn encode(&self, _ctx: &mut SerializationContext) -> Value {
        Value::from(vec![self.x, self.y, self.z])
    }
}

impl FieldValue for Double4 {
    fn decode(
        value: &Value,
        path: &str,
        _ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        decode_tuple::<4>(value, path, issues).map(|[x, y, z, w]| Self::new(x, y, z, w))
    }

    fn encode(&self, _ctx: &mut SerializationContext) -> Value {
        Value::from(vec![self.x, self.y, self.z, self.w])
    }
}
