//! Field wrappers: a value paired with its own reference handle.
//!
//! The wrapper itself is addressable: other parts of the tree may reference a
//! field's handle rather than the value it holds, so the handle travels with
//! the field through every encode/decode.

use datree_ids::RefId;
use serde_json::{Map, Value};

use crate::context::{DeserializationContext, SerializationContext};
use crate::error::Issues;
use crate::value::{decode_ref_id, encode_ref_id, expect_array, expect_bool, expect_f64,
    expect_i32, expect_i64, expect_object, expect_str, index_path, join_path, require_key};

/// Payloads that know how to cross the generic-document boundary. Reference
/// resolution and type interning flow through the contexts.
pub trait FieldValue: Sized {
    fn decode(
        value: &Value,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self>;

    fn encode(&self, ctx: &mut SerializationContext) -> Value;
}

/// `{ID, Data}` envelope around a single value.
#[derive(Clone, Debug)]
pub struct Field<T> {
    pub id: RefId,
    pub data: T,
}

impl<T> Field<T> {
    pub fn new(data: T) -> Self {
        Self {
            id: RefId::new(),
            data,
        }
    }

    pub fn with_id(id: RefId, data: T) -> Self {
        Self { id, data }
    }
}

impl<T: FieldValue> Field<T> {
    pub(crate) fn decode(
        value: &Value,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        let map = expect_object(value, path, issues)?;
        let id = require_key(map, "ID", path, issues)
            .and_then(|v| decode_ref_id(v, &join_path(path, "ID"), ctx, issues));
        let data = require_key(map, "Data", path, issues)
            .and_then(|v| T::decode(v, &join_path(path, "Data"), ctx, issues));
        Some(Self {
            id: id?,
            data: data?,
        })
    }

    pub(crate) fn encode(&self, ctx: &mut SerializationContext) -> Value {
        let mut map = Map::new();
        map.insert("ID".to_string(), encode_ref_id(self.id, ctx));
        map.insert("Data".to_string(), self.data.encode(ctx));
        Value::Object(map)
    }
}

/// `{ID, Data: [...]}` envelope around an ordered sequence.
#[derive(Clone, Debug)]
pub struct FieldList<T> {
    pub id: RefId,
    pub data: Vec<T>,
}

impl<T> FieldList<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            id: RefId::new(),
            data,
        }
    }

    pub fn with_id(id: RefId, data: Vec<T>) -> Self {
        Self { id, data }
    }
}

impl<T> Default for FieldList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: FieldValue> FieldList<T> {
    pub(crate) fn decode(
        value: &Value,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        let map = expect_object(value, path, issues)?;
        let id = require_key(map, "ID", path, issues)
            .and_then(|v| decode_ref_id(v, &join_path(path, "ID"), ctx, issues));
        let data_path = join_path(path, "Data");
        let data = require_key(map, "Data", path, issues)
            .and_then(|v| expect_array(v, &data_path, issues))
            .and_then(|array| {
                let mut out = Vec::with_capacity(array.len());
                let mut clean = true;
                for (i, element) in array.iter().enumerate() {
                    match T::decode(element, &index_path(&data_path, i), ctx, issues) {
                        Some(item) => out.push(item),
                        None => clean = false,
                    }
                }
                clean.then_some(out)
            });
        Some(Self {
            id: id?,
            data: data?,
        })
    }

    pub(crate) fn encode(&self, ctx: &mut SerializationContext) -> Value {
        let mut map = Map::new();
        map.insert("ID".to_string(), encode_ref_id(self.id, ctx));
        map.insert(
            "Data".to_string(),
            Value::Array(self.data.iter().map(|item| item.encode(ctx)).collect()),
        );
        Value::Object(map)
    }
}

impl FieldValue for bool {
    fn decode(
        value: &Value,
        path: &str,
        _ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        expect_bool(value, path, issues)
    }

    fn encode(&self, _ctx: &mut SerializationContext) -> Value {
        Value::Bool(*self)
    }
}

impl FieldValue for i32 {
    fn decode(
        value: &Value,
        path: &str,
        _ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        expect_i32(value, path, issues)
    }

    fn encode(&self, _ctx: &mut SerializationContext) -> Value {
        Value::from(*self)
    }
}

impl FieldValue for i64 {
    fn decode(
        value: &Value,
        path: &str,
        _ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        expect_i64(value, path, issues)
    }

    fn encode(&self, _ctx: &mut SerializationContext) -> Value {
        Value::from(*self)
    }
}

impl FieldValue for f64 {
    fn decode(
        value: &Value,
        path: &str,
        _ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        expect_f64(value, path, issues)
    }

    fn encode(&self, _ctx: &mut SerializationContext) -> Value {
        Value::from(*self)
    }
}

/// Nullable string payload (`Name`, `Tag`, variable names).
impl FieldValue for Option<String> {
    fn decode(
        value: &Value,
        path: &str,
        _ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }
        expect_str(value, path, issues).map(|s| Some(s.to_string()))
    }

    fn encode(&self, _ctx: &mut SerializationContext) -> Value {
        match self {
            Some(text) => Value::String(text.clone()),
            None => Value::Null,
        }
    }
}

/// Nullable reference payload. Non-null values resolve through the context so
/// shared targets collapse onto one handle.
impl FieldValue for Option<RefId> {
    fn decode(
        value: &Value,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }
        decode_ref_id(value, path, ctx, issues).map(Some)
    }

    fn encode(&self, ctx: &mut SerializationContext) -> Value {
        match self {
            Some(id) => encode_ref_id(*id, ctx),
            None => Value::Null,
        }
    }
}

/// Verbatim payload: anything goes, nothing is interpreted.
impl FieldValue for Value {
    fn decode(
        value: &Value,
        _path: &str,
        _ctx: &mut DeserializationContext,
        _issues: &mut Issues,
    ) -> Option<Self> {
        Some(value.clone())
    }

    fn encode(&self, _ctx: &mut SerializationContext) -> Value {
        self.clone()
    }
}
