//! Polymorphic component dispatch.
//!
//! Components share a common envelope (type, identity, update order, enabled
//! flag) and carry a variant-specific payload. Decoding trials an ordered
//! descriptor table: the first variant whose structural predicate accepts the
//! component's type decodes the payload. The table always ends in
//! [`UnknownComponent`], which accepts anything and preserves the payload
//! verbatim, so no syntactically valid component is ever rejected for having
//! an unrecognized type.

pub mod dynamic_variables;
pub mod relays;
pub mod tag;
pub mod unknown;

pub use dynamic_variables::*;
pub use relays::*;
pub use tag::*;
pub use unknown::*;

use datree_ids::RefId;
use datree_types::Type;
use log::debug;
use serde_json::{Map, Value};

use crate::context::{DeserializationContext, SerializationContext};
use crate::error::Issues;
use crate::field::{Field, FieldValue};
use crate::value::{decode_ref_id, encode_ref_id, expect_i32, expect_object, join_path,
    reject_unknown_keys, require_key};

/// Attributes shared by every component, concrete or unknown.
#[derive(Clone, Debug)]
pub struct ComponentBase {
    pub ty: Type,
    pub id: RefId,
    pub persistent_id: RefId,
    pub update_order: Field<i32>,
    pub enabled: Field<bool>,
}

impl ComponentBase {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            id: RefId::new(),
            persistent_id: RefId::new(),
            update_order: Field::new(0),
            enabled: Field::new(true),
        }
    }
}

/// The closed set of built-in variants plus the mandatory fallback.
#[derive(Clone, Debug)]
pub enum ComponentData {
    Tag(Tag),
    DynamicVariableSpace(DynamicVariableSpace),
    DynamicReferenceVariable(DynamicReferenceVariable),
    DynamicValueVariable(DynamicValueVariable),
    ProtoFluxDataRelay(ProtoFluxDataRelay),
    Unknown(UnknownComponent),
}

/// One dispatch table entry: a structural type predicate and the payload
/// decoder it guards. Evaluated in registration order.
struct VariantDescriptor {
    matches: fn(&Type, &str) -> bool,
    decode: fn(
        ComponentBase,
        &Map<String, Value>,
        &str,
        &mut DeserializationContext,
        &mut Issues,
    ) -> Option<ComponentData>,
}

const VARIANTS: &[VariantDescriptor] = &[
    VariantDescriptor {
        matches: Tag::matches,
        decode: Tag::decode_payload,
    },
    VariantDescriptor {
        matches: DynamicVariableSpace::matches,
        decode: DynamicVariableSpace::decode_payload,
    },
    VariantDescriptor {
        matches: DynamicReferenceVariable::matches,
        decode: DynamicReferenceVariable::decode_payload,
    },
    VariantDescriptor {
        matches: DynamicValueVariable::matches,
        decode: DynamicValueVariable::decode_payload,
    },
    VariantDescriptor {
        matches: ProtoFluxDataRelay::matches,
        decode: ProtoFluxDataRelay::decode_payload,
    },
    // Must stay last: accepts every type and keeps the payload intact.
    VariantDescriptor {
        matches: UnknownComponent::matches,
        decode: UnknownComponent::decode_payload,
    },
];

const ENVELOPE_KEYS: [&str; 4] = ["ID", "persistent-ID", "UpdateOrder", "Enabled"];

impl ComponentData {
    pub fn base(&self) -> &ComponentBase {
        match self {
            ComponentData::Tag(c) => &c.base,
            ComponentData::DynamicVariableSpace(c) => &c.base,
            ComponentData::DynamicReferenceVariable(c) => &c.base,
            ComponentData::DynamicValueVariable(c) => &c.base,
            ComponentData::ProtoFluxDataRelay(c) => &c.base,
            ComponentData::Unknown(c) => &c.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ComponentBase {
        match self {
            ComponentData::Tag(c) => &mut c.base,
            ComponentData::DynamicVariableSpace(c) => &mut c.base,
            ComponentData::DynamicReferenceVariable(c) => &mut c.base,
            ComponentData::DynamicValueVariable(c) => &mut c.base,
            ComponentData::ProtoFluxDataRelay(c) => &mut c.base,
            ComponentData::Unknown(c) => &mut c.base,
        }
    }

    fn decode_document(
        value: &Value,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        let map = expect_object(value, path, issues)?;
        reject_unknown_keys(map, &["Type", "Data"], path, issues);

        let type_path = join_path(path, "Type");
        let ty = require_key(map, "Type", path, issues)
            .and_then(|v| expect_i32(v, &type_path, issues))
            .and_then(|index| match ctx.get_type(index) {
                Some(ty) => Some(ty.clone()),
                None => {
                    issues.push(&type_path, format!("type index {index} out of bounds"));
                    None
                }
            });

        let data_path = join_path(path, "Data");
        let data = require_key(map, "Data", path, issues)
            .and_then(|v| expect_object(v, &data_path, issues));

        let envelope = data.and_then(|data| {
            let id = require_key(data, "ID", &data_path, issues)
                .and_then(|v| decode_ref_id(v, &join_path(&data_path, "ID"), ctx, issues));
            let persistent_id = require_key(data, "persistent-ID", &data_path, issues)
                .and_then(|v| {
                    decode_ref_id(v, &join_path(&data_path, "persistent-ID"), ctx, issues)
                });
            let update_order = require_key(data, "UpdateOrder", &data_path, issues)
                .and_then(|v| {
                    Field::<i32>::decode(v, &join_path(&data_path, "UpdateOrder"), ctx, issues)
                });
            let enabled = require_key(data, "Enabled", &data_path, issues).and_then(|v| {
                Field::<bool>::decode(v, &join_path(&data_path, "Enabled"), ctx, issues)
            });

            let mut inner = Map::new();
            for (key, value) in data {
                if !ENVELOPE_KEYS.contains(&key.as_str()) {
                    inner.insert(key.clone(), value.clone());
                }
            }

            Some((id?, persistent_id?, update_order?, enabled?, inner))
        });

        let (id, persistent_id, update_order, enabled, inner) = envelope?;
        let base = ComponentBase {
            ty: ty?,
            id,
            persistent_id,
            update_order,
            enabled,
        };

        let full_name = base.ty.to_string();
        for variant in VARIANTS {
            if (variant.matches)(&base.ty, &full_name) {
                return (variant.decode)(base, &inner, &data_path, ctx, issues);
            }
        }

        issues.push(path, "no matching component variant");
        None
    }

    pub(crate) fn to_value(&self, ctx: &mut SerializationContext) -> Value {
        let base = self.base();
        let type_id = ctx.type_id(&base.ty);

        let mut data = Map::new();
        data.insert("ID".to_string(), encode_ref_id(base.id, ctx));
        data.insert(
            "persistent-ID".to_string(),
            encode_ref_id(base.persistent_id, ctx),
        );
        data.insert("UpdateOrder".to_string(), base.update_order.encode(ctx));
        data.insert("Enabled".to_string(), base.enabled.encode(ctx));

        match self {
            ComponentData::Tag(c) => c.encode_payload(&mut data, ctx),
            ComponentData::DynamicVariableSpace(c) => c.encode_payload(&mut data, ctx),
            ComponentData::DynamicReferenceVariable(c) => c.encode_payload(&mut data, ctx),
            ComponentData::DynamicValueVariable(c) => c.encode_payload(&mut data, ctx),
            ComponentData::ProtoFluxDataRelay(c) => c.encode_payload(&mut data, ctx),
            ComponentData::Unknown(c) => c.encode_payload(&mut data, ctx),
        }

        let mut map = Map::new();
        map.insert("Type".to_string(), Value::from(type_id));
        map.insert("Data".to_string(), Value::Object(data));
        Value::Object(map)
    }
}

impl FieldValue for ComponentData {
    fn decode(
        value: &Value,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        let component = Self::decode_document(value, path, ctx, issues);
        if let Some(ComponentData::Unknown(unknown)) = &component {
            debug!(
                "component type {} has no concrete variant; payload preserved verbatim",
                unknown.base.ty
            );
        }
        component
    }

    fn encode(&self, ctx: &mut SerializationContext) -> Value {
        self.to_value(ctx)
    }
}
