//! Marker components with no payload of their own.

use datree_types::Type;
use serde_json::{Map, Value};

use crate::component::{ComponentBase, ComponentData};
use crate::context::{DeserializationContext, SerializationContext};
use crate::error::Issues;
use crate::value::reject_unknown_keys;

const FULL_TYPE_NAMES: [&str; 2] = [
    "[FrooxEngine]FrooxEngine.DestroyBlock",
    "[FrooxEngine]FrooxEngine.DuplicateBlock",
];

#[derive(Clone, Debug)]
pub struct Tag {
    pub base: ComponentBase,
}

impl Tag {
    pub fn new(ty: Type) -> Self {
        Self {
            base: ComponentBase::new(ty),
        }
    }

    pub fn destroy_block() -> Self {
        Self::new(Type::namespaced("FrooxEngine", "FrooxEngine.DestroyBlock"))
    }

    pub fn duplicate_block() -> Self {
        Self::new(Type::namespaced("FrooxEngine", "FrooxEngine.DuplicateBlock"))
    }

    pub(crate) fn matches(_ty: &Type, full_name: &str) -> bool {
        FULL_TYPE_NAMES.contains(&full_name)
    }

    pub(crate) fn decode_payload(
        base: ComponentBase,
        inner: &Map<String, Value>,
        path: &str,
        _ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<ComponentData> {
        if !reject_unknown_keys(inner, &[], path, issues) {
            return None;
        }
        Some(ComponentData::Tag(Self { base }))
    }

    pub(crate) fn encode_payload(
        &self,
        _data: &mut Map<String, Value>,
        _ctx: &mut SerializationContext,
    ) {
    }
}
