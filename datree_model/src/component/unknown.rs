//! The mandatory fallback variant. Accepts every component type and carries
//! the payload untouched, so unrecognized components survive a decode/encode
//! round trip byte-for-byte.

use datree_types::Type;
use serde_json::{Map, Value};

use crate::component::{ComponentBase, ComponentData};
use crate::context::{DeserializationContext, SerializationContext};
use crate::error::Issues;

#[derive(Clone, Debug)]
pub struct UnknownComponent {
    pub base: ComponentBase,
    /// Raw payload entries beyond the common envelope, in document order.
    pub properties: Map<String, Value>,
}

impl UnknownComponent {
    pub fn new(ty: Type, properties: Map<String, Value>) -> Self {
        Self {
            base: ComponentBase::new(ty),
            properties,
        }
    }

    pub(crate) fn matches(_ty: &Type, _full_name: &str) -> bool {
        true
    }

    pub(crate) fn decode_payload(
        base: ComponentBase,
        inner: &Map<String, Value>,
        _path: &str,
        _ctx: &mut DeserializationContext,
        _issues: &mut Issues,
    ) -> Option<ComponentData> {
        Some(ComponentData::Unknown(Self {
            base,
            properties: inner.clone(),
        }))
    }

    pub(crate) fn encode_payload(
        &self,
        data: &mut Map<String, Value>,
        _ctx: &mut SerializationContext,
    ) {
        for (key, value) in &self.properties {
            data.insert(key.clone(), value.clone());
        }
    }
}
