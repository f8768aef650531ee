//! Data relay nodes: pass-through graph nodes whose `Input` points at another
//! component in the tree.

use datree_ids::RefId;
use datree_types::Type;
use serde_json::{Map, Value};

use crate::component::{ComponentBase, ComponentData};
use crate::context::{DeserializationContext, SerializationContext};
use crate::error::Issues;
use crate::field::Field;
use crate::value::{join_path, reject_unknown_keys, require_key};

const RELAY_NAMES: [&str; 2] = [
    "FrooxEngine.ProtoFlux.Runtimes.Execution.Nodes.ValueRelay",
    "FrooxEngine.ProtoFlux.Runtimes.Execution.Nodes.ObjectRelay",
];

#[derive(Clone, Debug)]
pub struct ProtoFluxDataRelay {
    pub base: ComponentBase,
    pub input: Field<Option<RefId>>,
}

impl ProtoFluxDataRelay {
    pub fn value_relay(inner: Type) -> Type {
        Type::generic(Some("ProtoFluxBindings"), RELAY_NAMES[0], vec![inner])
    }

    pub fn object_relay(inner: Type) -> Type {
        Type::generic(Some("ProtoFluxBindings"), RELAY_NAMES[1], vec![inner])
    }

    pub fn new(ty: Type) -> Self {
        Self {
            base: ComponentBase::new(ty),
            input: Field::new(None),
        }
    }

    pub(crate) fn matches(ty: &Type, _full_name: &str) -> bool {
        ty.namespace.as_deref() == Some("ProtoFluxBindings")
            && RELAY_NAMES.contains(&ty.name.as_str())
            && ty.generics.len() == 1
    }

    pub(crate) fn decode_payload(
        base: ComponentBase,
        inner: &Map<String, Value>,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<ComponentData> {
        let clean = reject_unknown_keys(inner, &["Input"], path, issues);
        let input = require_key(inner, "Input", path, issues).and_then(|v| {
            Field::<Option<RefId>>::decode(v, &join_path(path, "Input"), ctx, issues)
        });
        if !clean {
            return None;
        }
        Some(ComponentData::ProtoFluxDataRelay(Self {
            base,
            input: input?,
        }))
    }

    pub(crate) fn encode_payload(
        &self,
        data: &mut Map<String, Value>,
        ctx: &mut SerializationContext,
    ) {
        data.insert("Input".to_string(), self.input.encode(ctx));
    }
}
