//! Dynamic variable components: a named space and the reference/value
//! variables that bind into it.

use datree_ids::RefId;
use datree_types::Type;
use serde_json::{Map, Value};

use crate::component::{ComponentBase, ComponentData};
use crate::context::{DeserializationContext, SerializationContext};
use crate::error::Issues;
use crate::field::Field;
use crate::value::{join_path, reject_unknown_keys, require_key};

#[derive(Clone, Debug)]
pub struct DynamicVariableSpace {
    pub base: ComponentBase,
    pub space_name: Field<Option<String>>,
    pub only_direct_binding: Field<bool>,
}

impl DynamicVariableSpace {
    pub fn component_type() -> Type {
        Type::namespaced("FrooxEngine", "FrooxEngine.DynamicVariableSpace")
    }

    pub fn new() -> Self {
        Self {
            base: ComponentBase::new(Self::component_type()),
            space_name: Field::new(None),
            only_direct_binding: Field::new(false),
        }
    }

    pub(crate) fn matches(_ty: &Type, full_name: &str) -> bool {
        full_name == "[FrooxEngine]FrooxEngine.DynamicVariableSpace"
    }

    pub(crate) fn decode_payload(
        base: ComponentBase,
        inner: &Map<String, Value>,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<ComponentData> {
        let clean = reject_unknown_keys(inner, &["SpaceName", "OnlyDirectBinding"], path, issues);
        let space_name = require_key(inner, "SpaceName", path, issues).and_then(|v| {
            Field::<Option<String>>::decode(v, &join_path(path, "SpaceName"), ctx, issues)
        });
        let only_direct_binding =
            require_key(inner, "OnlyDirectBinding", path, issues).and_then(|v| {
                Field::<bool>::decode(v, &join_path(path, "OnlyDirectBinding"), ctx, issues)
            });
        if !clean {
            return None;
        }
        Some(ComponentData::DynamicVariableSpace(Self {
            base,
            space_name: space_name?,
            only_direct_binding: only_direct_binding?,
        }))
    }

    pub(crate) fn encode_payload(
        &self,
        data: &mut Map<String, Value>,
        ctx: &mut SerializationContext,
    ) {
        data.insert("SpaceName".to_string(), self.space_name.encode(ctx));
        data.insert(
            "OnlyDirectBinding".to_string(),
            self.only_direct_binding.encode(ctx),
        );
    }
}

impl Default for DynamicVariableSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct DynamicReferenceVariable {
    pub base: ComponentBase,
    pub variable_name: Field<Option<String>>,
    pub reference: Field<Option<RefId>>,
    pub override_on_link: Field<bool>,
}

impl DynamicReferenceVariable {
    /// The concrete type for a variable holding references to `inner`.
    pub fn component_type(inner: Type) -> Type {
        Type::generic(
            Some("FrooxEngine"),
            "FrooxEngine.DynamicReferenceVariable",
            vec![inner],
        )
    }

    pub fn new(inner: Type) -> Self {
        Self {
            base: ComponentBase::new(Self::component_type(inner)),
            variable_name: Field::new(None),
            reference: Field::new(None),
            override_on_link: Field::new(false),
        }
    }

    pub(crate) fn matches(ty: &Type, _full_name: &str) -> bool {
        ty.namespace.as_deref() == Some("FrooxEngine")
            && ty.name == "FrooxEngine.DynamicReferenceVariable"
            && ty.generics.len() == 1
    }

    pub(crate) fn decode_payload(
        base: ComponentBase,
        inner: &Map<String, Value>,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<ComponentData> {
        let clean = reject_unknown_keys(
            inner,
            &["VariableName", "Reference", "OverrideOnLink"],
            path,
            issues,
        );
        let variable_name = require_key(inner, "VariableName", path, issues).and_then(|v| {
            Field::<Option<String>>::decode(v, &join_path(path, "VariableName"), ctx, issues)
        });
        let reference = require_key(inner, "Reference", path, issues).and_then(|v| {
            Field::<Option<RefId>>::decode(v, &join_path(path, "Reference"), ctx, issues)
        });
        let override_on_link = require_key(inner, "OverrideOnLink", path, issues).and_then(|v| {
            Field::<bool>::decode(v, &join_path(path, "OverrideOnLink"), ctx, issues)
        });
        if !clean {
            return None;
        }
        Some(ComponentData::DynamicReferenceVariable(Self {
            base,
            variable_name: variable_name?,
            reference: reference?,
            override_on_link: override_on_link?,
        }))
    }

    pub(crate) fn encode_payload(
        &self,
        data: &mut Map<String, Value>,
        ctx: &mut SerializationContext,
    ) {
        data.insert("VariableName".to_string(), self.variable_name.encode(ctx));
        data.insert("Reference".to_string(), self.reference.encode(ctx));
        data.insert(
            "OverrideOnLink".to_string(),
            self.override_on_link.encode(ctx),
        );
    }
}

#[derive(Clone, Debug)]
pub struct DynamicValueVariable {
    pub base: ComponentBase,
    pub variable_name: Field<Option<String>>,
    pub value: Field<Value>,
    pub override_on_link: Field<bool>,
}

impl DynamicValueVariable {
    /// The concrete type for a variable holding values of `inner`.
    pub fn component_type(inner: Type) -> Type {
        Type::generic(
            Some("FrooxEngine"),
            "FrooxEngine.DynamicValueVariable",
            vec![inner],
        )
    }

    pub fn new(inner: Type) -> Self {
        Self {
            base: ComponentBase::new(Self::component_type(inner)),
            variable_name: Field::new(None),
            value: Field::new(Value::Null),
            override_on_link: Field::new(false),
        }
    }

    pub(crate) fn matches(ty: &Type, _full_name: &str) -> bool {
        ty.namespace.as_deref() == Some("FrooxEngine")
            && ty.name == "FrooxEngine.DynamicValueVariable"
            && ty.generics.len() == 1
    }

    pub(crate) fn decode_payload(
        base: ComponentBase,
        inner: &Map<String, Value>,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<ComponentData> {
        let clean = reject_unknown_keys(
            inner,
            &["VariableName", "Value", "OverrideOnLink"],
            path,
            issues,
        );
        let variable_name = require_key(inner, "VariableName", path, issues).and_then(|v| {
            Field::<Option<String>>::decode(v, &join_path(path, "VariableName"), ctx, issues)
        });
        let value = require_key(inner, "Value", path, issues)
            .and_then(|v| Field::<Value>::decode(v, &join_path(path, "Value"), ctx, issues));
        let override_on_link = require_key(inner, "OverrideOnLink", path, issues).and_then(|v| {
            Field::<bool>::decode(v, &join_path(path, "OverrideOnLink"), ctx, issues)
        });
        if !clean {
            return None;
        }
        Some(ComponentData::DynamicValueVariable(Self {
            base,
            variable_name: variable_name?,
            value: value?,
            override_on_link: override_on_link?,
        }))
    }

    pub(crate) fn encode_payload(
        &self,
        data: &mut Map<String, Value>,
        ctx: &mut SerializationContext,
    ) {
        data.insert("VariableName".to_string(), self.variable_name.encode(ctx));
        data.insert("Value".to_string(), self.value.encode(ctx));
        data.insert(
            "OverrideOnLink".to_string(),
            self.override_on_link.encode(ctx),
        );
    }
}
