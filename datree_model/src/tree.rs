//! The document root and the recursive slot tree.

use datree_ids::RefId;
use datree_types::Type;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::component::ComponentData;
use crate::context::{DeserializationContext, SerializationContext};
use crate::error::{Issues, ValidationError};
use crate::field::{Field, FieldList};
use crate::scalar::{Double3, Double4};
use crate::value::{decode_ref_id, encode_ref_id, expect_array, expect_i32, expect_object,
    expect_str, index_path, join_path, reject_unknown_keys, require_key};

/// Flat name → i32 flag map, insertion-ordered. The canonical flags are
/// present (at zero) on every freshly built document; decoding accepts any
/// set of names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureFlags {
    entries: IndexMap<String, i32>,
}

pub const CANONICAL_FEATURE_FLAGS: [&str; 7] = [
    "ColorManagement",
    "ResetGUID",
    "ProtoFlux",
    "TEXTURE_QUALITY",
    "TypeManagement",
    "ALIGNER_FILTERING",
    "PhotonDust",
];

impl FeatureFlags {
    pub fn new() -> Self {
        let mut entries = IndexMap::new();
        for name in CANONICAL_FEATURE_FLAGS {
            entries.insert(name.to_string(), 0);
        }
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> i32 {
        self.entries.get(name).copied().unwrap_or(0)
    }

    pub fn set(&mut self, name: impl Into<String>, value: i32) {
        self.entries.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.entries.iter().map(|(name, &value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn decode(value: &Value, path: &str, issues: &mut Issues) -> Option<Self> {
        let map = expect_object(value, path, issues)?;
        let mut entries = IndexMap::new();
        let mut clean = true;
        for (name, flag) in map {
            match expect_i32(flag, &join_path(path, name), issues) {
                Some(value) => {
                    entries.insert(name.clone(), value);
                }
                None => clean = false,
            }
        }
        clean.then_some(Self { entries })
    }

    fn encode(&self) -> Value {
        let mut map = Map::new();
        for (name, &value) in &self.entries {
            map.insert(name.clone(), Value::from(value));
        }
        Value::Object(map)
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursive tree node: transform, metadata, component list, children.
/// Children are owned (the tree stays a tree); references elsewhere in the
/// document use handles, never ownership.
#[derive(Clone, Debug)]
pub struct Slot {
    pub id: RefId,
    pub components: FieldList<ComponentData>,
    pub name: Field<Option<String>>,
    pub tag: Field<Option<String>>,
    pub active: Field<bool>,
    pub persistent_id: RefId,
    pub position: Field<Double3>,
    pub rotation: Field<Double4>,
    pub scale: Field<Double3>,
    pub order_offset: Field<i64>,
    pub parent_reference: RefId,
    pub children: Vec<Slot>,
}

const SLOT_KEYS: [&str; 12] = [
    "ID",
    "Components",
    "Name",
    "Tag",
    "Active",
    "Persistent-ID",
    "Position",
    "Rotation",
    "Scale",
    "OrderOffset",
    "ParentReference",
    "Children",
];

impl Slot {
    pub fn new() -> Self {
        Self {
            id: RefId::new(),
            components: FieldList::default(),
            name: Field::new(Some("Slot".to_string())),
            tag: Field::new(None),
            active: Field::new(true),
            persistent_id: RefId::new(),
            position: Field::new(Double3::ZERO),
            rotation: Field::new(Double4::IDENTITY),
            scale: Field::new(Double3::ONE),
            order_offset: Field::new(0),
            parent_reference: RefId::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn decode(
        value: &Value,
        path: &str,
        ctx: &mut DeserializationContext,
        issues: &mut Issues,
    ) -> Option<Self> {
        let map = expect_object(value, path, issues)?;
        reject_unknown_keys(map, &SLOT_KEYS, path, issues);

        let id = require_key(map, "ID", path, issues)
            .and_then(|v| decode_ref_id(v, &join_path(path, "ID"), ctx, issues));
        let components = require_key(map, "Components", path, issues).and_then(|v| {
            FieldList::<ComponentData>::decode(v, &join_path(path, "Components"), ctx, issues)
        });
        let name = require_key(map, "Name", path, issues).and_then(|v| {
            Field::<Option<String>>::decode(v, &join_path(path, "Name"), ctx, issues)
        });
        let tag = require_key(map, "Tag", path, issues).and_then(|v| {
            Field::<Option<String>>::decode(v, &join_path(path, "Tag"), ctx, issues)
        });
        let active = require_key(map, "Active", path, issues)
            .and_then(|v| Field::<bool>::decode(v, &join_path(path, "Active"), ctx, issues));
        let persistent_id = require_key(map, "Persistent-ID", path, issues)
            .and_then(|v| decode_ref_id(v, &join_path(path, "Persistent-ID"), ctx, issues));
        let position = require_key(map, "Position", path, issues)
            .and_then(|v| Field::<Double3>::decode(v, &join_path(path, "Position"), ctx, issues));
        let rotation = require_key(map, "Rotation", path, issues)
            .and_then(|v| Field::<Double4>::decode(v, &join_path(path, "Rotation"), ctx, issues));
        let scale = require_key(map, "Scale", path, issues)
            .and_then(|v| Field::<Double3>::decode(v, &join_path(path, "Scale"), ctx, issues));
        let order_offset = require_key(map, "OrderOffset", path, issues)
            .and_then(|v| Field::<i64>::decode(v, &join_path(path, "OrderOffset"), ctx, issues));
        let parent_reference = require_key(map, "ParentReference", path, issues)
            .and_then(|v| decode_ref_id(v, &join_path(path, "ParentReference"), ctx, issues));

        let children_path = join_path(path, "Children");
        let children = require_key(map, "Children", path, issues)
            .and_then(|v| expect_array(v, &children_path, issues))
            .and_then(|array| {
                let mut out = Vec::with_capacity(array.len());
                let mut clean = true;
                for (i, child) in array.iter().enumerate() {
                    match Slot::decode(child, &index_path(&children_path, i), ctx, issues) {
                        Some(slot) => out.push(slot),
                        None => clean = false,
                    }
                }
                clean.then_some(out)
            });

        Some(Self {
            id: id?,
            components: components?,
            name: name?,
            tag: tag?,
            active: active?,
            persistent_id: persistent_id?,
            position: position?,
            rotation: rotation?,
            scale: scale?,
            order_offset: order_offset?,
            parent_reference: parent_reference?,
            children: children?,
        })
    }

    pub(crate) fn encode(&self, ctx: &mut SerializationContext) -> Value {
        let mut map = Map::new();
        map.insert("ID".to_string(), encode_ref_id(self.id, ctx));
        map.insert("Components".to_string(), self.components.encode(ctx));
        map.insert("Name".to_string(), self.name.encode(ctx));
        map.insert("Tag".to_string(), self.tag.encode(ctx));
        map.insert("Active".to_string(), self.active.encode(ctx));
        map.insert(
            "Persistent-ID".to_string(),
            encode_ref_id(self.persistent_id, ctx),
        );
        map.insert("Position".to_string(), self.position.encode(ctx));
        map.insert("Rotation".to_string(), self.rotation.encode(ctx));
        map.insert("Scale".to_string(), self.scale.encode(ctx));
        map.insert("OrderOffset".to_string(), self.order_offset.encode(ctx));
        map.insert(
            "ParentReference".to_string(),
            encode_ref_id(self.parent_reference, ctx),
        );
        map.insert(
            "Children".to_string(),
            Value::Array(self.children.iter().map(|child| child.encode(ctx)).collect()),
        );
        Value::Object(map)
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

/// The decoded document: version string, feature flags, opaque type-version
/// map, and the root slot. The type table lives only on the wire; it is
/// rebuilt from scratch by every encode.
#[derive(Clone, Debug)]
pub struct DataTreeRoot {
    pub version_number: String,
    pub feature_flags: FeatureFlags,
    pub type_versions: Map<String, Value>,
    pub object: Slot,
}

const ROOT_KEYS: [&str; 5] = [
    "VersionNumber",
    "FeatureFlags",
    "Types",
    "TypeVersions",
    "Object",
];

impl DataTreeRoot {
    pub fn new(version_number: impl Into<String>, object: Slot) -> Self {
        Self {
            version_number: version_number.into(),
            feature_flags: FeatureFlags::new(),
            type_versions: Map::new(),
            object,
        }
    }

    /// Validate and transform a generic document into the typed tree.
    /// Collects every issue the structural pass can find before failing.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let mut issues = Issues::default();
        let root = Self::decode(value, &mut issues);
        match root {
            Some(root) if issues.is_empty() => Ok(root),
            _ => {
                if issues.is_empty() {
                    issues.push("$", "invalid document");
                }
                Err(issues.into_error())
            }
        }
    }

    fn decode(value: &Value, issues: &mut Issues) -> Option<Self> {
        let path = "$";
        let map = expect_object(value, path, issues)?;
        reject_unknown_keys(map, &ROOT_KEYS, path, issues);

        let version_number = require_key(map, "VersionNumber", path, issues)
            .and_then(|v| expect_str(v, &join_path(path, "VersionNumber"), issues))
            .map(str::to_string);
        let feature_flags = require_key(map, "FeatureFlags", path, issues)
            .and_then(|v| FeatureFlags::decode(v, &join_path(path, "FeatureFlags"), issues));

        let types_path = join_path(path, "Types");
        let types = require_key(map, "Types", path, issues)
            .and_then(|v| expect_array(v, &types_path, issues))
            .and_then(|array| {
                let mut out = Vec::with_capacity(array.len());
                let mut clean = true;
                for (i, entry) in array.iter().enumerate() {
                    let entry_path = index_path(&types_path, i);
                    match expect_str(entry, &entry_path, issues).map(Type::parse) {
                        Some(Some(ty)) => out.push(ty),
                        Some(None) => {
                            issues.push(&entry_path, "invalid type name");
                            clean = false;
                        }
                        None => clean = false,
                    }
                }
                clean.then_some(out)
            });

        let type_versions = require_key(map, "TypeVersions", path, issues)
            .and_then(|v| expect_object(v, &join_path(path, "TypeVersions"), issues))
            .cloned();

        // The object subtree can only be interpreted against a valid type
        // table; a fresh context scopes handle resolution to this document.
        let object = match (types, map.get("Object")) {
            (Some(types), Some(value)) => {
                let mut ctx = DeserializationContext::new(types);
                Slot::decode(value, &join_path(path, "Object"), &mut ctx, issues)
            }
            (_, None) => {
                issues.push(&join_path(path, "Object"), "missing required key");
                None
            }
            (None, _) => None,
        };

        Some(Self {
            version_number: version_number?,
            feature_flags: feature_flags?,
            type_versions: type_versions?,
            object: object?,
        })
    }

    /// Encode to a generic document. A fresh serialization context interns
    /// types and numbers references deterministically, so encoding the same
    /// tree twice produces the same document.
    pub fn to_value(&self) -> Value {
        let mut ctx = SerializationContext::new();
        let object = self.object.encode(&mut ctx);

        let mut map = Map::new();
        map.insert(
            "VersionNumber".to_string(),
            Value::String(self.version_number.clone()),
        );
        map.insert("FeatureFlags".to_string(), self.feature_flags.encode());
        map.insert(
            "Types".to_string(),
            Value::Array(ctx.type_names().into_iter().map(Value::String).collect()),
        );
        map.insert(
            "TypeVersions".to_string(),
            Value::Object(self.type_versions.clone()),
        );
        map.insert("Object".to_string(), object);
        Value::Object(map)
    }
}
