//! Per-call registries for reference identity and type interning.
//!
//! Each decode call owns one `DeserializationContext`, each encode call one
//! `SerializationContext`. Contexts are passed by `&mut` through the recursive
//! walk, so they can never outlive or leak across calls; concurrent calls on
//! independent documents each carry their own instance.

use std::collections::HashMap;

use datree_ids::{Guid, RefId};
use datree_types::Type;
use indexmap::IndexMap;

/// Decode-side registry: the document's ordered type table plus the
/// guid → handle mapping that keeps repeated references identical.
#[derive(Debug)]
pub struct DeserializationContext {
    types: Vec<Type>,
    ref_ids: HashMap<Guid, RefId>,
}

impl DeserializationContext {
    pub fn new(types: Vec<Type>) -> Self {
        Self {
            types,
            ref_ids: HashMap::new(),
        }
    }

    /// Look up an interned type by wire index. Out-of-range indices are the
    /// caller's validation error.
    pub fn get_type(&self, index: i32) -> Option<&Type> {
        usize::try_from(index).ok().and_then(|i| self.types.get(i))
    }

    /// Resolve a stable value to its handle. Idempotent within this context:
    /// the first sight of a guid mints a handle, every later sight returns the
    /// same one.
    pub fn ref_id(&mut self, guid: Guid) -> RefId {
        *self.ref_ids.entry(guid).or_insert_with(RefId::new)
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }
}

/// Encode-side registry: interns types in first-encountered order and assigns
/// deterministic stable values to handles.
#[derive(Debug, Default)]
pub struct SerializationContext {
    types: IndexMap<Type, i32>,
    guids: HashMap<RefId, Guid>,
    next_guid: u128,
}

impl SerializationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a type, returning its table index. Structurally equal types
    /// share one entry.
    pub fn type_id(&mut self, ty: &Type) -> i32 {
        if let Some(&id) = self.types.get(ty) {
            return id;
        }
        let id = self.types.len() as i32;
        self.types.insert(ty.clone(), id);
        id
    }

    /// Stable value for a handle. The first sight of a handle assigns the next
    /// counter value; later sights of the same handle return the same guid.
    /// Distinct handles always get distinct guids.
    pub fn reference_guid(&mut self, id: RefId) -> Guid {
        if let Some(&guid) = self.guids.get(&id) {
            return guid;
        }
        let guid = Guid::from_u128(self.next_guid);
        self.next_guid += 1;
        self.guids.insert(id, guid);
        guid
    }

    /// The interned table, printed, in first-encountered order.
    pub fn type_names(&self) -> Vec<String> {
        self.types.keys().map(Type::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_id_resolution_is_idempotent() {
        let mut ctx = DeserializationContext::new(Vec::new());
        let guid = Guid::from_u128(42);
        let first = ctx.ref_id(guid);
        let second = ctx.ref_id(guid);
        assert_eq!(first, second);
        assert_ne!(first, ctx.ref_id(Guid::from_u128(43)));
    }

    #[test]
    fn type_lookup_bounds() {
        let ctx = DeserializationContext::new(vec![Type::simple("int")]);
        assert_eq!(ctx.get_type(0), Some(&Type::simple("int")));
        assert_eq!(ctx.get_type(1), None);
        assert_eq!(ctx.get_type(-1), None);
    }

    #[test]
    fn type_interning_dedupes_structurally() {
        let mut ctx = SerializationContext::new();
        let a = Type::generic(Some("N"), "A", vec![Type::simple("int")]);
        let b = Type::generic(Some("N"), "A", vec![Type::simple("int")]);
        let c = Type::simple("bool");
        assert_eq!(ctx.type_id(&a), 0);
        assert_eq!(ctx.type_id(&c), 1);
        assert_eq!(ctx.type_id(&b), 0);
        assert_eq!(ctx.type_names(), vec!["[N]A<int>".to_string(), "bool".to_string()]);
    }

    #[test]
    fn reference_guids_track_handle_identity() {
        let mut ctx = SerializationContext::new();
        let a = RefId::new();
        let b = RefId::new();
        let first = ctx.reference_guid(a);
        assert_eq!(ctx.reference_guid(a), first);
        assert_ne!(ctx.reference_guid(b), first);
        assert_eq!(first.to_string(), "00000000-0000-0000-0000-000000000000");
        assert_eq!(
            ctx.reference_guid(b).to_string(),
            "00000001-0000-0000-0000-000000000000"
        );
    }
}
