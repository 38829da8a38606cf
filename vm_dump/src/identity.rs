//! Per-traversal bookkeeping of composites that were already expanded.

use std::rc::Rc;

use ahash::AHashSet;

use crate::host::Resolved;
use crate::value::{InstanceId, ObjectData, StructValue};

/// Identity of a composite, valid only inside one traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityToken {
    Instance(InstanceId),
    List(String),
    Map(String),
    Object(usize),
}

impl IdentityToken {
    pub fn of_struct(value: &StructValue) -> Self {
        match value {
            StructValue::Instance(instance) => IdentityToken::Instance(instance.id),
            StructValue::Object(object) => IdentityToken::object(object),
        }
    }

    /// Bare objects carry no id; the shared allocation address stands in.
    pub fn object(object: &Rc<ObjectData>) -> Self {
        IdentityToken::Object(Rc::as_ptr(object) as usize)
    }
}

/// Visited set for a single dump. Never shared between dumps.
#[derive(Default)]
pub struct CycleGuard {
    visited: AHashSet<IdentityToken>,
    // Host data stays alive until the dump ends so object addresses are
    // not reused within the traversal.
    pinned: Vec<Resolved>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `token` was entered before; the caller must not
    /// descend into it again.
    pub fn enter(&mut self, token: IdentityToken) -> bool {
        self.visited.insert(token)
    }

    pub fn contains(&self, token: &IdentityToken) -> bool {
        self.visited.contains(token)
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub(crate) fn pin(&mut self, resolved: &Resolved) {
        if matches!(resolved, Resolved::Foreign | Resolved::Invalid) {
            return;
        }
        self.pinned.push(resolved.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Members;

    #[test]
    fn second_entry_is_rejected() {
        let mut guard = CycleGuard::new();
        assert!(guard.enter(IdentityToken::Instance(5)));
        assert!(!guard.enter(IdentityToken::Instance(5)));
        assert!(guard.enter(IdentityToken::List("5".into())));
        assert!(guard.enter(IdentityToken::Map("5".into())));
        assert_eq!(guard.visited_len(), 3);
    }

    #[test]
    fn shared_object_has_one_identity() {
        let object = Rc::new(ObjectData {
            name: None,
            members: Members::new(),
        });
        let a = StructValue::Object(Rc::clone(&object));
        let b = StructValue::Object(Rc::clone(&object));
        assert_eq!(IdentityToken::of_struct(&a), IdentityToken::of_struct(&b));
    }

    #[test]
    fn distinct_objects_differ_even_when_equal() {
        let first = Rc::new(ObjectData::default());
        let second = Rc::new(ObjectData::default());
        assert_eq!(first, second);
        assert_ne!(IdentityToken::object(&first), IdentityToken::object(&second));
    }

    #[test]
    fn object_token_is_the_allocation_address() {
        let object = Rc::new(ObjectData::default());
        let mut guard = CycleGuard::new();
        assert_eq!(
            IdentityToken::object(&object),
            IdentityToken::Object(Rc::as_ptr(&object) as usize)
        );
        assert!(guard.enter(IdentityToken::object(&object)));
        assert!(guard.contains(&IdentityToken::object(&Rc::clone(&object))));
        assert!(!guard.contains(&IdentityToken::object(&Rc::new(ObjectData::default()))));
    }
}
