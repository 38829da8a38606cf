//! Seam between the dumper and whatever is attached to the game process.
//!
//! The attach mechanism lives outside this crate. It only has to answer the
//! three lookups in [`HostRuntime`]. [`MemoryHost`] answers them from data
//! held in memory and backs the tests.

use std::rc::Rc;

use ahash::AHashMap;

use crate::reference::{parse_descriptor, RefTarget};
use crate::value::{ForeignValue, InstanceData, InstanceId, Members, StructValue};

/// Lookups the foreign runtime must provide to expand references.
pub trait HostRuntime {
    fn instance(&self, id: InstanceId) -> Option<Rc<InstanceData>>;
    fn list(&self, handle: &str) -> Option<Rc<[ForeignValue]>>;
    fn map(&self, handle: &str) -> Option<Rc<[(ForeignValue, ForeignValue)]>>;
}

/// A reference descriptor after asking the host about it.
#[derive(Debug, Clone)]
pub enum Resolved {
    Instance(Rc<InstanceData>),
    List {
        handle: String,
        items: Rc<[ForeignValue]>,
    },
    Map {
        handle: String,
        entries: Rc<[(ForeignValue, ForeignValue)]>,
    },
    /// Subkind the dumper does not expand.
    Foreign,
    /// Malformed descriptor, or the host no longer knows the target.
    Invalid,
}

pub fn resolve<H: HostRuntime + ?Sized>(host: &H, descriptor: &str) -> Resolved {
    match parse_descriptor(descriptor) {
        RefTarget::Instance(id) => host
            .instance(id)
            .map(Resolved::Instance)
            .unwrap_or(Resolved::Invalid),
        RefTarget::List(handle) => match host.list(&handle) {
            Some(items) => Resolved::List { handle, items },
            None => Resolved::Invalid,
        },
        RefTarget::Map(handle) => match host.map(&handle) {
            Some(entries) => Resolved::Map { handle, entries },
            None => Resolved::Invalid,
        },
        RefTarget::Invalid => Resolved::Invalid,
        RefTarget::Other => Resolved::Foreign,
    }
}

/// Instance behind `value`, whether inline or behind an instance reference.
pub fn resolve_instance<H: HostRuntime + ?Sized>(
    host: &H,
    value: &ForeignValue,
) -> Option<Rc<InstanceData>> {
    match value {
        ForeignValue::Struct(StructValue::Instance(instance)) => Some(Rc::clone(instance)),
        ForeignValue::Reference(descriptor) => match parse_descriptor(descriptor) {
            RefTarget::Instance(id) => host.instance(id),
            _ => None,
        },
        _ => None,
    }
}

pub fn instance_ref(id: InstanceId) -> ForeignValue {
    ForeignValue::Reference(format!("ref instance {id}"))
}

pub fn list_ref(handle: impl std::fmt::Display) -> ForeignValue {
    ForeignValue::Reference(format!("ref ds_list {handle}"))
}

pub fn map_ref(handle: impl std::fmt::Display) -> ForeignValue {
    ForeignValue::Reference(format!("ref ds_map {handle}"))
}

/// Host backed by in-memory tables.
#[derive(Debug, Default, Clone)]
pub struct MemoryHost {
    instances: AHashMap<InstanceId, Rc<InstanceData>>,
    lists: AHashMap<String, Rc<[ForeignValue]>>,
    maps: AHashMap<String, Rc<[(ForeignValue, ForeignValue)]>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live instance and returns a reference to it.
    pub fn insert_instance(
        &mut self,
        id: InstanceId,
        object_name: &str,
        members: Members,
    ) -> ForeignValue {
        self.instances
            .insert(id, Rc::new(InstanceData::new(id, object_name, members)));
        instance_ref(id)
    }

    pub fn insert_list(&mut self, handle: &str, items: Vec<ForeignValue>) -> ForeignValue {
        self.lists.insert(handle.to_string(), items.into());
        list_ref(handle)
    }

    pub fn insert_map(
        &mut self,
        handle: &str,
        entries: Vec<(ForeignValue, ForeignValue)>,
    ) -> ForeignValue {
        self.maps.insert(handle.to_string(), entries.into());
        map_ref(handle)
    }

    pub fn remove_instance(&mut self, id: InstanceId) -> bool {
        self.instances.remove(&id).is_some()
    }
}

impl HostRuntime for MemoryHost {
    fn instance(&self, id: InstanceId) -> Option<Rc<InstanceData>> {
        self.instances.get(&id).cloned()
    }

    fn list(&self, handle: &str) -> Option<Rc<[ForeignValue]>> {
        self.lists.get(handle).cloned()
    }

    fn map(&self, handle: &str) -> Option<Rc<[(ForeignValue, ForeignValue)]>> {
        self.maps.get(handle).cloned()
    }
}
