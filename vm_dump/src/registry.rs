//! One [`LazyTable`] per entity kind, owned by an explicit context value.
//!
//! Build the registry once when the dumper attaches and pass it by reference
//! to whatever needs entity data.

use std::any::{Any, TypeId};

use ahash::AHashMap;

use crate::cache::{EntitySource, LazyTable};
use crate::error::DumpError;

#[derive(Default)]
pub struct TableRegistry {
    tables: AHashMap<TypeId, Box<dyn Any>>,
    names: Vec<&'static str>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the table for `S`. Each source type may be registered once.
    pub fn register<S>(&mut self, source: S) -> Result<(), DumpError>
    where
        S: EntitySource + 'static,
    {
        let name = source.name();
        let type_id = TypeId::of::<S>();
        if self.tables.contains_key(&type_id) {
            return Err(DumpError::DuplicateTable { table: name });
        }
        self.tables
            .insert(type_id, Box::new(LazyTable::new(source)));
        self.names.push(name);
        tracing::debug!(
            target: "vm_dump::registry",
            table = name,
            "registry.table_registered"
        );
        Ok(())
    }

    pub fn table<S>(&self) -> Option<&LazyTable<S>>
    where
        S: EntitySource + 'static,
    {
        self.tables
            .get(&TypeId::of::<S>())
            .and_then(|table| table.downcast_ref::<LazyTable<S>>())
    }

    pub fn table_mut<S>(&mut self) -> Option<&mut LazyTable<S>>
    where
        S: EntitySource + 'static,
    {
        self.tables
            .get_mut(&TypeId::of::<S>())
            .and_then(|table| table.downcast_mut::<LazyTable<S>>())
    }

    /// Registered table names in registration order.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
