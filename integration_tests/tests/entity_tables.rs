mod common;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use common::members;
use vm_dump::{
    resolve_instance, DumpError, EntitySource, FnSource, ForeignValue, HostRuntime, InstanceData,
    LazyTable, MemoryHost, TableRegistry, ValueKind,
};

#[derive(Debug, Clone, PartialEq)]
struct Creature {
    id: i64,
    name: String,
    hp: f64,
    level: i64,
}

impl Creature {
    fn from_instance(instance: &InstanceData) -> Result<Self, DumpError> {
        Ok(Self {
            id: instance.id,
            name: instance.require_member("name")?.as_string()?.to_string(),
            hp: instance.require_member("hp")?.as_numeric()?,
            level: instance.require_member("level")?.as_int64()?,
        })
    }
}

/// Creatures live in the `ds_list` with handle `bestiary`; slots the game has
/// not spawned yet hold `undefined`.
struct Bestiary {
    host: Rc<RefCell<MemoryHost>>,
}

impl Bestiary {
    fn slots(&self) -> Vec<ForeignValue> {
        self.host
            .borrow()
            .list("bestiary")
            .map(|items| items.to_vec())
            .unwrap_or_default()
    }
}

impl EntitySource for Bestiary {
    type Key = i64;
    type Value = Creature;

    fn name(&self) -> &'static str {
        "creatures"
    }

    fn keys(&self) -> Vec<i64> {
        let host = self.host.borrow();
        self.slots()
            .iter()
            .filter_map(|slot| resolve_instance(&*host, slot))
            .map(|instance| instance.id)
            .collect()
    }

    fn fetch(&self, key: &i64) -> Option<Creature> {
        let instance = self.host.borrow().instance(*key)?;
        Creature::from_instance(&instance).ok()
    }
}

fn spawn(host: &mut MemoryHost, id: i64, name: &str, hp: f64) -> ForeignValue {
    host.insert_instance(
        id,
        "obj_creature",
        members([
            ("name", ForeignValue::from(name)),
            ("hp", ForeignValue::from(hp)),
            ("level", ForeignValue::from(1_i64)),
        ]),
    )
}

fn bestiary() -> Rc<RefCell<MemoryHost>> {
    let mut host = MemoryHost::new();
    let slime = spawn(&mut host, 10, "slime", 5.0);
    let bat = spawn(&mut host, 11, "bat", 3.0);
    host.insert_list(
        "bestiary",
        vec![slime, ForeignValue::Undefined, bat],
    );
    Rc::new(RefCell::new(host))
}

#[test]
fn table_reads_records_through_typed_accessors() -> Result<()> {
    let host = bestiary();
    let mut table = LazyTable::new(Bestiary {
        host: Rc::clone(&host),
    });
    assert_eq!(table.keys(), vec![10, 11]);
    let names: Vec<&str> = table
        .values()?
        .into_iter()
        .map(|creature| creature.name.as_str())
        .collect();
    assert_eq!(names, vec!["slime", "bat"]);
    assert_eq!(table.require(&11)?.hp, 3.0);
    Ok(())
}

#[test]
fn count_ignores_creatures_spawned_later() {
    let host = bestiary();
    let mut table = LazyTable::new(Bestiary {
        host: Rc::clone(&host),
    });
    assert_eq!(table.count(), 2);

    {
        let mut host = host.borrow_mut();
        let slime = vm_dump::instance_ref(10);
        let bat = vm_dump::instance_ref(11);
        let wolf = spawn(&mut host, 12, "wolf", 9.0);
        host.insert_list("bestiary", vec![slime, bat, wolf]);
    }

    assert_eq!(table.count(), 2);
    assert_eq!(table.keys().len(), 3);
    assert_eq!(table.get(&12).map(|c| c.name.as_str()), Some("wolf"));
}

#[test]
fn despawned_instance_is_refetched_not_cached() {
    let host = bestiary();
    let mut table = LazyTable::new(Bestiary {
        host: Rc::clone(&host),
    });
    host.borrow_mut().remove_instance(11);
    assert!(!table.contains(&11));

    spawn(&mut host.borrow_mut(), 11, "bat", 4.0);
    assert!(table.contains(&11));
    assert_eq!(table.get(&11).map(|c| c.hp), Some(4.0));
}

#[test]
fn record_with_wrong_field_kind_fails_fast() {
    let instance = InstanceData::new(
        1,
        "obj_creature",
        members([
            ("name", ForeignValue::from(3.0)),
            ("hp", ForeignValue::from(1.0)),
            ("level", ForeignValue::from(1_i64)),
        ]),
    );
    assert_eq!(
        Creature::from_instance(&instance),
        Err(DumpError::TypeMismatch {
            expected: ValueKind::String,
            actual: ValueKind::Number,
        })
    );
}

#[test]
fn values_stop_at_unresolvable_key() {
    let fetched = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&fetched);
    let mut table = LazyTable::new(FnSource::new(
        "numbers",
        || vec![1_u32, 2, 3],
        move |key: &u32| {
            log.borrow_mut().push(*key);
            match key {
                1 => Some("x"),
                3 => Some("y"),
                _ => None,
            }
        },
    ));

    let err = table.values().unwrap_err();
    assert_eq!(
        err,
        DumpError::KeyUnresolvable {
            table: "numbers",
            key: "2".into(),
        }
    );
    assert_eq!(*fetched.borrow(), vec![1, 2]);

    // A retry fetches the missing key again but not the cached one.
    assert!(table.values().is_err());
    assert_eq!(*fetched.borrow(), vec![1, 2, 2]);
}

#[test]
fn registry_threads_tables_to_consumers() -> Result<()> {
    let host = bestiary();
    let mut registry = TableRegistry::new();
    registry.register(Bestiary {
        host: Rc::clone(&host),
    })?;

    fn strongest(registry: &mut TableRegistry) -> Result<Option<String>> {
        let table = registry
            .table_mut::<Bestiary>()
            .ok_or_else(|| anyhow::anyhow!("creature table missing"))?;
        Ok(table
            .values()?
            .into_iter()
            .max_by(|a, b| a.hp.total_cmp(&b.hp))
            .map(|creature| creature.name.clone()))
    }

    assert_eq!(strongest(&mut registry)?, Some("slime".to_string()));
    let table = registry
        .table::<Bestiary>()
        .ok_or_else(|| anyhow::anyhow!("creature table missing"))?;
    assert_eq!(table.cached_len(), 2);
    Ok(())
}
