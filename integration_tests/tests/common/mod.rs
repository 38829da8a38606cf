#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use vm_dump::{instance_ref, ForeignValue, Members, MemoryHost};

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("test_dump_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test dump config at {}",
            config_path.display()
        );

        std::env::set_var(vm_dump::config::CONFIG_PATH_ENV, &config_path);
        vm_dump::logging::init_tracing();
    });
}

pub fn members<const N: usize>(entries: [(&str, ForeignValue); N]) -> Members {
    entries.into_iter().collect()
}

/// `depth` nested bare objects, each holding the next under `next`.
pub fn object_chain(depth: usize) -> ForeignValue {
    let mut value = ForeignValue::from(true);
    for level in (0..depth).rev() {
        value = ForeignValue::object(
            None,
            members([("level", ForeignValue::from(level as f64)), ("next", value)]),
        );
    }
    value
}

/// `depth` live instances linked by references, ids `1..=depth`. Every
/// level has a distinct identity, so only the depth ceiling stops the walk.
pub fn instance_chain(host: &mut MemoryHost, depth: usize) -> ForeignValue {
    let depth = depth as i64;
    for id in 1..=depth {
        let next = if id == depth {
            ForeignValue::Undefined
        } else {
            instance_ref(id + 1)
        };
        host.insert_instance(id, "obj_link", members([("next", next)]));
    }
    instance_ref(1)
}

/// Small save-like world: a player with an inventory list, a stats map, and
/// a party array that points back at the player.
pub fn world() -> (MemoryHost, ForeignValue) {
    let mut host = MemoryHost::new();
    let sword = ForeignValue::object(
        Some("item"),
        members([
            ("name", ForeignValue::from("Rusty Sword")),
            ("damage", ForeignValue::from(4.5)),
        ]),
    );
    let inventory = host.insert_list("11", vec![sword, ForeignValue::Undefined]);
    let stats = host.insert_map(
        "12",
        vec![
            (ForeignValue::from("hp"), ForeignValue::from(20.0)),
            (ForeignValue::from(3.0), ForeignValue::from(f64::INFINITY)),
        ],
    );
    let player = host.insert_instance(
        100_001,
        "obj_player",
        members([
            ("name", ForeignValue::from("Ada")),
            ("gold", ForeignValue::from(250_i64)),
            ("inventory", inventory),
            ("stats", stats),
            ("party", ForeignValue::Array(vec![instance_ref(100_001)])),
            ("on_hit", ForeignValue::method(None)),
            ("sprite", ForeignValue::reference("ref sprite spr_ada")),
        ]),
    );
    (host, player)
}

pub fn count_tagged(json: &serde_json::Value, kind: &str) -> usize {
    match json {
        serde_json::Value::Object(map) => {
            let own = usize::from(map.get("type").and_then(|t| t.as_str()) == Some(kind));
            own + map.values().map(|v| count_tagged(v, kind)).sum::<usize>()
        }
        serde_json::Value::Array(items) => items.iter().map(|v| count_tagged(v, kind)).sum(),
        _ => 0,
    }
}
