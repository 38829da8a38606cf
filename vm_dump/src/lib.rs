//! Diagnostic dumper for a game's scripting VM.
//!
//! Values read from the VM are modelled as [`ForeignValue`]s. The walker in
//! [`walker`] renders any value graph, cyclic or not, either as an indented
//! text tree for logs ([`dump_text`]) or as a JSON tree ([`dump_json`]).
//! Entity data is read through memoizing [`LazyTable`]s kept in a
//! [`TableRegistry`].

pub mod cache;
pub mod config;
mod error;
pub mod escape;
pub mod host;
pub mod identity;
pub mod logging;
pub mod reference;
pub mod registry;
pub mod render;
pub mod value;
pub mod walker;

pub use cache::{EntitySource, FnSource, LazyTable};
pub use config::{load_dump_config_from_env, DumpConfig, DumpConfigError};
pub use error::DumpError;
pub use host::{
    instance_ref, list_ref, map_ref, resolve, resolve_instance, HostRuntime, MemoryHost, Resolved,
};
pub use identity::{CycleGuard, IdentityToken};
pub use reference::{parse_descriptor, RefTarget};
pub use registry::TableRegistry;
pub use render::{Header, JsonStrategy, RenderStrategy, TextNode, TextStrategy};
pub use value::{
    ForeignValue, InstanceData, InstanceId, Members, MethodHandle, ObjectData, StructValue,
    ValueKind,
};
pub use walker::{dump_json, dump_text, DumpStats, Traversal};
