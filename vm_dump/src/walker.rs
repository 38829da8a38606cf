//! Recursive traversal of a foreign value graph.
//!
//! A single [`Traversal`] drives either output strategy. Termination on
//! cyclic graphs comes from the [`CycleGuard`]; the per-strategy depth
//! ceiling bounds deep acyclic graphs. Neither condition is an error: both
//! render a placeholder and the dump carries on.

use std::rc::Rc;

use serde_json::Value as JsonValue;

use crate::config::DumpConfig;
use crate::host::{resolve, HostRuntime, Resolved};
use crate::identity::{CycleGuard, IdentityToken};
use crate::render::{Header, JsonStrategy, RenderStrategy, TextStrategy};
use crate::value::{ForeignValue, InstanceData, ObjectData, StructValue};

/// Counters gathered during one dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpStats {
    pub nodes: usize,
    pub cycles: usize,
    pub depth_limits: usize,
    pub invalid_references: usize,
}

/// State of one top-level dump. Dropped when the dump finishes.
pub struct Traversal<'h, H: ?Sized, S> {
    host: &'h H,
    strategy: S,
    guard: CycleGuard,
    stats: DumpStats,
}

impl<'h, H, S> Traversal<'h, H, S>
where
    H: HostRuntime + ?Sized,
    S: RenderStrategy,
{
    pub fn new(host: &'h H, strategy: S) -> Self {
        Self {
            host,
            strategy,
            guard: CycleGuard::new(),
            stats: DumpStats::default(),
        }
    }

    pub fn run(mut self, root: &ForeignValue) -> (S::Node, DumpStats) {
        let node = self.visit(root, 0);
        tracing::debug!(
            target: "vm_dump::walker",
            nodes = self.stats.nodes,
            cycles = self.stats.cycles,
            depth_limits = self.stats.depth_limits,
            invalid_references = self.stats.invalid_references,
            "walker.dump_complete"
        );
        (node, self.stats)
    }

    fn visit(&mut self, value: &ForeignValue, depth: usize) -> S::Node {
        self.stats.nodes += 1;
        match value {
            ForeignValue::Undefined => self.strategy.undefined(),
            ForeignValue::Method(method) => self.strategy.method(method),
            ForeignValue::Pointer(address) => self.strategy.pointer(*address),
            ForeignValue::Bool(flag) => self.strategy.boolean(*flag),
            ForeignValue::Number(number) => self.strategy.number(*number),
            ForeignValue::Int64(number) => self.strategy.int64(*number),
            ForeignValue::String(text) => self.strategy.string(text),
            ForeignValue::Array(items) => self.visit_array(items, depth),
            ForeignValue::Struct(StructValue::Instance(instance)) => {
                self.visit_instance(instance, depth)
            }
            ForeignValue::Struct(StructValue::Object(object)) => self.visit_object(object, depth),
            ForeignValue::Reference(descriptor) => self.visit_reference(descriptor, depth),
        }
    }

    fn visit_array(&mut self, items: &[ForeignValue], depth: usize) -> S::Node {
        if self.at_ceiling(depth) {
            return self.depth_limited(depth);
        }
        let header = Header::Array { len: items.len() };
        let rendered = items
            .iter()
            .map(|item| self.visit(item, depth + 1))
            .collect();
        self.strategy.sequence(&header, rendered)
    }

    fn visit_instance(&mut self, instance: &InstanceData, depth: usize) -> S::Node {
        if let Some(node) = self.gate(IdentityToken::Instance(instance.id), depth) {
            return node;
        }
        let header = Header::Instance {
            id: instance.id,
            object_name: &instance.object_name,
        };
        let members = instance
            .members
            .iter()
            .map(|(name, value)| (name, self.visit(value, depth + 1)))
            .collect();
        self.strategy.members(&header, members)
    }

    fn visit_object(&mut self, object: &Rc<ObjectData>, depth: usize) -> S::Node {
        if let Some(node) = self.gate(IdentityToken::object(object), depth) {
            return node;
        }
        let header = Header::Object {
            name: object.name.as_deref(),
        };
        let members = object
            .members
            .iter()
            .map(|(name, value)| (name, self.visit(value, depth + 1)))
            .collect();
        self.strategy.members(&header, members)
    }

    fn visit_reference(&mut self, descriptor: &str, depth: usize) -> S::Node {
        let resolved = resolve(self.host, descriptor);
        self.guard.pin(&resolved);
        match resolved {
            Resolved::Instance(instance) => self.visit_instance(&instance, depth),
            Resolved::List { handle, items } => {
                if let Some(node) = self.gate(IdentityToken::List(handle.clone()), depth) {
                    return node;
                }
                let header = Header::List {
                    handle: &handle,
                    len: items.len(),
                };
                let rendered = items
                    .iter()
                    .map(|item| self.visit(item, depth + 1))
                    .collect();
                self.strategy.sequence(&header, rendered)
            }
            Resolved::Map { handle, entries } => {
                if let Some(node) = self.gate(IdentityToken::Map(handle.clone()), depth) {
                    return node;
                }
                let header = Header::Map {
                    handle: &handle,
                    len: entries.len(),
                };
                let rendered = entries
                    .iter()
                    .map(|(key, value)| (self.visit(key, depth + 1), self.visit(value, depth + 1)))
                    .collect();
                self.strategy.entries(&header, rendered)
            }
            Resolved::Foreign => self.strategy.foreign_reference(descriptor),
            Resolved::Invalid => {
                self.stats.invalid_references += 1;
                tracing::debug!(
                    target: "vm_dump::walker",
                    descriptor,
                    "walker.invalid_reference"
                );
                self.strategy.invalid_reference(descriptor)
            }
        }
    }

    /// Placeholder for a composite that must not be expanded, if any.
    /// Otherwise records the composite as visited.
    fn gate(&mut self, token: IdentityToken, depth: usize) -> Option<S::Node> {
        if self.guard.contains(&token) {
            self.stats.cycles += 1;
            tracing::trace!(
                target: "vm_dump::walker",
                token = ?token,
                depth,
                "walker.already_seen"
            );
            return Some(self.strategy.seen());
        }
        if self.at_ceiling(depth) {
            return Some(self.depth_limited(depth));
        }
        self.guard.enter(token);
        None
    }

    fn at_ceiling(&self, depth: usize) -> bool {
        depth >= self.strategy.max_depth()
    }

    fn depth_limited(&mut self, depth: usize) -> S::Node {
        self.stats.depth_limits += 1;
        tracing::debug!(
            target: "vm_dump::walker",
            depth,
            max_depth = self.strategy.max_depth(),
            "walker.recursion_limit"
        );
        self.strategy.depth_limit()
    }
}

/// Renders `root` as an indented text tree.
pub fn dump_text<H: HostRuntime + ?Sized>(
    host: &H,
    root: &ForeignValue,
    config: &DumpConfig,
) -> String {
    let (node, _) = Traversal::new(host, TextStrategy::new(config)).run(root);
    node.into_string()
}

/// Renders `root` as a JSON tree.
pub fn dump_json<H: HostRuntime + ?Sized>(
    host: &H,
    root: &ForeignValue,
    config: &DumpConfig,
) -> JsonValue {
    let (node, _) = Traversal::new(host, JsonStrategy::new(config)).run(root);
    node
}
