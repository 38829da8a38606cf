//! Output strategies driven by the walker.
//!
//! The walker decides what to visit; a [`RenderStrategy`] decides how each
//! visited piece looks. Nodes are built bottom-up, children before parents.

mod json;
mod text;

pub use json::JsonStrategy;
pub use text::{TextNode, TextStrategy};

use crate::value::{InstanceId, MethodHandle};

/// Describes the composite a list of children belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Header<'a> {
    Array { len: usize },
    Instance { id: InstanceId, object_name: &'a str },
    Object { name: Option<&'a str> },
    List { handle: &'a str, len: usize },
    Map { handle: &'a str, len: usize },
}

pub trait RenderStrategy {
    type Node;

    /// Composites at this depth are replaced with [`depth_limit`](Self::depth_limit).
    fn max_depth(&self) -> usize;

    fn undefined(&mut self) -> Self::Node;
    fn method(&mut self, method: &MethodHandle) -> Self::Node;
    fn pointer(&mut self, address: u64) -> Self::Node;
    fn boolean(&mut self, value: bool) -> Self::Node;
    fn number(&mut self, value: f64) -> Self::Node;
    fn int64(&mut self, value: i64) -> Self::Node;
    fn string(&mut self, value: &str) -> Self::Node;

    /// Reference whose subkind is never expanded.
    fn foreign_reference(&mut self, descriptor: &str) -> Self::Node;
    /// Reference that is malformed or that the host could not resolve.
    fn invalid_reference(&mut self, descriptor: &str) -> Self::Node;

    /// Composite already expanded earlier in the same dump.
    fn seen(&mut self) -> Self::Node;
    fn depth_limit(&mut self) -> Self::Node;

    /// Arrays and lists.
    fn sequence(&mut self, header: &Header<'_>, items: Vec<Self::Node>) -> Self::Node;
    /// Instances and objects, members in reported order.
    fn members(&mut self, header: &Header<'_>, members: Vec<(&str, Self::Node)>) -> Self::Node;
    /// Maps, as ordered key/value pairs.
    fn entries(&mut self, header: &Header<'_>, entries: Vec<(Self::Node, Self::Node)>)
        -> Self::Node;
}
