//! Tagged representation of a single value read from the foreign scripting VM.
//!
//! Every read from the host produces a fresh [`ForeignValue`]. Composite
//! payloads that the host hands out are shared through [`Rc`] so a resolved
//! instance can be held by the walker without copying its members.

use std::fmt;
use std::rc::Rc;

use crate::error::DumpError;

/// Process-assigned identity of a live instance in the foreign VM.
pub type InstanceId = i64;

/// Discriminant of a [`ForeignValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Method,
    Pointer,
    Bool,
    Number,
    Int64,
    String,
    Array,
    Struct,
    Reference,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Method => "method",
            ValueKind::Pointer => "pointer",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::Int64 => "int64",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Struct => "struct",
            ValueKind::Reference => "reference",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque callable handle. The VM sometimes reports the script name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodHandle {
    pub name: Option<String>,
}

/// One value read from the foreign runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignValue {
    Undefined,
    Method(MethodHandle),
    Pointer(u64),
    Bool(bool),
    Number(f64),
    Int64(i64),
    String(String),
    Array(Vec<ForeignValue>),
    Struct(StructValue),
    /// Unresolved descriptor such as `ref instance 100012`.
    Reference(String),
}

/// Composite object: a live instance or a bare object template.
#[derive(Debug, Clone, PartialEq)]
pub enum StructValue {
    Instance(Rc<InstanceData>),
    Object(Rc<ObjectData>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstanceData {
    pub id: InstanceId,
    /// Name of the object (class) the instance was created from.
    pub object_name: String,
    pub members: Members,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectData {
    pub name: Option<String>,
    pub members: Members,
}

/// Member table in the order the VM reported it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Members {
    entries: Vec<(String, ForeignValue)>,
}

impl Members {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a member. A replaced member keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: ForeignValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ForeignValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ForeignValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, ForeignValue)> for Members {
    fn from_iter<T: IntoIterator<Item = (N, ForeignValue)>>(iter: T) -> Self {
        let mut members = Members::new();
        for (name, value) in iter {
            members.insert(name, value);
        }
        members
    }
}

impl StructValue {
    pub fn members(&self) -> &Members {
        match self {
            StructValue::Instance(instance) => &instance.members,
            StructValue::Object(object) => &object.members,
        }
    }

    pub fn member(&self, name: &str) -> Option<&ForeignValue> {
        self.members().get(name)
    }

    pub fn require_member(&self, name: &str) -> Result<&ForeignValue, DumpError> {
        self.member(name).ok_or_else(|| DumpError::MissingMember {
            member: name.to_string(),
        })
    }

    /// Object name for instances, template name (if any) for bare objects.
    pub fn name(&self) -> Option<&str> {
        match self {
            StructValue::Instance(instance) => Some(instance.object_name.as_str()),
            StructValue::Object(object) => object.name.as_deref(),
        }
    }
}

impl InstanceData {
    pub fn new(id: InstanceId, object_name: impl Into<String>, members: Members) -> Self {
        Self {
            id,
            object_name: object_name.into(),
            members,
        }
    }

    pub fn member(&self, name: &str) -> Option<&ForeignValue> {
        self.members.get(name)
    }

    pub fn require_member(&self, name: &str) -> Result<&ForeignValue, DumpError> {
        self.member(name).ok_or_else(|| DumpError::MissingMember {
            member: name.to_string(),
        })
    }
}

impl ForeignValue {
    pub fn string(text: impl Into<String>) -> Self {
        ForeignValue::String(text.into())
    }

    pub fn reference(descriptor: impl Into<String>) -> Self {
        ForeignValue::Reference(descriptor.into())
    }

    pub fn method(name: Option<&str>) -> Self {
        ForeignValue::Method(MethodHandle {
            name: name.map(str::to_string),
        })
    }

    pub fn instance(id: InstanceId, object_name: impl Into<String>, members: Members) -> Self {
        ForeignValue::Struct(StructValue::Instance(Rc::new(InstanceData::new(
            id,
            object_name,
            members,
        ))))
    }

    pub fn object(name: Option<&str>, members: Members) -> Self {
        ForeignValue::Struct(StructValue::Object(Rc::new(ObjectData {
            name: name.map(str::to_string),
            members,
        })))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            ForeignValue::Undefined => ValueKind::Undefined,
            ForeignValue::Method(_) => ValueKind::Method,
            ForeignValue::Pointer(_) => ValueKind::Pointer,
            ForeignValue::Bool(_) => ValueKind::Bool,
            ForeignValue::Number(_) => ValueKind::Number,
            ForeignValue::Int64(_) => ValueKind::Int64,
            ForeignValue::String(_) => ValueKind::String,
            ForeignValue::Array(_) => ValueKind::Array,
            ForeignValue::Struct(_) => ValueKind::Struct,
            ForeignValue::Reference(_) => ValueKind::Reference,
        }
    }

    pub fn try_as_bool(&self) -> Option<bool> {
        match self {
            ForeignValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn try_as_number(&self) -> Option<f64> {
        match self {
            ForeignValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Like [`try_as_number`](Self::try_as_number) but also widens `Int64`.
    pub fn try_as_numeric(&self) -> Option<f64> {
        match self {
            ForeignValue::Number(value) => Some(*value),
            ForeignValue::Int64(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn try_as_int64(&self) -> Option<i64> {
        match self {
            ForeignValue::Int64(value) => Some(*value),
            _ => None,
        }
    }

    pub fn try_as_string(&self) -> Option<&str> {
        match self {
            ForeignValue::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn try_as_array(&self) -> Option<&[ForeignValue]> {
        match self {
            ForeignValue::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn try_as_struct(&self) -> Option<&StructValue> {
        match self {
            ForeignValue::Struct(value) => Some(value),
            _ => None,
        }
    }

    pub fn try_as_instance(&self) -> Option<&Rc<InstanceData>> {
        match self {
            ForeignValue::Struct(StructValue::Instance(instance)) => Some(instance),
            _ => None,
        }
    }

    pub fn try_as_reference(&self) -> Option<&str> {
        match self {
            ForeignValue::Reference(descriptor) => Some(descriptor.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Result<bool, DumpError> {
        self.try_as_bool()
            .ok_or_else(|| self.mismatch(ValueKind::Bool))
    }

    pub fn as_number(&self) -> Result<f64, DumpError> {
        self.try_as_number()
            .ok_or_else(|| self.mismatch(ValueKind::Number))
    }

    pub fn as_numeric(&self) -> Result<f64, DumpError> {
        self.try_as_numeric()
            .ok_or_else(|| self.mismatch(ValueKind::Number))
    }

    pub fn as_int64(&self) -> Result<i64, DumpError> {
        self.try_as_int64()
            .ok_or_else(|| self.mismatch(ValueKind::Int64))
    }

    pub fn as_string(&self) -> Result<&str, DumpError> {
        self.try_as_string()
            .ok_or_else(|| self.mismatch(ValueKind::String))
    }

    pub fn as_array(&self) -> Result<&[ForeignValue], DumpError> {
        self.try_as_array()
            .ok_or_else(|| self.mismatch(ValueKind::Array))
    }

    pub fn as_struct(&self) -> Result<&StructValue, DumpError> {
        self.try_as_struct()
            .ok_or_else(|| self.mismatch(ValueKind::Struct))
    }

    pub fn as_instance(&self) -> Result<&Rc<InstanceData>, DumpError> {
        self.try_as_instance()
            .ok_or_else(|| self.mismatch(ValueKind::Struct))
    }

    pub fn as_reference(&self) -> Result<&str, DumpError> {
        self.try_as_reference()
            .ok_or_else(|| self.mismatch(ValueKind::Reference))
    }

    /// Member of a struct value; `None` for every other kind.
    pub fn member(&self, name: &str) -> Option<&ForeignValue> {
        self.try_as_struct().and_then(|value| value.member(name))
    }

    fn mismatch(&self, expected: ValueKind) -> DumpError {
        DumpError::mismatch(expected, self.kind())
    }
}

impl From<bool> for ForeignValue {
    fn from(value: bool) -> Self {
        ForeignValue::Bool(value)
    }
}

impl From<f64> for ForeignValue {
    fn from(value: f64) -> Self {
        ForeignValue::Number(value)
    }
}

impl From<i64> for ForeignValue {
    fn from(value: i64) -> Self {
        ForeignValue::Int64(value)
    }
}

impl From<&str> for ForeignValue {
    fn from(value: &str) -> Self {
        ForeignValue::String(value.to_string())
    }
}

impl From<String> for ForeignValue {
    fn from(value: String) -> Self {
        ForeignValue::String(value)
    }
}

impl From<Vec<ForeignValue>> for ForeignValue {
    fn from(items: Vec<ForeignValue>) -> Self {
        ForeignValue::Array(items)
    }
}
