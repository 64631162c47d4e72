//! Runtime values.
//!
//! `Value` is the uniform representation of everything a member can hold.
//! Scalars and strings are plain data; objects, arrays and containers are
//! shared handles with identity, so that "a distinct instance with the same
//! contents" can be expressed.

mod container;
mod object;

use std::fmt;
use std::sync::Arc;

pub use container::{ContainerShape, ContainerValue};
pub use object::{ArrayRef, ObjectRef};

use crate::Name;

/// One constant of an enumeration type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumConstant {
    pub ty: Name,
    pub ordinal: u32,
    pub name: Name,
}

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    /// The absent reference.
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    /// A string. Each `Arc` allocation is a distinct instance.
    Str(Arc<str>),
    Enum(EnumConstant),
    Array(ArrayRef),
    Object(ObjectRef),
    Container(ContainerValue),
}

impl Value {
    /// A freshly allocated string.
    pub fn str(content: &str) -> Self {
        Value::Str(Arc::from(content))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(f) => Some(f64::from(*f)),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumConstant> {
        match self {
            Value::Enum(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&ContainerValue> {
        match self {
            Value::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Short name of the value's shape, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Enum(_) => "enum constant",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Container(_) => "container",
        }
    }

    /// Deep structural comparison, independent of any type's own `equals`.
    ///
    /// Floats compare by bit pattern. Objects compare by type and member
    /// values, arrays by component type and cells, containers by kind and
    /// contents in stored order. Cyclic object graphs are handled: a pair
    /// already under comparison is assumed equal.
    pub fn structurally_equal(&self, other: &Value) -> bool {
        structural_eq(self, other, &mut Vec::new())
    }

    /// Identity comparison: the same handle for reference-like values, the
    /// same bits for scalars.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Container(a), Value::Container(b)) => a.ptr_eq(b),
            (Value::Str(_) | Value::Array(_) | Value::Object(_) | Value::Container(_), _)
            | (_, Value::Str(_) | Value::Array(_) | Value::Object(_) | Value::Container(_)) => {
                false
            }
            _ => scalar_eq(self, other),
        }
    }
}

/// Canonical comparison of non-reference values.
pub(crate) fn scalar_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::I32(x), Value::I32(y)) => x == y,
        (Value::I64(x), Value::I64(y)) => x == y,
        (Value::F32(x), Value::F32(y)) => x.to_bits() == y.to_bits(),
        (Value::F64(x), Value::F64(y)) => x.to_bits() == y.to_bits(),
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::Enum(x), Value::Enum(y)) => x.ty == y.ty && x.ordinal == y.ordinal,
        _ => false,
    }
}

fn structural_eq(a: &Value, b: &Value, in_progress: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if x.tag() != y.tag() {
                return false;
            }
            let pair = (x.addr(), y.addr());
            if in_progress.contains(&pair) {
                return true;
            }
            in_progress.push(pair);
            let equal = cells_eq(&x.slots(), &y.slots(), in_progress);
            in_progress.pop();
            equal
        }
        (Value::Array(x), Value::Array(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if x.component() != y.component() {
                return false;
            }
            let pair = (x.addr(), y.addr());
            if in_progress.contains(&pair) {
                return true;
            }
            in_progress.push(pair);
            let equal = cells_eq(&x.cells(), &y.cells(), in_progress);
            in_progress.pop();
            equal
        }
        (Value::Container(x), Value::Container(y)) => {
            if x.ptr_eq(y) {
                return true;
            }
            if x.kind() != y.kind() {
                return false;
            }
            match (x.shape(), y.shape()) {
                (ContainerShape::Optional(p), ContainerShape::Optional(q)) => match (p, q) {
                    (None, None) => true,
                    (Some(p), Some(q)) => structural_eq(p, q, in_progress),
                    _ => false,
                },
                (ContainerShape::Seq(p), ContainerShape::Seq(q))
                | (ContainerShape::Set(p), ContainerShape::Set(q)) => cells_eq(p, q, in_progress),
                (ContainerShape::Map(p), ContainerShape::Map(q)) => {
                    p.len() == q.len()
                        && p.iter().zip(q).all(|((k1, v1), (k2, v2))| {
                            structural_eq(k1, k2, in_progress) && structural_eq(v1, v2, in_progress)
                        })
                }
                (ContainerShape::Table(p), ContainerShape::Table(q)) => {
                    p.len() == q.len()
                        && p.iter().zip(q).all(|((r1, c1, v1), (r2, c2, v2))| {
                            structural_eq(r1, r2, in_progress)
                                && structural_eq(c1, c2, in_progress)
                                && structural_eq(v1, v2, in_progress)
                        })
                }
                _ => false,
            }
        }
        (Value::Str(_) | Value::Object(_) | Value::Array(_) | Value::Container(_), _)
        | (_, Value::Str(_) | Value::Object(_) | Value::Array(_) | Value::Container(_)) => false,
        _ => scalar_eq(a, b),
    }
}

fn cells_eq(a: &[Value], b: &[Value], in_progress: &mut Vec<(usize, usize)>) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| structural_eq(x, y, in_progress))
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::I32(n) => write!(f, "I32({n})"),
            Value::I64(n) => write!(f, "I64({n})"),
            Value::F32(x) => write!(f, "F32({x:?})"),
            Value::F64(x) => write!(f, "F64({x:?})"),
            Value::Char(c) => write!(f, "Char({c:?})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Enum(c) => write!(f, "Enum({}.{})", c.ty, c.name),
            Value::Array(a) => write!(f, "{a:?}"),
            Value::Object(o) => write!(f, "{o:?}"),
            Value::Container(c) => write!(f, "{c:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::I32(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::I64(n)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::F32(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::F64(x)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<ArrayRef> for Value {
    fn from(a: ArrayRef) -> Self {
        Value::Array(a)
    }
}

impl From<ContainerValue> for Value {
    fn from(c: ContainerValue) -> Self {
        Value::Container(c)
    }
}
