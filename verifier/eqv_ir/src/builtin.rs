//! Names of the built-in types and the primitive scalar kinds.
//!
//! These names are what the default witness registry and the runtime agree
//! on. A user type may shadow none of them.

use crate::Value;

/// The top type. Unknown, wildcard and unresolved type arguments become this.
pub const OBJECT: &str = "Object";
/// Raw name shared by all array-shaped tags; the component is argument 0.
pub const ARRAY: &str = "[]";

pub const BOOL: &str = "bool";
pub const I32: &str = "i32";
pub const I64: &str = "i64";
pub const F32: &str = "f32";
pub const F64: &str = "f64";
pub const CHAR: &str = "char";
pub const STRING: &str = "String";

pub const OPTIONAL: &str = "Optional";
pub const LIST: &str = "List";
pub const SET: &str = "Set";
pub const MAP: &str = "Map";
pub const SORTED_MAP: &str = "SortedMap";
pub const TABLE: &str = "Table";
pub const IMMUTABLE_LIST: &str = "ImmutableList";
pub const IMMUTABLE_SET: &str = "ImmutableSet";

/// Scalar kinds known to the runtime without a user definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I32,
    I64,
    F32,
    F64,
    Char,
    Str,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 7] = [
        PrimitiveKind::Bool,
        PrimitiveKind::I32,
        PrimitiveKind::I64,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
        PrimitiveKind::Char,
        PrimitiveKind::Str,
    ];

    /// Look up the primitive kind for a raw type name.
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            BOOL => Some(PrimitiveKind::Bool),
            I32 => Some(PrimitiveKind::I32),
            I64 => Some(PrimitiveKind::I64),
            F32 => Some(PrimitiveKind::F32),
            F64 => Some(PrimitiveKind::F64),
            CHAR => Some(PrimitiveKind::Char),
            STRING => Some(PrimitiveKind::Str),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => BOOL,
            PrimitiveKind::I32 => I32,
            PrimitiveKind::I64 => I64,
            PrimitiveKind::F32 => F32,
            PrimitiveKind::F64 => F64,
            PrimitiveKind::Char => CHAR,
            PrimitiveKind::Str => STRING,
        }
    }

    /// Strings are references and may be absent; every other kind is a value.
    pub fn is_nullable(self) -> bool {
        matches!(self, PrimitiveKind::Str)
    }

    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }

    /// The value a freshly allocated member of this kind holds.
    pub fn zero(self) -> Value {
        match self {
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::I32 => Value::I32(0),
            PrimitiveKind::I64 => Value::I64(0),
            PrimitiveKind::F32 => Value::F32(0.0),
            PrimitiveKind::F64 => Value::F64(0.0),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::Str => Value::Null,
        }
    }

    /// The not-a-number sentinel for floating kinds.
    pub fn nan(self) -> Option<Value> {
        match self {
            PrimitiveKind::F32 => Some(Value::F32(f32::NAN)),
            PrimitiveKind::F64 => Some(Value::F64(f64::NAN)),
            _ => None,
        }
    }
}
