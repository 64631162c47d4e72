//! The structural introspection capability.
//!
//! A `Runtime` is the table of every type a verification may encounter. It
//! allocates instances without running any initializer, dispatches to each
//! type's own `equals`, `hash_code` and `render`, and copies values into
//! distinct instances.
//!
//! # Equivalence rules
//!
//! | Value        | `equals`                                   |
//! |--------------|--------------------------------------------|
//! | scalars      | canonical, floats by bit pattern           |
//! | strings      | by content                                 |
//! | enum consts  | by type and ordinal                        |
//! | arrays       | by identity                                |
//! | containers   | by contents (lists ordered, sets/maps not) |
//! | objects      | the type's own `equals`, else identity     |

mod def;
mod instance;

use std::fmt::Write as _;
use std::sync::Arc;

use rustc_hash::FxHashMap;

pub use def::{EqualsFn, FieldDef, FieldFlags, HashFn, Methods, RenderFn, TypeDef, TypeKind};
pub use instance::Instance;

use crate::value::scalar_eq;
use crate::{
    builtin, AccessError, ArrayRef, ContainerShape, ContainerValue, InstanceError, Name,
    ObjectRef, PrimitiveKind, TypeTag, Value,
};

/// Table of registered types. Built once, then shared read-only.
#[derive(Clone, Debug)]
pub struct Runtime {
    types: FxHashMap<Name, Arc<TypeDef>>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// A runtime knowing the primitive scalars and the top type.
    pub fn new() -> Self {
        let mut rt = Runtime {
            types: FxHashMap::default(),
        };
        for kind in PrimitiveKind::ALL {
            rt.define(TypeDef::primitive(kind));
        }
        rt.define(TypeDef::abstract_type(builtin::OBJECT));
        rt
    }

    /// Register (or replace) a type definition.
    pub fn define(&mut self, def: TypeDef) -> &mut Self {
        tracing::trace!(ty = %def.name(), "define type");
        self.types.insert(def.name().clone(), Arc::new(def));
        self
    }

    /// Builder form of [`Runtime::define`].
    #[must_use]
    pub fn with(mut self, def: TypeDef) -> Self {
        self.define(def);
        self
    }

    pub fn lookup(&self, raw: &str) -> Option<&Arc<TypeDef>> {
        self.types.get(raw)
    }

    pub fn require(&self, raw: &str) -> Result<&Arc<TypeDef>, AccessError> {
        self.lookup(raw)
            .ok_or_else(|| AccessError::UnknownType(Name::new(raw)))
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.types.contains_key(raw)
    }

    /// The zero/absent value a freshly allocated member of `tag` holds.
    pub fn default_for(&self, tag: &TypeTag) -> Value {
        tag.primitive_kind().map_or(Value::Null, PrimitiveKind::zero)
    }

    /// Allocate an instance of `tag` without running any initializer.
    ///
    /// Every member holds its zero/absent value except `CONSTANT` and
    /// `STATIC` members, which hold their initializer.
    pub fn allocate(&self, tag: &TypeTag) -> Result<ObjectRef, AccessError> {
        let def = self.require(tag.raw())?;
        let reason = match def.kind() {
            TypeKind::Record(fields) => {
                let slots = fields
                    .iter()
                    .map(|field| match &field.initializer {
                        Some(value) if field.is_constant() || field.is_static() => value.clone(),
                        _ => self.default_for(&def.member_tag(field, tag)),
                    })
                    .collect();
                return Ok(ObjectRef::new(tag.clone(), slots));
            }
            TypeKind::Primitive(_) => "primitive values are not objects",
            TypeKind::Enum(_) => "enumeration constants are fixed",
            TypeKind::Abstract => "abstract types have no instances of their own",
        };
        Err(AccessError::NotInstantiable {
            ty: def.name().clone(),
            reason,
        })
    }

    /// View an object the way its own operations see it.
    pub fn instance<'a>(&'a self, obj: &'a ObjectRef) -> Result<Instance<'a>, AccessError> {
        let def = self.require(obj.tag().raw())?;
        Ok(Instance::new(self, obj, def))
    }

    /// Whether the type named `raw` defines its own equivalence.
    pub fn declares_equals(&self, raw: &str) -> bool {
        self.lookup(raw).is_some_and(|def| def.declares_equals())
    }

    // === Equivalence ===

    /// Null-safe equivalence: two absent values are equal, one absent value
    /// equals nothing, otherwise `a.equals(b)`.
    pub fn equals(&self, a: &Value, b: &Value) -> Result<bool, InstanceError> {
        match (a, b) {
            (Value::Null, Value::Null) => Ok(true),
            (Value::Null, _) | (_, Value::Null) => Ok(false),
            _ => self.invoke_equals(a, b),
        }
    }

    /// `receiver.equals(arg)`. An absent receiver is a null dereference.
    pub fn invoke_equals(&self, receiver: &Value, arg: &Value) -> Result<bool, InstanceError> {
        match receiver {
            Value::Null => Err(InstanceError::NullDereference {
                operation: "equals",
            }),
            Value::Str(a) => Ok(matches!(arg, Value::Str(b) if a == b)),
            Value::Array(a) => Ok(matches!(arg, Value::Array(b) if a.ptr_eq(b))),
            Value::Container(a) => match arg {
                Value::Container(b) => self.container_equals(a, b),
                _ => Ok(false),
            },
            Value::Object(obj) => self.object_equals(obj, arg),
            scalar => Ok(scalar_eq(scalar, arg)),
        }
    }

    fn object_equals(&self, obj: &ObjectRef, arg: &Value) -> Result<bool, InstanceError> {
        let Some(def) = self.lookup(obj.tag().raw()) else {
            return Ok(matches!(arg, Value::Object(b) if obj.ptr_eq(b)));
        };
        if matches!(def.kind(), TypeKind::Abstract) {
            return Err(InstanceError::AbstractMethod {
                ty: def.name().clone(),
                operation: "equals",
            });
        }
        match &def.methods().equals {
            Some(equals) => equals(&Instance::new(self, obj, def), arg),
            None => Ok(matches!(arg, Value::Object(b) if obj.ptr_eq(b))),
        }
    }

    fn container_equals(&self, a: &ContainerValue, b: &ContainerValue) -> Result<bool, InstanceError> {
        match (a.shape(), b.shape()) {
            (ContainerShape::Optional(p), ContainerShape::Optional(q)) => match (p, q) {
                (None, None) => Ok(true),
                (Some(p), Some(q)) => self.equals(p, q),
                _ => Ok(false),
            },
            (ContainerShape::Seq(p), ContainerShape::Seq(q)) => {
                if p.len() != q.len() {
                    return Ok(false);
                }
                for (x, y) in p.iter().zip(q) {
                    if !self.equals(x, y)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (ContainerShape::Set(p), ContainerShape::Set(q)) => {
                if p.len() != q.len() {
                    return Ok(false);
                }
                for x in p {
                    if self.position(q, x)?.is_none() {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (ContainerShape::Map(p), ContainerShape::Map(q)) => {
                if p.len() != q.len() {
                    return Ok(false);
                }
                let keys: Vec<Value> = q.iter().map(|(k, _)| k.clone()).collect();
                for (k, v) in p {
                    match self.position(&keys, k)? {
                        Some(i) if self.equals(v, &q[i].1)? => {}
                        _ => return Ok(false),
                    }
                }
                Ok(true)
            }
            (ContainerShape::Table(p), ContainerShape::Table(q)) => {
                if p.len() != q.len() {
                    return Ok(false);
                }
                'cells: for (r, c, v) in p {
                    for (r2, c2, v2) in q {
                        if self.equals(r, r2)? && self.equals(c, c2)? {
                            if self.equals(v, v2)? {
                                continue 'cells;
                            }
                            return Ok(false);
                        }
                    }
                    return Ok(false);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn position(&self, haystack: &[Value], needle: &Value) -> Result<Option<usize>, InstanceError> {
        for (i, candidate) in haystack.iter().enumerate() {
            if self.equals(needle, candidate)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Element-wise array comparison, null-safe. Nested arrays compare by
    /// identity.
    pub fn array_equals(&self, a: &Value, b: &Value) -> Result<bool, InstanceError> {
        match (a, b) {
            (Value::Array(x), Value::Array(y)) => self.cells_equal(x, y, false),
            _ => self.equals(a, b),
        }
    }

    /// Element-wise array comparison that also descends into nested arrays.
    pub fn deep_equals(&self, a: &Value, b: &Value) -> Result<bool, InstanceError> {
        match (a, b) {
            (Value::Array(x), Value::Array(y)) => self.cells_equal(x, y, true),
            _ => self.equals(a, b),
        }
    }

    fn cells_equal(&self, x: &ArrayRef, y: &ArrayRef, deep: bool) -> Result<bool, InstanceError> {
        if x.ptr_eq(y) {
            return Ok(true);
        }
        let (xs, ys) = (x.cells(), y.cells());
        if xs.len() != ys.len() {
            return Ok(false);
        }
        for (p, q) in xs.iter().zip(&ys) {
            let equal = if deep {
                self.deep_equals(p, q)?
            } else {
                self.equals(p, q)?
            };
            if !equal {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // === Hashing ===

    /// Null-safe hash: an absent value hashes to `0`.
    pub fn hash_code(&self, value: &Value) -> Result<i32, InstanceError> {
        if value.is_null() {
            return Ok(0);
        }
        self.invoke_hash(value)
    }

    /// `receiver.hash_code()`. An absent receiver is a null dereference.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub fn invoke_hash(&self, receiver: &Value) -> Result<i32, InstanceError> {
        Ok(match receiver {
            Value::Null => {
                return Err(InstanceError::NullDereference {
                    operation: "hash_code",
                })
            }
            Value::Bool(b) => {
                if *b {
                    1231
                } else {
                    1237
                }
            }
            Value::I32(n) => *n,
            Value::I64(n) => fold64(*n as u64),
            Value::F32(x) => x.to_bits() as i32,
            Value::F64(x) => fold64(x.to_bits()),
            Value::Char(c) => *c as i32,
            Value::Str(s) => string_hash(s),
            Value::Enum(c) => string_hash(c.ty.as_str())
                .wrapping_mul(31)
                .wrapping_add(c.ordinal as i32),
            Value::Array(a) => identity_hash(a.addr()),
            Value::Container(c) => self.container_hash(c)?,
            Value::Object(obj) => self.object_hash(obj)?,
        })
    }

    fn object_hash(&self, obj: &ObjectRef) -> Result<i32, InstanceError> {
        let Some(def) = self.lookup(obj.tag().raw()) else {
            return Ok(identity_hash(obj.addr()));
        };
        if matches!(def.kind(), TypeKind::Abstract) {
            return Err(InstanceError::AbstractMethod {
                ty: def.name().clone(),
                operation: "hash_code",
            });
        }
        match &def.methods().hash_code {
            Some(hash) => hash(&Instance::new(self, obj, def)),
            None => Ok(identity_hash(obj.addr())),
        }
    }

    fn container_hash(&self, c: &ContainerValue) -> Result<i32, InstanceError> {
        let mut h: i32 = 0;
        match c.shape() {
            ContainerShape::Optional(v) => {
                if let Some(v) = v {
                    h = self.hash_code(v)?;
                }
            }
            ContainerShape::Seq(items) => {
                h = 1;
                for item in items {
                    h = h.wrapping_mul(31).wrapping_add(self.hash_code(item)?);
                }
            }
            ContainerShape::Set(items) => {
                for item in items {
                    h = h.wrapping_add(self.hash_code(item)?);
                }
            }
            ContainerShape::Map(entries) => {
                for (k, v) in entries {
                    h = h.wrapping_add(self.hash_code(k)? ^ self.hash_code(v)?);
                }
            }
            ContainerShape::Table(cells) => {
                for (r, col, v) in cells {
                    h = h.wrapping_add(self.hash_code(r)? ^ self.hash_code(col)? ^ self.hash_code(v)?);
                }
            }
        }
        Ok(h)
    }

    /// Element-wise array hash, null-safe, as `31 * h + hash(e)`.
    pub fn array_hash_code(&self, value: &Value) -> Result<i32, InstanceError> {
        self.cells_hash(value, false)
    }

    /// Element-wise array hash that also descends into nested arrays.
    pub fn deep_hash_code(&self, value: &Value) -> Result<i32, InstanceError> {
        self.cells_hash(value, true)
    }

    fn cells_hash(&self, value: &Value, deep: bool) -> Result<i32, InstanceError> {
        let Value::Array(array) = value else {
            return self.hash_code(value);
        };
        let mut h: i32 = 1;
        for cell in array.cells() {
            let cell_hash = if deep {
                self.cells_hash(&cell, true)?
            } else {
                self.hash_code(&cell)?
            };
            h = h.wrapping_mul(31).wrapping_add(cell_hash);
        }
        Ok(h)
    }

    // === Rendering ===

    /// Null-safe string form: an absent value renders as `null`.
    pub fn render(&self, value: &Value) -> Result<String, InstanceError> {
        if value.is_null() {
            return Ok("null".to_owned());
        }
        self.invoke_render(value)
    }

    /// `receiver.render()`. An absent receiver is a null dereference.
    pub fn invoke_render(&self, receiver: &Value) -> Result<String, InstanceError> {
        Ok(match receiver {
            Value::Null => {
                return Err(InstanceError::NullDereference {
                    operation: "render",
                })
            }
            Value::Bool(b) => b.to_string(),
            Value::I32(n) => n.to_string(),
            Value::I64(n) => n.to_string(),
            Value::F32(x) => format!("{x:?}"),
            Value::F64(x) => format!("{x:?}"),
            Value::Char(c) => c.to_string(),
            Value::Str(s) => s.to_string(),
            Value::Enum(c) => c.name.to_string(),
            Value::Array(a) => format!("{}[]@{:x}", a.component(), identity_hash(a.addr())),
            Value::Container(c) => self.render_container(c)?,
            Value::Object(obj) => self.render_object(obj)?,
        })
    }

    fn render_object(&self, obj: &ObjectRef) -> Result<String, InstanceError> {
        if let Some(def) = self.lookup(obj.tag().raw()) {
            if let Some(render) = &def.methods().render {
                return render(&Instance::new(self, obj, def));
            }
        }
        Ok(format!(
            "{}@{:x}",
            obj.tag().raw(),
            self.object_hash(obj)?
        ))
    }

    fn render_container(&self, c: &ContainerValue) -> Result<String, InstanceError> {
        let mut out = String::new();
        match c.shape() {
            ContainerShape::Optional(None) => out.push_str("Optional.empty"),
            ContainerShape::Optional(Some(v)) => {
                let _ = write!(out, "Optional[{}]", self.render(v)?);
            }
            ContainerShape::Seq(items) | ContainerShape::Set(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&self.render(item)?);
                }
                out.push(']');
            }
            ContainerShape::Map(entries) => {
                out.push('{');
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}={}", self.render(k)?, self.render(v)?);
                }
                out.push('}');
            }
            ContainerShape::Table(cells) => {
                out.push('{');
                for (i, (r, col, v)) in cells.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(
                        out,
                        "({}, {})={}",
                        self.render(r)?,
                        self.render(col)?,
                        self.render(v)?
                    );
                }
                out.push('}');
            }
        }
        Ok(out)
    }

    // === Copying ===

    /// A distinct instance holding the same member values.
    ///
    /// Scalars and enum constants are returned as-is; strings, objects,
    /// arrays and containers are reallocated one level deep.
    pub fn copy(&self, value: &Value) -> Value {
        match value {
            Value::Str(s) => Value::str(s),
            Value::Object(obj) => Value::Object(ObjectRef::new(obj.tag().clone(), obj.slots())),
            Value::Array(array) => {
                Value::Array(ArrayRef::new(array.component().clone(), array.cells()))
            }
            Value::Container(c) => {
                Value::Container(ContainerValue::new(c.kind().clone(), c.shape().clone()))
            }
            scalar => scalar.clone(),
        }
    }

    /// Like [`Runtime::copy`], but nested arrays are copied as well.
    pub fn deep_copy(&self, value: &Value) -> Value {
        match value {
            Value::Array(array) => Value::Array(ArrayRef::new(
                array.component().clone(),
                array
                    .cells()
                    .iter()
                    .map(|cell| match cell {
                        Value::Array(_) => self.deep_copy(cell),
                        other => other.clone(),
                    })
                    .collect(),
            )),
            other => self.copy(other),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn fold64(bits: u64) -> i32 {
    (bits ^ (bits >> 32)) as i32
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn identity_hash(addr: usize) -> i32 {
    (addr >> 3) as i32
}

/// `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units.
fn string_hash(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
