//! The receiver handed to a type's own operations.

use super::{Runtime, TypeDef};
use crate::{InstanceError, Name, ObjectRef, Value};

/// A borrowed view of one object together with its definition.
///
/// Passed to `equals`, `hash_code` and `render` implementations so they can
/// read members by name and delegate element comparisons to the runtime.
pub struct Instance<'a> {
    rt: &'a Runtime,
    obj: &'a ObjectRef,
    def: &'a TypeDef,
}

impl<'a> Instance<'a> {
    pub(crate) fn new(rt: &'a Runtime, obj: &'a ObjectRef, def: &'a TypeDef) -> Self {
        Instance { rt, obj, def }
    }

    #[inline]
    pub fn rt(&self) -> &'a Runtime {
        self.rt
    }

    #[inline]
    pub fn object(&self) -> &'a ObjectRef {
        self.obj
    }

    #[inline]
    pub fn def(&self) -> &'a TypeDef {
        self.def
    }

    /// Read a member by name.
    pub fn get(&self, member: &str) -> Result<Value, InstanceError> {
        self.def
            .field_index(member)
            .and_then(|index| self.obj.slot(index))
            .ok_or_else(|| InstanceError::UnknownMember {
                ty: self.def.name().clone(),
                member: Name::new(member),
            })
    }

    /// The argument viewed as an instance of the same type, if it is one.
    pub fn peer<'b>(&'b self, other: &'b Value) -> Option<Instance<'b>> {
        match other {
            Value::Object(obj) if obj.tag().raw() == self.obj.tag().raw() => {
                Some(Instance::new(self.rt, obj, self.def))
            }
            _ => None,
        }
    }

    /// Whether `other` is the very same object as this receiver.
    pub fn is_same(&self, other: &Value) -> bool {
        other.as_object().is_some_and(|o| o.ptr_eq(self.obj))
    }

    /// Null-safe comparison of one member on both instances.
    pub fn member_equals(&self, other: &Instance<'_>, member: &str) -> Result<bool, InstanceError> {
        self.rt.equals(&self.get(member)?, &other.get(member)?)
    }

    /// Member comparison that calls `equals` on this instance's value
    /// directly, failing when it is absent.
    pub fn member_invoke_equals(
        &self,
        other: &Instance<'_>,
        member: &str,
    ) -> Result<bool, InstanceError> {
        self.rt.invoke_equals(&self.get(member)?, &other.get(member)?)
    }

    /// Null-safe hash of one member.
    pub fn member_hash(&self, member: &str) -> Result<i32, InstanceError> {
        self.rt.hash_code(&self.get(member)?)
    }

    /// Member hash that calls `hash_code` directly, failing when absent.
    pub fn member_invoke_hash(&self, member: &str) -> Result<i32, InstanceError> {
        self.rt.invoke_hash(&self.get(member)?)
    }

    /// Combine the null-safe hashes of `members` as `31 * h + hash(m)`.
    pub fn hash_members(&self, members: &[&str]) -> Result<i32, InstanceError> {
        let mut h: i32 = 1;
        for member in members {
            h = h.wrapping_mul(31).wrapping_add(self.member_hash(member)?);
        }
        Ok(h)
    }

    /// Compare `members` null-safely; true when all are equal.
    pub fn equals_members(&self, other: &Instance<'_>, members: &[&str]) -> Result<bool, InstanceError> {
        for member in members {
            if !self.member_equals(other, member)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
