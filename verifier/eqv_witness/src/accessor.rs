//! Member-level introspection and mutation of one instance.

use std::sync::Arc;

use eqv_ir::{AccessError, FieldFlags, Name, ObjectRef, Runtime, TypeDef, TypeTag, Value};

use crate::{RecursionGuard, ValueProvider, WitnessError};

/// One member of the wrapped instance, with its type resolved against the
/// instance's tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub index: usize,
    pub name: Name,
    pub tag: TypeTag,
    pub flags: FieldFlags,
}

impl Member {
    pub fn is_final(&self) -> bool {
        self.flags.contains(FieldFlags::FINAL)
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    pub fn is_transient(&self) -> bool {
        self.flags.contains(FieldFlags::TRANSIENT)
    }

    pub fn is_constant(&self) -> bool {
        self.flags.contains(FieldFlags::CONSTANT)
    }

    /// Static and constant members cannot take part in instance identity
    /// and are never modified.
    pub fn is_skipped(&self) -> bool {
        self.flags
            .intersects(FieldFlags::STATIC | FieldFlags::CONSTANT)
    }

    /// A primitive scalar that can never be absent.
    pub fn is_non_nullable_primitive(&self) -> bool {
        self.tag.primitive_kind().is_some_and(|kind| !kind.is_nullable())
    }

    pub fn is_floating(&self) -> bool {
        self.tag.primitive_kind().is_some_and(eqv_ir::PrimitiveKind::is_floating)
    }

    pub fn is_array(&self) -> bool {
        self.tag.is_array()
    }
}

/// Structural access to one record instance.
///
/// All mutation goes to the wrapped instance; [`copy`](InstanceAccessor::copy)
/// always allocates a new one.
#[derive(Clone, Debug)]
pub struct InstanceAccessor<'rt> {
    rt: &'rt Runtime,
    def: Arc<TypeDef>,
    subject: ObjectRef,
    members: Arc<[Member]>,
}

impl<'rt> InstanceAccessor<'rt> {
    /// Wrap an object of a registered record type.
    pub fn new(rt: &'rt Runtime, subject: ObjectRef) -> Result<Self, AccessError> {
        let def = Arc::clone(rt.require(subject.tag().raw())?);
        if !def.is_record() {
            return Err(AccessError::NotInstantiable {
                ty: def.name().clone(),
                reason: "only record types have members",
            });
        }
        let members = def
            .fields()
            .iter()
            .enumerate()
            .map(|(index, field)| Member {
                index,
                name: field.name.clone(),
                tag: def.member_tag(field, subject.tag()),
                flags: field.flags,
            })
            .collect();
        Ok(InstanceAccessor {
            rt,
            def,
            subject,
            members,
        })
    }

    /// Wrap a value, which must be an object.
    pub fn of(rt: &'rt Runtime, value: &Value) -> Result<Self, AccessError> {
        match value {
            Value::Object(obj) => InstanceAccessor::new(rt, obj.clone()),
            other => Err(AccessError::NotAnObject {
                found: other.kind_name().to_owned(),
            }),
        }
    }

    /// Allocate a fresh instance of `tag` and wrap it.
    pub fn allocate(rt: &'rt Runtime, tag: &TypeTag) -> Result<Self, AccessError> {
        InstanceAccessor::new(rt, rt.allocate(tag)?)
    }

    pub fn rt(&self) -> &'rt Runtime {
        self.rt
    }

    pub fn def(&self) -> &TypeDef {
        &self.def
    }

    pub fn tag(&self) -> &TypeTag {
        self.subject.tag()
    }

    pub fn subject(&self) -> &ObjectRef {
        &self.subject
    }

    /// The wrapped instance as a value (aliasing, not copying).
    pub fn value(&self) -> Value {
        Value::Object(self.subject.clone())
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn get(&self, member: &Member) -> Value {
        self.subject.slot(member.index).unwrap_or(Value::Null)
    }

    /// Overwrite a member. Static and constant members are refused.
    pub fn set(&self, member: &Member, value: Value) -> Result<(), AccessError> {
        let refused = |reason| AccessError::Refused {
            ty: self.def.name().clone(),
            member: member.name.clone(),
            reason,
        };
        if member.is_static() {
            return Err(refused("static members belong to the type"));
        }
        if member.is_constant() {
            return Err(refused("constant members are fixed at compile time"));
        }
        if self.subject.set_slot(member.index, value) {
            Ok(())
        } else {
            Err(refused("no such slot on the instance"))
        }
    }

    /// Reset a member to its zero/absent value.
    pub fn default_out(&self, member: &Member) -> Result<(), AccessError> {
        self.set(member, self.rt.default_for(&member.tag))
    }

    /// A distinct instance holding the same member values.
    #[must_use]
    pub fn copy(&self) -> Self {
        InstanceAccessor {
            rt: self.rt,
            def: Arc::clone(&self.def),
            subject: ObjectRef::new(self.subject.tag().clone(), self.subject.slots()),
            members: Arc::clone(&self.members),
        }
    }

    /// Set `member` to the witness that differs from its current value.
    pub fn change_member(
        &self,
        member: &Member,
        provider: &dyn ValueProvider,
        guard: &RecursionGuard,
    ) -> Result<(), WitnessError> {
        let other = provider.give_other(&member.tag, &self.get(member), guard)?;
        self.set(member, other)?;
        Ok(())
    }

    /// Change every member that is not skipped.
    pub fn scramble(&self, provider: &dyn ValueProvider, guard: &RecursionGuard) -> Result<(), WitnessError> {
        for member in self.members.iter().filter(|m| !m.is_skipped()) {
            self.change_member(member, provider, guard)?;
        }
        Ok(())
    }

    /// Copy one member's value from another instance of the same type.
    pub fn copy_member_from(&self, other: &InstanceAccessor<'_>, member: &Member) -> Result<(), AccessError> {
        self.set(member, other.get(member))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
