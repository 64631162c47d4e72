//! Errors raised by instances and by the introspection capability.

use crate::Name;

/// A failure raised by a subject type's own `equals`, `hash_code` or
/// `render` operation.
///
/// These are the instance-level faults the contract checks capture and
/// attribute to the member under test; they are never engine bugs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InstanceError {
    #[error("null dereference while calling `{operation}`")]
    NullDereference { operation: &'static str },

    #[error("type `{ty}` has no member `{member}`")]
    UnknownMember { ty: Name, member: Name },

    #[error("cannot call `{operation}` on abstract type `{ty}`")]
    AbstractMethod { ty: Name, operation: &'static str },

    #[error("{message}")]
    Thrown { message: String },
}

impl InstanceError {
    /// An arbitrary failure raised from user code.
    pub fn thrown(message: impl Into<String>) -> Self {
        InstanceError::Thrown {
            message: message.into(),
        }
    }
}

/// The introspection capability refused an operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("cannot modify `{ty}.{member}`: {reason}")]
    Refused {
        ty: Name,
        member: Name,
        reason: &'static str,
    },

    #[error("type `{ty}` cannot be instantiated: {reason}")]
    NotInstantiable { ty: Name, reason: &'static str },

    #[error("type `{0}` is not registered with the runtime")]
    UnknownType(Name),

    #[error("expected an object, found {found}")]
    NotAnObject { found: String },
}
