//! Eqv IR - Types, Values and Introspection
//!
//! This crate contains the data structures the contract verifier works on:
//! - `Name` for shared identifiers
//! - `TypeTag` for resolved type identities (the cache key of witness synthesis)
//! - `DeclaredType` for member types before generic substitution
//! - `Value` and the shared object, array and container handles
//! - `Runtime`, the structural introspection capability over registered types
//!
//! # Design Philosophy
//!
//! - **Explicit object model**: types are registered with the `Runtime`
//!   together with their own `equals`, `hash_code` and `render` operations.
//! - **Identity is real**: objects and arrays are shared handles, so a copy is
//!   a distinct instance and `identical` is a meaningful question.
//! - **Allocation bypasses initialization**: every record type can be
//!   allocated with zero/absent members, constants excepted.
//!
//! Floating point scalars compare by bit pattern in every engine-level
//! comparison, so `NaN` equals itself and `0.0` differs from `-0.0`.

pub mod builtin;
mod error;
mod name;
mod runtime;
mod type_tag;
mod value;

pub use builtin::PrimitiveKind;
pub use error::{AccessError, InstanceError};
pub use name::Name;
pub use runtime::{
    EqualsFn, FieldDef, FieldFlags, HashFn, Instance, Methods, RenderFn, Runtime, TypeDef,
    TypeKind,
};
pub use type_tag::{DeclaredType, TypeTag};
pub use value::{ArrayRef, ContainerShape, ContainerValue, EnumConstant, ObjectRef, Value};
