//! Eqv Witness - Example Instances On Demand
//!
//! Given any registered type, possibly generic and possibly self-referential,
//! this crate produces a [`WitnessTriple`]: two structurally distinct
//! instances plus a distinct copy of the first.
//!
//! # Resolution
//!
//! [`CachedValueProvider`] tries an ordered list of layers:
//!
//! 1. **Cache**: one triple per [`TypeTag`] per verification
//! 2. **Prefab**: values registered explicitly by the caller
//! 3. **Registry**: [`FactoryRegistry`] strategies keyed by raw type name
//! 4. **Fallback**: [`StructuralSynthesizer`], which allocates the type and
//!    fills every member by recursive resolution
//!
//! Before the first constructive layer the tag is checked against the
//! [`RecursionGuard`], so a type graph that revisits itself without a prefab
//! value fails with [`WitnessError::CycleDetected`] instead of recursing
//! forever.
//!
//! [`TypeTag`]: eqv_ir::TypeTag

mod accessor;
mod containers;
mod defaults;
mod error;
mod guard;
mod prefab;
mod provider;
mod registry;
mod stack;
mod synth;
mod triple;

pub use accessor::{InstanceAccessor, Member};
pub use containers::{CopyThrough, MapShaped, SingleArg, TableShaped};
pub use error::WitnessError;
pub use guard::RecursionGuard;
pub use prefab::PrefabValues;
pub use provider::{CachedValueProvider, FallbackStrategy, Layer, ValueProvider};
pub use registry::{FactoryRegistry, WitnessFactory};
pub use stack::ensure_sufficient_stack;
pub use synth::StructuralSynthesizer;
pub use triple::WitnessTriple;
