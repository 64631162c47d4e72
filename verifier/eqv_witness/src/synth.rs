//! Structural synthesis: witnesses for types nobody registered.

use eqv_ir::{ArrayRef, TypeKind, TypeTag, Value};
use tracing::trace;

use crate::{FallbackStrategy, InstanceAccessor, RecursionGuard, ValueProvider, WitnessError, WitnessTriple};

/// Builds witnesses by shape.
///
/// - enumerations use their first two constants
/// - arrays become length-1 arrays of the component's witnesses
/// - records are allocated without initialization and every member that is
///   neither static nor constant is filled through the provider: once for
///   `primary`, twice for `alternate`, so the two differ in every such
///   member
#[derive(Copy, Clone, Debug, Default)]
pub struct StructuralSynthesizer;

impl FallbackStrategy for StructuralSynthesizer {
    fn synthesize(
        &self,
        tag: &TypeTag,
        provider: &dyn ValueProvider,
        guard: &RecursionGuard,
    ) -> Result<WitnessTriple, WitnessError> {
        if let Some(component) = tag.component() {
            return synthesize_array(component, provider, guard);
        }
        let rt = provider.runtime();
        let Some(def) = rt.lookup(tag.raw()) else {
            return Err(WitnessError::unresolvable(tag, "the type is not registered"));
        };
        match def.kind() {
            TypeKind::Enum(constants) => {
                trace!(%tag, constants = constants.len(), "synthesize enumeration");
                Ok(match (def.enum_constant(0), def.enum_constant(1)) {
                    (None, _) => WitnessTriple::absent(),
                    (Some(only), None) => WitnessTriple::single(only),
                    (Some(first), Some(second)) => WitnessTriple::new(first.clone(), second, first),
                })
            }
            TypeKind::Record(_) => {
                trace!(%tag, "synthesize record");
                let primary = InstanceAccessor::allocate(rt, tag)?;
                primary.scramble(provider, guard)?;
                let alternate = InstanceAccessor::allocate(rt, tag)?;
                alternate.scramble(provider, guard)?;
                alternate.scramble(provider, guard)?;
                let primary_copy = primary.copy();
                Ok(WitnessTriple::new(
                    primary.value(),
                    alternate.value(),
                    primary_copy.value(),
                ))
            }
            TypeKind::Primitive(_) => Err(WitnessError::unresolvable(
                tag,
                "primitive types need registered witnesses",
            )),
            TypeKind::Abstract => Err(WitnessError::unresolvable(
                tag,
                "abstract types have no concrete implementation to instantiate",
            )),
        }
    }
}

fn synthesize_array(
    component: TypeTag,
    provider: &dyn ValueProvider,
    guard: &RecursionGuard,
) -> Result<WitnessTriple, WitnessError> {
    let element = provider.resolve(&component, guard)?;
    let array = |value: &Value| Value::Array(ArrayRef::new(component.clone(), vec![value.clone()]));
    Ok(WitnessTriple::new(
        array(&element.primary),
        array(&element.alternate),
        array(&element.primary),
    ))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
