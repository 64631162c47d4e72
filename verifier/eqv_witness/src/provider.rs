//! The resolution orchestrator.
//!
//! `ValueProvider` and `FallbackStrategy` are passed to each other by
//! reference: the provider calls the fallback when no other layer applies,
//! and the fallback calls back into the provider for every member type.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use eqv_ir::{Runtime, TypeTag, Value};
use rustc_hash::FxHashMap;
use tracing::{trace, warn};

use crate::{
    ensure_sufficient_stack, FactoryRegistry, PrefabValues, RecursionGuard, StructuralSynthesizer,
    WitnessError, WitnessTriple,
};

/// Resolves tags to witnesses.
pub trait ValueProvider {
    /// The runtime the witnesses live in.
    fn runtime(&self) -> &Runtime;

    /// The witnesses of `tag`. `guard` holds the tags currently being
    /// synthesized by the caller's call tree.
    fn resolve(&self, tag: &TypeTag, guard: &RecursionGuard) -> Result<Arc<WitnessTriple>, WitnessError>;

    /// Whichever of `primary` and `alternate` is not equal to `value`.
    ///
    /// An absent `value` yields `primary`. Array-shaped tags compare
    /// structurally; every other tag uses the runtime's `equals`. When that
    /// comparison fails, `primary` is returned and the failure is left for
    /// the contract checks to surface.
    fn give_other(
        &self,
        tag: &TypeTag,
        value: &Value,
        guard: &RecursionGuard,
    ) -> Result<Value, WitnessError> {
        let triple = self.resolve(tag, guard)?;
        if triple.primary.is_null() || value.is_null() {
            return Ok(triple.primary.clone());
        }
        let same_as_primary = if tag.is_array() {
            triple.primary.structurally_equal(value)
        } else {
            match self.runtime().equals(&triple.primary, value) {
                Ok(same) => same,
                Err(err) => {
                    warn!(%tag, error = %err, "equals failed while picking a witness");
                    return Ok(triple.primary.clone());
                }
            }
        };
        Ok(if same_as_primary {
            triple.alternate.clone()
        } else {
            triple.primary.clone()
        })
    }
}

/// The strategy of last resort.
pub trait FallbackStrategy {
    fn synthesize(
        &self,
        tag: &TypeTag,
        provider: &dyn ValueProvider,
        guard: &RecursionGuard,
    ) -> Result<WitnessTriple, WitnessError>;
}

/// One step of the resolution chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layer {
    Cache,
    Prefab,
    Registry,
    Fallback,
}

impl Layer {
    /// The order layers are tried in.
    pub const ORDER: [Layer; 4] = [Layer::Cache, Layer::Prefab, Layer::Registry, Layer::Fallback];

    /// Whether the layer builds a new triple and may recurse.
    pub fn is_constructive(self) -> bool {
        matches!(self, Layer::Registry | Layer::Fallback)
    }
}

/// The provider used by one verification.
///
/// Memoizes every resolved tag, so a type graph converges on one shared
/// triple per tag and repeated requests return the same `Arc`. Not `Sync`:
/// concurrent verifications each own a provider.
pub struct CachedValueProvider<'a> {
    runtime: &'a Runtime,
    registry: &'a FactoryRegistry,
    prefab: &'a PrefabValues,
    fallback: Box<dyn FallbackStrategy + 'a>,
    cache: RefCell<FxHashMap<TypeTag, Arc<WitnessTriple>>>,
}

impl<'a> CachedValueProvider<'a> {
    /// A provider falling back to [`StructuralSynthesizer`].
    pub fn new(runtime: &'a Runtime, registry: &'a FactoryRegistry, prefab: &'a PrefabValues) -> Self {
        CachedValueProvider {
            runtime,
            registry,
            prefab,
            fallback: Box::new(StructuralSynthesizer),
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    /// Replace the fallback strategy.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl FallbackStrategy + 'a) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    /// Number of memoized tags.
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }

    fn try_layer(
        &self,
        layer: Layer,
        tag: &TypeTag,
        guard: &RecursionGuard,
    ) -> Result<Option<Arc<WitnessTriple>>, WitnessError> {
        let triple = match layer {
            Layer::Cache => return Ok(self.cache.borrow().get(tag).cloned()),
            Layer::Prefab => self.prefab.get(self.runtime, tag),
            Layer::Registry => match self.registry.get(tag.raw()) {
                Some(factory) => Some(factory.create(tag, self, &enter(tag, guard)?)?),
                None => None,
            },
            Layer::Fallback => Some(self.fallback.synthesize(tag, self, &enter(tag, guard)?)?),
        };
        Ok(triple.map(Arc::new))
    }
}

/// Extend the guard with `tag`, failing if `tag` is already in flight.
fn enter(tag: &TypeTag, guard: &RecursionGuard) -> Result<RecursionGuard, WitnessError> {
    match guard.cycle_from(tag) {
        Some(chain) => Err(WitnessError::CycleDetected { chain }),
        None => Ok(guard.push(tag.clone())),
    }
}

impl ValueProvider for CachedValueProvider<'_> {
    fn runtime(&self) -> &Runtime {
        self.runtime
    }

    #[tracing::instrument(level = "trace", skip_all, fields(tag = %tag))]
    fn resolve(&self, tag: &TypeTag, guard: &RecursionGuard) -> Result<Arc<WitnessTriple>, WitnessError> {
        ensure_sufficient_stack(|| {
            for layer in Layer::ORDER {
                let Some(triple) = self.try_layer(layer, tag, guard)? else {
                    continue;
                };
                trace!(?layer, "resolved");
                if layer != Layer::Cache {
                    self.cache.borrow_mut().insert(tag.clone(), Arc::clone(&triple));
                }
                return Ok(triple);
            }
            Err(WitnessError::unresolvable(tag, "no strategy applies"))
        })
    }
}

impl fmt::Debug for CachedValueProvider<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedValueProvider")
            .field("registry", &self.registry.len())
            .field("prefab", &self.prefab.len())
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
