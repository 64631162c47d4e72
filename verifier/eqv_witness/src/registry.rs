//! Registered witness strategies.

use std::fmt;
use std::sync::Arc;

use eqv_ir::{Name, TypeTag, Value};
use rustc_hash::FxHashMap;

use crate::{defaults, RecursionGuard, ValueProvider, WitnessError, WitnessTriple};

type FactoryFn = dyn Fn(&TypeTag, &dyn ValueProvider, &RecursionGuard) -> Result<WitnessTriple, WitnessError>
    + Send
    + Sync;

/// A strategy producing the witnesses of one raw type.
///
/// The strategy receives the full tag (so it can read generic arguments),
/// the provider (to resolve nested types) and the guard already extended
/// with the tag.
#[derive(Clone)]
pub struct WitnessFactory(Arc<FactoryFn>);

impl WitnessFactory {
    pub fn new(
        f: impl Fn(&TypeTag, &dyn ValueProvider, &RecursionGuard) -> Result<WitnessTriple, WitnessError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        WitnessFactory(Arc::new(f))
    }

    /// A strategy that always yields the given pair. The copy is made by the
    /// runtime on each request.
    pub fn values(primary: Value, alternate: Value) -> Self {
        WitnessFactory::new(move |_, provider, _| {
            Ok(WitnessTriple::from_pair(
                provider.runtime(),
                primary.clone(),
                alternate.clone(),
            ))
        })
    }

    pub fn create(
        &self,
        tag: &TypeTag,
        provider: &dyn ValueProvider,
        guard: &RecursionGuard,
    ) -> Result<WitnessTriple, WitnessError> {
        (self.0)(tag, provider, guard)
    }
}

impl fmt::Debug for WitnessFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WitnessFactory")
    }
}

/// Strategies keyed by raw type name.
///
/// Keys are names rather than definitions so a strategy can be registered
/// before the type it serves is defined. Immutable once handed to a
/// provider; [`merge`](FactoryRegistry::merge) builds a new registry.
#[derive(Clone, Debug, Default)]
pub struct FactoryRegistry {
    factories: FxHashMap<Name, WitnessFactory>,
}

impl FactoryRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        FactoryRegistry::default()
    }

    /// The registry for scalars, strings, the top type and the built-in
    /// containers.
    pub fn with_defaults() -> Self {
        let mut registry = FactoryRegistry::new();
        defaults::install(&mut registry);
        registry
    }

    /// Register a strategy, replacing any previous one for `raw`.
    pub fn register(&mut self, raw: impl Into<Name>, factory: WitnessFactory) -> &mut Self {
        self.factories.insert(raw.into(), factory);
        self
    }

    /// Register a fixed pair of values for `raw`.
    pub fn register_values(&mut self, raw: impl Into<Name>, primary: Value, alternate: Value) -> &mut Self {
        self.register(raw, WitnessFactory::values(primary, alternate))
    }

    pub fn get(&self, raw: &str) -> Option<&WitnessFactory> {
        self.factories.get(raw)
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.factories.contains_key(raw)
    }

    /// A new registry with the entries of both; `other` wins on conflicts.
    #[must_use]
    pub fn merge(&self, other: &FactoryRegistry) -> FactoryRegistry {
        let mut factories = self.factories.clone();
        factories.extend(
            other
                .factories
                .iter()
                .map(|(name, factory)| (name.clone(), factory.clone())),
        );
        FactoryRegistry { factories }
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
