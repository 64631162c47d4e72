//! User-registered witness pairs.

use eqv_ir::{Name, Runtime, TypeTag, Value};
use rustc_hash::FxHashMap;

use crate::{WitnessError, WitnessTriple};

/// Witness pairs supplied by the caller.
///
/// Looked up by exact tag first, then by raw type name, so one pair can
/// serve every instantiation of a generic type. These values short-circuit
/// every constructive layer, which is how a caller breaks a recursive type
/// graph.
#[derive(Clone, Debug, Default)]
pub struct PrefabValues {
    exact: FxHashMap<TypeTag, (Value, Value)>,
    by_raw: FxHashMap<Name, (Value, Value)>,
}

impl PrefabValues {
    pub fn new() -> Self {
        PrefabValues::default()
    }

    /// Validate and register a pair for exactly `tag`.
    pub fn register(
        &mut self,
        rt: &Runtime,
        tag: TypeTag,
        primary: Value,
        alternate: Value,
    ) -> Result<&mut Self, WitnessError> {
        check_pair(rt, &tag, &primary, &alternate)?;
        Ok(self.insert(tag, primary, alternate))
    }

    /// Validate and register a pair for every instantiation of `raw`.
    pub fn register_raw(
        &mut self,
        rt: &Runtime,
        raw: impl Into<Name>,
        primary: Value,
        alternate: Value,
    ) -> Result<&mut Self, WitnessError> {
        let raw = raw.into();
        check_pair(rt, &TypeTag::simple(raw.clone()), &primary, &alternate)?;
        Ok(self.insert_raw(raw, primary, alternate))
    }

    /// Register without validation; see [`PrefabValues::validate`].
    pub fn insert(&mut self, tag: TypeTag, primary: Value, alternate: Value) -> &mut Self {
        self.exact.insert(tag, (primary, alternate));
        self
    }

    /// Register for a raw name without validation.
    pub fn insert_raw(&mut self, raw: impl Into<Name>, primary: Value, alternate: Value) -> &mut Self {
        self.by_raw.insert(raw.into(), (primary, alternate));
        self
    }

    /// Check every registered pair.
    pub fn validate(&self, rt: &Runtime) -> Result<(), WitnessError> {
        for (tag, (primary, alternate)) in &self.exact {
            check_pair(rt, tag, primary, alternate)?;
        }
        for (raw, (primary, alternate)) in &self.by_raw {
            check_pair(rt, &TypeTag::simple(raw.clone()), primary, alternate)?;
        }
        Ok(())
    }

    /// The triple for `tag`, with a fresh copy of the primary value.
    pub fn get(&self, rt: &Runtime, tag: &TypeTag) -> Option<WitnessTriple> {
        let (primary, alternate) = self
            .exact
            .get(tag)
            .or_else(|| self.by_raw.get(tag.raw()))?;
        Some(WitnessTriple::from_pair(rt, primary.clone(), alternate.clone()))
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.exact.contains_key(tag) || self.by_raw.contains_key(tag.raw())
    }

    /// A new set with the pairs of both; `other` wins on conflicts.
    #[must_use]
    pub fn merge(&self, other: &PrefabValues) -> PrefabValues {
        let mut merged = self.clone();
        merged
            .exact
            .extend(other.exact.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
            .by_raw
            .extend(other.by_raw.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.by_raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A usable pair is two present values that differ both structurally and
/// under the runtime's own `equals`.
fn check_pair(rt: &Runtime, tag: &TypeTag, primary: &Value, alternate: &Value) -> Result<(), WitnessError> {
    let invalid = |reason| WitnessError::InvalidPrefab {
        tag: tag.clone(),
        reason,
    };
    if primary.is_null() || alternate.is_null() {
        return Err(invalid("values must not be null"));
    }
    if primary.structurally_equal(alternate) {
        return Err(invalid("the two values are identical"));
    }
    match rt.equals(primary, alternate) {
        Ok(false) => Ok(()),
        Ok(true) => Err(invalid("the two values are equal")),
        Err(_) => Err(invalid("equals fails on the values")),
    }
}

#[cfg(test)]
mod tests;
